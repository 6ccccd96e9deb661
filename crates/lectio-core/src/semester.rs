use chrono::{
  DateTime,
  Utc
};
use tracing::trace;

use crate::datetime::campus_month;

/// Half-year bucket a calendar month
/// falls into. The relevance test is
/// month-only and ignores the year;
/// that is the feed's own policy.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq
)]
pub enum Semester {
  Autumn,
  Spring
}

impl Semester {
  #[must_use]
  pub fn for_month(
    month: u32
  ) -> Self {
    if (9..=12).contains(&month) {
      Self::Autumn
    } else {
      Self::Spring
    }
  }

  #[must_use]
  pub fn of(
    instant: DateTime<Utc>
  ) -> Self {
    Self::for_month(campus_month(
      instant
    ))
  }
}

#[must_use]
pub fn is_current_semester(
  instant: DateTime<Utc>,
  now: DateTime<Utc>
) -> bool {
  let ok = Semester::of(instant)
    == Semester::of(now);
  trace!(
    instant = %instant,
    ok,
    "semester relevance check"
  );
  ok
}
