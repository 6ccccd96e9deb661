use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::anchor;
use crate::flatten::{self, FlattenedDays};
use crate::highlight;
use crate::model::{Day, Schedule};
use crate::window::{EXPAND_STEP, Window};

/// Everything derived from one schedule payload. Rebuilt wholesale on
/// every load; only the window moves between loads.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedSchedule {
    pub from_cache: bool,
    pub days: FlattenedDays,
    pub anchor: Option<String>,
    pub has_today: bool,
    pub window: Window,
}

impl LoadedSchedule {
    pub fn visible_days(&self) -> &[Day] {
        &self.days.days[self.window.start..self.window.end]
    }

    pub fn is_highlighted(&self, day_key: &str) -> bool {
        highlight::should_highlight(day_key, self.anchor.as_deref())
    }

    pub fn banner_before(&self, day_key: &str) -> bool {
        highlight::should_insert_banner(day_key, self.anchor.as_deref(), self.has_today)
    }

    pub fn earlier_hidden(&self) -> usize {
        self.window.start
    }

    pub fn later_hidden(&self) -> usize {
        self.days.len() - self.window.end
    }
}

#[derive(Debug, Default)]
pub enum ScheduleView {
    #[default]
    Empty,
    Loaded(Box<LoadedSchedule>),
}

impl ScheduleView {
    pub fn new() -> Self {
        Self::Empty
    }

    /// A fresh payload always replaces the derived state from scratch:
    /// flatten, resolve the anchor, place the initial window. There is no
    /// partial-merge path.
    #[tracing::instrument(skip(self, schedule, now))]
    pub fn load(&mut self, schedule: &Schedule, now: DateTime<Utc>) {
        let today = anchor::today_day_key(schedule, now);
        let has_today = today.is_some();
        let anchor =
            today.or_else(|| anchor::next_available_day_key(schedule, now));

        let days = flatten::flatten(schedule, now);
        let anchor_index = anchor.as_deref().and_then(|key| days.index_of(key));
        let window = Window::initial(anchor_index, days.len());

        info!(
            days = days.len(),
            anchor = ?anchor,
            has_today,
            from_cache = schedule.is_cache,
            "loaded schedule view"
        );

        *self = Self::Loaded(Box::new(LoadedSchedule {
            from_cache: schedule.is_cache,
            days,
            anchor,
            has_today,
            window,
        }));
    }

    pub fn expand_earlier(&mut self) {
        if let Self::Loaded(state) = self {
            state.window.expand_earlier(EXPAND_STEP);
        }
    }

    pub fn expand_later(&mut self) {
        if let Self::Loaded(state) = self {
            let len = state.days.len();
            state.window.expand_later(len, EXPAND_STEP);
        }
    }

    pub fn loaded(&self) -> Option<&LoadedSchedule> {
        match self {
            Self::Empty => None,
            Self::Loaded(state) => Some(state),
        }
    }

    pub fn visible(&self) -> &[Day] {
        match self {
            Self::Empty => &[],
            Self::Loaded(state) => state.visible_days(),
        }
    }
}
