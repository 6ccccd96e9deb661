use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{
  Context,
  anyhow
};
use chrono::{
  DateTime,
  Datelike,
  Duration,
  LocalResult,
  NaiveDate,
  NaiveDateTime,
  TimeZone,
  Utc,
  Weekday
};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;

const TIMEZONE_CONFIG_FILE: &str =
  "lectio-time.toml";
const TIMEZONE_ENV_VAR: &str =
  "LECTIO_TIMEZONE";
const TIMEZONE_CONFIG_ENV_VAR: &str =
  "LECTIO_TIME_CONFIG";
const DEFAULT_CAMPUS_TIMEZONE: &str =
  "Europe/Moscow";

// The two layouts the schedule feed
// actually emits. Nothing else parses.
const OFFSET_LAYOUT: &str =
  "%Y-%m-%dT%H:%M:%S%.3f%z";
const ZULU_LAYOUT: &str =
  "%Y-%m-%dT%H:%M:%S%.3fZ";

#[derive(Debug, Deserialize)]
struct TimezoneConfig {
  timezone: Option<String>,
  time:     Option<TimezoneSection>
}

#[derive(Debug, Deserialize)]
struct TimezoneSection {
  timezone: Option<String>
}

pub fn campus_timezone() -> &'static Tz
{
  static CAMPUS_TZ: OnceLock<Tz> =
    OnceLock::new();
  CAMPUS_TZ.get_or_init(
    resolve_campus_timezone
  )
}

#[must_use]
pub fn to_campus_date(
  dt: DateTime<Utc>
) -> NaiveDate {
  dt.with_timezone(campus_timezone())
    .date_naive()
}

#[must_use]
pub fn campus_month(
  dt: DateTime<Utc>
) -> u32 {
  dt.with_timezone(campus_timezone())
    .month()
}

#[must_use]
pub fn same_campus_day(
  a: DateTime<Utc>,
  b: DateTime<Utc>
) -> bool {
  to_campus_date(a) == to_campus_date(b)
}

fn resolve_campus_timezone() -> Tz {
  if let Ok(raw) =
    std::env::var(TIMEZONE_ENV_VAR)
  {
    if let Some(tz) = parse_timezone(
      &raw,
      TIMEZONE_ENV_VAR
    ) {
      return tz;
    }
  }

  if let Some(path) =
    timezone_config_path()
    && let Some(tz) =
      load_timezone_from_file(&path)
  {
    return tz;
  }

  parse_timezone(
    DEFAULT_CAMPUS_TIMEZONE,
    "DEFAULT_CAMPUS_TIMEZONE"
  )
  .unwrap_or_else(|| {
    tracing::error!(
      "failed to parse fallback \
       timezone; using UTC"
    );
    chrono_tz::UTC
  })
}

fn timezone_config_path()
-> Option<PathBuf> {
  if let Ok(raw) = std::env::var(
    TIMEZONE_CONFIG_ENV_VAR
  ) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(PathBuf::from(
        trimmed
      ));
    }
  }

  std::env::current_dir().ok().map(
    |dir| {
      dir.join(TIMEZONE_CONFIG_FILE)
    }
  )
}

fn load_timezone_from_file(
  path: &PathBuf
) -> Option<Tz> {
  if !path.exists() {
    tracing::info!(
      file = %path.display(),
      "timezone config file not found"
    );
    return None;
  }

  let raw = match fs::read_to_string(
    path
  ) {
    | Ok(raw) => raw,
    | Err(err) => {
      tracing::error!(
        file = %path.display(),
        error = %err,
        "failed reading timezone config file"
      );
      return None;
    }
  };

  let parsed = match toml::from_str::<
    TimezoneConfig
  >(&raw)
  {
    | Ok(parsed) => parsed,
    | Err(err) => {
      tracing::error!(
        file = %path.display(),
        error = %err,
        "failed parsing timezone config file"
      );
      return None;
    }
  };

  let timezone =
    parsed.timezone.or_else(|| {
      parsed.time.and_then(|section| {
        section.timezone
      })
    });
  let Some(timezone) = timezone else {
    tracing::warn!(
      file = %path.display(),
      "timezone config had no timezone field"
    );
    return None;
  };

  parse_timezone(
    timezone.as_str(),
    &format!("file:{}", path.display())
  )
}

fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::info!(
        source,
        timezone = %trimmed,
        "configured campus timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

fn to_utc_from_campus_local(
  local_naive: NaiveDateTime,
  context: &str
) -> anyhow::Result<DateTime<Utc>> {
  match campus_timezone()
    .from_local_datetime(&local_naive)
  {
    | LocalResult::Single(local_dt) => {
      Ok(local_dt.with_timezone(&Utc))
    }
    | LocalResult::Ambiguous(
      first,
      second
    ) => {
      tracing::warn!(
        context,
        first = %first,
        second = %second,
        "ambiguous local datetime; using earliest"
      );
      let chosen = if first <= second {
        first
      } else {
        second
      };
      Ok(chosen.with_timezone(&Utc))
    }
    | LocalResult::None => {
      Err(anyhow!(
        "local datetime does not \
         exist in campus timezone: \
         {context}"
      ))
    }
  }
}

/// Parses a day's raw date string.
/// The feed writes either a numeric
/// zone offset or a literal "Z"; the
/// "Z" variant carries no zone and is
/// read as campus wall time.
pub fn parse_schedule_date(
  raw: &str
) -> anyhow::Result<DateTime<Utc>> {
  if let Ok(dt) =
    DateTime::parse_from_str(
      raw,
      OFFSET_LAYOUT
    )
  {
    return Ok(dt.with_timezone(&Utc));
  }

  let naive =
    NaiveDateTime::parse_from_str(
      raw,
      ZULU_LAYOUT
    )
    .map_err(|_| {
      anyhow!(
        "date matches neither \
         schedule layout: {raw}"
      )
    })?;

  to_utc_from_campus_local(
    naive,
    "zulu-layout"
  )
}

#[must_use]
pub fn day_label(
  dt: DateTime<Utc>
) -> String {
  let label = dt
    .with_timezone(campus_timezone())
    .format("%A, %-d %B")
    .to_string();
  let mut chars = label.chars();
  match chars.next() {
    | Some(first) => {
      first
        .to_uppercase()
        .collect::<String>()
        + chars.as_str()
    }
    | None => label
  }
}

#[tracing::instrument(skip(now), fields(input = input))]
pub fn parse_date_expr(
  input: &str,
  now: DateTime<Utc>
) -> anyhow::Result<DateTime<Utc>> {
  let token = input.trim();
  let lower =
    token.to_ascii_lowercase();

  match lower.as_str() {
    | "now" => return Ok(now),
    | "today" => {
      let date = to_campus_date(now);
      let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| {
          anyhow!(
            "failed to construct \
             midnight for today"
          )
        })?;
      return to_utc_from_campus_local(
        midnight, "today"
      );
    }
    | "tomorrow" => {
      let today =
        parse_date_expr("today", now)?;
      return Ok(
        today + Duration::days(1)
      );
    }
    | "yesterday" => {
      let today =
        parse_date_expr("today", now)?;
      return Ok(
        today - Duration::days(1)
      );
    }
    | _ => {}
  }

  if let Some(target_weekday) =
    parse_weekday_name(&lower)
  {
    let target_date = next_weekday_date(
      to_campus_date(now),
      target_weekday
    );
    let midnight = target_date
      .and_hms_opt(0, 0, 0)
      .ok_or_else(|| {
        anyhow!(
          "failed to construct \
           weekday midnight"
        )
      })?;
    return to_utc_from_campus_local(
      midnight,
      "weekday-name"
    );
  }

  let rel_re = Regex::new(r"^(?P<sign>[+-])(?P<num>\d+)(?P<unit>[dhm])$")
        .map_err(|e| anyhow!("internal regex compile failure: {e}"))?;

  if let Some(caps) =
    rel_re.captures(token)
  {
    let sign = caps
      .name("sign")
      .map(|m| m.as_str())
      .ok_or_else(|| {
        anyhow!("missing relative sign")
      })?;
    let num: i64 = caps
      .name("num")
      .map(|m| m.as_str())
      .ok_or_else(|| {
        anyhow!(
          "missing relative amount"
        )
      })?
      .parse()
      .context(
        "invalid relative number"
      )?;
    let unit = caps
      .name("unit")
      .map(|m| m.as_str())
      .ok_or_else(|| {
        anyhow!("missing relative unit")
      })?;

    let duration = match unit {
      | "d" => Duration::days(num),
      | "h" => Duration::hours(num),
      | "m" => Duration::minutes(num),
      | _ => {
        return Err(anyhow!(
          "unknown relative unit: \
           {unit}"
        ))
      }
    };

    return Ok(
      if sign == "-" {
        now - duration
      } else {
        now + duration
      }
    );
  }

  if let Ok(dt) =
    parse_schedule_date(token)
  {
    return Ok(dt);
  }

  if let Ok(dt) =
    DateTime::parse_from_rfc3339(token)
  {
    return Ok(dt.with_timezone(&Utc));
  }

  if let Ok(date) =
    NaiveDate::parse_from_str(
      token, "%Y-%m-%d"
    )
  {
    let midnight = date
      .and_hms_opt(0, 0, 0)
      .ok_or_else(|| {
        anyhow!(
          "failed to construct \
           midnight for date"
        )
      })?;
    return to_utc_from_campus_local(
      midnight, "date"
    );
  }

  for fmt in
    ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
  {
    if let Ok(ndt) =
      NaiveDateTime::parse_from_str(
        token, fmt
      )
    {
      return to_utc_from_campus_local(
        ndt, fmt
      );
    }
  }

  Err(anyhow!(
    "unrecognized date expression: \
     {input}"
  ))
  .with_context(|| {
    "supported formats: \
     now/today/tomorrow/yesterday, \
     weekday names (e.g. monday), \
     +Nd/+Nh/+Nm, the schedule feed \
     layouts, RFC3339, YYYY-MM-DD, \
     YYYY-MM-DDTHH:MM, \
     YYYY-MM-DD HH:MM"
  })
}

fn parse_weekday_name(
  token: &str
) -> Option<Weekday> {
  match token.trim() {
    | "monday" | "mon" => {
      Some(Weekday::Mon)
    }
    | "tuesday" | "tue" | "tues" => {
      Some(Weekday::Tue)
    }
    | "wednesday" | "wed" => {
      Some(Weekday::Wed)
    }
    | "thursday" | "thu" | "thur"
    | "thurs" => Some(Weekday::Thu),
    | "friday" | "fri" => {
      Some(Weekday::Fri)
    }
    | "saturday" | "sat" => {
      Some(Weekday::Sat)
    }
    | "sunday" | "sun" => {
      Some(Weekday::Sun)
    }
    | _ => None
  }
}

fn next_weekday_date(
  from: NaiveDate,
  target: Weekday
) -> NaiveDate {
  let from_idx = from
    .weekday()
    .num_days_from_monday()
    as i64;
  let target_idx = target
    .num_days_from_monday()
    as i64;
  let mut delta =
    (7 + target_idx - from_idx) % 7;
  if delta == 0 {
    delta = 7;
  }
  from
    .checked_add_signed(Duration::days(
      delta
    ))
    .unwrap_or(from)
}
