use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::model::Schedule;

/// Reads a schedule payload from a file, or from stdin when the path is
/// `-`. Retrieval over the network is the host's concern; by the time the
/// engine runs, a complete payload must already exist.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_schedule(path: &Path) -> anyhow::Result<Schedule> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read schedule payload from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    parse_schedule(&raw)
        .with_context(|| format!("failed to decode schedule payload from {}", path.display()))
}

pub fn parse_schedule(raw: &str) -> anyhow::Result<Schedule> {
    let schedule: Schedule =
        serde_json::from_str(raw).context("schedule payload is not valid schedule JSON")?;

    debug!(
        items = schedule.items.len(),
        from_cache = schedule.is_cache,
        "decoded schedule payload"
    );
    Ok(schedule)
}
