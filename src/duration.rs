use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Result, bail};
use regex::Regex;

static ISO8601_DURATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").unwrap());

/// Decodes the compact `PT1H2M3S` encoding the videos endpoint returns.
///
/// Every component is optional; a bare `PT` decodes to zero. A component
/// that fails integer conversion is coerced to zero.
///
/// # Errors
/// Errors when the input carries no `PT` marker at all
pub fn parse_iso8601_duration(encoded: &str) -> Result<Duration> {
    let Some(captures) = ISO8601_DURATION_REGEX.captures(encoded) else {
        bail!("unrecognized duration encoding: {encoded}");
    };

    let component = |i: usize| {
        captures
            .get(i)
            .map_or(0, |m| m.as_str().parse::<u64>().unwrap_or(0))
    };

    let (hours, minutes, seconds) = (component(1), component(2), component(3));
    Ok(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
}

/// Renders a duration as `"<H>h <M>m <S>s"`, truncated to whole seconds.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}h {}m {}s", total / 3600, (total / 60) % 60, total % 60)
}

/// Projects a duration onto a playback speed.
///
/// Divides in f64 first, then truncates to whole seconds.
#[must_use]
pub fn at_speed(duration: Duration, speed: f64) -> Duration {
    Duration::from_secs((duration.as_secs_f64() / speed) as u64)
}
