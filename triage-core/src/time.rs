//! Time utilities: the reference "today" used for urgency.
//!
//! Scorers never read the clock; callers resolve the date here and pass it in.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// The calendar date at `now` in an IANA tz like "America/Chicago".
pub fn date_in_timezone(now: DateTime<Utc>, tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Today's date in the given timezone.
pub fn today_in_timezone(tz: &str) -> Result<NaiveDate> {
    date_in_timezone(Utc::now(), tz)
}

/// Parse an explicit reference date ("2026-02-20").
pub fn parse_reference_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid reference date '{s}' (expected YYYY-MM-DD)"))
}
