//! Day-time tick helpers.
//!
//! A game day is [`TICKS_PER_DAY`] ticks long and tick 0 falls at 06:00.
//! Legacy packs write times either as `HH:MM` clock strings or as raw tick
//! counts; output formats expect a tick inside `[0, TICKS_PER_DAY)`.
//!
//! Parsing does not wrap: arithmetic on fade windows (such as
//! deriving a missing fade-out start) runs on the raw values, and only the
//! final results go through [`normalize_tick_time`].

/// Length of one game day in ticks.
pub const TICKS_PER_DAY: i64 = 24_000;

/// Ticks per clock hour.
const TICKS_PER_HOUR: i64 = 1_000;

/// Clock time of tick 0, expressed in ticks after midnight (06:00).
const DAY_START: i64 = 6 * TICKS_PER_HOUR;

/// Parse a legacy time value into a raw tick count.
///
/// Accepts `HH:MM` (hours `0..=24`, minutes `0..=59`) and bare integers.
/// Clock times before 06:00 yield negative ticks. Returns `None` for
/// anything else.
///
/// ```
/// use skypatch_pack::ticks::parse_tick_time;
///
/// assert_eq!(parse_tick_time("06:00"), Some(0));
/// assert_eq!(parse_tick_time("18:30"), Some(12_500));
/// assert_eq!(parse_tick_time("05:00"), Some(-1_000));
/// assert_eq!(parse_tick_time("2500"), Some(2_500));
/// assert_eq!(parse_tick_time("noon"), None);
/// ```
pub fn parse_tick_time(value: &str) -> Option<i64> {
    let value = value.trim();
    let Some((hours, minutes)) = value.split_once(':') else {
        return value.parse().ok();
    };

    let hours: i64 = hours.trim().parse().ok()?;
    let minutes: i64 = minutes.trim().parse().ok()?;
    if !(0..=24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    Some(hours * TICKS_PER_HOUR + minutes * TICKS_PER_HOUR / 60 - DAY_START)
}

/// Wrap a raw tick count into `[0, TICKS_PER_DAY)`.
pub fn normalize_tick_time(ticks: i64) -> i64 {
    ticks.rem_euclid(TICKS_PER_DAY)
}
