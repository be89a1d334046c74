//! Human-readable file sizes and relative dates for notebook cards.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const DAY_MS: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

/// Format a byte count with base-1024 units and at most two decimals.
///
/// Values beyond the gigabyte range stay expressed in GB.
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_owned();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

/// Coarse distance between two instants, in whole days rounded up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeDate {
    Yesterday,
    DaysAgo(u64),
    /// Seven or more days away (or unparseable); show a calendar date.
    Calendar,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn relative_date(then_ms: f64, now_ms: f64) -> RelativeDate {
    let diff = (now_ms - then_ms).abs();
    if !diff.is_finite() {
        return RelativeDate::Calendar;
    }
    match (diff / DAY_MS).ceil() as u64 {
        1 => RelativeDate::Yesterday,
        days if days < 7 => RelativeDate::DaysAgo(days),
        _ => RelativeDate::Calendar,
    }
}

impl RelativeDate {
    /// Render the label; `calendar` supplies the locale date when needed.
    pub fn label(self, calendar: impl FnOnce() -> String) -> String {
        match self {
            Self::Yesterday => "Yesterday".to_owned(),
            Self::DaysAgo(days) => format!("{days} days ago"),
            Self::Calendar => calendar(),
        }
    }
}
