//! Human-readable elapsed-time formatting for table cells and the run total.

/// Format an elapsed duration in seconds for display.
///
/// Sub-second durations render as whole milliseconds ("500 ms"); everything
/// else as zero-padded `HH:MM:SS` with the final seconds rounded.
#[must_use]
pub fn format_duration(duration: f64) -> String {
    if duration < 1.0 {
        return format!("{} ms", (duration * 1000.0).round() as i64);
    }

    let hours = (duration / 3600.0).floor() as u64;
    let remaining = duration % 3600.0;
    let minutes = (remaining / 60.0).floor() as u64;
    let seconds = (remaining % 60.0).round() as u64;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
