/// Render a second count as `MM:SS`.
///
/// Both parts are zero-padded to two digits. Minutes are not wrapped into
/// hours, so a 90 minute countdown reads `90:00`.
pub fn format_clock(total_secs: u64) -> String {
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Render worked time for summaries, e.g. `1h 05m` or `12m 30s`.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m {seconds:02}s")
    }
}
