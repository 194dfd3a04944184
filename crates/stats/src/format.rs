//! Display helpers for durations and progress.

/// Render a minute count as "Xh Ym", or "Ym" under an hour.
///
/// Zero renders as "0m".
pub fn format_duration(minutes: u64) -> String {
    if minutes == 0 {
        return "0m".to_string();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// `current` as a percentage of `total`, clamped to 0-100.
///
/// A zero or non-finite total yields 0.
pub fn progress_percentage(current: f64, total: f64) -> f64 {
    if total == 0.0 || !total.is_finite() {
        return 0.0;
    }
    let pct = current / total * 100.0;
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}

/// Whole minutes left in a movie of `runtime` minutes watched to `progress` percent.
pub fn time_remaining(runtime: u32, progress: f32) -> u64 {
    let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 100.0) };
    (runtime as f64 * (100.0 - progress as f64) / 100.0).floor() as u64
}
