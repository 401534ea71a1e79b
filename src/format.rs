//! Human-readable distances and durations.

pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round())
    } else if km < 10.0 {
        format!("{km:.1} km")
    } else {
        format!("{} km", km.round())
    }
}

pub fn format_duration(minutes: f64) -> String {
    if minutes < 60.0 {
        return format!("{} min", minutes.round());
    }
    let hours = (minutes / 60.0).floor();
    let mins = (minutes % 60.0).round();
    if mins > 0.0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{hours}h")
    }
}
