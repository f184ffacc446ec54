//! Best-effort duration label arithmetic.
//!
//! Providers return human-oriented duration labels ("12:34", "1:05:00").
//! Totals are computed where the labels parse and reported loosely; a
//! label that does not parse simply contributes nothing.

/// Parses a "MM:SS" or "HH:MM:SS" label into whole minutes, rounding up
/// any trailing seconds.
pub fn label_to_minutes(label: &str) -> Option<u32> {
    let parts: Vec<&str> = label.trim().split(':').collect();
    let nums: Vec<u32> = parts
        .iter()
        .map(|p| p.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;

    let (minutes, seconds) = match nums.as_slice() {
        [m, s] => (*m, *s),
        [h, m, s] => (h * 60 + m, *s),
        _ => return None,
    };
    Some(minutes + u32::from(seconds > 0))
}

/// Sums a set of duration labels into a rough total like "~2h 15m".
///
/// Unparseable labels are skipped; an all-unparseable input yields an
/// empty string rather than a misleading zero.
pub fn total_label<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    let mut any = false;
    let mut total = 0u32;
    for label in labels {
        if let Some(minutes) = label_to_minutes(label) {
            total += minutes;
            any = true;
        }
    }
    if !any {
        return String::new();
    }
    match (total / 60, total % 60) {
        (0, m) => format!("~{}m", m),
        (h, 0) => format!("~{}h", h),
        (h, m) => format!("~{}h {}m", h, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minute_second_labels() {
        assert_eq!(label_to_minutes("12:34"), Some(13));
        assert_eq!(label_to_minutes("12:00"), Some(12));
    }

    #[test]
    fn parses_hour_labels() {
        assert_eq!(label_to_minutes("1:05:00"), Some(65));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(label_to_minutes("n/a"), None);
        assert_eq!(label_to_minutes(""), None);
        assert_eq!(label_to_minutes("12"), None);
    }

    #[test]
    fn totals_mixed_labels() {
        let labels = ["30:00", "1:00:00", "n/a", "15:00"];
        assert_eq!(total_label(labels.iter().copied()), "~1h 45m");
    }

    #[test]
    fn all_unparseable_yields_empty() {
        let labels = ["n/a", "???"];
        assert_eq!(total_label(labels.iter().copied()), "");
    }

    #[test]
    fn sub_hour_totals_omit_hours() {
        let labels = ["20:00", "25:00"];
        assert_eq!(total_label(labels.iter().copied()), "~45m");
    }
}
