//! Display helpers: byte and uptime humanization, disk usage, list renderings.

use crate::types::FsEntry;

const SIZES: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
pub const PLACEHOLDER: &str = "—";

/// Rounds half away from zero at the tenths place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Bytes in mebibytes, one decimal.
pub fn mb(bytes: f64) -> f64 {
    round1(bytes / (1024.0 * 1024.0))
}

/// 1000-based ladder. `decimals == 0` means the default of 2; trailing zeros are trimmed.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".into();
    }
    let dm = if decimals == 0 { 2 } else { decimals };
    let mut value = bytes as f64;
    let mut i = 0;
    while value >= 1000.0 && i < SIZES.len() - 1 {
        value /= 1000.0;
        i += 1;
    }
    let fixed = format!("{value:.dm$}");
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    format!("{trimmed} {}", SIZES[i])
}

/// `DdHH:MM:SS`, the day segment only when non-zero.
pub fn format_uptime(secs: u64) -> String {
    let d = secs / 86_400;
    let h = (secs % 86_400) / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if d > 0 {
        format!("{d}d {h:02}:{m:02}:{s:02}")
    } else {
        format!("{h:02}:{m:02}:{s:02}")
    }
}

pub fn uptime_display(secs: Option<u64>) -> String {
    secs.map(format_uptime)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Percent of all filesystem space in use, rounded; 0 with no entries or no size.
pub fn disk_usage(entries: &[FsEntry]) -> u32 {
    let size: f64 = entries.iter().map(|e| e.size).sum();
    if size <= 0.0 {
        return 0;
    }
    let used: f64 = entries.iter().map(|e| e.used).sum();
    (used / size * 100.0).round().max(0.0) as u32
}

pub fn cpu_cores_display(cores: Option<&[f64]>) -> String {
    match cores {
        Some(c) => c
            .iter()
            .map(|v| format!("{v:.1}"))
            .collect::<Vec<_>>()
            .join(", "),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn load_avg_display(loadavg: Option<&[f64]>) -> String {
    match loadavg {
        Some(l) => l
            .iter()
            .map(|v| format!("{v:.2}"))
            .collect::<Vec<_>>()
            .join(" / "),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = chars[..left].iter().collect();
    let tail: String = chars[chars.len() - right..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs(size: f64, used: f64) -> FsEntry {
        FsEntry {
            size,
            used,
            ..Default::default()
        }
    }

    #[test]
    fn bytes_thousand_based() {
        assert_eq!(format_bytes(0, 2), "0 Bytes");
        assert_eq!(format_bytes(1500, 2), "1.5 KB");
        assert_eq!(format_bytes(999, 2), "999 Bytes");
        assert_eq!(format_bytes(1_000_000, 2), "1 MB");
        assert_eq!(format_bytes(1_234_567, 3), "1.235 MB");
    }

    #[test]
    fn bytes_zero_decimals_means_two() {
        assert_eq!(format_bytes(1_234, 0), "1.23 KB");
    }

    #[test]
    fn uptime_formats() {
        assert_eq!(format_uptime(0), "00:00:00");
        assert_eq!(format_uptime(90_061), "1d 01:01:01");
        assert_eq!(format_uptime(3_599), "00:59:59");
        assert_eq!(uptime_display(None), PLACEHOLDER);
    }

    #[test]
    fn disk_usage_over_all_entries() {
        assert_eq!(disk_usage(&[fs(100.0, 50.0), fs(100.0, 50.0)]), 50);
        assert_eq!(disk_usage(&[]), 0);
        assert_eq!(disk_usage(&[fs(0.0, 0.0)]), 0);
        assert_eq!(disk_usage(&[fs(300.0, 100.0)]), 33);
    }

    #[test]
    fn rounding_half_away_from_zero() {
        assert_eq!(round1(1.25), 1.3);
        assert_eq!(round1(-1.25), -1.3);
        assert_eq!(mb(1024.0 * 1024.0 * 2.5), 2.5);
    }

    #[test]
    fn list_displays() {
        assert_eq!(cpu_cores_display(Some(&[1.0, 22.46])), "1.0, 22.5");
        assert_eq!(cpu_cores_display(None), PLACEHOLDER);
        assert_eq!(load_avg_display(Some(&[0.5, 1.0, 2.25])), "0.50 / 1.00 / 2.25");
        assert_eq!(load_avg_display(None), PLACEHOLDER);
    }

    #[test]
    fn truncates_in_the_middle() {
        assert_eq!(truncate_middle("short", 10), "short");
        assert_eq!(truncate_middle("/very/long/mount/point", 10), "/ve...oint");
    }
}
