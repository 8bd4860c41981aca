use colored::*;

/// Format image count with appropriate plural
pub fn format_count(count: usize) -> String {
    if count == 1 {
        "1 image".to_string()
    } else {
        format!("{} images", count)
    }
}

/// Format a path for display, replacing home directory with ~
pub fn format_path(path: &std::path::Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Format duration in human-readable form
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    }
}

/// Colour a fingerprint distance relative to the active threshold
pub fn format_distance(distance: f64, threshold: f64) -> ColoredString {
    let s = format!("{:.2}", distance);
    if distance == 0.0 {
        s.green().bold()
    } else if distance <= threshold {
        s.green()
    } else if distance <= threshold * 2.0 {
        s.yellow()
    } else {
        s.red()
    }
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Truncate a string to max length with ellipsis, keeping the tail
pub fn truncate_left(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let tail: String = s.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0 images");
        assert_eq!(format_count(1), "1 image");
        assert_eq!(format_count(42), "42 images");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.5), "500ms");
        assert_eq!(format_duration(3.7), "3.7s");
        assert_eq!(format_duration(125.0), "2m 5s");
    }

    #[test]
    fn test_truncate_left() {
        assert_eq!(truncate_left("hello", 10), "hello");
        assert_eq!(truncate_left("/photos/holiday/img_001.jpg", 14), "...img_001.jpg");
        assert_eq!(truncate_left("abcdef", 3), "...");
    }

    #[test]
    fn test_format_distance_plain_text() {
        colored::control::set_override(false);
        assert_eq!(format_distance(3.14159, 10.0).to_string(), "3.14");
    }
}
