//! Shared formatting utilities used by both CLI and TUI

use chrono::{DateTime, Local};

/// Truncate a string to a maximum length (in characters), adding "..." at the end if truncated.
///
/// This function is Unicode-safe and counts characters, not bytes.
///
/// # Examples
/// ```
/// use jobdash::formatting::truncate_string;
/// assert_eq!(truncate_string("hello", 10), "hello");
/// assert_eq!(truncate_string("hello world", 8), "hello...");
/// assert_eq!(truncate_string("ab", 2), "ab");
/// ```
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Keep the first `max_lines` lines of a multi-line block, noting how many
/// were dropped.
///
/// # Examples
/// ```
/// use jobdash::formatting::head_lines;
/// assert_eq!(head_lines("a\nb\nc", 2), "a\nb\n… 1 more line(s)");
/// assert_eq!(head_lines("a\nb", 5), "a\nb");
/// ```
#[must_use]
pub fn head_lines(text: &str, max_lines: usize) -> String {
    let total = text.lines().count();
    if total <= max_lines {
        return text.to_string();
    }
    let mut out: Vec<&str> = text.lines().take(max_lines).collect();
    let more = format!("… {} more line(s)", total - max_lines);
    out.push(&more);
    out.join("\n")
}

/// Collapse a pretty-printed JSON block onto one line for narrow cells.
///
/// # Examples
/// ```
/// use jobdash::formatting::single_line;
/// assert_eq!(single_line("{\n  \"a\": 1,\n  \"b\": 2\n}"), "{ \"a\": 1, \"b\": 2 }");
/// ```
#[must_use]
pub fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Timestamp shown in watch-mode headers and the TUI status bar.
#[must_use]
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Seconds elapsed since `at`, as a short "5s ago" style string.
#[must_use]
pub fn format_age(at: DateTime<Local>, now: DateTime<Local>) -> String {
    let secs = (now - at).num_seconds().max(0);
    if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 3), "abc");
        assert_eq!(truncate_string("abcd", 3), "abc");
        assert_eq!(truncate_string("abcdefgh", 6), "abc...");
    }

    #[test]
    fn test_truncate_string_unicode() {
        let chinese = "\u{4e2d}\u{6587}\u{6d4b}\u{8bd5}";
        assert_eq!(truncate_string(chinese, 10), chinese);
        assert_eq!(truncate_string(chinese, 4), chinese);
        assert_eq!(truncate_string(chinese, 3), "\u{4e2d}\u{6587}\u{6d4b}");

        let mixed = "ab\u{4e2d}cd";
        assert_eq!(truncate_string(mixed, 4), "a...");
    }

    #[test]
    fn test_head_lines() {
        assert_eq!(head_lines("", 3), "");
        assert_eq!(head_lines("one", 1), "one");
        assert_eq!(head_lines("1\n2\n3\n4", 2), "1\n2\n… 2 more line(s)");
    }

    #[test]
    fn test_single_line() {
        let pretty = serde_json::to_string_pretty(&serde_json::json!({"userName": "alice"})).unwrap();
        assert_eq!(single_line(&pretty), "{ \"userName\": \"alice\" }");
        assert_eq!(single_line("N/A"), "N/A");
    }

    #[test]
    fn test_format_age() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(format_age(now - Duration::seconds(5), now), "5s ago");
        assert_eq!(format_age(now - Duration::seconds(125), now), "2m ago");
        assert_eq!(format_age(now - Duration::hours(3), now), "3h ago");
        assert_eq!(format_age(now + Duration::seconds(10), now), "0s ago");
    }

    #[test]
    fn test_format_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 8, 3, 9).unwrap();
        assert_eq!(format_timestamp(at), "2024-05-01 08:03:09");
    }
}
