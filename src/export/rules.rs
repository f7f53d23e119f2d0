//! Line classification rules for army list exports.
//!
//! Each rule looks at one trimmed line in isolation.

use std::sync::LazyLock;

use regex::Regex;

/// `Name (N points)`; also accepts `point`, `pts`, `pt`.
static POINTS_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([^(]+?)\s*\((\d+)\s*(?:points?|pts?)\)\s*$").expect("valid regex")
});

/// Trailing `(N points)` suffix anywhere after other text.
static POINTS_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\((\d+)\s*(?:points?|pts?)\)\s*$").expect("valid regex")
});

/// Upper-case words with spaces, slashes, apostrophes and dashes.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z\s/'’–-]+$").expect("valid regex"));

/// Title line: the text before a trailing points suffix, plus the points.
/// Falls back to the whole line when stripping would leave nothing.
pub fn split_title(line: &str) -> (String, Option<u32>) {
    let line = line.trim();
    match POINTS_SUFFIX_RE.captures(line) {
        Some(caps) => {
            let points = caps[1].parse().ok();
            let start = caps.get(0).map_or(line.len(), |m| m.start());
            let title = line[..start].trim();
            if title.is_empty() {
                (line.to_string(), points)
            } else {
                (title.to_string(), points)
            }
        }
        None => (line.to_string(), None),
    }
}

/// Whether the line is a list section header such as `BATTLELINE`.
pub fn is_section_header(line: &str) -> bool {
    SECTION_RE.is_match(line.trim())
}

/// Name and points of a `Name (N points)` line.
pub fn parse_points_line(line: &str) -> Option<(String, u32)> {
    let caps = POINTS_LINE_RE.captures(line.trim())?;
    let name = caps[1].trim();
    if name.is_empty() {
        return None;
    }
    let points = caps[2].parse().ok()?;
    Some((name.to_string(), points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_title_with_points() {
        assert_eq!(
            split_title("My List (500 points)"),
            ("My List".to_string(), Some(500))
        );
        assert_eq!(
            split_title("Hammer (of Macragge) (1995 Points)"),
            ("Hammer (of Macragge)".to_string(), Some(1995))
        );
    }

    #[test]
    fn test_split_title_without_points() {
        assert_eq!(split_title("Just a name"), ("Just a name".to_string(), None));
        assert_eq!(
            split_title("(500 points)"),
            ("(500 points)".to_string(), Some(500))
        );
    }

    #[test]
    fn test_section_headers() {
        assert!(is_section_header("BATTLELINE"));
        assert!(is_section_header("DEDICATED TRANSPORTS"));
        assert!(is_section_header("ALLIED UNITS / OTHER"));
        assert!(is_section_header("EMPEROR'S CHOSEN"));
        assert!(!is_section_header("Intercessor Squad (80 points)"));
        assert!(!is_section_header("Space Marines"));
        assert!(!is_section_header("A"));
        assert!(!is_section_header(""));
    }

    #[test]
    fn test_parse_points_line() {
        assert_eq!(
            parse_points_line("Intercessor Squad (100 points)"),
            Some(("Intercessor Squad".to_string(), 100))
        );
        assert_eq!(
            parse_points_line("  Rhino (75 Points)  "),
            Some(("Rhino".to_string(), 75))
        );
        assert_eq!(
            parse_points_line("Librarian (65 point)"),
            Some(("Librarian".to_string(), 65))
        );
        assert_eq!(
            parse_points_line("Redemptor Dreadnought (210 pts)"),
            Some(("Redemptor Dreadnought".to_string(), 210))
        );
    }

    #[test]
    fn test_parse_points_line_rejects_noise() {
        assert_eq!(parse_points_line("• 1x Bolt rifle"), None);
        assert_eq!(parse_points_line("Enhancement: Artificer Armour"), None);
        assert_eq!(parse_points_line("(100 points)"), None);
        assert_eq!(parse_points_line("Rhino (75 points) extra"), None);
    }
}
