//! Title normalization into canonical identifier codes
//!
//! Listing titles arrive in a handful of compacted forms; the rules below
//! rewrite them into the dashed canonical shape used as the record code.
//! Rules are applied in order, first match wins, and a title matching no
//! rule is returned unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

static FC2_PPV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(FC2)PPV(\d+)$").expect("FC2 rule regex is valid")
});

static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{3})([A-Za-z]+)(\d+)$").expect("numeric prefix rule regex is valid")
});

static SHORT_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)(\d+)$").expect("short code rule regex is valid")
});

/// Normalizes a raw listing title into its canonical code
///
/// Rules, first match wins:
/// 1. `FC2PPV12345` (case-insensitive) becomes `FC2-PPV-12345`
/// 2. `123ABC456` becomes `123ABC-456`
/// 3. Titles of at most 8 characters like `AB12` become `AB-12`
/// 4. Anything else is returned unchanged
pub fn normalize_title(title: &str) -> String {
    if let Some(caps) = FC2_PPV.captures(title) {
        return format!("{}-PPV-{}", caps[1].to_uppercase(), &caps[2]);
    }

    if let Some(caps) = NUMERIC_PREFIX.captures(title) {
        return format!("{}{}-{}", &caps[1], &caps[2], &caps[3]);
    }

    if title.len() <= 8 {
        if let Some(caps) = SHORT_CODE.captures(title) {
            return format!("{}-{}", &caps[1], &caps[2]);
        }
    }

    title.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fc2_ppv_rule() {
        assert_eq!(normalize_title("FC2PPV12345"), "FC2-PPV-12345");
    }

    #[test]
    fn test_fc2_ppv_rule_is_case_insensitive() {
        assert_eq!(normalize_title("fc2ppv777"), "FC2-PPV-777");
        assert_eq!(normalize_title("Fc2PPV42"), "FC2-PPV-42");
    }

    #[test]
    fn test_numeric_prefix_rule() {
        assert_eq!(normalize_title("123ABC456"), "123ABC-456");
    }

    #[test]
    fn test_short_code_rule() {
        assert_eq!(normalize_title("AB12"), "AB-12");
        assert_eq!(normalize_title("ABCD1234"), "ABCD-1234");
    }

    #[test]
    fn test_short_code_rule_respects_length_limit() {
        // Nine characters: letters-then-digits shape, but too long for rule 3
        assert_eq!(normalize_title("ABCDE1234"), "ABCDE1234");
    }

    #[test]
    fn test_unmatched_title_is_unchanged() {
        assert_eq!(normalize_title("RandomTitle"), "RandomTitle");
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("ABC-123"), "ABC-123");
    }

    #[test]
    fn test_numeric_prefix_wins_over_short_code() {
        // Seven characters, but the leading digits send it to rule 2
        assert_eq!(normalize_title("123AB45"), "123AB-45");
    }
}
