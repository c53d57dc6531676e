use regex::Regex;

/// True when `value` is exactly `digits` ASCII digits.
pub fn is_numeric_id(value: &str, digits: usize) -> bool {
    Regex::new(&format!(r"^[0-9]{{{}}}$", digits))
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// True when the trimmed value has at least `min` characters.
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id() {
        assert!(is_numeric_id("3171234567890001", 16));
        assert!(!is_numeric_id("317123456789000", 16));
        assert!(!is_numeric_id("31712345678900a1", 16));
        assert!(is_numeric_id("1234567890", 10));
        assert!(!is_numeric_id(" 1234567890", 10));
    }

    #[test]
    fn test_min_chars() {
        assert!(has_min_chars("Ani", 3));
        assert!(!has_min_chars("  Al ", 3));
    }
}
