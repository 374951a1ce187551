//! Small field checks shared by aggregates and wizard steps

/// `HH:MM`, 24-hour clock
pub fn is_valid_time(value: &str) -> bool {
    chrono::NaiveTime::parse_from_str(value.trim(), "%H:%M").is_ok()
}

/// Three ASCII letters, e.g. `USD`
pub fn is_valid_currency(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_time() {
        assert!(is_valid_time("14:00"));
        assert!(is_valid_time(" 09:30 "));
        assert!(!is_valid_time("25:00"));
        assert!(!is_valid_time("2pm"));
        assert!(!is_valid_time(""));
    }

    #[test]
    fn test_is_valid_currency() {
        assert!(is_valid_currency("USD"));
        assert!(is_valid_currency("sar"));
        assert!(!is_valid_currency("US"));
        assert!(!is_valid_currency("US1"));
    }
}
