//! Utility helpers: path resolution and string manipulation.

use std::path::PathBuf;

/// Get the Yaseen data directory (e.g. `~/.yaseen/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".yaseen")
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
/// Unicode-safe.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate_string("hello world, this is a long string", 15);
        assert_eq!(result, "hello world,...");
        assert!(result.len() <= 15);
    }

    #[test]
    fn test_truncate_unicode() {
        let result = truncate_string("بسم الله الرحمن", 6);
        assert_eq!(result, "بسم...");
    }

    #[test]
    fn test_data_path_ends_with_yaseen() {
        let path = get_data_path();
        assert!(path.ends_with(".yaseen"));
    }

    #[test]
    fn test_data_path_under_home() {
        let expected = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
        assert_eq!(get_data_path().parent(), Some(expected.as_path()));
    }
}
