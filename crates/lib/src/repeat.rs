//! Repetition tracker — has the user said this before?

/// Whether `input` exactly matches any prior utterance after normalization
/// (trim + lowercase). Not fuzzy, not substring.
///
/// Must be called before the input is appended to the history, so the input
/// is never compared against itself.
pub fn is_repeat(input: &str, history: &[String]) -> bool {
    let normalized = normalize(input);
    history.iter().any(|prev| normalize(prev) == normalized)
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_exact_repeat() {
        assert!(is_repeat("hello", &history(&["hello"])));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert!(is_repeat("  HELLO  ", &history(&["hello"])));
        assert!(is_repeat("what courses do you have", &history(&["What Courses Do You Have "])));
    }

    #[test]
    fn test_different_utterance_is_not_a_repeat() {
        assert!(!is_repeat("hello there", &history(&["hello"])));
    }

    #[test]
    fn test_substring_is_not_a_repeat() {
        assert!(!is_repeat("hello", &history(&["hello there"])));
        assert!(!is_repeat("hello there", &history(&["hello", "there"])));
    }

    #[test]
    fn test_empty_history_never_repeats() {
        assert!(!is_repeat("hello", &[]));
    }
}
