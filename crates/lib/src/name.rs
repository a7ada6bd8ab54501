//! Name extractor — spots self-introductions in raw input.

/// Self-introduction patterns, in priority order. Each must be followed by
/// whitespace and then the name itself.
const NAME_PATTERNS: &[&str] = &["my name is", "i'm", "i am", "call me"];

/// Extract a self-identified name from raw input.
///
/// Returns the first word following the first matching pattern, with its
/// original casing, or `None`. Stateless; the controller decides whether the
/// candidate actually becomes the session's name.
pub fn extract(input: &str) -> Option<String> {
    for pattern in NAME_PATTERNS {
        for (at, _) in input.char_indices() {
            let Some(rest) = strip_prefix_ignore_case(&input[at..], pattern) else {
                continue;
            };
            if !rest.starts_with(|c: char| c.is_whitespace()) {
                continue;
            }
            let name: String = rest
                .trim_start()
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }
    None
}

/// Strip `prefix` from the front of `s`, comparing ASCII case-insensitively.
/// Matching on the original string keeps byte offsets honest even when the
/// surrounding text would not case-fold length-preservingly.
fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = s;
    for p in prefix.chars() {
        let c = rest.chars().next()?;
        if !c.eq_ignore_ascii_case(&p) {
            return None;
        }
        rest = &rest[c.len_utf8()..];
    }
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_from_each_pattern() {
        assert_eq!(extract("My name is Thabo"), Some("Thabo".to_string()));
        assert_eq!(extract("i'm Lerato"), Some("Lerato".to_string()));
        assert_eq!(extract("Hello, I am Sipho."), Some("Sipho".to_string()));
        assert_eq!(extract("please call me Anna"), Some("Anna".to_string()));
    }

    #[test]
    fn test_case_insensitive_pattern_preserves_name_casing() {
        assert_eq!(extract("MY NAME IS Thabo"), Some("Thabo".to_string()));
    }

    #[test]
    fn test_first_pattern_wins() {
        assert_eq!(
            extract("my name is Thabo but call me Tee"),
            Some("Thabo".to_string())
        );
    }

    #[test]
    fn test_captures_single_token_only() {
        assert_eq!(
            extract("my name is Thabo Mokoena"),
            Some("Thabo".to_string())
        );
    }

    #[test]
    fn test_no_pattern_no_capture() {
        assert_eq!(extract("what courses do you have"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn test_pattern_must_be_followed_by_a_word() {
        assert_eq!(extract("my name is "), None);
        // "i'm" glued to the next word is not an introduction.
        assert_eq!(extract("i'mpossible"), None);
    }

    #[test]
    fn test_multibyte_text_before_pattern() {
        // 'İ' lowercases to two chars; extraction must not depend on
        // length-preserving case folding of the surrounding text.
        assert_eq!(
            extract("İstanbul here. call me Ayşe"),
            Some("Ayşe".to_string())
        );
        assert_eq!(extract("İİİ my name is Thabo"), Some("Thabo".to_string()));
    }
}
