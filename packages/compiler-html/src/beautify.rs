//! Cosmetic typography for short display strings such as a link's source.

/// Cosmetic text transform applied to display-only strings
pub trait TextBeautifier: Send + Sync {
    fn beautify(&self, text: &str) -> String;
}

/// Curly quotes, ellipses and dashes
#[derive(Debug, Clone, Copy, Default)]
pub struct Typographer;

impl TextBeautifier for Typographer {
    fn beautify(&self, text: &str) -> String {
        let text = text.replace("...", "\u{2026}").replace("--", "\u{2013}");

        let mut result = String::with_capacity(text.len());
        let mut previous: Option<char> = None;
        for ch in text.chars() {
            let opening = previous.map_or(true, |p| p.is_whitespace() || "([{\u{2013}".contains(p));
            match ch {
                '"' if opening => result.push('\u{201c}'),
                '"' => result.push('\u{201d}'),
                '\'' if opening => result.push('\u{2018}'),
                '\'' => result.push('\u{2019}'),
                _ => result.push(ch),
            }
            previous = Some(ch);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_and_apostrophes() {
        assert_eq!(Typographer.beautify(r#"Nico's "blog""#), "Nico\u{2019}s \u{201c}blog\u{201d}");
    }

    #[test]
    fn test_ellipsis_and_dash() {
        assert_eq!(Typographer.beautify("wait... -- what"), "wait\u{2026} \u{2013} what");
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(Typographer.beautify("@ponyfoo"), "@ponyfoo");
    }
}
