//! Turn classification.
//!
//! Maps raw message text to exactly one intent via configurable leading
//! tokens. Pure classification; no side effects.

use docent_core::config::RouterConfig;

/// The pipeline a turn should run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Store an attached document.
    Upload,
    /// Answer a question over stored documents; carries the question text.
    Question(String),
    /// Neither token matched; reply with usage guidance.
    Unknown,
}

/// Prefix-based turn router.
pub struct TurnRouter {
    config: RouterConfig,
}

impl TurnRouter {
    /// Create a router with the given token configuration.
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Classify message text into an [`Intent`].
    ///
    /// A token matches only on a word boundary: the text is the token alone,
    /// or the token followed by whitespace. "uploadx" therefore routes to
    /// `Unknown`, while "upload report.pdf" routes to `Upload`.
    pub fn classify(&self, text: &str) -> Intent {
        let input = if self.config.trim_input {
            text.trim()
        } else {
            text
        };

        if let Some(_rest) = self.token_remainder(input, &self.config.upload_token) {
            return Intent::Upload;
        }

        if let Some(rest) = self.token_remainder(input, &self.config.question_token) {
            return Intent::Question(rest.trim_start().to_string());
        }

        Intent::Unknown
    }

    /// Return the text after `token` if `input` starts with the token on a
    /// word boundary, honoring the case-sensitivity setting.
    fn token_remainder<'a>(&self, input: &'a str, token: &str) -> Option<&'a str> {
        let prefix = input.get(..token.len())?;
        let matches = if self.config.case_insensitive {
            prefix.eq_ignore_ascii_case(token)
        } else {
            prefix == token
        };
        if !matches {
            return None;
        }

        let rest = &input[token.len()..];
        match rest.chars().next() {
            None => Some(rest),
            Some(c) if c.is_whitespace() => Some(rest),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> TurnRouter {
        TurnRouter::new(RouterConfig::default())
    }

    // ---- Upload ----

    #[test]
    fn test_upload_bare_token() {
        assert_eq!(router().classify("upload"), Intent::Upload);
    }

    #[test]
    fn test_upload_with_remainder() {
        assert_eq!(router().classify("upload the quarterly report"), Intent::Upload);
    }

    #[test]
    fn test_upload_case_insensitive() {
        assert_eq!(router().classify("UPLOAD this"), Intent::Upload);
        assert_eq!(router().classify("Upload"), Intent::Upload);
    }

    #[test]
    fn test_upload_leading_whitespace_trimmed() {
        assert_eq!(router().classify("   upload"), Intent::Upload);
    }

    #[test]
    fn test_uploadx_is_unknown() {
        assert_eq!(router().classify("uploadx"), Intent::Unknown);
    }

    // ---- Question ----

    #[test]
    fn test_question_extracts_suffix_exactly() {
        assert_eq!(
            router().classify("question what is the deadline"),
            Intent::Question("what is the deadline".to_string())
        );
    }

    #[test]
    fn test_question_bare_token_empty_payload() {
        assert_eq!(router().classify("question"), Intent::Question(String::new()));
    }

    #[test]
    fn test_question_multiple_separator_spaces() {
        assert_eq!(
            router().classify("question   who signed it"),
            Intent::Question("who signed it".to_string())
        );
    }

    #[test]
    fn test_question_case_insensitive() {
        assert_eq!(
            router().classify("Question when is it due"),
            Intent::Question("when is it due".to_string())
        );
    }

    #[test]
    fn test_questionx_is_unknown() {
        assert_eq!(router().classify("questionx"), Intent::Unknown);
    }

    #[test]
    fn test_question_payload_keeps_inner_casing() {
        assert_eq!(
            router().classify("question What did Sarah Sign?"),
            Intent::Question("What did Sarah Sign?".to_string())
        );
    }

    // ---- Unknown ----

    #[test]
    fn test_hello_is_unknown() {
        assert_eq!(router().classify("hello"), Intent::Unknown);
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(router().classify(""), Intent::Unknown);
    }

    #[test]
    fn test_whitespace_only_is_unknown() {
        assert_eq!(router().classify("   "), Intent::Unknown);
    }

    #[test]
    fn test_token_in_middle_is_unknown() {
        assert_eq!(router().classify("please upload this"), Intent::Unknown);
    }

    #[test]
    fn test_unicode_text_is_unknown() {
        assert_eq!(router().classify("t\u{00e9}l\u{00e9}charger"), Intent::Unknown);
    }

    // ---- Configuration variations ----

    #[test]
    fn test_custom_tokens() {
        let router = TurnRouter::new(RouterConfig {
            upload_token: "send".to_string(),
            question_token: "ask".to_string(),
            ..RouterConfig::default()
        });
        assert_eq!(router.classify("send report"), Intent::Upload);
        assert_eq!(
            router.classify("ask who wrote this"),
            Intent::Question("who wrote this".to_string())
        );
        assert_eq!(router.classify("upload report"), Intent::Unknown);
    }

    #[test]
    fn test_case_sensitive_config() {
        let router = TurnRouter::new(RouterConfig {
            case_insensitive: false,
            ..RouterConfig::default()
        });
        assert_eq!(router.classify("upload report"), Intent::Upload);
        assert_eq!(router.classify("Upload report"), Intent::Unknown);
    }

    #[test]
    fn test_no_trim_config() {
        let router = TurnRouter::new(RouterConfig {
            trim_input: false,
            ..RouterConfig::default()
        });
        assert_eq!(router.classify("  upload"), Intent::Unknown);
        assert_eq!(router.classify("upload"), Intent::Upload);
    }

    #[test]
    fn test_multibyte_input_shorter_than_token_boundary() {
        // Prefix slicing must not panic on non-boundary byte offsets.
        assert_eq!(router().classify("\u{00fc}ber"), Intent::Unknown);
    }
}
