//! Export path templates such as `/locales/{lang}/common.json`.
//!
//! A template is split on `/` into segments; a segment holding a `{name}`
//! placeholder is dynamic and gets substituted per language.

use thiserror::Error;

use crate::types::Language;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template token: {0}")]
    UnknownToken(String),

    #[error("Path template has no segments")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Static,
    Dynamic,
}

/// One `/`-separated template segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw segment text.
    pub value: String,
    /// Matched placeholder including braces (`{lang}`); empty for static segments.
    pub placeholder: String,
    /// Placeholder name without braces.
    pub name: String,
}

/// Returns the first `{...}` placeholder with a non-empty name.
fn find_placeholder(segment: &str) -> Option<&str> {
    let mut offset = 0;
    while let Some(rest) = segment.get(offset..) {
        let start = rest.find('{')?;
        let candidate = rest.get(start..)?;
        let end = candidate.find('}')?;
        if end > 1 {
            return candidate.get(..=end);
        }
        offset += start + 1;
    }
    None
}

/// Splits a template into static and dynamic tokens, dropping empty segments.
#[must_use]
pub fn parse_template(template: &str) -> Vec<Token> {
    template
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match find_placeholder(segment) {
            Some(placeholder) => Token {
                kind: TokenKind::Dynamic,
                value: segment.to_string(),
                placeholder: placeholder.to_string(),
                name: placeholder.trim_start_matches('{').trim_end_matches('}').to_string(),
            },
            None => Token {
                kind: TokenKind::Static,
                value: segment.to_string(),
                placeholder: String::new(),
                name: String::new(),
            },
        })
        .collect()
}

/// Builds the relative export path of `language`.
///
/// # Errors
/// - `UnknownToken` when a placeholder is neither `lang` nor `culture`
/// - `Empty` when there are no tokens
pub fn resolve_path(tokens: &[Token], language: &Language) -> Result<String, TemplateError> {
    if tokens.is_empty() {
        return Err(TemplateError::Empty);
    }

    let segments = tokens
        .iter()
        .map(|token| match token.kind {
            TokenKind::Static => Ok(token.value.clone()),
            TokenKind::Dynamic => {
                let replacement = match token.name.as_str() {
                    "lang" => language.code.as_str(),
                    "culture" => language.culture_or_code(),
                    other => return Err(TemplateError::UnknownToken(other.to_string())),
                };
                Ok(token.value.replacen(&token.placeholder, replacement, 1))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(segments.join("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn parse_template_classifies_segments() {
        let tokens = parse_template("/locales/{lang}/common.json");

        assert_that!(tokens.len(), eq(3));
        assert_that!(tokens[0].kind, eq(TokenKind::Static));
        assert_that!(tokens[0].value, eq("locales"));
        assert_that!(tokens[1].kind, eq(TokenKind::Dynamic));
        assert_that!(tokens[1].placeholder, eq("{lang}"));
        assert_that!(tokens[1].name, eq("lang"));
        assert_that!(tokens[2].kind, eq(TokenKind::Static));
    }

    #[rstest]
    fn parse_template_keeps_surrounding_text_of_dynamic_segment() {
        let tokens = parse_template("i18n/messages.{lang}.json");

        assert_that!(tokens[1].kind, eq(TokenKind::Dynamic));
        assert_that!(tokens[1].value, eq("messages.{lang}.json"));
        assert_that!(tokens[1].placeholder, eq("{lang}"));
    }

    #[rstest]
    #[case::empty("", 0)]
    #[case::slashes_only("///", 0)]
    #[case::double_slash("a//b", 2)]
    fn parse_template_drops_empty_segments(#[case] template: &str, #[case] expected: usize) {
        assert_that!(parse_template(template).len(), eq(expected));
    }

    #[rstest]
    fn empty_braces_are_not_a_placeholder() {
        let tokens = parse_template("{}x{lang}");

        assert_that!(tokens[0].placeholder, eq("{lang}"));
    }

    #[rstest]
    #[case::lang("/locales/{lang}/common.json", "locales/fr/common.json")]
    #[case::culture("/locales/{culture}.json", "locales/fr-CA.json")]
    #[case::file_name("/i18n/{lang}.json", "i18n/fr.json")]
    #[case::static_only("/static/file.json", "static/file.json")]
    fn resolve_path_substitutes_placeholders(#[case] template: &str, #[case] expected: &str) {
        let language = Language::new("fr", "French").with_culture("fr-CA");

        let path = resolve_path(&parse_template(template), &language).unwrap();

        assert_that!(path, eq(expected));
    }

    #[rstest]
    fn resolve_path_culture_falls_back_to_code() {
        let language = Language::new("de", "German");

        let path = resolve_path(&parse_template("/{culture}/app.json"), &language).unwrap();

        assert_that!(path, eq("de/app.json"));
    }

    #[rstest]
    fn resolve_path_rejects_unknown_token() {
        let language = Language::new("en", "English");

        let result = resolve_path(&parse_template("/locales/{page}/{lang}.json"), &language);

        assert_eq!(result, Err(TemplateError::UnknownToken("page".to_string())));
    }

    #[rstest]
    fn resolve_path_rejects_empty_template() {
        let language = Language::new("en", "English");

        assert_eq!(resolve_path(&[], &language), Err(TemplateError::Empty));
    }
}
