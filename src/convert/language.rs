//! Language-code detection from translation file paths.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// RFC 5646 language codes, stored both verbatim and normalized.
static LANGUAGE_CODES: LazyLock<HashSet<String>> = LazyLock::new(|| {
    [
        "af", "af-ZA", "ar", "ar-AE", "ar-EG", "ar-MA", "ar-SA", "az", "az-AZ", "be", "be-BY",
        "bg", "bg-BG", "bs-BA", "ca", "ca-ES", "cs", "cs-CZ", "cy", "cy-GB", "da", "da-DK", "de",
        "de-AT", "de-CH", "de-DE", "el", "el-GR", "en", "en-AU", "en-CA", "en-GB", "en-IE",
        "en-NZ", "en-US", "en-ZA", "eo", "es", "es-AR", "es-CL", "es-CO", "es-ES", "es-MX",
        "es-PE", "es-VE", "et", "et-EE", "eu", "eu-ES", "fa", "fa-IR", "fi", "fi-FI", "fo", "fr",
        "fr-BE", "fr-CA", "fr-CH", "fr-FR", "gl", "gl-ES", "gu", "gu-IN", "he", "he-IL", "hi",
        "hi-IN", "hr", "hr-HR", "hu", "hu-HU", "hy", "hy-AM", "id", "id-ID", "is", "is-IS", "it",
        "it-CH", "it-IT", "ja", "ja-JP", "ka", "ka-GE", "kk", "kk-KZ", "kn", "kn-IN", "ko",
        "ko-KR", "ky", "ky-KG", "lt", "lt-LT", "lv", "lv-LV", "mi", "mk", "mk-MK", "mn", "mn-MN",
        "mr", "mr-IN", "ms", "ms-MY", "mt", "mt-MT", "nb", "nb-NO", "nl", "nl-BE", "nl-NL",
        "nn-NO", "pa", "pa-IN", "pl", "pl-PL", "ps", "pt", "pt-BR", "pt-PT", "qu", "ro", "ro-RO",
        "ru", "ru-RU", "sa", "se", "sk", "sk-SK", "sl", "sl-SI", "sq", "sq-AL", "sr-BA", "sr-SP",
        "sv", "sv-FI", "sv-SE", "sw", "sw-KE", "ta", "ta-IN", "te", "te-IN", "th", "th-TH", "tl",
        "tl-PH", "tr", "tr-TR", "tt", "uk", "uk-UA", "ur", "ur-PK", "uz", "uz-UZ", "vi", "vi-VN",
        "xh", "zh", "zh-CN", "zh-HK", "zh-SG", "zh-TW", "zu",
    ]
    .iter()
    .flat_map(|code| [(*code).to_string(), normalize_language_code(code)])
    .collect()
});

/// Lowercases and replaces `-` with `_`.
fn normalize_language_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

/// True for a known code, compared case-insensitively.
fn is_language_code(part: &str) -> bool {
    LANGUAGE_CODES.contains(part) || LANGUAGE_CODES.contains(&normalize_language_code(part))
}

/// Finds a known language code in a file path.
///
/// The path is split on `/` and `.` and searched from the end, so the file
/// name wins over directory names.
///
/// - `locales/en.json` → `en`
/// - `messages/ja-JP.json` → `ja-JP`
/// - `translations/en_US/common.json` → `en_US`
#[must_use]
pub fn detect_language_from_path(path: &Path) -> Option<String> {
    let path_str = path.to_string_lossy();
    path_str
        .split(&['/', '\\', '.'])
        .rev()
        .find(|part| is_language_code(part))
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/path/to/locales/en/common.json", Some("en"))]
    #[case("/path/to/locales/sub/fr.json", Some("fr"))]
    #[case("/path/to/messages/ja-JP.json", Some("ja-JP"))]
    #[case("/path/to/locales/en_us/trans.json", Some("en_us"))]
    #[case("/path/to/locales/en/ja.json", Some("ja"))]
    #[case("/path/to/locales/hoge/trans.json", None)]
    #[case("/path/to/locales/en-trans.json", None)]
    fn detect_language(#[case] path: &str, #[case] expected: Option<&str>) {
        let result = detect_language_from_path(Path::new(path));
        assert_eq!(result.as_deref(), expected);
    }
}
