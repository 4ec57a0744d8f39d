/// Maps an ISO language code to the full language name the DataForSEO
/// task format expects. Unknown codes fall back to English.
#[must_use]
pub fn language_name(code: &str) -> &'static str {
    match code.to_lowercase().as_str() {
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        _ => "English",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_codes() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("de"), "German");
        assert_eq!(language_name("zh"), "Chinese");
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(language_name("ES"), "Spanish");
    }

    #[test]
    fn unknown_codes_fall_back_to_english() {
        assert_eq!(language_name("xx"), "English");
    }
}
