const MIN_CONFIDENCE: f64 = 0.25;
const MIN_TEXT_LENGTH: usize = 50;

/// ISO 639-3 code of the dominant language, when whatlang is confident enough.
pub fn detect_language(text: &str) -> Option<String> {
    if text.trim().chars().count() < MIN_TEXT_LENGTH {
        return None;
    }

    let info = whatlang::detect(text)?;
    if info.confidence() < MIN_CONFIDENCE {
        return None;
    }

    Some(info.lang().code().to_string())
}
