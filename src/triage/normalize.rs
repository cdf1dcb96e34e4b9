use super::types::SymptomQuery;

/// Symptoms are separated by commas ("demam, batuk, pilek").
pub const SEGMENT_DELIMITER: char = ',';

/// Segments of this many characters or fewer are noise (stray letters, punctuation).
pub const MAX_NOISE_CHARS: usize = 1;

/// Result of normalizing raw user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Tokens(SymptomQuery),
    /// Every segment was empty or noise.
    NoValidSymptoms,
}

/// Split raw text into lower-cased, trimmed symptom tokens.
///
/// Order is preserved and duplicates are kept; a repeated symptom counts
/// once per occurrence during scoring.
pub fn normalize(raw_text: &str) -> Normalized {
    let tokens: Vec<String> = raw_text
        .split(SEGMENT_DELIMITER)
        .filter_map(normalize_segment)
        .collect();

    match SymptomQuery::new(tokens) {
        Some(query) => Normalized::Tokens(query),
        None => Normalized::NoValidSymptoms,
    }
}

/// Clean one segment, or `None` if it is too short to be a symptom.
pub fn normalize_segment(segment: &str) -> Option<String> {
    let cleaned = segment.to_lowercase().trim().to_string();
    if cleaned.chars().count() <= MAX_NOISE_CHARS {
        None
    } else {
        Some(cleaned)
    }
}
