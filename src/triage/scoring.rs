use crate::knowledge::KnowledgeBase;
use crate::models::ConditionRecord;

use super::types::{ScoredCandidate, SymptomQuery};

/// Loose, case-insensitive containment in either direction:
/// "demam" matches "demam tinggi", and "sakit kepala hebat" matches "sakit kepala".
pub fn symptom_matches(token: &str, symptom: &str) -> bool {
    symptom.contains(token) || token.contains(symptom)
}

/// Score every condition against the query, in knowledge-base order.
/// Conditions with no matching token are left out.
pub fn score(query: &SymptomQuery, kb: &KnowledgeBase) -> Vec<ScoredCandidate> {
    let tokens: Vec<String> = query.tokens().iter().map(|t| t.to_lowercase()).collect();

    kb.iter()
        .filter_map(|condition| score_condition(&tokens, condition))
        .collect()
}

/// Score one condition. Each token is attributed to the first vocabulary
/// entry it matches and counts at most once.
pub fn score_condition(tokens: &[String], condition: &ConditionRecord) -> Option<ScoredCandidate> {
    if tokens.is_empty() || condition.symptoms.is_empty() {
        return None;
    }

    let vocabulary: Vec<String> = condition
        .symptoms
        .iter()
        .map(|s| s.to_lowercase())
        .collect();

    let matched_symptoms: Vec<String> = tokens
        .iter()
        .filter_map(|token| {
            vocabulary
                .iter()
                .position(|symptom| symptom_matches(token, symptom))
                .map(|idx| condition.symptoms[idx].clone())
        })
        .collect();

    let match_count = matched_symptoms.len();
    if match_count == 0 {
        return None;
    }

    let confidence = (match_count as f64 / tokens.len() as f64) * 100.0;
    // Several tokens can land on one vocabulary entry, so the ratio can pass 1.
    let coverage = ((match_count as f64 / condition.symptoms.len() as f64) * 100.0).min(100.0);

    Some(ScoredCandidate {
        condition_id: condition.id.clone(),
        name: condition.name.clone(),
        match_count,
        confidence,
        coverage,
        severity: condition.severity,
        advice: condition.advice.clone(),
        matched_symptoms,
    })
}
