use crate::models::enums::Severity;
use crate::models::ConditionRecord;

use super::KnowledgeBase;

/// Built-in condition set used when the knowledge file is missing or corrupt.
pub fn default_conditions() -> Vec<ConditionRecord> {
    vec![
        ConditionRecord::new(
            "flu",
            "Influenza",
            &["demam", "batuk", "pilek", "lemas", "sakit kepala"],
            Severity::Mild,
            "Istirahat cukup, minum air putih yang banyak, konsumsi vitamin C",
        ),
        ConditionRecord::new(
            "masuk_angin",
            "Masuk Angin",
            &["perut kembung", "mual", "lemas", "tidak nafsu makan"],
            Severity::Mild,
            "Minum air hangat, kompres perut dengan air hangat, hindari makanan dingin",
        ),
        ConditionRecord::new(
            "gastritis",
            "Gastritis",
            &["perut sakit", "mual", "kembung", "perih ulu hati"],
            Severity::Moderate,
            "Hindari makanan pedas dan asam, makan teratur, konsultasi dokter",
        ),
        ConditionRecord::new(
            "demam_berdarah",
            "Demam Berdarah Dengue",
            &[
                "demam tinggi",
                "sakit kepala hebat",
                "nyeri otot",
                "mual",
                "ruam kulit",
            ],
            Severity::Severe,
            "⚠️ SEGERA ke dokter atau rumah sakit untuk pemeriksaan lebih lanjut!",
        ),
    ]
}

pub fn default_knowledge_base() -> KnowledgeBase {
    KnowledgeBase::from_trusted(default_conditions())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let kb = KnowledgeBase::new(default_conditions()).unwrap();
        assert_eq!(kb, default_knowledge_base());
    }

    #[test]
    fn defaults_are_fixed_and_ordered() {
        let kb = default_knowledge_base();
        let ids: Vec<&str> = kb.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["flu", "masuk_angin", "gastritis", "demam_berdarah"]);
    }

    #[test]
    fn every_default_has_complete_fields() {
        for condition in default_knowledge_base().iter() {
            assert!(!condition.name.is_empty());
            assert!(!condition.symptoms.is_empty());
            assert!(!condition.advice.is_empty());
        }
    }

    #[test]
    fn severities_cover_all_tiers() {
        let kb = default_knowledge_base();
        assert_eq!(kb.get("flu").unwrap().severity, Severity::Mild);
        assert_eq!(kb.get("gastritis").unwrap().severity, Severity::Moderate);
        assert_eq!(kb.get("demam_berdarah").unwrap().severity, Severity::Severe);
    }
}
