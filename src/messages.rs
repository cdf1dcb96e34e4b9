//! User-facing reply text (Indonesian, Markdown).
//!
//! Pure rendering: every function maps engine output to a `String` and
//! never looks anything up on its own.

use crate::analytics::StatsSnapshot;
use crate::knowledge::KnowledgeBase;
use crate::models::enums::{ConfidenceBand, Severity};
use crate::triage::{RankedResult, TriageOutcome};

/// Number of top symptoms shown in the admin statistics.
pub const ADMIN_TOP_SYMPTOMS: usize = 5;

/// Symptoms listed per condition in `/daftar` before eliding.
const LIST_PREVIEW_SYMPTOMS: usize = 3;

const DISCLAIMER: &str =
    "⚠️ **Disclaimer:** Selalu konsultasi ke dokter untuk diagnosis yang akurat!";

/// Message template builder for bot replies.
pub struct MessageTemplates;

impl MessageTemplates {
    /// Render any triage outcome.
    pub fn outcome(outcome: &TriageOutcome) -> String {
        match outcome {
            TriageOutcome::NoValidInput => Self::no_valid_input(),
            TriageOutcome::EmptyKnowledgeBase { .. } => Self::knowledge_base_unavailable(),
            TriageOutcome::Unrecognized { .. } => Self::unrecognized(),
            TriageOutcome::Ranked { result, .. } => Self::diagnosis(result),
        }
    }

    /// Best match with band, severity emphasis, advice and alternates.
    pub fn diagnosis(result: &RankedResult) -> String {
        let Some(best) = result.best() else {
            return Self::unrecognized();
        };
        let (emoji, label) = band_label(ConfidenceBand::from_confidence(best.confidence));

        let mut message = format!("{emoji} **{label}: {}**\n", best.name);
        message.push_str(&format!("📊 Confidence: {:.0}%\n\n", best.confidence));

        match best.severity {
            Severity::Severe => message.push_str("🚨 **PERHATIAN! Kondisi Serius!**\n"),
            Severity::Moderate => message.push_str("⚠️ **Perlu Perhatian**\n"),
            Severity::Mild => {}
        }

        message.push_str(&format!("💊 **Saran:** {}\n\n", best.advice));

        if !result.alternates().is_empty() {
            let others: Vec<&str> = result.alternates().iter().map(|c| c.name.as_str()).collect();
            message.push_str(&format!("📋 **Kemungkinan lain:** {}\n\n", others.join(", ")));
        }

        message.push_str(DISCLAIMER);
        message
    }

    pub fn no_valid_input() -> String {
        "❌ Tidak ada gejala valid yang terdeteksi. Coba ketik: demam, batuk, pilek".into()
    }

    pub fn unrecognized() -> String {
        "❓ Gejala tidak dikenali dalam database kami.\n\n\
         💡 Coba dengan gejala yang lebih umum seperti: demam, batuk, pilek, mual, sakit kepala\n\n\
         🏥 Sebaiknya konsultasi ke dokter untuk diagnosis yang akurat!"
            .into()
    }

    pub fn knowledge_base_unavailable() -> String {
        "❌ Maaf, database penyakit tidak tersedia saat ini.".into()
    }

    pub fn processing_error() -> String {
        "❌ Maaf, terjadi kesalahan saat memproses permintaan kamu.\n\n\
         Coba lagi dengan format: `gejala1, gejala2, gejala3`\n\
         Contoh: `demam, batuk, pilek`"
            .into()
    }

    pub fn welcome() -> String {
        "🤖 **Selamat datang di Bot Diagnosis Penyakit!**\n\n\
         Saya bisa membantu menganalisis gejala yang kamu rasakan.\n\n\
         **Cara menggunakan:**\n\
         - Ketik gejala yang kamu rasakan\n\
         - Pisahkan dengan koma jika lebih dari 1\n\
         - Contoh: \"demam, batuk, pilek\"\n\n\
         **Perintah tersedia:**\n\
         /start - Pesan selamat datang\n\
         /help - Panduan penggunaan\n\
         /daftar - Lihat daftar penyakit\n\
         /stats - Statistik bot\n\n\
         ⚠️ **Disclaimer:** Bot ini hanya untuk referensi awal. \
         Selalu konsultasi ke dokter untuk diagnosis yang akurat!"
            .into()
    }

    /// Usage guide; recognized-symptom examples come from the loaded conditions.
    pub fn help(kb: &KnowledgeBase) -> String {
        let mut message = String::from(
            "🆘 **PANDUAN LENGKAP PENGGUNAAN BOT**\n\n\
             **🔹 Cara Diagnosa:**\n\
             1. Ketik gejala yang kamu rasakan\n\
             2. Pisahkan dengan koma jika lebih dari 1\n\
             3. Contoh: `demam, batuk, pilek`\n\n\
             **🔹 Perintah Tersedia:**\n\
             - `/start` - Pesan selamat datang\n\
             - `/help` - Panduan ini\n\
             - `/daftar` - Lihat daftar penyakit dalam database\n\
             - `/stats` - Statistik penggunaan bot\n\n",
        );

        if !kb.is_empty() {
            message.push_str("**🔹 Contoh Gejala yang Dikenali:**\n");
            for condition in kb {
                message.push_str(&format!(
                    "- {}: {}\n",
                    condition.name,
                    condition.symptoms.join(", ")
                ));
            }
            message.push('\n');
        }

        message.push_str(
            "**🔹 Tips Penggunaan:**\n\
             - Gunakan bahasa Indonesia yang sederhana\n\
             - Semakin spesifik gejala, semakin akurat hasil\n\
             - Bot ini untuk referensi awal, bukan pengganti dokter\n\n\
             ⚠️ **Penting:** Selalu konsultasi ke tenaga medis profesional \
             untuk diagnosis dan pengobatan yang tepat!",
        );
        message
    }

    /// `/daftar`: numbered list with severity marker and a symptom preview.
    pub fn condition_list(kb: &KnowledgeBase) -> String {
        if kb.is_empty() {
            return "❌ Database penyakit tidak tersedia saat ini.".into();
        }

        let mut message = String::from("📋 **DAFTAR PENYAKIT DALAM DATABASE:**\n\n");
        for (idx, condition) in kb.iter().enumerate() {
            let preview: Vec<&str> = condition
                .symptoms
                .iter()
                .take(LIST_PREVIEW_SYMPTOMS)
                .map(String::as_str)
                .collect();
            let ellipsis = if condition.symptoms.len() > LIST_PREVIEW_SYMPTOMS {
                "..."
            } else {
                ""
            };
            message.push_str(&format!(
                "{}. {} **{}** ({})\n   Gejala: {}{}\n\n",
                idx + 1,
                severity_marker(condition.severity),
                condition.name,
                severity_label(condition.severity),
                preview.join(", "),
                ellipsis,
            ));
        }

        message.push_str(&format!(
            "📊 **Total: {} penyakit dalam database**\n🔄 Database diperbarui secara berkala",
            kb.len()
        ));
        message
    }

    pub fn stats_admin(stats: &StatsSnapshot) -> String {
        let mut message = format!(
            "📊 **STATISTIK BOT (ADMIN)**\n\n\
             👥 **Pengguna:**\n\
             - Total queries: {}\n\
             - Unique users: {}\n\n\
             🔥 **Gejala Terpopuler:**\n",
            stats.total_queries, stats.unique_users,
        );
        for (symptom, count) in stats.top_symptoms.iter().take(ADMIN_TOP_SYMPTOMS) {
            message.push_str(&format!("• {symptom}: {count}x\n"));
        }
        message.push_str("\n🤖 **Status:** Bot berjalan normal");
        message
    }

    pub fn stats_public(stats: &StatsSnapshot, condition_count: usize, user_id: u64) -> String {
        format!(
            "📊 **STATISTIK BOT**\n\n\
             🤖 **Status:** Online dan berjalan normal\n\
             📊 **Total Queries:** {}\n\
             👥 **Active Users:** {}\n\
             💾 **Database:** {} penyakit tersedia\n\n\
             🆔 **User ID kamu:** `{}`",
            stats.total_queries, stats.unique_users, condition_count, user_id,
        )
    }

    pub fn greeting(name: &str) -> String {
        format!(
            "Halo {name}! 👋\n\n\
             Saya siap membantu menganalisis gejala kesehatan kamu.\n\
             Coba ceritakan gejala yang kamu rasakan ya!\n\n\
             Contoh: `demam, batuk, pilek`"
        )
    }

    pub fn thanks() -> String {
        "Sama-sama! 😊\n\n\
         Semoga informasinya membantu. Jangan lupa konsultasi ke dokter ya!\n\
         Stay healthy! 💪"
            .into()
    }

    pub fn unknown_command(command: &str) -> String {
        format!("❓ Perintah `{command}` tidak dikenal. Ketik /help untuk panduan.")
    }
}

/// Emoji and wording for a confidence band.
pub fn band_label(band: ConfidenceBand) -> (&'static str, &'static str) {
    match band {
        ConfidenceBand::High => ("🎯", "Kemungkinan besar"),
        ConfidenceBand::Moderate => ("🤔", "Mungkin"),
        ConfidenceBand::Low => ("❓", "Kemungkinan kecil"),
    }
}

pub fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Mild => "🟢",
        Severity::Moderate => "🟡",
        Severity::Severe => "🔴",
    }
}

pub fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Mild => "Ringan",
        Severity::Moderate => "Sedang",
        Severity::Severe => "Berat",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::default_knowledge_base;
    use crate::triage::evaluate;

    fn render(raw: &str) -> String {
        MessageTemplates::outcome(&evaluate(raw, &default_knowledge_base()))
    }

    #[test]
    fn influenza_reply() {
        let reply = render("demam, batuk, pilek");
        assert!(reply.starts_with("🎯 **Kemungkinan besar: Influenza**"));
        assert!(reply.contains("📊 Confidence: 100%"));
        assert!(reply.contains("💊 **Saran:** Istirahat cukup"));
        assert!(reply.contains("📋 **Kemungkinan lain:** Demam Berdarah Dengue"));
        assert!(!reply.contains("PERHATIAN"));
        assert!(reply.ends_with(DISCLAIMER));
    }

    #[test]
    fn severe_reply_is_emphasized() {
        let reply = render("demam tinggi, ruam kulit");
        assert!(reply.contains("Demam Berdarah Dengue"));
        assert!(reply.contains("🚨 **PERHATIAN! Kondisi Serius!**"));
    }

    #[test]
    fn moderate_reply_needs_attention() {
        let reply = render("perih ulu hati");
        assert!(reply.contains("Gastritis"));
        assert!(reply.contains("⚠️ **Perlu Perhatian**"));
    }

    #[test]
    fn low_band_wording() {
        // One of three tokens explained: 33% confidence
        let reply = render("batuk, xyz, abc");
        assert!(reply.starts_with("❓ **Kemungkinan kecil: Influenza**"));
        assert!(reply.contains("Confidence: 33%"));
        assert!(!reply.contains("Kemungkinan lain"));
    }

    #[test]
    fn moderate_band_wording() {
        let reply = render("batuk, xyz");
        assert!(reply.starts_with("🤔 **Mungkin: Influenza**"));
    }

    #[test]
    fn terminal_states_have_their_own_text() {
        assert_eq!(render(" , ,a"), MessageTemplates::no_valid_input());
        assert_eq!(render("xyz123"), MessageTemplates::unrecognized());
        let empty = MessageTemplates::outcome(&evaluate("demam", &KnowledgeBase::empty()));
        assert_eq!(empty, MessageTemplates::knowledge_base_unavailable());
    }

    #[test]
    fn condition_list_previews_three_symptoms() {
        let list = MessageTemplates::condition_list(&default_knowledge_base());
        assert!(list.contains("1. 🟢 **Influenza** (Ringan)\n   Gejala: demam, batuk, pilek...\n"));
        assert!(list.contains("3. 🟡 **Gastritis** (Sedang)"));
        assert!(list.contains("4. 🔴 **Demam Berdarah Dengue** (Berat)"));
        assert!(list.contains("Total: 4 penyakit"));
    }

    #[test]
    fn condition_list_without_ellipsis_for_short_vocabulary() {
        use crate::models::ConditionRecord;
        let kb = KnowledgeBase::new(vec![ConditionRecord::new(
            "migrain",
            "Migrain",
            &["sakit kepala sebelah", "mual"],
            Severity::Moderate,
            "Istirahat",
        )])
        .unwrap();
        let list = MessageTemplates::condition_list(&kb);
        assert!(list.contains("Gejala: sakit kepala sebelah, mual\n"));
    }

    #[test]
    fn empty_condition_list() {
        let list = MessageTemplates::condition_list(&KnowledgeBase::empty());
        assert!(list.contains("tidak tersedia"));
    }

    #[test]
    fn help_lists_loaded_conditions() {
        let help = MessageTemplates::help(&default_knowledge_base());
        assert!(help.contains("- Gastritis: perut sakit, mual, kembung, perih ulu hati"));
        let bare = MessageTemplates::help(&KnowledgeBase::empty());
        assert!(!bare.contains("Contoh Gejala"));
    }

    #[test]
    fn admin_stats_show_top_symptoms() {
        let stats = StatsSnapshot {
            total_queries: 12,
            unique_users: 3,
            top_symptoms: vec![("demam".into(), 7), ("mual".into(), 2)],
        };
        let text = MessageTemplates::stats_admin(&stats);
        assert!(text.contains("Total queries: 12"));
        assert!(text.contains("Unique users: 3"));
        assert!(text.contains("• demam: 7x\n• mual: 2x"));
    }

    #[test]
    fn public_stats_show_user_id() {
        let stats = StatsSnapshot {
            total_queries: 5,
            unique_users: 2,
            top_symptoms: vec![],
        };
        let text = MessageTemplates::stats_public(&stats, 4, 987);
        assert!(text.contains("4 penyakit tersedia"));
        assert!(text.contains("`987`"));
        assert!(!text.contains("Gejala Terpopuler"));
    }

    #[test]
    fn greeting_uses_name() {
        assert!(MessageTemplates::greeting("Budi").starts_with("Halo Budi! 👋"));
    }
}
