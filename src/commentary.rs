//! Commentary for a single hadith record

use crate::client::{CommentaryReply, CommentaryRequest};
use crate::error::ServiceFailure;
use crate::parser::HadithRecord;
use crate::reference::collection_prefix;
use serde::{Deserialize, Serialize};

/// Shown in every narrative field when the commentary call failed
pub const COMMENTARY_ERROR: &str = "Error fetching commentary.";

const NO_COMMENTARY: &str = "No commentary.";
const NO_CHAIN: &str = "No chain.";
const NO_EVALUATION: &str = "No evaluation.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryResult {
    pub commentary: String,
    pub chain_of_narrators: String,
    pub evaluation: String,
    pub arabic_text: String,
    pub english_text: String,
    pub reference: String,
}

impl CommentaryResult {
    /// Successful reply for `record`; empty fields get a "No ..." placeholder
    pub fn from_reply(reply: CommentaryReply, record: &HadithRecord) -> Self {
        let or_placeholder = |text: String, placeholder: &str| {
            if text.is_empty() {
                placeholder.to_string()
            } else {
                text
            }
        };

        Self {
            commentary: or_placeholder(reply.commentary, NO_COMMENTARY),
            chain_of_narrators: or_placeholder(reply.chain, NO_CHAIN),
            evaluation: or_placeholder(reply.evaluation, NO_EVALUATION),
            arabic_text: record.arabic_text.clone(),
            english_text: record.english_text.clone(),
            reference: record.reference.clone(),
        }
    }

    /// What a failed request for `record` renders as
    pub fn error_placeholder(record: &HadithRecord) -> Self {
        Self {
            commentary: COMMENTARY_ERROR.to_string(),
            chain_of_narrators: COMMENTARY_ERROR.to_string(),
            evaluation: COMMENTARY_ERROR.to_string(),
            arabic_text: record.arabic_text.clone(),
            english_text: record.english_text.clone(),
            reference: record.reference.clone(),
        }
    }

    /// Plain-text form used for copy and share
    pub fn export_text(&self) -> String {
        format!(
            "Hadith Reference: {}\n\nArabic Matn:\n{}\n\nEnglish Matn:\n{}\n\nCommentary:\n{}\n\nChain of Narrators:\n{}\n\nEvaluation:\n{}",
            self.reference,
            self.arabic_text,
            self.english_text,
            self.commentary,
            self.chain_of_narrators,
            self.evaluation,
        )
    }
}

/// A commentary call that did not produce a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentaryFailure {
    pub reason: ServiceFailure,
    pub record: HadithRecord,
}

impl CommentaryFailure {
    pub fn render(&self) -> CommentaryResult {
        CommentaryResult::error_placeholder(&self.record)
    }
}

/// Build the outbound request for `record`.
///
/// English falls back to the Arabic text, and the collection falls back to
/// the first two words of the reference.
pub fn commentary_request(record: &HadithRecord) -> CommentaryRequest {
    let english = match record.english_text.trim() {
        "" => record.arabic_text.trim(),
        english => english,
    };
    let collection = if record.collection_key.is_empty() {
        collection_prefix(&record.reference)
    } else {
        record.collection_key.clone()
    };

    CommentaryRequest {
        arabic: record.arabic_text.clone(),
        english: english.to_string(),
        reference: record.reference.clone(),
        collection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> HadithRecord {
        HadithRecord {
            arabic_text: "إنما الأعمال بالنيات".to_string(),
            english_text: "Actions are judged by intentions.".to_string(),
            reference: "Sahih Bukhari 1".to_string(),
            warning: String::new(),
            collection_key: "bukhari".to_string(),
        }
    }

    #[test]
    fn test_request_uses_record_fields() {
        let request = commentary_request(&record());
        assert_eq!(request.english, "Actions are judged by intentions.");
        assert_eq!(request.collection, "bukhari");
        assert_eq!(request.reference, "Sahih Bukhari 1");
        assert_eq!(request.arabic, "إنما الأعمال بالنيات");
    }

    #[test]
    fn test_request_english_falls_back_to_arabic() {
        let record = HadithRecord {
            english_text: String::new(),
            arabic_text: "  الدين النصيحة \n".to_string(),
            ..record()
        };
        assert_eq!(commentary_request(&record).english, "الدين النصيحة");
    }

    #[test]
    fn test_request_collection_falls_back_to_reference_prefix() {
        let record = HadithRecord {
            reference: "Riyad as-Salihin 27".to_string(),
            collection_key: String::new(),
            ..record()
        };
        assert_eq!(commentary_request(&record).collection, "Riyad as-Salihin");
    }

    #[test]
    fn test_reply_placeholders() {
        let reply = CommentaryReply {
            commentary: "On sincerity.".to_string(),
            chain: String::new(),
            evaluation: String::new(),
        };
        let result = CommentaryResult::from_reply(reply, &record());
        assert_eq!(result.commentary, "On sincerity.");
        assert_eq!(result.chain_of_narrators, "No chain.");
        assert_eq!(result.evaluation, "No evaluation.");
        assert_eq!(result.reference, "Sahih Bukhari 1");
        assert_eq!(result.english_text, "Actions are judged by intentions.");
    }

    #[test]
    fn test_failure_render() {
        let failure = CommentaryFailure {
            reason: ServiceFailure::Timeout,
            record: record(),
        };
        let rendered = failure.render();
        assert_eq!(rendered.commentary, COMMENTARY_ERROR);
        assert_eq!(rendered.chain_of_narrators, COMMENTARY_ERROR);
        assert_eq!(rendered.evaluation, COMMENTARY_ERROR);
        assert_eq!(rendered.arabic_text, "إنما الأعمال بالنيات");
    }

    #[test]
    fn test_export_text() {
        let result = CommentaryResult {
            commentary: "C".to_string(),
            chain_of_narrators: "Umar → Alqamah".to_string(),
            evaluation: "Sahih".to_string(),
            arabic_text: "ع".to_string(),
            english_text: "E".to_string(),
            reference: "Sahih Bukhari 1".to_string(),
        };
        assert_eq!(
            result.export_text(),
            "Hadith Reference: Sahih Bukhari 1\n\nArabic Matn:\nع\n\nEnglish Matn:\nE\n\nCommentary:\nC\n\nChain of Narrators:\nUmar → Alqamah\n\nEvaluation:\nSahih"
        );
    }
}
