//! Parsing of the search service's text payload into hadith records
//!
//! The backend answers with free text: an optional preamble, then record
//! blocks separated by `---`. Inside a block each field is introduced by a
//! label at the start of a line, matched case-insensitively:
//!
//! - `Arabic Matn:`
//! - `English Matn:`
//! - `Reference:`
//! - `Warning:`
//!
//! A field runs from its label to the next known label or the end of the
//! block. Text before the first label is ignored. If a label repeats, the
//! first occurrence wins. Parsing never fails; missing labels give empty
//! fields.

use crate::reference::CollectionMap;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const RECORD_DELIMITER: &str = "---";

/// Reference value marking a record the service synthesized itself
pub const AI_GENERATED_REFERENCE: &str = "AI Generated";

/// Leading glyph of a "nothing found" narrative
pub const NO_RESULT_MARKER: char = '❌';

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HadithRecord {
    pub arabic_text: String,
    pub english_text: String,
    pub reference: String,
    pub warning: String,
    pub collection_key: String,
}

impl HadithRecord {
    /// `Reference:` runs to the next label, so a note may follow the
    /// sentinel on later lines; only the first line is compared.
    pub fn is_ai_generated(&self) -> bool {
        self.reference.lines().next().map(str::trim) == Some(AI_GENERATED_REFERENCE)
    }

    fn has_text(&self) -> bool {
        !self.arabic_text.is_empty() || !self.english_text.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub leading_narrative: String,
    pub records: Vec<HadithRecord>,
}

impl SearchResponse {
    /// Response carrying only a narrative, e.g. an error placeholder
    pub fn narrative(text: impl Into<String>) -> Self {
        Self {
            leading_narrative: text.into(),
            records: Vec::new(),
        }
    }

    pub fn is_no_result(&self) -> bool {
        self.leading_narrative.starts_with(NO_RESULT_MARKER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Arabic,
    English,
    Reference,
    Warning,
}

impl Label {
    fn from_match(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "arabic matn" => Some(Label::Arabic),
            "english matn" => Some(Label::English),
            "reference" => Some(Label::Reference),
            "warning" => Some(Label::Warning),
            _ => None,
        }
    }
}

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[ \t]*(arabic matn|english matn|reference|warning)[ \t]*:(.*)$")
            .expect("label pattern is valid")
    })
}

fn emphasis_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[*_]").expect("emphasis pattern is valid"))
}

fn line_break_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\r\n]+").expect("line break pattern is valid"))
}

/// Raw field text of one record block, before normalization
#[derive(Debug, Default)]
struct BlockFields {
    arabic: Option<String>,
    english: Option<String>,
    reference: Option<String>,
    warning: Option<String>,
}

impl BlockFields {
    fn slot(&mut self, label: Label) -> &mut Option<String> {
        match label {
            Label::Arabic => &mut self.arabic,
            Label::English => &mut self.english,
            Label::Reference => &mut self.reference,
            Label::Warning => &mut self.warning,
        }
    }
}

/// Split a block into labeled sections
fn scan_block(block: &str) -> BlockFields {
    let mut fields = BlockFields::default();
    // Label currently being captured; None before the first label and
    // while skipping a repeated label.
    let mut current: Option<Label> = None;

    for line in block.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(caps) = label_regex().captures(line) {
            let label = caps.get(1).and_then(|m| Label::from_match(m.as_str()));
            let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            current = match label {
                Some(label) if fields.slot(label).is_none() => {
                    *fields.slot(label) = Some(rest.to_string());
                    Some(label)
                }
                _ => None,
            };
            continue;
        }

        if let Some(label) = current {
            if let Some(text) = fields.slot(label) {
                text.push('\n');
                text.push_str(line);
            }
        }
    }

    fields
}

/// Collapse line breaks to single spaces, strip `*`/`_` emphasis, trim
fn normalize_english(text: &str) -> String {
    let joined = line_break_regex().replace_all(text, " ");
    emphasis_regex().replace_all(&joined, "").trim().to_string()
}

fn parse_block(block: &str, collections: &CollectionMap) -> Option<HadithRecord> {
    let fields = scan_block(block);
    let trimmed = |f: Option<String>| f.map(|s| s.trim().to_string()).unwrap_or_default();

    let reference = trimmed(fields.reference);
    let record = HadithRecord {
        arabic_text: trimmed(fields.arabic),
        english_text: fields.english.map(|s| normalize_english(&s)).unwrap_or_default(),
        collection_key: collections.key_for_reference(&reference),
        reference,
        warning: trimmed(fields.warning),
    };

    record.has_text().then_some(record)
}

/// Parse a search payload using the embedded collection map
pub fn parse(raw: &str) -> SearchResponse {
    parse_with(raw, CollectionMap::embedded())
}

/// Parse a search payload, resolving collection keys against `collections`
pub fn parse_with(raw: &str, collections: &CollectionMap) -> SearchResponse {
    let mut segments = raw.split(RECORD_DELIMITER);
    let leading_narrative = segments.next().unwrap_or("").trim().to_string();
    let records = segments
        .filter_map(|block| parse_block(block, collections))
        .collect();

    SearchResponse {
        leading_narrative,
        records,
    }
}
