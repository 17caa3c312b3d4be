//! Static reference data: collection key map and the hadith-science glossary
//!
//! Both tables ship as JSON under `data/` and are embedded at compile time.
//! They are parsed once on first use and never mutated.

use crate::error::TakhrijError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

const COLLECTIONS_JSON: &str = include_str!("../data/collections.json");
const GLOSSARY_JSON: &str = include_str!("../data/glossary.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub name: String,
    pub key: String,
}

/// Canonical collection display name -> short key
#[derive(Debug, Clone, Default)]
pub struct CollectionMap {
    entries: Vec<CollectionEntry>,
    by_name: HashMap<String, usize>,
}

impl CollectionMap {
    pub fn from_entries(entries: Vec<CollectionEntry>) -> Self {
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        Self { entries, by_name }
    }

    pub fn from_json(json: &str) -> Result<Self, TakhrijError> {
        let entries: Vec<CollectionEntry> = serde_json::from_str(json)
            .map_err(|e| TakhrijError::ReferenceData(format!("collections: {}", e)))?;
        Ok(Self::from_entries(entries))
    }

    /// The nine canonical collections. Falls back to an empty map if the
    /// embedded table cannot be read; keys are annotation only.
    pub fn embedded() -> &'static CollectionMap {
        static MAP: OnceLock<CollectionMap> = OnceLock::new();
        MAP.get_or_init(|| match Self::from_json(COLLECTIONS_JSON) {
            Ok(map) => map,
            Err(e) => {
                tracing::error!("{}", e);
                CollectionMap::default()
            }
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(|&i| self.entries[i].key.as_str())
    }

    pub fn entries(&self) -> &[CollectionEntry] {
        &self.entries
    }

    /// Key for the first two words of a free-text citation, empty when
    /// they name no known collection
    pub fn key_for_reference(&self, reference: &str) -> String {
        self.get(&collection_prefix(reference))
            .unwrap_or_default()
            .to_string()
    }
}

/// First two whitespace-separated words of `reference`, joined by one space.
///
/// Used both for the key lookup and as the collection name sent to the
/// commentary service when no key resolved.
pub fn collection_prefix(reference: &str) -> String {
    reference
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Key for `reference` against the embedded collection map
pub fn collection_key(reference: &str) -> String {
    CollectionMap::embedded().key_for_reference(reference)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
    pub reference: String,
    pub example: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FurtherReading {
    pub arabic: Vec<String>,
    pub english: Vec<String>,
}

/// Terms of ʿUlūm al-Hadīth with suggested further reading
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Glossary {
    pub terms: Vec<GlossaryTerm>,
    #[serde(default)]
    pub further_reading: FurtherReading,
}

impl Glossary {
    pub fn from_json(json: &str) -> Result<Self, TakhrijError> {
        serde_json::from_str(json)
            .map_err(|e| TakhrijError::ReferenceData(format!("glossary: {}", e)))
    }

    pub fn embedded() -> Result<&'static Glossary, TakhrijError> {
        static GLOSSARY: OnceLock<Glossary> = OnceLock::new();
        if let Some(glossary) = GLOSSARY.get() {
            return Ok(glossary);
        }
        let parsed = Self::from_json(GLOSSARY_JSON)?;
        Ok(GLOSSARY.get_or_init(|| parsed))
    }

    /// Case-insensitive lookup by term name
    pub fn find(&self, term: &str) -> Option<&GlossaryTerm> {
        let needle = term.trim().to_lowercase();
        self.terms.iter().find(|t| t.term.to_lowercase() == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_collections() {
        let map = CollectionMap::embedded();
        assert_eq!(map.entries().len(), 9);
        assert_eq!(map.get("Sahih Bukhari"), Some("bukhari"));
        assert_eq!(map.get("Jami` at-Tirmidhi"), Some("tirmidhi"));
        assert_eq!(map.get("Sunan an-Nasa'i"), Some("nasai"));
        assert_eq!(map.get("Sahih"), None);
    }

    #[test]
    fn test_key_for_reference() {
        assert_eq!(collection_key("Sahih Bukhari 1"), "bukhari");
        assert_eq!(collection_key("  Sahih   Muslim 1907 "), "muslim");
        assert_eq!(collection_key("Sunan an-Nasa'i 5034"), "nasai");
        assert_eq!(collection_key("Sunan Ibn Majah 224"), "");
        assert_eq!(collection_key("Sunan Abu Dawood 4607"), "");
        assert_eq!(collection_key("AI Generated"), "");
        assert_eq!(collection_key(""), "");
    }

    #[test]
    fn test_collection_prefix() {
        assert_eq!(collection_prefix("Riyad as-Salihin 27"), "Riyad as-Salihin");
        assert_eq!(collection_prefix("Bulugh"), "Bulugh");
        assert_eq!(collection_prefix(""), "");
    }

    #[test]
    fn test_embedded_glossary() {
        let glossary = Glossary::embedded().unwrap();
        assert_eq!(glossary.terms.len(), 13);
        assert_eq!(glossary.further_reading.arabic.len(), 3);
        assert_eq!(glossary.further_reading.english.len(), 3);

        let isnad = glossary.find("isnad").unwrap();
        assert_eq!(isnad.definition, "The chain of narrators who transmitted the Hadith.");
        assert!(glossary.find("Tafsir").is_none());
    }

    #[test]
    fn test_malformed_collections_rejected() {
        assert!(CollectionMap::from_json("{\"name\": 1}").is_err());
    }
}
