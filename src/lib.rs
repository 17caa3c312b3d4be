//! Takhrij - Hadith search and commentary client
//!
//! Parses the search service's text replies into hadith records and keeps the
//! state of one search/commentary session for a front-end to render.

pub mod error;
pub mod config;
pub mod reference;
pub mod parser;
pub mod client;
pub mod commentary;
pub mod session;

pub use error::{ServiceFailure, TakhrijError};
pub use config::ServiceConfig;
pub use reference::{collection_key, collection_prefix, CollectionMap, Glossary, GlossaryTerm};
pub use parser::{parse, parse_with, HadithRecord, SearchResponse, AI_GENERATED_REFERENCE};
pub use client::{HadithService, HttpHadithService};
pub use commentary::{CommentaryFailure, CommentaryResult};
pub use session::{RequestStatus, SessionController, SessionHandle, SessionState};
