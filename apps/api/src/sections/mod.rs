//! Section controllers: per-section edit state synchronized with the shared
//! resume document and persisted one section at a time.
//!
//! List-of-record sections share one generic controller parameterized by a
//! [`SectionSchema`]. Personal details, the summary and the hobby/language
//! tag lists have their own small controllers built on the same context.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use crate::document::DocumentHandle;
use crate::llm_client::LlmError;
use crate::store::{RecordStore, StoreError};

pub mod controller;
pub mod personal;
pub mod prompts;
pub mod schema;
pub mod summary;
pub mod tags;
pub mod write;

pub use controller::{GenerationTicket, ListSectionController};
pub use personal::PersonalController;
pub use schema::{
    CertificationSchema, EducationSchema, ExperienceSchema, ProjectSchema, SectionSchema,
    SkillSchema,
};
pub use summary::SummaryController;
pub use tags::{TagList, TagListController};

// ────────────────────────────────────────────────────────────────────────────
// Field values
// ────────────────────────────────────────────────────────────────────────────

/// A value written into one field of a section entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn into_text(self, field: &'static str) -> Result<String, SectionError> {
        match self {
            FieldValue::Text(text) => Ok(text),
            FieldValue::Flag(_) => Err(SectionError::FieldType {
                field,
                expected: "text",
            }),
        }
    }

    pub fn into_flag(self, field: &'static str) -> Result<bool, SectionError> {
        match self {
            FieldValue::Flag(flag) => Ok(flag),
            FieldValue::Text(_) => Err(SectionError::FieldType {
                field,
                expected: "a boolean",
            }),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Navigation gate
// ────────────────────────────────────────────────────────────────────────────

/// The "saved since last edit" flag shared by the active section and the
/// wizard. Closed blocks forward navigation.
#[derive(Debug, Clone)]
pub struct NavGate {
    tx: Arc<watch::Sender<bool>>,
}

impl NavGate {
    /// A gate starting closed.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn open(&self) {
        self.tx.send_replace(true);
    }

    pub fn close(&self) {
        self.tx.send_replace(false);
    }

    pub fn is_open(&self) -> bool {
        *self.tx.borrow()
    }

    /// Observes gate changes, e.g. to enable a "Next" button.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for NavGate {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Status, violations, errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    /// Mounted, nothing edited yet.
    Clean,
    /// Edited since the last successful save.
    Dirty,
    Saved,
}

/// A required field left empty. `index` is `None` for scalar sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub index: Option<usize>,
    pub field: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "Entry {}: {} is required", index + 1, self.field),
            None => write!(f, "{} is required", self.field),
        }
    }
}

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("No {section} entry at index {index}")]
    NoSuchEntry { section: &'static str, index: usize },

    #[error("You must have at least one {noun}")]
    LastEntry { noun: &'static str },

    #[error("Unknown section '{0}'")]
    UnknownSection(String),

    #[error("Unknown {section} field '{field}'")]
    UnknownField { section: &'static str, field: String },

    #[error("Field '{field}' expects {expected}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{0}")]
    Validation(Violation),

    #[error("'{0}' is not a #RRGGBB color")]
    InvalidColor(String),

    #[error("'{value}' already exists")]
    DuplicateValue { value: String },

    #[error("Field '{field}' has no AI assist")]
    NotAssisted { field: String },

    #[error("Fill in {field} before generating")]
    MissingContext { field: &'static str },

    #[error("Text generation already running for entry {index}")]
    GenerationInFlight { index: usize },

    #[error("Wait for text generation to finish before saving")]
    SaveBlocked,

    #[error("Wait for text generation to finish before removing entries")]
    Busy,

    #[error("Text generation failed: {0}")]
    Generation(#[source] LlmError),

    #[error("Section is no longer mounted")]
    Unmounted,

    #[error("Section JSON error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ────────────────────────────────────────────────────────────────────────────
// Context
// ────────────────────────────────────────────────────────────────────────────

/// Everything a section controller needs from its edit session.
#[derive(Clone)]
pub struct SectionContext {
    pub document_id: Uuid,
    pub document: DocumentHandle,
    pub store: Arc<dyn RecordStore>,
    pub gate: NavGate,
}
