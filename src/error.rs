//! Crate-wide error taxonomy.
//!
//! Every failure mode here ultimately belongs to one flat taxonomy shared by
//! the PK3 codec, the save container, and the legacy Gen-1/2 parser, so a
//! single enum is kept instead of one per module — callers match on one type
//! regardless of which layer raised it.
use thiserror::Error;

/// Every failure the codec can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid size: expected {expected}, found {found}")]
    InvalidSize { expected: usize, found: usize },

    #[error("bad signature in section {section_id}: expected {expected:#010X}, found {found:#010X}")]
    BadSignature {
        section_id: u16,
        expected: u32,
        found: u32,
    },

    #[error("missing sections: {0:?}")]
    MissingSections(Vec<u16>),

    #[error("duplicate sections: {0:?}")]
    DuplicateSections(Vec<u16>),

    #[error("checksum mismatch in section {section_id}: expected {expected:#06X}, found {found:#06X}")]
    BadChecksum {
        section_id: u16,
        expected: u16,
        found: u16,
    },

    #[error("save is corrupt: slot A invalid sections {slot_a:?}, slot B invalid sections {slot_b:?}")]
    CorruptSave {
        slot_a: Vec<String>,
        slot_b: Vec<String>,
    },

    #[error("{what} out of range: index {index} exceeds bound {bound}")]
    OutOfRange {
        what: &'static str,
        index: usize,
        bound: usize,
    },

    #[error("attempted to decode an empty PK3 payload")]
    EmptyPayload,

    #[error("unsupported generation: {0}")]
    UnsupportedGeneration(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
