//! Raw events as delivered by the native source

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::EventKind;
use std::path::PathBuf;
use std::time::Instant;

/// Operation carried by a raw event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawOp {
    /// File appeared (created or renamed into the directory)
    Create,
    /// File content changed
    Write,
    /// Anything else (metadata, removal, access, ...)
    Other,
}

impl RawOp {
    /// Classify a notify event kind
    pub fn from_kind(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => RawOp::Create,
            EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Both)) => RawOp::Create,
            EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => RawOp::Write,
            EventKind::Access(AccessKind::Close(AccessMode::Write)) => RawOp::Write,
            _ => RawOp::Other,
        }
    }

    /// Whether the debounce engine reacts to this operation
    pub fn is_relevant(self) -> bool {
        matches!(self, RawOp::Create | RawOp::Write)
    }
}

/// A single filesystem notification
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub path: PathBuf,
    pub op: RawOp,
    pub timestamp: Instant,
}

impl RawEvent {
    pub fn new(path: impl Into<PathBuf>, op: RawOp) -> Self {
        Self {
            path: path.into(),
            op,
            timestamp: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};

    #[test]
    fn test_classify_event_kinds() {
        assert_eq!(RawOp::from_kind(&EventKind::Create(CreateKind::File)), RawOp::Create);
        assert_eq!(
            RawOp::from_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            RawOp::Create
        );
        assert_eq!(
            RawOp::from_kind(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            RawOp::Write
        );
        assert_eq!(
            RawOp::from_kind(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions))),
            RawOp::Other
        );
        assert_eq!(
            RawOp::from_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::From))),
            RawOp::Other
        );
        assert_eq!(RawOp::from_kind(&EventKind::Remove(RemoveKind::File)), RawOp::Other);
    }

    #[test]
    fn test_relevance() {
        assert!(RawOp::Create.is_relevant());
        assert!(RawOp::Write.is_relevant());
        assert!(!RawOp::Other.is_relevant());
    }
}
