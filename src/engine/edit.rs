use crate::flatten::EntryKind;
use crate::model::FolderId;

/// The single optional in-flight edit. Creation injects a synthetic row into
/// the compiled sequence; rename flags the entity's existing row as editable.
/// At most one editable row exists at a time: starting either kind of edit
/// replaces whatever was in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Create {
        kind: EntryKind,
        parent: Option<FolderId>,
    },
    Rename {
        kind: EntryKind,
        id: String,
    },
}

impl EditState {
    /// The (kind, parent) pair the flattener injects a creation row for.
    pub fn creation_target(&self) -> Option<(EntryKind, Option<&str>)> {
        match self {
            EditState::Create { kind, parent } => Some((*kind, parent.as_deref())),
            EditState::Rename { .. } => None,
        }
    }

    /// The entity id whose row renders as an inline rename input.
    pub fn renaming_id(&self) -> Option<&str> {
        match self {
            EditState::Rename { id, .. } => Some(id),
            EditState::Create { .. } => None,
        }
    }
}
