use crate::flatten::EntryKind;
use crate::model::{FolderId, SnippetId};

/// Commands the engine issues to its external collaborators. Fire-and-forget:
/// the engine updates its own state optimistically and expects a rejected
/// command to be reconciled by the next authoritative `refresh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A snippet became the active selection (None = nothing selected).
    SelectSnippet(Option<SnippetId>),
    /// A folder became the "current directory" context for create actions.
    SelectFolder(Option<FolderId>),
    ToggleFolder {
        id: FolderId,
        collapsed: bool,
    },
    /// One batched move for all snippets in a drop payload.
    MoveSnippets {
        ids: Vec<SnippetId>,
        target: Option<FolderId>,
    },
    /// One batched move for all folders in a drop payload.
    MoveFolders {
        ids: Vec<FolderId>,
        target: Option<FolderId>,
    },
    NewSnippet {
        title: String,
        parent: Option<FolderId>,
    },
    NewFolder {
        name: String,
        parent: Option<FolderId>,
    },
    Rename {
        kind: EntryKind,
        id: String,
        name: String,
    },
    ContextMenu {
        kind: EntryKind,
        id: String,
    },
    /// Keyboard focus should leave the tree for the search input
    /// (ArrowUp on the first row).
    FocusSearch,
}
