use serde::{Deserialize, Serialize};

/// Name of the default capture folder. Sorts before its siblings.
pub const INBOX_NAME: &str = "Inbox";

pub type FolderId = String;

/// A folder in the library tree. Folders nest arbitrarily deep; a folder
/// with `parent_id = None` sits at the root level.
///
/// Collapse state is owned by the engine, not the entity (see
/// `engine::Engine::collapsed`), so a folder read from disk never carries
/// stale UI state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

impl Folder {
    pub fn new(id: impl Into<FolderId>, name: impl Into<String>) -> Self {
        Folder {
            id: id.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<FolderId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Whether this folder is the default inbox (exact name match).
    pub fn is_inbox(&self) -> bool {
        self.name == INBOX_NAME
    }
}
