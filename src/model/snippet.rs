use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::folder::FolderId;

pub type SnippetId = String;

/// A snippet in the library. `folder_id = None` means it lives at the root
/// level, outside any folder.
///
/// A snippet is "dirty" (has unsaved edits in the host editor) by membership
/// in `Library::dirty_ids`, not by a flag here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Pinned snippets also appear in the synthetic pinned section.
    #[serde(default)]
    pub pinned: bool,
    /// Drafts sort before finished snippets within a folder.
    #[serde(default)]
    pub draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Snippet {
    pub fn new(id: impl Into<SnippetId>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Snippet {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            folder_id: None,
            pinned: false,
            draft: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_folder(mut self, folder: impl Into<FolderId>) -> Self {
        self.folder_id = Some(folder.into());
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn draft(mut self) -> Self {
        self.draft = true;
        self
    }
}
