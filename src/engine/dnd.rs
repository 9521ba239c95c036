//! Drag-and-drop reparenting. The payload is a plain serializable value so
//! hosts can park it on whatever drag context they have (an OS drag object,
//! an application-level register) without this engine knowing about it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::flatten::EntryKind;
use crate::model::{FolderId, Library, SnippetId};

use super::{Command, Engine, row_index};

/// What is being dragged, already partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    #[serde(default)]
    pub snippets: Vec<SnippetId>,
    #[serde(default)]
    pub folders: Vec<FolderId>,
}

impl DragPayload {
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty() && self.folders.is_empty()
    }

    fn push(&mut self, kind: EntryKind, id: &str) {
        match kind {
            EntryKind::Snippet => self.snippets.push(id.to_string()),
            EntryKind::Folder => self.folders.push(id.to_string()),
        }
    }
}

impl Engine {
    /// Payload for a drag starting on the row at `index`: the whole
    /// multi-selection when that row is part of it, otherwise just the row.
    /// Selecting a pinned occurrence and its in-folder twin drags one
    /// entity, not two.
    pub fn drag_payload(&self, index: usize) -> Option<DragPayload> {
        let row = self.rows.get(index)?;
        let (kind, id) = row.real_id()?;

        let mut payload = DragPayload::default();
        if self.selected.contains(&row.virtual_id) && self.selected.len() > 1 {
            let mut seen = HashSet::new();
            for vid in &self.selected {
                if let Some((kind, id)) = row_index(&self.rows, vid)
                    .and_then(|i| self.rows[i].real_id())
                    && seen.insert(id.to_string())
                {
                    payload.push(kind, id);
                }
            }
        } else {
            payload.push(kind, id);
        }
        Some(payload)
    }

    /// Drop a payload onto a folder row (`Some`) or the root background
    /// (`None`). Emits at most one batched snippet move and one batched
    /// folder move. Entries already at the target are dropped, a folder
    /// dropped into itself or its own descendant is skipped, and ids that
    /// resolve to nothing (a malformed payload) are ignored; a drop that
    /// filters down to nothing issues no command at all.
    pub fn drop_payload(&mut self, payload: &DragPayload, target: Option<&str>, library: &Library) {
        if let Some(target) = target
            && library.folder(target).is_none()
        {
            return;
        }

        let snippets: Vec<SnippetId> = payload
            .snippets
            .iter()
            .filter(|id| {
                library
                    .snippet(id)
                    .is_some_and(|s| s.folder_id.as_deref() != target)
            })
            .cloned()
            .collect();

        let folders: Vec<FolderId> = payload
            .folders
            .iter()
            .filter(|id| {
                let Some(folder) = library.folder(id) else {
                    return false;
                };
                if folder.parent_id.as_deref() == target {
                    return false;
                }
                // Reparenting under your own subtree would orphan it.
                match target {
                    Some(target) => !library.is_self_or_descendant(target, id),
                    None => true,
                }
            })
            .cloned()
            .collect();

        if !snippets.is_empty() {
            self.push(Command::MoveSnippets {
                ids: snippets,
                target: target.map(str::to_string),
            });
        }
        if !folders.is_empty() {
            self.push(Command::MoveFolders {
                ids: folders,
                target: target.map(str::to_string),
            });
        }
    }
}
