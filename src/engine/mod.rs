//! Selection engine: owns every piece of UI state the tree has (the
//! selected virtual-id set, the cursor, the folder context, collapse flags,
//! the creation/rename micro-state and the search query) and recompiles the
//! row sequence whenever any of it (or the library underneath) changes.
//!
//! Mutating the outside world happens only through the command outbox: the
//! host drains `Command`s, applies them to its authoritative data, and calls
//! `refresh` with the result.

pub mod command;
pub mod dnd;
pub mod edit;
mod focus;
mod keynav;
mod selection;

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use crate::flatten::{self, CompileInput, EntryKind, Row, RowKind, VirtualId};
use crate::model::{FolderId, Library, SnippetId};

pub use command::Command;
pub use dnd::DragPayload;
pub use edit::EditState;
pub use keynav::NavKey;
pub use selection::ClickMods;

#[derive(Debug, Default)]
pub struct Engine {
    pub(crate) selected: IndexSet<VirtualId>,
    /// Range anchor: the row the last explicit selection landed on.
    pub(crate) last_selected: Option<VirtualId>,
    /// Keyboard focus. Usually equal to `last_selected`, but shift+arrow
    /// moves the cursor while the anchor stays put.
    pub(crate) cursor: Option<VirtualId>,
    pub(crate) selected_folder: Option<FolderId>,
    pub(crate) collapsed: HashSet<FolderId>,
    pub(crate) pinned_collapsed: bool,
    pub(crate) edit: Option<EditState>,
    pub(crate) search_query: String,
    pub(crate) rows: Vec<Row>,
    pub(crate) counts: HashMap<FolderId, usize>,
    pub(crate) commands: Vec<Command>,
}

impl Engine {
    pub fn new() -> Self {
        Engine::default()
    }

    /// Recompile the row sequence from the current library and engine state,
    /// then reconcile the selection against the new sequence. Called after
    /// every engine-side state change and after every authoritative data
    /// refresh from the host.
    pub fn refresh(&mut self, library: &Library) {
        let input = CompileInput {
            library,
            collapsed: &self.collapsed,
            pinned_collapsed: self.pinned_collapsed,
            search_query: &self.search_query,
            create: self.edit.as_ref().and_then(|e| e.creation_target()),
            editing_id: self.edit.as_ref().and_then(|e| e.renaming_id()),
        };
        self.rows = flatten::compile(&input);
        self.counts = flatten::descendant_counts(library);

        // Search mode has no collapse semantics; a selection that fell out
        // of the result list is simply dropped there.
        if self.search_query.is_empty() {
            focus::recover(self, library);
        } else {
            self.selected.retain(|vid| row_index(&self.rows, vid).is_some());
            if let Some(last) = &self.last_selected
                && row_index(&self.rows, last).is_none()
            {
                self.last_selected = None;
            }
            if let Some(cursor) = &self.cursor
                && row_index(&self.rows, cursor).is_none()
            {
                self.cursor = None;
            }
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Recursive snippet count for a folder's badge.
    pub fn folder_count(&self, id: &str) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn is_selected(&self, vid: &VirtualId) -> bool {
        self.selected.contains(vid)
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = &VirtualId> {
        self.selected.iter()
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    pub fn last_selected(&self) -> Option<&VirtualId> {
        self.last_selected.as_ref()
    }

    pub fn selected_folder(&self) -> Option<&str> {
        self.selected_folder.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn edit_state(&self) -> Option<&EditState> {
        self.edit.as_ref()
    }

    pub fn is_collapsed(&self, folder: &str) -> bool {
        self.collapsed.contains(folder)
    }

    /// Index of the keyboard cursor in the compiled sequence.
    pub fn cursor_index(&self) -> Option<usize> {
        let vid = self.cursor.as_ref().or(self.last_selected.as_ref())?;
        row_index(&self.rows, vid)
    }

    /// Take everything queued for the collaborators.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub(crate) fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Change the search query and recompile. An in-flight edit is cancelled:
    /// the creation row has no home in search results.
    pub fn set_search(&mut self, query: impl Into<String>, library: &Library) {
        let query = query.into();
        if !query.is_empty() {
            self.edit = None;
        }
        self.search_query = query;
        self.refresh(library);
    }

    /// Flip a folder's collapse state, notify the host, recompile. Focus
    /// recovery re-targets any selection that was inside.
    pub fn toggle_folder(&mut self, id: &str, library: &Library) {
        let collapsed = if self.collapsed.remove(id) {
            false
        } else {
            self.collapsed.insert(id.to_string());
            true
        };
        self.push(Command::ToggleFolder {
            id: id.to_string(),
            collapsed,
        });
        self.refresh(library);
    }

    pub fn toggle_pinned_section(&mut self, library: &Library) {
        self.pinned_collapsed = !self.pinned_collapsed;
        self.refresh(library);
    }

    /// Ancestor folder ids of the single selected row, nearest first, for
    /// breadcrumb highlighting. Empty unless exactly one row is selected.
    pub fn active_path(&self) -> Vec<FolderId> {
        focus::active_path(self)
    }

    /// Right-click equivalent: emit a context-menu command for the entity
    /// under the pointer. Synthetic rows have no menu.
    pub fn context_menu(&mut self, index: usize) {
        if let Some((kind, id)) = self.rows.get(index).and_then(Row::real_id) {
            let id = id.to_string();
            self.push(Command::ContextMenu { kind, id });
        }
    }

    // -- creation / rename micro-state -----------------------------------

    /// Begin creating a folder or snippet. `parent = None` targets the root
    /// level; callers usually pass the current folder context. Replaces any
    /// in-flight edit and expands the parent so the input row is visible.
    pub fn begin_create(&mut self, kind: EntryKind, parent: Option<FolderId>, library: &Library) {
        if let Some(parent) = parent.as_deref() {
            self.collapsed.remove(parent);
        }
        self.edit = Some(EditState::Create { kind, parent });
        self.refresh(library);
    }

    /// Begin renaming the entity behind the row at `index`.
    pub fn begin_rename(&mut self, index: usize, library: &Library) {
        if let Some((kind, id)) = self.rows.get(index).and_then(Row::real_id) {
            let id = id.to_string();
            self.edit = Some(EditState::Rename { kind, id });
            self.refresh(library);
        }
    }

    /// Commit the in-flight edit with the text the host collected. Empty
    /// input cancels silently, no error surface.
    pub fn commit_edit(&mut self, text: &str, library: &Library) {
        let Some(edit) = self.edit.take() else {
            return;
        };
        let text = text.trim();
        if text.is_empty() {
            self.refresh(library);
            return;
        }
        match edit {
            EditState::Create {
                kind: EntryKind::Snippet,
                parent,
            } => self.push(Command::NewSnippet {
                title: text.to_string(),
                parent,
            }),
            EditState::Create {
                kind: EntryKind::Folder,
                parent,
            } => self.push(Command::NewFolder {
                name: text.to_string(),
                parent,
            }),
            EditState::Rename { kind, id } => self.push(Command::Rename {
                kind,
                id,
                name: text.to_string(),
            }),
        }
        self.refresh(library);
    }

    /// Cancel the in-flight edit (Escape, blur) without committing.
    pub fn cancel_edit(&mut self, library: &Library) {
        if self.edit.take().is_some() {
            self.refresh(library);
        }
    }

    // -- internal helpers -------------------------------------------------

    /// Exclusive selection of one row; the caller decides which commands to
    /// emit for it.
    pub(crate) fn select_only(&mut self, vid: VirtualId) {
        self.selected.clear();
        self.selected.insert(vid.clone());
        self.cursor = Some(vid.clone());
        self.last_selected = Some(vid);
    }

    pub(crate) fn snippet_id_at(&self, index: usize) -> Option<SnippetId> {
        match self.rows.get(index).map(|r| &r.kind) {
            Some(RowKind::Snippet { id, .. }) | Some(RowKind::PinnedSnippet { id, .. }) => {
                Some(id.clone())
            }
            _ => None,
        }
    }
}

/// Position of a virtual id in a compiled sequence.
pub(crate) fn row_index(rows: &[Row], vid: &VirtualId) -> Option<usize> {
    rows.iter().position(|r| &r.virtual_id == vid)
}
