//! Selection reconciliation after a recompile, and the active-path walk.

use crate::flatten::{RowKind, VirtualId};
use crate::model::{FolderId, Library};

use super::{Engine, row_index};

/// Re-validate the selection against a freshly compiled sequence. Virtual
/// ids that no longer exist (their folder collapsed, the entity deleted or
/// unpinned) are dropped; if the focused row itself vanished, selection
/// moves to the nearest still-visible ancestor folder instead of pointing
/// at nothing. Never errors.
pub(super) fn recover(engine: &mut Engine, library: &Library) {
    engine
        .selected
        .retain(|vid| row_index(&engine.rows, vid).is_some());

    let focus = engine.cursor.clone().or(engine.last_selected.clone());
    let Some(focus) = focus else {
        return;
    };
    if row_index(&engine.rows, &focus).is_some() {
        // Focused row survived; just heal a stale cursor or anchor.
        if let Some(last) = &engine.last_selected
            && row_index(&engine.rows, last).is_none()
        {
            engine.last_selected = Some(focus.clone());
        }
        if let Some(cursor) = &engine.cursor
            && row_index(&engine.rows, cursor).is_none()
        {
            engine.cursor = Some(focus);
        }
        return;
    }

    for ancestor in parent_chain(library, &focus) {
        let vid = VirtualId::folder(&ancestor);
        if row_index(&engine.rows, &vid).is_some() {
            engine.select_only(vid);
            engine.set_folder_context(Some(ancestor));
            return;
        }
    }

    // No visible ancestor: back to the root context.
    engine.last_selected = None;
    engine.cursor = None;
}

/// Folder ids enclosing the entity behind `vid`, nearest first. For a
/// snippet that starts with its own folder; for a folder with its parent.
fn parent_chain(library: &Library, vid: &VirtualId) -> Vec<FolderId> {
    let id = vid.entity_str();
    if let Some(snippet) = library.snippet(id) {
        let mut chain = Vec::new();
        if let Some(folder) = snippet.folder_id.as_deref() {
            chain.push(folder.to_string());
            chain.extend(library.ancestors(folder));
        }
        chain
    } else if library.folder(id).is_some() {
        library.ancestors(id)
    } else {
        Vec::new()
    }
}

/// Ancestor folder ids for the single selected row, nearest first: walk
/// backward through the compiled sequence, at each step taking the nearest
/// preceding Folder row exactly one level shallower. Empty unless exactly
/// one row is selected.
pub(super) fn active_path(engine: &Engine) -> Vec<FolderId> {
    if engine.selected.len() != 1 {
        return Vec::new();
    }
    let Some(start) = engine
        .selected
        .first()
        .and_then(|vid| row_index(&engine.rows, vid))
    else {
        return Vec::new();
    };

    let mut path = Vec::new();
    let mut depth = engine.rows[start].depth;
    for index in (0..start).rev() {
        let Some(parent_depth) = depth.parent() else {
            break;
        };
        let row = &engine.rows[index];
        if row.depth == parent_depth
            && let RowKind::Folder { id, .. } = &row.kind
        {
            path.push(id.clone());
            depth = parent_depth;
        }
    }
    path
}
