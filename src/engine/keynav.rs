use crate::flatten::RowKind;
use crate::model::Library;

use super::{Command, Engine};

/// Navigation keys the engine understands. The host maps its own event type
/// onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
}

impl Engine {
    /// Handle a navigation key. Returns the new cursor index when the cursor
    /// moved, so the host can scroll it into view and move focus to the row.
    pub fn key(&mut self, key: NavKey, shift: bool, library: &Library) -> Option<usize> {
        match key {
            NavKey::Up => self.move_cursor(-1, shift),
            NavKey::Down => self.move_cursor(1, shift),
            NavKey::Right => self.expand_or_enter(library),
            NavKey::Left => self.collapse_or_parent(library),
            NavKey::Enter => {
                self.activate_cursor(library);
                None
            }
        }
    }

    /// Move the cursor by one focusable row. At the top edge, Up hands
    /// keyboard focus to the search input instead of wrapping.
    fn move_cursor(&mut self, delta: i32, shift: bool) -> Option<usize> {
        if self.rows.is_empty() {
            return None;
        }
        let current = match self.cursor_index() {
            Some(index) => index,
            None => {
                // Nothing focused yet: Down lands on the first focusable
                // row, Up escapes to the search input.
                if delta < 0 {
                    self.push(Command::FocusSearch);
                    return None;
                }
                let first = self.next_focusable(0, 1)?;
                self.land_on(first, shift);
                return Some(first);
            }
        };

        let stepped = current.checked_add_signed(delta as isize);
        let target = stepped.and_then(|index| self.next_focusable(index, delta));
        match target {
            Some(index) => {
                self.land_on(index, shift);
                Some(index)
            }
            None => {
                if delta < 0 {
                    self.push(Command::FocusSearch);
                }
                None
            }
        }
    }

    /// Nearest focusable row at or beyond `from`, scanning in `direction`.
    fn next_focusable(&self, from: usize, direction: i32) -> Option<usize> {
        if from >= self.rows.len() {
            return None;
        }
        let mut index = from;
        loop {
            if self.rows[index].focusable() {
                return Some(index);
            }
            if direction < 0 {
                index = index.checked_sub(1)?;
            } else {
                index += 1;
                if index >= self.rows.len() {
                    return None;
                }
            }
        }
    }

    /// Put the cursor on `index`: exclusive selection, or a range extension
    /// from the anchor when shift is held.
    fn land_on(&mut self, index: usize, shift: bool) {
        if shift {
            self.shift_select(index, false);
            return;
        }
        let row = &self.rows[index];
        if row.selectable() {
            let vid = row.virtual_id.clone();
            if let RowKind::Folder { id, .. } = &row.kind {
                let id = id.clone();
                self.select_only(vid);
                self.set_folder_context(Some(id));
            } else {
                self.select_only(vid);
                self.set_folder_context(None);
            }
        } else {
            // Pinned header: focus without selection.
            self.selected.clear();
            self.cursor = Some(row.virtual_id.clone());
            self.last_selected = Some(row.virtual_id.clone());
        }
    }

    /// ArrowRight: expand a collapsed branch, or step into an expanded one.
    fn expand_or_enter(&mut self, library: &Library) -> Option<usize> {
        let index = self.cursor_index()?;
        match &self.rows[index].kind {
            RowKind::Folder { id, collapsed, .. } => {
                if *collapsed {
                    let id = id.clone();
                    self.toggle_folder(&id, library);
                    None
                } else {
                    let next = self.next_focusable(index + 1, 1)?;
                    self.land_on(next, false);
                    Some(next)
                }
            }
            RowKind::PinnedHeader { collapsed } => {
                if *collapsed {
                    self.toggle_pinned_section(library);
                    None
                } else {
                    let next = self.next_focusable(index + 1, 1)?;
                    self.land_on(next, false);
                    Some(next)
                }
            }
            _ => None,
        }
    }

    /// ArrowLeft: collapse an expanded branch, or walk up to the nearest
    /// preceding row one level shallower (the ancestor).
    fn collapse_or_parent(&mut self, library: &Library) -> Option<usize> {
        let index = self.cursor_index()?;
        let row = &self.rows[index];
        match &row.kind {
            RowKind::Folder { id, collapsed, .. } if !collapsed => {
                let id = id.clone();
                self.toggle_folder(&id, library);
                return None;
            }
            RowKind::PinnedHeader { collapsed } if !collapsed => {
                self.toggle_pinned_section(library);
                return None;
            }
            _ => {}
        }

        let parent_depth = row.depth.parent()?;
        let parent = (0..index)
            .rev()
            .find(|&i| self.rows[i].depth == parent_depth)?;
        self.land_on(parent, false);
        Some(parent)
    }

    /// Enter: toggle folders, open snippets. Unlike a pointer click this
    /// leaves keyboard focus where it is, so browsing stays fluid.
    fn activate_cursor(&mut self, library: &Library) {
        let Some(index) = self.cursor_index() else {
            return;
        };
        match &self.rows[index].kind {
            RowKind::Folder { id, .. } => {
                let id = id.clone();
                self.toggle_folder(&id, library);
            }
            RowKind::PinnedHeader { .. } => self.toggle_pinned_section(library),
            RowKind::Snippet { id, .. } | RowKind::PinnedSnippet { id, .. } => {
                let id = id.clone();
                let vid = self.rows[index].virtual_id.clone();
                self.select_only(vid);
                self.set_folder_context(None);
                self.push(Command::SelectSnippet(Some(id)));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ClickMods;
    use crate::model::{Folder, Snippet};
    use pretty_assertions::assert_eq;

    fn library() -> Library {
        Library {
            folders: vec![
                Folder::new("f1", "One"),
                Folder::new("f2", "Two").with_parent("f1"),
            ],
            snippets: vec![
                Snippet::new("a", "alpha").in_folder("f1"),
                Snippet::new("b", "beta").in_folder("f2"),
                Snippet::new("p", "pinned").in_folder("f1").pinned(),
            ],
            ..Default::default()
        }
    }

    fn engine(library: &Library) -> Engine {
        let mut engine = Engine::new();
        engine.refresh(library);
        engine
    }

    fn index_of(engine: &Engine, vid: &str) -> usize {
        engine
            .rows()
            .iter()
            .position(|r| r.virtual_id.as_str() == vid)
            .unwrap()
    }

    // Sequence: pinned-header, pinned-p, f1, f2, b, p, a, footer

    #[test]
    fn down_walks_the_sequence_and_skips_the_footer() {
        let library = library();
        let mut engine = engine(&library);
        engine.click(index_of(&engine, "a"), ClickMods::NONE, &library);

        // "a" is the last focusable row; Down stays put.
        assert_eq!(engine.key(NavKey::Down, false, &library), None);
        assert_eq!(engine.cursor_index(), Some(index_of(&engine, "a")));
    }

    #[test]
    fn up_at_the_top_escapes_to_search() {
        let library = library();
        let mut engine = engine(&library);
        let first = engine.key(NavKey::Down, false, &library);
        assert_eq!(first, Some(0));
        assert_eq!(engine.key(NavKey::Up, false, &library), None);
        assert!(engine.drain_commands().contains(&Command::FocusSearch));
    }

    #[test]
    fn right_expands_then_steps_into_folder() {
        let library = library();
        let mut engine = engine(&library);
        engine.toggle_folder("f2", &library);
        engine.drain_commands();

        // Put the cursor on f2 without toggling it (shift-click selects).
        let f2 = index_of(&engine, "f2");
        engine.click(f2, ClickMods::SHIFT, &library);
        engine.key(NavKey::Right, false, &library); // expand
        assert!(!engine.is_collapsed("f2"));

        let moved = engine.key(NavKey::Right, false, &library); // step to first child
        assert_eq!(moved, Some(index_of(&engine, "b")));
    }

    #[test]
    fn left_collapses_then_walks_to_parent() {
        let library = library();
        let mut engine = engine(&library);
        engine.click(index_of(&engine, "b"), ClickMods::NONE, &library);

        let parent = engine.key(NavKey::Left, false, &library);
        assert_eq!(parent, Some(index_of(&engine, "f2")));

        // f2 is expanded: Left collapses it, cursor stays.
        assert_eq!(engine.key(NavKey::Left, false, &library), None);
        assert!(engine.is_collapsed("f2"));

        // Collapsed now: Left walks to f1.
        let parent = engine.key(NavKey::Left, false, &library);
        assert_eq!(parent, Some(index_of(&engine, "f1")));
    }

    #[test]
    fn left_from_pinned_row_reaches_the_header() {
        let library = library();
        let mut engine = engine(&library);
        engine.click(index_of(&engine, "pinned-p"), ClickMods::NONE, &library);
        let target = engine.key(NavKey::Left, false, &library);
        assert_eq!(target, Some(index_of(&engine, "pinned-header")));
    }

    #[test]
    fn shift_arrow_extends_like_shift_click() {
        let library = library();
        let mut engine = engine(&library);
        engine.click(index_of(&engine, "b"), ClickMods::NONE, &library);
        engine.key(NavKey::Down, true, &library);
        engine.key(NavKey::Down, true, &library);

        let mut ids: Vec<String> = engine.selected_ids().map(|v| v.to_string()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string(), "p".to_string()]);
        // Anchor never moved.
        assert_eq!(engine.last_selected().unwrap().as_str(), "b");
    }

    #[test]
    fn enter_selects_snippet_without_moving_cursor() {
        let library = library();
        let mut engine = engine(&library);
        engine.click(index_of(&engine, "a"), ClickMods::NONE, &library);
        engine.drain_commands();
        let before = engine.cursor_index();

        engine.key(NavKey::Enter, false, &library);
        assert_eq!(engine.cursor_index(), before);
        assert!(
            engine
                .drain_commands()
                .contains(&Command::SelectSnippet(Some("a".into())))
        );
    }

    #[test]
    fn enter_toggles_folder() {
        let library = library();
        let mut engine = engine(&library);
        let f1 = index_of(&engine, "f1");
        engine.shift_select(f1, false);
        engine.key(NavKey::Enter, false, &library);
        assert!(engine.is_collapsed("f1"));
    }
}
