use crate::flatten::{Row, RowKind};
use crate::model::Library;

use super::{Command, Engine, row_index};

/// Modifier keys held during a pointer click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickMods {
    pub ctrl: bool,
    pub shift: bool,
}

impl ClickMods {
    pub const NONE: ClickMods = ClickMods {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: ClickMods = ClickMods {
        ctrl: true,
        shift: false,
    };
    pub const SHIFT: ClickMods = ClickMods {
        ctrl: false,
        shift: true,
    };
}

impl Engine {
    /// Pointer click on the row at `index` in the compiled sequence.
    pub fn click(&mut self, index: usize, mods: ClickMods, library: &Library) {
        let Some(row) = self.rows.get(index).cloned() else {
            return;
        };

        if mods.shift {
            self.shift_select(index, mods.ctrl);
            return;
        }
        if mods.ctrl {
            self.toggle_select(&row);
            return;
        }

        match &row.kind {
            RowKind::Snippet { id, .. } | RowKind::PinnedSnippet { id, .. } => {
                let id = id.clone();
                self.select_only(row.virtual_id.clone());
                self.set_folder_context(None);
                self.push(Command::SelectSnippet(Some(id)));
            }
            RowKind::Folder { id, .. } => {
                // A plain click toggles, it does not select. The folder
                // still becomes the "current directory" for create actions
                // and the cursor for a later shift-click range.
                let id = id.clone();
                self.cursor = Some(row.virtual_id.clone());
                self.last_selected = Some(row.virtual_id.clone());
                self.set_folder_context(Some(id.clone()));
                self.toggle_folder(&id, library);
            }
            RowKind::PinnedHeader { .. } => {
                self.cursor = Some(row.virtual_id.clone());
                self.toggle_pinned_section(library);
            }
            RowKind::FooterSpacer => {
                // Empty space below the tree: select nothing, root context.
                self.clear_selection();
            }
            RowKind::CreationInput { .. } => {}
        }
    }

    /// Ctrl/Cmd-click: symmetric-difference toggle against the current set.
    fn toggle_select(&mut self, row: &Row) {
        if !row.selectable() {
            return;
        }
        let vid = row.virtual_id.clone();
        if !self.selected.shift_remove(&vid) {
            self.selected.insert(vid.clone());
        }
        self.cursor = Some(vid.clone());
        self.last_selected = Some(vid);
    }

    /// Shift-click (and shift+arrow): select the inclusive range between the
    /// anchor and `index`. Replaces the selection unless `union` (ctrl also
    /// held), in which case the range is merged into it. Symmetric in its
    /// endpoints.
    pub(crate) fn shift_select(&mut self, index: usize, union: bool) {
        if self.rows.is_empty() {
            return;
        }
        let index = index.min(self.rows.len() - 1);
        let anchor = self
            .last_selected
            .as_ref()
            .and_then(|vid| row_index(&self.rows, vid))
            .unwrap_or(index);

        let (start, end) = if anchor <= index {
            (anchor, index)
        } else {
            (index, anchor)
        };

        if !union {
            self.selected.clear();
        }
        for row in &self.rows[start..=end] {
            if row.selectable() {
                self.selected.insert(row.virtual_id.clone());
            }
        }
        // The anchor stays; the cursor follows the click so the next
        // shift+arrow extends from here.
        self.cursor = Some(self.rows[index].virtual_id.clone());
        if self.last_selected.is_none() {
            self.last_selected = Some(self.rows[index].virtual_id.clone());
        }
    }

    /// Drop the whole selection and folder context ("select nothing / root").
    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.last_selected = None;
        self.cursor = None;
        self.set_folder_context(None);
        self.push(Command::SelectSnippet(None));
    }

    /// Update the folder context, notifying the host only on change.
    pub(crate) fn set_folder_context(&mut self, folder: Option<String>) {
        if self.selected_folder != folder {
            self.selected_folder = folder.clone();
            self.push(Command::SelectFolder(folder));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::VirtualId;
    use crate::model::{Folder, Snippet};
    use pretty_assertions::assert_eq;

    fn library() -> Library {
        Library {
            folders: vec![Folder::new("f1", "One")],
            snippets: vec![
                Snippet::new("a", "alpha").in_folder("f1"),
                Snippet::new("b", "beta").in_folder("f1"),
                Snippet::new("c", "gamma").in_folder("f1"),
                Snippet::new("d", "delta"),
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

    fn selected(engine: &Engine) -> Vec<String> {
        let mut ids: Vec<String> = engine.selected_ids().map(|v| v.to_string()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn plain_click_is_exclusive_and_selects() {
        let library = library();
        let mut engine = engine(&library);
        let a = index_of(&engine, "a");
        engine.click(a, ClickMods::NONE, &library);
        let b = index_of(&engine, "b");
        engine.click(b, ClickMods::NONE, &library);

        assert_eq!(selected(&engine), vec!["b".to_string()]);
        let commands = engine.drain_commands();
        assert!(commands.contains(&Command::SelectSnippet(Some("a".into()))));
        assert!(commands.contains(&Command::SelectSnippet(Some("b".into()))));
    }

    #[test]
    fn folder_click_toggles_without_selecting() {
        let library = library();
        let mut engine = engine(&library);
        let f1 = index_of(&engine, "f1");
        engine.click(f1, ClickMods::NONE, &library);

        assert!(engine.is_collapsed("f1"));
        assert!(selected(&engine).is_empty());
        assert_eq!(engine.selected_folder(), Some("f1"));
        let commands = engine.drain_commands();
        assert!(commands.contains(&Command::ToggleFolder {
            id: "f1".into(),
            collapsed: true
        }));
        assert!(commands.contains(&Command::SelectFolder(Some("f1".into()))));

        engine.click(index_of(&engine, "f1"), ClickMods::NONE, &library);
        assert!(!engine.is_collapsed("f1"));
    }

    #[test]
    fn ctrl_click_toggles_membership() {
        let library = library();
        let mut engine = engine(&library);
        engine.click(index_of(&engine, "a"), ClickMods::NONE, &library);
        engine.click(index_of(&engine, "c"), ClickMods::CTRL, &library);
        assert_eq!(selected(&engine), vec!["a".to_string(), "c".to_string()]);

        engine.click(index_of(&engine, "a"), ClickMods::CTRL, &library);
        assert_eq!(selected(&engine), vec!["c".to_string()]);
    }

    #[test]
    fn shift_click_ranges_are_symmetric() {
        let library = library();

        let mut forward = engine(&library);
        forward.click(index_of(&forward, "a"), ClickMods::NONE, &library);
        forward.shift_select(index_of(&forward, "c"), false);

        let mut backward = engine(&library);
        backward.click(index_of(&backward, "c"), ClickMods::NONE, &library);
        backward.shift_select(index_of(&backward, "a"), false);

        assert_eq!(selected(&forward), selected(&backward));
        assert_eq!(
            selected(&forward),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn shift_ctrl_click_unions_into_selection() {
        let library = library();
        let mut engine = engine(&library);
        engine.click(index_of(&engine, "d"), ClickMods::CTRL, &library);
        engine.click(index_of(&engine, "a"), ClickMods::CTRL, &library);
        engine.shift_select(index_of(&engine, "b"), true);
        assert_eq!(
            selected(&engine),
            vec!["a".to_string(), "b".to_string(), "d".to_string()]
        );
    }

    #[test]
    fn footer_click_clears_everything() {
        let library = library();
        let mut engine = engine(&library);
        engine.click(index_of(&engine, "a"), ClickMods::NONE, &library);
        let footer = engine.rows().len() - 1;
        engine.click(footer, ClickMods::NONE, &library);

        assert!(selected(&engine).is_empty());
        assert_eq!(engine.selected_folder(), None);
        assert!(
            engine
                .drain_commands()
                .contains(&Command::SelectSnippet(None))
        );
    }

    #[test]
    fn selecting_unknown_virtual_id_never_panics() {
        let library = library();
        let mut engine = engine(&library);
        engine.click(usize::MAX, ClickMods::NONE, &library);
        engine.shift_select(usize::MAX, false);
        assert!(!engine.is_selected(&VirtualId::snippet("missing")));
    }
}
