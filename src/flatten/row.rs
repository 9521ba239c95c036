use serde::{Deserialize, Serialize};

use crate::model::{FolderId, SnippetId};

/// What kind of entity a row (or command) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    Snippet,
}

/// Render-time unique key for a row. Distinct from the entity id so one
/// snippet can appear both in the pinned section and at its folder location
/// without key collisions: the pinned occurrence gets `pinned-{id}`, the
/// in-folder occurrence gets the raw id. Selection is a set of virtual ids,
/// never entity ids, which keeps the two occurrences independently
/// selectable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualId(String);

impl VirtualId {
    pub fn folder(id: &str) -> Self {
        VirtualId(id.to_string())
    }

    pub fn snippet(id: &str) -> Self {
        VirtualId(id.to_string())
    }

    pub fn pinned(id: &str) -> Self {
        VirtualId(format!("pinned-{id}"))
    }

    pub fn pinned_header() -> Self {
        VirtualId("pinned-header".to_string())
    }

    pub fn creation_input() -> Self {
        VirtualId("creation-input".to_string())
    }

    pub fn footer() -> Self {
        VirtualId("footer".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The entity id this key was minted from: the raw id for both the
    /// in-folder and the `pinned-` occurrence. Synthetic keys return
    /// themselves and simply resolve to no entity.
    pub fn entity_str(&self) -> &str {
        self.0.strip_prefix("pinned-").unwrap_or(&self.0)
    }
}

impl std::fmt::Display for VirtualId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Indentation depth of a row, counted in half-levels: the root is 0,
/// children of a level-N folder sit a full level (two halves) deeper, and
/// pinned snippets sit a single half-level under the pinned header so they
/// nest visually without being tree children of anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Depth(u16);

impl Depth {
    pub const ROOT: Depth = Depth(0);
    /// The half-level pinned snippets render at.
    pub const PINNED: Depth = Depth(1);

    /// One full level deeper.
    pub fn child(self) -> Depth {
        Depth(self.0 + 2)
    }

    /// The depth an ancestor row of this row would have. A half-level row's
    /// ancestor is the header directly above it.
    pub fn parent(self) -> Option<Depth> {
        match self.0 {
            0 => None,
            n if n % 2 == 1 => Some(Depth(n - 1)),
            n => Some(Depth(n - 2)),
        }
    }

    /// Whole levels, for indentation (a half-level rounds up to one step).
    pub fn indent_steps(self) -> usize {
        self.0.div_ceil(2) as usize
    }

    /// Raw half-level count, for monotonicity checks.
    pub fn half_levels(self) -> u16 {
        self.0
    }
}

/// One row of the compiled sequence. The sequence is fully regenerated on
/// every relevant state change; rows have no identity across compiles beyond
/// their virtual id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub virtual_id: VirtualId,
    pub depth: Depth,
    pub kind: RowKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Header of the synthetic pinned section.
    PinnedHeader { collapsed: bool },
    /// A pinned snippet's occurrence inside the pinned section.
    PinnedSnippet { id: SnippetId, dirty: bool },
    Folder {
        id: FolderId,
        collapsed: bool,
        editing: bool,
    },
    Snippet {
        id: SnippetId,
        pinned: bool,
        draft: bool,
        dirty: bool,
        editing: bool,
    },
    /// In-flight "new folder/snippet" input, injected as the first visible
    /// child of the folder being populated.
    CreationInput {
        kind: EntryKind,
        parent: Option<FolderId>,
    },
    /// Trailing hit target: empty space below the tree resolves to
    /// "select nothing / root context".
    FooterSpacer,
}

impl Row {
    /// The canonical entity behind this row, if it has one. Both occurrences
    /// of a pinned snippet resolve to the same entity.
    pub fn real_id(&self) -> Option<(EntryKind, &str)> {
        match &self.kind {
            RowKind::Folder { id, .. } => Some((EntryKind::Folder, id)),
            RowKind::Snippet { id, .. } | RowKind::PinnedSnippet { id, .. } => {
                Some((EntryKind::Snippet, id))
            }
            _ => None,
        }
    }

    /// Whether the keyboard cursor can rest on this row. The pinned header
    /// is focusable (Enter toggles it); the creation input and the footer
    /// spacer are pointer-only targets.
    pub fn focusable(&self) -> bool {
        !matches!(
            self.kind,
            RowKind::CreationInput { .. } | RowKind::FooterSpacer
        )
    }

    /// Whether this row can enter the selection set.
    pub fn selectable(&self) -> bool {
        self.real_id().is_some()
    }
}
