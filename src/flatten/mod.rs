//! Tree compiler: derives the flat, ordered row sequence the viewport and
//! the selection engine operate on. Pure: the same inputs always compile
//! to the same sequence, and nothing here mutates domain state.

pub mod counts;
pub mod row;

use std::collections::HashSet;

use regex::Regex;

use crate::model::{FolderId, Library, Snippet};

pub use counts::descendant_counts;
pub use row::{Depth, EntryKind, Row, RowKind, VirtualId};

/// Everything one compile pass reads. Collapse, pinned-section, creation and
/// rename state are owned by the engine and passed in by reference.
#[derive(Debug, Clone, Copy)]
pub struct CompileInput<'a> {
    pub library: &'a Library,
    pub collapsed: &'a HashSet<FolderId>,
    pub pinned_collapsed: bool,
    pub search_query: &'a str,
    /// In-flight creation: what is being created and under which parent.
    pub create: Option<(EntryKind, Option<&'a str>)>,
    /// Entity id currently being renamed inline.
    pub editing_id: Option<&'a str>,
}

/// Compile the library into a row sequence. Non-empty `search_query` selects
/// search mode: one snippet row per match at depth 0, hierarchy discarded.
/// Otherwise browse mode: pinned section, depth-first folder walk, trailing
/// footer spacer.
pub fn compile(input: &CompileInput) -> Vec<Row> {
    if !input.search_query.is_empty() {
        return compile_search(input);
    }
    compile_browse(input)
}

/// Case-insensitive matcher for a search query. Invalid patterns fall back
/// to the escaped literal, so a half-typed `[` still searches.
pub fn search_matcher(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){query}"))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(query))))
        .ok()
}

fn compile_search(input: &CompileInput) -> Vec<Row> {
    let matcher = match search_matcher(input.search_query) {
        Some(m) => m,
        None => return Vec::new(),
    };

    input
        .library
        .snippets
        .iter()
        .filter(|s| matcher.is_match(&s.title) || matcher.is_match(&s.content))
        .map(|s| snippet_row(s, Depth::ROOT, input))
        .collect()
}

fn compile_browse(input: &CompileInput) -> Vec<Row> {
    let mut rows = Vec::new();

    let mut pinned = input.library.pinned_snippets();
    if !pinned.is_empty() {
        rows.push(Row {
            virtual_id: VirtualId::pinned_header(),
            depth: Depth::ROOT,
            kind: RowKind::PinnedHeader {
                collapsed: input.pinned_collapsed,
            },
        });
        if !input.pinned_collapsed {
            pinned.sort_by_key(|s| s.title.to_lowercase());
            for snippet in pinned {
                rows.push(Row {
                    virtual_id: VirtualId::pinned(&snippet.id),
                    depth: Depth::PINNED,
                    kind: RowKind::PinnedSnippet {
                        id: snippet.id.clone(),
                        dirty: input.library.is_dirty(&snippet.id),
                    },
                });
            }
        }
    }

    walk_level(None, Depth::ROOT, input, &mut rows);

    rows.push(Row {
        virtual_id: VirtualId::footer(),
        depth: Depth::ROOT,
        kind: RowKind::FooterSpacer,
    });

    rows
}

fn walk_level(parent: Option<&str>, depth: Depth, input: &CompileInput, rows: &mut Vec<Row>) {
    // A creation input targeting this level renders as its first child, so
    // the new entry appears where it will land.
    if let Some((kind, create_parent)) = input.create
        && create_parent == parent
    {
        rows.push(Row {
            virtual_id: VirtualId::creation_input(),
            depth,
            kind: RowKind::CreationInput {
                kind,
                parent: parent.map(str::to_string),
            },
        });
    }

    let mut folders = input.library.child_folders(parent);
    folders.sort_by_key(|f| (!f.is_inbox(), f.name.to_lowercase()));
    for folder in folders {
        let collapsed = input.collapsed.contains(&folder.id);
        rows.push(Row {
            virtual_id: VirtualId::folder(&folder.id),
            depth,
            kind: RowKind::Folder {
                id: folder.id.clone(),
                collapsed,
                editing: input.editing_id == Some(folder.id.as_str()),
            },
        });
        if !collapsed {
            walk_level(Some(&folder.id), depth.child(), input, rows);
        }
    }

    let mut snippets = input.library.folder_snippets(parent);
    snippets.sort_by_key(|s| (!s.pinned, !s.draft, s.title.to_lowercase()));
    for snippet in snippets {
        rows.push(snippet_row(snippet, depth, input));
    }
}

fn snippet_row(snippet: &Snippet, depth: Depth, input: &CompileInput) -> Row {
    Row {
        virtual_id: VirtualId::snippet(&snippet.id),
        depth,
        kind: RowKind::Snippet {
            id: snippet.id.clone(),
            pinned: snippet.pinned,
            draft: snippet.draft,
            dirty: input.library.is_dirty(&snippet.id),
            editing: input.editing_id == Some(snippet.id.as_str()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Folder, Library, Snippet};
    use pretty_assertions::assert_eq;

    fn browse<'a>(library: &'a Library, collapsed: &'a HashSet<FolderId>) -> CompileInput<'a> {
        CompileInput {
            library,
            collapsed,
            pinned_collapsed: false,
            search_query: "",
            create: None,
            editing_id: None,
        }
    }

    fn sample() -> Library {
        Library {
            folders: vec![
                Folder::new("f-rust", "Rust"),
                Folder::new("f-inbox", "Inbox"),
                Folder::new("f-async", "async").with_parent("f-rust"),
            ],
            snippets: vec![
                Snippet::new("s-vec", "vec tricks").in_folder("f-rust"),
                Snippet::new("s-pin", "pinned one").in_folder("f-rust").pinned(),
                Snippet::new("s-draft", "zz draft").in_folder("f-rust").draft(),
                Snippet::new("s-await", "await points").in_folder("f-async"),
                Snippet::new("s-loose", "loose note"),
            ],
            ..Default::default()
        }
    }

    /// Compact textual form of a sequence, for snapshotting.
    fn dump(rows: &[Row]) -> String {
        let mut out = String::new();
        for row in rows {
            out.push_str(&"  ".repeat(row.depth.indent_steps()));
            match &row.kind {
                RowKind::PinnedHeader { collapsed } => {
                    out.push_str(if *collapsed { "pinned (+)" } else { "pinned" })
                }
                RowKind::PinnedSnippet { id, .. } => out.push_str(&format!("*{id}")),
                RowKind::Folder { id, collapsed, .. } => {
                    out.push_str(&format!("{id}/{}", if *collapsed { " (+)" } else { "" }))
                }
                RowKind::Snippet { id, .. } => out.push_str(id),
                RowKind::CreationInput { kind, .. } => {
                    out.push_str(&format!("<new {kind:?}>"))
                }
                RowKind::FooterSpacer => out.push_str("~"),
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn browse_sequence_shape() {
        let library = sample();
        let collapsed = HashSet::new();
        let rows = compile(&browse(&library, &collapsed));
        insta::assert_snapshot!(dump(&rows), @r"
        pinned
          *s-pin
        f-inbox/
        f-rust/
          f-async/
            s-await
          s-pin
          s-draft
          s-vec
        s-loose
        ~
        ");
    }

    #[test]
    fn compile_is_deterministic() {
        let library = sample();
        let collapsed = HashSet::new();
        let input = browse(&library, &collapsed);
        assert_eq!(compile(&input), compile(&input));
    }

    #[test]
    fn virtual_ids_unique_within_sequence() {
        let library = sample();
        let collapsed = HashSet::new();
        let rows = compile(&browse(&library, &collapsed));
        let mut seen = HashSet::new();
        for row in &rows {
            assert!(seen.insert(row.virtual_id.clone()), "dup {}", row.virtual_id);
        }
    }

    #[test]
    fn depth_never_jumps_more_than_one_level() {
        let library = sample();
        let collapsed = HashSet::new();
        let rows = compile(&browse(&library, &collapsed));
        for pair in rows.windows(2) {
            assert!(pair[1].depth.half_levels() <= pair[0].depth.half_levels() + 2);
        }
    }

    #[test]
    fn pinned_aliasing() {
        let library = Library {
            folders: vec![Folder::new("F1", "One")],
            snippets: vec![Snippet::new("S1", "x").in_folder("F1").pinned()],
            ..Default::default()
        };
        let collapsed = HashSet::new();
        let rows = compile(&browse(&library, &collapsed));

        let ids: Vec<&str> = rows.iter().map(|r| r.virtual_id.as_str()).collect();
        assert_eq!(ids, vec!["pinned-header", "pinned-S1", "F1", "S1", "footer"]);
        // Both occurrences point back at the same entity.
        assert_eq!(rows[1].real_id(), Some((EntryKind::Snippet, "S1")));
        assert_eq!(rows[3].real_id(), Some((EntryKind::Snippet, "S1")));
    }

    #[test]
    fn collapsed_folder_hides_subtree() {
        let library = sample();
        let collapsed: HashSet<FolderId> = ["f-rust".to_string()].into();
        let rows = compile(&browse(&library, &collapsed));
        assert!(!rows.iter().any(|r| r.virtual_id.as_str() == "s-vec"));
        assert!(rows.iter().any(|r| r.virtual_id.as_str() == "f-rust"));
    }

    #[test]
    fn search_discards_hierarchy() {
        let library = Library {
            folders: vec![Folder::new("F1", "One")],
            snippets: vec![Snippet::new("S1", "x").in_folder("F1")],
            ..Default::default()
        };
        let collapsed = HashSet::new();
        let mut input = browse(&library, &collapsed);
        input.search_query = "x";
        let rows = compile(&input);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].depth, Depth::ROOT);
        assert_eq!(rows[0].real_id(), Some((EntryKind::Snippet, "S1")));
    }

    #[test]
    fn search_matches_content_and_survives_bad_patterns() {
        let mut library = sample();
        library.snippet_mut("s-loose").unwrap().content = "needle here".into();
        let collapsed = HashSet::new();
        let mut input = browse(&library, &collapsed);

        input.search_query = "NEEDLE";
        assert_eq!(compile(&input).len(), 1);

        // Unbalanced bracket: falls back to literal, matches nothing, no panic.
        input.search_query = "[";
        assert!(compile(&input).is_empty());
    }

    #[test]
    fn creation_input_is_first_child_of_target_level() {
        let library = sample();
        let collapsed = HashSet::new();
        let mut input = browse(&library, &collapsed);
        input.create = Some((EntryKind::Snippet, Some("f-rust")));
        let rows = compile(&input);

        let folder_at = rows
            .iter()
            .position(|r| r.virtual_id.as_str() == "f-rust")
            .unwrap();
        assert!(matches!(
            rows[folder_at + 1].kind,
            RowKind::CreationInput { kind: EntryKind::Snippet, .. }
        ));
        assert_eq!(rows[folder_at + 1].depth, rows[folder_at].depth.child());
    }

    #[test]
    fn inbox_sorts_before_siblings() {
        let library = sample();
        let collapsed = HashSet::new();
        let rows = compile(&browse(&library, &collapsed));
        let inbox = rows
            .iter()
            .position(|r| r.virtual_id.as_str() == "f-inbox")
            .unwrap();
        let rust = rows
            .iter()
            .position(|r| r.virtual_id.as_str() == "f-rust")
            .unwrap();
        assert!(inbox < rust);
    }

    #[test]
    fn collapsed_pinned_section_keeps_header_only() {
        let library = sample();
        let collapsed = HashSet::new();
        let mut input = browse(&library, &collapsed);
        input.pinned_collapsed = true;
        let rows = compile(&input);
        assert!(matches!(rows[0].kind, RowKind::PinnedHeader { collapsed: true }));
        assert!(!rows.iter().any(|r| r.virtual_id.as_str() == "pinned-s-pin"));
        // The in-folder occurrence is unaffected.
        assert!(rows.iter().any(|r| r.virtual_id.as_str() == "s-pin"));
    }
}
