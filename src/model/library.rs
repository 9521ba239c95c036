use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::folder::{Folder, FolderId};
use super::snippet::{Snippet, SnippetId};

/// The source-of-truth arrays the engine compiles from. The engine never
/// mutates a `Library`; it emits commands and expects the host to apply them
/// and hand back refreshed data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub snippets: Vec<Snippet>,
    /// Ids of snippets with unsaved edits in the host editor.
    #[serde(skip)]
    pub dirty_ids: HashSet<SnippetId>,
}

impl Library {
    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn folder_mut(&mut self, id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    pub fn snippet(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    pub fn snippet_mut(&mut self, id: &str) -> Option<&mut Snippet> {
        self.snippets.iter_mut().find(|s| s.id == id)
    }

    /// Direct child folders of `parent` (None = root level), source order.
    pub fn child_folders(&self, parent: Option<&str>) -> Vec<&Folder> {
        self.folders
            .iter()
            .filter(|f| f.parent_id.as_deref() == parent)
            .collect()
    }

    /// Snippets directly inside `folder` (None = root level), source order.
    pub fn folder_snippets(&self, folder: Option<&str>) -> Vec<&Snippet> {
        self.snippets
            .iter()
            .filter(|s| s.folder_id.as_deref() == folder)
            .collect()
    }

    pub fn pinned_snippets(&self) -> Vec<&Snippet> {
        self.snippets.iter().filter(|s| s.pinned).collect()
    }

    pub fn is_dirty(&self, id: &str) -> bool {
        self.dirty_ids.contains(id)
    }

    /// Ancestor folder ids of `folder`, nearest first. Stops on a broken
    /// parent link or a cycle in malformed data.
    pub fn ancestors(&self, folder: &str) -> Vec<FolderId> {
        let mut chain = Vec::new();
        let mut current = self.folder(folder).and_then(|f| f.parent_id.as_deref());
        while let Some(id) = current {
            if chain.iter().any(|c| c == id) {
                break;
            }
            chain.push(id.to_string());
            current = self.folder(id).and_then(|f| f.parent_id.as_deref());
        }
        chain
    }

    /// Whether `folder` is `other` or one of its descendants.
    pub fn is_self_or_descendant(&self, folder: &str, other: &str) -> bool {
        folder == other || self.ancestors(folder).iter().any(|a| a == other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lib() -> Library {
        Library {
            folders: vec![
                Folder::new("a", "Alpha"),
                Folder::new("b", "Beta").with_parent("a"),
                Folder::new("c", "Gamma").with_parent("b"),
            ],
            snippets: vec![
                Snippet::new("s1", "one").in_folder("a"),
                Snippet::new("s2", "two").in_folder("c"),
            ],
            dirty_ids: HashSet::new(),
        }
    }

    #[test]
    fn ancestors_nearest_first() {
        assert_eq!(lib().ancestors("c"), vec!["b".to_string(), "a".to_string()]);
        assert!(lib().ancestors("a").is_empty());
    }

    #[test]
    fn descendant_check() {
        let l = lib();
        assert!(l.is_self_or_descendant("c", "a"));
        assert!(l.is_self_or_descendant("a", "a"));
        assert!(!l.is_self_or_descendant("a", "c"));
    }

    #[test]
    fn ancestors_tolerates_cycles() {
        let mut l = lib();
        l.folder_mut("a").unwrap().parent_id = Some("c".into());
        // Must terminate despite the a -> b -> c -> a loop.
        let chain = l.ancestors("c");
        assert!(chain.len() <= 3);
    }
}
