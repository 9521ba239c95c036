use std::collections::HashMap;

use crate::model::{FolderId, Library};

/// Recursive snippet count per folder (the badge number), computed by one
/// post-order walk per compile pass. No cross-compile caching: folder and
/// snippet sets can change between any two compiles.
pub fn descendant_counts(library: &Library) -> HashMap<FolderId, usize> {
    // Direct counts and child adjacency in one pass each.
    let mut direct: HashMap<&str, usize> = HashMap::new();
    for snippet in &library.snippets {
        if let Some(folder) = snippet.folder_id.as_deref() {
            *direct.entry(folder).or_insert(0) += 1;
        }
    }

    let mut children: HashMap<Option<&str>, Vec<&str>> = HashMap::new();
    for folder in &library.folders {
        children
            .entry(folder.parent_id.as_deref())
            .or_default()
            .push(&folder.id);
    }

    let mut counts = HashMap::new();
    for folder in library.child_folders(None) {
        fill(&folder.id, &direct, &children, &mut counts);
    }
    counts
}

fn fill(
    folder: &str,
    direct: &HashMap<&str, usize>,
    children: &HashMap<Option<&str>, Vec<&str>>,
    counts: &mut HashMap<FolderId, usize>,
) -> usize {
    let mut total = direct.get(folder).copied().unwrap_or(0);
    if let Some(kids) = children.get(&Some(folder)) {
        for child in kids {
            total += fill(child, direct, children, counts);
        }
    }
    counts.insert(folder.to_string(), total);
    total
}
