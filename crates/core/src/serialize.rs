use serde::Serialize;
use tracing::debug;

use crate::content::ContentMap;
use crate::model::{join_path, NodeId, Tree};

/// One file of the archive path list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub path: String,
    pub content: String,
}

/// Flattens `tree` into archive entries, looking contents up in `contents`.
/// Files missing from the map are empty.
pub fn serialize(tree: &Tree, contents: &ContentMap) -> Vec<ArchiveEntry> {
    serialize_with(tree, |name, path| {
        contents.content_for(name, path).map(str::to_string)
    })
}

/// Pre-order flattening of `tree`. `content_of` receives the bare file name
/// and its full path. Directories produce no entries; paths start with the
/// root name.
pub fn serialize_with<F>(tree: &Tree, mut content_of: F) -> Vec<ArchiveEntry>
where
    F: FnMut(&str, &str) -> Option<String>,
{
    let mut out = Vec::with_capacity(tree.file_count());
    let mut prefix: Vec<&str> = Vec::new();
    add_entries(tree, tree.root, &mut prefix, &mut content_of, &mut out);
    debug!(entries = out.len(), root = %tree.name(), "serialized archive path list");
    out
}

fn add_entries<'t, F>(
    tree: &'t Tree,
    id: NodeId,
    prefix: &mut Vec<&'t str>,
    content_of: &mut F,
    out: &mut Vec<ArchiveEntry>,
) where
    F: FnMut(&str, &str) -> Option<String>,
{
    let Some(node) = tree.get(id) else {
        return;
    };
    prefix.push(&node.name);
    if node.is_dir() {
        for child in &node.children {
            add_entries(tree, *child, prefix, content_of, out);
        }
    } else {
        let path = join_path(prefix.as_slice());
        let content = content_of(&node.name, &path).unwrap_or_default();
        out.push(ArchiveEntry { path, content });
    }
    prefix.pop();
}

/// Paths of directories without children, which a path list of files alone
/// would lose.
pub fn empty_dir_paths(tree: &Tree) -> Vec<String> {
    tree.nodes
        .iter()
        .filter(|n| n.is_dir() && n.children.is_empty() && n.id != tree.root)
        .filter_map(|n| tree.path_of(n.id))
        .collect()
}
