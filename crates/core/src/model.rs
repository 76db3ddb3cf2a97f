use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Dir,
}

impl NodeKind {
    pub fn is_dir(self) -> bool {
        matches!(self, NodeKind::Dir)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Dir => "dir",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
    /// 1-based line of the diagram this node came from, if it was parsed.
    pub line: Option<usize>,
}

impl TreeNode {
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Arena holding one rooted tree. Nodes are stored in pre-order, so iterating
/// `nodes` visits them in the order they appeared in the source diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub root: NodeId,
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// A tree holding only a root directory.
    pub fn with_root(name: impl Into<String>, line: Option<usize>) -> Self {
        Tree {
            root: NodeId(0),
            nodes: vec![TreeNode {
                id: NodeId(0),
                parent: None,
                name: name.into(),
                kind: NodeKind::Dir,
                children: Vec::new(),
                line,
            }],
        }
    }

    /// Appends a node under `parent` and returns its id. `parent` must be a
    /// directory.
    pub(crate) fn push_child(
        &mut self,
        parent: NodeId,
        name: String,
        kind: NodeKind,
        line: Option<usize>,
    ) -> NodeId {
        debug_assert!(self.nodes[parent.index()].is_dir());
        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(TreeNode {
            id,
            parent: Some(parent),
            name,
            kind,
            children: Vec::new(),
            line,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    pub fn root_node(&self) -> &TreeNode {
        &self.nodes[self.root.index()]
    }

    pub fn name(&self) -> &str {
        &self.root_node().name
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TreeNode> + '_ {
        self.get(id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|c| self.get(*c))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_dir()).count()
    }

    pub fn dir_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_dir()).count()
    }

    /// Slash-joined path from the root name down to `id`.
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            let node = self.get(c)?;
            names.push(node.name.as_str());
            cur = node.parent;
        }
        names.reverse();
        Some(join_path(&names))
    }

    /// Pre-order walk yielding `(depth, node)` with the root at depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![(0, self.root)],
        }
    }

    /// Rebuilds a tree from slash-separated paths such as the ones produced by
    /// [`crate::serialize`]. The first component of each path must be the root
    /// name and is skipped when present. A trailing `/` marks a directory.
    pub fn from_paths<I, S>(root_name: &str, paths: I) -> Tree
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Tree::with_root(root_name, None);
        let mut id_by_path: HashMap<String, NodeId> = HashMap::new();

        for path in paths {
            let path = path.as_ref();
            let is_dir = path.ends_with('/');
            let mut parts: Vec<&str> = path.trim_end_matches('/').split('/').collect();
            if parts.first() == Some(&root_name) {
                parts.remove(0);
            }
            if parts.is_empty() {
                continue;
            }

            let mut parent = tree.root;
            let mut prefix = String::new();
            let last = parts.len() - 1;
            for (i, part) in parts.iter().enumerate() {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(part);
                let leaf_is_file = i == last && !is_dir;
                if leaf_is_file {
                    tree.push_child(parent, part.to_string(), NodeKind::File, None);
                    break;
                }
                parent = match id_by_path.get(&prefix) {
                    Some(id) => *id,
                    None => {
                        let id = tree.push_child(parent, part.to_string(), NodeKind::Dir, None);
                        id_by_path.insert(prefix.clone(), id);
                        id
                    }
                };
            }
        }

        tree
    }
}

pub(crate) fn join_path(names: &[&str]) -> String {
    let mut out = String::new();
    for name in names {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(name);
    }
    out
}

pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<(usize, NodeId)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        let node = self.tree.get(id)?;
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, *child));
        }
        Some((depth, node))
    }
}
