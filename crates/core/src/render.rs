use crate::model::{NodeId, Tree};

const TEE: &str = "├── ";
const CORNER: &str = "└── ";
const BAR: &str = "│   ";
const BLANK: &str = "    ";

/// Draws `tree` as a diagram the parser reads back into the same shape.
///
/// Children of a last entry are indented with `│   ` rather than blanks so
/// the marker count alone gives their depth.
pub fn render(tree: &Tree) -> String {
    let mut out = String::new();
    push_name(&mut out, tree, tree.root);
    let mut prefix = String::new();
    render_children(&mut out, tree, tree.root, &mut prefix);
    out
}

/// Same as [`render`] but in the `tree(1)` layout, with blank columns under
/// last entries. Reads back with `DepthPolicy::Indentation`.
pub fn render_pretty(tree: &Tree) -> String {
    let mut out = String::new();
    push_name(&mut out, tree, tree.root);
    let mut prefix = String::new();
    render_pretty_children(&mut out, tree, tree.root, &mut prefix);
    out
}

fn push_name(out: &mut String, tree: &Tree, id: NodeId) {
    if let Some(node) = tree.get(id) {
        out.push_str(&node.name);
        if node.is_dir() {
            out.push('/');
        }
        out.push('\n');
    }
}

fn render_children(out: &mut String, tree: &Tree, id: NodeId, prefix: &mut String) {
    let Some(node) = tree.get(id) else { return };
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        out.push_str(prefix);
        out.push_str(if i == last { CORNER } else { TEE });
        push_name(out, tree, *child);
        prefix.push_str(BAR);
        render_children(out, tree, *child, prefix);
        prefix.truncate(prefix.len() - BAR.len());
    }
}

fn render_pretty_children(out: &mut String, tree: &Tree, id: NodeId, prefix: &mut String) {
    let Some(node) = tree.get(id) else { return };
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        out.push_str(prefix);
        out.push_str(if i == last { CORNER } else { TEE });
        push_name(out, tree, *child);
        let indent = if i == last { BLANK } else { BAR };
        prefix.push_str(indent);
        render_pretty_children(out, tree, *child, prefix);
        prefix.truncate(prefix.len() - indent.len());
    }
}
