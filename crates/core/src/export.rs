use crate::model::*;

/// JSON dump of the arena, one object per node in pre-order.
pub fn to_json(tree: &Tree) -> serde_json::Value {
    serde_json::json!({
        "root": tree.root.0,
        "name": tree.name(),
        "nodes": tree.nodes.iter().map(|n| serde_json::json!({
            "id": n.id.0,
            "parent": n.parent.as_ref().map(|p| p.0),
            "name": n.name,
            "kind": n.kind.as_str(),
            "path": tree.path_of(n.id),
            "line": n.line,
            "children": n.children.iter().map(|c| c.0).collect::<Vec<_>>()
        })).collect::<Vec<_>>()
    })
}
