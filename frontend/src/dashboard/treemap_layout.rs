//! Slice-and-dice layout for the two-level channel/video treemap.

use crate::models::TreemapNode;

#[derive(Debug, Clone, PartialEq)]
pub struct TreemapRect<'a> {
    pub node: &'a TreemapNode,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Roots split the width in proportion to their value; each root's children
/// split its column top to bottom. Nodes with no value take no space.
pub fn layout(nodes: &[TreemapNode], width: f64, height: f64) -> Vec<TreemapRect<'_>> {
    let roots: Vec<&TreemapNode> = nodes
        .iter()
        .filter(|n| n.parent.is_empty() && n.value > 0)
        .collect();
    let total: i64 = roots.iter().map(|n| n.value).sum();
    if total <= 0 {
        return Vec::new();
    }

    let mut rects = Vec::with_capacity(nodes.len());
    let mut x = 0.0;
    for root in roots {
        let column = width * root.value as f64 / total as f64;
        rects.push(TreemapRect {
            node: root,
            x,
            y: 0.0,
            width: column,
            height,
        });

        let children: Vec<&TreemapNode> = nodes
            .iter()
            .filter(|n| n.parent == root.id && n.value > 0)
            .collect();
        let child_total: i64 = children.iter().map(|n| n.value).sum();
        let mut y = 0.0;
        for child in children {
            let cell = height * child.value as f64 / child_total as f64;
            rects.push(TreemapRect {
                node: child,
                x,
                y,
                width: column,
                height: cell,
            });
            y += cell;
        }
        x += column;
    }
    rects
}
