//! # Tree Operations
//!
//! Pure recursive algorithms over a forest of element nodes.
//!
//! ## Contract
//!
//! - Every mutating operation takes the current forest and returns a **new**
//!   forest. The input is never modified.
//! - Only the chain of nodes from the root down to the target is copied.
//!   Every other subtree in the result is the very same `Arc` as before.
//! - Operations on an id that does not exist return `None`. Callers treat
//!   that as a silent no-op.

use crate::element::{Element, Forest, Position, Props, Size, Styles};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reserved id that makes [`update`] reorder the top-level list to match the
/// patch's `children`. Used for sibling and layer reordering.
pub const REORDER_SENTINEL: &str = "__reorder__";

/// Shallow patch applied by [`update`].
///
/// Each present field replaces the node's field wholesale. Partial
/// `props`/`styles` edits must be merged by the caller beforehand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Forest>,
}

impl ElementPatch {
    pub fn props(props: Props) -> Self {
        Self {
            props: Some(props),
            ..Default::default()
        }
    }

    pub fn styles(styles: Styles) -> Self {
        Self {
            styles: Some(styles),
            ..Default::default()
        }
    }

    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn children(children: Forest) -> Self {
        Self {
            children: Some(children),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_none()
            && self.styles.is_none()
            && self.position.is_none()
            && self.size.is_none()
            && self.children.is_none()
    }

    /// Produce the patched copy of `element`
    pub fn apply(&self, element: &Element) -> Element {
        let mut next = element.clone();
        if let Some(props) = &self.props {
            next.props = props.clone();
        }
        if let Some(styles) = &self.styles {
            next.styles = styles.clone();
        }
        if let Some(position) = self.position {
            next.position = position;
        }
        if let Some(size) = self.size {
            next.size = size;
        }
        if let Some(children) = &self.children {
            next.children = children.clone();
        }
        next
    }
}

/// Depth-first preorder search across the whole forest
pub fn find<'a>(forest: &'a [Arc<Element>], id: &str) -> Option<&'a Arc<Element>> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn contains(forest: &[Arc<Element>], id: &str) -> bool {
    find(forest, id).is_some()
}

/// Apply a shallow patch to the node with `id`
pub fn update(forest: &[Arc<Element>], id: &str, patch: &ElementPatch) -> Option<Forest> {
    if id == REORDER_SENTINEL {
        return patch
            .children
            .as_deref()
            .and_then(|order| reorder(forest, order));
    }
    map_node(forest, id, &mut |node| patch.apply(node))
}

/// Remove the node with `id` together with its whole subtree
pub fn delete(forest: &[Arc<Element>], id: &str) -> Option<Forest> {
    if let Some(index) = forest.iter().position(|node| node.id == id) {
        let mut next = forest.to_vec();
        next.remove(index);
        return Some(next);
    }

    for (index, node) in forest.iter().enumerate() {
        if let Some(children) = delete(&node.children, id) {
            return Some(replace_children(forest, index, children));
        }
    }

    None
}

pub fn reposition(forest: &[Arc<Element>], id: &str, position: Position) -> Option<Forest> {
    map_node(forest, id, &mut |node| Element {
        position,
        ..node.clone()
    })
}

pub fn resize(forest: &[Arc<Element>], id: &str, size: Size) -> Option<Forest> {
    map_node(forest, id, &mut |node| Element {
        size,
        ..node.clone()
    })
}

/// Rearrange the top-level nodes into the order of `order`.
///
/// `order` must name every current top-level id exactly once; anything else
/// returns `None`. Only ids are read from `order`, the result reuses the
/// forest's own nodes.
pub fn reorder(forest: &[Arc<Element>], order: &[Arc<Element>]) -> Option<Forest> {
    if order.len() != forest.len() {
        return None;
    }

    let mut remaining: Vec<Option<&Arc<Element>>> = forest.iter().map(Some).collect();
    let mut next = Vec::with_capacity(forest.len());
    for wanted in order {
        let slot = remaining
            .iter_mut()
            .find(|slot| matches!(slot, Some(node) if node.id == wanted.id))?;
        next.extend(slot.take().cloned());
    }
    Some(next)
}

/// Every id in the forest, preorder
pub fn collect_ids(forest: &[Arc<Element>]) -> Vec<String> {
    let mut ids = Vec::new();
    walk(forest, &mut |node| ids.push(node.id.clone()));
    ids
}

/// Total number of nodes in the forest
pub fn count(forest: &[Arc<Element>]) -> usize {
    let mut total = 0;
    walk(forest, &mut |_| total += 1);
    total
}

/// Visit every node, preorder
pub fn walk(forest: &[Arc<Element>], visit: &mut dyn FnMut(&Element)) {
    for node in forest {
        visit(node);
        walk(&node.children, visit);
    }
}

fn map_node(
    forest: &[Arc<Element>],
    id: &str,
    f: &mut dyn FnMut(&Element) -> Element,
) -> Option<Forest> {
    for (index, node) in forest.iter().enumerate() {
        if node.id == id {
            let mut next = forest.to_vec();
            next[index] = Arc::new(f(node));
            return Some(next);
        }
        if let Some(children) = map_node(&node.children, id, f) {
            return Some(replace_children(forest, index, children));
        }
    }
    None
}

fn replace_children(forest: &[Arc<Element>], index: usize, children: Forest) -> Forest {
    let mut parent = (*forest[index]).clone();
    parent.children = children;
    let mut next = forest.to_vec();
    next[index] = Arc::new(parent);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Dimension, ElementType};
    use serde_json::json;

    fn sample() -> Forest {
        vec![
            Arc::new(Element::new("a", ElementType::Heading).with_prop("content", "Title")),
            Arc::new(
                Element::new("b", ElementType::Container)
                    .with_child(Element::new("b1", ElementType::Text).with_prop("content", "one"))
                    .with_child(
                        Element::new("b2", ElementType::Card)
                            .with_child(Element::new("b2a", ElementType::Image)),
                    ),
            ),
            Arc::new(Element::new("c", ElementType::Rectangle)),
        ]
    }

    #[test]
    fn test_find_nested() {
        let forest = sample();
        assert_eq!(find(&forest, "b2a").unwrap().element_type, ElementType::Image);
        assert!(find(&forest, "nope").is_none());
        assert_eq!(collect_ids(&forest), vec!["a", "b", "b1", "b2", "b2a", "c"]);
        assert_eq!(count(&forest), 6);
    }

    #[test]
    fn test_update_is_shallow_replace() {
        let forest = sample();
        let mut props = Props::new();
        props.insert("content".into(), json!("two"));

        let next = update(&forest, "b1", &ElementPatch::props(props)).unwrap();
        let node = find(&next, "b1").unwrap();
        assert_eq!(node.prop_str("content"), Some("two"));

        // Input untouched
        assert_eq!(find(&forest, "b1").unwrap().prop_str("content"), Some("one"));
    }

    #[test]
    fn test_update_shares_untouched_subtrees() {
        let forest = sample();
        let next = reposition(&forest, "b1", Position::new(5.0, 6.0)).unwrap();

        assert!(Arc::ptr_eq(&forest[0], &next[0]));
        assert!(Arc::ptr_eq(&forest[2], &next[2]));
        assert!(!Arc::ptr_eq(&forest[1], &next[1]));
        // Sibling of the target inside the copied parent is shared too
        assert!(Arc::ptr_eq(&forest[1].children[1], &next[1].children[1]));
        assert_eq!(next[1].children[0].position, Position::new(5.0, 6.0));
    }

    #[test]
    fn test_missing_id_is_noop() {
        let forest = sample();
        assert!(update(&forest, "ghost", &ElementPatch::default()).is_none());
        assert!(delete(&forest, "ghost").is_none());
        assert!(reposition(&forest, "ghost", Position::default()).is_none());
        assert!(resize(&forest, "ghost", Size::auto()).is_none());
    }

    #[test]
    fn test_delete_removes_subtree() {
        let forest = sample();
        let next = delete(&forest, "b2").unwrap();
        assert!(find(&next, "b2").is_none());
        assert!(find(&next, "b2a").is_none());
        assert!(find(&next, "b1").is_some());
        assert_eq!(count(&next), 4);

        let next = delete(&forest, "b").unwrap();
        assert_eq!(collect_ids(&next), vec!["a", "c"]);
    }

    #[test]
    fn test_resize_only_touches_size() {
        let forest = sample();
        let size = Size::new(Dimension::Px(200.0), Dimension::Auto);
        let next = resize(&forest, "a", size).unwrap();
        assert_eq!(next[0].size, size);
        assert_eq!(next[0].props, forest[0].props);
        assert_eq!(next[0].position, forest[0].position);
    }

    #[test]
    fn test_reorder_sentinel_replaces_top_level() {
        let forest = sample();
        let reordered: Forest = vec![forest[2].clone(), forest[0].clone(), forest[1].clone()];
        let next = update(&forest, REORDER_SENTINEL, &ElementPatch::children(reordered)).unwrap();
        let top: Vec<_> = next.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(top, vec!["c", "a", "b"]);

        // Without children the sentinel does nothing
        assert!(update(&forest, REORDER_SENTINEL, &ElementPatch::default()).is_none());
    }

    #[test]
    fn test_reorder_requires_a_permutation() {
        let forest = sample();
        let a = forest[0].clone();

        let duplicated: Forest = vec![a.clone(), a.clone(), forest[1].clone()];
        assert!(reorder(&forest, &duplicated).is_none());
        assert!(reorder(&forest, &[a.clone(), forest[1].clone()]).is_none());

        let stranger = Arc::new(Element::new("zz", forest[0].element_type));
        assert!(reorder(&forest, &[stranger, forest[1].clone(), forest[2].clone()]).is_none());
        assert!(update(&forest, REORDER_SENTINEL, &ElementPatch::children(duplicated)).is_none());
    }

    #[test]
    fn test_reorder_reuses_current_nodes() {
        let forest = sample();
        let edited = Arc::new(Element {
            props: Props::new(),
            ..(*forest[0]).clone()
        });
        let next = reorder(&forest, &[forest[1].clone(), forest[2].clone(), edited]).unwrap();
        assert!(Arc::ptr_eq(&next[2], &forest[0]));
        assert_eq!(collect_ids(&next)[0], forest[1].id);
    }

    #[test]
    fn test_patch_serde_skips_absent_fields() {
        let patch = ElementPatch::position(Position::new(1.0, 2.0));
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"position": {"x": 1.0, "y": 2.0}})
        );
        assert!(ElementPatch::default().is_empty());
    }
}
