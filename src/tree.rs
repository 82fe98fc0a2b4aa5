//! Category tree materialization.
//!
//! Builds the nested navigation structure from the flat set of active
//! categories: roots are active categories without a parent, children are
//! found by reverse parent lookup, and every level is ordered by
//! (display order, name). A visited set guards against a corrupt parent
//! chain looping the traversal.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Category;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub display_order: u32,
    pub children: Vec<CategoryNode>,
}

/// Materialize the forest of `categories`. Inactive categories never appear;
/// an active category under an inactive parent is unreachable and is
/// likewise absent.
pub fn build_tree(categories: &[Category]) -> Vec<CategoryNode> {
    let mut by_parent: HashMap<Option<Uuid>, Vec<&Category>> = HashMap::new();
    for category in categories.iter().filter(|c| c.is_active) {
        by_parent.entry(category.parent_id).or_default().push(category);
    }

    for siblings in by_parent.values_mut() {
        siblings.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    let mut visited = HashSet::new();
    match by_parent.get(&None) {
        Some(roots) => roots
            .iter()
            .filter_map(|root| attach_children(root, &by_parent, &mut visited))
            .collect(),
        None => Vec::new(),
    }
}

fn attach_children(
    category: &Category,
    by_parent: &HashMap<Option<Uuid>, Vec<&Category>>,
    visited: &mut HashSet<Uuid>,
) -> Option<CategoryNode> {
    // Re-encountering an id means the parent chain is cyclic; drop the
    // repeat instead of recursing forever.
    if !visited.insert(category.id) {
        return None;
    }

    let children = by_parent
        .get(&Some(category.id))
        .map(|kids| {
            kids.iter()
                .filter_map(|child| attach_children(child, by_parent, visited))
                .collect()
        })
        .unwrap_or_default();

    Some(CategoryNode {
        id: category.id,
        name: category.name.clone(),
        slug: category.slug.clone(),
        description: category.description.clone(),
        image: category.image.clone(),
        display_order: category.display_order,
        children,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn category(name: &str, parent_id: Option<Uuid>, order: u32, active: bool) -> Category {
        let now = Utc::now();
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: crate::slug::slugify(name),
            description: None,
            parent_id,
            image: None,
            is_active: active,
            display_order: order,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_basic_forest() {
        let electronics = category("Electronics", None, 0, true);
        let phones = category("Phones", Some(electronics.id), 0, true);
        let laptops = category("Laptops", Some(electronics.id), 1, true);

        let tree = build_tree(&[electronics, phones, laptops]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "Electronics");
        let children: Vec<&str> = tree[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(children, vec!["Phones", "Laptops"]);
    }

    #[test]
    fn test_siblings_ordered_by_order_then_name() {
        let root = category("Root", None, 0, true);
        let b = category("Bravo", Some(root.id), 1, true);
        let a = category("Alpha", Some(root.id), 1, true);
        let z = category("Zulu", Some(root.id), 0, true);

        let tree = build_tree(&[root, b, a, z]);
        let names: Vec<&str> = tree[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Bravo"]);
    }

    #[test]
    fn test_inactive_category_hides_active_children() {
        let root = category("Root", None, 0, true);
        let hidden = category("Hidden", Some(root.id), 0, false);
        let orphan = category("Orphan", Some(hidden.id), 0, true);

        let tree = build_tree(&[root, hidden, orphan]);

        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_inactive_root_excluded() {
        let active = category("Active", None, 0, true);
        let inactive = category("Inactive", None, 0, false);

        let tree = build_tree(&[active, inactive]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "Active");
    }

    #[test]
    fn test_depth_matches_parent_chain() {
        let a = category("A", None, 0, true);
        let b = category("B", Some(a.id), 0, true);
        let c = category("C", Some(b.id), 0, true);
        let d = category("D", Some(c.id), 0, true);

        let tree = build_tree(&[a, b, c, d]);

        let mut depth = 0;
        let mut node = &tree[0];
        loop {
            depth += 1;
            match node.children.first() {
                Some(child) => node = child,
                None => break,
            }
        }
        assert_eq!(depth, 4);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let root = category("Root", None, 0, true);
        let kid = category("Kid", Some(root.id), 0, true);
        let categories = vec![root, kid];

        assert_eq!(build_tree(&categories), build_tree(&categories));
    }

    #[test]
    fn test_cyclic_chain_terminates() {
        // Two categories pointing at each other; neither is a root so the
        // tree is empty, and the traversal must not loop.
        let mut a = category("A", None, 0, true);
        let b = category("B", Some(a.id), 0, true);
        a.parent_id = Some(b.id);

        let tree = build_tree(&[a, b]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(&[]).is_empty());
    }
}
