//! Navigation tree lookup.

use std::collections::HashSet;

use aiui_manifest::{NavItem, NavTree};

/// Find the nav item for a URL path.
///
/// Top-level items are groups and never match themselves; the search walks
/// each group's children depth-first in document order. An item matches
/// when its `path` equals `path`, or equals `path` with one leading `/`
/// removed. A relative query such as `intro` also finds `/intro`. The first
/// match wins.
///
/// The walk uses an explicit stack and never visits a node twice, so it
/// terminates on any input.
pub fn find_by_path<'a>(tree: &'a NavTree, path: &str) -> Option<&'a NavItem> {
    let mut visited: HashSet<*const NavItem> = HashSet::new();
    let mut stack: Vec<&NavItem> = tree
        .items
        .iter()
        .rev()
        .flat_map(|group| group.children.iter().rev())
        .collect();

    while let Some(item) = stack.pop() {
        if !visited.insert(item as *const NavItem) {
            continue;
        }

        if item.path.as_deref().is_some_and(|candidate| path_matches(candidate, path)) {
            return Some(item);
        }

        stack.extend(item.children.iter().rev());
    }

    None
}

fn path_matches(candidate: &str, path: &str) -> bool {
    candidate == path
        || path.strip_prefix('/') == Some(candidate)
        || (!path.starts_with('/') && candidate.strip_prefix('/') == Some(path))
}

/// All items that carry a path, in traversal order.
pub fn linked_items(tree: &NavTree) -> Vec<&NavItem> {
    let mut found = Vec::new();
    let mut stack: Vec<&NavItem> = tree.items.iter().rev().collect();

    while let Some(item) = stack.pop() {
        if item.path.is_some() {
            found.push(item);
        }
        stack.extend(item.children.iter().rev());
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(title: &str, path: Option<&str>, children: Vec<NavItem>) -> NavItem {
        NavItem {
            title: title.to_string(),
            path: path.map(str::to_string),
            children,
        }
    }

    fn guide_tree() -> NavTree {
        NavTree {
            items: vec![item(
                "Guide",
                None,
                vec![item("Intro", Some("/intro"), vec![])],
            )],
        }
    }

    #[test]
    fn finds_item_with_or_without_leading_slash() {
        let tree = guide_tree();

        assert_eq!(find_by_path(&tree, "/intro").unwrap().title, "Intro");
        assert_eq!(find_by_path(&tree, "intro").unwrap().title, "Intro");
        assert!(find_by_path(&tree, "/missing").is_none());
    }

    #[test]
    fn strips_a_single_slash_only() {
        let tree = NavTree {
            items: vec![item("G", None, vec![item("Root", Some("setup"), vec![])])],
        };

        assert_eq!(find_by_path(&tree, "/setup").unwrap().title, "Root");
        assert!(find_by_path(&tree, "//setup").is_none());
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let tree = NavTree {
            items: vec![
                item(
                    "A",
                    None,
                    vec![item(
                        "A1",
                        None,
                        vec![item("Deep", Some("/dup"), vec![])],
                    )],
                ),
                item("B", None, vec![item("Shallow", Some("/dup"), vec![])]),
            ],
        };

        assert_eq!(find_by_path(&tree, "/dup").unwrap().title, "Deep");
    }

    #[test]
    fn strips_the_slash_from_the_query_only() {
        let tree = NavTree {
            items: vec![item("G", None, vec![item("Setup", Some("/setup"), vec![])])],
        };

        assert_eq!(find_by_path(&tree, "//setup").unwrap().title, "Setup");
        assert_eq!(find_by_path(&tree, "/setup").unwrap().title, "Setup");
        assert!(find_by_path(&tree, "///setup").is_none());
    }

    #[test]
    fn groups_are_containers_only() {
        let tree = NavTree {
            items: vec![item(
                "Group",
                Some("/docs"),
                vec![item("Child", Some("/docs"), vec![])],
            )],
        };

        assert_eq!(find_by_path(&tree, "/docs").unwrap().title, "Child");

        let lone = NavTree {
            items: vec![item("Lone", Some("/lone"), vec![])],
        };
        assert!(find_by_path(&lone, "/lone").is_none());
    }

    #[test]
    fn handles_deep_trees() {
        let mut node = item("Leaf", Some("/leaf"), vec![]);
        for i in 0..1_000 {
            node = item(&format!("n{}", i), None, vec![node]);
        }
        let tree = NavTree {
            items: vec![item("Root", None, vec![node])],
        };

        assert_eq!(find_by_path(&tree, "leaf").unwrap().title, "Leaf");
        assert_eq!(linked_items(&tree).len(), 1);
    }

    #[test]
    fn linked_items_skip_groups() {
        let tree = guide_tree();
        let titles: Vec<&str> = linked_items(&tree).iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro"]);
    }
}
