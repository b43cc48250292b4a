//! Builds the docs navigation tree from scanned pages.

use std::collections::HashMap;

use aiui_manifest::{NavItem, NavTree};

use crate::scanner::DocPage;

/// URL path of a page under the docs base path.
pub fn page_path(route_base_docs: &str, slug: &str) -> String {
    let base = route_base_docs.trim_end_matches('/');
    if slug == "index" {
        if base.is_empty() {
            "/".to_string()
        } else {
            base.to_string()
        }
    } else {
        format!("{}/{}", base, slug)
    }
}

#[derive(Debug)]
struct Node {
    title: String,
    path: String,
    children: Vec<usize>,
}

/// Builds a [`NavTree`] from pages sorted by the scanner.
#[derive(Debug)]
pub struct NavBuilder<'a> {
    pages: &'a [DocPage],
    route_base_docs: &'a str,
}

impl<'a> NavBuilder<'a> {
    pub fn new(pages: &'a [DocPage], route_base_docs: &'a str) -> Self {
        Self {
            pages,
            route_base_docs,
        }
    }

    /// Single-segment slugs become root items; nested slugs hang under
    /// their parent slug. Missing parents get a placeholder named after the
    /// directory, which a later page with that slug takes over.
    pub fn build(&self) -> NavTree {
        let mut nodes: Vec<Node> = Vec::new();
        let mut by_slug: HashMap<String, usize> = HashMap::new();
        let mut roots: Vec<usize> = Vec::new();

        for page in self.pages.iter().filter(|p| p.nav) {
            let path = page_path(self.route_base_docs, &page.slug);

            if let Some(&existing) = by_slug.get(&page.slug) {
                // Fill in a placeholder created by an earlier child.
                nodes[existing].title = page.title.clone();
                nodes[existing].path = path;
                continue;
            }

            let index = nodes.len();
            nodes.push(Node {
                title: page.title.clone(),
                path,
                children: Vec::new(),
            });
            by_slug.insert(page.slug.clone(), index);

            match parent_slug(&page.slug) {
                Some(parent) => {
                    let parent = self.ensure_parent(parent, &mut nodes, &mut by_slug, &mut roots);
                    nodes[parent].children.push(index);
                }
                None => roots.push(index),
            }
        }

        NavTree {
            items: roots.iter().map(|&i| to_item(&nodes, i)).collect(),
        }
    }

    /// Index of the node for `slug`, creating placeholders up to the root.
    fn ensure_parent(
        &self,
        slug: &str,
        nodes: &mut Vec<Node>,
        by_slug: &mut HashMap<String, usize>,
        roots: &mut Vec<usize>,
    ) -> usize {
        if let Some(&index) = by_slug.get(slug) {
            return index;
        }

        let name = slug.rsplit('/').next().unwrap_or(slug);
        let index = nodes.len();
        nodes.push(Node {
            title: placeholder_title(name),
            path: page_path(self.route_base_docs, slug),
            children: Vec::new(),
        });
        by_slug.insert(slug.to_string(), index);

        match parent_slug(slug) {
            Some(parent) => {
                let parent = self.ensure_parent(parent, nodes, by_slug, roots);
                nodes[parent].children.push(index);
            }
            None => roots.push(index),
        }

        index
    }
}

fn parent_slug(slug: &str) -> Option<&str> {
    if slug == "index" {
        return None;
    }
    slug.rsplit_once('/').map(|(parent, _)| parent)
}

/// `getting-started` -> `Getting Started`
fn placeholder_title(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_item(nodes: &[Node], index: usize) -> NavItem {
    let node = &nodes[index];
    NavItem {
        title: node.title.clone(),
        path: Some(node.path.clone()),
        children: node.children.iter().map(|&c| to_item(nodes, c)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn page(slug: &str, title: &str) -> DocPage {
        DocPage {
            source: PathBuf::from(format!("{}.md", slug)),
            relative: PathBuf::from(format!("{}.md", slug)),
            slug: slug.to_string(),
            title: title.to_string(),
            order: 0,
            nav: true,
        }
    }

    #[test]
    fn builds_paths_under_base() {
        assert_eq!(page_path("/docs", "index"), "/docs");
        assert_eq!(page_path("/docs/", "guide/intro"), "/docs/guide/intro");
        assert_eq!(page_path("/", "index"), "/");
        assert_eq!(page_path("", "intro"), "/intro");
    }

    #[test]
    fn nests_pages_under_parents() {
        let pages = vec![
            page("index", "Home"),
            page("guide", "Guide"),
            page("guide/intro", "Intro"),
        ];

        let tree = NavBuilder::new(&pages, "/docs").build();

        assert_eq!(tree.items.len(), 2);
        assert_eq!(tree.items[0].path.as_deref(), Some("/docs"));
        assert_eq!(tree.items[1].title, "Guide");
        assert_eq!(tree.items[1].children[0].path.as_deref(), Some("/docs/guide/intro"));
    }

    #[test]
    fn creates_placeholder_ancestors() {
        let pages = vec![page("api/client/getting-started", "Start")];

        let tree = NavBuilder::new(&pages, "/docs").build();

        let api = &tree.items[0];
        assert_eq!(api.title, "Api");
        assert_eq!(api.path.as_deref(), Some("/docs/api"));
        let client = &api.children[0];
        assert_eq!(client.title, "Client");
        assert_eq!(client.children[0].title, "Start");
    }

    #[test]
    fn later_page_fills_placeholder() {
        let pages = vec![page("guide/setup", "Setup"), page("guide", "The Guide")];

        let tree = NavBuilder::new(&pages, "/docs").build();

        assert_eq!(tree.items.len(), 1);
        assert_eq!(tree.items[0].title, "The Guide");
        assert_eq!(tree.items[0].children.len(), 1);
    }

    #[test]
    fn hidden_pages_are_skipped() {
        let mut hidden = page("secret", "Secret");
        hidden.nav = false;

        let tree = NavBuilder::new(&[hidden], "/docs").build();

        assert!(tree.items.is_empty());
    }

    #[test]
    fn placeholder_titles_are_title_cased() {
        assert_eq!(placeholder_title("getting-started"), "Getting Started");
        assert_eq!(placeholder_title("API"), "Api");
    }
}
