//! Docs directory scanner.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use aiui_manifest::{parse_document, ContentSourceConfig};
use aiui_runtime::Pattern;
use regex::Regex;
use walkdir::WalkDir;

use crate::compiler::CompileError;

/// Leading numeric ordering prefix, e.g. `01-` in `01-intro`.
static ORDER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-").expect("Invalid order prefix regex"));

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)").expect("Invalid leading number regex"));

/// A discovered docs page.
#[derive(Debug, Clone, PartialEq)]
pub struct DocPage {
    /// Absolute (or base-relative) source path
    pub source: PathBuf,

    /// Path relative to the docs directory
    pub relative: PathBuf,

    /// URL slug, `index` for the docs root
    pub slug: String,

    pub title: String,

    pub order: i64,

    /// Listed in navigation
    pub nav: bool,
}

/// Discovers Markdown pages in a docs directory.
#[derive(Debug)]
pub struct DocsScanner {
    docs_dir: PathBuf,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    index_stems: Vec<String>,
}

impl DocsScanner {
    pub fn new(docs_dir: impl Into<PathBuf>, source: &ContentSourceConfig) -> Self {
        let mut index_stems: Vec<String> = source
            .index_files
            .iter()
            .filter_map(|f| Path::new(f).file_stem().and_then(|s| s.to_str()))
            .map(str::to_lowercase)
            .collect();
        for stem in ["index", "readme"] {
            if !index_stems.iter().any(|s| s == stem) {
                index_stems.push(stem.to_string());
            }
        }

        Self {
            docs_dir: docs_dir.into(),
            include: compile_patterns(&source.include),
            exclude: compile_patterns(&source.exclude),
            index_stems,
        }
    }

    /// Scan the docs directory. A missing directory yields no pages.
    pub fn scan(&self) -> Result<Vec<DocPage>, CompileError> {
        if !self.docs_dir.exists() {
            return Ok(Vec::new());
        }

        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.docs_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(&self.docs_dir).unwrap_or(path);
            let relative_str = to_url_path(relative);

            if !self.include.iter().any(|p| p.is_match(&relative_str)) {
                continue;
            }
            if self.is_excluded(relative, &relative_str) {
                tracing::debug!("Excluded {}", relative_str);
                continue;
            }

            pages.push(self.parse_page(path, relative)?);
        }

        pages.sort_by(|a, b| {
            a.relative
                .parent()
                .cmp(&b.relative.parent())
                .then(a.order.cmp(&b.order))
                .then_with(|| a.relative.file_name().cmp(&b.relative.file_name()))
        });

        tracing::debug!(
            "Found {} pages in {}",
            pages.len(),
            self.docs_dir.display()
        );

        Ok(pages)
    }

    fn is_excluded(&self, relative: &Path, relative_str: &str) -> bool {
        let file_name = relative
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        self.exclude
            .iter()
            .any(|p| p.is_match(relative_str) || p.is_match(file_name))
    }

    fn parse_page(&self, path: &Path, relative: &Path) -> Result<DocPage, CompileError> {
        let source = fs::read_to_string(path)
            .map_err(|e| CompileError::Read(format!("{}: {}", path.display(), e)))?;

        let slug = self.slug_for(relative);
        let stem = relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let (title, order, nav) = match parse_document(&source) {
            Ok(doc) => {
                let order = doc.frontmatter.as_ref().and_then(|f| f.order);
                let nav = doc.frontmatter.as_ref().map(|f| f.nav).unwrap_or(true);
                (doc.title().map(str::to_string), order, nav)
            }
            Err(e) => {
                tracing::warn!("Ignoring frontmatter in {}: {}", path.display(), e);
                (first_heading(&source), None, true)
            }
        };

        let order = order.or_else(|| numeric_prefix(stem)).unwrap_or(0);

        Ok(DocPage {
            source: path.to_path_buf(),
            relative: relative.to_path_buf(),
            title: title.unwrap_or_else(|| slug.clone()),
            slug,
            order,
            nav,
        })
    }

    /// Slug for a docs-relative path.
    pub fn slug_for(&self, relative: &Path) -> String {
        let mut segments: Vec<String> = relative
            .iter()
            .filter_map(|s| s.to_str())
            .map(str::to_string)
            .collect();

        if let Some(last) = segments.pop() {
            let stem = Path::new(&last)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(&last)
                .to_string();
            if !self.index_stems.contains(&stem.to_lowercase()) {
                segments.push(stem);
            }
        }

        let slug = segments
            .iter()
            .map(|s| ORDER_PREFIX.replace(s, "").into_owned())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");

        if slug.is_empty() {
            "index".to_string()
        } else {
            slug
        }
    }
}

fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match Pattern::compile(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("Ignoring content pattern: {}", e);
                None
            }
        })
        .collect()
}

/// Relative path with `/` separators.
fn to_url_path(path: &Path) -> String {
    path.iter()
        .filter_map(|s| s.to_str())
        .collect::<Vec<_>>()
        .join("/")
}

fn numeric_prefix(stem: &str) -> Option<i64> {
    LEADING_NUMBER
        .captures(stem)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First `# ` heading, skipping a frontmatter block if present.
fn first_heading(source: &str) -> Option<String> {
    let mut body = source;
    if let Some(rest) = source.strip_prefix("---") {
        if let Some(end) = rest.find("---") {
            body = &rest[end + 3..];
        }
    }

    body.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scanner(dir: &Path) -> DocsScanner {
        DocsScanner::new(dir, &ContentSourceConfig::new("docs"))
    }

    #[test]
    fn slugs_collapse_index_files_and_order_prefixes() {
        let temp = tempdir().unwrap();
        let s = scanner(temp.path());

        assert_eq!(s.slug_for(Path::new("index.md")), "index");
        assert_eq!(s.slug_for(Path::new("README.md")), "index");
        assert_eq!(s.slug_for(Path::new("guide/index.md")), "guide");
        assert_eq!(s.slug_for(Path::new("01-guide/02-setup.md")), "guide/setup");
        assert_eq!(s.slug_for(Path::new("api/v2-client.mdx")), "api/v2-client");
    }

    #[test]
    fn scans_titles_and_order() {
        let temp = tempdir().unwrap();
        write(temp.path(), "index.md", "# Welcome\n\nHello");
        write(temp.path(), "02-setup.md", "# Setup\n");
        write(temp.path(), "01-install.md", "---\ntitle: Installing\n---\nBody");
        write(temp.path(), "zeta.md", "---\norder: 1\n---\nno heading");

        let pages = scanner(temp.path()).scan().unwrap();

        let summary: Vec<(&str, &str, i64)> = pages
            .iter()
            .map(|p| (p.slug.as_str(), p.title.as_str(), p.order))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("index", "Welcome", 0),
                ("install", "Installing", 1),
                ("zeta", "zeta", 1),
                ("setup", "Setup", 2),
            ]
        );
    }

    #[test]
    fn applies_include_and_exclude() {
        let temp = tempdir().unwrap();
        write(temp.path(), "a.md", "# A");
        write(temp.path(), "b.txt", "not docs");
        write(temp.path(), "drafts/c.md", "# C");
        write(temp.path(), "guide/_partial.md", "# P");

        let mut source = ContentSourceConfig::new("docs");
        source.exclude = vec!["drafts/**".to_string(), "_*.md".to_string()];

        let pages = DocsScanner::new(temp.path(), &source).scan().unwrap();

        let slugs: Vec<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a"]);
    }

    #[test]
    fn bad_frontmatter_is_ignored() {
        let temp = tempdir().unwrap();
        write(temp.path(), "broken.md", "---\ntitle: [unclosed\n---\n# Fallback\n");

        let pages = scanner(temp.path()).scan().unwrap();

        assert_eq!(pages[0].title, "Fallback");
        assert_eq!(pages[0].order, 0);
    }

    #[test]
    fn missing_dir_has_no_pages() {
        let temp = tempdir().unwrap();
        let pages = scanner(&temp.path().join("nope")).scan().unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn nav_flag_comes_from_frontmatter() {
        let temp = tempdir().unwrap();
        write(temp.path(), "hidden.md", "---\nnav: false\n---\n# Hidden");

        let pages = scanner(temp.path()).scan().unwrap();

        assert!(!pages[0].nav);
    }
}
