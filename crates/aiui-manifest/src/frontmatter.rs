//! Frontmatter extraction for Markdown pages.

use serde::Deserialize;

/// Frontmatter of a docs page. Every field is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Page title, overrides the first heading
    #[serde(default)]
    pub title: Option<String>,

    /// Page description for SEO
    #[serde(default)]
    pub description: Option<String>,

    /// Order among siblings (lower = first)
    #[serde(default)]
    pub order: Option<i64>,

    /// Whether the page is listed in navigation
    #[serde(default = "default_true")]
    pub nav: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            order: None,
            nav: true,
        }
    }
}

/// Extract frontmatter from Markdown source.
///
/// Returns the parsed frontmatter and the body after the closing `---`.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // An empty block is valid and means "all defaults".
    let frontmatter = if yaml.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}
