//! Markdown document parsing.

use std::collections::HashMap;

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed Markdown page.
#[derive(Debug, Clone)]
pub struct Document {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown body without frontmatter
    pub body: String,

    /// Rendered HTML, headings carry `id` anchors
    pub html: String,

    /// Table of contents entries in document order
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

impl Document {
    /// Title from frontmatter, else the first level-1 heading.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .and_then(|f| f.title.as_deref())
            .or_else(|| {
                self.toc
                    .iter()
                    .find(|e| e.level == 1)
                    .map(|e| e.title.as_str())
            })
    }

    pub fn description(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .and_then(|f| f.description.as_deref())
    }
}

/// Parse a Markdown page: frontmatter, heading anchors and HTML.
pub fn parse_document(source: &str) -> Result<Document, DocumentError> {
    let (frontmatter, body) = extract_frontmatter(source)?;

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut events: Vec<Event> = Parser::new_ext(body, options).collect();
    let mut toc = Vec::new();
    let mut seen_ids: HashMap<String, usize> = HashMap::new();

    // (event index, level, text)
    let mut current_heading: Option<(usize, u8, String)> = None;

    for index in 0..events.len() {
        let finished = match &events[index] {
            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((index, *level as u8, String::new()));
                None
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut title)) = current_heading {
                    title.push_str(text);
                }
                None
            }

            Event::End(TagEnd::Heading(_)) => current_heading.take(),

            _ => None,
        };

        if let Some((start, level, title)) = finished {
            let id = unique_id(&mut seen_ids, slugify(&title));

            if let Event::Start(Tag::Heading { id: heading_id, .. }) = &mut events[start] {
                if heading_id.is_none() {
                    *heading_id = Some(CowStr::from(id.clone()));
                }
            }

            toc.push(TocEntry { title, id, level });
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    Ok(Document {
        frontmatter,
        body: body.to_string(),
        html: html_output,
        toc,
    })
}

/// Disambiguate repeated heading anchors: `usage`, `usage-1`, `usage-2`.
fn unique_id(seen: &mut HashMap<String, usize>, id: String) -> String {
    let count = seen.entry(id.clone()).or_insert(0);
    let unique = if *count == 0 {
        id
    } else {
        format!("{}-{}", id, count)
    };
    *count += 1;
    unique
}

/// Convert heading text to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
