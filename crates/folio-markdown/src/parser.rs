//! Markdown document parser.

use std::collections::HashMap;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed Markdown document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Frontmatter, defaults when the file has none
    pub frontmatter: Frontmatter,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Every heading, in document order, with unique anchor ids
    pub toc: Vec<TocEntry>,

    /// Link and image targets, in document order
    pub links: Vec<Link>,

    /// Plain text outside code blocks, for the search index
    pub text: String,
}

impl ParsedDoc {
    /// Frontmatter title, else the first level-1 heading.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter.title.as_deref().or_else(|| {
            self.toc
                .iter()
                .find(|e| e.level == 1)
                .map(|e| e.title.as_str())
        })
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// An outbound reference found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Raw destination as written
    pub target: String,
    /// `![...](...)` rather than `[...](...)`
    pub image: bool,
}

/// Errors that can occur when parsing Markdown.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Extensions enabled for every document.
///
/// Parsing and rendering must agree on these so heading ids line up.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse a Markdown document.
///
/// Extracts frontmatter, the heading outline, links and searchable text.
pub fn parse_document(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let mut toc = Vec::new();
    let mut links = Vec::new();
    let mut text = String::new();
    let mut used_ids: HashMap<String, usize> = HashMap::new();

    let mut in_code_block = false;
    let mut current_heading: Option<(u8, String)> = None;

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let title = title.trim().to_string();
                    let id = unique_id(&mut used_ids, slugify(&title));
                    toc.push(TocEntry { title, id, level });
                }
            }

            Event::Start(Tag::Link { dest_url, .. }) => links.push(Link {
                target: dest_url.to_string(),
                image: false,
            }),

            Event::Start(Tag::Image { dest_url, .. }) => links.push(Link {
                target: dest_url.to_string(),
                image: true,
            }),

            Event::Text(t) | Event::Code(t) => {
                if in_code_block {
                    continue;
                }
                if let Some((_, ref mut heading)) = current_heading {
                    heading.push_str(&t);
                }
                push_word(&mut text, &t);
            }

            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, ref mut heading)) = current_heading {
                    heading.push(' ');
                }
            }

            _ => {}
        }
    }

    Ok(ParsedDoc {
        frontmatter: frontmatter.unwrap_or_default(),
        content: content.to_string(),
        toc,
        links,
        text,
    })
}

fn push_word(text: &mut String, fragment: &str) {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(fragment);
}

fn unique_id(used: &mut HashMap<String, usize>, slug: String) -> String {
    let slug = if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    };

    let count = used.entry(slug.clone()).or_insert(0);
    let id = if *count == 0 {
        slug
    } else {
        format!("{}-{}", slug, count)
    };
    *count += 1;
    id
}

/// Convert a heading to a URL-safe slug.
///
/// Non-ASCII letters (CJK included) are kept as-is.
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
