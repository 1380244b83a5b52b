//! Markdown parser for folio content.
//!
//! This crate reads a Markdown document, extracts its YAML frontmatter, and
//! collects what the site generator needs besides the HTML itself: the
//! heading outline, outbound links and plain text for the search index.

pub mod codeblock;
pub mod frontmatter;
pub mod parser;

pub use codeblock::{FenceInfo, LineNumbers};
pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use parser::{markdown_options, parse_document, slugify, Link, ParseError, ParsedDoc, TocEntry};
