//! Frontmatter extraction and parsing.

use serde::Deserialize;

/// Parsed frontmatter from a Markdown file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Frontmatter {
    /// Page title; the first `# heading` is used when absent
    pub title: Option<String>,

    /// Page description for `<meta name="description">`
    pub description: Option<String>,

    /// Show the "on this page" outline
    pub outline: bool,

    /// Show the edit link
    pub edit_link: bool,

    /// Show the last updated stamp
    pub last_updated: bool,

    /// Render theme extensions such as the comment widget
    pub comments: bool,

    /// Include the page in the search index
    pub search: bool,
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            outline: true,
            edit_link: true,
            last_updated: true,
            comments: true,
            search: true,
        }
    }
}

/// Split a leading `---` delimited YAML block off a document.
///
/// Both delimiters must sit on their own line. A document without an opening
/// delimiter is returned unchanged with `None`.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let body = source.trim_start();

    let mut lines = body.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == "---" => {}
        _ => return Ok((None, source)),
    }

    let mut offset = body.find('\n').map_or(body.len(), |i| i + 1);
    let yaml_start = offset;
    for line in lines {
        if line.trim_end() == "---" {
            let yaml = body[yaml_start..offset].trim();
            let rest = body[offset + line.len()..].trim_start();
            return Ok((Some(parse_yaml(yaml)?), rest));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unclosed)
}

fn parse_yaml(yaml: &str) -> Result<Frontmatter, FrontmatterError> {
    // `---\n---` carries no keys
    if yaml.is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))
}

/// Frontmatter problems, reported with the document path by the caller.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("frontmatter opened with --- but never closed")]
    Unclosed,

    #[error("frontmatter is not valid YAML: {0}")]
    InvalidYaml(String),
}
