//! `[theme]` section: extensions applied on top of the default layout.
//!
//! # Example
//!
//! ```toml
//! [theme.comments]
//! repo = "owner/tutorial"
//! repo_id = "R_kgDOL..."
//! category = "General"
//! category_id = "DIC_kwDOL..."
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EXTRA_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("extra key pattern is valid")
});

/// Theme extension settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Comment widget appended to every page.
    pub comments: Option<CommentsConfig>,
}

/// Named insertion points of the default page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Slot {
    /// Above the document body
    DocBefore,
    /// Below the document body, above the doc footer
    #[default]
    DocAfter,
    /// End of the page layout, after the site footer
    LayoutBottom,
}

impl Slot {
    /// Name used in templates and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocBefore => "doc-before",
            Self::DocAfter => "doc-after",
            Self::LayoutBottom => "layout-bottom",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute value passed through to the widget untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Text(String),
}

/// Payload for the giscus comment widget.
///
/// Values are forwarded to the embed script as `data-*` attributes without
/// local validation; a wrong id only shows up as the widget's own error in
/// the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommentsConfig {
    /// Embed script URL
    pub src: String,
    /// `owner/name` of the discussion repository
    pub repo: Option<String>,
    pub repo_id: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<String>,
    /// Page to discussion mapping (`pathname`, `url`, `title`, ...)
    pub mapping: String,
    pub strict: bool,
    pub reactions_enabled: bool,
    pub emit_metadata: bool,
    pub input_position: String,
    pub theme: String,
    /// Widget UI language; falls back to `site.lang`
    pub lang: Option<String>,
    pub crossorigin: String,
    /// Load the script with the `async` attribute
    pub loading_async: bool,
    /// Where the widget goes in the layout
    pub slot: Slot,
    /// Extra `data-*` attributes, keyed without the `data-` prefix
    pub extra: BTreeMap<String, AttrValue>,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            src: "https://giscus.app/client.js".to_string(),
            repo: None,
            repo_id: None,
            category: None,
            category_id: None,
            mapping: "pathname".to_string(),
            strict: false,
            reactions_enabled: true,
            emit_metadata: false,
            input_position: "bottom".to_string(),
            theme: "preferred_color_scheme".to_string(),
            lang: None,
            crossorigin: "anonymous".to_string(),
            loading_async: true,
            slot: Slot::DocAfter,
            extra: BTreeMap::new(),
        }
    }
}

impl CommentsConfig {
    /// `data-*` names the widget sets from dedicated fields.
    pub const BUILTIN_ATTRIBUTES: [&'static str; 11] = [
        "repo",
        "repo-id",
        "category",
        "category-id",
        "mapping",
        "strict",
        "reactions-enabled",
        "emit-metadata",
        "input-position",
        "theme",
        "lang",
    ];

    /// Whether `key` can be emitted as an extra `data-{key}` attribute.
    pub fn is_valid_extra_key(key: &str) -> bool {
        EXTRA_KEY.is_match(key) && !Self::BUILTIN_ATTRIBUTES.contains(&key)
    }

    /// The configured repository, if it is present and not blank.
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comment_payload() {
        let theme: ThemeConfig = toml::from_str(
            r#"
[comments]
repo = "owner/tutorial"
repo_id = "R_1"
category = "General"
category_id = "DIC_1"
strict = false
lang = "zh-CN"

[comments.extra]
loading = "lazy"
"#,
        )
        .unwrap();

        let comments = theme.comments.unwrap();
        assert_eq!(comments.repo(), Some("owner/tutorial"));
        assert_eq!(comments.mapping, "pathname");
        assert_eq!(comments.slot, Slot::DocAfter);
        assert!(comments.reactions_enabled);
        assert_eq!(
            comments.extra.get("loading"),
            Some(&AttrValue::Text("lazy".to_string()))
        );
    }

    #[test]
    fn blank_repo_counts_as_missing() {
        let comments = CommentsConfig {
            repo: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(comments.repo(), None);
    }

    #[test]
    fn parses_slot_names() {
        let theme: ThemeConfig = toml::from_str("[comments]\nslot = \"layout-bottom\"").unwrap();
        assert_eq!(theme.comments.unwrap().slot, Slot::LayoutBottom);
    }

    #[test]
    fn checks_extra_attribute_names() {
        assert!(CommentsConfig::is_valid_extra_key("loading"));
        assert!(CommentsConfig::is_valid_extra_key("term-2"));
        assert!(!CommentsConfig::is_valid_extra_key("repo"));
        assert!(!CommentsConfig::is_valid_extra_key("category-id"));
        assert!(!CommentsConfig::is_valid_extra_key(r#"x" onload="alert(1)"#));
        assert!(!CommentsConfig::is_valid_extra_key("Loading"));
        assert!(!CommentsConfig::is_valid_extra_key(""));
        assert!(!CommentsConfig::is_valid_extra_key("-x"));
    }

    #[test]
    fn rejects_unknown_widget_keys() {
        let result: Result<ThemeConfig, _> = toml::from_str("[comments]\nrepoo = \"typo\"");
        assert!(result.is_err());
    }
}
