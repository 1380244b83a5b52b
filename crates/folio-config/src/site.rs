//! The site descriptor and its sections.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::link::LinkKind;
use crate::theme::ThemeConfig;
use crate::validate::validate;

/// Complete site descriptor (`folio.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Site metadata. Required, `title` has no default.
    pub site: SiteMeta,

    /// Source and output locations.
    #[serde(default)]
    pub docs: DocsSettings,

    /// Top navigation bar. The key is required, it may be empty.
    pub nav: Vec<NavLink>,

    /// Sidebar sections. The key is required, it may be empty.
    pub sidebar: Vec<SidebarSection>,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub footer: Option<Footer>,

    #[serde(default)]
    pub edit_link: Option<EditLink>,

    #[serde(default)]
    pub social_links: Vec<SocialLink>,

    #[serde(default)]
    pub labels: Labels,

    #[serde(default)]
    pub markdown: MarkdownSettings,

    #[serde(default)]
    pub build: BuildSettings,

    #[serde(default)]
    pub sitemap: Option<SitemapConfig>,

    #[serde(default)]
    pub theme: ThemeConfig,
}

/// `[site]` metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Value of `<html lang>`
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Public base path the site is served under
    #[serde(default = "default_base")]
    pub base: String,

    /// Logo shown next to the title in the nav bar
    #[serde(default)]
    pub logo: Option<String>,

    /// Extra elements injected into `<head>`
    #[serde(default)]
    pub head: Vec<HeadTag>,

    /// Emit `route/index.html` and link without the `.html` extension
    #[serde(default)]
    pub clean_urls: bool,

    /// Show the source file modification time on each page
    #[serde(default)]
    pub last_updated: bool,
}

fn default_lang() -> String {
    "en-US".to_string()
}

fn default_base() -> String {
    "/".to_string()
}

/// An element for `<head>`, e.g. `{ tag = "link", attrs = { rel = "icon", href = "/favicon.ico" } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadTag {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

/// `[docs]` locations, relative to the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsSettings {
    /// Markdown source directory
    pub dir: String,
    /// Build output directory
    pub output: String,
    /// Static files copied verbatim, relative to `dir`
    pub public: String,
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self {
            dir: "docs".to_string(),
            output: "dist".to_string(),
            public: "public".to_string(),
        }
    }
}

/// A `{ text, link }` entry used by the nav bar and sidebar items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub text: String,
    pub link: String,
}

/// A titled group of sidebar links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarSection {
    pub text: String,
    /// `None` renders a fixed section; `Some(true)` starts collapsed.
    #[serde(default)]
    pub collapsed: Option<bool>,
    pub items: Vec<NavLink>,
}

/// Search provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    /// Client-side search over a generated index
    #[default]
    Local,
    /// No search UI, no index
    None,
}

/// `[search]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub provider: SearchProvider,
    pub translations: SearchTranslations,
}

/// Localized strings of the search widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchTranslations {
    pub button: SearchButtonTranslations,
    pub modal: SearchModalTranslations,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchButtonTranslations {
    pub button_text: String,
    pub button_aria_label: String,
}

impl Default for SearchButtonTranslations {
    fn default() -> Self {
        Self {
            button_text: "Search".to_string(),
            button_aria_label: "Search".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchModalTranslations {
    pub no_results_text: String,
    pub reset_button_title: String,
    pub footer: SearchFooterTranslations,
}

impl Default for SearchModalTranslations {
    fn default() -> Self {
        Self {
            no_results_text: "No results for".to_string(),
            reset_button_title: "Reset search".to_string(),
            footer: SearchFooterTranslations::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchFooterTranslations {
    pub select_text: String,
    pub navigate_text: String,
    pub close_text: String,
}

impl Default for SearchFooterTranslations {
    fn default() -> Self {
        Self {
            select_text: "to select".to_string(),
            navigate_text: "to navigate".to_string(),
            close_text: "to close".to_string(),
        }
    }
}

/// Site footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Footer {
    pub message: String,
    pub copyright: String,
}

/// "Edit this page" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditLink {
    /// URL template, `:path` is replaced with the source path under `docs.dir`
    pub pattern: String,
    #[serde(default = "default_edit_text")]
    pub text: String,
}

fn default_edit_text() -> String {
    "Edit this page".to_string()
}

impl EditLink {
    /// Edit URL for a source file, given relative to the docs directory.
    pub fn url_for(&self, relative_path: &Path) -> String {
        let path = relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        self.pattern.replace(":path", &path)
    }
}

/// Icon link in the nav bar (`github`, `discord`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub icon: String,
    pub link: String,
}

/// UI labels of the default layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub outline: String,
    pub prev: String,
    pub next: String,
    pub return_to_top: String,
    pub sidebar_menu: String,
    pub dark_mode_switch: String,
    pub light_mode_switch_title: String,
    pub dark_mode_switch_title: String,
    pub last_updated: String,
    pub not_found: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            outline: "On this page".to_string(),
            prev: "Previous page".to_string(),
            next: "Next page".to_string(),
            return_to_top: "Return to top".to_string(),
            sidebar_menu: "Menu".to_string(),
            dark_mode_switch: "Appearance".to_string(),
            light_mode_switch_title: "Switch to light theme".to_string(),
            dark_mode_switch_title: "Switch to dark theme".to_string(),
            last_updated: "Last updated".to_string(),
            not_found: "Page not found".to_string(),
        }
    }
}

/// `[markdown]` rendering options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownSettings {
    /// Number lines of fenced code blocks
    pub line_numbers: bool,
}

/// `[build]` options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    pub minify: bool,
    /// Downgrade dead internal links from errors to warnings
    pub ignore_dead_links: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: true,
            ignore_dead_links: false,
        }
    }
}

/// `[sitemap]` options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Absolute origin, e.g. `https://docs.example.com`
    pub hostname: String,
}

/// An internal link declared in the descriptor, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOrigin {
    /// Dotted field path (`sidebar[0].items[1].link`)
    pub field: String,
    pub link: String,
}

impl SiteConfig {
    /// Parse and validate a descriptor from TOML text.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::parse(source, "site config")
    }

    fn parse(source: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(source).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a descriptor file.
    pub fn load(path: &Path) -> Result<LoadedConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!("Loaded site config from {}", path.display());

        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(LoadedConfig {
            config,
            config_path: path.to_path_buf(),
            root,
        })
    }

    /// Run semantic checks, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let violations = validate(self);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(violations))
        }
    }

    /// Sidebar items flattened in reading order.
    pub fn sidebar_links(&self) -> impl Iterator<Item = &NavLink> {
        self.sidebar.iter().flat_map(|section| section.items.iter())
    }

    /// Every site-internal link in `nav` and `sidebar`.
    pub fn internal_links(&self) -> Vec<LinkOrigin> {
        let nav = self.nav.iter().enumerate().map(|(i, item)| LinkOrigin {
            field: format!("nav[{}].link", i),
            link: item.link.clone(),
        });

        let sidebar = self.sidebar.iter().enumerate().flat_map(|(s, section)| {
            section
                .items
                .iter()
                .enumerate()
                .map(move |(i, item)| LinkOrigin {
                    field: format!("sidebar[{}].items[{}].link", s, i),
                    link: item.link.clone(),
                })
        });

        nav.chain(sidebar)
            .filter(|origin| LinkKind::classify(&origin.link) == LinkKind::Internal)
            .collect()
    }
}

/// A validated descriptor together with where it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SiteConfig,
    /// Path of the descriptor file
    pub config_path: PathBuf,
    /// Directory the descriptor lives in; other paths are relative to it
    pub root: PathBuf,
}

impl LoadedConfig {
    /// Markdown source directory.
    pub fn docs_dir(&self) -> PathBuf {
        self.root.join(&self.config.docs.dir)
    }

    /// Build output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.docs.output)
    }

    /// Static files directory.
    pub fn public_dir(&self) -> PathBuf {
        self.docs_dir().join(&self.config.docs.public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const TUTORIAL: &str = r#"
[site]
title = "OpenClaw 学习教程"
description = "从入门到企业级的 OpenClaw 完整学习指南"
lang = "zh-CN"
clean_urls = true

[[site.head]]
tag = "link"
attrs = { rel = "icon", href = "/favicon.ico" }

[[nav]]
text = "首页"
link = "/"

[[nav]]
text = "教程"
link = "/guide/chapter-01"

[[sidebar]]
text = "基础入门"
collapsed = false

[[sidebar.items]]
text = "第1章：OpenClaw概览"
link = "/guide/chapter-01"

[[sidebar.items]]
text = "第2章：环境搭建与安装"
link = "/guide/chapter-02"

[search.translations.button]
button_text = "搜索文档"
button_aria_label = "搜索文档"

[search.translations.modal]
no_results_text = "无法找到相关结果"

[footer]
message = "Released under the MIT License."
copyright = "Copyright © 2024 OpenClaw Tutorial"

[edit_link]
pattern = "https://github.com/owner/tutorial/edit/main/docs/:path"
text = "在 GitHub 上编辑此页"

[[social_links]]
icon = "github"
link = "https://github.com/openclaw/openclaw"
"#;

    #[test]
    fn parses_tutorial_site() {
        let config = SiteConfig::from_toml(TUTORIAL).unwrap();

        assert_eq!(config.site.title, "OpenClaw 学习教程");
        assert_eq!(config.site.lang, "zh-CN");
        assert_eq!(config.site.base, "/");
        assert!(config.site.clean_urls);
        assert_eq!(config.site.head[0].attrs["href"], "/favicon.ico");
        assert_eq!(config.nav.len(), 2);
        assert_eq!(config.sidebar[0].text, "基础入门");
        assert_eq!(config.sidebar[0].collapsed, Some(false));
        assert_eq!(config.search.provider, SearchProvider::Local);
        assert_eq!(config.search.translations.button.button_text, "搜索文档");
        assert_eq!(
            config.search.translations.modal.no_results_text,
            "无法找到相关结果"
        );
        // Unset keys keep their defaults
        assert_eq!(config.search.translations.modal.footer.close_text, "to close");
        assert_eq!(config.social_links[0].icon, "github");
        assert!(config.build.minify);
    }

    #[test]
    fn requires_title() {
        let err = SiteConfig::from_toml("nav = []\nsidebar = []\n[site]\nlang = \"en\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn requires_navigation_structure() {
        let err = SiteConfig::from_toml("nav = []\n[site]\ntitle = \"Docs\"").unwrap_err();
        match err {
            ConfigError::Parse { message, .. } => assert!(message.contains("sidebar")),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn rejects_unknown_keys() {
        let source = "nav = []\nsidebar = []\n[site]\ntitle = \"Docs\"\ntitel = \"typo\"";
        assert!(matches!(
            SiteConfig::from_toml(source),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_tables() {
        let source = r#"
nav = []
sidebar = []
[site]
title = "Docs"
[theme.comments]
repo = "a/b"
[theme.comments]
repo = "c/d"
"#;
        assert!(matches!(
            SiteConfig::from_toml(source),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn flattens_sidebar_in_order() {
        let config = SiteConfig::from_toml(TUTORIAL).unwrap();
        let links: Vec<_> = config.sidebar_links().map(|l| l.link.as_str()).collect();
        assert_eq!(links, vec!["/guide/chapter-01", "/guide/chapter-02"]);
    }

    #[test]
    fn collects_internal_links_only() {
        let config = SiteConfig::from_toml(TUTORIAL).unwrap();
        let links = config.internal_links();

        assert_eq!(links.len(), 4);
        assert_eq!(links[0].field, "nav[0].link");
        assert_eq!(links[3].field, "sidebar[0].items[1].link");
        assert!(links.iter().all(|l| !l.link.starts_with("https://")));
    }

    #[test]
    fn builds_edit_urls() {
        let config = SiteConfig::from_toml(TUTORIAL).unwrap();
        let edit = config.edit_link.unwrap();

        assert_eq!(
            edit.url_for(Path::new("guide/chapter-01.md")),
            "https://github.com/owner/tutorial/edit/main/docs/guide/chapter-01.md"
        );
    }

    #[test]
    fn loads_relative_to_config_dir() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("folio.toml");
        fs::write(&path, TUTORIAL).unwrap();

        let loaded = SiteConfig::load(&path).unwrap();

        assert_eq!(loaded.root, temp.path());
        assert_eq!(loaded.docs_dir(), temp.path().join("docs"));
        assert_eq!(loaded.output_dir(), temp.path().join("dist"));
        assert_eq!(loaded.public_dir(), temp.path().join("docs").join("public"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempdir().unwrap();
        let err = SiteConfig::load(&temp.path().join("folio.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
