//! Site descriptor for folio documentation sites.
//!
//! Parses `folio.toml` with serde and validates it before anything is built.
//! The descriptor is loaded once per build and treated as an immutable value;
//! callers pass it by reference (or behind an `Arc`) to everything that
//! renders pages.
//!
//! Malformed input fails loudly: unknown keys, missing required keys
//! (`site.title`, `nav`, `sidebar`) and semantic violations such as an edit
//! link pattern without `:path` are all reported as [`ConfigError`].

mod error;
pub mod link;
pub mod site;
pub mod theme;
mod validate;

pub use error::{ConfigError, Violation};
pub use link::LinkKind;
pub use site::{
    BuildSettings, DocsSettings, EditLink, Footer, HeadTag, Labels, LinkOrigin, LoadedConfig,
    MarkdownSettings, NavLink, SearchButtonTranslations, SearchConfig, SearchFooterTranslations,
    SearchModalTranslations, SearchProvider, SearchTranslations, SidebarSection, SiteConfig,
    SiteMeta, SitemapConfig, SocialLink,
};
pub use theme::{AttrValue, CommentsConfig, Slot, ThemeConfig};

/// Configuration filename looked up by default.
pub const CONFIG_FILENAME: &str = "folio.toml";
