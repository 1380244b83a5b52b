//! Static site generator for folio documentation.
//!
//! Turns a validated site descriptor and a tree of Markdown files into a
//! deployable site: one HTML page per document with the configured nav bar,
//! sidebar and theme extensions, plus assets, a search index and a 404 page.

pub mod assets;
pub mod builder;
pub mod links;
pub mod nav;
pub mod render;
pub mod route;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, CheckReport, StaticBuilder};
pub use links::DeadLink;
