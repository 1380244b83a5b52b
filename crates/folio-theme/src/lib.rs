//! Theme composition for folio pages.
//!
//! The default layout renders a document's content unchanged. Extensions are
//! added by explicit composition: [`augment`] wraps a layout so that one
//! [`Widget`] is rendered into a named [`Slot`] after the base layout runs.
//!
//! ```
//! use std::path::Path;
//! use folio_theme::{augment, DefaultLayout, Layout, PageContext, Slot, Widget};
//!
//! struct Banner;
//!
//! impl Widget for Banner {
//!     fn name(&self) -> &'static str {
//!         "banner"
//!     }
//!
//!     fn render(&self, _page: &PageContext<'_>) -> String {
//!         "<p>beta</p>".to_string()
//!     }
//! }
//!
//! let layout = augment(DefaultLayout, Slot::DocBefore, Banner);
//! let page = PageContext::new("/", Path::new("index.md"), "Home", "en-US");
//! let rendered = layout.render(&page, "<h1>Home</h1>".to_string());
//!
//! assert_eq!(rendered.content, "<h1>Home</h1>");
//! assert_eq!(rendered.slot(Slot::DocBefore), "<p>beta</p>");
//! ```

mod escape;
pub mod layout;
pub mod widget;

pub use folio_config::Slot;
pub use layout::{augment, theme_from_config, DefaultLayout, Extended, Layout, PageContext, RenderedPage};
pub use widget::{CommentWidget, Widget};
