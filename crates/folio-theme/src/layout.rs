//! Page layouts and their composition.

use std::collections::BTreeMap;
use std::path::Path;

use folio_config::{Slot, ThemeConfig};

use crate::widget::{CommentWidget, Widget};

/// Read-only page data handed to layouts and widgets.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Site route, e.g. `/guide/chapter-01`
    pub route: &'a str,
    /// Source path relative to the docs directory
    pub relative_path: &'a Path,
    pub title: &'a str,
    /// Site language
    pub lang: &'a str,
    /// Frontmatter opt-in for extensions such as comments
    pub comments: bool,
}

impl<'a> PageContext<'a> {
    pub fn new(route: &'a str, relative_path: &'a Path, title: &'a str, lang: &'a str) -> Self {
        Self {
            route,
            relative_path,
            title,
            lang,
            comments: true,
        }
    }

    /// Same page with extensions turned on or off.
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }
}

/// Output of a layout: the document HTML plus fragments for each slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    /// Document HTML
    pub content: String,
    /// Fragments per slot, in the order they were added
    pub slots: BTreeMap<Slot, Vec<String>>,
}

impl RenderedPage {
    /// Page with content and no slot fragments.
    pub fn new(content: String) -> Self {
        Self {
            content,
            slots: BTreeMap::new(),
        }
    }

    /// Append a fragment to a slot.
    pub fn push(&mut self, slot: Slot, fragment: String) {
        self.slots.entry(slot).or_default().push(fragment);
    }

    /// Concatenated fragments of a slot.
    pub fn slot(&self, slot: Slot) -> String {
        self.slots
            .get(&slot)
            .map(|fragments| fragments.concat())
            .unwrap_or_default()
    }
}

/// A page render function.
pub trait Layout: Send + Sync {
    /// Render the document content of one page.
    fn render(&self, page: &PageContext<'_>, content: String) -> RenderedPage;
}

/// The stock layout: content as-is, every slot empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLayout;

impl Layout for DefaultLayout {
    fn render(&self, _page: &PageContext<'_>, content: String) -> RenderedPage {
        RenderedPage::new(content)
    }
}

impl Layout for Box<dyn Layout> {
    fn render(&self, page: &PageContext<'_>, content: String) -> RenderedPage {
        (**self).render(page, content)
    }
}

/// A layout extended with one widget in one slot.
pub struct Extended<L, W> {
    base: L,
    slot: Slot,
    widget: W,
}

impl<L, W> Extended<L, W> {
    /// The slot this extension renders into.
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

impl<L: Layout, W: Widget> Layout for Extended<L, W> {
    fn render(&self, page: &PageContext<'_>, content: String) -> RenderedPage {
        let mut rendered = self.base.render(page, content);
        rendered.push(self.slot, self.widget.render(page));
        rendered
    }
}

/// Compose a layout with a widget: `render = augment(base, slot, widget)`.
pub fn augment<L: Layout, W: Widget>(base: L, slot: Slot, widget: W) -> Extended<L, W> {
    Extended { base, slot, widget }
}

/// Build the site layout from the `[theme]` section.
pub fn theme_from_config(theme: &ThemeConfig, site_lang: &str) -> Box<dyn Layout> {
    match &theme.comments {
        Some(comments) => {
            tracing::debug!("Theme extended with comment widget in {}", comments.slot);
            Box::new(augment(
                DefaultLayout,
                comments.slot,
                CommentWidget::new(comments.clone(), site_lang),
            ))
        }
        None => Box::new(DefaultLayout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_config::CommentsConfig;
    use pretty_assertions::assert_eq;

    struct Marker(&'static str);

    impl Widget for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }

        fn render(&self, _page: &PageContext<'_>) -> String {
            format!("<aside>{}</aside>", self.0)
        }
    }

    fn page() -> PageContext<'static> {
        PageContext::new(
            "/guide/chapter-01",
            Path::new("guide/chapter-01.md"),
            "第1章",
            "zh-CN",
        )
    }

    #[test]
    fn default_layout_is_identity() {
        let rendered = DefaultLayout.render(&page(), "<p>body</p>".to_string());

        assert_eq!(rendered, RenderedPage::new("<p>body</p>".to_string()));
    }

    #[test]
    fn extension_preserves_content_and_adds_one_region() {
        let content = "<h1>第1章</h1><p>正文</p>".to_string();
        let layout = augment(DefaultLayout, Slot::DocAfter, Marker("comments"));

        let rendered = layout.render(&page(), content.clone());

        assert_eq!(rendered.content, content);
        assert_eq!(rendered.slots.len(), 1);
        assert_eq!(rendered.slots[&Slot::DocAfter], vec!["<aside>comments</aside>"]);
    }

    #[test]
    fn rendering_is_stateless() {
        let layout = augment(DefaultLayout, Slot::DocAfter, Marker("x"));

        let first = layout.render(&page(), "<p>a</p>".to_string());
        let second = layout.render(&page(), "<p>a</p>".to_string());

        assert_eq!(first, second);
        assert_eq!(second.slots[&Slot::DocAfter].len(), 1);
    }

    #[test]
    fn extensions_stack_in_order() {
        let layout = augment(
            augment(DefaultLayout, Slot::DocAfter, Marker("first")),
            Slot::DocAfter,
            Marker("second"),
        );

        let rendered = layout.render(&page(), String::new());

        assert_eq!(
            rendered.slot(Slot::DocAfter),
            "<aside>first</aside><aside>second</aside>"
        );
        assert_eq!(rendered.slot(Slot::DocBefore), "");
    }

    #[test]
    fn builds_default_theme_without_comments() {
        let layout = theme_from_config(&ThemeConfig::default(), "en-US");

        let rendered = layout.render(&page(), "<p>x</p>".to_string());

        assert!(rendered.slots.is_empty());
    }

    #[test]
    fn builds_comment_theme_from_config() {
        let theme = ThemeConfig {
            comments: Some(CommentsConfig {
                repo: Some("owner/tutorial".to_string()),
                ..Default::default()
            }),
        };
        let layout = theme_from_config(&theme, "zh-CN");

        let rendered = layout.render(&page(), "<p>x</p>".to_string());
        let region = rendered.slot(Slot::DocAfter);

        assert_eq!(rendered.content, "<p>x</p>");
        assert_eq!(region.matches("giscus-container").count(), 1);
        assert!(region.contains(r#"data-lang="zh-CN""#));
    }
}
