//! Navigation bar, sidebar and prev/next links resolved against the site.

use serde::Serialize;

use folio_config::{LinkKind, NavLink, SiteConfig};

use crate::links::{SiteIndex, Target};
use crate::route::UrlStyle;

/// A link as rendered by the templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub text: String,
    pub href: String,
    /// Opens another site
    pub external: bool,
    /// Points at the page being rendered
    pub active: bool,
}

/// A sidebar section as rendered by the templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarGroup {
    pub text: String,
    pub collapsible: bool,
    pub collapsed: bool,
    pub items: Vec<NavItem>,
}

/// Previous or next page in sidebar order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone)]
struct Entry {
    text: String,
    href: String,
    external: bool,
    /// Page route when the link targets a page of this site
    route: Option<String>,
}

impl Entry {
    fn resolve(link: &NavLink, index: &SiteIndex, urls: &UrlStyle) -> Self {
        let external = LinkKind::classify(&link.link) == LinkKind::External;

        let (href, route) = match index.resolve("/", &link.link) {
            Some(Target::Page { route, fragment }) => {
                let href = match fragment {
                    Some(f) => format!("{}#{}", urls.href(&route), f),
                    None => urls.href(&route),
                };
                (href, Some(route))
            }
            Some(Target::Asset { path }) => (urls.asset_href(&path), None),
            None => (link.link.clone(), None),
        };

        Self {
            text: link.text.clone(),
            href,
            external,
            route,
        }
    }

    fn item(&self, active: bool) -> NavItem {
        NavItem {
            text: self.text.clone(),
            href: self.href.clone(),
            external: self.external,
            active,
        }
    }

    fn matches(&self, route: &str) -> bool {
        self.route.as_deref() == Some(route)
    }
}

#[derive(Debug, Clone)]
struct Section {
    text: String,
    collapsed: Option<bool>,
    entries: Vec<Entry>,
}

/// Site chrome resolved once per build, then specialised per page.
#[derive(Debug, Clone)]
pub struct Navigation {
    nav: Vec<Entry>,
    sidebar: Vec<Section>,
}

impl Navigation {
    /// Resolve `nav` and `sidebar` links to final hrefs.
    pub fn resolve(config: &SiteConfig, index: &SiteIndex, urls: &UrlStyle) -> Self {
        let nav = config
            .nav
            .iter()
            .map(|link| Entry::resolve(link, index, urls))
            .collect();

        let sidebar = config
            .sidebar
            .iter()
            .map(|section| Section {
                text: section.text.clone(),
                collapsed: section.collapsed,
                entries: section
                    .items
                    .iter()
                    .map(|link| Entry::resolve(link, index, urls))
                    .collect(),
            })
            .collect();

        Self { nav, sidebar }
    }

    /// Nav bar for a page. Section links (`/guide/`) stay active below them.
    pub fn nav_for(&self, route: &str) -> Vec<NavItem> {
        self.nav
            .iter()
            .map(|entry| {
                let active = match entry.route.as_deref() {
                    Some(r) if r == route => true,
                    Some(r) => r != "/" && r.ends_with('/') && route.starts_with(r),
                    None => false,
                };
                entry.item(active)
            })
            .collect()
    }

    /// Sidebar for a page; the section holding the page is always expanded.
    pub fn sidebar_for(&self, route: &str) -> Vec<SidebarGroup> {
        self.sidebar
            .iter()
            .map(|section| {
                let items: Vec<NavItem> = section
                    .entries
                    .iter()
                    .map(|e| e.item(e.matches(route)))
                    .collect();
                let has_active = items.iter().any(|i| i.active);

                SidebarGroup {
                    text: section.text.clone(),
                    collapsible: section.collapsed.is_some(),
                    collapsed: section.collapsed.unwrap_or(false) && !has_active,
                    items,
                }
            })
            .collect()
    }

    /// Neighbouring pages of `route` in sidebar reading order.
    pub fn prev_next(&self, route: &str) -> (Option<PageLink>, Option<PageLink>) {
        let pages: Vec<&Entry> = self
            .sidebar
            .iter()
            .flat_map(|s| s.entries.iter())
            .filter(|e| e.route.is_some())
            .collect();

        let Some(pos) = pages.iter().position(|e| e.matches(route)) else {
            return (None, None);
        };

        let link = |e: &&Entry| PageLink {
            text: e.text.clone(),
            href: e.href.clone(),
        };

        let prev = pos.checked_sub(1).and_then(|i| pages.get(i)).map(link);
        let next = pages.get(pos + 1).map(link);
        (prev, next)
    }

    /// Sidebar text for a route, used as a fallback page title.
    pub fn sidebar_text(&self, route: &str) -> Option<&str> {
        self.sidebar
            .iter()
            .flat_map(|s| s.entries.iter())
            .find(|e| e.matches(route))
            .map(|e| e.text.as_str())
    }
}
