//! Internal link resolution and dead-link detection.

use std::collections::BTreeSet;
use std::fmt;

use folio_config::link::strip_fragment;
use folio_config::{LinkKind, SiteConfig};
use folio_markdown::Link;

/// Where a local link points after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A generated page, with the `#fragment` if any
    Page {
        route: String,
        fragment: Option<String>,
    },
    /// A copied static file, by site path
    Asset { path: String },
}

/// A link that does not resolve to anything in the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLink {
    /// Config field or source file the link was found in
    pub source: String,
    pub link: String,
}

impl fmt::Display for DeadLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.link)
    }
}

/// Every route and static file the build will produce.
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    routes: BTreeSet<String>,
    assets: BTreeSet<String>,
}

impl SiteIndex {
    pub fn new(
        routes: impl IntoIterator<Item = String>,
        assets: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            routes: routes.into_iter().collect(),
            assets: assets.into_iter().collect(),
        }
    }

    pub fn contains_route(&self, route: &str) -> bool {
        self.routes.contains(route)
    }

    /// Resolve a local link written on the page at `from_route`.
    ///
    /// Returns `None` for links that are not local (external, anchors) as
    /// well as for dead ones; use [`LinkKind`] to tell them apart.
    pub fn resolve(&self, from_route: &str, link: &str) -> Option<Target> {
        let link = link.trim();
        if !LinkKind::classify(link).is_local() {
            return None;
        }

        let fragment = link
            .find('#')
            .map(|i| link[i + 1..].to_string())
            .filter(|f| !f.is_empty());
        let path = strip_fragment(link);

        if path.is_empty() {
            return Some(Target::Page {
                route: from_route.to_string(),
                fragment,
            });
        }

        let absolute = absolute_path(from_route, path);

        if let Some(route) = self.page_route(&absolute) {
            return Some(Target::Page { route, fragment });
        }

        if self.assets.contains(&absolute) {
            return Some(Target::Asset { path: absolute });
        }

        None
    }

    fn page_route(&self, path: &str) -> Option<String> {
        let stripped = path
            .strip_suffix(".md")
            .or_else(|| path.strip_suffix(".html"))
            .unwrap_or(path);
        let stripped = match stripped.strip_suffix("/index") {
            Some(dir) => format!("{}/", dir),
            None => stripped.to_string(),
        };

        let mut candidates = vec![stripped.clone()];
        if stripped.len() > 1 && stripped.ends_with('/') {
            candidates.push(stripped.trim_end_matches('/').to_string());
        } else if !stripped.ends_with('/') {
            candidates.push(format!("{}/", stripped));
        }

        candidates.into_iter().find(|c| self.routes.contains(c))
    }

    /// Dead internal links declared in `nav` and `sidebar`.
    pub fn check_config(&self, config: &SiteConfig) -> Vec<DeadLink> {
        config
            .internal_links()
            .into_iter()
            .filter(|origin| self.resolve("/", &origin.link).is_none())
            .map(|origin| DeadLink {
                source: format!("config {}", origin.field),
                link: origin.link,
            })
            .collect()
    }

    /// Dead local links and images in one page.
    pub fn check_page(&self, source: &str, route: &str, links: &[Link]) -> Vec<DeadLink> {
        links
            .iter()
            .filter(|l| LinkKind::classify(&l.target).is_local())
            .filter(|l| self.resolve(route, &l.target).is_none())
            .map(|l| DeadLink {
                source: source.to_string(),
                link: l.target.clone(),
            })
            .collect()
    }
}

/// Join a possibly relative path onto the directory of `from_route`.
pub fn absolute_path(from_route: &str, path: &str) -> String {
    let joined = if path.starts_with('/') {
        path.to_string()
    } else {
        let dir = &from_route[..from_route.rfind('/').map_or(0, |i| i + 1)];
        format!("{}{}", dir, path)
    };

    let trailing = joined.ends_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut out = format!("/{}", segments.join("/"));
    if trailing && out.len() > 1 {
        out.push('/');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index() -> SiteIndex {
        SiteIndex::new(
            [
                "/".to_string(),
                "/guide/".to_string(),
                "/guide/chapter-01".to_string(),
                "/guide/chapter-02".to_string(),
                "/faq".to_string(),
            ],
            ["/logo.svg".to_string(), "/guide/arch.png".to_string()],
        )
    }

    fn page(route: &str) -> Option<Target> {
        Some(Target::Page {
            route: route.to_string(),
            fragment: None,
        })
    }

    #[test]
    fn joins_relative_paths() {
        assert_eq!(absolute_path("/guide/chapter-01", "./chapter-02"), "/guide/chapter-02");
        assert_eq!(absolute_path("/guide/chapter-01", "../faq"), "/faq");
        assert_eq!(absolute_path("/guide/", "chapter-01.md"), "/guide/chapter-01.md");
        assert_eq!(absolute_path("/", "guide/"), "/guide/");
        assert_eq!(absolute_path("/guide/a", "../../.."), "/");
    }

    #[test]
    fn resolves_page_links() {
        let index = index();

        assert_eq!(index.resolve("/", "/guide/chapter-01"), page("/guide/chapter-01"));
        assert_eq!(index.resolve("/", "/guide/chapter-01.md"), page("/guide/chapter-01"));
        assert_eq!(index.resolve("/", "/guide/chapter-01.html"), page("/guide/chapter-01"));
        assert_eq!(index.resolve("/", "/guide/chapter-01/"), page("/guide/chapter-01"));
        assert_eq!(index.resolve("/", "/guide"), page("/guide/"));
        assert_eq!(index.resolve("/", "/guide/index.md"), page("/guide/"));
        assert_eq!(index.resolve("/guide/chapter-01", "./chapter-02"), page("/guide/chapter-02"));
        assert_eq!(index.resolve("/", "/"), page("/"));
    }

    #[test]
    fn keeps_fragments() {
        assert_eq!(
            index().resolve("/guide/chapter-01", "../faq#install"),
            Some(Target::Page {
                route: "/faq".to_string(),
                fragment: Some("install".to_string()),
            })
        );
    }

    #[test]
    fn resolves_assets() {
        assert_eq!(
            index().resolve("/guide/chapter-01", "./arch.png"),
            Some(Target::Asset {
                path: "/guide/arch.png".to_string()
            })
        );
        assert_eq!(
            index().resolve("/", "/logo.svg"),
            Some(Target::Asset {
                path: "/logo.svg".to_string()
            })
        );
    }

    #[test]
    fn ignores_non_local_links() {
        assert_eq!(index().resolve("/", "https://github.com"), None);
        assert_eq!(index().resolve("/", "#top"), None);
    }

    #[test]
    fn reports_dead_page_links() {
        let links = vec![
            Link {
                target: "./chapter-02".to_string(),
                image: false,
            },
            Link {
                target: "./chapter-99".to_string(),
                image: false,
            },
            Link {
                target: "https://example.com/missing".to_string(),
                image: false,
            },
            Link {
                target: "./missing.png".to_string(),
                image: true,
            },
        ];

        let dead = index().check_page("guide/chapter-01.md", "/guide/chapter-01", &links);

        assert_eq!(
            dead,
            vec![
                DeadLink {
                    source: "guide/chapter-01.md".to_string(),
                    link: "./chapter-99".to_string(),
                },
                DeadLink {
                    source: "guide/chapter-01.md".to_string(),
                    link: "./missing.png".to_string(),
                },
            ]
        );
    }

    #[test]
    fn reports_dead_config_links() {
        let config = SiteConfig::from_toml(
            r#"
[site]
title = "Docs"

[[nav]]
text = "Home"
link = "/"

[[sidebar]]
text = "基础入门"
items = [
  { text = "第1章", link = "/guide/chapter-01" },
  { text = "第3章", link = "/guide/chapter-03" },
]
"#,
        )
        .unwrap();

        let dead = index().check_config(&config);

        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].link, "/guide/chapter-03");
        assert_eq!(dead[0].to_string(), "config sidebar[0].items[1].link: /guide/chapter-03");
    }
}
