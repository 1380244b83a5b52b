//! Semantic validation of a parsed descriptor.

use std::collections::HashMap;

use crate::error::Violation;
use crate::link::{strip_fragment, LinkKind};
use crate::site::{NavLink, SiteConfig};
use crate::theme::CommentsConfig;

/// Collect every problem in the descriptor.
pub(crate) fn validate(config: &SiteConfig) -> Vec<Violation> {
    let mut out = Vec::new();

    if config.site.title.trim().is_empty() {
        out.push(Violation::new("site.title", "must not be empty"));
    }

    if config.site.lang.trim().is_empty() {
        out.push(Violation::new("site.lang", "must not be empty"));
    }

    let base = &config.site.base;
    if !base.starts_with('/') || !base.ends_with('/') {
        out.push(Violation::new(
            "site.base",
            format!("must start and end with '/', got {:?}", base),
        ));
    }

    for (i, tag) in config.site.head.iter().enumerate() {
        if tag.tag.trim().is_empty() {
            out.push(Violation::new(format!("site.head[{}].tag", i), "must not be empty"));
        }
    }

    for (i, item) in config.nav.iter().enumerate() {
        check_link(&mut out, &format!("nav[{}]", i), item);
    }

    let mut seen: HashMap<&str, String> = HashMap::new();
    for (s, section) in config.sidebar.iter().enumerate() {
        let field = format!("sidebar[{}]", s);

        if section.text.trim().is_empty() {
            out.push(Violation::new(format!("{}.text", field), "must not be empty"));
        }
        if section.items.is_empty() {
            out.push(Violation::new(
                format!("{}.items", field),
                "section has no items",
            ));
        }

        for (i, item) in section.items.iter().enumerate() {
            let item_field = format!("{}.items[{}]", field, i);
            check_link(&mut out, &item_field, item);

            if LinkKind::classify(&item.link) == LinkKind::Internal {
                let target = normalize(&item.link);
                if let Some(first) = seen.get(target) {
                    out.push(Violation::new(
                        format!("{}.link", item_field),
                        format!("{} is already listed at {}", item.link, first),
                    ));
                } else {
                    seen.insert(target, format!("{}.link", item_field));
                }
            }
        }
    }

    if let Some(edit) = &config.edit_link {
        if !edit.pattern.contains(":path") {
            out.push(Violation::new(
                "edit_link.pattern",
                "must contain the :path placeholder",
            ));
        }
    }

    for (i, social) in config.social_links.iter().enumerate() {
        if social.icon.trim().is_empty() {
            out.push(Violation::new(
                format!("social_links[{}].icon", i),
                "must not be empty",
            ));
        }
        if social.link.trim().is_empty() {
            out.push(Violation::new(
                format!("social_links[{}].link", i),
                "must not be empty",
            ));
        }
    }

    if let Some(comments) = &config.theme.comments {
        for key in comments.extra.keys() {
            if !CommentsConfig::is_valid_extra_key(key) {
                out.push(Violation::new(
                    format!("theme.comments.extra.{:?}", key),
                    "must be lowercase letters, digits and single dashes, and not a built-in widget attribute",
                ));
            }
        }
    }

    if let Some(sitemap) = &config.sitemap {
        if LinkKind::classify(&sitemap.hostname) != LinkKind::External {
            out.push(Violation::new(
                "sitemap.hostname",
                format!("must be an absolute URL, got {:?}", sitemap.hostname),
            ));
        }
    }

    out
}

fn check_link(out: &mut Vec<Violation>, field: &str, item: &NavLink) {
    if item.text.trim().is_empty() {
        out.push(Violation::new(format!("{}.text", field), "must not be empty"));
    }

    let link = item.link.trim();
    if link.is_empty() {
        out.push(Violation::new(format!("{}.link", field), "must not be empty"));
        return;
    }

    if LinkKind::classify(link) == LinkKind::Relative {
        out.push(Violation::new(
            format!("{}.link", field),
            format!("must be site-absolute (start with '/') or external, got {:?}", link),
        ));
    }
}

/// Strip fragment, `.html`/`.md` suffix and trailing slash (except root).
fn normalize(link: &str) -> &str {
    let path = strip_fragment(link.trim());
    let path = path
        .strip_suffix(".html")
        .or_else(|| path.strip_suffix(".md"))
        .unwrap_or(path);
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use crate::{ConfigError, SiteConfig};

    fn violations(source: &str) -> Vec<String> {
        match SiteConfig::from_toml(source) {
            Err(ConfigError::Invalid(v)) => v.into_iter().map(|v| v.field).collect(),
            Ok(_) => Vec::new(),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accepts_minimal_site() {
        assert!(violations("nav = []\nsidebar = []\n[site]\ntitle = \"Docs\"").is_empty());
    }

    #[test]
    fn rejects_blank_title() {
        let fields = violations("nav = []\nsidebar = []\n[site]\ntitle = \"  \"");
        assert_eq!(fields, vec!["site.title"]);
    }

    #[test]
    fn rejects_malformed_base() {
        let fields = violations("nav = []\nsidebar = []\n[site]\ntitle = \"Docs\"\nbase = \"docs\"");
        assert_eq!(fields, vec!["site.base"]);
    }

    #[test]
    fn reports_all_link_problems_together() {
        let fields = violations(
            r#"
sidebar = []

[site]
title = "Docs"

[[nav]]
text = ""
link = "/"

[[nav]]
text = "Guide"
link = "guide/intro"

[[nav]]
text = "Blank"
link = ""
"#,
        );

        assert_eq!(fields, vec!["nav[0].text", "nav[1].link", "nav[2].link"]);
    }

    #[test]
    fn rejects_duplicate_sidebar_entries() {
        let fields = violations(
            r#"
nav = []

[site]
title = "Docs"

[[sidebar]]
text = "Basics"
items = [
  { text = "One", link = "/guide/one" },
  { text = "One again", link = "/guide/one.html" },
]
"#,
        );

        assert_eq!(fields, vec!["sidebar[0].items[1].link"]);
    }

    #[test]
    fn rejects_empty_section() {
        let fields = violations(
            "nav = []\n[site]\ntitle = \"Docs\"\n[[sidebar]]\ntext = \"Empty\"\nitems = []",
        );
        assert_eq!(fields, vec!["sidebar[0].items"]);
    }

    #[test]
    fn edit_pattern_needs_placeholder() {
        let fields = violations(
            "nav = []\nsidebar = []\n[site]\ntitle = \"Docs\"\n[edit_link]\npattern = \"https://github.com/a/b/edit/main/docs\"",
        );
        assert_eq!(fields, vec!["edit_link.pattern"]);
    }

    #[test]
    fn sitemap_needs_absolute_hostname() {
        let fields = violations(
            "nav = []\nsidebar = []\n[site]\ntitle = \"Docs\"\n[sitemap]\nhostname = \"docs.example.com\"",
        );
        assert_eq!(fields, vec!["sitemap.hostname"]);
    }

    #[test]
    fn rejects_unsafe_or_builtin_extra_keys() {
        let fields = violations(
            r#"
nav = []
sidebar = []

[site]
title = "Docs"

[theme.comments]
repo = "a/b"

[theme.comments.extra]
loading = "lazy"
repo = "evil/repo"
'x" onload="alert(1)' = true
"#,
        );

        assert_eq!(
            fields,
            vec![
                "theme.comments.extra.\"repo\"",
                r#"theme.comments.extra."x\" onload=\"alert(1)""#,
            ]
        );
    }

    #[test]
    fn external_links_are_allowed() {
        let fields = violations(
            "sidebar = []\n[site]\ntitle = \"Docs\"\n[[nav]]\ntext = \"GitHub\"\nlink = \"https://github.com\"",
        );
        assert!(fields.is_empty());
    }
}
