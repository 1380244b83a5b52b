//! Embeddable widgets rendered into layout slots.

use folio_config::{AttrValue, CommentsConfig};

use crate::escape::escape_attr;
use crate::layout::PageContext;

/// A piece of third-party UI placed into a page.
pub trait Widget: Send + Sync {
    /// Widget identifier (e.g., "giscus")
    fn name(&self) -> &'static str;

    /// Markup for one page. Must not fail: a widget that cannot render
    /// returns an empty region instead.
    fn render(&self, page: &PageContext<'_>) -> String;
}

/// giscus discussion thread embedded below the page.
///
/// The widget is an async `<script>` that fetches its UI in the browser. If
/// the script is blocked or the ids are wrong only the comment region stays
/// blank; nothing else on the page depends on it.
#[derive(Debug, Clone)]
pub struct CommentWidget {
    config: CommentsConfig,
    lang: String,
}

impl CommentWidget {
    /// Create the widget; `site_lang` is used when the payload has no `lang`.
    pub fn new(config: CommentsConfig, site_lang: &str) -> Self {
        if config.repo().is_none() {
            tracing::warn!(
                "Comment widget has no repo configured; pages get an empty comment region"
            );
        }

        let lang = config
            .lang
            .clone()
            .unwrap_or_else(|| site_lang.to_string());

        Self { config, lang }
    }

    /// `data-*` attributes in embed order.
    fn attributes(&self, repo: &str) -> Vec<(String, String)> {
        let c = &self.config;
        let mut attrs = vec![("data-repo".to_string(), repo.to_string())];

        let optional = [
            ("data-repo-id", &c.repo_id),
            ("data-category", &c.category),
            ("data-category-id", &c.category_id),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                attrs.push((name.to_string(), value.clone()));
            }
        }

        attrs.push(("data-mapping".to_string(), c.mapping.clone()));
        attrs.push(("data-strict".to_string(), flag(c.strict)));
        attrs.push((
            "data-reactions-enabled".to_string(),
            flag(c.reactions_enabled),
        ));
        attrs.push(("data-emit-metadata".to_string(), flag(c.emit_metadata)));
        attrs.push(("data-input-position".to_string(), c.input_position.clone()));
        attrs.push(("data-theme".to_string(), c.theme.clone()));
        attrs.push(("data-lang".to_string(), self.lang.clone()));

        for (key, value) in &c.extra {
            // Same rule as config validation
            if !CommentsConfig::is_valid_extra_key(key) {
                tracing::warn!("Skipping comment widget attribute data-{:?}", key);
                continue;
            }
            let value = match value {
                AttrValue::Bool(b) => flag(*b),
                AttrValue::Text(s) => s.clone(),
            };
            attrs.push((format!("data-{}", key), value));
        }

        attrs
    }
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

impl Widget for CommentWidget {
    fn name(&self) -> &'static str {
        "giscus"
    }

    fn render(&self, page: &PageContext<'_>) -> String {
        let Some(repo) = self.config.repo().filter(|_| page.comments) else {
            return r#"<div class="giscus-container"></div>"#.to_string();
        };

        let mut script = format!(r#"<script src="{}""#, escape_attr(&self.config.src));
        for (name, value) in self.attributes(repo) {
            script.push_str(&format!(r#" {}="{}""#, name, escape_attr(&value)));
        }
        script.push_str(&format!(
            r#" crossorigin="{}""#,
            escape_attr(&self.config.crossorigin)
        ));
        if self.config.loading_async {
            script.push_str(" async");
        }
        script.push_str("></script>");

        format!(r#"<div class="giscus-container">{}</div>"#, script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn payload() -> CommentsConfig {
        CommentsConfig {
            repo: Some("yourname/openclaw-tutorial".to_string()),
            repo_id: Some("R_kgDOLxXxxxxx".to_string()),
            category: Some("General".to_string()),
            category_id: Some("DIC_kwDOLxxxxxx".to_string()),
            ..Default::default()
        }
    }

    fn page() -> PageContext<'static> {
        PageContext::new("/guide/chapter-01", Path::new("guide/chapter-01.md"), "第1章", "zh-CN")
    }

    #[test]
    fn renders_giscus_embed() {
        let html = CommentWidget::new(payload(), "zh-CN").render(&page());

        assert!(html.starts_with(r#"<div class="giscus-container"><script src="https://giscus.app/client.js""#));
        assert!(html.contains(r#"data-repo="yourname/openclaw-tutorial""#));
        assert!(html.contains(r#"data-repo-id="R_kgDOLxXxxxxx""#));
        assert!(html.contains(r#"data-category="General""#));
        assert!(html.contains(r#"data-category-id="DIC_kwDOLxxxxxx""#));
        assert!(html.contains(r#"data-mapping="pathname""#));
        assert!(html.contains(r#"data-strict="0""#));
        assert!(html.contains(r#"data-reactions-enabled="1""#));
        assert!(html.contains(r#"data-emit-metadata="0""#));
        assert!(html.contains(r#"data-input-position="bottom""#));
        assert!(html.contains(r#"data-theme="preferred_color_scheme""#));
        assert!(html.contains(r#"data-lang="zh-CN""#));
        assert!(html.contains(r#"crossorigin="anonymous" async></script>"#));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn payload_lang_overrides_site_lang() {
        let config = CommentsConfig {
            lang: Some("en".to_string()),
            ..payload()
        };

        let html = CommentWidget::new(config, "zh-CN").render(&page());

        assert!(html.contains(r#"data-lang="en""#));
    }

    #[test]
    fn missing_repo_renders_empty_region() {
        let config = CommentsConfig {
            repo: None,
            ..payload()
        };

        let html = CommentWidget::new(config, "zh-CN").render(&page());

        assert_eq!(html, r#"<div class="giscus-container"></div>"#);
    }

    #[test]
    fn page_opt_out_renders_empty_region() {
        let widget = CommentWidget::new(payload(), "zh-CN");

        let html = widget.render(&page().with_comments(false));

        assert_eq!(html, r#"<div class="giscus-container"></div>"#);
    }

    #[test]
    fn forwards_extra_attributes_and_escapes() {
        let mut config = payload();
        config.category = Some(r#"Q&A "help""#.to_string());
        config
            .extra
            .insert("loading".to_string(), AttrValue::Text("lazy".to_string()));
        config
            .extra
            .insert("term".to_string(), AttrValue::Bool(true));
        config.loading_async = false;

        let html = CommentWidget::new(config, "zh-CN").render(&page());

        assert!(html.contains(r#"data-category="Q&amp;A &quot;help&quot;""#));
        assert!(html.contains(r#"data-loading="lazy""#));
        assert!(html.contains(r#"data-term="1""#));
        assert!(!html.contains(" async"));
    }

    #[test]
    fn extra_keys_cannot_inject_or_override() {
        let mut config = payload();
        config
            .extra
            .insert("repo".to_string(), AttrValue::Text("evil/repo".to_string()));
        config
            .extra
            .insert(r#"x" onload="alert(1)"#.to_string(), AttrValue::Bool(true));

        let html = CommentWidget::new(config, "zh-CN").render(&page());

        assert_eq!(html.matches("data-repo=").count(), 1);
        assert!(!html.contains("evil/repo"));
        assert!(!html.contains("onload"));
    }
}
