//! Markdown to HTML for page bodies.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Parser, Tag, TagEnd};

use folio_markdown::{markdown_options, FenceInfo, TocEntry};

use crate::links::{SiteIndex, Target};
use crate::route::UrlStyle;

/// Per-page inputs of the Markdown renderer.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Route of the page being rendered, for relative links
    pub route: &'a str,
    pub index: &'a SiteIndex,
    pub urls: &'a UrlStyle,
    /// Site-wide `markdown.line_numbers`
    pub line_numbers: bool,
}

/// Render a page body.
///
/// Headings get the ids computed by the parser, local links are rewritten to
/// final hrefs and fenced code blocks are wrapped for the default theme.
pub fn render_markdown(content: &str, toc: &[TocEntry], opts: &RenderOptions<'_>) -> String {
    let mut events = Vec::new();
    let mut heading = 0;
    let mut code: Option<(FenceInfo, String)> = None;

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => FenceInfo::parse(&info),
                    CodeBlockKind::Indented => FenceInfo::default(),
                };
                code = Some((info, String::new()));
            }

            Event::Text(text) if code.is_some() => {
                if let Some((_, ref mut source)) = code {
                    source.push_str(&text);
                }
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, source)) = code.take() {
                    let html = code_block_html(&info, &source, opts.line_numbers);
                    events.push(Event::Html(CowStr::from(html)));
                }
            }

            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let id = toc
                    .get(heading)
                    .map(|e| CowStr::from(e.id.clone()))
                    .or(id);
                events.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }

            Event::End(TagEnd::Heading(level)) => {
                if let Some(entry) = toc.get(heading) {
                    events.push(Event::Html(CowStr::from(format!(
                        r##" <a class="header-anchor" href="#{}" aria-hidden="true">#</a>"##,
                        escape_html(&entry.id)
                    ))));
                }
                heading += 1;
                events.push(Event::End(TagEnd::Heading(level)));
            }

            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = rewrite(&dest_url, opts).map_or(dest_url, CowStr::from);
                events.push(Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }));
            }

            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = rewrite(&dest_url, opts).map_or(dest_url, CowStr::from);
                events.push(Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }));
            }

            other => events.push(other),
        }
    }

    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());
    output
}

/// Final href for a local link, `None` to leave it untouched.
fn rewrite(link: &str, opts: &RenderOptions<'_>) -> Option<String> {
    match opts.index.resolve(opts.route, link)? {
        Target::Page { route, fragment } => {
            let href = opts.urls.href(&route);
            Some(match fragment {
                Some(fragment) => format!("{}#{}", href, fragment),
                None => href,
            })
        }
        Target::Asset { path } => Some(opts.urls.asset_href(&path)),
    }
}

fn code_block_html(info: &FenceInfo, source: &str, site_line_numbers: bool) -> String {
    let class = escape_html(
        &info
            .language_class()
            .unwrap_or_else(|| "language-text".to_string()),
    );
    let start = info.line_numbers.resolve(site_line_numbers);

    let mut html = format!(
        r#"<div class="code-block {}{}">"#,
        class,
        if start.is_some() { " line-numbers-mode" } else { "" }
    );

    if let Some(title) = &info.title {
        html.push_str(&format!(
            r#"<div class="code-title">{}</div>"#,
            escape_html(title)
        ));
    }

    html.push_str(&format!(
        r#"<pre><code class="{}">{}</code></pre>"#,
        class,
        escape_html(source)
    ));

    if let Some(start) = start {
        let count = source.lines().count().max(1);
        html.push_str(r#"<div class="line-numbers" aria-hidden="true">"#);
        for n in start..start.saturating_add(count) {
            html.push_str(&format!("<span>{}</span>", n));
        }
        html.push_str("</div>");
    }

    html.push_str("</div>\n");
    html
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_markdown::parse_document;

    fn render(source: &str, line_numbers: bool, clean: bool) -> String {
        let doc = parse_document(source).unwrap();
        let index = SiteIndex::new(
            [
                "/".to_string(),
                "/guide/chapter-01".to_string(),
                "/guide/chapter-02".to_string(),
            ],
            ["/guide/arch.png".to_string()],
        );
        let urls = UrlStyle::new("/", clean);
        let opts = RenderOptions {
            route: "/guide/chapter-01",
            index: &index,
            urls: &urls,
            line_numbers,
        };
        render_markdown(&doc.content, &doc.toc, &opts)
    }

    #[test]
    fn renders_heading_ids_and_anchors() {
        let html = render("# 网关架构\n\n## Setup\n\n## Setup", false, true);

        assert!(html.contains(r##"<h1 id="网关架构">网关架构 <a class="header-anchor" href="#网关架构""##));
        assert!(html.contains(r#"<h2 id="setup">"#));
        assert!(html.contains(r#"<h2 id="setup-1">"#));
    }

    #[test]
    fn rewrites_local_links() {
        let html = render(
            "[next](./chapter-02#install) [home](/) [ext](https://x.dev) ![arch](./arch.png)",
            false,
            false,
        );

        assert!(html.contains(r#"href="/guide/chapter-02.html#install""#));
        assert!(html.contains(r#"href="/""#));
        assert!(html.contains(r#"href="https://x.dev""#));
        assert!(html.contains(r#"src="/guide/arch.png""#));
    }

    #[test]
    fn leaves_unresolved_links_alone() {
        let html = render("[gone](./missing)", false, true);
        assert!(html.contains(r#"href="./missing""#));
    }

    #[test]
    fn numbers_code_lines_when_enabled() {
        let html = render("```rust\nfn main() {}\nlet x = 1;\n```", true, true);

        assert!(html.contains(r#"<div class="code-block language-rust line-numbers-mode">"#));
        assert!(html.contains(r#"<code class="language-rust">fn main() {}"#));
        assert!(html.contains("<span>1</span><span>2</span></div>"));
        assert!(!html.contains("<span>3</span>"));
    }

    #[test]
    fn block_modifiers_override_site_setting() {
        let off = render("```bash:no-line-numbers\nls\n```", true, true);
        assert!(!off.contains("line-numbers-mode"));

        let on = render("```ts:line-numbers=10 [app.ts]\na\nb\n```", false, true);
        assert!(on.contains(r#"<div class="code-title">app.ts</div>"#));
        assert!(on.contains("<span>10</span><span>11</span>"));
    }

    #[test]
    fn escapes_code() {
        let html = render("```html\n<div class=\"x\">&</div>\n```", false, true);
        assert!(html.contains("&lt;div class=&quot;x&quot;&gt;&amp;&lt;/div&gt;"));
    }

    #[test]
    fn huge_start_line_does_not_overflow() {
        let html = render("```rust:line-numbers=18446744073709551615\na\nb\n```", false, true);

        assert!(html.contains("line-numbers-mode"));
        assert!(html.contains("<span>1000000000</span><span>1000000001</span></div>"));
    }
}
