//! Static site builder.

use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use rayon::prelude::*;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use walkdir::{DirEntry, WalkDir};

use folio_config::{ConfigError, HeadTag, LoadedConfig, SearchProvider, SiteConfig};
use folio_markdown::{parse_document, ParsedDoc};
use folio_theme::{theme_from_config, Layout, PageContext, Slot};

use crate::assets::AssetPipeline;
use crate::links::{DeadLink, SiteIndex};
use crate::nav::Navigation;
use crate::render::{escape_html, render_markdown, RenderOptions};
use crate::route::{asset_path_for, route_for, UrlStyle};
use crate::templates::{PageView, SearchView, SiteView, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Validated site descriptor
    pub site: Arc<SiteConfig>,

    /// Markdown source directory
    pub docs_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Static files copied to the output root
    pub public_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Script URL injected into every page by the dev server
    pub live_reload: Option<String>,
}

impl BuildConfig {
    /// Paths and options of a loaded descriptor.
    pub fn from_loaded(loaded: &LoadedConfig) -> Self {
        Self {
            site: Arc::new(loaded.config.clone()),
            docs_dir: loaded.docs_dir(),
            output_dir: loaded.output_dir(),
            public_dir: loaded.public_dir(),
            minify: loaded.config.build.minify,
            live_reload: None,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of static files copied
    pub files: usize,

    /// Dead links downgraded to warnings
    pub dead_links: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Result of a dry run.
#[derive(Debug)]
pub struct CheckReport {
    /// Number of pages discovered
    pub pages: usize,

    /// Every dead internal link, config first
    pub dead_links: Vec<DeadLink>,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Docs directory not found: {0}")]
    DocsNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Output directory {0} contains the docs directory and cannot be cleared")]
    OutputContainsDocs(PathBuf),

    #[error("{first} and {second} both generate {output}")]
    RouteConflict {
        output: String,
        first: String,
        second: String,
    },

    #[error("Found {} dead link(s):\n{}", .0.len(), list(.0))]
    DeadLinks(Vec<DeadLink>),

    #[error("Failed to render template: {0}")]
    Template(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn list(links: &[DeadLink]) -> String {
    links
        .iter()
        .map(|l| format!("  - {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A page to be built.
#[derive(Debug)]
struct Page {
    /// Relative path from docs dir
    relative_path: PathBuf,

    route: String,

    /// Output path
    output_path: PathBuf,

    /// Parsed document
    doc: ParsedDoc,

    /// Source modification time
    modified: Option<SystemTime>,
}

/// A file copied verbatim.
#[derive(Debug)]
struct StaticFile {
    source: PathBuf,
    site_path: String,
}

#[derive(Debug, Default)]
struct Discovery {
    pages: Vec<Page>,
    files: Vec<StaticFile>,
}

/// Search index record.
#[derive(Debug, Serialize)]
struct SearchEntry<'a> {
    title: String,
    description: &'a str,
    url: String,
    headings: Vec<&'a str>,
    content: &'a str,
}

/// Elements written without a closing tag.
const VOID_ELEMENTS: &[&str] = &["base", "link", "meta"];

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    urls: UrlStyle,
    layout: Box<dyn Layout>,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        let site = &config.site.site;
        let urls = UrlStyle::new(site.base.clone(), site.clean_urls);
        let layout = theme_from_config(&config.site.theme, &site.lang);

        Self {
            config,
            urls,
            layout,
            templates: TemplateEngine::new(),
        }
    }

    /// Load a descriptor file and create a builder for it.
    pub fn load(config_path: &Path) -> Result<Self, BuildError> {
        let loaded = SiteConfig::load(config_path)?;
        Ok(Self::new(BuildConfig::from_loaded(&loaded)))
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let site = &self.config.site;

        let discovery = self.discover()?;
        let index = self.site_index(&discovery);

        let dead = self.dead_links(&discovery.pages, &index);
        if !dead.is_empty() {
            if !site.build.ignore_dead_links {
                return Err(BuildError::DeadLinks(dead));
            }
            for link in &dead {
                tracing::warn!("Dead link in {}", link);
            }
        }

        self.clear_output()?;
        create_dir(&self.config.output_dir)?;

        let nav = Navigation::resolve(site, &index, &self.urls);
        let view = self.site_view()?;

        // Render pages in parallel; the first error wins
        discovery
            .pages
            .par_iter()
            .map(|page| self.build_page(page, &index, &nav, &view))
            .collect::<Result<(), BuildError>>()?;

        self.generate_assets()?;

        let files = self.copy_files(&discovery.files)?;

        if site.search.provider == SearchProvider::Local {
            self.generate_search_index(&discovery.pages, &nav)?;
        }

        self.generate_not_found(&nav, &view)?;

        if let Some(sitemap) = &site.sitemap {
            self.generate_sitemap(&sitemap.hostname, &discovery.pages)?;
        }

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: discovery.pages.len(),
            files,
            dead_links: dead.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Discover and parse pages and report dead links without writing anything.
    pub fn check(&self) -> Result<CheckReport, BuildError> {
        let discovery = self.discover()?;
        let index = self.site_index(&discovery);
        let dead_links = self.dead_links(&discovery.pages, &index);

        Ok(CheckReport {
            pages: discovery.pages.len(),
            dead_links,
        })
    }

    /// Remove the previous build so deleted pages do not linger.
    fn clear_output(&self) -> Result<(), BuildError> {
        let output_dir = &self.config.output_dir;
        let Ok(output) = fs::canonicalize(output_dir) else {
            return Ok(());
        };

        let docs = fs::canonicalize(&self.config.docs_dir).map_err(|source| BuildError::Read {
            path: self.config.docs_dir.clone(),
            source,
        })?;
        if docs.starts_with(&output) {
            return Err(BuildError::OutputContainsDocs(output_dir.clone()));
        }

        tracing::debug!("Removing previous output {}", output_dir.display());
        fs::remove_dir_all(output_dir).map_err(|source| BuildError::Write {
            path: output_dir.clone(),
            source,
        })
    }

    /// Find pages and static files under the docs and public directories.
    fn discover(&self) -> Result<Discovery, BuildError> {
        let docs_dir = &self.config.docs_dir;

        if !docs_dir.is_dir() {
            return Err(BuildError::DocsNotFound(docs_dir.clone()));
        }

        let mut discovery = Discovery::default();
        let mut outputs: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();

        let walker = WalkDir::new(docs_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_skipped(e));

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let relative_path = path.strip_prefix(docs_dir).unwrap_or(path).to_path_buf();

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "md" {
                let file = StaticFile {
                    source: path.to_path_buf(),
                    site_path: asset_path_for(&relative_path),
                };
                claim_output(&mut outputs, self.static_output(&file), &relative_path)?;
                discovery.files.push(file);
                continue;
            }

            let content = fs::read_to_string(path).map_err(|source| BuildError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            let doc = parse_document(&content).map_err(|e| BuildError::Parse {
                path: relative_path.display().to_string(),
                message: e.to_string(),
            })?;

            let route = route_for(&relative_path);
            let output_path = self.urls.output_file(&self.config.output_dir, &route);

            claim_output(&mut outputs, output_path.clone(), &relative_path)?;

            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());

            discovery.pages.push(Page {
                relative_path,
                route,
                output_path,
                doc,
                modified,
            });
        }

        let public_dir = &self.config.public_dir;
        if public_dir.is_dir() {
            for entry in WalkDir::new(public_dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }

                let relative = path.strip_prefix(public_dir).unwrap_or(path);
                let file = StaticFile {
                    source: path.to_path_buf(),
                    site_path: asset_path_for(relative),
                };
                let source = path.strip_prefix(docs_dir).unwrap_or(path);
                claim_output(&mut outputs, self.static_output(&file), source)?;
                discovery.files.push(file);
            }
        }

        tracing::debug!(
            "Discovered {} pages and {} static files in {}",
            discovery.pages.len(),
            discovery.files.len(),
            docs_dir.display()
        );

        Ok(discovery)
    }

    /// Dot-entries, the public directory and an output directory nested in docs.
    fn is_skipped(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }

        let hidden = entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false);

        hidden || entry.path() == self.config.public_dir || entry.path() == self.config.output_dir
    }

    fn site_index(&self, discovery: &Discovery) -> SiteIndex {
        SiteIndex::new(
            discovery.pages.iter().map(|p| p.route.clone()),
            discovery.files.iter().map(|f| f.site_path.clone()),
        )
    }

    fn dead_links(&self, pages: &[Page], index: &SiteIndex) -> Vec<DeadLink> {
        let mut dead = index.check_config(&self.config.site);

        for page in pages {
            dead.extend(index.check_page(
                &page.relative_path.display().to_string(),
                &page.route,
                &page.doc.links,
            ));
        }

        dead
    }

    /// Values shared by every page.
    fn site_view(&self) -> Result<SiteView, BuildError> {
        let site = &self.config.site;

        let search = match site.search.provider {
            SearchProvider::Local => {
                let json = serde_json::to_string(&site.search.translations)
                    .map_err(|e| BuildError::Template(e.to_string()))?;
                Some(SearchView {
                    index_url: self.urls.asset_href("/search-index.json"),
                    translations: site.search.translations.clone(),
                    translations_json: json.replace("</", "<\\/"),
                })
            }
            SearchProvider::None => None,
        };

        Ok(SiteView {
            title: site.site.title.clone(),
            description: site.site.description.clone(),
            lang: site.site.lang.clone(),
            home: self.urls.href("/"),
            logo: site.site.logo.as_deref().map(|logo| self.local_href(logo)),
            head: render_head(&site.site.head),
            social_links: site.social_links.clone(),
            footer: site.footer.clone(),
            labels: site.labels.clone(),
            search,
            edit_text: site.edit_link.as_ref().map(|e| e.text.clone()),
            stylesheet: self.urls.asset_href("/assets/style.css"),
            script: self.urls.asset_href("/assets/app.js"),
            live_reload: self.config.live_reload.clone(),
        })
    }

    /// Prefix site-absolute paths with the base.
    fn local_href(&self, link: &str) -> String {
        if link.starts_with('/') {
            self.urls.asset_href(link)
        } else {
            link.to_string()
        }
    }

    /// Frontmatter title, first heading, sidebar text, then file name.
    fn page_title(&self, page: &Page, nav: &Navigation) -> String {
        page.doc
            .title()
            .or_else(|| nav.sidebar_text(&page.route))
            .map(str::to_string)
            .unwrap_or_else(|| {
                if page.route == "/" {
                    return self.config.site.site.title.clone();
                }
                page.relative_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Untitled")
                    .to_string()
            })
    }

    /// Build a single page.
    fn build_page(
        &self,
        page: &Page,
        index: &SiteIndex,
        nav: &Navigation,
        site_view: &SiteView,
    ) -> Result<(), BuildError> {
        let site = &self.config.site;
        let frontmatter = &page.doc.frontmatter;
        let title = self.page_title(page, nav);

        let opts = RenderOptions {
            route: &page.route,
            index,
            urls: &self.urls,
            line_numbers: site.markdown.line_numbers,
        };
        let content = render_markdown(&page.doc.content, &page.doc.toc, &opts);

        let context = PageContext::new(&page.route, &page.relative_path, &title, &site.site.lang)
            .with_comments(frontmatter.comments);
        let rendered = self.layout.render(&context, content);

        let outline = if frontmatter.outline {
            page.doc
                .toc
                .iter()
                .filter(|e| (2..=3).contains(&e.level))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        let edit_url = site
            .edit_link
            .as_ref()
            .filter(|_| frontmatter.edit_link)
            .map(|e| e.url_for(&page.relative_path));

        let last_updated = if site.site.last_updated && frontmatter.last_updated {
            page.modified.and_then(rfc3339)
        } else {
            None
        };

        let (prev, next) = nav.prev_next(&page.route);

        let view = PageView {
            head_title: head_title(&title, &site.site.title),
            title,
            description: frontmatter.description.clone().unwrap_or_default(),
            route: page.route.clone(),
            doc_before: rendered.slot(Slot::DocBefore),
            doc_after: rendered.slot(Slot::DocAfter),
            layout_bottom: rendered.slot(Slot::LayoutBottom),
            content: rendered.content,
            nav: nav.nav_for(&page.route),
            sidebar: nav.sidebar_for(&page.route),
            outline,
            prev,
            next,
            edit_url,
            last_updated,
            not_found: false,
        };

        let html = self
            .templates
            .render_page("doc.html", site_view, &view)
            .map_err(|e| {
                BuildError::Template(format!("{}: {}", page.relative_path.display(), e))
            })?;

        write_file(&page.output_path, html)
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            match AssetPipeline::minify_css(&css) {
                Ok(minified) => minified,
                Err(e) => {
                    tracing::warn!("Keeping unminified stylesheet: {}", e);
                    css
                }
            }
        } else {
            css
        };
        write_file(&assets_dir.join("style.css"), css)?;

        write_file(&assets_dir.join("app.js"), AssetPipeline::generate_js())
    }

    /// Copy static files to their site paths.
    fn static_output(&self, file: &StaticFile) -> PathBuf {
        self.config
            .output_dir
            .join(file.site_path.trim_start_matches('/'))
    }

    fn copy_files(&self, files: &[StaticFile]) -> Result<usize, BuildError> {
        for file in files {
            let dest = self.static_output(file);

            if let Some(parent) = dest.parent() {
                create_dir(parent)?;
            }

            fs::copy(&file.source, &dest).map_err(|source| BuildError::Write {
                path: dest.clone(),
                source,
            })?;
        }

        Ok(files.len())
    }

    /// Generate search index.
    fn generate_search_index(&self, pages: &[Page], nav: &Navigation) -> Result<(), BuildError> {
        let index: Vec<SearchEntry<'_>> = pages
            .iter()
            .filter(|page| page.doc.frontmatter.search)
            .map(|page| SearchEntry {
                title: self.page_title(page, nav),
                description: page.doc.frontmatter.description.as_deref().unwrap_or(""),
                url: self.urls.href(&page.route),
                headings: page
                    .doc
                    .toc
                    .iter()
                    .filter(|e| e.level > 1)
                    .map(|e| e.title.as_str())
                    .collect(),
                content: &page.doc.text,
            })
            .collect();

        let json =
            serde_json::to_string(&index).map_err(|e| BuildError::Template(e.to_string()))?;

        write_file(&self.config.output_dir.join("search-index.json"), json)
    }

    /// Generate the not found page.
    fn generate_not_found(&self, nav: &Navigation, site_view: &SiteView) -> Result<(), BuildError> {
        let site = &self.config.site;
        let message = &site.labels.not_found;

        let content = format!(
            r#"<div class="not-found"><p class="code">404</p><h1 class="title">{}</h1><a class="link" href="{}">{}</a></div>"#,
            escape_html(message),
            escape_html(&site_view.home),
            escape_html(&site.site.title)
        );

        let view = PageView {
            title: message.clone(),
            head_title: head_title(message, &site.site.title),
            content,
            nav: nav.nav_for(""),
            not_found: true,
            ..Default::default()
        };

        let html = self
            .templates
            .render_page("doc.html", site_view, &view)
            .map_err(|e| BuildError::Template(format!("404.html: {}", e)))?;

        write_file(&self.config.output_dir.join("404.html"), html)
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, hostname: &str, pages: &[Page]) -> Result<(), BuildError> {
        let origin = hostname.trim_end_matches('/');

        let urls: Vec<String> = pages
            .iter()
            .map(|page| {
                let loc = format!("{}{}", origin, self.urls.href(&page.route));
                let mut entry = format!("  <url>\n    <loc>{}</loc>\n", escape_xml(&loc));
                if let Some(modified) = page.modified.and_then(rfc3339) {
                    entry.push_str(&format!("    <lastmod>{}</lastmod>\n", modified));
                }
                entry.push_str("  </url>");
                entry
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        write_file(&self.config.output_dir.join("sitemap.xml"), sitemap)?;

        // Also generate robots.txt
        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}{}\n",
            origin,
            self.urls.asset_href("/sitemap.xml")
        );
        write_file(&self.config.output_dir.join("robots.txt"), robots)
    }
}

fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

/// `<title>` value: the page title followed by the site title.
fn head_title(title: &str, site_title: &str) -> String {
    if title == site_title {
        site_title.to_string()
    } else {
        format!("{} | {}", title, site_title)
    }
}

/// Markup for `site.head` entries.
fn render_head(tags: &[HeadTag]) -> String {
    tags.iter()
        .map(|tag| {
            let name = escape_html(&tag.tag);
            let attrs: String = tag
                .attrs
                .iter()
                .map(|(key, value)| format!(r#" {}="{}""#, escape_html(key), escape_html(value)))
                .collect();

            if VOID_ELEMENTS.contains(&tag.tag.as_str()) {
                format!("<{}{}>", name, attrs)
            } else {
                format!("<{0}{1}></{0}>", name, attrs)
            }
        })
        .collect::<Vec<_>>()
        .join("\n  ")
}

fn rfc3339(time: SystemTime) -> Option<String> {
    OffsetDateTime::from(time).format(&Rfc3339).ok()
}

/// Record that `source` writes `output`; two sources for one file conflict.
fn claim_output(
    outputs: &mut BTreeMap<PathBuf, PathBuf>,
    output: PathBuf,
    source: &Path,
) -> Result<(), BuildError> {
    match outputs.entry(output) {
        Entry::Vacant(slot) => {
            slot.insert(source.to_path_buf());
            Ok(())
        }
        Entry::Occupied(slot) => Err(BuildError::RouteConflict {
            output: slot.key().display().to_string(),
            first: slot.get().display().to_string(),
            second: source.display().to_string(),
        }),
    }
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }

    fs::write(path, contents).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}
