//! Routes, hrefs and output paths.
//!
//! A route is the site path of a page without base or extension:
//! `index.md` is `/`, `guide/index.md` is `/guide/` and
//! `guide/chapter-01.md` is `/guide/chapter-01`.

use std::path::{Path, PathBuf};

/// Route of a Markdown file given relative to the docs directory.
pub fn route_for(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();

    let Some(last) = segments.pop() else {
        return "/".to_string();
    };

    let stem = Path::new(&last)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("index")
        .to_string();

    let dir = if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    };

    if stem == "index" {
        dir
    } else {
        format!("{}{}", dir, stem)
    }
}

/// Site path of a non-Markdown file (`guide/img.png` is `/guide/img.png`).
pub fn asset_path_for(relative: &Path) -> String {
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

/// How routes map to hrefs and files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlStyle {
    /// Public base path, always starts and ends with `/`
    pub base: String,
    /// Extensionless links, `route/index.html` output
    pub clean_urls: bool,
}

impl UrlStyle {
    pub fn new(base: impl Into<String>, clean_urls: bool) -> Self {
        Self {
            base: base.into(),
            clean_urls,
        }
    }

    /// Link to a page route.
    pub fn href(&self, route: &str) -> String {
        let prefix = self.base.trim_end_matches('/');
        if route.ends_with('/') || self.clean_urls {
            format!("{}{}", prefix, route)
        } else {
            format!("{}{}.html", prefix, route)
        }
    }

    /// Link to a static file by site path.
    pub fn asset_href(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    /// File a page route is written to.
    pub fn output_file(&self, output_dir: &Path, route: &str) -> PathBuf {
        let relative = route.trim_start_matches('/');
        if route.ends_with('/') || self.clean_urls {
            output_dir.join(relative).join("index.html")
        } else {
            output_dir.join(format!("{}.html", relative))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_sources_to_routes() {
        assert_eq!(route_for(Path::new("index.md")), "/");
        assert_eq!(route_for(Path::new("guide/index.md")), "/guide/");
        assert_eq!(route_for(Path::new("guide/chapter-01.md")), "/guide/chapter-01");
        assert_eq!(route_for(Path::new("faq.md")), "/faq");
    }

    #[test]
    fn maps_assets_to_site_paths() {
        assert_eq!(asset_path_for(Path::new("guide/arch.png")), "/guide/arch.png");
        assert_eq!(asset_path_for(Path::new("logo.svg")), "/logo.svg");
    }

    #[test]
    fn clean_hrefs() {
        let urls = UrlStyle::new("/", true);
        assert_eq!(urls.href("/"), "/");
        assert_eq!(urls.href("/guide/chapter-01"), "/guide/chapter-01");
        assert_eq!(urls.href("/guide/"), "/guide/");
    }

    #[test]
    fn html_hrefs_under_base() {
        let urls = UrlStyle::new("/tutorial/", false);
        assert_eq!(urls.href("/"), "/tutorial/");
        assert_eq!(urls.href("/guide/chapter-01"), "/tutorial/guide/chapter-01.html");
        assert_eq!(urls.asset_href("/logo.svg"), "/tutorial/logo.svg");
    }

    #[test]
    fn output_files() {
        let out = Path::new("dist");

        let clean = UrlStyle::new("/", true);
        assert_eq!(clean.output_file(out, "/"), out.join("index.html"));
        assert_eq!(
            clean.output_file(out, "/guide/chapter-01"),
            out.join("guide/chapter-01").join("index.html")
        );

        let plain = UrlStyle::new("/", false);
        assert_eq!(
            plain.output_file(out, "/guide/chapter-01"),
            out.join("guide/chapter-01.html")
        );
        assert_eq!(
            plain.output_file(out, "/guide/"),
            out.join("guide/").join("index.html")
        );
    }
}
