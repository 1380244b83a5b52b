//! Link classification shared by config validation and dead-link checks.

use std::sync::LazyLock;

use regex::Regex;

static SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme pattern is valid")
});

/// What a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Has a scheme (`https:`, `mailto:`, ...) or is protocol-relative
    External,
    /// Same-page fragment (`#install`)
    Anchor,
    /// Site-absolute path (`/guide/chapter-01`)
    Internal,
    /// Path relative to the current document (`./chapter-02`, `../faq`)
    Relative,
}

impl LinkKind {
    /// Classify a link target.
    pub fn classify(link: &str) -> Self {
        let link = link.trim();
        if link.starts_with("//") || SCHEME.is_match(link) {
            Self::External
        } else if link.starts_with('#') {
            Self::Anchor
        } else if link.starts_with('/') {
            Self::Internal
        } else {
            Self::Relative
        }
    }

    /// Whether the target lives inside the generated site.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Internal | Self::Relative)
    }
}

/// Strip the `#fragment` and `?query` parts of a link.
pub fn strip_fragment(link: &str) -> &str {
    let end = link.find(['#', '?']).unwrap_or(link.len());
    &link[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_links() {
        assert_eq!(LinkKind::classify("https://github.com/a/b"), LinkKind::External);
        assert_eq!(LinkKind::classify("mailto:me@example.com"), LinkKind::External);
        assert_eq!(LinkKind::classify("//cdn.example.com/x.js"), LinkKind::External);
        assert_eq!(LinkKind::classify("#usage"), LinkKind::Anchor);
        assert_eq!(LinkKind::classify("/guide/chapter-01"), LinkKind::Internal);
        assert_eq!(LinkKind::classify("./chapter-02"), LinkKind::Relative);
        assert_eq!(LinkKind::classify("chapter-02.md"), LinkKind::Relative);
    }

    #[test]
    fn strips_fragments_and_queries() {
        assert_eq!(strip_fragment("/guide/a#setup"), "/guide/a");
        assert_eq!(strip_fragment("/guide/a?x=1"), "/guide/a");
        assert_eq!(strip_fragment("/guide/a"), "/guide/a");
        assert_eq!(strip_fragment("#top"), "");
    }
}
