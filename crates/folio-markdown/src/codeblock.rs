//! Fenced code block info strings.

/// Per-block line number setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineNumbers {
    /// Follow the site-wide `markdown.line_numbers` setting
    #[default]
    Inherit,
    /// `:line-numbers` or `:line-numbers=N`
    On { start: usize },
    /// `:no-line-numbers`
    Off,
}

impl LineNumbers {
    /// First line number to print, or `None` when numbering is off.
    pub fn resolve(self, site_default: bool) -> Option<usize> {
        match self {
            Self::Inherit if site_default => Some(1),
            Self::Inherit => None,
            Self::On { start } => Some(start),
            Self::Off => None,
        }
    }
}

/// A parsed code fence info string.
///
/// Supports formats like:
/// - `rust`
/// - `rust:line-numbers`
/// - `ts:line-numbers=5 [server.ts]`
/// - `bash:no-line-numbers`
/// Largest `:line-numbers=N` start accepted; bigger values are clamped.
pub const MAX_START_LINE: usize = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FenceInfo {
    /// Language identifier, lowercased
    pub language: Option<String>,

    /// Line number override
    pub line_numbers: LineNumbers,

    /// Optional title from `[...]`
    pub title: Option<String>,
}

impl FenceInfo {
    /// Parse a code fence info string.
    pub fn parse(info: &str) -> Self {
        let info = info.trim();
        let mut result = Self::default();

        if let Some(start) = info.find('[') {
            if let Some(len) = info[start + 1..].find(']') {
                let title = info[start + 1..start + 1 + len].trim();
                if !title.is_empty() {
                    result.title = Some(title.to_string());
                }
            }
        }

        let head = info.split_whitespace().next().unwrap_or("");
        if head.starts_with('[') {
            return result;
        }

        let mut parts = head.split(':');
        let language = parts.next().unwrap_or("").to_lowercase();
        if !language.is_empty() {
            result.language = Some(language);
        }

        for modifier in parts {
            if modifier == "no-line-numbers" {
                result.line_numbers = LineNumbers::Off;
            } else if modifier == "line-numbers" {
                result.line_numbers = LineNumbers::On { start: 1 };
            } else if let Some(start) = modifier.strip_prefix("line-numbers=") {
                let start = start.parse().unwrap_or(1).clamp(1, MAX_START_LINE);
                result.line_numbers = LineNumbers::On { start };
            }
        }

        result
    }

    /// CSS class for the `<code>` element, e.g. `language-rust`.
    pub fn language_class(&self) -> Option<String> {
        self.language.as_ref().map(|l| format!("language-{}", l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language() {
        assert_eq!(FenceInfo::parse("rust").language.as_deref(), Some("rust"));
        assert_eq!(FenceInfo::parse("TS").language.as_deref(), Some("ts"));
        assert_eq!(FenceInfo::parse("").language, None);
    }

    #[test]
    fn parses_line_number_modifiers() {
        assert_eq!(
            FenceInfo::parse("rust:line-numbers").line_numbers,
            LineNumbers::On { start: 1 }
        );
        assert_eq!(
            FenceInfo::parse("ts:line-numbers=5").line_numbers,
            LineNumbers::On { start: 5 }
        );
        assert_eq!(
            FenceInfo::parse("bash:no-line-numbers").line_numbers,
            LineNumbers::Off
        );
        assert_eq!(FenceInfo::parse("bash").line_numbers, LineNumbers::Inherit);
    }

    #[test]
    fn clamps_huge_start_line() {
        assert_eq!(
            FenceInfo::parse("rust:line-numbers=18446744073709551615").line_numbers,
            LineNumbers::On {
                start: MAX_START_LINE
            }
        );
        assert_eq!(
            FenceInfo::parse("rust:line-numbers=99999999999999999999999").line_numbers,
            LineNumbers::On { start: 1 }
        );
    }

    #[test]
    fn extracts_title() {
        let info = FenceInfo::parse("ts:line-numbers [server.ts]");
        assert_eq!(info.language.as_deref(), Some("ts"));
        assert_eq!(info.title.as_deref(), Some("server.ts"));

        let bare = FenceInfo::parse("[config]");
        assert_eq!(bare.language, None);
        assert_eq!(bare.title.as_deref(), Some("config"));
    }

    #[test]
    fn resolves_against_site_default() {
        assert_eq!(LineNumbers::Inherit.resolve(true), Some(1));
        assert_eq!(LineNumbers::Inherit.resolve(false), None);
        assert_eq!(LineNumbers::Off.resolve(true), None);
        assert_eq!(LineNumbers::On { start: 3 }.resolve(false), Some(3));
    }
}
