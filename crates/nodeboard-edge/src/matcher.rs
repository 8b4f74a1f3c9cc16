//! Static-file classification.

/// Extensions served straight from the asset store.
pub const STATIC_EXTENSIONS: &[&str] = &[
    // documents and data
    ".html", ".css", ".js", ".json", ".txt", ".md",
    // images
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".webp",
    // fonts
    ".woff", ".woff2", ".ttf", ".eot",
    // media
    ".mp3", ".mp4", ".webm", ".ogg",
    // archives
    ".pdf", ".zip", ".tar", ".gz",
];

/// Decides whether a request path names a static file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaticMatcher {
    /// Case-insensitive suffix match against [`STATIC_EXTENSIONS`].
    #[default]
    Extensions,
    /// Any path containing a dot.
    AnyDot,
}

impl StaticMatcher {
    /// Returns true if `path` should be passed through to the asset store.
    pub fn is_static(&self, path: &str) -> bool {
        match self {
            StaticMatcher::Extensions => {
                let lower = path.to_ascii_lowercase();
                STATIC_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
            }
            StaticMatcher::AnyDot => path.contains('.'),
        }
    }

    /// Parse a matcher name (`extensions` or `any-dot`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extensions" | "extension" => Some(StaticMatcher::Extensions),
            "any-dot" | "anydot" | "dot" => Some(StaticMatcher::AnyDot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matcher() {
        let m = StaticMatcher::Extensions;
        assert!(m.is_static("/app.js"));
        assert!(m.is_static("/nodes.json"));
        assert!(m.is_static("/img/LOGO.PNG"));
        assert!(m.is_static("/fonts/a.woff2"));
        assert!(m.is_static("/dist/bundle.tar.gz"));
        assert!(!m.is_static("/"));
        assert!(!m.is_static("/dashboard/settings"));
        assert!(!m.is_static("/download/file.exe"));
        assert!(!m.is_static("/v1.2/release"));
    }

    #[test]
    fn test_any_dot_matcher() {
        let m = StaticMatcher::AnyDot;
        assert!(m.is_static("/download/file.exe"));
        assert!(m.is_static("/v1.2/release"));
        assert!(!m.is_static("/dashboard/settings"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(StaticMatcher::parse("extensions"), Some(StaticMatcher::Extensions));
        assert_eq!(StaticMatcher::parse("Any-Dot"), Some(StaticMatcher::AnyDot));
        assert_eq!(StaticMatcher::parse("regex"), None);
    }
}
