// Pattern Matching Utilities
// Glob-like matching for file chooser accept filters

use std::path::Path;

/// Extensions accepted by the MIME-style `image/*`, `audio/*`, ... filters
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "mov", "avi"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv", "json", "yaml", "yml", "toml"];

/// Check if a file name matches a glob-like pattern; every `*` matches any run of characters
pub fn matches_pattern(path: &Path, pattern: &str) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let pattern = pattern.to_lowercase();

    let segments: Vec<&str> = pattern.split('*').collect();
    let [first, middle @ .., last] = segments.as_slice() else {
        // No wildcard
        return name == pattern;
    };

    let Some(mut rest) = name.strip_prefix(*first) else {
        return false;
    };
    // Segments are consumed left to right so none of them overlap
    for segment in middle {
        match rest.find(*segment) {
            Some(at) => rest = &rest[at + segment.len()..],
            None => return false,
        }
    }
    rest.ends_with(*last)
}

/// Accept filter of a file chooser, e.g. `"*.png, .jpg"` or `"image/*"`
/// An empty filter accepts every file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AcceptFilter {
    patterns: Vec<String>,
}

impl AcceptFilter {
    /// Parse a comma-separated accept list
    pub fn parse(filter: &str) -> Self {
        let patterns = filter
            .split(',')
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .flat_map(Self::expand)
            .collect();
        Self { patterns }
    }

    /// Turn one accept token into glob patterns
    fn expand(token: &str) -> Vec<String> {
        let token = token.to_lowercase();
        let by_category =
            |exts: &[&str]| -> Vec<String> { exts.iter().map(|e| format!("*.{}", e)).collect() };

        match token.as_str() {
            "image/*" => by_category(IMAGE_EXTENSIONS),
            "audio/*" => by_category(AUDIO_EXTENSIONS),
            "video/*" => by_category(VIDEO_EXTENSIONS),
            "text/*" => by_category(TEXT_EXTENSIONS),
            t if t.starts_with('.') => vec![format!("*{}", t)],
            t => vec![t.to_string()],
        }
    }

    /// Check if a path passes the filter
    pub fn accepts(&self, path: &Path) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| matches_pattern(path, p))
    }

    /// Get all expanded patterns
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_pattern() {
        assert!(matches_pattern(Path::new("dir/file.txt"), "*.txt"));
        assert!(!matches_pattern(Path::new("dir/file.md"), "*.txt"));
    }

    #[test]
    fn test_prefix_pattern() {
        assert!(matches_pattern(Path::new("test_file.rs"), "test_*"));
        assert!(!matches_pattern(Path::new("file_test.rs"), "test_*"));
    }

    #[test]
    fn test_inner_wildcards_do_not_overlap() {
        assert!(matches_pattern(Path::new("abba"), "ab*ba"));
        assert!(matches_pattern(Path::new("ab-x-ba"), "ab*ba"));
        assert!(!matches_pattern(Path::new("aba"), "ab*ba"));
        assert!(matches_pattern(Path::new("scene.v2.tar.gz"), "scene*.tar*"));
        assert!(!matches_pattern(Path::new("scene.zip"), "scene*.tar*"));
        assert!(matches_pattern(Path::new("report-2024-final.pdf"), "report*2024*.pdf"));
        assert!(!matches_pattern(Path::new("report-final.pdf"), "report*2024*.pdf"));
        assert!(matches_pattern(Path::new("anything"), "*"));
    }

    #[test]
    fn test_extension_and_case() {
        let filter = AcceptFilter::parse(".PNG, *.jpg");
        assert!(filter.accepts(Path::new("a/photo.png")));
        assert!(filter.accepts(Path::new("b/Photo.JPG")));
        assert!(!filter.accepts(Path::new("notes.txt")));
    }

    #[test]
    fn test_mime_category() {
        let filter = AcceptFilter::parse("image/*");
        assert!(filter.accepts(Path::new("icon.webp")));
        assert!(!filter.accepts(Path::new("song.mp3")));
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = AcceptFilter::parse("");
        assert!(filter.patterns().is_empty());
        assert!(filter.accepts(Path::new("anything.bin")));
    }
}
