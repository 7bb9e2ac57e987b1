//! Compiled regex patterns for content extraction.
//!
//! All patterns are compiled once at first use with `LazyLock`.
//! Patterns are organized by the pipeline stage that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Class/id vocabularies
// =============================================================================

/// Class/id fragments of non-article page regions.
///
/// "ad" and "nav" only match as whole tokens so that `header`, `shadow`,
/// `loading` or `canvas` stay clean.
pub static BOILERPLATE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)comment|disqus|sidebar|(?:^|[\s_-])nav(?:$|[\s_-])|navbar|navigation|\bmenu|footer|masthead|share|sharing|social|related|sponsor|promo|advert|(?:^|[\s_-])ads?(?:$|[\s_-])|banner|popup|modal|cookie|newsletter|subscribe|breadcrumb|widget|outbrain|taboola|skyscraper|shoutbox",
    )
    .expect("BOILERPLATE_CLASS regex")
});

/// Class/id fragments of article regions. Earns a positive score.
pub static CONTENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|content|main|post|story|entry|blog|text|body")
        .expect("CONTENT_CLASS regex")
});

/// Fragments that keep a boilerplate-looking element from being discarded outright.
///
/// Narrower than [`CONTENT_CLASS`]: `post-comments` is still boilerplate.
pub static PROTECTED_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|content|main|story|body|column")
        .expect("PROTECTED_CLASS regex")
});

/// True when a class/id string names a boilerplate region and nothing protects it.
#[must_use]
pub fn is_boilerplate_name(class_and_id: &str) -> bool {
    !class_and_id.is_empty()
        && BOILERPLATE_CLASS.is_match(class_and_id)
        && !PROTECTED_CLASS.is_match(class_and_id)
}

// =============================================================================
// Preprocessing
// =============================================================================

/// Inline styles that hide an element.
pub static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)display\s*:\s*none|visibility\s*:\s*hidden").expect("HIDDEN_STYLE regex")
});

// =============================================================================
// Cleaning
// =============================================================================

/// Labels of share buttons and social widgets.
pub static SHARE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:share(?:\s+(?:on|this|via|to)(?:\s+[\w.-]+)?)?|tweet|email|e-mail|print|facebook|twitter|linkedin|reddit|pinterest|whatsapp|pocket|flipboard|copy link|more on this)\W*$",
    )
    .expect("SHARE_LABEL regex")
});

/// Iframe sources of embedded video players, kept in content.
pub static VIDEO_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)//(?:www\.)?(?:youtube(?:-nocookie)?\.com|youtu\.be|player\.vimeo\.com|dailymotion\.com|player\.twitch\.tv)/",
    )
    .expect("VIDEO_EMBED regex")
});

// =============================================================================
// Metadata
// =============================================================================

/// Separators between an article title and a site name suffix.
pub static TITLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+[|\-–—·»]\s+|\s*\|\s*").expect("TITLE_SEPARATOR regex")
});

/// Colon separator, only considered when no stronger separator exists.
pub static TITLE_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s+").expect("TITLE_COLON regex"));

/// Leading "By" and similar prefixes of a byline.
pub static BYLINE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:written|posted|published|reported)\s+by|by|author)\s*:?\s+")
        .expect("BYLINE_PREFIX regex")
});

/// A short byline line: a prefix followed by one to four capitalized name words.
pub static BYLINE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i:(?:written|posted|published|reported)\s+by|by)\s+(\p{Lu}[\p{L}'.\-]*(?:\s+(?:\p{Lu}[\p{L}'.\-]*|van|von|de|da|del|der|la|le)){0,4})(?:\s*(?:[,|·•]|$))",
    )
    .expect("BYLINE_TEXT regex")
});

/// Class/id fragments of byline elements.
pub static BYLINE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)byline|author|writer|dateline").expect("BYLINE_CLASS regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boilerplate_vocabulary() {
        for name in [
            "comments",
            "sidebar-left",
            "main-nav",
            "nav",
            "site-footer",
            "share-buttons",
            "related-posts",
            "ad",
            "top ads",
            "ad-slot",
        ] {
            assert!(BOILERPLATE_CLASS.is_match(name), "{name} should be boilerplate");
        }
    }

    #[test]
    fn test_ad_and_nav_only_match_whole_tokens() {
        for name in ["header", "shadow", "loading", "canvas", "read-more", "unavailable"] {
            assert!(!BOILERPLATE_CLASS.is_match(name), "{name} should not be boilerplate");
        }
    }

    #[test]
    fn test_content_vocabulary() {
        for name in ["article", "post-content", "main", "story-body", "entry"] {
            assert!(CONTENT_CLASS.is_match(name), "{name} should be content");
        }
        assert!(!CONTENT_CLASS.is_match("sidebar"));
    }

    #[test]
    fn test_is_boilerplate_name() {
        assert!(is_boilerplate_name("post-comments"));
        assert!(is_boilerplate_name("related-posts"));
        assert!(!is_boilerplate_name("article-share"));
        assert!(!is_boilerplate_name("entry-content"));
        assert!(!is_boilerplate_name(""));
    }

    #[test]
    fn test_share_labels() {
        assert!(SHARE_LABEL.is_match("Share"));
        assert!(SHARE_LABEL.is_match("Share on Facebook"));
        assert!(SHARE_LABEL.is_match("Tweet"));
        assert!(!SHARE_LABEL.is_match("Share prices fell sharply today"));
    }

    #[test]
    fn test_title_separator() {
        let parts: Vec<_> = TITLE_SEPARATOR.split("A Long Headline | Site").collect();
        assert_eq!(parts, vec!["A Long Headline", "Site"]);
        let parts: Vec<_> = TITLE_SEPARATOR.split("Headline - Site").collect();
        assert_eq!(parts, vec!["Headline", "Site"]);
        // Hyphenated words are not separators
        assert_eq!(TITLE_SEPARATOR.split("well-known facts").count(), 1);
    }

    #[test]
    fn test_byline_text() {
        let caps = BYLINE_TEXT.captures("By Jane Doe").unwrap();
        assert_eq!(&caps[1], "Jane Doe");
        let caps = BYLINE_TEXT.captures("Written by Ludwig van Beethoven, Staff").unwrap();
        assert_eq!(&caps[1], "Ludwig van Beethoven");
        assert!(BYLINE_TEXT.captures("by the way, this is not a name").is_none());
    }

    #[test]
    fn test_byline_prefix() {
        assert_eq!(BYLINE_PREFIX.replace("By Jane Doe", ""), "Jane Doe");
        assert_eq!(BYLINE_PREFIX.replace("Author: Jane Doe", ""), "Jane Doe");
        assert_eq!(BYLINE_PREFIX.replace("Jane Doe", ""), "Jane Doe");
    }
}
