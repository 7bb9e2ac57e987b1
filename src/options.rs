//! Configuration options for content extraction.
//!
//! The `Options` struct tunes the content floors and the sibling-merge rule,
//! and decides whether inline styling survives cleaning.

/// Configuration options for content extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use reeeed::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     preserve_style: true,
///     min_text_length: 250,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Keep inline `style` attributes in the cleaned content.
    ///
    /// Default: `false`
    pub preserve_style: bool,

    /// Minimum absolute score a candidate needs to be selected.
    ///
    /// Default: `5.0`
    pub min_score: f64,

    /// Minimum text length (in characters) of a selected candidate.
    ///
    /// Pages below this are reported as [`Error::NoContent`](crate::Error::NoContent)
    /// so the caller can fall back to an unprocessed view.
    ///
    /// Default: `100`
    pub min_text_length: usize,

    /// A sibling whose score is at least this fraction of the selected
    /// candidate's score is merged into the result.
    ///
    /// Default: `0.2`
    pub sibling_score_fraction: f64,

    /// Siblings shorter than this many characters are merged when their
    /// link density is at most `short_sibling_max_link_density`.
    ///
    /// Default: `80`
    pub short_sibling_length: usize,

    /// Link density ceiling for merging short siblings.
    ///
    /// Default: `0.05`
    pub short_sibling_max_link_density: f64,

    /// Length of an excerpt derived from the first substantial paragraph.
    ///
    /// Default: `200`
    pub excerpt_length: usize,

    /// Number of text-bearing elements scanned for a byline heuristic.
    ///
    /// Default: `300`
    pub max_metadata_elements: usize,

    /// Author names (case-insensitive) to drop from the byline.
    ///
    /// Default: `None`
    pub author_blacklist: Option<Vec<String>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            preserve_style: false,
            min_score: 5.0,
            min_text_length: 100,
            sibling_score_fraction: 0.2,
            short_sibling_length: 80,
            short_sibling_max_link_density: 0.05,
            excerpt_length: 200,
            max_metadata_elements: 300,
            author_blacklist: None,
        }
    }
}

impl Options {
    /// Whether `author` is on the configured blacklist.
    #[must_use]
    pub fn is_blacklisted_author(&self, author: &str) -> bool {
        self.author_blacklist.as_ref().is_some_and(|list| {
            list.iter()
                .any(|blocked| blocked.trim().eq_ignore_ascii_case(author.trim()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_thresholds() {
        let opts = Options::default();
        assert!(!opts.preserve_style);
        assert_eq!(opts.min_score, 5.0);
        assert_eq!(opts.min_text_length, 100);
        assert_eq!(opts.sibling_score_fraction, 0.2);
        assert_eq!(opts.short_sibling_length, 80);
        assert_eq!(opts.excerpt_length, 200);
        assert!(opts.author_blacklist.is_none());
    }

    #[test]
    fn test_custom_thresholds() {
        let opts = Options {
            min_score: 12.5,
            min_text_length: 500,
            ..Options::default()
        };
        assert_eq!(opts.min_score, 12.5);
        assert_eq!(opts.min_text_length, 500);
        assert_eq!(opts.sibling_score_fraction, 0.2);
    }

    #[test]
    fn test_author_blacklist_is_case_insensitive() {
        let opts = Options {
            author_blacklist: Some(vec!["Staff Writer".to_string()]),
            ..Options::default()
        };
        assert!(opts.is_blacklisted_author("staff writer"));
        assert!(opts.is_blacklisted_author("  STAFF WRITER "));
        assert!(!opts.is_blacklisted_author("Jane Doe"));
        assert!(!Options::default().is_blacklisted_author("Staff Writer"));
    }
}
