//! Pattern filtering of discovered links.
//!
//! A link is kept when ANY pattern finds a match anywhere in it (regex
//! search, not full-string match). Input order is preserved.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Pattern selecting the 72-hour departure schedule PDF.
pub const SCHEDULE_72HR_PATTERN: &str = "72hr";

/// A pattern that failed to compile.
#[derive(Debug, Error)]
#[error("invalid filter pattern '{pattern}': {source}")]
pub struct FilterError {
    /// The pattern text as given.
    pub pattern: String,
    /// The regex compile error.
    #[source]
    pub source: regex::Error,
}

/// Keeps strings that match at least one of a set of patterns.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    patterns: Vec<Regex>,
}

impl PatternFilter {
    /// Wraps already-compiled patterns.
    #[must_use]
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    /// Compiles each pattern case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] for the first pattern that does not compile.
    pub fn case_insensitive<I, S>(patterns: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| FilterError {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns))
    }

    /// The default filter: [`SCHEDULE_72HR_PATTERN`], case-insensitive.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the pattern is a literal.
    pub fn schedule_72hr() -> Result<Self, FilterError> {
        Self::case_insensitive([SCHEDULE_72HR_PATTERN])
    }

    /// Returns true if any pattern matches somewhere in `text`.
    ///
    /// An empty pattern set matches nothing.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }

    /// Returns the entries of `items` that match, in their original order.
    #[must_use]
    pub fn filter<S: AsRef<str>>(&self, items: &[S]) -> Vec<String> {
        filter_matching(items, &self.patterns)
    }
}

/// Returns the entries of `items` matched by at least one of `patterns`.
#[must_use]
pub fn filter_matching<S: AsRef<str>>(items: &[S], patterns: &[Regex]) -> Vec<String> {
    items
        .iter()
        .map(AsRef::as_ref)
        .filter(|text| patterns.iter().any(|pattern| pattern.is_match(text)))
        .map(str::to_string)
        .collect()
}
