// crates/search-conformance-core/src/oracle/pattern.rs
// ============================================================================
// Module: Oracle Patterns
// Description: Proximity phrase and wildcard prefix patterns.
// Purpose: Compile bounded, case-insensitive regular expressions once.
// Dependencies: regex, thiserror
// ============================================================================

//! ## Overview
//! A quoted phrase matches when each word stem appears in order, optionally
//! followed by a few inflection characters, with a bounded whitespace gap
//! between consecutive words. A wildcard matches a word starting with the
//! prefix. Patterns are compiled at catalog construction so invalid
//! definitions never reach a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use regex::Regex;
use regex::RegexBuilder;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum inflection characters allowed after a phrase stem.
pub const MAX_SUFFIX_CHARS: usize = 8;
/// Maximum whitespace characters allowed between phrase words.
pub const MAX_GAP_CHARS: usize = 8;
/// Compiled size ceiling for oracle patterns.
const MAX_REGEX_SIZE: usize = 1 << 20;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while compiling an oracle pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The phrase has no words.
    #[error("phrase pattern has no terms")]
    EmptyPhrase,
    /// A stem or prefix is blank.
    #[error("pattern stem is empty")]
    EmptyStem,
    /// A lower bound exceeds its upper bound.
    #[error("invalid bounds {min}..={max} for {what}")]
    InvertedBounds {
        /// Bounded element.
        what: &'static str,
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// An upper bound exceeds the supported ceiling.
    #[error("{what} bound {max} exceeds limit {limit}")]
    BoundTooLarge {
        /// Bounded element.
        what: &'static str,
        /// Requested upper bound.
        max: usize,
        /// Supported ceiling.
        limit: usize,
    },
    /// The regex engine rejected the pattern.
    #[error("pattern failed to compile: {0}")]
    Compile(String),
}

// ============================================================================
// SECTION: Phrase Terms
// ============================================================================

/// One word of a proximity phrase: a stem plus allowed suffix length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseTerm {
    /// Word stem, matched case-insensitively.
    pub stem: String,
    /// Minimum number of characters after the stem.
    pub min_suffix: usize,
    /// Maximum number of characters after the stem.
    pub max_suffix: usize,
}

impl PhraseTerm {
    /// Creates a phrase term.
    #[must_use]
    pub fn new(stem: impl Into<String>, min_suffix: usize, max_suffix: usize) -> Self {
        Self {
            stem: stem.into(),
            min_suffix,
            max_suffix,
        }
    }

    /// Checks stem and bound constraints.
    fn validate(&self) -> Result<(), PatternError> {
        if self.stem.trim().is_empty() {
            return Err(PatternError::EmptyStem);
        }
        check_bounds("suffix", self.min_suffix, self.max_suffix, MAX_SUFFIX_CHARS)
    }

    /// Renders the regex fragment for this term.
    fn fragment(&self) -> String {
        format!(
            "{}.{{{},{}}}",
            regex::escape(&self.stem.to_lowercase()),
            self.min_suffix,
            self.max_suffix
        )
    }
}

/// Whitespace allowed between consecutive phrase words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitespaceGap {
    /// Minimum whitespace characters.
    pub min: usize,
    /// Maximum whitespace characters.
    pub max: usize,
}

impl WhitespaceGap {
    /// Exactly one whitespace character.
    pub const SINGLE: Self = Self {
        min: 1,
        max: 1,
    };

    /// Creates a gap with explicit bounds.
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
        }
    }

    /// Renders the regex fragment for this gap.
    fn fragment(self) -> String {
        if self.min == 1 && self.max == 1 {
            "\\s".to_string()
        } else {
            format!("\\s{{{},{}}}", self.min, self.max)
        }
    }
}

impl Default for WhitespaceGap {
    fn default() -> Self {
        Self::SINGLE
    }
}

// ============================================================================
// SECTION: Proximity Pattern
// ============================================================================

/// Compiled proximity phrase pattern.
///
/// # Invariants
/// - At least one term; all bounds are ordered and within limits.
/// - Matching is case-insensitive against lowercased text.
#[derive(Debug, Clone)]
pub struct ProximityPattern {
    /// Source terms.
    terms: Vec<PhraseTerm>,
    /// Gap between consecutive terms.
    gap: WhitespaceGap,
    /// Compiled expression.
    regex: Regex,
}

impl ProximityPattern {
    /// Compiles a proximity pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when terms are empty, bounds are invalid, or
    /// the expression fails to compile.
    pub fn new(terms: Vec<PhraseTerm>, gap: WhitespaceGap) -> Result<Self, PatternError> {
        if terms.is_empty() {
            return Err(PatternError::EmptyPhrase);
        }
        for term in &terms {
            term.validate()?;
        }
        check_bounds("gap", gap.min, gap.max, MAX_GAP_CHARS)?;
        let source = terms.iter().map(PhraseTerm::fragment).collect::<Vec<_>>().join(&gap.fragment());
        let regex = compile(&source)?;
        Ok(Self {
            terms,
            gap,
            regex,
        })
    }

    /// Compiles a phrase whose words must appear verbatim, one space apart.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the phrase has no words.
    pub fn literal(phrase: &str) -> Result<Self, PatternError> {
        let terms = phrase.split_whitespace().map(|word| PhraseTerm::new(word, 0, 0)).collect();
        Self::new(terms, WhitespaceGap::SINGLE)
    }

    /// Returns the source terms.
    #[must_use]
    pub fn terms(&self) -> &[PhraseTerm] {
        &self.terms
    }

    /// Returns the inter-word gap.
    #[must_use]
    pub const fn gap(&self) -> WhitespaceGap {
        self.gap
    }

    /// Returns the compiled expression source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns true when `text` contains the phrase.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for ProximityPattern {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms && self.gap == other.gap
    }
}

impl fmt::Display for ProximityPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex.as_str())
    }
}

// ============================================================================
// SECTION: Wildcard Pattern
// ============================================================================

/// Compiled prefix wildcard pattern (`Гео*`).
///
/// # Invariants
/// - The prefix is non-empty and anchored at a word boundary.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    /// Lowercased prefix.
    prefix: String,
    /// Compiled expression.
    regex: Regex,
}

impl WildcardPattern {
    /// Compiles a wildcard pattern for `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the prefix is blank.
    pub fn new(prefix: &str) -> Result<Self, PatternError> {
        let prefix = prefix.trim().trim_end_matches('*').to_lowercase();
        if prefix.is_empty() {
            return Err(PatternError::EmptyStem);
        }
        let regex = compile(&format!("\\b{}\\w*", regex::escape(&prefix)))?;
        Ok(Self {
            prefix,
            regex,
        })
    }

    /// Returns the lowercased prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true when a word in `text` starts with the prefix.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*", self.prefix)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates an inclusive bound pair against a ceiling.
const fn check_bounds(
    what: &'static str,
    min: usize,
    max: usize,
    limit: usize,
) -> Result<(), PatternError> {
    if min > max {
        return Err(PatternError::InvertedBounds {
            what,
            min,
            max,
        });
    }
    if max > limit {
        return Err(PatternError::BoundTooLarge {
            what,
            max,
            limit,
        });
    }
    Ok(())
}

/// Compiles a case-insensitive Unicode expression with a size limit.
fn compile(source: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .size_limit(MAX_REGEX_SIZE)
        .build()
        .map_err(|err| PatternError::Compile(err.to_string()))
}
