// crates/search-conformance-core/src/oracle/expectation.rs
// ============================================================================
// Module: Boolean Expectations
// Description: Composable AND/OR/NOT trees over record predicates.
// Purpose: Express grouped and field-scoped query semantics per record.
// Dependencies: smallvec, crate::normalize, crate::oracle::matcher
// ============================================================================

//! ## Overview
//! An [`Expectation`] mirrors the boolean structure of a query such as
//! `(столяр OR столяр-плотник) AND (электрик OR сантехник)`. Leaves are
//! domain predicates; the operators are domain-agnostic and short-circuit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use smallvec::SmallVec;

use crate::normalize::NormalizedRecord;
use crate::oracle::matcher::RecordPredicate;

// ============================================================================
// SECTION: Expectation
// ============================================================================

/// Boolean expectation tree with predicate leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation<P> {
    /// Every child must hold. Empty `All` holds.
    All(SmallVec<[Box<Self>; 4]>),
    /// At least one child must hold. Empty `Any` does not hold.
    Any(SmallVec<[Box<Self>; 4]>),
    /// The child must not hold.
    Not(Box<Self>),
    /// Domain predicate leaf.
    Predicate(P),
}

impl<P> Expectation<P> {
    /// Builds a conjunction.
    #[must_use]
    pub fn all(children: impl IntoIterator<Item = Self>) -> Self {
        Self::All(children.into_iter().map(Box::new).collect())
    }

    /// Builds a disjunction.
    #[must_use]
    pub fn any(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Any(children.into_iter().map(Box::new).collect())
    }

    /// Builds a negation.
    #[must_use]
    pub fn negate(child: Self) -> Self {
        Self::Not(Box::new(child))
    }

    /// Builds a predicate leaf.
    #[must_use]
    pub const fn predicate(predicate: P) -> Self {
        Self::Predicate(predicate)
    }
}

impl<P: RecordPredicate> Expectation<P> {
    /// Returns true when the expectation holds for `record`.
    #[must_use]
    pub fn holds(&self, record: &NormalizedRecord) -> bool {
        match self {
            Self::All(children) => children.iter().all(|child| child.holds(record)),
            Self::Any(children) => children.iter().any(|child| child.holds(record)),
            Self::Not(child) => !child.holds(record),
            Self::Predicate(predicate) => predicate.holds(record),
        }
    }

    /// Explains why the expectation fails for `record`.
    ///
    /// Returns `None` when the expectation holds. For `All`, the first failing
    /// child is reported.
    #[must_use]
    pub fn explain_failure(&self, record: &NormalizedRecord) -> Option<String> {
        match self {
            Self::All(children) => {
                children.iter().find_map(|child| child.explain_failure(record))
            }
            Self::Any(_) | Self::Not(_) | Self::Predicate(_) => {
                if self.holds(record) {
                    None
                } else {
                    Some(format!("expected {}", self.describe()))
                }
            }
        }
    }

    /// Renders the tree in infix form.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::All(children) => join_children(children, " AND ", "TRUE"),
            Self::Any(children) => join_children(children, " OR ", "FALSE"),
            Self::Not(child) => format!("NOT {}", child.describe()),
            Self::Predicate(predicate) => predicate.describe(),
        }
    }
}

/// Joins child descriptions with an operator, parenthesized.
fn join_children<P: RecordPredicate>(
    children: &[Box<Expectation<P>>],
    operator: &str,
    empty: &str,
) -> String {
    if children.is_empty() {
        return empty.to_string();
    }
    let parts: Vec<String> = children.iter().map(|child| child.describe()).collect();
    format!("({})", parts.join(operator))
}
