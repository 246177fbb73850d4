// crates/search-conformance-core/src/catalog/mod.rs
// ============================================================================
// Module: Scenario Catalog
// Description: Scenario definitions, catalog container, and selection.
// Purpose: Enumerate queries with their oracle rules and expected statuses.
// Dependencies: thiserror, crate::{core, oracle}
// ============================================================================

//! ## Overview
//! A [`Scenario`] pairs a query with the statuses it may return and the
//! oracle rules its results must satisfy. A [`ScenarioCatalog`] keeps
//! scenarios in registry order with unique identifiers; selection narrows a
//! catalog by identifier and feature tag without reordering it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::FeatureTag;
use crate::core::Query;
use crate::core::ScenarioId;
use crate::core::Strictness;
use crate::oracle::OracleRule;
use crate::oracle::PatternError;

mod reference;

pub use reference::CatalogOptions;
pub use reference::DEFAULT_OVERSIZED_QUERY_CHARS;
pub use reference::DEFAULT_OVERSIZED_SEED;
pub use reference::MAX_OVERSIZED_QUERY_CHARS;
pub use reference::MAX_REQUEST_URI_BYTES;
pub use reference::REQUEST_URI_PREFIX_BYTES;
pub use reference::oversized_payload;
pub use reference::reference_catalog;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building or selecting a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// An oracle pattern failed to compile.
    #[error("scenario pattern invalid: {0}")]
    Pattern(#[from] PatternError),
    /// Two scenarios share an identifier.
    #[error("duplicate scenario id: {0}")]
    DuplicateId(ScenarioId),
    /// A selection names a scenario the catalog does not contain.
    #[error("unknown scenario id: {0}")]
    UnknownScenario(ScenarioId),
    /// A catalog option is out of range.
    #[error("invalid catalog option: {0}")]
    InvalidOption(String),
    /// A selection matched no scenario.
    #[error("scenario selection matched no scenarios")]
    EmptySelection,
}

// ============================================================================
// SECTION: Scenario
// ============================================================================

/// One conformance scenario.
///
/// # Invariants
/// - `expected_status` is never empty.
/// - Rules are evaluated in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Stable identifier.
    id: ScenarioId,
    /// Query sent to the service.
    query: Query,
    /// Accepted HTTP statuses.
    expected_status: Vec<u16>,
    /// Oracle rules applied to the response.
    rules: Vec<OracleRule>,
    /// Whether assertion failures block the suite.
    strictness: Strictness,
}

impl Scenario {
    /// Creates a strict scenario expecting status 200 and no rules.
    #[must_use]
    pub fn new(id: impl Into<ScenarioId>, query: Query) -> Self {
        Self {
            id: id.into(),
            query,
            expected_status: vec![200],
            rules: Vec::new(),
            strictness: Strictness::Strict,
        }
    }

    /// Replaces the accepted statuses; an empty list keeps the current set.
    #[must_use]
    pub fn with_expected_status(mut self, statuses: &[u16]) -> Self {
        if !statuses.is_empty() {
            self.expected_status = statuses.to_vec();
        }
        self
    }

    /// Appends an oracle rule.
    #[must_use]
    pub fn with_rule(mut self, rule: OracleRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Marks the scenario best effort.
    #[must_use]
    pub const fn best_effort(mut self) -> Self {
        self.strictness = Strictness::BestEffort;
        self
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &ScenarioId {
        &self.id
    }

    /// Returns the query.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Returns the accepted statuses.
    #[must_use]
    pub fn expected_status(&self) -> &[u16] {
        &self.expected_status
    }

    /// Returns the oracle rules.
    #[must_use]
    pub fn rules(&self) -> &[OracleRule] {
        &self.rules
    }

    /// Returns the strictness.
    #[must_use]
    pub const fn strictness(&self) -> Strictness {
        self.strictness
    }
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Filter applied to a catalog.
///
/// With no includes and no features every scenario is selected. Otherwise a
/// scenario is selected when its id is included or its feature is listed.
/// Exclusions always win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioSelection {
    /// Scenario identifiers to include.
    pub include_ids: Vec<ScenarioId>,
    /// Scenario identifiers to exclude.
    pub exclude_ids: Vec<ScenarioId>,
    /// Feature tags to include.
    pub features: Vec<FeatureTag>,
}

impl ScenarioSelection {
    /// Returns true when the selection keeps every scenario.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.include_ids.is_empty() && self.exclude_ids.is_empty() && self.features.is_empty()
    }

    /// Returns true when `scenario` passes the filter.
    #[must_use]
    pub fn matches(&self, scenario: &Scenario) -> bool {
        if self.exclude_ids.contains(scenario.id()) {
            return false;
        }
        if self.include_ids.is_empty() && self.features.is_empty() {
            return true;
        }
        self.include_ids.contains(scenario.id()) || self.features.contains(&scenario.query().feature())
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Ordered collection of scenarios with unique identifiers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioCatalog {
    /// Scenarios in registry order.
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Builds a catalog, rejecting duplicate identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] when two scenarios share an id.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for scenario in &scenarios {
            if !seen.insert(scenario.id().clone()) {
                return Err(CatalogError::DuplicateId(scenario.id().clone()));
            }
        }
        Ok(Self {
            scenarios,
        })
    }

    /// Returns the number of scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Returns true when the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Iterates scenarios in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    /// Looks up a scenario by identifier.
    #[must_use]
    pub fn get(&self, id: &ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.id() == id)
    }

    /// Returns the scenarios matching `selection`, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownScenario`] when an included or excluded
    /// id is not in the catalog, and [`CatalogError::EmptySelection`] when
    /// nothing is left to run.
    pub fn select(&self, selection: &ScenarioSelection) -> Result<Self, CatalogError> {
        for id in selection.include_ids.iter().chain(&selection.exclude_ids) {
            if self.get(id).is_none() {
                return Err(CatalogError::UnknownScenario(id.clone()));
            }
        }
        let scenarios: Vec<Scenario> = self
            .scenarios
            .iter()
            .filter(|scenario| selection.matches(scenario))
            .cloned()
            .collect();
        if scenarios.is_empty() {
            return Err(CatalogError::EmptySelection);
        }
        Ok(Self {
            scenarios,
        })
    }
}

impl<'a> IntoIterator for &'a ScenarioCatalog {
    type IntoIter = std::slice::Iter<'a, Scenario>;
    type Item = &'a Scenario;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}
