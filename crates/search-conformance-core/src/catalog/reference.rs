// crates/search-conformance-core/src/catalog/reference.rs
// ============================================================================
// Module: Reference Scenario Catalog
// Description: The eighteen scenarios of the vacancy search conformance suite.
// Purpose: Encode each documented grammar feature as a checkable scenario.
// Dependencies: rand, crate::{core, oracle}
// ============================================================================

//! ## Overview
//! The reference catalog targets a vacancy search service whose grammar
//! supports phrases, exact forms, wildcards, boolean operators, grouping, and
//! `FIELD:` scoping. All patterns compile here, so a catalog that builds can
//! always be evaluated. The oversized payload is drawn from a seeded
//! generator, so reruns send identical queries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::catalog::CatalogError;
use crate::catalog::Scenario;
use crate::catalog::ScenarioCatalog;
use crate::core::FeatureTag;
use crate::core::Query;
use crate::normalize::RecordField;
use crate::oracle::CaseMode;
use crate::oracle::Expectation;
use crate::oracle::OracleRule;
use crate::oracle::PhraseTerm;
use crate::oracle::ProximityPattern;
use crate::oracle::RecordMatcher;
use crate::oracle::WhitespaceGap;
use crate::oracle::WildcardPattern;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Largest request URI the HTTP stack accepts, in bytes.
pub const MAX_REQUEST_URI_BYTES: usize = 65_534;
/// Bytes of the request URI held back for the endpoint and parameter name.
pub const REQUEST_URI_PREFIX_BYTES: usize = 4_096;
/// Worst-case URL-encoded width of one payload character.
const MAX_ENCODED_BYTES_PER_CHAR: usize = 3;
/// Longest oversized query whose encoded request URI still fits on the wire.
pub const MAX_OVERSIZED_QUERY_CHARS: usize =
    (MAX_REQUEST_URI_BYTES - REQUEST_URI_PREFIX_BYTES) / MAX_ENCODED_BYTES_PER_CHAR;
/// Default oversized query length in characters.
pub const DEFAULT_OVERSIZED_QUERY_CHARS: usize = 16_384;
/// Default seed for the oversized payload generator.
pub const DEFAULT_OVERSIZED_SEED: u64 = 0x5EED_0414;
/// Status a service returns for an over-long request URI.
const URI_TOO_LONG: u16 = 414;
/// Printable ASCII alphabet: digits, letters, punctuation, whitespace.
const PRINTABLE: &[u8] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ \t\n\r\x0b\x0c";

/// Tunables for the reference catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Length of the oversized query in characters.
    pub oversized_query_chars: usize,
    /// Seed for the oversized payload.
    pub oversized_seed: u64,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            oversized_query_chars: DEFAULT_OVERSIZED_QUERY_CHARS,
            oversized_seed: DEFAULT_OVERSIZED_SEED,
        }
    }
}

/// Generates a deterministic printable payload of `chars` characters.
#[must_use]
pub fn oversized_payload(chars: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    (0 .. chars).filter_map(|_| PRINTABLE.choose(&mut rng).map(|byte| char::from(*byte))).collect()
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Builds the reference catalog.
///
/// # Errors
///
/// Returns [`CatalogError`] when the oversized length is zero or too long to
/// fit in a request URI, or when a pattern fails to compile.
pub fn reference_catalog(options: &CatalogOptions) -> Result<ScenarioCatalog, CatalogError> {
    if options.oversized_query_chars == 0
        || options.oversized_query_chars > MAX_OVERSIZED_QUERY_CHARS
    {
        return Err(CatalogError::InvalidOption(format!(
            "oversized_query_chars must be between 1 and {MAX_OVERSIZED_QUERY_CHARS}"
        )));
    }
    let mut scenarios = Vec::with_capacity(18);
    scenarios.extend(positive_scenarios()?);
    scenarios.extend(security_scenarios(options));
    scenarios.extend(negative_scenarios());
    ScenarioCatalog::new(scenarios)
}

/// Grammar feature scenarios that expect matching results.
fn positive_scenarios() -> Result<Vec<Scenario>, CatalogError> {
    let near_phrase = ProximityPattern::new(
        vec![PhraseTerm::new("директор", 0, 2), PhraseTerm::new("магазин", 0, 2)],
        WhitespaceGap::SINGLE,
    )?;
    let fridge_equipment = ProximityPattern::new(
        vec![PhraseTerm::new("холодильн", 2, 4), PhraseTerm::new("оборудовани", 1, 3)],
        WhitespaceGap::new(0, 2),
    )?;
    let retail_equipment = ProximityPattern::new(
        vec![PhraseTerm::new("торгов", 0, 4), PhraseTerm::new("оборудовани", 1, 3)],
        WhitespaceGap::new(1, 2),
    )?;
    let grouped = Expectation::all([
        Expectation::any([
            Expectation::predicate(RecordMatcher::contains("столяр")),
            Expectation::predicate(RecordMatcher::contains("столяр-плотник")),
        ]),
        Expectation::any([
            Expectation::predicate(RecordMatcher::contains("электрик")),
            Expectation::predicate(RecordMatcher::contains("сантехник")),
        ]),
    ]);
    let field_scoped = Expectation::all([
        Expectation::any([
            Expectation::predicate(RecordMatcher::field(
                RecordField::Name,
                "python",
                CaseMode::Insensitive,
            )),
            Expectation::predicate(RecordMatcher::field(
                RecordField::Name,
                "java",
                CaseMode::Insensitive,
            )),
        ]),
        Expectation::predicate(RecordMatcher::field(
            RecordField::EmployerName,
            "HeadHunter",
            CaseMode::Exact,
        )),
    ]);

    Ok(vec![
        Scenario::new("smoke", Query::new("", FeatureTag::Smoke))
            .with_rule(OracleRule::status(&[200])),
        Scenario::new("term.single_word", Query::new("программист", FeatureTag::Term))
            .with_rule(OracleRule::term("программист")),
        Scenario::new("term.two_words", Query::new("директор магазина", FeatureTag::MultiTerm))
            .with_rule(OracleRule::multi_term("директор магазина")),
        Scenario::new(
            "phrase.quoted_near",
            Query::new("\"директор магазина\"", FeatureTag::Phrase),
        )
        .with_rule(OracleRule::Phrase(near_phrase)),
        Scenario::new("morphology.word_forms", Query::new("продажи", FeatureTag::WordForms))
            .with_rule(OracleRule::word_forms("продажи", "продаж"))
            .best_effort(),
        Scenario::new("morphology.exact_form", Query::new("!продажи", FeatureTag::ExactForm))
            .with_rule(OracleRule::exact_form("!продажи")),
        Scenario::new("wildcard.prefix", Query::new("Гео*", FeatureTag::Wildcard))
            .with_rule(OracleRule::Wildcard(WildcardPattern::new("Гео*")?)),
        Scenario::new("synonym.expansion", Query::new("пиарщик", FeatureTag::Synonym))
            .with_rule(OracleRule::synonym("пиарщик", &["pr-менеджер"]))
            .best_effort(),
        Scenario::new("boolean.or", Query::new("столяр OR плотник", FeatureTag::BooleanOr))
            .with_rule(OracleRule::any_of(&["столяр", "плотник"])),
        Scenario::new(
            "boolean.and_phrases",
            Query::new(
                "\"холодильное оборудование\" AND \"торговое оборудование\"",
                FeatureTag::BooleanAnd,
            ),
        )
        .with_rule(OracleRule::AllOf(vec![
            OracleRule::Phrase(fridge_equipment),
            OracleRule::Phrase(retail_equipment),
        ])),
        Scenario::new(
            "boolean.not",
            Query::new("столяр NOT плотник NOT электрик", FeatureTag::BooleanNot),
        )
        .with_rule(OracleRule::exclusion("столяр", &["плотник", "электрик"])),
        Scenario::new(
            "boolean.grouped",
            Query::new(
                "(столяр OR столяр-плотник) AND (электрик OR сантехник)",
                FeatureTag::Grouped,
            ),
        )
        .with_rule(OracleRule::Grouped(grouped)),
        Scenario::new(
            "field.name_and_company",
            Query::new(
                "NAME:(python OR java) and COMPANY_NAME:HeadHunter",
                FeatureTag::FieldScoped,
            ),
        )
        .with_rule(OracleRule::FieldScoped(field_scoped)),
    ])
}

/// Injection and boundary-size probes.
fn security_scenarios(options: &CatalogOptions) -> Vec<Scenario> {
    let sql_payload = "столяр+UNION+SELECT+*+FROM+accounts";
    let html_payload = "<h1>Hello World</h1>";
    let oversized = oversized_payload(options.oversized_query_chars, options.oversized_seed);
    vec![
        Scenario::new("security.sql_injection", Query::new(sql_payload, FeatureTag::SecurityProbe))
            .with_rule(OracleRule::status(&[200]))
            .with_rule(OracleRule::Cardinality {
                expected: 0,
            }),
        Scenario::new(
            "security.html_injection",
            Query::new(html_payload, FeatureTag::SecurityProbe),
        )
        .with_rule(OracleRule::status(&[200]))
        .with_rule(OracleRule::Cardinality {
            expected: 0,
        })
        .with_rule(OracleRule::echo_absent(html_payload)),
        Scenario::new(
            "security.oversized_input",
            Query::new(oversized, FeatureTag::OversizedInput),
        )
        .with_expected_status(&[URI_TOO_LONG])
        .with_rule(OracleRule::status(&[URI_TOO_LONG])),
    ]
}

/// Queries that must match nothing.
fn negative_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "negative.nonsense_token",
            Query::new("абрашвабракадабра", FeatureTag::Nonsense),
        )
        .with_rule(OracleRule::Cardinality {
            expected: 0,
        }),
        Scenario::new(
            "negative.invalid_field_names",
            Query::new(
                "NAMES:(python OR java) and COMPANY_NAMES:HeadHunter",
                FeatureTag::InvalidField,
            ),
        )
        .with_rule(OracleRule::Cardinality {
            expected: 0,
        }),
    ]
}
