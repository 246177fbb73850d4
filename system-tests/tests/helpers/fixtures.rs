// system-tests/tests/helpers/fixtures.rs
// ============================================================================
// Module: Search Fixtures
// Description: Canned vacancy pages keyed by query text.
// Purpose: Describe a service that honors the query grammar and one that does not.
// Dependencies: serde_json
// ============================================================================

//! Conforming pages satisfy every strict scenario of the reference catalog,
//! matched terms wrapped in highlight markers the way the real service does.
//! The non-conforming set breaks a handful of them in recognizable ways.

use std::collections::BTreeMap;

use serde_json::Value;
use serde_json::json;

/// Query sent by `boolean.not`.
pub const NOT_QUERY: &str = "столяр NOT плотник NOT электрик";
/// Query sent by `negative.nonsense_token`.
pub const NONSENSE_QUERY: &str = "абрашвабракадабра";
/// Query sent by `security.html_injection`.
pub const HTML_QUERY: &str = "<h1>Hello World</h1>";
/// Record id the non-conforming service leaks into `boolean.not`.
pub const LEAKED_RECORD_ID: &str = "leak-1";

/// Builds one vacancy item.
fn item(id: &str, name: &str, employer: &str, requirement: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "employer": { "name": employer },
        "snippet": { "requirement": requirement, "responsibility": null },
    })
}

/// Serializes a page whose `found` equals its item count.
fn page(items: Vec<Value>) -> String {
    json!({ "found": items.len(), "items": items }).to_string()
}

/// Pages of a service that honors the grammar.
pub fn conforming() -> BTreeMap<String, String> {
    let mut fixtures = BTreeMap::new();
    let mut add = |query: &str, items: Vec<Value>| {
        fixtures.insert(query.to_string(), page(items));
    };
    add("", vec![item("100", "Курьер", "Доставка", None)]);
    add(
        "программист",
        vec![
            item("101", "<highlighttext>Программист</highlighttext> Rust", "Яндекс", None),
            item(
                "102",
                "Backend developer",
                "Тинькофф",
                Some("Опыт работы <highlighttext>программистом</highlighttext>"),
            ),
        ],
    );
    add(
        "директор магазина",
        vec![item("103", "Директор <highlighttext>магазина</highlighttext>", "Пятёрочка", None)],
    );
    add(
        "\"директор магазина\"",
        vec![item(
            "104",
            "<highlighttext>Директор</highlighttext> <highlighttext>магазина</highlighttext>",
            "Магнит",
            None,
        )],
    );
    add("продажи", vec![item("105", "Менеджер по продажам", "Ромашка", None)]);
    add(
        "!продажи",
        vec![item("106", "Специалист", "Ромашка", Some("Опыт <highlighttext>продажи</highlighttext>"))],
    );
    add(
        "Гео*",
        vec![
            item("107", "<highlighttext>Геолог</highlighttext>", "Недра", None),
            item("108", "Инженер-<highlighttext>геодезист</highlighttext>", "Стройгео", None),
        ],
    );
    add("пиарщик", vec![item("109", "PR-менеджер", "Агентство", None)]);
    add(
        "столяр OR плотник",
        vec![
            item("110", "<highlighttext>Столяр</highlighttext>", "Мебель", None),
            item("111", "<highlighttext>Плотник</highlighttext>-бетонщик", "Стройка", None),
        ],
    );
    add(
        "\"холодильное оборудование\" AND \"торговое оборудование\"",
        vec![item(
            "112",
            "Механик",
            "Сервис",
            Some("Ремонт: холодильное оборудование и торгового оборудования"),
        )],
    );
    add(
        NOT_QUERY,
        vec![item("113", "<highlighttext>Столяр</highlighttext> мебельного цеха", "Мебель", None)],
    );
    add(
        "(столяр OR столяр-плотник) AND (электрик OR сантехник)",
        vec![
            item("114", "Столяр-электрик", "ЖЭК", None),
            item("115", "Столяр", "ЖЭК", Some("Помощь сантехнику")),
        ],
    );
    add(
        "NAME:(python OR java) and COMPANY_NAME:HeadHunter",
        vec![
            item("116", "<highlighttext>Python</highlighttext> developer", "HeadHunter", None),
            item("117", "Senior Java Engineer", "HeadHunter", None),
        ],
    );
    fixtures
}

/// Pages of a service that ignores `NOT`, matches nonsense, and echoes markup.
pub fn nonconforming() -> BTreeMap<String, String> {
    let mut fixtures = conforming();
    fixtures.insert(
        NOT_QUERY.to_string(),
        page(vec![
            item(LEAKED_RECORD_ID, "Столяр-плотник", "Мебель", None),
            item("113", "Столяр мебельного цеха", "Мебель", None),
        ]),
    );
    fixtures.insert(
        NONSENSE_QUERY.to_string(),
        page(vec![item("leak-2", "Абракадабра", "Нигде", None)]),
    );
    fixtures.insert(
        HTML_QUERY.to_string(),
        json!({ "found": 0, "items": [], "request": { "text": HTML_QUERY } }).to_string(),
    );
    fixtures
}
