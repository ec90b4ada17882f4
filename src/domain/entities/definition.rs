use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a data column as known to the host page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnKey(pub String);

impl ColumnKey {
    pub fn new(key: impl Into<String>) -> Self {
        ColumnKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnKey {
    fn from(value: &str) -> Self {
        ColumnKey(value.to_string())
    }
}

impl From<String> for ColumnKey {
    fn from(value: String) -> Self {
        ColumnKey(value)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filter clauses are interpreted by the host; the engine only carries them.
pub type FilterClause = Value;
/// Sort clauses are interpreted by the host; the engine only carries them.
pub type SortClause = Value;

/// Serializable description of a grid layout plus its data-level state.
///
/// `columns` lists the visible keys, `columns_order` is the authoritative
/// layout order. Field names on the wire follow the persisted format
/// (`pageSize`, `quickSearch`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub columns: Vec<ColumnKey>,
    pub columns_order: Vec<ColumnKey>,
    pub filters: Vec<FilterClause>,
    pub sort: Vec<SortClause>,
    #[serde(rename = "pageSize")]
    pub page_size: u64,
    #[serde(rename = "quickSearch")]
    pub quick_search: String,
}

impl ViewDefinition {
    /// All known columns visible in their natural order, no filters or sort.
    pub fn all_columns(known_keys: &[ColumnKey]) -> Self {
        let keys = dedup_keys(known_keys.iter(), None);
        ViewDefinition {
            columns: keys.clone(),
            columns_order: keys,
            ..ViewDefinition::default()
        }
    }

    /// Parses stored JSON leniently; unreadable input yields an empty definition.
    pub fn from_json_str(raw: &str) -> Self {
        let value = serde_json::from_str::<Value>(raw).unwrap_or(Value::Null);
        normalize(&value)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Coerces arbitrary input into the canonical definition shape. Never fails.
pub fn normalize(raw: &Value) -> ViewDefinition {
    let Some(object) = raw.as_object() else {
        return ViewDefinition::default();
    };

    ViewDefinition {
        columns: key_list(object.get("columns")),
        columns_order: key_list(object.get("columns_order")),
        filters: clause_list(object.get("filters")),
        sort: clause_list(object.get("sort")),
        page_size: page_size(object.get("pageSize")),
        quick_search: quick_search(object.get("quickSearch")),
    }
}

/// Restricts a definition to the known column universe.
///
/// Unknown keys and repeats are dropped (first occurrence wins). An empty
/// `columns` falls back to `known_keys`; an empty `columns_order` falls back
/// to the sanitized `columns`, then to `known_keys`.
pub fn sanitize_against_known_keys(
    definition: &ViewDefinition,
    known_keys: &[ColumnKey],
) -> ViewDefinition {
    let known: HashSet<&ColumnKey> = known_keys.iter().collect();
    let all_known = dedup_keys(known_keys.iter(), None);

    let mut columns = dedup_keys(definition.columns.iter(), Some(&known));
    if columns.is_empty() {
        columns = all_known.clone();
    }

    let mut columns_order = dedup_keys(definition.columns_order.iter(), Some(&known));
    if columns_order.is_empty() {
        columns_order = if columns.is_empty() {
            all_known
        } else {
            columns.clone()
        };
    }

    ViewDefinition {
        columns,
        columns_order,
        filters: definition.filters.clone(),
        sort: definition.sort.clone(),
        page_size: definition.page_size,
        quick_search: definition.quick_search.clone(),
    }
}

pub(crate) fn dedup_keys<'a>(
    keys: impl Iterator<Item = &'a ColumnKey>,
    allowed: Option<&HashSet<&ColumnKey>>,
) -> Vec<ColumnKey> {
    let mut seen: HashSet<&ColumnKey> = HashSet::new();
    let mut out = Vec::new();
    for key in keys {
        if let Some(allowed) = allowed {
            if !allowed.contains(key) {
                continue;
            }
        }
        if seen.insert(key) {
            out.push(key.clone());
        }
    }
    out
}

fn key_list(value: Option<&Value>) -> Vec<ColumnKey> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text.trim().to_string()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .map(ColumnKey)
        .collect()
}

fn clause_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn page_size(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(number)) => {
            if let Some(n) = number.as_u64() {
                n
            } else if let Some(f) = number.as_f64() {
                if f.is_finite() && f > 0.0 {
                    f.floor() as u64
                } else {
                    0
                }
            } else {
                0
            }
        }
        Some(Value::String(text)) => text.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

fn quick_search(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn keys(names: &[&str]) -> Vec<ColumnKey> {
        names.iter().map(|name| ColumnKey::from(*name)).collect()
    }

    #[test]
    fn normalize_fills_missing_fields() {
        let definition = normalize(&json!({ "columns": ["a", 7, null, ""] }));

        assert_eq!(definition.columns, keys(&["a", "7"]));
        assert!(definition.columns_order.is_empty());
        assert!(definition.filters.is_empty());
        assert_eq!(definition.page_size, 0);
        assert_eq!(definition.quick_search, "");
    }

    #[test]
    fn normalize_coerces_scalars() {
        let definition = normalize(&json!({
            "pageSize": -4,
            "quickSearch": 12,
            "filters": {"not": "an array"},
            "sort": [{"key": "name", "dir": "asc"}],
        }));

        assert_eq!(definition.page_size, 0);
        assert_eq!(definition.quick_search, "12");
        assert!(definition.filters.is_empty());
        assert_eq!(definition.sort.len(), 1);

        assert_eq!(normalize(&json!({ "pageSize": "25" })).page_size, 25);
        assert_eq!(normalize(&json!({ "pageSize": 12.7 })).page_size, 12);
        assert_eq!(normalize(&json!("garbage")), ViewDefinition::default());
    }

    #[test]
    fn sanitize_drops_unknown_and_duplicate_keys() {
        let known = keys(&["a", "b", "c"]);
        let definition = ViewDefinition {
            columns: keys(&["c", "x", "c", "a"]),
            columns_order: keys(&["b", "b", "y", "a"]),
            ..ViewDefinition::default()
        };

        let sanitized = sanitize_against_known_keys(&definition, &known);

        assert_eq!(sanitized.columns, keys(&["c", "a"]));
        assert_eq!(sanitized.columns_order, keys(&["b", "a"]));
    }

    #[test]
    fn sanitize_order_falls_back_to_columns_then_known() {
        let known = keys(&["a", "b", "c"]);
        let only_columns = ViewDefinition {
            columns: keys(&["c", "b"]),
            columns_order: keys(&["zzz"]),
            ..ViewDefinition::default()
        };
        let sanitized = sanitize_against_known_keys(&only_columns, &known);
        assert_eq!(sanitized.columns_order, keys(&["c", "b"]));

        let sanitized = sanitize_against_known_keys(&ViewDefinition::default(), &known);
        assert_eq!(sanitized.columns, known);
        assert_eq!(sanitized.columns_order, known);
    }

    #[test]
    fn stored_json_round_trips_through_lenient_parser() {
        let definition = ViewDefinition {
            columns: keys(&["a"]),
            columns_order: keys(&["a", "b"]),
            filters: vec![json!({"key": "a", "op": "eq", "value": 1})],
            sort: vec![],
            page_size: 50,
            quick_search: "smith".to_string(),
        };

        let parsed = ViewDefinition::from_json_str(&definition.to_json_string());

        assert_eq!(parsed, definition);
        assert_eq!(ViewDefinition::from_json_str("{not json"), ViewDefinition::default());
    }

    fn arb_key() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("a".to_string()),
            Just("b".to_string()),
            Just("c".to_string()),
            Just("d".to_string()),
            "[a-z]{1,3}",
        ]
    }

    proptest! {
        #[test]
        fn sanitize_never_yields_empty_or_unknown(
            columns in prop::collection::vec(arb_key(), 0..8),
            order in prop::collection::vec(arb_key(), 0..8),
        ) {
            let known = keys(&["a", "b", "c", "d"]);
            let definition = normalize(&json!({ "columns": columns, "columns_order": order }));

            let sanitized = sanitize_against_known_keys(&definition, &known);

            prop_assert!(!sanitized.columns.is_empty());
            prop_assert!(!sanitized.columns_order.is_empty());
            for list in [&sanitized.columns, &sanitized.columns_order] {
                prop_assert!(list.iter().all(|key| known.contains(key)));
                let unique: HashSet<&ColumnKey> = list.iter().collect();
                prop_assert_eq!(unique.len(), list.len());
            }
        }

        #[test]
        fn sanitize_is_idempotent(
            columns in prop::collection::vec(arb_key(), 0..8),
            order in prop::collection::vec(arb_key(), 0..8),
            search in ".{0,6}",
        ) {
            let known = keys(&["a", "b", "c", "d"]);
            let raw = json!({ "columns": columns, "columns_order": order, "quickSearch": search });

            let once = sanitize_against_known_keys(&normalize(&raw), &known);
            let reparsed = normalize(&serde_json::to_value(&once).unwrap());
            let twice = sanitize_against_known_keys(&reparsed, &known);

            prop_assert_eq!(once, twice);
        }
    }
}
