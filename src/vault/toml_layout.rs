//! TOML rendering that keeps comments and formatting.
//!
//! Parsing keeps the `toml_edit::DocumentMut` next to the plain values.
//! Rendering starts from that layout and syncs it with the current
//! values:
//!
//! - entries whose value did not change are left untouched (comments,
//!   quoting and whitespace survive),
//! - changed scalars are replaced but keep their surrounding decoration,
//! - nested tables are synced recursively,
//! - removed keys are dropped and new keys appended.
//!
//! A document without a layout is synced into an empty TOML document,
//! which is how JSON documents get rendered as TOML.

use serde_json::{Map, Number, Value as Json};
use toml_edit::{Array, DocumentMut, InlineTable, Item, Table, Value};

use super::document::SecretsDocument;
use crate::errors::{Result, VaultError};

/// Parse TOML text into a document that remembers its layout.
pub fn parse(text: &str) -> Result<SecretsDocument> {
    let layout: DocumentMut = text
        .parse()
        .map_err(|e: toml_edit::TomlError| VaultError::MalformedDocument(e.to_string()))?;
    let values = table_to_json(layout.as_table())?;
    Ok(SecretsDocument::with_layout(values, layout))
}

/// Render a document as TOML, reusing its layout when it has one.
pub fn render(doc: &SecretsDocument) -> Result<String> {
    let mut layout = doc.layout().cloned().unwrap_or_default();
    sync_table(layout.as_table_mut(), doc.as_map(), "")?;
    Ok(layout.to_string())
}

// ---------------------------------------------------------------------------
// TOML -> JSON values
// ---------------------------------------------------------------------------

fn table_to_json(table: &Table) -> Result<Map<String, Json>> {
    let mut map = Map::new();
    for (key, item) in table.iter() {
        if let Some(value) = item_to_json(item)? {
            map.insert(key.to_string(), value);
        }
    }
    Ok(map)
}

fn item_to_json(item: &Item) -> Result<Option<Json>> {
    Ok(match item {
        Item::None => None,
        Item::Value(value) => Some(value_to_json(value)?),
        Item::Table(table) => Some(Json::Object(table_to_json(table)?)),
        Item::ArrayOfTables(tables) => Some(Json::Array(
            tables
                .iter()
                .map(|t| table_to_json(t).map(Json::Object))
                .collect::<Result<Vec<_>>>()?,
        )),
    })
}

fn value_to_json(value: &Value) -> Result<Json> {
    Ok(match value {
        Value::String(s) => Json::String(s.value().clone()),
        Value::Integer(i) => Json::from(*i.value()),
        Value::Float(f) => {
            let number = Number::from_f64(*f.value()).ok_or_else(|| {
                VaultError::MalformedDocument(format!("unsupported float value {}", f.value()))
            })?;
            Json::Number(number)
        }
        Value::Boolean(b) => Json::Bool(*b.value()),
        Value::Datetime(dt) => Json::String(dt.value().to_string()),
        Value::Array(array) => Json::Array(
            array
                .iter()
                .map(value_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::InlineTable(table) => {
            let mut map = Map::new();
            for (key, value) in table.iter() {
                map.insert(key.to_string(), value_to_json(value)?);
            }
            Json::Object(map)
        }
    })
}

// ---------------------------------------------------------------------------
// JSON values -> TOML
// ---------------------------------------------------------------------------

/// Bring `table` in line with `values`, keeping untouched entries as-is.
fn sync_table(table: &mut Table, values: &Map<String, Json>, prefix: &str) -> Result<()> {
    let stale: Vec<String> = table
        .iter()
        .map(|(key, _)| key.to_string())
        .filter(|key| !values.contains_key(key))
        .collect();
    for key in stale {
        table.remove(&key);
    }

    for (key, value) in values {
        let path = join_path(prefix, key);
        match table.get_mut(key) {
            Some(item) => sync_item(item, value, &path)?,
            None => {
                table.insert(key, json_to_item(value, &path)?);
            }
        }
    }
    Ok(())
}

fn sync_item(item: &mut Item, value: &Json, path: &str) -> Result<()> {
    let unchanged = matches!(item_to_json(item), Ok(Some(ref current)) if current == value);
    if unchanged {
        return Ok(());
    }

    match (item, value) {
        (Item::Table(table), Json::Object(map)) => sync_table(table, map, path),
        (Item::Value(current), _) => {
            let decor = current.decor().clone();
            let mut replacement = json_to_value(value, path)?;
            *replacement.decor_mut() = decor;
            *current = replacement;
            Ok(())
        }
        (item, _) => {
            *item = json_to_item(value, path)?;
            Ok(())
        }
    }
}

/// Mappings become standard tables; everything else a plain value.
fn json_to_item(value: &Json, path: &str) -> Result<Item> {
    match value {
        Json::Object(map) => {
            let mut table = Table::new();
            sync_table(&mut table, map, path)?;
            Ok(Item::Table(table))
        }
        other => Ok(Item::Value(json_to_value(other, path)?)),
    }
}

fn json_to_value(value: &Json, path: &str) -> Result<Value> {
    Ok(match value {
        Json::Null => {
            return Err(VaultError::Serialization(format!(
                "'{path}' is null, which TOML cannot represent"
            )));
        }
        Json::Bool(b) => Value::from(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if n.is_u64() {
                return Err(VaultError::Serialization(format!(
                    "'{path}' is {n}, which exceeds the TOML integer range"
                )));
            } else {
                Value::from(n.as_f64().unwrap_or_default())
            }
        }
        Json::String(s) => Value::from(s.as_str()),
        Json::Array(items) => {
            let mut array = Array::new();
            for (index, item) in items.iter().enumerate() {
                array.push(json_to_value(item, &join_path(path, &index.to_string()))?);
            }
            Value::Array(array)
        }
        Json::Object(map) => {
            let mut table = InlineTable::new();
            for (key, item) in map {
                table.insert(key.as_str(), json_to_value(item, &join_path(path, key))?);
            }
            Value::InlineTable(table)
        }
    })
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
