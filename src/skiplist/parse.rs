// Raw YAML layer for skip lists
//
// serde_yaml's own Mapping rejects repeated keys outright, so the top level is
// read through a visitor that keeps every (key, value) pair in document order.
// Duplicate handling is then decided by the registry's load policy.

use super::error::MalformedInput;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_yaml::Value;
use std::fmt;

/// Top level of a skip-list document before validation
#[derive(Debug)]
pub(crate) enum RawDocument {
    Empty,
    Mapping(Vec<(Value, Value)>),
    Other(&'static str),
}

impl<'de> Deserialize<'de> for RawDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawDocumentVisitor)
    }
}

struct RawDocumentVisitor;

impl<'de> Visitor<'de> for RawDocumentVisitor {
    type Value = RawDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of operator names")
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawDocument, E> {
        Ok(RawDocument::Empty)
    }

    fn visit_none<E: de::Error>(self) -> Result<RawDocument, E> {
        Ok(RawDocument::Empty)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<RawDocument, E> {
        Ok(RawDocument::Other("boolean"))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<RawDocument, E> {
        Ok(RawDocument::Other("number"))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<RawDocument, E> {
        Ok(RawDocument::Other("number"))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<RawDocument, E> {
        Ok(RawDocument::Other("number"))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<RawDocument, E> {
        Ok(RawDocument::Other("string"))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawDocument, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawDocument::Other("sequence"))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawDocument, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<Value, Value>()? {
            entries.push((key, value));
        }
        Ok(RawDocument::Mapping(entries))
    }
}

/// Parse YAML text into the raw top-level shape
pub(crate) fn parse_document(text: &str) -> Result<RawDocument, MalformedInput> {
    if !has_content(text) {
        return Ok(RawDocument::Empty);
    }
    Ok(serde_yaml::from_str(text)?)
}

/// True if the text holds anything besides blank lines and comments
fn has_content(text: &str) -> bool {
    text.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    })
}

/// Validate a mapping key as an operator name
pub(crate) fn operator_name(key: Value) -> Result<String, MalformedInput> {
    match key {
        Value::String(name) => Ok(name),
        other => Err(MalformedInput::NonStringKey {
            key: render(&other),
        }),
    }
}

/// Validate an entry value; an empty result means the whole operator is skipped
pub(crate) fn implementation_names(
    operator: &str,
    value: Value,
) -> Result<Vec<String>, MalformedInput> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(name) => Ok(name),
                other => Err(MalformedInput::NonStringImplementation {
                    operator: operator.to_string(),
                    index,
                    found: kind(&other),
                }),
            })
            .collect(),
        other => Err(MalformedInput::InvalidEntry {
            operator: operator.to_string(),
            found: kind(&other),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn render(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", value))
}
