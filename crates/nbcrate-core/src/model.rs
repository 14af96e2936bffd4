//! Core data structures for the crate graph

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number};

/// Ordered property map of a single entity.
pub type Properties = IndexMap<String, Value>;

/// Key holding an entity's identifier in JSON-LD.
pub const ID_KEY: &str = "@id";

/// Key holding an entity's type tag(s) in JSON-LD.
pub const TYPE_KEY: &str = "@type";

/// Build a [`Properties`] map from `key => value` pairs.
#[macro_export]
macro_rules! properties {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = $crate::Properties::new();
        $(map.insert(::std::string::String::from($key), $crate::Value::from($value));)*
        map
    }};
}

/// A property value. Mirrors the shapes JSON-LD uses in a crate document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(Number),
    /// Calendar date, written as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// `{"@id": ...}` reference to another entity.
    Reference(String),
    List(Vec<Value>),
    /// Anything else (booleans, null, embedded objects) carried through untouched.
    Other(serde_json::Value),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn reference(id: impl Into<String>) -> Self {
        Value::Reference(id.into())
    }

    /// A list of references, in the given order.
    pub fn references<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(ids.into_iter().map(|id| Value::Reference(id.into())).collect())
    }

    /// A type tag: a single string for one type, a list otherwise.
    pub fn types(types: &[&str]) -> Self {
        match types {
            [single] => Value::text(*single),
            many => Value::List(many.iter().map(|t| Value::text(*t)).collect()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Referenced identifier, if this is a single reference.
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Value::Reference(id) => Some(id),
            _ => None,
        }
    }

    /// ISO date string for `Date` values and text values.
    ///
    /// ISO dates order lexicographically, so callers compare the returned strings.
    pub fn as_date_string(&self) -> Option<String> {
        match self {
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Value::Text(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Identifiers referenced by this value, whether single or listed.
    pub fn reference_ids(&self) -> Vec<&str> {
        match self {
            Value::Reference(id) => vec![id.as_str()],
            Value::List(items) => items.iter().filter_map(Value::as_reference).collect(),
            _ => Vec::new(),
        }
    }

    /// Text entries of this value, whether single or listed.
    pub fn text_items(&self) -> Vec<&str> {
        match self {
            Value::Text(s) => vec![s.as_str()],
            Value::List(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Convert from the JSON shape found in a crate document.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => match parse_iso_date(&s) {
                Some(date) => Value::Date(date),
                None => Value::Text(s),
            },
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => match reference_target(&map) {
                Some(id) => Value::Reference(id),
                None => Value::Other(serde_json::Value::Object(map)),
            },
            other => Value::Other(other),
        }
    }

    /// Convert to the JSON shape written to a crate document.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Value::Reference(id) => {
                let mut map = Map::new();
                map.insert(ID_KEY.to_string(), serde_json::Value::String(id.clone()));
                serde_json::Value::Object(map)
            }
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Other(v) => v.clone(),
        }
    }
}

/// Only strings that format back to themselves become dates, so the
/// document round-trips byte for byte.
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .filter(|d| d.format("%Y-%m-%d").to_string() == s)
}

fn reference_target(map: &Map<String, serde_json::Value>) -> Option<String> {
    if map.len() != 1 {
        return None;
    }
    map.get(ID_KEY).and_then(|v| v.as_str()).map(str::to_string)
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from_json)
    }
}

/// A uniquely identified node in the crate graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub properties: Properties,
}

impl Entity {
    pub fn new(id: impl Into<String>, properties: Properties) -> Self {
        Entity {
            id: id.into(),
            properties,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Text value of a property.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Set a property, keeping its position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Remove a property, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.shift_remove(key)
    }

    /// Apply `update` over the current properties: new keys are added,
    /// existing keys overwritten, keys missing from `update` retained.
    pub fn overlay(&mut self, update: Properties) {
        for (key, value) in update {
            self.properties.insert(key, value);
        }
    }

    /// All type tags of this entity.
    pub fn types(&self) -> Vec<&str> {
        self.get(TYPE_KEY).map(Value::text_items).unwrap_or_default()
    }

    pub fn has_type(&self, ty: &str) -> bool {
        self.types().contains(&ty)
    }

    /// Identifiers referenced by a relationship property.
    pub fn references(&self, key: &str) -> Vec<&str> {
        self.get(key).map(Value::reference_ids).unwrap_or_default()
    }

    /// Append a reference to a relationship list unless an entry with the
    /// same identifier is already present. Returns whether it was added.
    ///
    /// A single reference is promoted to a list; a missing property becomes
    /// a one-element list.
    pub fn append_reference(&mut self, key: &str, id: &str) -> bool {
        match self.properties.get_mut(key) {
            Some(Value::List(items)) => {
                if items.iter().any(|v| v.as_reference() == Some(id)) {
                    return false;
                }
                items.push(Value::reference(id));
                true
            }
            Some(slot) if matches!(slot, Value::Reference(_)) => {
                if slot.as_reference() == Some(id) {
                    return false;
                }
                let first = std::mem::replace(slot, Value::List(Vec::new()));
                *slot = Value::List(vec![first, Value::reference(id)]);
                true
            }
            _ => {
                self.properties
                    .insert(key.to_string(), Value::List(vec![Value::reference(id)]));
                true
            }
        }
    }

    /// JSON-LD object with `@id` first, then properties in order.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = Map::new();
        map.insert(ID_KEY.to_string(), serde_json::Value::String(self.id.clone()));
        for (key, value) in &self.properties {
            map.insert(key.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }

    /// Parse a JSON-LD object. Returns `None` when `@id` is missing.
    pub fn from_json(map: Map<String, serde_json::Value>) -> Option<Self> {
        let mut id = None;
        let mut properties = Properties::new();
        for (key, value) in map {
            if key == ID_KEY {
                id = value.as_str().map(str::to_string);
            } else {
                properties.insert(key, Value::from_json(value));
            }
        }
        id.map(|id| Entity { id, properties })
    }
}
