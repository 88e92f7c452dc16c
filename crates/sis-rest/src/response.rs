//! Normalized view over an SIS response body.
//!
//! [`Response`] owns the payload that [`infer`](crate::infer::infer) dug out
//! of the envelope and exposes it as a map, an indexed list and a sequence,
//! whichever shape it happens to be.
//!
//! ## Table records
//!
//! Table endpoints (`/ws/schema/table/...`) name the table in the document's
//! `name` field and nest every row as `{"tables": {"<name>": {...}}}`.
//! Integer-indexed reads and iteration look through that wrapper; call
//! [`Response::squash_table_response`] to rewrite the data itself.
//!
//! ## Caching
//!
//! `Response` implements `Serialize`/`Deserialize` for its whole state
//! (`data`, `table_name`, `expansions`, `extensions`), so it can be stored
//! in any serde format and restored unchanged. [`Response::to_json`] is
//! different: it encodes only the current payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::infer::infer;

/// Position in a [`Response`]: a list index or a record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Offset {
    Index(usize),
    Key(String),
}

impl From<usize> for Offset {
    fn from(index: usize) -> Self {
        Offset::Index(index)
    }
}

// Untyped integer literals default to i32, so `get(0)` needs this impl.
impl From<i32> for Offset {
    fn from(index: i32) -> Self {
        match usize::try_from(index) {
            Ok(i) => Offset::Index(i),
            Err(_) => Offset::Key(index.to_string()),
        }
    }
}

impl From<u32> for Offset {
    fn from(index: u32) -> Self {
        Offset::Index(index as usize)
    }
}

impl From<&str> for Offset {
    fn from(key: &str) -> Self {
        Offset::Key(key.to_string())
    }
}

impl From<String> for Offset {
    fn from(key: String) -> Self {
        Offset::Key(key)
    }
}

impl From<&String> for Offset {
    fn from(key: &String) -> Self {
        Offset::Key(key.clone())
    }
}

/// Normalized SIS response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default = "empty_list")]
    data: Value,
    #[serde(default)]
    table_name: Option<String>,
    #[serde(default)]
    expansions: Vec<String>,
    #[serde(default)]
    extensions: Vec<String>,
}

/// Largest run of nulls [`Response::set`] will pad a list with.
pub const MAX_LIST_GAP: usize = 1024;

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

impl Default for Response {
    fn default() -> Self {
        Self {
            data: empty_list(),
            table_name: None,
            expansions: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

impl Response {
    /// Normalize a decoded response body for the entity `key`
    /// (for example `"student"`). The key is matched case-insensitively.
    pub fn new(doc: Value, key: &str) -> Self {
        let table_name = doc
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_lowercase)
            .filter(|name| !name.is_empty());

        let inferred = infer(doc, &key.to_lowercase());

        Self {
            data: inferred.data,
            table_name,
            expansions: inferred.expansions.unwrap_or_default(),
            extensions: inferred.extensions.unwrap_or_default(),
        }
    }

    /// The current payload.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Replace the payload. Expansions and the table name are kept.
    pub fn set_data(&mut self, data: Value) -> &mut Self {
        self.data = data;
        self
    }

    /// Lower-cased table name, for table endpoints.
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Expansions the endpoint advertised in `@expansions`.
    pub fn expansions(&self) -> &[String] {
        &self.expansions
    }

    /// Extensions the endpoint advertised in `@extensions`.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// True when the payload is a list of records.
    pub fn is_list(&self) -> bool {
        self.data.is_array()
    }

    /// True when the payload is a single record.
    pub fn is_record(&self) -> bool {
        self.data.is_object()
    }

    /// Replace every record with its `tables.<table_name>` value.
    ///
    /// A list stays a list and a single record stays a single record.
    /// Records without the wrapper are left as they are. Does nothing when
    /// the response has no table name.
    pub fn squash_table_response(&mut self) -> &mut Self {
        let Some(table) = self.table_name.as_deref() else {
            return self;
        };

        self.data = match std::mem::take(&mut self.data) {
            Value::Array(records) => Value::Array(
                records
                    .into_iter()
                    .map(|record| unwrap_table(record, table))
                    .collect(),
            ),
            record @ Value::Object(_) => unwrap_table(record, table),
            other => other,
        };
        self
    }

    /// Number of records (list) or fields (single record).
    pub fn len(&self) -> usize {
        match &self.data {
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            Value::Null => 0,
            _ => 1,
        }
    }

    /// True when there is nothing in the payload.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read by index or key.
    ///
    /// Integer reads on a list return `tables.<table_name>` of the element
    /// when present. Keys containing `.` fall back to a path lookup
    /// (`"addresses.physical.city"`) when no field has that exact name.
    pub fn get(&self, offset: impl Into<Offset>) -> Option<&Value> {
        match self.resolve(offset.into()) {
            Offset::Index(i) => match &self.data {
                Value::Array(items) => items
                    .get(i)
                    .map(|item| project(item, self.table_name.as_deref())),
                Value::Object(map) => map.get(&i.to_string()),
                _ => None,
            },
            Offset::Key(key) => lookup_key(&self.data, &key),
        }
    }

    /// A top-level field of a single-record payload.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.as_object()?.get(name)
    }

    /// True if the offset holds a non-null value.
    pub fn exists(&self, offset: impl Into<Offset>) -> bool {
        self.get(offset).is_some_and(|value| !value.is_null())
    }

    /// Write by index or key.
    ///
    /// Writing a little past the end of a list pads it with nulls; an index
    /// more than [`MAX_LIST_GAP`] past the end is stored as a keyed field
    /// instead. Writing a key into a list turns the payload into a record
    /// keyed by position.
    pub fn set(&mut self, offset: impl Into<Offset>, value: Value) -> &mut Self {
        match self.resolve(offset.into()) {
            Offset::Index(i) => {
                if self.data.is_null() {
                    self.data = empty_list();
                }
                if let Value::Array(items) = &mut self.data {
                    if i < items.len() {
                        items[i] = value;
                        return self;
                    }
                    if let Some(new_len) = i
                        .checked_add(1)
                        .filter(|_| i - items.len() <= MAX_LIST_GAP)
                    {
                        items.resize(new_len, Value::Null);
                        items[i] = value;
                        return self;
                    }
                }
                self.insert_field(i.to_string(), value);
            }
            Offset::Key(key) => {
                self.insert_field(key, value);
            }
        }
        self
    }

    /// Append a value: pushed onto a list, or stored under the next free
    /// integer key of a record.
    pub fn push(&mut self, value: Value) -> &mut Self {
        match &mut self.data {
            Value::Array(items) => items.push(value),
            Value::Object(map) => {
                let next = map
                    .keys()
                    .filter_map(|k| k.parse::<usize>().ok())
                    .max()
                    .map_or(0, |max| max + 1);
                map.insert(next.to_string(), value);
            }
            Value::Null => self.data = Value::Array(vec![value]),
            _ => {
                let previous = std::mem::take(&mut self.data);
                self.data = Value::Array(vec![previous, value]);
            }
        }
        self
    }

    /// Remove and return the value at an offset. List elements after it
    /// shift down by one.
    pub fn remove(&mut self, offset: impl Into<Offset>) -> Option<Value> {
        match (self.resolve(offset.into()), &mut self.data) {
            (Offset::Index(i), Value::Array(items)) => (i < items.len()).then(|| items.remove(i)),
            (Offset::Index(i), Value::Object(map)) => map.shift_remove(&i.to_string()),
            (Offset::Key(key), Value::Object(map)) => map.shift_remove(&key),
            _ => None,
        }
    }

    /// Iterate from the start: list elements or record values, with table
    /// wrappers looked through. Call again to restart.
    pub fn iter(&self) -> Iter<'_> {
        let inner = match &self.data {
            Value::Array(items) => IterInner::List(items.iter()),
            Value::Object(map) => IterInner::Record(map.values()),
            Value::Null => IterInner::Single(None),
            other => IterInner::Single(Some(other)),
        };
        Iter {
            inner,
            table: self.table_name.as_deref(),
        }
    }

    /// The iterated values, cloned into a vector for further processing.
    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    /// A copy of the current payload.
    pub fn to_value(&self) -> Value {
        self.data.clone()
    }

    /// Take the current payload.
    pub fn into_value(self) -> Value {
        self.data
    }

    /// Encode the current payload (not the envelope) as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.data).map_err(Into::into)
    }

    /// Numeric keys address list positions.
    fn resolve(&self, offset: Offset) -> Offset {
        match offset {
            Offset::Key(key) if self.data.is_array() => match key.parse::<usize>() {
                Ok(i) => Offset::Index(i),
                Err(_) => Offset::Key(key),
            },
            other => other,
        }
    }

    /// Insert a field, turning the payload into a record first if needed.
    fn insert_field(&mut self, key: String, value: Value) {
        let mut map = match std::mem::take(&mut self.data) {
            Value::Object(map) => map,
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            Value::Null => Map::new(),
            scalar => {
                let mut map = Map::new();
                map.insert("0".to_string(), scalar);
                map
            }
        };
        map.insert(key, value);
        self.data = Value::Object(map);
    }
}

impl From<Response> for Value {
    fn from(response: Response) -> Self {
        response.into_value()
    }
}

impl<'a> IntoIterator for &'a Response {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`Response::iter`].
pub struct Iter<'a> {
    inner: IterInner<'a>,
    table: Option<&'a str>,
}

enum IterInner<'a> {
    List(std::slice::Iter<'a, Value>),
    Record(serde_json::map::Values<'a>),
    Single(Option<&'a Value>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match &mut self.inner {
            IterInner::List(items) => items.next(),
            IterInner::Record(values) => values.next(),
            IterInner::Single(value) => value.take(),
        }?;
        Some(project(item, self.table))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::List(items) => items.size_hint(),
            IterInner::Record(values) => values.size_hint(),
            IterInner::Single(value) => {
                let n = usize::from(value.is_some());
                (n, Some(n))
            }
        }
    }
}

fn project<'a>(item: &'a Value, table: Option<&str>) -> &'a Value {
    match (table, item.get("tables")) {
        (Some(name), Some(tables)) => tables.get(name).unwrap_or(item),
        _ => item,
    }
}

fn unwrap_table(mut record: Value, table: &str) -> Value {
    if let Some(inner) = record
        .get_mut("tables")
        .and_then(|tables| tables.get_mut(table))
    {
        return inner.take();
    }
    record
}

fn lookup_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(value) = data.as_object().and_then(|map| map.get(key)) {
        return Some(value);
    }
    if !key.contains('.') {
        return None;
    }
    key.split('.').try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
