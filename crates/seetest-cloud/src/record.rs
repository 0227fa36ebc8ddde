//! Device records decoded from the `data` member of API responses.

use crate::error::{CloudError, Result};
use crate::keys::{AttributeKey, ListKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Positive integer identifying one device in the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(u64);

impl DeviceId {
    /// Returns `None` for zero.
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(DeviceId(id))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(DeviceId::new)
            .ok_or_else(|| format!("'{s}' is not a valid device ID"))
    }
}

/// One device's attributes, keyed by their wire names.
///
/// Scalars (strings, numbers, booleans) are stored in their string form and
/// arrays as lists of strings. `null` members are treated as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    id: DeviceId,
    scalars: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
}

impl DeviceRecord {
    /// Build a record from one JSON object. The object must carry a positive
    /// integer `id`.
    pub fn from_object(object: &Map<String, Value>) -> Result<Self> {
        let mut scalars = HashMap::with_capacity(object.len());
        let mut lists = HashMap::new();

        for (name, value) in object {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    lists.insert(name.clone(), items.iter().map(value_text).collect());
                }
                other => {
                    scalars.insert(name.clone(), value_text(other));
                }
            }
        }

        let id = scalars
            .get(AttributeKey::Id.as_str())
            .ok_or_else(|| CloudError::malformed("device record has no id"))?
            .parse::<DeviceId>()
            .map_err(CloudError::MalformedResponse)?;

        Ok(Self { id, scalars, lists })
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Look up a scalar attribute.
    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.scalars.get(key.as_str()).map(String::as_str)
    }

    /// Look up a list-valued attribute.
    pub fn get_list(&self, key: ListKey) -> Option<&[String]> {
        self.lists.get(key.as_str()).map(Vec::as_slice)
    }

    /// Project a scalar attribute; absent attributes project as "".
    pub fn project(&self, key: AttributeKey) -> String {
        self.get(key).unwrap_or_default().to_string()
    }
}

/// Render a JSON value the way the server's scalars read as text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse a response body and return its `data` member.
fn data_member(raw: &str) -> Result<Value> {
    let mut body: Value = serde_json::from_str(raw)?;
    let object = body
        .as_object_mut()
        .ok_or_else(|| CloudError::malformed("response is not a JSON object"))?;
    object
        .remove("data")
        .ok_or_else(|| CloudError::malformed("response has no 'data' member"))
}

/// Decode a collection response (`{"data": [ {...}, ... ]}`), preserving order.
pub fn parse_devices(raw: &str) -> Result<Vec<DeviceRecord>> {
    let Value::Array(entries) = data_member(raw)? else {
        return Err(CloudError::malformed("'data' is not an array"));
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(object) => DeviceRecord::from_object(object),
            _ => Err(CloudError::NotJsonObject { index }),
        })
        .collect()
}

/// Decode a single-device response (`{"data": {...}}`).
pub fn parse_device(raw: &str) -> Result<DeviceRecord> {
    match data_member(raw)? {
        Value::Object(object) => DeviceRecord::from_object(&object),
        _ => Err(CloudError::malformed("'data' is not a JSON object")),
    }
}

/// Decode a response whose `data` is an array of scalars, such as device tags.
pub fn parse_string_list(raw: &str) -> Result<Vec<String>> {
    match data_member(raw)? {
        Value::Array(items) => Ok(items.iter().map(value_text).collect()),
        _ => Err(CloudError::malformed("'data' is not an array")),
    }
}

/// Read one top-level member of a JSON response as text.
///
/// Useful for inspecting the body returned by mutating calls, e.g. reading
/// `status` out of `{"status":"success"}`.
pub fn parse_response(raw: &str, key: &str) -> Result<String> {
    let body: Value = serde_json::from_str(raw)?;
    body.get(key)
        .map(value_text)
        .ok_or_else(|| CloudError::malformed(format!("response has no '{key}' member")))
}
