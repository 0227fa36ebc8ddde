//! Query engine over a fetched device snapshot.
//!
//! Every function here is pure: it takes records that were already fetched,
//! scans them once in source order and shapes the matches according to the
//! caller's cardinality policy.
//!
//! | Shape | 0 matches | 1 match | N matches |
//! |-------|-----------|---------|-----------|
//! | [`Shape::Unique`] | `NoDeviceFound` | value | `AmbiguousQuery` |
//! | [`Shape::List`] / [`Shape::Summary`] | `NoDeviceFound` | list | list |

use crate::error::{CloudError, Result};
use crate::keys::{AttributeKey, ListKey};
use crate::predicate::Predicate;
use crate::record::{DeviceId, DeviceRecord};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

/// How matched records are projected into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Exactly one record must match; project one attribute.
    Unique(AttributeKey),
    /// Any positive number of records; project one attribute each.
    List(AttributeKey),
    /// Any positive number of records; project a [`DeviceSummary`] each.
    Summary,
}

/// A predicate plus the shape of the answer expected from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub predicate: Predicate,
    pub shape: Shape,
}

impl Query {
    pub fn new(predicate: Predicate, shape: Shape) -> Self {
        Self { predicate, shape }
    }
}

/// The answer to a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Scalar(String),
    ScalarList(Vec<String>),
    SummaryList(Vec<DeviceSummary>),
}

impl QueryResult {
    pub fn into_scalar(self) -> Option<String> {
        match self {
            QueryResult::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<String>> {
        match self {
            QueryResult::ScalarList(values) => Some(values),
            _ => None,
        }
    }

    pub fn into_summaries(self) -> Option<Vec<DeviceSummary>> {
        match self {
            QueryResult::SummaryList(summaries) => Some(summaries),
            _ => None,
        }
    }
}

/// Fixed five-field description of a device.
///
/// Field order is the sort order: location first, then OS, name, model, id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub agent_location: String,
    pub device_os: String,
    pub device_name: String,
    pub model: String,
    pub id: String,
}

impl DeviceSummary {
    pub fn from_record(record: &DeviceRecord) -> Self {
        Self {
            agent_location: record.project(AttributeKey::AgentLocation),
            device_os: record.project(AttributeKey::DeviceOs),
            device_name: record.project(AttributeKey::DeviceName),
            model: record.project(AttributeKey::Model),
            id: record.project(AttributeKey::Id),
        }
    }

    pub fn fields(&self) -> [&str; 5] {
        [
            self.agent_location.as_str(),
            self.device_os.as_str(),
            self.device_name.as_str(),
            self.model.as_str(),
            self.id.as_str(),
        ]
    }
}

/// The seven attributes shown in the inventory overview.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceOverview {
    pub agent_location: String,
    pub device_name: String,
    pub device_os: String,
    pub os_version: String,
    pub display_status: String,
    pub id: String,
    pub udid: String,
}

impl DeviceOverview {
    pub fn from_record(record: &DeviceRecord) -> Self {
        Self {
            agent_location: record.project(AttributeKey::AgentLocation),
            device_name: record.project(AttributeKey::DeviceName),
            device_os: record.project(AttributeKey::DeviceOs),
            os_version: record.project(AttributeKey::OsVersion),
            display_status: record.project(AttributeKey::DisplayStatus),
            id: record.project(AttributeKey::Id),
            udid: record.project(AttributeKey::Udid),
        }
    }

    pub fn fields(&self) -> [&str; 7] {
        [
            self.agent_location.as_str(),
            self.device_name.as_str(),
            self.device_os.as_str(),
            self.os_version.as_str(),
            self.display_status.as_str(),
            self.id.as_str(),
            self.udid.as_str(),
        ]
    }
}

/// Attribute values of one device, in the order they were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFields {
    entries: Vec<(AttributeKey, String)>,
}

impl DeviceFields {
    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl IntoIterator for DeviceFields {
    type Item = (AttributeKey, String);
    type IntoIter = std::vec::IntoIter<(AttributeKey, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for DeviceFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

/// Records satisfying the predicate, in source order.
pub fn matching<'a>(
    records: &'a [DeviceRecord],
    predicate: &'a Predicate,
) -> impl Iterator<Item = &'a DeviceRecord> + 'a {
    records.iter().filter(move |record| predicate.matches(record))
}

/// Run a query against a snapshot.
pub fn execute(records: &[DeviceRecord], query: &Query) -> Result<QueryResult> {
    match query.shape {
        Shape::Unique(key) => find_unique(records, &query.predicate, key).map(QueryResult::Scalar),
        Shape::List(key) => {
            collect_field(records, &query.predicate, key).map(QueryResult::ScalarList)
        }
        Shape::Summary => {
            collect_summaries(records, &query.predicate).map(QueryResult::SummaryList)
        }
    }
}

/// Project `key` from the one record matching `predicate`.
///
/// The whole snapshot is scanned: a second match turns an apparent hit into
/// `AmbiguousQuery`.
pub fn find_unique(
    records: &[DeviceRecord],
    predicate: &Predicate,
    key: AttributeKey,
) -> Result<String> {
    let mut hits: Vec<String> = matching(records, predicate)
        .map(|record| record.project(key))
        .collect();
    debug!(
        "Unique lookup of {} for {}: {} of {} records matched",
        key,
        predicate,
        hits.len(),
        records.len()
    );

    match hits.len() {
        0 => Err(CloudError::NoDeviceFound {
            query: predicate.to_string(),
        }),
        1 => Ok(hits.remove(0)),
        count => Err(CloudError::AmbiguousQuery {
            count,
            query: predicate.to_string(),
        }),
    }
}

/// Project `key` from every record matching `predicate`.
pub fn collect_field(
    records: &[DeviceRecord],
    predicate: &Predicate,
    key: AttributeKey,
) -> Result<Vec<String>> {
    let values: Vec<String> = matching(records, predicate)
        .map(|record| record.project(key))
        .collect();
    debug!(
        "Listed {} for {}: {} of {} records matched",
        key,
        predicate,
        values.len(),
        records.len()
    );
    non_empty(values, predicate)
}

/// Summarize every record matching `predicate`, in source order.
pub fn collect_summaries(
    records: &[DeviceRecord],
    predicate: &Predicate,
) -> Result<Vec<DeviceSummary>> {
    let summaries: Vec<DeviceSummary> = matching(records, predicate)
        .map(DeviceSummary::from_record)
        .collect();
    debug!(
        "Summarized {}: {} of {} records matched",
        predicate,
        summaries.len(),
        records.len()
    );
    non_empty(summaries, predicate)
}

/// Sort summaries for display.
pub fn sort_summaries(mut summaries: Vec<DeviceSummary>) -> Vec<DeviceSummary> {
    summaries.sort();
    summaries
}

fn non_empty<T>(items: Vec<T>, predicate: &Predicate) -> Result<Vec<T>> {
    if items.is_empty() {
        Err(CloudError::NoDeviceFound {
            query: predicate.to_string(),
        })
    } else {
        Ok(items)
    }
}

fn ensure_id(record: &DeviceRecord, id: DeviceId) -> Result<()> {
    if record.id() == id {
        Ok(())
    } else {
        Err(CloudError::NoDeviceFound {
            query: format!("device ID {id}"),
        })
    }
}

/// Project one attribute of the record fetched for `id`.
pub fn field_by_id(record: &DeviceRecord, id: DeviceId, key: AttributeKey) -> Result<String> {
    ensure_id(record, id)?;
    Ok(record.project(key))
}

/// Project several attributes of the record fetched for `id`, in the order
/// requested. Repeated keys appear once.
pub fn fields_by_id(
    record: &DeviceRecord,
    id: DeviceId,
    keys: &[AttributeKey],
) -> Result<DeviceFields> {
    ensure_id(record, id)?;
    let mut fields = DeviceFields::default();
    for key in keys {
        if fields.get(*key).is_none() {
            fields.entries.push((*key, record.project(*key)));
        }
    }
    Ok(fields)
}

/// Read a list-valued attribute of the record fetched for `id`.
///
/// A missing list on a device of another platform is reported as
/// `WrongPlatform`; on the owning platform it reads as empty.
pub fn list_by_id(record: &DeviceRecord, id: DeviceId, key: ListKey) -> Result<Vec<String>> {
    ensure_id(record, id)?;
    if let Some(items) = record.get_list(key) {
        return Ok(items.to_vec());
    }

    let device_os = record.get(AttributeKey::DeviceOs).unwrap_or_default();
    let platform = key.platform();
    if platform.matches(device_os) {
        Ok(Vec::new())
    } else {
        Err(CloudError::WrongPlatform {
            key,
            platform,
            device: id,
            actual: if device_os.is_empty() {
                "an unknown OS".to_string()
            } else {
                device_os.to_string()
            },
        })
    }
}
