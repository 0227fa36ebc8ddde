//! Client library for the SeeTest Cloud device management API.
//!
//! The crate is split into a pure query engine that filters and projects a
//! snapshot of device records, and a [`CloudClient`] that fetches those
//! snapshots and drives the mutating endpoints (reservations, tags, web
//! control and so on) through a pluggable [`Fetch`] transport.
//!
//! # Example
//!
//! ```no_run
//! use seetest_cloud::{AttributeKey, ClientConfig, CloudClient, Location, OsType, Predicate};
//!
//! # async fn run() -> seetest_cloud::Result<()> {
//! let config = ClientConfig::with_token("https://cloud.example.com", "access-key");
//! let client = CloudClient::new(&config)?;
//!
//! // Names of available iOS devices anywhere
//! let names = client
//!     .available_device_names(&Location::All, Some(OsType::Ios))
//!     .await?;
//!
//! // The one device with a given UDID
//! let id = client.device_id_by_udid("00008030-001A").await?;
//! let model = client.device_field(id, AttributeKey::Model).await?;
//!
//! // Arbitrary filters
//! let predicate = Predicate::new()
//!     .with(AttributeKey::AgentLocation, "Bangalore")
//!     .with(AttributeKey::DeviceOs, "android");
//! let summaries = client.list_summaries(&predicate).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod fault;
mod fetch;
mod keys;
mod predicate;
mod query;
mod record;
mod request;

pub use client::CloudClient;
pub use config::{ClientConfig, Credentials};
pub use error::{CloudError, ErrorKind, Result, TransportError};
pub use fault::classify;
pub use fetch::{Fetch, HttpFetcher, Method};
pub use keys::{AttributeKey, Category, ControlType, ListKey, OsType};
pub use predicate::{ExpectedValue, Predicate};
pub use query::{
    collect_field, collect_summaries, execute, field_by_id, fields_by_id, find_unique,
    list_by_id, matching, sort_summaries, DeviceFields, DeviceOverview, DeviceSummary, Query,
    QueryResult, Shape,
};
pub use record::{
    parse_device, parse_devices, parse_response, parse_string_list, DeviceId, DeviceRecord,
};
pub use request::{
    format_timestamp, parse_timestamp, DeviceEdit, Location, ReservationWindow, TIMESTAMP_FORMAT,
};
