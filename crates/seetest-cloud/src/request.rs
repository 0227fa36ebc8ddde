//! Typed request arguments and their wire parameters.

use crate::error::{CloudError, Result};
use crate::keys::Category;
use chrono::{Local, NaiveDateTime};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Timestamp layout expected by the reservation endpoints, 24-hour clock.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT).map_err(|e| {
        CloudError::InvalidArgument(format!(
            "invalid timestamp '{text}', expected YYYY-MM-DD-hh-mm-ss: {e}"
        ))
    })
}

/// Agent location filter for the availability listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Location {
    /// Every location
    #[default]
    All,
    Named(String),
}

impl Location {
    pub fn named(&self) -> Option<&str> {
        match self {
            Location::All => None,
            Location::Named(name) => Some(name),
        }
    }
}

impl FromStr for Location {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Location::All)
        } else {
            Ok(Location::Named(s.to_string()))
        }
    }
}

impl From<&str> for Location {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(location) => location,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::All => f.write_str("all"),
            Location::Named(name) => f.write_str(name),
        }
    }
}

/// A reservation time range together with the client's current time.
///
/// The server uses the client time to translate `start` and `end` from the
/// caller's local clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationWindow {
    pub client_time: NaiveDateTime,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReservationWindow {
    /// Window stamped with the local wall clock.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::at(Local::now().naive_local(), start, end)
    }

    pub fn at(client_time: NaiveDateTime, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            client_time,
            start,
            end,
        }
    }

    /// Build a window from `YYYY-MM-DD-hh-mm-ss` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let window = Self::new(parse_timestamp(start)?, parse_timestamp(end)?);
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(CloudError::InvalidArgument(format!(
                "reservation end {} must be after start {}",
                format_timestamp(&self.end),
                format_timestamp(&self.start)
            )));
        }
        Ok(())
    }

    /// Wire parameters. The name of the client time parameter differs
    /// between the read and the reserve endpoints.
    pub(crate) fn params(&self, client_time_key: &str) -> Vec<(String, String)> {
        vec![
            (client_time_key.to_string(), format_timestamp(&self.client_time)),
            ("start".to_string(), format_timestamp(&self.start)),
            ("end".to_string(), format_timestamp(&self.end)),
        ]
    }
}

/// Changes to a device's editable properties. `None` leaves a property as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceEdit {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub category: Option<Category>,
}

impl DeviceEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.notes.is_none() && self.category.is_none()
    }

    pub(crate) fn params(&self) -> Result<Vec<(String, String)>> {
        if self.is_empty() {
            return Err(CloudError::InvalidArgument(
                "device edit changes nothing; set a name, notes or category".to_string(),
            ));
        }

        let mut params = Vec::new();
        if let Some(name) = &self.name {
            params.push(("name".to_string(), name.clone()));
        }
        if let Some(notes) = &self.notes {
            params.push(("notes".to_string(), notes.clone()));
        }
        if let Some(category) = self.category {
            params.push(("category".to_string(), category.as_str().to_string()));
        }
        Ok(params)
    }
}
