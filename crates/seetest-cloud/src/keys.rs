//! Closed vocabularies used by the device API.
//!
//! Every attribute a caller can filter on or project is an [`AttributeKey`];
//! list-valued attributes are [`ListKey`]s. The remaining enums mirror the
//! option values the server accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known scalar attributes of a device record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeKey {
    /// Unique device ID assigned by the cloud
    Id,
    /// Device UDID (serial number on Android)
    Udid,
    /// iOS UDID assigned by the cloud (iOS only)
    IosUdid,
    DeviceName,
    Notes,
    /// Android or iOS
    DeviceOs,
    OsVersion,
    Model,
    Manufacturer,
    CurrentUser,
    /// Watch, tablet, phone or unknown
    DeviceCategory,
    Uptime,
    IsEmulator,
    Profiles,
    AgentName,
    AgentIp,
    AgentLocation,
    /// Online or offline
    CurrentStatus,
    StatusTooltip,
    LastUsedDateTime,
    PreviousStatus,
    StatusAgeInMinutes,
    StatusModifiedAt,
    StatusModifiedAtDateTime,
    /// Available, in use or offline
    DisplayStatus,
    IsCleanupEnabled,
    DefaultDeviceLanguage,
    DefaultDeviceRegion,
    ScreenWidth,
    ScreenHeight,
}

impl AttributeKey {
    /// Every known attribute, in wire-documentation order.
    pub const ALL: [AttributeKey; 30] = [
        AttributeKey::Id,
        AttributeKey::Udid,
        AttributeKey::IosUdid,
        AttributeKey::DeviceName,
        AttributeKey::Notes,
        AttributeKey::DeviceOs,
        AttributeKey::OsVersion,
        AttributeKey::Model,
        AttributeKey::Manufacturer,
        AttributeKey::CurrentUser,
        AttributeKey::DeviceCategory,
        AttributeKey::Uptime,
        AttributeKey::IsEmulator,
        AttributeKey::Profiles,
        AttributeKey::AgentName,
        AttributeKey::AgentIp,
        AttributeKey::AgentLocation,
        AttributeKey::CurrentStatus,
        AttributeKey::StatusTooltip,
        AttributeKey::LastUsedDateTime,
        AttributeKey::PreviousStatus,
        AttributeKey::StatusAgeInMinutes,
        AttributeKey::StatusModifiedAt,
        AttributeKey::StatusModifiedAtDateTime,
        AttributeKey::DisplayStatus,
        AttributeKey::IsCleanupEnabled,
        AttributeKey::DefaultDeviceLanguage,
        AttributeKey::DefaultDeviceRegion,
        AttributeKey::ScreenWidth,
        AttributeKey::ScreenHeight,
    ];

    /// The attribute name as it appears in the JSON payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKey::Id => "id",
            AttributeKey::Udid => "udid",
            AttributeKey::IosUdid => "iosUdid",
            AttributeKey::DeviceName => "deviceName",
            AttributeKey::Notes => "notes",
            AttributeKey::DeviceOs => "deviceOs",
            AttributeKey::OsVersion => "osVersion",
            AttributeKey::Model => "model",
            AttributeKey::Manufacturer => "manufacturer",
            AttributeKey::CurrentUser => "currentUser",
            AttributeKey::DeviceCategory => "deviceCategory",
            AttributeKey::Uptime => "uptime",
            AttributeKey::IsEmulator => "isEmulator",
            AttributeKey::Profiles => "profiles",
            AttributeKey::AgentName => "agentName",
            AttributeKey::AgentIp => "agentIp",
            AttributeKey::AgentLocation => "agentLocation",
            AttributeKey::CurrentStatus => "currentStatus",
            AttributeKey::StatusTooltip => "statusTooltip",
            AttributeKey::LastUsedDateTime => "lastUsedDateTime",
            AttributeKey::PreviousStatus => "previousStatus",
            AttributeKey::StatusAgeInMinutes => "statusAgeInMinutes",
            AttributeKey::StatusModifiedAt => "statusModifiedAt",
            AttributeKey::StatusModifiedAtDateTime => "statusModifiedAtDateTime",
            AttributeKey::DisplayStatus => "displayStatus",
            AttributeKey::IsCleanupEnabled => "isCleanupEnabled",
            AttributeKey::DefaultDeviceLanguage => "defaultDeviceLanguage",
            AttributeKey::DefaultDeviceRegion => "defaultDeviceRegion",
            AttributeKey::ScreenWidth => "screenWidth",
            AttributeKey::ScreenHeight => "screenHeight",
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeKey {
    type Err = String;

    /// Attribute names are accepted in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown device attribute '{s}'"))
    }
}

/// List-valued device attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListKey {
    IosConfigurationProfiles,
}

impl ListKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKey::IosConfigurationProfiles => "iosConfigurationProfiles",
        }
    }

    /// The only platform on which the attribute is populated.
    pub fn platform(&self) -> OsType {
        match self {
            ListKey::IosConfigurationProfiles => OsType::Ios,
        }
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsType {
    #[serde(rename = "Android")]
    Android,
    #[serde(rename = "iOS")]
    Ios,
}

impl OsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsType::Android => "Android",
            OsType::Ios => "iOS",
        }
    }

    /// Check whether a `deviceOs` value names this platform.
    pub fn matches(&self, device_os: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(device_os.trim())
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [OsType::Android, OsType::Ios]
            .into_iter()
            .find(|os| os.matches(s))
            .ok_or_else(|| format!("unknown OS type '{s}' (expected Android or iOS)"))
    }
}

/// Device category accepted by the edit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Watch,
    Tablet,
    Phone,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Watch => "WATCH",
            Category::Tablet => "TABLET",
            Category::Phone => "PHONE",
            Category::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Category::Watch,
            Category::Tablet,
            Category::Phone,
            Category::Unknown,
        ]
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| format!("unknown device category '{s}'"))
    }
}

/// Web control session type. Sent to the server as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlType {
    Manual,
    View,
    Automation,
    /// Requires a grid started by the same user
    Debug,
}

impl ControlType {
    pub fn code(&self) -> u8 {
        match self {
            ControlType::Manual => 0,
            ControlType::View => 1,
            ControlType::Automation => 2,
            ControlType::Debug => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlType::Manual => "MANUAL",
            ControlType::View => "VIEW",
            ControlType::Automation => "AUTOMATION",
            ControlType::Debug => "DEBUG",
        }
    }
}

impl FromStr for ControlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ControlType::Manual,
            ControlType::View,
            ControlType::Automation,
            ControlType::Debug,
        ]
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| format!("unknown web control type '{s}'"))
    }
}
