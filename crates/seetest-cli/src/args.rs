use clap::{Args, Parser, Subcommand};
use seetest_cloud::{AttributeKey, Category, ControlType, DeviceId, OsType};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seetest")]
#[command(author, version, about = "Query and manage SeeTest Cloud devices")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Server address and credentials. Flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// YAML file with server_url, credentials and timeout_secs
    #[arg(short, long, global = true, env = "SEETEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cloud server URL, e.g. https://cloud.example.com
    #[arg(long, global = true, env = "SEETEST_URL")]
    pub url: Option<String>,

    /// Access key (bearer token)
    #[arg(long, global = true, env = "SEETEST_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Username for basic authentication
    #[arg(long, global = true, env = "SEETEST_USER")]
    pub user: Option<String>,

    /// Password for basic authentication
    #[arg(long, global = true, env = "SEETEST_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List one attribute of every device matching the filters
    #[command(alias = "ls")]
    Devices {
        /// Attribute filter, repeatable (e.g. --filter deviceOs=iOS)
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(AttributeKey, String)>,

        /// Attribute to print
        #[arg(long, default_value = "deviceName")]
        field: AttributeKey,
    },

    /// Summary table of the devices matching the filters
    Details {
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(AttributeKey, String)>,
    },

    /// Devices that are available for use
    Available {
        /// Agent location, or "all"
        #[arg(short, long, default_value = "all")]
        location: String,

        /// Android or iOS
        #[arg(long)]
        os: Option<OsType>,

        /// Show a summary table instead of names
        #[arg(short, long)]
        details: bool,
    },

    /// Devices that are online
    Online {
        #[arg(short, long, default_value = "all")]
        location: String,

        #[arg(long)]
        os: Option<OsType>,
    },

    /// Every device with location, OS, status and UDID
    Overview,

    /// Resolve the ID of exactly one device
    Id {
        /// Device UDID
        #[arg(long, conflicts_with = "filters")]
        udid: Option<String>,

        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(AttributeKey, String)>,
    },

    /// Show a device, or selected attributes of it
    Get {
        id: DeviceId,

        /// Attribute to print, repeatable
        #[arg(long = "field")]
        fields: Vec<AttributeKey>,
    },

    /// Tags of a device
    Tags { id: DeviceId },

    /// iOS configuration profiles of a device
    Profiles { id: DeviceId },

    /// Reservations of a device within a time range
    Reservations {
        id: DeviceId,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Reserve one or more devices
    Reserve {
        #[arg(required = true)]
        ids: Vec<DeviceId>,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Release a reserved device
    Release { id: DeviceId },

    /// Reboot a device
    Reboot { id: DeviceId },

    /// Reset the USB connection of a device
    ResetUsb { id: DeviceId },

    /// Open a web control session
    WebControl {
        id: DeviceId,

        /// manual, view, automation or debug
        #[arg(long = "type", default_value = "manual")]
        control: ControlType,

        /// Emulator instance to attach to
        #[arg(long)]
        emulator: Option<String>,
    },

    /// Change the name, notes or category of a device
    Edit {
        id: DeviceId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// watch, tablet, phone or unknown
        #[arg(long)]
        category: Option<Category>,
    },

    /// Add or remove device tags
    #[command(subcommand)]
    Tag(TagCommand),
}

#[derive(Subcommand, Debug)]
pub enum TagCommand {
    /// Add a tag to a device
    Add { id: DeviceId, tag: String },
    /// Remove a tag from a device
    #[command(alias = "rm")]
    Remove { id: DeviceId, tag: String },
    /// Remove every tag from a device
    Clear { id: DeviceId },
}

/// Reservation range in YYYY-MM-DD-hh-mm-ss, 24-hour clock.
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    #[arg(long)]
    pub start: String,

    #[arg(long)]
    pub end: String,
}

/// Parse a `key=value` filter term.
pub fn parse_filter(s: &str) -> Result<(AttributeKey, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid filter '{s}', expected key=value"))?;
    let key: AttributeKey = key.trim().parse()?;
    Ok((key, value.trim().to_string()))
}
