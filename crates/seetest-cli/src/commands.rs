use crate::args::{Commands, ConnectionArgs, TagCommand, WindowArgs};
use crate::output::{self, heading, print_json, print_list, print_outcome, print_raw, print_table};
use anyhow::{bail, Context, Result};
use seetest_cloud::{
    parse_response, AttributeKey, ClientConfig, CloudClient, Credentials, DeviceEdit, Location,
    Predicate, ReservationWindow,
};
use tracing::debug;

const SUMMARY_HEADERS: [&str; 5] = ["Location", "OS", "Name", "Model", "ID"];
const OVERVIEW_HEADERS: [&str; 7] = [
    "Location", "Name", "OS", "Version", "Status", "ID", "UDID",
];

/// Build the client configuration from the config file and flags.
///
/// Flags win over file values; a token wins over basic credentials.
pub fn resolve_config(args: &ConnectionArgs) -> Result<ClientConfig> {
    let base = match &args.config {
        Some(path) => Some(
            ClientConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
        ),
        None => None,
    };

    let server_url = match (&args.url, &base) {
        (Some(url), _) => url.clone(),
        (None, Some(config)) => config.server_url.clone(),
        (None, None) => bail!("No server URL given. Use --url, SEETEST_URL or --config"),
    };

    let credentials = match (&args.token, &args.user, &base) {
        (Some(token), _, _) => Credentials::Token {
            token: token.clone(),
        },
        (None, Some(username), _) => Credentials::Basic {
            username: username.clone(),
            password: args.password.clone().unwrap_or_default(),
        },
        (None, None, Some(config)) => config.credentials.clone(),
        (None, None, None) => bail!(
            "No credentials given. Use --token (SEETEST_TOKEN) or --user and --password"
        ),
    };

    let mut config = match credentials {
        Credentials::Token { token } => ClientConfig::with_token(&server_url, token),
        Credentials::Basic { username, password } => {
            ClientConfig::with_basic_auth(&server_url, username, password)
        }
    };
    config.timeout_secs = args
        .timeout
        .or_else(|| base.as_ref().and_then(|c| c.timeout_secs));
    config.validate()?;

    debug!("Using {:?}", config);
    Ok(config)
}

fn window(args: &WindowArgs) -> Result<ReservationWindow> {
    Ok(ReservationWindow::parse(&args.start, &args.end)?)
}

fn status_of(body: &str) -> Option<String> {
    parse_response(body, "status").ok()
}

fn report(action: String, body: &str, json: bool) -> Result<()> {
    if json {
        print_raw(body);
    } else {
        print_outcome(&action, status_of(body).as_deref());
    }
    Ok(())
}

pub async fn run(command: Commands, client: &CloudClient, json: bool) -> Result<()> {
    match command {
        Commands::Devices { filters, field } => {
            let predicate: Predicate = filters.into_iter().collect();
            let values = client.list_field(&predicate, field).await?;
            if json {
                print_json(&values)?;
            } else {
                print_list(&values);
            }
        }

        Commands::Details { filters } => {
            let predicate: Predicate = filters.into_iter().collect();
            let summaries = seetest_cloud::sort_summaries(client.list_summaries(&predicate).await?);
            if json {
                print_json(&summaries)?;
            } else {
                let rows: Vec<[&str; 5]> = summaries.iter().map(|s| s.fields()).collect();
                print_table(SUMMARY_HEADERS, &rows);
            }
        }

        Commands::Available {
            location,
            os,
            details,
        } => {
            let location = Location::from(location.as_str());
            if details {
                let summaries = seetest_cloud::sort_summaries(
                    client.available_devices_with_details(&location, os).await?,
                );
                if json {
                    print_json(&summaries)?;
                } else {
                    heading(&format!("Available devices ({location})"));
                    let rows: Vec<[&str; 5]> = summaries.iter().map(|s| s.fields()).collect();
                    print_table(SUMMARY_HEADERS, &rows);
                }
            } else {
                let names = client.available_device_names(&location, os).await?;
                if json {
                    print_json(&names)?;
                } else {
                    print_list(&names);
                }
            }
        }

        Commands::Online { location, os } => {
            let location = Location::from(location.as_str());
            let names = client.online_device_names(&location, os).await?;
            if json {
                print_json(&names)?;
            } else {
                print_list(&names);
            }
        }

        Commands::Overview => {
            let overview = client.device_overview().await?;
            if json {
                print_json(&overview)?;
            } else {
                let rows: Vec<[&str; 7]> = overview.iter().map(|o| o.fields()).collect();
                print_table(OVERVIEW_HEADERS, &rows);
            }
        }

        Commands::Id { udid, filters } => {
            let id = match udid {
                Some(udid) => client.device_id_by_udid(&udid).await?,
                None if filters.is_empty() => {
                    bail!("Give --udid or at least one --filter to select a device")
                }
                None => {
                    let predicate: Predicate = filters.into_iter().collect();
                    client.resolve_id(&predicate).await?
                }
            };
            println!("{id}");
        }

        Commands::Get { id, fields } => {
            if fields.is_empty() {
                print_raw(&client.device_raw(id).await?);
            } else {
                let values = client.device_fields(id, &fields).await?;
                if json {
                    print_json(&values)?;
                } else {
                    print_fields(values.iter());
                }
            }
        }

        Commands::Tags { id } => {
            let tags = client.device_tags(id).await?;
            if json {
                print_json(&tags)?;
            } else {
                print_list(&tags);
            }
        }

        Commands::Profiles { id } => {
            let profiles = client.ios_configuration_profiles(id).await?;
            if json {
                print_json(&profiles)?;
            } else {
                print_list(&profiles);
            }
        }

        Commands::Reservations { id, window: range } => {
            print_raw(&client.device_reservations(id, &window(&range)?).await?);
        }

        Commands::Reserve { ids, window: range } => {
            let range = window(&range)?;
            let (action, body) = match ids.as_slice() {
                [id] => (
                    format!("Reserved device {id}"),
                    client.reserve_device(*id, &range).await?,
                ),
                _ => (
                    format!("Reserved {} devices", ids.len()),
                    client.reserve_devices(&ids, &range).await?,
                ),
            };
            report(action, &body, json)?;
        }

        Commands::Release { id } => {
            let body = client.release_device(id).await?;
            report(format!("Released device {id}"), &body, json)?;
        }

        Commands::Reboot { id } => {
            let body = client.reboot_device(id).await?;
            report(format!("Rebooting device {id}"), &body, json)?;
        }

        Commands::ResetUsb { id } => {
            let body = client.reset_usb_connection(id).await?;
            report(format!("Reset USB connection of device {id}"), &body, json)?;
        }

        Commands::WebControl {
            id,
            control,
            emulator,
        } => {
            let body = client
                .start_web_control(id, control, emulator.as_deref())
                .await?;
            print_raw(&body);
        }

        Commands::Edit {
            id,
            name,
            notes,
            category,
        } => {
            let edit = DeviceEdit {
                name,
                notes,
                category,
            };
            let body = client.edit_device(id, &edit).await?;
            report(format!("Updated device {id}"), &body, json)?;
        }

        Commands::Tag(tag_command) => run_tag(tag_command, client, json).await?,
    }
    Ok(())
}

async fn run_tag(command: TagCommand, client: &CloudClient, json: bool) -> Result<()> {
    match command {
        TagCommand::Add { id, tag } => {
            let body = client.add_device_tag(id, &tag).await?;
            report(format!("Tagged device {id} with '{tag}'"), &body, json)
        }
        TagCommand::Remove { id, tag } => {
            let body = client.remove_device_tag(id, &tag).await?;
            report(format!("Removed tag '{tag}' from device {id}"), &body, json)
        }
        TagCommand::Clear { id } => {
            let body = client.remove_all_tags(id).await?;
            report(format!("Removed all tags from device {id}"), &body, json)
        }
    }
}

fn print_fields<'a>(fields: impl Iterator<Item = (AttributeKey, &'a str)>) {
    let fields: Vec<(AttributeKey, &str)> = fields.collect();
    let width = fields
        .iter()
        .map(|(key, _)| key.as_str().len())
        .max()
        .unwrap_or(0);
    for (key, value) in fields {
        println!(
            "{}{:<width$}{}  {}",
            output::DIM,
            key.as_str(),
            output::RESET,
            value
        );
    }
}
