//! Device API client.

use crate::config::ClientConfig;
use crate::error::{CloudError, Result};
use crate::fetch::{Fetch, HttpFetcher, Method};
use crate::keys::{AttributeKey, ControlType, ListKey, OsType};
use crate::predicate::Predicate;
use crate::query::{self, DeviceFields, DeviceOverview, DeviceSummary, Query, QueryResult};
use crate::record::{self, DeviceId, DeviceRecord};
use crate::request::{DeviceEdit, Location, ReservationWindow};
use tracing::{debug, info};

const DEVICES_PATH: &str = "/api/v1/devices";

/// Client for the SeeTest Cloud device API.
///
/// Every method performs at most one request through the [`Fetch`]
/// collaborator and keeps no state between calls, so one client can be
/// shared across tasks.
pub struct CloudClient<F: Fetch = HttpFetcher> {
    fetcher: F,
}

impl CloudClient<HttpFetcher> {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new(config)?))
    }
}

impl<F: Fetch> CloudClient<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    async fn get(&self, path: &str) -> Result<String> {
        self.fetcher.fetch(path, Method::Get, &[]).await
    }

    // Inventory

    /// Raw body of the device inventory endpoint.
    pub async fn all_devices_raw(&self) -> Result<String> {
        self.get(DEVICES_PATH).await
    }

    /// Every device in the cloud, in server order.
    pub async fn all_devices(&self) -> Result<Vec<DeviceRecord>> {
        let raw = self.all_devices_raw().await?;
        let records = record::parse_devices(&raw)?;
        debug!("Fetched {} devices", records.len());
        Ok(records)
    }

    /// Fetch the inventory and run a query over it.
    pub async fn query(&self, query: &Query) -> Result<QueryResult> {
        let records = self.all_devices().await?;
        query::execute(&records, query)
    }

    /// Id of the single device matching `predicate`.
    pub async fn resolve_id(&self, predicate: &Predicate) -> Result<DeviceId> {
        let records = self.all_devices().await?;
        let id = query::find_unique(&records, predicate, AttributeKey::Id)?;
        id.parse()
            .map_err(|e: String| CloudError::malformed(format!("device id: {e}")))
    }

    /// Id of the device with the given UDID, compared case-insensitively.
    pub async fn device_id_by_udid(&self, udid: &str) -> Result<DeviceId> {
        self.resolve_id(&Predicate::new().with(AttributeKey::Udid, udid))
            .await
    }

    /// Project `key` from every device matching `predicate`.
    pub async fn list_field(&self, predicate: &Predicate, key: AttributeKey) -> Result<Vec<String>> {
        let records = self.all_devices().await?;
        query::collect_field(&records, predicate, key)
    }

    /// Values of `key` across all devices.
    pub async fn field_values(&self, key: AttributeKey) -> Result<Vec<String>> {
        self.list_field(&Predicate::new(), key).await
    }

    /// Summaries of every device matching `predicate`, in server order.
    pub async fn list_summaries(&self, predicate: &Predicate) -> Result<Vec<DeviceSummary>> {
        let records = self.all_devices().await?;
        query::collect_summaries(&records, predicate)
    }

    pub async fn available_device_names(
        &self,
        location: &Location,
        os: Option<OsType>,
    ) -> Result<Vec<String>> {
        let predicate = refine(
            Predicate::new().with(AttributeKey::DisplayStatus, "available"),
            location,
            os,
        );
        self.list_field(&predicate, AttributeKey::DeviceName).await
    }

    pub async fn available_devices_with_details(
        &self,
        location: &Location,
        os: Option<OsType>,
    ) -> Result<Vec<DeviceSummary>> {
        let predicate = refine(
            Predicate::new().with(AttributeKey::DisplayStatus, "available"),
            location,
            os,
        );
        self.list_summaries(&predicate).await
    }

    pub async fn online_device_names(
        &self,
        location: &Location,
        os: Option<OsType>,
    ) -> Result<Vec<String>> {
        let predicate = refine(
            Predicate::new().with(AttributeKey::CurrentStatus, "online"),
            location,
            os,
        );
        self.list_field(&predicate, AttributeKey::DeviceName).await
    }

    /// Every device as an overview row, sorted.
    pub async fn device_overview(&self) -> Result<Vec<DeviceOverview>> {
        let records = self.all_devices().await?;
        let mut rows: Vec<DeviceOverview> =
            records.iter().map(DeviceOverview::from_record).collect();
        rows.sort();
        Ok(rows)
    }

    // Single device

    pub async fn device_raw(&self, id: DeviceId) -> Result<String> {
        self.get(&device_path(id, "")).await
    }

    pub async fn device(&self, id: DeviceId) -> Result<DeviceRecord> {
        record::parse_device(&self.device_raw(id).await?)
    }

    pub async fn device_field(&self, id: DeviceId, key: AttributeKey) -> Result<String> {
        let record = self.device(id).await?;
        query::field_by_id(&record, id, key)
    }

    pub async fn device_fields(&self, id: DeviceId, keys: &[AttributeKey]) -> Result<DeviceFields> {
        let record = self.device(id).await?;
        query::fields_by_id(&record, id, keys)
    }

    pub async fn device_list(&self, id: DeviceId, key: ListKey) -> Result<Vec<String>> {
        let record = self.device(id).await?;
        query::list_by_id(&record, id, key)
    }

    /// Configuration profiles installed on an iOS device.
    pub async fn ios_configuration_profiles(&self, id: DeviceId) -> Result<Vec<String>> {
        self.device_list(id, ListKey::IosConfigurationProfiles)
            .await
    }

    pub async fn device_tags(&self, id: DeviceId) -> Result<Vec<String>> {
        let raw = self.get(&device_path(id, "/tags")).await?;
        record::parse_string_list(&raw)
    }

    /// Raw reservations of a device within `window`.
    pub async fn device_reservations(&self, id: DeviceId, window: &ReservationWindow) -> Result<String> {
        window.validate()?;
        self.fetcher
            .fetch(
                &device_path(id, "/reservations"),
                Method::Get,
                &window.params("current_timestamp"),
            )
            .await
    }

    // Mutations. Each returns the raw response body.

    pub async fn edit_device(&self, id: DeviceId, edit: &DeviceEdit) -> Result<String> {
        let params = edit.params()?;
        info!("Editing device {}", id);
        self.fetcher
            .fetch(&device_path(id, ""), Method::Post, &params)
            .await
    }

    pub async fn reserve_device(&self, id: DeviceId, window: &ReservationWindow) -> Result<String> {
        window.validate()?;
        info!("Reserving device {}", id);
        self.fetcher
            .fetch(
                &device_path(id, "/reservations/new"),
                Method::Post,
                &window.params("clientCurrentTimestamp"),
            )
            .await
    }

    pub async fn reserve_devices(&self, ids: &[DeviceId], window: &ReservationWindow) -> Result<String> {
        if ids.is_empty() {
            return Err(CloudError::InvalidArgument(
                "no devices given to reserve".to_string(),
            ));
        }
        window.validate()?;

        let list = ids
            .iter()
            .map(DeviceId::to_string)
            .collect::<Vec<_>>()
            .join(",");
        info!("Reserving devices {}", list);

        let mut params = vec![("devicesList".to_string(), list)];
        params.extend(window.params("clientCurrentTimestamp"));
        self.fetcher
            .fetch(
                &format!("{DEVICES_PATH}/reservations/new"),
                Method::Post,
                &params,
            )
            .await
    }

    pub async fn release_device(&self, id: DeviceId) -> Result<String> {
        self.device_action(id, "release").await
    }

    pub async fn reboot_device(&self, id: DeviceId) -> Result<String> {
        self.device_action(id, "reboot").await
    }

    pub async fn reset_usb_connection(&self, id: DeviceId) -> Result<String> {
        self.device_action(id, "resetusb").await
    }

    async fn device_action(&self, id: DeviceId, action: &str) -> Result<String> {
        info!("Requesting {} of device {}", action, id);
        self.fetcher
            .fetch(&device_path(id, &format!("/{action}")), Method::Post, &[])
            .await
    }

    /// Open a web control session. `emulator` names the instance to attach
    /// to when the device is an emulator.
    pub async fn start_web_control(
        &self,
        id: DeviceId,
        control: ControlType,
        emulator: Option<&str>,
    ) -> Result<String> {
        let mut params = vec![("type".to_string(), control.code().to_string())];
        if let Some(name) = emulator.filter(|name| !name.is_empty()) {
            params.push(("emulatorInstanceName".to_string(), name.to_string()));
        }
        self.fetcher
            .fetch(&device_path(id, "/web-control"), Method::Put, &params)
            .await
    }

    pub async fn add_device_tag(&self, id: DeviceId, tag: &str) -> Result<String> {
        let path = tag_path(id, tag)?;
        self.fetcher.fetch(&path, Method::Put, &[]).await
    }

    pub async fn remove_device_tag(&self, id: DeviceId, tag: &str) -> Result<String> {
        let path = tag_path(id, tag)?;
        self.fetcher.fetch(&path, Method::Delete, &[]).await
    }

    pub async fn remove_all_tags(&self, id: DeviceId) -> Result<String> {
        self.fetcher
            .fetch(&device_path(id, "/tags/"), Method::Delete, &[])
            .await
    }
}

fn device_path(id: DeviceId, suffix: &str) -> String {
    format!("{DEVICES_PATH}/{id}{suffix}")
}

fn tag_path(id: DeviceId, tag: &str) -> Result<String> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(CloudError::InvalidArgument(
            "tag must not be empty".to_string(),
        ));
    }
    Ok(device_path(id, &format!("/tags/{}", urlencoding::encode(tag))))
}

fn refine(mut predicate: Predicate, location: &Location, os: Option<OsType>) -> Predicate {
    if let Some(name) = location.named() {
        predicate.insert(AttributeKey::AgentLocation, name);
    }
    if let Some(os) = os {
        predicate.insert(AttributeKey::DeviceOs, os.as_str());
    }
    predicate
}
