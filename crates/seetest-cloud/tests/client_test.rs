//! End-to-end tests of `CloudClient` over an in-memory transport.

mod common;

use chrono::NaiveDate;
use common::{RecordingFetch, INVENTORY};
use seetest_cloud::{
    parse_response, AttributeKey, Category, CloudClient, CloudError, ControlType, DeviceEdit,
    DeviceId, ErrorKind, Location, Method, OsType, Predicate, Query, ReservationWindow, Shape,
    TransportError,
};

const DEVICES: &str = "/api/v1/devices";

async fn client_with_inventory() -> CloudClient<RecordingFetch> {
    let fetch = RecordingFetch::new();
    fetch.ok(Method::Get, DEVICES, INVENTORY).await;
    CloudClient::with_fetcher(fetch)
}

fn id(n: u64) -> DeviceId {
    DeviceId::new(n).unwrap()
}

fn window() -> ReservationWindow {
    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    ReservationWindow::at(
        day.and_hms_opt(8, 59, 0).unwrap(),
        day.and_hms_opt(9, 0, 0).unwrap(),
        day.and_hms_opt(13, 30, 0).unwrap(),
    )
}

#[tokio::test]
async fn test_available_names_in_source_order() {
    let fetch = RecordingFetch::new();
    fetch
        .ok(
            Method::Get,
            DEVICES,
            r#"{"data": [
                {"id": 1, "deviceName": "A", "deviceOs": "Android", "displayStatus": "available"},
                {"id": 2, "deviceName": "B", "deviceOs": "iOS", "displayStatus": "available"}
            ]}"#,
        )
        .await;
    let client = CloudClient::with_fetcher(fetch);

    let predicate = Predicate::new().with(AttributeKey::DisplayStatus, "available");
    let names = client
        .list_field(&predicate, AttributeKey::DeviceName)
        .await
        .unwrap();
    assert_eq!(names, vec!["A", "B"]);

    let predicate = predicate.with(AttributeKey::DeviceOs, "iOS");
    assert_eq!(client.resolve_id(&predicate).await.unwrap(), id(2));

    let request = client.fetcher().last_request().await.unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.path, DEVICES);
    assert!(request.params.is_empty());
}

#[tokio::test]
async fn test_query_failures() {
    let client = client_with_inventory().await;

    let err = client
        .resolve_id(&Predicate::new().with(AttributeKey::AgentLocation, "Tokyo"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoDeviceFound);

    let err = client
        .resolve_id(&Predicate::new().with(AttributeKey::DeviceOs, "ios"))
        .await
        .unwrap_err();
    assert!(matches!(err, CloudError::AmbiguousQuery { count: 2, .. }));
}

#[tokio::test]
async fn test_convenience_listings() {
    let client = client_with_inventory().await;

    assert_eq!(
        client
            .available_device_names(&Location::All, None)
            .await
            .unwrap(),
        vec!["A", "B"]
    );
    assert_eq!(
        client
            .available_device_names(&Location::from("austin"), Some(OsType::Ios))
            .await
            .unwrap(),
        vec!["B"]
    );
    assert_eq!(
        client
            .online_device_names(&Location::from("Austin"), None)
            .await
            .unwrap(),
        vec!["B", "C"]
    );

    let err = client
        .available_device_names(&Location::from("Bangalore"), Some(OsType::Ios))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoDeviceFound);

    let details = client
        .available_devices_with_details(&Location::All, None)
        .await
        .unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(
        details[1].fields(),
        ["Austin", "iOS", "B", "iPhone 14", "2"]
    );
}

#[tokio::test]
async fn test_field_values_and_udid_lookup() {
    let client = client_with_inventory().await;

    assert_eq!(
        client.field_values(AttributeKey::Udid).await.unwrap(),
        vec!["R58M123", "00008030-001A", "00008101-77BC", ""]
    );
    assert_eq!(
        client.device_id_by_udid("00008101-77bc").await.unwrap(),
        id(3)
    );

    let result = client
        .query(&Query::new(
            Predicate::new().with(AttributeKey::DeviceName, "d"),
            Shape::Unique(AttributeKey::Model),
        ))
        .await
        .unwrap();
    assert_eq!(result.into_scalar().unwrap(), "Galaxy S22");
}

#[tokio::test]
async fn test_device_overview_is_sorted() {
    let client = client_with_inventory().await;
    let rows = client.device_overview().await.unwrap();

    let order: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.agent_location.as_str(), r.device_name.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Austin", "B"),
            ("Austin", "C"),
            ("Bangalore", "A"),
            ("Bangalore", "D")
        ]
    );
    assert_eq!(
        rows[0].fields(),
        ["Austin", "B", "iOS", "17.2", "available", "2", "00008030-001A"]
    );
}

#[tokio::test]
async fn test_device_fields_and_profiles() {
    let fetch = RecordingFetch::new();
    fetch
        .ok(
            Method::Get,
            "/api/v1/devices/7",
            r#"{"data": {"id": 7, "deviceName": "Pixel", "deviceOs": "Android",
                "model": "Pixel 8", "iosConfigurationProfiles": null}}"#,
        )
        .await;
    fetch
        .ok(
            Method::Get,
            "/api/v1/devices/9",
            r#"{"data": {"id": 9, "deviceOs": "iOS",
                "iosConfigurationProfiles": ["corp-wifi", "vpn"]}}"#,
        )
        .await;
    let client = CloudClient::with_fetcher(fetch);

    assert_eq!(
        client
            .device_field(id(7), AttributeKey::Model)
            .await
            .unwrap(),
        "Pixel 8"
    );

    let fields = client
        .device_fields(id(7), &[AttributeKey::DeviceName, AttributeKey::Notes])
        .await
        .unwrap();
    assert_eq!(fields.get(AttributeKey::DeviceName), Some("Pixel"));
    assert_eq!(fields.get(AttributeKey::Notes), Some(""));

    let err = client
        .ios_configuration_profiles(id(7))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongPlatform);

    assert_eq!(
        client.ios_configuration_profiles(id(9)).await.unwrap(),
        vec!["corp-wifi", "vpn"]
    );
}

#[tokio::test]
async fn test_device_record_for_other_id_is_not_found() {
    let fetch = RecordingFetch::new();
    fetch
        .ok(Method::Get, "/api/v1/devices/5", r#"{"data": {"id": 6}}"#)
        .await;
    let client = CloudClient::with_fetcher(fetch);

    let err = client
        .device_field(id(5), AttributeKey::DeviceName)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoDeviceFound);
}

#[tokio::test]
async fn test_tags() {
    let fetch = RecordingFetch::new();
    fetch
        .ok(
            Method::Get,
            "/api/v1/devices/3/tags",
            r#"{"data": ["lab", "nightly"]}"#,
        )
        .await;
    fetch
        .ok(Method::Put, "/api/v1/devices/3/tags/smoke", r#"{"status":"SUCCESS"}"#)
        .await;
    fetch
        .ok(Method::Delete, "/api/v1/devices/3/tags/lab", r#"{"status":"SUCCESS"}"#)
        .await;
    fetch
        .ok(Method::Delete, "/api/v1/devices/3/tags/", r#"{"status":"SUCCESS"}"#)
        .await;
    let client = CloudClient::with_fetcher(fetch);

    assert_eq!(
        client.device_tags(id(3)).await.unwrap(),
        vec!["lab", "nightly"]
    );

    let body = client.add_device_tag(id(3), "smoke").await.unwrap();
    assert_eq!(parse_response(&body, "status").unwrap(), "SUCCESS");
    client.remove_device_tag(id(3), "lab").await.unwrap();
    client.remove_all_tags(id(3)).await.unwrap();

    let err = client.add_device_tag(id(3), "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let methods: Vec<Method> = client
        .fetcher()
        .requests()
        .await
        .iter()
        .map(|r| r.method)
        .collect();
    assert_eq!(
        methods,
        vec![Method::Get, Method::Put, Method::Delete, Method::Delete]
    );
}

#[tokio::test]
async fn test_reservations() {
    let fetch = RecordingFetch::new();
    fetch
        .ok(Method::Get, "/api/v1/devices/2/reservations", r#"{"data": []}"#)
        .await;
    fetch
        .ok(Method::Post, "/api/v1/devices/2/reservations/new", "{}")
        .await;
    fetch
        .ok(Method::Post, "/api/v1/devices/reservations/new", "{}")
        .await;
    let client = CloudClient::with_fetcher(fetch);
    let window = window();

    client.device_reservations(id(2), &window).await.unwrap();
    let request = client.fetcher().last_request().await.unwrap();
    assert_eq!(request.param("current_timestamp"), Some("2024-05-01-08-59-00"));
    assert_eq!(request.param("start"), Some("2024-05-01-09-00-00"));
    assert_eq!(request.param("end"), Some("2024-05-01-13-30-00"));

    client.reserve_device(id(2), &window).await.unwrap();
    let request = client.fetcher().last_request().await.unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(
        request.param("clientCurrentTimestamp"),
        Some("2024-05-01-08-59-00")
    );
    assert_eq!(request.param("current_timestamp"), None);

    client
        .reserve_devices(&[id(2), id(3), id(11)], &window)
        .await
        .unwrap();
    let request = client.fetcher().last_request().await.unwrap();
    assert_eq!(request.path, "/api/v1/devices/reservations/new");
    assert_eq!(request.param("devicesList"), Some("2,3,11"));

    let err = client.reserve_devices(&[], &window).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_device_actions_and_edit() {
    let fetch = RecordingFetch::new();
    for path in [
        "/api/v1/devices/4/release",
        "/api/v1/devices/4/reboot",
        "/api/v1/devices/4/resetusb",
        "/api/v1/devices/4",
    ] {
        fetch.ok(Method::Post, path, r#"{"status":"SUCCESS"}"#).await;
    }
    fetch
        .ok(Method::Put, "/api/v1/devices/4/web-control", "{}")
        .await;
    let client = CloudClient::with_fetcher(fetch);

    client.release_device(id(4)).await.unwrap();
    client.reboot_device(id(4)).await.unwrap();
    client.reset_usb_connection(id(4)).await.unwrap();

    let edit = DeviceEdit::new().name("Lab Pixel").category(Category::Phone);
    client.edit_device(id(4), &edit).await.unwrap();
    let request = client.fetcher().last_request().await.unwrap();
    assert_eq!(request.param("name"), Some("Lab Pixel"));
    assert_eq!(request.param("notes"), None);
    assert_eq!(request.param("category"), Some("PHONE"));

    client
        .start_web_control(id(4), ControlType::Automation, Some("emulator-5554"))
        .await
        .unwrap();
    let request = client.fetcher().last_request().await.unwrap();
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.param("type"), Some("2"));
    assert_eq!(request.param("emulatorInstanceName"), Some("emulator-5554"));

    client
        .start_web_control(id(4), ControlType::View, None)
        .await
        .unwrap();
    let request = client.fetcher().last_request().await.unwrap();
    assert_eq!(request.params, vec![("type".to_string(), "1".to_string())]);

    let paths: Vec<String> = client
        .fetcher()
        .requests()
        .await
        .into_iter()
        .map(|r| r.path)
        .take(3)
        .collect();
    assert_eq!(
        paths,
        vec![
            "/api/v1/devices/4/release",
            "/api/v1/devices/4/reboot",
            "/api/v1/devices/4/resetusb"
        ]
    );
}

#[tokio::test]
async fn test_transport_failures_propagate() {
    let fetch = RecordingFetch::new();
    fetch.respond(Method::Get, DEVICES, 401, "").await;
    fetch
        .respond(
            Method::Post,
            "/api/v1/devices/8/release",
            400,
            r#"{"status":"ERROR","data":"Device is not reserved"}"#,
        )
        .await;
    let client = CloudClient::with_fetcher(fetch);

    let err = client.all_devices().await.unwrap_err();
    assert!(matches!(
        err,
        CloudError::Transport(TransportError::Unauthorized { .. })
    ));

    let err = client.release_device(id(8)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(
        err.to_string(),
        "Request failed with status 400: Device is not reserved"
    );

    // Unrouted requests come back as a bare 404
    let err = client.reboot_device(id(8)).await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 404");
}

#[tokio::test]
async fn test_malformed_inventory() {
    let fetch = RecordingFetch::new();
    fetch
        .ok(Method::Get, DEVICES, r#"{"data": [{"id": 1}, 42]}"#)
        .await;
    let client = CloudClient::with_fetcher(fetch);

    let err = client.all_devices().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotJsonObject);
}
