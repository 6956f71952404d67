//! API integration tests against a running server
//!
//! Expects a seed administrator configured through ADMIN_EMAIL and
//! ADMIN_PASSWORD (defaults below), and TICKMYPAX_AUTH__COOKIE_SECURE=false
//! so the session cookie travels over plain HTTP.

use std::sync::{Mutex, MutexGuard};

use reqwest::{multipart, Client, StatusCode};
use rust_xlsxwriter::Workbook;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

/// Every import replaces the whole active set, so tests that import run one
/// at a time
static ACTIVE_SET: Mutex<()> = Mutex::new(());

fn lock_active_set() -> MutexGuard<'static, ()> {
    ACTIVE_SET.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Tour type no earlier run has used
fn unique_tour_type(label: &str) -> String {
    format!("{} {}", label, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

fn admin_credentials() -> (String, String) {
    (
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@tickmypax.local".to_string()),
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
    )
}

/// Client keeping the session cookie between requests
async fn logged_in_client() -> Client {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let (email, password) = admin_credentials();
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    client
}

/// Booking export layout: date in B, tour type in C, surname in E, pax in G,
/// unique reference in I
fn booking_workbook(rows: &[(&str, &str, &str, f64, &str)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let header = [
        "Booking", "Date", "Product", "Seats", "Surname", "First name", "Pax", "Email",
        "Reference", "Status", "Phone", "Notes",
    ];
    for (col, title) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }

    for (i, (date, tour_type, surname, pax, reference)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 1, *date).unwrap();
        sheet.write_string(row, 2, *tour_type).unwrap();
        sheet.write_string(row, 4, *surname).unwrap();
        sheet.write_number(row, 6, *pax).unwrap();
        sheet.write_string(row, 8, *reference).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

async fn import(client: &Client, bytes: Vec<u8>) -> reqwest::Response {
    let part = multipart::Part::bytes(bytes)
        .file_name("bookings.xlsx")
        .mime_str("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
        .unwrap();

    client
        .post(format!("{}/records/import-excel", BASE_URL))
        .multipart(multipart::Form::new().part("file", part))
        .send()
        .await
        .expect("Failed to send import request")
}

async fn records_of_tour(client: &Client, tour_type: &str) -> Vec<Value> {
    let records: Value = client
        .get(format!("{}/records", BASE_URL))
        .query(&[("tourType", tour_type)])
        .send()
        .await
        .expect("Failed to list records")
        .json()
        .await
        .unwrap();
    records.as_array().cloned().unwrap_or_default()
}

/// Create a guide account and return its id with a logged-in client
async fn guide_client(admin: &Client, name: &str) -> (i64, Client) {
    let email = format!(
        "guide-{}@tickmypax.local",
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );
    let guide: Value = admin
        .post(format!("{}/guides", BASE_URL))
        .json(&json!({ "email": email, "userName": name, "password": "guide123" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let client = Client::builder().cookie_store(true).build().unwrap();
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "guide123" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    (guide["id"].as_i64().unwrap(), client)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_sets_cookie_and_token() {
    let client = Client::new();
    let (email, password) = admin_credentials();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["isAdmin"], true);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": "admin@tickmypax.local", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_me_with_cookie_and_logout() {
    let client = logged_in_client().await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["isAdmin"], true);

    let response = client
        .post(format!("{}/auth/logout", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.text().await.unwrap(), "Logged out");

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_records_require_authentication() {
    let client = Client::new();

    let response = client
        .get(format!("{}/records", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_import_check_in_and_export() {
    let _active_set = lock_active_set();
    let client = logged_in_client().await;

    let bytes = booking_workbook(&[
        ("01.01.2024 09:00:00", "Cliffs of Moher", "Byrne", 3.0, "GYG-100"),
        ("01.01.2024 09:00:00", "Cliffs of Moher", "Walsh", 5.0, "GYG-101"),
        ("", "Dublin", "Skipped", 1.0, "GYG-102"),
        ("32.13.2024", "Dublin", "Broken", 2.0, "GYG-103"),
    ]);

    let response = import(&client, bytes).await;
    assert!(response.status().is_success());
    let report: Value = response.json().await.unwrap();
    assert_eq!(report["message"], "Import successful");
    assert_eq!(report["totalRowsProcessed"], 4);
    assert_eq!(report["rowsImported"], 2);
    let errors = report["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().contains("32.13.2024"));

    // Wrong station: conflict, nothing written
    let response = client
        .post(format!("{}/records/checkin-unique", BASE_URL))
        .json(&json!({ "uniqueRef": "GYG-100", "tourType": "Dublin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("Cliffs of Moher"));

    let response = client
        .post(format!("{}/records/checkin-unique", BASE_URL))
        .json(&json!({ "uniqueRef": "GYG-100", "tourType": "cliffs of moher" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["passenger"]["checkedIn"], true);
    assert!(body["passenger"]["checkedInBy"].is_string());

    let stats: Value = client
        .get(format!("{}/records/stats", BASE_URL))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let cliffs = stats
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["tourType"] == "Cliffs of Moher")
        .expect("Cliffs of Moher stats");
    assert_eq!(cliffs["totalClients"], 8);
    assert_eq!(cliffs["checkedInCount"], 1);
    assert_eq!(cliffs["notArrivedCount"], 7);

    let response = client
        .get(format!("{}/records/download-today", BASE_URL))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("TodayReport_"));
    assert!(!response.bytes().await.unwrap().is_empty());

    // A second import archives the previous set
    let response = import(&client, booking_workbook(&[])).await;
    let report: Value = response.json().await.unwrap();
    assert_eq!(report["archivedRecords"], 2);
    assert_eq!(report["rowsImported"], 0);

    let records: Value = client
        .get(format!("{}/records", BASE_URL))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_import_without_file_is_rejected() {
    let client = logged_in_client().await;

    let response = client
        .post(format!("{}/records/import-excel", BASE_URL))
        .multipart(multipart::Form::new().text("other", "value"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_guide_directory_upsert() {
    let client = logged_in_client().await;

    let response = client
        .put(format!("{}/tours/guide?tourType=Kilkenny%20Castle", BASE_URL))
        .json(&json!({ "guideName": "Ciara" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let tour: Value = response.json().await.unwrap();
    assert_eq!(tour["guideName"], "Ciara");

    let response = client
        .put(format!("{}/tours/guide?tourType=kilkenny%20castle", BASE_URL))
        .json(&json!({ "guideName": "Sean" }))
        .send()
        .await
        .unwrap();
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["id"], tour["id"]);
    assert_eq!(updated["guideName"], "Sean");

    let response = client
        .put(format!("{}/tours/guide", BASE_URL))
        .json(&json!({ "guideName": "Sean" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_guide_accounts_lifecycle() {
    let client = logged_in_client().await;
    let email = format!("guide-{}@tickmypax.local", chrono::Utc::now().timestamp_millis());

    let response = client
        .post(format!("{}/guides", BASE_URL))
        .json(&json!({ "email": email, "userName": "Test Guide", "password": "guide123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let guide: Value = response.json().await.unwrap();
    let id = guide["id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/guides", BASE_URL))
        .json(&json!({ "email": email, "password": "guide123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Guides cannot manage accounts
    let guide_client = Client::new();
    let login: Value = guide_client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "guide123" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = login["token"].as_str().unwrap();
    let response = guide_client
        .get(format!("{}/guides", BASE_URL))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .delete(format!("{}/guides/{}", BASE_URL, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_check_in_keeps_first_attributor_until_removed() {
    let _active_set = lock_active_set();
    let admin = logged_in_client().await;
    let (guide_id, guide) = guide_client(&admin, "Late Guide").await;

    let tour_type = unique_tour_type("Glendalough");
    let response = import(
        &admin,
        booking_workbook(&[("01.01.2024 09:00:00", tour_type.as_str(), "Byrne", 2.0, "GYG-200")]),
    )
    .await;
    assert!(response.status().is_success());
    let id = records_of_tour(&admin, &tour_type).await[0]["id"].as_i64().unwrap();

    let response = admin
        .post(format!("{}/records/{}/checkin", BASE_URL, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.text().await.unwrap(), "Checked in");
    let first = records_of_tour(&admin, &tour_type).await[0].clone();
    assert_eq!(first["checkedIn"], true);
    let first_by = first["checkedInBy"].as_str().unwrap().to_string();

    // A second check-in by someone else is accepted but changes nothing
    let response = guide
        .post(format!("{}/records/{}/checkin", BASE_URL, id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let record = records_of_tour(&admin, &tour_type).await[0].clone();
    assert_eq!(record["checkedIn"], true);
    assert_eq!(record["checkedInBy"], first_by.as_str());
    assert_ne!(record["checkedInBy"], "Late Guide");

    let response = guide
        .post(format!("{}/records/{}/remove-checkin", BASE_URL, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.text().await.unwrap(), "Check-in removed");
    let record = records_of_tour(&admin, &tour_type).await[0].clone();
    assert_eq!(record["checkedIn"], false);
    assert!(record["checkedInBy"].is_null());

    // After a reversal the next check-in is attributed afresh
    guide
        .post(format!("{}/records/{}/checkin", BASE_URL, id))
        .send()
        .await
        .unwrap();
    let record = records_of_tour(&admin, &tour_type).await[0].clone();
    assert_eq!(record["checkedInBy"], "Late Guide");

    let response = admin
        .post(format!("{}/records/{}/checkin", BASE_URL, i32::MAX))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    admin
        .delete(format!("{}/guides/{}", BASE_URL, guide_id))
        .send()
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn test_wrong_station_leaves_record_untouched() {
    let _active_set = lock_active_set();
    let client = logged_in_client().await;

    let tour_type = unique_tour_type("Howth");
    let response = import(
        &client,
        booking_workbook(&[("01.01.2024 09:00:00", tour_type.as_str(), "Kelly", 4.0, "GYG-300")]),
    )
    .await;
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/records/checkin-unique", BASE_URL))
        .json(&json!({ "uniqueRef": "GYG-300", "tourType": "Dublin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let record = records_of_tour(&client, &tour_type).await[0].clone();
    assert_eq!(record["checkedIn"], false);
    assert!(record["checkedInBy"].is_null());
    assert_eq!(record["pax"], 4);
}

#[tokio::test]
#[ignore]
async fn test_unreadable_workbook_still_archives_active_set() {
    let _active_set = lock_active_set();
    let client = logged_in_client().await;

    let tour_type = unique_tour_type("Kilkenny");
    let response = import(
        &client,
        booking_workbook(&[
            ("01.01.2024 09:00:00", tour_type.as_str(), "Byrne", 1.0, "GYG-400"),
            ("01.01.2024 09:00:00", tour_type.as_str(), "Walsh", 2.0, "GYG-401"),
            ("01.01.2024 09:00:00", tour_type.as_str(), "Nolan", 3.0, "GYG-402"),
        ]),
    )
    .await;
    assert!(response.status().is_success());

    let response = import(&client, b"this is not a workbook".to_vec()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let records: Value = client
        .get(format!("{}/records", BASE_URL))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(records.as_array().unwrap().is_empty());

    let archived: Value = client
        .get(format!("{}/records/archive", BASE_URL))
        .query(&[("tourType", tour_type.as_str())])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let archived = archived.as_array().unwrap();
    assert_eq!(archived.len(), 3);
    assert!(archived.iter().all(|r| r["archivedAt"] == archived[0]["archivedAt"]));
}

#[tokio::test]
#[ignore]
async fn test_concurrent_imports_leave_one_file() {
    let _active_set = lock_active_set();
    let client = logged_in_client().await;

    let first = unique_tour_type("Wicklow");
    let second = unique_tour_type("Boyne");
    let first_file = booking_workbook(&[
        ("01.01.2024 09:00:00", first.as_str(), "Byrne", 1.0, "GYG-500"),
        ("01.01.2024 09:00:00", first.as_str(), "Walsh", 1.0, "GYG-501"),
    ]);
    let second_file = booking_workbook(&[
        ("01.01.2024 09:00:00", second.as_str(), "Nolan", 1.0, "GYG-600"),
        ("01.01.2024 09:00:00", second.as_str(), "Kelly", 1.0, "GYG-601"),
        ("01.01.2024 09:00:00", second.as_str(), "Ryan", 1.0, "GYG-602"),
    ]);

    let (a, b) = tokio::join!(import(&client, first_file), import(&client, second_file));
    assert!(a.status().is_success());
    assert!(b.status().is_success());

    let records: Value = client
        .get(format!("{}/records", BASE_URL))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tour_types: std::collections::HashSet<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["tourType"].as_str())
        .collect();
    assert_eq!(tour_types.len(), 1);
    let expected = if tour_types.contains(first.as_str()) { 2 } else { 3 };
    assert_eq!(records.as_array().unwrap().len(), expected);
}
