//! API integration tests
//!
//! Need a running server on localhost:8080 backed by a database that holds
//! at least area 1. Tokens are signed with `JWT_SECRET` (or the default
//! development secret).

use assetlog_server::models::user::{Role, UserClaims};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn token(role: Role) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = chrono::Utc::now().timestamp();
    UserClaims {
        sub: "integration".to_string(),
        user_id: 1,
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&secret)
    .expect("Failed to sign token")
}

/// Register equipment in area 1 with one 30-day inspection anchored at `anchor`
async fn register(client: &Client, anchor: &str) -> (i64, i64) {
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(token(Role::Admin))
        .json(&json!({
            "name": "Integration press",
            "location_kind": "area",
            "area_id": 1,
            "schedules": [
                { "maintenance_type": "inspection", "interval_days": 30, "anchor_date": anchor }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    let equipment_id = body["equipment"]["id"].as_i64().expect("No equipment id");
    let schedule_id = body["schedules"][0]["id"].as_i64().expect("No schedule id");
    (equipment_id, schedule_id)
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
async fn test_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/equipment", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_viewer_cannot_log_maintenance() {
    let client = Client::new();

    let response = client
        .post(format!("{}/maintenance/corrective", BASE_URL))
        .bearer_auth(token(Role::Viewer))
        .json(&json!({ "equipment_id": 1, "description": "Replaced belt" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_preventive_cycle() {
    let client = Client::new();
    let (equipment_id, schedule_id) = register(&client, "2024-01-01").await;
    let technician = token(Role::Technician);

    // Due 2024-01-31: 3 days left on the 28th
    let status: Value = client
        .get(format!(
            "{}/equipment/{}/maintenance-status?today=2024-01-28",
            BASE_URL, equipment_id
        ))
        .bearer_auth(&technician)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(status["urgency"], "UPCOMING");
    assert_eq!(status["schedules"][0]["days_remaining"], 3);

    let response = client
        .post(format!("{}/maintenance/preventive", BASE_URL))
        .bearer_auth(&technician)
        .json(&json!({ "schedule_id": schedule_id, "performed_date": "2024-01-28" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["schedule"]["due_date"], "2024-02-27");
    assert_eq!(body["event"]["kind"], "preventive");
    assert_eq!(body["event"]["performed_by"], "integration");

    let status: Value = client
        .get(format!(
            "{}/equipment/{}/maintenance-status?today=2024-01-28",
            BASE_URL, equipment_id
        ))
        .bearer_auth(&technician)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(status["urgency"], "OK");
}

#[tokio::test]
#[ignore]
async fn test_invalid_interval_rejected() {
    let client = Client::new();
    let (equipment_id, _) = register(&client, "2024-01-01").await;

    let response = client
        .post(format!("{}/equipment/{}/schedules", BASE_URL, equipment_id))
        .bearer_auth(token(Role::Technician))
        .json(&json!({ "maintenance_type": "cleaning", "interval_days": 0 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "InvalidInterval");
}

#[tokio::test]
#[ignore]
async fn test_detach_all_keeps_history() {
    let client = Client::new();
    let (equipment_id, schedule_id) = register(&client, "2024-01-01").await;

    client
        .post(format!("{}/maintenance/preventive", BASE_URL))
        .bearer_auth(token(Role::Technician))
        .json(&json!({ "schedule_id": schedule_id, "performed_date": "2024-01-20" }))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .delete(format!("{}/equipment/{}/schedules", BASE_URL, equipment_id))
        .bearer_auth(token(Role::Admin))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["removed"], 1);

    let events: Value = client
        .get(format!("{}/equipment/{}/maintenance-events", BASE_URL, equipment_id))
        .bearer_auth(token(Role::Viewer))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(events.as_array().map(Vec::len), Some(1));

    let status: Value = client
        .get(format!("{}/equipment/{}/maintenance-status", BASE_URL, equipment_id))
        .bearer_auth(token(Role::Viewer))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(status["urgency"], "UNKNOWN");
}

#[tokio::test]
#[ignore]
async fn test_due_listing_filter() {
    let client = Client::new();
    let (equipment_id, _) = register(&client, "2024-01-01").await;

    let due: Value = client
        .get(format!("{}/maintenance/due?urgency=OVERDUE&today=2024-03-01", BASE_URL))
        .bearer_auth(token(Role::Viewer))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let entries = due.as_array().expect("Expected a list");
    assert!(entries
        .iter()
        .any(|e| e["equipment_id"].as_i64() == Some(equipment_id)));
    assert!(entries.iter().all(|e| e["schedule"]["urgency"] == "OVERDUE"));

    let response = client
        .get(format!("{}/maintenance/due?urgency=OK", BASE_URL))
        .bearer_auth(token(Role::Viewer))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_decommission_twice() {
    let client = Client::new();
    let (equipment_id, _) = register(&client, "2024-01-01").await;
    let admin = token(Role::Admin);

    let response = client
        .post(format!("{}/equipment/{}/decommission", BASE_URL, equipment_id))
        .bearer_auth(&admin)
        .json(&json!({ "reason": "Replaced by newer model", "decommissioned_date": "2024-09-30" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/equipment/{}/decommission", BASE_URL, equipment_id))
        .bearer_auth(&admin)
        .json(&json!({ "reason": "Again" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let listed: Value = client
        .get(format!(
            "{}/decommissions?from=2024-09-30&to=2024-09-30&reason=newer",
            BASE_URL
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(listed
        .as_array()
        .expect("Expected a list")
        .iter()
        .any(|e| e["equipment"]["id"].as_i64() == Some(equipment_id)));

    // Inactive equipment no longer accepts maintenance
    let response = client
        .post(format!("{}/maintenance/corrective", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "equipment_id": equipment_id, "description": "Late repair" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

async fn event_count(client: &Client, equipment_id: i64) -> usize {
    let events: Value = client
        .get(format!("{}/equipment/{}/maintenance-events", BASE_URL, equipment_id))
        .bearer_auth(token(Role::Viewer))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    events.as_array().map(Vec::len).expect("Expected a list")
}

#[tokio::test]
#[ignore]
async fn test_concurrent_preventive_on_one_schedule() {
    let client = Client::new();
    let (equipment_id, schedule_id) = register(&client, "2024-01-01").await;
    let before = event_count(&client, equipment_id).await;

    let mut handles = Vec::new();
    for day in 1..=8 {
        let client = client.clone();
        let technician = token(Role::Technician);
        handles.push(tokio::spawn(async move {
            client
                .post(format!("{}/maintenance/preventive", BASE_URL))
                .bearer_auth(technician)
                .json(&json!({
                    "schedule_id": schedule_id,
                    "performed_date": format!("2024-01-{:02}", 10 + day)
                }))
                .send()
                .await
                .expect("Failed to send request")
                .status()
        }));
    }

    let mut created = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        assert!(
            status == StatusCode::CREATED || status == StatusCode::CONFLICT,
            "Unexpected status {}",
            status
        );
        if status == StatusCode::CREATED {
            created += 1;
        }
    }

    assert!(created >= 1);
    assert_eq!(event_count(&client, equipment_id).await, before + created);
}

#[tokio::test]
#[ignore]
async fn test_preventive_racing_decommission() {
    let client = Client::new();

    for _ in 0..5 {
        let (equipment_id, schedule_id) = register(&client, "2024-01-01").await;

        let preventive = {
            let client = client.clone();
            let technician = token(Role::Technician);
            tokio::spawn(async move {
                client
                    .post(format!("{}/maintenance/preventive", BASE_URL))
                    .bearer_auth(technician)
                    .json(&json!({ "schedule_id": schedule_id, "performed_date": "2024-01-20" }))
                    .send()
                    .await
                    .expect("Failed to send request")
                    .status()
            })
        };
        let decommission = {
            let client = client.clone();
            let admin = token(Role::Admin);
            tokio::spawn(async move {
                client
                    .post(format!("{}/equipment/{}/decommission", BASE_URL, equipment_id))
                    .bearer_auth(admin)
                    .json(&json!({ "reason": "Scrapped", "decommissioned_date": "2024-01-20" }))
                    .send()
                    .await
                    .expect("Failed to send request")
                    .status()
            })
        };

        let preventive = preventive.await.unwrap();
        assert_eq!(decommission.await.unwrap(), StatusCode::CREATED);
        assert!(preventive == StatusCode::CREATED || preventive == StatusCode::CONFLICT);

        let logged = event_count(&client, equipment_id).await;
        assert_eq!(logged, usize::from(preventive == StatusCode::CREATED));

        // Once decommissioned, no further maintenance lands
        let response = client
            .post(format!("{}/maintenance/preventive", BASE_URL))
            .bearer_auth(token(Role::Technician))
            .json(&json!({ "schedule_id": schedule_id, "performed_date": "2024-02-01" }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(event_count(&client, equipment_id).await, logged);
    }
}

#[tokio::test]
#[ignore]
async fn test_list_equipment_by_area() {
    let client = Client::new();
    let (equipment_id, _) = register(&client, "2024-01-01").await;

    let listed: Value = client
        .get(format!("{}/equipment?area_id=1&status=active&today=2024-03-01", BASE_URL))
        .bearer_auth(token(Role::Viewer))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let entries = listed.as_array().expect("Expected a list");
    assert!(entries.iter().all(|e| e["area_id"] == 1));
    let ours = entries
        .iter()
        .find(|e| e["id"].as_i64() == Some(equipment_id))
        .expect("Registered equipment missing from area listing");
    assert_eq!(ours["maintenance_urgency"], "OVERDUE");

    let response = client
        .get(format!("{}/equipment?workstation_id=0", BASE_URL))
        .bearer_auth(token(Role::Viewer))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
