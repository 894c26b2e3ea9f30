//! Handler tests for the pickup point endpoints.

use super::*;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::domain::{PickupPointId, ReceptionStatus, Role};
use crate::inbound::http::test_utils::{bearer_for, memory_state, test_app};
use crate::test_support::InMemoryStore;

struct Harness {
    store: InMemoryStore,
    state: web::Data<HttpState>,
}

#[fixture]
fn harness() -> Harness {
    let store = InMemoryStore::new();
    let state = memory_state(&store);
    Harness { store, state }
}

async fn send(
    harness: &Harness,
    request: actix_test::TestRequest,
    role: Option<Role>,
) -> (StatusCode, Value) {
    let request = match role {
        Some(role) => request.insert_header(("Authorization", bearer_for(&harness.state, role).await)),
        None => request,
    };
    let app = actix_test::init_service(test_app(harness.state.clone())).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

async fn open(harness: &Harness, city: &str) -> i64 {
    let request = actix_test::TestRequest::post()
        .uri("/pvz")
        .set_json(json!({ "city": city }));
    let (status, body) = send(harness, request, Some(Role::Moderator)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("numeric id")
}

#[rstest]
#[actix_web::test]
async fn moderator_opens_pickup_point(harness: Harness) {
    let request = actix_test::TestRequest::post()
        .uri("/pvz")
        .set_json(json!({ "city": "Санкт-Петербург" }));
    let (status, body) = send(&harness, request, Some(Role::Moderator)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["city"], "Санкт-Петербург");
    assert!(body["id"].as_i64().is_some_and(|id| id > 0));
    assert!(body["registrationDate"].is_string());
}

#[rstest]
#[actix_web::test]
async fn employee_cannot_open_pickup_point(harness: Harness) {
    let request = actix_test::TestRequest::post()
        .uri("/pvz")
        .set_json(json!({ "city": "Москва" }));
    let (status, body) = send(&harness, request, Some(Role::Employee)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}

#[rstest]
#[actix_web::test]
async fn unsupported_city_is_rejected(harness: Harness) {
    let request = actix_test::TestRequest::post()
        .uri("/pvz")
        .set_json(json!({ "city": "Новосибирск" }));
    let (status, body) = send(&harness, request, Some(Role::Moderator)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "city");
}

#[rstest]
#[actix_web::test]
async fn listing_requires_a_token(harness: Harness) {
    let (status, _) = send(&harness, actix_test::TestRequest::get().uri("/pvz"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(Role::Employee)]
#[case(Role::Moderator)]
#[actix_web::test]
async fn both_roles_may_list(harness: Harness, #[case] role: Role) {
    open(&harness, "Москва").await;
    let (status, body) = send(&harness, actix_test::TestRequest::get().uri("/pvz"), Some(role)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn full_reception_cycle_appears_in_listing(harness: Harness) {
    let pvz_id = open(&harness, "Москва").await;
    let start = actix_test::TestRequest::post()
        .uri("/receptions")
        .set_json(json!({ "pvzId": pvz_id }));
    assert_eq!(send(&harness, start, Some(Role::Employee)).await.0, StatusCode::CREATED);
    for _ in 0..2 {
        let add = actix_test::TestRequest::post()
            .uri("/products")
            .set_json(json!({ "type": "электроника", "pvzId": pvz_id }));
        assert_eq!(send(&harness, add, Some(Role::Employee)).await.0, StatusCode::CREATED);
    }
    let close =
        actix_test::TestRequest::post().uri(&format!("/pvz/{pvz_id}/close_last_reception"));
    assert_eq!(send(&harness, close, Some(Role::Employee)).await.0, StatusCode::OK);

    let (status, body) =
        send(&harness, actix_test::TestRequest::get().uri("/pvz"), Some(Role::Employee)).await;
    assert_eq!(status, StatusCode::OK);
    let receptions = &body[0]["receptions"];
    assert_eq!(receptions.as_array().map(Vec::len), Some(1));
    assert_eq!(receptions[0]["reception"]["status"], "closed");
    let products = receptions[0]["products"].as_array().expect("products array");
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|item| item["type"] == "электроника"));
}

#[rstest]
#[actix_web::test]
async fn window_filters_receptions_but_keeps_pickup_points(harness: Harness) {
    let first = open(&harness, "Москва").await;
    open(&harness, "Казань").await;
    let early = Utc
        .with_ymd_and_hms(2020, 1, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    harness
        .store
        .seed_reception(
            PickupPointId::new(first).expect("positive id"),
            early,
            ReceptionStatus::Closed,
        )
        .expect("reception seeded");

    let start = (early + TimeDelta::days(1)).to_rfc3339();
    let uri = format!("/pvz?startDate={}", urlencode(&start));
    let (status, body) = send(&harness, actix_test::TestRequest::get().uri(&uri), Some(Role::Employee)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().expect("array body");
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry["receptions"] == json!([])));
}

#[rstest]
#[case("/pvz?page=0", "page")]
#[case("/pvz?limit=31", "limit")]
#[case("/pvz?startDate=yesterday", "startDate")]
#[case("/pvz?startDate=2025-04-02T00:00:00Z&endDate=2025-04-01T00:00:00Z", "startDate")]
#[actix_web::test]
async fn invalid_filters_are_rejected(harness: Harness, #[case] uri: &str, #[case] field: &str) {
    let (status, body) = send(&harness, actix_test::TestRequest::get().uri(uri), Some(Role::Employee)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn pages_follow_identifier_order(harness: Harness) {
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(open(&harness, "Казань").await);
    }
    let (_, body) = send(
        &harness,
        actix_test::TestRequest::get().uri("/pvz?page=2&limit=2"),
        Some(Role::Moderator),
    )
    .await;
    let page: Vec<i64> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|entry| entry["pvz"]["id"].as_i64())
        .collect();
    assert_eq!(page, vec![ids[2]]);
}

fn urlencode(raw: &str) -> String {
    raw.replace('+', "%2B").replace(':', "%3A")
}
