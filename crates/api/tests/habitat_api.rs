//! HTTP-level integration tests for the `/zoos` and `/animals` endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, post_json, post_json_auth, post_raw_auth, put_json_auth,
    register,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use zoo_core::types::new_id;

async fn create_zoo(pool: &SqlitePool, token: &str, body: Value) -> Value {
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/zoos", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn create_animal(pool: &SqlitePool, token: &str, body: Value) -> Value {
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/animals", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn fetch(pool: &SqlitePool, uri: &str) -> Value {
    let response = get(common::build_test_app(pool.clone()), uri).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    body_json(response).await
}

fn animal_names(zoo: &Value) -> Vec<String> {
    zoo["animals"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_city_zoo_scenario(pool: SqlitePool) {
    register(common::build_test_app(pool.clone()), "juan123", "pw1").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        json!({ "username": "juan123", "password": "pw1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"].as_str().unwrap().to_string();

    let zoo = create_zoo(
        &pool,
        &token,
        json!({ "name": "City Zoo", "location": "Springfield" }),
    )
    .await;
    let zoo_id = zoo["id"].as_str().unwrap();

    let leo = create_animal(
        &pool,
        &token,
        json!({ "name": "Leo", "species": "lion", "zoo": zoo_id }),
    )
    .await;
    assert_eq!(leo["zoo_id"], zoo_id);

    let expanded = fetch(&pool, &format!("/api/v1/zoos/{zoo_id}")).await;
    assert_eq!(animal_names(&expanded), ["Leo"]);
    assert_eq!(expanded["animals"][0]["species"], "lion");
}

// ---------------------------------------------------------------------------
// Auth on writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_writes_require_auth(pool: SqlitePool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/zoos",
        json!({ "name": "City Zoo", "location": "Springfield" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/animals",
        json!({ "name": "Leo", "species": "lion" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Validation and lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_animal_validation_and_unknown_zoo(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/animals",
        json!({ "name": "Leo" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "species is required");

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/animals",
        json!({ "name": "Leo", "species": "lion", "zoo": new_id() }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let animals = fetch(&pool, "/api/v1/animals").await;
    assert!(animals.as_array().unwrap().is_empty(), "nothing may be created");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_malformed_ids_are_validation_errors(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/animals",
        json!({ "name": "Leo", "species": "lion", "zoo": "not-a-uuid" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/zoos",
        json!({ "name": "City Zoo", "location": "Downtown", "animals": ["nope"] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/animals/{}", new_id()),
        json!({ "zoo": 42 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    assert!(fetch(&pool, "/api/v1/animals").await.as_array().unwrap().is_empty());
    assert!(fetch(&pool, "/api/v1/zoos").await.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unparseable_body_is_bad_request(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;

    let response = post_raw_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/zoos",
        r#"{"name": "City Zoo","#,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_zoo_with_null_animals_is_empty(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/zoos",
        json!({ "name": "City Zoo", "location": "Downtown", "animals": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let zoo = body_json(response).await;
    assert_eq!(zoo["animal_ids"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_zoo_with_missing_animal_creates_nothing(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;
    let leo = create_animal(&pool, &token, json!({ "name": "Leo", "species": "lion" })).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/zoos",
        json!({ "name": "City Zoo", "location": "Springfield", "animals": [leo["id"], new_id()] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "one or more referenced animals do not exist"
    );

    let zoos = fetch(&pool, "/api/v1/zoos").await;
    assert!(zoos.as_array().unwrap().is_empty());
    let leo = fetch(&pool, &format!("/api/v1/animals/{}", leo["id"].as_str().unwrap())).await;
    assert!(leo["zoo_id"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_zoo_with_candidates_links_both_sides(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;
    let leo = create_animal(&pool, &token, json!({ "name": "Leo", "species": "lion" })).await;
    let nala = create_animal(&pool, &token, json!({ "name": "Nala", "species": "lion" })).await;

    let zoo = create_zoo(
        &pool,
        &token,
        json!({ "name": "City Zoo", "location": "Springfield", "animals": [nala["id"], leo["id"]] }),
    )
    .await;
    assert_eq!(zoo["animal_ids"], json!([nala["id"], leo["id"]]));

    let expanded = fetch(&pool, &format!("/api/v1/zoos/{}", zoo["id"].as_str().unwrap())).await;
    assert_eq!(animal_names(&expanded), ["Nala", "Leo"]);

    let leo = fetch(&pool, &format!("/api/v1/animals/{}", leo["id"].as_str().unwrap())).await;
    assert_eq!(leo["zoo"]["name"], "City Zoo");
    assert_eq!(leo["zoo"]["location"], "Springfield");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_unknown_zoo_and_animal_is_not_found(pool: SqlitePool) {
    for uri in [
        format!("/api/v1/zoos/{}", new_id()),
        format!("/api/v1/zoos/{}/animals", new_id()),
        format!("/api/v1/animals/{}", new_id()),
    ] {
        let response = get(common::build_test_app(pool.clone()), &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_animal_moves_and_detaches(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;
    let north = create_zoo(&pool, &token, json!({ "name": "North", "location": "A" })).await;
    let south = create_zoo(&pool, &token, json!({ "name": "South", "location": "B" })).await;
    let north_id = north["id"].as_str().unwrap();
    let south_id = south["id"].as_str().unwrap();

    let leo = create_animal(
        &pool,
        &token,
        json!({ "name": "Leo", "species": "lion", "zoo": north_id }),
    )
    .await;
    let leo_uri = format!("/api/v1/animals/{}", leo["id"].as_str().unwrap());

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &leo_uri,
        json!({ "zoo": south_id }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["zoo_id"], south_id);

    let north = fetch(&pool, &format!("/api/v1/zoos/{north_id}")).await;
    let south = fetch(&pool, &format!("/api/v1/zoos/{south_id}")).await;
    assert!(animal_names(&north).is_empty());
    assert_eq!(animal_names(&south), ["Leo"]);

    // Renaming alone keeps the link.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &leo_uri,
        json!({ "name": "Leo II" }),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["zoo_id"], south_id);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &leo_uri,
        json!({ "zoo": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["zoo_id"].is_null());

    let south = fetch(&pool, &format!("/api/v1/zoos/{south_id}")).await;
    assert!(animal_names(&south).is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_zoo_fields(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;
    let zoo = create_zoo(&pool, &token, json!({ "name": "City Zoo", "location": "Springfield" })).await;
    let uri = format!("/api/v1/zoos/{}", zoo["id"].as_str().unwrap());

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "location": "Shelbyville" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "City Zoo");
    assert_eq!(json["location"], "Shelbyville");

    let response = put_json_auth(
        common::build_test_app(pool),
        &uri,
        json!({ "name": "" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_animal_removes_it_from_zoo(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;
    let zoo = create_zoo(&pool, &token, json!({ "name": "City Zoo", "location": "Springfield" })).await;
    let zoo_id = zoo["id"].as_str().unwrap();
    let leo = create_animal(&pool, &token, json!({ "name": "Leo", "species": "lion", "zoo": zoo_id })).await;
    create_animal(&pool, &token, json!({ "name": "Nala", "species": "lion", "zoo": zoo_id })).await;

    let leo_uri = format!("/api/v1/animals/{}", leo["id"].as_str().unwrap());
    let response = delete_auth(common::build_test_app(pool.clone()), &leo_uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let expanded = fetch(&pool, &format!("/api/v1/zoos/{zoo_id}")).await;
    assert_eq!(animal_names(&expanded), ["Nala"]);

    let response = delete_auth(common::build_test_app(pool), &leo_uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_zoo_detaches_animals_by_default(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;
    let zoo = create_zoo(&pool, &token, json!({ "name": "City Zoo", "location": "Springfield" })).await;
    let zoo_id = zoo["id"].as_str().unwrap();
    let leo = create_animal(&pool, &token, json!({ "name": "Leo", "species": "lion", "zoo": zoo_id })).await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/zoos/{zoo_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let leo = fetch(&pool, &format!("/api/v1/animals/{}", leo["id"].as_str().unwrap())).await;
    assert!(leo["zoo_id"].is_null());
    assert!(leo["zoo"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_endpoints_expand_references(pool: SqlitePool) {
    let token = register(common::build_test_app(pool.clone()), "keeper", "pw").await;
    let zoo = create_zoo(&pool, &token, json!({ "name": "City Zoo", "location": "Springfield" })).await;
    let zoo_id = zoo["id"].as_str().unwrap();
    create_animal(&pool, &token, json!({ "name": "Leo", "species": "lion", "zoo": zoo_id })).await;
    create_animal(&pool, &token, json!({ "name": "Stray", "species": "cat" })).await;

    let zoos = fetch(&pool, "/api/v1/zoos").await;
    assert_eq!(animal_names(&zoos[0]), ["Leo"]);

    let animals = fetch(&pool, "/api/v1/animals").await;
    let animals = animals.as_array().unwrap();
    assert_eq!(animals.len(), 2);
    for animal in animals {
        match animal["name"].as_str().unwrap() {
            "Leo" => assert_eq!(animal["zoo"]["name"], "City Zoo"),
            "Stray" => assert!(animal["zoo"].is_null()),
            other => panic!("unexpected animal {other}"),
        }
    }

    let housed = fetch(&pool, &format!("/api/v1/zoos/{zoo_id}/animals")).await;
    assert_eq!(housed.as_array().unwrap().len(), 1);
    assert_eq!(housed[0]["name"], "Leo");
}
