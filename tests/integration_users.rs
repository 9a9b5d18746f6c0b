mod common;

use axum::http::StatusCode;
use common::{
    admin_token, empty_request, json_request, login, register, send, setup_test_app, user_payload,
};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_list_users_newest_first() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    register(&app, "carol1", "carol@x.io", "secret1").await;
    register(&app, "dave11", "dave@x.io", "secret1").await;

    let response = send(&app, empty_request("GET", "/api/users", Some(&token))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "List of users");
    let usernames: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["username"].as_str().unwrap())
        .collect();
    assert_eq!(usernames, vec!["dave11", "carol1", "admin1"]);
}

#[tokio::test]
async fn test_list_users_hides_password() {
    let app = setup_test_app();
    let token = admin_token(&app).await;

    let response = send(&app, empty_request("GET", "/api/users", Some(&token))).await;

    for user in response.body["data"].as_array().unwrap() {
        assert!(user.get("password").is_none());
        assert!(user.get("password_hash").is_none());
    }
}

#[tokio::test]
async fn test_create_user_as_admin() {
    let app = setup_test_app();
    let token = admin_token(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/users",
            Some(&token),
            &user_payload("Erin", "Erin_2", "erin@x.io", "secret1"),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "User created successfully");
    assert_eq!(response.body["data"]["username"], "erin_2");

    // the created user can sign in
    let erin_token = login(&app, "erin_2", "secret1").await;
    assert!(!erin_token.is_empty());
}

#[tokio::test]
async fn test_create_user_conflict() {
    let app = setup_test_app();
    let token = admin_token(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/users",
            Some(&token),
            &user_payload("Admin Two", "admin2", "ADMIN@x.io", "secret1"),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["errors"], json!({ "email": "Already taken" }));
}

#[tokio::test]
async fn test_get_user() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    let carol = register(&app, "carol1", "carol@x.io", "secret1").await;
    let id = carol["id"].as_str().unwrap();

    let response = send(
        &app,
        empty_request("GET", &format!("/api/users/{id}"), Some(&token)),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "User details");
    assert_eq!(response.body["data"], carol);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let app = setup_test_app();
    let token = admin_token(&app).await;

    let response = send(
        &app,
        empty_request(
            "GET",
            &format!("/api/users/{}", Uuid::new_v4()),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body,
        json!({ "success": false, "message": "User not found" })
    );
}

#[tokio::test]
async fn test_non_uuid_id_is_not_found() {
    let app = setup_test_app();
    let token = admin_token(&app).await;

    let get = send(&app, empty_request("GET", "/api/users/42", Some(&token))).await;
    let delete = send(&app, empty_request("DELETE", "/api/users/abc", Some(&token))).await;

    assert_eq!(get.status, StatusCode::NOT_FOUND);
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
    assert_eq!(get.body["message"], "User not found");
}

#[tokio::test]
async fn test_update_merges_provided_fields() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    let carol = register(&app, "carol1", "carol@x.io", "secret1").await;
    let id = carol["id"].as_str().unwrap();

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(&token),
            &json!({ "name": "  Carol Renamed " }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "User updated successfully");
    let data = &response.body["data"];
    assert_eq!(data["name"], "Carol Renamed");
    assert_eq!(data["username"], "carol1");
    assert_eq!(data["email"], "carol@x.io");
    assert_eq!(data["created_at"], carol["created_at"]);

    // password untouched
    login(&app, "carol1", "secret1").await;
}

#[tokio::test]
async fn test_update_password() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    let carol = register(&app, "carol1", "carol@x.io", "secret1").await;
    let id = carol["id"].as_str().unwrap();

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(&token),
            &json!({ "password": "newsecret" }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let old = send(
        &app,
        json_request(
            "POST",
            "/api/login",
            None,
            &json!({ "username": "carol1", "password": "secret1" }),
        ),
    )
    .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    login(&app, "carol1", "newsecret").await;
}

#[tokio::test]
async fn test_update_blank_password_is_ignored() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    let carol = register(&app, "carol1", "carol@x.io", "secret1").await;
    let id = carol["id"].as_str().unwrap();

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(&token),
            &json!({ "password": "   " }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], carol);
    login(&app, "carol1", "secret1").await;
}

#[tokio::test]
async fn test_update_with_no_fields_returns_user() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    let carol = register(&app, "carol1", "carol@x.io", "secret1").await;
    let id = carol["id"].as_str().unwrap();

    let response = send(
        &app,
        json_request("PUT", &format!("/api/users/{id}"), Some(&token), &json!({})),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], carol);
}

#[tokio::test]
async fn test_update_own_username_is_not_a_conflict() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    let carol = register(&app, "carol1", "carol@x.io", "secret1").await;
    let id = carol["id"].as_str().unwrap();

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(&token),
            &json!({ "username": "CAROL1", "email": "carol@x.io" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "carol1");
}

#[tokio::test]
async fn test_update_conflicts_with_other_user() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    let carol = register(&app, "carol1", "carol@x.io", "secret1").await;
    let id = carol["id"].as_str().unwrap();

    let username = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(&token),
            &json!({ "username": "admin1" }),
        ),
    )
    .await;
    assert_eq!(username.status, StatusCode::CONFLICT);
    assert_eq!(username.body["message"], "Username already taken");
    assert_eq!(username.body["errors"], json!({ "username": "Already taken" }));

    let email = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(&token),
            &json!({ "email": "admin@x.io" }),
        ),
    )
    .await;
    assert_eq!(email.status, StatusCode::CONFLICT);
    assert_eq!(email.body["message"], "Email already registered");
}

#[tokio::test]
async fn test_update_missing_user() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    let path = format!("/api/users/{}", Uuid::new_v4());

    let missing = send(
        &app,
        json_request("PUT", &path, Some(&token), &json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    // conflict check runs before the existence check
    let conflicting = send(
        &app,
        json_request("PUT", &path, Some(&token), &json!({ "username": "admin1" })),
    )
    .await;
    assert_eq!(conflicting.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_validation() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    let carol = register(&app, "carol1", "carol@x.io", "secret1").await;
    let id = carol["id"].as_str().unwrap();

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(&token),
            &json!({ "username": "no spaces", "email": "nope" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["errors"]["username"],
        "Username may only contain letters, numbers, and underscores"
    );
    assert_eq!(response.body["errors"]["email"], "Invalid email format");
}

#[tokio::test]
async fn test_delete_user_returns_deleted_record() {
    let app = setup_test_app();
    let token = admin_token(&app).await;
    let carol = register(&app, "carol1", "carol@x.io", "secret1").await;
    let path = format!("/api/users/{}", carol["id"].as_str().unwrap());

    let deleted = send(&app, empty_request("DELETE", &path, Some(&token))).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "User deleted successfully");
    assert_eq!(deleted.body["data"], carol);

    let again = send(&app, empty_request("DELETE", &path, Some(&token))).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let fetched = send(&app, empty_request("GET", &path, Some(&token))).await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);

    // the username is free again
    register(&app, "carol1", "carol@x.io", "secret1").await;
}

#[tokio::test]
async fn test_user_routes_require_token() {
    let app = setup_test_app();
    let id = Uuid::new_v4();

    for (method, uri) in [
        ("GET", "/api/users".to_string()),
        ("GET", format!("/api/users/{id}")),
        ("DELETE", format!("/api/users/{id}")),
    ] {
        let response = send(&app, empty_request(method, &uri, None)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(response.body["message"], "Unauthenticated.");
    }
}

#[tokio::test]
async fn test_token_outlives_deleted_user() {
    let app = setup_test_app();
    let admin = admin_token(&app).await;
    let carol = register(&app, "carol1", "carol@x.io", "secret1").await;
    let carol_token = login(&app, "carol1", "secret1").await;

    let deleted = send(
        &app,
        empty_request(
            "DELETE",
            &format!("/api/users/{}", carol["id"].as_str().unwrap()),
            Some(&admin),
        ),
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK);

    // tokens are not checked against the store
    let response = send(&app, empty_request("GET", "/api/users", Some(&carol_token))).await;
    assert_eq!(response.status, StatusCode::OK);
    let usernames: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["username"].as_str().unwrap())
        .collect();
    assert_eq!(usernames, vec!["admin1"]);
}
