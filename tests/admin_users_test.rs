//! Integration tests for the admin member directory and auditing views.

mod common;

use http::StatusCode;

use common::TestApp;

#[tokio::test]
async fn test_list_users_filters_by_search() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("directory").await;
    let admin_token = app.login(&admin, "password123").await;
    let member = app.signup_member("findme").await;

    let response = app
        .request(
            "GET",
            &format!("/api/admin/users?search={member}"),
            None,
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let items = response.data()["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["user_id"], member.as_str());
    assert_eq!(items[0]["user_type"], "user");
    // Password hashes never leave the server.
    assert!(items[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_member_cannot_browse_directory() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let member = app.signup_member("snooper").await;
    let token = app.login(&member, "password123").await;

    let response = app
        .request("GET", "/api/admin/users", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_history_lists_open_checkouts_first() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("historian").await;
    let admin_token = app.login(&admin, "password123").await;
    let returned = app.add_book(&admin_token, "Legends", 1).await;
    let kept = app.add_book(&admin_token, "Legends", 1).await;

    let member = app.signup_member("tracked").await;
    let token = app.login(&member, "password123").await;

    // Borrow the returned book first so recency alone cannot order the
    // result; the open checkout must still come out on top.
    for book_id in [&returned, &kept] {
        let response = app
            .request(
                "POST",
                "/api/checkouts",
                Some(serde_json::json!({ "book_id": book_id })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
    app.request(
        "POST",
        "/api/checkouts/return",
        Some(serde_json::json!({ "book_id": returned })),
        Some(&token),
    )
    .await;

    let response = app
        .request(
            "GET",
            &format!("/api/admin/users/{member}/history"),
            None,
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let history = response.data().as_array().expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["book_id"], kept.as_str());
    assert!(history[0]["return_date"].is_null());
    assert_eq!(history[1]["book_id"], returned.as_str());
    assert!(!history[1]["return_date"].is_null());
}

#[tokio::test]
async fn test_history_for_unknown_user_not_found() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("ghosthunter").await;
    let admin_token = app.login(&admin, "password123").await;

    let response = app
        .request(
            "GET",
            "/api/admin/users/no-such-user/history",
            None,
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_last_activity_tracks_account_events() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("auditor").await;
    let admin_token = app.login(&admin, "password123").await;

    let member = app.signup_member("audited").await;
    let token = app.login(&member, "password123").await;
    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "GET",
            &format!("/api/admin/users/{member}/last-activity"),
            None,
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["user_id"], member.as_str());
    assert!(!response.data()["last_signup"].is_null());
    assert!(!response.data()["last_login"].is_null());
    assert!(!response.data()["last_logout"].is_null());
}

#[tokio::test]
async fn test_last_activity_before_any_login() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("earlyauditor").await;
    let admin_token = app.login(&admin, "password123").await;
    let member = app.signup_member("dormant").await;

    let response = app
        .request(
            "GET",
            &format!("/api/admin/users/{member}/last-activity"),
            None,
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.data()["last_signup"].is_null());
    assert!(response.data()["last_login"].is_null());
    assert!(response.data()["last_logout"].is_null());
}
