//! Integration tests for the circulation ledger: checkout, return,
//! eligibility, and the copy-count invariant under concurrency.

mod common;

use http::StatusCode;

use common::TestApp;

#[tokio::test]
async fn test_checkout_decrements_available_copies() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("stocker").await;
    let admin_token = app.login(&admin, "password123").await;
    let book_id = app.add_book(&admin_token, "Fiction", 3).await;

    let member = app.signup_member("borrower").await;
    let token = app.login(&member, "password123").await;

    let response = app
        .request(
            "POST",
            "/api/checkouts",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["book_id"], book_id.as_str());
    assert!(response.data()["return_date"].is_null());

    assert_eq!(app.copies(&book_id).await, (2, 3));
    assert_eq!(app.open_checkout_count(&book_id).await, 1);
}

#[tokio::test]
async fn test_checkout_unknown_book_not_found() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let member = app.signup_member("wanderer").await;
    let token = app.login(&member, "password123").await;

    let response = app
        .request(
            "POST",
            "/api/checkouts",
            Some(serde_json::json!({ "book_id": "no-such-book" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_checkout_conflicts() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("dupstocker").await;
    let admin_token = app.login(&admin, "password123").await;
    let book_id = app.add_book(&admin_token, "Mystery", 3).await;

    let member = app.signup_member("rereader").await;
    let token = app.login(&member, "password123").await;

    let body = serde_json::json!({ "book_id": book_id });
    let first = app
        .request("POST", "/api/checkouts", Some(body.clone()), Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request("POST", "/api/checkouts", Some(body), Some(&token))
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);

    // The failed attempt must not have touched the shelf.
    assert_eq!(app.copies(&book_id).await, (2, 3));
}

#[tokio::test]
async fn test_checkout_with_empty_shelf_conflicts() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("lastcopy").await;
    let admin_token = app.login(&admin, "password123").await;
    let book_id = app.add_book(&admin_token, "Fantasy", 1).await;

    let holder = app.signup_member("holder").await;
    let holder_token = app.login(&holder, "password123").await;
    let response = app
        .request(
            "POST",
            "/api/checkouts",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&holder_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let latecomer = app.signup_member("latecomer").await;
    let latecomer_token = app.login(&latecomer, "password123").await;
    let response = app
        .request(
            "POST",
            "/api/checkouts",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&latecomer_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(app.copies(&book_id).await, (0, 1));
}

#[tokio::test]
async fn test_open_checkout_limit_enforced() {
    let Some(app) = TestApp::with_config(|c| c.circulation.max_open_checkouts = 2).await else {
        return;
    };

    let admin = app.signup_admin("limitstocker").await;
    let admin_token = app.login(&admin, "password123").await;

    let member = app.signup_member("hoarder").await;
    let token = app.login(&member, "password123").await;

    for _ in 0..2 {
        let book_id = app.add_book(&admin_token, "Essays", 1).await;
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

    let over_limit = app.add_book(&admin_token, "Essays", 1).await;
    let response = app
        .request(
            "POST",
            "/api/checkouts",
            Some(serde_json::json!({ "book_id": over_limit })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(app.copies(&over_limit).await, (1, 1));
}

#[tokio::test]
async fn test_checkin_restores_copy_and_closes_checkout() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("returndesk").await;
    let admin_token = app.login(&admin, "password123").await;
    let book_id = app.add_book(&admin_token, "Travel", 2).await;

    let member = app.signup_member("traveler").await;
    let token = app.login(&member, "password123").await;

    let response = app
        .request(
            "POST",
            "/api/checkouts",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.copies(&book_id).await, (1, 2));

    let response = app
        .request(
            "POST",
            "/api/checkouts/return",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let closed = response.data().as_array().expect("closed checkouts");
    assert_eq!(closed.len(), 1);
    assert!(!closed[0]["return_date"].is_null());

    assert_eq!(app.copies(&book_id).await, (2, 2));
    assert_eq!(app.open_checkout_count(&book_id).await, 0);
}

#[tokio::test]
async fn test_checkin_without_open_checkout_not_found() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("idledesk").await;
    let admin_token = app.login(&admin, "password123").await;
    let book_id = app.add_book(&admin_token, "Science", 1).await;

    let member = app.signup_member("innocent").await;
    let token = app.login(&member, "password123").await;

    let response = app
        .request(
            "POST",
            "/api/checkouts/return",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.copies(&book_id).await, (1, 1));
}

#[tokio::test]
async fn test_batch_return_closes_every_book() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("batchdesk").await;
    let admin_token = app.login(&admin, "password123").await;
    let first = app.add_book(&admin_token, "History", 1).await;
    let second = app.add_book(&admin_token, "History", 1).await;

    let member = app.signup_member("batcher").await;
    let token = app.login(&member, "password123").await;

    for book_id in [&first, &second] {
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

    let response = app
        .request(
            "POST",
            "/api/checkouts/return",
            Some(serde_json::json!({ "book_ids": [first, second] })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data().as_array().map(Vec::len), Some(2));
    assert_eq!(app.copies(&first).await, (1, 1));
    assert_eq!(app.copies(&second).await, (1, 1));
}

#[tokio::test]
async fn test_batch_return_is_all_or_nothing() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("strictdesk").await;
    let admin_token = app.login(&admin, "password123").await;
    let book_id = app.add_book(&admin_token, "Biography", 1).await;

    let member = app.signup_member("partial").await;
    let token = app.login(&member, "password123").await;

    let response = app
        .request(
            "POST",
            "/api/checkouts",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // One bad ID poisons the whole batch.
    let response = app
        .request(
            "POST",
            "/api/checkouts/return",
            Some(serde_json::json!({ "book_ids": [book_id, "no-such-book"] })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    // The valid book stays checked out.
    assert_eq!(app.copies(&book_id).await, (0, 1));
    assert_eq!(app.open_checkout_count(&book_id).await, 1);
}

#[tokio::test]
async fn test_copies_are_tracked_per_user() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("shelfkeeper").await;
    let admin_token = app.login(&admin, "password123").await;
    let book_id = app.add_book(&admin_token, "Classics", 5).await;

    let first = app.signup_member("firstout").await;
    let first_token = app.login(&first, "password123").await;
    let second = app.signup_member("secondout").await;
    let second_token = app.login(&second, "password123").await;

    let body = serde_json::json!({ "book_id": book_id });
    app.request("POST", "/api/checkouts", Some(body.clone()), Some(&first_token))
        .await;
    assert_eq!(app.copies(&book_id).await, (4, 5));

    app.request("POST", "/api/checkouts", Some(body.clone()), Some(&second_token))
        .await;
    assert_eq!(app.copies(&book_id).await, (3, 5));

    // Returning one copy leaves the other member's checkout open.
    let response = app
        .request(
            "POST",
            "/api/checkouts/return",
            Some(body),
            Some(&first_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(app.copies(&book_id).await, (4, 5));
    assert_eq!(app.open_checkout_count(&book_id).await, 1);
}

#[tokio::test]
async fn test_concurrent_checkouts_of_last_copy_pick_one_winner() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("racestocker").await;
    let admin_token = app.login(&admin, "password123").await;
    let book_id = app.add_book(&admin_token, "Thriller", 1).await;

    let mut tokens = Vec::new();
    for prefix in ["racer-a", "racer-b", "racer-c"] {
        let user = app.signup_member(prefix).await;
        tokens.push(app.login(&user, "password123").await);
    }

    let body = serde_json::json!({ "book_id": book_id });
    let (a, b, c) = tokio::join!(
        app.request("POST", "/api/checkouts", Some(body.clone()), Some(&tokens[0])),
        app.request("POST", "/api/checkouts", Some(body.clone()), Some(&tokens[1])),
        app.request("POST", "/api/checkouts", Some(body.clone()), Some(&tokens[2])),
    );

    let statuses = [a.status, b.status, c.status];
    let wins = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let losses = statuses
        .iter()
        .filter(|s| **s == StatusCode::CONFLICT)
        .count();

    assert_eq!(wins, 1, "exactly one racer gets the last copy: {statuses:?}");
    assert_eq!(losses, 2, "the others see a conflict: {statuses:?}");
    assert_eq!(app.copies(&book_id).await, (0, 1));
    assert_eq!(app.open_checkout_count(&book_id).await, 1);
}

#[tokio::test]
async fn test_my_checkouts_lists_open_only() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("listdesk").await;
    let admin_token = app.login(&admin, "password123").await;
    let kept = app.add_book(&admin_token, "Poetry", 1).await;
    let returned = app.add_book(&admin_token, "Poetry", 1).await;

    let member = app.signup_member("lister").await;
    let token = app.login(&member, "password123").await;

    for book_id in [&kept, &returned] {
        app.request(
            "POST",
            "/api/checkouts",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&token),
        )
        .await;
    }
    app.request(
        "POST",
        "/api/checkouts/return",
        Some(serde_json::json!({ "book_id": returned })),
        Some(&token),
    )
    .await;

    let response = app.request("GET", "/api/checkouts", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let open = response.data().as_array().expect("open checkouts");
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["book_id"], kept.as_str());
    // History views carry the book's descriptive fields.
    assert_eq!(open[0]["genre"], "Poetry");
}

#[tokio::test]
async fn test_eligibility_reflects_each_rule() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let admin = app.signup_admin("advisor").await;
    let admin_token = app.login(&admin, "password123").await;
    let book_id = app.add_book(&admin_token, "Romance", 2).await;

    let member = app.signup_member("asker").await;
    let token = app.login(&member, "password123").await;

    let response = app
        .request(
            "GET",
            &format!("/api/checkouts/eligibility/{book_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["can_checkout"], true);
    assert_eq!(response.data()["open_count"], 0);
    assert_eq!(response.data()["has_book"], false);
    assert_eq!(response.data()["available_copies"], 2);

    app.request(
        "POST",
        "/api/checkouts",
        Some(serde_json::json!({ "book_id": book_id })),
        Some(&token),
    )
    .await;

    let response = app
        .request(
            "GET",
            &format!("/api/checkouts/eligibility/{book_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["can_checkout"], false);
    assert_eq!(response.data()["has_book"], true);
    assert_eq!(response.data()["available_copies"], 1);
}
