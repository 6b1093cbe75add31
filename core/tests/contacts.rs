mod support;

use actix_web::{http::StatusCode, test};
use db::UserStore;
use serde_json::{Value, json};
use support::*;

fn jane() -> Value {
    json!({ "name": "Jane Doe", "email": "jane@example.com", "phone": "555-0100" })
}

async fn create<S>(app: &S, token: Option<&str>, payload: Value) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
            Error = actix_web::Error,
        >,
{
    let mut req = test::TestRequest::post().uri("/api/contacts").set_json(payload);
    if let Some(token) = token {
        req = req.insert_header(bearer(token));
    }
    send(app, req.to_request()).await
}

#[actix_web::test]
async fn listing_requires_authentication() {
    let env = TestEnv::new();
    let app = init_app(&env).await;

    let req = test::TestRequest::get().uri("/api/contacts").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized");

    let token = signup_and_login(&app, "owner@example.com").await;
    let req = test::TestRequest::get()
        .uri("/api/contacts")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn create_records_owner_when_authenticated() {
    let env = TestEnv::new();
    let app = init_app(&env).await;
    let token = signup_and_login(&app, "owner@example.com").await;
    let owner = env
        .state
        .store
        .get_user_by_email("owner@example.com")
        .await
        .unwrap()
        .unwrap();

    let (status, anonymous) = create(&app, None, jane()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(anonymous["owner"], Value::Null);
    assert_eq!(anonymous["favorite"], false);
    assert_eq!(anonymous["name"], "Jane Doe");

    let (status, owned) = create(&app, Some(&token), jane()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(owned["owner"], owner.id.to_string());
    assert_ne!(owned["id"], anonymous["id"]);

    let (status, _) = create(&app, Some("not-a-token"), jane()).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_web::test]
async fn create_validation_never_touches_the_store() {
    let env = TestEnv::new();
    let app = init_app(&env).await;
    let token = signup_and_login(&app, "owner@example.com").await;

    for payload in [
        json!({ "name": "Jane", "email": "jane@example.com", "phone": "1", "nickname": "J" }),
        json!({ "name": "Jane99", "email": "jane@example.com", "phone": "1" }),
        json!({ "name": "Jane", "email": "nope", "phone": "1" }),
        json!({ "name": "Jane", "email": "jane@example.com" }),
        json!({ "name": "Jane", "email": "jane@example.com", "phone": "" }),
    ] {
        let (status, body) = create(&app, None, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    let req = test::TestRequest::get()
        .uri("/api/contacts")
        .insert_header(bearer(&token))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn get_by_id() {
    let env = TestEnv::new();
    let app = init_app(&env).await;
    let (_, created) = create(&app, None, jane()).await;

    let uri = format!("/api/contacts/{}", created["id"].as_str().unwrap());
    let (status, body) = send(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    for uri in [
        "/api/contacts/6f1c1f8e-8d2b-4a8e-9a57-3f0b5c2d1e00",
        "/api/contacts/not-a-uuid",
    ] {
        let (status, body) = send(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Not found");
    }
}

#[actix_web::test]
async fn update_merges_only_given_fields() {
    let env = TestEnv::new();
    let app = init_app(&env).await;
    let (_, created) = create(&app, None, jane()).await;
    let uri = format!("/api/contacts/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "phone": "555-0199" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], "555-0199");
    assert_eq!(body["name"], created["name"]);
    assert_eq!(body["email"], created["email"]);

    let req = test::TestRequest::put().uri(&uri).set_json(json!({})).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "missing fields");

    for payload in [
        json!({ "nickname": "JD" }),
        json!({ "name": "J4ne" }),
        json!({ "favorite": true }),
    ] {
        let req = test::TestRequest::put().uri(&uri).set_json(payload).to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, before) = send(&app, test::TestRequest::get().uri(&uri).to_request()).await;

    let req = test::TestRequest::put()
        .uri("/api/contacts/6f1c1f8e-8d2b-4a8e-9a57-3f0b5c2d1e00")
        .set_json(json!({ "phone": "1" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");

    let (_, after) = send(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(after, before);
    assert_eq!(after["phone"], "555-0199");
}

#[actix_web::test]
async fn delete_then_gone() {
    let env = TestEnv::new();
    let app = init_app(&env).await;
    let (_, created) = create(&app, None, jane()).await;
    let uri = format!("/api/contacts/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "contact deleted" }));

    let (status, _) = send(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn favorite_sets_or_flips() {
    let env = TestEnv::new();
    let app = init_app(&env).await;
    let (_, created) = create(&app, None, jane()).await;
    let uri = format!("/api/contacts/{}/favorite", created["id"].as_str().unwrap());

    let patch = |payload: Value| {
        test::TestRequest::patch()
            .uri(&uri)
            .set_json(payload)
            .to_request()
    };

    let (status, body) = send(&app, patch(json!({ "favorite": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["favorite"], true);

    let (_, body) = send(&app, patch(json!({ "favorite": true }))).await;
    assert_eq!(body["favorite"], true);

    let (_, body) = send(&app, patch(json!({}))).await;
    assert_eq!(body["favorite"], false);

    let (status, _) = send(&app, patch(json!({ "favorite": true, "name": "X" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, patch(json!({ "favorite": "yes" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri("/api/contacts/6f1c1f8e-8d2b-4a8e-9a57-3f0b5c2d1e00/favorite")
        .set_json(json!({}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_filters_and_paginates() {
    let env = TestEnv::new();
    let app = init_app(&env).await;
    let token = signup_and_login(&app, "owner@example.com").await;

    for i in 0..5 {
        let mut payload = jane();
        payload["favorite"] = json!(i % 2 == 0);
        create(&app, None, payload).await;
    }

    let list = |query: &str| {
        test::TestRequest::get()
            .uri(&format!("/api/contacts{}", query))
            .insert_header(bearer(&token))
            .to_request()
    };

    let (_, all) = send(&app, list("")).await;
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (_, favorites) = send(&app, list("?favorite=true")).await;
    let favorites = favorites.as_array().unwrap();
    assert_eq!(favorites.len(), 3);
    assert!(favorites.iter().all(|c| c["favorite"] == true));

    let (_, page) = send(&app, list("?page=2&limit=2")).await;
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["id"], all[2]["id"]);

    let (status, body) = send(&app, list("?favorite=maybe")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn unknown_route_answers_with_message() {
    let env = TestEnv::new();
    let app = init_app(&env).await;

    let (status, body) =
        send(&app, test::TestRequest::get().uri("/api/nothing-here").to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not found" }));
}
