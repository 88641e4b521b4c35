use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Envelope};
use tower::ServiceExt;

const API_KEY: &str = "test-key";

async fn body_envelope(response: axum::response::Response) -> Envelope {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_request(method: &str, query: &str) -> Request<String> {
    Request::builder()
        .uri(format!("/api/1.2.13/{method}?{query}"))
        .body(String::new())
        .unwrap()
}

fn form_request(method: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/1.2.13/{method}"))
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

// --- api key ---

#[tokio::test]
async fn wrong_api_key_is_code_4() {
    let resp = app(API_KEY)
        .oneshot(get_request("listAllPads", "apikey=nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let envelope = body_envelope(resp).await;
    assert_eq!(envelope.code, 4);
    assert_eq!(envelope.message, "no or wrong API Key");
}

#[tokio::test]
async fn missing_api_key_is_code_4() {
    let resp = app(API_KEY)
        .oneshot(form_request("createGroup", ""))
        .await
        .unwrap();

    let envelope = body_envelope(resp).await;
    assert_eq!(envelope.code, 4);
}

#[tokio::test]
async fn check_token_accepts_valid_key() {
    let resp = app(API_KEY)
        .oneshot(get_request("checkToken", "apikey=test-key"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope = body_envelope(resp).await;
    assert_eq!(envelope.code, 0);
    assert!(envelope.data.is_null());
}

// --- dispatch ---

#[tokio::test]
async fn unknown_method_is_code_3() {
    let resp = app(API_KEY)
        .oneshot(get_request("doesNotExist", "apikey=test-key"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let envelope = body_envelope(resp).await;
    assert_eq!(envelope.code, 3);
}

#[tokio::test]
async fn create_group_returns_group_id() {
    let resp = app(API_KEY)
        .oneshot(form_request("createGroup", "apikey=test-key"))
        .await
        .unwrap();

    let envelope = body_envelope(resp).await;
    assert_eq!(envelope.code, 0);
    assert!(envelope.data["groupID"].as_str().unwrap().starts_with("g."));
}

#[tokio::test]
async fn list_pads_of_unknown_group_is_code_1() {
    let resp = app(API_KEY)
        .oneshot(get_request("listPads", "apikey=test-key&groupID=g.missing"))
        .await
        .unwrap();

    let envelope = body_envelope(resp).await;
    assert_eq!(envelope.code, 1);
    assert_eq!(envelope.message, "groupID does not exist");
}

#[tokio::test]
async fn create_pad_then_get_text_on_same_router() {
    let router = app(API_KEY);

    let resp = router
        .clone()
        .oneshot(form_request(
            "createPad",
            "apikey=test-key&padID=notes&text=g%C3%A5+hjem",
        ))
        .await
        .unwrap();
    assert_eq!(body_envelope(resp).await.code, 0);

    let resp = router
        .oneshot(get_request("getText", "apikey=test-key&padID=notes"))
        .await
        .unwrap();
    let envelope = body_envelope(resp).await;
    assert_eq!(envelope.code, 0);
    assert_eq!(envelope.data["text"], "gå hjem\n");
}

#[tokio::test]
async fn create_pad_rejects_group_pad_ids() {
    let resp = app(API_KEY)
        .oneshot(form_request("createPad", "apikey=test-key&padID=g.x%24notes"))
        .await
        .unwrap();

    let envelope = body_envelope(resp).await;
    assert_eq!(envelope.code, 1);
}

#[tokio::test]
async fn revision_changeset_is_a_bare_string() {
    let router = app(API_KEY);
    router
        .clone()
        .oneshot(form_request("createPad", "apikey=test-key&padID=cs&text=hello"))
        .await
        .unwrap();

    let resp = router
        .oneshot(get_request("getRevisionChangeset", "apikey=test-key&padID=cs"))
        .await
        .unwrap();
    let envelope = body_envelope(resp).await;
    assert!(envelope.data.as_str().unwrap().starts_with("Z:"));
}
