//! SlackClient against a mock Web API

use serde_json::json;
use slack_relay::slack::{
    DeleteMessage, PostMessage, ScheduleMessage, SlackApi, SlackClient, SlackError, UpdateMessage,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> SlackClient {
    SlackClient::new(server.uri()).expect("client builds")
}

#[tokio::test]
async fn test_post_message_sends_bearer_and_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .and(header("authorization", "Bearer xoxb-1"))
        .and(body_json(json!({ "channel": "C1", "text": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "ts": "1.2" })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .await
        .post_message(
            "xoxb-1",
            PostMessage {
                channel: "C1".to_string(),
                text: Some(json!("hello")),
            },
        )
        .await
        .unwrap();

    assert_eq!(response, json!({ "ok": true, "ts": "1.2" }));
}

#[tokio::test]
async fn test_ok_false_is_relayed_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.delete"))
        .and(body_json(json!({ "channel": "C1", "ts": "9.9" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ok": false, "error": "message_not_found" })),
        )
        .mount(&server)
        .await;

    let response = client_for(&server)
        .await
        .delete_message(
            "",
            DeleteMessage {
                channel: "C1".to_string(),
                ts: Some(json!("9.9")),
            },
        )
        .await
        .unwrap();

    assert_eq!(response["error"], "message_not_found");
}

#[tokio::test]
async fn test_schedule_and_update_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.scheduleMessage"))
        .and(body_json(
            json!({ "channel": "C1", "text": "later", "post_at": 1_900_000_000 }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat.update"))
        .and(body_json(json!({ "channel": "C1", "ts": "1.2", "text": "fixed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .schedule_message(
            "t",
            ScheduleMessage {
                channel: "C1".to_string(),
                text: Some(json!("later")),
                post_at: Some(json!(1_900_000_000)),
            },
        )
        .await
        .unwrap();
    client
        .update_message(
            "t",
            UpdateMessage {
                channel: "C1".to_string(),
                ts: Some(json!("1.2")),
                text: Some(json!("fixed")),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_history_uses_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations.history"))
        .and(query_param("channel", "C1"))
        .and(query_param("limit", "5"))
        .and(header("authorization", "Bearer t"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "messages": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .await
        .conversation_history("t", "C1", 5)
        .await
        .unwrap();

    assert_eq!(response["messages"], json!([]));
}

#[tokio::test]
async fn test_oauth_access_passes_credentials_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth.v2.access"))
        .and(query_param("code", "abc"))
        .and(query_param("client_id", "123.456"))
        .and(query_param("client_secret", "shh"))
        .and(query_param("redirect_uri", "http://localhost:3000/slack/callback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "access_token": "xoxb-new",
            "token_type": "bot",
            "team": { "id": "T1", "name": "Acme" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .await
        .oauth_access("abc", "123.456", "shh", "http://localhost:3000/slack/callback")
        .await
        .unwrap();

    assert!(response.ok);
    assert_eq!(response.access_token.as_deref(), Some("xoxb-new"));
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .post_message(
            "t",
            PostMessage {
                channel: "C1".to_string(),
                text: None,
            },
        )
        .await
        .unwrap_err();

    match &err {
        SlackError::Status { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(err.to_string(), "Request failed with status code 500");
}

#[tokio::test]
async fn test_non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations.history"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .conversation_history("t", "C1", 5)
        .await
        .unwrap_err();

    assert!(matches!(err, SlackError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_a_request_error() {
    // Nothing listens on port 1
    let client = SlackClient::new("http://127.0.0.1:1").unwrap();
    let err = client
        .post_message(
            "t",
            PostMessage {
                channel: "C1".to_string(),
                text: Some(json!("hi")),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SlackError::Request(_)));
}
