//! End-to-end tests for the Twilio voice webhooks.
//!
//! The Groq API is replaced by a wiremock server; requests are driven through
//! the real router with `oneshot`.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::util::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voice_sales_agent::core::agent::{
    FAREWELL, GREETING, NO_INPUT_GOODBYE, REPROMPT_APOLOGY, UPSELL_QUESTION,
};
use voice_sales_agent::core::llm::{
    FALLBACK_REPLY_REQUEST_FAILED, FALLBACK_REPLY_UNEXPECTED_RESPONSE,
};
use voice_sales_agent::core::telephony::twiml::escape_xml;
use voice_sales_agent::{ServerConfig, routes, state::AppState};

const FORM: &str = "application/x-www-form-urlencoded";

fn config_for(groq: &MockServer) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.groq_api_key = Some("gsk_test".to_string());
    config.groq_base_url = groq.uri();
    config
}

fn app_for(config: ServerConfig) -> Router {
    let state: Arc<AppState> = AppState::new(config).expect("state should build");
    routes::create_router(state)
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "llama3-8b-8192",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

async fn post_form(app: Router, uri: &str, body: &str) -> (StatusCode, String, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", FORM)
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_incoming_call_greets_inside_gather() {
    let groq = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&groq)
        .await;

    let (status, content_type, body) = post_form(
        app_for(config_for(&groq)),
        "/incoming-call",
        "CallSid=CA100&From=%2B15017122661&To=%2B15558675310&CallStatus=in-progress",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/xml");
    assert!(body.starts_with("<?xml"));

    let gather = body.find(r#"<Gather input="speech" action="/gather""#).unwrap();
    let greeting = body.find(escape_xml(GREETING).as_ref()).unwrap();
    let gather_end = body.find("</Gather>").unwrap();
    let goodbye = body.find(escape_xml(NO_INPUT_GOODBYE).as_ref()).unwrap();
    assert!(gather < greeting && greeting < gather_end && gather_end < goodbye);
    assert!(body.contains(r#"timeout="3""#));
    assert!(body.contains(r#"voice="Polly.Matthew""#));
    assert!(!body.contains("<Hangup/>"));
}

#[tokio::test]
async fn test_incoming_call_tolerates_empty_body() {
    let groq = MockServer::start().await;
    let app = app_for(config_for(&groq));

    let request = Request::builder()
        .method("POST")
        .uri("/incoming-call")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains(escape_xml(GREETING).as_ref()));
}

#[tokio::test]
async fn test_question_is_answered_by_llm() {
    let groq = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_partial_json(json!({
            "model": "llama3-8b-8192",
            "messages": [
                { "role": "system" },
                { "role": "user", "content": "Tell me about health insurance" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Our health plan covers hospital stays and checkups.",
        )))
        .expect(1)
        .mount(&groq)
        .await;

    let (status, content_type, body) = post_form(
        app_for(config_for(&groq)),
        "/gather",
        "CallSid=CA100&SpeechResult=Tell+me+about+health+insurance&Confidence=0.92",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/xml");
    assert!(body.contains(&format!(
        r#"Our health plan covers hospital stays and checkups. <break time="500ms"/> {UPSELL_QUESTION}"#
    )));
    assert!(body.contains(r#"<Gather input="speech" action="/gather" method="POST" timeout="3""#));
    assert!(!body.contains("<Hangup/>"));
}

#[tokio::test]
async fn test_unparsable_confidence_keeps_speech() {
    let groq = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{ "role": "system" }, { "content": "Tell me about health insurance" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Health cover is cheap.")))
        .expect(2)
        .mount(&groq)
        .await;

    let app = app_for(config_for(&groq));
    for confidence in ["", "not-a-number"] {
        let (status, _, body) = post_form(
            app.clone(),
            "/gather",
            &format!("SpeechResult=Tell+me+about+health+insurance&Confidence={confidence}"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Health cover is cheap."), "{confidence:?}");
        assert!(!body.contains(escape_xml(REPROMPT_APOLOGY).as_ref()));
    }
}

#[tokio::test]
async fn test_hangup_keyword_skips_llm() {
    let groq = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&groq)
        .await;

    let app = app_for(config_for(&groq));
    for utterance in ["No+thanks", "I%27m+NOT+INTERESTED", "Please+stop+calling", "ok+bye"] {
        let (status, _, body) =
            post_form(app.clone(), "/gather", &format!("SpeechResult={utterance}")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(escape_xml(FAREWELL).as_ref()), "{utterance}");
        assert!(body.ends_with("<Hangup/></Response>"), "{utterance}");
        assert!(!body.contains("<Gather"), "{utterance}");
    }
}

#[tokio::test]
async fn test_silence_reprompts_without_llm() {
    let groq = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&groq)
        .await;

    let app = app_for(config_for(&groq));

    let (_, _, body) = post_form(app.clone(), "/gather", "CallSid=CA100").await;
    assert!(body.contains(escape_xml(REPROMPT_APOLOGY).as_ref()));
    assert!(body.contains(r#"action="/gather?silent=1""#));
    assert!(!body.contains("<Hangup/>"));

    let (_, _, body) = post_form(app.clone(), "/gather?silent=1", "SpeechResult=+++").await;
    assert!(body.contains(r#"action="/gather?silent=2""#));

    let (_, _, body) = post_form(app.clone(), "/gather?silent=2", "SpeechResult=").await;
    assert!(body.contains(r#"action="/gather?silent=3""#));

    let (status, _, body) = post_form(app, "/gather?silent=3", "SpeechResult=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(escape_xml(NO_INPUT_GOODBYE).as_ref()));
    assert!(body.ends_with("<Hangup/></Response>"));
}

#[tokio::test]
async fn test_speech_resets_silent_count() {
    let groq = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Car cover starts low.")))
        .mount(&groq)
        .await;

    let (_, _, body) = post_form(
        app_for(config_for(&groq)),
        "/gather?silent=2",
        "SpeechResult=What+about+car+insurance",
    )
    .await;

    assert!(body.contains("Car cover starts low."));
    assert!(body.contains(r#"action="/gather""#));
    assert!(!body.contains("silent="));
}

#[tokio::test]
async fn test_malformed_silent_param_is_treated_as_zero() {
    let groq = MockServer::start().await;
    let (status, _, body) = post_form(
        app_for(config_for(&groq)),
        "/gather?silent=lots",
        "SpeechResult=",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"action="/gather?silent=1""#));
}

#[tokio::test]
async fn test_llm_error_status_uses_fallback() {
    let groq = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "upstream exploded", "type": "server_error" }
        })))
        .mount(&groq)
        .await;

    let (status, _, body) = post_form(
        app_for(config_for(&groq)),
        "/gather",
        "SpeechResult=Do+you+cover+pre-existing+conditions",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(escape_xml(FALLBACK_REPLY_UNEXPECTED_RESPONSE).as_ref()));
    assert!(body.contains(UPSELL_QUESTION));
    assert!(body.contains("<Gather"));
}

#[tokio::test]
async fn test_llm_garbage_body_uses_fallback() {
    let groq = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&groq)
        .await;

    let (_, _, body) = post_form(
        app_for(config_for(&groq)),
        "/gather",
        "SpeechResult=How+much+is+life+cover",
    )
    .await;

    assert!(body.contains(escape_xml(FALLBACK_REPLY_REQUEST_FAILED).as_ref()));
}

#[tokio::test]
async fn test_long_reply_is_truncated() {
    let groq = MockServer::start().await;
    let long_reply = "a".repeat(650);
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&long_reply)))
        .mount(&groq)
        .await;

    let (_, _, body) = post_form(
        app_for(config_for(&groq)),
        "/gather",
        "SpeechResult=Tell+me+everything",
    )
    .await;

    let expected = format!("{}... <break", "a".repeat(400));
    assert!(body.contains(&expected));
    assert!(!body.contains(&"a".repeat(401)));
}

#[tokio::test]
async fn test_reply_markup_is_escaped() {
    let groq = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Life & health <bundle> deal")),
        )
        .mount(&groq)
        .await;

    let (_, _, body) = post_form(
        app_for(config_for(&groq)),
        "/gather",
        "SpeechResult=Any+bundles",
    )
    .await;

    assert!(body.contains("Life &amp; health &lt;bundle&gt; deal"));
    assert!(!body.contains("<bundle>"));
}

#[tokio::test]
async fn test_custom_voice_and_timeout() {
    let groq = MockServer::start().await;
    let mut config = config_for(&groq);
    config.voice_name = "Polly.Joanna".to_string();
    config.gather_timeout_seconds = 5;

    let (_, _, body) = post_form(app_for(config), "/incoming-call", "").await;

    assert!(body.contains(r#"voice="Polly.Joanna""#));
    assert!(body.contains(r#"timeout="5""#));
}
