use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use super::*;
use crate::core::llm::{FALLBACK_REPLY_REQUEST_FAILED, ReplyComposer};
use crate::core::telephony::{CallOriginator, OutboundCall, TelephonyError};

/// Composer returning a canned reply and recording every prompt.
struct RecordingComposer {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingComposer {
    fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyComposer for RecordingComposer {
    async fn compose_reply(&self, prompt: &str) -> String {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

struct FixedOriginator {
    result: Result<String, TelephonyError>,
    calls: Mutex<Vec<OutboundCall>>,
}

#[async_trait]
impl CallOriginator for FixedOriginator {
    async fn originate_call(&self, call: &OutboundCall) -> Result<String, TelephonyError> {
        self.calls.lock().unwrap().push(call.clone());
        self.result.clone()
    }
}

fn agent_with(composer: Arc<RecordingComposer>) -> CallAgent {
    CallAgent::new(AgentSettings::default(), composer, None)
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn test_incoming_call_greets_inside_gather() {
    let agent = agent_with(RecordingComposer::new("unused"));
    let twiml = agent.incoming_call();

    assert!(twiml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#));
    assert!(twiml.contains(
        r#"<Gather input="speech" action="/gather" method="POST" timeout="3" speechTimeout="auto">"#
    ));
    let greeting = twiml.find("Hello! This is John from SecureLife Insurance.").unwrap();
    let gather_end = twiml.find("</Gather>").unwrap();
    let goodbye = twiml.find("Hmm, I didn&apos;t hear anything.").unwrap();
    assert!(greeting < gather_end);
    assert!(gather_end < goodbye);
    assert!(twiml.contains(r#"<prosody pitch="-5%" rate="medium">"#));
    assert!(!twiml.contains("<Hangup/>"));
}

#[tokio::test]
async fn test_reply_turn_calls_composer_once() {
    let composer = RecordingComposer::new("Health plans start at ten dollars a month.");
    let agent = agent_with(composer.clone());

    let response = agent
        .gather_turn("Tell me about health insurance", 0)
        .await;

    assert_eq!(composer.prompts(), vec!["Tell me about health insurance"]);
    assert_eq!(response.outcome, TurnOutcome::Reply);
    assert_eq!(
        response.spoken,
        "Health plans start at ten dollars a month. Would you like me to send you a quote?"
    );
    assert!(response.twiml.contains(
        r#"Health plans start at ten dollars a month. <break time="500ms"/> Would you like me to send you a quote?"#
    ));
    assert_eq!(count(&response.twiml, "<Gather"), 1);
    assert!(response.twiml.contains(r#"action="/gather" method="POST" timeout="3""#));
    assert!(!response.twiml.contains("<Hangup/>"));
}

#[tokio::test]
async fn test_keyword_turn_hangs_up_without_composer() {
    let composer = RecordingComposer::new("unused");
    let agent = agent_with(composer.clone());

    for speech in ["No thanks", "I'm NOT INTERESTED", "stop", "Bye!", "EXIT"] {
        let response = agent.gather_turn(speech, 0).await;
        assert_eq!(response.outcome, TurnOutcome::Farewell);
        assert!(response.outcome.ends_call());
        assert!(response.twiml.contains("<Hangup/>"));
        assert!(!response.twiml.contains("<Gather"));
        assert_eq!(response.spoken, FAREWELL);
    }
    assert!(composer.prompts().is_empty());
}

#[tokio::test]
async fn test_empty_turn_reprompts_without_composer() {
    let composer = RecordingComposer::new("unused");
    let agent = agent_with(composer.clone());

    for speech in ["", "   "] {
        let response = agent.gather_turn(speech, 0).await;
        assert_eq!(response.outcome, TurnOutcome::Reprompt);
        assert_eq!(response.spoken, REPROMPT_APOLOGY);
        assert!(response.twiml.contains("Sorry, I didn&apos;t catch that."));
        assert!(response.twiml.contains("Go ahead, I&apos;m listening."));
        assert!(response.twiml.contains(r#"action="/gather?silent=1""#));
        assert!(!response.twiml.contains("<Hangup/>"));

        let apology = response.twiml.find("Sorry").unwrap();
        let gather = response.twiml.find("<Gather").unwrap();
        assert!(apology < gather);
    }
    assert!(composer.prompts().is_empty());
}

#[tokio::test]
async fn test_silent_turns_are_bounded() {
    let agent = agent_with(RecordingComposer::new("unused"));

    for silent in 0..DEFAULT_MAX_SILENT_REPROMPTS {
        let response = agent.gather_turn("", silent).await;
        assert_eq!(response.outcome, TurnOutcome::Reprompt);
        assert!(
            response
                .twiml
                .contains(&format!(r#"action="/gather?silent={}""#, silent + 1))
        );
    }

    let response = agent.gather_turn("", DEFAULT_MAX_SILENT_REPROMPTS).await;
    assert_eq!(response.outcome, TurnOutcome::SilenceLimit);
    assert_eq!(response.spoken, NO_INPUT_GOODBYE);
    assert!(response.twiml.contains("<Hangup/>"));
    assert!(!response.twiml.contains("<Gather"));
}

#[tokio::test]
async fn test_reply_resets_silent_count() {
    let agent = agent_with(RecordingComposer::new("Sure."));
    let response = agent.gather_turn("What about car cover?", 2).await;
    assert!(response.twiml.contains(r#"action="/gather""#));
    assert!(!response.twiml.contains("silent="));
}

#[tokio::test]
async fn test_long_reply_is_truncated() {
    let agent = agent_with(RecordingComposer::new("x".repeat(1000)));
    let response = agent.gather_turn("Tell me everything", 0).await;

    let reply = response
        .spoken
        .strip_suffix(&format!(" {UPSELL_QUESTION}"))
        .unwrap();
    assert_eq!(reply.chars().count(), 403);
    assert!(reply.ends_with("..."));
}

#[tokio::test]
async fn test_reply_markup_is_escaped() {
    let agent = agent_with(RecordingComposer::new("Life & health <cheap>"));
    let response = agent.gather_turn("prices?", 0).await;
    assert!(response.twiml.contains("Life &amp; health &lt;cheap&gt;"));
    assert!(response.spoken.starts_with("Life & health <cheap>"));
}

#[tokio::test]
async fn test_fallback_reply_is_spoken() {
    let agent = agent_with(RecordingComposer::new(FALLBACK_REPLY_REQUEST_FAILED));
    let response = agent.gather_turn("health", 0).await;
    assert_eq!(
        response.spoken,
        format!("{FALLBACK_REPLY_REQUEST_FAILED} {UPSELL_QUESTION}")
    );
    assert!(response.twiml.contains("<Gather"));
}

#[tokio::test]
async fn test_custom_settings_flow_into_markup() {
    let settings = AgentSettings {
        style: VoiceStyle {
            voice: "Polly.Joanna".to_string(),
            language: "en-GB".to_string(),
            ..VoiceStyle::default()
        },
        gather_timeout_secs: 5,
        max_silent_reprompts: 0,
    };
    let agent = CallAgent::new(settings, RecordingComposer::new("ok"), None);

    assert!(
        agent
            .incoming_call()
            .contains(r#"<Say voice="Polly.Joanna" language="en-GB">"#)
    );
    assert!(agent.incoming_call().contains(r#"timeout="5""#));

    let response = agent.gather_turn("", 0).await;
    assert_eq!(response.outcome, TurnOutcome::SilenceLimit);
}

#[tokio::test]
async fn test_initiate_call_without_originator() {
    let agent = agent_with(RecordingComposer::new("unused"));
    assert!(!agent.can_originate());

    let err = agent
        .initiate_call("+15558675310", "+15017122661", "https://agent.example.com/incoming-call")
        .await
        .unwrap_err();
    assert!(matches!(err, TelephonyError::NotConfigured(_)));
}

#[tokio::test]
async fn test_initiate_call_forwards_parameters() {
    let originator = Arc::new(FixedOriginator {
        result: Ok("CA42".to_string()),
        calls: Mutex::new(Vec::new()),
    });
    let agent = CallAgent::new(
        AgentSettings::default(),
        RecordingComposer::new("unused"),
        Some(originator.clone() as Arc<dyn CallOriginator>),
    );

    let sid = agent
        .initiate_call("+15558675310", "+15017122661", "https://agent.example.com/incoming-call")
        .await
        .unwrap();

    assert_eq!(sid, "CA42");
    let calls = originator.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].to, "+15558675310");
    assert_eq!(calls[0].from, "+15017122661");
    assert_eq!(calls[0].callback_url, "https://agent.example.com/incoming-call");
}

#[tokio::test]
async fn test_initiate_call_propagates_provider_error() {
    let error = TelephonyError::Api {
        status: 401,
        code: Some(20003),
        message: "Authenticate".to_string(),
    };
    let originator = Arc::new(FixedOriginator {
        result: Err(error.clone()),
        calls: Mutex::new(Vec::new()),
    });
    let agent = CallAgent::new(
        AgentSettings::default(),
        RecordingComposer::new("unused"),
        Some(originator as Arc<dyn CallOriginator>),
    );

    let err = agent
        .initiate_call("+15558675310", "+15017122661", "https://agent.example.com/incoming-call")
        .await
        .unwrap_err();
    assert_eq!(err, error);
}

#[test]
fn test_gather_action() {
    assert_eq!(gather_action(0), "/gather");
    assert_eq!(gather_action(2), "/gather?silent=2");
}
