//! The sales call agent.
//!
//! [`CallAgent`] turns Twilio webhooks into TwiML. It holds no per-call
//! state: the only thing carried between turns is the consecutive silent
//! turn count, which travels in the gather action URL
//! (`/gather?silent=N`).
//!
//! ```text
//! Greeting -> AwaitingSpeech -> Silent    -> AwaitingSpeech (or Ended at the bound)
//!                            -> Declined  -> Ended
//!                            -> Responding -> AwaitingSpeech
//! ```

pub mod script;
mod turn;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, info};

use crate::core::llm::ReplyComposer;
use crate::core::telephony::{
    CallOriginator, Gather, OutboundCall, Speech, TelephonyError, TwimlBuilder, VoiceStyle,
};

pub use script::{
    FAREWELL, GATHER_ACTION_PATH, GREETING, HANGUP_KEYWORDS, INCOMING_CALL_PATH, MAX_REPLY_CHARS,
    NO_INPUT_GOODBYE, REPLY_PAUSE_MS, REPROMPT_APOLOGY, REPROMPT_LISTENING, SILENT_QUERY_PARAM,
    UPSELL_QUESTION,
};
pub use turn::{TurnAction, classify_turn, contains_hangup_keyword, truncate_reply};

/// Default seconds Twilio waits for the caller to start speaking.
pub const DEFAULT_GATHER_TIMEOUT_SECS: u32 = 3;

/// Default number of consecutive silent turns re-prompted before hanging up.
pub const DEFAULT_MAX_SILENT_REPROMPTS: u32 = 3;

/// Voice and pacing for a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub style: VoiceStyle,
    pub gather_timeout_secs: u32,
    pub max_silent_reprompts: u32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            style: VoiceStyle::default(),
            gather_timeout_secs: DEFAULT_GATHER_TIMEOUT_SECS,
            max_silent_reprompts: DEFAULT_MAX_SILENT_REPROMPTS,
        }
    }
}

/// How a gather turn was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Silence; the caller is asked to repeat.
    Reprompt,
    /// Too many silent turns in a row; the call ends.
    SilenceLimit,
    /// A hang-up keyword; the call ends.
    Farewell,
    /// A composed reply; the conversation continues.
    Reply,
}

impl TurnOutcome {
    /// Whether the TwiML ends the call.
    pub fn ends_call(&self) -> bool {
        matches!(self, Self::SilenceLimit | Self::Farewell)
    }
}

/// Result of [`CallAgent::gather_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResponse {
    pub outcome: TurnOutcome,
    /// TwiML document for Twilio.
    pub twiml: String,
    /// Words spoken outside any gather, without markup.
    pub spoken: String,
}

/// Stateless webhook handler for one outbound sales campaign.
#[derive(Clone)]
pub struct CallAgent {
    settings: AgentSettings,
    composer: Arc<dyn ReplyComposer>,
    originator: Option<Arc<dyn CallOriginator>>,
}

impl std::fmt::Debug for CallAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallAgent")
            .field("settings", &self.settings)
            .field("originator", &self.originator.is_some())
            .finish_non_exhaustive()
    }
}

impl CallAgent {
    /// Create an agent. Without an originator, [`CallAgent::initiate_call`]
    /// fails with [`TelephonyError::NotConfigured`].
    pub fn new(
        settings: AgentSettings,
        composer: Arc<dyn ReplyComposer>,
        originator: Option<Arc<dyn CallOriginator>>,
    ) -> Self {
        Self {
            settings,
            composer,
            originator,
        }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn can_originate(&self) -> bool {
        self.originator.is_some()
    }

    /// Ask Twilio to dial `to` from `from`; `callback_url` serves the greeting once answered.
    ///
    /// Returns the call SID.
    pub async fn initiate_call(
        &self,
        to: &str,
        from: &str,
        callback_url: &str,
    ) -> Result<String, TelephonyError> {
        let originator = self.originator.as_ref().ok_or_else(|| {
            TelephonyError::NotConfigured("Twilio credentials are not set".to_string())
        })?;

        let call = OutboundCall {
            to: to.to_string(),
            from: from.to_string(),
            callback_url: callback_url.to_string(),
        };
        let sid = originator.originate_call(&call).await?;
        info!(call_sid = %sid, to = %to, "Call initiated");
        Ok(sid)
    }

    /// Greeting TwiML served when the callee answers.
    ///
    /// The greeting plays inside a speech gather; if the gather hears nothing,
    /// Twilio falls through to the goodbye and the call ends.
    pub fn incoming_call(&self) -> String {
        TwimlBuilder::new(self.settings.style.clone())
            .gather(self.gather(0).with_prompt(Speech::text(GREETING)))
            .say(Speech::text(NO_INPUT_GOODBYE))
            .build()
    }

    /// Respond to one gather result.
    ///
    /// `silent` is the number of consecutive silent turns before this one.
    pub async fn gather_turn(&self, speech: &str, silent: u32) -> TurnResponse {
        match classify_turn(speech) {
            TurnAction::Silent if silent >= self.settings.max_silent_reprompts => {
                info!(silent, "Silent re-prompt limit reached, hanging up");
                self.ending(TurnOutcome::SilenceLimit, NO_INPUT_GOODBYE)
            }
            TurnAction::Silent => {
                debug!(silent, "No speech captured, re-prompting");
                let twiml = TwimlBuilder::new(self.settings.style.clone())
                    .say(Speech::text(REPROMPT_APOLOGY))
                    .gather(
                        self.gather(silent.saturating_add(1))
                            .with_prompt(Speech::text(REPROMPT_LISTENING)),
                    )
                    .build();
                TurnResponse {
                    outcome: TurnOutcome::Reprompt,
                    twiml,
                    spoken: REPROMPT_APOLOGY.to_string(),
                }
            }
            TurnAction::Decline => {
                info!("Caller declined, ending call");
                self.ending(TurnOutcome::Farewell, FAREWELL)
            }
            TurnAction::Respond(prompt) => {
                let reply = truncate_reply(&self.composer.compose_reply(prompt).await);
                let speech = Speech::text(reply)
                    .then_break(REPLY_PAUSE_MS)
                    .then_text(UPSELL_QUESTION);
                let spoken = speech.plain_text();
                let twiml = TwimlBuilder::new(self.settings.style.clone())
                    .say(speech)
                    .gather(self.gather(0))
                    .build();
                TurnResponse {
                    outcome: TurnOutcome::Reply,
                    twiml,
                    spoken,
                }
            }
        }
    }

    fn ending(&self, outcome: TurnOutcome, line: &str) -> TurnResponse {
        let twiml = TwimlBuilder::new(self.settings.style.clone())
            .say(Speech::text(line))
            .hangup()
            .build();
        TurnResponse {
            outcome,
            twiml,
            spoken: line.to_string(),
        }
    }

    fn gather(&self, silent: u32) -> Gather {
        Gather::speech(gather_action(silent), self.settings.gather_timeout_secs)
    }
}

/// Gather action URL carrying the silent-turn count.
pub fn gather_action(silent: u32) -> String {
    if silent == 0 {
        GATHER_ACTION_PATH.to_string()
    } else {
        format!("{GATHER_ACTION_PATH}?{SILENT_QUERY_PARAM}={silent}")
    }
}
