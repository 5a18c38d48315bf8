pub mod agent;
pub mod llm;
pub mod telephony;

// Re-export commonly used types for convenience
pub use agent::{AgentSettings, CallAgent, TurnOutcome, TurnResponse};

pub use llm::{GroqChat, GroqChatConfig, LLMError, ReplyComposer};

pub use telephony::{
    CallOriginator, OutboundCall, TelephonyError, TwilioClient, TwilioConfig, TwimlResponse,
    VoiceStyle, VoiceWebhook,
};
