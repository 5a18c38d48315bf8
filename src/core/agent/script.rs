//! Fixed lines spoken by the agent.

/// Opening line inside the first speech gather.
pub const GREETING: &str = "Hello! This is John from SecureLife Insurance. We’re offering affordable plans for life, health, and vehicle coverage. Can I quickly tell you about one of our popular plans?";

/// Spoken when the caller never answers, then the call ends.
pub const NO_INPUT_GOODBYE: &str =
    "Hmm, I didn't hear anything. Call us anytime at SecureLife. Goodbye!";

pub const REPROMPT_APOLOGY: &str = "Sorry, I didn't catch that. Could you repeat, please?";

/// Prompt inside the gather re-opened after [`REPROMPT_APOLOGY`].
pub const REPROMPT_LISTENING: &str = "Go ahead, I'm listening.";

pub const FAREWELL: &str = "No worries! Thank you for your time. Stay safe and have a great day!";

/// Appended to every composed reply.
pub const UPSELL_QUESTION: &str = "Would you like me to send you a quote?";

/// Case-insensitive substrings that end the call.
pub const HANGUP_KEYWORDS: [&str; 5] = ["no", "not interested", "stop", "bye", "exit"];

/// Longest reply spoken verbatim, in characters.
pub const MAX_REPLY_CHARS: usize = 400;

/// Suffix marking a truncated reply.
pub const ELLIPSIS: &str = "...";

/// Pause between the reply and the upsell question.
pub const REPLY_PAUSE_MS: u32 = 500;

/// Webhook path Twilio requests once an outbound call is answered.
pub const INCOMING_CALL_PATH: &str = "/incoming-call";

/// Webhook path Twilio posts gather results to.
pub const GATHER_ACTION_PATH: &str = "/gather";

/// Query parameter carrying the consecutive silent-turn count.
pub const SILENT_QUERY_PARAM: &str = "silent";
