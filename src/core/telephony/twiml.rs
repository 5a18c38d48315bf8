//! TwiML rendering.
//!
//! The agent only needs four verbs: `<Say>` with SSML prosody and breaks,
//! speech `<Gather>`, and `<Hangup>`. Every spoken string is wrapped in
//! `<prosody>` so the whole call keeps one calm, steady voice.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Response>
//!   <Gather input="speech" action="/gather" method="POST" timeout="3" speechTimeout="auto">
//!     <Say voice="Polly.Matthew" language="en-US"><prosody pitch="-5%" rate="medium">Hello!</prosody></Say>
//!   </Gather>
//! </Response>
//! ```

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use std::borrow::Cow;
use std::fmt::Write;

/// Media type Twilio expects for TwiML.
pub const TWIML_CONTENT_TYPE: &str = "application/xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Voice and prosody applied to every `<Say>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceStyle {
    /// Twilio voice, e.g. `Polly.Matthew`.
    pub voice: String,
    /// BCP-47 language tag.
    pub language: String,
    /// SSML prosody pitch.
    pub pitch: String,
    /// SSML prosody rate.
    pub rate: String,
}

impl Default for VoiceStyle {
    fn default() -> Self {
        Self {
            voice: "Polly.Matthew".to_string(),
            language: "en-US".to_string(),
            pitch: "-5%".to_string(),
            rate: "medium".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SpeechPart {
    Text(String),
    Break { millis: u32 },
}

/// A spoken utterance: text segments with optional pauses between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Speech {
    parts: Vec<SpeechPart>,
}

impl Speech {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![SpeechPart::Text(text.into())],
        }
    }

    pub fn then_break(mut self, millis: u32) -> Self {
        self.parts.push(SpeechPart::Break { millis });
        self
    }

    pub fn then_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(SpeechPart::Text(text.into()));
        self
    }

    /// The words the caller hears, without markup or pauses.
    pub fn plain_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                SpeechPart::Text(text) => Some(text.as_str()),
                SpeechPart::Break { .. } => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render(&self, style: &VoiceStyle, out: &mut String) {
        let body = self
            .parts
            .iter()
            .map(|part| match part {
                SpeechPart::Text(text) => escape_xml(text).into_owned(),
                SpeechPart::Break { millis } => format!(r#"<break time="{millis}ms"/>"#),
            })
            .collect::<Vec<_>>()
            .join(" ");

        let _ = write!(
            out,
            r#"<Say voice="{}" language="{}"><prosody pitch="{}" rate="{}">{}</prosody></Say>"#,
            escape_xml(&style.voice),
            escape_xml(&style.language),
            escape_xml(&style.pitch),
            escape_xml(&style.rate),
            body
        );
    }
}

/// How long Twilio waits after the caller stops talking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechTimeout {
    /// Twilio decides when the utterance is over.
    Auto,
    Seconds(u32),
}

impl SpeechTimeout {
    fn as_attr(&self) -> Cow<'static, str> {
        match self {
            Self::Auto => Cow::Borrowed("auto"),
            Self::Seconds(secs) => Cow::Owned(secs.to_string()),
        }
    }
}

/// A speech-capture window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gather {
    /// URL Twilio posts the result to.
    pub action: String,
    /// Seconds to wait for the caller to start speaking.
    pub timeout_secs: u32,
    pub speech_timeout: SpeechTimeout,
    /// Prompts spoken while listening.
    pub prompts: Vec<Speech>,
}

impl Gather {
    pub fn speech(action: impl Into<String>, timeout_secs: u32) -> Self {
        Self {
            action: action.into(),
            timeout_secs,
            speech_timeout: SpeechTimeout::Auto,
            prompts: Vec::new(),
        }
    }

    pub fn with_prompt(mut self, prompt: Speech) -> Self {
        self.prompts.push(prompt);
        self
    }

    fn render(&self, style: &VoiceStyle, out: &mut String) {
        let _ = write!(
            out,
            r#"<Gather input="speech" action="{}" method="POST" timeout="{}" speechTimeout="{}">"#,
            escape_xml(&self.action),
            self.timeout_secs,
            self.speech_timeout.as_attr()
        );
        for prompt in &self.prompts {
            prompt.render(style, out);
        }
        out.push_str("</Gather>");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Verb {
    Say(Speech),
    Gather(Gather),
    Hangup,
}

/// Builds a `<Response>` document verb by verb.
#[derive(Debug, Clone)]
pub struct TwimlBuilder {
    style: VoiceStyle,
    verbs: Vec<Verb>,
}

impl TwimlBuilder {
    pub fn new(style: VoiceStyle) -> Self {
        Self {
            style,
            verbs: Vec::new(),
        }
    }

    pub fn say(mut self, speech: Speech) -> Self {
        self.verbs.push(Verb::Say(speech));
        self
    }

    pub fn gather(mut self, gather: Gather) -> Self {
        self.verbs.push(Verb::Gather(gather));
        self
    }

    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::with_capacity(512);
        out.push_str(XML_DECLARATION);
        out.push_str("<Response>");
        for verb in &self.verbs {
            match verb {
                Verb::Say(speech) => speech.render(&self.style, &mut out),
                Verb::Gather(gather) => gather.render(&self.style, &mut out),
                Verb::Hangup => out.push_str("<Hangup/>"),
            }
        }
        out.push_str("</Response>");
        out
    }
}

/// Escape text for use in XML content and attribute values.
pub fn escape_xml(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// A rendered TwiML document served as `application/xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwimlResponse(pub String);

impl IntoResponse for TwimlResponse {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, TWIML_CONTENT_TYPE)], self.0).into_response()
    }
}
