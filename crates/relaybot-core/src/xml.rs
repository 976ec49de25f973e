//! Embedded XML envelopes carried in app and system message content.
//!
//! Only the handful of fields the router looks at are modelled; everything
//! else in the payload is ignored by the deserializer.

use serde::Deserialize;
use thiserror::Error;

use crate::types::{AppMsgType, Message};

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Content does not look like the expected envelope at all.
    #[error("not a <{0}> envelope")]
    NotEnvelope(&'static str),

    #[error("malformed xml: {0}")]
    Malformed(#[from] quick_xml::DeError),
}

/// `<msg><appmsg>…</appmsg></msg>`
#[derive(Debug, Clone, Deserialize)]
pub struct AppMsgEnvelope {
    pub appmsg: AppMsgBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppMsgBody {
    /// Some clients put the sub-type in an attribute, most in a child element.
    #[serde(rename = "@type", default)]
    type_attr: Option<String>,
    #[serde(rename = "type", default)]
    type_elem: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub des: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl AppMsgBody {
    /// Raw sub-type code as written in the envelope.
    pub fn kind(&self) -> &str {
        self.type_elem
            .as_deref()
            .or(self.type_attr.as_deref())
            .map(str::trim)
            .unwrap_or("")
    }

    pub fn app_msg_type(&self) -> Option<AppMsgType> {
        self.kind().parse::<u32>().ok().map(AppMsgType::from)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn des(&self) -> &str {
        self.des.as_deref().map(str::trim).unwrap_or("")
    }
}

/// `<sysmsg type="…">…</sysmsg>`
#[derive(Debug, Clone, Deserialize)]
pub struct SysMsgEnvelope {
    #[serde(rename = "@type", default)]
    kind: Option<String>,
}

impl SysMsgEnvelope {
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("")
    }
}

pub fn decode_app_msg(content: &str) -> Result<AppMsgEnvelope, DecodeError> {
    if !(content.contains("<msg") && content.contains("</msg>")) {
        return Err(DecodeError::NotEnvelope("msg"));
    }
    Ok(quick_xml::de::from_str(content)?)
}

pub fn decode_sys_msg(content: &str) -> Result<SysMsgEnvelope, DecodeError> {
    if !(content.contains("<sysmsg") && content.contains("</sysmsg>")) {
        return Err(DecodeError::NotEnvelope("sysmsg"));
    }
    Ok(quick_xml::de::from_str(content)?)
}

/// Text used for trigger matching.
///
/// Quote messages carry the user's reply in the envelope title; the raw
/// content is XML. Falls back to the raw content when decoding fails.
pub fn match_text(message: &Message) -> String {
    if message.app_msg_type == Some(AppMsgType::Quote) {
        match decode_app_msg(&message.content) {
            Ok(env) => return env.appmsg.title().to_string(),
            Err(e) => tracing::debug!(msg_id = %message.id, error = %e, "quote decode failed, using raw content"),
        }
    }
    message.content.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageType;

    const QUOTE: &str = r#"<msg><appmsg appid="" sdkver="0"><title>AI 这是什么意思</title><des></des><type>57</type><refermsg><type>1</type><content>原文</content></refermsg></appmsg></msg>"#;

    #[test]
    fn decode_quote_envelope() {
        let env = decode_app_msg(QUOTE).expect("decode");
        assert_eq!(env.appmsg.kind(), "57");
        assert_eq!(env.appmsg.app_msg_type(), Some(AppMsgType::Quote));
        assert_eq!(env.appmsg.title(), "AI 这是什么意思");
    }

    #[test]
    fn type_attribute_is_accepted() {
        let env = decode_app_msg(r#"<msg><appmsg type="5"><title>link</title></appmsg></msg>"#).expect("decode");
        assert_eq!(env.appmsg.kind(), "5");
    }

    #[test]
    fn sysmsg_type_attribute() {
        let env = decode_sys_msg(r#"<sysmsg type="revokemsg"><revokemsg><session>x</session></revokemsg></sysmsg>"#)
            .expect("decode");
        assert_eq!(env.kind(), "revokemsg");
    }

    #[test]
    fn plain_text_is_not_an_envelope() {
        assert!(matches!(decode_app_msg("hello"), Err(DecodeError::NotEnvelope("msg"))));
        assert!(matches!(decode_sys_msg("hello"), Err(DecodeError::NotEnvelope("sysmsg"))));
    }

    #[test]
    fn match_text_uses_quote_title() {
        let msg = Message::room("r", "s", QUOTE).with_type(MessageType::App, Some(AppMsgType::Quote));
        assert_eq!(match_text(&msg), "AI 这是什么意思");
    }

    #[test]
    fn match_text_falls_back_on_broken_quote() {
        let msg = Message::room("r", "s", "<msg><appmsg>").with_type(MessageType::App, Some(AppMsgType::Quote));
        assert_eq!(match_text(&msg), "<msg><appmsg>");
    }
}
