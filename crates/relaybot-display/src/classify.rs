use std::sync::OnceLock;

use regex::Regex;
use relaybot_core::types::{Message, MessageType};
use relaybot_core::xml::{decode_app_msg, decode_sys_msg};
use serde::Serialize;

use crate::truncate::truncate_text;

const TEXT_LIMIT: usize = 200;
const FALLBACK_LIMIT: usize = 100;
const TITLE_LIMIT: usize = 50;
const DES_LIMIT: usize = 30;

/// Log-friendly summary of one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayInfo {
    /// Numeric type code as a string.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "type_desc")]
    pub type_description: &'static str,
    pub content: String,
    pub is_truncated: bool,
    /// Original content length in characters.
    pub length: usize,
}

pub fn classify(message: &Message) -> DisplayInfo {
    classify_raw(message.msg_type, &message.content)
}

/// Classify from the raw backend type code and content.
pub fn classify_raw(msg_type: impl Into<MessageType>, content: &str) -> DisplayInfo {
    let msg_type = msg_type.into();

    let (type_description, rendered) = match msg_type {
        MessageType::Text => ("文本消息", truncate_text(content, TEXT_LIMIT)),
        MessageType::Image => ("图片消息", "[图片消息]".to_string()),
        MessageType::Voice => ("语音消息", "[语音消息]".to_string()),
        MessageType::Video => ("视频消息", "[视频消息]".to_string()),
        MessageType::Emoticon => ("表情消息", "[表情消息]".to_string()),
        MessageType::Location => ("地理位置消息", "[地理位置消息]".to_string()),
        MessageType::App => ("APP消息", format_app_message(content)),
        MessageType::ShareCard => ("名片消息", "[名片消息]".to_string()),
        MessageType::Verify => ("好友验证消息", "[好友验证消息]".to_string()),
        MessageType::System => ("系统消息", format_system_message(content)),
        MessageType::Prompt => ("系统提示消息", truncate_text(content, FALLBACK_LIMIT)),
        MessageType::MicroVideo => ("小视频消息", "[小视频消息]".to_string()),
        MessageType::Voip => ("语音通话消息", "[语音通话消息]".to_string()),
        MessageType::VoipNotify => ("语音通话结束消息", "[语音通话结束消息]".to_string()),
        MessageType::VoipInvite => ("语音通话邀请消息", "[语音通话邀请消息]".to_string()),
        MessageType::PossibleFriend => ("好友推荐消息", "[好友推荐消息]".to_string()),
        MessageType::Init => ("微信初始化消息", "[微信初始化消息]".to_string()),
        MessageType::Unknown(_) => ("未知消息类型", truncate_text(content, FALLBACK_LIMIT)),
    };

    let length = content.chars().count();
    DisplayInfo {
        kind: msg_type.code().to_string(),
        type_description,
        is_truncated: length > rendered.chars().count(),
        content: rendered,
        length,
    }
}

fn format_app_message(content: &str) -> String {
    let Ok(envelope) = decode_app_msg(content) else {
        return truncate_text(content, FALLBACK_LIMIT);
    };
    let app = envelope.appmsg;
    let (title, des) = (app.title(), app.des());

    let labelled = |label: &str, detail: &str, limit: usize| {
        if detail.is_empty() {
            format!("[{label}]")
        } else {
            format!("[{label}] {}", truncate_text(detail, limit))
        }
    };

    match app.kind() {
        "5" => labelled("链接消息", title, TITLE_LIMIT),
        "6" => "[文件消息]".to_string(),
        "33" | "36" => "[位置消息]".to_string(),
        "57" => labelled("引用消息", title, TITLE_LIMIT),
        "74" => "[附件上传中]".to_string(),
        "2000" => labelled("转账消息", des, DES_LIMIT),
        "2001" => labelled("红包消息", des, DES_LIMIT),
        "51" => labelled("小程序消息", title, TITLE_LIMIT),
        other => labelled(&format!("APP消息-{other}"), title, TITLE_LIMIT),
    }
}

fn template_regex() -> Option<&'static Regex> {
    static TEMPLATE: OnceLock<Option<Regex>> = OnceLock::new();
    TEMPLATE
        .get_or_init(|| Regex::new(r"<template><!\[CDATA\[(.*?)\]\]></template>").ok())
        .as_ref()
}

/// Free-text markers for system notices that arrive without an envelope.
const SYSTEM_HEURISTICS: &[(&[&str], &str)] = &[
    (&["邀请你加入群聊", "invite you to join"], "[邀请进群]"),
    (&["移出了群聊", "removed from"], "[移除群聊]"),
    (&["已解散该群聊", "disbanded"], "[解散群聊]"),
    (&["修改群名为", "changed group name"], "[修改群名]"),
    (&["群主", "group owner"], "[更换群主]"),
];

fn format_system_message(content: &str) -> String {
    if let Ok(envelope) = decode_sys_msg(content) {
        return match envelope.kind() {
            "revokemsg" => "[消息撤回]".to_string(),
            "pat" => "[拍一拍]".to_string(),
            "sysmsgtemplate" => template_regex()
                .and_then(|re| re.captures(content))
                .and_then(|caps| caps.get(1))
                .map(|m| format!("[系统消息] {}", truncate_text(m.as_str(), TITLE_LIMIT)))
                .unwrap_or_else(|| "[系统消息]".to_string()),
            "mmchatroombarannouncememt" => "[群公告]".to_string(),
            "roomtoolstips" => "[群工具提示]".to_string(),
            other => format!("[系统消息-{other}]"),
        };
    }

    for (needles, label) in SYSTEM_HEURISTICS {
        if needles.iter().any(|n| content.contains(n)) {
            return (*label).to_string();
        }
    }

    truncate_text(content, FALLBACK_LIMIT)
}
