use async_trait::async_trait;
use chrono::{Datelike, Local, Weekday};
use rand::seq::SliceRandom;
use regex::Regex;

use crate::context::MessageContext;
use crate::error::Result;
use crate::types::{HandlerOutcome, MessageHandler};

/// Canned-reply handler matched on keywords in the lower-cased content.
///
/// A matching message gets one random reply, optionally followed by a random
/// emoji. With a weekday gate set, matches on other days get the gate's
/// fixed text instead.
pub struct KeywordHandler {
    name: &'static str,
    labels: &'static [&'static str],
    keywords: &'static [&'static str],
    patterns: Vec<Regex>,
    replies: &'static [&'static str],
    emojis: &'static [&'static str],
    gate: Option<WeekdayGate>,
    today: fn() -> Weekday,
}

#[derive(Debug, Clone, Copy)]
struct WeekdayGate {
    day: Weekday,
    closed_reply: &'static str,
}

fn local_weekday() -> Weekday {
    Local::now().weekday()
}

impl KeywordHandler {
    pub fn new(
        name: &'static str,
        labels: &'static [&'static str],
        keywords: &'static [&'static str],
        replies: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            labels,
            keywords,
            patterns: Vec::new(),
            replies,
            emojis: &[],
            gate: None,
            today: local_weekday,
        }
    }

    /// Also match when `pattern` finds anything in the lower-cased content.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns.push(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn with_emojis(mut self, emojis: &'static [&'static str]) -> Self {
        self.emojis = emojis;
        self
    }

    /// Only answer with the canned replies on `day`.
    pub fn only_on(mut self, day: Weekday, closed_reply: &'static str) -> Self {
        self.gate = Some(WeekdayGate { day, closed_reply });
        self
    }

    /// Override the weekday source.
    pub fn with_clock(mut self, today: fn() -> Weekday) -> Self {
        self.today = today;
        self
    }

    pub fn matches(&self, content: &str) -> bool {
        let content = content.to_lowercase();
        self.keywords.iter().any(|k| content.contains(k)) || self.patterns.iter().any(|p| p.is_match(&content))
    }

    fn compose(&self) -> String {
        let mut rng = rand::thread_rng();
        let reply = self.replies.choose(&mut rng).copied().unwrap_or_default();
        match self.emojis.choose(&mut rng) {
            Some(emoji) => format!("{reply} {emoji}"),
            None => reply.to_string(),
        }
    }
}

#[async_trait]
impl MessageHandler for KeywordHandler {
    fn name(&self) -> &str {
        self.name
    }

    fn labels(&self) -> &[&'static str] {
        self.labels
    }

    async fn run(&self, ctx: &MessageContext) -> Result<HandlerOutcome> {
        if !self.matches(&ctx.message.content) {
            return Ok(HandlerOutcome::NotMatched);
        }

        if let Some(gate) = self.gate {
            if (self.today)() != gate.day {
                return Ok(HandlerOutcome::Handled(gate.closed_reply.to_string()));
            }
        }

        Ok(HandlerOutcome::Handled(self.compose()))
    }
}
