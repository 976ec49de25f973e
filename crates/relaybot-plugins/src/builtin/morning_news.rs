use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use tracing::warn;

use crate::context::MessageContext;
use crate::error::{PluginError, Result};
use crate::types::{HandlerOutcome, MessageHandler};

const COMMAND: &str = "早报";
const FETCH_FAILED: &str = "早报获取失败，请稍后再试";

/// Where the morning digest comes from.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn headlines(&self) -> Result<Vec<String>>;
}

/// Headlines fixed at startup from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticHeadlines {
    headlines: Vec<String>,
}

impl StaticHeadlines {
    pub fn new(headlines: Vec<String>) -> Self {
        Self { headlines }
    }
}

#[async_trait]
impl NewsSource for StaticHeadlines {
    async fn headlines(&self) -> Result<Vec<String>> {
        if self.headlines.is_empty() {
            return Err(PluginError::ExecutionFailed("no headlines configured".into()));
        }
        Ok(self.headlines.clone())
    }
}

pub struct MorningNews {
    source: Arc<dyn NewsSource>,
}

impl MorningNews {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl MessageHandler for MorningNews {
    fn name(&self) -> &str {
        "MorningNews"
    }

    fn labels(&self) -> &[&'static str] {
        &["news", "daily"]
    }

    async fn run(&self, ctx: &MessageContext) -> Result<HandlerOutcome> {
        if ctx.message.content.trim() != COMMAND {
            return Ok(HandlerOutcome::NotMatched);
        }

        let reply = match self.source.headlines().await {
            Ok(headlines) => format_digest(&Local::now().format("%Y-%m-%d").to_string(), &headlines),
            Err(e) => {
                warn!(error = %e, "morning news unavailable");
                FETCH_FAILED.to_string()
            }
        };
        Ok(HandlerOutcome::Handled(reply))
    }
}

fn format_digest(date: &str, headlines: &[String]) -> String {
    let items: Vec<String> = headlines
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{}. {}", i + 1, h))
        .collect();
    format!("☕ {date}  今日早报\n\n{}", items.join("\n"))
}
