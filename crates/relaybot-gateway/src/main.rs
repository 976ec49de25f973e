use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use relaybot_channels::StdoutSender;
use relaybot_core::config::RelaybotConfig;
use relaybot_core::types::Message;
use relaybot_display::classify;
use relaybot_plugins::DispatchOutcome;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, info_span, warn, Instrument};

mod app;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Replay chat messages (one JSON object per line) through the plugin pipeline.
///
/// Replies are written to stdout as JSON lines; logs go to stderr.
#[derive(Debug, Parser)]
#[command(name = "relaybot-gateway", version, about)]
struct Cli {
    /// Config file. Falls back to $RELAYBOT_CONFIG, then ~/.relaybot/relaybot.toml.
    #[arg(long)]
    config: Option<String>,

    /// Read messages from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Max messages dispatched at once. Overrides `dispatch.concurrency`.
    #[arg(long)]
    concurrency: Option<usize>,
}

#[derive(Debug, Default)]
struct Tally {
    replied: u64,
    unhandled: u64,
    failed: u64,
    skipped: u64,
}

enum Handled {
    Replied,
    Unhandled,
    Failed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relaybot_gateway=info,relaybot_plugins=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // load config: --config > RELAYBOT_CONFIG env > ~/.relaybot/relaybot.toml
    let config_path = cli.config.clone().or_else(|| std::env::var("RELAYBOT_CONFIG").ok());
    let config = RelaybotConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        RelaybotConfig::default()
    });

    let concurrency = cli.concurrency.unwrap_or(config.dispatch.concurrency).max(1);
    let state = Arc::new(app::AppState::build(config, Arc::new(StdoutSender::new()))?);

    let purge_store = Arc::clone(&state.session_store);
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(PURGE_INTERVAL);
        loop {
            tick.tick().await;
            purge_store.purge_expired();
        }
    });

    info!(concurrency, "relaybot gateway started");

    let tally = match cli.input {
        Some(path) => {
            info!(path = %path.display(), "reading messages from file");
            let file = tokio::fs::File::open(&path).await?;
            run(state, BufReader::new(file), concurrency).await?
        }
        None => run(state, BufReader::new(tokio::io::stdin()), concurrency).await?,
    };

    info!(
        replied = tally.replied,
        unhandled = tally.unhandled,
        failed = tally.failed,
        skipped = tally.skipped,
        "input drained"
    );
    Ok(())
}

/// Dispatch every line of `reader`, at most `concurrency` at a time.
async fn run<R>(state: Arc<app::AppState>, reader: R, concurrency: usize) -> anyhow::Result<Tally>
where
    R: AsyncBufRead + Unpin,
{
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();
    let mut tally = Tally::default();
    let mut lines = LinesStream::new(reader.lines());

    while let Some(line) = lines.next().await {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let message = match Message::from_json(&line) {
            Ok(m) => m,
            Err(e) => {
                warn!(code = e.code(), error = %e, "skipping malformed message");
                tally.skipped += 1;
                continue;
            }
        };

        let permit = Arc::clone(&permits).acquire_owned().await?;
        let state = Arc::clone(&state);
        tasks.spawn(async move {
            let _permit = permit;
            handle(state, message).await
        });

        while let Some(done) = tasks.try_join_next() {
            record(&mut tally, done);
        }
    }

    while let Some(done) = tasks.join_next().await {
        record(&mut tally, done);
    }
    Ok(tally)
}

fn record(tally: &mut Tally, done: Result<Handled, tokio::task::JoinError>) {
    match done {
        Ok(Handled::Replied) => tally.replied += 1,
        Ok(Handled::Unhandled) => tally.unhandled += 1,
        Ok(Handled::Failed) => tally.failed += 1,
        Err(e) => {
            error!(error = %e, "dispatch task panicked");
            tally.failed += 1;
        }
    }
}

async fn handle(state: Arc<app::AppState>, mut message: Message) -> Handled {
    if message.id.is_empty() {
        message.id = uuid::Uuid::now_v7().to_string();
    }

    let span = info_span!(
        "dispatch",
        msg_id = %message.id,
        room = %message.room_id,
        sender = %message.sender_id
    );

    async move {
        let classified = classify(&message);
        info!(
            kind = %classified.kind,
            type_desc = classified.type_description,
            content = %classified.content,
            truncated = classified.is_truncated,
            "message received"
        );

        match state.dispatcher.dispatch(message).await {
            Ok(DispatchOutcome::Replied { handler }) => {
                debug!(handler = %handler, "handled");
                Handled::Replied
            }
            Ok(DispatchOutcome::Unhandled) => {
                debug!("no handler claimed message");
                Handled::Unhandled
            }
            Err(e) => {
                error!(error = %e, "dispatch failed");
                Handled::Failed
            }
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaybot_channels::RecordingSender;

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["relaybot-gateway", "--config", "x.toml", "--concurrency", "4"]);
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
        assert_eq!(cli.concurrency, Some(4));
        assert!(cli.input.is_none());
    }

    #[tokio::test]
    async fn run_tallies_each_line() {
        let mut config = RelaybotConfig::default();
        config.plugins.morning_news_headlines = vec!["头条".into()];
        let sender = Arc::new(RecordingSender::new());
        let state = Arc::new(app::AppState::build(config, sender.clone()).unwrap());

        let input = concat!(
            r#"{"room_id":"r1","sender_id":"u1","is_chat_room":true,"content":"早报"}"#,
            "\n\n",
            r#"{"room_id":"r1","sender_id":"u1","is_chat_room":true,"content":"晚上好"}"#,
            "\n",
            "not json\n",
            r#"{"room_id":"","sender_id":"","content":"早报"}"#,
            "\n",
        );

        let tally = run(state, input.as_bytes(), 2).await.unwrap();
        assert_eq!(tally.replied, 1);
        assert_eq!(tally.unhandled, 1);
        assert_eq!(tally.skipped, 2);
        assert_eq!(tally.failed, 0);
        assert_eq!(sender.sent().await.len(), 1);
    }
}
