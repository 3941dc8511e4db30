//! Line server - speaks the JSON-lines protocol over any async byte streams.
//!
//! Client lines are parsed into requests and forwarded to the game task;
//! updates coming back are written out as they arrive. Every direct reply
//! (snapshot or error) is written only after the updates of all earlier
//! commands, and updates still queued at the end are written before the
//! stream is flushed. The loop ends on `quit`, on end of input, or when the
//! game task goes away.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::protocol::{
    parse_request, ErrorMessage, Request, ServerMessage, SnapshotMessage, UpdateMessage,
};
use crate::runtime::{GameRuntime, Update};

/// Serve one client until it quits or disconnects, then stop the runtime.
pub async fn serve<R, W>(mut runtime: GameRuntime, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read client line")? else {
                    info!("client closed input");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                if !handle_line(&mut runtime, &line, &mut writer).await? {
                    break;
                }
            }
            update = runtime.next_update() => {
                let Some(update) = update else {
                    warn!("game task ended unexpectedly");
                    break;
                };
                write_update(&mut writer, &update).await?;
            }
        }
    }

    for update in runtime.shutdown().await? {
        write_update(&mut writer, &update).await?;
    }
    writer.flush().await?;
    Ok(())
}

/// Returns false when the client asked to quit.
async fn handle_line<W>(runtime: &mut GameRuntime, line: &str, writer: &mut W) -> Result<bool>
where
    W: AsyncWrite + Unpin,
{
    let request = match parse_request(line) {
        Ok(request) => request,
        Err(err) => {
            debug!(%err, "rejected client line");
            runtime.sync().await?;
            write_pending(runtime, writer).await?;
            let message = ServerMessage::Error(ErrorMessage::from(&err));
            write_message(writer, &message).await?;
            return Ok(true);
        }
    };

    match request {
        Request::Action { side, action } => runtime.act(side, action).await?,
        Request::Advance { ms } => runtime.advance(ms).await?,
        Request::Snapshot => {
            // The reply is produced after every earlier command was applied
            let snapshots = runtime.snapshot().await?;
            write_pending(runtime, writer).await?;
            for snapshot in snapshots {
                let message = ServerMessage::Snapshot(SnapshotMessage::from(&snapshot));
                write_message(writer, &message).await?;
            }
        }
        // Updates still in flight are written once the runtime stops
        Request::Quit => return Ok(false),
    }
    Ok(true)
}

async fn write_pending<W>(runtime: &mut GameRuntime, writer: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    for update in runtime.drain_updates() {
        write_update(writer, &update).await?;
    }
    Ok(())
}

async fn write_update<W>(writer: &mut W, update: &Update) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let message = ServerMessage::Update(UpdateMessage::from(update));
    write_message(writer, &message).await
}

async fn write_message<W>(writer: &mut W, message: &ServerMessage) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = message.to_line()?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use tokio::io::BufReader;

    fn manual_clock() -> RuntimeConfig {
        RuntimeConfig {
            tick_ms: 0,
            ..RuntimeConfig::default()
        }
    }

    async fn run_script(script: &str) -> Vec<serde_json::Value> {
        let runtime = GameRuntime::spawn(manual_clock());
        let mut output = Vec::new();
        serve(runtime, BufReader::new(script.as_bytes()), &mut output)
            .await
            .unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_bad_lines_get_error_replies() {
        let replies = run_script("{\"type\":\"dance\"}\nnope\n{\"type\":\"quit\"}\n").await;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["type"], "error");
        assert_eq!(replies[0]["code"], "unknown_type");
        assert_eq!(replies[1]["code"], "malformed");
    }

    #[tokio::test]
    async fn test_snapshot_request() {
        let replies = run_script("{\"type\":\"snapshot\"}\n{\"type\":\"quit\"}\n").await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["type"], "snapshot");
        assert_eq!(replies[0]["score"], 0);
        assert_eq!(replies[0]["difficulty"], "medium");
        assert_eq!(replies[0]["grid"].as_array().unwrap().len(), 25);
    }

    fn types(replies: &[serde_json::Value]) -> Vec<&str> {
        replies
            .iter()
            .map(|reply| reply["type"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_update_written_before_quit() {
        let replies =
            run_script("{\"type\":\"action\",\"action\":\"hardDrop\"}\n{\"type\":\"quit\"}\n")
                .await;
        assert_eq!(types(&replies), vec!["update"]);
        assert_eq!(replies[0]["events"][0]["event"], "pieceLocked");
    }

    #[tokio::test]
    async fn test_update_written_at_end_of_input() {
        let replies = run_script("{\"type\":\"action\",\"action\":\"moveRight\"}\n").await;
        assert_eq!(types(&replies), vec!["update"]);
    }

    #[tokio::test]
    async fn test_replies_follow_earlier_updates() {
        let script = concat!(
            "{\"type\":\"action\",\"action\":\"hardDrop\"}\n",
            "{\"type\":\"snapshot\"}\n",
            "{\"type\":\"action\",\"action\":\"moveLeft\"}\n",
            "{\"type\":\"dance\"}\n",
            "{\"type\":\"quit\"}\n",
        );
        let replies = run_script(script).await;
        assert_eq!(types(&replies), vec!["update", "snapshot", "update", "error"]);
        assert_eq!(replies[1]["score"], 0);
        assert_eq!(replies[3]["code"], "unknown_type");
    }
}
