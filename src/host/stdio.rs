//! Newline-delimited JSON bridge between a front end and the runtime.
//!
//! Stdout carries protocol lines only. Diagnostics go to stderr via tracing.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{broadcast, mpsc};

use crate::controller::Snapshot;
use crate::error::{ClientError, Result};
use crate::host::channel::{HostCommandClient, state_event};
use crate::host::contract::{CommandEnvelope, CommandName, ResponseEnvelope};
use crate::runtime::RuntimeHandle;

/// Request id used when a line could not be parsed far enough to find one.
pub const PARSE_ERROR_ID: &str = "parse-error";

const OUTPUT_CAPACITY: usize = 256;

/// Serve the protocol on the process's stdin and stdout.
pub async fn run_stdio_bridge(runtime: RuntimeHandle) -> Result<()> {
    run_bridge(runtime, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Serve the protocol over arbitrary byte streams.
///
/// Responses and `state.changed` events share one writer task, so lines
/// never interleave. Returns when `input` reaches EOF or after answering
/// `runtime.stop`; every line queued by then is flushed first.
pub async fn run_bridge<R, W>(runtime: RuntimeHandle, input: R, output: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let client = HostCommandClient::new(runtime);
    let (line_tx, line_rx) = mpsc::channel(OUTPUT_CAPACITY);

    let writer = tokio::spawn(write_lines(output, line_rx));
    let forwarder = tokio::spawn(forward_events(client.subscribe_events(), line_tx.clone()));

    let result = read_commands(&client, input, &line_tx).await;

    forwarder.abort();
    let _ = forwarder.await;
    drop(line_tx);

    let written = writer
        .await
        .map_err(|e| ClientError::Channel(format!("output writer panicked: {e}")))?;
    result.and(written)
}

async fn read_commands<R: AsyncRead + Unpin>(
    client: &HostCommandClient,
    input: R,
    out: &mpsc::Sender<String>,
) -> Result<()> {
    let mut lines = BufReader::new(input).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let envelope: CommandEnvelope = match serde_json::from_str(line) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable host line");
                let response = ResponseEnvelope::error(
                    PARSE_ERROR_ID,
                    format!("failed to parse command envelope: {e}"),
                );
                emit(out, &response).await?;
                continue;
            }
        };

        let stop = envelope.command == CommandName::RuntimeStop;
        let request_id = envelope.request_id.clone();
        tracing::debug!(command = %envelope.command, %request_id, "host command");

        match client.send(envelope).await {
            Ok(response) => emit(out, &response).await?,
            Err(e) => {
                tracing::error!(error = %e, "runtime unavailable; closing host bridge");
                emit(out, &ResponseEnvelope::error(request_id, e.to_string())).await?;
                return Err(e);
            }
        }

        if stop {
            tracing::info!("runtime.stop received");
            break;
        }
    }

    tracing::info!("host bridge input finished");
    Ok(())
}

async fn forward_events(mut events: broadcast::Receiver<Snapshot>, out: mpsc::Sender<String>) {
    loop {
        let snapshot = match events.recv().await {
            Ok(snapshot) => snapshot,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event forwarder lagged; newer snapshot follows");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        let line = match state_event(&snapshot).and_then(|event| to_json(&event)) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "dropping unserializable event");
                continue;
            }
        };
        if out.send(line).await.is_err() {
            break;
        }
    }
}

async fn emit(out: &mpsc::Sender<String>, response: &ResponseEnvelope) -> Result<()> {
    let line = to_json(response)?;
    out.send(line)
        .await
        .map_err(|_| ClientError::Channel("output writer closed".to_owned()))
}

async fn write_lines<W: AsyncWrite + Unpin>(
    output: W,
    mut lines: mpsc::Receiver<String>,
) -> Result<()> {
    let mut output = BufWriter::new(output);
    while let Some(line) = lines.recv().await {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| ClientError::Contract(format!("failed to serialize envelope: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writer_emits_one_line_per_message_in_order() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(r#"{"a":1}"#.to_owned()).await.expect("send");
        tx.send(r#"{"b":2}"#.to_owned()).await.expect("send");
        drop(tx);

        let mut buf = Vec::new();
        write_lines(&mut buf, rx).await.expect("write");
        assert_eq!(buf, b"{\"a\":1}\n{\"b\":2}\n");
    }

    #[tokio::test]
    async fn emit_fails_once_writer_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let err = emit(&tx, &ResponseEnvelope::ok("r1", serde_json::Value::Null))
            .await
            .expect_err("closed");
        assert!(matches!(err, ClientError::Channel(_)));
    }

    #[test]
    fn parse_error_response_shape() {
        let json = to_json(&ResponseEnvelope::error(PARSE_ERROR_ID, "bad json")).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["request_id"], PARSE_ERROR_ID);
        assert_eq!(value["ok"], false);
        assert_eq!(value["v"], 1);
    }
}
