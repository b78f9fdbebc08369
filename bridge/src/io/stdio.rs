//! NDJSON stdio transport for the bridge.
//!
//! One method call per line on stdin, one reply per line on stdout; logs go
//! to stderr. Each call is served on its own task so a permission request
//! awaiting the user's picker decision does not stall the other operations;
//! replies are serialized through a single writer channel.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::handler::dispatch::Dispatcher;
use crate::protocol::errors;
use crate::protocol::messages::{ErrorReply, MethodCall};

/// Maximum message size: 1 MiB.
const MAX_LINE_SIZE: usize = 1_048_576;

/// Run the NDJSON stdio transport loop until stdin closes.
pub async fn run_stdio_loop(dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    let (reply_tx, mut reply_rx) = mpsc::channel::<Value>(64);

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(value) = reply_rx.recv().await {
            debug!("Sending: {}", value);
            if let Err(e) = write_reply(&mut stdout, &value).await {
                warn!("Failed to write reply: {e}");
                break;
            }
        }
    });

    info!("Stdio transport loop started, waiting for input");

    loop {
        line.clear();

        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            // EOF — the shell closed the channel.
            info!("Stdin closed, shutting down");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.len() > MAX_LINE_SIZE {
            warn!("Message exceeds 1 MiB limit ({} bytes)", trimmed.len());
            let err = ErrorReply::new(
                Value::Null,
                errors::PARSE_ERROR,
                "Message exceeds 1 MiB size limit",
            );
            let _ = reply_tx.send(serde_json::to_value(&err)?).await;
            continue;
        }

        debug!("Received: {}", trimmed);

        let call: MethodCall = match serde_json::from_str(trimmed) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to parse method call: {e}");
                let err =
                    ErrorReply::new(Value::Null, errors::PARSE_ERROR, format!("Parse error: {e}"));
                let _ = reply_tx.send(serde_json::to_value(&err)?).await;
                continue;
            }
        };

        let dispatcher = dispatcher.clone();
        let reply_tx = reply_tx.clone();
        tokio::spawn(async move {
            let result = dispatcher.dispatch(call).await;
            let _ = reply_tx.send(result.to_json()).await;
        });
    }

    // Let in-flight requests drain before the writer stops.
    drop(reply_tx);
    writer.await?;

    Ok(())
}

/// Write a JSON value as an NDJSON line to the writer.
async fn write_reply<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    value: &Value,
) -> anyhow::Result<()> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
