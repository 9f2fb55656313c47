//! Worker entry point.
//!
//! Runs inside the worker process: reads NDJSON request envelopes from its
//! input, dispatches them to the language analyzer, and writes one response
//! envelope per request. The analyzer is constructed lazily on the first
//! dispatch and reused for the lifetime of the loop.
//!
//! Dispatch failures never terminate the loop: an unknown method, a bad
//! argument, or an analyzer failure all produce an `{id, error}` response,
//! so every parsed envelope is answered exactly once. The loop only exits
//! on EOF.

use std::io;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use super::protocol::{methods, RpcRequest, RpcResponse};
use crate::analyzer::PplAnalyzer;

/// Run the worker loop over stdio.
///
/// This is what the `worker` subcommand of the binary executes after the
/// handle factory spawns it.
pub async fn run_worker() -> io::Result<()> {
    run_worker_loop(tokio::io::stdin(), tokio::io::stdout()).await
}

/// Run the worker loop over arbitrary streams (used directly by loopback
/// workers and tests).
pub async fn run_worker_loop<R, W>(reader: R, writer: W) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut writer = BufWriter::new(writer);
    let mut line = String::new();
    let mut analyzer: Option<PplAnalyzer> = None;

    loop {
        line.clear();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            // EOF - host closed the pipe
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        let request: RpcRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                // no id to echo, so there is nothing to answer
                eprintln!("[worker] ignoring malformed request: {}", e);
                continue;
            }
        };

        let response = dispatch(&request, analyzer.get_or_insert_with(PplAnalyzer::new));
        let mut out = serde_json::to_string(&response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }
}

/// Dispatch one request to the analyzer, capturing every failure as an
/// error envelope.
fn dispatch(request: &RpcRequest, analyzer: &PplAnalyzer) -> RpcResponse {
    let result: Result<Value, String> = match request.method.as_str() {
        methods::TOKENIZE => text_arg(request).and_then(|text| {
            analyzer
                .tokenize(&text)
                .map_err(|e| e.to_string())
                .and_then(|tokens| serde_json::to_value(tokens).map_err(|e| e.to_string()))
        }),
        methods::VALIDATE => text_arg(request)
            .and_then(|text| serde_json::to_value(analyzer.validate(&text)).map_err(|e| e.to_string())),
        other => Err(format!("Unknown method: {}", other)),
    };

    match result {
        Ok(value) => RpcResponse::success(request.id, value),
        Err(message) => RpcResponse::failure(request.id, message),
    }
}

/// Extract the single string argument both methods expect.
fn text_arg(request: &RpcRequest) -> Result<String, String> {
    match request.args.first().and_then(Value::as_str) {
        Some(text) => Ok(text.to_string()),
        None => Err(format!(
            "method '{}' expects a single string argument",
            request.method
        )),
    }
}
