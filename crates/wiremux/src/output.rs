use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use wiremux_rpc::{ErrorPayload, RemoteError};
use wiremux_value::Value;

#[derive(Clone, Copy, Debug)]
pub enum OutputFormat {
    Json,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReplyOutput<'a> {
    call_id: u32,
    outcome: &'a str,
    value: serde_json::Value,
    timestamp: String,
}

/// Print a call's result value.
pub fn print_reply(call_id: u32, result: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReplyOutput {
                call_id,
                outcome: "reply",
                value: json_view(result),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty => {
            println!("call {call_id} => {}", render_value(result));
        }
    }
}

/// Print a call's error outcome.
pub fn print_reply_error(call_id: u32, error: &ErrorPayload, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let value = match error {
                ErrorPayload::Remote(err) => serde_json::json!({
                    "name": err.name,
                    "message": err.message,
                    "stack": err.stack,
                }),
                ErrorPayload::Value(value) => json_view(value),
            };
            let out = ReplyOutput {
                call_id,
                outcome: "error",
                value,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty => match error {
            ErrorPayload::Remote(err) => println!("call {call_id} failed: {}", remote_line(err)),
            ErrorPayload::Value(value) => {
                println!("call {call_id} failed: {}", render_value(value));
            }
        },
    }
}

/// Render a wire value for humans.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Absent => "<absent>".to_string(),
        Value::Bytes(b) => format!("<{} bytes>", b.len()),
        other => match other.to_json() {
            Ok(json) => json.to_string(),
            Err(_) => format!("{other:?}"),
        },
    }
}

fn json_view(value: &Value) -> serde_json::Value {
    value
        .to_json()
        .unwrap_or_else(|_| serde_json::Value::String(render_value(value)))
}

fn remote_line(err: &RemoteError) -> String {
    if err.stack.is_empty() {
        err.to_string()
    } else {
        format!("{err}\n{}", err.stack)
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
