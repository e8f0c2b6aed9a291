use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tracing::debug;
use wiremux_buffer::ReadBuffer;
use wiremux_mux::Multiplexer;
use wiremux_pipe::{pump, uds, PacketReader, SharedWriter};
use wiremux_rpc::RpcMessage;
use wiremux_value::{Value, ValueCodec};

use crate::cmd::CallArgs;
use crate::exit::{
    io_error, mux_error, pipe_error, rpc_error, CliError, CliResult, FAILURE, SUCCESS, TIMEOUT,
    USAGE,
};
use crate::output::{print_reply, print_reply_error, OutputFormat};

const CALL_ID: u32 = 1;

pub fn run(args: CallArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let call_args = parse_args_json(&args.args)?;

    let stream = uds::connect(&args.path).map_err(|err| pipe_error("connect failed", err))?;
    let read_stream = stream
        .try_clone()
        .map_err(|err| io_error("stream clone failed", err))?;

    let mux = Multiplexer::new(Arc::new(SharedWriter::new(stream)));
    let pump_mux = mux.clone();
    thread::spawn(move || {
        if let Err(err) = pump(PacketReader::new(read_stream), &pump_mux) {
            debug!(%err, "pump ended");
        }
    });

    let channel = mux
        .open(&args.channel)
        .map_err(|err| mux_error("open failed", err))?
        .wait_timeout(timeout)
        .map_err(|err| mux_error("open failed", err))?;

    let codec = Arc::new(ValueCodec::new());
    let (tx, rx) = mpsc::channel();
    let reply_codec = Arc::clone(&codec);
    let _subscription = channel.messages().subscribe(move |mut buf: ReadBuffer| {
        if let Ok(message) = RpcMessage::decode(&reply_codec, buf.read_rest()) {
            let _ = tx.send(message);
        }
    });

    let request = RpcMessage::Request {
        id: CALL_ID,
        method: args.method.clone(),
        args: call_args,
    };
    let mut out = channel.write_buffer();
    request
        .encode(&codec, &mut out)
        .map_err(|err| rpc_error("encode failed", err))?;
    out.commit().map_err(|err| mux_error("send failed", err))?;

    loop {
        match rx.recv_timeout(timeout) {
            Ok(RpcMessage::Reply { id, result }) if id == CALL_ID => {
                print_reply(id, &result, format);
                let _ = channel.close();
                return Ok(SUCCESS);
            }
            Ok(RpcMessage::ReplyError { id, error }) if id == CALL_ID => {
                print_reply_error(id, &error, format);
                let _ = channel.close();
                return Ok(FAILURE);
            }
            Ok(other) => debug!(?other, "ignoring unrelated message"),
            Err(_) => {
                return Err(CliError::new(
                    TIMEOUT,
                    format!("no reply within {timeout:?}"),
                ))
            }
        }
    }
}

fn parse_args_json(input: &str) -> CliResult<Vec<Value>> {
    let json: serde_json::Value = serde_json::from_str(input)
        .map_err(|err| CliError::new(USAGE, format!("--args is not valid JSON: {err}")))?;
    match Value::from_json(json) {
        Value::Array(items) => Ok(items),
        _ => Err(CliError::new(USAGE, "--args must be a JSON array")),
    }
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn parse_args_accepts_json_array() {
        let args = parse_args_json(r#"[1, "two", null]"#).unwrap();
        assert_eq!(args, vec![1.into(), "two".into(), Value::Null]);
    }

    #[test]
    fn parse_args_rejects_non_arrays() {
        assert!(parse_args_json(r#"{"not": "array"}"#).is_err());
        assert!(parse_args_json("not json").is_err());
    }
}
