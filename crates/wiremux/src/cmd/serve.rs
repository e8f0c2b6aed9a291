use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};
use wiremux_buffer::ReadBuffer;
use wiremux_mux::{Channel, Multiplexer};
use wiremux_pipe::uds::UdsEndpoint;
use wiremux_pipe::{pump, PacketReader, SharedWriter};
use wiremux_rpc::{ErrorPayload, RemoteError, RpcMessage};
use wiremux_value::{Value, ValueCodec};

use crate::cmd::ServeArgs;
use crate::exit::{pipe_error, CliError, CliResult, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: ServeArgs, _format: OutputFormat) -> CliResult<i32> {
    let endpoint = UdsEndpoint::bind(&args.path).map_err(|err| pipe_error("bind failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    while running.load(Ordering::SeqCst) {
        let stream = match endpoint.accept() {
            Ok(stream) => stream,
            Err(err) => return Err(pipe_error("accept failed", err)),
        };

        info!("peer connected");
        if let Err(err) = serve_connection(stream) {
            warn!(%err, "connection ended with error");
        }
        info!("peer disconnected");

        if args.once {
            break;
        }
    }

    Ok(SUCCESS)
}

fn serve_connection(stream: std::os::unix::net::UnixStream) -> wiremux_pipe::Result<()> {
    let write_stream = stream.try_clone()?;
    let mux = Multiplexer::new(Arc::new(SharedWriter::new(write_stream)));
    let codec = Arc::new(ValueCodec::new());

    let handler_codec = Arc::clone(&codec);
    mux.channel_opened().subscribe(move |channel: Channel| {
        debug!(id = %channel.id(), "serving channel");
        let codec = Arc::clone(&handler_codec);
        let reply_channel = channel.clone();
        channel.messages().subscribe(move |mut buf: ReadBuffer| {
            handle_message(&codec, &reply_channel, buf.read_rest());
        });
    });

    pump(PacketReader::new(stream), &mux)
}

fn handle_message(codec: &ValueCodec, channel: &Channel, frame: Bytes) {
    match RpcMessage::decode(codec, frame) {
        Ok(RpcMessage::Request { id, method, args }) => {
            let message = match dispatch(&method, &args) {
                Ok(result) => RpcMessage::Reply { id, result },
                Err(err) => RpcMessage::ReplyError {
                    id,
                    error: ErrorPayload::Remote(err),
                },
            };

            let mut out = channel.write_buffer();
            match message.encode(codec, &mut out) {
                Ok(()) => {
                    if let Err(err) = out.commit() {
                        warn!(%err, "reply send failed");
                    }
                }
                Err(err) => warn!(%err, "reply encode failed"),
            }
        }
        Ok(RpcMessage::Notification { method, .. }) => {
            debug!(method = %method, "notification received");
        }
        Ok(RpcMessage::Cancel { id }) => debug!(id, "cancel received"),
        Ok(other) => debug!(?other, "ignoring client-bound message"),
        Err(err) => warn!(%err, "undecodable rpc frame"),
    }
}

fn dispatch(method: &str, args: &[Value]) -> Result<Value, RemoteError> {
    match method {
        "add" => {
            let mut sum = 0.0f64;
            for arg in args {
                match arg.as_f64() {
                    Some(n) => sum += n,
                    None => {
                        return Err(RemoteError::new(
                            "TypeError",
                            "add expects numeric arguments",
                        ))
                    }
                }
            }
            Ok(Value::Number(sum))
        }
        _ => Ok(Value::Array(args.to_vec())),
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
