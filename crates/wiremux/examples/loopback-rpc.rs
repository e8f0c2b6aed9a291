//! Loopback RPC example — two multiplexers over an in-memory pipe pair.
//!
//! Run with:
//!   cargo run --example loopback-rpc

use std::sync::Arc;
use std::time::Duration;

use wiremux::buffer::ReadBuffer;
use wiremux::mux::{Channel, Multiplexer};
use wiremux::pipe::loopback;
use wiremux::rpc::RpcMessage;
use wiremux::value::{Value, ValueCodec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (client_pipe, server_pipe) = loopback();
    let client = Multiplexer::new(client_pipe.sink());
    let server = Multiplexer::new(server_pipe.sink());

    // Server: answer "add" on any channel the client opens.
    let codec = Arc::new(ValueCodec::new());
    let server_codec = Arc::clone(&codec);
    server.channel_opened().subscribe(move |channel: Channel| {
        eprintln!("[server] channel opened: {}", channel.id());
        let codec = Arc::clone(&server_codec);
        let reply_channel = channel.clone();
        channel.messages().subscribe(move |mut buf: ReadBuffer| {
            let message = RpcMessage::decode(&codec, buf.read_rest()).expect("frame should parse");
            if let RpcMessage::Request { id, method, args } = message {
                eprintln!("[server] request {id}: {method}{args:?}");
                let sum: f64 = args.iter().filter_map(Value::as_f64).sum();
                let reply = RpcMessage::Reply {
                    id,
                    result: Value::Number(sum),
                };
                let mut out = reply_channel.write_buffer();
                reply.encode(&codec, &mut out).expect("reply should encode");
                out.commit().expect("reply should send");
            }
        });
    });

    // Client: open a channel and call add(1, 2).
    let request = client.open("rpc")?;
    drain(&client_pipe, &client, &server_pipe, &server);
    let channel = request.wait_timeout(Duration::from_secs(1))?;

    let client_codec = Arc::clone(&codec);
    channel.messages().subscribe(move |mut buf: ReadBuffer| {
        let message =
            RpcMessage::decode(&client_codec, buf.read_rest()).expect("frame should parse");
        if let RpcMessage::Reply { id, result } = message {
            eprintln!("[client] reply {id}: {result:?}");
        }
    });

    let call = RpcMessage::Request {
        id: 1,
        method: "add".to_string(),
        args: vec![1.into(), 2.into()],
    };
    let mut out = channel.write_buffer();
    call.encode(&codec, &mut out)?;
    out.commit()?;
    drain(&client_pipe, &client, &server_pipe, &server);

    channel.close()?;
    drain(&client_pipe, &client, &server_pipe, &server);
    Ok(())
}

fn drain(
    a_pipe: &wiremux::pipe::LoopbackPipe,
    a: &Multiplexer,
    b_pipe: &wiremux::pipe::LoopbackPipe,
    b: &Multiplexer,
) {
    while a_pipe.drain_into(a) + b_pipe.drain_into(b) > 0 {}
}
