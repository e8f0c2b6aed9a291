use std::io::Read;

use tracing::{debug, warn};
use wiremux_mux::Multiplexer;

use crate::error::PipeError;
use crate::reader::PacketReader;

/// Drive a multiplexer from a packet stream until the pipe ends.
///
/// Each inbound packet is dispatched to the multiplexer; dispatch failures
/// are framing or protocol errors on a single frame and do not stop the
/// pump. Clean EOF cascades `handle_closed`; an I/O error is fanned out via
/// `handle_error` before the close cascade, and returned.
pub fn pump<R: Read>(mut reader: PacketReader<R>, mux: &Multiplexer) -> crate::error::Result<()> {
    loop {
        match reader.read_frame() {
            Ok(frame) => {
                if let Err(err) = mux.handle_frame(frame) {
                    warn!(%err, "dropping undispatchable frame");
                }
            }
            Err(PipeError::ConnectionClosed) => {
                debug!("pipe reached EOF");
                mux.handle_closed();
                return Ok(());
            }
            Err(PipeError::Io(err)) => {
                let returned = std::io::Error::new(err.kind(), err.to_string());
                mux.handle_error(err);
                mux.handle_closed();
                return Err(PipeError::Io(returned));
            }
            Err(err) => {
                mux.handle_closed();
                return Err(err);
            }
        }
    }
}
