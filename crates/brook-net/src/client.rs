//! Outbound connections: dial a peer, write one message, close (§4.6).
//!
//! Every wire message is the entire body of its own short-lived TCP
//! connection — there is no persistent peer session and no response read on
//! the same socket. A reply, if any, is a fresh outbound connection back to
//! the `from` address carried in the original payload.

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use brook_core::error::NetworkError;

use crate::protocol::NetworkMessage;

/// Dial `to`, write `msg`'s encoded bytes, and shut down the write half so
/// the peer's `read_to_end` sees EOF (§4.6 wire framing).
pub async fn send_message(to: &str, msg: &NetworkMessage) -> Result<(), NetworkError> {
    let mut stream = TcpStream::connect(to)
        .await
        .map_err(|e| NetworkError::DialFailed(e.to_string()))?;
    let bytes = msg.encode()?;
    stream
        .write_all(&bytes)
        .await
        .map_err(|e| NetworkError::DialFailed(e.to_string()))?;
    stream
        .shutdown()
        .await
        .map_err(|e| NetworkError::DialFailed(e.to_string()))?;
    Ok(())
}
