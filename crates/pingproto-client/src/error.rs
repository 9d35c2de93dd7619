/// Errors that can occur in a client session.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] pingproto_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] pingproto_frame::FrameError),

    /// Message construction or decode error.
    #[error("message error: {0}")]
    Message(#[from] pingproto_messages::MessageError),

    /// The bounded handshake exhausted its attempts.
    #[error("handshake gave up after {attempts} attempts")]
    HandshakeTimeout { attempts: u32 },

    /// The background writer thread is no longer running.
    #[error("writer thread is no longer running")]
    WriterClosed,
}

pub type Result<T> = std::result::Result<T, ClientError>;
