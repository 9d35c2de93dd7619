use std::io::Read;

use bytes::BytesMut;
use pingproto_frame::{is_complete_and_valid, FrameError, FrameHeader, CHECKSUM_SIZE, HEADER_SIZE};
use pingproto_messages::common::{GeneralRequest, ProtocolVersion};
use pingproto_messages::Version;
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::writer::WriterHandle;

/// Total wire size of a ProtocolVersion frame.
pub(crate) const VERSION_FRAME_SIZE: usize =
    HEADER_SIZE + ProtocolVersion::PAYLOAD_SIZE + CHECKSUM_SIZE;

/// Handshake behavior knobs.
///
/// The protocol has no negotiation beyond the version exchange; the only
/// knob is how long to insist on it. The default `max_attempts: None`
/// retries forever, matching the bring-up behavior of the vendor tooling —
/// a silent peer then blocks the session indefinitely, by choice rather
/// than by accident. Set a bound to surface [`ClientError::HandshakeTimeout`]
/// instead.
#[derive(Debug, Clone, Default)]
pub struct HandshakeConfig {
    /// Give up after this many failed attempts. `None` retries forever.
    pub max_attempts: Option<u32>,
}

/// Request the peer's protocol version and wait for a valid reply.
///
/// Each attempt sends a general request for message ID 5 and reads exactly
/// one ProtocolVersion-sized chunk. Anything that is not a checksum-correct
/// ProtocolVersion frame restarts the attempt; transport errors are fatal.
pub(crate) fn await_protocol_version<R: Read>(
    stream: &mut R,
    writer: &WriterHandle,
    config: &HandshakeConfig,
) -> Result<Version> {
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;

        let mut payload = BytesMut::new();
        GeneralRequest::new(ProtocolVersion::ID).encode_payload(&mut payload);
        writer.send_detached(GeneralRequest::ID, payload)?;

        let mut reply = [0u8; VERSION_FRAME_SIZE];
        stream.read_exact(&mut reply).map_err(FrameError::Io)?;

        match parse_version_reply(&reply) {
            Some(version) => {
                info!(%version, "protocol version negotiated");
                return Ok(version);
            }
            None => debug!(attempts, "invalid protocol version reply, restarting handshake"),
        }

        if let Some(max) = config.max_attempts {
            if attempts >= max {
                return Err(ClientError::HandshakeTimeout { attempts });
            }
        }
    }
}

/// Accept the reply only if it is a complete, checksum-correct
/// ProtocolVersion frame.
fn parse_version_reply(bytes: &[u8]) -> Option<Version> {
    let header = FrameHeader::parse(bytes).ok()?;
    if header.message_id != ProtocolVersion::ID
        || header.payload_length as usize != ProtocolVersion::PAYLOAD_SIZE
    {
        return None;
    }
    if !is_complete_and_valid(&header, bytes) {
        return None;
    }
    ProtocolVersion::decode(&bytes[HEADER_SIZE..HEADER_SIZE + ProtocolVersion::PAYLOAD_SIZE])
        .ok()
        .map(|msg| msg.version)
}

#[cfg(test)]
mod tests {
    use pingproto_messages::Message;

    use super::*;

    fn version_frame() -> BytesMut {
        Message::ProtocolVersion(ProtocolVersion::new(Version {
            major: 1,
            minor: 0,
            patch: 0,
            reserved: 0,
        }))
        .to_frame_bytes()
        .unwrap()
    }

    #[test]
    fn version_frame_is_fourteen_bytes() {
        assert_eq!(version_frame().len(), VERSION_FRAME_SIZE);
    }

    #[test]
    fn valid_reply_parses() {
        let wire = version_frame();
        let version = parse_version_reply(&wire).unwrap();
        assert_eq!(version.major, 1);
    }

    #[test]
    fn bad_magic_rejected() {
        let mut wire = version_frame();
        wire[0] = b'X';
        assert!(parse_version_reply(&wire).is_none());
    }

    #[test]
    fn wrong_message_id_rejected() {
        let wire = Message::GeneralRequest(GeneralRequest::new(5))
            .to_frame_bytes()
            .unwrap();
        // Same total size as a version frame, but the wrong catalog ID.
        assert_eq!(wire.len(), 12);
        let mut padded = BytesMut::from(wire.as_ref());
        padded.extend_from_slice(&[0, 0]);
        assert!(parse_version_reply(&padded).is_none());
    }

    #[test]
    fn corrupted_checksum_rejected() {
        let mut wire = version_frame();
        let last = wire.len() - 1;
        wire[last] ^= 0xFF;
        assert!(parse_version_reply(&wire).is_none());
    }
}
