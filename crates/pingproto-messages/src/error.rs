/// Errors that can occur when building or decoding catalog messages.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// A setter-style constructor received a value outside its legal domain.
    #[error("{field} out of range ({value}, legal range {min}..={max})")]
    ValueOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// The payload is shorter than the message layout requires.
    #[error("payload too short for message {message_id} (need {expected} bytes, got {got})")]
    ShortPayload {
        message_id: u16,
        expected: usize,
        got: usize,
    },

    /// A variable-length message declares more trailing data than the
    /// payload actually carries.
    #[error(
        "embedded data length of message {message_id} overruns payload \
         (declared {declared}, available {available})"
    )]
    TruncatedData {
        message_id: u16,
        declared: usize,
        available: usize,
    },
}

pub type Result<T> = std::result::Result<T, MessageError>;
