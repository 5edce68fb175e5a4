use crate::shared::frame::Frame;

#[derive(Debug, thiserror::Error)]
#[error("Could not decode image: {0}")]
pub struct DecodeError(pub String);

/// Turns encoded image bytes (JPEG, PNG) into an RGB frame.
pub trait ImageDecoder: Send {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, DecodeError>;
}
