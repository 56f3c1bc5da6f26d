//! Seam between the codec and a message transport.
//!
//! The crate ships no transport. Hosts implement [`MessageChannel`] over
//! whatever connection they own and hand inbound traffic back as a
//! [`Delivery`].

use thiserror::Error;

use crate::codable::{Decode, Encode};
use crate::codec::{TaggedDecoder, TaggedEncoder};
use crate::error::Error as CodecError;
use crate::value::TaggedValue;

/// Connection-level failures reported by a transport.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    #[error("connection interrupted")]
    ConnectionInterrupted,
    #[error("connection invalid")]
    ConnectionInvalid,
    #[error("peer termination imminent")]
    TerminationImminent,
}

/// One inbound message, or the reason the channel could not produce one.
pub type Delivery = Result<TaggedValue, ChannelError>;

/// Outbound half of a transport.
pub trait MessageChannel {
    fn send(&self, message: TaggedValue);
}

/// Failure turning channel traffic into typed values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MessageError {
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Encodes `value` and sends the resulting tree. Nothing is sent when
/// encoding fails.
pub fn send_encoded<C, T>(channel: &C, encoder: &TaggedEncoder, value: &T) -> Result<(), MessageError>
where
    C: MessageChannel + ?Sized,
    T: Encode + ?Sized,
{
    let message = encoder.encode(value)?;
    tracing::trace!(tag = %message.tag(), "sending encoded message");
    channel.send(message);
    Ok(())
}

pub fn decode_delivery<T: Decode>(decoder: &TaggedDecoder, delivery: Delivery) -> Result<T, MessageError> {
    let message = delivery?;
    Ok(decoder.decode(&message)?)
}
