//! Length-prefixed framing: `size: u32 little-endian` followed by
//! `size` payload bytes. A frame announcing more than [`MAX_FRAME_BYTES`]
//! is rejected before any of its body is read.

use bytes::{Bytes, BytesMut};
use prost::Message;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::WireError;

/// Upper bound on a single frame payload.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// The frame codec shared by both directions of a connection.
pub fn codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .length_field_length(4)
        .little_endian()
        .max_frame_length(MAX_FRAME_BYTES)
        .new_codec()
}

/// Wrap a transport with the frame codec.
pub fn framed<T: AsyncRead + AsyncWrite>(io: T) -> Framed<T, LengthDelimitedCodec> {
    Framed::new(io, codec())
}

/// Encode a message into a frame payload.
pub fn encode_message<M: Message>(msg: &M) -> Bytes {
    Bytes::from(msg.encode_to_vec())
}

/// Decode a frame payload as a message of type `M`.
pub fn decode_message<M: Message + Default>(frame: &BytesMut) -> Result<M, WireError> {
    Ok(M::decode(frame.as_ref())?)
}

#[cfg(test)]
mod tests {
    use futures::{SinkExt, StreamExt};
    use tokio::io::AsyncWriteExt;

    use crate::proto::CorrelationDelta;

    use super::*;

    #[tokio::test]
    async fn frame_round_trip() {
        let (client, server) = tokio::io::duplex(4096);

        let mut client = framed(client);
        let mut server = framed(server);

        let msg = CorrelationDelta { delta: 77 };
        client.send(encode_message(&msg)).await.unwrap();

        let frame = server.next().await.unwrap().unwrap();
        let decoded: CorrelationDelta = decode_message(&frame).unwrap();

        assert_eq!(decoded, msg);
    }

    #[tokio::test]
    async fn empty_payload_round_trip() {
        let (client, server) = tokio::io::duplex(64);

        let mut client = framed(client);
        let mut server = framed(server);

        client.send(Bytes::new()).await.unwrap();

        let frame = server.next().await.unwrap().unwrap();
        assert!(frame.is_empty());
    }

    #[tokio::test]
    async fn oversized_frame_is_refused() {
        let (mut client, server) = tokio::io::duplex(64);

        let mut server = framed(server);

        // announce 4 GiB without sending a body
        client.write_all(&u32::MAX.to_le_bytes()).await.unwrap();

        assert!(server.next().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn short_read_is_not_a_frame() {
        let (mut client, server) = tokio::io::duplex(64);

        let mut server = framed(server);

        // announce 16 bytes, deliver 2, then hang up
        client.write_all(&16u32.to_le_bytes()).await.unwrap();
        client.write_all(&[0xAA, 0xBB]).await.unwrap();
        drop(client);

        assert!(matches!(server.next().await, Some(Err(_))));
    }
}
