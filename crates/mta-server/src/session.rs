use std::time::Duration;

use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::timeout;
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing::{debug, info};

use mta_oblivious::mta::{AliceInput, MtaBob, MtaError};
use mta_wire::codec::{decode_message, encode_message, framed};
use mta_wire::convert::{bob_messages, bob_setup};
use mta_wire::proto::{AliceMessages, CorrelationDelta, MtaResult};
use mta_wire::WireError;

use crate::config::ServerConfig;

/// How long a session waits for the peer's next frame. Expiry closes
/// the session; it never corrupts protocol state.
pub const READ_DEADLINE: Duration = Duration::from_secs(30);

/// Per-connection protocol progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// Waiting for the opening `CorrelationDelta`
    WaitingForCorrelationDelta,
    /// `BobSetup` sent, waiting for `AliceMessages`
    WaitingForAliceMessages,
    /// Final `BobMessages` sent
    ProtocolComplete,
}

/// Session errors. All of them are terminal: the connection is dropped
/// without sending anything further.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Transport failure, including frame-size violations
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
    /// Peer hung up mid-protocol
    #[error("peer closed the connection in state {0:?}")]
    PeerClosed(ProtocolState),
    /// Peer sent nothing before the read deadline
    #[error("read deadline expired in state {0:?}")]
    Deadline(ProtocolState),
    /// Malformed or out-of-sequence message
    #[error(transparent)]
    Wire(#[from] WireError),
    /// Cryptographic failure while running the conversion
    #[error(transparent)]
    Mta(#[from] MtaError),
}

/// One protocol execution over one connection.
///
/// The session owns its transport and all per-run secret state; both
/// are released (and the secrets wiped) when it is dropped, whether the
/// run completed or not.
pub struct Session<T> {
    framed: Framed<T, LengthDelimitedCodec>,
    y_share: u32,
    public_key: Vec<u8>,
    state: ProtocolState,
}

impl<T: AsyncRead + AsyncWrite + Unpin> Session<T> {
    /// Wrap a fresh connection.
    pub fn new(io: T, config: &ServerConfig) -> Self {
        Session {
            framed: framed(io),
            y_share: config.y_share,
            public_key: config.public_key.clone(),
            state: ProtocolState::WaitingForCorrelationDelta,
        }
    }

    /// Drive the state machine to completion: receive the correlation
    /// delta, answer with the COT setup, receive Alice's payload,
    /// answer with Bob's shares.
    pub async fn run(mut self) -> Result<MtaResult, SessionError> {
        let frame = self.recv().await?;
        let delta: CorrelationDelta = decode_message(&frame)?;
        debug!(delta = delta.delta, "received correlation delta");

        // thread_rng is not Send, so borrow it per draw instead of
        // holding it across suspension points
        let (bob, setup) = MtaBob::new(self.y_share, delta.delta, &mut rand::thread_rng())?;
        self.framed
            .send(encode_message(&bob_setup(&setup, &self.public_key)))
            .await?;
        self.state = ProtocolState::WaitingForAliceMessages;

        let frame = self.recv().await?;
        let alice: AliceMessages = decode_message(&frame)?;
        let input = AliceInput::try_from(&alice)?;
        debug!(masked_share = input.masked_share, "received alice messages");

        let (bob, _) = bob.prepare(&mut rand::thread_rng());
        let output = bob.execute(&input)?;

        self.framed
            .send(encode_message(&bob_messages(&output)))
            .await?;
        self.state = ProtocolState::ProtocolComplete;

        info!(
            y_share = self.y_share,
            additive_share = output.additive_share,
            correlation_check = output.correlation_check,
            "protocol complete"
        );

        Ok(MtaResult {
            success: true,
            additive_share: output.additive_share,
            error_message: String::new(),
        })
    }

    async fn recv(&mut self) -> Result<BytesMut, SessionError> {
        match timeout(READ_DEADLINE, self.framed.next()).await {
            Err(_) => Err(SessionError::Deadline(self.state)),
            Ok(None) => Err(SessionError::PeerClosed(self.state)),
            Ok(Some(frame)) => Ok(frame?),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::array;

    use k256::{NonZeroScalar, ProjectivePoint};
    use tokio::io::AsyncWriteExt;

    use mta_oblivious::params::{BATCH_SIZE, PAD_BYTES, POINT_BYTES};
    use mta_oblivious::point::{decode_point, encode_point, x_coordinate, xor_pad};
    use mta_wire::proto::{BobMessages, BobSetup};

    use crate::config::placeholder_public_key;

    use super::*;

    fn test_config(y_share: u32) -> ServerConfig {
        ServerConfig {
            port: 0,
            y_share,
            public_key: placeholder_public_key(),
        }
    }

    fn pad_u32(value: u32) -> [u8; PAD_BYTES] {
        let mut out = [0u8; PAD_BYTES];
        out[..4].copy_from_slice(&value.to_le_bytes());
        out
    }

    fn weighted_sum(us: &[u32; BATCH_SIZE]) -> u32 {
        us.iter()
            .enumerate()
            .fold(0u32, |acc, (i, u)| acc.wrapping_add(u << i))
    }

    fn alice_reply(
        x: u32,
        masked_share: u32,
        us: &[u32; BATCH_SIZE],
        setup: &BobSetup,
    ) -> AliceMessages {
        let mut rng = rand::thread_rng();

        let mut ot_points = Vec::with_capacity(BATCH_SIZE);
        let mut encrypted_shares = Vec::with_capacity(2 * BATCH_SIZE);

        for i in 0..BATCH_SIZE {
            let a = NonZeroScalar::random(&mut rng);
            ot_points.push(
                encode_point(&(ProjectivePoint::GENERATOR * *a))
                    .unwrap()
                    .to_vec(),
            );

            let point_b = decode_point(&setup.ot_messages[i]).unwrap();
            let key = x_coordinate(&(point_b * *a)).unwrap();

            encrypted_shares.push(xor_pad(&pad_u32(us[i]), &key).to_vec());
            encrypted_shares.push(xor_pad(&pad_u32(us[i].wrapping_add(x)), &key).to_vec());
        }

        AliceMessages {
            masked_share,
            ot_choices: (0..BATCH_SIZE).map(|i| (x >> i) & 1 == 1).collect(),
            encrypted_shares,
            ot_points,
        }
    }

    #[tokio::test]
    async fn end_to_end_protocol() {
        let x = 7u32;
        let y = 11u32;
        let delta = 11u32;
        let alpha = 0xA5A5_A5A5u32;
        let us: [u32; BATCH_SIZE] = array::from_fn(|i| i as u32 + 1);

        let (client_io, server_io) = tokio::io::duplex(16 * 1024);
        let server = tokio::spawn(Session::new(server_io, &test_config(y)).run());

        let mut client = framed(client_io);
        client
            .send(encode_message(&CorrelationDelta { delta }))
            .await
            .unwrap();

        let frame = client.next().await.unwrap().unwrap();
        let setup: BobSetup = decode_message(&frame).unwrap();

        assert!(setup.success);
        assert_eq!(setup.num_ot_instances, 32);
        assert_eq!(setup.ot_messages.len(), BATCH_SIZE);
        assert!(setup
            .ot_messages
            .iter()
            .all(|p| p.len() == POINT_BYTES && p[0] == 0x04));
        assert_eq!(setup.public_key, placeholder_public_key());

        let reply = alice_reply(x, x.wrapping_mul(alpha), &us, &setup);
        client.send(encode_message(&reply)).await.unwrap();

        let frame = client.next().await.unwrap().unwrap();
        let messages: BobMessages = decode_message(&frame).unwrap();
        assert!(messages.success);
        assert!(messages.ot_responses.is_empty());
        assert!(messages.encrypted_result.is_empty());

        let result = server.await.unwrap().unwrap();
        assert!(result.success);
        assert_eq!(
            messages.correlation_check,
            y.wrapping_add(result.additive_share) ^ delta
        );
    }

    #[tokio::test]
    async fn additive_share_matches_cot_sum() {
        // with a zero masked share the beta term vanishes and Bob's
        // additive share is exactly V = U + x * y
        let x = 0x10000u32;
        let y = 0x10000u32;
        let us: [u32; BATCH_SIZE] = array::from_fn(|i| (i as u32).wrapping_mul(0x0101_0101));

        let (client_io, server_io) = tokio::io::duplex(16 * 1024);
        let server = tokio::spawn(Session::new(server_io, &test_config(y)).run());

        let mut client = framed(client_io);
        client
            .send(encode_message(&CorrelationDelta { delta: y }))
            .await
            .unwrap();

        let frame = client.next().await.unwrap().unwrap();
        let setup: BobSetup = decode_message(&frame).unwrap();

        client
            .send(encode_message(&alice_reply(x, 0, &us, &setup)))
            .await
            .unwrap();

        let frame = client.next().await.unwrap().unwrap();
        let _: BobMessages = decode_message(&frame).unwrap();

        let result = server.await.unwrap().unwrap();

        // x * y == 2^32 wraps to zero, leaving only the weighted U sum
        assert_eq!(result.additive_share, weighted_sum(&us));
    }

    #[tokio::test]
    async fn invalid_point_closes_session() {
        let y = 11u32;
        let us = [1u32; BATCH_SIZE];

        let (client_io, server_io) = tokio::io::duplex(16 * 1024);
        let server = tokio::spawn(Session::new(server_io, &test_config(y)).run());

        let mut client = framed(client_io);
        client
            .send(encode_message(&CorrelationDelta { delta: y }))
            .await
            .unwrap();

        let frame = client.next().await.unwrap().unwrap();
        let setup: BobSetup = decode_message(&frame).unwrap();

        let mut reply = alice_reply(7, 1, &us, &setup);
        reply.ot_points[0][0] = 0x02;
        client.send(encode_message(&reply)).await.unwrap();

        assert!(client.next().await.is_none());
        assert!(matches!(
            server.await.unwrap(),
            Err(SessionError::Mta(_))
        ));
    }

    #[tokio::test]
    async fn repeated_delta_closes_session() {
        let (client_io, server_io) = tokio::io::duplex(16 * 1024);
        let server = tokio::spawn(Session::new(server_io, &test_config(11)).run());

        let mut client = framed(client_io);
        client
            .send(encode_message(&CorrelationDelta { delta: 11 }))
            .await
            .unwrap();

        let frame = client.next().await.unwrap().unwrap();
        let _: BobSetup = decode_message(&frame).unwrap();

        // a second delta where AliceMessages is expected
        client
            .send(encode_message(&CorrelationDelta { delta: 11 }))
            .await
            .unwrap();

        assert!(client.next().await.is_none());
        assert!(matches!(
            server.await.unwrap(),
            Err(SessionError::Wire(WireError::InvalidCount { .. }))
        ));
    }

    #[tokio::test]
    async fn oversized_frame_closes_session() {
        let (mut client_io, server_io) = tokio::io::duplex(64);
        let server = tokio::spawn(Session::new(server_io, &test_config(11)).run());

        client_io
            .write_all(&u32::MAX.to_le_bytes())
            .await
            .unwrap();

        assert!(matches!(
            server.await.unwrap(),
            Err(SessionError::Io(_))
        ));
    }

    #[tokio::test]
    async fn peer_hangup_closes_session() {
        let (client_io, server_io) = tokio::io::duplex(64);
        let server = tokio::spawn(Session::new(server_io, &test_config(11)).run());

        drop(client_io);

        assert!(matches!(
            server.await.unwrap(),
            Err(SessionError::PeerClosed(
                ProtocolState::WaitingForCorrelationDelta
            ))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn read_deadline_expires() {
        let (client_io, server_io) = tokio::io::duplex(64);
        let server = tokio::spawn(Session::new(server_io, &test_config(11)).run());

        // keep the client end open but silent
        let result = server.await.unwrap();
        drop(client_io);

        assert!(matches!(
            result,
            Err(SessionError::Deadline(
                ProtocolState::WaitingForCorrelationDelta
            ))
        ));
    }
}
