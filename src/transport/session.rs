use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::{FrameError, SessionError};
use crate::transport::frame::{self, MAX_INBOUND_PAYLOAD};

/// Lifecycle of one streaming connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Searching,
    Closing(u16),
    Closed,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Connecting => "connecting",
            SessionState::Open => "open",
            SessionState::Searching => "searching",
            SessionState::Closing(_) => "closing",
            SessionState::Closed => "closed",
        }
    }
}

/// Server side of an upgraded connection.
///
/// Connecting -> Open once the upgrade is done, Open -> Searching after the
/// request frame, then Closing(code) -> Closed on [`StreamSession::close`].
pub struct StreamSession<S> {
    io: S,
    state: SessionState,
    max_request: usize,
}

impl<S> StreamSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(io: S) -> Self {
        Self {
            io,
            state: SessionState::Connecting,
            max_request: MAX_INBOUND_PAYLOAD,
        }
    }

    pub fn with_request_limit(mut self, max_request: usize) -> Self {
        self.max_request = max_request;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Marks the upgrade as complete.
    pub fn open(&mut self) -> Result<(), SessionError> {
        self.require(&[SessionState::Connecting], "open")?;
        self.state = SessionState::Open;
        Ok(())
    }

    /// Reads the single request frame as UTF-8 text.
    pub async fn read_request(&mut self) -> Result<String, SessionError> {
        self.require(&[SessionState::Open], "read a request")?;
        let text = frame::read_frame(&mut self.io, self.max_request)
            .await?
            .into_text()?;
        self.state = SessionState::Searching;
        Ok(text)
    }

    pub async fn send_text(&mut self, text: &str) -> Result<(), SessionError> {
        self.require(&[SessionState::Open, SessionState::Searching], "send")?;
        let bytes = frame::encode_text(text.as_bytes())?;
        self.io.write_all(&bytes).await.map_err(FrameError::from)?;
        self.io.flush().await.map_err(FrameError::from)?;
        Ok(())
    }

    pub async fn send_json<T: Serialize>(&mut self, message: &T) -> Result<(), SessionError> {
        let text = serde_json::to_string(message)?;
        self.send_text(&text).await
    }

    /// Best-effort close: the close frame and shutdown may fail silently.
    pub async fn close(&mut self, code: u16) {
        if matches!(self.state, SessionState::Closed | SessionState::Closing(_)) {
            return;
        }
        self.state = SessionState::Closing(code);
        if let Err(e) = self.io.write_all(&frame::encode_close(code)).await {
            debug!(error = %e, code, "close frame not delivered");
        }
        let _ = self.io.flush().await;
        let _ = self.io.shutdown().await;
        self.state = SessionState::Closed;
    }

    fn require(&self, allowed: &[SessionState], action: &'static str) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                action,
                state: self.state.label(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeedMessage;
    use crate::transport::frame::{CLOSE_UNSUPPORTED, Opcode, encode_masked, read_frame};
    use tokio::io::{AsyncReadExt, duplex};

    const KEY: [u8; 4] = [1, 2, 3, 4];

    #[tokio::test]
    async fn request_then_messages_then_close() {
        let (server_io, mut client) = duplex(1 << 16);
        let mut session = StreamSession::new(server_io);
        assert_eq!(session.state(), SessionState::Connecting);
        session.open().unwrap();

        let request = encode_masked(Opcode::Text, br#"{"version":"1.21"}"#, KEY).unwrap();
        client.write_all(&request).await.unwrap();
        assert_eq!(session.read_request().await.unwrap(), r#"{"version":"1.21"}"#);
        assert_eq!(session.state(), SessionState::Searching);

        session.send_json(&SeedMessage { seed: -42 }).await.unwrap();
        session.close(1000).await;
        assert_eq!(session.state(), SessionState::Closed);

        let frame = read_frame(&mut client, 1024).await.unwrap();
        assert_eq!(frame.into_text().unwrap(), r#"{"seed":-42}"#);

        let mut close = [0u8; 4];
        client.read_exact(&mut close).await.unwrap();
        assert_eq!(close, [0x88, 0x02, 0x03, 0xE8]);
    }

    #[tokio::test]
    async fn actions_out_of_order_are_rejected() {
        let (server_io, _client) = duplex(1024);
        let mut session = StreamSession::new(server_io);

        let err = session.read_request().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidState { state: "connecting", .. }
        ));
        assert!(session.send_text("x").await.is_err());

        session.open().unwrap();
        assert!(session.open().is_err());
    }

    #[tokio::test]
    async fn oversized_request_frame_is_refused() {
        let (server_io, mut client) = duplex(1 << 16);
        let mut session = StreamSession::new(server_io).with_request_limit(16);
        session.open().unwrap();

        let request = encode_masked(Opcode::Text, &[b'a'; 32], KEY).unwrap();
        client.write_all(&request).await.unwrap();
        let err = session.read_request().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Frame(FrameError::PayloadTooLarge { len: 32, max: 16 })
        ));
        assert_eq!(session.state(), SessionState::Open);
    }

    #[tokio::test]
    async fn close_survives_a_vanished_peer() {
        let (server_io, client) = duplex(64);
        drop(client);
        let mut session = StreamSession::new(server_io);
        session.open().unwrap();
        session.close(CLOSE_UNSUPPORTED).await;
        assert_eq!(session.state(), SessionState::Closed);

        // second close is a no-op
        session.close(1000).await;
        assert_eq!(session.state(), SessionState::Closed);
    }
}
