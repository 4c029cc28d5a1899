//! Real-time session loop.
//!
//! This module provides the [`SlackSync`] struct, which keeps a real-time
//! messaging session open and turns its frames into [`EventHandler`] calls.
//!
//! # Overview
//!
//! One session goes through these steps:
//! 1. `rtm.connect` gives a short-lived WebSocket URL
//! 2. The WebSocket is opened and frames are read one at a time
//! 3. `hello` marks the session as connected, `message` frames are forwarded
//! 4. `goodbye`, a close frame or a socket failure ends the session
//!
//! When reconnection is enabled, a new session is opened after a delay that
//! doubles on every failed attempt, from 2 seconds up to 5 minutes.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use serde::Deserialize;
use tokio::time::{Duration, sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::slack::{EventHandler, IncomingMessage, SlackError, requester::Requester};

/// Delay before the first reconnection attempt.
const INITIAL_BACKOFF: Duration = Duration::from_secs(2);
/// Upper bound of the reconnection delay.
const MAX_BACKOFF: Duration = Duration::from_secs(300);

/// Event frames of the real-time session.
///
/// Only the frames the bot reacts to are modelled, anything else falls into
/// [`RtmFrame::Other`]. Frames without a `type`, such as acknowledgements of
/// sent messages, fail to deserialize and are skipped.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RtmFrame {
    Hello,
    Message {
        channel: String,
        text: Option<String>,
        user: Option<String>,
        subtype: Option<String>,
    },
    Goodbye,
    #[serde(other)]
    Other,
}

/// What the session loop does after a frame has been handled.
#[derive(Debug, PartialEq, Eq)]
enum FrameOutcome {
    Continue,
    Connected,
    Disconnect,
}

/// Manages the real-time session with Slack.
///
/// # Examples
///
/// ```no_run
/// let requester = Arc::new(SlackRequester::new("https://slack.com/api", "xoxb-token"));
/// let slack_sync = SlackSync::new(requester, true);
/// slack_sync.sync(&bot).await?;
/// ```
pub struct SlackSync<R: Requester> {
    /// Web API requester, used to open sessions
    requester: Arc<R>,
    /// Open a new session when the current one ends
    reconnect: bool,
}

impl<R: Requester> SlackSync<R> {
    /// Create a new [SlackSync]. No session is opened before [`SlackSync::sync`].
    pub fn new(requester: Arc<R>, reconnect: bool) -> Self {
        SlackSync {
            requester,
            reconnect,
        }
    }

    /// Runs real-time sessions and dispatches their events to `handler`.
    ///
    /// `on_disconnected` is only called for sessions that reached `hello`.
    ///
    /// # Returns
    ///
    /// Never returns while reconnection is enabled. Otherwise returns once the
    /// first session has ended.
    ///
    /// # Errors
    ///
    /// Without reconnection, returns the error that ended the session, if any.
    /// A rejected credential is returned right away, reconnection or not.
    pub async fn sync<H: EventHandler>(&self, handler: &H) -> Result<(), SlackError> {
        let mut delay = INITIAL_BACKOFF;

        loop {
            let mut connected = false;
            let result = self.run_session(handler, &mut connected).await;

            if let Err(e) = &result {
                error!("real-time session failed: {}", e);
            }

            if connected {
                handler.on_disconnected().await;
                delay = INITIAL_BACKOFF;
            }

            if let Err(e) = &result
                && !e.is_retryable()
            {
                error!("credential rejected by slack, giving up");
                return result;
            }

            if !self.reconnect {
                info!("real-time session ended, reconnection disabled");
                return result;
            }

            warn!("opening a new session in {}s", delay.as_secs());
            sleep(delay).await;
            delay = next_backoff(delay);
        }
    }

    /// Opens one session and reads its frames until it ends.
    ///
    /// `connected` is set as soon as the `hello` frame has been handled, so the
    /// caller knows about it even when the session ends with an error.
    async fn run_session<H: EventHandler>(
        &self,
        handler: &H,
        connected: &mut bool,
    ) -> Result<(), SlackError> {
        let session = self.requester.rtm_connect().await?;
        let (mut socket, _) = connect_async(session.url.as_str()).await?;
        info!("real-time socket opened");

        while let Some(frame) = socket.next().await {
            match frame? {
                Message::Text(text) => match handle_frame(&text, handler).await {
                    FrameOutcome::Continue => {}
                    FrameOutcome::Connected => *connected = true,
                    FrameOutcome::Disconnect => {
                        info!("slack said goodbye");
                        break;
                    }
                },
                // The pong reply is queued by the socket itself
                Message::Ping(_) => socket.flush().await?,
                Message::Close(frame) => {
                    info!("real-time socket closed: {:?}", frame);
                    break;
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Decodes a text frame and forwards it to the handler.
async fn handle_frame<H: EventHandler>(text: &str, handler: &H) -> FrameOutcome {
    let frame: RtmFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!("skip frame {}: {}", text, e);
            return FrameOutcome::Continue;
        }
    };

    match frame {
        RtmFrame::Hello => {
            info!("real-time session connected");
            handler.on_connected().await;
            FrameOutcome::Connected
        }
        RtmFrame::Message {
            channel,
            text: Some(text),
            user,
            subtype: None,
        } => {
            debug!("message from {:?} in {}", user, channel);
            handler
                .on_message(IncomingMessage {
                    text,
                    channel,
                    user,
                })
                .await;
            FrameOutcome::Continue
        }
        RtmFrame::Message { subtype, .. } => {
            debug!("skip message with subtype {:?}", subtype);
            FrameOutcome::Continue
        }
        RtmFrame::Goodbye => FrameOutcome::Disconnect,
        RtmFrame::Other => FrameOutcome::Continue,
    }
}

/// Doubles the reconnection delay, up to [`MAX_BACKOFF`].
fn next_backoff(delay: Duration) -> Duration {
    (delay * 2).min(MAX_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::{
        MockEventHandler, requester::MockRequester, response_structs::RtmConnectResponse,
    };
    use tokio::net::TcpListener;

    /// Serves one WebSocket connection sending `frames`, then closes it.
    async fn serve_frames(frames: Vec<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();
            for frame in frames {
                socket.send(Message::Text(frame.to_owned())).await.unwrap();
            }
            let _ = socket.close(None).await;
        });

        format!("ws://{}", address)
    }

    fn requester_for(url: String) -> Arc<MockRequester> {
        let mut mock_requester = MockRequester::new();
        mock_requester
            .expect_rtm_connect()
            .times(1)
            .returning(move || Ok(RtmConnectResponse { url: url.clone() }));
        Arc::new(mock_requester)
    }

    #[tokio::test]
    async fn test_handle_hello_frame() {
        let mut handler = MockEventHandler::new();
        handler.expect_on_connected().times(1).returning(|| ());

        let outcome = handle_frame(r#"{"type": "hello"}"#, &handler).await;
        assert_eq!(outcome, FrameOutcome::Connected);
    }

    #[tokio::test]
    async fn test_handle_message_frame() {
        let mut handler = MockEventHandler::new();
        handler
            .expect_on_message()
            .withf(|message| {
                message.text == "<@U1> ping"
                    && message.channel == "C1"
                    && message.user.as_deref() == Some("U2")
            })
            .times(1)
            .returning(|_| ());

        let frame = r#"{"type": "message", "channel": "C1", "user": "U2", "text": "<@U1> ping", "ts": "1.2"}"#;
        assert_eq!(handle_frame(frame, &handler).await, FrameOutcome::Continue);
    }

    #[tokio::test]
    async fn test_handle_message_with_subtype_is_skipped() {
        // No expectation: any handler call fails the test
        let handler = MockEventHandler::new();

        let frame = r#"{"type": "message", "subtype": "message_changed", "channel": "C1", "hidden": true}"#;
        assert_eq!(handle_frame(frame, &handler).await, FrameOutcome::Continue);
    }

    #[tokio::test]
    async fn test_handle_frames_without_event() {
        let handler = MockEventHandler::new();

        for frame in [
            r#"{"ok": true, "reply_to": 1, "ts": "1.2", "text": "hi"}"#,
            r#"{"type": "user_typing", "channel": "C1", "user": "U2"}"#,
            r#"{"type": "message", "text": "no channel"}"#,
            "not json",
        ] {
            assert_eq!(handle_frame(frame, &handler).await, FrameOutcome::Continue);
        }
    }

    #[tokio::test]
    async fn test_handle_goodbye_frame() {
        let handler = MockEventHandler::new();
        let outcome = handle_frame(r#"{"type": "goodbye"}"#, &handler).await;
        assert_eq!(outcome, FrameOutcome::Disconnect);
    }

    #[test]
    fn test_next_backoff() {
        assert_eq!(next_backoff(Duration::from_secs(2)), Duration::from_secs(4));
        assert_eq!(next_backoff(Duration::from_secs(128)), Duration::from_secs(256));
        assert_eq!(next_backoff(Duration::from_secs(256)), MAX_BACKOFF);
        assert_eq!(next_backoff(MAX_BACKOFF), MAX_BACKOFF);
    }

    #[tokio::test]
    async fn test_sync_session_events() {
        let url = serve_frames(vec![
            r#"{"type": "hello"}"#,
            r#"{"type": "message", "channel": "C1", "user": "U2", "text": "<@U1> help"}"#,
            r#"{"type": "goodbye"}"#,
        ])
        .await;

        let mut handler = MockEventHandler::new();
        handler.expect_on_connected().times(1).returning(|| ());
        handler
            .expect_on_message()
            .withf(|message| message.text == "<@U1> help")
            .times(1)
            .returning(|_| ());
        handler.expect_on_disconnected().times(1).returning(|| ());

        let slack_sync = SlackSync::new(requester_for(url), false);
        assert!(slack_sync.sync(&handler).await.is_ok());
    }

    #[tokio::test]
    async fn test_sync_closed_before_hello() {
        let url = serve_frames(vec![]).await;

        // Never connected, so no disconnect either
        let handler = MockEventHandler::new();

        let slack_sync = SlackSync::new(requester_for(url), false);
        assert!(slack_sync.sync(&handler).await.is_ok());
    }

    #[tokio::test]
    async fn test_sync_connect_error_without_reconnect() {
        let mut mock_requester = MockRequester::new();
        mock_requester
            .expect_rtm_connect()
            .times(1)
            .returning(|| Err(SlackError::Api("invalid_auth".to_owned())));

        let handler = MockEventHandler::new();

        let slack_sync = SlackSync::new(Arc::new(mock_requester), false);
        let result = slack_sync.sync(&handler).await;
        assert!(matches!(result, Err(SlackError::Api(code)) if code == "invalid_auth"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_stops_on_revoked_token() {
        let mut mock_requester = MockRequester::new();
        mock_requester
            .expect_rtm_connect()
            .times(1)
            .returning(|| Err(SlackError::Api("invalid_auth".to_owned())));

        let handler = MockEventHandler::new();

        let slack_sync = SlackSync::new(Arc::new(mock_requester), true);
        let result =
            tokio::time::timeout(Duration::from_secs(24 * 3600), slack_sync.sync(&handler)).await;
        assert!(matches!(result, Ok(Err(SlackError::Api(code))) if code == "invalid_auth"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_reconnects_with_backoff() {
        let mut mock_requester = MockRequester::new();
        // Attempts at 0s, 2s, 6s and 14s
        mock_requester
            .expect_rtm_connect()
            .times(4)
            .returning(|| Err(SlackError::Api("ratelimited".to_owned())));

        let handler = MockEventHandler::new();

        let slack_sync = SlackSync::new(Arc::new(mock_requester), true);
        let result = tokio::time::timeout(Duration::from_secs(20), slack_sync.sync(&handler)).await;
        assert!(result.is_err());
    }
}
