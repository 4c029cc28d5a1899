//! Response structures for Slack Web API methods.
//!
//! Every Web API response carries an `ok` flag. When it is false, an `error`
//! code replaces the method payload, so the payload is only deserialized after
//! the flag has been checked (see [`parse_response`]).

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::slack::SlackError;

/// Payload of `auth.test`.
#[derive(Deserialize, Debug)]
pub struct AuthTestResponse {
    /// User id of the token owner.
    pub user_id: String,
    /// User name of the token owner.
    pub user: String,
}

/// Payload of `rtm.connect`.
#[derive(Deserialize, Debug)]
pub struct RtmConnectResponse {
    /// WebSocket URL of the real-time session, valid for 30 seconds.
    pub url: String,
}

/// Payload of `chat.postMessage`.
#[derive(Deserialize, Debug)]
pub struct PostMessageResponse {
    /// Id of the channel the message landed in.
    pub channel: String,
    /// Timestamp identifying the posted message.
    pub ts: String,
}

/// Checks the `ok` flag of a Web API response and extracts its payload.
///
/// # Errors
///
/// - [`SlackError::Api`] with the `error` code when `ok` is not true
/// - [`SlackError::Json`] when the payload does not match `T`
pub fn parse_response<T: DeserializeOwned>(body: Value) -> Result<T, SlackError> {
    if body["ok"].as_bool() != Some(true) {
        let code = body["error"].as_str().unwrap_or("unknown_error");
        return Err(SlackError::Api(code.to_owned()));
    }

    Ok(serde_json::from_value(body)?)
}
