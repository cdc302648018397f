//! Wire types for the host protocol: one JSON object per line, commands in,
//! responses and events out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version carried in every envelope.
pub const PROTOCOL_VERSION: u32 = 1;

/// Event name published after every asynchronous state change.
pub const STATE_CHANGED_EVENT: &str = "state.changed";

macro_rules! host_commands {
    ($($variant:ident => $wire:literal,)+) => {
        /// Command set understood by the host bridge.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum CommandName {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl CommandName {
            /// Every command, in protocol order.
            pub const ALL: &'static [CommandName] = &[$(CommandName::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(CommandName::$variant => $wire,)+
                }
            }

            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                match raw {
                    $($wire => Some(CommandName::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

host_commands! {
    HostPing => "host.ping",
    HostVersion => "host.version",
    StateGet => "state.get",
    InputSet => "input.set",
    InputKey => "input.key",
    InputClick => "input.click",
    InputRegion => "input.region",
    SuggestionSelect => "suggestion.select",
    SearchSubmit => "search.submit",
    SearchMode => "search.mode",
    SearchRetry => "search.retry",
    SearchReset => "search.reset",
    PageNext => "page.next",
    PagePrev => "page.prev",
    PageGoto => "page.goto",
    RuntimeStop => "runtime.stop",
}

impl std::fmt::Display for CommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command sent by the front end. A missing `payload` reads as `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandEnvelope {
    pub v: u32,
    pub request_id: String,
    pub command: CommandName,
    #[serde(default)]
    pub payload: Value,
}

impl CommandEnvelope {
    /// Check the protocol version and request id before dispatch.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.v != PROTOCOL_VERSION {
            return Err(ContractError::UnsupportedVersion {
                found: self.v,
                expected: PROTOCOL_VERSION,
            });
        }
        if self.request_id.trim().is_empty() {
            return Err(ContractError::MissingRequestId);
        }
        Ok(())
    }
}

/// The answer to exactly one command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub v: u32,
    pub request_id: String,
    pub ok: bool,
    pub payload: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    #[must_use]
    pub fn ok(request_id: impl Into<String>, payload: Value) -> Self {
        Self {
            v: PROTOCOL_VERSION,
            request_id: request_id.into(),
            ok: true,
            payload,
            error: None,
        }
    }

    #[must_use]
    pub fn error(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            v: PROTOCOL_VERSION,
            request_id: request_id.into(),
            ok: false,
            payload: Value::Null,
            error: Some(message.into()),
        }
    }
}

/// An unsolicited notification, not tied to a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEnvelope {
    pub v: u32,
    pub event_id: String,
    pub event: String,
    pub payload: Value,
}

impl EventEnvelope {
    /// A `state.changed` event with a fresh random id.
    #[must_use]
    pub fn state_changed(payload: Value) -> Self {
        Self {
            v: PROTOCOL_VERSION,
            event_id: uuid::Uuid::new_v4().to_string(),
            event: STATE_CHANGED_EVENT.to_owned(),
            payload,
        }
    }
}

/// A command the bridge refuses to dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("unsupported protocol version {found}; expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("request_id cannot be empty")]
    MissingRequestId,

    #[error("{command}: {message}")]
    InvalidPayload {
        command: CommandName,
        message: String,
    },
}

impl ContractError {
    /// A command payload is missing a field or has the wrong shape.
    #[must_use]
    pub fn invalid_payload(command: CommandName, message: impl std::fmt::Display) -> Self {
        Self::InvalidPayload {
            command,
            message: message.to_string(),
        }
    }
}
