//! Host command routing: envelopes in, runtime commands out.

use serde_json::Value;
use tokio::sync::broadcast;

use crate::controller::{Command, Snapshot};
use crate::error::{ClientError, Result};
use crate::host::contract::{
    CommandEnvelope, CommandName, ContractError, EventEnvelope, PROTOCOL_VERSION, ResponseEnvelope,
};
use crate::navigator::{NavKey, Region};
use crate::query::SearchMode;
use crate::runtime::{Reply, RuntimeHandle};

/// Translates host envelopes into runtime commands and snapshots back into
/// envelopes.
#[derive(Clone)]
pub struct HostCommandClient {
    runtime: RuntimeHandle,
}

impl HostCommandClient {
    #[must_use]
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    /// Handle one command envelope.
    ///
    /// Contract violations (bad version, missing payload fields) come back as
    /// error responses carrying the caller's `request_id`. `Err` means the
    /// runtime itself is gone.
    pub async fn send(&self, envelope: CommandEnvelope) -> Result<ResponseEnvelope> {
        if let Err(e) = envelope.validate() {
            tracing::warn!(request_id = %envelope.request_id, error = %e, "rejected host command");
            return Ok(ResponseEnvelope::error(envelope.request_id, e.to_string()));
        }

        match self.route(&envelope).await {
            Ok(payload) => Ok(ResponseEnvelope::ok(envelope.request_id, payload)),
            Err(ClientError::Contract(message)) => {
                tracing::warn!(request_id = %envelope.request_id, %message, "invalid host command");
                Ok(ResponseEnvelope::error(envelope.request_id, message))
            }
            Err(e) => Err(e),
        }
    }

    /// Snapshots published after asynchronous transitions.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<Snapshot> {
        self.runtime.subscribe()
    }

    async fn route(&self, envelope: &CommandEnvelope) -> Result<Value> {
        match envelope.command {
            CommandName::HostPing => Ok(serde_json::json!({"pong": true})),
            CommandName::HostVersion => Ok(serde_json::json!({
                "contract_version": PROTOCOL_VERSION,
                "version": env!("CARGO_PKG_VERSION"),
            })),
            name => {
                let command = parse_command(name, &envelope.payload)?;
                let reply = self.runtime.send(command).await?;
                reply_payload(name, &reply)
            }
        }
    }
}

/// Wrap a snapshot in a `state.changed` event envelope.
pub fn state_event(snapshot: &Snapshot) -> Result<EventEnvelope> {
    to_payload(snapshot).map(EventEnvelope::state_changed)
}

/// Map a command name and payload onto a runtime [`Command`].
pub fn parse_command(name: CommandName, payload: &Value) -> Result<Command> {
    let command = match name {
        CommandName::StateGet | CommandName::RuntimeStop => Command::Snapshot,
        CommandName::InputSet => Command::SetInput(require_str(name, payload, "text")?.to_owned()),
        CommandName::InputKey => Command::Key(NavKey::parse(require_str(name, payload, "key")?)),
        CommandName::InputClick => Command::Click {
            x: require_u16(name, payload, "x")?,
            y: require_u16(name, payload, "y")?,
        },
        CommandName::InputRegion => {
            let region: Region = serde_json::from_value(payload.clone())
                .map_err(|e| contract(ContractError::invalid_payload(name, e)))?;
            Command::SetRegion(region)
        }
        CommandName::SuggestionSelect => {
            Command::SelectSuggestion(require_usize(name, payload, "index")?)
        }
        CommandName::SearchSubmit => Command::Submit,
        CommandName::SearchMode => {
            let raw = require_str(name, payload, "mode")?;
            let mode = SearchMode::parse(raw).ok_or_else(|| {
                contract(ContractError::invalid_payload(
                    name,
                    format!("unsupported mode `{raw}` (expected or/and)"),
                ))
            })?;
            Command::SetMode(mode)
        }
        CommandName::SearchRetry => Command::Retry,
        CommandName::SearchReset => Command::Reset,
        CommandName::PageNext => Command::NextPage,
        CommandName::PagePrev => Command::PrevPage,
        CommandName::PageGoto => Command::GotoPage(require_usize(name, payload, "page")?),
        CommandName::HostPing | CommandName::HostVersion => {
            return Err(contract(ContractError::invalid_payload(
                name,
                "handled by the bridge, not the runtime",
            )));
        }
    };
    Ok(command)
}

fn reply_payload(name: CommandName, reply: &Reply) -> Result<Value> {
    let mut payload = to_payload(&reply.snapshot)?;
    if name == CommandName::InputKey {
        if let Value::Object(map) = &mut payload {
            map.insert(
                "prevent_default".to_owned(),
                Value::Bool(reply.prevent_default),
            );
        }
    }
    Ok(payload)
}

fn to_payload(snapshot: &Snapshot) -> Result<Value> {
    serde_json::to_value(snapshot)
        .map_err(|e| ClientError::Contract(format!("failed to serialize snapshot: {e}")))
}

fn contract(err: ContractError) -> ClientError {
    ClientError::Contract(err.to_string())
}

fn require_str<'a>(name: CommandName, payload: &'a Value, field: &str) -> Result<&'a str> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            contract(ContractError::invalid_payload(
                name,
                format!("requires payload.{field} (string)"),
            ))
        })
}

fn require_u64(name: CommandName, payload: &Value, field: &str) -> Result<u64> {
    payload.get(field).and_then(Value::as_u64).ok_or_else(|| {
        contract(ContractError::invalid_payload(
            name,
            format!("requires payload.{field} (non-negative integer)"),
        ))
    })
}

fn require_u16(name: CommandName, payload: &Value, field: &str) -> Result<u16> {
    let raw = require_u64(name, payload, field)?;
    u16::try_from(raw).map_err(|_| {
        contract(ContractError::invalid_payload(
            name,
            format!("payload.{field} out of range: {raw}"),
        ))
    })
}

fn require_usize(name: CommandName, payload: &Value, field: &str) -> Result<usize> {
    let raw = require_u64(name, payload, field)?;
    usize::try_from(raw).map_err(|_| {
        contract(ContractError::invalid_payload(
            name,
            format!("payload.{field} out of range: {raw}"),
        ))
    })
}
