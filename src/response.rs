//! Messages received from a device.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Successful answer to a command.
///
/// Most setters answer `["ok"]`; queries such as `get_prop` answer with
/// their values in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub id: u64,
    pub result: Vec<Value>,
}

impl CommandResult {
    /// Whether the device answered with the plain `"ok"` acknowledgement.
    pub fn is_ok(&self) -> bool {
        matches!(self.result.as_slice(), [Value::String(s)] if s == "ok")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct DeviceError {
    pub code: i64,
    pub message: String,
}

/// One line read from a device connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum Message {
    Result(CommandResult),
    Error { id: u64, error: DeviceError },
    Notification {
        method: String,
        params: Map<String, Value>,
    },
}

impl Message {
    pub(crate) fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// The correlation id, if this message answers a request.
    pub(crate) fn id(&self) -> Option<u64> {
        match self {
            Message::Result(r) => Some(r.id),
            Message::Error { id, .. } => Some(*id),
            Message::Notification { .. } => None,
        }
    }
}
