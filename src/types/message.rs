use crate::DataValue;
use crate::Error;
use crate::NodeId;

/// Consumer-facing change message produced by the notification pump.
///
/// Either a node and its new value, or an error describing why the change
/// record could not be resolved (e.g. an unknown client handle).
#[derive(Debug)]
pub enum DataChangeMessage {
    Change { node_id: NodeId, value: DataValue },
    Error(Error),
}

impl DataChangeMessage {
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            DataChangeMessage::Change { node_id, .. } => Some(node_id),
            DataChangeMessage::Error(_) => None,
        }
    }

    pub fn value(&self) -> Option<&DataValue> {
        match self {
            DataChangeMessage::Change { value, .. } => Some(value),
            DataChangeMessage::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            DataChangeMessage::Change { .. } => None,
            DataChangeMessage::Error(e) => Some(e),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DataChangeMessage::Error(_))
    }
}
