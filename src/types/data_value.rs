use std::fmt;
use std::time::SystemTime;

use serde::Deserialize;
use serde::Serialize;

/// Result code attached to service responses, per-item results and values.
///
/// The two most significant bits carry the severity: `00` good,
/// `01` uncertain, `10`/`11` bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u32);

impl StatusCode {
    pub const GOOD: StatusCode = StatusCode(0);
    pub const BAD_UNEXPECTED_ERROR: StatusCode = StatusCode(0x8001_0000);
    pub const BAD_TIMEOUT: StatusCode = StatusCode(0x800A_0000);
    pub const BAD_NOTHING_TO_DO: StatusCode = StatusCode(0x800F_0000);
    pub const BAD_TOO_MANY_OPERATIONS: StatusCode = StatusCode(0x8010_0000);
    pub const BAD_SUBSCRIPTION_ID_INVALID: StatusCode = StatusCode(0x8028_0000);
    pub const BAD_NODE_ID_UNKNOWN: StatusCode = StatusCode(0x8034_0000);
    pub const BAD_MONITORED_ITEM_ID_INVALID: StatusCode = StatusCode(0x8042_0000);

    /// Exactly `Good`, with no info bits set.
    pub fn is_ok(self) -> bool {
        self == Self::GOOD
    }

    pub fn is_bad(self) -> bool {
        self.0 & 0x8000_0000 != 0
    }

    pub fn is_uncertain(self) -> bool {
        self.0 & 0xC000_0000 == 0x4000_0000
    }

    fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::GOOD => "Good",
            Self::BAD_UNEXPECTED_ERROR => "BadUnexpectedError",
            Self::BAD_TIMEOUT => "BadTimeout",
            Self::BAD_NOTHING_TO_DO => "BadNothingToDo",
            Self::BAD_TOO_MANY_OPERATIONS => "BadTooManyOperations",
            Self::BAD_SUBSCRIPTION_ID_INVALID => "BadSubscriptionIdInvalid",
            Self::BAD_NODE_ID_UNKNOWN => "BadNodeIdUnknown",
            Self::BAD_MONITORED_ITEM_ID_INVALID => "BadMonitoredItemIdInvalid",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (0x{:08X})", self.0),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

/// Decoded value payload of a change record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    Boolean(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(SystemTime),
    ByteString(Vec<u8>),
    Array(Vec<Variant>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataValue {
    pub value: Option<Variant>,
    pub status: StatusCode,
    pub source_timestamp: Option<SystemTime>,
    pub server_timestamp: Option<SystemTime>,
}

impl DataValue {
    pub fn new(value: Variant) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }
}
