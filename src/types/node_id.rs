//! Structured identifiers for remote addressable values.
//!
//! A [`NodeId`] is parsed from its string form, e.g. `i=85`, `ns=2;s=Boiler.Temp`,
//! `ns=1;g=72962B91-FA75-4AE6-8D28-B404DC7DAF63` or `ns=3;b=M/RbKBsRVkePCePcx24oRA==`.
//! The namespace prefix is optional and defaults to 0; namespace 0 is omitted
//! from the canonical form produced by `Display`.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use uuid::Uuid;

use crate::NodeIdError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    /// Canonical upper-case `8-4-4-4-12` form
    Guid(String),
    /// Base64 text of the opaque byte string
    Opaque(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    namespace: u16,
    identifier: Identifier,
}

impl NodeId {
    pub fn new(
        namespace: u16,
        identifier: Identifier,
    ) -> Self {
        Self {
            namespace,
            identifier,
        }
    }

    pub fn numeric(
        namespace: u16,
        value: u32,
    ) -> Self {
        Self::new(namespace, Identifier::Numeric(value))
    }

    pub fn string(
        namespace: u16,
        value: impl Into<String>,
    ) -> Self {
        Self::new(namespace, Identifier::String(value.into()))
    }

    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Parse a list of string forms, failing on the first malformed entry.
    pub fn parse_all<S: AsRef<str>>(nodes: &[S]) -> Result<Vec<NodeId>, NodeIdError> {
        nodes.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NodeIdError::Empty);
        }

        let (namespace, rest) = match s.strip_prefix("ns=") {
            Some(tail) => {
                let (ns, rest) = tail
                    .split_once(';')
                    .ok_or_else(|| NodeIdError::InvalidFormat(s.to_string()))?;
                let ns = ns
                    .parse::<u16>()
                    .map_err(|_| NodeIdError::InvalidNamespace(ns.to_string()))?;
                (ns, rest)
            }
            None => (0, s),
        };

        let (kind, value) = rest
            .split_once('=')
            .ok_or_else(|| NodeIdError::InvalidFormat(s.to_string()))?;

        let identifier = match kind {
            "i" => Identifier::Numeric(
                value
                    .parse::<u32>()
                    .map_err(|_| NodeIdError::InvalidNumeric(value.to_string()))?,
            ),
            "s" => {
                if value.is_empty() {
                    return Err(NodeIdError::InvalidFormat(s.to_string()));
                }
                Identifier::String(value.to_string())
            }
            "g" => Identifier::Guid(parse_guid(value)?),
            "b" => Identifier::Opaque(parse_opaque(value)?),
            _ => return Err(NodeIdError::InvalidFormat(s.to_string())),
        };

        Ok(NodeId::new(namespace, identifier))
    }
}

impl fmt::Display for NodeId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};", self.namespace)?;
        }
        match &self.identifier {
            Identifier::Numeric(v) => write!(f, "i={v}"),
            Identifier::String(v) => write!(f, "s={v}"),
            Identifier::Guid(v) => write!(f, "g={v}"),
            Identifier::Opaque(v) => write!(f, "b={v}"),
        }
    }
}

fn parse_guid(value: &str) -> Result<String, NodeIdError> {
    let guid = Uuid::parse_str(value).map_err(|_| NodeIdError::InvalidGuid(value.to_string()))?;
    Ok(format!("{:X}", guid.hyphenated()))
}

fn parse_opaque(value: &str) -> Result<String, NodeIdError> {
    match STANDARD.decode(value) {
        Ok(bytes) if !bytes.is_empty() => Ok(value.to_string()),
        _ => Err(NodeIdError::InvalidOpaque(value.to_string())),
    }
}
