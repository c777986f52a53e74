// ── Interface identity and metadata ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ── InterfaceId ─────────────────────────────────────────────────────

/// Stable identifier of a monitored interface.
///
/// Ids are positive integers assigned by the collector and never reused
/// while the interface exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceId(i64);

impl InterfaceId {
    /// Validate a raw id. Zero and negative ids are rejected.
    pub fn new(raw: i64) -> Result<Self, CoreError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(CoreError::invalid(
                "interface id",
                format!("expected a positive integer, got {raw}"),
            ))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InterfaceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().parse::<i64>().map_err(|_| {
            CoreError::invalid("interface id", format!("'{s}' is not an integer"))
        })?;
        Self::new(raw)
    }
}

// ── DeviceId ────────────────────────────────────────────────────────

/// Identifier of a polled device. Positive, like [`InterfaceId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(i64);

impl DeviceId {
    pub fn new(raw: i64) -> Result<Self, CoreError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(CoreError::invalid(
                "device id",
                format!("expected a positive integer, got {raw}"),
            ))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| CoreError::invalid("device id", format!("'{s}' is not an integer")))?;
        Self::new(raw)
    }
}

// ── InterfaceMeta ───────────────────────────────────────────────────

/// Static interface metadata, joined onto ranked results for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceMeta {
    pub id: InterfaceId,
    /// Owning device, when the store knows it.
    #[serde(default)]
    pub device_id: Option<DeviceId>,
    /// Interface name as reported by the device (e.g. `xe-0/0/1`).
    pub name: String,
    /// Operator-assigned free-text description.
    pub description: Option<String>,
    /// Owning device hostname.
    pub hostname: String,
    /// Owning device management address.
    pub address: String,
    pub vendor: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids() {
        let id: InterfaceId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = "eth0".parse::<InterfaceId>().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn rejects_zero_and_negative_ids() {
        assert!(InterfaceId::new(0).is_err());
        assert!(InterfaceId::new(-5).is_err());
    }

    #[test]
    fn device_ids_follow_the_same_rules() {
        assert_eq!("3".parse::<DeviceId>().unwrap().get(), 3);
        assert!("0".parse::<DeviceId>().unwrap_err().is_invalid_argument());
        assert!("core".parse::<DeviceId>().is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let id = InterfaceId::new(7).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
