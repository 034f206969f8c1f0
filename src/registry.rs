//! Category → probe registry.
//!
//! A fixed, closed table with exactly one entry per monitored protocol
//! family. The table gives the protocol implementation to invoke and the
//! port to use when an endpoint's own port is missing. Iteration order of
//! [`REGISTRY`] defines result order everywhere reports must be
//! deterministic.

use serde::{Deserialize, Serialize};

use crate::probe::Protocol;

/// The six monitored protocol families.
///
/// Serde names match the category tags used by discovery exports. The two
/// HTTP-probed device classes from older exports ("Smart Home Devices",
/// "Industrial IoT") are accepted as aliases of Web Interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Camera streams (RTSP).
    #[serde(rename = "IoT Cameras")]
    Cameras,
    /// Industrial control (Modbus TCP).
    #[serde(rename = "SCADA/ICS")]
    IndustrialControl,
    /// Building automation (BACnet/IP).
    #[serde(rename = "Building Automation")]
    BuildingAutomation,
    /// Message brokers (MQTT).
    #[serde(rename = "MQTT Brokers")]
    MessageBrokers,
    /// Generic web interfaces (HTTP/HTTPS).
    #[serde(
        rename = "Web Interfaces",
        alias = "Smart Home Devices",
        alias = "Industrial IoT"
    )]
    WebInterfaces,
    /// Legacy terminal services (Telnet).
    #[serde(rename = "Telnet Services", alias = "Telnet")]
    LegacyTerminals,
}

impl Category {
    /// Human-readable category name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cameras => "IoT Cameras",
            Self::IndustrialControl => "SCADA/ICS",
            Self::BuildingAutomation => "Building Automation",
            Self::MessageBrokers => "MQTT Brokers",
            Self::WebInterfaces => "Web Interfaces",
            Self::LegacyTerminals => "Telnet Services",
        }
    }

    /// Registry row for this category.
    pub fn spec(&self) -> &'static ProbeSpec {
        match self {
            Self::Cameras => &REGISTRY[0],
            Self::IndustrialControl => &REGISTRY[1],
            Self::BuildingAutomation => &REGISTRY[2],
            Self::MessageBrokers => &REGISTRY[3],
            Self::WebInterfaces => &REGISTRY[4],
            Self::LegacyTerminals => &REGISTRY[5],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One registry row: which protocol a category speaks and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSpec {
    /// Category this row belongs to.
    pub category: Category,
    /// Protocol handshake to run.
    pub protocol: Protocol,
    /// Port used when an endpoint has no usable port of its own.
    pub default_port: u16,
}

/// The fixed category→probe table. One row per category; row order is the
/// canonical report order.
pub static REGISTRY: [ProbeSpec; 6] = [
    ProbeSpec {
        category: Category::Cameras,
        protocol: Protocol::Rtsp,
        default_port: 554,
    },
    ProbeSpec {
        category: Category::IndustrialControl,
        protocol: Protocol::Modbus,
        default_port: 502,
    },
    ProbeSpec {
        category: Category::BuildingAutomation,
        protocol: Protocol::Bacnet,
        default_port: 47808,
    },
    ProbeSpec {
        category: Category::MessageBrokers,
        protocol: Protocol::Mqtt,
        default_port: 1883,
    },
    ProbeSpec {
        category: Category::WebInterfaces,
        protocol: Protocol::Http,
        default_port: 80,
    },
    ProbeSpec {
        category: Category::LegacyTerminals,
        protocol: Protocol::Telnet,
        default_port: 23,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_one_row_per_category() {
        assert_eq!(REGISTRY.len(), 6);
        for (i, a) in REGISTRY.iter().enumerate() {
            for b in REGISTRY.iter().skip(i + 1) {
                assert_ne!(a.category, b.category, "duplicate registry row");
                assert_ne!(a.protocol, b.protocol, "duplicate protocol row");
            }
        }
    }

    #[test]
    fn test_category_spec_is_consistent() {
        for row in &REGISTRY {
            assert_eq!(row.category.spec(), row);
        }
    }

    #[test]
    fn test_registry_default_ports() {
        assert_eq!(Category::Cameras.spec().default_port, 554);
        assert_eq!(Category::IndustrialControl.spec().default_port, 502);
        assert_eq!(Category::BuildingAutomation.spec().default_port, 47808);
        assert_eq!(Category::MessageBrokers.spec().default_port, 1883);
        assert_eq!(Category::WebInterfaces.spec().default_port, 80);
        assert_eq!(Category::LegacyTerminals.spec().default_port, 23);
    }

    #[test]
    fn test_registry_protocol_mapping() {
        assert_eq!(Category::Cameras.spec().protocol, Protocol::Rtsp);
        assert_eq!(Category::IndustrialControl.spec().protocol, Protocol::Modbus);
        assert_eq!(Category::BuildingAutomation.spec().protocol, Protocol::Bacnet);
        assert_eq!(Category::MessageBrokers.spec().protocol, Protocol::Mqtt);
        assert_eq!(Category::WebInterfaces.spec().protocol, Protocol::Http);
        assert_eq!(Category::LegacyTerminals.spec().protocol, Protocol::Telnet);
    }

    #[test]
    fn test_category_display_roundtrips_through_serde() {
        for row in &REGISTRY {
            let json = serde_json::to_string(&row.category).unwrap();
            assert_eq!(json, format!("\"{}\"", row.category.as_str()));
            let parsed: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, row.category);
        }
    }
}
