//! Brain: the home-automation hub that hosted devices are exposed to.

use serde::{Deserialize, Serialize};

/// Port the brain's API listens on when none is configured.
pub const DEFAULT_BRAIN_PORT: u16 = 3000;

/// Address and identity of a brain.
///
/// Built either from explicit configuration or from a discovery result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainDescriptor {
    /// Hostname or IP address.
    pub host: String,
    /// API port.
    pub port: u16,
    /// Advertised name, known only when the brain was discovered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl BrainDescriptor {
    /// Build a descriptor from a configured host.
    ///
    /// A missing or zero port falls back to [`DEFAULT_BRAIN_PORT`].
    #[must_use]
    pub fn from_host(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            port: port.filter(|p| *p != 0).unwrap_or(DEFAULT_BRAIN_PORT),
            name: None,
        }
    }

    /// Name used in log lines; `"unknown"` for configured brains.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_port_when_unspecified() {
        let brain = BrainDescriptor::from_host("10.0.0.5", None);
        assert_eq!(brain.host, "10.0.0.5");
        assert_eq!(brain.port, 3000);
        assert_eq!(brain.name, None);
    }

    #[test]
    fn should_treat_zero_port_as_unspecified() {
        let brain = BrainDescriptor::from_host("10.0.0.5", Some(0));
        assert_eq!(brain.port, DEFAULT_BRAIN_PORT);
    }

    #[test]
    fn should_keep_explicit_port() {
        let brain = BrainDescriptor::from_host("brain.local", Some(4000));
        assert_eq!(brain.port, 4000);
    }

    #[test]
    fn should_report_unknown_name_for_configured_brain() {
        let brain = BrainDescriptor::from_host("10.0.0.5", None);
        assert_eq!(brain.display_name(), "unknown");
    }

    #[test]
    fn should_omit_missing_name_when_serialized() {
        let brain = BrainDescriptor::from_host("10.0.0.5", None);
        let json = serde_json::to_value(&brain).unwrap();
        assert_eq!(json, serde_json::json!({"host": "10.0.0.5", "port": 3000}));
    }
}
