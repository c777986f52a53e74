// ── JSON snapshots ──
//
// A snapshot is a dump of the sample service's tables in its own wire
// format, so an export from the service loads without translation.

use std::path::Path;

use ifwatch_api::{DeviceRecord, InterfaceRecord, ModuleRow, ReadingRow, SampleRow};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Offline copy of the inventory, counter samples, and transceiver
/// readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceRecord>,
    #[serde(default)]
    pub modules: Vec<ModuleRow>,
    #[serde(default)]
    pub samples: Vec<SampleRow>,
    #[serde(default)]
    pub readings: Vec<ReadingRow>,
}

impl Snapshot {
    /// Read and parse a snapshot file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let snapshot_err = |reason: String| CoreError::Snapshot {
            path: path.display().to_string(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| snapshot_err(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| snapshot_err(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_partial_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"samples":[{{"interface_id":1,"timestamp":"2024-06-15T10:00:00Z","in_errors":"5"}}]}}"#
        )
        .unwrap();

        let snapshot = Snapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.samples.len(), 1);
        assert_eq!(snapshot.samples[0].in_errors, Some(5));
        assert!(snapshot.interfaces.is_empty());
        assert!(snapshot.devices.is_empty() && snapshot.modules.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Snapshot::load(Path::new("/nonexistent/ifwatch.json")).unwrap_err();
        match err {
            CoreError::Snapshot { path, .. } => assert!(path.contains("ifwatch.json")),
            other => panic!("expected Snapshot error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Snapshot::load(file.path()),
            Err(CoreError::Snapshot { .. })
        ));
    }
}
