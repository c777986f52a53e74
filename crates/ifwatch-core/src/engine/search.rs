// ── Interface search ──
//
// Filtering and ordering of inventory rows already joined with their
// latest status. Matching is case-insensitive substring matching.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::{DeviceId, InterfaceOverview};

/// Sort key for interface listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InterfaceSort {
    #[default]
    Id,
    Hostname,
    Name,
}

/// Filters and ordering for [`Monitor::search_interfaces`](crate::Monitor::search_interfaces).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceQuery {
    /// Matched against hostname, address, name, description, and the
    /// module's serial and part numbers.
    pub search: Option<String>,
    /// Matched against the module's vendor name. Interfaces without a
    /// module never match.
    pub vendor: Option<String>,
    pub device: Option<DeviceId>,
    pub sort: InterfaceSort,
    pub descending: bool,
}

fn contains(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn normalized(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn matches_search(row: &InterfaceOverview, needle: &str) -> bool {
    let meta = &row.interface;
    let module = row.status.module.as_ref();

    [
        Some(meta.hostname.as_str()),
        Some(meta.address.as_str()),
        Some(meta.name.as_str()),
        meta.description.as_deref(),
        module.and_then(|m| m.serial_number.as_deref()),
        module.and_then(|m| m.part_number.as_deref()),
    ]
    .into_iter()
    .flatten()
    .any(|field| contains(field, needle))
}

fn matches_vendor(row: &InterfaceOverview, vendor: &str) -> bool {
    row.status
        .module
        .as_ref()
        .and_then(|m| m.vendor_name.as_deref())
        .is_some_and(|name| contains(name, vendor))
}

/// Keep the rows matching every filter in `query`, then sort them.
///
/// Ties on hostname or name fall back to ascending interface id, so the
/// order is total and repeatable.
pub fn filter_interfaces(
    rows: Vec<InterfaceOverview>,
    query: &InterfaceQuery,
) -> Vec<InterfaceOverview> {
    let search = normalized(query.search.as_deref());
    let vendor = normalized(query.vendor.as_deref());

    let mut kept: Vec<InterfaceOverview> = rows
        .into_iter()
        .filter(|row| query.device.is_none() || row.interface.device_id == query.device)
        .filter(|row| search.as_deref().is_none_or(|s| matches_search(row, s)))
        .filter(|row| vendor.as_deref().is_none_or(|v| matches_vendor(row, v)))
        .collect();

    kept.sort_by(|a, b| {
        let (a, b) = (&a.interface, &b.interface);
        let primary = match query.sort {
            InterfaceSort::Id => a.id.cmp(&b.id),
            InterfaceSort::Hostname => a.hostname.cmp(&b.hostname),
            InterfaceSort::Name => a.name.cmp(&b.name),
        };
        let ordered = if query.descending {
            primary.reverse()
        } else {
            primary
        };
        ordered.then_with(|| a.id.cmp(&b.id))
    });
    kept
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{
        InterfaceId, InterfaceMeta, InterfaceStatus, ModuleThresholds, TransceiverModule,
    };
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn row(id: i64, device: i64, host: &str, name: &str, module: Option<(&str, &str)>) -> InterfaceOverview {
        let interface_id = InterfaceId::new(id).unwrap();
        InterfaceOverview {
            interface: InterfaceMeta {
                id: interface_id,
                device_id: Some(DeviceId::new(device).unwrap()),
                name: name.into(),
                description: Some(format!("link {id}")),
                hostname: host.into(),
                address: format!("10.0.{device}.1"),
                vendor: None,
            },
            status: InterfaceStatus {
                module: module.map(|(vendor, serial)| TransceiverModule {
                    interface_id,
                    timestamp: Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap(),
                    vendor_name: Some(vendor.into()),
                    part_number: Some("SFP-10G-LR".into()),
                    serial_number: Some(serial.into()),
                    thresholds: ModuleThresholds::default(),
                }),
                ..InterfaceStatus::default()
            },
        }
    }

    fn rows() -> Vec<InterfaceOverview> {
        vec![
            row(3, 2, "edge-2", "xe-0/0/0", Some(("FINISAR CORP", "FNS123"))),
            row(1, 1, "core-1", "et-0/0/1", Some(("Cisco", "CSC999"))),
            row(2, 1, "core-1", "et-0/0/0", None),
        ]
    }

    fn ids(rows: &[InterfaceOverview]) -> Vec<i64> {
        rows.iter().map(|r| r.interface.id.get()).collect()
    }

    #[test]
    fn default_query_sorts_by_id() {
        assert_eq!(ids(&filter_interfaces(rows(), &InterfaceQuery::default())), vec![1, 2, 3]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let by = |term: &str| {
            let query = InterfaceQuery {
                search: Some(term.into()),
                ..InterfaceQuery::default()
            };
            ids(&filter_interfaces(rows(), &query))
        };

        assert_eq!(by("CORE"), vec![1, 2]);
        assert_eq!(by("10.0.2"), vec![3]);
        assert_eq!(by("xe-0"), vec![3]);
        assert_eq!(by("fns1"), vec![3]);
        assert_eq!(by("sfp-10g"), vec![1, 3]);
        assert_eq!(by("link 2"), vec![2]);
        assert_eq!(by("   "), vec![1, 2, 3]);
    }

    #[test]
    fn vendor_filter_skips_interfaces_without_module() {
        let query = InterfaceQuery {
            vendor: Some("finisar".into()),
            ..InterfaceQuery::default()
        };
        assert_eq!(ids(&filter_interfaces(rows(), &query)), vec![3]);
    }

    #[test]
    fn device_filter_and_descending_name_sort() {
        let query = InterfaceQuery {
            device: Some(DeviceId::new(1).unwrap()),
            sort: InterfaceSort::Name,
            descending: true,
            ..InterfaceQuery::default()
        };
        assert_eq!(ids(&filter_interfaces(rows(), &query)), vec![1, 2]);
    }

    #[test]
    fn hostname_ties_fall_back_to_id() {
        let query = InterfaceQuery {
            sort: InterfaceSort::Hostname,
            descending: true,
            ..InterfaceQuery::default()
        };
        assert_eq!(ids(&filter_interfaces(rows(), &query)), vec![3, 1, 2]);
    }

    #[test]
    fn sort_keys_parse_from_snake_case() {
        assert_eq!("hostname".parse::<InterfaceSort>().unwrap(), InterfaceSort::Hostname);
        assert!("vendor".parse::<InterfaceSort>().is_err());
    }
}
