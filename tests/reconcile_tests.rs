//! Tests for the reconcile state machine and outlet control against a fake control tool.

use std::net::Ipv4Addr;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tempfile::TempDir;

use powerstrip_agent::config::store::ConfigStore;
use powerstrip_agent::powerstrip::types::{DeviceRecord, ResolveError, StoreError};
use powerstrip_agent::powerstrip::{DeviceResolver, OutletController, SmartHomeTool};

const STRIP_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 50);
const STALE_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 99);

const SEARCH_OUTPUT: &str = "\
HS100(US) plug IOT.SMARTPLUGSWITCH 192.168.1.20 9999 50C7BF000001 Desk Lamp
KP303(US) plug IOT.SMARTPLUGSWITCH  192.168.1.50 9999 1C3BF3000002 TP-LINK_Power Strip_0002
";

fn info_output(ids: &[&str]) -> String {
    let mut out = String::from("{\n  sysInfo: {\n    model: 'KP303(US)',\n    children: [\n");
    for id in ids {
        out.push_str(&format!("      {{\n        id: '\x1b[32m{}\x1b[39m',\n        state: 0,\n      }},\n", id));
    }
    out.push_str("    ],\n  }\n}\n");
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Search,
    GetInfo(Ipv4Addr),
    SetPowerState(Ipv4Addr, String, bool),
}

/// Fake tplink-smarthome-api: answers `getInfo` only for `reachable`.
struct FakeTool {
    search: Option<String>,
    reachable: Option<Ipv4Addr>,
    info: String,
    calls: Mutex<Vec<Call>>,
}

impl FakeTool {
    fn new(search: Option<&str>, reachable: Option<Ipv4Addr>, info: String) -> Self {
        Self {
            search: search.map(str::to_string),
            reachable,
            info,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn searched(&self) -> bool {
        self.calls().contains(&Call::Search)
    }
}

#[async_trait]
impl SmartHomeTool for FakeTool {
    async fn search(&self) -> Result<String> {
        self.calls.lock().unwrap().push(Call::Search);
        self.search.clone().ok_or_else(|| anyhow!("search: no response"))
    }

    async fn get_info(&self, address: Ipv4Addr) -> Result<String> {
        self.calls.lock().unwrap().push(Call::GetInfo(address));
        if self.reachable == Some(address) {
            Ok(self.info.clone())
        } else {
            Err(anyhow!("getInfo {}: connect ETIMEDOUT", address))
        }
    }

    async fn set_power_state(&self, address: Ipv4Addr, child_id: &str, on: bool) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::SetPowerState(address, child_id.to_string(), on));
        if self.reachable == Some(address) {
            Ok(())
        } else {
            Err(anyhow!("setPowerState: exit status 1"))
        }
    }
}

fn store_in(dir: &TempDir) -> ConfigStore {
    ConfigStore::new(dir.path().join("config.ini"))
}

fn stored(address: Ipv4Addr) -> DeviceRecord {
    DeviceRecord::with_outlets(address, ["OLD0", "OLD1", "OLD2"])
}

// ============================================================================
// Trust path
// ============================================================================

#[tokio::test]
async fn test_valid_stored_record_is_returned_without_scan() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&stored(STRIP_IP)).unwrap();
    let tool = FakeTool::new(Some(SEARCH_OUTPUT), Some(STRIP_IP), info_output(&["N0", "N1", "N2"]));

    let record = DeviceResolver::new(&store, &tool).reconcile().await.unwrap();

    assert_eq!(record, stored(STRIP_IP));
    assert_eq!(tool.calls(), vec![Call::GetInfo(STRIP_IP)]);
    assert_eq!(store.load().unwrap(), stored(STRIP_IP));
}

#[tokio::test]
async fn test_failed_probe_clears_store_and_rescans() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&stored(STALE_IP)).unwrap();
    let tool = FakeTool::new(Some(SEARCH_OUTPUT), Some(STRIP_IP), info_output(&["N0", "N1", "N2"]));

    let record = DeviceResolver::new(&store, &tool).reconcile().await.unwrap();

    assert_eq!(record, DeviceRecord::with_outlets(STRIP_IP, ["N0", "N1", "N2"]));
    assert_eq!(
        tool.calls(),
        vec![Call::GetInfo(STALE_IP), Call::Search, Call::GetInfo(STRIP_IP)]
    );
    // Rewritten with the discovered identity
    assert_eq!(store.load().unwrap(), record);
}

#[tokio::test]
async fn test_failed_probe_leaves_store_cleared_when_scan_fails() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&stored(STALE_IP)).unwrap();
    let tool = FakeTool::new(None, None, String::new());

    let err = DeviceResolver::new(&store, &tool).reconcile().await.unwrap_err();

    assert!(matches!(err, ResolveError::DeviceNotFoundOnNetwork { .. }));
    assert!(matches!(store.load(), Err(StoreError::NotFound)));
}

#[tokio::test]
async fn test_partial_stored_record_goes_straight_to_scan() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "[KP303]\npower_ip = 192.168.1.50\nplug_1 = OLD0\n").unwrap();
    let tool = FakeTool::new(Some(SEARCH_OUTPUT), Some(STRIP_IP), info_output(&["N0", "N1", "N2"]));

    let record = DeviceResolver::new(&store, &tool).reconcile().await.unwrap();

    assert_eq!(record.outlets(), ["N0", "N1", "N2"]);
    assert_eq!(tool.calls(), vec![Call::Search, Call::GetInfo(STRIP_IP)]);
}

// ============================================================================
// Scan path
// ============================================================================

#[tokio::test]
async fn test_missing_config_scans_and_persists() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let tool = FakeTool::new(Some(SEARCH_OUTPUT), Some(STRIP_IP), info_output(&["A0", "A1", "A2"]));

    let record = DeviceResolver::new(&store, &tool).reconcile().await.unwrap();

    assert_eq!(record.address, STRIP_IP);
    assert_eq!(record.outlets(), ["A0", "A1", "A2"]);
    assert!(tool.searched());

    let content = std::fs::read_to_string(store.path()).unwrap();
    assert!(content.contains("power_ip = 192.168.1.50"));
    assert!(content.contains("plug_1 = A0"));
}

#[tokio::test]
async fn test_extra_outlet_ids_are_ignored() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let tool = FakeTool::new(
        Some(SEARCH_OUTPUT),
        Some(STRIP_IP),
        info_output(&["A0", "A1", "A2", "A3", "A4"]),
    );

    let record = DeviceResolver::new(&store, &tool).reconcile().await.unwrap();

    assert_eq!(record.outlets(), ["A0", "A1", "A2"]);
}

#[tokio::test]
async fn test_fewer_outlets_resolve_but_are_not_persisted() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let tool = FakeTool::new(Some(SEARCH_OUTPUT), Some(STRIP_IP), info_output(&["A0", "A1"]));

    let record = DeviceResolver::new(&store, &tool).reconcile().await.unwrap();

    assert_eq!(record.outlets(), ["A0", "A1"]);
    assert!(matches!(store.load(), Err(StoreError::NotFound)));
}

#[tokio::test]
async fn test_search_without_marker_fails() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let tool = FakeTool::new(
        Some("HS100(US) plug IOT.SMARTPLUGSWITCH 192.168.1.20 9999"),
        Some(STRIP_IP),
        info_output(&["A0", "A1", "A2"]),
    );

    let err = DeviceResolver::new(&store, &tool).reconcile().await.unwrap_err();

    assert!(matches!(err, ResolveError::DeviceNotFoundOnNetwork { .. }));
    assert_eq!(tool.calls(), vec![Call::Search]);
}

#[tokio::test]
async fn test_unparsable_strip_address_does_not_pick_next_device() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let hs100 = Ipv4Addr::new(192, 168, 1, 20);
    let tool = FakeTool::new(
        Some(
            "KP303(US) plug IOT.SMARTPLUGSWITCH  192.168.001.050 9999\n\
             HS100(US) plug IOT.SMARTPLUGSWITCH 192.168.1.20 9999\n",
        ),
        Some(hs100),
        info_output(&["A0", "A1", "A2"]),
    );

    let err = DeviceResolver::new(&store, &tool).reconcile().await.unwrap_err();

    assert!(matches!(err, ResolveError::DeviceNotFoundOnNetwork { .. }));
    assert_eq!(tool.calls(), vec![Call::Search]);
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_custom_model_marker() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let tool = FakeTool::new(
        Some("KP303(UK) plug IOT.SMARTPLUGSWITCH 192.168.1.50 9999"),
        Some(STRIP_IP),
        info_output(&["A0", "A1", "A2"]),
    );

    let record = DeviceResolver::new(&store, &tool)
        .with_model_marker("KP303(UK) plug IOT.SMARTPLUGSWITCH ")
        .reconcile()
        .await
        .unwrap();

    assert_eq!(record.address, STRIP_IP);
}

#[tokio::test]
async fn test_silent_discovered_device_fails() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let tool = FakeTool::new(Some(SEARCH_OUTPUT), None, String::new());

    let err = DeviceResolver::new(&store, &tool).reconcile().await.unwrap_err();

    match err {
        ResolveError::NoResponseFromDiscoveredDevice { address, .. } => assert_eq!(address, STRIP_IP),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_next_run_after_clear_scans() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&stored(STALE_IP)).unwrap();

    let offline = FakeTool::new(None, None, String::new());
    assert!(DeviceResolver::new(&store, &offline).reconcile().await.is_err());

    let online = FakeTool::new(Some(SEARCH_OUTPUT), Some(STRIP_IP), info_output(&["A0", "A1", "A2"]));
    let record = DeviceResolver::new(&store, &online).reconcile().await.unwrap();

    assert_eq!(record.address, STRIP_IP);
    assert_eq!(online.calls(), vec![Call::Search, Call::GetInfo(STRIP_IP)]);
}

// ============================================================================
// Outlet control
// ============================================================================

#[tokio::test]
async fn test_set_outlet_uses_positional_id() {
    let tool = FakeTool::new(None, Some(STRIP_IP), String::new());
    let record = DeviceRecord::with_outlets(STRIP_IP, ["A0", "A1", "A2"]);

    OutletController::new(&tool).set_outlet(&record, 3, false).await.unwrap();
    OutletController::new(&tool).turn_on(STRIP_IP, "A0").await.unwrap();

    assert_eq!(
        tool.calls(),
        vec![
            Call::SetPowerState(STRIP_IP, "A2".to_string(), false),
            Call::SetPowerState(STRIP_IP, "A0".to_string(), true),
        ]
    );
}

#[tokio::test]
async fn test_set_outlet_unknown_position_fails_without_calling_tool() {
    let tool = FakeTool::new(None, Some(STRIP_IP), String::new());
    let record = DeviceRecord::with_outlets(STRIP_IP, ["A0"]);

    assert!(OutletController::new(&tool).set_outlet(&record, 2, true).await.is_err());
    assert!(tool.calls().is_empty());
}

#[tokio::test]
async fn test_tool_failure_propagates() {
    let tool = FakeTool::new(None, None, String::new());

    assert!(OutletController::new(&tool).turn_off(STRIP_IP, "A0").await.is_err());
}
