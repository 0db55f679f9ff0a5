//! Integration tests for the capture session lifecycle and the
//! tick pipeline consistency guarantees.

use std::time::Duration;

use netpulse_analysis::{ExportDocument, FilterSpec};
use netpulse_core::config::NetpulseConfig;
use netpulse_core::types::{Protocol, RunningStats};
use netpulse_daemon::Session;

/// Fast-ticking config for tests.
fn test_config(buffer_capacity: usize) -> NetpulseConfig {
    let mut config = NetpulseConfig::default();
    config.capture.tick_interval_ms = 10;
    config.capture.buffer_capacity = buffer_capacity;
    config
}

async fn run_briefly(session: &Session, millis: u64) {
    session.start().await;
    tokio::time::sleep(Duration::from_millis(millis)).await;
    session.stop().await;
}

#[tokio::test]
async fn session_starts_idle() {
    let session = Session::new(test_config(100));
    assert!(!session.is_capturing());

    let snapshot = session.current_snapshot().await;
    assert!(snapshot.packets.is_empty());
    assert_eq!(snapshot.stats, RunningStats::default());
    assert_eq!(snapshot.interfaces.len(), 5);
}

#[tokio::test]
async fn start_and_stop_flip_capture_state() {
    let session = Session::new(test_config(100));

    session.start().await;
    assert!(session.is_capturing());

    session.stop().await;
    assert!(!session.is_capturing());
}

#[tokio::test]
async fn double_start_is_noop() {
    let session = Session::new(test_config(100));

    session.start().await;
    session.start().await; // already active, ignored
    assert!(session.is_capturing());

    session.stop().await;
    assert!(!session.is_capturing());
}

#[tokio::test]
async fn stop_when_idle_is_noop() {
    let session = Session::new(test_config(100));
    session.stop().await; // must not panic or hang
    assert!(!session.is_capturing());
}

#[tokio::test]
async fn ticks_populate_buffer_and_stats_consistently() {
    let session = Session::new(test_config(10_000));
    run_briefly(&session, 150).await;

    let snapshot = session.current_snapshot().await;
    assert!(snapshot.stats.total_packets > 0, "no ticks fired");

    // No eviction at this capacity, so the buffer holds every arrival.
    assert_eq!(snapshot.packets.len() as u64, snapshot.stats.total_packets);
    assert!(snapshot.stats.total_bytes >= snapshot.stats.total_packets * 64);

    // The last tick's batch size stays within the configured range.
    assert!(snapshot.stats.current_rate >= 1);
    assert!(snapshot.stats.current_rate <= 5);

    // Packet ids arrive in generation order.
    for pair in snapshot.packets.windows(2) {
        assert!(pair[0].id < pair[1].id);
    }
}

#[tokio::test]
async fn buffer_never_exceeds_capacity_under_load() {
    let session = Session::new(test_config(7));
    run_briefly(&session, 200).await;

    let snapshot = session.current_snapshot().await;
    assert!(snapshot.packets.len() <= 7);
    // All-time counters keep counting past eviction.
    assert!(snapshot.stats.total_packets >= snapshot.packets.len() as u64);
}

#[tokio::test]
async fn stopping_prevents_further_ticks() {
    let session = Session::new(test_config(10_000));
    run_briefly(&session, 100).await;

    let before = session.current_snapshot().await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    let after = session.current_snapshot().await;

    // The last completed tick is kept, nothing new arrives.
    assert_eq!(before.stats.total_packets, after.stats.total_packets);
    assert_eq!(before.packets.len(), after.packets.len());
}

#[tokio::test]
async fn clear_resets_buffer_and_stats_together() {
    let session = Session::new(test_config(10_000));
    run_briefly(&session, 100).await;

    let snapshot = session.current_snapshot().await;
    assert!(snapshot.stats.total_packets > 0);

    session.clear().await;

    let snapshot = session.current_snapshot().await;
    assert!(snapshot.packets.is_empty());
    assert_eq!(snapshot.stats, RunningStats::default());
}

#[tokio::test]
async fn default_filter_passes_everything() {
    let session = Session::new(test_config(10_000));
    run_briefly(&session, 100).await;

    let snapshot = session.current_snapshot().await;
    let filtered = session.filtered_view().await;
    assert_eq!(filtered, snapshot.packets);
}

#[tokio::test]
async fn protocol_filter_narrows_view() {
    let session = Session::new(test_config(10_000));
    run_briefly(&session, 200).await;

    session
        .set_filter(FilterSpec {
            protocol: Some(Protocol::Tcp),
            ..FilterSpec::default()
        })
        .await;

    let filtered = session.filtered_view().await;
    let total = session.current_snapshot().await.packets.len();
    assert!(filtered.len() <= total);
    assert!(filtered.iter().all(|p| p.protocol == Protocol::Tcp));
}

#[tokio::test]
async fn non_matching_filter_yields_empty_view_and_no_alerts() {
    let session = Session::new(test_config(10_000));
    run_briefly(&session, 100).await;

    session
        .set_filter(FilterSpec {
            src_addr: Some("255.255.255.255".to_owned()),
            ..FilterSpec::default()
        })
        .await;

    assert!(session.filtered_view().await.is_empty());
    assert!(session.threat_alerts().await.is_empty());

    // Export of the empty view succeeds with an empty document.
    let document = session.export_filtered_view().await.unwrap();
    assert_eq!(document.contents.trim(), "[]");
}

#[tokio::test]
async fn export_roundtrip_matches_filtered_view() {
    let session = Session::new(test_config(10_000));
    run_briefly(&session, 100).await;

    let view = session.filtered_view().await;
    let document = session.export_filtered_view().await.unwrap();
    let parsed = ExportDocument::parse(&document.contents).unwrap();
    assert_eq!(parsed, view);
}

#[tokio::test]
async fn toggle_interface_twice_restores_state() {
    let session = Session::new(test_config(100));
    let before: Vec<bool> = session
        .current_snapshot()
        .await
        .interfaces
        .iter()
        .map(|i| i.enabled)
        .collect();

    session.toggle_interface("2").await;
    session.toggle_interface("2").await;

    let after: Vec<bool> = session
        .current_snapshot()
        .await
        .interfaces
        .iter()
        .map(|i| i.enabled)
        .collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn toggle_unknown_interface_is_noop() {
    let session = Session::new(test_config(100));
    let before = session.current_snapshot().await.interfaces;

    session.toggle_interface("no-such-interface").await;

    let after = session.current_snapshot().await.interfaces;
    assert_eq!(before, after);
}

#[tokio::test]
async fn disabled_interfaces_report_zero_throughput() {
    let session = Session::new(test_config(10_000));
    run_briefly(&session, 100).await;

    for interface in session.current_snapshot().await.interfaces {
        if interface.enabled {
            assert!(interface.throughput_pps > 0);
        } else {
            assert_eq!(interface.throughput_pps, 0);
        }
    }
}

#[tokio::test]
async fn restart_continues_accumulating() {
    let session = Session::new(test_config(10_000));
    run_briefly(&session, 100).await;
    let first = session.current_snapshot().await.stats.total_packets;
    assert!(first > 0);

    run_briefly(&session, 100).await;
    let second = session.current_snapshot().await.stats.total_packets;
    assert!(second > first);
}
