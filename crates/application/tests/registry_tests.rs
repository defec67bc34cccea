use std::sync::Arc;

use application::ConnectionRegistry;
use domain::{DeviceIdentifier, PrinterError, TransportKind};
use infrastructure::MockConnector;

fn id(s: &str) -> DeviceIdentifier {
    DeviceIdentifier::new(s).unwrap()
}

fn setup() -> (Arc<ConnectionRegistry>, MockConnector, MockConnector) {
    let network = MockConnector::new(TransportKind::Network);
    let bluetooth = MockConnector::new(TransportKind::Bluetooth);
    let registry = ConnectionRegistry::new(vec![
        Arc::new(network.clone()),
        Arc::new(bluetooth.clone()),
    ]);
    (Arc::new(registry), network, bluetooth)
}

#[tokio::test]
async fn test_reconnect_replaces_and_closes_previous() {
    let (registry, network, _) = setup();
    let printer = id("192.168.1.50");

    assert_eq!(registry.connect(&printer).await.unwrap(), TransportKind::Network);
    assert_eq!(registry.connect(&printer).await.unwrap(), TransportKind::Network);

    let handles = network.handles();
    assert_eq!(handles.len(), 2);
    assert!(handles[0].is_closed(), "first transport must be closed");
    assert!(!handles[1].is_closed(), "second transport must stay open");
    assert_eq!(registry.connected().await, vec![printer]);
}

#[tokio::test]
async fn test_identifier_format_selects_transport() {
    let (registry, network, bluetooth) = setup();

    let kind = registry.connect(&id("00:11:22:AA:BB:CC")).await.unwrap();
    assert_eq!(kind, TransportKind::Bluetooth);
    assert_eq!(bluetooth.attempts(), 1);
    assert_eq!(network.attempts(), 0);

    let kind = registry.connect(&id("10.0.0.7")).await.unwrap();
    assert_eq!(kind, TransportKind::Network);
    assert_eq!(network.attempts(), 1);
}

#[tokio::test]
async fn test_failed_connect_keeps_existing_entry() {
    let (registry, network, _) = setup();
    let printer = id("192.168.1.50");

    registry.connect(&printer).await.unwrap();
    network.set_open_error(Some(PrinterError::ConnectionFailed("unreachable".into())));

    let err = registry.connect(&printer).await.unwrap_err();
    assert!(matches!(err, PrinterError::ConnectionFailed(_)));

    let handles = network.handles();
    assert_eq!(handles.len(), 1);
    assert!(!handles[0].is_closed());
    assert!(registry.is_connected(&printer).await);

    registry.send(&printer, b"still here").await.unwrap();
    assert_eq!(handles[0].sent(), b"still here".to_vec());
}

#[tokio::test]
async fn test_failed_first_connect_leaves_no_entry() {
    let (registry, network, _) = setup();
    let printer = id("192.168.1.60");
    network.set_open_error(Some(PrinterError::ConnectionFailed("refused".into())));

    assert!(registry.connect(&printer).await.is_err());
    assert!(!registry.is_connected(&printer).await);
    assert!(registry.connected().await.is_empty());
}

#[tokio::test]
async fn test_permission_denied_is_reported_as_is() {
    let (registry, _, bluetooth) = setup();
    bluetooth.set_open_error(Some(PrinterError::PermissionDenied("no access".into())));

    let err = registry.connect(&id("00:11:22:AA:BB:CC")).await.unwrap_err();
    assert_eq!(err, PrinterError::PermissionDenied("no access".into()));
}

#[tokio::test]
async fn test_missing_connector_fails_connect() {
    let network = MockConnector::new(TransportKind::Network);
    let registry = ConnectionRegistry::new(vec![Arc::new(network)]);

    let err = registry.connect(&id("00:11:22:AA:BB:CC")).await.unwrap_err();
    assert!(matches!(err, PrinterError::ConnectionFailed(msg) if msg.contains("bluetooth")));
}

#[tokio::test]
async fn test_send_and_disconnect_require_connection() {
    let (registry, _, _) = setup();
    let printer = id("192.168.1.70");

    assert_eq!(
        registry.send(&printer, b"x").await.unwrap_err(),
        PrinterError::NotConnected
    );
    assert_eq!(
        registry.disconnect(&printer).await.unwrap_err(),
        PrinterError::NotConnected
    );
}

#[tokio::test]
async fn test_disconnect_closes_and_removes() {
    let (registry, network, _) = setup();
    let printer = id("192.168.1.80");

    registry.connect(&printer).await.unwrap();
    registry.disconnect(&printer).await.unwrap();

    assert!(network.handles()[0].is_closed());
    assert!(!registry.is_connected(&printer).await);
    assert!(registry.is_empty());
    assert_eq!(
        registry.disconnect(&printer).await.unwrap_err(),
        PrinterError::NotConnected
    );
}

#[tokio::test]
async fn test_close_error_is_swallowed_on_disconnect() {
    let (registry, network, _) = setup();
    let printer = id("192.168.1.81");

    registry.connect(&printer).await.unwrap();
    network.last_handle().unwrap().set_fail_close(true);

    registry.disconnect(&printer).await.unwrap();
    assert!(!registry.is_connected(&printer).await);
}

#[tokio::test]
async fn test_write_failure_keeps_transport() {
    let (registry, network, _) = setup();
    let printer = id("192.168.1.90");

    registry.connect(&printer).await.unwrap();
    let handle = network.last_handle().unwrap();
    handle.set_fail_writes(true);

    let err = registry.send(&printer, b"lost").await.unwrap_err();
    assert!(matches!(err, PrinterError::WriteFailed(_)));
    assert!(registry.is_connected(&printer).await);
    assert!(!handle.is_closed());

    handle.set_fail_writes(false);
    registry.send(&printer, b"ok").await.unwrap();
    assert_eq!(handle.sent(), b"ok".to_vec());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sends_do_not_interleave() {
    let (registry, network, _) = setup();
    let printer = id("192.168.1.100");
    registry.connect(&printer).await.unwrap();

    let payloads: Vec<Vec<u8>> = (0..8u8).map(|n| vec![b'a' + n; 64]).collect();

    let tasks: Vec<_> = payloads
        .iter()
        .cloned()
        .map(|payload| {
            let registry = registry.clone();
            let printer = printer.clone();
            tokio::spawn(async move { registry.send(&printer, &payload).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let sent = network.last_handle().unwrap().sent();
    assert_eq!(sent.len(), 8 * 64);
    for chunk in sent.chunks(64) {
        assert!(
            chunk.iter().all(|b| *b == chunk[0]),
            "payloads interleaved on the wire"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_disconnect_racing_send_leaves_no_entry() {
    for round in 0..20 {
        let (registry, network, _) = setup();
        let printer = id(&format!("192.168.2.{}", round + 1));
        registry.connect(&printer).await.unwrap();

        let sender = {
            let registry = registry.clone();
            let printer = printer.clone();
            tokio::spawn(async move { registry.send(&printer, &[0x55; 32]).await })
        };
        let closer = {
            let registry = registry.clone();
            let printer = printer.clone();
            tokio::spawn(async move { registry.disconnect(&printer).await })
        };

        let sent = sender.await.unwrap();
        closer.await.unwrap().unwrap();

        let handle = network.last_handle().unwrap();
        match sent {
            Ok(()) => assert_eq!(handle.sent().len(), 32),
            Err(e) => {
                assert_eq!(e, PrinterError::NotConnected);
                assert!(handle.sent().is_empty());
            }
        }
        assert!(handle.is_closed());
        assert!(!registry.is_connected(&printer).await);
        assert!(registry.connected().await.is_empty());
        assert!(registry.is_empty(), "emptied slot left in the map");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sends_queued_behind_disconnect_leave_no_entry() {
    let (registry, network, _) = setup();
    let printer = id("192.168.3.1");
    registry.connect(&printer).await.unwrap();

    // The first send holds the slot while the rest queue on it
    let senders: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            let printer = printer.clone();
            tokio::spawn(async move { registry.send(&printer, &[0xAA; 256]).await })
        })
        .collect();
    registry.disconnect(&printer).await.unwrap();
    for sender in senders {
        let _ = sender.await.unwrap();
    }

    assert!(network.last_handle().unwrap().is_closed());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_distinct_printers_are_independent() {
    let (registry, network, bluetooth) = setup();
    let lan = id("192.168.1.10");
    let bt = id("00:11:22:AA:BB:CC");

    registry.connect(&lan).await.unwrap();
    registry.connect(&bt).await.unwrap();
    registry.disconnect(&lan).await.unwrap();

    registry.send(&bt, b"bt").await.unwrap();
    assert!(network.handles()[0].is_closed());
    assert_eq!(bluetooth.handles()[0].sent(), b"bt".to_vec());
    assert_eq!(registry.connected().await, vec![bt]);
}

#[tokio::test]
async fn test_close_all_closes_every_transport() {
    let (registry, network, bluetooth) = setup();
    registry.connect(&id("192.168.1.10")).await.unwrap();
    registry.connect(&id("192.168.1.11")).await.unwrap();
    registry.connect(&id("00:11:22:AA:BB:CC")).await.unwrap();

    assert_eq!(registry.close_all().await, 3);

    assert!(network.handles().iter().all(|h| h.is_closed()));
    assert!(bluetooth.handles().iter().all(|h| h.is_closed()));
    assert!(registry.connected().await.is_empty());
    assert_eq!(registry.close_all().await, 0);
}
