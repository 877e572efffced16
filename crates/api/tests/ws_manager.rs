use axum::extract::ws::Message;

use electo_api::ws::WsManager;

#[tokio::test]
async fn test_send_to_org_scopes_by_organization() {
    let manager = WsManager::new();
    let mut rx_a = manager.add("conn-a".into(), 1, 10).await;
    let mut rx_b = manager.add("conn-b".into(), 2, 20).await;

    let sent = manager
        .send_to_org(10, Message::Text("hola".into()))
        .await;
    assert_eq!(sent, 1);

    assert_eq!(rx_a.recv().await, Some(Message::Text("hola".into())));
    assert!(rx_b.try_recv().is_err(), "other org must not receive");
}

#[tokio::test]
async fn test_shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();
    let mut rx = manager.add("conn".into(), 1, 10).await;
    assert_eq!(manager.connection_count().await, 1);

    manager.shutdown_all().await;
    assert_eq!(manager.connection_count().await, 0);
    assert_eq!(rx.recv().await, Some(Message::Close(None)));
}

#[tokio::test]
async fn test_closed_receiver_is_skipped() {
    let manager = WsManager::new();
    let rx = manager.add("gone".into(), 1, 10).await;
    drop(rx);
    let mut rx_live = manager.add("live".into(), 2, 10).await;

    // Both connections match the org, so both are attempted.
    let sent = manager.send_to_org(10, Message::Text("hola".into())).await;
    assert_eq!(sent, 2);
    assert_eq!(rx_live.recv().await, Some(Message::Text("hola".into())));

    manager.remove("gone").await;
    assert_eq!(manager.connection_count().await, 1);
}
