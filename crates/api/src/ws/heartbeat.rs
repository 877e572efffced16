use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Interval between heartbeat pings (in seconds).
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that pings every open dashboard feed connection.
///
/// Election-day dashboards sit open for hours behind proxies that drop idle
/// connections, so the feed is kept warm with periodic Ping frames. The
/// returned `JoinHandle` is aborted during shutdown.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let feeds = ws_manager.connection_count().await;
            if feeds > 0 {
                tracing::debug!(feeds, "Pinging dashboard feed connections");
                ws_manager.ping_all().await;
            }
        }
    })
}
