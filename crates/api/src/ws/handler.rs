use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use electo_core::error::CoreError;
use electo_core::roles::{capabilities_for_role, Capability};
use electo_core::types::DbId;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Query parameters for the WebSocket upgrade request.
///
/// Browsers cannot set an `Authorization` header on WebSocket handshakes, so
/// the access token is passed as a query parameter instead.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: String,
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// Authenticates the token before upgrading; the connection is then
/// registered with `WsManager` and subscribed to its organization's event
/// feed.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let claims = validate_token(&params.token, &state.config.jwt)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid or expired token".into())))?;

    if !capabilities_for_role(&claims.role).contains(Capability::ViewDashboard) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Dashboard permission required".into(),
        )));
    }

    let profile_id = claims.sub;
    let organization_id = claims.org;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, profile_id, organization_id)))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Subscribes to the organization's slice of the event bus.
///   3. Spawns a sender task that forwards manager messages and feed events.
///   4. Processes inbound messages on the current task.
///   5. Cleans up on disconnect; dropping the subscription stops delivery.
async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    profile_id: DbId,
    organization_id: DbId,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, profile_id, organization_id, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let mut rx = state
        .ws_manager
        .add(conn_id.clone(), profile_id, organization_id)
        .await;

    // Subscribe to this organization's domain events. The subscription's
    // filter task is aborted when `_subscription` drops at the end of this
    // function.
    let (_subscription, mut events) = state.event_bus.subscribe_org(organization_id);

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward manager messages and feed events to the sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
                event = events.recv() => match event {
                    Some(event) => match serde_json::to_string(&event) {
                        Ok(json) => Message::Text(json.into()),
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to serialize feed event");
                            continue;
                        }
                    },
                    None => break,
                },
            };
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_msg) => {
                // The feed is one-way; inbound text frames are ignored.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
