use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::TokenVerifier;
use crate::auth::middleware::authenticate;
use crate::notify::{NotificationEvent, NotificationHub};

/// Query params for the WebSocket handshake endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// GET /api/notifications/ws?token=<jwt>
///
/// Upgrades to a WebSocket that pushes the caller's notifications as JSON
/// text frames. The token travels in the query string because browsers
/// cannot set headers on the WebSocket handshake.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    verifier: web::Data<TokenVerifier>,
    hub: web::Data<Arc<NotificationHub>>,
) -> Result<HttpResponse, actix_web::Error> {
    let identity = authenticate(verifier.get_ref(), &query.token)
        .await
        .map_err(actix_web::error::ErrorUnauthorized)?;

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    let (subscription_id, rx) = hub.subscribe(identity.id).await;
    tracing::debug!(user_id = %identity.id, "Notification channel opened");

    actix_web::rt::spawn(run_session(
        session,
        msg_stream,
        rx,
        identity.id,
        subscription_id,
        hub.get_ref().clone(),
    ));

    Ok(response)
}

/// Forwards hub events to the socket until either side goes away.
async fn run_session(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut rx: mpsc::UnboundedReceiver<NotificationEvent>,
    user_id: Uuid,
    subscription_id: u64,
    hub: Arc<NotificationHub>,
) {
    loop {
        tokio::select! {
            Some(msg) = msg_stream.next() => {
                match msg {
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    // The channel is push-only.
                    _ => {}
                }
            }
            Some(event) = rx.recv() => {
                let json = match serde_json::to_string(&event) {
                    Ok(j) => j,
                    Err(_) => continue,
                };
                if session.text(json).await.is_err() {
                    break;
                }
            }
            else => break,
        }
    }

    hub.unsubscribe(user_id, subscription_id).await;
    tracing::debug!(%user_id, "Notification channel closed");
    let _ = session.close(None).await;
}
