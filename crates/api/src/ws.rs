//! Live snapshot push over WebSocket.
//!
//! One connection watches one collection for one owner. On connect and after
//! every write to that collection, the full decoded collection goes out as a
//! single JSON text frame, so the client replaces its state wholesale instead
//! of patching. Inbound frames are ignored except for close.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use memoir_store::entries::entries_from_snapshot;
use memoir_store::photo_requests::requests_from_snapshot;
use memoir_store::questions::questions_from_snapshot;
use memoir_store::timeline::events_from_snapshot;
use memoir_store::{Collection, DocumentStore, Snapshot};

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::bearer_token;
use crate::state::AppState;

/// Query parameters for the watch handshake.
#[derive(Debug, Deserialize)]
pub struct WatchParams {
    /// Access token, for browser clients that cannot set headers on a
    /// WebSocket handshake. The `Authorization` header wins when both are
    /// present.
    #[serde(default)]
    pub token: Option<String>,
}

/// One outbound frame: the whole collection after a change.
#[derive(Debug, Serialize)]
struct WatchFrame<T> {
    collection: Collection,
    data: Vec<T>,
}

/// HTTP handler that authenticates the caller, resolves the collection, and
/// upgrades the connection to a WebSocket.
///
/// Rejections happen before the upgrade, so a bad token or an unknown
/// collection comes back as a plain HTTP error the client can read.
pub async fn watch_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<WatchParams>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let (owner, collection) = authorize_watch(&state.config.jwt, &collection, &params, &headers)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, owner, collection)))
}

/// Decide who is watching and what, before any upgrade happens.
///
/// The `Authorization` header wins over the `token` query parameter when both
/// are present. Returns the owner id from the token claims and the parsed
/// collection.
fn authorize_watch(
    jwt: &JwtConfig,
    collection: &str,
    params: &WatchParams,
    headers: &HeaderMap,
) -> AppResult<(String, Collection)> {
    let token = bearer_token(headers)
        .or(params.token.as_deref())
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;
    let claims = validate_token(token, jwt)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;
    let collection = Collection::from_str_value(collection).map_err(AppError::BadRequest)?;

    Ok((claims.sub, collection))
}

/// Manage a single watch connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Subscribes to the owner's collection on the document store.
///   2. Spawns a sender task that pushes a frame for the seeded snapshot and
///      for every change after it.
///   3. Drains inbound messages on the current task until close.
///   4. Aborts the sender on disconnect, dropping the subscription.
async fn handle_socket(socket: WebSocket, state: AppState, owner: String, collection: Collection) {
    let mut rx = match state.store.watch(&owner, collection).await {
        Ok(rx) => rx,
        Err(err) => {
            tracing::warn!(owner = %owner, %collection, error = %err, "Watch subscription failed");
            return;
        }
    };

    tracing::info!(owner = %owner, %collection, "Watch connected");

    let (mut sink, mut stream) = socket.split();

    // Sender task: one frame now, then one per change.
    let send_owner = owner.clone();
    let send_task = tokio::spawn(async move {
        loop {
            let frame = encode_frame(collection, &rx.borrow_and_update());
            match frame {
                Ok(text) => {
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        tracing::debug!(owner = %send_owner, "Watch sink closed");
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(owner = %send_owner, error = %err, "Failed to encode snapshot");
                    break;
                }
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    });

    // Receiver loop: the client has nothing to say; wait for it to go away.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(owner = %owner, error = %e, "Watch receive error");
                break;
            }
        }
    }

    send_task.abort();
    tracing::info!(owner = %owner, %collection, "Watch disconnected");
}

/// Serialize one snapshot as a typed frame for its collection.
///
/// Documents that no longer decode are dropped here the same way the typed
/// stores drop them, so the socket and the REST surface agree.
fn encode_frame(collection: Collection, snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    match collection {
        Collection::Entries => serde_json::to_string(&WatchFrame {
            collection,
            data: entries_from_snapshot(snapshot),
        }),
        Collection::TimelineEvents => serde_json::to_string(&WatchFrame {
            collection,
            data: events_from_snapshot(snapshot),
        }),
        Collection::AiQuestions => serde_json::to_string(&WatchFrame {
            collection,
            data: questions_from_snapshot(snapshot),
        }),
        Collection::PhotoRequests => serde_json::to_string(&WatchFrame {
            collection,
            data: requests_from_snapshot(snapshot),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;
    use chrono::Utc;
    use memoir_store::Document;
    use serde_json::json;

    use crate::auth::jwt::generate_access_token;

    fn document(id: &str, data: serde_json::Value) -> Document {
        Document {
            id: id.to_string(),
            version: 1,
            data,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn frames_carry_the_collection_name_and_decoded_documents() {
        let snapshot = vec![document(
            "e1",
            json!({
                "id": "e1",
                "title": "First day of school",
                "content": "Nervous all morning.",
                "date": "1962-09-03",
                "location": "",
                "tags": [],
                "privacy": "private",
                "kind": "personal",
                "comments": [],
                "author": "owner-1",
                "author_name": "Margaret",
                "updated_at": Utc::now(),
            }),
        )];

        let frame = encode_frame(Collection::Entries, &snapshot).unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();

        assert_eq!(value["collection"], "entries");
        assert_eq!(value["data"].as_array().unwrap().len(), 1);
        assert_eq!(value["data"][0]["title"], "First day of school");
    }

    #[test]
    fn malformed_documents_are_dropped_from_frames() {
        let snapshot = vec![
            document("q1", json!({"not": "a question"})),
            document(
                "q2",
                json!({
                    "id": "q2",
                    "question": "What did 1975 smell like?",
                    "related_entry": null,
                    "kind": "reflection",
                    "answered": false,
                    "answer": null,
                    "answered_at": null,
                }),
            ),
        ];

        let frame = encode_frame(Collection::AiQuestions, &snapshot).unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();

        assert_eq!(value["data"].as_array().unwrap().len(), 1);
        assert_eq!(value["data"][0]["id"], "q2");
    }

    #[test]
    fn empty_snapshots_encode_as_empty_data() {
        let frame = encode_frame(Collection::PhotoRequests, &Vec::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();

        assert_eq!(value["collection"], "photo_requests");
        assert_eq!(value["data"], json!([]));
    }

    // The handshake decisions are checked directly, without an HTTP upgrade.

    fn watch_jwt() -> JwtConfig {
        JwtConfig {
            secret: "watch-test-secret".to_string(),
            access_token_expiry_mins: 60,
        }
    }

    #[test]
    fn watching_without_a_token_is_unauthorized() {
        let params = WatchParams { token: None };

        let err = authorize_watch(&watch_jwt(), "entries", &params, &HeaderMap::new())
            .unwrap_err();

        assert_matches!(err, AppError::Unauthorized(_));
    }

    #[test]
    fn garbage_tokens_are_unauthorized() {
        let params = WatchParams {
            token: Some("not-a-jwt".to_string()),
        };

        let err = authorize_watch(&watch_jwt(), "entries", &params, &HeaderMap::new())
            .unwrap_err();

        assert_matches!(err, AppError::Unauthorized(_));
    }

    #[test]
    fn query_tokens_name_the_owner_and_collection() {
        let jwt = watch_jwt();
        let params = WatchParams {
            token: Some(generate_access_token("owner-7", "Vera", &jwt).unwrap()),
        };

        let (owner, collection) =
            authorize_watch(&jwt, "entries", &params, &HeaderMap::new()).unwrap();

        assert_eq!(owner, "owner-7");
        assert_eq!(collection, Collection::Entries);
    }

    #[test]
    fn bearer_headers_win_over_query_tokens() {
        let jwt = watch_jwt();
        let header_token = generate_access_token("owner-a", "Ada", &jwt).unwrap();
        let params = WatchParams {
            token: Some(generate_access_token("owner-b", "Bo", &jwt).unwrap()),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            format!("Bearer {header_token}").parse().unwrap(),
        );

        let (owner, collection) =
            authorize_watch(&jwt, "ai_questions", &params, &headers).unwrap();

        assert_eq!(owner, "owner-a");
        assert_eq!(collection, Collection::AiQuestions);
    }

    #[test]
    fn unknown_collections_are_rejected_before_upgrade() {
        let jwt = watch_jwt();
        let params = WatchParams {
            token: Some(generate_access_token("owner-7", "Vera", &jwt).unwrap()),
        };

        let err = authorize_watch(&jwt, "unicorns", &params, &HeaderMap::new()).unwrap_err();

        assert_matches!(err, AppError::BadRequest(_));
    }
}
