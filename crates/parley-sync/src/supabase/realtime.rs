//! Minimal Phoenix-channel client for Supabase Realtime postgres changes.

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use url::Url;

use super::SupabaseConfig;
use crate::backend::MessageStream;
use crate::error::{Result, SyncError};
use crate::models::SyncMessage;

const PROTOCOL_VERSION: &str = "1.0.0";
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);
const JOIN_REF: &str = "1";

/// What a single server frame means to the subscriber
#[derive(Debug)]
pub(crate) enum RealtimeFrame {
    Insert(SyncMessage),
    Error(String),
    Closed(String),
    Ignored,
}

enum Step {
    Heartbeat,
    Incoming(Option<std::result::Result<WsMessage, tokio_tungstenite::tungstenite::Error>>),
}

pub(crate) fn realtime_url(base: &str, api_key: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    let scheme = match url.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => {
            return Err(SyncError::Subscription(format!(
                "unsupported URL scheme: {}",
                other
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| SyncError::Subscription(format!("cannot switch {} to {}", base, scheme)))?;
    url.set_path("/realtime/v1/websocket");
    url.query_pairs_mut()
        .clear()
        .append_pair("apikey", api_key)
        .append_pair("vsn", PROTOCOL_VERSION);
    Ok(url)
}

pub(crate) fn join_frame(table: &str, context_id: &str, access_token: &str) -> Value {
    json!({
        "topic": format!("realtime:{}", table),
        "event": "phx_join",
        "payload": {
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [{
                    "event": "INSERT",
                    "schema": "public",
                    "table": table,
                    "filter": format!("context_id=eq.{}", context_id),
                }]
            },
            "access_token": access_token,
        },
        "ref": JOIN_REF,
        "join_ref": JOIN_REF,
    })
}

pub(crate) fn heartbeat_frame(msg_ref: u64) -> Value {
    json!({
        "topic": "phoenix",
        "event": "heartbeat",
        "payload": {},
        "ref": msg_ref.to_string(),
    })
}

pub(crate) fn decode_frame(text: &str) -> Result<RealtimeFrame> {
    let frame: Value = serde_json::from_str(text)?;
    let event = frame.get("event").and_then(Value::as_str).unwrap_or_default();
    let payload = frame.get("payload").cloned().unwrap_or(Value::Null);

    let frame = match event {
        "postgres_changes" => {
            let data = &payload["data"];
            if data["type"].as_str() == Some("INSERT") {
                RealtimeFrame::Insert(serde_json::from_value(data["record"].clone())?)
            } else {
                RealtimeFrame::Ignored
            }
        }
        "phx_reply" if payload["status"].as_str() == Some("error") => {
            RealtimeFrame::Error(reason(&payload["response"], "channel join rejected"))
        }
        "system" if payload["status"].as_str() == Some("error") => {
            RealtimeFrame::Error(reason(&payload, "realtime system error"))
        }
        "phx_error" => RealtimeFrame::Closed("channel crashed".to_string()),
        "phx_close" => RealtimeFrame::Closed("channel closed by server".to_string()),
        _ => RealtimeFrame::Ignored,
    };

    Ok(frame)
}

fn reason(value: &Value, fallback: &str) -> String {
    value
        .get("reason")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

/// Open the socket, join the channel and return the insert feed.
///
/// Heartbeats are sent from inside the stream, so the connection lives
/// exactly as long as the stream is polled or held.
pub(crate) async fn subscribe(
    config: &SupabaseConfig,
    table: &str,
    context_id: &str,
) -> Result<MessageStream> {
    let url = realtime_url(&config.url, &config.anon_key)?;
    tracing::info!(table, context_id, "Connecting to realtime");

    let (socket, _) = connect_async(url.as_str()).await?;
    let (mut sink, mut source) = socket.split();

    let join = join_frame(table, context_id, config.bearer());
    sink.send(WsMessage::Text(join.to_string().into())).await?;

    let stream = async_stream::stream! {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut next_ref: u64 = 2;

        loop {
            let step = tokio::select! {
                _ = heartbeat.tick() => Step::Heartbeat,
                incoming = source.next() => Step::Incoming(incoming),
            };

            match step {
                Step::Heartbeat => {
                    let frame = heartbeat_frame(next_ref);
                    next_ref += 1;
                    if let Err(e) = sink.send(WsMessage::Text(frame.to_string().into())).await {
                        yield Err(SyncError::from(e));
                        break;
                    }
                }
                Step::Incoming(Some(Ok(WsMessage::Text(text)))) => match decode_frame(text.as_str()) {
                    Ok(RealtimeFrame::Insert(message)) => yield Ok(message),
                    Ok(RealtimeFrame::Error(reason)) => yield Err(SyncError::Subscription(reason)),
                    Ok(RealtimeFrame::Closed(reason)) => {
                        yield Err(SyncError::Subscription(reason));
                        break;
                    }
                    Ok(RealtimeFrame::Ignored) => {}
                    Err(e) => yield Err(e),
                },
                Step::Incoming(Some(Ok(WsMessage::Close(_)))) | Step::Incoming(None) => {
                    tracing::info!("Realtime connection closed");
                    break;
                }
                Step::Incoming(Some(Ok(_))) => {}
                Step::Incoming(Some(Err(e))) => {
                    yield Err(SyncError::from(e));
                    break;
                }
            }
        }
    };

    Ok(Box::pin(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;

    #[test]
    fn test_realtime_url() {
        let url = realtime_url("https://proj.supabase.co", "anon").unwrap();
        assert_eq!(
            url.as_str(),
            "wss://proj.supabase.co/realtime/v1/websocket?apikey=anon&vsn=1.0.0"
        );

        let local = realtime_url("http://localhost:54321", "k").unwrap();
        assert_eq!(local.scheme(), "ws");
        assert_eq!(local.port(), Some(54321));
    }

    #[test]
    fn test_join_frame_filters_context() {
        let frame = join_frame("mcp_messages", "ctx-9", "token");
        assert_eq!(frame["topic"], "realtime:mcp_messages");
        assert_eq!(frame["event"], "phx_join");

        let change = &frame["payload"]["config"]["postgres_changes"][0];
        assert_eq!(change["event"], "INSERT");
        assert_eq!(change["table"], "mcp_messages");
        assert_eq!(change["filter"], "context_id=eq.ctx-9");
        assert_eq!(frame["payload"]["access_token"], "token");
    }

    #[test]
    fn test_decode_insert() {
        let text = json!({
            "topic": "realtime:mcp_messages",
            "event": "postgres_changes",
            "payload": {
                "data": {
                    "type": "INSERT",
                    "schema": "public",
                    "table": "mcp_messages",
                    "commit_timestamp": "2024-03-01T12:00:00Z",
                    "record": {
                        "id": "m-1",
                        "created_at": "2024-03-01T12:00:00+00:00",
                        "context_id": "ctx-9",
                        "direction": "incoming",
                        "message_type": "response",
                        "content": {"ok": true},
                        "metadata": null
                    }
                },
                "ids": [1]
            },
            "ref": null
        })
        .to_string();

        match decode_frame(&text).unwrap() {
            RealtimeFrame::Insert(message) => {
                assert_eq!(message.id, "m-1");
                assert_eq!(message.direction, Direction::Incoming);
            }
            other => panic!("expected insert, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_join_error() {
        let text = r#"{"topic":"realtime:mcp_messages","event":"phx_reply","payload":{"status":"error","response":{"reason":"unmatched topic"}},"ref":"1"}"#;
        match decode_frame(text).unwrap() {
            RealtimeFrame::Error(reason) => assert_eq!(reason, "unmatched topic"),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_ignores_replies_and_system_ok() {
        let ok = r#"{"topic":"phoenix","event":"phx_reply","payload":{"status":"ok","response":{}},"ref":"2"}"#;
        assert!(matches!(decode_frame(ok).unwrap(), RealtimeFrame::Ignored));

        let system = r#"{"topic":"realtime:mcp_messages","event":"system","payload":{"status":"ok","message":"Subscribed to PostgreSQL"},"ref":null}"#;
        assert!(matches!(decode_frame(system).unwrap(), RealtimeFrame::Ignored));
    }

    #[test]
    fn test_decode_close_and_garbage() {
        let close = r#"{"topic":"realtime:mcp_messages","event":"phx_close","payload":{},"ref":"1"}"#;
        assert!(matches!(decode_frame(close).unwrap(), RealtimeFrame::Closed(_)));
        assert!(decode_frame("not json").is_err());
    }

    #[test]
    fn test_heartbeat_frame() {
        let frame = heartbeat_frame(7);
        assert_eq!(frame["topic"], "phoenix");
        assert_eq!(frame["ref"], "7");
    }
}
