//! Legacy SCCT score WebSocket
//!
//! Starší verze SCCT posílají stav zápasu přes ws://localhost:62345/score jako
//! `{"event": "...", "data": {...}}`. Zajímá nás jen první `ALL_DATA` envelope
//! v rámci prvních pár zpráv.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::StreamExt;
use prediction_engine::{MatchField, RawFields};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

use crate::config::MonitorConfig;
use crate::error::ScctError;
use crate::source::{MatchSource, SourceSnapshot};

pub const ALL_DATA_EVENT: &str = "ALL_DATA";

#[derive(Debug, Deserialize)]
struct ScoreEnvelope {
    event: String,
    #[serde(default)]
    data: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct WebSocketSource {
    url: String,
    timeout: Duration,
    max_messages: usize,
}

impl WebSocketSource {
    pub fn new(url: impl Into<String>, timeout: Duration, max_messages: usize) -> Self {
        Self { url: url.into(), timeout, max_messages }
    }

    pub fn from_config(cfg: &MonitorConfig) -> Self {
        Self::new(&cfg.ws_url, cfg.ws_timeout, cfg.ws_max_messages)
    }

    fn timed_out(&self) -> ScctError {
        ScctError::Timeout { target: self.url.clone(), after: self.timeout }
    }
}

#[async_trait]
impl MatchSource for WebSocketSource {
    fn name(&self) -> &'static str {
        "websocket"
    }

    async fn fetch_raw(&self) -> Result<SourceSnapshot, ScctError> {
        let started = Instant::now();

        let (mut ws, _resp) = timeout(self.timeout, connect_async(self.url.as_str()))
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| ScctError::Discovery { target: self.url.clone(), source: Box::new(e) })?;

        let mut fields = None;
        for _ in 0..self.max_messages {
            let msg = match timeout(self.timeout, ws.next()).await {
                Err(_) => return Err(self.timed_out()),
                Ok(None) => break,
                Ok(Some(Err(e))) => {
                    return Err(ScctError::Discovery { target: self.url.clone(), source: Box::new(e) })
                }
                Ok(Some(Ok(msg))) => msg,
            };

            let text = match msg {
                Message::Text(_) | Message::Binary(_) => msg
                    .into_text()
                    .map_err(|e| ScctError::Parse {
                        field: "envelope".to_string(),
                        value: e.to_string(),
                        origin: self.url.clone(),
                    })?,
                Message::Close(_) => break,
                _ => continue,
            };

            let envelope: ScoreEnvelope = serde_json::from_str(&text).map_err(|e| ScctError::Parse {
                field: "envelope".to_string(),
                value: format!("{e}: {}", text.chars().take(120).collect::<String>()),
                origin: self.url.clone(),
            })?;

            if envelope.event == ALL_DATA_EVENT {
                fields = Some(fields_from_payload(&envelope.data, &self.url)?);
                break;
            }
            debug!(event = %envelope.event, "Skipping SCCT envelope");
        }

        if let Err(e) = ws.close(None).await {
            debug!("SCCT websocket close failed: {}", e);
        }

        match fields {
            Some(fields) => Ok(SourceSnapshot {
                origin: self.url.clone(),
                port: None,
                elapsed: started.elapsed(),
                fields,
            }),
            None => {
                warn!("No {} envelope from {} within {} messages", ALL_DATA_EVENT, self.url, self.max_messages);
                Err(ScctError::NotFound { target: self.url.clone(), scanned: self.max_messages })
            }
        }
    }
}

/// Map the `ALL_DATA` payload onto the same raw strings the file source produces.
/// Numbers are accepted anywhere; a numeric `bestof` becomes "BO<n>".
fn fields_from_payload(data: &Map<String, Value>, origin: &str) -> Result<RawFields, ScctError> {
    let mut raw = RawFields::default();

    for field in MatchField::ALL {
        let value = match (field, data.get(field.name())) {
            (MatchField::BestOf, Some(Value::Number(n))) => format!("BO{n}"),
            (_, Some(Value::String(s))) => s.clone(),
            (_, Some(Value::Number(n))) => n.to_string(),
            (MatchField::League, None | Some(Value::Null)) => String::new(),
            (_, other) => {
                return Err(ScctError::Parse {
                    field: field.name().to_string(),
                    value: other.map(Value::to_string).unwrap_or_else(|| "<missing>".to_string()),
                    origin: origin.to_string(),
                })
            }
        };
        raw.set(field, value);
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::SinkExt;
    use serde_json::json;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    /// One-shot SCCT stand-in: sends `messages`, then waits for the client to hang up.
    async fn fake_scct(messages: Vec<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            for m in messages {
                if ws.send(Message::text(m)).await.is_err() {
                    return;
                }
            }
            while let Some(Ok(_)) = ws.next().await {}
        });

        format!("ws://{addr}/score")
    }

    fn source(url: String) -> WebSocketSource {
        WebSocketSource::new(url, Duration::from_secs(2), 3)
    }

    #[tokio::test]
    async fn picks_all_data_envelope() {
        let url = fake_scct(vec![
            json!({"event": "CONNECTED", "data": {}}).to_string(),
            json!({"event": "ALL_DATA", "data": {
                "team1": "Serral", "team2": "Clem", "bestof": 5, "score1": 3, "score2": 1
            }})
            .to_string(),
        ])
        .await;

        let snapshot = source(url.clone()).fetch_raw().await.unwrap();
        assert_eq!(snapshot.origin, url);
        assert_eq!(snapshot.fields.bestof, "BO5");
        assert_eq!(snapshot.fields.score1, "3");
        assert_eq!(snapshot.fields.league, "");

        let record = prediction_engine::build(&snapshot.fields).unwrap();
        assert_eq!(record.winning_score(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_message_budget() {
        let noise = json!({"event": "SCORE", "data": {"score1": 1}}).to_string();
        let url = fake_scct(vec![noise.clone(), noise.clone(), noise.clone(), noise]).await;

        let err = source(url).fetch_raw().await.unwrap_err();
        assert!(matches!(err, ScctError::NotFound { scanned: 3, .. }), "{err:?}");
    }

    #[tokio::test]
    async fn malformed_envelope_is_parse_error() {
        let url = fake_scct(vec!["not json".to_string()]).await;
        let err = source(url).fetch_raw().await.unwrap_err();
        assert_eq!(err.kind(), "PARSE");
    }

    #[tokio::test]
    async fn refused_connection_is_discovery_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = source(format!("ws://{addr}/score")).fetch_raw().await.unwrap_err();
        assert_eq!(err.kind(), "DISCOVERY");
        assert!(err.is_transient());
    }

    #[test]
    fn payload_mapping_rejects_missing_scores() {
        let data = json!({"team1": "Serral", "team2": "Clem", "bestof": "BO3", "score1": 0});
        let err = fields_from_payload(data.as_object().unwrap(), "ws://test").unwrap_err();
        assert!(matches!(err, ScctError::Parse { ref field, .. } if field == "score2"));
    }
}
