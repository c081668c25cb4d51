//! JSON wire format.
//!
//! Every frame is a single JSON object:
//!
//! ```text
//! {"from": "client" | "server" | "debug",
//!  "type": "<message type>",
//!  "payload": { ... }}          // omitted for "ready"
//! ```
//!
//! ## Error Handling
//!
//! - **Invalid JSON / missing fields**: `GrahaError::Serialization`
//! - **Unknown `type`**: `GrahaError::UnrecognizedMessage`
//! - **Out-of-range headings** are not checked here; that happens when a
//!   [`WireMessage`] is converted into an inbound event.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::messages::{Envelope, Origin, WireMessage};
use crate::error::{GrahaError, Result};

/// Untyped envelope, used to dispatch on `type` before parsing the payload.
#[derive(Serialize, Deserialize)]
struct RawEnvelope {
    from: Origin,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    payload: Value,
}

/// Serialize an envelope to a JSON frame.
pub fn encode(envelope: &Envelope) -> Result<Vec<u8>> {
    let payload = match &envelope.message {
        WireMessage::TestPlanet(p) => serde_json::to_value(p)?,
        WireMessage::Ready => Value::Null,
        WireMessage::Planet(p) => serde_json::to_value(p)?,
        WireMessage::Path(p) | WireMessage::PathUnveiled(p) => serde_json::to_value(p)?,
        WireMessage::PathSelect(p) => serde_json::to_value(p)?,
        WireMessage::Target(p) => serde_json::to_value(p)?,
        WireMessage::TargetReached(p)
        | WireMessage::ExplorationCompleted(p)
        | WireMessage::Done(p) => serde_json::to_value(p)?,
    };
    let raw = RawEnvelope {
        from: envelope.from,
        kind: envelope.message.kind().to_string(),
        payload,
    };
    Ok(serde_json::to_vec(&raw)?)
}

/// Parse a JSON frame into a typed envelope.
pub fn decode(bytes: &[u8]) -> Result<Envelope> {
    let raw: RawEnvelope = serde_json::from_slice(bytes)?;
    let payload = raw.payload;

    let message = match raw.kind.as_str() {
        "testPlanet" => WireMessage::TestPlanet(parse(payload)?),
        "ready" => WireMessage::Ready,
        "planet" => WireMessage::Planet(parse(payload)?),
        "path" => WireMessage::Path(parse(payload)?),
        "pathSelect" => WireMessage::PathSelect(parse(payload)?),
        "pathUnveiled" => WireMessage::PathUnveiled(parse(payload)?),
        "target" => WireMessage::Target(parse(payload)?),
        "targetReached" => WireMessage::TargetReached(parse(payload)?),
        "explorationCompleted" => WireMessage::ExplorationCompleted(parse(payload)?),
        "done" => WireMessage::Done(parse(payload)?),
        _ => return Err(GrahaError::UnrecognizedMessage(raw.kind)),
    };

    Ok(Envelope {
        from: raw.from,
        message,
    })
}

fn parse<T: DeserializeOwned>(payload: Value) -> Result<T> {
    Ok(serde_json::from_value(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::{PathPayload, PathStatus, TextPayload};

    #[test]
    fn test_decode_server_path() {
        let frame = br#"{"from":"server","type":"path","payload":{
            "startX":0,"startY":0,"startDirection":90,
            "endX":1,"endY":0,"endDirection":270,
            "pathStatus":"free","pathWeight":2}}"#;
        let envelope = decode(frame).unwrap();

        assert_eq!(envelope.from, Origin::Server);
        assert_eq!(
            envelope.message,
            WireMessage::Path(PathPayload {
                start_x: 0,
                start_y: 0,
                start_direction: 90,
                end_x: 1,
                end_y: 0,
                end_direction: 270,
                path_status: PathStatus::Free,
                path_weight: Some(2),
            })
        );
    }

    #[test]
    fn test_ready_has_no_payload() {
        let bytes = encode(&Envelope {
            from: Origin::Client,
            message: WireMessage::Ready,
        })
        .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["type"], "ready");
        assert_eq!(json["from"], "client");
        assert!(json.get("payload").is_none());
        assert_eq!(decode(&bytes).unwrap().message, WireMessage::Ready);
    }

    #[test]
    fn test_client_path_omits_weight() {
        let bytes = encode(&Envelope {
            from: Origin::Client,
            message: WireMessage::Path(PathPayload {
                start_x: 0,
                start_y: 0,
                start_direction: 0,
                end_x: 0,
                end_y: 1,
                end_direction: 180,
                path_status: PathStatus::Blocked,
                path_weight: None,
            }),
        })
        .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["payload"]["pathStatus"], "blocked");
        assert_eq!(json["payload"]["endDirection"], 180);
        assert!(json["payload"].get("pathWeight").is_none());
    }

    #[test]
    fn test_done_text_payload() {
        let frame = br#"{"from":"server","type":"done","payload":{"message":"bye"}}"#;
        assert_eq!(
            decode(frame).unwrap().message,
            WireMessage::Done(TextPayload {
                message: "bye".into()
            })
        );
    }

    #[test]
    fn test_unknown_type() {
        let frame = br#"{"from":"server","type":"adjust","payload":{}}"#;
        match decode(frame) {
            Err(GrahaError::UnrecognizedMessage(kind)) => assert_eq!(kind, "adjust"),
            other => panic!("expected UnrecognizedMessage, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_payload() {
        let frame = br#"{"from":"server","type":"target","payload":{"targetX":"a"}}"#;
        assert!(matches!(decode(frame), Err(GrahaError::Serialization(_))));
        assert!(matches!(decode(b"not json"), Err(GrahaError::Serialization(_))));
    }
}
