//! Protocol module - line-delimited JSON messages
//!
//! Every message is one JSON object on its own line, discriminated by a
//! `type` field.
//!
//! Client -> engine: `action`, `advance`, `snapshot`, `quit`.
//! Engine -> client: `update`, `snapshot`, `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use brickfall_core::{ClearRow, GameEvent, GameSnapshot, Side, ViewData};

use crate::error::ProtocolError;
use crate::runtime::{SideSnapshot, Update};
use crate::types::{Cell, GameAction};

// ============== Client -> Engine ==============

const CLIENT_TYPES: [&str; 4] = ["action", "advance", "snapshot", "quit"];

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ClientMessage {
    Action {
        action: String,
        #[serde(default)]
        side: Option<String>,
    },
    Advance {
        ms: u32,
    },
    Snapshot,
    Quit,
}

/// A validated client request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Action {
        side: Option<Side>,
        action: GameAction,
    },
    Advance {
        ms: u32,
    },
    Snapshot,
    Quit,
}

/// Parse one client line.
pub fn parse_request(line: &str) -> Result<Request, ProtocolError> {
    let value: Value = serde_json::from_str(line)?;
    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        return Err(ProtocolError::Malformed {
            detail: "missing string field 'type'".to_string(),
        });
    };
    if !CLIENT_TYPES.contains(&kind) {
        return Err(ProtocolError::UnknownType {
            name: kind.to_string(),
        });
    }

    let request = match serde_json::from_value::<ClientMessage>(value)? {
        ClientMessage::Action { action, side } => {
            let parsed = GameAction::from_str(&action)
                .ok_or(ProtocolError::UnknownAction { name: action })?;
            let side = side
                .map(|name| Side::from_str(&name).ok_or(ProtocolError::UnknownSide { name }))
                .transpose()?;
            Request::Action {
                side,
                action: parsed,
            }
        }
        ClientMessage::Advance { ms } => Request::Advance { ms },
        ClientMessage::Snapshot => Request::Snapshot,
        ClientMessage::Quit => Request::Quit,
    };
    Ok(request)
}

// ============== Engine -> Client ==============

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    Update(UpdateMessage),
    Snapshot(SnapshotMessage),
    Error(ErrorMessage),
}

impl ServerMessage {
    /// Serialize to a single line (no trailing newline).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The falling piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceView {
    pub kind: &'static str,
    pub orientation: usize,
    pub x: i32,
    pub y: i32,
    pub ghost_y: Option<i32>,
    pub shape: Vec<Vec<Cell>>,
    pub next: &'static str,
    pub next_shape: Vec<Vec<Cell>>,
}

impl From<&ViewData> for PieceView {
    fn from(view: &ViewData) -> Self {
        Self {
            kind: view.kind.as_str(),
            orientation: view.orientation,
            x: view.x,
            y: view.y,
            ghost_y: view.ghost_y,
            shape: view.shape.to_rows(),
            next: view.next_kind.as_str(),
            next_shape: view.next_shape.to_rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearedView {
    pub lines: usize,
    pub rows: Vec<usize>,
    /// Grid after removal.
    pub grid: Vec<Vec<Cell>>,
}

impl From<&ClearRow> for ClearedView {
    fn from(clear: &ClearRow) -> Self {
        Self {
            lines: clear.lines_removed,
            rows: clear.cleared_rows.clone(),
            grid: clear.new_matrix.to_rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EventView {
    GameStarted,
    PieceSpawned {
        kind: &'static str,
    },
    PieceLocked {
        kind: &'static str,
        x: i32,
        y: i32,
    },
    LinesCleared {
        rows: Vec<usize>,
        points: u32,
        combo: u32,
    },
    Held {
        held: &'static str,
        current: &'static str,
    },
    Paused,
    Resumed,
    GameOver {
        score: u32,
    },
}

impl From<&GameEvent> for EventView {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::GameStarted => EventView::GameStarted,
            GameEvent::PieceSpawned { kind } => EventView::PieceSpawned {
                kind: kind.as_str(),
            },
            GameEvent::PieceLocked { kind, x, y } => EventView::PieceLocked {
                kind: kind.as_str(),
                x: *x,
                y: *y,
            },
            GameEvent::LinesCleared {
                rows,
                points,
                combo,
            } => EventView::LinesCleared {
                rows: rows.clone(),
                points: *points,
                combo: *combo,
            },
            GameEvent::Held { held, current } => EventView::Held {
                held: held.as_str(),
                current: current.as_str(),
            },
            GameEvent::Paused => EventView::Paused,
            GameEvent::Resumed => EventView::Resumed,
            GameEvent::GameOver { score } => EventView::GameOver { score: *score },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
    pub changed: bool,
    pub piece: PieceView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared: Option<ClearedView>,
    pub events: Vec<EventView>,
    pub game_over: bool,
}

impl From<&Update> for UpdateMessage {
    fn from(update: &Update) -> Self {
        let outcome = &update.outcome;
        Self {
            side: update.side.map(|side| side.as_str()),
            changed: outcome.changed,
            piece: PieceView::from(&outcome.view),
            cleared: outcome.cleared.as_ref().map(ClearedView::from),
            events: outcome.events.iter().map(EventView::from).collect(),
            game_over: outcome.game_over(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
    pub grid: Vec<Vec<Cell>>,
    pub piece: PieceView,
    pub held: Option<&'static str>,
    pub can_hold: bool,
    pub score: u32,
    pub combo: u32,
    pub lines: u32,
    pub high_score: u32,
    pub paused: bool,
    pub game_over: bool,
    pub difficulty: &'static str,
}

impl SnapshotMessage {
    pub fn new(side: Option<Side>, snapshot: &GameSnapshot) -> Self {
        Self {
            side: side.map(|side| side.as_str()),
            grid: snapshot.grid.clone(),
            piece: PieceView::from(&snapshot.view),
            held: snapshot.held.map(|kind| kind.as_str()),
            can_hold: snapshot.can_hold,
            score: snapshot.score,
            combo: snapshot.combo,
            lines: snapshot.lines,
            high_score: snapshot.high_score,
            paused: snapshot.paused,
            game_over: snapshot.game_over,
            difficulty: snapshot.difficulty.as_str(),
        }
    }
}

impl From<&SideSnapshot> for SnapshotMessage {
    fn from(value: &SideSnapshot) -> Self {
        Self::new(value.side, &value.snapshot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub code: &'static str,
    pub message: String,
}

impl From<&ProtocolError> for ErrorMessage {
    fn from(err: &ProtocolError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        let request = parse_request(r#"{"type":"action","action":"hardDrop"}"#).unwrap();
        assert_eq!(
            request,
            Request::Action {
                side: None,
                action: GameAction::HardDrop
            }
        );

        let request =
            parse_request(r#"{"type":"action","action":"rotate","side":"right"}"#).unwrap();
        assert_eq!(
            request,
            Request::Action {
                side: Some(Side::Right),
                action: GameAction::RotateCw
            }
        );
    }

    #[test]
    fn test_parse_other_requests() {
        assert_eq!(
            parse_request(r#"{"type":"advance","ms":16}"#).unwrap(),
            Request::Advance { ms: 16 }
        );
        assert_eq!(parse_request(r#"{"type":"snapshot"}"#).unwrap(), Request::Snapshot);
        assert_eq!(parse_request(r#" {"type":"quit"} "#).unwrap(), Request::Quit);
    }

    #[test]
    fn test_parse_errors_carry_codes() {
        let code = |line: &str| parse_request(line).unwrap_err().code();
        assert_eq!(code("not json"), "malformed");
        assert_eq!(code(r#"{"action":"hold"}"#), "malformed");
        assert_eq!(code(r#"{"type":"advance"}"#), "malformed");
        assert_eq!(code(r#"{"type":"hello"}"#), "unknown_type");
        assert_eq!(code(r#"{"type":"action","action":"spin"}"#), "unknown_action");
        assert_eq!(
            code(r#"{"type":"action","action":"hold","side":"middle"}"#),
            "unknown_side"
        );
    }

    #[test]
    fn test_error_message_serializes_with_type_tag() {
        let err = ProtocolError::UnknownType {
            name: "hello".to_string(),
        };
        let line = ServerMessage::Error(ErrorMessage::from(&err)).to_line().unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["code"], "unknown_type");
        assert_eq!(value["message"], "unknown message type 'hello'");
    }

    #[test]
    fn test_event_view_tagging() {
        let event = GameEvent::LinesCleared {
            rows: vec![23, 24],
            points: 300,
            combo: 1,
        };
        let value = serde_json::to_value(EventView::from(&event)).unwrap();
        assert_eq!(value["event"], "linesCleared");
        assert_eq!(value["rows"], serde_json::json!([23, 24]));
        assert_eq!(value["points"], 300);
    }
}
