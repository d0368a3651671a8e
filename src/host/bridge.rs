use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::HostError;
use crate::game::{Direction, GameEngine};

/// Score handed to the host when the player exits.
///
/// Serialized as `{"playerCount": <score>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitPayload {
    #[serde(default)]
    pub player_count: u32,
}

impl ExitPayload {
    pub fn new(score: u32) -> Self {
        Self {
            player_count: score,
        }
    }

    pub fn encode(&self) -> Result<String, HostError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a payload; a missing `playerCount` reads as zero.
    ///
    /// Library API for the receiving side of the hand-off (the host bot);
    /// the terminal binary only encodes.
    pub fn decode(data: &str) -> Result<Self, HostError> {
        Ok(serde_json::from_str(data)?)
    }
}

/// Something the host asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Direction(Direction),
    Restart,
    Exit,
}

impl HostEvent {
    /// Apply the event; only [`HostEvent::Exit`] yields a payload.
    pub fn apply(self, engine: &mut GameEngine) -> Option<ExitPayload> {
        match self {
            HostEvent::Direction(direction) => {
                engine.set_direction(direction);
                None
            }
            HostEvent::Restart => {
                debug!(score = engine.score(), "restart requested");
                engine.reset();
                None
            }
            HostEvent::Exit => {
                let payload = engine.exit_payload();
                info!(score = payload.player_count, "exit requested");
                Some(payload)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GamePhase};

    #[test]
    fn test_payload_wire_format() {
        let payload = ExitPayload::new(7);
        assert_eq!(payload.encode().unwrap(), r#"{"playerCount":7}"#);
    }

    #[test]
    fn test_payload_decode() {
        assert_eq!(
            ExitPayload::decode(r#"{"playerCount": 12}"#).unwrap(),
            ExitPayload::new(12)
        );
        assert_eq!(ExitPayload::decode("{}").unwrap(), ExitPayload::new(0));
        assert!(matches!(
            ExitPayload::decode("not json"),
            Err(HostError::Json(_))
        ));
        assert!(ExitPayload::decode(r#"{"playerCount": -1}"#).is_err());
    }

    #[test]
    fn test_events_drive_engine() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3).unwrap();

        assert_eq!(HostEvent::Direction(Direction::Up).apply(&mut engine), None);
        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(engine.pending_direction(), Direction::Up);

        assert_eq!(
            HostEvent::Exit.apply(&mut engine),
            Some(ExitPayload::new(0))
        );

        assert_eq!(HostEvent::Restart.apply(&mut engine), None);
        assert_eq!(engine.phase(), GamePhase::NotStarted);
    }
}
