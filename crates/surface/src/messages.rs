//! Wire protocol between the host and the renderer.
//!
//! Every message is a small JSON object tagged by `command`.

use pet_spec::{PetColor, PetSize, PetType};
use serde::{Deserialize, Serialize};

/// Host → renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum OutboundMessage {
    SpawnPet {
        #[serde(rename = "type")]
        pet_type: PetType,
        color: PetColor,
    },
    SetSize {
        size: PetSize,
    },
    ThrowBall,
    DeletePet,
    /// Clear all pets. The sidebar also names the primary pet to respawn.
    ResetPet {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pet_type: Option<PetType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<PetColor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<PetSize>,
    },
}

impl OutboundMessage {
    /// Reset with no primary pet to respawn.
    pub fn bare_reset() -> Self {
        OutboundMessage::ResetPet {
            pet_type: None,
            color: None,
            size: None,
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            OutboundMessage::SpawnPet { .. } => "spawn-pet",
            OutboundMessage::SetSize { .. } => "set-size",
            OutboundMessage::ThrowBall => "throw-ball",
            OutboundMessage::DeletePet => "delete-pet",
            OutboundMessage::ResetPet { .. } => "reset-pet",
        }
    }
}

/// Renderer → host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum InboundMessage {
    /// Shown as an error notification.
    Alert { text: String },
    /// Shown as an information notification.
    Info { text: String },
}

impl InboundMessage {
    pub fn text(&self) -> &str {
        match self {
            InboundMessage::Alert { text } | InboundMessage::Info { text } => text,
        }
    }
}
