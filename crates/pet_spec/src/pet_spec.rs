//! Pet identity for the pet playground.
//!
//! A [`PetSpecification`] is the (color, type, size) triple describing how a
//! single pet should look. Specifications are plain values: they are built
//! when a pet is spawned or loaded from storage and replaced, never edited,
//! when configuration changes.
//!
//! # Modules
//!
//! - `types` - Tagged enums for type, color and size
//! - `normalize` - Per-type color constraints

mod normalize;
mod types;

pub use normalize::normalize_color;
pub use types::{ColorChoice, PetColor, PetSize, PetType, UnknownTag};

use serde::{Deserialize, Serialize};

/// Intended appearance of one pet.
///
/// Construction does not validate the color against the type; an
/// unnormalized value may be held transiently and is normalized by the
/// surface that renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PetSpecification {
    pub color: PetColor,
    #[serde(rename = "type")]
    pub pet_type: PetType,
    pub size: PetSize,
}

impl PetSpecification {
    pub fn new(color: PetColor, pet_type: PetType, size: PetSize) -> Self {
        Self {
            color,
            pet_type,
            size,
        }
    }

    /// Color this pet will actually be drawn in.
    pub fn normalized_color(&self) -> PetColor {
        normalize_color(self.color, self.pet_type)
    }

    /// Copy with the color coerced to the type's palette.
    pub fn normalized(self) -> Self {
        Self {
            color: self.normalized_color(),
            ..self
        }
    }
}

impl Default for PetSpecification {
    fn default() -> Self {
        Self::new(PetColor::default(), PetType::default(), PetSize::default())
    }
}

/// Ordered pets beyond the primary configured one.
///
/// Index order is significant: it lines up the parallel arrays in storage.
pub type PetCollection = Vec<PetSpecification>;
