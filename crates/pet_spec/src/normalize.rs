//! Per-type color constraints.

use crate::types::{PetColor, PetType};

/// Coerce `color` to one that `pet_type` can actually be drawn in.
///
/// Several pets only exist in a single palette. A stale or misconfigured
/// color is replaced rather than rejected, so rendering never blocks on
/// configuration. Rules are checked in order and the first match wins.
pub fn normalize_color(color: PetColor, pet_type: PetType) -> PetColor {
    match pet_type {
        PetType::Totoro | PetType::Rocky => PetColor::Gray,
        PetType::Snake => PetColor::Green,
        PetType::Rubberduck | PetType::Zappy => PetColor::Yellow,
        PetType::Crab => PetColor::Red,
        PetType::Dog if !matches!(color, PetColor::Brown | PetColor::Black) => PetColor::Brown,
        PetType::Cat if !matches!(color, PetColor::Brown | PetColor::Black | PetColor::Red) => {
            PetColor::Brown
        }
        _ => color,
    }
}
