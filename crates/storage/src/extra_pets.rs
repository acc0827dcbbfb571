//! Persistence of the extra-pet collection.
//!
//! The collection is stored as two parallel arrays of tags, one for types
//! and one for colors. Index `i` of both arrays describes one pet. Size is
//! never stored; it comes from the current configuration at load time.

use crate::memento::{get_or, Memento};
use pet_spec::{PetCollection, PetColor, PetSize, PetSpecification, PetType};
use serde_json::Value;

pub const EXTRA_PETS_KEY_TYPES: &str = "vscode-pets.extra-pets.types";
pub const EXTRA_PETS_KEY_COLORS: &str = "vscode-pets.extra-pets.colors";

/// Rebuild the collection from the store, applying `size` to every pet.
///
/// Missing keys read as empty arrays. If the arrays disagree in length only
/// the indices present in both are used. Entries with unknown tags are
/// skipped.
pub fn collection_from_memento(memento: &dyn Memento, size: PetSize) -> PetCollection {
    let types: Vec<String> = get_or(memento, EXTRA_PETS_KEY_TYPES, Vec::new());
    let colors: Vec<String> = get_or(memento, EXTRA_PETS_KEY_COLORS, Vec::new());

    if types.len() != colors.len() {
        tracing::warn!(
            "Extra pet arrays disagree in length ({} types, {} colors); ignoring unmatched entries",
            types.len(),
            colors.len()
        );
    }

    types
        .iter()
        .zip(colors.iter())
        .enumerate()
        .filter_map(|(index, (ty, color))| {
            match (ty.parse::<PetType>(), color.parse::<PetColor>()) {
                (Ok(pet_type), Ok(color)) => Some(PetSpecification::new(color, pet_type, size)),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!("Skipping stored extra pet {}: {}", index, e);
                    None
                }
            }
        })
        .collect()
}

/// Overwrite both arrays with `collection` and mark them for sync.
///
/// This is a full replace; callers pass the entire collection every time.
pub fn store_collection_as_memento(memento: &dyn Memento, collection: &[PetSpecification]) {
    let types: Vec<Value> = collection
        .iter()
        .map(|spec| Value::from(spec.pet_type.as_str()))
        .collect();
    let colors: Vec<Value> = collection
        .iter()
        .map(|spec| Value::from(spec.color.as_str()))
        .collect();

    memento.update(EXTRA_PETS_KEY_TYPES, Value::Array(types));
    memento.update(EXTRA_PETS_KEY_COLORS, Value::Array(colors));
    memento.set_keys_for_sync(&[EXTRA_PETS_KEY_TYPES, EXTRA_PETS_KEY_COLORS]);
    tracing::debug!("Stored {} extra pet(s)", collection.len());
}
