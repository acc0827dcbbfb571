//! Centralized configuration constants for the pet playground.
//!
//! Setting keys, defaults and identifiers shared between the orchestration
//! and the host. These are organized by concern for maintainability.

/// Fully qualified setting keys, as reported in change events.
pub mod keys {
    /// Section holding every pet setting.
    pub const SECTION: &str = "vscode-pets";
    pub const PET_COLOR: &str = "vscode-pets.petColor";
    pub const PET_TYPE: &str = "vscode-pets.petType";
    pub const PET_SIZE: &str = "vscode-pets.petSize";
    pub const THEME: &str = "vscode-pets.theme";
    pub const POSITION: &str = "vscode-pets.position";
    /// The host's own color theme setting.
    pub const COLOR_THEME: &str = "workbench.colorTheme";

    /// Keys whose change requires the surfaces to re-render.
    pub const APPEARANCE: &[&str] = &[PET_COLOR, PET_TYPE, PET_SIZE, THEME, COLOR_THEME];
}

/// Values used when a setting is missing or invalid.
pub mod defaults {
    use pet_spec::{PetColor, PetSize, PetType};
    use theme::Theme;

    pub const PET_COLOR: PetColor = PetColor::Brown;
    pub const PET_TYPE: PetType = PetType::Cat;
    pub const PET_SIZE: PetSize = PetSize::Nano;
    pub const THEME: Theme = Theme::None;
    pub const POSITION: crate::ExtPosition = crate::ExtPosition::Panel;
    pub const COLOR_THEME: &str = "Default Dark+";
}

/// Host command and view identifiers.
pub mod commands {
    pub const START: &str = "vscode-pets.start";
    pub const SPAWN_PET: &str = "vscode-pets.spawn-pet";
    pub const THROW_BALL: &str = "vscode-pets.throw-ball";
    pub const DELETE_PETS: &str = "vscode-pets.delete-pets";
    pub const RESET_PETS: &str = "vscode-pets.reset-pets";

    /// Host command that focuses the sidebar playground.
    pub const FOCUS_VIEW: &str = "vscode-pets.petsView.focus";

    /// Context key mirroring the position setting.
    pub const POSITION_CONTEXT: &str = "vscode-pets.position";
}

/// Settings file validation limits.
pub mod settings {
    /// Maximum settings file size in bytes (64 KB).
    /// Settings files should be tiny; anything larger is suspicious.
    pub const MAX_FILE_SIZE: u64 = 64 * 1024;

    /// Maximum length for string values (theme name).
    pub const MAX_STRING_LENGTH: usize = 256;
}
