//! User commands.

use crate::Playground;
use pet_spec::{ColorChoice, PetColor, PetSpecification, PetType};
use settings::constants::commands as ids;
use settings::{Config, ExtPosition};
use std::fmt;
use std::str::FromStr;
use storage::{collection_from_memento, store_collection_as_memento};
use surface::{PetSurface, SurfaceError};

/// Text shown to the user.
pub mod notices {
    pub const SELECT_PET: &str = "Select a pet";
    pub const SELECT_COLOR: &str = "Select a color";
    pub const CANCELLED_SPAWNING: &str = "Cancelled Spawning Pet";
    pub const NO_PLAYGROUND: &str = "Please open a Pet's Playground first.";
    pub const NO_PLAYGROUND_TO_RESET: &str = "Please Open a Pet Playground to Reset the Pets!";
    pub const PLAYGROUND_CREATED: &str = "A Pet Playground has been created. You can now use the 'Spawn Additional Pet' Command to add more pets.";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    SpawnPet,
    ThrowBall,
    DeletePets,
    ResetPets,
}

impl Command {
    pub const ALL: &'static [Command] = &[
        Command::Start,
        Command::SpawnPet,
        Command::ThrowBall,
        Command::DeletePets,
        Command::ResetPets,
    ];

    /// Host command identifier.
    pub fn id(self) -> &'static str {
        match self {
            Command::Start => ids::START,
            Command::SpawnPet => ids::SPAWN_PET,
            Command::ThrowBall => ids::THROW_BALL,
            Command::DeletePets => ids::DELETE_PETS,
            Command::ResetPets => ids::RESET_PETS,
        }
    }

    /// Identifier without the `vscode-pets.` prefix.
    pub fn short_name(self) -> &'static str {
        self.id()
            .strip_prefix(settings::constants::keys::SECTION)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(self.id())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command '{0}'")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    /// Accepts both `vscode-pets.spawn-pet` and `spawn-pet`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|command| command.id() == s || command.short_name() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

impl Playground {
    /// Run `command`. Failures are reported to the user, never returned.
    pub async fn execute(&mut self, command: Command) {
        tracing::info!(%command, "Running command");
        self.process_events();
        match command {
            Command::Start => self.start(),
            Command::SpawnPet => self.spawn_pet().await,
            Command::ThrowBall => self.throw_ball(),
            Command::DeletePets => self.delete_pets(),
            Command::ResetPets => self.reset_pets(),
        }
        self.process_events();
    }

    /// Focus the sidebar, or open the panel and replay saved pets into it.
    pub fn start(&mut self) {
        let config = self.host.config.snapshot();
        if config.position() == ExtPosition::Explorer {
            self.host.window.execute_command(ids::FOCUS_VIEW);
            return;
        }
        self.show_panel_with_collection(&config);
    }

    fn show_panel_with_collection(&mut self, config: &Config) {
        let requested = self.configured_state(config);
        let panel = self.panel.create_or_show(
            self.host.panel_host.as_ref(),
            &self.host.extension_path,
            requested,
            &self.events,
        );

        let collection = collection_from_memento(self.host.memento.as_ref(), config.pet_size());
        tracing::debug!("Replaying {} saved pet(s)", collection.len());
        for spec in &collection {
            if let Err(e) = panel.spawn_pet(spec) {
                tracing::warn!("Stopped replaying saved pets: {}", e);
                break;
            }
        }
    }

    /// Ask for a pet and add it to the active surface and the saved collection.
    ///
    /// With no playground open (and position not `explorer`) this opens one
    /// instead, as `start` would.
    pub async fn spawn_pet(&mut self) {
        let config = self.host.config.snapshot();
        if !self.panel.is_open() && config.position() != ExtPosition::Explorer {
            self.show_panel_with_collection(&config);
            self.host
                .window
                .show_information_message(notices::PLAYGROUND_CREATED);
            return;
        }

        match self.prompt_pet_specification().await {
            Some(spec) => self.add_pet(spec),
            None => {
                tracing::info!("Pet spawn cancelled");
                self.host
                    .window
                    .show_error_message(notices::CANCELLED_SPAWNING);
            }
        }
    }

    /// Type prompt, then a color prompt if the type offers a choice.
    ///
    /// Size is read from configuration once both answers are in.
    async fn prompt_pet_specification(&self) -> Option<PetSpecification> {
        let window = &self.host.window;

        let types = PetType::ALL.iter().map(|t| t.to_string()).collect();
        let picked = window.show_quick_pick(types, notices::SELECT_PET).await?;
        let pet_type = parse_answer::<PetType>(&picked)?;

        let color = match pet_type.color_choices() {
            ColorChoice::Fixed(color) => color,
            ColorChoice::Pick(colors) => {
                let items = colors.iter().map(|c| c.to_string()).collect();
                let picked = window.show_quick_pick(items, notices::SELECT_COLOR).await?;
                parse_answer::<PetColor>(&picked)?
            }
        };

        let size = self.host.config.snapshot().pet_size();
        Some(PetSpecification::new(color, pet_type, size))
    }

    /// Spawn `spec` and append it to the saved collection.
    ///
    /// Nothing is saved unless the renderer received the pet. The
    /// collection is re-read here, after the prompts, so pets saved while
    /// the prompts were open are kept.
    fn add_pet(&self, spec: PetSpecification) {
        let spawned = self.with_active_surface(notices::NO_PLAYGROUND, |surface| {
            surface.spawn_pet(&spec)
        });
        if !spawned {
            return;
        }

        let memento = self.host.memento.as_ref();
        let mut collection = collection_from_memento(memento, spec.size);
        collection.push(spec);
        store_collection_as_memento(memento, &collection);
        tracing::info!(
            pet_type = %spec.pet_type,
            color = %spec.color,
            "Spawned pet, {} saved",
            collection.len()
        );
    }

    pub fn throw_ball(&self) {
        self.with_active_surface(notices::NO_PLAYGROUND, |surface| surface.throw_ball());
    }

    pub fn delete_pets(&self) {
        self.with_active_surface(notices::NO_PLAYGROUND, |surface| surface.delete_pet());
    }

    /// Clear the renderer and forget every saved pet.
    pub fn reset_pets(&self) {
        let reset = self.with_active_surface(notices::NO_PLAYGROUND_TO_RESET, |surface| {
            surface.reset_pets()
        });
        if reset {
            store_collection_as_memento(self.host.memento.as_ref(), &[]);
            tracing::info!("Saved pets cleared");
        }
    }

    /// Run `op` on the active surface.
    ///
    /// With no surface, or one that cannot reach its renderer, the user is
    /// told `missing`. Returns whether `op` succeeded.
    fn with_active_surface(
        &self,
        missing: &str,
        op: impl FnOnce(&dyn PetSurface) -> Result<(), SurfaceError>,
    ) -> bool {
        let Some(surface) = self.active_surface() else {
            self.host.window.show_error_message(missing);
            return false;
        };
        match op(surface) {
            Ok(()) => true,
            Err(e) => {
                self.report_surface_error(e, missing);
                false
            }
        }
    }
}

fn parse_answer<T>(answer: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match answer.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring prompt answer: {}", e);
            None
        }
    }
}
