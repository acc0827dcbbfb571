//! Integration tests for the pet playground.
//!
//! These drive a [`Playground`] end to end through in-memory host doubles:
//! commands in, renderer messages, documents, notifications and saved
//! state out.
//!
//! # Test Organization
//!
//! - `start` - Opening the playground and replaying saved pets
//! - `spawn_pet` - The interactive spawn flow
//! - `surface_commands` - throw-ball, delete-pets, reset-pets
//! - `configuration` - Reacting to setting changes
//! - `host_events` - Dispose, visibility and renderer messages
//! - `persistence` - File-backed state and config across sessions
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p playground --test integration_tests
//! ```

mod common;

use common::{tempdir, Fixtures, Harness, Prompt};
use pet_spec::{PetColor, PetSize, PetSpecification, PetType};
use playground::{notices, Command};
use pretty_assertions::assert_eq as pretty_eq;
use settings::constants::commands as ids;
use surface::OutboundMessage;

fn pet(color: PetColor, pet_type: PetType) -> PetSpecification {
    PetSpecification::new(color, pet_type, PetSize::Nano)
}

// ============================================================================
// Start
// ============================================================================

mod start {
    use super::*;

    #[test]
    fn test_activation_publishes_position() {
        let harness = Harness::new();
        pretty_eq!(
            harness.window.contexts(),
            vec![(ids::POSITION_CONTEXT.to_string(), "panel".to_string())]
        );
    }

    #[test]
    fn test_start_opens_panel_and_replays_in_order() {
        let mut harness = Harness::new();
        let saved = [
            pet(PetColor::Black, PetType::Dog),
            pet(PetColor::Red, PetType::Crab),
            pet(PetColor::Yellow, PetType::Clippy),
        ];
        harness.seed_pets(&saved);

        harness.run(Command::Start);

        assert_eq!(harness.panels.created().len(), 1);
        let expected: Vec<_> = saved.iter().flat_map(Fixtures::spawn_messages).collect();
        pretty_eq!(harness.panel_messages(), expected);
    }

    #[test]
    fn test_start_twice_reuses_panel() {
        let mut harness = Harness::new();
        harness.run(Command::Start);
        harness.run(Command::Start);

        assert_eq!(harness.panels.created().len(), 1);
        let panel = harness.panel();
        assert_eq!(panel.webview().html_writes(), 1);
        assert_eq!(panel.reveals().len(), 1);
    }

    #[test]
    fn test_start_in_explorer_focuses_sidebar() {
        let (mut harness, view) = Harness::explorer();
        harness.run(Command::Start);

        pretty_eq!(harness.window.executed_commands(), vec![ids::FOCUS_VIEW]);
        assert!(harness.panels.created().is_empty());
        assert!(view.webview().messages().is_empty());
    }

    #[test]
    fn test_start_after_revive_reveals_restored_panel() {
        let mut harness = Harness::new();
        let restored = surface::test_support::FakePanel::new();
        harness
            .playground
            .deserialize_webview_panel(Box::new(restored.clone()));

        harness.run(Command::Start);

        assert!(harness.panels.created().is_empty());
        assert_eq!(restored.reveals().len(), 1);
        assert_eq!(restored.webview().html_writes(), 1);
    }

    #[test]
    fn test_document_reflects_configuration() {
        let mut harness = Harness::with_config(Fixtures::config_with(|c| {
            c.vscode_pets.pet_type = "totoro".into();
            c.vscode_pets.pet_color = "black".into();
            c.vscode_pets.theme = "forest".into();
        }));
        harness.run(Command::Start);

        let html = harness.panel().webview().last_html().unwrap_or_default();
        assert_contains!(html, r#""forest", 2, "gray", "nano", "totoro""#);
        assert_contains!(html, "/opt/pet-playground/media/main-bundle.js");
    }
}

// ============================================================================
// Spawn Pet
// ============================================================================

mod spawn_pet {
    use super::*;

    fn open_playground() -> Harness {
        let mut harness = Harness::new();
        harness.run(Command::Start);
        harness
    }

    #[test]
    fn test_crab_skips_color_prompt_and_is_red() {
        let mut harness = open_playground();
        harness.window.answer(Some("crab"));

        harness.run(Command::SpawnPet);

        let prompts = harness.window.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].placeholder, notices::SELECT_PET);
        assert_eq!(prompts[0].items.len(), PetType::ALL.len());

        let crab = pet(PetColor::Red, PetType::Crab);
        pretty_eq!(harness.panel_messages(), Fixtures::spawn_messages(&crab));
        pretty_eq!(harness.saved_pets(), vec![crab]);
    }

    #[test]
    fn test_dog_offers_black_and_brown() {
        let mut harness = open_playground();
        harness.window.answer(Some("dog"));
        harness.window.answer(Some("black"));

        harness.run(Command::SpawnPet);

        pretty_eq!(
            harness.window.prompts()[1],
            Prompt {
                placeholder: notices::SELECT_COLOR.to_string(),
                items: vec!["black".to_string(), "brown".to_string()],
            }
        );
        pretty_eq!(
            harness.saved_pets(),
            vec![pet(PetColor::Black, PetType::Dog)]
        );
    }

    #[test]
    fn test_cancelled_type_prompt_changes_nothing() {
        let mut harness = open_playground();
        harness.window.answer(None);

        harness.run(Command::SpawnPet);

        pretty_eq!(harness.window.errors(), vec![notices::CANCELLED_SPAWNING]);
        assert!(harness.panel_messages().is_empty());
        assert!(harness.saved_pets().is_empty());
    }

    #[test]
    fn test_cancelled_color_prompt_changes_nothing() {
        let mut harness = open_playground();
        harness.window.answer(Some("cat"));
        harness.window.answer(None);

        harness.run(Command::SpawnPet);

        assert_eq!(harness.window.prompts().len(), 2);
        pretty_eq!(harness.window.errors(), vec![notices::CANCELLED_SPAWNING]);
        assert!(harness.saved_pets().is_empty());
    }

    #[test]
    fn test_unknown_answer_counts_as_cancel() {
        let mut harness = open_playground();
        harness.window.answer(Some("dragon"));

        harness.run(Command::SpawnPet);

        pretty_eq!(harness.window.errors(), vec![notices::CANCELLED_SPAWNING]);
        assert!(harness.saved_pets().is_empty());
    }

    #[test]
    fn test_spawns_accumulate_in_order() {
        let mut harness = open_playground();
        for answer in ["snake", "rocky", "zappy"] {
            harness.window.answer(Some(answer));
            harness.run(Command::SpawnPet);
        }

        pretty_eq!(
            harness.saved_pets(),
            vec![
                pet(PetColor::Green, PetType::Snake),
                pet(PetColor::Gray, PetType::Rocky),
                pet(PetColor::Yellow, PetType::Zappy),
            ]
        );
    }

    #[test]
    fn test_spawn_uses_configured_size() {
        let mut harness = open_playground();
        harness.configure(|c| c.vscode_pets.pet_size = "large".into());
        harness.window.answer(Some("rubberduck"));

        harness.run(Command::SpawnPet);

        pretty_eq!(
            harness.panel_messages(),
            vec![
                OutboundMessage::SpawnPet {
                    pet_type: PetType::Rubberduck,
                    color: PetColor::Yellow,
                },
                OutboundMessage::SetSize {
                    size: PetSize::Large
                },
            ]
        );
    }

    #[test]
    fn test_without_playground_creates_one() {
        let mut harness = Harness::new();
        harness.seed_pets(&[pet(PetColor::Brown, PetType::Cat)]);

        harness.run(Command::SpawnPet);

        assert!(harness.window.prompts().is_empty());
        assert_eq!(harness.panels.created().len(), 1);
        pretty_eq!(harness.window.infos(), vec![notices::PLAYGROUND_CREATED]);
        pretty_eq!(
            harness.panel_messages(),
            Fixtures::spawn_messages(&pet(PetColor::Brown, PetType::Cat))
        );
    }

    #[test]
    fn test_explorer_spawns_into_sidebar() {
        let (mut harness, view) = Harness::explorer();
        harness.window.answer(Some("totoro"));

        harness.run(Command::SpawnPet);

        let totoro = pet(PetColor::Gray, PetType::Totoro);
        pretty_eq!(view.webview().messages(), Fixtures::spawn_messages(&totoro));
        assert!(harness.panels.created().is_empty());
        pretty_eq!(harness.saved_pets(), vec![totoro]);
    }
}

// ============================================================================
// Surface Commands
// ============================================================================

mod surface_commands {
    use super::*;

    #[test]
    fn test_throw_and_delete_need_a_playground() {
        let mut harness = Harness::new();
        harness.run(Command::ThrowBall);
        harness.run(Command::DeletePets);

        pretty_eq!(
            harness.window.errors(),
            vec![notices::NO_PLAYGROUND, notices::NO_PLAYGROUND]
        );
    }

    #[test]
    fn test_throw_and_delete_reach_the_panel() {
        let mut harness = Harness::new();
        harness.run(Command::Start);
        harness.run(Command::ThrowBall);
        harness.run(Command::DeletePets);

        pretty_eq!(
            harness.panel_messages(),
            vec![OutboundMessage::ThrowBall, OutboundMessage::DeletePet]
        );
    }

    fn unresolved_explorer() -> Harness {
        Harness::with_config(Fixtures::config_with(|c| {
            c.vscode_pets.position = "explorer".into();
        }))
    }

    #[test]
    fn test_unresolved_sidebar_asks_for_a_playground() {
        let mut harness = unresolved_explorer();
        harness.run(Command::ThrowBall);

        let errors = harness.window.errors();
        pretty_eq!(errors, vec![notices::NO_PLAYGROUND]);
        assert_not_contains!(errors[0], "rendering channel");
    }

    #[test]
    fn test_unresolved_sidebar_reset_keeps_saved_pets() {
        let mut harness = unresolved_explorer();
        let saved = vec![pet(PetColor::Black, PetType::Dog)];
        harness.seed_pets(&saved);

        harness.run(Command::ResetPets);

        pretty_eq!(harness.window.errors(), vec![notices::NO_PLAYGROUND_TO_RESET]);
        pretty_eq!(harness.saved_pets(), saved);
    }

    #[test]
    fn test_unresolved_sidebar_spawn_saves_nothing() {
        let mut harness = unresolved_explorer();
        harness.window.answer(Some("crab"));

        harness.run(Command::SpawnPet);

        pretty_eq!(harness.window.errors(), vec![notices::NO_PLAYGROUND]);
        assert!(harness.saved_pets().is_empty());
    }

    #[test]
    fn test_panel_reset_is_bare_and_clears_saved_pets() {
        let mut harness = Harness::new();
        harness.seed_pets(&[
            pet(PetColor::Black, PetType::Cat),
            pet(PetColor::Red, PetType::Crab),
        ]);
        harness.run(Command::Start);
        harness.panel().webview().take_messages();

        harness.run(Command::ResetPets);

        pretty_eq!(harness.panel_messages(), vec![OutboundMessage::bare_reset()]);
        assert!(harness.saved_pets().is_empty());
    }

    #[test]
    fn test_sidebar_reset_names_primary_pet() {
        let mut harness = Harness::with_config(Fixtures::config_with(|c| {
            c.vscode_pets.position = "explorer".into();
            c.vscode_pets.pet_type = "dog".into();
            c.vscode_pets.pet_color = "red".into();
        }));
        let view = surface::test_support::FakeView::new();
        harness
            .playground
            .resolve_webview_view(Box::new(view.clone()));
        harness.seed_pets(&[pet(PetColor::Black, PetType::Dog)]);

        harness.run(Command::ResetPets);

        pretty_eq!(
            view.webview().messages(),
            vec![OutboundMessage::ResetPet {
                pet_type: Some(PetType::Dog),
                color: Some(PetColor::Brown),
                size: Some(PetSize::Nano),
            }]
        );
        assert!(harness.saved_pets().is_empty());
    }

    #[test]
    fn test_reset_without_playground_keeps_saved_pets() {
        let mut harness = Harness::new();
        let saved = vec![pet(PetColor::Green, PetType::Snake)];
        harness.seed_pets(&saved);

        harness.run(Command::ResetPets);

        pretty_eq!(harness.window.errors(), vec![notices::NO_PLAYGROUND_TO_RESET]);
        pretty_eq!(harness.saved_pets(), saved);
    }
}

// ============================================================================
// Configuration
// ============================================================================

mod configuration {
    use super::*;

    #[test]
    fn test_red_dog_renders_brown() {
        let mut harness = Harness::new();
        harness.run(Command::Start);

        harness.configure(|c| {
            c.vscode_pets.pet_type = "dog".into();
            c.vscode_pets.pet_color = "red".into();
        });

        let panel = harness.panel();
        assert_eq!(panel.webview().html_writes(), 2);
        assert_contains!(
            panel.webview().last_html().unwrap_or_default(),
            r#""brown", "nano", "dog""#
        );
    }

    #[test]
    fn test_size_change_rebuilds_once() {
        let mut harness = Harness::new();
        harness.run(Command::Start);

        harness.configure(|c| c.vscode_pets.pet_size = "large".into());

        assert_eq!(harness.panel().webview().html_writes(), 2);
    }

    #[test]
    fn test_color_theme_change_updates_kind() {
        let mut harness = Harness::new();
        harness.run(Command::Start);

        harness.configure(|c| c.workbench.color_theme = "Default High Contrast".into());

        assert_contains!(
            harness.panel().webview().last_html().unwrap_or_default(),
            r#""none", 3, "brown""#
        );
    }

    #[test]
    fn test_position_change_sets_context_without_rerender() {
        let mut harness = Harness::new();
        harness.run(Command::Start);

        harness.configure(|c| c.vscode_pets.position = "explorer".into());

        pretty_eq!(
            harness.window.contexts().last().cloned(),
            Some((ids::POSITION_CONTEXT.to_string(), "explorer".to_string()))
        );
        assert_eq!(harness.panel().webview().html_writes(), 1);
    }

    #[test]
    fn test_hidden_panel_renders_when_shown_again() {
        let mut harness = Harness::new();
        harness.run(Command::Start);
        let panel = harness.panel();
        panel.set_visible(false);
        harness.playground.process_events();

        harness.configure(|c| c.vscode_pets.pet_size = "medium".into());
        assert_eq!(panel.webview().html_writes(), 1);

        panel.set_visible(true);
        harness.playground.process_events();
        assert_eq!(panel.webview().html_writes(), 2);
        assert_contains!(panel.webview().last_html().unwrap_or_default(), "\"medium\"");
    }

    #[test]
    fn test_explorer_sidebar_follows_settings() {
        let (mut harness, view) = Harness::explorer();
        harness.configure(|c| c.vscode_pets.pet_type = "snake".into());

        assert_eq!(view.webview().html_writes(), 2);
        assert_contains!(
            view.webview().last_html().unwrap_or_default(),
            r#""green", "nano", "snake""#
        );
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let mut harness = Harness::with_config(Fixtures::config_with(|c| {
            c.vscode_pets.pet_type = "unicorn".into();
            c.vscode_pets.pet_size = "huge".into();
            c.vscode_pets.theme = "space".into();
        }));
        harness.run(Command::Start);

        assert_contains!(
            harness.panel().webview().last_html().unwrap_or_default(),
            r#""none", 2, "brown", "nano", "cat""#
        );
    }
}

// ============================================================================
// Host Events
// ============================================================================

mod host_events {
    use super::*;

    #[test]
    fn test_closed_panel_is_forgotten() {
        let mut harness = Harness::new();
        harness.run(Command::Start);
        let panel = harness.panel();

        panel.close();
        harness.run(Command::ThrowBall);

        pretty_eq!(harness.window.errors(), vec![notices::NO_PLAYGROUND]);
        assert!(panel.webview().messages().is_empty());
        assert_eq!(panel.listener_count(), 0);
    }

    #[test]
    fn test_start_after_close_creates_new_panel() {
        let mut harness = Harness::new();
        harness.run(Command::Start);
        harness.panel().close();

        harness.run(Command::Start);

        assert_eq!(harness.panels.created().len(), 2);
        assert!(harness.playground.panel().is_open());
    }

    #[test]
    fn test_renderer_messages_become_notifications() {
        let mut harness = Harness::new();
        harness.run(Command::Start);
        let webview = harness.panel().webview().clone();

        webview.send_from_renderer(surface::InboundMessage::Alert {
            text: "Pet fell off the screen".into(),
        });
        webview.send_from_renderer(surface::InboundMessage::Info {
            text: "Pet is happy".into(),
        });
        harness.playground.process_events();

        pretty_eq!(harness.window.errors(), vec!["Pet fell off the screen"]);
        pretty_eq!(harness.window.infos(), vec!["Pet is happy"]);
    }

    #[test]
    fn test_deactivate_closes_panel() {
        let mut harness = Harness::new();
        harness.run(Command::Start);
        let panel = harness.panel();

        harness.playground.deactivate();

        assert!(panel.is_disposed());
        assert!(!harness.playground.panel().is_open());
    }
}

// ============================================================================
// Persistence
// ============================================================================

mod persistence {
    use super::*;
    use settings::load_config_from;
    use std::sync::Arc;
    use storage::JsonFileMemento;

    #[test]
    fn test_saved_pets_survive_restart() {
        let dir = tempdir().unwrap();
        let state_file = dir.path().join("global-state.json");

        {
            let memento = Arc::new(JsonFileMemento::open(&state_file).unwrap());
            let mut harness = Harness::with_store(Default::default(), memento);
            harness.run(Command::Start);
            harness.window.answer(Some("clippy"));
            harness.window.answer(Some("green"));
            harness.run(Command::SpawnPet);
        }

        let memento = Arc::new(JsonFileMemento::open(&state_file).unwrap());
        let mut harness = Harness::with_store(Default::default(), memento);
        harness.run(Command::Start);

        pretty_eq!(
            harness.panel_messages(),
            Fixtures::spawn_messages(&pet(PetColor::Green, PetType::Clippy))
        );
    }

    #[test]
    fn test_state_file_layout() {
        let dir = tempdir().unwrap();
        let state_file = dir.path().join("global-state.json");
        let memento = Arc::new(JsonFileMemento::open(&state_file).unwrap());
        let mut harness = Harness::with_store(Default::default(), memento);
        harness.run(Command::Start);
        harness.window.answer(Some("crab"));
        harness.run(Command::SpawnPet);

        let raw = std::fs::read_to_string(&state_file).unwrap();
        let on_disk: serde_json::Value = serde_json::from_str(&raw).unwrap();
        pretty_eq!(
            on_disk,
            serde_json::json!({
                "values": {
                    "vscode-pets.extra-pets.types": ["crab"],
                    "vscode-pets.extra-pets.colors": ["red"],
                },
                "keysForSync": [
                    "vscode-pets.extra-pets.types",
                    "vscode-pets.extra-pets.colors",
                ],
            })
        );
    }

    #[test]
    fn test_config_file_drives_the_playground() {
        let dir = tempdir().unwrap();
        let config_file = dir.path().join("config.toml");
        std::fs::write(&config_file, Fixtures::red_dog_toml()).unwrap();

        let mut harness = Harness::with_config(load_config_from(&config_file));
        harness.run(Command::Start);
        assert_contains!(
            harness.panel().webview().last_html().unwrap_or_default(),
            r#""castle", 1, "brown", "medium", "dog""#
        );

        std::fs::write(
            &config_file,
            Fixtures::red_dog_toml().replace("\"medium\"", "\"large\""),
        )
        .unwrap();
        let event = harness.config.replace(load_config_from(&config_file));
        pretty_eq!(event.changed_keys(), ["vscode-pets.petSize".to_string()]);

        harness.playground.on_configuration_changed(&event);
        assert_contains!(
            harness.panel().webview().last_html().unwrap_or_default(),
            r#""large", "dog""#
        );
    }
}
