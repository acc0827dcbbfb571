//! Shared test utilities for playground integration tests.
//!
//! Provides a scripted host window, a harness wiring a [`Playground`] to
//! in-memory host doubles, fixtures and assertion helpers.

// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use pet_spec::{PetCollection, PetSpecification};
use playground::{Command, HostContext, Playground, Window};
use settings::{Config, SharedConfig};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use storage::{collection_from_memento, store_collection_as_memento, InMemoryMemento, Memento};
use surface::test_support::{FakePanel, FakePanelHost, FakeView};
use surface::OutboundMessage;

pub use tempfile::{tempdir, TempDir};

// ============================================================================
// Scripted Window
// ============================================================================

/// A prompt the playground showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub placeholder: String,
    pub items: Vec<String>,
}

/// Host window double.
///
/// Quick picks are answered from a script, in order. An exhausted script
/// answers as if the user cancelled.
#[derive(Default)]
pub struct ScriptedWindow {
    answers: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<Prompt>>,
    errors: Mutex<Vec<String>>,
    infos: Mutex<Vec<String>>,
    contexts: Mutex<Vec<(String, String)>>,
    commands: Mutex<Vec<String>>,
}

impl ScriptedWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next answer. `None` cancels that prompt.
    pub fn answer(&self, answer: Option<&str>) {
        self.answers.lock().push_back(answer.map(str::to_string));
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().clone()
    }

    pub fn contexts(&self) -> Vec<(String, String)> {
        self.contexts.lock().clone()
    }

    pub fn executed_commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }
}

#[async_trait]
impl Window for ScriptedWindow {
    fn show_error_message(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }

    fn show_information_message(&self, message: &str) {
        self.infos.lock().push(message.to_string());
    }

    async fn show_quick_pick(&self, items: Vec<String>, placeholder: &str) -> Option<String> {
        self.prompts.lock().push(Prompt {
            placeholder: placeholder.to_string(),
            items,
        });
        self.answers.lock().pop_front().flatten()
    }

    fn set_context(&self, key: &str, value: &str) {
        self.contexts
            .lock()
            .push((key.to_string(), value.to_string()));
    }

    fn execute_command(&self, command: &str) {
        self.commands.lock().push(command.to_string());
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A playground wired to in-memory host doubles.
pub struct Harness {
    pub playground: Playground,
    pub window: Arc<ScriptedWindow>,
    pub panels: FakePanelHost,
    pub memento: Arc<dyn Memento>,
    pub config: SharedConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_store(config, Arc::new(InMemoryMemento::new()))
    }

    pub fn with_store(config: Config, memento: Arc<dyn Memento>) -> Self {
        let window = Arc::new(ScriptedWindow::new());
        let panels = FakePanelHost::new();
        let config = SharedConfig::new(config);
        let playground = Playground::activate(HostContext {
            extension_path: PathBuf::from(Fixtures::EXTENSION_PATH),
            memento: Arc::clone(&memento),
            config: Arc::new(config.clone()),
            color_theme: Arc::new(config.clone()),
            window: window.clone(),
            panel_host: Arc::new(panels.clone()),
        });
        Self {
            playground,
            window,
            panels,
            memento,
            config,
        }
    }

    /// Position `explorer`, with the sidebar view already resolved.
    pub fn explorer() -> (Self, FakeView) {
        let mut harness = Self::with_config(Fixtures::config_with(|c| {
            c.vscode_pets.position = "explorer".into();
        }));
        let view = FakeView::new();
        harness.playground.resolve_webview_view(Box::new(view.clone()));
        (harness, view)
    }

    pub fn run(&mut self, command: Command) {
        tokio_test::block_on(self.playground.execute(command));
    }

    /// Edit the configuration and deliver the change event.
    pub fn configure(&mut self, edit: impl FnOnce(&mut Config)) {
        let event = self.config.update(edit);
        self.playground.on_configuration_changed(&event);
    }

    pub fn seed_pets(&self, pets: &[PetSpecification]) {
        store_collection_as_memento(self.memento.as_ref(), pets);
    }

    pub fn saved_pets(&self) -> PetCollection {
        use settings::Configuration;
        collection_from_memento(self.memento.as_ref(), self.config.snapshot().pet_size())
    }

    /// The most recently created panel.
    ///
    /// # Panics
    ///
    /// If no panel was created.
    pub fn panel(&self) -> FakePanel {
        self.panels
            .last_panel()
            .expect("no pet panel has been created")
    }

    pub fn panel_messages(&self) -> Vec<OutboundMessage> {
        self.panel().webview().messages()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Fixtures
// ============================================================================

pub struct Fixtures;

impl Fixtures {
    pub const EXTENSION_PATH: &'static str = "/opt/pet-playground";

    pub fn config_with(edit: impl FnOnce(&mut Config)) -> Config {
        let mut config = Config::default();
        edit(&mut config);
        config
    }

    /// Config file with a misconfigured dog.
    pub fn red_dog_toml() -> &'static str {
        r#"
[vscode-pets]
pet-type = "dog"
pet-color = "red"
pet-size = "medium"
theme = "castle"

[workbench]
color-theme = "Default Light+"
"#
    }

    /// Expected spawn sequence for `spec`.
    pub fn spawn_messages(spec: &PetSpecification) -> Vec<OutboundMessage> {
        vec![
            OutboundMessage::SpawnPet {
                pet_type: spec.pet_type,
                color: spec.normalized_color(),
            },
            OutboundMessage::SetSize { size: spec.size },
        ]
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that a string contains a substring (with better error message).
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        if !$haystack.contains($needle) {
            panic!(
                "assertion failed: `haystack.contains(needle)`\n  haystack: {:?}\n  needle: {:?}",
                $haystack, $needle
            );
        }
    };
}

/// Assert that a string does not contain a substring.
#[macro_export]
macro_rules! assert_not_contains {
    ($haystack:expr, $needle:expr) => {
        if $haystack.contains($needle) {
            panic!(
                "assertion failed: `!haystack.contains(needle)`\n  haystack: {:?}\n  needle: {:?}",
                $haystack, $needle
            );
        }
    };
}
