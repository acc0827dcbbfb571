//! Pet playground orchestration.
//!
//! [`Playground`] owns both rendering surfaces and routes commands,
//! configuration changes and renderer messages to the one chosen by the
//! position setting. It never talks to the host directly: every host
//! service comes in through [`HostContext`].
//!
//! Host callbacks are queued, not dispatched. Call
//! [`Playground::process_events`] after anything that may have fired one.

mod commands;
mod host;

pub use commands::{notices, Command, UnknownCommand};
pub use host::Window;

use pet_spec::PetSpecification;
use settings::constants::{commands as command_ids, keys};
use settings::{Config, Configuration, ConfigurationChangeEvent, ExtPosition};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use storage::Memento;
use surface::{
    EventSink, InboundMessage, PanelHost, PanelSlot, PetSidebarView, PetSurface, SurfaceError,
    SurfaceEvent, SurfaceKind, SurfaceState, WebviewPanel, WebviewView,
};
use theme::{ActiveColorTheme, ColorThemeKind, Theme};

/// Host services handed to the playground at activation.
#[derive(Clone)]
pub struct HostContext {
    /// Install directory; assets live under its `media` directory.
    pub extension_path: PathBuf,
    pub memento: Arc<dyn Memento>,
    pub config: Arc<dyn Configuration>,
    pub color_theme: Arc<dyn ActiveColorTheme>,
    pub window: Arc<dyn Window>,
    pub panel_host: Arc<dyn PanelHost>,
}

pub struct Playground {
    host: HostContext,
    panel: PanelSlot,
    sidebar: PetSidebarView,
    events: EventSink,
    inbox: Receiver<SurfaceEvent>,
}

impl Playground {
    /// Register the sidebar view and publish the position context.
    pub fn activate(host: HostContext) -> Self {
        let (events, inbox) = mpsc::channel();
        let config = host.config.snapshot();
        let sidebar = PetSidebarView::new(
            &host.extension_path,
            surface_state(&config, host.color_theme.kind()),
            events.clone(),
        );
        let playground = Self {
            host,
            panel: PanelSlot::new(),
            sidebar,
            events,
            inbox,
        };
        playground.update_position_context();
        tracing::info!(
            position = %config.position(),
            "Pet playground activated"
        );
        playground
    }

    pub fn panel(&self) -> &PanelSlot {
        &self.panel
    }

    pub fn sidebar(&self) -> &PetSidebarView {
        &self.sidebar
    }

    /// The surface commands go to, per the position setting.
    ///
    /// With position `explorer` this is always the sidebar view, resolved or
    /// not. Otherwise it is the panel, if one is open.
    pub fn active_surface(&self) -> Option<&dyn PetSurface> {
        match self.host.config.snapshot().position() {
            ExtPosition::Explorer => Some(&self.sidebar),
            ExtPosition::Panel => self.panel.current().map(|panel| panel as &dyn PetSurface),
        }
    }

    /// The host made the sidebar view visible for the first time.
    pub fn resolve_webview_view(&mut self, view: Box<dyn WebviewView>) {
        self.sidebar.resolve_webview_view(view);
    }

    /// The host restored a pet panel from a previous session.
    pub fn deserialize_webview_panel(&mut self, panel: Box<dyn WebviewPanel>) {
        let state = self.configured_state(&self.host.config.snapshot());
        self.panel
            .revive(panel, &self.host.extension_path, state, &self.events);
    }

    /// Re-sync surfaces with configuration after `event`.
    pub fn on_configuration_changed(&mut self, event: &ConfigurationChangeEvent) {
        let appearance = keys::APPEARANCE
            .iter()
            .any(|key| event.affects_configuration(key));

        if appearance {
            let config = self.host.config.snapshot();
            let spec = config.pet_specification();
            let theme = config.theme();
            let kind = self.host.color_theme.kind();
            tracing::debug!(?spec, %theme, %kind, "Applying configuration");

            if let Some(panel) = self.panel.current_mut() {
                apply_configuration(panel, spec, theme, kind);
                report_update(panel.update());
            }

            // Keep the sidebar in step even while it is not the active
            // surface, so switching position never shows stale settings.
            apply_configuration(&mut self.sidebar, spec, theme, kind);
            if config.position() == ExtPosition::Explorer && self.sidebar.is_resolved() {
                report_update(self.sidebar.update());
            }
        }

        if event.affects_configuration(keys::POSITION) {
            self.update_position_context();
        }
    }

    /// The active editor changed.
    pub fn on_active_editor_changed(&self) {
        self.update_position_context();
    }

    fn update_position_context(&self) {
        let position = self.host.config.snapshot().position();
        self.host
            .window
            .set_context(command_ids::POSITION_CONTEXT, position.as_str());
    }

    /// Handle every queued surface event. Returns how many were handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.inbox.try_recv() {
            handled += 1;
            match event {
                SurfaceEvent::PanelDisposed(id) => {
                    self.panel.handle_disposed(id);
                }
                SurfaceEvent::PanelViewStateChanged { panel, visible } => {
                    tracing::trace!(%panel, visible, "Pet panel view state changed");
                    if let Some(panel) = self.panel.get(panel) {
                        report_update(panel.update());
                    }
                }
                SurfaceEvent::Message { surface, message } => {
                    self.handle_webview_message(surface, &message);
                }
            }
        }
        handled
    }

    fn handle_webview_message(&self, surface: SurfaceKind, message: &InboundMessage) {
        tracing::debug!(%surface, ?message, "Message from renderer");
        match message {
            InboundMessage::Alert { text } => self.host.window.show_error_message(text),
            InboundMessage::Info { text } => self.host.window.show_information_message(text),
        }
    }

    /// Close the panel. The sidebar view lives as long as the host window.
    pub fn deactivate(&mut self) {
        self.panel.dispose();
        self.process_events();
        tracing::info!("Pet playground deactivated");
    }

    fn configured_state(&self, config: &Config) -> SurfaceState {
        surface_state(config, self.host.color_theme.kind())
    }

    /// Log `error` and show the user `notice` instead.
    ///
    /// Every surface error means there is no playground to act on.
    fn report_surface_error(&self, error: SurfaceError, notice: &str) {
        tracing::warn!("Surface operation failed: {}", error);
        self.host.window.show_error_message(notice);
    }
}

fn surface_state(config: &Config, kind: ColorThemeKind) -> SurfaceState {
    SurfaceState::new(config.pet_specification(), config.theme(), kind)
}

fn apply_configuration(
    surface: &mut dyn PetSurface,
    spec: PetSpecification,
    theme: Theme,
    kind: ColorThemeKind,
) {
    surface.update_pet_color(spec.color);
    surface.update_pet_size(spec.size);
    surface.update_pet_type(spec.pet_type);
    surface.update_theme(theme, kind);
}

fn report_update(result: Result<(), SurfaceError>) {
    if let Err(e) = result {
        tracing::warn!("Failed to re-render: {}", e);
    }
}
