//! The editor tab surface.
//!
//! At most one panel exists per session. [`PanelSlot`] owns it and is the
//! only way to create, revive or drop one.

use crate::container::{PetSurface, SurfaceState};
use crate::messages::OutboundMessage;
use crate::webview::{
    forward_messages, Disposables, EventSink, PanelHost, PanelId, SurfaceEvent, SurfaceKind,
    ViewColumn, Webview, WebviewOptions, WebviewPanel,
};
use crate::SurfaceError;
use std::path::{Path, PathBuf};

/// Host view type used to create and revive pet panels.
pub const PANEL_VIEW_TYPE: &str = "petCoding";
pub const PANEL_TITLE: &str = "Pet Panel";

pub struct PetPanel {
    id: PanelId,
    state: SurfaceState,
    panel: Box<dyn WebviewPanel>,
    extension_path: PathBuf,
    disposables: Disposables,
    disposed: bool,
}

impl PetPanel {
    fn attach(
        panel: Box<dyn WebviewPanel>,
        extension_path: &Path,
        state: SurfaceState,
        events: &EventSink,
    ) -> Self {
        let id = PanelId::new();
        let mut disposables = Disposables::default();

        let tx = events.clone();
        disposables.push(panel.on_did_dispose(Box::new(move |_| {
            if tx.send(SurfaceEvent::PanelDisposed(id)).is_err() {
                tracing::trace!("Dropped dispose of panel {:?}: event queue closed", id);
            }
        })));
        let tx = events.clone();
        disposables.push(panel.on_did_change_view_state(Box::new(move |visible| {
            let event = SurfaceEvent::PanelViewStateChanged {
                panel: id,
                visible: *visible,
            };
            if tx.send(event).is_err() {
                tracing::trace!("Dropped view state of panel {:?}: event queue closed", id);
            }
        })));
        disposables.push(forward_messages(panel.webview(), SurfaceKind::Panel, events));

        let this = Self {
            id,
            state,
            panel,
            extension_path: extension_path.to_path_buf(),
            disposables,
            disposed: false,
        };
        // First content goes in even if the tab is hidden.
        if let Err(e) = this.render() {
            tracing::warn!("Failed to render new pet panel: {}", e);
        }
        tracing::info!(panel = %id, "Pet panel attached");
        this
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn is_visible(&self) -> bool {
        !self.disposed && self.panel.visible()
    }

    pub fn reveal(&self, column: Option<ViewColumn>) {
        if !self.disposed {
            self.panel.reveal(column);
        }
    }

    /// Close the host tab and release every subscription. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.panel.dispose();
        self.disposables.dispose();
        tracing::info!(panel = %self.id, "Pet panel disposed");
    }
}

impl PetSurface for PetPanel {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Panel
    }

    fn state(&self) -> &SurfaceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SurfaceState {
        &mut self.state
    }

    fn extension_path(&self) -> &Path {
        &self.extension_path
    }

    fn webview(&self) -> Result<&dyn Webview, SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        Ok(self.panel.webview())
    }

    /// Re-render, but only while the tab is visible.
    fn update(&self) -> Result<(), SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        if !self.panel.visible() {
            tracing::trace!(panel = %self.id, "Pet panel hidden, skipping render");
            return Ok(());
        }
        self.render()
    }

    fn reset_pets(&self) -> Result<(), SurfaceError> {
        self.post_message(OutboundMessage::bare_reset())
    }
}

/// Holder of the session's single panel.
#[derive(Default)]
pub struct PanelSlot {
    current: Option<PetPanel>,
}

impl PanelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&PetPanel> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut PetPanel> {
        self.current.as_mut()
    }

    /// The current panel, if it is the one identified by `id`.
    pub fn get(&self, id: PanelId) -> Option<&PetPanel> {
        self.current.as_ref().filter(|panel| panel.id == id)
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Show the panel with `requested`'s pet, creating it if needed.
    ///
    /// An existing panel already showing that pet is revealed in the active
    /// column. One showing something else is retargeted and re-rendered in
    /// place. Colors are compared after normalization.
    pub fn create_or_show(
        &mut self,
        host: &dyn PanelHost,
        extension_path: &Path,
        requested: SurfaceState,
        events: &EventSink,
    ) -> &mut PetPanel {
        let panel = match self.current.take() {
            Some(mut panel) => {
                let same = panel.pet_color() == requested.pet_color()
                    && panel.pet_type() == requested.pet_type
                    && panel.pet_size() == requested.size;
                if same {
                    panel.reveal(host.active_view_column());
                } else {
                    panel.update_pet_color(requested.color);
                    panel.update_pet_type(requested.pet_type);
                    panel.update_pet_size(requested.size);
                    if let Err(e) = panel.update() {
                        tracing::warn!("Failed to update pet panel: {}", e);
                    }
                }
                panel
            }
            None => {
                let webview_panel = host.create_webview_panel(
                    PANEL_VIEW_TYPE,
                    PANEL_TITLE,
                    ViewColumn::TWO,
                    WebviewOptions::for_extension(extension_path),
                );
                PetPanel::attach(webview_panel, extension_path, requested, events)
            }
        };
        self.current.insert(panel)
    }

    /// Adopt a panel the host restored from a previous session.
    ///
    /// Webview options are reset before anything is rendered. A panel
    /// already held by the slot is disposed first.
    pub fn revive(
        &mut self,
        panel: Box<dyn WebviewPanel>,
        extension_path: &Path,
        state: SurfaceState,
        events: &EventSink,
    ) -> &mut PetPanel {
        panel
            .webview()
            .set_options(WebviewOptions::for_extension(extension_path));
        self.dispose();
        self.current
            .insert(PetPanel::attach(panel, extension_path, state, events))
    }

    /// Dispose the current panel, if any, and clear the slot.
    pub fn dispose(&mut self) {
        if let Some(mut panel) = self.current.take() {
            panel.dispose();
        }
    }

    /// React to the host closing panel `id`. Stale ids are ignored.
    pub fn handle_disposed(&mut self, id: PanelId) -> bool {
        if self.get(id).is_none() {
            tracing::trace!(panel = %id, "Ignoring dispose of stale pet panel");
            return false;
        }
        self.dispose();
        true
    }
}
