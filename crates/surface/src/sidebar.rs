use crate::container::{PetSurface, SurfaceState};
use crate::messages::OutboundMessage;
use crate::webview::{
    forward_messages, Disposables, EventSink, SurfaceKind, Webview, WebviewOptions, WebviewView,
};
use crate::SurfaceError;
use std::path::{Path, PathBuf};

/// Host view id of the sidebar playground.
pub const SIDEBAR_VIEW_TYPE: &str = "vscode-pets.petsView";

/// Sidebar playground. Exists for the whole session but has no rendering
/// channel until the host resolves it.
pub struct PetSidebarView {
    state: SurfaceState,
    view: Option<Box<dyn WebviewView>>,
    extension_path: PathBuf,
    events: EventSink,
    disposables: Disposables,
}

impl PetSidebarView {
    pub fn new(extension_path: &Path, state: SurfaceState, events: EventSink) -> Self {
        Self {
            state,
            view: None,
            extension_path: extension_path.to_path_buf(),
            events,
            disposables: Disposables::default(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.view.is_some()
    }

    /// Take the view the host resolved, then render into it.
    ///
    /// Resolving again replaces the previous view and its subscriptions.
    pub fn resolve_webview_view(&mut self, view: Box<dyn WebviewView>) {
        self.disposables.dispose();

        let webview = view.webview();
        webview.set_options(WebviewOptions::for_extension(&self.extension_path));
        self.disposables
            .push(forward_messages(webview, SurfaceKind::SidebarView, &self.events));
        self.view = Some(view);

        if let Err(e) = self.render() {
            tracing::warn!("Failed to render pet sidebar view: {}", e);
        }
        tracing::info!("Pet sidebar view resolved");
    }
}

impl PetSurface for PetSidebarView {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::SidebarView
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
        self.view
            .as_ref()
            .map(|view| view.webview())
            .ok_or(SurfaceError::ChannelNotEstablished(SurfaceKind::SidebarView))
    }

    fn update(&self) -> Result<(), SurfaceError> {
        self.render()
    }

    /// Clear all pets and respawn the configured primary pet.
    fn reset_pets(&self) -> Result<(), SurfaceError> {
        let primary = self.state.primary_pet();
        self.post_message(OutboundMessage::ResetPet {
            pet_type: Some(primary.pet_type),
            color: Some(primary.color),
            size: Some(primary.size),
        })
    }
}
