//! Rendering surfaces for the pet playground.
//!
//! A surface is a webview the host owns and the playground drives: either
//! the editor tab panel or the sidebar view. Both share the
//! [`PetSurface`] contract and differ only in lifecycle.
//!
//! # Modules
//!
//! - `messages` - Wire protocol between host and renderer
//! - `webview` - Host collaborator traits, subscriptions, surface events
//! - `html` - Document generation for the renderer
//! - `container` - Per-surface state and the shared contract
//! - `panel` - Singleton, revivable editor tab
//! - `sidebar` - Persistent sidebar view

mod container;
mod html;
mod messages;
mod panel;
mod sidebar;
mod webview;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use container::{PetSurface, SurfaceState};
pub use html::{
    generate_nonce, html_for_webview, render_html, ContentParams, MAIN_SCRIPT, MEDIA_DIR, PETS_CSS,
    RESET_CSS,
};
pub use messages::{InboundMessage, OutboundMessage};
pub use panel::{PanelSlot, PetPanel, PANEL_TITLE, PANEL_VIEW_TYPE};
pub use sidebar::{PetSidebarView, SIDEBAR_VIEW_TYPE};
pub use webview::{
    Disposables, EventSink, Listener, PanelHost, PanelId, Subscription, SurfaceEvent,
    SurfaceKind, ViewColumn, Webview, WebviewOptions, WebviewPanel, WebviewView,
};

/// A surface operation could not reach the renderer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The host has not handed this surface a webview yet.
    #[error("{0} has no rendering channel yet")]
    ChannelNotEstablished(SurfaceKind),
    /// The panel was closed; a new one must be created.
    #[error("pet panel has been disposed")]
    Disposed,
}
