//! Host collaborators and the event plumbing between host and playground.
//!
//! The host owns the actual webviews. Surfaces talk to them only through
//! the traits here. Host callbacks never call back into a surface; they
//! push a [`SurfaceEvent`] into an [`EventSink`] and the playground drains
//! the queue on its own schedule.

use crate::messages::{InboundMessage, OutboundMessage};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use uuid::Uuid;

/// Callback registered with a host event source.
pub type Listener<T> = Box<dyn Fn(&T) + Send>;

/// Queue that host callbacks push surface events into.
pub type EventSink = Sender<SurfaceEvent>;

/// Registration handle. Dropping it unregisters the listener.
#[must_use = "dropping a Subscription unregisters the listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { unsubscribe: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

/// Subscriptions owned by a surface, released together.
#[derive(Debug, Default)]
pub struct Disposables {
    subscriptions: Vec<Subscription>,
}

impl Disposables {
    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every subscription, most recent first.
    pub fn dispose(&mut self) {
        while let Some(subscription) = self.subscriptions.pop() {
            drop(subscription);
        }
    }
}

/// Editor column a panel is shown in. Columns are numbered from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewColumn(pub u8);

impl ViewColumn {
    pub const ONE: ViewColumn = ViewColumn(1);
    pub const TWO: ViewColumn = ViewColumn(2);
}

/// Options applied to a webview before content is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebviewOptions {
    pub enable_scripts: bool,
    pub local_resource_roots: Vec<PathBuf>,
}

impl WebviewOptions {
    /// Scripts on, loading restricted to the extension's `media` directory.
    pub fn for_extension(extension_path: &Path) -> Self {
        Self {
            enable_scripts: true,
            local_resource_roots: vec![extension_path.join(crate::html::MEDIA_DIR)],
        }
    }
}

/// A rendering channel into one webview.
#[cfg_attr(test, mockall::automock)]
pub trait Webview {
    fn post_message(&self, message: &OutboundMessage);

    fn set_html(&self, html: String);

    fn set_options(&self, options: WebviewOptions);

    /// Translate a local resource path to a URI the webview can load.
    fn as_webview_uri(&self, path: &Path) -> String;

    /// Source expression that whitelists this webview's resources in a CSP.
    fn csp_source(&self) -> String;

    fn on_did_receive_message(&self, listener: Listener<InboundMessage>) -> Subscription;
}

/// A webview hosted in an editor tab.
pub trait WebviewPanel {
    fn webview(&self) -> &dyn Webview;

    fn visible(&self) -> bool;

    fn reveal(&self, column: Option<ViewColumn>);

    /// Close the tab. Fires the dispose listeners.
    fn dispose(&self);

    fn on_did_dispose(&self, listener: Listener<()>) -> Subscription;

    /// Fires with the new visibility whenever the tab's view state changes.
    fn on_did_change_view_state(&self, listener: Listener<bool>) -> Subscription;
}

/// A webview hosted in a sidebar container.
pub trait WebviewView {
    fn webview(&self) -> &dyn Webview;
}

/// Host capability to open new editor tab webviews.
pub trait PanelHost {
    fn create_webview_panel(
        &self,
        view_type: &str,
        title: &str,
        column: ViewColumn,
        options: WebviewOptions,
    ) -> Box<dyn WebviewPanel>;

    /// Column of the active editor, if any.
    fn active_view_column(&self) -> Option<ViewColumn>;
}

/// Identity of one panel instance, so stale events can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelId(Uuid);

impl PanelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Panel,
    SidebarView,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceKind::Panel => f.write_str("pet panel"),
            SurfaceKind::SidebarView => f.write_str("pet sidebar view"),
        }
    }
}

/// Something happened on a host webview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    PanelDisposed(PanelId),
    PanelViewStateChanged { panel: PanelId, visible: bool },
    Message {
        surface: SurfaceKind,
        message: InboundMessage,
    },
}

/// Subscribe `webview`'s inbound messages into `events`, tagged with `surface`.
pub(crate) fn forward_messages(
    webview: &dyn Webview,
    surface: SurfaceKind,
    events: &EventSink,
) -> Subscription {
    let events = events.clone();
    webview.on_did_receive_message(Box::new(move |message| {
        let event = SurfaceEvent::Message {
            surface,
            message: message.clone(),
        };
        if events.send(event).is_err() {
            tracing::trace!("Dropped message from {}: event queue closed", surface);
        }
    }))
}
