//! In-memory host doubles that record what surfaces do to them.
//!
//! Every fake is a cheap clonable handle: hand one clone to the code under
//! test and keep another to inspect or drive it.

use crate::messages::{InboundMessage, OutboundMessage};
use crate::webview::{
    Listener, PanelHost, Subscription, ViewColumn, Webview, WebviewOptions, WebviewPanel,
    WebviewView,
};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct ListenerSetInner<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Listeners registered with one fake event source.
pub struct ListenerSet<T> {
    inner: Arc<Mutex<ListenerSetInner<T>>>,
}

impl<T: 'static> ListenerSet<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ListenerSetInner {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, listener: Listener<T>) -> Subscription {
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener));
            id
        };
        let inner = Arc::clone(&self.inner);
        Subscription::new(move || inner.lock().listeners.retain(|(i, _)| *i != id))
    }

    pub fn fire(&self, value: &T) {
        for (_, listener) in self.inner.lock().listeners.iter() {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for ListenerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct WebviewRecord {
    messages: Mutex<Vec<OutboundMessage>>,
    html: Mutex<Vec<String>>,
    options: Mutex<Option<WebviewOptions>>,
    message_listeners: ListenerSet<InboundMessage>,
}

/// Webview that records posted messages and document writes.
#[derive(Clone, Default)]
pub struct RecordingWebview {
    record: Arc<WebviewRecord>,
}

impl RecordingWebview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.record.messages.lock().clone()
    }

    pub fn take_messages(&self) -> Vec<OutboundMessage> {
        std::mem::take(&mut *self.record.messages.lock())
    }

    pub fn html_writes(&self) -> usize {
        self.record.html.lock().len()
    }

    pub fn last_html(&self) -> Option<String> {
        self.record.html.lock().last().cloned()
    }

    pub fn options(&self) -> Option<WebviewOptions> {
        self.record.options.lock().clone()
    }

    /// Deliver `message` as if the renderer had sent it.
    pub fn send_from_renderer(&self, message: InboundMessage) {
        self.record.message_listeners.fire(&message);
    }

    pub fn listener_count(&self) -> usize {
        self.record.message_listeners.len()
    }
}

impl Webview for RecordingWebview {
    fn post_message(&self, message: &OutboundMessage) {
        self.record.messages.lock().push(message.clone());
    }

    fn set_html(&self, html: String) {
        self.record.html.lock().push(html);
    }

    fn set_options(&self, options: WebviewOptions) {
        *self.record.options.lock() = Some(options);
    }

    fn as_webview_uri(&self, path: &Path) -> String {
        format!("webview-resource:{}", path.display())
    }

    fn csp_source(&self) -> String {
        "webview-resource:".to_string()
    }

    fn on_did_receive_message(&self, listener: Listener<InboundMessage>) -> Subscription {
        self.record.message_listeners.subscribe(listener)
    }
}

struct PanelRecord {
    webview: RecordingWebview,
    visible: AtomicBool,
    disposed: AtomicBool,
    reveals: Mutex<Vec<Option<ViewColumn>>>,
    dispose_listeners: ListenerSet<()>,
    view_state_listeners: ListenerSet<bool>,
}

/// Editor tab double. Starts visible.
#[derive(Clone)]
pub struct FakePanel {
    record: Arc<PanelRecord>,
}

impl FakePanel {
    pub fn new() -> Self {
        Self {
            record: Arc::new(PanelRecord {
                webview: RecordingWebview::new(),
                visible: AtomicBool::new(true),
                disposed: AtomicBool::new(false),
                reveals: Mutex::new(Vec::new()),
                dispose_listeners: ListenerSet::new(),
                view_state_listeners: ListenerSet::new(),
            }),
        }
    }

    pub fn webview(&self) -> &RecordingWebview {
        &self.record.webview
    }

    /// Change visibility and fire the view state listeners.
    pub fn set_visible(&self, visible: bool) {
        self.record.visible.store(visible, Ordering::SeqCst);
        self.record.view_state_listeners.fire(&visible);
    }

    /// Close the tab as the user would.
    pub fn close(&self) {
        if !self.record.disposed.swap(true, Ordering::SeqCst) {
            self.record.visible.store(false, Ordering::SeqCst);
            self.record.dispose_listeners.fire(&());
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.record.disposed.load(Ordering::SeqCst)
    }

    pub fn reveals(&self) -> Vec<Option<ViewColumn>> {
        self.record.reveals.lock().clone()
    }

    /// Listeners still registered across all of this panel's event sources.
    pub fn listener_count(&self) -> usize {
        self.record.dispose_listeners.len()
            + self.record.view_state_listeners.len()
            + self.record.webview.listener_count()
    }
}

impl Default for FakePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl WebviewPanel for FakePanel {
    fn webview(&self) -> &dyn Webview {
        &self.record.webview
    }

    fn visible(&self) -> bool {
        self.record.visible.load(Ordering::SeqCst)
    }

    fn reveal(&self, column: Option<ViewColumn>) {
        self.record.reveals.lock().push(column);
    }

    fn dispose(&self) {
        self.close();
    }

    fn on_did_dispose(&self, listener: Listener<()>) -> Subscription {
        self.record.dispose_listeners.subscribe(listener)
    }

    fn on_did_change_view_state(&self, listener: Listener<bool>) -> Subscription {
        self.record.view_state_listeners.subscribe(listener)
    }
}

/// Sidebar view double.
#[derive(Clone, Default)]
pub struct FakeView {
    webview: RecordingWebview,
}

impl FakeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn webview(&self) -> &RecordingWebview {
        &self.webview
    }
}

impl WebviewView for FakeView {
    fn webview(&self) -> &dyn Webview {
        &self.webview
    }
}

/// Arguments a panel was created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPanel {
    pub view_type: String,
    pub title: String,
    pub column: ViewColumn,
    pub options: WebviewOptions,
}

#[derive(Default)]
struct PanelHostRecord {
    active_column: Mutex<Option<ViewColumn>>,
    created: Mutex<Vec<CreatedPanel>>,
    panels: Mutex<Vec<FakePanel>>,
}

/// Panel factory double. Every created panel is a fresh [`FakePanel`].
#[derive(Clone, Default)]
pub struct FakePanelHost {
    record: Arc<PanelHostRecord>,
}

impl FakePanelHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active_column(column: ViewColumn) -> Self {
        let host = Self::new();
        host.set_active_column(Some(column));
        host
    }

    pub fn set_active_column(&self, column: Option<ViewColumn>) {
        *self.record.active_column.lock() = column;
    }

    pub fn created(&self) -> Vec<CreatedPanel> {
        self.record.created.lock().clone()
    }

    /// Handle to the `index`th created panel.
    ///
    /// # Panics
    ///
    /// If fewer panels were created.
    pub fn panel(&self, index: usize) -> FakePanel {
        self.record.panels.lock()[index].clone()
    }

    pub fn last_panel(&self) -> Option<FakePanel> {
        self.record.panels.lock().last().cloned()
    }
}

impl PanelHost for FakePanelHost {
    fn create_webview_panel(
        &self,
        view_type: &str,
        title: &str,
        column: ViewColumn,
        options: WebviewOptions,
    ) -> Box<dyn WebviewPanel> {
        self.record.created.lock().push(CreatedPanel {
            view_type: view_type.to_string(),
            title: title.to_string(),
            column,
            options,
        });
        let panel = FakePanel::new();
        self.record.panels.lock().push(panel.clone());
        Box::new(panel)
    }

    fn active_view_column(&self) -> Option<ViewColumn> {
        *self.record.active_column.lock()
    }
}
