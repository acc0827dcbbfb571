//! Host services over plain text streams.
//!
//! Renderer traffic goes to the [`Console`] as one line per message,
//! prefixed with the surface it was posted to. Prompts read their answer
//! from the shared [`Input`].

use async_trait::async_trait;
use parking_lot::Mutex;
use playground::Window;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use surface::{
    InboundMessage, Listener, OutboundMessage, PanelHost, Subscription, ViewColumn, Webview,
    WebviewOptions, WebviewPanel, WebviewView,
};

/// URI scheme the console host serves local resources under.
const RESOURCE_SCHEME: &str = "pets-resource:";

// ============================================================================
// Streams
// ============================================================================

/// Line reader shared by the command loop and prompts.
#[derive(Clone)]
pub struct Input {
    reader: Arc<Mutex<Box<dyn BufRead + Send>>>,
}

impl Input {
    pub fn new(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            reader: Arc::new(Mutex::new(Box::new(reader))),
        }
    }

    pub fn stdin() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()))
    }

    /// Next line without its terminator. `None` at end of input.
    pub fn next_line(&self) -> Option<String> {
        let mut line = String::new();
        match self.reader.lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!("Failed to read input: {}", e);
                None
            }
        }
    }
}

/// Line writer for everything the host shows.
#[derive(Clone)]
pub struct Console {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Write `text` as one line tagged with `source`.
    pub fn line(&self, source: &str, text: &str) {
        let mut writer = self.writer.lock();
        if let Err(e) = writeln!(writer, "[{}] {}", source, text).and_then(|_| writer.flush()) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }
}

// ============================================================================
// Listeners
// ============================================================================

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Listeners for one host event.
struct Listeners<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: 'static> Listeners<T> {
    fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    fn subscribe(&self, listener: Listener<T>) -> Subscription {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, listener));
        drop(registry);

        let registry = Arc::clone(&self.registry);
        Subscription::new(move || registry.lock().listeners.retain(|(i, _)| *i != id))
    }

    fn emit(&self, value: &T) {
        for (_, listener) in self.registry.lock().listeners.iter() {
            listener(value);
        }
    }
}

// ============================================================================
// Webviews
// ============================================================================

/// Webview that prints what the renderer would receive.
pub struct ConsoleWebview {
    label: &'static str,
    console: Console,
    messages: Listeners<InboundMessage>,
}

impl ConsoleWebview {
    pub fn new(label: &'static str, console: Console) -> Self {
        Self {
            label,
            console,
            messages: Listeners::new(),
        }
    }
}

impl Webview for ConsoleWebview {
    fn post_message(&self, message: &OutboundMessage) {
        match serde_json::to_string(message) {
            Ok(json) => self.console.line(self.label, &json),
            Err(e) => tracing::error!("Failed to encode {} message: {}", message.command(), e),
        }
    }

    fn set_html(&self, html: String) {
        let summary = match document_nonce(&html) {
            Some(nonce) => format!("document {} bytes, nonce {}", html.len(), nonce),
            None => format!("document {} bytes", html.len()),
        };
        self.console.line(self.label, &summary);
    }

    fn set_options(&self, options: WebviewOptions) {
        tracing::debug!(
            webview = self.label,
            scripts = options.enable_scripts,
            roots = ?options.local_resource_roots,
            "Webview options set"
        );
    }

    fn as_webview_uri(&self, path: &Path) -> String {
        format!("{}{}", RESOURCE_SCHEME, path.display())
    }

    fn csp_source(&self) -> String {
        RESOURCE_SCHEME.to_string()
    }

    fn on_did_receive_message(&self, listener: Listener<InboundMessage>) -> Subscription {
        self.messages.subscribe(listener)
    }
}

/// Script nonce declared by a generated document's content security policy.
fn document_nonce(html: &str) -> Option<&str> {
    let start = html.find("'nonce-")? + "'nonce-".len();
    let len = html[start..].find('\'')?;
    Some(&html[start..start + len])
}

// ============================================================================
// Panel
// ============================================================================

struct PanelInner {
    webview: ConsoleWebview,
    visible: AtomicBool,
    disposed: AtomicBool,
    on_dispose: Listeners<()>,
    on_view_state: Listeners<bool>,
}

/// Editor tab shown on the console. Cloning shares the tab.
#[derive(Clone)]
pub struct ConsolePanel {
    inner: Arc<PanelInner>,
}

impl ConsolePanel {
    pub fn new(console: Console) -> Self {
        Self {
            inner: Arc::new(PanelInner {
                webview: ConsoleWebview::new("panel", console),
                visible: AtomicBool::new(true),
                disposed: AtomicBool::new(false),
                on_dispose: Listeners::new(),
                on_view_state: Listeners::new(),
            }),
        }
    }

    pub fn console_webview(&self) -> &ConsoleWebview {
        &self.inner.webview
    }

    /// Show or hide the tab. No-op once closed or when unchanged.
    pub fn set_visible(&self, visible: bool) {
        if self.is_disposed() || self.inner.visible.swap(visible, Ordering::SeqCst) == visible {
            return;
        }
        self.inner.on_view_state.emit(&visible);
    }

    /// Close the tab as a user would. Fires the dispose listeners once.
    pub fn close(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.visible.store(false, Ordering::SeqCst);
        self.inner.on_dispose.emit(&());
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }
}

impl WebviewPanel for ConsolePanel {
    fn webview(&self) -> &dyn Webview {
        &self.inner.webview
    }

    fn visible(&self) -> bool {
        self.inner.visible.load(Ordering::SeqCst)
    }

    fn reveal(&self, column: Option<ViewColumn>) {
        tracing::debug!(?column, "Revealing pet panel");
        self.set_visible(true);
    }

    fn dispose(&self) {
        self.close();
    }

    fn on_did_dispose(&self, listener: Listener<()>) -> Subscription {
        self.inner.on_dispose.subscribe(listener)
    }

    fn on_did_change_view_state(&self, listener: Listener<bool>) -> Subscription {
        self.inner.on_view_state.subscribe(listener)
    }
}

/// Opens console panels and remembers the latest one.
#[derive(Clone)]
pub struct ConsolePanelHost {
    console: Console,
    current: Arc<Mutex<Option<ConsolePanel>>>,
}

impl ConsolePanelHost {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// The most recently opened tab, unless it has been closed.
    pub fn current(&self) -> Option<ConsolePanel> {
        self.current
            .lock()
            .as_ref()
            .filter(|panel| !panel.is_disposed())
            .cloned()
    }
}

impl PanelHost for ConsolePanelHost {
    fn create_webview_panel(
        &self,
        view_type: &str,
        title: &str,
        column: ViewColumn,
        options: WebviewOptions,
    ) -> Box<dyn WebviewPanel> {
        let panel = ConsolePanel::new(self.console.clone());
        panel.console_webview().set_options(options);
        *self.current.lock() = Some(panel.clone());
        self.console.line(
            "host",
            &format!("opened {} '{}' in column {}", view_type, title, column.0),
        );
        Box::new(panel)
    }

    fn active_view_column(&self) -> Option<ViewColumn> {
        self.current().map(|_| ViewColumn::TWO)
    }
}

// ============================================================================
// Sidebar View
// ============================================================================

/// Sidebar view shown on the console.
pub struct ConsoleView {
    webview: ConsoleWebview,
}

impl ConsoleView {
    pub fn new(console: Console) -> Self {
        Self {
            webview: ConsoleWebview::new("view", console),
        }
    }
}

impl WebviewView for ConsoleView {
    fn webview(&self) -> &dyn Webview {
        &self.webview
    }
}

// ============================================================================
// Window
// ============================================================================

/// Notifications go to the console; quick picks read one line of input.
pub struct ConsoleWindow {
    console: Console,
    input: Input,
    focus_requested: AtomicBool,
}

impl ConsoleWindow {
    pub fn new(console: Console, input: Input) -> Self {
        Self {
            console,
            input,
            focus_requested: AtomicBool::new(false),
        }
    }

    /// Whether a command asked for the sidebar view since the last call.
    pub fn take_focus_request(&self) -> bool {
        self.focus_requested.swap(false, Ordering::SeqCst)
    }
}

#[async_trait]
impl Window for ConsoleWindow {
    fn show_error_message(&self, message: &str) {
        self.console.line("error", message);
    }

    fn show_information_message(&self, message: &str) {
        self.console.line("info", message);
    }

    async fn show_quick_pick(&self, items: Vec<String>, placeholder: &str) -> Option<String> {
        self.console
            .line("prompt", &format!("{}: {}", placeholder, items.join(", ")));

        let input = self.input.clone();
        let answer = match tokio::task::spawn_blocking(move || input.next_line()).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Prompt reader failed: {}", e);
                None
            }
        };

        let answer = answer?.trim().to_string();
        if answer.is_empty() {
            None
        } else {
            Some(answer)
        }
    }

    fn set_context(&self, key: &str, value: &str) {
        tracing::debug!(key, value, "Context set");
    }

    fn execute_command(&self, command: &str) {
        if command == settings::constants::commands::FOCUS_VIEW {
            self.focus_requested.store(true, Ordering::SeqCst);
        }
        self.console.line("host", &format!("command {}", command));
    }
}

/// Writer whose output stays readable after being handed to a console.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct Captured(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl Captured {
    pub(crate) fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
