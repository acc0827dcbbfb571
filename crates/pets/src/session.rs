//! The command loop of a console session.

use crate::stdio::{Console, ConsolePanelHost, ConsoleView, ConsoleWindow, Input};
use playground::{Command, HostContext, Playground, UnknownCommand};
use settings::{load_config_from, ConfigurationChangeEvent, SharedConfig};
use std::fmt;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use storage::Memento;

const USAGE: &str = "commands: start, spawn-pet, throw-ball, delete-pets, reset-pets, \
close-panel, show-panel, hide-panel, open-view, reload-config, quit";

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Run(Command),
    ClosePanel,
    ShowPanel,
    HidePanel,
    OpenView,
    ReloadConfig,
    Help,
    Quit,
}

impl FromStr for Request {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "close-panel" => Ok(Request::ClosePanel),
            "show-panel" => Ok(Request::ShowPanel),
            "hide-panel" => Ok(Request::HidePanel),
            "open-view" => Ok(Request::OpenView),
            "reload-config" => Ok(Request::ReloadConfig),
            "help" | "?" => Ok(Request::Help),
            "quit" | "exit" => Ok(Request::Quit),
            other => other.parse::<Command>().map(Request::Run),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Run(command) => f.write_str(command.short_name()),
            Request::ClosePanel => f.write_str("close-panel"),
            Request::ShowPanel => f.write_str("show-panel"),
            Request::HidePanel => f.write_str("hide-panel"),
            Request::OpenView => f.write_str("open-view"),
            Request::ReloadConfig => f.write_str("reload-config"),
            Request::Help => f.write_str("help"),
            Request::Quit => f.write_str("quit"),
        }
    }
}

/// Where configuration comes from.
pub struct ConfigSource {
    pub path: PathBuf,
    pub shared: SharedConfig,
    /// Changes picked up by the file watcher, if one is running.
    pub changes: Option<Receiver<ConfigurationChangeEvent>>,
}

pub struct Session {
    playground: Playground,
    window: Arc<ConsoleWindow>,
    panels: ConsolePanelHost,
    console: Console,
    input: Input,
    config: ConfigSource,
}

impl Session {
    pub fn new(
        extension_path: PathBuf,
        memento: Arc<dyn Memento>,
        config: ConfigSource,
        input: Input,
        console: Console,
    ) -> Self {
        let window = Arc::new(ConsoleWindow::new(console.clone(), input.clone()));
        let panels = ConsolePanelHost::new(console.clone());
        let playground = Playground::activate(HostContext {
            extension_path,
            memento,
            config: Arc::new(config.shared.clone()),
            color_theme: Arc::new(config.shared.clone()),
            window: window.clone(),
            panel_host: Arc::new(panels.clone()),
        });
        Self {
            playground,
            window,
            panels,
            console,
            input,
            config,
        }
    }

    /// Read and handle requests until `quit` or end of input.
    pub async fn run(&mut self) {
        self.console.line("host", USAGE);
        while let Some(line) = self.input.next_line() {
            if line.trim().is_empty() {
                continue;
            }
            if self.handle_line(&line).await.is_break() {
                break;
            }
        }
        self.playground.deactivate();
    }

    pub async fn handle_line(&mut self, line: &str) -> ControlFlow<()> {
        match line.parse::<Request>() {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                self.console.line("error", &format!("{}; {}", e, USAGE));
                ControlFlow::Continue(())
            }
        }
    }

    pub async fn handle(&mut self, request: Request) -> ControlFlow<()> {
        self.apply_config_changes();
        tracing::debug!(%request, "Handling request");

        match request {
            Request::Run(command) => {
                self.playground.execute(command).await;
                if self.window.take_focus_request() {
                    self.open_view();
                }
            }
            Request::ClosePanel => match self.panels.current() {
                Some(panel) => panel.close(),
                None => self.console.line("host", "no pet panel is open"),
            },
            Request::ShowPanel => self.set_panel_visible(true),
            Request::HidePanel => self.set_panel_visible(false),
            Request::OpenView => self.open_view(),
            Request::ReloadConfig => self.reload_config(),
            Request::Help => self.console.line("host", USAGE),
            Request::Quit => return ControlFlow::Break(()),
        }

        self.playground.process_events();
        ControlFlow::Continue(())
    }

    fn set_panel_visible(&self, visible: bool) {
        match self.panels.current() {
            Some(panel) => panel.set_visible(visible),
            None => self.console.line("host", "no pet panel is open"),
        }
    }

    /// Resolve the sidebar view the first time it is shown.
    fn open_view(&mut self) {
        if self.playground.sidebar().is_resolved() {
            return;
        }
        self.playground
            .resolve_webview_view(Box::new(ConsoleView::new(self.console.clone())));
    }

    fn reload_config(&mut self) {
        let event = self
            .config
            .shared
            .replace(load_config_from(&self.config.path));
        if event.is_empty() {
            self.console.line("host", "configuration unchanged");
            return;
        }
        tracing::info!("Configuration reloaded: {:?}", event.changed_keys());
        self.playground.on_configuration_changed(&event);
    }

    /// Deliver changes the watcher picked up since the last request.
    fn apply_config_changes(&mut self) {
        let Some(changes) = &self.config.changes else {
            return;
        };
        let pending: Vec<_> = changes.try_iter().collect();
        for event in pending {
            self.playground.on_configuration_changed(&event);
        }
    }
}
