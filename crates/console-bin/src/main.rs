//! Line console entrypoint.
use anyhow::Result;
use clap::Parser;
use console_config::{Config, load_from};
use console_core::{ConsoleSettings, LineConsole, NoticeQueue, Rgb};
use console_events::{EVENT_CHANNEL_CAP, Event, InputEvent, KeyCode, KeyEvent};
use console_terminal::{
    CrosstermBackend, FrameView, TerminalGuard, TerminalSurface, render_frame,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tokio::sync::mpsc;
use tracing::{info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE_NAME: &str = "lineconsole.log";

type Console = LineConsole<TerminalSurface, NoticeQueue>;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "lineconsole", version, about = "Interactive line console")]
struct Args {
    /// Optional configuration file path (overrides discovery of `lineconsole.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    console: Console,
    foreground: Rgb,
    terminal_guard: TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run<'a>(&'a mut self) -> Result<RuntimeContext<'a>> {
        self.configure_logging()?;
        Self::install_panic_hook();

        info!(target: "runtime", "startup");
        let args = Args::parse();
        let config = load_from(args.config.clone())?;
        let settings = settings_from_config(&config);
        let foreground = settings.foreground;

        self.backend.set_title(config.title());
        let guard = self.backend.enter_guard()?;

        let config_source = config.source.as_ref().map(|p| p.display().to_string());
        info!(
            target: "runtime.startup",
            config_override = args.config.is_some(),
            config_source = config_source.as_deref(),
            history_depth = settings.history_depth,
            echo_input = settings.echo_input,
            "bootstrap_complete"
        );

        Ok(RuntimeContext {
            console: LineConsole::new(TerminalSurface::new(), NoticeQueue::new(), settings),
            foreground,
            terminal_guard: guard,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn settings_from_config(config: &Config) -> ConsoleSettings {
    let output = &config.file.output;
    let foreground = match output.foreground.parse::<Rgb>() {
        Ok(rgb) => rgb,
        Err(err) => {
            warn!(target: "config", %err, "foreground_invalid_using_white");
            Rgb::WHITE
        }
    };
    ConsoleSettings {
        history_depth: config.history_depth(),
        trace: output.trace,
        trace_source: output.trace_source.clone(),
        foreground,
        echo_input: output.echo_input,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CtrlC,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Viewport {
    width: u16,
    height: u16,
}

impl Viewport {
    fn output_rows(&self) -> u16 {
        self.height.saturating_sub(1)
    }
}

/// Apply one event to the console. Notices are modal: while one is pending
/// only the acknowledge keys act and everything else is swallowed.
fn route_event(console: &mut Console, viewport: &mut Viewport, event: &Event) -> LoopControl {
    match event {
        Event::Shutdown => {
            return LoopControl::Break {
                reason: ShutdownReason::ShutdownEvent,
            };
        }
        Event::Input(InputEvent::CtrlC) => {
            return LoopControl::Break {
                reason: ShutdownReason::CtrlC,
            };
        }
        Event::Input(InputEvent::Resize(w, h)) => {
            viewport.width = *w;
            viewport.height = *h;
        }
        Event::Input(InputEvent::Paste(text)) => {
            if console.notices().is_empty() {
                console.paste(text);
            }
        }
        Event::Input(InputEvent::Key(key)) => route_key(console, *viewport, *key),
    }
    LoopControl::Continue
}

fn route_key(console: &mut Console, viewport: Viewport, key: KeyEvent) {
    if !console.notices().is_empty() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            console.notices_mut().acknowledge();
            trace!(target: "runtime.notice", remaining = console.notices().len(), "notice_acknowledged");
        }
        return;
    }
    match key.code {
        KeyCode::PageUp => console
            .surface_mut()
            .page_up(viewport.width, viewport.output_rows()),
        KeyCode::PageDown => console
            .surface_mut()
            .page_down(viewport.width, viewport.output_rows()),
        _ => {
            let outcome = console.handle_key(key);
            trace!(target: "runtime.input", ?outcome, "key_routed");
        }
    }
}

fn draw(console: &Console, foreground: Rgb, viewport: Viewport) -> Result<()> {
    let view = FrameView {
        surface: console.surface(),
        input: console.input(),
        notice: console.notices().front(),
        foreground,
        width: viewport.width,
        height: viewport.height,
    };
    render_frame(&view).flush()
}

struct ConsoleRuntime<'a> {
    console: Console,
    foreground: Rgb,
    viewport: Viewport,
    rx: mpsc::Receiver<Event>,
    input_task: Option<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<console_input::AsyncInputShutdown>,
    _terminal_guard: TerminalGuard<'a>,
}

impl<'a> ConsoleRuntime<'a> {
    fn new(
        context: RuntimeContext<'a>,
        rx: mpsc::Receiver<Event>,
        input_task: tokio::task::JoinHandle<()>,
        input_shutdown: console_input::AsyncInputShutdown,
    ) -> Result<Self> {
        let RuntimeContext {
            console,
            foreground,
            terminal_guard,
        } = context;
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self {
            console,
            foreground,
            viewport: Viewport { width, height },
            rx,
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            _terminal_guard: terminal_guard,
        })
    }

    async fn run(&mut self) -> Result<()> {
        draw(&self.console, self.foreground, self.viewport)?;

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            match route_event(&mut self.console, &mut self.viewport, &event) {
                LoopControl::Continue => draw(&self.console, self.foreground, self.viewport)?,
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
            }
        }

        self.shutdown(shutdown_reason).await;
        Ok(())
    }

    async fn shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        if let Some(task) = self.input_task.take()
            && let Err(err) = task.await
        {
            warn!(target: "runtime.shutdown", %err, "input_task_join_failed");
        }
        log_shutdown_stage(reason, "complete");
        info!(target: "runtime", %reason, history_len = self.console.history().len(), "exit");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    let context = startup.run()?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = console_input::spawn_async_input(tx);
    let mut runtime = ConsoleRuntime::new(context, rx, input_task, input_shutdown)?;
    runtime.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_core::DisplaySurface;
    use console_events::KeyModifiers;
    use console_terminal::ScrollAnchor;

    fn console() -> Console {
        LineConsole::new(
            TerminalSurface::new(),
            NoticeQueue::new(),
            ConsoleSettings::default(),
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Input(InputEvent::Key(KeyEvent::plain(code)))
    }

    fn send_line(c: &mut Console, vp: &mut Viewport, line: &str) {
        for ch in line.chars() {
            route_event(c, vp, &key(KeyCode::Char(ch)));
        }
        route_event(c, vp, &key(KeyCode::Enter));
    }

    fn viewport() -> Viewport {
        Viewport {
            width: 40,
            height: 5,
        }
    }

    #[test]
    fn notices_are_modal_and_acknowledged_in_order() {
        let mut c = console();
        let mut vp = viewport();
        send_line(&mut c, &mut vp, "start a b");
        assert_eq!(c.notices().front().map(|n| n.message.as_str()), Some("a "));

        // typing is swallowed while a notice is up
        route_event(&mut c, &mut vp, &key(KeyCode::Char('z')));
        route_event(
            &mut c,
            &mut vp,
            &Event::Input(InputEvent::Paste("pasted".into())),
        );
        assert_eq!(c.input().as_str(), "start a b");

        route_event(&mut c, &mut vp, &key(KeyCode::Enter));
        assert_eq!(c.notices().front().map(|n| n.message.as_str()), Some("a b"));
        route_event(&mut c, &mut vp, &key(KeyCode::Esc));
        assert!(c.notices().is_empty());
        // acknowledging did not resubmit the line
        assert_eq!(c.history().len(), 1);

        route_event(&mut c, &mut vp, &key(KeyCode::Char('z')));
        assert_eq!(c.input().as_str(), "z");
    }

    #[test]
    fn ctrl_c_and_shutdown_break_the_loop() {
        let mut c = console();
        let mut vp = viewport();
        assert_eq!(
            route_event(&mut c, &mut vp, &Event::Input(InputEvent::CtrlC)),
            LoopControl::Break {
                reason: ShutdownReason::CtrlC
            }
        );
        assert_eq!(
            route_event(&mut c, &mut vp, &Event::Shutdown),
            LoopControl::Break {
                reason: ShutdownReason::ShutdownEvent
            }
        );
    }

    #[test]
    fn resize_updates_viewport() {
        let mut c = console();
        let mut vp = viewport();
        route_event(&mut c, &mut vp, &Event::Input(InputEvent::Resize(100, 30)));
        assert_eq!(
            vp,
            Viewport {
                width: 100,
                height: 30
            }
        );
        assert_eq!(vp.output_rows(), 29);
    }

    #[test]
    fn page_keys_scroll_the_surface() {
        let mut c = console();
        let mut vp = viewport();
        for i in 0..12 {
            c.surface_mut()
                .append(&format!("row{i}\n"), Rgb::WHITE)
                .unwrap();
        }
        route_event(&mut c, &mut vp, &key(KeyCode::PageUp));
        assert_eq!(c.surface().anchor(), ScrollAnchor::Line(4));
        route_event(&mut c, &mut vp, &key(KeyCode::PageDown));
        assert_eq!(c.surface().anchor(), ScrollAnchor::Bottom);
        route_event(
            &mut c,
            &mut vp,
            &Event::Input(InputEvent::Key(KeyEvent::new(KeyCode::Home, KeyModifiers::CTRL))),
        );
        assert_eq!(c.surface().anchor(), ScrollAnchor::Line(0));
    }

    #[test]
    fn invalid_foreground_falls_back_to_white() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[output]\nforeground = \"not-a-colour\"\ntrace = true\n[history]\ndepth = 3\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let settings = settings_from_config(&cfg);
        assert_eq!(settings.foreground, Rgb::WHITE);
        assert!(settings.trace);
        assert_eq!(settings.history_depth, 3);
    }

    #[test]
    fn configured_depth_bounds_recall() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[history]\ndepth = 2\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let mut c = LineConsole::new(
            TerminalSurface::new(),
            NoticeQueue::new(),
            settings_from_config(&cfg),
        );
        let mut vp = viewport();
        for line in ["one", "two", "three"] {
            send_line(&mut c, &mut vp, line);
        }
        for _ in 0..5 {
            route_event(&mut c, &mut vp, &key(KeyCode::Up));
        }
        assert_eq!(c.input().as_str(), "two");
    }
}
