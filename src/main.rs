//! A terminal viewer for suffix-tree and PATRICIA-tree index structures.
//!
//! Run the binary with a structure document (or `-` for stdin) to launch the
//! interactive graph view.
//! Run with `--dump` to print the laid-out render graph as JSON instead.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders},
    Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    source::{load_structure, spawn_reload, watch_source, StructureSource},
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::engine;
use crate::ui::{
    graph_view::GraphView, layout::AppLayout, status::StatusBar, theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Interactive index-tree viewer")]
struct Cli {
    /// Structure document to show; `-` reads stdin.
    #[arg(default_value = "-")]
    path: PathBuf,

    /// Print the laid-out render graph as JSON and exit.
    #[arg(long)]
    dump: bool,

    /// Print the effective configuration and exit.
    #[arg(long = "print-config")]
    print_config: bool,

    /// Milliseconds to wait after the last change before recentring.
    #[arg(long = "settle-ms")]
    settle_ms: Option<u64>,

    /// Deepest nesting accepted before the tree is rejected as malformed.
    #[arg(long = "max-depth")]
    max_depth: Option<usize>,
}

impl Cli {
    /// Apply command-line overrides on top of the config file.
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(ms) = self.settle_ms {
            config.settle_delay_ms = ms.min(2000);
        }
        if let Some(depth) = self.max_depth {
            config.layout.max_depth = depth.max(1);
        }
    }
}

/// Headless mode: lay out once and print the graph.
fn dump(source: &StructureSource, config: &AppConfig) -> Result<()> {
    let structure = load_structure(source)?;
    let graph = engine::compute_optional(structure.root.as_ref(), &config.layout)
        .with_context(|| format!("cannot lay out {}", source.describe()))?;
    tracing::debug!(
        "dump: {} nodes, {} connections",
        graph.nodes.len(),
        graph.edges.len()
    );
    println!("{}", serde_json::to_string_pretty(&graph)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    let mut user_config = AppConfig::load();
    cli.apply_to(&mut user_config);

    if cli.print_config {
        print!("{}", user_config.serialise());
        return Ok(());
    }

    let source = StructureSource::from_arg(&cli.path);
    if cli.dump {
        return dump(&source, &user_config);
    }

    // ── initial load ──────────────────────────────────────────
    // Stdin can only be read once, so a failure there is fatal.  A file may
    // not exist yet; the watcher picks it up when it appears.
    let (mut state, mut recenter_rx) = AppState::new(source, user_config);
    match load_structure(&state.source) {
        Ok(structure) => state.apply_structure(structure),
        Err(err) if state.source.is_reloadable() => {
            tracing::warn!("initial load failed: {err:#}");
            state.set_error(format!("{err:#}"));
        }
        Err(err) => return Err(err),
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader();
    let (source_tx, mut source_rx) = tokio::sync::mpsc::unbounded_channel();
    let (change_tx, mut change_rx) = tokio::sync::mpsc::unbounded_channel();
    // Kept alive for the whole loop; dropping it stops the watch.
    let _watcher = match &state.source {
        StructureSource::File(path) => match watch_source(path, change_tx) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                tracing::warn!("live reload disabled: {err:#}");
                state.set_error(format!("live reload disabled: {err:#}"));
                None
            }
        },
        StructureSource::Stdin => None,
    };
    let hint = state.config.status_bar_hint();

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());
            let graph = state.controller.graph();

            let block = Block::default()
                .title(format!(" {} ", state.source.describe()))
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());
            frame.render_widget(
                GraphView::new(&graph, &state.viewport).block(block),
                layout.graph_area,
            );

            frame.render_widget(
                StatusBar {
                    index_type: state.index_type,
                    graph: &graph,
                    message: state.status_message.as_deref(),
                    hint: &hint,
                    is_error: state.status_is_error,
                },
                layout.status_area,
            );
        })?;

        // Reads run off-thread; the result comes back on `source_rx`.
        if let Some(generation) = state.take_reload() {
            spawn_reload(source_tx.clone(), generation, state.source.clone());
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Resize(_, _) => {}
                }
            }

            Some(()) = change_rx.recv() => {
                // One save often fires several events; collapse them into
                // a single reload.
                while change_rx.try_recv().is_ok() {}
                state.on_source_changed();
            }

            Some(update) = source_rx.recv() => state.apply_update(update),

            Some(request) = recenter_rx.recv() => state.apply_recenter(request),
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
