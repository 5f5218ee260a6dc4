//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::tree::{IndexStructure, IndexType};
use crate::ui::viewport::Viewport;

use super::refresh::{RecenterRequest, RefreshController, RefreshOutcome};
use super::source::{SourceUpdate, StructureSource};

/// Top-level application state.
pub struct AppState {
    /// Where the structure document is read from.
    pub source: StructureSource,
    /// Kind of index in the last successfully loaded document.
    pub index_type: Option<IndexType>,
    /// Owns the current render graph and the recenter timer.
    pub controller: RefreshController,
    pub viewport: Viewport,
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Whether `status_message` reports a failure.
    pub status_is_error: bool,
    /// Set by handlers to request a background re-read of the source.
    pub needs_reload: bool,
    /// Monotonic id of the latest reload; older results are dropped.
    pub reload_generation: u64,
}

impl AppState {
    pub fn new(
        source: StructureSource,
        config: AppConfig,
    ) -> (Self, mpsc::UnboundedReceiver<RecenterRequest>) {
        let (controller, recenter_rx) =
            RefreshController::new(config.layout, config.settle_delay());
        let state = Self {
            source,
            index_type: None,
            controller,
            viewport: Viewport::default(),
            config,
            should_quit: false,
            status_message: None,
            status_is_error: false,
            needs_reload: false,
            reload_generation: 0,
        };
        (state, recenter_rx)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    /// Hand a freshly loaded document to the refresh controller.
    pub fn apply_structure(&mut self, structure: IndexStructure) {
        self.index_type = Some(structure.index_type);
        match self.controller.submit(structure.root.as_ref()) {
            Ok(RefreshOutcome::Relaid { nodes, edges }) => {
                self.set_status(format!("laid out {nodes} nodes, {edges} connections"));
            }
            Ok(RefreshOutcome::Emptied) => {
                self.set_status("index has no structure yet");
            }
            Ok(RefreshOutcome::Unchanged) => {
                self.set_status("no changes");
            }
            Err(err) => {
                tracing::warn!("layout failed: {err}");
                self.set_error(err.to_string());
            }
        }
    }

    /// Apply a background reload result, ignoring superseded ones.
    pub fn apply_update(&mut self, update: SourceUpdate) {
        if update.generation != self.reload_generation {
            return;
        }
        match update.result {
            Ok(structure) => self.apply_structure(structure),
            Err(err) => {
                tracing::warn!("reload failed: {err:#}");
                self.set_error(format!("{err:#}"));
            }
        }
    }

    /// Fit the viewport if `request` is still current.
    pub fn apply_recenter(&mut self, request: RecenterRequest) {
        if let Some(bounds) = self.controller.accept_recenter(request) {
            tracing::debug!("recenter: applied gen={}", self.controller.generation());
            self.viewport.fit(bounds);
        }
    }

    /// The watcher saw the source file change on disk.
    pub fn on_source_changed(&mut self) {
        if self.source.is_reloadable() {
            self.needs_reload = true;
        }
    }

    /// Claim a pending reload request, returning its generation.
    pub fn take_reload(&mut self) -> Option<u64> {
        if !std::mem::take(&mut self.needs_reload) {
            return None;
        }
        self.reload_generation = self.reload_generation.wrapping_add(1);
        Some(self.reload_generation)
    }
}
