//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a reader thread that
//! forwards them over a channel, so the single-threaded event loop never
//! blocks on terminal input.

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Spawns a reader thread that blocks on the terminal and sends events
/// through the returned channel.
pub fn spawn_event_reader() -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || loop {
        let app_event = match event::read() {
            // Key releases (reported on some platforms) are not actions.
            Ok(CtEvent::Key(k)) if k.kind != KeyEventKind::Release => AppEvent::Key(k),
            Ok(CtEvent::Resize(w, h)) => AppEvent::Resize(w, h),
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!("terminal read failed: {err}");
                break;
            }
        };
        if tx.send(app_event).is_err() {
            break; // receiver dropped
        }
    });

    rx
}
