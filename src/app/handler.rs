//! Input handling: maps key events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Action;

use super::state::AppState;

/// Process a key event through the configured bindings.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of bindings.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    match action {
        Action::PanLeft => state.viewport.pan(-1.0, 0.0),
        Action::PanRight => state.viewport.pan(1.0, 0.0),
        Action::PanUp => state.viewport.pan(0.0, -1.0),
        Action::PanDown => state.viewport.pan(0.0, 1.0),
        Action::ZoomIn => state.viewport.zoom_in(),
        Action::ZoomOut => state.viewport.zoom_out(),
        Action::Fit => {
            if let Some(bounds) = state.controller.graph().bounds() {
                state.viewport.fit(bounds);
            }
        }
        Action::Reload => {
            if state.source.is_reloadable() {
                state.needs_reload = true;
                state.set_status(format!("reloading {}", state.source.describe()));
            } else {
                state.set_error("stdin cannot be reloaded");
            }
        }
        Action::Quit => state.should_quit = true,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::app::source::StructureSource;
    use crate::config::AppConfig;
    use crate::core::tree::TreeNode;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state_for(source: StructureSource) -> AppState {
        AppState::new(source, AppConfig::default()).0
    }

    fn file_state() -> AppState {
        state_for(StructureSource::File(PathBuf::from("tree.json")))
    }

    #[test]
    fn quit_keys() {
        let mut state = file_state();
        handle_key(&mut state, press(KeyCode::Char('q')));
        assert!(state.should_quit);

        let mut state = file_state();
        handle_key(&mut state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(state.should_quit);
    }

    #[test]
    fn pan_and_zoom_move_the_viewport() {
        let mut state = file_state();
        let before = state.viewport.visible();

        handle_key(&mut state, press(KeyCode::Right));
        let after = state.viewport.visible();
        assert!(after.min_x > before.min_x);
        assert_eq!(after.width(), before.width());

        handle_key(&mut state, press(KeyCode::Char('+')));
        let zoomed = state.viewport.visible();
        assert!(zoomed.width() < after.width());
        handle_key(&mut state, press(KeyCode::Char('k')));
        assert!(state.viewport.visible().min_y < zoomed.min_y);
    }

    #[tokio::test(start_paused = true)]
    async fn fit_shows_the_whole_graph() {
        let mut state = file_state();
        let root = TreeNode::new("root").with_children(vec![TreeNode::new("a"), TreeNode::new("b")]);
        state.controller.submit(Some(&root)).unwrap();

        handle_key(&mut state, press(KeyCode::Char('f')));
        let bounds = state.controller.graph().bounds().unwrap();
        let visible = state.viewport.visible();
        assert!(visible.min_x <= bounds.min_x && visible.max_x >= bounds.max_x);
        assert!(visible.min_y <= bounds.min_y && visible.max_y >= bounds.max_y);
    }

    #[test]
    fn reload_depends_on_the_source() {
        let mut state = file_state();
        handle_key(&mut state, press(KeyCode::Char('r')));
        assert!(state.needs_reload);
        assert!(!state.status_is_error);

        let mut state = state_for(StructureSource::Stdin);
        handle_key(&mut state, press(KeyCode::Char('r')));
        assert!(!state.needs_reload);
        assert!(state.status_is_error);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut state = file_state();
        let before = state.viewport.visible();
        handle_key(&mut state, press(KeyCode::Char('z')));
        assert_eq!(state.viewport.visible(), before);
        assert!(!state.should_quit);
    }
}
