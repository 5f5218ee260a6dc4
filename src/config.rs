//! User configuration: layout geometry, refresh timing and keybindings.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/index-tree-view/config.toml`
//! (default `~/.config/index-tree-view/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::geometry::LayoutConfig;

// ───────────────────────────────────────── actions ───────────

/// Everything the viewer can be told to do from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
    Fit,
    Reload,
    Quit,
}

impl Action {
    /// Ordered list of all actions (config file order).
    pub const ALL: &[Action] = &[
        Action::PanLeft,
        Action::PanRight,
        Action::PanUp,
        Action::PanDown,
        Action::ZoomIn,
        Action::ZoomOut,
        Action::Fit,
        Action::Reload,
        Action::Quit,
    ];

    fn config_key(self) -> &'static str {
        match self {
            Action::PanLeft => "pan_left",
            Action::PanRight => "pan_right",
            Action::PanUp => "pan_up",
            Action::PanDown => "pan_down",
            Action::ZoomIn => "zoom_in",
            Action::ZoomOut => "zoom_out",
            Action::Fit => "fit",
            Action::Reload => "reload",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A key code plus the CTRL/ALT/SHIFT modifiers that must accompany it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT take part in the comparison.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// Config-file spelling, e.g. `"Ctrl+c"`, `"Left"`, `"+"`.
    pub fn to_config_string(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char('+') => "Plus".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse `"Ctrl+r"`, `"Left"`, `"Plus"`, `"q"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, modifier_parts) = parts.split_last()?;

        for part in modifier_parts {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "home" => KeyCode::Home,
            "space" => KeyCode::Char(' '),
            "plus" => KeyCode::Char('+'),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            _ => {
                // Single characters keep their case: `R` and `r` differ.
                let mut chars = key_part.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(c)
            }
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub layout: LayoutConfig,
    /// How long the surface gets to settle before a recenter fires.
    pub settle_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            layout: LayoutConfig::default(),
            settle_delay_ms: 100,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(PanLeft, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(PanRight, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(PanUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(PanDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(ZoomIn, vec![KeyBind::new(Char('+'), n), KeyBind::new(Char('='), n)]);
        m.insert(ZoomOut, vec![KeyBind::new(Char('-'), n)]);
        m.insert(Fit, vec![KeyBind::new(Char('f'), n), KeyBind::new(Home, n)]);
        m.insert(Reload, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Action bound to `event`; the binding with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, bind)| bind.matches(event))
            .max_by_key(|(_, bind)| bind.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// Short hint for the status bar built from the first binding of each
    /// headline action.
    pub fn status_bar_hint(&self) -> String {
        let first = |action: Action| {
            self.bindings
                .get(&action)
                .and_then(|b| b.first())
                .map(KeyBind::to_config_string)
                .unwrap_or_else(|| "?".into())
        };
        format!(
            "{}: fit | {}/{}: zoom | {}: reload | {}: quit",
            first(Action::Fit),
            first(Action::ZoomIn),
            first(Action::ZoomOut),
            first(Action::Reload),
            first(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                tracing::warn!("config: cannot read {}: {err}", path.display());
                Self::default()
            }
        }
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            let layout = &mut config.layout;
            let handled = match key {
                "node_width" => set_positive(&mut layout.node_width, value),
                "node_height" => set_positive(&mut layout.node_height, value),
                "sibling_spacing" => set_non_negative(&mut layout.sibling_spacing, value),
                "level_height" => set_positive(&mut layout.level_height, value),
                "max_depth" => {
                    if let Ok(v) = value.parse::<usize>() {
                        layout.max_depth = v.max(1);
                    }
                    true
                }
                "settle_delay_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.settle_delay_ms = v.clamp(0, 2000);
                    }
                    true
                }
                _ => false,
            };
            if handled {
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!("config: ignoring unknown key {key:?}");
                continue;
            };
            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    /// Render the configuration in the on-disk format.
    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# index-tree-view configuration".to_string(),
            String::new(),
            "# Layout (world units)".to_string(),
            format!("node_width = {}", self.layout.node_width),
            format!("node_height = {}", self.layout.node_height),
            format!("sibling_spacing = {}", self.layout.sibling_spacing),
            format!("level_height = {}", self.layout.level_height),
            format!("max_depth = {}", self.layout.max_depth),
            String::new(),
            "# Refresh".to_string(),
            format!("settle_delay_ms = {}", self.settle_delay_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn set_positive(slot: &mut f64, value: &str) -> bool {
    if let Ok(v) = value.parse::<f64>() {
        if v.is_finite() && v > 0.0 {
            *slot = v;
        }
    }
    true
}

fn set_non_negative(slot: &mut f64, value: &str) -> bool {
    if let Ok(v) = value.parse::<f64>() {
        if v.is_finite() && v >= 0.0 {
            *slot = v;
        }
    }
    true
}

/// Return the config file path (`$XDG_CONFIG_HOME/index-tree-view/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("index-tree-view").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn defaults_round_trip_through_the_file_format() {
        let config = AppConfig::default();
        let parsed = AppConfig::parse(&config.serialise());
        assert_eq!(parsed.layout, config.layout);
        assert_eq!(parsed.settle_delay_ms, 100);
        assert_eq!(parsed.bindings, config.bindings);
    }

    #[test]
    fn values_are_parsed_and_clamped() {
        let parsed = AppConfig::parse(
            "[layout]\nnode_width = 120\nsibling_spacing = 0\nlevel_height = -5\n\
             settle_delay_ms = 99999\nmax_depth = 0\n",
        );
        assert_eq!(parsed.layout.node_width, 120.0);
        assert_eq!(parsed.layout.sibling_spacing, 0.0);
        assert_eq!(parsed.layout.level_height, 150.0);
        assert_eq!(parsed.settle_delay_ms, 2000);
        assert_eq!(parsed.layout.max_depth, 1);
    }

    #[test]
    fn bindings_override_defaults() {
        let parsed = AppConfig::parse("fit = Ctrl+f, Home\nquit = \"x\"\nbogus = q\n");
        assert_eq!(
            parsed.match_key(key(KeyCode::Char('f'), KeyModifiers::CONTROL)),
            Some(Action::Fit)
        );
        assert_eq!(parsed.match_key(key(KeyCode::Char('f'), KeyModifiers::NONE)), None);
        assert_eq!(parsed.match_key(key(KeyCode::Char('x'), KeyModifiers::NONE)), Some(Action::Quit));
        assert_eq!(
            parsed.match_key(key(KeyCode::Left, KeyModifiers::NONE)),
            Some(Action::PanLeft)
        );
    }

    #[test]
    fn plus_key_survives_the_separator() {
        let bind = KeyBind::parse("Plus").unwrap();
        assert_eq!(bind.code, KeyCode::Char('+'));
        assert_eq!(bind.to_config_string(), "Plus");
        assert_eq!(KeyBind::parse("Ctrl+Shift+F5").unwrap().code, KeyCode::F(5));
        assert!(KeyBind::parse("Hyper+q").is_none());
    }

    #[test]
    fn hint_uses_first_bindings() {
        assert_eq!(
            AppConfig::default().status_bar_hint(),
            "f: fit | Plus/-: zoom | r: reload | q: quit"
        );
    }
}
