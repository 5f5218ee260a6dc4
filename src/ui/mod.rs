//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* render graph and turns it into cells on the
//! terminal.  No layout computation happens here.

pub mod graph_view;
pub mod layout;
pub mod status;
pub mod theme;
pub mod viewport;
