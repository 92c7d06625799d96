//! CLI Interface: User input and terminal rendering
//!
//! # Components
//! - `input.rs`: Keystroke and mouse capture using crossterm
//! - `controller.rs`: Routes shell events into the session
//! - `view.rs`: Card views composed from session state
//! - `display.rs`: Terminal rendering and UI

pub mod controller;
pub mod display;
pub mod input;
pub mod view;

pub use controller::{dispatch, Flow, ShellEvent};
pub use display::Display;
pub use input::InputHandler;
pub use view::{compose, CardView};
