//! Keystroke and mouse input handling using crossterm
//!
//! Features:
//! - Non-blocking event capture with a caller-chosen timeout
//! - Mouse drags converted from terminal cells to pixels
//! - Ctrl+C / Esc / q graceful exit

use super::controller::ShellEvent;
use crate::config::TerminalConfig;
use crate::gesture::{DragTracker, KeyPress};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use std::io::{stdout, Result as IoResult};
use std::time::{Duration, Instant};

/// Handles user input from terminal
pub struct InputHandler {
    tracker: DragTracker,
    cell_width_px: f32,
    cell_height_px: f32,
}

impl InputHandler {
    pub fn new(terminal: &TerminalConfig, velocity_window: Duration) -> Self {
        InputHandler {
            tracker: DragTracker::new(velocity_window),
            cell_width_px: terminal.cell_width_px,
            cell_height_px: terminal.cell_height_px,
        }
    }

    /// Enable raw mode and mouse reporting
    pub fn enable_capture() -> IoResult<()> {
        crossterm::terminal::enable_raw_mode()?;
        execute!(stdout(), EnableMouseCapture)
    }

    /// Disable mouse reporting and restore the terminal
    pub fn disable_capture() -> IoResult<()> {
        execute!(stdout(), DisableMouseCapture)?;
        crossterm::terminal::disable_raw_mode()
    }

    /// Poll for one event; `None` on timeout or for events the shell ignores
    pub fn read_event(&mut self, timeout: Duration) -> IoResult<Option<ShellEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let shell_event = match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if Self::is_exit(&key) {
                    Some(ShellEvent::Quit)
                } else {
                    Some(ShellEvent::Key(Self::key_press(&key)))
                }
            }
            Event::Mouse(mouse) => self.mouse(mouse, Instant::now()),
            Event::Resize(_, _) => Some(ShellEvent::Resize),
            _ => None,
        };

        Ok(shell_event)
    }

    fn mouse(&mut self, mouse: MouseEvent, at: Instant) -> Option<ShellEvent> {
        let x = mouse.column as f32 * self.cell_width_px;
        let y = mouse.row as f32 * self.cell_height_px;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.tracker.press(x, y, at);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.tracker.motion(x, y, at);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.tracker.release(x, y, at).map(ShellEvent::Drag)
            }
            // Another button mid-drag abandons the swipe
            MouseEventKind::Down(_) | MouseEventKind::Up(_) => {
                self.tracker.cancel();
                None
            }
            _ => None,
        }
    }

    /// Check if key event is an exit signal (Ctrl+C, Escape or q)
    pub fn is_exit(key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            KeyCode::Esc => true,
            _ => false,
        }
    }

    /// Map a crossterm key to a device-independent key press
    pub fn key_press(key: &KeyEvent) -> KeyPress {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return KeyPress::Other;
        }

        match key.code {
            KeyCode::Left => KeyPress::Left,
            KeyCode::Right => KeyPress::Right,
            KeyCode::Up => KeyPress::Up,
            KeyCode::Down => KeyPress::Down,
            KeyCode::Enter => KeyPress::Enter,
            KeyCode::Char(' ') => KeyPress::Space,
            KeyCode::Char(c) => KeyPress::Char(c),
            _ => KeyPress::Other,
        }
    }
}
