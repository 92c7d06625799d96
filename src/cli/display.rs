//! Terminal display and UI rendering
//!
//! Features:
//! - Case card with side labels and a back-peek card behind it
//! - Verdict overlay with the explanation sections
//! - End-of-deck summary with the score tier
//! - Context-sensitive help line

use super::view::CardView;
use crate::catalog::Decision;
use crate::session::{Summary, Tier, Verdict};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::cell::Cell;
use std::error::Error;
use std::io::{stdout, Stdout, Write};

const FALLBACK_WIDTH: u16 = 80;
const MAX_CARD_WIDTH: usize = 72;

/// Terminal display manager
pub struct Display {
    /// Cleared by the first `shutdown`
    active: Cell<bool>,
}

impl Display {
    /// Switch to the alternate screen and hide the cursor
    pub fn alternate() -> Result<Self, Box<dyn Error>> {
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Display {
            active: Cell::new(true),
        })
    }

    fn card_width() -> usize {
        let (cols, _) = terminal::size().unwrap_or((FALLBACK_WIDTH, 24));
        (cols as usize).saturating_sub(4).clamp(20, MAX_CARD_WIDTH)
    }

    /// Draw a full frame
    pub fn render(&self, views: &[CardView]) -> Result<(), Box<dyn Error>> {
        let mut out = stdout();
        queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        let width = Self::card_width();
        let mut row: u16 = 0;
        self.show_header(&mut out, &mut row)?;

        for view in views {
            match view {
                CardView::BackPeek => self.show_back_peek(&mut out, &mut row, width)?,
                CardView::Front {
                    case,
                    position,
                    total,
                    score,
                    chosen,
                } => {
                    self.show_progress(&mut out, &mut row, *position, *total, *score)?;
                    self.show_front(&mut out, &mut row, width, &case.title, &case.prompt, *chosen)?;
                }
                CardView::Verdict(verdict) => self.show_verdict(&mut out, &mut row, width, verdict)?,
                CardView::Summary { summary, tier } => {
                    self.show_summary(&mut out, &mut row, width, summary, *tier)?
                }
            }
        }

        self.show_help(&mut out, row + 1, views)?;
        out.flush()?;
        Ok(())
    }

    fn line(
        &self,
        out: &mut Stdout,
        row: &mut u16,
        color: Color,
        text: &str,
    ) -> Result<(), Box<dyn Error>> {
        queue!(
            out,
            cursor::MoveTo(2, *row),
            SetForegroundColor(color),
            Print(text),
            ResetColor
        )?;
        *row += 1;
        Ok(())
    }

    fn show_header(&self, out: &mut Stdout, row: &mut u16) -> Result<(), Box<dyn Error>> {
        queue!(
            out,
            cursor::MoveTo(2, *row),
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::Cyan),
            Print("CASE TRAINER"),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        *row += 1;
        self.line(
            out,
            row,
            Color::DarkGrey,
            "Swipe right: happened  |  swipe left: did not happen",
        )?;
        *row += 1;
        Ok(())
    }

    fn show_progress(
        &self,
        out: &mut Stdout,
        row: &mut u16,
        position: usize,
        total: usize,
        score: usize,
    ) -> Result<(), Box<dyn Error>> {
        queue!(
            out,
            cursor::MoveTo(2, *row),
            SetForegroundColor(Color::Magenta),
            Print("Card: "),
            ResetColor,
            Print(format!("{}/{}", (position + 1).min(total), total)),
            Print("  |  "),
            SetForegroundColor(Color::Magenta),
            Print("Points: "),
            ResetColor,
            Print(score)
        )?;
        *row += 2;
        Ok(())
    }

    fn show_back_peek(
        &self,
        out: &mut Stdout,
        row: &mut u16,
        width: usize,
    ) -> Result<(), Box<dyn Error>> {
        queue!(
            out,
            cursor::MoveTo(4, *row),
            SetForegroundColor(Color::DarkGrey),
            Print(format!("╭{}╮", "─".repeat(width.saturating_sub(4)))),
            ResetColor
        )?;
        *row += 1;
        Ok(())
    }

    fn show_front(
        &self,
        out: &mut Stdout,
        row: &mut u16,
        width: usize,
        title: &str,
        prompt: &str,
        chosen: Option<Decision>,
    ) -> Result<(), Box<dyn Error>> {
        let inner = width.saturating_sub(4);
        let border = |color| SetForegroundColor(color);
        let frame = match chosen {
            Some(Decision::Forward) => Color::Green,
            Some(Decision::Backward) => Color::Red,
            None => Color::White,
        };

        queue!(
            out,
            cursor::MoveTo(2, *row),
            border(frame),
            Print(format!("┌{}┐", "─".repeat(width - 2))),
            ResetColor
        )?;
        *row += 1;

        // Side labels light up for the chosen side
        let left = Decision::Backward.label();
        let right = Decision::Forward.label();
        let gap = inner.saturating_sub(left.chars().count() + right.chars().count());
        let label_color = |side: Decision| {
            if chosen == Some(side) {
                Color::Yellow
            } else {
                Color::DarkGrey
            }
        };
        queue!(
            out,
            cursor::MoveTo(2, *row),
            border(frame),
            Print("│ "),
            SetForegroundColor(label_color(Decision::Backward)),
            Print(format!("← {}", left)),
            Print(" ".repeat(gap.saturating_sub(4))),
            SetForegroundColor(label_color(Decision::Forward)),
            Print(format!("{} →", right)),
            border(frame),
            Print(" │"),
            ResetColor
        )?;
        *row += 1;

        let mut body = Vec::new();
        if !title.is_empty() {
            body.push((Color::Cyan, title.to_string()));
            body.push((Color::Reset, String::new()));
        }
        body.extend(wrap(prompt, inner).into_iter().map(|l| (Color::Reset, l)));

        for (color, text) in body {
            let pad = inner.saturating_sub(text.chars().count());
            queue!(
                out,
                cursor::MoveTo(2, *row),
                border(frame),
                Print("│ "),
                SetForegroundColor(color),
                Print(&text),
                Print(" ".repeat(pad)),
                border(frame),
                Print(" │"),
                ResetColor
            )?;
            *row += 1;
        }

        queue!(
            out,
            cursor::MoveTo(2, *row),
            border(frame),
            Print(format!("└{}┘", "─".repeat(width - 2))),
            ResetColor
        )?;
        *row += 1;
        Ok(())
    }

    fn show_verdict(
        &self,
        out: &mut Stdout,
        row: &mut u16,
        width: usize,
        verdict: &Verdict,
    ) -> Result<(), Box<dyn Error>> {
        let (headline, color) = if verdict.correct {
            ("CORRECT", Color::Green)
        } else {
            ("WRONG", Color::Red)
        };

        queue!(
            out,
            cursor::MoveTo(2, *row),
            SetForegroundColor(Color::Blue),
            Print("─".repeat(width)),
            ResetColor
        )?;
        *row += 1;
        queue!(
            out,
            cursor::MoveTo(2, *row),
            SetAttribute(Attribute::Bold),
            SetForegroundColor(color),
            Print(headline),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print(format!("  (you chose: {})", verdict.decision.label()))
        )?;
        *row += 2;

        let case = verdict.case;
        self.line(out, row, Color::Yellow, &format!("Reality: {}", case.verdict_summary))?;
        *row += 1;

        self.section(out, row, width, "How it was handled", &case.handling_note)?;
        if let Some(note) = &case.protection_note {
            self.section(out, row, width, "How the bank protected itself", note)?;
        }

        queue!(
            out,
            cursor::MoveTo(2, *row),
            SetForegroundColor(Color::Blue),
            Print("─".repeat(width)),
            ResetColor
        )?;
        *row += 1;
        Ok(())
    }

    fn section(
        &self,
        out: &mut Stdout,
        row: &mut u16,
        width: usize,
        title: &str,
        body: &str,
    ) -> Result<(), Box<dyn Error>> {
        self.line(out, row, Color::Magenta, title)?;
        // Keep authored line breaks
        for paragraph in body.lines() {
            for text in wrap(paragraph, width) {
                self.line(out, row, Color::Reset, &text)?;
            }
        }
        *row += 1;
        Ok(())
    }

    fn show_summary(
        &self,
        out: &mut Stdout,
        row: &mut u16,
        width: usize,
        summary: &Summary,
        tier: Option<&Tier>,
    ) -> Result<(), Box<dyn Error>> {
        queue!(
            out,
            cursor::MoveTo(2, *row),
            SetAttribute(Attribute::Bold),
            Print("All cases done"),
            SetAttribute(Attribute::Reset)
        )?;
        *row += 2;

        self.line(
            out,
            row,
            Color::Reset,
            &format!("Your result: {} / {}", summary.score, summary.total),
        )?;

        if let Some(tier) = tier {
            self.line(out, row, Color::Cyan, &format!("Tier: {}", tier.label))?;
            for text in wrap(&tier.message, width) {
                self.line(out, row, Color::Reset, &text)?;
            }
        }

        *row += 1;
        if summary.perfect {
            self.line(out, row, Color::Green, "Every answer correct. Well done!")?;
        } else if summary.total > 0 {
            self.line(out, row, Color::Reset, "Try again to improve your result.")?;
        }
        Ok(())
    }

    /// Show help text for what the current frame accepts
    fn show_help(
        &self,
        out: &mut Stdout,
        row: u16,
        views: &[CardView],
    ) -> Result<(), Box<dyn Error>> {
        let text = match views.last() {
            Some(CardView::Summary { .. }) => "R / Enter: start over  |  Q: quit",
            Some(CardView::Verdict(_)) => "Enter / Space / click / drag up-down: next  |  Q: quit",
            Some(CardView::Front { chosen: Some(_), .. }) => "Revealing the verdict...",
            _ => "← / →  or drag the card  |  Q: quit",
        };

        queue!(
            out,
            cursor::MoveTo(2, row),
            SetForegroundColor(Color::DarkGrey),
            Print(text),
            ResetColor
        )?;
        Ok(())
    }

    /// Reset terminal state and cleanup
    pub fn shutdown(&self) -> Result<(), Box<dyn Error>> {
        // Only the first call touches the terminal
        if !self.active.replace(false) {
            return Ok(());
        }

        execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}

/// Greedy word wrap to `width` columns
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }

        // Hard-split words longer than a line
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_after_shutdown_is_noop() {
        let display = Display {
            active: Cell::new(false),
        };
        assert!(display.shutdown().is_ok());
        assert!(!display.active.get());
        // Drop must not restore the terminal a second time either
        drop(display);
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        let lines = wrap("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        let lines = wrap("мама мила раму", 9);
        assert_eq!(lines, vec!["мама мила", "раму"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }
}
