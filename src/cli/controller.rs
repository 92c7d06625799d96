//! Event routing between the terminal and the session
//!
//! Each shell event runs to completion against the session machine and the
//! reveal pacer before the next one is read.

use crate::gesture::{
    classify_drag, classify_key, dismisses_on_key, dismisses_on_release, DragRelease,
    GestureConfig, KeyPress,
};
use crate::session::{Phase, ProgressStore, RevealPacer, SessionMachine, Transition};
use std::time::Instant;

/// Input the shell forwards to the controller
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShellEvent {
    Key(KeyPress),
    /// Completed pointer press/release
    Drag(DragRelease),
    Resize,
    Quit,
}

/// What the event loop should do next
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Redraw,
    Quit,
}

/// Apply one shell event
pub fn dispatch<S: ProgressStore>(
    machine: &mut SessionMachine<S>,
    pacer: &mut RevealPacer,
    gesture: &GestureConfig,
    event: ShellEvent,
    now: Instant,
) -> Flow {
    match event {
        ShellEvent::Quit => return Flow::Quit,
        ShellEvent::Resize => return Flow::Redraw,
        _ => {}
    }

    match machine.phase() {
        Phase::Active => {
            // Verdict-phase input is routed below; only a painted overlay gates keys here
            let overlay_painted = pacer.is_revealed(machine.epoch());
            let decision = match event {
                ShellEvent::Key(key) => classify_key(key, overlay_painted),
                ShellEvent::Drag(release) => classify_drag(&release, gesture),
                _ => None,
            };

            let Some(decision) = decision else {
                // A released drag without a decision snaps the card back
                return if matches!(event, ShellEvent::Drag(_)) {
                    Flow::Redraw
                } else {
                    Flow::Continue
                };
            };

            if machine.submit_decision(decision) == Transition::Applied {
                pacer.schedule_reveal(machine.epoch(), now);
                Flow::Redraw
            } else {
                Flow::Continue
            }
        }
        Phase::Verdict => {
            // Overlay not painted yet: nothing to dismiss
            if !pacer.is_revealed(machine.epoch()) {
                return Flow::Continue;
            }

            let dismiss = match event {
                ShellEvent::Key(key) => dismisses_on_key(key),
                ShellEvent::Drag(release) => dismisses_on_release(&release, gesture),
                _ => false,
            };

            if dismiss && machine.advance() == Transition::Applied {
                pacer.supersede();
                Flow::Redraw
            } else {
                Flow::Continue
            }
        }
        Phase::Complete => {
            let restart = matches!(
                event,
                ShellEvent::Key(KeyPress::Char('r' | 'R')) | ShellEvent::Key(KeyPress::Enter)
            );

            if restart && machine.restart() == Transition::Applied {
                pacer.supersede();
                Flow::Redraw
            } else {
                Flow::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Case, Catalog};
    use crate::session::{MemoryStore, PROGRESS_KEY};
    use std::time::Duration;

    fn machine(truths: &[bool]) -> SessionMachine<MemoryStore> {
        let cases = truths
            .iter()
            .enumerate()
            .map(|(i, &was_real)| Case {
                id: format!("c{}", i),
                title: String::new(),
                prompt: String::new(),
                was_real,
                verdict_summary: String::new(),
                handling_note: String::new(),
                protection_note: Some(String::new()),
            })
            .collect();
        SessionMachine::new(Catalog::from_cases(cases).unwrap(), MemoryStore::new())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_full_round_by_keyboard() {
        let gesture = GestureConfig::default();
        let mut session = machine(&[true, false]);
        let mut pacer = RevealPacer::new(ms(200));
        let t0 = Instant::now();

        let flow = dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Key(KeyPress::Right), t0);
        assert_eq!(flow, Flow::Redraw);
        assert_eq!(session.phase(), Phase::Verdict);
        assert_eq!(session.score(), 1);

        // Dismissal before the overlay is painted is ignored
        let flow = dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Key(KeyPress::Enter), t0 + ms(50));
        assert_eq!(flow, Flow::Continue);
        assert_eq!(session.position(), 0);

        assert!(pacer.tick(t0 + ms(200), session.epoch()));
        let flow = dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Key(KeyPress::Enter), t0 + ms(250));
        assert_eq!(flow, Flow::Redraw);
        assert_eq!(session.position(), 1);
        assert!(!pacer.is_revealed(session.epoch()));
    }

    #[test]
    fn test_second_gesture_before_overlay_does_not_rescore() {
        let gesture = GestureConfig::default();
        let mut session = machine(&[true, true]);
        let mut pacer = RevealPacer::new(ms(200));
        let t0 = Instant::now();

        dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Key(KeyPress::Right), t0);
        let swipe = ShellEvent::Drag(DragRelease::new(200.0, 0.0, 0.0, 0.0));
        assert_eq!(
            dispatch(&mut session, &mut pacer, &gesture, swipe, t0 + ms(10)),
            Flow::Continue
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_decision_keys_on_painted_overlay_are_ignored() {
        let gesture = GestureConfig::default();
        let mut session = machine(&[true, true]);
        let mut pacer = RevealPacer::new(ms(200));
        let t0 = Instant::now();

        dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Key(KeyPress::Right), t0);
        assert!(pacer.tick(t0 + ms(200), session.epoch()));

        for key in [KeyPress::Right, KeyPress::Left] {
            assert_eq!(
                dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Key(key), t0 + ms(250)),
                Flow::Continue
            );
        }
        assert_eq!(session.phase(), Phase::Verdict);
        assert_eq!(session.score(), 1);
        assert_eq!(session.position(), 0);
        assert!(pacer.is_revealed(session.epoch()));
    }

    #[test]
    fn test_drag_swipe_and_snap_back() {
        let gesture = GestureConfig::default();
        let mut session = machine(&[false]);
        let mut pacer = RevealPacer::new(ms(200));
        let t0 = Instant::now();

        let weak = ShellEvent::Drag(DragRelease::new(-40.0, 0.0, 0.0, 0.0));
        assert_eq!(dispatch(&mut session, &mut pacer, &gesture, weak, t0), Flow::Redraw);
        assert_eq!(session.phase(), Phase::Active);

        let down = ShellEvent::Drag(DragRelease::new(0.0, 200.0, 0.0, 0.0));
        assert_eq!(dispatch(&mut session, &mut pacer, &gesture, down, t0), Flow::Redraw);
        assert_eq!(session.score(), 1);

        // Vertical drag on the painted overlay dismisses it
        pacer.tick(t0 + ms(200), session.epoch());
        let dismiss = ShellEvent::Drag(DragRelease::new(0.0, -80.0, 0.0, 0.0));
        assert_eq!(dispatch(&mut session, &mut pacer, &gesture, dismiss, t0 + ms(300)), Flow::Redraw);
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn test_restart_from_summary() {
        let gesture = GestureConfig::default();
        let mut session = machine(&[true]);
        let mut pacer = RevealPacer::new(Duration::ZERO);
        let t0 = Instant::now();

        dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Key(KeyPress::Right), t0);
        dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Key(KeyPress::Space), t0);
        assert_eq!(session.phase(), Phase::Complete);

        // Decisions on the summary screen do nothing
        assert_eq!(
            dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Key(KeyPress::Left), t0),
            Flow::Continue
        );

        assert_eq!(
            dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Key(KeyPress::Char('r')), t0),
            Flow::Redraw
        );
        assert_eq!((session.position(), session.score()), (0, 0));
        assert!(!session.store().contains(PROGRESS_KEY));
    }

    #[test]
    fn test_quit_and_resize() {
        let gesture = GestureConfig::default();
        let mut session = machine(&[true]);
        let mut pacer = RevealPacer::new(ms(200));
        let now = Instant::now();

        assert_eq!(dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Quit, now), Flow::Quit);
        assert_eq!(dispatch(&mut session, &mut pacer, &gesture, ShellEvent::Resize, now), Flow::Redraw);
    }
}
