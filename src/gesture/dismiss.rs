//! Verdict overlay dismissal
//!
//! The overlay closes on Enter/Space, on a plain click, or on a vertical
//! drag longer than the dismiss threshold.

use super::classifier::{DragRelease, GestureConfig, KeyPress};

/// Travel below this (px on both axes) counts as a click
const CLICK_TOLERANCE: f32 = 1.0;

/// Whether a key press dismisses the verdict
pub fn dismisses_on_key(key: KeyPress) -> bool {
    matches!(key, KeyPress::Enter | KeyPress::Space)
}

/// Whether a pointer press/release on the overlay dismisses it
pub fn dismisses_on_release(release: &DragRelease, config: &GestureConfig) -> bool {
    let is_click =
        release.offset_x.abs() < CLICK_TOLERANCE && release.offset_y.abs() < CLICK_TOLERANCE;

    is_click || release.offset_y.abs() > config.dismiss_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_keys() {
        assert!(dismisses_on_key(KeyPress::Enter));
        assert!(dismisses_on_key(KeyPress::Space));
        assert!(!dismisses_on_key(KeyPress::Right));
        assert!(!dismisses_on_key(KeyPress::Char('n')));
    }

    #[test]
    fn test_click_dismisses() {
        let config = GestureConfig::default();
        assert!(dismisses_on_release(&DragRelease::default(), &config));
    }

    #[test]
    fn test_vertical_drag_dismisses_both_directions() {
        let config = GestureConfig::default();
        assert!(dismisses_on_release(
            &DragRelease::new(0.0, 64.0, 0.0, 0.0),
            &config
        ));
        assert!(dismisses_on_release(
            &DragRelease::new(8.0, -80.0, 0.0, 0.0),
            &config
        ));
    }

    #[test]
    fn test_short_or_sideways_drag_keeps_overlay() {
        let config = GestureConfig::default();
        assert!(!dismisses_on_release(
            &DragRelease::new(0.0, 32.0, 0.0, 0.0),
            &config
        ));
        assert!(!dismisses_on_release(
            &DragRelease::new(200.0, 16.0, 0.0, 0.0),
            &config
        ));
    }
}
