//! Swipe and key classification
//!
//! Maps one completed drag, or one discrete key press, to a `Decision`.
//! Thresholds apply symmetrically on both axes and both signs.

use crate::catalog::Decision;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default minimum travel (px) for a drag to count as a swipe
pub const DEFAULT_OFFSET_THRESHOLD: f32 = 120.0;
/// Default minimum release speed (px/s) for a flick to count as a swipe
pub const DEFAULT_VELOCITY_THRESHOLD: f32 = 800.0;
/// Default vertical travel (px) that dismisses the verdict overlay
pub const DEFAULT_DISMISS_THRESHOLD: f32 = 60.0;
/// Default trailing window for release velocity
pub const DEFAULT_VELOCITY_WINDOW_MS: u64 = 100;

/// Gesture axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Tunable swipe thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum |offset| in px
    pub offset_threshold: f32,
    /// Minimum |velocity| in px/s
    pub velocity_threshold: f32,
    /// Axis that wins when |offset_x| == |offset_y|
    pub tie_break: Axis,
    /// Whether up/down swipes alias to forward/backward
    pub vertical_swipes: bool,
    /// Vertical travel in px that dismisses the verdict overlay
    pub dismiss_threshold: f32,
    /// Trailing window used to measure release velocity
    pub velocity_window_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            offset_threshold: DEFAULT_OFFSET_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            tie_break: Axis::Horizontal,
            vertical_swipes: true,
            dismiss_threshold: DEFAULT_DISMISS_THRESHOLD,
            velocity_window_ms: DEFAULT_VELOCITY_WINDOW_MS,
        }
    }
}

impl GestureConfig {
    pub fn velocity_window(&self) -> Duration {
        Duration::from_millis(self.velocity_window_ms)
    }
}

/// A completed drag: displacement from the press point and release velocity
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragRelease {
    pub offset_x: f32,
    pub offset_y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
}

impl DragRelease {
    pub fn new(offset_x: f32, offset_y: f32, velocity_x: f32, velocity_y: f32) -> Self {
        DragRelease {
            offset_x,
            offset_y,
            velocity_x,
            velocity_y,
        }
    }

    /// Axis with the larger absolute offset, `tie_break` on equality
    pub fn dominant_axis(&self, tie_break: Axis) -> Axis {
        let ax = self.offset_x.abs();
        let ay = self.offset_y.abs();

        if ax > ay {
            Axis::Horizontal
        } else if ay > ax {
            Axis::Vertical
        } else {
            tie_break
        }
    }
}

/// Device-independent key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPress {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Space,
    Char(char),
    Other,
}

/// Classify a released drag, or `None` when the card should snap back
pub fn classify_drag(release: &DragRelease, config: &GestureConfig) -> Option<Decision> {
    let offset_limit = config.offset_threshold;
    let velocity_limit = config.velocity_threshold;

    // Positive direction maps to forward on the horizontal axis, negative on the vertical one
    let (offset, velocity, positive_is_forward) = match release.dominant_axis(config.tie_break) {
        Axis::Horizontal => (release.offset_x, release.velocity_x, true),
        Axis::Vertical => {
            if !config.vertical_swipes {
                return None;
            }
            (release.offset_y, release.velocity_y, false)
        }
    };

    let positive = offset > offset_limit || velocity > velocity_limit;
    let negative = offset < -offset_limit || velocity < -velocity_limit;

    let forward = if positive {
        positive_is_forward
    } else if negative {
        !positive_is_forward
    } else {
        return None;
    };

    Some(if forward {
        Decision::Forward
    } else {
        Decision::Backward
    })
}

/// Classify a key press; ignored while the verdict overlay is up
pub fn classify_key(key: KeyPress, verdict_visible: bool) -> Option<Decision> {
    if verdict_visible {
        return None;
    }

    match key {
        KeyPress::Right => Some(Decision::Forward),
        KeyPress::Left => Some(Decision::Backward),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_threshold(offset: f32) -> GestureConfig {
        GestureConfig {
            offset_threshold: offset,
            ..GestureConfig::default()
        }
    }

    #[test]
    fn test_horizontal_swipes() {
        let config = GestureConfig::default();
        assert_eq!(
            classify_drag(&DragRelease::new(150.0, 0.0, 0.0, 0.0), &config),
            Some(Decision::Forward)
        );
        assert_eq!(
            classify_drag(&DragRelease::new(-150.0, 0.0, 0.0, 0.0), &config),
            Some(Decision::Backward)
        );
    }

    #[test]
    fn test_below_threshold_snaps_back() {
        let config = GestureConfig::default();
        assert_eq!(
            classify_drag(&DragRelease::new(50.0, 0.0, 0.0, 0.0), &config),
            None
        );
    }

    #[test]
    fn test_upward_aliases_forward() {
        let config = GestureConfig::default();
        assert_eq!(
            classify_drag(&DragRelease::new(0.0, -150.0, 0.0, 0.0), &config),
            Some(Decision::Forward)
        );
        assert_eq!(
            classify_drag(&DragRelease::new(0.0, 150.0, 0.0, 0.0), &config),
            Some(Decision::Backward)
        );
    }

    #[test]
    fn test_neither_axis_past_threshold() {
        let config = with_threshold(100.0);
        assert_eq!(
            classify_drag(&DragRelease::new(60.0, 50.0, 0.0, 0.0), &config),
            None
        );
    }

    #[test]
    fn test_velocity_flick() {
        let config = GestureConfig::default();
        assert_eq!(
            classify_drag(&DragRelease::new(20.0, 0.0, 900.0, 0.0), &config),
            Some(Decision::Forward)
        );
        assert_eq!(
            classify_drag(&DragRelease::new(-20.0, 0.0, -900.0, 0.0), &config),
            Some(Decision::Backward)
        );
        assert_eq!(
            classify_drag(&DragRelease::new(0.0, -10.0, 0.0, -900.0), &config),
            Some(Decision::Forward)
        );
        assert_eq!(
            classify_drag(&DragRelease::new(0.0, 10.0, 0.0, 900.0), &config),
            Some(Decision::Backward)
        );
        // Exactly at the limit is not past it
        assert_eq!(
            classify_drag(&DragRelease::new(10.0, 0.0, 800.0, 0.0), &config),
            None
        );
    }

    #[test]
    fn test_velocity_on_minor_axis_ignored() {
        let config = GestureConfig::default();
        // Horizontal dominant, but only the vertical component is fast
        assert_eq!(
            classify_drag(&DragRelease::new(30.0, 10.0, 0.0, -2000.0), &config),
            None
        );
    }

    #[test]
    fn test_tie_break() {
        let release = DragRelease::new(-150.0, -150.0, 0.0, 0.0);

        let horizontal = GestureConfig::default();
        assert_eq!(classify_drag(&release, &horizontal), Some(Decision::Backward));

        let vertical = GestureConfig {
            tie_break: Axis::Vertical,
            ..GestureConfig::default()
        };
        assert_eq!(classify_drag(&release, &vertical), Some(Decision::Forward));
    }

    #[test]
    fn test_vertical_swipes_disabled() {
        let config = GestureConfig {
            vertical_swipes: false,
            ..GestureConfig::default()
        };
        assert_eq!(
            classify_drag(&DragRelease::new(0.0, -150.0, 0.0, 0.0), &config),
            None
        );
        assert_eq!(
            classify_drag(&DragRelease::new(150.0, 0.0, 0.0, 0.0), &config),
            Some(Decision::Forward)
        );
    }

    #[test]
    fn test_keys() {
        assert_eq!(classify_key(KeyPress::Right, false), Some(Decision::Forward));
        assert_eq!(classify_key(KeyPress::Left, false), Some(Decision::Backward));
        assert_eq!(classify_key(KeyPress::Up, false), None);
        assert_eq!(classify_key(KeyPress::Char('x'), false), None);
    }

    #[test]
    fn test_keys_ignored_while_verdict_visible() {
        assert_eq!(classify_key(KeyPress::Right, true), None);
        assert_eq!(classify_key(KeyPress::Left, true), None);
    }
}
