//! Gesture Classifier: raw pointer/key input to decisions
//!
//! # Components
//! - `classifier.rs`: drag and key classification, thresholds
//! - `dismiss.rs`: verdict overlay dismissal gate
//! - `tracker.rs`: press/motion/release samples to offsets and velocities

pub mod classifier;
pub mod dismiss;
pub mod tracker;

pub use classifier::{classify_drag, classify_key, Axis, DragRelease, GestureConfig, KeyPress};
pub use dismiss::{dismisses_on_key, dismisses_on_release};
pub use tracker::DragTracker;
