// Numeric Counter Utility
//
// Pure display parser, a generic tween, and the once-only count-up animation
// used by stat displays and projection figures.

pub mod animation;
pub mod parse;
pub mod tween;

pub use animation::CounterAnimation;
pub use parse::{CounterParseError, CounterValue};
pub use tween::{ease_out_cubic, Tween};
