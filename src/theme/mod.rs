//! Report colours

mod tokyo_night;

pub use tokyo_night::TOKYO_NIGHT;

use crossterm::style::Color;

/// Colours used by the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,

    // Lesson status
    pub mastered: Color,
    pub below_threshold: Color,
    pub insufficient: Color,

    // Chrome
    pub heading: Color,
    pub muted: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        TOKYO_NIGHT
    }
}
