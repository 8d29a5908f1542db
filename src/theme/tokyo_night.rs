//! Tokyo Night palette

use crossterm::style::Color;

use super::Theme;

/// Tokyo Night colours
pub const TOKYO_NIGHT: Theme = Theme {
    name: "Tokyo Night",

    mastered: Color::Rgb { r: 158, g: 206, b: 106 },        // #9ece6a
    below_threshold: Color::Rgb { r: 247, g: 118, b: 142 }, // #f7768e
    insufficient: Color::Rgb { r: 224, g: 175, b: 104 },    // #e0af68

    heading: Color::Rgb { r: 122, g: 162, b: 247 }, // #7aa2f7
    muted: Color::Rgb { r: 86, g: 95, b: 137 },     // #565f89
    error: Color::Rgb { r: 247, g: 118, b: 142 },   // #f7768e
};
