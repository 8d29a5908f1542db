//! mastery-report - lesson mastery from the platform's reporting API
//!
//! Walks the curriculum up to the first chapter the student has not
//! started, scores every lesson from its most recent completed attempts and
//! reports the lessons that still fall short of mastery.

pub mod api;
pub mod config;
pub mod curriculum;
pub mod mastery;
pub mod report;
pub mod theme;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use curriculum::CurriculumIndex;
pub use mastery::{MasteryPolicy, MasteryRun};
pub use theme::Theme;
