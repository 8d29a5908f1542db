//! Text report
//!
//! Lessons are listed in curriculum order: chapters as the curriculum
//! lists them, lessons as the platform lists them within a chapter.
//! Lessons without an entry were never attempted and are skipped.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};

use crate::api::ApiError;
use crate::curriculum::{ChapterId, CurriculumIndex};
use crate::mastery::{MasteryRun, ReportEntry, chapter_ratio};
use crate::theme::Theme;

/// Shown instead of a timestamp for lessons never completed
const NO_TIMESTAMP: &str = "................";

/// Rendering switches
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Print mastered lessons too
    pub include_mastered: bool,
    /// Emit ANSI colours
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { include_mastered: false, color: true }
    }
}

/// Format one entry as a report line
pub fn format_entry(entry: &ReportEntry) -> String {
    let last = entry.last_finished.as_deref().unwrap_or(NO_TIMESTAMP);

    let attempts = if entry.enough_attempts {
        format!("avg on the last {} attempts", entry.scored)
    } else {
        format!("only worked on {} attempts", entry.completed)
    };

    let fastest = match entry.fastest_minutes {
        Some(minutes) => format!("fastest time: {} mins", minutes),
        None => "fastest time: none".to_string(),
    };

    format!(
        "{} {:.<25} {:.<25}  {:<27} {:<25} percent correct: {:.1}",
        last,
        entry.chapter_name,
        entry.lesson_name,
        attempts,
        fastest,
        entry.score * 100.0
    )
}

fn entry_color(entry: &ReportEntry, theme: &Theme) -> Color {
    if entry.mastered {
        theme.mastered
    } else if entry.enough_attempts {
        theme.below_threshold
    } else {
        theme.insufficient
    }
}

/// Chapters of the run in curriculum order; unknown ones go last
fn ordered_chapters(curriculum: &CurriculumIndex, run: &MasteryRun) -> Vec<ChapterId> {
    let mut ordered: Vec<ChapterId> =
        curriculum.chapter_ids().filter(|id| run.chapters.contains(id)).collect();
    ordered.extend(run.chapters.iter().copied().filter(|id| !curriculum.contains(*id)));
    ordered
}

/// Write the lesson lines; returns how many were written
pub fn render<W: Write>(
    out: &mut W,
    curriculum: &CurriculumIndex,
    run: &MasteryRun,
    options: RenderOptions,
    theme: &Theme,
) -> io::Result<usize> {
    let mut written = 0;

    for chapter in ordered_chapters(curriculum, run) {
        for lesson_id in run.catalog.chapter_lessons(chapter) {
            let Some(entry) = run.summary.entries.get(lesson_id) else {
                continue;
            };
            if entry.mastered && !options.include_mastered {
                continue;
            }

            write_line(out, &format_entry(entry), entry_color(entry, theme), options)?;
            written += 1;
        }
    }

    Ok(written)
}

/// Write the closing totals
///
/// With `chapter` set, also reports that chapter's mastered share.
pub fn render_summary<W: Write>(
    out: &mut W,
    curriculum: &CurriculumIndex,
    run: &MasteryRun,
    chapter: Option<ChapterId>,
    options: RenderOptions,
    theme: &Theme,
) -> io::Result<()> {
    let summary = &run.summary;
    let mut lines = vec![(
        format!("mastered {} of {} lessons", summary.mastered_count, summary.entries.len()),
        theme.heading,
    )];

    if !summary.skipped.is_empty() {
        lines.push((format!("{} lessons skipped (see log)", summary.skipped.len()), theme.muted));
    }

    if let Some(chapter) = chapter {
        let name = curriculum.chapter_name(chapter).unwrap_or("chapter");
        let mastered = summary.mastered_in(chapter);
        let lessons = run.catalog.lesson_count(chapter).saturating_sub(1);
        let line = match chapter_ratio(mastered, run.catalog.lesson_count(chapter)) {
            Some(ratio) => format!(
                "{} ({}): {} of {} lessons mastered, {:.1}%",
                name,
                chapter,
                mastered,
                lessons,
                ratio * 100.0
            ),
            None => format!("{} ({}): no lessons listed", name, chapter),
        };
        lines.push((line, theme.heading));
    }

    for (line, color) in lines {
        write_line(out, &line, color, options)?;
    }
    Ok(())
}

/// Write an API failure, with a login hint when the session is the problem
pub fn render_error<W: Write>(
    out: &mut W,
    err: &ApiError,
    options: RenderOptions,
    theme: &Theme,
) -> io::Result<()> {
    write_line(out, &err.to_string(), theme.error, options)?;
    if err.requires_login() {
        write_line(
            out,
            "Session rejected. Run `mastery-report login <cookie>` with a fresh cookie",
            theme.muted,
            options,
        )?;
    }
    Ok(())
}

fn write_line<W: Write>(
    out: &mut W,
    line: &str,
    color: Color,
    options: RenderOptions,
) -> io::Result<()> {
    if options.color {
        writeln!(out, "{}", line.with(color))
    } else {
        writeln!(out, "{}", line)
    }
}
