// src/renderer.rs

use crate::heat::{build_levels, to_hex, Color, Palette};
use crate::model::{Commit, HistoryModel, LineRecord};
use crate::timeline;
use chrono::TimeZone;
use serde::Serialize;
use std::io::{self, Write};

/// Options for painting a model onto a 24-bit color terminal
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub show_authors: bool,
    pub tab_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_authors: true,
            tab_width: 4,
        }
    }
}

fn fg(color: Color) -> String {
    format!("\x1b[38;2;{};{};{}m", color.red, color.green, color.blue)
}

fn bg(color: Color) -> String {
    format!("\x1b[48;2;{};{};{}m", color.red, color.green, color.blue)
}

const RESET: &str = "\x1b[0m";

/// `YYYY-MM-DD HH:MM` in UTC, empty for unknown timestamps
pub fn format_timestamp(timestamp: i64) -> String {
    if timestamp == 0 {
        return String::new();
    }
    chrono::Utc
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Writes every line of `model`, colored by its heat level.
pub fn render_lines<W: Write>(
    out: &mut W,
    model: &HistoryModel,
    palette: &Palette,
    options: &RenderOptions,
) -> io::Result<()> {
    let heat = build_levels(model.timestamps());
    let author_width = model.lines.iter().map(|line| line.author.chars().count()).max().unwrap_or(0);
    let number_width = model.lines.len().to_string().len();
    let tab = " ".repeat(options.tab_width);

    for (line_number, line) in model.lines.iter().enumerate() {
        let (fg_color, bg_color) = palette.pair(heat.level(line.timestamp));
        let source = line.source.replace('\t', &tab);

        write!(out, "{}{}", fg(fg_color), bg(bg_color))?;
        if options.show_authors {
            write!(out, "{:<author_width$} ", line.author)?;
        }
        writeln!(out, "{:>number_width$} {}{}", line_number + 1, source, RESET)?;
    }
    Ok(())
}

/// Lists the changes of `base`, marking the one at `current`.
pub fn render_commits<W: Write>(out: &mut W, base: &HistoryModel, current: usize) -> io::Result<()> {
    let markers = timeline::markers(&base.changes);
    for (index, (commit, percent)) in base.changes.iter().zip(markers).enumerate() {
        let marker = if index == current { '>' } else { ' ' };
        writeln!(out, "{} {}", marker, describe_commit(index, commit, percent))?;
    }
    Ok(())
}

fn describe_commit(index: usize, commit: &Commit, percent: f64) -> String {
    format!(
        "{:>3} {:<16} {:>5.1}% {} {} {} ({})",
        index,
        format_timestamp(commit.timestamp),
        percent,
        commit.short_id(),
        commit.author,
        commit.summary,
        commit.path
    )
}

/// A one-line summary of where on the timeline the session is
pub fn render_position<W: Write>(out: &mut W, base: &HistoryModel, index: usize) -> io::Result<()> {
    let Some(commit) = base.commit_at(index) else {
        return writeln!(out, "no history");
    };
    let percent = timeline::percentage(&base.changes, index).unwrap_or(100.0);
    writeln!(
        out,
        "[{}/{}] {:.1}% {} {} {}",
        index + 1,
        base.changes.len(),
        percent,
        commit.short_id(),
        format_timestamp(commit.timestamp),
        commit.summary
    )
}

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(flatten)]
    line: &'a LineRecord,
    level: u8,
    fg: String,
    bg: String,
}

#[derive(Serialize)]
struct JsonView<'a> {
    filename: &'a std::path::Path,
    index: usize,
    percentage: Option<f64>,
    markers: Vec<f64>,
    lines: Vec<JsonLine<'a>>,
    changes: &'a [Commit],
}

/// Writes `model` as JSON together with each line's heat level and colors,
/// positioned at `index` on the timeline of `base`.
pub fn render_json<W: Write>(
    out: &mut W,
    base: &HistoryModel,
    model: &HistoryModel,
    index: usize,
    palette: &Palette,
) -> io::Result<()> {
    let heat = build_levels(model.timestamps());
    let lines = model
        .lines
        .iter()
        .map(|line| {
            let level = heat.level(line.timestamp);
            JsonLine {
                line,
                level,
                fg: to_hex(palette.fg(level)),
                bg: to_hex(palette.bg(level)),
            }
        })
        .collect();

    let view = JsonView {
        filename: &model.filename,
        index,
        percentage: timeline::percentage(&base.changes, index),
        markers: timeline::markers(&base.changes),
        lines,
        changes: &model.changes,
    };
    serde_json::to_writer_pretty(&mut *out, &view)?;
    writeln!(out)
}
