use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::NaiveDate;

use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::grid::Tile;
use crate::plan::{Project, Task};
use crate::status::{Category, DayStatus};

/// Tiles per grid row.
pub const GRID_COLS: usize = 6;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, tiles))]
    pub fn print_grid(&mut self, tiles: &[Tile]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        for row in tiles.chunks(GRID_COLS) {
            let cells: Vec<String> = row.iter().map(|tile| self.tile_cell(tile)).collect();
            writeln!(out, "{}", cells.join("  "))?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn print_day(&mut self, date: NaiveDate, tasks: &[Task]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "Plan for {}", date.format("%A, %B %d"))?;

        if tasks.is_empty() {
            writeln!(out, "  no tasks planned for this day yet")?;
            return Ok(());
        }

        for (idx, task) in tasks.iter().enumerate() {
            let mark = if task.done { "[x]" } else { "[ ]" };
            let name = if task.done {
                // completed tasks get the strike-through treatment
                self.paint(&task.name, "9;96")
            } else {
                task.name.clone()
            };
            writeln!(out, "  {:>2} {mark} {name}", idx + 1)?;
        }

        let status = DayStatus::of(tasks);
        writeln!(out, "  {}/{} done", status.done, status.total)?;

        Ok(())
    }

    #[tracing::instrument(skip(self, projects))]
    pub fn print_projects(&mut self, projects: &[Project]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if projects.is_empty() {
            writeln!(out, "no projects yet")?;
            return Ok(());
        }

        let headers = vec![
            "#".to_string(),
            "Project".to_string(),
            "Format".to_string(),
            "Status".to_string(),
        ];

        let rows: Vec<Vec<String>> = projects
            .iter()
            .enumerate()
            .map(|(idx, project)| {
                let status = match project.status {
                    crate::plan::ProjectStatus::Active => {
                        self.paint(&project.status.to_string(), "32")
                    }
                    crate::plan::ProjectStatus::Parked => project.status.to_string(),
                };
                vec![
                    (idx + 1).to_string(),
                    project.name.clone(),
                    project.format.clone().unwrap_or_default(),
                    status,
                ]
            })
            .collect();

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    fn tile_cell(&self, tile: &Tile) -> String {
        let progress = match tile.status.total {
            0 => "--".to_string(),
            total => format!("{}/{}", tile.status.done, total),
        };
        let text = format!(
            "{} {:>2} {} {:>5}",
            tile.weekday, tile.day, tile.month, progress
        );
        self.paint(&text, category_sgr(tile.status.category))
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

/// Terminal take on the five-stage palette: red for untouched days through
/// bright bold cyan for the fully done "glow" tile; unplanned days stay dim.
fn category_sgr(category: Category) -> &'static str {
    match category {
        Category::Empty => "90",
        Category::NoneDone => "31",
        Category::Low => "33",
        Category::Mid => "93",
        Category::High => "36",
        Category::Complete => "96;1",
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_distinct_color() {
        let all = [
            Category::Empty,
            Category::NoneDone,
            Category::Low,
            Category::Mid,
            Category::High,
            Category::Complete,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(category_sgr(*a), category_sgr(*b));
            }
        }
    }

    #[test]
    fn strip_ansi_removes_sgr_sequences() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn table_pads_to_the_widest_cell() {
        let mut buf = Vec::new();
        write_table(
            &mut buf,
            vec!["#".to_string(), "Project".to_string()],
            vec![vec!["1".to_string(), "Skit pilot".to_string()]],
        )
        .expect("table");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("# Project"));
        assert!(text.contains("1 Skit pilot"));
    }
}
