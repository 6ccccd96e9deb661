use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::model::{Day, Lesson};
use crate::view::LoadedSchedule;

const NO_CLASSES_BANNER: &str = "No classes today. Next day with classes:";

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

    /// The windowed slice of the loaded schedule, one section per day,
    /// with the anchor day emphasized and the rest-day banner inserted
    /// where the policy says so.
    #[tracing::instrument(skip(self, state))]
    pub fn print_schedule(&mut self, state: &LoadedSchedule) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if state.days.is_empty() {
            writeln!(out, "No days in the current semester.")?;
            return Ok(());
        }

        if state.from_cache {
            writeln!(out, "{}", self.paint("(served from cache)", "2"))?;
        }

        if state.earlier_hidden() > 0 {
            writeln!(
                out,
                "{}",
                self.paint(
                    &format!("... {} earlier days hidden (show earlier)", state.earlier_hidden()),
                    "2"
                )
            )?;
        }

        for day in state.visible_days() {
            let key = day.date_key();

            if state.banner_before(key) {
                writeln!(out)?;
                writeln!(out, "{}", self.paint(NO_CLASSES_BANNER, "36"))?;
            }

            writeln!(out)?;
            self.write_day_section(&mut out, state, day)?;
        }

        if state.later_hidden() > 0 {
            writeln!(out)?;
            writeln!(
                out,
                "{}",
                self.paint(
                    &format!("... {} later days hidden (show later)", state.later_hidden()),
                    "2"
                )
            )?;
        }

        Ok(())
    }

    /// One line per day of the whole filtered semester.
    #[tracing::instrument(skip(self, state))]
    pub fn print_day_list(&mut self, state: &LoadedSchedule) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if state.days.is_empty() {
            writeln!(out, "No days in the current semester.")?;
            return Ok(());
        }

        let headers = vec![
            "Date".to_string(),
            "Week".to_string(),
            "Lessons".to_string(),
        ];

        let mut rows = Vec::with_capacity(state.days.len());
        for day in &state.days.days {
            let key = day.date_key();
            let label = state
                .days
                .label_for(key)
                .unwrap_or(key)
                .to_string();
            let label = if state.is_highlighted(key) {
                self.paint(&label, "1;34")
            } else {
                label
            };
            let week = day
                .info
                .week_number
                .map(|value| value.to_string())
                .unwrap_or_else(|| "-".to_string());

            rows.push(vec![label, week, day.lessons.len().to_string()]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    /// Detail card for a single day, used by `next`.
    #[tracing::instrument(skip(self, day, label))]
    pub fn print_day_info(&mut self, day: &Day, label: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "date    {}", day.info.date)?;
        writeln!(out, "label   {label}")?;
        writeln!(
            out,
            "week    {}",
            day.info
                .week_number
                .map(|value| value.to_string())
                .unwrap_or_else(|| "-".to_string())
        )?;
        writeln!(out, "lessons {}", day.lessons.len())?;

        if !day.lessons.is_empty() {
            writeln!(out)?;
            write_table(&mut out, lesson_headers(), lesson_rows(&day.lessons))?;
        }

        Ok(())
    }

    fn write_day_section<W: Write>(
        &self,
        writer: &mut W,
        state: &LoadedSchedule,
        day: &Day,
    ) -> anyhow::Result<()> {
        let key = day.date_key();
        let label = state.days.label_for(key).unwrap_or(key);

        let header = if state.is_highlighted(key) {
            self.paint(label, "1;34")
        } else {
            label.to_string()
        };
        writeln!(writer, "{header}")?;

        if day.lessons.is_empty() {
            writeln!(writer, "  (no lessons)")?;
            return Ok(());
        }

        write_table(writer, lesson_headers(), lesson_rows(&day.lessons))?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn lesson_headers() -> Vec<String> {
    vec![
        "#".to_string(),
        "Time".to_string(),
        "Lesson".to_string(),
        "Room".to_string(),
        "Teacher".to_string(),
    ]
}

fn lesson_rows(lessons: &[Lesson]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(lessons.len());

    for lesson in lessons {
        let number = lesson
            .number
            .map(|value| value.to_string())
            .unwrap_or_else(|| "-".to_string());

        let name = if lesson.is_lecture_lesson() {
            format!("{} (lecture)", lesson.lesson_name)
        } else {
            lesson.lesson_name.clone()
        };

        rows.push(vec![
            number,
            lesson.display_time().to_string(),
            name,
            lesson.display_auditory().to_string(),
            lesson.display_teacher().to_string(),
        ]);
    }

    rows
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
    use super::{lesson_rows, strip_ansi, write_table};
    use crate::model::Lesson;

    #[test]
    fn strips_ansi_sequences() {
        assert_eq!(strip_ansi("\x1b[1;34mMonday\x1b[0m"), "Monday");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn lesson_rows_use_display_fallbacks() {
        let lesson: Lesson = serde_json::from_str(
            r#"{ "lessonName": "Calculus", "isLecture": true, "isDistant": true }"#,
        )
        .expect("decode lesson");

        let rows = lesson_rows(&[lesson]);
        assert_eq!(
            rows,
            vec![vec![
                "-".to_string(),
                "-".to_string(),
                "Calculus (lecture)".to_string(),
                "Remote".to_string(),
                "No teacher listed".to_string(),
            ]]
        );
    }

    #[test]
    fn table_aligns_columns() {
        let mut buf: Vec<u8> = Vec::new();
        write_table(
            &mut buf,
            vec!["A".to_string(), "Long".to_string()],
            vec![vec!["wide cell".to_string(), "x".to_string()]],
        )
        .expect("write table");

        let text = String::from_utf8(buf).expect("utf8 table");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "A         Long ");
        assert_eq!(lines[2], "wide cell x    ");
    }
}
