use super::{ReportableMetric, ReportableSection, SectionColor, common};
use crate::Result;
use crate::domain::Status;
use core::fmt::Write;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

/// Which parts of each metric to show in console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleOutputMode {
    pub norms: bool,
    pub comments: bool,
    pub links: bool,
}

impl ConsoleOutputMode {
    #[must_use]
    pub const fn full() -> Self {
        Self {
            norms: true,
            comments: true,
            links: true,
        }
    }
}

pub fn generate<W: Write>(
    title: &str,
    sections: &[ReportableSection],
    use_colors: bool,
    mode: &ConsoleOutputMode,
    writer: &mut W,
) -> Result<()> {
    if use_colors {
        writeln!(writer, "{}", title.bold())?;
    } else {
        writeln!(writer, "{title}")?;
    }

    let term_width = get_terminal_width();

    for section in sections {
        writeln!(writer)?;

        let header = if section.subtitle.is_empty() {
            format!("{} {}", section.id_prefix, section.title)
        } else {
            format!("{} {} ({})", section.id_prefix, section.title, section.subtitle)
        };

        if use_colors {
            writeln!(writer, "{}", color_section(&header, section.color))?;
        } else {
            writeln!(writer, "{header} [{}]", section.color)?;
        }

        // Align reports after the longest "id status" prefix of the section
        let prefix_width = section
            .metrics
            .iter()
            .map(|metric| metric.id.len() + 1 + common::format_status(metric.status).len())
            .max()
            .unwrap_or(0);

        // Indent for metric lines: "  " (2) + prefix + " : " (3)
        let value_indent = 2 + prefix_width + 3;

        for metric in &section.metrics {
            let status = common::format_status(metric.status);
            let padding = prefix_width - metric.id.len() - 1 - status.len();
            let status = if use_colors { color_status(status, metric.status) } else { status.to_string() };

            let wrapped_lines = wrap_text(&metric.report, term_width, value_indent);
            if let Some(first_line) = wrapped_lines.first() {
                writeln!(writer, "  {} {status}{:padding$} : {first_line}", metric.id, "")?;
                for line in wrapped_lines.iter().skip(1) {
                    writeln!(writer, "{line}")?;
                }
            }

            for (label, text) in details(metric, mode) {
                for (index, line) in wrap_text(&format!("{label}: {text}"), term_width, value_indent).iter().enumerate() {
                    if index == 0 {
                        writeln!(writer, "{:value_indent$}{line}", "")?;
                    } else {
                        writeln!(writer, "{line}")?;
                    }
                }
            }
        }
    }

    Ok(())
}

fn details(metric: &ReportableMetric, mode: &ConsoleOutputMode) -> Vec<(&'static str, String)> {
    let mut details = Vec::new();

    if mode.norms && !metric.norm.is_empty() {
        details.push(("Norm", metric.norm.clone()));
    }

    if mode.comments && !metric.comment.is_empty() {
        details.push(("Comment", metric.comment.clone()));
    }

    if mode.links && !metric.urls.is_empty() {
        details.push(("Links", common::format_urls(&metric.urls)));
    }

    details
}

fn color_section(header: &str, color: SectionColor) -> String {
    match color {
        SectionColor::Red => header.red().bold().to_string(),
        SectionColor::Yellow => header.yellow().bold().to_string(),
        SectionColor::Grey => header.bright_black().bold().to_string(),
        SectionColor::Green => header.green().bold().to_string(),
        SectionColor::White => header.bold().to_string(),
    }
}

fn color_status(label: &str, status: Status) -> String {
    match status {
        Status::MissingSource | Status::Missing | Status::Red => label.red().to_string(),
        Status::Yellow => label.yellow().to_string(),
        Status::Grey => label.bright_black().to_string(),
        Status::Green | Status::Perfect => label.green().to_string(),
    }
}

/// Get the terminal width, defaulting to 100 if not detectable
fn get_terminal_width() -> usize {
    terminal_size().map_or(100, |(Width(w), _)| w as usize)
}

/// Word-wrap text to fit within a given width, with indentation for continuation lines
fn wrap_text(text: &str, width: usize, indent: usize) -> Vec<String> {
    if width <= indent {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut is_first_line = true;

    for word in text.split_whitespace() {
        let separator_len = usize::from(!current_line.is_empty());
        let line_width = if is_first_line {
            current_line.len()
        } else {
            indent + current_line.len()
        };

        if !current_line.is_empty() && line_width + separator_len + word.len() > width {
            if is_first_line {
                lines.push(current_line);
                is_first_line = false;
            } else {
                lines.push(format!("{:indent$}{current_line}", ""));
            }
            current_line = word.to_string();
        } else {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        if is_first_line {
            lines.push(current_line);
        } else {
            lines.push(format!("{:indent$}{current_line}", ""));
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
