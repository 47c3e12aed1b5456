/// Console formatting module - Pure rendering concerns
///
/// This module handles all console output formatting including:
/// - The summary table layout and borders
/// - Trend-colored count cells
/// - Drill-down lists and the file-detail panel
/// - Text truncation and padding
///
/// It accepts pre-built data from the report and drilldown modules and
/// renders it to any `std::io::Write` destination via `TableWriter`, with
/// colors for the console and plain text for Markdown code blocks.
use crate::drilldown::{DatasetEntry, FileDetail, FileListing, FileRow, FileStatus, MetricRow, highlight};
use crate::report::{CountCell, SummaryHeader, SummaryRow, trend_color};
use crate::types::Trend;
use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Writer for table output - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Write formatted text, optionally with color
    fn write_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.use_colors {
            write!(self.writer, "\x1b[{}m{}\x1b[0m", ansi_code(color), text)
        } else {
            write!(self.writer, "{}", text)
        }
    }

    fn writeln(&mut self) -> io::Result<()> {
        writeln!(self.writer)
    }

    /// Dates, totals and the optional comparison block
    pub fn write_summary_header(&mut self, header: &SummaryHeader) -> io::Result<()> {
        write!(self.writer, "{}", format_summary_header(header))
    }

    pub fn write_summary_table(&mut self, rows: &[SummaryRow]) -> io::Result<()> {
        let w = get_widths();
        write!(self.writer, "{}", format_table_border('┌', '┬', '┐'))?;
        writeln!(
            self.writer,
            "│{:^c$}│{:^v$}│{:^e$}│{:^t$}│",
            "Component",
            "Valid",
            "Error",
            "Timeout",
            c = w.component,
            v = w.count,
            e = w.count,
            t = w.count
        )?;
        write!(self.writer, "{}", format_table_border('├', '┼', '┤'))?;
        for row in rows {
            self.write_summary_row(row)?;
        }
        write!(self.writer, "{}", format_table_border('└', '┴', '┘'))
    }

    /// One component row; each count cell is colored by its trend
    pub fn write_summary_row(&mut self, row: &SummaryRow) -> io::Result<()> {
        let w = get_widths();
        write!(self.writer, "│ {} ", truncate_with_padding(&row.component, w.component - 2))?;
        for cell in [&row.valid, &row.error, &row.timeout] {
            write!(self.writer, "│ ")?;
            self.write_count_cell(cell, w.count - 2)?;
            write!(self.writer, " ")?;
        }
        writeln!(self.writer, "│")
    }

    fn write_count_cell(&mut self, cell: &CountCell, width: usize) -> io::Result<()> {
        let text = truncate_with_padding(&cell.format(), width);
        if cell.change.is_some() && cell.trend != Trend::Same {
            self.write_colored(&text, trend_color(cell.trend))
        } else {
            write!(self.writer, "{}", text)
        }
    }

    /// Datasets of a drill-down: `name (count) (+diff)`
    pub fn write_dataset_list(&mut self, title: &str, entries: &[DatasetEntry], comparing: bool) -> io::Result<()> {
        writeln!(self.writer, "\n{}", title)?;
        if entries.is_empty() {
            return writeln!(self.writer, "  (no matching datasets)");
        }
        for entry in entries {
            write!(self.writer, "  {} ({})", entry.name, entry.file_count)?;
            if comparing && entry.diff != 0 {
                let label = if entry.diff > 0 { format!(" (+{})", entry.diff) } else { format!(" ({})", entry.diff) };
                let color = if entry.diff > 0 { term::color::BRIGHT_GREEN } else { term::color::BRIGHT_RED };
                self.write_colored(&label, color)?;
            }
            self.writeln()?;
        }
        Ok(())
    }

    /// Files of one dataset, with the `+N new -M removed` summary when comparing
    pub fn write_file_listing(&mut self, dataset: &str, listing: &FileListing<'_>, comparing: bool) -> io::Result<()> {
        writeln!(self.writer, "\nFiles in {} ({})", dataset, listing.rows.len())?;
        if comparing && !listing.summary.is_empty() {
            writeln!(self.writer, "  {}", listing.summary)?;
        }
        for row in &listing.rows {
            self.write_file_row(row, &row.display_name)?;
        }
        Ok(())
    }

    /// Search hits, matches wrapped in brackets
    pub fn write_search_results(&mut self, term: &str, rows: &[FileRow<'_>]) -> io::Result<()> {
        writeln!(self.writer, "\nSearch results for \"{}\" ({})", term, rows.len())?;
        if rows.is_empty() {
            return writeln!(self.writer, "  No matching files found");
        }
        for row in rows {
            let name = highlight(&row.display_name, term, |m| format!("[{}]", m));
            let dataset = highlight(row.dataset, term, |m| format!("[{}]", m));
            self.write_file_row(row, &format!("{}  ({})", name, dataset))?;
        }
        Ok(())
    }

    fn write_file_row(&mut self, row: &FileRow<'_>, text: &str) -> io::Result<()> {
        let line = format!("  {} {}", status_marker(row.status), text);
        match row.status {
            FileStatus::Added => self.write_colored(&line, term::color::BRIGHT_GREEN)?,
            FileStatus::Removed => self.write_colored(&line, term::color::BRIGHT_RED)?,
            FileStatus::Unchanged => write!(self.writer, "{}", line)?,
        }
        self.writeln()
    }

    /// File-detail panel: performance, quality and robustness blocks
    pub fn write_file_detail(&mut self, detail: &FileDetail<'_>) -> io::Result<()> {
        writeln!(self.writer, "\nDataset: {}", detail.dataset)?;
        write!(self.writer, "File: {}", detail.display_name)?;
        if detail.status == FileStatus::Removed {
            write!(self.writer, " (removed since the comparison date)")?;
        }
        self.writeln()?;

        self.write_metric_block("Performance", &detail.performance)?;
        self.write_metric_block("Quality", &detail.quality)?;

        writeln!(self.writer, "\nRobustness")?;
        if detail.robustness.is_empty() {
            writeln!(self.writer, "  (none)")?;
        }
        for (flag, value) in &detail.robustness {
            writeln!(self.writer, "  {:<label$} {}", flag, value, label = LABEL_WIDTH)?;
        }
        Ok(())
    }

    fn write_metric_block(&mut self, title: &str, rows: &[MetricRow]) -> io::Result<()> {
        writeln!(self.writer, "\n{}", title)?;
        if rows.is_empty() {
            return writeln!(self.writer, "  (none)");
        }
        for row in rows {
            write!(self.writer, "  {} {}", truncate_with_padding(&row.title, LABEL_WIDTH), row.value)?;
            if let Some(text) = row.comparison_text() {
                write!(self.writer, " ")?;
                match row.trend {
                    Some(trend) if trend != Trend::Same => self.write_colored(&text, trend_color(trend))?,
                    _ => write!(self.writer, "{}", text)?,
                }
            }
            self.writeln()?;
        }
        Ok(())
    }
}

const LABEL_WIDTH: usize = 32;

fn status_marker(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Added => "+",
        FileStatus::Removed => "-",
        FileStatus::Unchanged => " ",
    }
}

/// SGR foreground code for a term color
fn ansi_code(color: Color) -> u32 {
    if color < 8 { 30 + color } else { 90 + (color - 8) }
}

//
// Table Layout and Widths
//

/// Column widths for the 4-column summary table
#[derive(Clone, Copy, Debug)]
pub struct TableWidths {
    pub component: usize,
    /// Each of the Valid / Error / Timeout columns
    pub count: usize,
}

impl TableWidths {
    pub fn new(terminal_width: usize) -> Self {
        // Borders: │ = 5 characters (1 before each column + 1 at end)
        let borders = 5;
        let available = terminal_width.saturating_sub(borders);

        // "12345 (+123) (-123)" plus padding
        let count = 22;
        let fixed_total = count * 3;
        let component = if available > fixed_total + 16 { (available - fixed_total).min(40) } else { 16 };

        TableWidths { component, count }
    }
}

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Fix the console width instead of detecting it (first call wins)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width);
}

/// Configured width, else the terminal's, else 120
fn get_terminal_width() -> usize {
    if let Some(w) = CONSOLE_WIDTH.get() {
        return *w;
    }
    if let Some((Width(w), _)) = terminal_size() { w as usize } else { 120 }
}

pub fn get_widths() -> TableWidths {
    TableWidths::new(get_terminal_width())
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);
    if display_w <= width {
        return format!("{}{}", s, " ".repeat(width - display_w));
    }

    // Reserve space for "..."
    let target_width = if width >= 3 { width - 3 } else { width };
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + c_width > target_width {
            break;
        }
        result.push(c);
        current_width += c_width;
    }
    if width >= 3 {
        result.push_str("...");
        current_width += 3;
    }
    if current_width < width {
        result.push_str(&" ".repeat(width - current_width));
    }
    result
}

//
// Header / Border Rendering
//

/// Format the summary header as a string
pub fn format_summary_header(header: &SummaryHeader) -> String {
    let mut output = String::new();
    output.push('\n');
    output.push_str(&format!("Current Dataset: {}\n", header.date));
    output.push_str(&format!("Total Datasets: {}\n", header.datasets));
    output.push_str(&format!("Total Files: {}\n", header.files));
    output.push_str(&format!("{}\n", header.finished_at_line()));
    if let Some(compare) = &header.compare {
        output.push_str(&format!("Comparison Dataset: {}\n", compare.date));
        output.push_str(&format!("Files: {} (Diff: {})\n", compare.files, compare.file_diff));
    }
    output.push('\n');
    output
}

/// One horizontal border line of the summary table
pub fn format_table_border(left: char, mid: char, right: char) -> String {
    let w = get_widths();
    let bar = |n: usize| "─".repeat(n);
    format!(
        "{}{}{}{}{}{}{}{}{}\n",
        left,
        bar(w.component),
        mid,
        bar(w.count),
        mid,
        bar(w.count),
        mid,
        bar(w.count),
        right
    )
}

//
// Stdout helpers
//

pub fn print_summary_header(header: &SummaryHeader) {
    let mut writer = TableWriter::new(io::stdout(), false);
    let _ = writer.write_summary_header(header);
}

pub fn print_summary_table(rows: &[SummaryRow], use_colors: bool) {
    let mut writer = TableWriter::new(io::stdout(), use_colors);
    let _ = writer.write_summary_table(rows);
}

pub fn print_dataset_list(title: &str, entries: &[DatasetEntry], comparing: bool, use_colors: bool) {
    let mut writer = TableWriter::new(io::stdout(), use_colors);
    let _ = writer.write_dataset_list(title, entries, comparing);
}

pub fn print_file_listing(dataset: &str, listing: &FileListing<'_>, comparing: bool, use_colors: bool) {
    let mut writer = TableWriter::new(io::stdout(), use_colors);
    let _ = writer.write_file_listing(dataset, listing, comparing);
}

pub fn print_search_results(term: &str, rows: &[FileRow<'_>], use_colors: bool) {
    let mut writer = TableWriter::new(io::stdout(), use_colors);
    let _ = writer.write_search_results(term, rows);
}

pub fn print_file_detail(detail: &FileDetail<'_>, use_colors: bool) {
    let mut writer = TableWriter::new(io::stdout(), use_colors);
    let _ = writer.write_file_detail(detail);
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
