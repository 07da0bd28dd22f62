//! Key/value stage summaries: a table on a TTY, log lines elsewhere.

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

/// Ordered key/value summary of one pipeline stage.
#[derive(Debug, Clone, Default)]
pub struct Report {
    title: String,
    rows: Vec<(String, String)>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.rows.push((label.into(), value.to_string()));
        self
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl ToString) {
        self.rows.push((label.into(), value.to_string()));
    }

    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    /// Render as a rounded UTF-8 table.
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new(&self.title).fg(Color::Cyan),
                Cell::new("Value").fg(Color::Cyan),
            ]);
        for (label, value) in &self.rows {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }
        table
    }

    /// Print on stderr (TTY) or emit one info line per row.
    pub fn emit(&self, is_tty: bool) {
        if is_tty {
            eprintln!("\n{}", self.table());
        } else {
            log::info!("=== {} ===", self.title);
            for (label, value) in &self.rows {
                log::info!("{label}: {value}");
            }
        }
    }
}
