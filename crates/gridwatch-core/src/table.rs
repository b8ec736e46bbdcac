//! Plain-text table rendering for chat output.
//!
//! Monospace tables with `+---+` separators and centered cells; column
//! widths grow to fit the widest value. Used by the standings and calendar
//! command responses.

/// ASCII table builder.
#[derive(Debug, Clone)]
pub struct Table {
    /// (label, width) per column; width includes one space of padding per side.
    columns: Vec<(String, usize)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|label| (label.to_string(), label.len() + 2))
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. The cell count must match the column count.
    pub fn add_row(&mut self, cells: Vec<String>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        for (cell, column) in cells.iter().zip(self.columns.iter_mut()) {
            if cell.len() + 2 > column.1 {
                column.1 = cell.len() + 2;
            }
        }
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the full table.
    pub fn output(&self) -> String {
        let mut out = Vec::with_capacity(self.rows.len() + 4);
        out.push(self.separator());
        out.push(self.render_row(self.columns.iter().map(|(label, _)| label.as_str())));
        out.push(self.separator());
        for row in &self.rows {
            out.push(self.render_row(row.iter().map(String::as_str)));
        }
        out.push(self.separator());
        out.join("\n")
    }

    fn separator(&self) -> String {
        let mut sep = String::new();
        for (_, width) in &self.columns {
            sep.push('+');
            sep.push_str(&"-".repeat(*width));
        }
        sep.push('+');
        sep
    }

    fn render_row<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let mut text = String::new();
        for (cell, &(_, width)) in cells.zip(self.columns.iter()) {
            text.push('|');
            text.push_str(&format!("{cell:^width$}"));
        }
        text.push('|');
        text
    }
}
