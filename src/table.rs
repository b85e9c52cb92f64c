//! Plain-text tables for terminal output.
//!
//! Layout: header line, optional unit line, dashes, then every row. Cells are
//! right-aligned and separated by a single space.

use std::fmt;

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub unit: Option<String>,
    pub cells: Vec<String>,
}

impl Column {
    pub fn new(name: &str, cells: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            unit: None,
            cells,
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    fn width(&self) -> usize {
        let head = self.name.chars().count();
        let unit = self.unit.as_deref().map_or(0, |u| u.chars().count());
        self.cells
            .iter()
            .map(|c| c.chars().count())
            .fold(head.max(unit), usize::max)
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Shorter columns are padded with blank cells.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.columns.iter().map(|c| c.cells.len()).max().unwrap_or(0)
    }

    fn write_line<'a>(
        f: &mut fmt::Formatter<'_>,
        widths: &[usize],
        cells: impl Iterator<Item = &'a str>,
    ) -> fmt::Result {
        let line = cells
            .zip(widths)
            .map(|(c, &w)| format!("{c:>w$}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(f, "{}", line.trim_end())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self.columns.iter().map(Column::width).collect();

        Self::write_line(f, &widths, self.columns.iter().map(|c| c.name.as_str()))?;
        if self.columns.iter().any(|c| c.unit.is_some()) {
            Self::write_line(
                f,
                &widths,
                self.columns.iter().map(|c| c.unit.as_deref().unwrap_or("")),
            )?;
        }
        let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        Self::write_line(f, &widths, dashes.iter().map(String::as_str))?;

        for row in 0..self.n_rows() {
            Self::write_line(
                f,
                &widths,
                self.columns
                    .iter()
                    .map(|c| c.cells.get(row).map(String::as_str).unwrap_or("")),
            )?;
        }
        Ok(())
    }
}

/// Shortest round-trip form, integral values keep a trailing `.0`.
pub fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        (if v > 0.0 { "inf" } else { "-inf" }).to_string()
    } else {
        format!("{v:?}")
    }
}
