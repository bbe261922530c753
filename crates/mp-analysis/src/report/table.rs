//! Plain-text, pipe-separated tables for the run summaries.

use std::fmt;

/// Column-aligned text table. Each column is as wide as its widest cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing trailing cells render empty; extra cells are dropped.
    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(f, "{}", line.join(" | "))
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_line(f, &self.headers, &widths)?;
        let underline: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        writeln!(f, "{}", underline.join("-+-"))?;
        for row in &self.rows {
            write_line(f, row, &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_pad_to_widest_cell() {
        let mut table = Table::new(["Object Type", "Count"]);
        table.add_row(["VC::VM", "12"]);
        table.add_row(["VC::HostSystem", "3"]);

        let expected = concat!(
            "Object Type    | Count\n",
            "---------------+------\n",
            "VC::VM         | 12   \n",
            "VC::HostSystem | 3    \n",
        );
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(["A", "B"]);
        table.add_row(["x"]);
        assert_eq!(table.to_string(), "A | B\n--+--\nx |  \n");
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_header_only() {
        let table = Table::new(["Collection", "Failure Reason"]);
        assert!(table.is_empty());
        assert_eq!(
            table.to_string(),
            "Collection | Failure Reason\n-----------+---------------\n"
        );
    }
}
