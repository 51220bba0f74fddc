//! Delimited text rendering for report tables
//!
//! Fields are joined verbatim. There is no quoting or escaping, so a field
//! that contains the delimiter shifts the columns after it.

/// Delimited text layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: char,
    pub line_terminator: &'static str,
    /// Emit a delimiter after the last field of every line
    pub trailing_delimiter: bool,
}

impl Dialect {
    /// Legacy layout where every line ends in `;` before the line break
    pub fn legacy() -> Self {
        Dialect {
            trailing_delimiter: true,
            ..Dialect::default()
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect {
            delimiter: ';',
            line_terminator: "\r\n",
            trailing_delimiter: false,
        }
    }
}

/// Header plus data rows of one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (header excluded)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render header and rows, one terminated line each
    pub fn render(&self, dialect: &Dialect) -> String {
        let mut out = String::new();
        write_line(&mut out, &self.header, dialect);
        for row in &self.rows {
            write_line(&mut out, row, dialect);
        }
        out
    }
}

fn write_line(out: &mut String, fields: &[String], dialect: &Dialect) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(dialect.delimiter);
        }
        out.push_str(field);
    }
    if dialect.trailing_delimiter {
        out.push(dialect.delimiter);
    }
    out.push_str(dialect.line_terminator);
}
