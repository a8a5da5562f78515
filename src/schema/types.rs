// src/schema/types.rs

/// Output column contract of `data/candidates.csv`.
pub const CANDIDATE_COLUMNS: [&str; 9] = [
    "item",
    "objecttitel",
    "itemLabel",
    "objectsoortLabel",
    "beroepLabel",
    "collectieLabel",
    "floruit",
    "werklocatieLabel",
    "qid",
];

/// Ordered list of column names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn candidates() -> Self {
        Self::new(CANDIDATE_COLUMNS)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// One schema-conformant row: exactly one cell per schema column, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Rows sharing one schema. Rows can only be built through `Table::push_cells`,
/// which enforces the cell count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// A table with the header and no rows; the degraded-run output.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub(crate) fn push_cells(&mut self, cells: Vec<String>) {
        debug_assert_eq!(cells.len(), self.schema.len());
        self.rows.push(Row { cells });
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of row `idx` in column `name`.
    pub fn get(&self, idx: usize, name: &str) -> Option<&str> {
        let col = self.schema.position(name)?;
        self.rows.get(idx).map(|r| r.cells[col].as_str())
    }
}
