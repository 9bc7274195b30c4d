use peakascent_core::{driver::Filter, BufferRowIndex, Value};

/// In-memory copy of a table's rows.
///
/// Every row has one cell per column, in column order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Buffer {
    rows: Vec<Vec<Value>>,
}

impl Buffer {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn row(&self, index: BufferRowIndex) -> &[Value] {
        &self.rows[index.get()]
    }

    pub fn cell(&self, index: BufferRowIndex, column: usize) -> &Value {
        &self.rows[index.get()][column]
    }

    pub fn iter(&self) -> impl Iterator<Item = (BufferRowIndex, &[Value])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| (BufferRowIndex::new(i), row.as_slice()))
    }

    /// Linear scan for rows whose cell in `column` equals `value`.
    pub fn find_rows(&self, column: usize, value: &Value) -> Vec<BufferRowIndex> {
        self.iter()
            .filter(|(_, row)| &row[column] == value)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn find_first(&self, column: usize, value: &Value) -> Option<BufferRowIndex> {
        self.rows
            .iter()
            .position(|row| &row[column] == value)
            .map(BufferRowIndex::new)
    }

    pub(crate) fn matching(&self, filter: &Filter) -> Vec<BufferRowIndex> {
        self.iter()
            .filter(|(_, row)| filter.matches(row))
            .map(|(index, _)| index)
            .collect()
    }

    pub(crate) fn push(&mut self, row: Vec<Value>) -> BufferRowIndex {
        self.rows.push(row);
        BufferRowIndex::new(self.rows.len() - 1)
    }

    pub(crate) fn remove(&mut self, index: BufferRowIndex) -> Vec<Value> {
        self.rows.remove(index.get())
    }

    pub(crate) fn set_cell(&mut self, index: BufferRowIndex, column: usize, value: Value) {
        self.rows[index.get()][column] = value;
    }

    pub(crate) fn replace(&mut self, rows: Vec<Vec<Value>>) {
        self.rows = rows;
    }
}
