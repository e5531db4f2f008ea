//! Table engine seam and the fixed-capacity reference engine.
//!
//! The persistence pipelines never touch an engine directly: a producer is
//! anything implementing `SourceTable` (schema, slots, tombstones, typed
//! cells) and a consumer anything implementing `TableSink` (empty-table
//! constructor + row insertion). `FixedTable` below implements both and is
//! the in-crate engine: fixed row capacity, tombstone deletion with slot
//! reuse, typed cells, no dynamic growth.

use crate::config::TableLimits;
use crate::errors::{PersistError, Result};
use crate::types::{truncate_utf8, ColumnSpec, Value};

/// Read side of the engine seam, consumed by the save pipeline.
pub trait SourceTable {
    /// Ordered column descriptors; order defines on-disk column order.
    fn columns(&self) -> &[ColumnSpec];

    /// Number of physical row slots, including tombstoned ones.
    fn row_slots(&self) -> usize;

    /// Tombstone test for a slot in `[0, row_slots)`.
    fn is_deleted(&self, row: usize) -> bool;

    /// Typed cell access. `row` must be a live slot, `col` a valid column.
    fn cell(&self, row: usize, col: usize) -> Result<Value>;
}

/// Why a row insertion was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowInsertError {
    /// Every slot is occupied by a live row.
    TableFull,
    /// Value count or value type does not match the schema.
    SchemaMismatch(String),
}

impl std::fmt::Display for RowInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowInsertError::TableFull => f.write_str("table is full"),
            RowInsertError::SchemaMismatch(msg) => write!(f, "schema mismatch: {}", msg),
        }
    }
}

/// Build side of the engine seam, consumed by the load pipeline.
pub trait TableSink: Sized {
    /// Produce an empty table with the given schema. The table starts with
    /// zero rows regardless of what the image's original row ids were.
    fn create(name: &str, columns: &[ColumnSpec], limits: &TableLimits) -> Result<Self>;

    /// Append one row, one value per column in schema order.
    fn insert_row(&mut self, values: Vec<Value>) -> std::result::Result<(), RowInsertError>;
}

// ---------- FixedTable ----------

/// Fixed-capacity row store with tombstone deletion.
#[derive(Debug, Clone)]
pub struct FixedTable {
    name: String,
    limits: TableLimits,
    columns: Vec<ColumnSpec>,
    rows: Vec<Vec<Value>>,
    deleted: Vec<bool>,
}

impl FixedTable {
    /// Create an empty table. Column count must be in `[1, max_cols]`;
    /// column names longer than `max_name_len` are truncated up front so the
    /// in-memory schema always matches what an image round-trip would yield.
    pub fn new(name: impl Into<String>, columns: &[ColumnSpec], limits: &TableLimits) -> Result<Self> {
        limits.validate()?;
        if columns.is_empty() {
            return Err(PersistError::invalid("table must have at least one column"));
        }
        if columns.len() > limits.max_cols as usize {
            return Err(PersistError::invalid(format!(
                "too many columns: {} > max_cols {}",
                columns.len(),
                limits.max_cols
            )));
        }
        let columns = columns
            .iter()
            .map(|c| ColumnSpec {
                name: truncate_utf8(&c.name, limits.max_name_len as usize).to_string(),
                ty: c.ty,
            })
            .collect();
        Ok(Self {
            name: name.into(),
            limits: *limits,
            columns,
            rows: Vec::new(),
            deleted: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn limits(&self) -> &TableLimits {
        &self.limits
    }

    /// Ordered column descriptors.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Number of physical row slots, including tombstoned ones.
    pub fn row_slots(&self) -> usize {
        self.rows.len()
    }

    /// Tombstone test. Out-of-range slots read as deleted.
    pub fn is_deleted(&self, row: usize) -> bool {
        self.deleted.get(row).copied().unwrap_or(true)
    }

    /// Append one row, one value per column in schema order. Reuses the
    /// first tombstoned slot before growing; fails `TableFull` once every
    /// slot holds a live row and the capacity is reached.
    pub fn insert_row(&mut self, values: Vec<Value>) -> std::result::Result<(), RowInsertError> {
        self.check_row(&values)?;
        let values = self.clamp_row(values);

        if let Some(slot) = self.deleted.iter().position(|&d| d) {
            self.rows[slot] = values;
            self.deleted[slot] = false;
            return Ok(());
        }
        if self.rows.len() >= self.limits.max_rows as usize {
            return Err(RowInsertError::TableFull);
        }
        self.rows.push(values);
        self.deleted.push(false);
        Ok(())
    }

    /// Number of live (non-tombstoned) rows.
    pub fn live_rows(&self) -> usize {
        self.deleted.iter().filter(|&&d| !d).count()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Borrow a live cell. None for tombstoned slots or out-of-range indices.
    pub fn cell_ref(&self, row: usize, col: usize) -> Option<&Value> {
        if row >= self.rows.len() || self.deleted[row] {
            return None;
        }
        self.rows[row].get(col)
    }

    /// Tombstone a live slot. The slot is reused by later insertions.
    pub fn delete_row(&mut self, row: usize) -> Result<()> {
        if row >= self.rows.len() || self.deleted[row] {
            return Err(PersistError::invalid(format!("no live row at slot {}", row)));
        }
        self.deleted[row] = true;
        Ok(())
    }

    /// Slots of live rows whose cell in `col_name` equals `needle`.
    /// Minimal equality scan, enough for spot checks after a reload.
    pub fn rows_where_eq(&self, col_name: &str, needle: &Value) -> Vec<usize> {
        let Some(col) = self.column_index(col_name) else {
            return Vec::new();
        };
        (0..self.rows.len())
            .filter(|&r| !self.deleted[r] && &self.rows[r][col] == needle)
            .collect()
    }

    fn check_row(&self, values: &[Value]) -> std::result::Result<(), RowInsertError> {
        if values.len() != self.columns.len() {
            return Err(RowInsertError::SchemaMismatch(format!(
                "expected {} values, got {}",
                self.columns.len(),
                values.len()
            )));
        }
        for (v, c) in values.iter().zip(&self.columns) {
            if v.column_type() != c.ty {
                return Err(RowInsertError::SchemaMismatch(format!(
                    "column '{}' expects {}, got {}",
                    c.name,
                    c.ty,
                    v.column_type()
                )));
            }
        }
        Ok(())
    }

    /// Clamp text values to the engine's fixed text capacity.
    fn clamp_row(&self, mut values: Vec<Value>) -> Vec<Value> {
        let cap = self.limits.max_text_len as usize;
        for v in &mut values {
            if let Value::Text(s) = v {
                if s.len() > cap {
                    let cut = truncate_utf8(s, cap).to_string();
                    *s = cut;
                }
            }
        }
        values
    }
}

impl SourceTable for FixedTable {
    fn columns(&self) -> &[ColumnSpec] {
        FixedTable::columns(self)
    }

    fn row_slots(&self) -> usize {
        FixedTable::row_slots(self)
    }

    fn is_deleted(&self, row: usize) -> bool {
        FixedTable::is_deleted(self, row)
    }

    fn cell(&self, row: usize, col: usize) -> Result<Value> {
        self.cell_ref(row, col)
            .cloned()
            .ok_or_else(|| PersistError::invalid(format!("no cell at row {} col {}", row, col)))
    }
}

impl TableSink for FixedTable {
    fn create(name: &str, columns: &[ColumnSpec], limits: &TableLimits) -> Result<Self> {
        FixedTable::new(name, columns, limits)
    }

    fn insert_row(&mut self, values: Vec<Value>) -> std::result::Result<(), RowInsertError> {
        FixedTable::insert_row(self, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;

    fn limits() -> TableLimits {
        TableLimits::default().with_max_rows(4).with_max_text_len(8)
    }

    fn people() -> FixedTable {
        FixedTable::new(
            "people",
            &[
                ColumnSpec::new("id", ColumnType::Int),
                ColumnSpec::new("name", ColumnType::Text),
            ],
            &limits(),
        )
        .unwrap()
    }

    #[test]
    fn insert_select_delete_reuse() {
        let mut t = people();
        for i in 0..4 {
            t.insert_row(vec![Value::Int(i), Value::Text(format!("p{}", i))])
                .unwrap();
        }
        assert_eq!(
            t.insert_row(vec![Value::Int(9), Value::Text("x".into())]),
            Err(RowInsertError::TableFull)
        );

        t.delete_row(1).unwrap();
        assert_eq!(t.live_rows(), 3);
        assert!(t.is_deleted(1));

        // Slot 1 is reused by the next insert.
        t.insert_row(vec![Value::Int(42), Value::Text("reused".into())])
            .unwrap();
        assert_eq!(t.row_slots(), 4);
        assert_eq!(t.rows_where_eq("id", &Value::Int(42)), vec![1]);
    }

    #[test]
    fn schema_mismatch_rejected() {
        let mut t = people();
        let err = t
            .insert_row(vec![Value::Bool(true), Value::Text("x".into())])
            .unwrap_err();
        assert!(matches!(err, RowInsertError::SchemaMismatch(_)));

        let err = t.insert_row(vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(err, RowInsertError::SchemaMismatch(_)));
    }

    #[test]
    fn text_clamped_to_capacity() {
        let mut t = people();
        t.insert_row(vec![
            Value::Int(1),
            Value::Text("longer-than-eight-bytes".into()),
        ])
        .unwrap();
        match t.cell_ref(0, 1).unwrap() {
            Value::Text(s) => assert_eq!(s, "longer-t"),
            other => panic!("unexpected cell {:?}", other),
        }
    }

    #[test]
    fn zero_columns_rejected() {
        let err = FixedTable::new("empty", &[], &limits()).unwrap_err();
        assert!(matches!(err, PersistError::Invalid(_)));
    }

    #[test]
    fn ref_columns_allowed_in_memory() {
        // Ref колонка валидна в памяти; отказ приходит только от save.
        let t = FixedTable::new(
            "refs",
            &[ColumnSpec::new("handle", ColumnType::Ref)],
            &TableLimits::default(),
        );
        assert!(t.is_ok());
    }
}
