//! Оценка худшего размера образа для преаллокации буферов/регионов флеша.

use crate::config::TableLimits;
use crate::consts::{HEADER_BYTES, INDEX_ENTRY_BYTES};
use crate::persist::schema;
use crate::types::ColumnSpec;

/// Худший размер образа для данной схемы: таблица заполнена до max_rows.
///
/// Чистая функция: не зависит ни от текущего числа строк, ни от содержимого.
pub fn estimate_max_bytes(columns: &[ColumnSpec], limits: &TableLimits) -> usize {
    let schema_bytes = columns.len() * schema::entry_bytes(limits);
    let per_row: usize = columns.iter().map(|c| c.ty.cell_width(limits)).sum();
    let max_rows = limits.max_rows as usize;
    HEADER_BYTES + schema_bytes + max_rows * (INDEX_ENTRY_BYTES + per_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;

    #[test]
    fn accounts_for_every_block() {
        let limits = TableLimits::default()
            .with_max_rows(10)
            .with_max_name_len(8)
            .with_max_text_len(16);
        let cols = [
            ColumnSpec::new("id", ColumnType::Int),
            ColumnSpec::new("note", ColumnType::Text),
        ];
        // header + 2*(8+1) + 10*2 + 10*(4+16)
        let want = HEADER_BYTES + 18 + 20 + 200;
        assert_eq!(estimate_max_bytes(&cols, &limits), want);
    }

    #[test]
    fn independent_of_row_content() {
        let limits = TableLimits::default();
        let cols = [ColumnSpec::new("v", ColumnType::Double)];
        let a = estimate_max_bytes(&cols, &limits);
        let b = estimate_max_bytes(&cols, &limits);
        assert_eq!(a, b);
        assert!(a > HEADER_BYTES);
    }
}
