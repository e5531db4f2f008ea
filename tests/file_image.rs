use anyhow::Result;

use CairnDB::{
    load_table, save_table, ColumnSpec, ColumnType, FileStorage, FixedTable, PersistError,
    TableLimits, Value,
};

#[test]
fn save_to_file_then_load() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("table.crn");

    let limits = TableLimits::default();
    let mut t = FixedTable::new(
        "journal",
        &[
            ColumnSpec::new("seq", ColumnType::Int),
            ColumnSpec::new("note", ColumnType::Text),
        ],
        &limits,
    )?;
    for i in 0..7 {
        t.insert_row(vec![Value::Int(i), Value::Text(format!("entry {}", i))])
            .unwrap();
    }
    t.delete_row(3)?;

    {
        let mut st = FileStorage::create(&path)?;
        save_table(&t, &mut st, &limits)?;
        st.sync()?;
    }

    let mut st = FileStorage::open(&path)?;
    let loaded: FixedTable = load_table(&mut st, &limits)?;

    assert_eq!(loaded.columns(), t.columns());
    assert_eq!(loaded.live_rows(), 6);
    assert_eq!(loaded.rows_where_eq("seq", &Value::Int(3)).len(), 0);
    assert_eq!(loaded.rows_where_eq("seq", &Value::Int(6)).len(), 1);
    Ok(())
}

#[test]
fn load_from_empty_file_is_io() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("empty.crn");
    std::fs::write(&path, b"")?;

    let mut st = FileStorage::open(&path)?;
    let err = load_table::<_, FixedTable>(&mut st, &TableLimits::default()).unwrap_err();
    assert!(matches!(err, PersistError::Io(_)));
    Ok(())
}
