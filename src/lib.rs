#![allow(non_snake_case)]

// Базовые модули
pub mod config;
pub mod consts;
pub mod errors;
pub mod types;

// Контрольная сумма образа (фича "crc32")
#[cfg(feature = "crc32")]
pub mod checksum;

// Модульная раскладка (папки с mod.rs)
pub mod persist; // src/persist/{mod,header,schema,row,save,load,estimate}.rs
pub mod storage; // src/storage/{mod,mem,file,flash}.rs
pub mod table;   // src/table/mod.rs

// Удобные реэкспорты
pub use config::TableLimits;
pub use errors::{PersistError, Result};
pub use persist::{estimate_max_bytes, load_table, save_table, ImageHeader};
pub use storage::{FileStorage, FlashHooks, FlashStorage, MemStorage, Storage};
pub use table::{FixedTable, RowInsertError, SourceTable, TableSink};
pub use types::{ColumnSpec, ColumnType, Value};
