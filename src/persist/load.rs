//! Load-пайплайн: один последовательный проход с проверкой суммы в конце.
//!
//! Порядок: заголовок (магия/версия/размер/ёмкости) → схема колонка за
//! колонкой → пустая таблица через конструктор-коллаборатор → index-записи
//! (читаются, суммируются и отбрасываются: загрузчик всегда компактит,
//! строки перенумеровываются плотно в порядке index-списка) → payload
//! строка за строкой через вставку-коллаборатор → сверка CRC.
//!
//! Отказ вставки трактуется как порча образа, не как переполнение: корректный
//! образ обязан помещаться в свежесозданную таблицу тех же ёмкостей.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::config::TableLimits;
use crate::consts::{HEADER_BYTES, INDEX_ENTRY_BYTES};
use crate::errors::{PersistError, Result};
use crate::persist::header::ImageHeader;
use crate::persist::{row, schema};
use crate::storage::Storage;
use crate::table::TableSink;
use crate::types::Value;

#[cfg(feature = "crc32")]
use crate::checksum::Crc32;

/// Имя, под которым восстанавливается таблица.
const LOADED_TABLE_NAME: &str = "loaded";

/// Восстановить таблицу из носителя.
pub fn load_table<S: Storage, T: TableSink>(storage: &mut S, limits: &TableLimits) -> Result<T> {
    limits.validate()?;

    let mut hb = [0u8; HEADER_BYTES];
    storage.read_all(&mut hb)?;
    let header = ImageHeader::decode(&hb, limits)?;

    debug!(
        "load image: cols={} rows={} payload_bytes={}",
        header.column_count, header.row_count, header.payload_bytes
    );

    #[cfg(feature = "crc32")]
    let mut crc = Crc32::new();

    // Схема: валидация тега до принятия колонки, частичных схем не бывает.
    let mut columns = Vec::with_capacity(header.column_count as usize);
    let mut entry = vec![0u8; schema::entry_bytes(limits)];
    for _ in 0..header.column_count {
        storage.read_all(&mut entry)?;
        #[cfg(feature = "crc32")]
        crc.update(&entry);
        columns.push(schema::decode_entry(&entry, limits)?);
    }

    // Свежая пустая таблица; исходные идентификаторы строк её не касаются.
    let mut table = T::create(LOADED_TABLE_NAME, &columns, limits)?;

    // Index-записи: прочитать, просуммировать, отбросить.
    let mut ib = [0u8; INDEX_ENTRY_BYTES];
    for _ in 0..header.row_count {
        storage.read_all(&mut ib)?;
        #[cfg(feature = "crc32")]
        crc.update(&ib);
        let _original_slot = LittleEndian::read_u16(&ib);
    }

    // Payload: ячейка за ячейкой в порядке схемы, строка — во вставку.
    let mut cell = Vec::new();
    for _ in 0..header.row_count {
        let mut values = Vec::with_capacity(columns.len());
        for col in &columns {
            cell.resize(col.ty.cell_width(limits), 0);
            storage.read_all(&mut cell)?;
            #[cfg(feature = "crc32")]
            crc.update(&cell);
            values.push(row::decode_cell(&cell, col.ty, limits)?);
        }
        insert_checked(&mut table, values)?;
    }

    #[cfg(feature = "crc32")]
    {
        let calc = crc.finalize();
        if calc != header.payload_crc32 {
            return Err(PersistError::corrupt(format!(
                "payload checksum mismatch (stored {:#010x}, computed {:#010x})",
                header.payload_crc32, calc
            )));
        }
    }

    Ok(table)
}

fn insert_checked<T: TableSink>(table: &mut T, values: Vec<Value>) -> Result<()> {
    table.insert_row(values).map_err(|e| {
        PersistError::corrupt(format!(
            "row insertion into freshly built table failed: {}",
            e
        ))
    })
}
