//! Save-пайплайн: линейная машина состояний без возвратов назад.
//!
//! Порядок шагов (см. также layout в `consts`):
//! 1. erase носителя, если способность заявлена (отказ = I/O);
//! 2. валидация схемы на персистуемость — до единого записанного байта;
//! 3. подсчёт живых строк;
//! 4. checksum-проход (фича `crc32`): schema → index → payload байт в байт
//!    скармливаются аккумулятору без записи. Проход существует потому, что
//!    заголовок пишется первым и должен содержать сумму данных, которые
//!    будут записаны после него, а перемотать носитель нельзя;
//! 5. сборка и запись заголовка;
//! 6. write-проход: тот же логический поток, теперь в носитель.
//!
//! Любой отказ write_all прерывает пайплайн немедленно; частично записанный
//! образ не подчищается — политика восстановления за вызывающим (его erase).

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::config::TableLimits;
use crate::consts::INDEX_ENTRY_BYTES;
use crate::errors::{PersistError, Result};
use crate::persist::header::ImageHeader;
use crate::persist::{row, schema};
use crate::storage::Storage;
use crate::table::SourceTable;

#[cfg(feature = "crc32")]
use crate::checksum::Crc32;

/// Приёмник байтового потока образа: либо CRC-аккумулятор (checksum-проход),
/// либо носитель (write-проход). Оба прохода гонят один и тот же поток через
/// `stream_payload`, расхождение проходов исключено по построению.
trait ByteSink {
    fn put(&mut self, bytes: &[u8]) -> Result<()>;
}

#[cfg(feature = "crc32")]
struct CrcSink<'a>(&'a mut Crc32);

#[cfg(feature = "crc32")]
impl ByteSink for CrcSink<'_> {
    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.0.update(bytes);
        Ok(())
    }
}

struct StorageSink<'a, S: Storage>(&'a mut S);

impl<S: Storage> ByteSink for StorageSink<'_, S> {
    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.0.write_all(bytes)
    }
}

/// Прогнать schema + index + payload (всё после заголовка) через приёмник.
fn stream_payload<T: SourceTable>(
    table: &T,
    limits: &TableLimits,
    sink: &mut dyn ByteSink,
) -> Result<()> {
    let columns = table.columns();

    // Schema: по одной записи фиксированной ширины на колонку.
    let mut entry = vec![0u8; schema::entry_bytes(limits)];
    for col in columns {
        schema::encode_entry(col, limits, &mut entry)?;
        sink.put(&entry)?;
    }

    // Index: u16-позиция каждой живой строки в исходной таблице.
    let mut ib = [0u8; INDEX_ENTRY_BYTES];
    for slot in 0..table.row_slots() {
        if table.is_deleted(slot) {
            continue;
        }
        LittleEndian::write_u16(&mut ib, slot as u16);
        sink.put(&ib)?;
    }

    // Payload: строки подряд, внутри строки — ячейки в порядке схемы.
    for slot in 0..table.row_slots() {
        if table.is_deleted(slot) {
            continue;
        }
        for (ci, col) in columns.iter().enumerate() {
            let value = table.cell(slot, ci)?;
            let cell = row::encode_cell(&value, col.ty, limits)?;
            sink.put(&cell)?;
        }
    }

    Ok(())
}

/// Сохранить таблицу в носитель одним образом.
pub fn save_table<T: SourceTable, S: Storage>(
    table: &T,
    storage: &mut S,
    limits: &TableLimits,
) -> Result<()> {
    limits.validate()?;

    let columns = table.columns();
    if columns.is_empty() {
        return Err(PersistError::invalid("cannot save a table with no columns"));
    }
    if columns.len() > limits.max_cols as usize {
        return Err(PersistError::invalid(format!(
            "table has {} columns, limits allow {}",
            columns.len(),
            limits.max_cols
        )));
    }

    if storage.can_erase() {
        storage.erase()?;
    }

    // Персистуемость всей схемы — до единого записанного байта.
    for col in columns {
        if !col.ty.is_persistable() {
            return Err(PersistError::unsupported(format!(
                "column '{}' has non-persistable type {}",
                col.name, col.ty
            )));
        }
    }

    // Живые строки и геометрия образа.
    let slots = table.row_slots();
    if slots > u16::MAX as usize {
        return Err(PersistError::invalid(format!(
            "table has {} row slots, index entries are u16",
            slots
        )));
    }
    let row_count = (0..slots).filter(|&r| !table.is_deleted(r)).count();
    if row_count > limits.max_rows as usize {
        return Err(PersistError::invalid(format!(
            "table has {} live rows, limits allow {}",
            row_count, limits.max_rows
        )));
    }

    let schema_bytes = columns.len() * schema::entry_bytes(limits);
    let per_row: usize = columns.iter().map(|c| c.ty.cell_width(limits)).sum();
    let payload_usize = schema_bytes + row_count * (INDEX_ENTRY_BYTES + per_row);
    // Поле payload_bytes в заголовке — u32; молчаливое усечение запрещено.
    let payload_bytes = u32::try_from(payload_usize).map_err(|_| {
        PersistError::invalid(format!(
            "image payload of {} bytes does not fit the u32 header field",
            payload_usize
        ))
    })?;

    // Checksum-проход: те же байты, что пойдут в носитель, но в аккумулятор.
    #[cfg(feature = "crc32")]
    let payload_crc32 = {
        let mut crc = Crc32::new();
        stream_payload(table, limits, &mut CrcSink(&mut crc))?;
        crc.finalize()
    };

    let header = ImageHeader::assemble(
        limits,
        columns.len() as u16,
        row_count as u16,
        payload_bytes,
        #[cfg(feature = "crc32")]
        payload_crc32,
    );
    storage.write_all(&header.encode())?;

    debug!(
        "save image: cols={} rows={} payload_bytes={}",
        columns.len(),
        row_count,
        payload_bytes
    );

    // Write-проход: идентичный поток, теперь в носитель.
    stream_payload(table, limits, &mut StorageSink(storage))
}
