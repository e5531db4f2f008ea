//! Заголовок образа: кодирование, разбор и валидация.

use byteorder::{ByteOrder, LittleEndian};

use crate::config::TableLimits;
use crate::consts::{
    FORMAT_VERSION, HEADER_BYTES, IMAGE_MAGIC, OFF_COLUMN_COUNT, OFF_HASH_SIZE, OFF_HEADER_BYTES,
    OFF_MAGIC, OFF_MAX_COLS, OFF_MAX_NAME_LEN, OFF_MAX_ROWS, OFF_MAX_TEXT_LEN, OFF_PAYLOAD_BYTES,
    OFF_ROW_COUNT, OFF_VERSION,
};
#[cfg(feature = "crc32")]
use crate::consts::OFF_PAYLOAD_CRC32;
use crate::errors::{PersistError, Result};

/// Заголовок образа таблицы (один на образ, фиксированный LE-лейаут).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub version: u16,
    pub header_bytes: u16,
    pub column_count: u16,
    /// Число сохранённых (живых) строк.
    pub row_count: u16,
    /// Ёмкости сборки-продюсера; читатель сверяет их со своими строго.
    pub max_rows: u16,
    pub max_cols: u16,
    pub max_name_len: u16,
    pub max_text_len: u16,
    pub hash_size: u16,
    /// Длина всего, что идёт после заголовка. Подсказка для преаллокации,
    /// не источник истины для парсинга.
    pub payload_bytes: u32,
    /// CRC32 всех байт после заголовка (с фичей `crc32`).
    #[cfg(feature = "crc32")]
    pub payload_crc32: u32,
}

impl ImageHeader {
    /// Собрать заголовок под запись.
    pub fn assemble(
        limits: &TableLimits,
        column_count: u16,
        row_count: u16,
        payload_bytes: u32,
        #[cfg(feature = "crc32")] payload_crc32: u32,
    ) -> Self {
        Self {
            version: FORMAT_VERSION,
            header_bytes: HEADER_BYTES as u16,
            column_count,
            row_count,
            max_rows: limits.max_rows,
            max_cols: limits.max_cols,
            max_name_len: limits.max_name_len,
            max_text_len: limits.max_text_len,
            hash_size: limits.hash_size,
            payload_bytes,
            #[cfg(feature = "crc32")]
            payload_crc32,
        }
    }

    /// Закодировать в фиксированный LE-лейаут.
    pub fn encode(&self) -> [u8; HEADER_BYTES] {
        let mut buf = [0u8; HEADER_BYTES];
        buf[OFF_MAGIC..OFF_MAGIC + 4].copy_from_slice(IMAGE_MAGIC);
        LittleEndian::write_u16(&mut buf[OFF_VERSION..], self.version);
        LittleEndian::write_u16(&mut buf[OFF_HEADER_BYTES..], self.header_bytes);
        LittleEndian::write_u16(&mut buf[OFF_COLUMN_COUNT..], self.column_count);
        LittleEndian::write_u16(&mut buf[OFF_ROW_COUNT..], self.row_count);
        LittleEndian::write_u16(&mut buf[OFF_MAX_ROWS..], self.max_rows);
        LittleEndian::write_u16(&mut buf[OFF_MAX_COLS..], self.max_cols);
        LittleEndian::write_u16(&mut buf[OFF_MAX_NAME_LEN..], self.max_name_len);
        LittleEndian::write_u16(&mut buf[OFF_MAX_TEXT_LEN..], self.max_text_len);
        LittleEndian::write_u16(&mut buf[OFF_HASH_SIZE..], self.hash_size);
        LittleEndian::write_u32(&mut buf[OFF_PAYLOAD_BYTES..], self.payload_bytes);
        #[cfg(feature = "crc32")]
        LittleEndian::write_u32(&mut buf[OFF_PAYLOAD_CRC32..], self.payload_crc32);
        buf
    }

    /// Разобрать и провалидировать заголовок против лимитов читателя.
    ///
    /// Классификация отказов (никогда не коэрсится молча):
    /// - магия/размер заголовка/column_count — Corrupt (структурная порча);
    /// - версия/ёмкости — Unsupported (чужой, но целый формат).
    pub fn decode(buf: &[u8; HEADER_BYTES], limits: &TableLimits) -> Result<Self> {
        if &buf[OFF_MAGIC..OFF_MAGIC + 4] != IMAGE_MAGIC {
            return Err(PersistError::corrupt("bad image magic"));
        }
        let version = LittleEndian::read_u16(&buf[OFF_VERSION..]);
        if version != FORMAT_VERSION {
            return Err(PersistError::unsupported(format!(
                "image format version {} (expected {})",
                version, FORMAT_VERSION
            )));
        }
        let header_bytes = LittleEndian::read_u16(&buf[OFF_HEADER_BYTES..]);
        if header_bytes as usize != HEADER_BYTES {
            return Err(PersistError::corrupt(format!(
                "declared header size {} does not match {}",
                header_bytes, HEADER_BYTES
            )));
        }

        let h = Self {
            version,
            header_bytes,
            column_count: LittleEndian::read_u16(&buf[OFF_COLUMN_COUNT..]),
            row_count: LittleEndian::read_u16(&buf[OFF_ROW_COUNT..]),
            max_rows: LittleEndian::read_u16(&buf[OFF_MAX_ROWS..]),
            max_cols: LittleEndian::read_u16(&buf[OFF_MAX_COLS..]),
            max_name_len: LittleEndian::read_u16(&buf[OFF_MAX_NAME_LEN..]),
            max_text_len: LittleEndian::read_u16(&buf[OFF_MAX_TEXT_LEN..]),
            hash_size: LittleEndian::read_u16(&buf[OFF_HASH_SIZE..]),
            payload_bytes: LittleEndian::read_u32(&buf[OFF_PAYLOAD_BYTES..]),
            #[cfg(feature = "crc32")]
            payload_crc32: LittleEndian::read_u32(&buf[OFF_PAYLOAD_CRC32..]),
        };

        if h.max_rows != limits.max_rows
            || h.max_cols != limits.max_cols
            || h.max_name_len != limits.max_name_len
            || h.max_text_len != limits.max_text_len
            || h.hash_size != limits.hash_size
        {
            return Err(PersistError::unsupported(format!(
                "image limits (rows={}, cols={}, name={}, text={}, hash={}) do not match this build's {}",
                h.max_rows, h.max_cols, h.max_name_len, h.max_text_len, h.hash_size, limits
            )));
        }
        if h.column_count == 0 || h.column_count > limits.max_cols {
            return Err(PersistError::corrupt(format!(
                "column_count {} out of range [1, {}]",
                h.column_count, limits.max_cols
            )));
        }
        Ok(h)
    }
}
