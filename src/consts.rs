//! Общие константы формата образа таблицы (table image).
//!
//! Формат (LE, всё фиксированной ширины):
//! - Header (30 B с фичей `crc32`, иначе 26 B):
//!   [magic4="CRN1"][version u16=1][header_bytes u16]
//!   [column_count u16][row_count u16]
//!   [max_rows u16][max_cols u16][max_name_len u16][max_text_len u16][hash_size u16]
//!   [payload_bytes u32][payload_crc32 u32 — только с фичей `crc32`]
//! - Schema: column_count × ([name max_name_len B, zero-padded][type_tag u8])
//! - Index:  row_count × u16 — позиция строки в исходной (до компакции) таблице
//! - Payload: row_count × (по одной ячейке на колонку, ширина по типу)
//!
//! Политика:
//! - payload_bytes — подсказка для преаллокации, не источник истины для парсинга:
//!   каждое поле самоограничено своей фиксированной шириной.
//! - Ёмкости (max_*) в заголовке сверяются с ёмкостями читающей стороны строго
//!   на равенство; образ не переносим между сборками с другими лимитами.

/// 4-байтовая магия образа.
pub const IMAGE_MAGIC: &[u8; 4] = b"CRN1";

/// Версия формата образа. Несовпадение — жёсткая несовместимость, без авто-апгрейда.
pub const FORMAT_VERSION: u16 = 1;

/// Размер заголовка на носителе (зависит от фичи `crc32`).
pub const HEADER_BYTES: usize = if cfg!(feature = "crc32") { 30 } else { 26 };

// ---------- Смещения полей заголовка ----------
pub const OFF_MAGIC: usize = 0;
pub const OFF_VERSION: usize = 4;
pub const OFF_HEADER_BYTES: usize = 6;
pub const OFF_COLUMN_COUNT: usize = 8;
pub const OFF_ROW_COUNT: usize = 10;
pub const OFF_MAX_ROWS: usize = 12;
pub const OFF_MAX_COLS: usize = 14;
pub const OFF_MAX_NAME_LEN: usize = 16;
pub const OFF_MAX_TEXT_LEN: usize = 18;
pub const OFF_HASH_SIZE: usize = 20;
pub const OFF_PAYLOAD_BYTES: usize = 22;
#[cfg(feature = "crc32")]
pub const OFF_PAYLOAD_CRC32: usize = 26;

// ---------- Прочее ----------

/// Размер одной записи row-index (u16 LE).
pub const INDEX_ENTRY_BYTES: usize = 2;
