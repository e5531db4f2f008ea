//! Кодек схемы: по одной записи фиксированной ширины на колонку.
//!
//! Запись = [name: max_name_len B, zero-padded][type_tag: u8]. Имя может
//! занять поле целиком без нулевого терминатора; декодер жёстко
//! останавливается на границе поля. Неизвестный или неперсистуемый тег —
//! отказ сразу, частично принятой схемы не бывает.

use crate::config::TableLimits;
use crate::errors::{PersistError, Result};
use crate::types::{truncate_utf8, ColumnSpec, ColumnType};

/// Ширина одной записи схемы на носителе.
pub fn entry_bytes(limits: &TableLimits) -> usize {
    limits.max_name_len as usize + 1
}

/// Закодировать запись схемы в буфер длиной `entry_bytes(limits)`.
pub fn encode_entry(col: &ColumnSpec, limits: &TableLimits, buf: &mut [u8]) -> Result<()> {
    let name_len = limits.max_name_len as usize;
    if buf.len() != name_len + 1 {
        return Err(PersistError::invalid(format!(
            "schema entry buffer must be {} bytes, got {}",
            name_len + 1,
            buf.len()
        )));
    }
    buf.fill(0);
    let name = truncate_utf8(&col.name, name_len);
    buf[..name.len()].copy_from_slice(name.as_bytes());
    buf[name_len] = col.ty.to_tag();
    Ok(())
}

/// Разобрать запись схемы. Тег проверяется на принадлежность к
/// персистуемому набору до какого-либо дальнейшего разбора.
pub fn decode_entry(buf: &[u8], limits: &TableLimits) -> Result<ColumnSpec> {
    let name_len = limits.max_name_len as usize;
    if buf.len() != name_len + 1 {
        return Err(PersistError::invalid(format!(
            "schema entry buffer must be {} bytes, got {}",
            name_len + 1,
            buf.len()
        )));
    }
    let tag = buf[name_len];
    let ty = ColumnType::from_tag(tag)
        .ok_or_else(|| PersistError::unsupported(format!("unknown column type tag {}", tag)))?;
    if !ty.is_persistable() {
        return Err(PersistError::unsupported(format!(
            "column type {} is not persistable",
            ty
        )));
    }

    // Принудительная терминация на границе поля: имя — до первого нуля
    // либо всё поле целиком.
    let name_bytes = &buf[..name_len];
    let end = name_bytes.iter().position(|&b| b == 0).unwrap_or(name_len);
    let name = String::from_utf8_lossy(&name_bytes[..end]).into_owned();

    Ok(ColumnSpec { name, ty })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_roundtrip() {
        let limits = TableLimits::default().with_max_name_len(8);
        let col = ColumnSpec::new("speed", ColumnType::Float);
        let mut buf = vec![0u8; entry_bytes(&limits)];
        encode_entry(&col, &limits, &mut buf).unwrap();

        assert_eq!(&buf[..5], b"speed");
        assert!(buf[5..8].iter().all(|&b| b == 0));
        assert_eq!(buf[8], ColumnType::Float.to_tag());

        let back = decode_entry(&buf, &limits).unwrap();
        assert_eq!(back, col);
    }

    #[test]
    fn long_name_truncated_and_unterminated() {
        let limits = TableLimits::default().with_max_name_len(4);
        let col = ColumnSpec::new("temperature", ColumnType::Int);
        let mut buf = vec![0u8; entry_bytes(&limits)];
        encode_entry(&col, &limits, &mut buf).unwrap();

        // Имя заполняет поле без терминатора.
        assert_eq!(&buf[..4], b"temp");
        let back = decode_entry(&buf, &limits).unwrap();
        assert_eq!(back.name, "temp");
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        let limits = TableLimits::default();
        let mut buf = vec![0u8; entry_bytes(&limits)];
        buf[limits.max_name_len as usize] = 0xEE;
        assert!(matches!(
            decode_entry(&buf, &limits),
            Err(PersistError::Unsupported(_))
        ));
    }

    #[test]
    fn ref_tag_is_unsupported() {
        let limits = TableLimits::default();
        let mut buf = vec![0u8; entry_bytes(&limits)];
        buf[..3].copy_from_slice(b"ptr");
        buf[limits.max_name_len as usize] = ColumnType::Ref.to_tag();
        assert!(matches!(
            decode_entry(&buf, &limits),
            Err(PersistError::Unsupported(_))
        ));
    }
}
