//! Кодек ячеек строки: фиксированная ширина на тип, диспетчеризация по
//! `ColumnType` (одна таблица ширин в `ColumnType::cell_width`).
//!
//! int — i32 LE, bool — 1 байт, float/double — IEEE-754 LE, text — поле
//! ширины max_text_len, zero-padded, с усечением по ёмкости. Неперсистуемый
//! тип — жёсткая ошибка на уровне строки, не пропуск.

use byteorder::{ByteOrder, LittleEndian};

use crate::config::TableLimits;
use crate::errors::{PersistError, Result};
use crate::types::{truncate_utf8, ColumnType, Value};

/// Закодировать одну ячейку в свежий буфер её фиксированной ширины.
pub fn encode_cell(value: &Value, ty: ColumnType, limits: &TableLimits) -> Result<Vec<u8>> {
    if value.column_type() != ty {
        return Err(PersistError::invalid(format!(
            "cell value type {} does not match column type {}",
            value.column_type(),
            ty
        )));
    }
    let mut buf = vec![0u8; ty.cell_width(limits)];
    match value {
        Value::Int(v) => LittleEndian::write_i32(&mut buf, *v),
        Value::Bool(v) => buf[0] = u8::from(*v),
        Value::Float(v) => LittleEndian::write_f32(&mut buf, *v),
        Value::Double(v) => LittleEndian::write_f64(&mut buf, *v),
        Value::Text(s) => {
            let s = truncate_utf8(s, limits.max_text_len as usize);
            buf[..s.len()].copy_from_slice(s.as_bytes());
        }
    }
    Ok(buf)
}

/// Разобрать одну ячейку из буфера её фиксированной ширины.
///
/// Текст терминируется принудительно на границе ёмкости: даже без нулевого
/// байта в источнике готовое значение не выйдет за своё поле.
pub fn decode_cell(buf: &[u8], ty: ColumnType, limits: &TableLimits) -> Result<Value> {
    let want = ty.cell_width(limits);
    if buf.len() != want {
        return Err(PersistError::invalid(format!(
            "cell buffer for {} must be {} bytes, got {}",
            ty,
            want,
            buf.len()
        )));
    }
    let v = match ty {
        ColumnType::Int => Value::Int(LittleEndian::read_i32(buf)),
        ColumnType::Bool => Value::Bool(buf[0] != 0),
        ColumnType::Float => Value::Float(LittleEndian::read_f32(buf)),
        ColumnType::Double => Value::Double(LittleEndian::read_f64(buf)),
        ColumnType::Text => {
            let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
            Value::Text(String::from_utf8_lossy(&buf[..end]).into_owned())
        }
        ColumnType::Ref => {
            return Err(PersistError::unsupported(
                "ref cells have no wire representation",
            ))
        }
    };
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> TableLimits {
        TableLimits::default().with_max_text_len(8)
    }

    #[test]
    fn fixed_widths_and_roundtrip() {
        let lim = limits();
        let cases = [
            (Value::Int(-123_456), ColumnType::Int, 4usize),
            (Value::Bool(true), ColumnType::Bool, 1),
            (Value::Float(3.5), ColumnType::Float, 4),
            (Value::Double(-2.25), ColumnType::Double, 8),
            (Value::Text("abc".into()), ColumnType::Text, 8),
        ];
        for (v, ty, width) in cases {
            let buf = encode_cell(&v, ty, &lim).unwrap();
            assert_eq!(buf.len(), width, "width for {}", ty);
            let back = decode_cell(&buf, ty, &lim).unwrap();
            assert_eq!(back, v);
        }
    }

    #[test]
    fn int_is_little_endian() {
        let buf = encode_cell(&Value::Int(0x0102_0304), ColumnType::Int, &limits()).unwrap();
        assert_eq!(buf, vec![0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn bool_encodes_one_byte() {
        let lim = limits();
        assert_eq!(encode_cell(&Value::Bool(false), ColumnType::Bool, &lim).unwrap(), vec![0]);
        assert_eq!(encode_cell(&Value::Bool(true), ColumnType::Bool, &lim).unwrap(), vec![1]);
        // Любой ненулевой байт читается как true.
        assert_eq!(
            decode_cell(&[7], ColumnType::Bool, &lim).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn text_truncated_and_padded() {
        let lim = limits();
        let buf = encode_cell(&Value::Text("0123456789".into()), ColumnType::Text, &lim).unwrap();
        assert_eq!(buf, b"01234567".to_vec());
        assert_eq!(
            decode_cell(&buf, ColumnType::Text, &lim).unwrap(),
            Value::Text("01234567".into())
        );

        let buf = encode_cell(&Value::Text("ab".into()), ColumnType::Text, &lim).unwrap();
        assert_eq!(&buf[..2], b"ab");
        assert!(buf[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn unterminated_text_stops_at_capacity() {
        let lim = limits();
        // Все 8 байт значащие, нулевого терминатора нет.
        let back = decode_cell(b"fullfill", ColumnType::Text, &lim).unwrap();
        assert_eq!(back, Value::Text("fullfill".into()));
    }

    #[test]
    fn type_mismatch_is_invalid() {
        let lim = limits();
        assert!(matches!(
            encode_cell(&Value::Int(1), ColumnType::Bool, &lim),
            Err(PersistError::Invalid(_))
        ));
    }
}
