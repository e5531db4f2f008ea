//! Column types and cell values.
//!
//! Goals:
//! - Stable, explicit on-disk type tags (never a Rust enum discriminant left
//!   to the compiler) so images stay readable across toolchains.
//! - One table-driven place for per-type cell widths and persistability,
//!   shared by the save and load pipelines.

use std::fmt;

use crate::config::TableLimits;

/// Type of a table column. The u8 code is the on-disk schema tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 32-bit signed integer.
    Int = 1,
    /// Boolean, one byte on the wire.
    Bool = 2,
    /// 32-bit IEEE-754 float.
    Float = 3,
    /// 64-bit IEEE-754 double.
    Double = 4,
    /// Fixed-capacity text, zero-padded to `max_text_len` bytes.
    Text = 5,
    /// Opaque in-process reference. Never persistable: the value is
    /// meaningless outside the producing process.
    Ref = 6,
}

impl ColumnType {
    /// Convert to the compact u8 tag for on-disk storage.
    pub fn to_tag(self) -> u8 {
        self as u8
    }

    /// Parse from the on-disk tag. Unknown tags return None.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(ColumnType::Int),
            2 => Some(ColumnType::Bool),
            3 => Some(ColumnType::Float),
            4 => Some(ColumnType::Double),
            5 => Some(ColumnType::Text),
            6 => Some(ColumnType::Ref),
            _ => None,
        }
    }

    /// Whether values of this type are reconstructible outside the
    /// producing process.
    pub fn is_persistable(self) -> bool {
        !matches!(self, ColumnType::Ref)
    }

    /// On-disk width of one cell of this type, bytes.
    /// Ref has no wire representation and reports 0.
    pub fn cell_width(self, limits: &TableLimits) -> usize {
        match self {
            ColumnType::Int => 4,
            ColumnType::Bool => 1,
            ColumnType::Float => 4,
            ColumnType::Double => 8,
            ColumnType::Text => limits.max_text_len as usize,
            ColumnType::Ref => 0,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Int => "int",
            ColumnType::Bool => "bool",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::Text => "text",
            ColumnType::Ref => "ref",
        };
        f.write_str(s)
    }
}

/// One column descriptor: order inside the schema defines column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub ty: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Bool(bool),
    Float(f32),
    Double(f64),
    Text(String),
}

impl Value {
    /// The column type this value belongs to.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Int(_) => ColumnType::Int,
            Value::Bool(_) => ColumnType::Bool,
            Value::Float(_) => ColumnType::Float,
            Value::Double(_) => ColumnType::Double,
            Value::Text(_) => ColumnType::Text,
        }
    }
}

/// Truncate a string to at most `max` bytes without splitting a UTF-8
/// character. Returns the (possibly shortened) prefix.
pub(crate) fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip() {
        for ty in [
            ColumnType::Int,
            ColumnType::Bool,
            ColumnType::Float,
            ColumnType::Double,
            ColumnType::Text,
            ColumnType::Ref,
        ] {
            assert_eq!(ColumnType::from_tag(ty.to_tag()), Some(ty));
        }
        assert_eq!(ColumnType::from_tag(0), None);
        assert_eq!(ColumnType::from_tag(200), None);
    }

    #[test]
    fn only_ref_is_not_persistable() {
        assert!(ColumnType::Int.is_persistable());
        assert!(ColumnType::Text.is_persistable());
        assert!(!ColumnType::Ref.is_persistable());
    }

    #[test]
    fn cell_widths() {
        let lim = TableLimits::default().with_max_text_len(24);
        assert_eq!(ColumnType::Int.cell_width(&lim), 4);
        assert_eq!(ColumnType::Bool.cell_width(&lim), 1);
        assert_eq!(ColumnType::Float.cell_width(&lim), 4);
        assert_eq!(ColumnType::Double.cell_width(&lim), 8);
        assert_eq!(ColumnType::Text.cell_width(&lim), 24);
    }

    #[test]
    fn utf8_truncation_respects_boundaries() {
        assert_eq!(truncate_utf8("abcdef", 4), "abcd");
        // 'я' is 2 bytes; cutting mid-char must back off
        assert_eq!(truncate_utf8("доза", 5), "до");
        assert_eq!(truncate_utf8("short", 32), "short");
    }
}
