//! mem — носитель в RAM с фиксированной ёмкостью.
//!
//! Семантика повторяет «голую» флешку: буфер заполнен 0xFF (стёртое
//! состояние), один общий курсор для записи и чтения, выход за ёмкость —
//! ошибка I/O, а не рост буфера. После записи образа курсор перематывается
//! явным `reset()` перед чтением.

use crate::errors::{PersistError, Result};
use crate::storage::Storage;

/// RAM-носитель с фиксированной ёмкостью и общим последовательным курсором.
#[derive(Debug, Clone)]
pub struct MemStorage {
    buf: Vec<u8>,
    pos: usize,
    allow_erase: bool,
}

impl MemStorage {
    /// Пустой (стёртый) носитель ёмкостью `cap` байт, erase поддержан.
    pub fn new(cap: usize) -> Self {
        Self {
            buf: vec![0xFF; cap],
            pos: 0,
            allow_erase: true,
        }
    }

    /// Носитель поверх готовых байт (например, заранее собранного образа).
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            buf: bytes,
            pos: 0,
            allow_erase: true,
        }
    }

    /// Отключить поддержку erase (носитель «только запись/чтение»).
    pub fn without_erase(mut self) -> Self {
        self.allow_erase = false;
        self
    }

    /// Перемотать курсор в начало (чтение только что записанного образа).
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Текущая позиция курсора.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Прямой доступ к байтам — для тестов порчи образа.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl Storage for MemStorage {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let end = self
            .pos
            .checked_add(data.len())
            .ok_or_else(|| PersistError::io("memory storage cursor overflow"))?;
        if end > self.buf.len() {
            return Err(PersistError::io(format!(
                "memory storage capacity exceeded (pos={}, len={}, cap={})",
                self.pos,
                data.len(),
                self.buf.len()
            )));
        }
        self.buf[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(())
    }

    fn read_all(&mut self, buf: &mut [u8]) -> Result<()> {
        let end = self
            .pos
            .checked_add(buf.len())
            .ok_or_else(|| PersistError::io("memory storage cursor overflow"))?;
        if end > self.buf.len() {
            return Err(PersistError::io(format!(
                "memory storage read past end (pos={}, len={}, cap={})",
                self.pos,
                buf.len(),
                self.buf.len()
            )));
        }
        buf.copy_from_slice(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(())
    }

    fn can_erase(&self) -> bool {
        self.allow_erase
    }

    fn erase(&mut self) -> Result<()> {
        if !self.allow_erase {
            return Err(PersistError::unsupported(
                "erase disabled for this memory storage",
            ));
        }
        self.buf.fill(0xFF);
        self.pos = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_back() {
        let mut st = MemStorage::new(16);
        st.write_all(b"abcd").unwrap();
        st.write_all(b"ef").unwrap();
        assert_eq!(st.position(), 6);

        st.reset();
        let mut out = [0u8; 6];
        st.read_all(&mut out).unwrap();
        assert_eq!(&out, b"abcdef");
    }

    #[test]
    fn capacity_overflow_is_io_and_does_not_advance() {
        let mut st = MemStorage::new(4);
        st.write_all(b"abc").unwrap();
        let err = st.write_all(b"xyz").unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
        // Курсор не сдвинулся — можно дописать то, что влезает.
        assert_eq!(st.position(), 3);
        st.write_all(b"z").unwrap();
    }

    #[test]
    fn erase_blanks_and_rewinds() {
        let mut st = MemStorage::new(8);
        st.write_all(b"data").unwrap();
        st.erase().unwrap();
        assert_eq!(st.position(), 0);
        assert!(st.bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn erase_can_be_unsupported() {
        let mut st = MemStorage::new(8).without_erase();
        assert!(!st.can_erase());
        assert!(matches!(st.erase(), Err(PersistError::Unsupported(_))));
    }
}
