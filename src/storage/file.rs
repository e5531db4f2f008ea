//! file — последовательный файловый носитель.
//!
//! Два режима:
//! - запись: create/truncate, erase = truncate до нуля + перемотка;
//! - чтение: erase не поддержан, write_all — ошибка Invalid (не I/O:
//!   это ошибка программирования вызывающего, а не сбой носителя).
//!
//! Долговечность: по желанию вызывающего `sync()` после успешного save
//! (fsync файла; сам пайплайн fsync не делает).

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::errors::{PersistError, Result};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Read,
    Write,
}

/// Файловый носитель с последовательным курсором (позиция файла).
#[derive(Debug)]
pub struct FileStorage {
    file: File,
    mode: Mode,
}

impl FileStorage {
    /// Открыть файл под запись образа (создаёт/обнуляет).
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path.as_ref())?;
        Ok(Self {
            file,
            mode: Mode::Write,
        })
    }

    /// Открыть существующий образ на чтение.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().read(true).open(path.as_ref())?;
        Ok(Self {
            file,
            mode: Mode::Read,
        })
    }

    /// fsync записанного образа (вызывать после успешного save).
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        if self.mode != Mode::Write {
            return Err(PersistError::invalid(
                "file storage opened read-only, write_all rejected",
            ));
        }
        self.file.write_all(data)?;
        Ok(())
    }

    fn read_all(&mut self, buf: &mut [u8]) -> Result<()> {
        self.file.read_exact(buf)?;
        Ok(())
    }

    fn can_erase(&self) -> bool {
        self.mode == Mode::Write
    }

    fn erase(&mut self) -> Result<()> {
        if self.mode != Mode::Write {
            return Err(PersistError::unsupported(
                "erase unsupported for read-only file storage",
            ));
        }
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.crn");

        {
            let mut st = FileStorage::create(&path).unwrap();
            assert!(st.can_erase());
            st.erase().unwrap();
            st.write_all(b"hello image").unwrap();
            st.sync().unwrap();
        }

        let mut st = FileStorage::open(&path).unwrap();
        assert!(!st.can_erase());
        let mut out = [0u8; 11];
        st.read_all(&mut out).unwrap();
        assert_eq!(&out, b"hello image");

        // Чтение за концом файла — I/O.
        let mut more = [0u8; 1];
        assert!(matches!(st.read_all(&mut more), Err(PersistError::Io(_))));
    }

    #[test]
    fn write_into_readonly_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ro.crn");
        std::fs::write(&path, b"x").unwrap();

        let mut st = FileStorage::open(&path).unwrap();
        assert!(matches!(
            st.write_all(b"nope"),
            Err(PersistError::Invalid(_))
        ));
        assert!(matches!(st.erase(), Err(PersistError::Unsupported(_))));
    }
}
