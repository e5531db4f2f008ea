//! flash — адаптер Storage поверх низкоуровневых хуков flash/EEPROM.
//!
//! Адаптер отображает последовательный курсор на фиксированный регион
//! [base, base + region_len): каждый вызов считает addr = base + cursor,
//! проверяет границы региона (отказ вместо переполнения) и двигает курсор
//! только при успехе хука. erase стирает весь регион и возвращает курсор
//! в ноль; создание адаптера и `reset()` тоже обнуляют курсор — первая
//! операция после инициализации всегда попадает в offset 0 региона.
//!
//! Хуки возвращают bool в духе HAL-драйверов: false — отказ железа,
//! адаптер превращает его в ошибку I/O. Выравнивание/word-write правила
//! программирования — забота реализации хуков.

use crate::errors::{PersistError, Result};
use crate::storage::Storage;

/// Низкоуровневые операции флеш-драйвера, поставляются платформой.
pub trait FlashHooks {
    /// Стереть регион [base, base + len). true при успехе.
    fn erase_region(&mut self, base: u64, len: usize) -> bool;

    /// Запрограммировать байты по абсолютному адресу. true при успехе.
    fn program(&mut self, addr: u64, data: &[u8]) -> bool;

    /// Прочитать байты по абсолютному адресу. true при успехе.
    fn read(&mut self, addr: u64, out: &mut [u8]) -> bool;
}

/// Storage поверх `FlashHooks` с внутренним байтовым курсором.
///
/// Один адаптер монопольно владеет своим регионом: алиасинг региона двумя
/// адаптерами не поддерживается.
#[derive(Debug)]
pub struct FlashStorage<H: FlashHooks> {
    hooks: H,
    base: u64,
    region_len: usize,
    cursor: usize,
}

impl<H: FlashHooks> FlashStorage<H> {
    pub fn new(hooks: H, base: u64, region_len: usize) -> Self {
        Self {
            hooks,
            base,
            region_len,
            cursor: 0,
        }
    }

    /// Повторная инициализация: курсор в ноль, даже если прошлая сессия
    /// оставила его не нулевым.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn region_len(&self) -> usize {
        self.region_len
    }

    /// Вернуть хуки (разбор адаптера).
    pub fn into_hooks(self) -> H {
        self.hooks
    }

    fn span_addr(&self, len: usize) -> Result<u64> {
        let end = self
            .cursor
            .checked_add(len)
            .ok_or_else(|| PersistError::io("flash cursor overflow"))?;
        if end > self.region_len {
            return Err(PersistError::io(format!(
                "flash access out of region (cursor={}, len={}, region={})",
                self.cursor, len, self.region_len
            )));
        }
        Ok(self.base + self.cursor as u64)
    }
}

impl<H: FlashHooks> Storage for FlashStorage<H> {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let addr = self.span_addr(data.len())?;
        if !self.hooks.program(addr, data) {
            return Err(PersistError::io(format!(
                "flash program failed at addr {:#x} ({} bytes)",
                addr,
                data.len()
            )));
        }
        self.cursor += data.len();
        Ok(())
    }

    fn read_all(&mut self, buf: &mut [u8]) -> Result<()> {
        let addr = self.span_addr(buf.len())?;
        if !self.hooks.read(addr, buf) {
            return Err(PersistError::io(format!(
                "flash read failed at addr {:#x} ({} bytes)",
                addr,
                buf.len()
            )));
        }
        self.cursor += buf.len();
        Ok(())
    }

    fn can_erase(&self) -> bool {
        true
    }

    fn erase(&mut self) -> Result<()> {
        // Курсор обнуляется даже при отказе стирания: следующая попытка
        // начнётся с начала региона.
        self.cursor = 0;
        if !self.hooks.erase_region(self.base, self.region_len) {
            return Err(PersistError::io("flash erase_region failed"));
        }
        Ok(())
    }
}
