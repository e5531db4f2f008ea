//! checksum — потоковый CRC32 (IEEE 802.3, reflected) поверх байтовых спанов.
//!
//! Аккумулятор ассоциативен по спанам: CRC от конкатенации равен CRC,
//! набранному любым числом `update`-вызовов. Именно это свойство позволяет
//! считать контрольную сумму schema+index+payload, не материализуя поток.
//!
//! Весь модуль существует только с фичей `crc32` (см. lib.rs).

use crc32fast::Hasher;

/// Потоковый CRC32-аккумулятор. Локален для одного прохода пайплайна,
/// между пайплайнами не разделяется.
#[derive(Clone)]
pub struct Crc32 {
    hasher: Hasher,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    pub fn new() -> Self {
        Self {
            hasher: Hasher::new(),
        }
    }

    /// Добавить очередной спан. Порядок вызовов определяет итоговое значение.
    #[inline]
    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Финальное значение CRC32.
    pub fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}
