//! persist — сериализация образа таблицы и его восстановление.
//!
//! Образ (см. layout в `consts`) пишется строго последовательно: носитель
//! нельзя перемотать, поэтому контрольная сумма, попадающая в заголовок,
//! набирается отдельным checksum-проходом по тем же логическим байтам до
//! первого write (см. `save`). Load — зеркальный одиночный проход с
//! проверкой суммы в конце.
//!
//! Жизненный цикл: один save порождает образ целиком, один load целиком его
//! потребляет; in-place обновлений нет — любая мутация это erase + перезапись.

pub mod estimate;
pub mod header;
pub mod load;
pub mod row;
pub mod save;
pub mod schema;

pub use estimate::estimate_max_bytes;
pub use header::ImageHeader;
pub use load::load_table;
pub use save::save_table;
