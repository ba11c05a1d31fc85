//! Доменная модель: карты, фишки, места, стол, раздача.

pub mod blinds;
pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod seat;
pub mod table;

// Базовые идентификаторы. PlayerId — это id аккаунта во внешнем леджере фишек.
pub type PlayerId = u64;
pub type TableId = u64;
pub type HandId = u64;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use blinds::*;
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use seat::*;
pub use table::*;
