// src/time_ctrl/mod.rs
//! Контроль времени для commit-reveal окон.
//!
//! Движок не читает часы сам: абсолютное «сейчас» (`Timestamp`) передаёт
//! вызывающая сторона вместе с действием. Здесь только:
//! - правила (`TimeRules`) — длины окон;
//! - `Timestamp` и проверки дедлайнов.

pub mod clock;
pub mod time_rules;

pub use clock::Timestamp;
pub use time_rules::TimeRules;
