// src/time_ctrl/clock.rs
//! Абсолютное время в секундах. Источник — вызывающая сторона.

use serde::{Deserialize, Serialize};

/// Момент времени (unix-секунды или любой монотонный счётчик —
/// движку важен только порядок и разности).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Timestamp(secs)
    }

    /// Сдвиг вперёд на `secs` секунд (дедлайн от «сейчас»).
    pub fn plus_secs(self, secs: u32) -> Timestamp {
        Timestamp(self.0.saturating_add(secs as u64))
    }

    /// Прошёл ли дедлайн `deadline` к моменту `self`.
    /// Ровно в момент дедлайна действие ещё разрешено.
    pub fn is_past(self, deadline: Timestamp) -> bool {
        self.0 > deadline.0
    }
}
