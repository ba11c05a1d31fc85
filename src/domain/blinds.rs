// src/domain/blinds.rs

use serde::{Deserialize, Serialize};

/// Тип анте.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnteType {
    /// Без анте.
    None,
    /// Классическое анте с каждого участника раздачи.
    Classic,
    /// Big Blind Ante — анте платит только биг-блайнд.
    BigBlind,
}

/// Множитель страддла относительно большого блайнда.
/// Страддл — добровольная «слепая» ставка UTG до начала торговли.
pub const STRADDLE_MULTIPLIER: u64 = 2;
