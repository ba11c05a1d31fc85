// src/time_ctrl/time_rules.rs
//! Конфигурация тайминга commit-reveal окон.
//!
//! Здесь только «правила», без состояния и без привязки к конкретному столу.

use serde::{Deserialize, Serialize};

/// Правила тайминга для одного стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRules {
    /// Сколько секунд даётся на коммит карманных карт после старта раздачи.
    pub commit_window_secs: u32,
    /// Сколько секунд даётся на вскрытие после закрытия торговли.
    pub reveal_window_secs: u32,
}

impl TimeRules {
    /// Строгий конструктор.
    pub const fn new(commit_window_secs: u32, reveal_window_secs: u32) -> Self {
        Self {
            commit_window_secs,
            reveal_window_secs,
        }
    }

    /// Стандартный профиль: 30 сек на коммит, 60 сек на вскрытие.
    pub const fn standard() -> Self {
        Self {
            commit_window_secs: 30,
            reveal_window_secs: 60,
        }
    }
}
