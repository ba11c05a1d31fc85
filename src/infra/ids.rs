use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{HandId, PlayerId, TableId};

/// Простая генерация ID на основе монотонных счётчиков.
/// Удобно для локальных тестов и dev-CLI; в проде ID обычно
/// приходят из внешнего контекста (аккаунты — из леджера).
#[derive(Debug)]
pub struct IdGenerator {
    table_counter: AtomicU64,
    account_counter: AtomicU64,
    hand_counter: AtomicU64,
}

impl IdGenerator {
    /// Создать генератор с начальным значением 1 для всех сущностей.
    pub fn new() -> Self {
        Self {
            table_counter: AtomicU64::new(1),
            account_counter: AtomicU64::new(1),
            hand_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_table_id(&self) -> TableId {
        self.table_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_account_id(&self) -> PlayerId {
        self.account_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_hand_id(&self) -> HandId {
        self.hand_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
