//! Интерфейс внешнего фишечного леджера.
//!
//! Леджер — отдельный коллаборатор: меняет базовую валюту на фишки по
//! фиксированному курсу, держит балансы аккаунтов, столов и трежери и
//! делает переводы. Движок зовёт его синхронно и полагается на
//! атомарность: перевод либо прошёл целиком, либо вернул ошибку,
//! и тогда действие стола отклоняется без мутаций.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chips::Chips;
use crate::domain::{PlayerId, TableId};

/// Сумма в базовой валюте (до обмена на фишки).
pub type BaseAmount = u64;

/// Фиксированный курс обмена: фишек за единицу базовой валюты.
pub const CHIPS_PER_BASE_UNIT: u64 = 100;

/// Идентификатор «хранилища» фишек внутри леджера.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StoreId {
    /// Личный счёт аккаунта.
    Account(PlayerId),
    /// Счёт стола: сумма всех стеков + текущий банк.
    Table(TableId),
    /// Трежери: сервисные комиссии и штрафы за таймауты.
    Treasury,
}

/// Ошибки леджера.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Недостаточно средств: нужно {need:?}, доступно {have:?}")]
    InsufficientBalance { need: Chips, have: Chips },

    #[error("Нулевая сумма перевода")]
    ZeroTransfer,
}

/// Контракт леджера, который потребляет движок.
pub trait ChipsLedger {
    /// Купить фишки за базовую валюту по фиксированному курсу.
    /// Зачисляет фишки на счёт аккаунта и возвращает их количество.
    fn buy(&mut self, account: PlayerId, base_amount: BaseAmount) -> Result<Chips, LedgerError>;

    /// Перевести фишки между хранилищами. Либо целиком, либо ошибка.
    fn transfer(&mut self, from: StoreId, to: StoreId, amount: Chips) -> Result<(), LedgerError>;

    /// Текущий баланс хранилища (несуществующее — ноль).
    fn balance(&self, store: StoreId) -> Chips;
}

/// Леджер в памяти — для тестов и dev-CLI.
/// Продовый леджер живёт снаружи; движку достаточно трейта.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedger {
    stores: HashMap<StoreId, Chips>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChipsLedger for InMemoryLedger {
    fn buy(&mut self, account: PlayerId, base_amount: BaseAmount) -> Result<Chips, LedgerError> {
        if base_amount == 0 {
            return Err(LedgerError::ZeroTransfer);
        }
        let chips = Chips(base_amount * CHIPS_PER_BASE_UNIT);
        *self
            .stores
            .entry(StoreId::Account(account))
            .or_insert(Chips::ZERO) += chips;
        Ok(chips)
    }

    fn transfer(&mut self, from: StoreId, to: StoreId, amount: Chips) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroTransfer);
        }

        let have = self.balance(from);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { need: amount, have });
        }

        *self.stores.entry(from).or_insert(Chips::ZERO) -= amount;
        *self.stores.entry(to).or_insert(Chips::ZERO) += amount;
        Ok(())
    }

    fn balance(&self, store: StoreId) -> Chips {
        self.stores.get(&store).copied().unwrap_or(Chips::ZERO)
    }
}
