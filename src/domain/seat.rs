use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Статус места в контексте текущей раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeatStatus {
    /// Место активно в текущей раздаче.
    Active,
    /// Место сфолдило и больше не претендует на банк.
    Folded,
    /// Место в олл-ине — фишек на дальнейшие ставки нет.
    AllIn,
    /// Игрок сидит за столом, но в раздачах не участвует (sit out).
    SittingOut,
}

/// Занятое место за столом. Пустые места — `None` в `Table::seats`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    /// Аккаунт игрока во внешнем леджере.
    pub account: PlayerId,
    /// Текущий стек за столом.
    pub stack: Chips,
    /// Ставка на текущей улице (обнуляется при переходе улиц).
    pub street_bet: Chips,
    pub status: SeatStatus,
    /// Игрок попросил освободить место после текущей раздачи.
    pub pending_leave: bool,
}

impl Seat {
    pub fn new(account: PlayerId, stack: Chips) -> Self {
        Self {
            account,
            stack,
            street_bet: Chips::ZERO,
            status: SeatStatus::Active,
            pending_leave: false,
        }
    }

    /// Участвует ли место в раздаче (претендует на банк).
    pub fn is_in_hand(&self) -> bool {
        matches!(self.status, SeatStatus::Active | SeatStatus::AllIn)
    }
}
