use serde::{Deserialize, Serialize};

use crate::domain::{Chips, PlayerId, SeatIndex};

/// Тип действия игрока в торговле.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// Bet на новой улице (когда ещё нет текущей ставки).
    Bet(Chips),
    /// Raise существующей ставки до указанной суммы.
    Raise(Chips),
    /// All-in — поставить весь стек.
    AllIn,
}

/// Конкретное действие игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlayerAction {
    /// Чей это ход (аккаунт в леджере).
    pub account: PlayerId,
    /// В каком месте он сидит (0..max_seats-1).
    pub seat: SeatIndex,
    /// Само действие.
    pub kind: PlayerActionKind,
}
