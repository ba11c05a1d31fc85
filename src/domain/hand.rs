use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{HandId, PlayerId, TableId};

/// Улица раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

/// Ранг руки — упакованный u32, см. eval::hand_rank.
/// Сравнение по числу совпадает со сравнением рук.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandRank(pub u32);

/// Результат конкретного места в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatHandResult {
    pub account: PlayerId,
    pub seat: u8,
    /// Итоговый ранг руки (если место дошло до шоудауна и вскрылось).
    pub rank: Option<HandRank>,
    /// Сколько фишек место получило из банков (0 — ничего).
    pub won: Chips,
    /// Является ли место победителем хотя бы одного банка (включая сплит).
    pub is_winner: bool,
}

/// Краткое описание завершённой раздачи.
/// Это всё, что переживает `HandEngine`: сам движок очищается при расчёте.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandSummary {
    pub hand_id: HandId,
    pub table_id: TableId,
    pub street_reached: Street,
    pub board: Vec<Card>,
    pub total_pot: Chips,
    /// Сервисная комиссия, уплаченная в трежери из банка.
    pub fee_paid: Chips,
    pub results: Vec<SeatHandResult>,
}
