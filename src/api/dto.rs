use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{HandSummary, Street};
use crate::domain::seat::SeatStatus;
use crate::domain::{PlayerId, TableId};
use crate::engine::game_loop::HandPhase;
use crate::time_ctrl::Timestamp;

/// DTO одного места за столом.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeatDto {
    pub account: PlayerId,
    pub seat_index: u8,
    pub stack: Chips,
    pub street_bet: Chips,
    pub status: SeatStatus,
    pub pending_leave: bool,
    /// Зафиксирован ли коммит карт в текущей раздаче.
    pub committed: bool,
    /// Вскрытые карты — видны всем после вскрытия.
    pub revealed_cards: Option<Vec<Card>>,
}

/// DTO стола.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableViewDto {
    pub table_id: TableId,
    pub name: String,
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub allow_straddle: bool,
    pub street: Street,
    pub dealer_button: Option<u8>,
    pub total_pot: Chips,
    pub board: Vec<Card>,
    pub seats: Vec<SeatDto>,
    pub paused: bool,
    /// Есть ли активная раздача.
    pub hand_in_progress: bool,
    /// Фаза раздачи (если она идёт).
    pub phase: Option<HandPhase>,
    /// Дедлайн текущего окна (коммиты или вскрытия).
    pub window_deadline: Option<Timestamp>,
    /// Текущий игрок, чей ход (во время торговли).
    pub current_actor_seat: Option<u8>,
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CommandResponse {
    /// Успешный результат без доп. данных.
    Ok,

    /// Обновлённое состояние стола.
    TableState(TableViewDto),

    /// Раздача завершена расчётом.
    HandFinished {
        table: TableViewDto,
        summary: HandSummary,
    },

    /// Создан новый стол.
    TableCreated(TableId),
}
