use serde::{Deserialize, Serialize};

use crate::domain::blinds::AnteType;
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{SeatIndex, TableId};
use crate::engine::actions::PlayerAction;
use crate::engine::commitment::CommitHash;

/// Команда верхнего уровня. Одна команда — одно внешнее действие;
/// диспетчер разбирает её единственным исчерпывающим match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Создать новый стол.
    CreateTable(CreateTableCommand),

    /// Операция над существующим столом.
    TableCommand(TableCommand),
}

/// Команда создания стола. Вызывающий становится администратором.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTableCommand {
    /// Идентификатор нового стола.
    pub table_id: TableId,
    /// Имя стола (для лобби).
    pub name: String,
    /// Количество мест (по умолчанию 5).
    pub max_seats: u8,
    /// Блайнды / анте.
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub ante_type: AnteType,
    /// Разрешён ли страддл от UTG.
    pub allow_straddle: bool,
    /// Границы бай-ина.
    pub min_buyin: Chips,
    pub max_buyin: Chips,
}

/// Команды, относящиеся к существующему столу.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TableCommand {
    /// Посадить аккаунт на место с бай-ином.
    JoinTable {
        table_id: TableId,
        seat_index: SeatIndex,
        buy_in: Chips,
    },

    /// Временно выйти из раздач, не освобождая место.
    SitOut {
        table_id: TableId,
        seat_index: SeatIndex,
    },

    /// Вернуться в раздачи.
    SitIn {
        table_id: TableId,
        seat_index: SeatIndex,
    },

    /// Освободить место после текущей раздачи (стек вернётся на счёт).
    LeaveAfterHand {
        table_id: TableId,
        seat_index: SeatIndex,
    },

    /// Запустить новую раздачу.
    StartHand { table_id: TableId },

    /// Страддл от UTG до открытия торговли.
    PostStraddle {
        table_id: TableId,
        seat_index: SeatIndex,
    },

    /// Коммит карманных карт.
    CommitCards {
        table_id: TableId,
        seat_index: SeatIndex,
        hash: CommitHash,
    },

    /// Вскрытие карманных карт.
    RevealCards {
        table_id: TableId,
        seat_index: SeatIndex,
        cards: Vec<Card>,
        nonce: u64,
    },

    /// Действие игрока в торговле.
    PlayerAction {
        table_id: TableId,
        action: PlayerAction,
    },

    /// Таймаут-клейм против просрочившего места. Доступен любому.
    ClaimTimeout {
        table_id: TableId,
        target_seat: SeatIndex,
    },

    /// Пауза стола (админ).
    Pause { table_id: TableId },

    /// Снять с паузы (админ).
    Resume { table_id: TableId },

    /// Аварийный возврат взносов (админ).
    EmergencyAbort { table_id: TableId },
}
