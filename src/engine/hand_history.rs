use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::PlayerActionKind;
use crate::time_ctrl::Timestamp;

/// Тип события в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum HandEventKind {
    /// Новая раздача началась.
    HandStarted { table_id: TableId, hand_id: HandId },

    /// Кнопка/блайнды/анте.
    BlindsPosted {
        dealer: SeatIndex,
        small_blind: Option<(SeatIndex, Chips)>,
        big_blind: Option<(SeatIndex, Chips)>,
        ante: Vec<(SeatIndex, Chips)>,
    },

    /// UTG поставил страддл.
    StraddlePosted { seat: SeatIndex, amount: Chips },

    /// Открыто окно коммитов карманных карт.
    CommitWindowOpened { deadline: Timestamp },

    /// Место зафиксировало коммит.
    CardsCommitted { seat: SeatIndex },

    /// Все коммиты собраны — торговля открыта.
    BettingOpened,

    /// Действие игрока.
    PlayerActed {
        account: PlayerId,
        seat: SeatIndex,
        action: PlayerActionKind,
        new_stack: Chips,
        pot_after: Chips,
    },

    /// Открыты общие карты на борде.
    BoardDealt { street: Street, cards: Vec<Card> },

    /// Переход на новую улицу.
    StreetChanged { street: Street },

    /// Торговля закрыта, открыто окно вскрытий.
    RevealWindowOpened { deadline: Timestamp },

    /// Место вскрыло карты (хэш сошёлся).
    CardsRevealed { seat: SeatIndex, cards: Vec<Card> },

    /// Таймаут-клейм: принудительный фолд и штраф.
    TimeoutClaimed { seat: SeatIndex, penalty: Chips },

    /// Выплата банка(ов).
    PotAwarded {
        seat: SeatIndex,
        account: PlayerId,
        amount: Chips,
    },

    /// Сервисная комиссия ушла в трежери.
    FeeCharged { amount: Chips },

    /// Аварийный возврат взносов (emergency abort).
    HandAborted { hand_id: HandId },

    /// Раздача завершена.
    HandFinished { hand_id: HandId, table_id: TableId },
}

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Журнал одной раздачи. Живёт вместе с `HandEngine` и умирает при
/// расчёте — долговременной истории ядро не ведёт.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }
}
