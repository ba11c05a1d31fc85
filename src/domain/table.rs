use serde::{Deserialize, Serialize};

use crate::domain::blinds::AnteType;
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::seat::Seat;
use crate::domain::{HandId, PlayerId, TableId};

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Количество мест по умолчанию.
pub const DEFAULT_MAX_SEATS: u8 = 5;

/// Сервисная комиссия стола в базисных пунктах (30 = 0.3%).
pub const SERVICE_FEE_BPS: u64 = 30;

/// Стейки стола (SB/BB/ante).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante_type: AnteType,
    pub ante: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips, ante_type: AnteType, ante: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
            ante_type,
            ante,
        }
    }
}

/// Конфиг стола: места, стейки, границы бай-ина, страддл, комиссия.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Максимальное количество мест за столом.
    pub max_seats: u8,
    pub stakes: TableStakes,
    /// Разрешён ли страддл от UTG.
    pub allow_straddle: bool,
    /// Границы бай-ина [min, max] в фишках.
    pub min_buyin: Chips,
    pub max_buyin: Chips,
    /// Сервисная комиссия в bps, снимается с банка при расчёте.
    pub fee_bps: u64,
}

/// Основное состояние стола. Живёт между раздачами;
/// состояние конкретной раздачи — в `HandEngine`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub config: TableConfig,

    /// Аккаунт администратора стола (создатель): pause/resume/abort.
    pub admin: PlayerId,

    /// Места за столом: индекс вектора = SeatIndex. None — место пустое.
    pub seats: Vec<Option<Seat>>,

    /// Общие карты борда (0–5 карт).
    pub board: Vec<Card>,

    /// Индекс дилерской кнопки или None, если раздача ещё не начиналась.
    pub dealer_button: Option<SeatIndex>,

    /// «Мёртвая кнопка»: место, освободившееся между раздачами, на котором
    /// кнопка должна простоять одну раздачу ради честной ротации блайндов.
    pub dead_button: Option<SeatIndex>,

    /// Стол на паузе: принимаются только resume и emergency abort.
    pub paused: bool,

    /// ID текущей раздачи (если она идёт).
    pub current_hand_id: Option<HandId>,

    /// Текущая улица раздачи.
    pub street: Street,

    /// Идёт ли сейчас раздача.
    pub hand_in_progress: bool,

    /// Общий размер банка (детализация по сайд-потам — работа engine::pot).
    pub total_pot: Chips,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, name: String, admin: PlayerId, config: TableConfig) -> Self {
        let seats = vec![None; config.max_seats as usize];
        Self {
            id,
            name,
            config,
            admin,
            seats,
            board: Vec::new(),
            dealer_button: None,
            dead_button: None,
            paused: false,
            current_hand_id: None,
            street: Street::Preflop,
            hand_in_progress: false,
            total_pot: Chips::ZERO,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.is_none())
            .unwrap_or(true)
    }

    pub fn seat(&self, index: SeatIndex) -> Option<&Seat> {
        self.seats.get(index as usize).and_then(|s| s.as_ref())
    }

    pub fn seat_mut(&mut self, index: SeatIndex) -> Option<&mut Seat> {
        self.seats.get_mut(index as usize).and_then(|s| s.as_mut())
    }

    /// Сидит ли данный аккаунт уже за столом.
    pub fn is_account_seated(&self, account: PlayerId) -> bool {
        self.seats
            .iter()
            .filter_map(|s| s.as_ref())
            .any(|s| s.account == account)
    }

    /// Сколько мест готово участвовать в новой раздаче
    /// (не sit out и с ненулевым стеком).
    pub fn ready_count(&self) -> usize {
        self.seats
            .iter()
            .filter_map(|s| s.as_ref())
            .filter(|s| !matches!(s.status, crate::domain::SeatStatus::SittingOut))
            .filter(|s| !s.stack.is_zero())
            .count()
    }
}
