use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::ledger::LedgerError;

use thiserror::Error;

/// Ошибки движка. Любая ошибка означает, что действие отклонено
/// целиком и состояние стола не изменилось.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("В этом месте нет игрока")]
    EmptySeat,

    #[error("Место {0} уже занято")]
    SeatTaken(SeatIndex),

    #[error("Аккаунт {0} уже сидит за этим столом")]
    AlreadySeated(PlayerId),

    #[error("Бай-ин вне допустимых границ стола")]
    BuyInOutOfRange,

    #[error("Недостаточно активных игроков для раздачи")]
    NotEnoughPlayers,

    #[error("Раздача уже идёт")]
    HandAlreadyInProgress,

    #[error("Раздача не активна")]
    NoActiveHand,

    #[error("Стол на паузе")]
    TablePaused,

    #[error("Сейчас не ход аккаунта {0}")]
    NotPlayersTurn(PlayerId),

    #[error("Недопустимое действие в текущем состоянии раздачи")]
    IllegalAction,

    #[error("Недостаточно фишек для этой ставки")]
    NotEnoughChips,

    #[error("Размер рейза слишком мал")]
    RaiseTooSmall,

    #[error("Нужна положительная сумма")]
    ZeroAmount,

    #[error("Невозможно выполнить check — нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call — нет ставки для уравнивания")]
    CannotCall,

    #[error("Операция доступна только администратору стола")]
    NotAuthorized,

    #[error("Окно коммитов уже закрыто")]
    CommitWindowClosed,

    #[error("Место {0} уже закоммитило карты")]
    AlreadyCommitted(SeatIndex),

    #[error("Место {0} не коммитило карты")]
    NotCommitted(SeatIndex),

    #[error("Вскрытие не совпадает с коммитом")]
    RevealMismatch,

    #[error("Дедлайн ещё не наступил")]
    DeadlineNotReached,

    #[error("Дедлайн уже прошёл")]
    DeadlinePassed,

    #[error("Ошибка леджера: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
