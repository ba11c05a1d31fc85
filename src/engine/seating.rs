//! Управление местами: посадка с бай-ином через леджер, sit out / sit in,
//! отложенный уход. Все проверки — до первой мутации.

use log::info;

use crate::domain::seat::{Seat, SeatStatus};
use crate::domain::{PlayerId, SeatIndex, Table};
use crate::engine::errors::EngineError;
use crate::engine::positions::next_occupied_seat;
use crate::ledger::{ChipsLedger, StoreId};
use crate::domain::chips::Chips;

/// Посадить аккаунт на место с бай-ином.
///
/// Бай-ин должен попадать в границы стола, место — быть пустым, аккаунт —
/// ещё не сидеть за столом. Фишки переводятся со счёта аккаунта на счёт
/// стола; неуспех перевода отклоняет посадку целиком.
pub fn join_table<L: ChipsLedger>(
    table: &mut Table,
    ledger: &mut L,
    account: PlayerId,
    seat_index: SeatIndex,
    buy_in: Chips,
) -> Result<(), EngineError> {
    if table.paused {
        return Err(EngineError::TablePaused);
    }
    if seat_index >= table.max_seats() {
        return Err(EngineError::InvalidSeat(seat_index));
    }
    if !table.is_seat_empty(seat_index) {
        return Err(EngineError::SeatTaken(seat_index));
    }
    if table.is_account_seated(account) {
        return Err(EngineError::AlreadySeated(account));
    }
    if buy_in < table.config.min_buyin || buy_in > table.config.max_buyin {
        return Err(EngineError::BuyInOutOfRange);
    }

    // Единственная внешняя мутация; при ошибке состояние стола не тронуто.
    ledger.transfer(StoreId::Account(account), StoreId::Table(table.id), buy_in)?;

    let mut seat = Seat::new(account, buy_in);
    // Посадка во время раздачи не делает место её участником:
    // оно садится как sit out и входит в игру через sit_in между раздачами.
    if table.hand_in_progress {
        seat.status = SeatStatus::SittingOut;
    }
    table.seats[seat_index as usize] = Some(seat);

    info!(
        "table {}: account {} sat at seat {} (buy-in {})",
        table.id, account, seat_index, buy_in.0
    );

    Ok(())
}

/// Отметить место как sit out. Во время раздачи разрешено только местам,
/// которые в ней уже не участвуют.
pub fn sit_out(table: &mut Table, seat_index: SeatIndex) -> Result<(), EngineError> {
    let in_progress = table.hand_in_progress;
    let seat = table
        .seat_mut(seat_index)
        .ok_or(EngineError::EmptySeat)?;

    if in_progress && seat.is_in_hand() {
        return Err(EngineError::IllegalAction);
    }

    seat.status = SeatStatus::SittingOut;
    Ok(())
}

/// Вернуть место в игру. Во время раздачи запрещено: участники текущей
/// раздачи зафиксированы на её старте.
pub fn sit_in(table: &mut Table, seat_index: SeatIndex) -> Result<(), EngineError> {
    if table.hand_in_progress {
        return Err(EngineError::IllegalAction);
    }

    let seat = table
        .seat_mut(seat_index)
        .ok_or(EngineError::EmptySeat)?;

    if !matches!(seat.status, SeatStatus::SittingOut) {
        return Err(EngineError::IllegalAction);
    }

    seat.status = SeatStatus::Active;
    Ok(())
}

/// Запланировать уход: место освободится при следующем `start_hand`.
/// Если раздачи нет — уходим сразу.
pub fn leave_after_hand<L: ChipsLedger>(
    table: &mut Table,
    ledger: &mut L,
    seat_index: SeatIndex,
) -> Result<(), EngineError> {
    {
        let seat = table
            .seat_mut(seat_index)
            .ok_or(EngineError::EmptySeat)?;
        seat.pending_leave = true;
    }

    if !table.hand_in_progress {
        process_pending_leaves(table, ledger)?;
    }

    Ok(())
}

/// Освободить все места с pending_leave: вернуть стек на счёт аккаунта
/// и пометить «мёртвую кнопку», если уходит место с кнопкой или
/// следующее за ней. Вызывается между раздачами (из `start_hand` и из
/// немедленного ухода).
pub fn process_pending_leaves<L: ChipsLedger>(
    table: &mut Table,
    ledger: &mut L,
) -> Result<(), EngineError> {
    let due_button = table
        .dealer_button
        .and_then(|b| next_occupied_seat(table, b, false));

    for idx in 0..table.max_seats() {
        let leaving = match table.seat(idx) {
            Some(seat) if seat.pending_leave => (seat.account, seat.stack),
            _ => continue,
        };
        let (account, stack) = leaving;

        if !stack.is_zero() {
            ledger.transfer(StoreId::Table(table.id), StoreId::Account(account), stack)?;
        }

        if table.dealer_button == Some(idx) || due_button == Some(idx) {
            table.dead_button = Some(idx);
        }

        table.seats[idx as usize] = None;

        info!("table {}: account {} left seat {}", table.id, account, idx);
    }

    Ok(())
}
