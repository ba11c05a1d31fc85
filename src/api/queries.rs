use serde::{Deserialize, Serialize};

use crate::domain::table::Table;
use crate::domain::{SeatIndex, TableId};
use crate::engine::game_loop::{HandEngine, HandPhase};

use super::dto::{SeatDto, TableViewDto};

/// Запросы «только чтение».
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Состояние стола.
    GetTableInfo { table_id: TableId },

    /// Состояние одного места.
    GetSeatInfo {
        table_id: TableId,
        seat_index: SeatIndex,
    },

    /// Список столов (для лобби).
    ListTables,
}

/// Результат запроса «только чтение».
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    Table(TableViewDto),
    Seat(SeatDto),
    Tables(Vec<TableViewDto>),
}

/// Сформировать DTO стола на основе `Table` + опционального `HandEngine`.
pub fn build_table_view(table: &Table, engine: Option<&HandEngine>) -> TableViewDto {
    let seats = (0..table.max_seats())
        .filter_map(|idx| build_seat_view(table, engine, idx))
        .collect();

    let window_deadline = engine.and_then(|e| match e.phase {
        HandPhase::Committing => Some(e.commit_deadline),
        HandPhase::Revealing => e.reveal_deadline,
        HandPhase::Betting => None,
    });

    TableViewDto {
        table_id: table.id,
        name: table.name.clone(),
        max_seats: table.max_seats(),
        small_blind: table.config.stakes.small_blind,
        big_blind: table.config.stakes.big_blind,
        ante: table.config.stakes.ante,
        allow_straddle: table.config.allow_straddle,
        street: table.street,
        dealer_button: table.dealer_button,
        total_pot: table.total_pot,
        board: table.board.clone(),
        seats,
        paused: table.paused,
        hand_in_progress: table.hand_in_progress,
        phase: engine.map(|e| e.phase),
        window_deadline,
        current_actor_seat: engine.and_then(|e| e.current_actor),
    }
}

/// DTO одного места (None — место пустое).
pub fn build_seat_view(
    table: &Table,
    engine: Option<&HandEngine>,
    seat_index: SeatIndex,
) -> Option<SeatDto> {
    let seat = table.seat(seat_index)?;

    let committed = engine
        .map(|e| e.commitments.contains_key(&seat_index))
        .unwrap_or(false);
    let revealed_cards = engine.and_then(|e| e.revealed.get(&seat_index).cloned());

    Some(SeatDto {
        account: seat.account,
        seat_index,
        stack: seat.stack,
        street_bet: seat.street_bet,
        status: seat.status,
        pending_leave: seat.pending_leave,
        committed,
        revealed_cards,
    })
}
