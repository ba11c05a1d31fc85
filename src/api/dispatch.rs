//! Единая точка применения команд.
//!
//! Все мутирующие действия проходят через `execute`: один исчерпывающий
//! match по вариантам `Command`, чтобы добавление нового действия было
//! ошибкой компиляции, а не пропущенной веткой в рантайме.

use crate::domain::table::{Table, TableConfig, TableStakes};
use crate::domain::PlayerId;
use crate::engine::game_loop::HandStatus;
use crate::engine::TableManager;
use crate::infra::IdGenerator;
use crate::ledger::ChipsLedger;
use crate::time_ctrl::Timestamp;

use super::commands::{Command, CreateTableCommand, TableCommand};
use super::dto::CommandResponse;
use super::errors::ApiError;
use super::queries::{build_seat_view, build_table_view, Query, QueryResponse};

/// Применить команду от имени `caller` в момент `now`.
///
/// Ошибка на любом этапе означает, что состояние менеджера не изменилось
/// (движок валидирует до первой мутации).
pub fn execute<L: ChipsLedger>(
    manager: &mut TableManager<L>,
    ids: &IdGenerator,
    caller: PlayerId,
    command: Command,
    now: Timestamp,
) -> Result<CommandResponse, ApiError> {
    match command {
        Command::CreateTable(cmd) => create_table(manager, caller, cmd),
        Command::TableCommand(cmd) => table_command(manager, ids, caller, cmd, now),
    }
}

/// Выполнить запрос «только чтение».
pub fn query<L: ChipsLedger>(
    manager: &TableManager<L>,
    request: Query,
) -> Result<QueryResponse, ApiError> {
    match request {
        Query::GetTableInfo { table_id } => {
            let table = manager
                .table(table_id)
                .ok_or(ApiError::TableNotFound(table_id))?;
            let engine = manager.hand_engine(table_id);
            Ok(QueryResponse::Table(build_table_view(table, engine)))
        }

        Query::GetSeatInfo {
            table_id,
            seat_index,
        } => {
            let table = manager
                .table(table_id)
                .ok_or(ApiError::TableNotFound(table_id))?;
            let engine = manager.hand_engine(table_id);
            let seat = build_seat_view(table, engine, seat_index).ok_or_else(|| {
                ApiError::InvalidCommand(format!("seat {seat_index} is empty"))
            })?;
            Ok(QueryResponse::Seat(seat))
        }

        Query::ListTables => {
            let tables = manager
                .tables()
                .map(|t| {
                    let engine = manager.hand_engine(t.id);
                    build_table_view(t, engine)
                })
                .collect();
            Ok(QueryResponse::Tables(tables))
        }
    }
}

fn create_table<L: ChipsLedger>(
    manager: &mut TableManager<L>,
    caller: PlayerId,
    cmd: CreateTableCommand,
) -> Result<CommandResponse, ApiError> {
    if manager.has_table(cmd.table_id) {
        return Err(ApiError::InvalidCommand(format!(
            "table {} already exists",
            cmd.table_id
        )));
    }
    if cmd.small_blind.is_zero() || cmd.big_blind <= cmd.small_blind {
        return Err(ApiError::InvalidCommand("bad blind sizes".into()));
    }
    if cmd.min_buyin.is_zero() || cmd.max_buyin < cmd.min_buyin {
        return Err(ApiError::InvalidCommand("bad buy-in range".into()));
    }

    // Ноль — «значение по умолчанию», меньше двух мест стол не имеет смысла.
    let max_seats = match cmd.max_seats {
        0 => crate::domain::table::DEFAULT_MAX_SEATS,
        1 => return Err(ApiError::InvalidCommand("at least 2 seats".into())),
        n => n,
    };

    let config = TableConfig {
        max_seats,
        stakes: TableStakes::new(cmd.small_blind, cmd.big_blind, cmd.ante_type, cmd.ante),
        allow_straddle: cmd.allow_straddle,
        min_buyin: cmd.min_buyin,
        max_buyin: cmd.max_buyin,
        fee_bps: crate::domain::table::SERVICE_FEE_BPS,
    };

    let table = Table::new(cmd.table_id, cmd.name, caller, config);
    let table_id = table.id;
    manager.add_table(table);

    Ok(CommandResponse::TableCreated(table_id))
}

fn table_command<L: ChipsLedger>(
    manager: &mut TableManager<L>,
    ids: &IdGenerator,
    caller: PlayerId,
    cmd: TableCommand,
    now: Timestamp,
) -> Result<CommandResponse, ApiError> {
    match cmd {
        TableCommand::JoinTable {
            table_id,
            seat_index,
            buy_in,
        } => {
            manager.join_table(table_id, caller, seat_index, buy_in)?;
            Ok(table_state(manager, table_id))
        }

        TableCommand::SitOut {
            table_id,
            seat_index,
        } => {
            ensure_own_seat(manager, table_id, seat_index, caller)?;
            manager.sit_out(table_id, seat_index)?;
            Ok(CommandResponse::Ok)
        }

        TableCommand::SitIn {
            table_id,
            seat_index,
        } => {
            ensure_own_seat(manager, table_id, seat_index, caller)?;
            manager.sit_in(table_id, seat_index)?;
            Ok(CommandResponse::Ok)
        }

        TableCommand::LeaveAfterHand {
            table_id,
            seat_index,
        } => {
            ensure_own_seat(manager, table_id, seat_index, caller)?;
            manager.leave_after_hand(table_id, seat_index)?;
            Ok(CommandResponse::Ok)
        }

        TableCommand::StartHand { table_id } => {
            let mut rng = crate::infra::SystemRng::default();
            manager.start_hand(table_id, &mut rng, ids.next_hand_id(), now)?;
            Ok(table_state(manager, table_id))
        }

        TableCommand::PostStraddle {
            table_id,
            seat_index,
        } => {
            ensure_own_seat(manager, table_id, seat_index, caller)?;
            manager.post_straddle(table_id, seat_index)?;
            Ok(table_state(manager, table_id))
        }

        TableCommand::CommitCards {
            table_id,
            seat_index,
            hash,
        } => {
            ensure_own_seat(manager, table_id, seat_index, caller)?;
            manager.commit_cards(table_id, seat_index, hash, now)?;
            Ok(table_state(manager, table_id))
        }

        TableCommand::RevealCards {
            table_id,
            seat_index,
            cards,
            nonce,
        } => {
            ensure_own_seat(manager, table_id, seat_index, caller)?;
            let status = manager.reveal_cards(table_id, seat_index, cards, nonce, now)?;
            Ok(hand_status_response(manager, table_id, status))
        }

        TableCommand::PlayerAction { table_id, action } => {
            if action.account != caller {
                return Err(ApiError::InvalidCommand(
                    "action account does not match caller".into(),
                ));
            }
            let status = manager.apply_action(table_id, action, now)?;
            Ok(hand_status_response(manager, table_id, status))
        }

        TableCommand::ClaimTimeout {
            table_id,
            target_seat,
        } => {
            // Намеренно без проверки caller: клейм пермишнлесс.
            let status = manager.claim_timeout(table_id, target_seat, now)?;
            Ok(hand_status_response(manager, table_id, status))
        }

        TableCommand::Pause { table_id } => {
            manager.pause(table_id, caller)?;
            Ok(CommandResponse::Ok)
        }

        TableCommand::Resume { table_id } => {
            manager.resume(table_id, caller)?;
            Ok(CommandResponse::Ok)
        }

        TableCommand::EmergencyAbort { table_id } => {
            manager.emergency_abort(table_id, caller)?;
            Ok(table_state(manager, table_id))
        }
    }
}

/// Команды на чужое место отклоняются до обращения к движку.
fn ensure_own_seat<L: ChipsLedger>(
    manager: &TableManager<L>,
    table_id: u64,
    seat_index: u8,
    caller: PlayerId,
) -> Result<(), ApiError> {
    let table = manager
        .table(table_id)
        .ok_or(ApiError::TableNotFound(table_id))?;
    match table.seat(seat_index) {
        Some(seat) if seat.account == caller => Ok(()),
        Some(_) => Err(ApiError::InvalidCommand(
            "seat belongs to another account".into(),
        )),
        None => Err(ApiError::PlayerNotAtTable(caller)),
    }
}

fn table_state<L: ChipsLedger>(manager: &TableManager<L>, table_id: u64) -> CommandResponse {
    match manager.table(table_id) {
        Some(table) => {
            let engine = manager.hand_engine(table_id);
            CommandResponse::TableState(build_table_view(table, engine))
        }
        None => CommandResponse::Ok,
    }
}

fn hand_status_response<L: ChipsLedger>(
    manager: &TableManager<L>,
    table_id: u64,
    status: HandStatus,
) -> CommandResponse {
    match status {
        HandStatus::Ongoing => table_state(manager, table_id),
        HandStatus::Finished(summary, _history) => match manager.table(table_id) {
            Some(table) => CommandResponse::HandFinished {
                table: build_table_view(table, None),
                summary,
            },
            None => CommandResponse::Ok,
        },
    }
}
