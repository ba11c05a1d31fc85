use std::collections::{HashMap, HashSet};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::domain::blinds::{AnteType, STRADDLE_MULTIPLIER};
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{HandRank, HandSummary, SeatHandResult, Street};
use crate::domain::seat::{Seat, SeatStatus};
use crate::domain::table::Table;
use crate::domain::{HandId, SeatIndex, TableId};
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::betting::BettingState;
use crate::engine::commitment::{CardCommitment, CommitHash};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::positions::{acting_order, collect_occupied_seats_from, next_dealer};
use crate::engine::pot::{collect_pots, distribute};
use crate::engine::seating::process_pending_leaves;
use crate::engine::validation::validate_action;
use crate::engine::RandomSource;
use crate::eval::evaluate_best_hand;
use crate::ledger::{ChipsLedger, StoreId};
use crate::time_ctrl::{TimeRules, Timestamp};

/// Фаза раздачи.
///
/// Торговля открывается только после того, как каждое участвующее место
/// закоммитило карманные карты; вскрытие — после закрытия торговли.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandPhase {
    /// Ждём коммиты карманных карт.
    Committing,
    /// Идёт торговля по улицам.
    Betting,
    /// Торговля закрыта, ждём вскрытия карт.
    Revealing,
}

/// Статус раздачи для внешнего кода.
#[derive(Debug)]
pub enum HandStatus {
    Ongoing,
    Finished(HandSummary, HandHistory),
}

/// Внутреннее состояние раздачи. Создаётся в `start_hand`,
/// уничтожается при расчёте.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandEngine {
    pub table_id: TableId,
    pub hand_id: HandId,
    /// Колода борда. Карманные карты из неё не раздаются —
    /// они приходят через commit-reveal.
    pub deck: Deck,
    pub phase: HandPhase,
    pub betting: BettingState,
    /// Сколько всего фишек внёс каждый seat (для сайд-потов).
    pub contributions: HashMap<SeatIndex, Chips>,
    /// Коммиты карманных карт.
    pub commitments: HashMap<SeatIndex, CardCommitment>,
    /// Вскрытые карты (после проверки хэша).
    pub revealed: HashMap<SeatIndex, Vec<Card>>,
    /// Дедлайн окна коммитов (абсолютное время).
    pub commit_deadline: Timestamp,
    /// Дедлайн окна вскрытий (появляется при закрытии торговли).
    pub reveal_deadline: Option<Timestamp>,
    /// Место, поставившее страддл (если был).
    pub straddle_seat: Option<SeatIndex>,
    /// Чей сейчас ход (во время торговли).
    pub current_actor: Option<SeatIndex>,
    /// Журнал раздачи.
    pub history: HandHistory,
}

/// Старт новой раздачи:
/// - обрабатывает отложенные уходы (и «мёртвую кнопку»);
/// - двигает кнопку, постит блайнды/анте;
/// - открывает окно коммитов карманных карт.
pub fn start_hand<R: RandomSource, L: ChipsLedger>(
    table: &mut Table,
    ledger: &mut L,
    rng: &mut R,
    new_hand_id: HandId,
    now: Timestamp,
    rules: &TimeRules,
) -> Result<HandEngine, EngineError> {
    if table.paused {
        return Err(EngineError::TablePaused);
    }
    if table.hand_in_progress {
        return Err(EngineError::HandAlreadyInProgress);
    }

    process_pending_leaves(table, ledger)?;

    // Сброс пер-рукных полей мест.
    for seat_opt in table.seats.iter_mut() {
        if let Some(seat) = seat_opt {
            seat.street_bet = Chips::ZERO;
            seat.status = if matches!(seat.status, SeatStatus::SittingOut) || seat.stack.is_zero()
            {
                SeatStatus::SittingOut
            } else {
                SeatStatus::Active
            };
        }
    }

    if table.ready_count() < 2 {
        return Err(EngineError::NotEnoughPlayers);
    }

    let table_id = table.id;
    let mut deck = Deck::standard_52();
    rng.shuffle(&mut deck.cards);

    table.board.clear();
    table.total_pot = Chips::ZERO;
    table.current_hand_id = Some(new_hand_id);
    table.street = Street::Preflop;
    table.hand_in_progress = true;

    // Кнопка: либо «мёртвая» (на освободившемся месте), либо следующая занятая.
    let button = next_dealer(table).ok_or(EngineError::NotEnoughPlayers)?;
    table.dealer_button = Some(button);
    table.dead_button = None;

    let mut engine = HandEngine {
        table_id,
        hand_id: new_hand_id,
        deck,
        phase: HandPhase::Committing,
        betting: BettingState::new(
            Street::Preflop,
            Chips::ZERO,
            table.config.stakes.big_blind,
            Vec::new(),
        ),
        contributions: HashMap::new(),
        commitments: HashMap::new(),
        revealed: HashMap::new(),
        commit_deadline: now.plus_secs(rules.commit_window_secs),
        reveal_deadline: None,
        straddle_seat: None,
        current_actor: None,
        history: HandHistory::new(),
    };

    engine.history.push(HandEventKind::HandStarted {
        table_id,
        hand_id: new_hand_id,
    });

    post_blinds_and_antes(table, &mut engine, button);

    engine.history.push(HandEventKind::CommitWindowOpened {
        deadline: engine.commit_deadline,
    });

    info!(
        "table {table_id}: hand {new_hand_id} started, button at seat {button}, commit window open"
    );

    Ok(engine)
}

/// Постинг анте и блайндов; настройка очереди торговли префлопа.
fn post_blinds_and_antes(table: &mut Table, engine: &mut HandEngine, button: SeatIndex) {
    let stakes = table.config.stakes.clone();

    let order = active_seats_from(table, button);
    if order.len() < 2 {
        return;
    }

    // Если кнопка стоит на занятом месте, блайнды — следующие два места.
    // Мёртвая кнопка стоит на пустом месте: тогда первый в order уже SB.
    let (sb_pos, bb_pos) = if order.first() == Some(&button) {
        (1 % order.len(), 2 % order.len())
    } else {
        (0, 1 % order.len())
    };
    let sb_seat = order[sb_pos];
    let bb_seat = order[bb_pos];

    let mut ante_events = Vec::new();

    match stakes.ante_type {
        AnteType::None => {}
        AnteType::Classic => {
            for &seat_idx in &order {
                let paid = {
                    let seat = table.seat_mut(seat_idx).expect("место из order занято");
                    take_from_stack(seat, stakes.ante)
                };
                add_contribution(table, engine, seat_idx, paid);
                ante_events.push((seat_idx, paid));
            }
        }
        AnteType::BigBlind => {
            let paid = {
                let seat = table.seat_mut(bb_seat).expect("место из order занято");
                take_from_stack(seat, stakes.ante)
            };
            add_contribution(table, engine, bb_seat, paid);
            ante_events.push((bb_seat, paid));
        }
    }

    // Small blind.
    let sb_paid = {
        let seat = table.seat_mut(sb_seat).expect("место из order занято");
        let paid = take_from_stack(seat, stakes.small_blind);
        seat.street_bet += paid;
        paid
    };
    add_contribution(table, engine, sb_seat, sb_paid);

    // Big blind.
    let bb_paid = {
        let seat = table.seat_mut(bb_seat).expect("место из order занято");
        let paid = take_from_stack(seat, stakes.big_blind);
        seat.street_bet += paid;
        paid
    };
    add_contribution(table, engine, bb_seat, bb_paid);

    engine.betting.current_bet = stakes.big_blind;
    engine.betting.min_raise = stakes.big_blind;
    engine.betting.last_aggressor = Some(bb_seat);

    engine.history.push(HandEventKind::BlindsPosted {
        dealer: button,
        small_blind: Some((sb_seat, sb_paid)),
        big_blind: Some((bb_seat, bb_paid)),
        ante: ante_events,
    });

    // Очередь префлопа: от места после BB по кругу, BB последним (option).
    engine.betting.to_act = queue_from_after(table, &order, bb_seat);
}

/// Зафиксировать коммит карманных карт одного места.
/// Когда коммиты собраны от всех участников — открывается торговля.
pub fn commit_cards(
    table: &mut Table,
    engine: &mut HandEngine,
    seat_index: SeatIndex,
    hash: CommitHash,
    now: Timestamp,
    rules: &TimeRules,
) -> Result<(), EngineError> {
    if !table.hand_in_progress {
        return Err(EngineError::NoActiveHand);
    }
    if !matches!(engine.phase, HandPhase::Committing) {
        return Err(EngineError::CommitWindowClosed);
    }

    let seat = table.seat(seat_index).ok_or(EngineError::EmptySeat)?;
    if !seat.is_in_hand() {
        return Err(EngineError::IllegalAction);
    }
    if now.is_past(engine.commit_deadline) {
        return Err(EngineError::DeadlinePassed);
    }
    if engine.commitments.contains_key(&seat_index) {
        return Err(EngineError::AlreadyCommitted(seat_index));
    }

    engine
        .commitments
        .insert(seat_index, CardCommitment::new(hash));
    engine
        .history
        .push(HandEventKind::CardsCommitted { seat: seat_index });

    if all_in_hand_committed(table, engine) {
        open_betting(table, engine, now, rules);
    }

    Ok(())
}

/// Страддл: добровольная слепая ставка 2×BB от UTG до открытия торговли.
pub fn post_straddle(
    table: &mut Table,
    engine: &mut HandEngine,
    seat_index: SeatIndex,
) -> Result<(), EngineError> {
    if !table.hand_in_progress {
        return Err(EngineError::NoActiveHand);
    }
    if !table.config.allow_straddle {
        return Err(EngineError::IllegalAction);
    }
    // Только до того, как торговля началась.
    if !matches!(engine.phase, HandPhase::Committing) {
        return Err(EngineError::IllegalAction);
    }
    if engine.straddle_seat.is_some() {
        return Err(EngineError::IllegalAction);
    }

    // Страддлит только UTG — первый в очереди префлопа.
    let utg = engine
        .betting
        .to_act
        .first()
        .copied()
        .ok_or(EngineError::IllegalAction)?;
    if utg != seat_index {
        let account = table
            .seat(seat_index)
            .map(|s| s.account)
            .ok_or(EngineError::EmptySeat)?;
        return Err(EngineError::NotPlayersTurn(account));
    }

    let bb = table.config.stakes.big_blind;
    let amount = Chips(bb.0 * STRADDLE_MULTIPLIER);

    let paid = {
        let seat = table.seat_mut(seat_index).ok_or(EngineError::EmptySeat)?;
        if seat.stack < amount {
            return Err(EngineError::NotEnoughChips);
        }
        let paid = take_from_stack(seat, amount);
        seat.street_bet += paid;
        paid
    };
    add_contribution(table, engine, seat_index, paid);

    // Страддл — слепой рейз: bet-to-match 2×BB, очередь заново от UTG+1,
    // сам страддлер получает option последним.
    let order = active_seats_from(table, table.dealer_button.unwrap_or(0));
    let new_to_act = queue_from_after(table, &order, seat_index);
    let raise_size = amount - bb;
    engine
        .betting
        .on_raise(seat_index, amount, raise_size, new_to_act);
    engine.straddle_seat = Some(seat_index);

    engine.history.push(HandEventKind::StraddlePosted {
        seat: seat_index,
        amount: paid,
    });

    Ok(())
}

/// Применить действие игрока в торговле.
/// Возвращает статус раздачи (идёт / закончилась).
pub fn apply_action<L: ChipsLedger>(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut L,
    action: PlayerAction,
    now: Timestamp,
    rules: &TimeRules,
) -> Result<HandStatus, EngineError> {
    if !table.hand_in_progress {
        return Err(EngineError::NoActiveHand);
    }
    if !matches!(engine.phase, HandPhase::Betting) {
        return Err(EngineError::IllegalAction);
    }

    let seat_idx = action.seat;
    if seat_idx >= table.max_seats() {
        return Err(EngineError::InvalidSeat(seat_idx));
    }

    // Иммутабельные проверки до каких-либо мутаций.
    let seat_ref = table.seat(seat_idx).ok_or(EngineError::EmptySeat)?;
    if seat_ref.account != action.account {
        return Err(EngineError::NotPlayersTurn(action.account));
    }
    if engine.current_actor != Some(seat_idx) {
        return Err(EngineError::NotPlayersTurn(action.account));
    }

    validate_action(seat_ref, &action.kind, &engine.betting)?;

    let to_call = engine.betting.call_amount(seat_ref.street_bet);

    match action.kind {
        PlayerActionKind::Fold => {
            let (account, new_stack) = {
                let seat = table.seat_mut(seat_idx).ok_or(EngineError::EmptySeat)?;
                seat.status = SeatStatus::Folded;
                (seat.account, seat.stack)
            };
            push_action_event(engine, account, seat_idx, action.kind.clone(), new_stack, table.total_pot);
        }

        PlayerActionKind::Check => {
            let (account, new_stack) = {
                let seat = table.seat(seat_idx).ok_or(EngineError::EmptySeat)?;
                (seat.account, seat.stack)
            };
            push_action_event(engine, account, seat_idx, action.kind.clone(), new_stack, table.total_pot);
        }

        PlayerActionKind::Call => {
            let (account, new_stack, paid) = {
                let seat = table.seat_mut(seat_idx).ok_or(EngineError::EmptySeat)?;
                let paid = take_from_stack(seat, to_call);
                seat.street_bet += paid;
                (seat.account, seat.stack, paid)
            };
            add_contribution(table, engine, seat_idx, paid);
            push_action_event(engine, account, seat_idx, action.kind.clone(), new_stack, table.total_pot);
        }

        PlayerActionKind::Bet(amount) => {
            let (account, new_stack, new_bet, paid) = {
                let seat = table.seat_mut(seat_idx).ok_or(EngineError::EmptySeat)?;
                let paid = take_from_stack(seat, amount);
                seat.street_bet += paid;
                (seat.account, seat.stack, seat.street_bet, paid)
            };
            add_contribution(table, engine, seat_idx, paid);

            // Первая ставка на улице: min_raise = размер бета.
            let new_to_act = betting_order_after_raise(table, seat_idx);
            engine.betting.on_raise(seat_idx, new_bet, new_bet, new_to_act);

            push_action_event(engine, account, seat_idx, action.kind.clone(), new_stack, table.total_pot);
        }

        PlayerActionKind::Raise(total_bet) => {
            let bet_before = engine.betting.current_bet;
            let (account, new_stack, new_bet, paid) = {
                let seat = table.seat_mut(seat_idx).ok_or(EngineError::EmptySeat)?;
                let diff_to_target = total_bet - seat.street_bet;
                let paid = take_from_stack(seat, diff_to_target);
                seat.street_bet += paid;
                (seat.account, seat.stack, seat.street_bet, paid)
            };
            add_contribution(table, engine, seat_idx, paid);

            let raise_size = new_bet - bet_before;
            let new_to_act = betting_order_after_raise(table, seat_idx);
            engine
                .betting
                .on_raise(seat_idx, new_bet, raise_size, new_to_act);

            push_action_event(engine, account, seat_idx, action.kind.clone(), new_stack, table.total_pot);
        }

        PlayerActionKind::AllIn => {
            let bet_before = engine.betting.current_bet;
            let (account, new_stack, new_bet, paid) = {
                let seat = table.seat_mut(seat_idx).ok_or(EngineError::EmptySeat)?;
                let all = seat.stack;
                let paid = take_from_stack(seat, all);
                seat.street_bet += paid;
                (seat.account, seat.stack, seat.street_bet, paid)
            };
            add_contribution(table, engine, seat_idx, paid);

            if new_bet > bet_before {
                // Олл-ин сверху текущей ставки — по сути рейз.
                let raise_size = new_bet - bet_before;
                let new_to_act = betting_order_after_raise(table, seat_idx);
                engine
                    .betting
                    .on_raise(seat_idx, new_bet, raise_size, new_to_act);
            }

            push_action_event(engine, account, seat_idx, action.kind.clone(), new_stack, table.total_pot);
        }
    }

    // Ходивший выбывает из очереди.
    engine.betting.mark_acted(seat_idx);

    // Остался один претендент на банк — раздача закончена без вскрытий.
    if count_in_hand(table) == 1 {
        let summary = settle_single_survivor(table, engine, ledger)?;
        return Ok(HandStatus::Finished(summary, engine.history.clone()));
    }

    if engine.betting.is_round_complete() {
        advance_street(table, engine, now, rules);
    } else {
        engine.current_actor = engine.betting.to_act.first().copied();
    }

    Ok(HandStatus::Ongoing)
}

/// Вскрыть карманные карты. Хэш обязан совпасть с коммитом;
/// карты не должны пересекаться с бордом и чужими вскрытиями.
pub fn reveal_cards<L: ChipsLedger>(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut L,
    seat_index: SeatIndex,
    cards: Vec<Card>,
    nonce: u64,
    now: Timestamp,
) -> Result<HandStatus, EngineError> {
    if !table.hand_in_progress {
        return Err(EngineError::NoActiveHand);
    }
    if !matches!(engine.phase, HandPhase::Revealing) {
        return Err(EngineError::IllegalAction);
    }

    let seat = table.seat(seat_index).ok_or(EngineError::EmptySeat)?;
    if !seat.is_in_hand() {
        return Err(EngineError::IllegalAction);
    }
    if engine.revealed.contains_key(&seat_index) {
        return Err(EngineError::IllegalAction);
    }

    let commitment = engine
        .commitments
        .get(&seat_index)
        .copied()
        .ok_or(EngineError::NotCommitted(seat_index))?;

    if let Some(deadline) = engine.reveal_deadline {
        if now.is_past(deadline) {
            return Err(EngineError::DeadlinePassed);
        }
    }

    if cards.len() != 2 || !commitment.matches(&cards, nonce) {
        return Err(EngineError::RevealMismatch);
    }

    // Защита от несогласованной раздачи: вскрытые карты не могут
    // дублировать борд или уже вскрытые карты других мест.
    let clashes_board = cards.iter().any(|c| table.board.contains(c));
    let clashes_revealed = engine
        .revealed
        .values()
        .any(|other| other.iter().any(|c| cards.contains(c)));
    if clashes_board || clashes_revealed {
        return Err(EngineError::RevealMismatch);
    }

    engine.revealed.insert(seat_index, cards.clone());
    engine.history.push(HandEventKind::CardsRevealed {
        seat: seat_index,
        cards,
    });

    if all_in_hand_revealed(table, engine) {
        let summary = settle_showdown(table, engine, ledger)?;
        return Ok(HandStatus::Finished(summary, engine.history.clone()));
    }

    Ok(HandStatus::Ongoing)
}

/// Таймаут-клейм. Доступен любому вызывающему: если место просрочило
/// коммит или вскрытие, оно принудительно фолдится и платит штраф 10%
/// от своего взноса в раздачу (из остатка стека, в трежери).
pub fn claim_timeout<L: ChipsLedger>(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut L,
    target_seat: SeatIndex,
    now: Timestamp,
    rules: &TimeRules,
) -> Result<HandStatus, EngineError> {
    if !table.hand_in_progress {
        return Err(EngineError::NoActiveHand);
    }

    let seat = table.seat(target_seat).ok_or(EngineError::EmptySeat)?;
    if !seat.is_in_hand() {
        return Err(EngineError::IllegalAction);
    }

    match engine.phase {
        HandPhase::Committing => {
            if engine.commitments.contains_key(&target_seat) {
                // Место своё обязательство выполнило.
                return Err(EngineError::IllegalAction);
            }
            if !now.is_past(engine.commit_deadline) {
                return Err(EngineError::DeadlineNotReached);
            }

            force_fold_with_penalty(table, engine, ledger, target_seat)?;

            if count_in_hand(table) == 1 {
                let summary = settle_single_survivor(table, engine, ledger)?;
                return Ok(HandStatus::Finished(summary, engine.history.clone()));
            }
            if all_in_hand_committed(table, engine) {
                open_betting(table, engine, now, rules);
            }
            Ok(HandStatus::Ongoing)
        }

        HandPhase::Betting => {
            // В торговле дедлайнов нет: claim нечем обосновать.
            Err(EngineError::IllegalAction)
        }

        HandPhase::Revealing => {
            if engine.revealed.contains_key(&target_seat) {
                return Err(EngineError::IllegalAction);
            }
            let deadline = engine
                .reveal_deadline
                .ok_or(EngineError::Internal("reveal-фаза без дедлайна"))?;
            if !now.is_past(deadline) {
                return Err(EngineError::DeadlineNotReached);
            }

            force_fold_with_penalty(table, engine, ledger, target_seat)?;

            if count_in_hand(table) == 1 {
                let summary = settle_single_survivor(table, engine, ledger)?;
                return Ok(HandStatus::Finished(summary, engine.history.clone()));
            }
            if all_in_hand_revealed(table, engine) {
                let summary = settle_showdown(table, engine, ledger)?;
                return Ok(HandStatus::Finished(summary, engine.history.clone()));
            }
            Ok(HandStatus::Ongoing)
        }
    }
}

/// Аварийное завершение раздачи: взносы возвращаются в стеки как есть,
/// без сравнения рук и без комиссии.
pub fn abort_hand(table: &mut Table, engine: &mut HandEngine) {
    for (&seat_idx, &contribution) in engine.contributions.iter() {
        if let Some(seat) = table.seat_mut(seat_idx) {
            seat.stack += contribution;
        }
    }

    engine.history.push(HandEventKind::HandAborted {
        hand_id: engine.hand_id,
    });

    info!(
        "table {}: hand {} aborted, contributions returned",
        table.id, engine.hand_id
    );

    finish_hand_state(table);
}

//
// Внутренняя механика.
//

/// Взять из стека не более amount; обнулившийся стек — олл-ин.
fn take_from_stack(seat: &mut Seat, amount: Chips) -> Chips {
    let real = seat.stack.min(amount);
    seat.stack -= real;
    if seat.stack.is_zero() && matches!(seat.status, SeatStatus::Active) {
        seat.status = SeatStatus::AllIn;
    }
    real
}

/// Учесть взнос в общем банке и в разбивке по местам.
fn add_contribution(table: &mut Table, engine: &mut HandEngine, seat: SeatIndex, amount: Chips) {
    if amount.is_zero() {
        return;
    }
    table.total_pot += amount;
    *engine.contributions.entry(seat).or_insert(Chips::ZERO) += amount;
}

fn push_action_event(
    engine: &mut HandEngine,
    account: u64,
    seat: SeatIndex,
    action: PlayerActionKind,
    new_stack: Chips,
    pot_after: Chips,
) {
    engine.history.push(HandEventKind::PlayerActed {
        account,
        seat,
        action,
        new_stack,
        pot_after,
    });
}

/// Занятые места с активным статусом, по кругу от start.
fn active_seats_from(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    collect_occupied_seats_from(table, start)
        .into_iter()
        .filter(|&s| {
            table
                .seat(s)
                .map(|seat| matches!(seat.status, SeatStatus::Active))
                .unwrap_or(false)
        })
        .collect()
}

/// Очередь хода: все Active-места из order, начиная со следующего за
/// `after` (само `after` замыкает очередь, если всё ещё активно).
fn queue_from_after(table: &Table, order: &[SeatIndex], after: SeatIndex) -> Vec<SeatIndex> {
    let start_idx = match order.iter().position(|&s| s == after) {
        Some(idx) => (idx + 1) % order.len(),
        None => 0,
    };

    let mut queue = Vec::new();
    for i in 0..order.len() {
        let seat_idx = order[(start_idx + i) % order.len()];
        if let Some(seat) = table.seat(seat_idx) {
            if matches!(seat.status, SeatStatus::Active) {
                queue.push(seat_idx);
            }
        }
    }
    queue
}

/// Очередь после рейза: со следующего за рейзером по кругу,
/// только активные, без самого рейзера.
fn betting_order_after_raise(table: &Table, raiser: SeatIndex) -> Vec<SeatIndex> {
    let order = collect_occupied_seats_from(table, raiser);
    let mut queue = Vec::new();
    if order.len() <= 1 {
        return queue;
    }

    for i in 0..(order.len() - 1) {
        let seat_idx = order[(1 + i) % order.len()];
        if let Some(seat) = table.seat(seat_idx) {
            if matches!(seat.status, SeatStatus::Active) {
                queue.push(seat_idx);
            }
        }
    }
    queue
}

/// Сколько мест ещё претендует на банк.
fn count_in_hand(table: &Table) -> usize {
    table
        .seats
        .iter()
        .filter_map(|s| s.as_ref())
        .filter(|s| s.is_in_hand())
        .count()
}

/// Сколько мест ещё может делать ставки (не олл-ин).
fn count_active_bettors(table: &Table) -> usize {
    table
        .seats
        .iter()
        .filter_map(|s| s.as_ref())
        .filter(|s| matches!(s.status, SeatStatus::Active))
        .count()
}

fn all_in_hand_committed(table: &Table, engine: &HandEngine) -> bool {
    table
        .seats
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| s.as_ref().map(|seat| (idx as SeatIndex, seat)))
        .filter(|(_, seat)| seat.is_in_hand())
        .all(|(idx, _)| engine.commitments.contains_key(&idx))
}

fn all_in_hand_revealed(table: &Table, engine: &HandEngine) -> bool {
    table
        .seats
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| s.as_ref().map(|seat| (idx as SeatIndex, seat)))
        .filter(|(_, seat)| seat.is_in_hand())
        .all(|(idx, _)| engine.revealed.contains_key(&idx))
}

/// Все коммиты собраны: торговля открывается.
/// Если торговаться некому (олл-ины с блайндов) — сразу раскатываем борд.
fn open_betting(table: &mut Table, engine: &mut HandEngine, now: Timestamp, rules: &TimeRules) {
    engine.phase = HandPhase::Betting;
    engine.history.push(HandEventKind::BettingOpened);
    engine.current_actor = engine.betting.to_act.first().copied();

    debug!(
        "table {}: hand {} betting opened, first to act {:?}",
        table.id, engine.hand_id, engine.current_actor
    );

    if engine.betting.is_round_complete() || count_active_bettors(table) < 2 {
        run_out_board(table, engine);
        enter_reveal(table, engine, now, rules);
    }
}

/// Переход улиц после завершения раунда ставок.
fn advance_street(table: &mut Table, engine: &mut HandEngine, now: Timestamp, rules: &TimeRules) {
    // Торговля возможна, только если минимум два места могут ставить.
    if count_active_bettors(table) < 2 {
        run_out_board(table, engine);
        enter_reveal(table, engine, now, rules);
        return;
    }

    match table.street {
        Street::Preflop => {
            deal_board_cards(table, engine, 3, Street::Flop);
            reset_bets_for_new_street(table, engine, Street::Flop);
        }
        Street::Flop => {
            deal_board_cards(table, engine, 1, Street::Turn);
            reset_bets_for_new_street(table, engine, Street::Turn);
        }
        Street::Turn => {
            deal_board_cards(table, engine, 1, Street::River);
            reset_bets_for_new_street(table, engine, Street::River);
        }
        Street::River => {
            enter_reveal(table, engine, now, rules);
        }
        Street::Showdown => {
            // Сюда перехода быть не должно: раздача уже рассчитана.
        }
    }
}

/// Открыть борд до ривера (когда торговаться больше некому).
fn run_out_board(table: &mut Table, engine: &mut HandEngine) {
    loop {
        match table.street {
            Street::Preflop => deal_board_cards(table, engine, 3, Street::Flop),
            Street::Flop => deal_board_cards(table, engine, 1, Street::Turn),
            Street::Turn => deal_board_cards(table, engine, 1, Street::River),
            Street::River | Street::Showdown => break,
        }
    }
}

/// Открыть карты борда.
fn deal_board_cards(table: &mut Table, engine: &mut HandEngine, count: usize, street: Street) {
    let mut cards = Vec::with_capacity(count);
    for _ in 0..count {
        if let Some(card) = engine.deck.draw_one() {
            table.board.push(card);
            cards.push(card);
        }
    }

    table.street = street;
    engine.history.push(HandEventKind::BoardDealt { street, cards });
    engine.history.push(HandEventKind::StreetChanged { street });
}

/// Сбросить ставки улицы и собрать новую очередь хода.
fn reset_bets_for_new_street(table: &mut Table, engine: &mut HandEngine, street: Street) {
    for seat_opt in table.seats.iter_mut() {
        if let Some(seat) = seat_opt {
            seat.street_bet = Chips::ZERO;
        }
    }

    // Постфлоп первым ходит первый активный слева от кнопки.
    let button = table.dealer_button.unwrap_or(0);
    let to_act = active_seats_from(table, (button + 1) % table.max_seats());

    engine.betting = BettingState::new(
        street,
        Chips::ZERO,
        table.config.stakes.big_blind,
        to_act,
    );
    engine.current_actor = engine.betting.to_act.first().copied();
}

/// Торговля закрыта: открываем окно вскрытий.
fn enter_reveal(table: &mut Table, engine: &mut HandEngine, now: Timestamp, rules: &TimeRules) {
    engine.phase = HandPhase::Revealing;
    engine.current_actor = None;
    let deadline = now.plus_secs(rules.reveal_window_secs);
    engine.reveal_deadline = Some(deadline);
    engine
        .history
        .push(HandEventKind::RevealWindowOpened { deadline });

    debug!(
        "table {}: hand {} betting closed, reveal window open",
        table.id, engine.hand_id
    );
}

/// Принудительный фолд просрочившего места + штраф 10% от его взноса
/// (из остатка стека, в трежери).
fn force_fold_with_penalty<L: ChipsLedger>(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut L,
    seat_index: SeatIndex,
) -> Result<(), EngineError> {
    let contributed = engine
        .contributions
        .get(&seat_index)
        .copied()
        .unwrap_or(Chips::ZERO);
    let penalty = Chips(contributed.0 / 10);

    let charge = {
        let seat = table.seat(seat_index).ok_or(EngineError::EmptySeat)?;
        penalty.min(seat.stack)
    };

    if !charge.is_zero() {
        ledger.transfer(StoreId::Table(table.id), StoreId::Treasury, charge)?;
    }

    let seat = table.seat_mut(seat_index).ok_or(EngineError::EmptySeat)?;
    seat.stack -= charge;
    seat.status = SeatStatus::Folded;

    engine.betting.mark_acted(seat_index);
    engine.history.push(HandEventKind::TimeoutClaimed {
        seat: seat_index,
        penalty: charge,
    });

    info!(
        "table {}: seat {} timed out, folded with penalty {}",
        table.id, seat_index, charge.0
    );

    Ok(())
}

/// Расчёт, когда остался один претендент: весь банк (минус комиссия)
/// уходит ему без сравнения рук.
fn settle_single_survivor<L: ChipsLedger>(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut L,
) -> Result<HandSummary, EngineError> {
    let survivor = table
        .seats
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| s.as_ref().map(|seat| (idx as SeatIndex, seat)))
        .find(|(_, seat)| seat.is_in_hand())
        .map(|(idx, _)| idx)
        .ok_or(EngineError::Internal("нет претендента на банк"))?;

    let total_pot = table.total_pot;
    let fee = take_service_fee(table, engine, ledger, total_pot)?;
    let prize = total_pot - fee;

    let account = {
        let seat = table.seat_mut(survivor).ok_or(EngineError::EmptySeat)?;
        seat.stack += prize;
        seat.account
    };

    engine.history.push(HandEventKind::PotAwarded {
        seat: survivor,
        account,
        amount: prize,
    });
    engine.history.push(HandEventKind::HandFinished {
        hand_id: engine.hand_id,
        table_id: engine.table_id,
    });

    info!(
        "table {}: hand {} won uncontested by seat {survivor} ({} chips)",
        table.id, engine.hand_id, prize.0
    );

    let mut awards = HashMap::new();
    awards.insert(survivor, prize);
    let summary = build_summary(table, engine, total_pot, fee, &HashMap::new(), &awards);

    finish_hand_state(table);
    Ok(summary)
}

/// Полный расчёт через шоудаун: ранги вскрывшихся, сайд-поты, комиссия,
/// раздача банков.
fn settle_showdown<L: ChipsLedger>(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut L,
) -> Result<HandSummary, EngineError> {
    table.street = Street::Showdown;

    debug_assert_eq!(
        engine.contributions.values().fold(Chips::ZERO, |a, &c| a + c),
        table.total_pot,
        "банк обязан сходиться с суммой взносов"
    );

    // Ранги вскрывшихся претендентов.
    let mut ranks: HashMap<SeatIndex, HandRank> = HashMap::new();
    for (&seat_idx, cards) in engine.revealed.iter() {
        let in_hand = table
            .seat(seat_idx)
            .map(|s| s.is_in_hand())
            .unwrap_or(false);
        if in_hand {
            ranks.insert(seat_idx, evaluate_best_hand(cards, &table.board));
        }
    }

    let folded: HashSet<SeatIndex> = engine
        .contributions
        .keys()
        .copied()
        .filter(|&idx| {
            table
                .seat(idx)
                .map(|s| !s.is_in_hand())
                .unwrap_or(true)
        })
        .collect();

    let mut pots = collect_pots(&engine.contributions, &folded);

    let total_pot = table.total_pot;
    let fee = take_service_fee(table, engine, ledger, total_pot)?;
    if let Some(main) = pots.first_mut() {
        main.amount -= fee;
    }

    let button = table.dealer_button.unwrap_or(0);
    let order = acting_order(table, button);
    let awards_list = distribute(&pots, &ranks, &order);

    let mut awards: HashMap<SeatIndex, Chips> = HashMap::new();
    for award in &awards_list {
        let account = {
            let seat = table.seat_mut(award.seat).ok_or(EngineError::EmptySeat)?;
            seat.stack += award.amount;
            seat.account
        };
        awards.insert(award.seat, award.amount);
        engine.history.push(HandEventKind::PotAwarded {
            seat: award.seat,
            account,
            amount: award.amount,
        });
    }

    engine.history.push(HandEventKind::HandFinished {
        hand_id: engine.hand_id,
        table_id: engine.table_id,
    });

    info!(
        "table {}: hand {} settled at showdown, pot {} (fee {})",
        table.id, engine.hand_id, total_pot.0, fee.0
    );

    let summary = build_summary(table, engine, total_pot, fee, &ranks, &awards);

    finish_hand_state(table);
    Ok(summary)
}

/// Комиссия стола: bps от общего банка, в трежери. Ноль не переводим.
fn take_service_fee<L: ChipsLedger>(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut L,
    total_pot: Chips,
) -> Result<Chips, EngineError> {
    let fee = total_pot.bps(table.config.fee_bps);
    if !fee.is_zero() {
        ledger.transfer(StoreId::Table(table.id), StoreId::Treasury, fee)?;
        engine.history.push(HandEventKind::FeeCharged { amount: fee });
    }
    Ok(fee)
}

/// Итоги по всем занятым местам.
fn build_summary(
    table: &Table,
    engine: &HandEngine,
    total_pot: Chips,
    fee: Chips,
    ranks: &HashMap<SeatIndex, HandRank>,
    awards: &HashMap<SeatIndex, Chips>,
) -> HandSummary {
    let mut results = Vec::new();
    for (idx, seat_opt) in table.seats.iter().enumerate() {
        if let Some(seat) = seat_opt {
            let seat_idx = idx as SeatIndex;
            let won = awards.get(&seat_idx).copied().unwrap_or(Chips::ZERO);
            results.push(SeatHandResult {
                account: seat.account,
                seat: seat_idx,
                rank: ranks.get(&seat_idx).copied(),
                won,
                is_winner: !won.is_zero(),
            });
        }
    }

    HandSummary {
        hand_id: engine.hand_id,
        table_id: engine.table_id,
        street_reached: table.street,
        board: table.board.clone(),
        total_pot,
        fee_paid: fee,
        results,
    }
}

/// Привести стол в состояние «между раздачами».
fn finish_hand_state(table: &mut Table) {
    table.hand_in_progress = false;
    table.total_pot = Chips::ZERO;
    table.current_hand_id = None;

    for seat_opt in table.seats.iter_mut() {
        if let Some(seat) = seat_opt {
            seat.street_bet = Chips::ZERO;
            // Пустой стек — место выпадает из раздач до докупки.
            if seat.stack.is_zero() {
                seat.status = SeatStatus::SittingOut;
            }
        }
    }
}
