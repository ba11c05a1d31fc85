// tests/table_flow_tests.rs

//! Сквозные тесты стола через TableManager:
//! - посадка и границы бай-ина;
//! - таймаут-клеймы на окнах коммитов и вскрытий (сценарий «молчун»);
//! - пауза/возобновление и аварийный возврат;
//! - «мёртвая кнопка» после ухода;
//! - страддл;
//! - консервация фишек в леджере.

use holdem_engine::domain::{
    AnteType, Card, Chips, PlayerId, SeatIndex, Table, TableConfig, TableId, TableStakes,
};
use holdem_engine::engine::game_loop::{HandPhase, HandStatus};
use holdem_engine::engine::{
    commitment_hash, EngineError, PlayerAction, PlayerActionKind, TableManager,
};
use holdem_engine::infra::DeterministicRng;
use holdem_engine::ledger::{ChipsLedger, InMemoryLedger, LedgerError, StoreId};
use holdem_engine::time_ctrl::{TimeRules, Timestamp};

const NOW: Timestamp = Timestamp(10_000);
const TABLE_ID: TableId = 1;
const ADMIN: PlayerId = 1;
const BUY_IN: Chips = Chips(1_000);

/// Менеджер со столом 50/100 на 5 мест и три посаженных аккаунта (1, 2, 3).
fn setup(allow_straddle: bool) -> TableManager<InMemoryLedger> {
    let config = TableConfig {
        max_seats: 5,
        stakes: TableStakes::new(Chips(50), Chips(100), AnteType::None, Chips::ZERO),
        allow_straddle,
        min_buyin: Chips(500),
        max_buyin: Chips(2_000),
        fee_bps: 30,
    };
    let table = Table::new(TABLE_ID, "Flow test table".to_string(), ADMIN, config);

    let mut manager = TableManager::new(InMemoryLedger::new(), TimeRules::standard());
    manager.add_table(table);

    for account in 1..=3u64 {
        manager.ledger_mut().buy(account, 100).expect("buy chips");
        manager
            .join_table(TABLE_ID, account, (account - 1) as SeatIndex, BUY_IN)
            .expect("join table");
    }

    manager
}

/// «Дилер»: раздать карманные карты из колоды стола и закоммитить их
/// за каждое участвующее место. Возвращает (seat, cards, nonce).
fn deal_and_commit(
    manager: &mut TableManager<InMemoryLedger>,
    skip: &[SeatIndex],
    now: Timestamp,
) -> Vec<(SeatIndex, Vec<Card>, u64)> {
    let in_hand: Vec<SeatIndex> = {
        let table = manager.table(TABLE_ID).expect("table exists");
        (0..table.max_seats())
            .filter(|&i| table.seat(i).map(|s| s.is_in_hand()).unwrap_or(false))
            .collect()
    };

    let mut dealt = Vec::new();
    {
        let engine = manager
            .hand_engine_mut(TABLE_ID)
            .expect("hand must be active");
        for &seat in &in_hand {
            let cards = engine.deck.draw_n(2);
            dealt.push((seat, cards, 0xBEEF + seat as u64));
        }
    }

    for (seat, cards, nonce) in &dealt {
        if skip.contains(seat) {
            continue;
        }
        let hash = commitment_hash(cards, *nonce);
        manager
            .commit_cards(TABLE_ID, *seat, hash, now)
            .expect("commit");
    }

    dealt
}

fn call_or_check(manager: &mut TableManager<InMemoryLedger>, now: Timestamp) -> HandStatus {
    let seat = manager
        .current_actor_seat(TABLE_ID)
        .expect("actor must exist");
    let (account, street_bet) = {
        let table = manager.table(TABLE_ID).expect("table exists");
        let s = table.seat(seat).expect("occupied");
        (s.account, s.street_bet)
    };
    let to_call = manager
        .hand_engine(TABLE_ID)
        .map(|e| e.betting.call_amount(street_bet))
        .unwrap_or(Chips::ZERO);

    let kind = if to_call.is_zero() {
        PlayerActionKind::Check
    } else {
        PlayerActionKind::Call
    };

    manager
        .apply_action(
            TABLE_ID,
            PlayerAction {
                account,
                seat,
                kind,
            },
            now,
        )
        .expect("scripted action is legal")
}

//
// ПОСАДКА
//

/// Бай-ин вне границ, занятое место и повторная посадка отклоняются;
/// нехватка средств на счёте — ошибка леджера без мутаций стола.
#[test]
fn join_table_validation() {
    let mut manager = setup(false);
    manager.ledger_mut().buy(4, 100).expect("buy");

    let err = manager
        .join_table(TABLE_ID, 4, 3, Chips(100))
        .expect_err("below min buy-in");
    assert!(matches!(err, EngineError::BuyInOutOfRange));

    let err = manager
        .join_table(TABLE_ID, 4, 3, Chips(5_000))
        .expect_err("above max buy-in");
    assert!(matches!(err, EngineError::BuyInOutOfRange));

    let err = manager
        .join_table(TABLE_ID, 4, 0, BUY_IN)
        .expect_err("seat 0 is taken");
    assert!(matches!(err, EngineError::SeatTaken(0)));

    let err = manager
        .join_table(TABLE_ID, 1, 3, BUY_IN)
        .expect_err("account 1 already seated");
    assert!(matches!(err, EngineError::AlreadySeated(1)));

    // Счёт 5 пуст: перевод падает, место остаётся пустым.
    let err = manager
        .join_table(TABLE_ID, 5, 3, BUY_IN)
        .expect_err("no funds");
    assert!(matches!(
        err,
        EngineError::Ledger(LedgerError::InsufficientBalance { .. })
    ));
    assert!(manager.table(TABLE_ID).unwrap().is_seat_empty(3));

    // Корректная посадка проходит и списывает фишки со счёта.
    let before = manager.ledger().balance(StoreId::Account(4));
    manager
        .join_table(TABLE_ID, 4, 3, BUY_IN)
        .expect("valid join");
    assert_eq!(
        manager.ledger().balance(StoreId::Account(4)),
        before - BUY_IN
    );
}

//
// ТАЙМАУТЫ (сценарий «молчун»)
//

/// Место не коммитит: до дедлайна клейм отклоняется, после — место
/// сфолжено со штрафом 10% от взноса; не вскрывшееся место наказывается
/// так же, а банк уходит единственному оставшемуся без сравнения рук.
#[test]
fn timeout_claims_on_commit_and_reveal_windows() {
    let mut manager = setup(false);
    let mut rng = DeterministicRng::from_seed(21);
    manager
        .start_hand(TABLE_ID, &mut rng, 1, NOW)
        .expect("start hand");

    // Кнопка 0, SB 1 (50), BB 2 (100). Место 2 молчит.
    let dealt = deal_and_commit(&mut manager, &[2], NOW);

    // Слишком рано.
    let err = manager
        .claim_timeout(TABLE_ID, 2, NOW.plus_secs(10))
        .expect_err("deadline not reached");
    assert!(matches!(err, EngineError::DeadlineNotReached));

    // Клейм против исправного места — нечего клеймить.
    let err = manager
        .claim_timeout(TABLE_ID, 0, NOW.plus_secs(10))
        .expect_err("seat 0 committed in time");
    assert!(matches!(err, EngineError::IllegalAction));

    // После дедлайна: фолд + штраф 10% от взноса 100 → 10 фишек в трежери.
    let after_commit_deadline = NOW.plus_secs(31);
    let status = manager
        .claim_timeout(TABLE_ID, 2, after_commit_deadline)
        .expect("claim after deadline");
    assert!(matches!(status, HandStatus::Ongoing));
    assert_eq!(manager.ledger().balance(StoreId::Treasury), Chips(10));
    {
        let table = manager.table(TABLE_ID).unwrap();
        let seat2 = table.seat(2).unwrap();
        assert!(!seat2.is_in_hand());
        assert_eq!(seat2.stack, BUY_IN - Chips(100) - Chips(10));
    }

    // Оба оставшихся закоммитили — торговля открылась.
    assert!(matches!(
        manager.hand_engine(TABLE_ID).unwrap().phase,
        HandPhase::Betting
    ));

    // В торговле клеймить нечего.
    let err = manager
        .claim_timeout(TABLE_ID, 0, after_commit_deadline)
        .expect_err("no deadline during betting");
    assert!(matches!(err, EngineError::IllegalAction));

    // Доигрываем торговлю чеками/коллами до окна вскрытий.
    let mut now = after_commit_deadline;
    while manager
        .hand_engine(TABLE_ID)
        .map(|e| matches!(e.phase, HandPhase::Betting))
        .unwrap_or(false)
    {
        now = now.plus_secs(1);
        call_or_check(&mut manager, now);
    }
    assert!(matches!(
        manager.hand_engine(TABLE_ID).unwrap().phase,
        HandPhase::Revealing
    ));

    // Место 0 вскрывается, место 1 молчит.
    let (seat0, cards0, nonce0) = dealt
        .iter()
        .find(|(s, _, _)| *s == 0)
        .cloned()
        .expect("seat 0 dealt");
    let status = manager
        .reveal_cards(TABLE_ID, seat0, cards0, nonce0, now)
        .expect("reveal seat 0");
    assert!(matches!(status, HandStatus::Ongoing));

    // До дедлайна вскрытий клейм рано.
    let err = manager
        .claim_timeout(TABLE_ID, 1, now.plus_secs(5))
        .expect_err("reveal deadline not reached");
    assert!(matches!(err, EngineError::DeadlineNotReached));

    // После дедлайна: фолд места 1 со штрафом 10 (взнос 100),
    // банк уходит месту 0 без сравнения рук.
    let late = now.plus_secs(61);

    // Опоздавшее вскрытие уже не принимается.
    let (seat1, cards1, nonce1) = dealt
        .iter()
        .find(|(s, _, _)| *s == 1)
        .cloned()
        .expect("seat 1 dealt");
    let err = manager
        .reveal_cards(TABLE_ID, seat1, cards1, nonce1, late)
        .expect_err("late reveal");
    assert!(matches!(err, EngineError::DeadlinePassed));

    let status = manager
        .claim_timeout(TABLE_ID, 1, late)
        .expect("claim non-revealer");
    let summary = match status {
        HandStatus::Finished(summary, _) => summary,
        HandStatus::Ongoing => panic!("single survivor must settle the hand"),
    };

    // Взносы: 100 + 100 + 100 = 300, комиссия 30 bps = 0.
    assert_eq!(summary.total_pot, Chips(300));
    assert_eq!(summary.fee_paid, Chips::ZERO);

    let table = manager.table(TABLE_ID).unwrap();
    assert_eq!(table.seat(0).unwrap().stack, Chips(1_200));
    assert_eq!(table.seat(1).unwrap().stack, Chips(890));
    assert_eq!(table.seat(2).unwrap().stack, Chips(890));
    assert_eq!(manager.ledger().balance(StoreId::Treasury), Chips(20));
    assert!(!manager.has_active_hand(TABLE_ID));

    // Консервация: счёт стола равен сумме стеков.
    assert_eq!(
        manager.ledger().balance(StoreId::Table(TABLE_ID)),
        Chips(1_200 + 890 + 890)
    );
}

//
// ПАУЗА / АВАРИЙНЫЙ ВОЗВРАТ
//

/// Пауза доступна только админу; на паузе действия отклоняются;
/// abort возвращает взносы как есть и завершает раздачу.
#[test]
fn pause_and_emergency_abort() {
    let mut manager = setup(false);
    let mut rng = DeterministicRng::from_seed(22);
    manager
        .start_hand(TABLE_ID, &mut rng, 1, NOW)
        .expect("start hand");
    deal_and_commit(&mut manager, &[], NOW);

    // Не-админ не может ставить на паузу.
    let err = manager.pause(TABLE_ID, 2).expect_err("not an admin");
    assert!(matches!(err, EngineError::NotAuthorized));

    manager.pause(TABLE_ID, ADMIN).expect("admin pause");

    // На паузе любые игровые действия отклоняются.
    let actor = manager.current_actor_seat(TABLE_ID).expect("actor");
    let account = manager
        .table(TABLE_ID)
        .unwrap()
        .seat(actor)
        .unwrap()
        .account;
    let err = manager
        .apply_action(
            TABLE_ID,
            PlayerAction {
                account,
                seat: actor,
                kind: PlayerActionKind::Fold,
            },
            NOW,
        )
        .expect_err("paused table rejects actions");
    assert!(matches!(err, EngineError::TablePaused));

    // Аварийный возврат: блайнды вернулись, раздачи нет, комиссии нет.
    manager
        .emergency_abort(TABLE_ID, ADMIN)
        .expect("admin abort");

    let table = manager.table(TABLE_ID).unwrap();
    for idx in 0..3u8 {
        assert_eq!(
            table.seat(idx).unwrap().stack,
            BUY_IN,
            "contributions must be returned as-is"
        );
    }
    assert!(!table.hand_in_progress);
    assert!(!manager.has_active_hand(TABLE_ID));
    assert_eq!(manager.ledger().balance(StoreId::Treasury), Chips::ZERO);

    // Стол всё ещё на паузе: новую раздачу не начать до resume.
    let err = manager
        .start_hand(TABLE_ID, &mut rng, 2, NOW)
        .expect_err("paused");
    assert!(matches!(err, EngineError::TablePaused));

    manager.resume(TABLE_ID, ADMIN).expect("resume");
    manager
        .start_hand(TABLE_ID, &mut rng, 2, NOW)
        .expect("hand starts after resume");
}

//
// МЁРТВАЯ КНОПКА
//

/// Уход места, которому причиталась кнопка, оставляет кнопку на пустом
/// месте на одну раздачу; блайнды идут от следующих занятых мест.
#[test]
fn dead_button_after_leave() {
    let mut manager = setup(false);
    let mut rng = DeterministicRng::from_seed(23);

    // Раздача 1: кнопка на 0. Все коммитят, двое фолдят — быстрый конец.
    manager
        .start_hand(TABLE_ID, &mut rng, 1, NOW)
        .expect("hand 1");
    assert_eq!(manager.table(TABLE_ID).unwrap().dealer_button, Some(0));
    deal_and_commit(&mut manager, &[], NOW);

    for _ in 0..2 {
        let seat = manager.current_actor_seat(TABLE_ID).expect("actor");
        let account = manager
            .table(TABLE_ID)
            .unwrap()
            .seat(seat)
            .unwrap()
            .account;
        manager
            .apply_action(
                TABLE_ID,
                PlayerAction {
                    account,
                    seat,
                    kind: PlayerActionKind::Fold,
                },
                NOW,
            )
            .expect("fold");
    }
    assert!(!manager.has_active_hand(TABLE_ID));

    // Кнопку в раздаче 2 должно получить место 1 — но оно уходит.
    manager
        .leave_after_hand(TABLE_ID, 1)
        .expect("leave scheduled");
    // Раздачи нет, место освободилось сразу, стек вернулся на счёт.
    assert!(manager.table(TABLE_ID).unwrap().is_seat_empty(1));

    // Раздача 2: кнопка стоит на пустом месте 1 («мёртвая»),
    // SB — место 2, BB — место 0.
    manager
        .start_hand(TABLE_ID, &mut rng, 2, NOW)
        .expect("hand 2");
    let table = manager.table(TABLE_ID).unwrap();
    assert_eq!(table.dealer_button, Some(1));
    assert!(table.is_seat_empty(1));
    assert_eq!(table.seat(2).unwrap().street_bet, Chips(50), "seat 2 is SB");
    assert_eq!(table.seat(0).unwrap().street_bet, Chips(100), "seat 0 is BB");
    assert_eq!(table.dead_button, None, "marker consumed by hand start");
}

//
// СТРАДДЛ
//

/// Страддл от UTG до открытия торговли: ставка 2×BB становится
/// целевой, очередь хода сдвигается; чужой страддл и повторный
/// отклоняются.
#[test]
fn straddle_shifts_opening_bet() {
    let mut manager = setup(true);
    let mut rng = DeterministicRng::from_seed(24);
    manager
        .start_hand(TABLE_ID, &mut rng, 1, NOW)
        .expect("start hand");

    // Кнопка 0, SB 1, BB 2 → UTG — место 0.
    let err = manager
        .post_straddle(TABLE_ID, 1)
        .expect_err("only UTG may straddle");
    assert!(matches!(err, EngineError::NotPlayersTurn(_)));

    manager.post_straddle(TABLE_ID, 0).expect("UTG straddle");

    let err = manager
        .post_straddle(TABLE_ID, 0)
        .expect_err("double straddle");
    assert!(matches!(err, EngineError::IllegalAction));

    {
        let engine = manager.hand_engine(TABLE_ID).unwrap();
        assert_eq!(engine.betting.current_bet, Chips(200));
        assert_eq!(engine.straddle_seat, Some(0));
        let table = manager.table(TABLE_ID).unwrap();
        assert_eq!(table.seat(0).unwrap().street_bet, Chips(200));
    }

    // После коммитов первым ходит место 1 (следующее за страддлером).
    deal_and_commit(&mut manager, &[], NOW);
    assert_eq!(manager.current_actor_seat(TABLE_ID), Some(1));

    // SB до 200 далеко: его call — 150.
    let engine = manager.hand_engine(TABLE_ID).unwrap();
    let table = manager.table(TABLE_ID).unwrap();
    assert_eq!(
        engine.betting.call_amount(table.seat(1).unwrap().street_bet),
        Chips(150)
    );
}

/// Страддл на столе без страддла отклоняется.
#[test]
fn straddle_rejected_when_disabled() {
    let mut manager = setup(false);
    let mut rng = DeterministicRng::from_seed(25);
    manager
        .start_hand(TABLE_ID, &mut rng, 1, NOW)
        .expect("start hand");

    let err = manager
        .post_straddle(TABLE_ID, 0)
        .expect_err("straddle disabled");
    assert!(matches!(err, EngineError::IllegalAction));
}

//
// SIT OUT / SIT IN / АНТЕ
//

/// Sit out выводит место из раздач (блайнды мимо него); sit in во время
/// раздачи отклоняется, между раздачами возвращает в игру.
#[test]
fn sit_out_and_sit_in() {
    let mut manager = setup(false);
    manager.sit_out(TABLE_ID, 1).expect("sit out seat 1");

    let mut rng = DeterministicRng::from_seed(26);
    manager
        .start_hand(TABLE_ID, &mut rng, 1, NOW)
        .expect("hand with 2 ready seats");

    // Кнопка 0; место 1 вне раздачи, блайнды достались 2 и 0.
    {
        let table = manager.table(TABLE_ID).unwrap();
        assert!(!table.seat(1).unwrap().is_in_hand());
        assert_eq!(table.seat(2).unwrap().street_bet, Chips(50));
        assert_eq!(table.seat(0).unwrap().street_bet, Chips(100));
    }

    // Во время раздачи вернуться нельзя.
    let err = manager
        .sit_in(TABLE_ID, 1)
        .expect_err("sit in mid-hand");
    assert!(matches!(err, EngineError::IllegalAction));

    manager
        .emergency_abort(TABLE_ID, ADMIN)
        .expect("abort to end the hand");
    manager.sit_in(TABLE_ID, 1).expect("sit in between hands");

    let table = manager.table(TABLE_ID).unwrap();
    assert!(matches!(
        table.seat(1).unwrap().status,
        holdem_engine::domain::SeatStatus::Active
    ));
}

/// Классическое анте собирается со всех участников раздачи.
#[test]
fn classic_ante_is_collected() {
    let config = TableConfig {
        max_seats: 5,
        stakes: TableStakes::new(Chips(50), Chips(100), AnteType::Classic, Chips(10)),
        allow_straddle: false,
        min_buyin: Chips(500),
        max_buyin: Chips(2_000),
        fee_bps: 30,
    };
    let table = Table::new(TABLE_ID, "Ante table".to_string(), ADMIN, config);

    let mut manager = TableManager::new(InMemoryLedger::new(), TimeRules::standard());
    manager.add_table(table);
    for account in 1..=3u64 {
        manager.ledger_mut().buy(account, 100).expect("buy chips");
        manager
            .join_table(TABLE_ID, account, (account - 1) as SeatIndex, BUY_IN)
            .expect("join table");
    }

    let mut rng = DeterministicRng::from_seed(27);
    manager
        .start_hand(TABLE_ID, &mut rng, 1, NOW)
        .expect("start hand");

    // Анте 10 с каждого + SB 50 + BB 100.
    let table = manager.table(TABLE_ID).unwrap();
    assert_eq!(table.total_pot, Chips(3 * 10 + 50 + 100));
    // Анте не считается ставкой улицы.
    assert_eq!(table.seat(0).unwrap().street_bet, Chips::ZERO);
    assert_eq!(table.seat(1).unwrap().street_bet, Chips(50));
    assert_eq!(table.seat(2).unwrap().street_bet, Chips(100));
    assert_eq!(table.seat(0).unwrap().stack, BUY_IN - Chips(10));
}

//
// УХОД И ЛЕДЖЕР
//

/// Немедленный уход (без активной раздачи) возвращает стек на счёт;
/// фишки в леджере сходятся до фишки.
#[test]
fn leave_returns_stack_to_account() {
    let mut manager = setup(false);

    let account_before = manager.ledger().balance(StoreId::Account(3));
    manager.leave_after_hand(TABLE_ID, 2).expect("leave now");

    assert!(manager.table(TABLE_ID).unwrap().is_seat_empty(2));
    assert_eq!(
        manager.ledger().balance(StoreId::Account(3)),
        account_before + BUY_IN
    );

    // Счёт стола равен сумме оставшихся стеков.
    assert_eq!(
        manager.ledger().balance(StoreId::Table(TABLE_ID)),
        BUY_IN + BUY_IN
    );
}
