// src/bin/holdem_dev_cli.rs
//
// Dev-CLI: прогоняет одну раздачу на троих от посадки до расчёта,
// изображая внешнего дилера (раздаёт карманные карты из колоды стола
// и коммитит их за игроков).

use holdem_engine::api::{
    execute, query, Command, CommandResponse, CreateTableCommand, Query, QueryResponse,
    TableCommand,
};
use holdem_engine::domain::blinds::AnteType;
use holdem_engine::domain::card::Card;
use holdem_engine::domain::chips::Chips;
use holdem_engine::domain::{PlayerId, SeatIndex, TableId};
use holdem_engine::engine::game_loop::HandPhase;
use holdem_engine::engine::{commitment_hash, PlayerAction, PlayerActionKind, TableManager};
use holdem_engine::eval::describe_hand;
use holdem_engine::infra::IdGenerator;
use holdem_engine::ledger::{ChipsLedger, InMemoryLedger, StoreId};
use holdem_engine::time_ctrl::{TimeRules, Timestamp};

fn main() {
    env_logger::init();

    println!("holdem_dev_cli: стартуем одну демонстрационную раздачу…");

    let ids = IdGenerator::new();
    let mut manager = TableManager::new(InMemoryLedger::new(), TimeRules::standard());
    let mut now = Timestamp::new(1_000);

    // 1. Аккаунты и фишки.
    let accounts: Vec<PlayerId> = (0..3).map(|_| ids.next_account_id()).collect();
    for &acc in &accounts {
        let chips = manager
            .ledger_mut()
            .buy(acc, 100)
            .expect("покупка фишек не должна падать");
        println!("аккаунт {acc}: куплено {} фишек", chips.0);
    }

    // 2. Стол.
    let table_id: TableId = ids.next_table_id();
    let admin = accounts[0];
    let create = Command::CreateTable(CreateTableCommand {
        table_id,
        name: "DEV TABLE".to_string(),
        max_seats: 5,
        small_blind: Chips::new(50),
        big_blind: Chips::new(100),
        ante: Chips::ZERO,
        ante_type: AnteType::None,
        allow_straddle: false,
        min_buyin: Chips::new(1_000),
        max_buyin: Chips::new(10_000),
    });
    execute(&mut manager, &ids, admin, create, now).expect("создание стола");

    // 3. Посадка.
    for (i, &acc) in accounts.iter().enumerate() {
        let join = Command::TableCommand(TableCommand::JoinTable {
            table_id,
            seat_index: i as SeatIndex,
            buy_in: Chips::new(5_000),
        });
        execute(&mut manager, &ids, acc, join, now).expect("посадка за стол");
    }

    // 4. Старт раздачи: блайнды + окно коммитов.
    execute(
        &mut manager,
        &ids,
        admin,
        Command::TableCommand(TableCommand::StartHand { table_id }),
        now,
    )
    .expect("старт раздачи");

    // 5. «Дилер»: раздаём карманные карты из колоды стола и коммитим.
    let mut dealt: Vec<(SeatIndex, PlayerId, Vec<Card>, u64)> = Vec::new();
    {
        let engine = manager
            .hand_engine_mut(table_id)
            .expect("раздача должна быть активна");
        for (i, &acc) in accounts.iter().enumerate() {
            let cards = engine.deck.draw_n(2);
            let nonce = 0xC0FFEE + i as u64;
            dealt.push((i as SeatIndex, acc, cards, nonce));
        }
    }
    for (seat, acc, cards, nonce) in &dealt {
        let hash = commitment_hash(cards, *nonce);
        let cmd = Command::TableCommand(TableCommand::CommitCards {
            table_id,
            seat_index: *seat,
            hash,
        });
        execute(&mut manager, &ids, *acc, cmd, now).expect("коммит карт");
        println!(
            "seat {seat}: карты {} {} закоммичены",
            cards[0], cards[1]
        );
    }

    // 6. Торговля: все просто уравнивают/чекают до ривера.
    now = now.plus_secs(5);
    while manager
        .hand_engine(table_id)
        .map(|e| matches!(e.phase, HandPhase::Betting))
        .unwrap_or(false)
    {
        let seat_idx = manager
            .current_actor_seat(table_id)
            .expect("в торговле должен быть ходящий");
        let (account, street_bet) = {
            let table = manager.table(table_id).expect("стол существует");
            let seat = table.seat(seat_idx).expect("место занято");
            (seat.account, seat.street_bet)
        };
        let to_call = manager
            .hand_engine(table_id)
            .map(|e| e.betting.call_amount(street_bet))
            .unwrap_or(Chips::ZERO);

        let kind = if to_call.is_zero() {
            PlayerActionKind::Check
        } else {
            PlayerActionKind::Call
        };
        println!("seat {seat_idx}: {kind:?}");

        let cmd = Command::TableCommand(TableCommand::PlayerAction {
            table_id,
            action: PlayerAction {
                account,
                seat: seat_idx,
                kind,
            },
        });
        execute(&mut manager, &ids, account, cmd, now).expect("действие игрока");
        now = now.plus_secs(1);
    }

    // 7. Вскрытия.
    let mut last_response = None;
    for (seat, acc, cards, nonce) in &dealt {
        let still_active = manager.hand_engine(table_id).is_some();
        if !still_active {
            break;
        }
        let cmd = Command::TableCommand(TableCommand::RevealCards {
            table_id,
            seat_index: *seat,
            cards: cards.clone(),
            nonce: *nonce,
        });
        last_response = Some(execute(&mut manager, &ids, *acc, cmd, now).expect("вскрытие карт"));
    }

    // 8. Итоги.
    match last_response {
        Some(CommandResponse::HandFinished { summary, .. }) => {
            println!();
            println!("================ РЕЗУЛЬТАТ РАЗДАЧИ =================");
            for r in &summary.results {
                let hand = r
                    .rank
                    .map(describe_hand)
                    .unwrap_or_else(|| "(не вскрылся)".to_string());
                println!(
                    "seat {}: {hand}, выиграно {} фишек{}",
                    r.seat,
                    r.won.0,
                    if r.is_winner { " [победитель]" } else { "" }
                );
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).expect("summary сериализуется")
            );
        }
        _ => println!("раздача не дошла до расчёта (неожиданно для сценария)"),
    }

    let view = query(&manager, Query::GetTableInfo { table_id }).expect("запрос состояния стола");
    if let QueryResponse::Table(view) = view {
        println!();
        println!("================ СОСТОЯНИЕ СТОЛА =================");
        println!(
            "{}",
            serde_json::to_string_pretty(&view).expect("view сериализуется")
        );
    }

    println!();
    println!(
        "трежери: {} фишек",
        manager.ledger().balance(StoreId::Treasury).0
    );
    for &acc in &accounts {
        println!(
            "аккаунт {acc}: на счету {} фишек",
            manager.ledger().balance(StoreId::Account(acc)).0
        );
    }
}
