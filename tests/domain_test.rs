// tests/domain_test.rs

//! Тесты доменной модели: карты, фишки, стол.

use std::str::FromStr;

use holdem_engine::domain::{
    AnteType, Card, Chips, Rank, Seat, SeatStatus, Suit, Table, TableConfig, TableStakes,
};

fn demo_config() -> TableConfig {
    TableConfig {
        max_seats: 5,
        stakes: TableStakes::new(Chips::new(50), Chips::new(100), AnteType::None, Chips::ZERO),
        allow_straddle: false,
        min_buyin: Chips::new(1_000),
        max_buyin: Chips::new(10_000),
        fee_bps: 30,
    }
}

//
// CARDS
//

/// Display/FromStr согласованы для всех 52 карт.
#[test]
fn card_display_parse_roundtrip() {
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            let card = Card::new(rank, suit);
            let s = card.to_string();
            let parsed = Card::from_str(&s).expect("printed card must parse back");
            assert_eq!(parsed, card, "roundtrip failed for {s}");
        }
    }
}

/// Парсер отклоняет мусор.
#[test]
fn card_parse_rejects_garbage() {
    assert!(Card::from_str("").is_err());
    assert!(Card::from_str("A").is_err());
    assert!(Card::from_str("Ahh").is_err());
    assert!(Card::from_str("1h").is_err());
    assert!(Card::from_str("Ax").is_err());
}

//
// CHIPS
//

/// Вычитание фишек не уходит в минус.
#[test]
fn chips_subtraction_saturates() {
    let a = Chips::new(10);
    let b = Chips::new(25);
    assert_eq!(a - b, Chips::ZERO);

    let mut c = Chips::new(5);
    c -= Chips::new(7);
    assert_eq!(c, Chips::ZERO);
}

/// Комиссия в bps считается с округлением вниз.
#[test]
fn chips_bps_fee_math() {
    // 30 bps от 10_000 = 30.
    assert_eq!(Chips::new(10_000).bps(30), Chips::new(30));
    // 30 bps от 22 = 0 (округление вниз).
    assert_eq!(Chips::new(22).bps(30), Chips::ZERO);
    // 30 bps от 350 = 1.
    assert_eq!(Chips::new(350).bps(30), Chips::new(1));
}

//
// TABLE
//

/// Пустой стол: все места свободны, никто не готов играть.
#[test]
fn new_table_is_empty() {
    let table = Table::new(1, "t".to_string(), 7, demo_config());

    assert_eq!(table.seated_count(), 0);
    assert_eq!(table.ready_count(), 0);
    for idx in 0..table.max_seats() {
        assert!(table.is_seat_empty(idx));
    }
    // Выход за границы — тоже «пусто», а не паника.
    assert!(table.is_seat_empty(200));
}

/// Подсчёт готовых к раздаче мест учитывает sit out и пустые стеки.
#[test]
fn ready_count_skips_sitting_out_and_broke() {
    let mut table = Table::new(1, "t".to_string(), 7, demo_config());

    table.seats[0] = Some(Seat::new(10, Chips::new(5_000)));
    table.seats[1] = Some(Seat::new(11, Chips::new(5_000)));
    table.seats[2] = Some(Seat::new(12, Chips::new(5_000)));
    table.seats[3] = Some(Seat::new(13, Chips::ZERO));

    table.seat_mut(2).unwrap().status = SeatStatus::SittingOut;

    assert_eq!(table.seated_count(), 4);
    assert_eq!(table.ready_count(), 2);
    assert!(table.is_account_seated(11));
    assert!(!table.is_account_seated(99));
}
