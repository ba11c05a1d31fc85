// tests/eval_tests.rs

//! Тесты оценщика рук:
//! - категории распознаются и упорядочены;
//! - wheel (A2345) — самый младший стрит;
//! - royal flush старше любого стрит-флеша;
//! - сравнение тотально и транзитивно на случайной выборке.

use std::cmp::Ordering;
use std::str::FromStr;

use holdem_engine::domain::{Card, Deck};
use holdem_engine::engine::RandomSource;
use holdem_engine::eval::{compare_hands, evaluate_cards, hand_category, HandCategory};
use holdem_engine::infra::DeterministicRng;

/// Хелпер: рука из строк вида "Ah Kd ...".
fn hand(s: &str) -> Vec<Card> {
    s.split_whitespace()
        .map(|c| Card::from_str(c).expect("valid card literal"))
        .collect()
}

fn eval(s: &str) -> holdem_engine::domain::HandRank {
    evaluate_cards(&hand(s))
}

//
// КАТЕГОРИИ
//

/// Каждая категория распознаётся на эталонной руке.
#[test]
fn categories_are_recognized() {
    let cases = [
        ("Ah Kd 9s 7c 2h", HandCategory::HighCard),
        ("Ah Ad 9s 7c 2h", HandCategory::OnePair),
        ("Ah Ad 9s 9c 2h", HandCategory::TwoPair),
        ("Ah Ad As 7c 2h", HandCategory::ThreeOfAKind),
        ("5h 6d 7s 8c 9h", HandCategory::Straight),
        ("Ah Jh 9h 7h 2h", HandCategory::Flush),
        ("Ah Ad As 7c 7h", HandCategory::FullHouse),
        ("Ah Ad As Ac 2h", HandCategory::FourOfAKind),
        ("5h 6h 7h 8h 9h", HandCategory::StraightFlush),
        ("Ts Js Qs Ks As", HandCategory::RoyalFlush),
    ];

    for (cards, expected) in cases {
        let rank = eval(cards);
        assert_eq!(
            hand_category(rank),
            expected,
            "wrong category for {cards}"
        );
    }
}

/// Порядок категорий: каждая эталонная рука бьёт предыдущую.
#[test]
fn category_ladder_is_ordered() {
    let ladder = [
        "Ah Kd 9s 7c 2h",
        "2h 2d 9s 7c 3h", // слабейшая пара всё равно выше старшей карты
        "2h 2d 3s 3c 7h",
        "2h 2d 2s 7c 9h",
        "Ah 2d 3s 4c 5h", // wheel
        "2h 4h 5h 7h 9h",
        "2h 2d 2s 3c 3h",
        "2h 2d 2s 2c 3h",
        "2h 3h 4h 5h 6h",
        "Ts Js Qs Ks As",
    ];

    for pair in ladder.windows(2) {
        let lo = eval(pair[0]);
        let hi = eval(pair[1]);
        assert!(hi > lo, "{} must beat {}", pair[1], pair[0]);
    }
}

//
// WHEEL
//

/// Wheel выше любой не-стрит руки, но ниже 6-high стрита.
#[test]
fn wheel_is_lowest_straight() {
    let wheel = eval("Ac 2c 3c 4d 5c");
    let six_high = eval("2h 3d 4s 5c 6h");
    let trips = eval("Ah Ad As Kc Qh");
    let two_pair = eval("Ah Ad Ks Kc Qh");

    assert_eq!(hand_category(wheel), HandCategory::Straight);
    assert!(wheel < six_high, "wheel must lose to 6-high straight");
    assert!(wheel > trips, "wheel must beat three of a kind");
    assert!(wheel > two_pair, "wheel must beat two pair");
}

/// В wheel туз играет младшей картой, а не старшей.
#[test]
fn wheel_ace_plays_low() {
    let wheel = eval("Ah 2d 3s 4c 5h");
    let nine_high = eval("5h 6d 7s 8c 9h");
    assert!(nine_high > wheel, "9-high straight must beat the wheel");
}

//
// ROYAL FLUSH
//

/// Фиксированный royal flush старше любого фиксированного стрит-флеша.
#[test]
fn royal_flush_beats_straight_flushes() {
    let royal = eval("As Ks Qs Js Ts");
    assert_eq!(hand_category(royal), HandCategory::RoyalFlush);

    for sf in ["9h Th Jh Qh Kh", "2c 3c 4c 5c 6c", "Ad 2d 3d 4d 5d"] {
        let rank = eval(sf);
        assert_eq!(hand_category(rank), HandCategory::StraightFlush);
        assert!(royal > rank, "royal must beat straight flush {sf}");
    }
}

//
// КИКЕРЫ
//

/// Равные категории сравниваются по кикерам от старшего к младшему.
#[test]
fn kickers_break_ties_most_significant_first() {
    // Пара тузов: кикеры K97 против K96.
    let a = eval("Ah Ad Ks 9c 7h");
    let b = eval("As Ac Kd 9h 6s");
    assert!(a > b);

    // Полные совпадения по рангам — строгое равенство (сплит).
    let c = eval("Ah Ad Ks 9c 7h");
    let d = eval("As Ac Kh 9d 7s");
    assert_eq!(c, d, "same ranks in different suits must tie");
}

//
// 6–7 КАРТ
//

/// Из 7 карт выбирается лучшая 5-карточная комбинация.
#[test]
fn best_of_seven_is_found() {
    // Среди 7 карт спрятан флеш, хотя есть и пара тузов.
    let rank = evaluate_cards(&hand("Ah Ad 2h 5h 9h Jh 3c"));
    assert_eq!(hand_category(rank), HandCategory::Flush);

    // Стрит на борде + карман, дающий более старший стрит.
    let rank = evaluate_cards(&hand("8c 9d 6h 7s Th Jd 2c"));
    let straight_jack_high = eval("7s 8c 9d Th Jd");
    assert_eq!(rank, straight_jack_high);
}

//
// ТОТАЛЬНОСТЬ / ТРАНЗИТИВНОСТЬ
//

/// На случайной выборке рук сравнение тотально (ровно один из
/// исходов) и транзитивно.
#[test]
fn comparison_is_total_and_transitive_on_sample() {
    let mut rng = DeterministicRng::from_seed(7);

    // Набираем 40 случайных 5-карточных рук.
    let mut hands = Vec::new();
    for _ in 0..40 {
        let mut deck = Deck::standard_52();
        rng.shuffle(&mut deck.cards);
        hands.push(deck.draw_n(5));
    }

    let ranks: Vec<_> = hands.iter().map(|h| evaluate_cards(h)).collect();

    // Тотальность: для каждой пары ровно один исход.
    for (i, &a) in ranks.iter().enumerate() {
        for &b in ranks.iter().skip(i + 1) {
            match compare_hands(a, b) {
                Ordering::Less => assert!(b > a),
                Ordering::Greater => assert!(a > b),
                Ordering::Equal => assert_eq!(a, b),
            }
        }
    }

    // Транзитивность: a <= b <= c => a <= c на отсортированной выборке.
    let mut sorted = ranks.clone();
    sorted.sort();
    for w in sorted.windows(3) {
        assert!(w[0] <= w[1] && w[1] <= w[2] && w[0] <= w[2]);
    }
}
