use std::cmp::Ordering;

use crate::domain::card::{Card, Rank, Suit};
use crate::domain::hand::HandRank;

use super::hand_rank::HandCategory;
use super::lookup_tables::{detect_straight, rank_to_bit, RankMask};

/// Вычислить лучшую 5-карточную руку из произвольного набора 5–7 карт.
///
/// Дубликаты (одинаковые ранг+масть) — ошибка программирования, не
/// рантайм-условие: ловим debug_assert'ом.
pub fn evaluate_cards(cards: &[Card]) -> HandRank {
    assert!(
        (5..=7).contains(&cards.len()),
        "evaluate_cards ожидает от 5 до 7 карт"
    );
    debug_assert!(no_duplicates(cards), "дубликаты карт во входе eval");

    best_of_all_5card_combinations(cards)
}

/// Карман + борд → лучшая рука. Тонкая обёртка для движка.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> HandRank {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);

    evaluate_cards(&all_cards)
}

/// Сравнение двух рангов. Тотально и согласовано с порядком категорий,
/// затем кикер за кикером от старшего к младшему (это даёт упаковка u32).
pub fn compare_hands(a: HandRank, b: HandRank) -> Ordering {
    a.cmp(&b)
}

fn no_duplicates(cards: &[Card]) -> bool {
    for (i, a) in cards.iter().enumerate() {
        if cards[i + 1..].iter().any(|b| b == a) {
            return false;
        }
    }
    true
}

/// Перебираем все 5-карточные комбинации из N (N=5–7, максимум C(7,5)=21)
/// и выбираем лучшую.
fn best_of_all_5card_combinations(cards: &[Card]) -> HandRank {
    let n = cards.len();

    let mut best: Option<HandRank> = None;

    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let r = evaluate_5card_hand(&five);
                        if best.map_or(true, |best_r| r > best_r) {
                            best = Some(r);
                        }
                    }
                }
            }
        }
    }

    best.expect("должна быть хотя бы одна 5-карточная комбинация")
}

/// Оценка строго 5-карточной комбинации.
fn evaluate_5card_hand(cards: &[Card; 5]) -> HandRank {
    let mut suit_counts = [0u8; 4]; // 0:clubs, 1:diamonds, 2:hearts, 3:spades
    let mut rank_counts = [0u8; 15]; // индексы 2..14
    let mut rank_mask: RankMask = 0;

    for card in cards.iter() {
        let suit_idx = match card.suit {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        };
        suit_counts[suit_idx] += 1;
        rank_counts[card.rank as usize] += 1;
        rank_mask |= rank_to_bit(card.rank);
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight_high = detect_straight(rank_mask);

    // Straight flush / royal flush: в 5 картах flush + straight
    // гарантированно одномастный стрит.
    if is_flush {
        if let Some(high) = straight_high {
            let ranks = straight_rank_array(high);
            let category = if high == Rank::Ace {
                HandCategory::RoyalFlush
            } else {
                HandCategory::StraightFlush
            };
            return HandRank::from_category_and_ranks(category, ranks);
        }
    }

    // (rank, count) по убыванию count, затем по убыванию ранга.
    let mut rc_list: Vec<(Rank, u8)> = Vec::with_capacity(5);
    for r_val in (2usize..=14).rev() {
        let count = rank_counts[r_val];
        if count > 0 {
            let rank = Rank::from_value(r_val as u8).expect("r_val в диапазоне 2..=14");
            rc_list.push((rank, count));
        }
    }
    rc_list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    // Паттерн количеств: [4,1], [3,2], [3,1,1], [2,2,1], [2,1,1,1], [1;5].
    let pattern: Vec<u8> = rc_list.iter().map(|rc| rc.1).collect();

    if pattern == [4, 1] {
        // Каре: хвостовые ранги не сравниваются, забиваем двойками.
        let ranks = [rc_list[0].0, rc_list[1].0, Rank::Two, Rank::Two, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::FourOfAKind, ranks);
    }

    if pattern == [3, 2] {
        let ranks = [rc_list[0].0, rc_list[1].0, Rank::Two, Rank::Two, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::FullHouse, ranks);
    }

    if is_flush {
        // Пять карт флеша по убыванию ранга.
        let mut flush_ranks: Vec<Rank> = cards.iter().map(|c| c.rank).collect();
        flush_ranks.sort_by(|a, b| b.cmp(a));
        let ranks = [
            flush_ranks[0],
            flush_ranks[1],
            flush_ranks[2],
            flush_ranks[3],
            flush_ranks[4],
        ];
        return HandRank::from_category_and_ranks(HandCategory::Flush, ranks);
    }

    if let Some(high) = straight_high {
        let ranks = straight_rank_array(high);
        return HandRank::from_category_and_ranks(HandCategory::Straight, ranks);
    }

    if pattern == [3, 1, 1] {
        let ranks = [
            rc_list[0].0,
            rc_list[1].0,
            rc_list[2].0,
            Rank::Two,
            Rank::Two,
        ];
        return HandRank::from_category_and_ranks(HandCategory::ThreeOfAKind, ranks);
    }

    if pattern == [2, 2, 1] {
        let ranks = [
            rc_list[0].0,
            rc_list[1].0,
            rc_list[2].0,
            Rank::Two,
            Rank::Two,
        ];
        return HandRank::from_category_and_ranks(HandCategory::TwoPair, ranks);
    }

    if pattern == [2, 1, 1, 1] {
        let ranks = [
            rc_list[0].0,
            rc_list[1].0,
            rc_list[2].0,
            rc_list[3].0,
            Rank::Two,
        ];
        return HandRank::from_category_and_ranks(HandCategory::OnePair, ranks);
    }

    // High card: просто топ-5 рангов по убыванию.
    let ranks = [
        rc_list[0].0,
        rc_list[1].0,
        rc_list[2].0,
        rc_list[3].0,
        rc_list[4].0,
    ];
    HandRank::from_category_and_ranks(HandCategory::HighCard, ranks)
}

/// Массив рангов [r0..r4] для стрита с заданной старшей картой.
fn straight_rank_array(high: Rank) -> [Rank; 5] {
    if high == Rank::Five {
        // Wheel: A2345, туз играет младшим и стоит последним.
        return [Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace];
    }

    let mut ranks = [Rank::Two; 5];
    let high_val = high as u8;
    for (i, slot) in ranks.iter_mut().enumerate() {
        *slot = Rank::from_value(high_val - i as u8).expect("стрит не выходит за диапазон рангов");
    }
    ranks
}
