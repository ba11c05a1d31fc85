//! Модуль оценки силы покерных рук (Texas Hold'em).
//!
//! Основные функции:
//!   `evaluate_cards(cards) -> HandRank` — любой набор из 5–7 карт;
//!   `evaluate_best_hand(hole, board) -> HandRank` — карман + борд.
//!
//! `HandRank` упорядочен тотально; равенство возможно и означает сплит.

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

pub use evaluator::{compare_hands, evaluate_best_hand, evaluate_cards};
pub use hand_rank::{describe_hand, hand_category, HandCategory};
