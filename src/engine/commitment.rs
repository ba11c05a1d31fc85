//! Commit-reveal для карманных карт.
//!
//! Раздающая сторона (вне движка) сообщает игроку его карты; игрок
//! публикует Blake2b-256 хэш карт + nonce. Вскрытие проверяется против
//! этого хэша побайтно. Пока карты не вскрыты, движок их не знает.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Suit};

type Blake2b256 = Blake2b<U32>;

/// Хэш коммита (32 байта Blake2b).
pub type CommitHash = [u8; 32];

/// Зафиксированный коммит одного места.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardCommitment {
    pub hash: CommitHash,
}

impl CardCommitment {
    pub fn new(hash: CommitHash) -> Self {
        Self { hash }
    }

    /// Совпадает ли вскрытие с коммитом.
    pub fn matches(&self, cards: &[Card], nonce: u64) -> bool {
        commitment_hash(cards, nonce) == self.hash
    }
}

/// Канонический хэш набора карт с nonce.
///
/// Кодирование: для каждой карты байт ранга (2..14) и байт масти (0..3),
/// в порядке следования карт, затем nonce в little-endian. Порядок карт
/// значим — коммитящая сторона фиксирует и его.
pub fn commitment_hash(cards: &[Card], nonce: u64) -> CommitHash {
    let mut hasher = Blake2b256::new();
    for card in cards {
        hasher.update([card.rank as u8, suit_index(card.suit)]);
    }
    hasher.update(nonce.to_le_bytes());
    hasher.finalize().into()
}

fn suit_index(suit: Suit) -> u8 {
    match suit {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}
