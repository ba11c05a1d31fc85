use crate::domain::card::Rank;
use crate::domain::hand::HandRank;

/// Категория покерной руки по силе.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl HandRank {
    /// Собрать HandRank из категории и 5 рангов (от старшего к младшему).
    ///
    /// Схема кодирования (u32):
    ///   [категория:4 бита][r0:4][r1:4][r2:4][r3:4][r4:4]
    /// Rank: 2..14 (2..A) влазит в 4 бита. Сравнение u32 даёт
    /// сначала категорию, затем кикеры от старшего к младшему.
    pub fn from_category_and_ranks(category: HandCategory, ranks: [Rank; 5]) -> Self {
        let cat_bits = (category as u32) & 0x0F;

        let mut value = cat_bits << 20;
        let mut shift = 16;
        for r in ranks {
            value |= ((r as u32) & 0x0F) << shift;
            shift -= 4;
        }

        HandRank(value)
    }

    /// Вытащить категорию из HandRank.
    pub fn category(&self) -> HandCategory {
        match (self.0 >> 20) & 0x0F {
            0 => HandCategory::HighCard,
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            8 => HandCategory::StraightFlush,
            9 => HandCategory::RoyalFlush,
            _ => HandCategory::HighCard,
        }
    }

    /// Достать 5 рангов (от старшего к младшему) из HandRank.
    pub fn ranks(&self) -> [Rank; 5] {
        let mut out = [Rank::Two; 5];
        let mut shift = 16;
        for slot in out.iter_mut() {
            let nibble = ((self.0 >> shift) & 0x0F) as u8;
            *slot = Rank::from_value(nibble).unwrap_or(Rank::Two);
            shift -= 4;
        }
        out
    }
}

/// Удобная функция — получить категорию из HandRank.
pub fn hand_category(rank: HandRank) -> HandCategory {
    rank.category()
}

/// Человеческое описание руки по категории.
pub fn describe_hand(rank: HandRank) -> String {
    let cat = rank.category();
    match cat {
        HandCategory::HighCard => "High card".to_string(),
        HandCategory::OnePair => "One pair".to_string(),
        HandCategory::TwoPair => "Two pair".to_string(),
        HandCategory::ThreeOfAKind => "Three of a kind".to_string(),
        HandCategory::Straight => "Straight".to_string(),
        HandCategory::Flush => "Flush".to_string(),
        HandCategory::FullHouse => "Full house".to_string(),
        HandCategory::FourOfAKind => "Four of a kind".to_string(),
        HandCategory::StraightFlush => "Straight flush".to_string(),
        HandCategory::RoyalFlush => "Royal flush".to_string(),
    }
}
