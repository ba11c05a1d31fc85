//! Менеджер банка: разбиение взносов на main/side pots и раздача выигрышей.
//!
//! Инварианты:
//! - сумма банков всегда равна сумме взносов (фишки не теряются);
//! - eligible-множество каждого следующего банка — строгое подмножество
//!   предыдущего;
//! - сфолдившие места финансируют банки, но никогда не претендуют на них.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::HandRank;
use crate::domain::SeatIndex;

/// Один банк: сумма и места, претендующие на неё.
/// Индекс 0 в списке — главный банк, дальше сайд-поты.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    pub eligible_seats: Vec<SeatIndex>,
}

/// Выплата из банков одному месту.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotAward {
    pub seat: SeatIndex,
    pub amount: Chips,
}

/// Разбить взносы на банки по уровням.
///
/// Вход: contributions[seat] = сколько всего фишек внёс seat за раздачу;
/// folded — места, выбывшие из борьбы (фолд или принудительный фолд).
///
/// Алгоритм: отличные друг от друга ненулевые уровни взносов по
/// возрастанию; на каждом уровне банк размером
/// `(level_i - level_{i-1}) * count(взнос >= level_i)`, претенденты — все,
/// кто внёс не меньше уровня и не сфолдил. Уровни, на которых претендентов
/// не прибавилось или не осталось вовсе, вливаются в предыдущий банк —
/// так множества строго сужаются и фишки не пропадают.
pub fn collect_pots(
    contributions: &HashMap<SeatIndex, Chips>,
    folded: &HashSet<SeatIndex>,
) -> Vec<Pot> {
    // Собираем (seat, amount > 0).
    let mut entries: Vec<(SeatIndex, Chips)> = contributions
        .iter()
        .filter(|(_, chips)| !chips.is_zero())
        .map(|(seat, chips)| (*seat, *chips))
        .collect();

    if entries.is_empty() {
        return Vec::new();
    }

    // Сортируем по размеру взноса (возрастание), при равенстве — по месту,
    // чтобы результат не зависел от порядка обхода HashMap.
    entries.sort_by_key(|&(seat, c)| (c.0, seat));

    let mut pots: Vec<Pot> = Vec::new();
    let mut prev_level = Chips::ZERO;

    for i in 0..entries.len() {
        let level = entries[i].1;
        if level == prev_level {
            continue;
        }
        let level_diff = level - prev_level;

        // Этот уровень финансируют все, кто внёс не меньше него.
        let funders = (entries.len() - i) as u64;
        let pot_amount = Chips(level_diff.0 * funders);

        // Претендуют только не-сфолдившие из числа финансирующих.
        let mut eligible: Vec<SeatIndex> = entries[i..]
            .iter()
            .map(|&(seat, _)| seat)
            .filter(|seat| !folded.contains(seat))
            .collect();
        eligible.sort_unstable();

        // Доливаем в предыдущий банк, если сфолдившие не сузили множество
        // претендентов или уровень финансировали только сфолдившие —
        // иначе множества не были бы строгими подмножествами.
        let merge_into_prev = pots
            .last()
            .map(|last| last.eligible_seats == eligible || eligible.is_empty())
            .unwrap_or(false);

        if merge_into_prev {
            let last = pots.last_mut().expect("проверено выше");
            last.amount += pot_amount;
        } else {
            pots.push(Pot {
                amount: pot_amount,
                eligible_seats: eligible,
            });
        }

        prev_level = level;
    }

    pots
}

/// Раздать банки по рангам рук.
///
/// `ranks` — ранги вскрывшихся мест; `order` — порядок действия
/// относительно кнопки (места по кругу, начиная после кнопки).
///
/// Каждый банк делится поровну между местами с лучшим рангом среди
/// претендентов. Неделимый остаток целиком достаётся первому из
/// победителей в `order` («правило лишней фишки») — детерминированно
/// при одинаковых входах. Банк с единственным претендентом отдаётся
/// ему без сравнения рук.
pub fn distribute(
    pots: &[Pot],
    ranks: &HashMap<SeatIndex, HandRank>,
    order: &[SeatIndex],
) -> Vec<PotAward> {
    let mut awards: HashMap<SeatIndex, Chips> = HashMap::new();

    for pot in pots {
        if pot.amount.is_zero() {
            continue;
        }

        let winners: Vec<SeatIndex> = if pot.eligible_seats.len() == 1 {
            // Единственный оставшийся — сравнивать не с кем.
            pot.eligible_seats.clone()
        } else {
            let best = pot
                .eligible_seats
                .iter()
                .filter_map(|seat| ranks.get(seat))
                .max()
                .copied();

            match best {
                Some(best) => pot
                    .eligible_seats
                    .iter()
                    .copied()
                    .filter(|seat| ranks.get(seat) == Some(&best))
                    .collect(),
                // Никто из претендентов не вскрылся — банк не раздаётся
                // здесь (такие места должны были быть сфолжены по таймауту
                // до расчёта).
                None => continue,
            }
        };

        let n = winners.len() as u64;
        let share = Chips(pot.amount.0 / n);
        let remainder = Chips(pot.amount.0 % n);

        // Лишняя фишка — первому победителю по порядку действия от кнопки.
        let first_in_order = order
            .iter()
            .copied()
            .find(|seat| winners.contains(seat))
            .unwrap_or(winners[0]);

        for &seat in &winners {
            let mut prize = share;
            if seat == first_in_order {
                prize += remainder;
            }
            *awards.entry(seat).or_insert(Chips::ZERO) += prize;
        }
    }

    let mut result: Vec<PotAward> = awards
        .into_iter()
        .map(|(seat, amount)| PotAward { seat, amount })
        .collect();
    result.sort_by_key(|a| a.seat);
    result
}
