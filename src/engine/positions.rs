use crate::domain::{SeatIndex, Table};

/// Найти следующее занятое место по кругу (включая/исключая start).
pub fn next_occupied_seat(
    table: &Table,
    start: SeatIndex,
    include_start: bool,
) -> Option<SeatIndex> {
    if table.seats.is_empty() {
        return None;
    }

    let max = table.max_seats() as usize;
    let mut idx = start as usize % max;

    if !include_start {
        idx = (idx + 1) % max;
    }

    for _ in 0..max {
        if idx < table.seats.len() && table.seats[idx].is_some() {
            return Some(idx as SeatIndex);
        }
        idx = (idx + 1) % max;
    }

    None
}

/// Собрать занятые места по кругу начиная с start (само start включается,
/// если занято).
pub fn collect_occupied_seats_from(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    let max = table.max_seats() as usize;
    let mut seats = Vec::new();

    if max == 0 {
        return seats;
    }

    let mut idx = start as usize % max;
    for _ in 0..max {
        if idx < table.seats.len() && table.seats[idx].is_some() {
            seats.push(idx as SeatIndex);
        }
        idx = (idx + 1) % max;
    }

    seats
}

/// Порядок действия относительно кнопки: занятые места по кругу,
/// начиная со следующего за кнопкой. По этому порядку постятся блайнды,
/// определяется первый ходящий и достаётся «лишняя» фишка при сплите.
pub fn acting_order(table: &Table, button: SeatIndex) -> Vec<SeatIndex> {
    let max = table.max_seats();
    if max == 0 {
        return Vec::new();
    }
    collect_occupied_seats_from(table, (button + 1) % max)
}

/// Следующая позиция кнопки.
///
/// Если между раздачами освободилось место, державшее кнопку или
/// ожидавшее её («мёртвая кнопка»), кнопка на одну раздачу встаёт на это
/// пустое место — блайнды при этом идут от следующих занятых мест, и
/// никто не проскакивает очередь.
pub fn next_dealer(table: &Table) -> Option<SeatIndex> {
    if let Some(dead) = table.dead_button {
        return Some(dead);
    }

    if let Some(button) = table.dealer_button {
        next_occupied_seat(table, button, false)
    } else {
        // Первая раздача за столом: ищем первое занятое место с 0.
        next_occupied_seat(table, 0, true)
    }
}
