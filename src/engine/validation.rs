use crate::domain::seat::{Seat, SeatStatus};
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;

/// Проверка, может ли место выполнить это действие при текущем
/// состоянии ставок. Ничего не мутирует.
pub fn validate_action(
    seat: &Seat,
    action: &PlayerActionKind,
    betting: &BettingState,
) -> Result<(), EngineError> {
    if matches!(seat.status, SeatStatus::Folded | SeatStatus::SittingOut) {
        return Err(EngineError::IllegalAction);
    }

    let stack = seat.stack;
    let to_call = betting.call_amount(seat.street_bet);

    match action {
        PlayerActionKind::Fold => Ok(()),

        PlayerActionKind::Check => {
            if betting.current_bet == seat.street_bet {
                Ok(())
            } else {
                Err(EngineError::CannotCheck)
            }
        }

        PlayerActionKind::Call => {
            if to_call.is_zero() {
                Err(EngineError::CannotCall)
            } else {
                // Если стека меньше, чем to_call — это all-in call,
                // обработка в game_loop.
                Ok(())
            }
        }

        PlayerActionKind::Bet(amount) => {
            if !betting.current_bet.is_zero() {
                // Bet возможен только когда ставки ещё нет.
                return Err(EngineError::IllegalAction);
            }
            if amount.is_zero() {
                return Err(EngineError::ZeroAmount);
            }
            if stack < *amount {
                return Err(EngineError::NotEnoughChips);
            }
            Ok(())
        }

        PlayerActionKind::Raise(total_bet) => {
            if betting.current_bet.is_zero() {
                // Когда ставки нет — это bet, а не raise.
                return Err(EngineError::IllegalAction);
            }
            if *total_bet <= betting.current_bet {
                return Err(EngineError::IllegalAction);
            }

            let raise_size = *total_bet - betting.current_bet;
            if raise_size < betting.min_raise {
                return Err(EngineError::RaiseTooSmall);
            }

            let diff = *total_bet - seat.street_bet;
            if stack < diff {
                return Err(EngineError::NotEnoughChips);
            }

            Ok(())
        }

        PlayerActionKind::AllIn => {
            if stack.is_zero() {
                return Err(EngineError::IllegalAction);
            }
            Ok(())
        }
    }
}
