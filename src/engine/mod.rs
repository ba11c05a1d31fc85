//! Покерный движок: ставки, переход улиц, commit-reveal, сайд-поты, расчёт.
//!
//! Высокоуровневый объект: `HandEngine` (состояние одной раздачи).
//! Основные операции:
//!   - `start_hand` — запустить раздачу (блайнды/анте, окно коммитов);
//!   - `commit_cards` / `reveal_cards` — протокол скрытых карт;
//!   - `apply_action` — применить действие игрока в торговле;
//!   - `claim_timeout` — принудительный фолд просрочившего место;
//!   - `settle` / `abort_hand` — расчёт банка или аварийный возврат.
//!
//! Поверх всего — `TableManager`: единая точка входа, сериализующая
//! действия по всем столам.

pub mod actions;
pub mod betting;
pub mod commitment;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod pot;
pub mod seating;
pub mod table_manager;
pub mod validation;

pub use actions::{PlayerAction, PlayerActionKind};
pub use commitment::{commitment_hash, CardCommitment, CommitHash};
pub use errors::EngineError;
pub use game_loop::{
    abort_hand, apply_action, claim_timeout, commit_cards, post_straddle, reveal_cards, start_hand,
    HandEngine, HandPhase, HandStatus,
};
pub use hand_history::{HandEvent, HandEventKind, HandHistory};
pub use pot::{collect_pots, distribute, Pot, PotAward};
pub use table_manager::TableManager;

/// RNG интерфейс для engine (перемешивание колоды борда).
/// Реализации — в `infra::rng`.
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
