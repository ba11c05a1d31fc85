//! Ядро многоместного Texas Hold'em стола.
//!
//! Три главных подсистемы:
//! - `eval` — оценка силы руки (5–7 карт) и сравнение рангов;
//! - `engine` — ставки, банк/сайд-поты, commit-reveal, таймауты, расчёт;
//! - `ledger` — интерфейс внешнего фишечного леджера (buy / transfer / balance).
//!
//! Всё состояние живёт в явных агрегатах (`Table`, `HandEngine`), которые
//! мутируются строго по одному действию за раз через `TableManager`.
//! Текущее время движок не измеряет сам — его передаёт вызывающая сторона
//! (`Timestamp`), как раньше это делал консенсус.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod ledger;
pub mod time_ctrl;
