//! Внешний API ядра.
//!
//! Здесь описываются:
//! - команды (commands.rs) — всё, что меняет состояние;
//! - диспетчер (dispatch.rs) — единая точка применения команд;
//! - запросы (queries.rs) — только чтение;
//! - DTO (dto.rs) — удобные структуры для фронта;
//! - ошибки (errors.rs) — то, что видит клиент.

pub mod commands;
pub mod dispatch;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dispatch::{execute, query};
pub use dto::*;
pub use errors::*;
pub use queries::*;
