use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, TableId};
use crate::engine::EngineError;

/// Ошибки внешнего API (то, что отдаём клиенту).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    BadRequest(String),

    /// Стол не найден.
    TableNotFound(TableId),

    /// Аккаунт не сидит за столом.
    PlayerNotAtTable(PlayerId),

    /// Команда не может быть выполнена в текущем состоянии.
    InvalidCommand(String),

    /// Ошибка движка (ставки, окна, таймауты).
    EngineError(String),

    /// Внутренняя ошибка сервера.
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::TableNotFound(id) => ApiError::TableNotFound(id),
            other => ApiError::EngineError(other.to_string()),
        }
    }
}
