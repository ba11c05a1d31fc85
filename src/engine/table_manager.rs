// src/engine/table_manager.rs

use std::collections::HashMap;

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::table::Table;
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::commitment::CommitHash;
use crate::engine::errors::EngineError;
use crate::engine::game_loop::{self, HandEngine, HandStatus};
use crate::engine::seating;
use crate::engine::{PlayerAction, RandomSource};
use crate::ledger::ChipsLedger;
use crate::time_ctrl::{TimeRules, Timestamp};

/// Один стол + опционально активный движок раздачи.
struct ManagedTable {
    table: Table,
    engine: Option<HandEngine>,
}

impl ManagedTable {
    fn new(table: Table) -> Self {
        Self {
            table,
            engine: None,
        }
    }
}

/// Менеджер столов — единственная точка, мутирующая состояние.
///
/// Все внешние действия проходят сюда по одному; каждое валидируется
/// целиком до первой мутации. Это и есть точка сериализации, которую
/// раньше обеспечивал порядок транзакций: кто первым попал в менеджер,
/// тот и «первый» для таймаут-клеймов и очереди хода.
pub struct TableManager<L: ChipsLedger> {
    tables: HashMap<TableId, ManagedTable>,
    ledger: L,
    rules: TimeRules,
}

impl<L: ChipsLedger> TableManager<L> {
    pub fn new(ledger: L, rules: TimeRules) -> Self {
        Self {
            tables: HashMap::new(),
            ledger,
            rules,
        }
    }

    /// Добавить стол под его TableId. Стол с тем же id заменяется.
    pub fn add_table(&mut self, table: Table) {
        let id = table.id;
        self.tables.insert(id, ManagedTable::new(table));
    }

    pub fn has_table(&self, table_id: TableId) -> bool {
        self.tables.contains_key(&table_id)
    }

    pub fn table(&self, table_id: TableId) -> Option<&Table> {
        self.tables.get(&table_id).map(|mt| &mt.table)
    }

    pub fn table_mut(&mut self, table_id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(&table_id).map(|mt| &mut mt.table)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values().map(|mt| &mt.table)
    }

    pub fn has_active_hand(&self, table_id: TableId) -> bool {
        self.tables
            .get(&table_id)
            .map(|mt| mt.engine.is_some())
            .unwrap_or(false)
    }

    pub fn hand_engine(&self, table_id: TableId) -> Option<&HandEngine> {
        self.tables.get(&table_id).and_then(|mt| mt.engine.as_ref())
    }

    pub fn hand_engine_mut(&mut self, table_id: TableId) -> Option<&mut HandEngine> {
        self.tables
            .get_mut(&table_id)
            .and_then(|mt| mt.engine.as_mut())
    }

    pub fn current_actor_seat(&self, table_id: TableId) -> Option<SeatIndex> {
        self.hand_engine(table_id).and_then(|e| e.current_actor)
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn rules(&self) -> &TimeRules {
        &self.rules
    }

    /// Посадить аккаунт за стол с бай-ином (фишки уходят со счёта аккаунта).
    pub fn join_table(
        &mut self,
        table_id: TableId,
        account: PlayerId,
        seat_index: SeatIndex,
        buy_in: Chips,
    ) -> Result<(), EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        seating::join_table(&mut mt.table, &mut self.ledger, account, seat_index, buy_in)
    }

    pub fn sit_out(&mut self, table_id: TableId, seat_index: SeatIndex) -> Result<(), EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        seating::sit_out(&mut mt.table, seat_index)
    }

    pub fn sit_in(&mut self, table_id: TableId, seat_index: SeatIndex) -> Result<(), EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        seating::sit_in(&mut mt.table, seat_index)
    }

    /// Запланировать уход места (выполнится перед следующей раздачей).
    pub fn leave_after_hand(
        &mut self,
        table_id: TableId,
        seat_index: SeatIndex,
    ) -> Result<(), EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        seating::leave_after_hand(&mut mt.table, &mut self.ledger, seat_index)
    }

    /// Запустить новую раздачу на столе.
    pub fn start_hand<R: RandomSource>(
        &mut self,
        table_id: TableId,
        rng: &mut R,
        hand_id: HandId,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        if mt.engine.is_some() {
            return Err(EngineError::HandAlreadyInProgress);
        }

        let engine = game_loop::start_hand(
            &mut mt.table,
            &mut self.ledger,
            rng,
            hand_id,
            now,
            &self.rules,
        )?;
        mt.engine = Some(engine);
        Ok(())
    }

    /// Коммит карманных карт места.
    pub fn commit_cards(
        &mut self,
        table_id: TableId,
        seat_index: SeatIndex,
        hash: CommitHash,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        Self::ensure_not_paused(&mt.table)?;
        let engine = mt.engine.as_mut().ok_or(EngineError::NoActiveHand)?;
        game_loop::commit_cards(&mut mt.table, engine, seat_index, hash, now, &self.rules)
    }

    /// Страддл от UTG (если стол его разрешает).
    pub fn post_straddle(
        &mut self,
        table_id: TableId,
        seat_index: SeatIndex,
    ) -> Result<(), EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        Self::ensure_not_paused(&mt.table)?;
        let engine = mt.engine.as_mut().ok_or(EngineError::NoActiveHand)?;
        game_loop::post_straddle(&mut mt.table, engine, seat_index)
    }

    /// Действие игрока в торговле.
    pub fn apply_action(
        &mut self,
        table_id: TableId,
        action: PlayerAction,
        now: Timestamp,
    ) -> Result<HandStatus, EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        Self::ensure_not_paused(&mt.table)?;
        let engine = mt.engine.as_mut().ok_or(EngineError::NoActiveHand)?;

        let status = game_loop::apply_action(
            &mut mt.table,
            engine,
            &mut self.ledger,
            action,
            now,
            &self.rules,
        )?;
        if matches!(status, HandStatus::Finished(..)) {
            mt.engine = None;
        }
        Ok(status)
    }

    /// Вскрытие карт места.
    pub fn reveal_cards(
        &mut self,
        table_id: TableId,
        seat_index: SeatIndex,
        cards: Vec<Card>,
        nonce: u64,
        now: Timestamp,
    ) -> Result<HandStatus, EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        Self::ensure_not_paused(&mt.table)?;
        let engine = mt.engine.as_mut().ok_or(EngineError::NoActiveHand)?;

        let status = game_loop::reveal_cards(
            &mut mt.table,
            engine,
            &mut self.ledger,
            seat_index,
            cards,
            nonce,
            now,
        )?;
        if matches!(status, HandStatus::Finished(..)) {
            mt.engine = None;
        }
        Ok(status)
    }

    /// Таймаут-клейм. Намеренно без проверки вызывающего: право есть у
    /// любого, чтобы никто не мог «придержать» клейм.
    pub fn claim_timeout(
        &mut self,
        table_id: TableId,
        target_seat: SeatIndex,
        now: Timestamp,
    ) -> Result<HandStatus, EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        Self::ensure_not_paused(&mt.table)?;
        let engine = mt.engine.as_mut().ok_or(EngineError::NoActiveHand)?;

        let status = game_loop::claim_timeout(
            &mut mt.table,
            engine,
            &mut self.ledger,
            target_seat,
            now,
            &self.rules,
        )?;
        if matches!(status, HandStatus::Finished(..)) {
            mt.engine = None;
        }
        Ok(status)
    }

    /// Пауза стола (только админ). Принимаются лишь resume и abort.
    pub fn pause(&mut self, table_id: TableId, caller: PlayerId) -> Result<(), EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        Self::ensure_admin(&mt.table, caller)?;
        mt.table.paused = true;
        Ok(())
    }

    /// Снять стол с паузы (только админ).
    pub fn resume(&mut self, table_id: TableId, caller: PlayerId) -> Result<(), EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        Self::ensure_admin(&mt.table, caller)?;
        mt.table.paused = false;
        Ok(())
    }

    /// Аварийное завершение раздачи (только админ): взносы возвращаются
    /// контрибьюторам, руки не сравниваются. Доступно из любой фазы.
    pub fn emergency_abort(
        &mut self,
        table_id: TableId,
        caller: PlayerId,
    ) -> Result<(), EngineError> {
        let mt = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        Self::ensure_admin(&mt.table, caller)?;

        let engine = mt.engine.as_mut().ok_or(EngineError::NoActiveHand)?;
        game_loop::abort_hand(&mut mt.table, engine);
        mt.engine = None;
        Ok(())
    }

    fn ensure_not_paused(table: &Table) -> Result<(), EngineError> {
        if table.paused {
            Err(EngineError::TablePaused)
        } else {
            Ok(())
        }
    }

    fn ensure_admin(table: &Table, caller: PlayerId) -> Result<(), EngineError> {
        if table.admin != caller {
            Err(EngineError::NotAuthorized)
        } else {
            Ok(())
        }
    }
}
