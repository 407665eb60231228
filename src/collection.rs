//! The in-memory goal list and its selection cursor.
//!
//! Every mutation is written to the [`GoalStore`] first; the list is only
//! touched once the store call succeeded. After [`GoalCollection::initialize`]
//! the list is never empty and the cursor always points at a goal.

use tracing::{debug, error, info, warn};

use crate::error::GoalsError;
use crate::models::{FieldErrors, Goal, GoalDraft};
use crate::prefs::SelectionStore;
use crate::progress;
use crate::store::{GoalStore, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

/// A goal being composed by the caller between `begin_*` and `confirm_edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSession {
    Creating,
    Editing(usize),
}

/// Cursor position after removing `removed` from a list that now holds `new_len` goals.
pub fn adjust_cursor(cursor: usize, removed: usize, new_len: usize) -> usize {
    if new_len == 0 {
        return 0;
    }
    if removed < cursor {
        cursor - 1
    } else if removed == cursor {
        cursor.min(new_len - 1)
    } else {
        cursor
    }
}

pub struct GoalCollection<S, P> {
    store: S,
    settings: P,
    phase: Phase,
    goals: Vec<Goal>,
    current: usize,
    session: Option<EditSession>,
    degraded: bool,
}

impl<S: GoalStore, P: SelectionStore> GoalCollection<S, P> {
    pub fn new(store: S, settings: P) -> Self {
        Self {
            store,
            settings,
            phase: Phase::Uninitialized,
            goals: Vec::new(),
            current: 0,
            session: None,
            degraded: false,
        }
    }

    /// Load goals and restore the selection. Never fails: storage problems
    /// are logged and the collection comes up with a single default goal.
    pub fn initialize(&mut self) {
        if self.phase == Phase::Ready {
            return;
        }
        self.phase = Phase::Loading;

        let goals = match self.load() {
            Ok(goals) => {
                self.degraded = false;
                goals
            }
            Err(e) => {
                error!(code = e.code.as_str(), error = %e, "goal storage unavailable, using default goal");
                self.degraded = true;
                vec![Goal::default_goal()]
            }
        };
        self.goals = goals;

        self.current = self
            .settings
            .load_index()
            .filter(|&index| index < self.goals.len())
            .unwrap_or(0);
        self.session = None;
        self.phase = Phase::Ready;
        info!(count = self.goals.len(), current = self.current, "goal collection ready");
    }

    fn load(&mut self) -> Result<Vec<Goal>> {
        self.store.initialize()?;
        let goals = self.store.get_all()?;
        if !goals.is_empty() {
            return Ok(goals);
        }
        debug!("no stored goals, creating default goal");
        Ok(vec![self.store.save(&Goal::default_goal())?])
    }

    /// Release the store and return to `Uninitialized`.
    pub fn close(&mut self) {
        self.store.close();
        self.goals.clear();
        self.current = 0;
        self.session = None;
        self.phase = Phase::Uninitialized;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True when startup fell back to an in-memory default goal.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_goal(&self) -> Option<&Goal> {
        self.goals.get(self.current)
    }

    pub fn current_progress(&self) -> u8 {
        progress::compute_progress(self.current_goal())
    }

    pub fn session(&self) -> Option<EditSession> {
        self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &P {
        &self.settings
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.phase == Phase::Ready {
            Ok(())
        } else {
            Err(GoalsError::not_ready())
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        self.ensure_ready()?;
        if index < self.goals.len() {
            Ok(())
        } else {
            Err(GoalsError::index_out_of_range(index, self.goals.len()))
        }
    }

    /// Move the cursor. A failure to persist the selection is logged, not returned.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.current = index;
        self.persist_selection();
        Ok(())
    }

    fn persist_selection(&mut self) {
        if let Err(e) = self.settings.save_index(self.current) {
            warn!(index = self.current, error = %e, "failed to persist goal selection");
        }
    }

    /// Validate `draft`, store it as a new goal, append it and select it.
    pub fn add_goal(&mut self, draft: GoalDraft) -> Result<&Goal> {
        self.ensure_ready()?;
        let goal = draft.into_goal(None).map_err(rejected)?;
        let index = self.write(goal, None)?;
        Ok(&self.goals[index])
    }

    /// Validate `draft` and store it over the goal at `index`, keeping its id
    /// and its position. The cursor does not move.
    pub fn edit_goal(&mut self, index: usize, draft: GoalDraft) -> Result<&Goal> {
        self.check_index(index)?;
        let goal = draft.into_goal(self.goals[index].id).map_err(rejected)?;
        let index = self.write(goal, Some(index))?;
        Ok(&self.goals[index])
    }

    /// Store a fully built goal. A goal whose id is in the list replaces that
    /// entry in place; anything else is inserted and appended.
    pub fn save(&mut self, goal: Goal) -> Result<&Goal> {
        self.ensure_ready()?;
        let position = goal
            .id
            .and_then(|id| self.goals.iter().position(|g| g.id == Some(id)));
        let id = if position.is_some() { goal.id } else { None };
        let goal = goal.to_draft().into_goal(id).map_err(rejected)?;
        let index = self.write(goal, position)?;
        Ok(&self.goals[index])
    }

    fn write(&mut self, goal: Goal, position: Option<usize>) -> Result<usize> {
        let saved = self.store.save(&goal).inspect_err(|e| {
            error!(code = e.code.as_str(), error = %e, "failed to save goal");
        })?;

        match position {
            Some(index) => {
                debug!(index, id = ?saved.id, "replaced goal");
                self.goals[index] = saved;
                Ok(index)
            }
            None => {
                self.goals.push(saved);
                self.current = self.goals.len() - 1;
                debug!(index = self.current, "appended goal");
                self.persist_selection();
                Ok(self.current)
            }
        }
    }

    /// Delete the goal at `index` from the store and the list. Removing the
    /// last goal replaces it with a fresh default goal.
    pub fn remove_goal(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;

        if let Some(id) = self.goals[index].id {
            self.store.delete(id).inspect_err(|e| {
                error!(id, code = e.code.as_str(), error = %e, "failed to delete goal");
            })?;
        }
        self.goals.remove(index);

        let previous = self.current;
        if self.goals.is_empty() {
            let default = match self.store.save(&Goal::default_goal()) {
                Ok(goal) => goal,
                Err(e) => {
                    warn!(error = %e, "could not persist replacement default goal");
                    Goal::default_goal()
                }
            };
            self.goals.push(default);
        }
        self.current = adjust_cursor(previous, index, self.goals.len());

        self.session = match self.session {
            Some(EditSession::Editing(i)) if i == index => None,
            Some(EditSession::Editing(i)) if i > index => Some(EditSession::Editing(i - 1)),
            other => other,
        };

        debug!(index, current = self.current, remaining = self.goals.len(), "removed goal");
        self.persist_selection();
        Ok(())
    }

    /// Enter the creating sub-state; returns a blank draft for the composer.
    pub fn begin_add(&mut self) -> Result<GoalDraft> {
        self.ensure_ready()?;
        self.session = Some(EditSession::Creating);
        Ok(GoalDraft::default())
    }

    /// Enter the editing sub-state for `index`; returns the goal as a draft.
    pub fn begin_edit(&mut self, index: usize) -> Result<GoalDraft> {
        self.check_index(index)?;
        self.session = Some(EditSession::Editing(index));
        Ok(self.goals[index].to_draft())
    }

    /// Leave the creating/editing sub-state without changes.
    pub fn cancel_edit(&mut self) {
        self.session = None;
    }

    /// Save `draft` for the open session. On failure the session stays open.
    pub fn confirm_edit(&mut self, draft: GoalDraft) -> Result<&Goal> {
        let index = match self.session {
            None => return Err(GoalsError::no_edit_session()),
            Some(EditSession::Creating) => {
                self.ensure_ready()?;
                let goal = draft.into_goal(None).map_err(rejected)?;
                self.write(goal, None)?
            }
            Some(EditSession::Editing(index)) => {
                self.check_index(index)?;
                let goal = draft.into_goal(self.goals[index].id).map_err(rejected)?;
                self.write(goal, Some(index))?
            }
        };
        self.session = None;
        Ok(&self.goals[index])
    }

    /// Delete the goal under edit and close the session.
    pub fn remove_editing(&mut self) -> Result<()> {
        match self.session {
            Some(EditSession::Editing(index)) => {
                self.remove_goal(index)?;
                self.session = None;
                Ok(())
            }
            _ => Err(GoalsError::no_edit_session()),
        }
    }
}

fn rejected(errors: FieldErrors) -> GoalsError {
    debug!(fields = %errors.summary(), "goal rejected");
    GoalsError::validation(errors)
}
