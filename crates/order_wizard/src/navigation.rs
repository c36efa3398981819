use std::collections::BTreeSet;

use base::entities::Timestamp;
use base::helpers::now_timestamp;
use serde::{Deserialize, Serialize};

use crate::error::WizardError;
use crate::steps::{StepLayer, WizardStep, ITEM_STEPS};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepHistoryEntry {
    pub step: WizardStep,
    pub timestamp: Timestamp,
}

impl StepHistoryEntry {
    fn now(step: WizardStep) -> Self {
        Self {
            step,
            timestamp: now_timestamp(),
        }
    }
}

/// Gate for direct navigation. Every step not in the set is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<WizardStep>", into = "Vec<WizardStep>")]
pub struct StepAvailability {
    available: BTreeSet<WizardStep>,
}

impl StepAvailability {
    fn initial() -> Self {
        Self {
            available: BTreeSet::from([WizardStep::ClientSelection]),
        }
    }

    pub fn is_available(&self, step: WizardStep) -> bool {
        self.available.contains(&step)
    }

    pub fn available_steps(&self) -> impl Iterator<Item = WizardStep> + '_ {
        self.available.iter().copied()
    }

    fn set(&mut self, step: WizardStep, is_available: bool) {
        if is_available {
            self.available.insert(step);
        } else {
            self.available.remove(&step);
        }
    }
}

impl From<Vec<WizardStep>> for StepAvailability {
    fn from(steps: Vec<WizardStep>) -> Self {
        Self {
            available: steps.into_iter().collect(),
        }
    }
}

impl From<StepAvailability> for Vec<WizardStep> {
    fn from(availability: StepAvailability) -> Self {
        availability.available.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub current_step: WizardStep,
    pub step_history: Vec<StepHistoryEntry>,
    pub availability: StepAvailability,
    pub is_item_wizard_active: bool,
    pub is_back_allowed: bool,
    pub is_forward_allowed: bool,
    /// Entries removed by `go_back`, most recent last. `go_forward` replays them
    /// before falling back to the transition table.
    #[serde(default)]
    pub undone_steps: Vec<StepHistoryEntry>,
}

impl NavigationState {
    fn initial() -> Self {
        Self {
            current_step: WizardStep::ClientSelection,
            step_history: vec![StepHistoryEntry::now(WizardStep::ClientSelection)],
            availability: StepAvailability::initial(),
            is_item_wizard_active: false,
            is_back_allowed: false,
            is_forward_allowed: false,
            undone_steps: Vec::new(),
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Tracks the current step, the visited history and which steps may be entered.
///
/// Refused transitions never fail: the operation logs a warning, leaves the state
/// untouched and returns `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationEngine {
    state: NavigationState,
}

impl NavigationEngine {
    pub fn new() -> Self {
        Default::default()
    }

    /// Rebuilds an engine from a stored state, rejecting states that break
    /// the history and availability invariants.
    pub fn from_state(state: NavigationState) -> Result<Self, WizardError> {
        let last_entry = state
            .step_history
            .last()
            .ok_or_else(|| WizardError::CorruptedSnapshot(String::from("empty step history")))?;

        if last_entry.step != state.current_step {
            return Err(WizardError::CorruptedSnapshot(format!(
                "last history entry {} differs from the current step {}",
                last_entry.step, state.current_step
            )));
        }

        if !state.availability.is_available(state.current_step) {
            return Err(WizardError::CorruptedSnapshot(format!(
                "current step {} is not available",
                state.current_step
            )));
        }

        let expected_layer = if state.is_item_wizard_active {
            StepLayer::Item
        } else {
            StepLayer::Main
        };

        if state.current_step.layer() != expected_layer {
            return Err(WizardError::CorruptedSnapshot(format!(
                "current step {} does not belong to the active layer",
                state.current_step
            )));
        }

        if let Some(entry) = state
            .undone_steps
            .iter()
            .find(|entry| entry.step.layer() != expected_layer)
        {
            return Err(WizardError::CorruptedSnapshot(format!(
                "undone step {} does not belong to the active layer",
                entry.step
            )));
        }

        Ok(Self { state })
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_step(&self) -> WizardStep {
        self.state.current_step
    }

    pub fn step_history(&self) -> &[StepHistoryEntry] {
        &self.state.step_history
    }

    pub fn availability(&self) -> &StepAvailability {
        &self.state.availability
    }

    pub fn is_step_available(&self, step: WizardStep) -> bool {
        self.state.availability.is_available(step)
    }

    pub fn is_item_wizard_active(&self) -> bool {
        self.state.is_item_wizard_active
    }

    pub fn is_back_allowed(&self) -> bool {
        self.state.is_back_allowed
    }

    pub fn is_forward_allowed(&self) -> bool {
        self.state.is_forward_allowed
    }

    pub fn active_layer(&self) -> StepLayer {
        if self.state.is_item_wizard_active {
            StepLayer::Item
        } else {
            StepLayer::Main
        }
    }

    /// The canonical successor of the current step.
    pub fn next_step(&self) -> Option<WizardStep> {
        self.state.current_step.next()
    }

    pub fn go_to_step(&mut self, step: WizardStep) -> bool {
        if step == self.state.current_step {
            log::warn!("navigation to {} refused: it is the current step", step);
            return false;
        }

        if step.layer() != self.active_layer() {
            log::warn!(
                "navigation to {} refused: the step is outside the active {:?} layer",
                step,
                self.active_layer()
            );
            return false;
        }

        if !self.state.availability.is_available(step) {
            log::warn!("navigation to {} refused: the step is not available", step);
            return false;
        }

        self.state.undone_steps.clear();
        self.push_step(step);
        self.state.is_forward_allowed = false;

        true
    }

    pub fn go_back(&mut self) -> bool {
        if self.state.step_history.len() <= 1 || !self.state.is_back_allowed {
            log::warn!(
                "going back from {} refused: history length {}, back allowed {}",
                self.state.current_step,
                self.state.step_history.len(),
                self.state.is_back_allowed
            );
            return false;
        }

        let undone = match self.state.step_history.pop() {
            Some(entry) => entry,
            None => return false,
        };
        self.state.undone_steps.push(undone);

        let previous = match self.state.step_history.last() {
            Some(entry) => entry.step,
            None => return false,
        };

        // steps already in the history stay reachable
        self.state.availability.set(previous, true);
        self.state.current_step = previous;
        self.state.is_back_allowed = self.state.step_history.len() > 1;
        self.state.is_forward_allowed = true;

        log::debug!("went back from {} to {}", undone.step, previous);

        true
    }

    pub fn go_forward(&mut self) -> bool {
        if !self.state.is_forward_allowed {
            log::warn!(
                "going forward from {} refused: forward is not allowed",
                self.state.current_step
            );
            return false;
        }

        let replayed = self.state.undone_steps.last().map(|entry| entry.step);

        let next = match replayed.or_else(|| self.next_step()) {
            Some(next) => next,
            None => {
                log::warn!(
                    "going forward from {} refused: there is no next step",
                    self.state.current_step
                );
                return false;
            }
        };

        if !self.state.availability.is_available(next) {
            log::warn!(
                "going forward from {} refused: {} is not available",
                self.state.current_step,
                next
            );
            return false;
        }

        if replayed.is_some() {
            self.state.undone_steps.pop();
        }

        self.push_step(next);

        true
    }

    /// Grants forward permission. Called once the current step has been validated.
    pub fn allow_forward(&mut self) {
        self.state.is_forward_allowed = true;
    }

    pub fn start_item_wizard(&mut self) {
        for step in ITEM_STEPS {
            self.state
                .availability
                .set(step, step == WizardStep::ItemBasicInfo);
        }

        self.reset_history_to(WizardStep::ItemBasicInfo);
        self.state.is_item_wizard_active = true;
        self.state.is_back_allowed = false;
        self.state.is_forward_allowed = false;

        log::info!("item wizard started");
    }

    /// Leaves the item sub-wizard and returns to the item manager. Whether the item
    /// is kept is up to the caller; navigation behaves the same either way.
    pub fn finish_item_wizard(&mut self, save_item: bool) {
        for step in ITEM_STEPS {
            self.state.availability.set(step, false);
        }
        self.state.availability.set(WizardStep::ItemManager, true);

        self.reset_history_to(WizardStep::ItemManager);
        self.state.is_item_wizard_active = false;
        self.state.is_back_allowed = true;
        self.state.is_forward_allowed = true;

        log::info!("item wizard finished, save item: {}", save_item);
    }

    /// The current step can't be made unavailable.
    pub fn update_step_availability(&mut self, step: WizardStep, is_available: bool) -> bool {
        if step == self.state.current_step && !is_available {
            log::warn!(
                "making the current step {} unavailable is refused",
                step
            );
            return false;
        }

        self.state.availability.set(step, is_available);
        true
    }

    pub fn reset_navigation(&mut self) {
        self.state = NavigationState::initial();
        log::debug!("navigation reset");
    }

    fn push_step(&mut self, step: WizardStep) {
        let from = self.state.current_step;

        self.state.step_history.push(StepHistoryEntry::now(step));
        self.state.current_step = step;
        self.state.is_back_allowed = true;

        log::debug!("moved from {} to {}", from, step);
    }

    fn reset_history_to(&mut self, step: WizardStep) {
        self.state.step_history = vec![StepHistoryEntry::now(step)];
        self.state.undone_steps.clear();
        self.state.current_step = step;
    }
}
