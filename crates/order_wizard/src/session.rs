use anyhow::{Context, Result};
use base::entities::{SessionId, StoreKey};
use base::errors::ErrorMessagePolicy;
use base::helpers::now_timestamp;
use base::operation_result::OperationResult;
use base::settings::Settings;
use base::stores::session_store::SessionStore;

use crate::error::WizardError;
use crate::navigation::NavigationEngine;
use crate::snapshot::WizardSnapshot;
use crate::steps::{WizardStep, ITEM_STEPS, REQUIRED_ITEM_STEPS};
use crate::validation::{ErrorTree, ValidationRegistry, ValidationStatus};

/// One user's pass through the order wizard: navigation and validation of the
/// same order, kept in step with each other.
#[derive(Debug, Clone)]
pub struct WizardSession {
    id: SessionId,
    navigation: NavigationEngine,
    validation: ValidationRegistry,
    error_policy: ErrorMessagePolicy,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::with_error_policy(ErrorMessagePolicy::default())
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_error_policy(error_policy: ErrorMessagePolicy) -> Self {
        Self {
            id: xid::new().to_string(),
            navigation: NavigationEngine::new(),
            validation: ValidationRegistry::new(),
            error_policy,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn navigation(&self) -> &NavigationEngine {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationEngine {
        &mut self.navigation
    }

    pub fn validation(&self) -> &ValidationRegistry {
        &self.validation
    }

    pub fn validation_mut(&mut self) -> &mut ValidationRegistry {
        &mut self.validation
    }

    pub fn error_policy(&self) -> &ErrorMessagePolicy {
        &self.error_policy
    }

    pub fn current_step(&self) -> WizardStep {
        self.navigation.current_step()
    }

    /// Advances only when the current step is already valid, settling its validation on
    /// the way. Otherwise asks the form layer to validate it and stays put.
    pub fn validate_and_proceed(&mut self) -> bool {
        let current_step = self.navigation.current_step();

        if !self.validation.is_step_valid(current_step) {
            self.validation.validate_step(current_step, None);
            return false;
        }

        self.validation.validate_step(current_step, Some(ValidationStatus::Valid));

        self.proceed()
    }

    /// Always reports success; whether the step actually changed shows in `current_step`.
    pub fn mark_valid_and_proceed(&mut self) -> bool {
        let current_step = self.navigation.current_step();
        self.validation.set_step_valid(current_step);

        self.proceed();

        true
    }

    pub fn reset_wizard(&mut self) {
        self.navigation.reset_navigation();
        self.validation.reset_all_validation();

        log::debug!("wizard session {} reset", self.id);
    }

    /// Opens the item sub-wizard for a new item. Validations of a previous item are dropped.
    pub fn start_item_wizard(&mut self) {
        for step in ITEM_STEPS {
            self.validation.reset_step_validation(step);
        }

        self.navigation.start_item_wizard();
    }

    pub fn finish_item_wizard(&mut self, save_item: bool) {
        if save_item && !self.can_finish_item() {
            log::warn!(
                "item saved with unfinished required steps: {:?}",
                self.missing_required_item_steps()
            );
        }

        for step in ITEM_STEPS {
            self.validation.reset_step_validation(step);
        }

        self.navigation.finish_item_wizard(save_item);
    }

    /// Records the outcome of a collaborator call as the validation of `step`.
    pub fn apply_outcome<T>(&mut self, step: WizardStep, outcome: &OperationResult<T>) {
        match outcome.error_message(&self.error_policy) {
            None => self.validation.set_step_valid(step),
            Some(message) => {
                log::debug!("step {} failed: {}", step, message);
                self.validation.set_step_invalid(step, ErrorTree::leaf([message]));
            }
        }
    }

    /// Completion of the active layer in percent.
    pub fn progress(&self) -> f64 {
        let steps = self.navigation.active_layer().steps();
        let completed = steps
            .iter()
            .filter(|step| self.validation.is_step_valid(**step))
            .count();

        let progress = (completed as f64 + 0.5) / steps.len() as f64 * 100.0;

        progress.min(100.0)
    }

    pub fn missing_required_item_steps(&self) -> Vec<WizardStep> {
        REQUIRED_ITEM_STEPS
            .iter()
            .copied()
            .filter(|step| self.validation.step_status(*step) != ValidationStatus::Valid)
            .collect()
    }

    pub fn can_finish_item(&self) -> bool {
        self.missing_required_item_steps().is_empty()
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            session_id: self.id.clone(),
            saved_at: now_timestamp(),
            navigation: self.navigation.state().clone(),
            validations: self
                .validation
                .records()
                .map(|(step, validation)| (step, validation.clone()))
                .collect(),
            active_validation: self.validation.is_validation_active(),
        }
    }

    pub fn from_snapshot(
        snapshot: WizardSnapshot,
        error_policy: ErrorMessagePolicy,
    ) -> Result<Self, WizardError> {
        if snapshot.session_id.trim().is_empty() {
            return Err(WizardError::CorruptedSnapshot(String::from("empty session id")));
        }

        let navigation = NavigationEngine::from_state(snapshot.navigation)?;
        let validation =
            ValidationRegistry::from_records(snapshot.validations, snapshot.active_validation);

        Ok(Self {
            id: snapshot.session_id,
            navigation,
            validation,
            error_policy,
        })
    }

    pub fn save_to(&self, store: &mut impl SessionStore, settings: &Settings) -> Result<StoreKey> {
        let key = settings.session_key(&self.id);
        let json = self.snapshot().to_json()?;

        store
            .save(&key, json)
            .with_context(|| format!("can't save wizard session under {}", key))?;

        log::info!(
            "wizard session {} saved at step {}",
            self.id,
            self.current_step()
        );

        Ok(key)
    }

    /// `Ok(None)` when nothing is stored for the session.
    pub fn restore_from(
        store: &impl SessionStore,
        settings: &Settings,
        session_id: &str,
    ) -> Result<Option<Self>> {
        let key = settings.session_key(session_id);

        let json = match store
            .load(&key)
            .with_context(|| format!("can't load wizard session from {}", key))?
        {
            Some(json) => json,
            None => return Ok(None),
        };

        let snapshot = WizardSnapshot::from_json(&json)?;
        let session = Self::from_snapshot(snapshot, settings.error_policy.clone())
            .with_context(|| format!("can't restore wizard session {}", session_id))?;

        log::info!(
            "wizard session {} restored at step {}",
            session.id,
            session.current_step()
        );

        Ok(Some(session))
    }

    pub fn remove_from(
        store: &mut impl SessionStore,
        settings: &Settings,
        session_id: &str,
    ) -> Result<()> {
        let key = settings.session_key(session_id);

        store
            .remove(&key)
            .with_context(|| format!("can't remove wizard session {}", key))
    }

    /// Unlocks the canonical next step and moves there once forward navigation is allowed.
    /// A step that has just become valid first grants the permission, the next call uses it.
    fn proceed(&mut self) -> bool {
        if let Some(next_step) = self.navigation.next_step() {
            self.navigation.update_step_availability(next_step, true);
        }

        if !self.navigation.is_forward_allowed() {
            self.navigation.allow_forward();
            return false;
        }

        self.navigation.go_forward()
    }
}
