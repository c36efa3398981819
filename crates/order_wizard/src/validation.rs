use std::collections::BTreeMap;

use base::entities::Timestamp;
use base::helpers::now_timestamp;
use serde::{Deserialize, Serialize};

use crate::steps::WizardStep;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    #[default]
    NotStarted,
    Pending,
    Valid,
    Invalid,
}

/// Field errors shaped like the form that produced them: either a list of messages
/// or a map from field name to nested errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorTree {
    Leaf(Vec<String>),
    Branch(BTreeMap<String, ErrorTree>),
}

impl Default for ErrorTree {
    fn default() -> Self {
        ErrorTree::Branch(BTreeMap::new())
    }
}

impl ErrorTree {
    pub fn leaf<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ErrorTree::Leaf(messages.into_iter().map(Into::into).collect())
    }

    pub fn branch<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, ErrorTree)>,
        K: Into<String>,
    {
        ErrorTree::Branch(
            fields
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        )
    }

    /// True when the tree holds no message at any depth.
    pub fn is_empty(&self) -> bool {
        match self {
            ErrorTree::Leaf(messages) => messages.is_empty(),
            ErrorTree::Branch(fields) => fields.values().all(ErrorTree::is_empty),
        }
    }

    /// Looks up a nested node by a dot-separated field path, e.g. `"address.city"`.
    pub fn field(&self, path: &str) -> Option<&ErrorTree> {
        path.split('.').try_fold(self, |node, name| match node {
            ErrorTree::Branch(fields) => fields.get(name),
            ErrorTree::Leaf(_) => None,
        })
    }

    /// Every message prefixed with the path of the field it belongs to.
    pub fn messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        self.collect_messages("", &mut messages);
        messages
    }

    fn collect_messages(&self, path: &str, messages: &mut Vec<String>) {
        match self {
            ErrorTree::Leaf(leaf_messages) => {
                for message in leaf_messages {
                    if path.is_empty() {
                        messages.push(message.clone());
                    } else {
                        messages.push(format!("{}: {}", path, message));
                    }
                }
            }
            ErrorTree::Branch(fields) => {
                for (name, node) in fields {
                    let field_path = if path.is_empty() {
                        name.clone()
                    } else {
                        format!("{}.{}", path, name)
                    };

                    node.collect_messages(&field_path, messages);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepValidation {
    pub status: ValidationStatus,
    pub errors: ErrorTree,
    pub is_complete: bool,
    pub timestamp: Timestamp,
}

impl StepValidation {
    pub fn with_status(status: ValidationStatus) -> Self {
        Self {
            status,
            errors: ErrorTree::default(),
            is_complete: status == ValidationStatus::Valid,
            timestamp: now_timestamp(),
        }
    }

    pub fn valid() -> Self {
        Self::with_status(ValidationStatus::Valid)
    }

    pub fn invalid(errors: ErrorTree) -> Self {
        Self {
            errors,
            ..Self::with_status(ValidationStatus::Invalid)
        }
    }
}

/// Per-step validation outcomes reported by the form layer. The wizard counts as
/// valid only over the steps that have been recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRegistry {
    validation_map: BTreeMap<WizardStep, StepValidation>,
    is_wizard_valid: bool,
    active_validation: bool,
}

impl ValidationRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Rebuilds a registry from stored records. Validity is recomputed rather than trusted.
    pub fn from_records<I>(records: I, active_validation: bool) -> Self
    where
        I: IntoIterator<Item = (WizardStep, StepValidation)>,
    {
        let mut registry = Self {
            validation_map: records.into_iter().collect(),
            is_wizard_valid: false,
            active_validation,
        };
        registry.update_wizard_valid_status();

        registry
    }

    pub fn records(&self) -> impl Iterator<Item = (WizardStep, &StepValidation)> + '_ {
        self.validation_map
            .iter()
            .map(|(step, validation)| (*step, validation))
    }

    pub fn is_wizard_valid(&self) -> bool {
        self.is_wizard_valid
    }

    pub fn is_validation_active(&self) -> bool {
        self.active_validation
    }

    pub fn step_validation(&self, step: WizardStep) -> Option<&StepValidation> {
        self.validation_map.get(&step)
    }

    pub fn step_status(&self, step: WizardStep) -> ValidationStatus {
        self.validation_map
            .get(&step)
            .map(|validation| validation.status)
            .unwrap_or_default()
    }

    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        self.step_status(step) == ValidationStatus::Valid
    }

    pub fn step_errors(&self, step: WizardStep) -> Option<&ErrorTree> {
        self.validation_map
            .get(&step)
            .map(|validation| &validation.errors)
    }

    /// Messages of every recorded step, prefixed with the step name.
    pub fn all_error_messages(&self) -> Vec<String> {
        self.validation_map
            .iter()
            .flat_map(|(step, validation)| {
                validation
                    .errors
                    .messages()
                    .into_iter()
                    .map(move |message| format!("{}: {}", step, message))
            })
            .collect()
    }

    pub fn set_step_validation(&mut self, step: WizardStep, validation: StepValidation) {
        log::debug!("step {} validation is {:?}", step, validation.status);

        self.validation_map.insert(step, validation);
        self.active_validation = false;
        self.update_wizard_valid_status();
    }

    /// With a forced status the record is written right away. Without one only the
    /// in-flight flag is raised; the form layer reports the outcome through
    /// `set_step_validation` once its checks finish.
    pub fn validate_step(&mut self, step: WizardStep, forced_status: Option<ValidationStatus>) {
        match forced_status {
            Some(status) => self.set_step_validation(step, StepValidation::with_status(status)),
            None => {
                log::debug!("validation of step {} requested", step);
                self.active_validation = true;
            }
        }
    }

    pub fn set_step_valid(&mut self, step: WizardStep) {
        self.set_step_validation(step, StepValidation::valid());
    }

    pub fn set_step_invalid(&mut self, step: WizardStep, errors: ErrorTree) {
        self.set_step_validation(step, StepValidation::invalid(errors));
    }

    pub fn reset_step_validation(&mut self, step: WizardStep) {
        self.validation_map.remove(&step);
        self.update_wizard_valid_status();
    }

    pub fn reset_all_validation(&mut self) {
        self.validation_map.clear();
        self.active_validation = false;
        self.update_wizard_valid_status();
    }

    pub fn update_wizard_valid_status(&mut self) {
        self.is_wizard_valid = !self.validation_map.is_empty()
            && self
                .validation_map
                .values()
                .all(|validation| validation.status == ValidationStatus::Valid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(non_snake_case)]
    fn is_wizard_valid__empty_registry__should_be_false() {
        assert!(!ValidationRegistry::new().is_wizard_valid());
    }

    #[test]
    #[allow(non_snake_case)]
    fn is_wizard_valid__all_recorded_steps_valid__should_ignore_unvisited_steps() {
        let mut registry = ValidationRegistry::new();

        registry.set_step_valid(WizardStep::ClientSelection);
        registry.set_step_valid(WizardStep::BranchSelection);

        assert!(registry.is_wizard_valid());
        assert_eq!(
            registry.step_status(WizardStep::OrderParameters),
            ValidationStatus::NotStarted
        );
    }

    #[test]
    #[allow(non_snake_case)]
    fn set_step_invalid__one_invalid_step__should_flip_wizard_to_invalid() {
        let mut registry = ValidationRegistry::new();
        registry.set_step_valid(WizardStep::ClientSelection);

        registry.set_step_invalid(
            WizardStep::BranchSelection,
            ErrorTree::branch([("branchId", ErrorTree::leaf(["Select a branch"]))]),
        );

        assert!(!registry.is_wizard_valid());
        assert!(!registry.is_step_valid(WizardStep::BranchSelection));
    }

    #[test]
    #[allow(non_snake_case)]
    fn reset_step_validation__removing_last_entries__should_not_be_vacuously_valid() {
        let mut registry = ValidationRegistry::new();
        registry.set_step_valid(WizardStep::ClientSelection);
        registry.set_step_invalid(WizardStep::BasicInfo, ErrorTree::leaf(["required"]));

        registry.reset_step_validation(WizardStep::BasicInfo);
        assert!(registry.is_wizard_valid());

        registry.reset_step_validation(WizardStep::ClientSelection);
        assert!(!registry.is_wizard_valid());
    }

    #[test]
    #[allow(non_snake_case)]
    fn reset_all_validation__populated_registry__should_clear_everything() {
        let mut registry = ValidationRegistry::new();
        registry.set_step_valid(WizardStep::ClientSelection);
        registry.validate_step(WizardStep::BranchSelection, None);

        registry.reset_all_validation();

        assert_eq!(registry.records().count(), 0);
        assert!(!registry.is_wizard_valid());
        assert!(!registry.is_validation_active());
    }

    #[test]
    #[allow(non_snake_case)]
    fn validate_step__without_forced_status__should_only_flag_active_validation() {
        let mut registry = ValidationRegistry::new();

        registry.validate_step(WizardStep::ClientSelection, None);

        assert!(registry.is_validation_active());
        assert_eq!(registry.step_validation(WizardStep::ClientSelection), None);

        registry.set_step_valid(WizardStep::ClientSelection);

        assert!(!registry.is_validation_active());
    }

    #[test]
    #[allow(non_snake_case)]
    fn validate_step__forced_status__should_record_completeness_from_status() {
        let mut registry = ValidationRegistry::new();

        registry.validate_step(WizardStep::ClientSelection, Some(ValidationStatus::Valid));
        registry.validate_step(WizardStep::BasicInfo, Some(ValidationStatus::Pending));

        let client = registry.step_validation(WizardStep::ClientSelection).unwrap();
        assert_eq!(client.status, ValidationStatus::Valid);
        assert!(client.is_complete);

        let basic_info = registry.step_validation(WizardStep::BasicInfo).unwrap();
        assert_eq!(basic_info.status, ValidationStatus::Pending);
        assert!(!basic_info.is_complete);
        assert!(!registry.is_wizard_valid());
    }

    #[test]
    #[allow(non_snake_case)]
    fn all_error_messages__nested_errors__should_prefix_step_and_field_path() {
        let mut registry = ValidationRegistry::new();

        registry.set_step_invalid(
            WizardStep::ClientSelection,
            ErrorTree::branch([
                (
                    "contacts",
                    ErrorTree::branch([("phone", ErrorTree::leaf(["Phone is already used"]))]),
                ),
                ("lastName", ErrorTree::leaf(["Required field"])),
            ]),
        );

        assert_eq!(
            registry.all_error_messages(),
            vec![
                String::from("CLIENT_SELECTION: contacts.phone: Phone is already used"),
                String::from("CLIENT_SELECTION: lastName: Required field"),
            ]
        );
    }

    #[test]
    #[allow(non_snake_case)]
    fn field__nested_path__should_find_node_or_return_none() {
        let errors = ErrorTree::branch([(
            "address",
            ErrorTree::branch([("city", ErrorTree::leaf(["Unknown city"]))]),
        )]);

        assert_eq!(
            errors.field("address.city"),
            Some(&ErrorTree::leaf(["Unknown city"]))
        );
        assert_eq!(errors.field("address.street"), None);
        assert_eq!(errors.field("address.city.extra"), None);
    }

    #[test]
    #[allow(non_snake_case)]
    fn is_empty__branches_without_messages__should_be_true() {
        let errors = ErrorTree::branch([
            ("name", ErrorTree::leaf(Vec::<String>::new())),
            ("address", ErrorTree::default()),
        ]);

        assert!(errors.is_empty());
        assert!(!ErrorTree::leaf(["x"]).is_empty());
    }

    #[test]
    #[allow(non_snake_case)]
    fn deserialize__form_shaped_json__should_produce_matching_tree() {
        let errors: ErrorTree =
            serde_json::from_str(r#"{"email":["Invalid email"],"address":{"zip":["Too short"]}}"#)
                .unwrap();

        assert_eq!(
            errors,
            ErrorTree::branch([
                ("email", ErrorTree::leaf(["Invalid email"])),
                (
                    "address",
                    ErrorTree::branch([("zip", ErrorTree::leaf(["Too short"]))])
                ),
            ])
        );
    }
}
