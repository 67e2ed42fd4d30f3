// crates/colloquy-core/src/runtime/list_control.rs
// ============================================================================
// Module: Colloquy Multi-Value Control
// Description: Acquisition state machine for a set of values with per-item
//              confirmation.
// Purpose: Add/change/remove/clear handling plus subset confirmation.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The multi-value control generalizes the single-value primitives to an
//! ordered list of entries. Add, change, remove, and clear are independent
//! capabilities bound to their own action ids. Confirmation operates over the
//! subset of unconfirmed entries: affirming marks exactly the offered subset
//! confirmed, and disaffirming removes exactly the offered subset, which
//! bounds the blast radius of a single "no". Duplicate ids are permitted to
//! support aggregate/quantity surfaces; aggregation itself is a rendering
//! concern.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::acts::ContentAct;
use crate::core::acts::InitiativeAct;
use crate::core::acts::UnusableInputReason;
use crate::core::acts::ValidationFailure;
use crate::core::config::ConfigError;
use crate::core::config::InteractionClaims;
use crate::core::config::ListControlConfig;
use crate::core::identifiers::ActionId;
use crate::core::identifiers::CandidateId;
use crate::core::identifiers::ControlId;
use crate::core::input::Feedback;
use crate::core::input::ResolvedInput;
use crate::core::input::SlotValue;
use crate::core::input::TurnRequest;
use crate::core::input::UtteranceInput;
use crate::core::state::ControlState;
use crate::core::state::ElicitationAction;
use crate::core::state::LastInitiative;
use crate::core::state::ListControlState;
use crate::core::state::ValueEntry;
use crate::interfaces::CandidateSource;
use crate::interfaces::IntentValueMapper;
use crate::interfaces::QueryContext;
use crate::interfaces::ValueValidator;
use crate::runtime::dispatch::ContractViolation;
use crate::runtime::dispatch::Control;
use crate::runtime::dispatch::ControlError;
use crate::runtime::dispatch::HandlerMatch;
use crate::runtime::dispatch::InitiativeHandler;
use crate::runtime::dispatch::InputHandler;
use crate::runtime::dispatch::ResponseBuilder;
use crate::runtime::dispatch::StateConsistencyError;
use crate::runtime::dispatch::apply_initiative_handler;
use crate::runtime::dispatch::apply_input_handler;
use crate::runtime::dispatch::select_initiative_handler;
use crate::runtime::dispatch::select_input_handler;
use crate::runtime::paging::resolve_position;
use crate::runtime::paging::spoken_window;
use crate::runtime::validate::first_failure;

// ============================================================================
// SECTION: Control Definition
// ============================================================================

/// Multi-value acquisition control.
pub struct ListControl {
    /// Validated configuration fixed at creation time.
    config: ListControlConfig,
    /// Persisted state restored at the start of each turn.
    state: ListControlState,
    /// Externally owned candidate supplier, invoked every turn.
    candidates: Box<dyn CandidateSource>,
    /// Ordered validators; the first failure wins.
    validators: Vec<Box<dyn ValueValidator>>,
    /// Optional mapper for bare feedback colliding with the value space.
    mapper: Option<Box<dyn IntentValueMapper>>,
    /// Injected input handlers evaluated after the built-ins.
    extensions: Vec<InputHandler<Self>>,
}

impl ListControl {
    /// Creates a control from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration fails validation.
    pub fn new(
        config: ListControlConfig,
        candidates: Box<dyn CandidateSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: ListControlState::default(),
            candidates,
            validators: Vec::new(),
            mapper: None,
            extensions: Vec::new(),
        })
    }

    /// Appends a validator; validators run in insertion order.
    #[must_use]
    pub fn with_validator(mut self, validator: Box<dyn ValueValidator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Installs the feedback-to-value mapper.
    #[must_use]
    pub fn with_mapper(mut self, mapper: Box<dyn IntentValueMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Appends a custom input handler evaluated after the built-ins.
    #[must_use]
    pub fn with_extension(mut self, handler: InputHandler<Self>) -> Self {
        self.extensions.push(handler);
        self
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &ListControlState {
        &self.state
    }

    /// Appends a value directly as an unconfirmed entry.
    pub fn add_value(&mut self, value: SlotValue) {
        self.state.values.push(ValueEntry::unconfirmed(value));
    }

    /// Resets the control state to empty.
    pub fn clear(&mut self) {
        self.state.clear();
    }

    /// Emits the confirmation question for the unconfirmed subset.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`] when no unconfirmed entries are held
    /// or an initiative act was already taken this turn.
    pub fn confirm_values(&mut self, builder: &mut ResponseBuilder) -> Result<(), ControlError> {
        self.offer_confirmation(builder)
    }

    // ========================================================================
    // SECTION: Handler Tables
    // ========================================================================

    /// Built-in input handlers, evaluated for the at-most-one-match invariant.
    const HANDLERS: &'static [InputHandler<Self>] = &[
        InputHandler {
            name: "add_with_value",
            matches: Self::matches_add_with_value,
            apply: Self::handle_add_with_value,
        },
        InputHandler {
            name: "change_with_value",
            matches: Self::matches_change_with_value,
            apply: Self::handle_change_with_value,
        },
        InputHandler {
            name: "remove_with_value",
            matches: Self::matches_remove_with_value,
            apply: Self::handle_remove_with_value,
        },
        InputHandler {
            name: "add_without_value",
            matches: Self::matches_add_without_value,
            apply: Self::handle_add_without_value,
        },
        InputHandler {
            name: "change_without_value",
            matches: Self::matches_change_without_value,
            apply: Self::handle_change_without_value,
        },
        InputHandler {
            name: "remove_without_value",
            matches: Self::matches_remove_without_value,
            apply: Self::handle_remove_without_value,
        },
        InputHandler {
            name: "clear_values",
            matches: Self::matches_clear,
            apply: Self::handle_clear,
        },
        InputHandler {
            name: "bare_value",
            matches: Self::matches_bare_value,
            apply: Self::handle_bare_value,
        },
        InputHandler {
            name: "mapped_feedback_value",
            matches: Self::matches_mapped_feedback_value,
            apply: Self::handle_mapped_feedback_value,
        },
        InputHandler {
            name: "confirmation_feedback",
            matches: Self::matches_confirmation_feedback,
            apply: Self::handle_confirmation_feedback,
        },
        InputHandler {
            name: "screen_selection",
            matches: Self::matches_screen_selection,
            apply: Self::handle_screen_selection,
        },
        InputHandler {
            name: "spoken_ordinal",
            matches: Self::matches_spoken_ordinal,
            apply: Self::handle_spoken_ordinal,
        },
    ];

    /// Initiative handlers in strict priority order: confirm, fix, elicit.
    /// This exact order is observable dialogue policy.
    const INITIATIVES: &'static [InitiativeHandler<Self>] = &[
        InitiativeHandler {
            name: "confirm_values",
            wants: Self::wants_to_confirm,
            take: Self::take_confirm,
        },
        InitiativeHandler {
            name: "fix_invalid_value",
            wants: Self::wants_to_fix_invalid,
            take: Self::take_fix_invalid,
        },
        InitiativeHandler {
            name: "elicit_value",
            wants: Self::wants_to_elicit,
            take: Self::take_elicit,
        },
    ];

    // ========================================================================
    // SECTION: Shared Helpers
    // ========================================================================

    /// Extracts the utterance shape from a request, if present.
    const fn utterance(request: &TurnRequest) -> Option<&UtteranceInput> {
        match &request.input {
            ResolvedInput::Utterance(utterance) => Some(utterance),
            ResolvedInput::Ordinal { .. } | ResolvedInput::Selection { .. } => None,
        }
    }

    /// Returns true when the utterance target is absent or claimed by us.
    fn target_matches(&self, utterance: &UtteranceInput) -> bool {
        utterance
            .target
            .as_ref()
            .is_none_or(|target| self.config.targets.contains(target))
    }

    /// Returns true when the utterance carries the given action set and the
    /// expected value presence.
    fn matches_capability(
        &self,
        request: &TurnRequest,
        actions: &[ActionId],
        with_value: bool,
    ) -> bool {
        Self::utterance(request).is_some_and(|utterance| {
            self.target_matches(utterance)
                && utterance.feedback.is_none()
                && utterance.value.is_some() == with_value
                && utterance.action.as_ref().is_some_and(|action| actions.contains(action))
        })
    }

    /// Builds the collaborator query context for this turn.
    fn query_context(&self, request: &TurnRequest) -> QueryContext {
        QueryContext {
            session_id: request.session_id.clone(),
            control_id: self.config.control_id.clone(),
            turn_id: request.turn_id.clone(),
            time: request.time,
        }
    }

    /// Recomputes the full candidate list for this turn.
    fn candidate_ids(&self, request: &TurnRequest) -> Result<Vec<CandidateId>, ControlError> {
        let ctx = self.query_context(request);
        Ok(self.candidates.candidates(&ctx)?)
    }

    /// Returns the elicitation action the next bare reply answers.
    fn reply_elicitation(&self) -> ElicitationAction {
        match self.state.elicitation {
            Some(ElicitationAction::Change) => ElicitationAction::Change,
            Some(ElicitationAction::Remove) => ElicitationAction::Remove,
            _ => ElicitationAction::Add,
        }
    }

    /// Routes an accepted value through the flow the recorded elicitation
    /// demands.
    fn accept_reply(
        &mut self,
        value: SlotValue,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        match self.reply_elicitation() {
            ElicitationAction::Change => self.accept_change(value, request, builder),
            ElicitationAction::Remove => self.remove_value(&value.value, request, builder),
            ElicitationAction::Set | ElicitationAction::Add => {
                self.accept_add(value, request, builder)
            }
        }
    }

    /// Appends a value, validating and responding.
    fn accept_add(
        &mut self,
        value: SlotValue,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.state.elicitation = Some(ElicitationAction::Add);
        let ctx = self.query_context(request);
        if let Some(failure) = first_failure(&self.validators, &value, &ctx)? {
            builder.add_content(ContentAct::InvalidValue {
                control_id: self.config.control_id.clone(),
                value,
                failure,
            });
            return self.elicit(ElicitationAction::Add, request, builder);
        }
        self.state.values.push(ValueEntry::unconfirmed(value.clone()));
        builder.add_content(ContentAct::ValueAdded {
            control_id: self.config.control_id.clone(),
            values: vec![value],
        });
        self.state.last_initiative = None;
        Ok(())
    }

    /// Replaces the held list with the supplied value, validating first.
    fn accept_change(
        &mut self,
        value: SlotValue,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.state.elicitation = Some(ElicitationAction::Change);
        let ctx = self.query_context(request);
        if let Some(failure) = first_failure(&self.validators, &value, &ctx)? {
            builder.add_content(ContentAct::InvalidValue {
                control_id: self.config.control_id.clone(),
                value,
                failure,
            });
            return self.elicit(ElicitationAction::Change, request, builder);
        }
        let previous = self
            .state
            .values
            .iter()
            .map(|entry| SlotValue {
                value: entry.id.clone(),
                er_match: entry.er_match,
            })
            .collect();
        self.state.values = vec![ValueEntry::unconfirmed(value.clone())];
        builder.add_content(ContentAct::ValueChanged {
            control_id: self.config.control_id.clone(),
            previous,
            values: vec![value],
        });
        self.state.last_initiative = None;
        Ok(())
    }

    /// Removes one held occurrence of the id, or reports the miss.
    fn remove_value(
        &mut self,
        id: &CandidateId,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.state.elicitation = Some(ElicitationAction::Remove);
        match self.state.values.iter().position(|entry| entry.id == *id) {
            Some(index) => {
                self.state.values.remove(index);
                builder.add_content(ContentAct::ValueRemoved {
                    control_id: self.config.control_id.clone(),
                    values: vec![id.clone()],
                });
                self.state.last_initiative = None;
                Ok(())
            }
            None => {
                builder.add_content(ContentAct::InvalidRemoveValue {
                    control_id: self.config.control_id.clone(),
                    values: vec![id.clone()],
                });
                self.elicit(ElicitationAction::Remove, request, builder)
            }
        }
    }

    /// Emits the elicitation question matching the given action.
    fn elicit(
        &mut self,
        elicitation: ElicitationAction,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.state.elicitation = Some(elicitation);
        match elicitation {
            ElicitationAction::Change => {
                let all = self.candidate_ids(request)?;
                let choices =
                    spoken_window(&all, self.state.spoken_page_index, self.config.page_size)
                        .to_vec();
                self.state.last_initiative = Some(LastInitiative::RequestChangedValue);
                builder.add_initiative(InitiativeAct::RequestChangedValue {
                    control_id: self.config.control_id.clone(),
                    choices,
                })?;
            }
            ElicitationAction::Remove => {
                let choices = self.state.held_ids();
                self.state.last_initiative = Some(LastInitiative::RequestRemovedValue);
                builder.add_initiative(InitiativeAct::RequestRemovedValue {
                    control_id: self.config.control_id.clone(),
                    choices,
                })?;
            }
            ElicitationAction::Set | ElicitationAction::Add => {
                let all = self.candidate_ids(request)?;
                let choices =
                    spoken_window(&all, self.state.spoken_page_index, self.config.page_size)
                        .to_vec();
                self.state.last_initiative = Some(LastInitiative::RequestValue);
                builder.add_initiative(InitiativeAct::RequestValue {
                    control_id: self.config.control_id.clone(),
                    elicitation,
                    choices,
                })?;
            }
        }
        Ok(())
    }

    /// Emits the confirmation question for the unconfirmed subset.
    fn offer_confirmation(&mut self, builder: &mut ResponseBuilder) -> Result<(), ControlError> {
        let values = self.state.unconfirmed_ids();
        if values.is_empty() {
            return Err(ControlError::Contract(ContractViolation::MissingHeldValue {
                control_id: self.config.control_id.clone(),
            }));
        }
        self.state.last_initiative = Some(LastInitiative::ConfirmValue {
            values: values.clone(),
        });
        builder.add_initiative(InitiativeAct::ConfirmValue {
            control_id: self.config.control_id.clone(),
            values,
        })?;
        Ok(())
    }

    /// Raises the stale-token contract violation for an apply body.
    fn stale_token(&self, handler: &'static str) -> ControlError {
        ControlError::Contract(ContractViolation::HandleWithoutMatch {
            control_id: self.config.control_id.clone(),
            handler,
        })
    }

    // ========================================================================
    // SECTION: Input Predicates
    // ========================================================================

    /// Typed value with an add action.
    fn matches_add_with_value(&self, request: &TurnRequest) -> bool {
        self.matches_capability(request, &self.config.actions.add, true)
    }

    /// Typed value with a change action.
    fn matches_change_with_value(&self, request: &TurnRequest) -> bool {
        self.matches_capability(request, &self.config.actions.change, true)
    }

    /// Typed value with a remove action.
    fn matches_remove_with_value(&self, request: &TurnRequest) -> bool {
        self.matches_capability(request, &self.config.actions.remove, true)
    }

    /// Add action with no value.
    fn matches_add_without_value(&self, request: &TurnRequest) -> bool {
        self.matches_capability(request, &self.config.actions.add, false)
    }

    /// Change action with no value; only meaningful once entries are held.
    fn matches_change_without_value(&self, request: &TurnRequest) -> bool {
        !self.state.values.is_empty()
            && self.matches_capability(request, &self.config.actions.change, false)
    }

    /// Remove action with no value.
    fn matches_remove_without_value(&self, request: &TurnRequest) -> bool {
        self.matches_capability(request, &self.config.actions.remove, false)
    }

    /// Clear action, with or without a value.
    fn matches_clear(&self, request: &TurnRequest) -> bool {
        Self::utterance(request).is_some_and(|utterance| {
            self.target_matches(utterance)
                && utterance.feedback.is_none()
                && utterance
                    .action
                    .as_ref()
                    .is_some_and(|action| self.config.actions.clear.contains(action))
        })
    }

    /// Bare value with no feedback or action.
    fn matches_bare_value(&self, request: &TurnRequest) -> bool {
        Self::utterance(request)
            .is_some_and(|utterance| utterance.is_bare_value() && self.target_matches(utterance))
    }

    /// Bare feedback colliding with the value space while a value request is
    /// pending.
    fn matches_mapped_feedback_value(&self, request: &TurnRequest) -> bool {
        if !matches!(self.state.last_initiative, Some(LastInitiative::RequestValue)) {
            return false;
        }
        Self::utterance(request).is_some_and(|utterance| {
            utterance.is_bare_feedback()
                && utterance.feedback.is_some_and(|feedback| {
                    self.mapper
                        .as_ref()
                        .is_some_and(|mapper| mapper.map_feedback(feedback).is_some())
                })
        })
    }

    /// Bare feedback while a confirmation question is pending.
    fn matches_confirmation_feedback(&self, request: &TurnRequest) -> bool {
        matches!(self.state.last_initiative, Some(LastInitiative::ConfirmValue { .. }))
            && Self::utterance(request).is_some_and(UtteranceInput::is_bare_feedback)
    }

    /// Screen selection naming this control.
    fn matches_screen_selection(&self, request: &TurnRequest) -> bool {
        matches!(
            &request.input,
            ResolvedInput::Selection { control_id, .. } if *control_id == self.config.control_id
        )
    }

    /// Spoken ordinal.
    fn matches_spoken_ordinal(&self, request: &TurnRequest) -> bool {
        matches!(&request.input, ResolvedInput::Ordinal { .. })
    }

    // ========================================================================
    // SECTION: Input Applications
    // ========================================================================

    /// Adds the supplied value.
    fn handle_add_with_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let value = Self::utterance(request)
            .and_then(|utterance| utterance.value.clone())
            .ok_or_else(|| self.stale_token("add_with_value"))?;
        self.accept_add(value, request, builder)
    }

    /// Replaces the held list with the supplied value.
    fn handle_change_with_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let value = Self::utterance(request)
            .and_then(|utterance| utterance.value.clone())
            .ok_or_else(|| self.stale_token("change_with_value"))?;
        self.accept_change(value, request, builder)
    }

    /// Removes the supplied value or reports the miss.
    fn handle_remove_with_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let value = Self::utterance(request)
            .and_then(|utterance| utterance.value.clone())
            .ok_or_else(|| self.stale_token("remove_with_value"))?;
        self.remove_value(&value.value, request, builder)
    }

    /// Re-asks the add elicitation question.
    fn handle_add_without_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.elicit(ElicitationAction::Add, request, builder)
    }

    /// Re-asks the change elicitation question.
    fn handle_change_without_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.elicit(ElicitationAction::Change, request, builder)
    }

    /// Asks which held value to remove.
    fn handle_remove_without_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.elicit(ElicitationAction::Remove, request, builder)
    }

    /// Clears every held value.
    fn handle_clear(
        &mut self,
        _request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let previous = self.state.held_ids();
        self.state.clear();
        builder.add_content(ContentAct::ValueCleared {
            control_id: self.config.control_id.clone(),
            previous,
        });
        Ok(())
    }

    /// Treats a bare value as answering the recorded elicitation.
    fn handle_bare_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let value = Self::utterance(request)
            .and_then(|utterance| utterance.value.clone())
            .ok_or_else(|| self.stale_token("bare_value"))?;
        self.accept_reply(value, request, builder)
    }

    /// Accepts bare feedback mapped into the value space.
    fn handle_mapped_feedback_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let mapped = Self::utterance(request)
            .and_then(|utterance| utterance.feedback)
            .and_then(|feedback| {
                self.mapper.as_ref().and_then(|mapper| mapper.map_feedback(feedback))
            })
            .ok_or_else(|| self.stale_token("mapped_feedback_value"))?;
        self.accept_reply(SlotValue::matched(mapped), request, builder)
    }

    /// Resolves a pending confirmation question over the offered subset.
    fn handle_confirmation_feedback(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let Some(LastInitiative::ConfirmValue { values: offered }) =
            self.state.last_initiative.clone()
        else {
            return Err(self.stale_token("confirmation_feedback"));
        };
        let feedback = Self::utterance(request)
            .and_then(|utterance| utterance.feedback)
            .ok_or_else(|| self.stale_token("confirmation_feedback"))?;
        match feedback {
            Feedback::Affirm => {
                for id in &offered {
                    if let Some(entry) = self
                        .state
                        .values
                        .iter_mut()
                        .find(|entry| !entry.confirmed && entry.id == *id)
                    {
                        entry.confirmed = true;
                    }
                }
                self.state.last_initiative = None;
                builder.add_content(ContentAct::ValueConfirmed {
                    control_id: self.config.control_id.clone(),
                    values: offered,
                });
                Ok(())
            }
            Feedback::Disaffirm => {
                for id in &offered {
                    if let Some(index) = self
                        .state
                        .values
                        .iter()
                        .position(|entry| !entry.confirmed && entry.id == *id)
                    {
                        self.state.values.remove(index);
                    }
                }
                self.state.last_initiative = None;
                builder.add_content(ContentAct::ValueDisconfirmed {
                    control_id: self.config.control_id.clone(),
                    values: offered,
                });
                self.elicit(ElicitationAction::Add, request, builder)
            }
        }
    }

    /// Resolves a screen selection against the full candidate list.
    fn handle_screen_selection(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let ResolvedInput::Selection { position, .. } = request.input else {
            return Err(self.stale_token("screen_selection"));
        };
        let all = self.candidate_ids(request)?;
        let Some(candidate) = resolve_position(&all, position) else {
            return Err(ControlError::StateConsistency(
                StateConsistencyError::SelectionOutOfRange {
                    control_id: self.config.control_id.clone(),
                    position,
                    available: u64::try_from(all.len()).unwrap_or(u64::MAX),
                },
            ));
        };
        let value = SlotValue::matched(candidate.clone());
        self.accept_reply(value, request, builder)
    }

    /// Resolves a spoken ordinal against the currently spoken page.
    fn handle_spoken_ordinal(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let ResolvedInput::Ordinal { position } = request.input else {
            return Err(self.stale_token("spoken_ordinal"));
        };
        let all = self.candidate_ids(request)?;
        let page = spoken_window(&all, self.state.spoken_page_index, self.config.page_size);
        match resolve_position(page, position) {
            Some(candidate) => {
                let value = SlotValue::matched(candidate.clone());
                self.accept_reply(value, request, builder)
            }
            None => {
                builder.add_content(ContentAct::UnusableInputValue {
                    control_id: self.config.control_id.clone(),
                    reason: UnusableInputReason::OrdinalOutOfRange,
                });
                self.elicit(self.reply_elicitation(), request, builder)
            }
        }
    }

    // ========================================================================
    // SECTION: Initiative Handlers
    // ========================================================================

    /// True when unconfirmed entries await required confirmation.
    fn wants_to_confirm(&self, _request: &TurnRequest) -> Result<bool, ControlError> {
        Ok(self.config.confirmation_required && !self.state.unconfirmed_ids().is_empty())
    }

    /// Offers the unconfirmed subset for confirmation.
    fn take_confirm(
        &mut self,
        _request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.offer_confirmation(builder)
    }

    /// True when any held entry fails validation.
    fn wants_to_fix_invalid(&self, request: &TurnRequest) -> Result<bool, ControlError> {
        Ok(self.first_invalid_entry(request)?.is_some())
    }

    /// Reports the first invalid entry and re-elicits.
    ///
    /// Validators are re-run here; if an impure validator changes its verdict
    /// between probe and take, the turn ends without an initiative act.
    fn take_fix_invalid(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        if let Some((value, failure)) = self.first_invalid_entry(request)? {
            builder.add_content(ContentAct::InvalidValue {
                control_id: self.config.control_id.clone(),
                value,
                failure,
            });
            return self.elicit(ElicitationAction::Add, request, builder);
        }
        Ok(())
    }

    /// True when no entries are held and at least one is required.
    fn wants_to_elicit(&self, _request: &TurnRequest) -> Result<bool, ControlError> {
        Ok(self.config.required && self.state.values.is_empty())
    }

    /// Asks for a value.
    fn take_elicit(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.elicit(ElicitationAction::Add, request, builder)
    }

    /// Returns the first held entry failing validation, with its verdict.
    fn first_invalid_entry(
        &self,
        request: &TurnRequest,
    ) -> Result<Option<(SlotValue, ValidationFailure)>, ControlError> {
        let ctx = self.query_context(request);
        for entry in &self.state.values {
            let value = SlotValue {
                value: entry.id.clone(),
                er_match: entry.er_match,
            };
            if let Some(failure) = first_failure(&self.validators, &value, &ctx)? {
                return Ok(Some((value, failure)));
            }
        }
        Ok(None)
    }
}

// ============================================================================
// SECTION: Control Trait Implementation
// ============================================================================

impl Control for ListControl {
    fn control_id(&self) -> &ControlId {
        &self.config.control_id
    }

    fn restore_state(
        &mut self,
        snapshot: Option<&ControlState>,
    ) -> Result<(), StateConsistencyError> {
        match snapshot {
            None => {
                self.state = ListControlState::default();
                Ok(())
            }
            Some(ControlState::List(state)) => {
                self.state = state.clone();
                Ok(())
            }
            Some(ControlState::Value(_)) => Err(StateConsistencyError::StateKindMismatch {
                control_id: self.config.control_id.clone(),
            }),
        }
    }

    fn snapshot_state(&self) -> ControlState {
        ControlState::List(self.state.clone())
    }

    fn probe(&self, request: &TurnRequest) -> Result<Option<HandlerMatch>, ControlError> {
        Ok(select_input_handler(
            &self.config.control_id,
            Self::HANDLERS,
            &self.extensions,
            self,
            request,
        )?)
    }

    fn handle(
        &mut self,
        matched: &HandlerMatch,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let control_id = self.config.control_id.clone();
        let extensions = std::mem::take(&mut self.extensions);
        let result = apply_input_handler(
            &control_id,
            Self::HANDLERS,
            &extensions,
            self,
            matched,
            request,
            builder,
        );
        self.extensions = extensions;
        result
    }

    fn probe_initiative(
        &self,
        request: &TurnRequest,
    ) -> Result<Option<HandlerMatch>, ControlError> {
        select_initiative_handler(&self.config.control_id, Self::INITIATIVES, self, request)
    }

    fn take_initiative(
        &mut self,
        matched: &HandlerMatch,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let control_id = self.config.control_id.clone();
        apply_initiative_handler(
            &control_id,
            Self::INITIATIVES,
            self,
            matched,
            request,
            builder,
        )
    }

    fn interaction_claims(&self) -> InteractionClaims {
        self.config.interaction_claims()
    }

    fn stringify_state_for_diagram(&self) -> String {
        let values: Vec<String> = self
            .state
            .values
            .iter()
            .map(|entry| {
                let marker = if entry.confirmed { "+" } else { "?" };
                format!("{}{marker}", entry.id)
            })
            .collect();
        let initiative = self.state.last_initiative.as_ref().map_or("-", |last| match last {
            LastInitiative::RequestValue => "request_value",
            LastInitiative::RequestChangedValue => "request_changed_value",
            LastInitiative::RequestRemovedValue => "request_removed_value",
            LastInitiative::ConfirmValue { .. } => "confirm_value",
        });
        format!(
            "ListControl[{}] values=[{}] page={} last_initiative={}",
            self.config.control_id,
            values.join(","),
            self.state.spoken_page_index,
            initiative
        )
    }
}
