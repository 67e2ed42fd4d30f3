// crates/colloquy-core/src/runtime/value_control.rs
// ============================================================================
// Module: Colloquy Single-Value Control
// Description: Acquisition state machine for one value from a candidate list.
// Purpose: Set/change/confirm/elicit/ordinal/selection handling for one slot.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The single-value control acquires exactly one value drawn from an
//! externally computed candidate list. Input handlers cover typed values,
//! bare values, colliding bare feedback, confirmation replies, screen
//! selections, and spoken ordinals; initiative handlers ask to confirm, fix,
//! or elicit in that fixed priority order.
//!
//! Screen selections resolve against the full candidate list because the
//! rendered surface showed the full list; spoken ordinals resolve only
//! against the currently spoken page. An out-of-range selection is a stale
//! surface and therefore fatal, while an out-of-range ordinal is the user's
//! mistake and re-elicits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::acts::ContentAct;
use crate::core::acts::InitiativeAct;
use crate::core::acts::UnusableInputReason;
use crate::core::config::ConfigError;
use crate::core::config::InteractionClaims;
use crate::core::config::ValueControlConfig;
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
use crate::core::state::ValueControlState;
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

/// Single-value acquisition control.
pub struct ValueControl {
    /// Validated configuration fixed at creation time.
    config: ValueControlConfig,
    /// Persisted state restored at the start of each turn.
    state: ValueControlState,
    /// Externally owned candidate supplier, invoked every turn.
    candidates: Box<dyn CandidateSource>,
    /// Ordered validators; the first failure wins.
    validators: Vec<Box<dyn ValueValidator>>,
    /// Optional mapper for bare feedback colliding with the value space.
    mapper: Option<Box<dyn IntentValueMapper>>,
    /// Injected input handlers evaluated after the built-ins.
    extensions: Vec<InputHandler<Self>>,
}

impl ValueControl {
    /// Creates a control from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration fails validation.
    pub fn new(
        config: ValueControlConfig,
        candidates: Box<dyn CandidateSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: ValueControlState::default(),
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
    pub const fn state(&self) -> &ValueControlState {
        &self.state
    }

    /// Stores a value directly, recording the replaced value and resetting
    /// confirmation.
    pub fn set_value(&mut self, value: SlotValue) {
        self.state.set_value(value);
    }

    /// Resets the control state to empty.
    pub fn clear(&mut self) {
        self.state.clear();
    }

    /// Emits the confirmation question for the held value.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`] when no value is held or an initiative
    /// act was already taken this turn.
    pub fn confirm_value(&mut self, builder: &mut ResponseBuilder) -> Result<(), ControlError> {
        self.offer_confirmation(builder)
    }

    // ========================================================================
    // SECTION: Handler Tables
    // ========================================================================

    /// Built-in input handlers, evaluated for the at-most-one-match invariant.
    const HANDLERS: &'static [InputHandler<Self>] = &[
        InputHandler {
            name: "set_with_value",
            matches: Self::matches_set_with_value,
            apply: Self::handle_set_with_value,
        },
        InputHandler {
            name: "change_with_value",
            matches: Self::matches_change_with_value,
            apply: Self::handle_change_with_value,
        },
        InputHandler {
            name: "set_without_value",
            matches: Self::matches_set_without_value,
            apply: Self::handle_set_without_value,
        },
        InputHandler {
            name: "change_without_value",
            matches: Self::matches_change_without_value,
            apply: Self::handle_change_without_value,
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
            name: "confirm_value",
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
            _ => ElicitationAction::Set,
        }
    }

    /// Accepts a value under the given elicitation, validating and responding.
    fn accept_value(
        &mut self,
        value: SlotValue,
        elicitation: ElicitationAction,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        if elicitation == ElicitationAction::Change && self.state.value.is_none() {
            return Err(ControlError::Contract(ContractViolation::MissingPreviousValue {
                control_id: self.config.control_id.clone(),
            }));
        }

        self.state.elicitation = Some(elicitation);
        self.state.set_value(value.clone());

        let ctx = self.query_context(request);
        if let Some(failure) = first_failure(&self.validators, &value, &ctx)? {
            builder.add_content(ContentAct::InvalidValue {
                control_id: self.config.control_id.clone(),
                value,
                failure,
            });
            return self.elicit(elicitation, request, builder);
        }

        match elicitation {
            ElicitationAction::Change => {
                let previous = self.state.previous_value.clone().ok_or_else(|| {
                    ControlError::Contract(ContractViolation::MissingPreviousValue {
                        control_id: self.config.control_id.clone(),
                    })
                })?;
                builder.add_content(ContentAct::ValueChanged {
                    control_id: self.config.control_id.clone(),
                    previous: vec![previous],
                    values: vec![value],
                });
            }
            ElicitationAction::Set | ElicitationAction::Add | ElicitationAction::Remove => {
                builder.add_content(ContentAct::ValueSet {
                    control_id: self.config.control_id.clone(),
                    values: vec![value],
                });
            }
        }
        self.state.last_initiative = None;
        Ok(())
    }

    /// Emits the elicitation question matching the given action.
    fn elicit(
        &mut self,
        elicitation: ElicitationAction,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let all = self.candidate_ids(request)?;
        let choices =
            spoken_window(&all, self.state.spoken_page_index, self.config.page_size).to_vec();
        self.state.elicitation = Some(elicitation);
        if elicitation == ElicitationAction::Change {
            self.state.last_initiative = Some(LastInitiative::RequestChangedValue);
            builder.add_initiative(InitiativeAct::RequestChangedValue {
                control_id: self.config.control_id.clone(),
                choices,
            })?;
        } else {
            self.state.last_initiative = Some(LastInitiative::RequestValue);
            builder.add_initiative(InitiativeAct::RequestValue {
                control_id: self.config.control_id.clone(),
                elicitation,
                choices,
            })?;
        }
        Ok(())
    }

    /// Emits the confirmation question for the held value.
    fn offer_confirmation(&mut self, builder: &mut ResponseBuilder) -> Result<(), ControlError> {
        let value = self.state.value.clone().ok_or_else(|| {
            ControlError::Contract(ContractViolation::MissingHeldValue {
                control_id: self.config.control_id.clone(),
            })
        })?;
        let values = vec![value.value];
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

    /// Typed value with a set action.
    fn matches_set_with_value(&self, request: &TurnRequest) -> bool {
        Self::utterance(request).is_some_and(|utterance| {
            self.target_matches(utterance)
                && utterance.feedback.is_none()
                && utterance.value.is_some()
                && utterance
                    .action
                    .as_ref()
                    .is_some_and(|action| self.config.actions.set.contains(action))
        })
    }

    /// Typed value with a change action.
    fn matches_change_with_value(&self, request: &TurnRequest) -> bool {
        Self::utterance(request).is_some_and(|utterance| {
            self.target_matches(utterance)
                && utterance.feedback.is_none()
                && utterance.value.is_some()
                && utterance
                    .action
                    .as_ref()
                    .is_some_and(|action| self.config.actions.change.contains(action))
        })
    }

    /// Set action with no value.
    fn matches_set_without_value(&self, request: &TurnRequest) -> bool {
        Self::utterance(request).is_some_and(|utterance| {
            self.target_matches(utterance)
                && utterance.feedback.is_none()
                && utterance.value.is_none()
                && utterance
                    .action
                    .as_ref()
                    .is_some_and(|action| self.config.actions.set.contains(action))
        })
    }

    /// Change action with no value; only meaningful once a value is held.
    fn matches_change_without_value(&self, request: &TurnRequest) -> bool {
        self.state.value.is_some()
            && Self::utterance(request).is_some_and(|utterance| {
                self.target_matches(utterance)
                    && utterance.feedback.is_none()
                    && utterance.value.is_none()
                    && utterance
                        .action
                        .as_ref()
                        .is_some_and(|action| self.config.actions.change.contains(action))
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

    /// Sets the supplied value.
    fn handle_set_with_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let value = Self::utterance(request)
            .and_then(|utterance| utterance.value.clone())
            .ok_or_else(|| self.stale_token("set_with_value"))?;
        self.accept_value(value, ElicitationAction::Set, request, builder)
    }

    /// Changes to the supplied value.
    fn handle_change_with_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let value = Self::utterance(request)
            .and_then(|utterance| utterance.value.clone())
            .ok_or_else(|| self.stale_token("change_with_value"))?;
        self.accept_value(value, ElicitationAction::Change, request, builder)
    }

    /// Re-asks the set elicitation question.
    fn handle_set_without_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.elicit(ElicitationAction::Set, request, builder)
    }

    /// Re-asks the change elicitation question.
    fn handle_change_without_value(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.elicit(ElicitationAction::Change, request, builder)
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
        self.accept_value(value, self.reply_elicitation(), request, builder)
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
        self.accept_value(SlotValue::matched(mapped), self.reply_elicitation(), request, builder)
    }

    /// Resolves a pending confirmation question.
    fn handle_confirmation_feedback(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let Some(LastInitiative::ConfirmValue { values }) = self.state.last_initiative.clone()
        else {
            return Err(self.stale_token("confirmation_feedback"));
        };
        let feedback = Self::utterance(request)
            .and_then(|utterance| utterance.feedback)
            .ok_or_else(|| self.stale_token("confirmation_feedback"))?;
        match feedback {
            Feedback::Affirm => {
                self.state.confirmed = true;
                self.state.last_initiative = None;
                builder.add_content(ContentAct::ValueConfirmed {
                    control_id: self.config.control_id.clone(),
                    values,
                });
                Ok(())
            }
            Feedback::Disaffirm => {
                self.state.confirmed = false;
                builder.add_content(ContentAct::ValueDisconfirmed {
                    control_id: self.config.control_id.clone(),
                    values,
                });
                self.elicit(ElicitationAction::Set, request, builder)
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
        self.accept_value(value, self.reply_elicitation(), request, builder)
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
                self.accept_value(value, self.reply_elicitation(), request, builder)
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

    /// True when a held value awaits required confirmation.
    fn wants_to_confirm(&self, _request: &TurnRequest) -> Result<bool, ControlError> {
        Ok(self.config.confirmation_required && self.state.value.is_some() && !self.state.confirmed)
    }

    /// Offers the held value for confirmation.
    fn take_confirm(
        &mut self,
        _request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.offer_confirmation(builder)
    }

    /// True when the held value fails validation.
    fn wants_to_fix_invalid(&self, request: &TurnRequest) -> Result<bool, ControlError> {
        let Some(value) = &self.state.value else {
            return Ok(false);
        };
        let ctx = self.query_context(request);
        Ok(first_failure(&self.validators, value, &ctx)?.is_some())
    }

    /// Reports the invalid value and re-elicits.
    ///
    /// Validators are re-run here; if an impure validator changes its verdict
    /// between probe and take, the turn ends without an initiative act.
    fn take_fix_invalid(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        let Some(value) = self.state.value.clone() else {
            return Err(self.stale_token("fix_invalid_value"));
        };
        let ctx = self.query_context(request);
        if let Some(failure) = first_failure(&self.validators, &value, &ctx)? {
            builder.add_content(ContentAct::InvalidValue {
                control_id: self.config.control_id.clone(),
                value,
                failure,
            });
            return self.elicit(self.reply_elicitation(), request, builder);
        }
        Ok(())
    }

    /// True when no value is held and one is required.
    fn wants_to_elicit(&self, _request: &TurnRequest) -> Result<bool, ControlError> {
        Ok(self.config.required && self.state.value.is_none())
    }

    /// Asks for a value.
    fn take_elicit(
        &mut self,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError> {
        self.elicit(ElicitationAction::Set, request, builder)
    }
}

// ============================================================================
// SECTION: Control Trait Implementation
// ============================================================================

impl Control for ValueControl {
    fn control_id(&self) -> &ControlId {
        &self.config.control_id
    }

    fn restore_state(
        &mut self,
        snapshot: Option<&ControlState>,
    ) -> Result<(), StateConsistencyError> {
        match snapshot {
            None => {
                self.state = ValueControlState::default();
                Ok(())
            }
            Some(ControlState::Value(state)) => {
                self.state = state.clone();
                Ok(())
            }
            Some(ControlState::List(_)) => Err(StateConsistencyError::StateKindMismatch {
                control_id: self.config.control_id.clone(),
            }),
        }
    }

    fn snapshot_state(&self) -> ControlState {
        ControlState::Value(self.state.clone())
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
        let value = self
            .state
            .value
            .as_ref()
            .map_or_else(|| "-".to_string(), |value| value.value.to_string());
        let initiative = self.state.last_initiative.as_ref().map_or("-", |last| match last {
            LastInitiative::RequestValue => "request_value",
            LastInitiative::RequestChangedValue => "request_changed_value",
            LastInitiative::RequestRemovedValue => "request_removed_value",
            LastInitiative::ConfirmValue { .. } => "confirm_value",
        });
        format!(
            "ValueControl[{}] value={} confirmed={} page={} last_initiative={}",
            self.config.control_id, value, self.state.confirmed, self.state.spoken_page_index,
            initiative
        )
    }
}
