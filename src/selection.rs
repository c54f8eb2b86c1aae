//! Turns a candidate date into the next committed value for a selection mode.

use crate::panel::{Emission, PanelState, PickRules, PickerType};
use crate::range::{DateRange, RangeError};
use crate::value::{SelectionMode, ValueSet};
use crate::{CalendarDate, DateFilter, ParseError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickError {
    /// The caller's predicate vetoed the date.
    #[error("{0} is disabled and cannot be selected")]
    DisabledSelectionRejected(CalendarDate),

    #[error("time of day cannot be set on a {picker_type} picker in {mode:?} mode")]
    TimeUnavailable { picker_type: PickerType, mode: SelectionMode },

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Outcome of resolving a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The new committed value
    Value(ValueSet),
    /// One end of a range; the host's two-slot buffer decides when the
    /// pair is complete and calls [`commit_range`].
    RangeEndpoint(CalendarDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickResult {
    pub state:      PanelState,
    pub emission:   Option<Emission>,
    pub resolution: Option<Resolution>,
}

/// Resolves `candidate` against the current value.
///
/// Single replaces, Multiple toggles membership, Range hands the endpoint
/// back to the caller.
///
/// # Errors
/// Returns `PickError::DisabledSelectionRejected` when `disabled` vetoes the candidate.
pub fn resolve(
    candidate: CalendarDate,
    mode: SelectionMode,
    current: &ValueSet,
    disabled: &DateFilter<'_>,
) -> Result<Resolution, PickError> {
    if disabled(&candidate) {
        return Err(PickError::DisabledSelectionRejected(candidate));
    }
    Ok(match mode {
        SelectionMode::Single => Resolution::Value(ValueSet::Single(candidate)),
        SelectionMode::Range => Resolution::RangeEndpoint(candidate),
        SelectionMode::Multiple => Resolution::Value(current.toggled(candidate)),
    })
}

/// Exactly two dates, in order.
pub fn is_valid_range(dates: &[CalendarDate]) -> bool {
    matches!(dates, [start, end] if start <= end)
}

/// Builds a range value from two chosen endpoints.
///
/// # Errors
/// Returns `PickError::Range` when `start` is after `end`, and
/// `PickError::DisabledSelectionRejected` when either end is vetoed.
pub fn commit_range(start: CalendarDate, end: CalendarDate, disabled: &DateFilter<'_>) -> Result<ValueSet, PickError> {
    let range = DateRange::new(start, end)?;
    if let Some(vetoed) = [start, end].into_iter().find(|d| disabled(d)) {
        return Err(PickError::DisabledSelectionRejected(vetoed));
    }
    Ok(ValueSet::Range(range))
}

/// A cell pick: moves the panel, then resolves whatever the panel emits.
///
/// Membership is checked against `current` truncated to the picker's
/// granularity, the same value the grid marks active. A vetoed direct pick
/// is an error and the caller keeps its old state. A vetoed derived value
/// from a partial update is dropped, but the panel still drills down.
///
/// # Errors
/// Returns `PickError::DisabledSelectionRejected` when a directly picked date is vetoed.
pub fn pick(
    state: PanelState,
    date: CalendarDate,
    rules: &PickRules,
    current: &ValueSet,
    mode: SelectionMode,
    disabled: &DateFilter<'_>,
) -> Result<PickResult, PickError> {
    let transition = state.pick(date, rules, current);
    let Some(emission) = transition.emission else {
        return Ok(PickResult {
            state:      transition.state,
            emission:   None,
            resolution: None,
        });
    };

    let members = current.truncated(rules.picker_type.panel());
    match resolve(emission.date, mode, &members, disabled) {
        Ok(resolution) => Ok(PickResult {
            state:      transition.state,
            emission:   Some(emission),
            resolution: Some(resolution),
        }),
        Err(err) if emission.derived => {
            tracing::debug!(date = %emission.date, %err, "dropping derived value");
            Ok(PickResult {
                state:      transition.state,
                emission:   None,
                resolution: None,
            })
        },
        Err(err) => Err(err),
    }
}
