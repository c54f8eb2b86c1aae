//! Which view is shown and which month/year it is anchored on.
//!
//! [`PanelState`] is a plain `Copy` value; every operation returns the next
//! state instead of mutating, so rejected picks leave the old state intact.

use crate::math::{shift_month, shift_year, start_of_month, start_of_year, with_month, with_year};
use crate::prelude::*;
use crate::value::ValueSet;
use crate::{CalendarDate, DECADE};
use serde::{Deserialize, Serialize};

/// The three calendar views, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum PanelType {
    #[display(fmt = "day")]
    #[serde(alias = "date")]
    Day,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "year")]
    Year,
}

/// What a picker ultimately commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum PickerType {
    #[default]
    #[display(fmt = "date")]
    Date,
    #[display(fmt = "datetime")]
    DateTime,
    #[display(fmt = "week")]
    Week,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "year")]
    Year,
}

impl PickerType {
    /// The finest panel this picker type needs, which is also the granularity
    /// its values are compared at.
    pub const fn panel(self) -> PanelType {
        match self {
            Self::Year => PanelType::Year,
            Self::Month => PanelType::Month,
            Self::Date | Self::DateTime | Self::Week => PanelType::Day,
        }
    }
}

/// Which kind of cell produced an emitted date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum SelectionTag {
    #[display(fmt = "date")]
    Date,
    #[display(fmt = "week")]
    Week,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "year")]
    Year,
    #[display(fmt = "time")]
    Time,
}

impl SelectionTag {
    /// Tag of a pick on the day panel.
    pub const fn for_day(picker_type: PickerType) -> Self {
        match picker_type {
            PickerType::Week => Self::Week,
            _ => Self::Date,
        }
    }

    /// Whether a selection with this tag finishes a `picker_type` picker.
    /// Time selections always do.
    pub const fn completes(self, picker_type: PickerType) -> bool {
        matches!(
            (self, picker_type),
            (Self::Time, _)
                | (Self::Date, PickerType::Date)
                | (Self::Week, PickerType::Week)
                | (Self::Month, PickerType::Month)
                | (Self::Year, PickerType::Year)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Navigation {
    PrevMonth,
    NextMonth,
    PrevYear,
    NextYear,
    PrevDecade,
    NextDecade,
}

impl Navigation {
    /// Controls shown in the header of each panel.
    pub const fn for_panel(panel: PanelType) -> &'static [Self] {
        match panel {
            PanelType::Day => &[Self::PrevYear, Self::PrevMonth, Self::NextMonth, Self::NextYear],
            PanelType::Month => &[Self::PrevYear, Self::NextYear],
            PanelType::Year => &[Self::PrevDecade, Self::NextDecade],
        }
    }

    pub fn apply(self, anchor: CalendarDate) -> CalendarDate {
        match self {
            Self::PrevMonth => shift_month(anchor, -1),
            Self::NextMonth => shift_month(anchor, 1),
            Self::PrevYear => shift_year(anchor, -1),
            Self::NextYear => shift_year(anchor, 1),
            Self::PrevDecade => shift_year(anchor, -DECADE),
            Self::NextDecade => shift_year(anchor, DECADE),
        }
    }
}

/// Settings that shape how a pick moves the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickRules {
    pub picker_type:    PickerType,
    /// Emit a derived value when drilling down from year or month to a finer panel
    pub partial_update: bool,
}

/// A date the panel wants committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission {
    pub date:    CalendarDate,
    pub tag:     SelectionTag,
    /// Produced by a partial update rather than picked directly
    pub derived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state:    PanelState,
    pub emission: Option<Emission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelState {
    panel:  PanelType,
    anchor: CalendarDate,
}

impl PanelState {
    /// Starts on the coarser of the picker type's panel and `default_panel`.
    pub fn new(picker_type: PickerType, default_panel: Option<PanelType>, anchor: CalendarDate) -> Self {
        let panel = default_panel.map_or(picker_type.panel(), |p| p.max(picker_type.panel()));
        Self {
            panel,
            anchor: start_of_month(anchor),
        }
    }

    /// The month to show first: an explicit calendar date, else the newest
    /// committed value, else the default value, else today.
    pub fn initial_anchor(
        explicit: Option<CalendarDate>,
        value: &ValueSet,
        default_value: Option<CalendarDate>,
        today: CalendarDate,
    ) -> CalendarDate {
        let anchor = explicit
            .or_else(|| value.last())
            .or(default_value)
            .unwrap_or(today);
        start_of_month(anchor)
    }

    #[inline]
    pub const fn panel(&self) -> PanelType {
        self.panel
    }

    /// Always the first of a month at midnight
    #[inline]
    pub const fn anchor(&self) -> CalendarDate {
        self.anchor
    }

    #[must_use]
    pub fn navigate(self, navigation: Navigation) -> Self {
        self.with_anchor(navigation.apply(self.anchor))
    }

    #[must_use]
    pub fn with_anchor(self, anchor: CalendarDate) -> Self {
        Self {
            anchor: start_of_month(anchor),
            ..self
        }
    }

    /// Jumps straight to `panel`, keeping the anchor.
    #[must_use]
    pub const fn show_panel(self, panel: PanelType) -> Self {
        Self { panel, ..self }
    }

    /// Handles a click on a cell of the current panel.
    ///
    /// On the year and month panels a pick drills down one level unless the
    /// picker commits at that level. With `partial_update` and exactly one
    /// committed value, the drill-down also emits that value moved to the
    /// picked year or month.
    pub fn pick(self, date: CalendarDate, rules: &PickRules, value: &ValueSet) -> Transition {
        match self.panel {
            PanelType::Year => {
                let year = start_of_year(date);
                if rules.picker_type == PickerType::Year {
                    return self.emit(year, SelectionTag::Year, false);
                }
                let state = Self {
                    panel:  PanelType::Month,
                    anchor: year,
                };
                let emission = partial(rules, value)
                    .map(|v| Emission {
                        date:    with_year(v, year.year()),
                        tag:     SelectionTag::Year,
                        derived: true,
                    });
                Transition { state, emission }
            },
            PanelType::Month => {
                let month = start_of_month(date);
                if rules.picker_type == PickerType::Month {
                    return self.emit(month, SelectionTag::Month, false);
                }
                let state = Self {
                    panel:  PanelType::Day,
                    anchor: month,
                };
                let emission = partial(rules, value)
                    .map(|v| Emission {
                        date:    with_month(with_year(v, month.year()), month.month_typed()),
                        tag:     SelectionTag::Month,
                        derived: true,
                    });
                Transition { state, emission }
            },
            PanelType::Day => self.emit(date, SelectionTag::for_day(rules.picker_type), false),
        }
    }

    const fn emit(self, date: CalendarDate, tag: SelectionTag, derived: bool) -> Transition {
        Transition {
            state:    self,
            emission: Some(Emission { date, tag, derived }),
        }
    }
}

fn partial(rules: &PickRules, value: &ValueSet) -> Option<CalendarDate> {
    if rules.partial_update { value.sole() } else { None }
}
