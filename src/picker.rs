//! The popup picker: panel state, staged value and text box in one place.
//!
//! Every operation returns the events it produced, in order. The host applies
//! `Change` to its own state and pushes the result back with
//! [`Picker::set_value`].

use crate::codec::{InputField, TextCodec};
use crate::consts::DEFAULT_FORMAT;
use crate::format::{ChronoFormatter, DateFormatter};
use crate::grid::{Grid, GridContext, YearWindow, build_grid};
use crate::locale::{Locale, LocaleRegistry};
use crate::math::assign_time;
use crate::panel::{Navigation, PanelState, PanelType, PickRules, PickerType, SelectionTag};
use crate::selection::{self, PickError, Resolution};
use crate::value::{PickerValue, SelectionMode, ValueSet, ValueType};
use crate::{CalendarDate, DateFilter, ParseError};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerOptions {
    pub picker_type:      PickerType,
    pub mode:             SelectionMode,
    /// Display and typing pattern
    pub format:           String,
    /// Overrides the mode's default separator
    pub separator:        Option<String>,
    pub value_type:       ValueType,
    /// Stage picks until [`Picker::confirm`]
    pub confirm:          bool,
    pub partial_update:   bool,
    pub default_panel:    Option<PanelType>,
    pub default_value:    Option<CalendarDate>,
    /// Month to open on, ahead of the value
    pub calendar:         Option<CalendarDate>,
    pub editable:         bool,
    pub clearable:        bool,
    pub disabled:         bool,
    pub show_week_number: Option<bool>,
    /// Name in the built-in locale registry
    pub locale:           Option<String>,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            picker_type:      PickerType::default(),
            mode:             SelectionMode::default(),
            format:           DEFAULT_FORMAT.to_owned(),
            separator:        None,
            value_type:       ValueType::default(),
            confirm:          false,
            partial_update:   false,
            default_panel:    None,
            default_value:    None,
            calendar:         None,
            editable:         true,
            clearable:        true,
            disabled:         false,
            show_week_number: None,
            locale:           None,
        }
    }
}

/// A preset value offered next to the calendar.
pub struct Shortcut {
    pub text: String,
    on_click: Box<dyn Fn() -> Option<ValueSet>>,
}

impl Shortcut {
    pub fn new(text: impl Into<String>, on_click: impl Fn() -> Option<ValueSet> + 'static) -> Self {
        Self {
            text:     text.into(),
            on_click: Box::new(on_click),
        }
    }
}

impl fmt::Debug for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shortcut").field("text", &self.text).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    Open,
    Close,
    /// A value to commit; `tag` is `None` for confirm, clear, shortcuts and typed text
    Change {
        value: ValueSet,
        tag:   Option<SelectionTag>,
    },
    Confirm(ValueSet),
    /// A cell produced this date
    Pick(CalendarDate),
    /// One end of a range was chosen
    RangeEndpoint(CalendarDate),
    PanelChange {
        panel:    PanelType,
        previous: PanelType,
    },
    CalendarChange(CalendarDate),
    /// Typed text that did not parse
    InputError(String),
    Clear,
}

fn allow_all(_: &CalendarDate) -> bool {
    false
}

pub struct Picker {
    options:       PickerOptions,
    locale:        Locale,
    formatter:     Box<dyn DateFormatter>,
    disabled_date: Box<DateFilter<'static>>,
    disabled_time: Box<DateFilter<'static>>,
    year_window:   Option<Box<YearWindow>>,
    shortcuts:     Vec<Shortcut>,
    value:         ValueSet,
    staged:        ValueSet,
    panel:         PanelState,
    open:          bool,
    input:         InputField,
}

impl fmt::Debug for Picker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picker")
            .field("options", &self.options)
            .field("value", &self.value)
            .field("staged", &self.staged)
            .field("panel", &self.panel)
            .field("open", &self.open)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

impl Picker {
    pub fn new(options: PickerOptions) -> Self {
        let locale = LocaleRegistry::builtin().get(options.locale.as_deref()).clone();
        let anchor = PanelState::initial_anchor(
            options.calendar,
            &ValueSet::Empty,
            options.default_value,
            CalendarDate::today(),
        );
        let panel = PanelState::new(options.picker_type, options.default_panel, anchor);
        Self {
            options,
            locale,
            formatter: Box::new(ChronoFormatter),
            disabled_date: Box::new(allow_all),
            disabled_time: Box::new(allow_all),
            year_window: None,
            shortcuts: Vec::new(),
            value: ValueSet::Empty,
            staged: ValueSet::Empty,
            panel,
            open: false,
            input: InputField::default(),
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: impl DateFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    #[must_use]
    pub fn with_disabled_date(mut self, disabled: impl Fn(&CalendarDate) -> bool + 'static) -> Self {
        self.disabled_date = Box::new(disabled);
        self
    }

    #[must_use]
    pub fn with_disabled_time(mut self, disabled: impl Fn(&CalendarDate) -> bool + 'static) -> Self {
        self.disabled_time = Box::new(disabled);
        self
    }

    #[must_use]
    pub fn with_year_window(mut self, year_window: impl Fn(&CalendarDate) -> Vec<Vec<i32>> + 'static) -> Self {
        self.year_window = Some(Box::new(year_window));
        self
    }

    #[must_use]
    pub fn with_shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcuts.push(shortcut);
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: ValueSet) -> Self {
        self.set_value(value);
        self
    }

    pub const fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The committed value, as last pushed by the host
    pub const fn value(&self) -> &ValueSet {
        &self.value
    }

    /// The value the open popup is working on
    pub const fn staged(&self) -> &ValueSet {
        &self.staged
    }

    pub const fn panel_state(&self) -> PanelState {
        self.panel
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub fn shortcuts(&self) -> impl Iterator<Item = &str> {
        self.shortcuts.iter().map(|s| s.text.as_str())
    }

    pub fn is_disabled(&self, date: &CalendarDate) -> bool {
        (self.disabled_date)(date) || (self.disabled_time)(date)
    }

    pub fn codec(&self) -> TextCodec {
        let codec = TextCodec::new(self.options.mode, self.options.format.as_str());
        match &self.options.separator {
            Some(separator) => codec.with_separator(separator.as_str()),
            None => codec,
        }
    }

    /// Host representation of `value`, per the configured value type.
    pub fn encode(&self, value: &ValueSet) -> Vec<PickerValue> {
        self.options
            .value_type
            .encode_set(value, self.formatter.as_ref(), &self.options.format)
    }

    /// Commits host values; ones that do not decode are dropped.
    pub fn set_host_value(&mut self, values: &[PickerValue]) {
        let value = self.options.value_type.decode_set(
            self.options.mode,
            values,
            self.formatter.as_ref(),
            &self.options.format,
        );
        self.set_value(value);
    }

    /// Pushes the committed value. An open popup restages it.
    pub fn set_value(&mut self, value: ValueSet) {
        if self.open {
            self.staged = value.clone();
        }
        self.value = value;
        if !self.input.is_focused() {
            self.input.cancel();
        }
    }

    pub fn open(&mut self) -> Vec<PickerEvent> {
        if self.options.disabled || self.open {
            return Vec::new();
        }
        self.open = true;
        self.staged = self.value.clone();
        let anchor = PanelState::initial_anchor(
            self.options.calendar,
            &self.staged,
            self.options.default_value,
            CalendarDate::today(),
        );
        self.panel = PanelState::new(self.options.picker_type, self.options.default_panel, anchor);
        tracing::debug!(panel = %self.panel.panel(), anchor = %self.panel.anchor(), "picker opened");
        vec![PickerEvent::Open]
    }

    pub fn close(&mut self) -> Vec<PickerEvent> {
        if !self.open {
            return Vec::new();
        }
        self.open = false;
        tracing::debug!("picker closed");
        vec![PickerEvent::Close]
    }

    /// The current panel's grid, with today's date from the local clock.
    pub fn grid(&self) -> Grid {
        self.grid_at(CalendarDate::today())
    }

    pub fn grid_at(&self, today: CalendarDate) -> Grid {
        let disabled = |date: &CalendarDate| self.is_disabled(date);
        let mut ctx = GridContext::new(self.options.picker_type, self.panel.anchor(), &self.staged)
            .with_today(today)
            .with_locale(&self.locale)
            .with_formatter(self.formatter.as_ref())
            .with_disabled(&disabled);
        if let Some(year_window) = &self.year_window {
            ctx = ctx.with_year_window(year_window.as_ref());
        }
        if let Some(show) = self.options.show_week_number {
            ctx = ctx.with_show_week_number(show);
        }
        build_grid(self.panel.panel(), &ctx)
    }

    pub fn navigate(&mut self, navigation: Navigation) -> Vec<PickerEvent> {
        self.apply_state(self.panel.navigate(navigation))
    }

    pub fn show_panel(&mut self, panel: PanelType) -> Vec<PickerEvent> {
        self.apply_state(self.panel.show_panel(panel))
    }

    /// Clicks a cell of the current panel.
    ///
    /// # Errors
    /// Returns `PickError::DisabledSelectionRejected` for a vetoed date; the
    /// picker is left untouched.
    pub fn pick(&mut self, date: CalendarDate) -> Result<Vec<PickerEvent>, PickError> {
        let candidate = match (self.options.picker_type, self.panel.panel(), self.staged.sole()) {
            (PickerType::DateTime, PanelType::Day, Some(current)) => assign_time(date, current),
            _ => date,
        };
        let rules = PickRules {
            picker_type:    self.options.picker_type,
            partial_update: self.options.partial_update,
        };
        let result = {
            let disabled = |d: &CalendarDate| self.is_disabled(d);
            selection::pick(self.panel, candidate, &rules, &self.staged, self.options.mode, &disabled)
        };
        let result = result.inspect_err(|err| tracing::debug!(%date, %err, "pick rejected"))?;

        let mut events = self.apply_state(result.state);
        if let (Some(emission), Some(resolution)) = (result.emission, result.resolution) {
            events.push(PickerEvent::Pick(emission.date));
            match resolution {
                Resolution::Value(value) => events.extend(self.select(value, emission.tag)),
                Resolution::RangeEndpoint(endpoint) => events.push(PickerEvent::RangeEndpoint(endpoint)),
            }
        }
        Ok(events)
    }

    /// Commits both ends of a range chosen through [`PickerEvent::RangeEndpoint`].
    ///
    /// # Errors
    /// Returns `PickError::Range` for reversed ends and
    /// `PickError::DisabledSelectionRejected` for a vetoed end.
    pub fn commit_range(&mut self, start: CalendarDate, end: CalendarDate) -> Result<Vec<PickerEvent>, PickError> {
        let value = {
            let disabled = |d: &CalendarDate| self.is_disabled(d);
            selection::commit_range(start, end, &disabled)
        };
        let value = value.inspect_err(|err| tracing::debug!(%start, %end, %err, "range rejected"))?;
        Ok(self.select(value, SelectionTag::for_day(self.options.picker_type)))
    }

    /// Sets the time of day on the staged date of a single date-time picker.
    ///
    /// # Errors
    /// Returns `PickError::TimeUnavailable` for any other picker type or
    /// mode, `PickError::Parse` for an impossible time and
    /// `PickError::DisabledSelectionRejected` for a vetoed one.
    pub fn set_time(&mut self, hour: u32, minute: u32, second: u32) -> Result<Vec<PickerEvent>, PickError> {
        let (picker_type, mode) = (self.options.picker_type, self.options.mode);
        if picker_type != PickerType::DateTime || mode != SelectionMode::Single {
            tracing::debug!(%picker_type, ?mode, "time of day not selectable");
            return Err(PickError::TimeUnavailable { picker_type, mode });
        }
        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| ParseError::InvalidTime(format!("{hour:02}:{minute:02}:{second:02}")))?;
        let base = self
            .staged
            .sole()
            .or(self.options.default_value)
            .unwrap_or_else(CalendarDate::today);
        let date = CalendarDate::from(base.date().and_time(time));
        if self.is_disabled(&date) {
            tracing::debug!(%date, "time rejected");
            return Err(PickError::DisabledSelectionRejected(date));
        }
        Ok(self.select(ValueSet::Single(date), SelectionTag::Time))
    }

    /// Emits the staged value and closes.
    pub fn confirm(&mut self) -> Vec<PickerEvent> {
        let value = self.staged.clone();
        let mut events = self.emit(value.clone(), None, true);
        events.push(PickerEvent::Confirm(value));
        events
    }

    /// Emits the value produced by the shortcut at `index`, if any.
    pub fn apply_shortcut(&mut self, index: usize) -> Vec<PickerEvent> {
        let Some(shortcut) = self.shortcuts.get(index) else {
            return Vec::new();
        };
        let Some(value) = (shortcut.on_click)() else {
            return Vec::new();
        };
        tracing::debug!(text = %shortcut.text, "shortcut applied");
        self.emit(value, None, true)
    }

    /// The clear button; a no-op unless the picker is clearable.
    pub fn clear(&mut self) -> Vec<PickerEvent> {
        if !self.options.clearable {
            return Vec::new();
        }
        self.clear_value()
    }

    fn clear_value(&mut self) -> Vec<PickerEvent> {
        let mut events = self.emit(ValueSet::Empty, None, true);
        events.push(PickerEvent::Clear);
        events
    }

    /// What the text box shows.
    pub fn input_text(&self) -> String {
        let disabled = |d: &CalendarDate| self.is_disabled(d);
        self.input
            .text(&self.value, &self.codec(), self.formatter.as_ref(), &disabled)
    }

    pub fn focus_input(&mut self) -> Vec<PickerEvent> {
        self.input.focus();
        self.open()
    }

    pub fn type_text(&mut self, text: impl Into<String>) {
        self.input.edit(text);
    }

    /// Parses the typed text. Blank text clears; text that does not parse is
    /// kept in the box and reported with `InputError`.
    pub fn commit_text(&mut self) -> Vec<PickerEvent> {
        if !self.options.editable {
            return Vec::new();
        }
        let Some(text) = self.input.take() else {
            return Vec::new();
        };
        if text.trim().is_empty() {
            return self.clear_value();
        }

        let parsed = {
            let disabled = |d: &CalendarDate| self.is_disabled(d);
            self.codec().parse(&text, self.formatter.as_ref(), &disabled)
        };
        match parsed {
            Ok(value) => self.emit(value, None, true),
            Err(err) => {
                tracing::warn!(%err, text = %text, "typed date rejected");
                self.input.edit(text.clone());
                vec![PickerEvent::InputError(text)]
            },
        }
    }

    pub fn blur_input(&mut self) -> Vec<PickerEvent> {
        self.input.blur();
        self.close()
    }

    fn apply_state(&mut self, next: PanelState) -> Vec<PickerEvent> {
        let previous = std::mem::replace(&mut self.panel, next);
        let mut events = Vec::new();
        if previous.anchor() != next.anchor() {
            events.push(PickerEvent::CalendarChange(next.anchor()));
        }
        if previous.panel() != next.panel() {
            events.push(PickerEvent::PanelChange {
                panel:    next.panel(),
                previous: previous.panel(),
            });
        }
        events
    }

    /// A resolved pick: staged under confirm, otherwise emitted.
    fn select(&mut self, value: ValueSet, tag: SelectionTag) -> Vec<PickerEvent> {
        if self.options.confirm {
            self.staged = value;
            return Vec::new();
        }
        let close = self.options.mode != SelectionMode::Multiple && tag.completes(self.options.picker_type);
        self.emit(value, Some(tag), close)
    }

    fn emit(&mut self, value: ValueSet, tag: Option<SelectionTag>, close: bool) -> Vec<PickerEvent> {
        tracing::debug!(?value, ?tag, "value changed");
        self.staged = value.clone();
        let mut events = vec![PickerEvent::Change { value, tag }];
        if close {
            events.extend(self.close());
        }
        events
    }
}
