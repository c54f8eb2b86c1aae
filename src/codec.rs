//! Text form of a committed value, and the editable field that shows it.

use crate::consts::{LIST_SEPARATOR, RANGE_SEPARATOR};
use crate::format::DateFormatter;
use crate::prelude::*;
use crate::range::RangeError;
use crate::value::{SelectionMode, ValueSet};
use crate::{CalendarDate, DateFilter};
use serde::{Deserialize, Serialize};

/// How many dates a piece of text must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Arity {
    #[display(fmt = "exactly {_0}")]
    Exactly(usize),
    #[display(fmt = "at least {_0}")]
    AtLeast(usize),
}

impl Arity {
    pub const fn of(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Exactly(1),
            SelectionMode::Range => Self::Exactly(2),
            SelectionMode::Multiple => Self::AtLeast(1),
        }
    }

    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Invalid date input: {0:?}")]
    InvalidDateInput(String),

    #[error("Expected {expected} dates, found {found}")]
    ArityMismatch { expected: Arity, found: usize },

    #[error("{0} is disabled and cannot be selected")]
    DisabledSelectionRejected(CalendarDate),

    #[error(transparent)]
    Range(#[from] RangeError),
}

/// Formats a [`ValueSet`] as one line of text and parses it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCodec {
    mode:      SelectionMode,
    pattern:   String,
    separator: String,
}

impl TextCodec {
    /// Uses `" ~ "` between range ends and `","` between multiple dates.
    pub fn new(mode: SelectionMode, pattern: impl Into<String>) -> Self {
        let separator = match mode {
            SelectionMode::Range => RANGE_SEPARATOR,
            SelectionMode::Single | SelectionMode::Multiple => LIST_SEPARATOR,
        };
        Self {
            mode,
            pattern: pattern.into(),
            separator: separator.to_owned(),
        }
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn serialize(&self, value: &ValueSet, formatter: &dyn DateFormatter) -> String {
        value
            .to_vec()
            .iter()
            .map(|date| formatter.format(date, &self.pattern))
            .collect::<Vec<_>>()
            .join(self.separator.as_str())
    }

    /// Parses typed text. Blank text clears the value.
    ///
    /// Range and multiple text is split on the separator, then on the
    /// separator with surrounding whitespace removed. A range that still does
    /// not split into two is bisected at the first punctuation mark where both
    /// halves parse, so `2019-10-09-2020-01-02` reads as two dates.
    ///
    /// # Errors
    /// Fails as a whole when any piece does not parse, the piece count is
    /// wrong, range ends are out of order, or any date is vetoed.
    pub fn parse(
        &self,
        text: &str,
        formatter: &dyn DateFormatter,
        disabled: &DateFilter<'_>,
    ) -> Result<ValueSet, InputError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(ValueSet::Empty);
        }

        let dates = match self.mode {
            SelectionMode::Single => vec![self.parse_piece(text, formatter)?],
            SelectionMode::Range | SelectionMode::Multiple => self.parse_pieces(text, formatter)?,
        };
        let value = ValueSet::from_dates(self.mode, dates)?;
        if let Some(vetoed) = value.to_vec().into_iter().find(|d| disabled(d)) {
            return Err(InputError::DisabledSelectionRejected(vetoed));
        }
        Ok(value)
    }

    fn parse_piece(&self, piece: &str, formatter: &dyn DateFormatter) -> Result<CalendarDate, InputError> {
        let piece = piece.trim();
        formatter
            .parse(piece, &self.pattern)
            .ok_or_else(|| InputError::InvalidDateInput(piece.to_owned()))
    }

    fn parse_pieces(&self, text: &str, formatter: &dyn DateFormatter) -> Result<Vec<CalendarDate>, InputError> {
        let arity = Arity::of(self.mode);
        let mut pieces: Vec<&str> = text.split(self.separator.as_str()).collect();

        let trimmed = self.separator.trim();
        if !arity.accepts(pieces.len()) && !trimmed.is_empty() && trimmed != self.separator {
            pieces = text.split(trimmed).collect();
        }
        if arity.accepts(pieces.len()) {
            return pieces
                .iter()
                .map(|piece| self.parse_piece(piece, formatter))
                .collect();
        }

        let bisected = match self.mode {
            SelectionMode::Range => self.bisect(text, formatter),
            SelectionMode::Single | SelectionMode::Multiple => None,
        };
        bisected.ok_or(InputError::ArityMismatch {
            expected: arity,
            found:    pieces.len(),
        })
    }

    fn bisect(&self, text: &str, formatter: &dyn DateFormatter) -> Option<Vec<CalendarDate>> {
        text.char_indices()
            .filter(|(_, c)| c.is_ascii_punctuation() || c.is_whitespace())
            .find_map(|(i, c)| {
                let (start, end) = (text[..i].trim(), text[i + c.len_utf8()..].trim());
                if start.is_empty() || end.is_empty() {
                    return None;
                }
                let start = formatter.parse(start, &self.pattern)?;
                let end = formatter.parse(end, &self.pattern)?;
                Some(vec![start, end])
            })
    }
}

/// The text box bound to a picker.
///
/// While the user is typing the field shows their text; otherwise it shows
/// the committed value, or nothing when that value is not valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    user_input: Option<String>,
    focused:    bool,
}

impl InputField {
    pub fn text(
        &self,
        committed: &ValueSet,
        codec: &TextCodec,
        formatter: &dyn DateFormatter,
        disabled: &DateFilter<'_>,
    ) -> String {
        if let Some(input) = &self.user_input {
            return input.clone();
        }
        if committed.is_valid(codec.mode(), disabled) {
            codec.serialize(committed, formatter)
        } else {
            String::new()
        }
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.user_input = Some(text.into());
    }

    /// Takes the pending edit for committing.
    pub fn take(&mut self) -> Option<String> {
        self.user_input.take()
    }

    /// Drops the pending edit so the committed value shows again.
    pub fn cancel(&mut self) {
        self.user_input = None;
    }

    pub const fn is_editing(&self) -> bool {
        self.user_input.is_some()
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }
}
