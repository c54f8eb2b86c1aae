//! Cell layouts for the day, month and year panels.
//!
//! Grids are rebuilt from scratch on every call from a [`GridContext`];
//! nothing here holds state between renders.

use crate::consts::{DAYS_IN_WEEK, DECADE, MONTH_GRID_COLUMNS, YEAR_GRID_ROWS};
use crate::format::{ChronoFormatter, DateFormatter};
use crate::locale::{Locale, default_locale};
use crate::math::{build_month_grid, start_of_day, start_of_year, week_number, with_month, with_year};
use crate::panel::{Navigation, PanelType, PickerType};
use crate::prelude::*;
use crate::types::Month;
use crate::value::ValueSet;
use crate::{CalendarDate, DateFilter};
use serde::Serialize;

/// Rows of years shown by the year panel for an anchor.
pub type YearWindow = dyn Fn(&CalendarDate) -> Vec<Vec<i32>>;

/// Extra host classes for a cell.
pub type CellClassFn = dyn Fn(&CalendarDate, &ValueSet) -> Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
pub enum CellTag {
    #[display(fmt = "today")]
    Today,
    /// Day cell outside the anchor month
    #[display(fmt = "not-current-month")]
    AdjacentMonth,
    #[display(fmt = "disabled")]
    Disabled,
    #[display(fmt = "active")]
    Active,
    /// The anchor's month or year, on a panel coarser than the picker type
    #[display(fmt = "current")]
    Current,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub date:   CalendarDate,
    pub label:  String,
    pub tags:   Vec<CellTag>,
    pub custom: Vec<String>,
}

impl GridCell {
    pub fn has(&self, tag: CellTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Built-in tags followed by host classes.
    pub fn class_names(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(ToString::to_string)
            .chain(self.custom.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub cells:       Vec<GridCell>,
    /// Week picker only: a committed value falls inside this row
    pub active:      bool,
    pub week_number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderLabel {
    pub text:   String,
    /// Panel to switch to when the label is clicked
    pub target: Option<PanelType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub panel:      PanelType,
    pub anchor:     CalendarDate,
    pub header:     Vec<HeaderLabel>,
    pub navigation: &'static [Navigation],
    /// Day panel only
    pub weekdays:   Vec<String>,
    pub rows:       Vec<GridRow>,
}

impl Grid {
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&GridCell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    pub fn find(&self, date: &CalendarDate) -> Option<&GridCell> {
        self.cells().find(|cell| cell.date == *date)
    }
}

/// The decade containing the anchor, as two rows of five years.
pub fn decade_window(anchor: &CalendarDate) -> Vec<Vec<i32>> {
    let first = anchor.year().div_euclid(DECADE) * DECADE;
    let years: Vec<i32> = (first..first + DECADE).collect();
    let per_row = years.len().div_ceil(YEAR_GRID_ROWS);
    years.chunks(per_row).map(<[i32]>::to_vec).collect()
}

fn never_disabled(_: &CalendarDate) -> bool {
    false
}

/// Everything a grid render reads.
pub struct GridContext<'a> {
    picker_type:      PickerType,
    anchor:           CalendarDate,
    value:            &'a ValueSet,
    today:            CalendarDate,
    locale:           &'a Locale,
    formatter:        &'a dyn DateFormatter,
    disabled:         &'a DateFilter<'a>,
    year_window:      &'a YearWindow,
    cell_classes:     Option<&'a CellClassFn>,
    show_week_number: Option<bool>,
}

impl<'a> GridContext<'a> {
    pub fn new(picker_type: PickerType, anchor: CalendarDate, value: &'a ValueSet) -> Self {
        Self {
            picker_type,
            anchor,
            value,
            today: CalendarDate::today(),
            locale: default_locale(),
            formatter: &ChronoFormatter,
            disabled: &never_disabled,
            year_window: &decade_window,
            cell_classes: None,
            show_week_number: None,
        }
    }

    #[must_use]
    pub fn with_today(mut self, today: CalendarDate) -> Self {
        self.today = start_of_day(today);
        self
    }

    #[must_use]
    pub const fn with_locale(mut self, locale: &'a Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: &'a dyn DateFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: &'a DateFilter<'a>) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn with_year_window(mut self, year_window: &'a YearWindow) -> Self {
        self.year_window = year_window;
        self
    }

    #[must_use]
    pub fn with_cell_classes(mut self, cell_classes: &'a CellClassFn) -> Self {
        self.cell_classes = Some(cell_classes);
        self
    }

    /// Defaults to on for week pickers only.
    #[must_use]
    pub const fn with_show_week_number(mut self, show: bool) -> Self {
        self.show_week_number = Some(show);
        self
    }

    fn cell(&self, value: &ValueSet, date: CalendarDate, label: String, mut tags: Vec<CellTag>) -> GridCell {
        let custom = self
            .cell_classes
            .map(|classes| classes(&date, value))
            .unwrap_or_default();
        tags.sort_unstable();
        GridCell {
            date,
            label,
            tags,
            custom,
        }
    }

    /// Disabled wins over active.
    fn selection_tag(&self, value: &ValueSet, date: &CalendarDate) -> Option<CellTag> {
        if (self.disabled)(date) {
            Some(CellTag::Disabled)
        } else if value.covers(date) {
            Some(CellTag::Active)
        } else {
            None
        }
    }
}

/// Builds the cells of `panel` for the context's anchor.
pub fn build_grid(panel: PanelType, ctx: &GridContext<'_>) -> Grid {
    let value = ctx.value.truncated(ctx.picker_type.panel());
    let (header, weekdays, rows) = match panel {
        PanelType::Day => (
            day_header(ctx),
            ctx.locale
                .weekday_headers()
                .into_iter()
                .map(str::to_owned)
                .collect::<Vec<_>>(),
            day_rows(ctx, &value),
        ),
        PanelType::Month => (month_header(ctx), Vec::new(), month_rows(ctx, &value)),
        PanelType::Year => {
            let years = (ctx.year_window)(&ctx.anchor);
            (year_header(&years), Vec::new(), year_rows(ctx, &value, &years))
        },
    };
    Grid {
        panel,
        anchor: ctx.anchor,
        header,
        navigation: Navigation::for_panel(panel),
        weekdays,
        rows,
    }
}

fn day_header(ctx: &GridContext<'_>) -> Vec<HeaderLabel> {
    let year = HeaderLabel {
        text:   ctx.formatter.format(&ctx.anchor, &ctx.locale.year_format),
        target: Some(PanelType::Year),
    };
    let month = HeaderLabel {
        text:   ctx.locale.month_name(ctx.anchor.month_typed()).to_owned(),
        target: Some(PanelType::Month),
    };
    if ctx.locale.month_before_year {
        vec![month, year]
    } else {
        vec![year, month]
    }
}

fn month_header(ctx: &GridContext<'_>) -> Vec<HeaderLabel> {
    vec![HeaderLabel {
        text:   ctx.anchor.year().to_string(),
        target: Some(PanelType::Year),
    }]
}

fn year_header(years: &[Vec<i32>]) -> Vec<HeaderLabel> {
    let first = years.first().and_then(|row| row.first());
    let last = years.last().and_then(|row| row.last());
    [first, last]
        .into_iter()
        .flatten()
        .map(|year| HeaderLabel {
            text:   year.to_string(),
            target: None,
        })
        .collect()
}

fn day_rows(ctx: &GridContext<'_>, value: &ValueSet) -> Vec<GridRow> {
    let anchor = ctx.anchor;
    let locale = ctx.locale;
    let week_picker = ctx.picker_type == PickerType::Week;
    let show_week_number = ctx.show_week_number.unwrap_or(week_picker);
    let dates = build_month_grid(anchor.year(), anchor.month_typed(), locale.first_day_of_week);
    let members = value.to_vec();

    dates
        .chunks(usize::from(DAYS_IN_WEEK))
        .map(|week| {
            let cells = week
                .iter()
                .map(|&date| {
                    let mut tags = Vec::new();
                    if date == ctx.today {
                        tags.push(CellTag::Today);
                    }
                    if date.month() != anchor.month() {
                        tags.push(CellTag::AdjacentMonth);
                    }
                    tags.extend(ctx.selection_tag(value, &date));
                    ctx.cell(value, date, date.day().to_string(), tags)
                })
                .collect();

            let (first, last) = (week.first(), week.last());
            let active = week_picker
                && matches!((first, last), (Some(first), Some(last))
                    if members.iter().any(|m| first <= m && m <= last));
            let number = show_week_number
                .then(|| first.map(|d| week_number(*d, locale.first_day_of_week, locale.first_week_contains_date)))
                .flatten();

            GridRow {
                cells,
                active,
                week_number: number,
            }
        })
        .collect()
}

fn month_rows(ctx: &GridContext<'_>, value: &ValueSet) -> Vec<GridRow> {
    let january = start_of_year(ctx.anchor);
    let selects_month = ctx.picker_type == PickerType::Month;

    let cells: Vec<GridCell> = (1..=12)
        .filter_map(|m| Month::new(m).ok())
        .map(|month| {
            let date = with_month(january, month);
            let tags = if selects_month {
                ctx.selection_tag(value, &date).into_iter().collect()
            } else if month == ctx.anchor.month_typed() {
                vec![CellTag::Current]
            } else {
                Vec::new()
            };
            ctx.cell(value, date, ctx.locale.month_name(month).to_owned(), tags)
        })
        .collect();
    into_rows(cells, MONTH_GRID_COLUMNS)
}

fn year_rows(ctx: &GridContext<'_>, value: &ValueSet, years: &[Vec<i32>]) -> Vec<GridRow> {
    let january = start_of_year(ctx.anchor);
    let selects_year = ctx.picker_type == PickerType::Year;

    years
        .iter()
        .map(|row| {
            let cells = row
                .iter()
                .map(|&year| {
                    let date = with_year(january, year);
                    let tags = if selects_year {
                        ctx.selection_tag(value, &date).into_iter().collect()
                    } else if year == ctx.anchor.year() {
                        vec![CellTag::Current]
                    } else {
                        Vec::new()
                    };
                    ctx.cell(value, date, year.to_string(), tags)
                })
                .collect();
            GridRow {
                cells,
                active: false,
                week_number: None,
            }
        })
        .collect()
}

fn into_rows(cells: Vec<GridCell>, columns: usize) -> Vec<GridRow> {
    cells
        .chunks(columns)
        .map(|chunk| GridRow {
            cells:       chunk.to_vec(),
            active:      false,
            week_number: None,
        })
        .collect()
}
