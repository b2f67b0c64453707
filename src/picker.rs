//! The date picker state machine.
//!
//! The picker is either closed or open on a month view or a year view. The
//! externally supplied canonical value is authoritative: every change to it
//! goes through [`DatePicker::set_value`], which reconciles the internal
//! selection. Selecting a day emits a [`ChangeEvent`] carrying canonical text.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{
    CalendarDate, CellKind, Direction, MonthGrid, PickerConfig, Year, clamp_anchor, format,
    format_canonical, month_label, navigate_month, parse, today_label, weekday_labels, year_window,
};

/// Source of the current date.
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

/// The local system date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        CalendarDate::from_naive(chrono::Local::now().date_naive()).unwrap_or(CalendarDate::MIN)
    }
}

impl<F> Clock for F
where
    F: Fn() -> CalendarDate,
{
    fn today(&self) -> CalendarDate {
        self()
    }
}

/// A live pointer-down listener. Dropping it detaches the listener.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub const fn detached() -> Self {
        Self { release: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.release.is_some())
            .finish()
    }
}

/// Attaches the global pointer-down listener used to detect clicks outside the popup.
///
/// The host routes those clicks back as [`PickerEvent::OutsideInteraction`].
pub trait PointerHost {
    fn subscribe(&self) -> Subscription;
}

/// For hosts without outside-click detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPointerHost;

impl PointerHost for NoPointerHost {
    fn subscribe(&self) -> Subscription {
        Subscription::detached()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PickerMode {
    #[default]
    Closed,
    MonthView,
    YearView,
}

/// Snapshot of the picker for rendering and inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerState {
    pub is_open: bool,
    /// Year and month on screen; the day is not meaningful.
    pub displayed_month: CalendarDate,
    pub selected_date: Option<CalendarDate>,
    pub is_year_picker_active: bool,
}

/// Inputs to [`DatePicker::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    ToggleOpen,
    SelectYear,
    ChooseYear(u16),
    Navigate(Direction),
    SelectDate(CalendarDate),
    SelectToday,
    OutsideInteraction,
    ExternalValue(String),
}

/// Field-change envelope, `{ "target": { "value": ..., "name": ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub target: ChangeTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeTarget {
    /// Canonical `YYYY-MM-DD`, whatever the display format.
    pub value: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: CalendarDate,
    pub kind: CellKind,
    pub is_selected: bool,
    pub is_today: bool,
}

/// Everything needed to draw the month view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub header: String,
    pub weekdays: [String; 7],
    pub today_label: &'static str,
    pub cells: Vec<DayCell>,
}

/// A selection that was emitted but not yet echoed back by the owner of the value.
///
/// `stale` holds every value a selection in this run replaced: the external value
/// before the first pick and each earlier emitted value. None of them may win
/// until `emitted` is echoed.
#[derive(Debug, Clone)]
struct PendingSelection {
    emitted: String,
    stale: Vec<String>,
}

/// Popup date picker bound to an externally controlled canonical value.
pub struct DatePicker<C = SystemClock> {
    config: PickerConfig,
    clock: C,
    host: Box<dyn PointerHost>,
    mode: PickerMode,
    displayed_month: CalendarDate,
    selected: Option<CalendarDate>,
    external: String,
    pending: Option<PendingSelection>,
    listener: Option<Subscription>,
}

impl DatePicker<SystemClock> {
    /// A picker that reads today from the local system clock.
    pub fn new(config: PickerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> DatePicker<C> {
    /// Creates a closed picker showing the current month with nothing selected.
    pub fn with_clock(config: PickerConfig, clock: C) -> Self {
        let displayed_month = clamp_anchor(clock.today());
        Self {
            config,
            clock,
            host: Box::new(NoPointerHost),
            mode: PickerMode::Closed,
            displayed_month,
            selected: None,
            external: String::new(),
            pending: None,
            listener: None,
        }
    }

    /// Uses `host` to detect clicks outside the open popup.
    #[must_use]
    pub fn with_pointer_host(mut self, host: impl PointerHost + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Single dispatch entry point; returns a change notification when a date was picked.
    pub fn handle(&mut self, event: PickerEvent) -> Option<ChangeEvent> {
        match event {
            PickerEvent::ToggleOpen => self.toggle_open(),
            PickerEvent::SelectYear => self.select_year(),
            PickerEvent::ChooseYear(year) => self.choose_year(year),
            PickerEvent::Navigate(direction) => self.navigate(direction),
            PickerEvent::SelectDate(date) => return self.select_date(date),
            PickerEvent::SelectToday => return self.select_today(),
            PickerEvent::OutsideInteraction => self.close(),
            PickerEvent::ExternalValue(value) => self.set_value(&value),
        }
        None
    }

    /// Opens the month view on the current value, or closes an open picker.
    pub fn toggle_open(&mut self) {
        if self.is_open() {
            self.close();
            return;
        }

        let value = self.effective_value().to_owned();
        match parse(&value, self.config.date_format) {
            Some(date) => {
                self.selected = Some(date);
                self.displayed_month = clamp_anchor(date);
            }
            None => log::trace!("Opening on {} without a parsable value", self.displayed_month),
        }
        self.mode = PickerMode::MonthView;
        self.listener = Some(self.host.subscribe());
        log::debug!("Date picker opened on {}", self.displayed_month);
    }

    /// Switches the month view to the year view.
    pub fn select_year(&mut self) {
        if self.mode == PickerMode::MonthView {
            self.mode = PickerMode::YearView;
        }
    }

    /// Shows `year` in the month view, keeping the displayed month.
    ///
    /// Ignored outside the year view or for years outside 1..=9999.
    pub fn choose_year(&mut self, year: u16) {
        if self.mode != PickerMode::YearView {
            return;
        }
        match Year::new(year) {
            Ok(year) => {
                self.displayed_month = clamp_anchor(self.displayed_month.with_year(year));
                self.mode = PickerMode::MonthView;
            }
            Err(err) => log::debug!("Ignoring year choice: {err}"),
        }
    }

    /// Shows the previous or next month. Ignored outside the month view.
    pub fn navigate(&mut self, direction: Direction) {
        if self.mode == PickerMode::MonthView {
            self.displayed_month = navigate_month(self.displayed_month, direction);
        }
    }

    /// Picks `date` from the month view, closes the picker and returns the
    /// canonical change notification. Ignored unless the month view is open.
    pub fn select_date(&mut self, date: CalendarDate) -> Option<ChangeEvent> {
        if self.mode != PickerMode::MonthView {
            return None;
        }
        Some(self.commit(date))
    }

    /// Picks the current date from either open view.
    pub fn select_today(&mut self) -> Option<ChangeEvent> {
        if !self.is_open() {
            return None;
        }
        let today = self.clock.today();
        Some(self.commit(today))
    }

    /// Closes without emitting anything.
    pub fn close(&mut self) {
        if self.mode != PickerMode::Closed {
            log::debug!("Date picker closed");
        }
        self.mode = PickerMode::Closed;
        self.release_listener();
    }

    /// Reconciles the internal selection with the external value.
    ///
    /// Re-sending the current value is a no-op and keeps the displayed month.
    /// While a selection is pending, its echo confirms it and any value it
    /// replaced is a stale echo and is ignored. Anything else is authoritative.
    pub fn set_value(&mut self, value: &str) {
        if let Some(pending) = &self.pending {
            if value == pending.emitted {
                log::trace!("Selection '{value}' confirmed");
                value.clone_into(&mut self.external);
                self.pending = None;
                return;
            }
            if pending.stale.iter().any(|stale| stale == value) {
                log::debug!(
                    "Ignoring stale value '{value}' while '{}' is pending",
                    pending.emitted
                );
                return;
            }
            self.pending = None;
        } else if value == self.external {
            return;
        }

        value.clone_into(&mut self.external);
        if self.external.trim().is_empty() {
            self.selected = None;
            return;
        }

        match parse(&self.external, self.config.date_format) {
            Some(date) => {
                self.selected = Some(date);
                self.displayed_month = clamp_anchor(date);
            }
            None => {
                log::debug!("Unparsable date value '{}'", self.external);
                self.selected = None;
            }
        }
    }

    /// Returns which view, if any, is showing.
    pub const fn mode(&self) -> PickerMode {
        self.mode
    }

    /// Returns `true` while either view is showing.
    pub fn is_open(&self) -> bool {
        self.mode != PickerMode::Closed
    }

    /// Returns the options this picker was created with.
    pub const fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Returns the selected date, if any.
    pub const fn selected(&self) -> Option<CalendarDate> {
        self.selected
    }

    /// Returns the month on screen. Only its year and month are meaningful.
    pub const fn displayed_month(&self) -> CalendarDate {
        self.displayed_month
    }

    /// Returns a snapshot of the picker.
    pub fn state(&self) -> PickerState {
        PickerState {
            is_open: self.is_open(),
            displayed_month: self.displayed_month,
            selected_date: self.selected,
            is_year_picker_active: self.mode == PickerMode::YearView,
        }
    }

    /// Whether a pointer-down listener is currently attached.
    pub const fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Read-only field text: the selection in the configured display format, or empty.
    pub fn display_text(&self) -> String {
        self.selected
            .map(|d| format(&d, self.config.date_format))
            .unwrap_or_default()
    }

    /// Returns the selection as canonical `YYYY-MM-DD` text.
    pub fn canonical_value(&self) -> Option<String> {
        self.selected.as_ref().map(format_canonical)
    }

    /// Returns the "Today" label for the configured locale.
    pub fn today_label(&self) -> &'static str {
        today_label(&self.config.locale)
    }

    /// Builds the header, weekday labels and 42 day cells for the displayed month.
    pub fn month_view(&self) -> MonthView {
        let today = self.clock.today();
        let grid = MonthGrid::build(self.displayed_month);
        let cells = grid
            .iter()
            .map(|(date, kind)| DayCell {
                date,
                kind,
                is_selected: self.selected == Some(date),
                is_today: date == today,
            })
            .collect();
        MonthView {
            header: month_label(&self.config.locale, &self.displayed_month),
            weekdays: weekday_labels(&self.config.locale),
            today_label: self.today_label(),
            cells,
        }
    }

    /// Returns the years offered by the year view.
    pub fn year_options(&self) -> RangeInclusive<u16> {
        year_window(self.displayed_month.year_typed())
    }

    fn commit(&mut self, date: CalendarDate) -> ChangeEvent {
        let value = format_canonical(&date);
        let mut stale = match self.pending.take() {
            Some(PendingSelection { emitted, mut stale }) => {
                stale.push(emitted);
                stale
            }
            None => vec![self.external.clone()],
        };
        stale.retain(|earlier| *earlier != value);
        self.selected = Some(date);
        self.displayed_month = clamp_anchor(date);
        self.pending = Some(PendingSelection {
            emitted: value.clone(),
            stale,
        });
        self.close();
        log::debug!("Date selected: {value}");
        ChangeEvent {
            target: ChangeTarget {
                value,
                name: self.config.name.clone(),
            },
        }
    }

    /// The value the picker should open on: a pending selection wins over a stale external value.
    fn effective_value(&self) -> &str {
        self.pending
            .as_ref()
            .map_or(self.external.as_str(), |p| p.emitted.as_str())
    }

    fn release_listener(&mut self) {
        if self.listener.take().is_some() {
            log::trace!("Released outside-click listener");
        }
    }
}

impl<C> fmt::Debug for DatePicker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePicker")
            .field("config", &self.config)
            .field("mode", &self.mode)
            .field("displayed_month", &self.displayed_month)
            .field("selected", &self.selected)
            .field("external", &self.external)
            .field("pending", &self.pending)
            .field("listening", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}
