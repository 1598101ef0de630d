// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate resolution: map a pointer position inside a column to time values.
//!
//! A [`ScheduleResolver`] is captured once per gesture from the column under the
//! pointer. It snapshots the column geometry, so every signal of the same gesture is
//! resolved against the same layout even if the view reflows mid-drag.
//!
//! ## Mapping
//!
//! For a column covering the hours `hour_start..hour_end` of the day starting at
//! `date` (milliseconds), drawn in `bounds`:
//!
//! - `mouse_y` is the pointer offset from the top of the column.
//! - `grid_y` is that offset in hours from `hour_start`.
//! - `nearest_grid_y` is `grid_y` floored to the half-hour slot containing the pointer.
//! - `time_y` and `nearest_grid_time_y` are the corresponding absolute times.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_time_creation::time_core::{
//!     PointerEvent, PointerEventKind, ScheduleResolver, TimeColumn, MS_PER_HOUR,
//! };
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Day;
//!
//! impl TimeColumn for Day {
//!     fn bounds(&self) -> Rect { Rect::new(0.0, 100.0, 50.0, 580.0) }
//!     fn date(&self) -> i64 { 0 }
//! }
//!
//! let resolver = ScheduleResolver::new(Day);
//! // 20px per hour; 190px below the top is 9.5 hours.
//! let data = resolver.resolve(&PointerEvent::new(PointerEventKind::Move, Point::new(10.0, 290.0)));
//! assert_eq!(data.grid_y, 9.5);
//! assert_eq!(data.nearest_grid_time_y, 9 * MS_PER_HOUR + MS_PER_HOUR / 2);
//! ```

use kurbo::{Point, Rect};

/// Milliseconds per minute.
pub const MS_PER_MINUTE: i64 = 60_000;
/// Milliseconds per hour.
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
/// Milliseconds per day.
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// The low-level pointer event type that triggered a signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Pointer moved.
    Move,
    /// Button pressed.
    Down,
    /// Button released.
    Up,
    /// Click.
    Click,
    /// Double click.
    DoubleClick,
}

impl PointerEventKind {
    /// DOM event type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Move => "mousemove",
            Self::Down => "mousedown",
            Self::Up => "mouseup",
            Self::Click => "click",
            Self::DoubleClick => "dblclick",
        }
    }
}

/// The originating low-level pointer event of a gesture signal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Event type.
    pub kind: PointerEventKind,
    /// Pointer position, in the same space as [`TimeColumn::bounds`].
    pub position: Point,
}

impl PointerEvent {
    /// Creates a pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, position: Point) -> Self {
        Self { kind, position }
    }
}

/// One column of the time grid, as seen by coordinate resolution.
pub trait TimeColumn {
    /// Column container rectangle, in pointer coordinates.
    fn bounds(&self) -> Rect;

    /// Start of the column's day, in milliseconds.
    fn date(&self) -> i64;

    /// First visible hour.
    fn hour_start(&self) -> u32 {
        0
    }

    /// End of the visible hour range (exclusive).
    fn hour_end(&self) -> u32 {
        24
    }
}

/// Per-gesture coordinate resolver for one column.
#[derive(Clone, Debug)]
pub struct ScheduleResolver<C> {
    column: C,
    bounds: Rect,
    date: i64,
    hour_start: u32,
    hour_end: u32,
}

impl<C: TimeColumn + Clone> ScheduleResolver<C> {
    /// Captures the geometry of `column`.
    #[must_use]
    pub fn new(column: C) -> Self {
        Self {
            bounds: column.bounds(),
            date: column.date(),
            hour_start: column.hour_start(),
            hour_end: column.hour_end().max(column.hour_start()),
            column,
        }
    }

    /// The column this resolver was captured from.
    #[must_use]
    pub fn column(&self) -> &C {
        &self.column
    }

    /// Resolves the time values under `origin`.
    #[must_use]
    pub fn resolve(&self, origin: &PointerEvent) -> ScheduleData<C> {
        let mouse_y = origin.position.y - self.bounds.y0;
        let grid_y = self.grid_y(mouse_y);
        let nearest_grid_y = (grid_y * 2.0).floor() / 2.0;
        let hour_start = f64::from(self.hour_start);

        ScheduleData {
            column: self.column.clone(),
            origin: *origin,
            mouse_y,
            grid_y,
            time_y: self.date + hours_to_ms(hour_start + grid_y),
            nearest_grid_y,
            nearest_grid_time_y: self.date + hours_to_ms(hour_start + nearest_grid_y),
            trigger: origin.kind,
            create_range: None,
        }
    }

    fn grid_y(&self, mouse_y: f64) -> f64 {
        let height = self.bounds.height();
        if height <= 0.0 {
            return 0.0;
        }
        let hours = f64::from(self.hour_end - self.hour_start);
        mouse_y * hours / height
    }
}

/// Time values resolved for one pointer position: the payload of creation events.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleData<C> {
    /// The column under the pointer.
    pub column: C,
    /// The originating pointer event.
    pub origin: PointerEvent,
    /// Pointer offset from the top of the column, in pixels.
    pub mouse_y: f64,
    /// Pointer offset from the first visible hour, in hours.
    pub grid_y: f64,
    /// Absolute time under the pointer, in milliseconds.
    pub time_y: i64,
    /// [`grid_y`](Self::grid_y) floored to a half hour.
    pub nearest_grid_y: f64,
    /// Absolute time of the half-hour slot under the pointer, in milliseconds.
    pub nearest_grid_time_y: i64,
    /// Event type that produced this data.
    pub trigger: PointerEventKind,
    /// Range selected by a drag gesture, once it ended.
    pub create_range: Option<(i64, i64)>,
}

impl<C: TimeColumn + Clone> ScheduleData<C> {
    /// Builds the request to create an entry.
    ///
    /// Uses [`create_range`](Self::create_range) when present, otherwise the slot under
    /// the pointer extended by `duration_ms`. Both ends are clamped to the column's day.
    #[must_use]
    pub fn schedule_request(&self, duration_ms: i64) -> ScheduleRequest<C> {
        let (start, end) = self.create_range.unwrap_or((
            self.nearest_grid_time_y,
            self.nearest_grid_time_y + duration_ms,
        ));
        let day_start = self.column.date();
        let day_end = day_start + MS_PER_DAY;

        ScheduleRequest {
            column: self.column.clone(),
            start: start.clamp(day_start, day_end),
            end: end.clamp(day_start, day_end),
            is_all_day: false,
            trigger: self.trigger,
        }
    }
}

/// A request to create a timed entry, handed to the application layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleRequest<C> {
    /// Column the entry belongs to.
    pub column: C,
    /// Start time, in milliseconds.
    pub start: i64,
    /// End time, in milliseconds.
    pub end: i64,
    /// Always `false` for time-grid creation.
    pub is_all_day: bool,
    /// Event type that completed the gesture.
    pub trigger: PointerEventKind,
}

/// Converts fractional hours to whole milliseconds.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    reason = "hour offsets stay within a single day"
)]
pub fn hours_to_ms(hours: f64) -> i64 {
    (hours * MS_PER_HOUR as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Column {
        bounds: Rect,
        date: i64,
        hours: (u32, u32),
    }

    impl TimeColumn for Column {
        fn bounds(&self) -> Rect {
            self.bounds
        }
        fn date(&self) -> i64 {
            self.date
        }
        fn hour_start(&self) -> u32 {
            self.hours.0
        }
        fn hour_end(&self) -> u32 {
            self.hours.1
        }
    }

    const DAY: i64 = 20 * MS_PER_DAY;

    fn column(hours: (u32, u32), height: f64) -> Column {
        Column {
            bounds: Rect::new(0.0, 50.0, 100.0, 50.0 + height),
            date: DAY,
            hours,
        }
    }

    fn at(y: f64) -> PointerEvent {
        PointerEvent::new(PointerEventKind::Down, Point::new(10.0, y))
    }

    #[test]
    fn full_day_column_maps_pixels_to_hours() {
        let resolver = ScheduleResolver::new(column((0, 24), 480.0));
        let data = resolver.resolve(&at(50.0 + 250.0));

        assert_eq!(data.mouse_y, 250.0);
        assert_eq!(data.grid_y, 12.5);
        assert_eq!(data.time_y, DAY + 12 * MS_PER_HOUR + 30 * MS_PER_MINUTE);
        assert_eq!(data.nearest_grid_y, 12.5);
        assert_eq!(data.trigger, PointerEventKind::Down);
        assert_eq!(data.create_range, None);
    }

    #[test]
    fn nearest_grid_floors_to_half_hours() {
        let resolver = ScheduleResolver::new(column((0, 24), 480.0));
        // 20px per hour: 9.3h, 9.7h, 10.0h
        assert_eq!(resolver.resolve(&at(50.0 + 186.0)).nearest_grid_y, 9.0);
        assert_eq!(resolver.resolve(&at(50.0 + 194.0)).nearest_grid_y, 9.5);
        assert_eq!(resolver.resolve(&at(50.0 + 200.0)).nearest_grid_y, 10.0);
    }

    #[test]
    fn hour_start_offsets_absolute_times() {
        let resolver = ScheduleResolver::new(column((8, 20), 240.0));
        // 20px per hour, 30px is 1.5h after 08:00.
        let data = resolver.resolve(&at(80.0));

        assert_eq!(data.grid_y, 1.5);
        assert_eq!(data.nearest_grid_time_y, DAY + 9 * MS_PER_HOUR + 30 * MS_PER_MINUTE);
        assert_eq!(data.time_y, data.nearest_grid_time_y);
    }

    #[test]
    fn zero_height_column_resolves_to_first_hour() {
        let resolver = ScheduleResolver::new(column((6, 18), 0.0));
        let data = resolver.resolve(&at(500.0));
        assert_eq!(data.grid_y, 0.0);
        assert_eq!(data.nearest_grid_time_y, DAY + 6 * MS_PER_HOUR);
    }

    #[test]
    fn request_defaults_to_slot_plus_duration() {
        let resolver = ScheduleResolver::new(column((0, 24), 480.0));
        let request = resolver
            .resolve(&at(50.0 + 200.0))
            .schedule_request(30 * MS_PER_MINUTE);

        assert_eq!(request.start, DAY + 10 * MS_PER_HOUR);
        assert_eq!(request.end, DAY + 10 * MS_PER_HOUR + 30 * MS_PER_MINUTE);
        assert!(!request.is_all_day);
    }

    #[test]
    fn request_is_clamped_to_the_day() {
        let resolver = ScheduleResolver::new(column((0, 24), 480.0));
        let late = resolver
            .resolve(&at(50.0 + 479.0))
            .schedule_request(2 * MS_PER_HOUR);
        assert_eq!(late.end, DAY + MS_PER_DAY);

        let mut above = resolver.resolve(&at(0.0));
        above.create_range = Some((DAY - MS_PER_HOUR, DAY + MS_PER_HOUR));
        let request = above.schedule_request(0);
        assert_eq!(request.start, DAY);
        assert_eq!(request.end, DAY + MS_PER_HOUR);
    }

    #[test]
    fn hours_to_ms_rounds() {
        assert_eq!(hours_to_ms(0.5), 30 * MS_PER_MINUTE);
        assert_eq!(hours_to_ms(1.0 / 3.0), 20 * MS_PER_MINUTE);
    }
}
