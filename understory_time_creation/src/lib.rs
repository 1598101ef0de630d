// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Time Creation: create timed entries by clicking or dragging over a time grid.
//!
//! ## Overview
//!
//! A vertical time grid receives one stream of pointer signals for three different
//! intents: hovering (nothing happens), clicking a slot (create an entry there) and
//! press-drag-release (create an entry spanning the dragged range). Every drag begins
//! with the same signals as a click, so a click is only *confirmed* after a short delay
//! during which a drag signal can withdraw it. [`TimeCreation`](controller::TimeCreation)
//! runs that state machine and publishes [`CreationEvent`](events::CreationEvent)s.
//!
//! The crate draws nothing, computes no layout and persists nothing. It talks to its
//! surroundings through small seams:
//!
//! - [`DragSource`](gesture::DragSource): the upstream gesture detector's signals.
//! - [`TimeGrid`](target::TimeGrid) / [`TimeColumn`](time_core::TimeColumn): the column
//!   registry and each column's geometry.
//! - [`CreationGuide`](guide::CreationGuide): the transient preview, owned by the controller.
//! - [`Scheduler`](scheduler::Scheduler): the timer facility, for example
//!   [`LocalScheduler`](scheduler::LocalScheduler) driven by the host's event loop.
//! - [`TimeCreationConfig`](config::TimeCreationConfig): class-name scheme and delays.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use understory_event_state::emitter::ListenerOwner;
//! use understory_time_creation::config::TimeCreationConfig;
//! use understory_time_creation::controller::{Collaborators, TimeCreation};
//! use understory_time_creation::events::{CreationEvent, CreationEventKind};
//! use understory_time_creation::gesture::{DragSource, GestureKind, GesturePayload};
//! use understory_time_creation::guide::NoGuide;
//! use understory_time_creation::scheduler::LocalScheduler;
//! use understory_time_creation::target::{Element, TimeGrid};
//! use understory_time_creation::time_core::{PointerEvent, PointerEventKind, TimeColumn};
//!
//! #[derive(Clone)]
//! struct El(&'static str);
//!
//! impl Element for El {
//!     fn class_name(&self) -> &str { self.0 }
//!     fn parent(&self) -> Option<Self> { None }
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Day(u32);
//!
//! impl TimeColumn for Day {
//!     fn bounds(&self) -> Rect { Rect::new(0.0, 0.0, 100.0, 480.0) }
//!     fn date(&self) -> i64 { 0 }
//! }
//!
//! struct Week;
//!
//! impl TimeGrid for Week {
//!     type Element = El;
//!     type Column = Day;
//!     fn column(&self, id: &str) -> Option<Day> { id.parse().ok().map(Day) }
//! }
//!
//! let drag_source = Rc::new(DragSource::new());
//! let scheduler = Rc::new(LocalScheduler::new());
//! let creation = TimeCreation::new(
//!     Collaborators {
//!         drag_source: drag_source.clone(),
//!         grid: Rc::new(Week),
//!         data_controller: Rc::new(()),
//!         scheduler: scheduler.clone(),
//!     },
//!     NoGuide,
//!     TimeCreationConfig::default(),
//! )
//! .unwrap();
//!
//! let clicks = Rc::new(RefCell::new(Vec::new()));
//! let sink = clicks.clone();
//! creation.on(CreationEventKind::Click, ListenerOwner::next(), move |event: &CreationEvent<Day>| {
//!     sink.borrow_mut().push(event.schedule_data().unwrap().column.clone());
//! });
//!
//! let press = GesturePayload::new(
//!     El("time-date time-date-2"),
//!     PointerEvent::new(PointerEventKind::Down, Point::new(10.0, 200.0)),
//! );
//!
//! // A press followed by a drag start in the same turn is a drag, not a click.
//! drag_source.emit(GestureKind::MouseMove, &press);
//! drag_source.emit(GestureKind::DragStart, &press);
//! scheduler.run_pending();
//! assert!(clicks.borrow().is_empty());
//!
//! // A press left alone is confirmed on the next turn.
//! drag_source.emit(GestureKind::MouseMove, &press);
//! scheduler.run_pending();
//! assert_eq!(*clicks.borrow(), vec![Day(2)]);
//! ```
//!
//! ## Logging
//!
//! The controller logs through [`tracing`]: `trace` for ignored targets, withdrawn
//! clicks and stale timers, `debug` for lifecycle and published intents. Installing a
//! subscriber is up to the host.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod gesture;
pub mod guide;
pub mod scheduler;
pub mod target;
pub mod time_core;
