// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: Common event state managers for UI interactions.
//!
//! This crate provides small, focused building blocks for UI interactions that
//! need state across multiple events:
//!
//! - [`emitter`]: Keyed publish/subscribe with owner-scoped unsubscription, safe to
//!   mutate from inside a handler
//! - [`click_confirm`]: Deferred click confirmation that a competing gesture (a drag)
//!   can cancel before the click is committed
//!
//! ## Design Philosophy
//!
//! Each piece is designed to be:
//!
//! - **Minimal and focused**: Each handles one specific interaction concern
//! - **Stateful but simple**: Track just enough state to compute transitions
//! - **Integration-friendly**: Work with any event routing, timer or scene system
//! - **Generic**: Accept application-specific event kinds, payloads and timer tokens
//!
//! The crate does not assume any particular UI framework or clock. The click
//! confirmation only remembers which timer token is outstanding; scheduling and
//! cancelling that timer is left to the host (for example with
//! `understory_timing`).
//!
//! ## Usage Patterns
//!
//! ### Publishing gesture signals
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_event_state::emitter::{Emitter, ListenerOwner};
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! enum Gesture { Move, DragStart }
//!
//! let source: Emitter<Gesture, f64> = Emitter::new();
//! let owner = ListenerOwner::next();
//! let seen = Rc::new(Cell::new(0.0));
//!
//! let sink = seen.clone();
//! source.on(Gesture::Move, owner, move |y: &f64| sink.set(*y));
//!
//! assert_eq!(source.emit(Gesture::Move, &42.0), 1);
//! assert_eq!(source.emit(Gesture::DragStart, &0.0), 0);
//! assert_eq!(seen.get(), 42.0);
//!
//! // `off(context)`: drop everything this owner registered.
//! assert_eq!(source.off_owner(owner), 1);
//! assert!(source.is_empty());
//! ```
//!
//! ### Click versus drag
//!
//! ```rust
//! use understory_event_state::click_confirm::ClickConfirmation;
//!
//! let mut click = ClickConfirmation::new();
//!
//! // Pointer went down over a slot: arm a click and remember the timer token.
//! assert_eq!(click.arm("slot 9:00", 1_u32), None);
//!
//! // A drag starts before the timer fires: the click is withdrawn.
//! assert_eq!(click.cancel(), Some(1));
//! assert_eq!(click.confirm(&1), None);
//!
//! // A quiet click confirms when its timer fires.
//! click.arm("slot 10:30", 2);
//! assert_eq!(click.confirm(&2), Some("slot 10:30"));
//! assert!(!click.is_armed());
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`) for all modules.

#![no_std]

extern crate alloc;

pub mod click_confirm;
pub mod emitter;
