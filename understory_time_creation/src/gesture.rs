// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signals consumed from the drag-gesture source and the grid container.
//!
//! The gesture source normalizes raw pointer input into [`GestureKind`] signals and
//! publishes them on a [`DragSource`]. Producing those signals (press thresholds,
//! pointer capture, touch normalization) happens upstream of this crate.

use understory_event_state::emitter::Emitter;

use crate::time_core::PointerEvent;

/// Normalized signals published by the drag-gesture source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Pointer activity that does not (yet) belong to a drag.
    MouseMove,
    /// A drag gesture began.
    DragStart,
    /// The pointer moved while dragging.
    Drag,
    /// The drag gesture was released.
    DragEnd,
}

impl GestureKind {
    /// Wire name of the signal.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MouseMove => "mousemove",
            Self::DragStart => "dragStart",
            Self::Drag => "drag",
            Self::DragEnd => "dragEnd",
        }
    }
}

/// Payload of every gesture signal.
#[derive(Clone, Debug)]
pub struct GesturePayload<E> {
    /// Element under the pointer.
    pub target: E,
    /// The originating low-level pointer event.
    pub origin: PointerEvent,
}

impl<E> GesturePayload<E> {
    /// Creates a payload.
    #[must_use]
    pub const fn new(target: E, origin: PointerEvent) -> Self {
        Self { target, origin }
    }
}

/// The drag-gesture source contract: an emitter of gesture signals over elements `E`.
pub type DragSource<E> = Emitter<GestureKind, GesturePayload<E>>;

/// DOM-level events listened to directly on the grid container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerEventKind {
    /// `dblclick` on the container.
    DoubleClick,
}

/// Emitter for DOM-level events on the grid container.
pub type ContainerEvents<E> = Emitter<ContainerEventKind, GesturePayload<E>>;
