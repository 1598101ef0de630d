// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Creation intents published by the controller.

use crate::time_core::{ScheduleData, ScheduleRequest};

/// Kinds of creation events, used to subscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CreationEventKind {
    /// A click was confirmed at a time slot.
    Click,
    /// A drag-to-create gesture started over a column.
    DragStart,
    /// The pointer moved during a drag-to-create gesture.
    Drag,
    /// A drag-to-create gesture was released.
    DragEnd,
    /// A new entry should be created.
    BeforeCreateSchedule,
}

impl CreationEventKind {
    /// Wire name of the event.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "timeCreationClick",
            Self::DragStart => "timeCreationDragstart",
            Self::Drag => "timeCreationDrag",
            Self::DragEnd => "timeCreationDragend",
            Self::BeforeCreateSchedule => "beforeCreateSchedule",
        }
    }
}

/// A creation event over columns of type `C`.
#[derive(Clone, Debug, PartialEq)]
pub enum CreationEvent<C> {
    /// `timeCreationClick`
    Click(ScheduleData<C>),
    /// `timeCreationDragstart`
    DragStart(ScheduleData<C>),
    /// `timeCreationDrag`
    Drag(ScheduleData<C>),
    /// `timeCreationDragend`; carries the dragged `create_range`.
    DragEnd(ScheduleData<C>),
    /// `beforeCreateSchedule`
    BeforeCreateSchedule(ScheduleRequest<C>),
}

impl<C> CreationEvent<C> {
    /// The kind of this event.
    #[must_use]
    pub const fn kind(&self) -> CreationEventKind {
        match self {
            Self::Click(_) => CreationEventKind::Click,
            Self::DragStart(_) => CreationEventKind::DragStart,
            Self::Drag(_) => CreationEventKind::Drag,
            Self::DragEnd(_) => CreationEventKind::DragEnd,
            Self::BeforeCreateSchedule(_) => CreationEventKind::BeforeCreateSchedule,
        }
    }

    /// The resolved pointer data, for every event but [`CreationEvent::BeforeCreateSchedule`].
    #[must_use]
    pub const fn schedule_data(&self) -> Option<&ScheduleData<C>> {
        match self {
            Self::Click(data) | Self::DragStart(data) | Self::Drag(data) | Self::DragEnd(data) => {
                Some(data)
            }
            Self::BeforeCreateSchedule(_) => None,
        }
    }

    /// The creation request of a [`CreationEvent::BeforeCreateSchedule`].
    #[must_use]
    pub const fn request(&self) -> Option<&ScheduleRequest<C>> {
        match self {
            Self::BeforeCreateSchedule(request) => Some(request),
            _ => None,
        }
    }
}
