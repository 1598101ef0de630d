// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The creation guide: the transient preview of an entry being created.
//!
//! The controller owns its guide exclusively. It tells the guide when to drop its
//! preview and when to go away, and forwards every creation event to it before
//! subscribers see it. What the guide draws is its own business.

use crate::events::CreationEvent;

/// Contract of the visual creation guide for columns of type `C`.
pub trait CreationGuide<C> {
    /// Removes any rendered preview.
    fn clear_guide_element(&mut self);

    /// Releases the guide. Called exactly once, from the controller's teardown.
    fn destroy(&mut self);

    /// Observes a creation event before it is published.
    fn on_creation_event(&mut self, _event: &CreationEvent<C>) {}
}

/// A guide that renders nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoGuide;

impl<C> CreationGuide<C> for NoGuide {
    fn clear_guide_element(&mut self) {}

    fn destroy(&mut self) {}
}
