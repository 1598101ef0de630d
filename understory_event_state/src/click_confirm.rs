// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click confirmation: hold a candidate click until its timer fires, unless a drag withdraws it.
//!
//! A pointer press is ambiguous: it may be a click, or the first signal of a drag. Firing
//! the click immediately means a drag also produces a spurious click. Instead the click is
//! *armed* together with the token of a short timer, and only *confirmed* when that timer
//! fires. Any drag signal in between *cancels* it.
//!
//! ## Usage
//!
//! 1) On a candidate click, schedule a timer and call [`ClickConfirmation::arm`] with the
//!    click payload and the timer token. If a previous token is returned, cancel that timer.
//! 2) On a drag signal, call [`ClickConfirmation::cancel`] and cancel the returned timer.
//! 3) When a timer fires, call [`ClickConfirmation::confirm`] with its token and fire the
//!    click if a payload comes back.
//!
//! Stray tokens are harmless: a timer that was replaced or cancelled but still fired
//! confirms nothing and leaves the current state untouched.
//!
//! ## Minimal example
//!
//! ```
//! use understory_event_state::click_confirm::ClickConfirmation;
//!
//! let mut click = ClickConfirmation::new();
//! click.arm((3, 540), 10_u64);
//! assert!(click.is_armed());
//! assert_eq!(click.pending_token(), Some(&10));
//!
//! // Re-arming replaces the pending click; the old timer must be cancelled.
//! assert_eq!(click.arm((3, 570), 11), Some(10));
//!
//! // The old timer fires anyway: ignored.
//! assert_eq!(click.confirm(&10), None);
//! assert_eq!(click.confirm(&11), Some((3, 570)));
//! ```

/// Deferred click state: the armed flag, the pending payload and the outstanding timer token.
#[derive(Clone, Debug)]
pub struct ClickConfirmation<P, T> {
    pending: Option<(P, T)>,
}

impl<P, T: PartialEq> ClickConfirmation<P, T> {
    /// Creates a disarmed state.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Arms a click, returning the token of a click it replaced.
    pub fn arm(&mut self, payload: P, token: T) -> Option<T> {
        self.pending.replace((payload, token)).map(|(_, token)| token)
    }

    /// Disarms, returning the outstanding timer token. Idempotent.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, token)| token)
    }

    /// Timer expiry for `token`: returns the payload to fire if `token` is the armed one.
    ///
    /// A matching token always disarms. A non-matching token changes nothing.
    pub fn confirm(&mut self, token: &T) -> Option<P> {
        match &self.pending {
            Some((_, pending)) if pending == token => {
                self.pending.take().map(|(payload, _)| payload)
            }
            _ => None,
        }
    }

    /// Returns `true` while a click waits for confirmation.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Token of the outstanding timer, if armed.
    #[must_use]
    pub fn pending_token(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, token)| token)
    }

    /// Payload waiting for confirmation, if armed.
    #[must_use]
    pub fn payload(&self) -> Option<&P> {
        self.pending.as_ref().map(|(payload, _)| payload)
    }
}

impl<P, T: PartialEq> Default for ClickConfirmation<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_disarmed() {
        let click = ClickConfirmation::<(), u32>::new();
        assert!(!click.is_armed());
        assert_eq!(click.pending_token(), None);
        assert_eq!(click.payload(), None);
    }

    #[test]
    fn confirm_fires_once() {
        let mut click = ClickConfirmation::new();
        click.arm("a", 1);

        assert_eq!(click.confirm(&1), Some("a"));
        assert_eq!(click.confirm(&1), None);
        assert!(!click.is_armed());
    }

    #[test]
    fn cancel_withdraws_the_click() {
        let mut click = ClickConfirmation::new();
        click.arm("a", 1);

        assert_eq!(click.cancel(), Some(1));
        assert_eq!(click.confirm(&1), None);
    }

    #[test]
    fn repeated_cancel_is_harmless() {
        let mut click = ClickConfirmation::<&str, u32>::new();
        click.arm("a", 1);
        click.cancel();

        assert_eq!(click.cancel(), None);
        assert_eq!(click.cancel(), None);
        assert!(!click.is_armed());
    }

    #[test]
    fn stray_token_leaves_current_click_armed() {
        let mut click = ClickConfirmation::new();
        click.arm("old", 1);
        assert_eq!(click.arm("new", 2), Some(1));

        assert_eq!(click.confirm(&1), None);
        assert!(click.is_armed());
        assert_eq!(click.payload(), Some(&"new"));
        assert_eq!(click.confirm(&2), Some("new"));
    }

    #[test]
    fn stray_token_after_cancel_is_ignored() {
        let mut click = ClickConfirmation::<&str, u32>::new();
        click.arm("a", 1);
        click.cancel();
        assert_eq!(click.confirm(&1), None);
        assert!(!click.is_armed());
    }
}
