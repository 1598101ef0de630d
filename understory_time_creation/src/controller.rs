// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The time-grid creation controller: tells clicks, drags and hovers apart.
//!
//! ## Signals
//!
//! On construction the controller subscribes to the drag source:
//!
//! - `mousemove` arms a candidate click at the slot under the pointer and schedules its
//!   confirmation [`click_delay`](crate::config::TimeCreationConfig::click_delay) ticks
//!   later. Targets outside any column are ignored silently.
//! - `dragStart` and `drag` withdraw a pending click and clear the guide's preview.
//!   The handler runs synchronously on the signal, so a drag dispatched by the same
//!   gesture always lands before the confirmation timer.
//! - With [`drag_creation`](crate::config::TimeCreationConfig::drag_creation), a
//!   `dragStart` over a column also opens a drag session, which subscribes to `drag` and
//!   `dragEnd` until the gesture is released.
//!
//! With [`double_click_creation`](crate::config::TimeCreationConfig::double_click_creation)
//! it also listens for `dblclick` on the grid container.
//!
//! ## States
//!
//! ```text
//!           mousemove (column)             timer fired
//!   Idle ─────────────────────► Candidate ─────────────► Idle  (timeCreationClick)
//!     ▲                             │
//!     └──────── dragStart / drag ───┘                    (nothing)
//! ```
//!
//! ## Teardown
//!
//! [`TimeCreation::destroy`] (also run on drop) destroys the guide, unsubscribes from
//! every source, cancels the confirmation timer and releases the collaborators. Signals
//! and timers that still reach a destroyed controller are no-ops.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use tracing::{debug, trace};
use understory_event_state::click_confirm::ClickConfirmation;
use understory_event_state::emitter::{Emitter, ListenerOwner, SubscriptionId};

use crate::config::{ColumnMatcher, TimeCreationConfig};
use crate::error::ConfigResult;
use crate::events::{CreationEvent, CreationEventKind};
use crate::gesture::{ContainerEventKind, DragSource, GestureKind, GesturePayload};
use crate::guide::CreationGuide;
use crate::scheduler::{Scheduler, TimerId};
use crate::target::{TimeGrid, resolve_target};
use crate::time_core::{MS_PER_MINUTE, ScheduleData, ScheduleResolver};

/// The collaborators a controller coordinates with. It holds them until destroyed.
pub struct Collaborators<G: TimeGrid, D> {
    /// Source of normalized gesture signals.
    pub drag_source: Rc<DragSource<G::Element>>,
    /// The time-grid view: column registry and geometry.
    pub grid: Rc<G>,
    /// The application's data controller.
    pub data_controller: Rc<D>,
    /// Timer facility for click confirmation.
    pub scheduler: Rc<dyn Scheduler>,
}

impl<G: TimeGrid, D> Clone for Collaborators<G, D> {
    fn clone(&self) -> Self {
        Self {
            drag_source: Rc::clone(&self.drag_source),
            grid: Rc::clone(&self.grid),
            data_controller: Rc::clone(&self.data_controller),
            scheduler: Rc::clone(&self.scheduler),
        }
    }
}

impl<G: TimeGrid, D> fmt::Debug for Collaborators<G, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

type Payload<G> = GesturePayload<<G as TimeGrid>::Element>;
type Column<G> = <G as TimeGrid>::Column;

/// Scratch state of one drag-to-create gesture. The resolver and the start snapshot
/// live and die together.
struct DragSession<C> {
    resolver: ScheduleResolver<C>,
    start: ScheduleData<C>,
    subscriptions: SmallVec<[SubscriptionId; 2]>,
}

struct State<G: TimeGrid, D> {
    /// `None` once destroyed.
    collaborators: Option<Collaborators<G, D>>,
    click: ClickConfirmation<ScheduleData<Column<G>>, TimerId>,
    session: Option<DragSession<Column<G>>>,
}

struct Shared<G: TimeGrid, D> {
    owner: ListenerOwner,
    matcher: ColumnMatcher,
    config: TimeCreationConfig,
    events: Emitter<CreationEventKind, CreationEvent<Column<G>>>,
    state: RefCell<State<G, D>>,
    /// Empty while lent to a hook, and after teardown.
    guide: RefCell<Option<Box<dyn CreationGuide<Column<G>>>>>,
}

/// Creates timed entries from clicks and drags over a time grid.
///
/// `G` is the grid view, `D` the application's data controller.
pub struct TimeCreation<G: TimeGrid + 'static, D: 'static> {
    shared: Rc<Shared<G, D>>,
}

impl<G: TimeGrid + 'static, D: 'static> TimeCreation<G, D> {
    /// Creates a controller bound to its collaborators and subscribes to gesture signals.
    pub fn new(
        collaborators: Collaborators<G, D>,
        guide: impl CreationGuide<Column<G>> + 'static,
        config: TimeCreationConfig,
    ) -> ConfigResult<Self> {
        let matcher = config.class_names.compile()?;
        let owner = ListenerOwner::next();
        let drag_source = Rc::clone(&collaborators.drag_source);
        let container = collaborators.grid.container_events();

        let shared = Rc::new(Shared {
            owner,
            matcher,
            events: Emitter::new(),
            state: RefCell::new(State {
                collaborators: Some(collaborators),
                click: ClickConfirmation::new(),
                session: None,
            }),
            guide: RefCell::new(Some(Box::new(guide))),
            config,
        });

        let weak = Rc::downgrade(&shared);
        drag_source.on(
            GestureKind::MouseMove,
            owner,
            Shared::<G, D>::bind(weak.clone(), Shared::<G, D>::on_mouse_move),
        );
        drag_source.on(
            GestureKind::DragStart,
            owner,
            Shared::<G, D>::bind(weak.clone(), Shared::<G, D>::on_click_cancel),
        );
        drag_source.on(
            GestureKind::Drag,
            owner,
            Shared::<G, D>::bind(weak.clone(), Shared::<G, D>::on_click_cancel),
        );
        if shared.config.drag_creation {
            drag_source.on(
                GestureKind::DragStart,
                owner,
                Shared::<G, D>::bind(weak.clone(), Shared::<G, D>::on_drag_start),
            );
        }
        if shared.config.double_click_creation {
            if let Some(container) = container {
                container.on(
                    ContainerEventKind::DoubleClick,
                    owner,
                    Shared::<G, D>::bind(weak, Shared::<G, D>::on_double_click),
                );
            }
        }

        debug!(
            owner = ?owner,
            drag_creation = shared.config.drag_creation,
            double_click_creation = shared.config.double_click_creation,
            "time creation controller attached"
        );
        Ok(Self { shared })
    }

    /// Subscribes to one kind of creation event.
    pub fn on<F>(&self, kind: CreationEventKind, owner: ListenerOwner, handler: F) -> SubscriptionId
    where
        F: Fn(&CreationEvent<Column<G>>) + 'static,
    {
        self.shared.events.on(kind, owner, handler)
    }

    /// Removes one subscription.
    pub fn off(&self, id: SubscriptionId) -> bool {
        self.shared.events.off(id)
    }

    /// Removes every subscription registered under `owner`.
    pub fn off_owner(&self, owner: ListenerOwner) -> usize {
        self.shared.events.off_owner(owner)
    }

    /// Resolves the column under `target`, or `None` if there is none.
    ///
    /// Always `None` once destroyed.
    pub fn resolve_target(&self, target: &G::Element) -> Option<Column<G>> {
        let grid = self.shared.collaborators()?.grid;
        resolve_target(&self.shared.matcher, &*grid, target)
    }

    /// Tears the controller down. Later calls do nothing.
    pub fn destroy(&self) {
        self.shared.destroy();
    }

    /// Returns `true` once [`destroy`](Self::destroy) ran.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Returns `true` while a candidate click waits for confirmation.
    #[must_use]
    pub fn is_click_pending(&self) -> bool {
        self.shared.state.borrow().click.is_armed()
    }

    /// Returns `true` while a drag-to-create gesture is in flight.
    #[must_use]
    pub fn has_drag_session(&self) -> bool {
        self.shared.state.borrow().session.is_some()
    }

    /// The context this controller subscribes under.
    #[must_use]
    pub fn listener_owner(&self) -> ListenerOwner {
        self.shared.owner
    }

    /// The configuration this controller was built with.
    #[must_use]
    pub fn config(&self) -> &TimeCreationConfig {
        &self.shared.config
    }

    /// The grid view, until destroyed.
    #[must_use]
    pub fn grid(&self) -> Option<Rc<G>> {
        self.shared.collaborators().map(|c| c.grid)
    }

    /// The data controller, until destroyed.
    #[must_use]
    pub fn data_controller(&self) -> Option<Rc<D>> {
        self.shared.collaborators().map(|c| c.data_controller)
    }
}

impl<G: TimeGrid + 'static, D: 'static> Drop for TimeCreation<G, D> {
    fn drop(&mut self) {
        self.shared.destroy();
    }
}

impl<G: TimeGrid + 'static, D: 'static> fmt::Debug for TimeCreation<G, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("TimeCreation")
            .field("owner", &self.shared.owner)
            .field("destroyed", &state.collaborators.is_none())
            .field("click_pending", &state.click.is_armed())
            .field("drag_session", &state.session.is_some())
            .finish_non_exhaustive()
    }
}

impl<G: TimeGrid + 'static, D: 'static> Shared<G, D> {
    /// Wraps a handler so that it only runs while the controller is alive.
    fn bind<P: 'static>(weak: Weak<Self>, handler: fn(&Rc<Self>, &P)) -> impl Fn(&P) + 'static {
        move |payload: &P| {
            if let Some(shared) = weak.upgrade() {
                handler(&shared, payload);
            }
        }
    }

    fn collaborators(&self) -> Option<Collaborators<G, D>> {
        self.state.borrow().collaborators.clone()
    }

    fn is_closed(&self) -> bool {
        self.state.borrow().collaborators.is_none()
    }

    fn new_schedule_duration(&self) -> i64 {
        i64::from(self.config.new_schedule_minutes) * MS_PER_MINUTE
    }

    fn on_mouse_move(self: &Rc<Self>, payload: &Payload<G>) {
        let Some(collaborators) = self.collaborators() else {
            return;
        };
        // A move means no drag owns the gesture anymore.
        self.end_drag_session(&collaborators.drag_source);

        let Some(column) = resolve_target(&self.matcher, &*collaborators.grid, &payload.target)
        else {
            trace!("mousemove outside any column");
            return;
        };
        let data = ScheduleResolver::new(column).resolve(&payload.origin);

        let weak = Rc::downgrade(self);
        let timer = collaborators.scheduler.schedule(
            self.config.click_delay,
            Box::new(move |id: TimerId| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_click_timer(id);
                }
            }),
        );
        let replaced = self.state.borrow_mut().click.arm(data, timer);
        if let Some(stale) = replaced {
            collaborators.scheduler.cancel(stale);
        }
        trace!(timer = timer.get(), "click armed");
    }

    fn on_click_timer(self: &Rc<Self>, id: TimerId) {
        let confirmed = {
            let mut state = self.state.borrow_mut();
            if state.collaborators.is_none() {
                return;
            }
            state.click.confirm(&id)
        };
        let Some(data) = confirmed else {
            trace!(timer = id.get(), "stale click timer ignored");
            return;
        };
        self.create_at(data);
    }

    fn on_click_cancel(self: &Rc<Self>, _payload: &Payload<G>) {
        let Some(collaborators) = self.collaborators() else {
            return;
        };
        let withdrawn = self.state.borrow_mut().click.cancel();
        self.with_guide(|guide| guide.clear_guide_element());
        if let Some(timer) = withdrawn {
            collaborators.scheduler.cancel(timer);
            trace!(timer = timer.get(), "click withdrawn by drag");
        }
    }

    fn on_drag_start(self: &Rc<Self>, payload: &Payload<G>) {
        let Some(collaborators) = self.collaborators() else {
            return;
        };
        let drag_source = &collaborators.drag_source;
        self.end_drag_session(drag_source);

        let Some(column) = resolve_target(&self.matcher, &*collaborators.grid, &payload.target)
        else {
            trace!("dragStart outside any column");
            return;
        };
        let resolver = ScheduleResolver::new(column);
        let start = resolver.resolve(&payload.origin);

        let weak = Rc::downgrade(self);
        let subscriptions = SmallVec::from_buf([
            drag_source.on(
                GestureKind::Drag,
                self.owner,
                Self::bind(weak.clone(), Self::on_session_drag),
            ),
            drag_source.on(
                GestureKind::DragEnd,
                self.owner,
                Self::bind(weak, Self::on_session_drag_end),
            ),
        ]);
        self.state.borrow_mut().session = Some(DragSession {
            resolver,
            start: start.clone(),
            subscriptions,
        });
        self.publish(CreationEvent::DragStart(start));
    }

    fn on_session_drag(self: &Rc<Self>, payload: &Payload<G>) {
        let data = {
            let state = self.state.borrow();
            if state.collaborators.is_none() {
                return;
            }
            state
                .session
                .as_ref()
                .map(|session| session.resolver.resolve(&payload.origin))
        };
        if let Some(data) = data {
            self.publish(CreationEvent::Drag(data));
        }
    }

    fn on_session_drag_end(self: &Rc<Self>, payload: &Payload<G>) {
        let Some(collaborators) = self.collaborators() else {
            return;
        };
        let Some(session) = self.end_drag_session(&collaborators.drag_source) else {
            return;
        };
        let mut data = session.resolver.resolve(&payload.origin);
        let duration = self.new_schedule_duration();
        let (first, second) = (
            session.start.nearest_grid_time_y,
            data.nearest_grid_time_y,
        );
        data.create_range = Some((first.min(second), first.max(second) + duration));

        let request = data.schedule_request(duration);
        self.publish(CreationEvent::DragEnd(data));
        self.publish(CreationEvent::BeforeCreateSchedule(request));
    }

    fn on_double_click(self: &Rc<Self>, payload: &Payload<G>) {
        let Some(collaborators) = self.collaborators() else {
            return;
        };
        let Some(column) = resolve_target(&self.matcher, &*collaborators.grid, &payload.target)
        else {
            return;
        };
        let withdrawn = self.state.borrow_mut().click.cancel();
        if let Some(timer) = withdrawn {
            collaborators.scheduler.cancel(timer);
        }
        self.create_at(ScheduleResolver::new(column).resolve(&payload.origin));
    }

    /// Publishes a click at `data` followed by its creation request.
    fn create_at(&self, data: ScheduleData<Column<G>>) {
        let request = data.schedule_request(self.new_schedule_duration());
        self.publish(CreationEvent::Click(data));
        self.publish(CreationEvent::BeforeCreateSchedule(request));
    }

    /// Drops the drag session, unsubscribing its handlers.
    fn end_drag_session(
        &self,
        drag_source: &DragSource<G::Element>,
    ) -> Option<DragSession<Column<G>>> {
        let session = self.state.borrow_mut().session.take()?;
        for id in &session.subscriptions {
            drag_source.off(*id);
        }
        Some(session)
    }

    /// Shows `event` to the guide, then to subscribers.
    fn publish(&self, event: CreationEvent<Column<G>>) {
        if self.is_closed() {
            return;
        }
        self.with_guide(|guide| guide.on_creation_event(&event));
        // The guide may have torn the controller down.
        if self.is_closed() {
            return;
        }
        let kind = event.kind();
        let delivered = self.events.emit(kind, &event);
        debug!(event = kind.name(), delivered, "creation intent published");
    }

    /// Lends the guide to `hook` with no controller borrow held, so the guide may call
    /// back into the controller.
    ///
    /// A guide whose hook destroyed the controller is released once the hook returns.
    fn with_guide(&self, hook: impl FnOnce(&mut dyn CreationGuide<Column<G>>)) {
        let Some(mut guide) = self.guide.borrow_mut().take() else {
            return;
        };
        hook(&mut *guide);
        if self.is_closed() {
            guide.destroy();
        } else {
            *self.guide.borrow_mut() = Some(guide);
        }
    }

    fn destroy(&self) {
        let (collaborators, timer) = {
            let mut state = self.state.borrow_mut();
            let Some(collaborators) = state.collaborators.take() else {
                return;
            };
            state.session = None;
            (collaborators, state.click.cancel())
        };

        let guide = self.guide.borrow_mut().take();
        if let Some(mut guide) = guide {
            guide.destroy();
        }
        collaborators.drag_source.off_owner(self.owner);
        if let Some(container) = collaborators.grid.container_events() {
            container.off_owner(self.owner);
        }
        if let Some(timer) = timer {
            collaborators.scheduler.cancel(timer);
        }
        self.events.clear();
        debug!(owner = ?self.owner, "time creation controller destroyed");
    }
}
