// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The menu state machine: open/close transitions, the per-tick pipeline,
//! and menu-wide alpha.
//!
//! A [`Menu`] owns a root node subtree inside a shared [`NodeStore`], plus
//! the router, hit tester, event queue, and fader that drive it. Everything
//! runs on one thread; handlers never re-enter the router, so each tick is
//! a strict sequence:
//!
//! 1. drain events queued by last tick's handlers
//! 2. hit sweep per device, dispatch the synthesized input events
//! 3. advance the open/close state machine and its fader
//! 4. apply the menu alpha to the subtree
//! 5. broadcast `FrameUpdate`

use cgmath::Vector4;

use crate::component::SoundPlayer;
use crate::error::UiError;
use crate::event::{Event, EventQueue, EventType};
use crate::fader::{FadeState, Fader};
use crate::hit::{HitTester, InputSample};
use crate::node::{NodeFlags, NodeHandle, NodeStore};
use crate::router::{DispatchArgs, Router};
use crate::trace::{DispatchErrorEvent, HitEvent, StateChangeEvent, TickEvent, Tracer};

/// Where a menu is in its open/close lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MenuState {
    /// Fully closed and hidden; input is ignored.
    #[default]
    Closed,
    /// Fading in.
    Opening,
    /// Fully open; input is processed.
    Opened,
    /// Fading out.
    Closing,
}

/// Menu configuration.
#[derive(Clone, Copy, Debug)]
pub struct MenuConfig {
    /// Open/close fade duration in seconds. Zero or negative means instant.
    pub fade_duration: f32,
    /// Minimum local-space drag on the dominant axis to count as a swipe.
    pub swipe_threshold: f32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            fade_duration: 0.25,
            swipe_threshold: 0.2,
        }
    }
}

/// A retained menu: a node subtree plus the machinery that animates it and
/// feeds it input.
#[derive(Debug)]
pub struct Menu {
    root: NodeHandle,
    router: Router,
    tester: HitTester,
    queue: EventQueue,
    fader: Fader,
    config: MenuConfig,
    state: MenuState,
    init_pending: bool,
    tick_index: u64,
    now: f64,
    applied_alpha: f32,
}

impl Menu {
    /// Creates a menu with a fresh (hidden) root node in `store`.
    ///
    /// The menu owns the root: it drives the root's color alpha and hidden
    /// flag. Callers build their panels as children of
    /// [`root`](Self::root).
    pub fn new(store: &mut NodeStore, config: MenuConfig) -> Result<Self, UiError> {
        let root = store.create_node();
        store.set_flags(
            root,
            NodeFlags {
                hidden: true,
                ..NodeFlags::default()
            },
        )?;
        store.set_color(root, Vector4::new(1.0, 1.0, 1.0, 0.0))?;
        Ok(Self {
            root,
            router: Router::new(),
            tester: HitTester::new(),
            queue: EventQueue::new(),
            fader: Fader::new(0.0),
            config,
            state: MenuState::Closed,
            init_pending: true,
            tick_index: 0,
            now: 0.0,
            applied_alpha: 0.0,
        })
    }

    /// The root node of the menu's subtree.
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// The current menu alpha in `[0, 1]`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.fader.alpha()
    }

    /// The router's current focus path.
    #[must_use]
    pub fn focus_path(&self) -> &[NodeHandle] {
        self.router.focus_path()
    }

    /// Begins opening. Only effective from `Closed`; redundant calls are
    /// no-ops. `Opening` is broadcast on the next tick, `Opened` when the
    /// fade completes.
    pub fn open(&mut self, store: &mut NodeStore) -> Result<(), UiError> {
        if self.state != MenuState::Closed {
            return Ok(());
        }
        self.state = MenuState::Opening;
        store.set_flags(self.root, NodeFlags::default())?;
        self.fader.start_fade_in();
        self.queue
            .push(Event::broadcast(EventType::Opening, self.root));
        Ok(())
    }

    /// Begins closing. Only effective from `Opened` or `Opening`.
    pub fn close(&mut self, _store: &mut NodeStore) -> Result<(), UiError> {
        if !matches!(self.state, MenuState::Opened | MenuState::Opening) {
            return Ok(());
        }
        self.state = MenuState::Closing;
        self.fader.start_fade_out();
        self.queue
            .push(Event::broadcast(EventType::Closing, self.root));
        Ok(())
    }

    /// Opens without animating. Both `Opening` and `Opened` are broadcast,
    /// in order, on the next tick.
    pub fn open_instant(&mut self, store: &mut NodeStore) -> Result<(), UiError> {
        if self.state == MenuState::Opened {
            return Ok(());
        }
        self.state = MenuState::Opened;
        store.set_flags(self.root, NodeFlags::default())?;
        self.fader.start_fade_in();
        self.fader.force_finish();
        self.fader.set_alpha(1.0);
        self.queue
            .push(Event::broadcast(EventType::Opening, self.root));
        self.queue
            .push(Event::broadcast(EventType::Opened, self.root));
        Ok(())
    }

    /// Closes without animating. Both `Closing` and `Closed` are broadcast,
    /// in order, on the next tick.
    pub fn close_instant(&mut self, store: &mut NodeStore) -> Result<(), UiError> {
        if self.state == MenuState::Closed {
            return Ok(());
        }
        self.state = MenuState::Closed;
        self.fader.start_fade_out();
        self.fader.force_finish();
        self.fader.set_alpha(0.0);
        self.hide(store)?;
        self.queue
            .push(Event::broadcast(EventType::Closing, self.root));
        self.queue
            .push(Event::broadcast(EventType::Closed, self.root));
        Ok(())
    }

    /// Destroys the menu's subtree immediately. Safe mid-animation; any
    /// retained handles into the subtree go stale.
    pub fn destroy(self, store: &mut NodeStore) -> Result<(), UiError> {
        store.destroy_node(self.root)
    }

    /// Advances the menu by `dt` seconds, processing `inputs`.
    pub fn tick(
        &mut self,
        store: &mut NodeStore,
        dt: f32,
        inputs: &[InputSample],
        sounds: &mut dyn SoundPlayer,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), UiError> {
        // The root going stale means the caller destroyed nodes out from
        // under the menu; surface that instead of limping on.
        let _ = store.resolve(self.root)?;

        self.tick_index += 1;
        self.now += f64::from(dt);
        tracer.tick(&TickEvent {
            tick_index: self.tick_index,
            dt,
            drained_events: self.queue.len(),
        });

        // First tick: initialize components exactly once, before anything
        // else is delivered.
        if self.init_pending {
            self.init_pending = false;
            let init = Event::broadcast(EventType::Init, self.root);
            self.dispatch_quiet(store, sounds, dt, tracer, &init);
        }

        // 1. Drain last tick's deferred events.
        for event in self.queue.drain() {
            self.dispatch_quiet(store, sounds, dt, tracer, &event);
        }

        // 2. Input sweep, only while fully open.
        if self.state == MenuState::Opened {
            let events =
                self.tester
                    .sweep(store, self.root, inputs, self.config.swipe_threshold)?;
            for (device, hit) in self.tester.last_hits() {
                tracer.hit(&HitEvent {
                    device: *device,
                    node: hit.handle,
                    distance: hit.distance,
                });
            }
            for event in events {
                match event.event_type {
                    EventType::FocusGained => {
                        self.router.set_focus(store, Some(event.target))?;
                    }
                    EventType::FocusLost => {
                        if self.router.focus_path().last() == Some(&event.target) {
                            self.router.set_focus(store, None)?;
                        }
                    }
                    _ => {}
                }
                self.dispatch_quiet(store, sounds, dt, tracer, &event);
            }
        }

        // 3. State machine and fader. A non-positive fade duration means
        // instant: jump straight to the endpoint rather than feeding the
        // fader an unbounded rate (which a zero `dt` would turn into NaN).
        if self.config.fade_duration > 0.0 {
            self.fader.update(1.0 / self.config.fade_duration, dt);
        } else {
            self.fader.force_finish();
        }
        match self.state {
            MenuState::Opening if self.fader.state() == FadeState::None => {
                self.transition(MenuState::Opened, tracer);
                let opened = Event::broadcast(EventType::Opened, self.root);
                self.dispatch_quiet(store, sounds, dt, tracer, &opened);
            }
            MenuState::Closing if self.fader.state() == FadeState::None => {
                self.transition(MenuState::Closed, tracer);
                self.hide(store)?;
                let closed = Event::broadcast(EventType::Closed, self.root);
                self.dispatch_quiet(store, sounds, dt, tracer, &closed);
            }
            _ => {}
        }

        // 4. Apply the menu alpha to the subtree via the root color.
        let alpha = self.fader.alpha();
        if alpha != self.applied_alpha {
            store.set_color(self.root, Vector4::new(1.0, 1.0, 1.0, alpha))?;
            self.applied_alpha = alpha;
        }

        // 5. Per-frame update for every component, unless fully closed.
        if self.state != MenuState::Closed {
            let update = Event::broadcast(EventType::FrameUpdate, self.root);
            self.dispatch_quiet(store, sounds, dt, tracer, &update);
        }

        Ok(())
    }

    fn transition(&mut self, to: MenuState, tracer: &mut Tracer<'_>) {
        tracer.state_change(&StateChangeEvent {
            from: self.state,
            to,
        });
        self.state = to;
    }

    fn hide(&mut self, store: &mut NodeStore) -> Result<(), UiError> {
        store.set_flags(
            self.root,
            NodeFlags {
                hidden: true,
                ..NodeFlags::default()
            },
        )?;
        self.tester.reset();
        self.router.set_focus(store, None)?;
        Ok(())
    }

    /// Dispatches one event. Per-event failures (a stale queued target or a
    /// malformed pairing) are reported through the tracer; they must not
    /// abort the tick.
    fn dispatch_quiet(
        &mut self,
        store: &mut NodeStore,
        sounds: &mut dyn SoundPlayer,
        dt: f32,
        tracer: &mut Tracer<'_>,
        event: &Event,
    ) {
        let mut args = DispatchArgs {
            store,
            queue: &mut self.queue,
            sounds,
            dt,
            now: self.now,
        };
        if let Err(error) = self.router.dispatch(&mut args, tracer, event) {
            tracer.dispatch_error(&DispatchErrorEvent {
                event_type: event.event_type,
                target: event.target,
                error: &error,
            });
        }
    }
}
