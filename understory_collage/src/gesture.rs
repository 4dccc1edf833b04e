// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer gesture arbitration.
//!
//! Several recognizers compete for the same touches on a frame: a tap adds a
//! photo, a double tap resets the transform, a drag pans, two fingers pinch
//! and rotate, and a drag that starts on a resize handle moves an edge.
//! [`GestureArbiter`] resolves them with fixed priorities:
//!
//! - A press on a resize handle enters [`GestureState::ResizingEdge`] at once.
//! - A second pointer promotes a press or a pan to a pinch, and aborts an
//!   edge resize.
//! - Movement past the tap slop promotes a press to a pan.
//! - A release without movement waits for a second tap; a second release
//!   inside the window is a double tap, and [`GestureArbiter::poll`] after the
//!   window reports the single tap.
//! - A second press that turns into a pan or pinch keeps the first tap; the
//!   next [`GestureArbiter::poll`] reports it. A second press held past the
//!   window reports the first tap on release.
//!
//! Time is supplied by the caller in milliseconds; the arbiter never reads a
//! clock.

use kurbo::Point;

use crate::config::CollageConfig;
use crate::resize::Edge;

/// Observable arbitration state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    /// No pointer is down and no tap is pending.
    #[default]
    Idle,
    /// One pointer is down and has not moved past the slop.
    Pressed,
    /// One pointer is dragging the layer.
    Panning,
    /// Two or more pointers are scaling and rotating the layer.
    Pinching,
    /// A resize handle is being dragged.
    ResizingEdge(Edge),
    /// A tap was released; waiting to see whether a second one follows.
    AwaitingDoubleTap,
}

/// Continuous gesture that ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    /// Single-pointer drag.
    Pan,
    /// Multi-pointer scale and rotate.
    Pinch,
    /// Edge handle drag.
    Resize(Edge),
}

/// Discrete outcome reported to the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A single tap at this viewport point.
    Tap(Point),
    /// A double tap at this viewport point.
    DoubleTap(Point),
    /// A press became a pan; `origin` is where the pointer went down.
    PanStarted {
        /// Press location in viewport pixels.
        origin: Point,
    },
    /// A second pointer arrived.
    PinchStarted,
    /// An edge resize was interrupted; live values must revert.
    ResizeAborted(Edge),
    /// A continuous gesture ended normally; its live values should commit.
    Finished(GestureKind),
}

/// Gesture state machine for one interactive layer.
#[derive(Clone, Debug)]
pub struct GestureArbiter {
    state: GestureState,
    pointers: u32,
    origin: Point,
    // Release time of a first tap, while a second press is in progress.
    first_tap_ms: Option<u64>,
    tap_pos: Point,
    // First tap whose second press became something else.
    deferred_tap: Option<Point>,
    tap_slop: f64,
    double_tap_window_ms: u64,
}

impl GestureArbiter {
    /// Creates an idle arbiter using the configured slop and window.
    #[must_use]
    pub fn new(config: &CollageConfig) -> Self {
        Self {
            state: GestureState::Idle,
            pointers: 0,
            origin: Point::ZERO,
            first_tap_ms: None,
            tap_pos: Point::ZERO,
            deferred_tap: None,
            tap_slop: config.tap_slop.max(0.0),
            double_tap_window_ms: config.double_tap_window_ms,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Number of pointers currently down.
    #[must_use]
    pub fn pointer_count(&self) -> u32 {
        self.pointers
    }

    fn within_window(&self, since_ms: u64, now_ms: u64) -> bool {
        now_ms.saturating_sub(since_ms) <= self.double_tap_window_ms
    }

    fn defer_first_tap(&mut self) {
        if self.first_tap_ms.take().is_some() {
            self.deferred_tap = Some(self.tap_pos);
        }
    }

    /// A pointer went down at `pos`.
    ///
    /// `handle` names the resize handle under the pointer, if any.
    pub fn pointer_down(
        &mut self,
        pos: Point,
        now_ms: u64,
        handle: Option<Edge>,
    ) -> Option<GestureEvent> {
        self.pointers += 1;
        match self.state {
            GestureState::Idle => {
                if self.pointers == 1 {
                    self.press(pos, handle, None);
                }
                None
            }
            GestureState::AwaitingDoubleTap => {
                let first_up = self.first_tap_ms.take().unwrap_or(now_ms);
                if handle.is_none() && self.within_window(first_up, now_ms) {
                    self.press(pos, None, Some(first_up));
                    None
                } else {
                    let pending = self.tap_pos;
                    self.press(pos, handle, None);
                    Some(GestureEvent::Tap(pending))
                }
            }
            GestureState::Pressed | GestureState::Panning => {
                self.defer_first_tap();
                self.state = GestureState::Pinching;
                Some(GestureEvent::PinchStarted)
            }
            GestureState::ResizingEdge(edge) => {
                self.state = GestureState::Idle;
                Some(GestureEvent::ResizeAborted(edge))
            }
            GestureState::Pinching => None,
        }
    }

    fn press(&mut self, pos: Point, handle: Option<Edge>, first_tap_ms: Option<u64>) {
        self.origin = pos;
        self.first_tap_ms = first_tap_ms;
        self.state = match handle {
            Some(edge) => GestureState::ResizingEdge(edge),
            None => GestureState::Pressed,
        };
    }

    /// A pointer moved to `pos`.
    pub fn pointer_move(&mut self, pos: Point) -> Option<GestureEvent> {
        if self.state == GestureState::Pressed && (pos - self.origin).hypot() > self.tap_slop {
            self.defer_first_tap();
            self.state = GestureState::Panning;
            return Some(GestureEvent::PanStarted {
                origin: self.origin,
            });
        }
        None
    }

    /// A pointer was released at `pos`.
    pub fn pointer_up(&mut self, pos: Point, now_ms: u64) -> Option<GestureEvent> {
        self.pointers = self.pointers.saturating_sub(1);
        match self.state {
            GestureState::Pressed => match self.first_tap_ms.take() {
                Some(first_up) if self.within_window(first_up, now_ms) => {
                    self.state = GestureState::Idle;
                    Some(GestureEvent::DoubleTap(pos))
                }
                expired => {
                    let first = expired.map(|_| self.tap_pos);
                    self.tap_pos = self.origin;
                    self.first_tap_ms = Some(now_ms);
                    self.state = GestureState::AwaitingDoubleTap;
                    first.map(GestureEvent::Tap)
                }
            },
            GestureState::Panning => {
                self.state = GestureState::Idle;
                Some(GestureEvent::Finished(GestureKind::Pan))
            }
            GestureState::Pinching if self.pointers == 0 => {
                self.state = GestureState::Idle;
                Some(GestureEvent::Finished(GestureKind::Pinch))
            }
            GestureState::ResizingEdge(edge) => {
                self.state = GestureState::Idle;
                Some(GestureEvent::Finished(GestureKind::Resize(edge)))
            }
            GestureState::Pinching | GestureState::Idle | GestureState::AwaitingDoubleTap => None,
        }
    }

    /// Reports a pending single tap once the double-tap window has passed.
    ///
    /// A first tap whose second press became a pan or pinch is reported
    /// right away.
    pub fn poll(&mut self, now_ms: u64) -> Option<GestureEvent> {
        if let Some(pos) = self.deferred_tap.take() {
            return Some(GestureEvent::Tap(pos));
        }
        if self.state != GestureState::AwaitingDoubleTap {
            return None;
        }
        let first_up = self.first_tap_ms?;
        if self.within_window(first_up, now_ms) {
            return None;
        }
        self.first_tap_ms = None;
        self.state = GestureState::Idle;
        Some(GestureEvent::Tap(self.tap_pos))
    }

    /// Drops all pointers and pending taps.
    ///
    /// Returns [`GestureEvent::ResizeAborted`] if an edge drag was cut off.
    pub fn cancel(&mut self) -> Option<GestureEvent> {
        let aborted = match self.state {
            GestureState::ResizingEdge(edge) => Some(GestureEvent::ResizeAborted(edge)),
            _ => None,
        };
        self.state = GestureState::Idle;
        self.pointers = 0;
        self.first_tap_ms = None;
        self.deferred_tap = None;
        aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arbiter() -> GestureArbiter {
        GestureArbiter::new(&CollageConfig::default())
    }

    const P: Point = Point::new(50.0, 50.0);

    #[test]
    fn tap_is_reported_after_window() {
        let mut g = arbiter();
        assert_eq!(g.pointer_down(P, 0, None), None);
        assert_eq!(g.pointer_up(P, 40), None);
        assert_eq!(g.state(), GestureState::AwaitingDoubleTap);
        assert_eq!(g.poll(200), None);
        assert_eq!(g.poll(341), Some(GestureEvent::Tap(P)));
        assert_eq!(g.state(), GestureState::Idle);
    }

    #[test]
    fn second_tap_inside_window_is_double_tap() {
        let mut g = arbiter();
        g.pointer_down(P, 0, None);
        g.pointer_up(P, 40);
        assert_eq!(g.pointer_down(P, 200, None), None);
        assert_eq!(g.pointer_up(P, 250), Some(GestureEvent::DoubleTap(P)));
        assert_eq!(g.poll(10_000), None);
    }

    #[test]
    fn late_second_press_flushes_first_tap() {
        let mut g = arbiter();
        g.pointer_down(P, 0, None);
        g.pointer_up(P, 40);
        assert_eq!(g.pointer_down(P, 1000, None), Some(GestureEvent::Tap(P)));
        assert_eq!(g.state(), GestureState::Pressed);
    }

    #[test]
    fn second_press_that_pans_keeps_first_tap() {
        let mut g = arbiter();
        let first = Point::new(20.0, 20.0);
        g.pointer_down(first, 0, None);
        g.pointer_up(first, 40);
        assert_eq!(g.pointer_down(P, 200, None), None);
        assert_eq!(
            g.pointer_move(Point::new(110.0, 50.0)),
            Some(GestureEvent::PanStarted { origin: P })
        );
        assert_eq!(
            g.pointer_up(Point::new(110.0, 50.0), 260),
            Some(GestureEvent::Finished(GestureKind::Pan))
        );
        assert_eq!(g.poll(10_000), Some(GestureEvent::Tap(first)));
        assert_eq!(g.poll(10_001), None);
    }

    #[test]
    fn second_press_that_pinches_keeps_first_tap() {
        let mut g = arbiter();
        let first = Point::new(20.0, 20.0);
        g.pointer_down(first, 0, None);
        g.pointer_up(first, 40);
        g.pointer_down(P, 200, None);
        assert_eq!(
            g.pointer_down(Point::new(90.0, 90.0), 210, None),
            Some(GestureEvent::PinchStarted)
        );
        assert_eq!(g.poll(220), Some(GestureEvent::Tap(first)));
        g.pointer_up(P, 300);
        assert_eq!(
            g.pointer_up(P, 310),
            Some(GestureEvent::Finished(GestureKind::Pinch))
        );
        assert_eq!(g.poll(10_000), None);
    }

    #[test]
    fn second_press_held_past_window_reports_both_taps() {
        let mut g = arbiter();
        let first = Point::new(20.0, 20.0);
        g.pointer_down(first, 0, None);
        g.pointer_up(first, 40);
        g.pointer_down(P, 200, None);
        assert_eq!(g.pointer_up(P, 900), Some(GestureEvent::Tap(first)));
        assert_eq!(g.state(), GestureState::AwaitingDoubleTap);
        assert_eq!(g.poll(1_300), Some(GestureEvent::Tap(P)));
    }

    #[test]
    fn cancel_drops_deferred_tap() {
        let mut g = arbiter();
        g.pointer_down(P, 0, None);
        g.pointer_up(P, 40);
        g.pointer_down(P, 100, None);
        g.pointer_move(Point::new(200.0, 50.0));
        g.cancel();
        assert_eq!(g.poll(10_000), None);
    }

    #[test]
    fn movement_past_slop_becomes_pan() {
        let mut g = arbiter();
        g.pointer_down(P, 0, None);
        assert_eq!(g.pointer_move(Point::new(55.0, 50.0)), None);
        assert_eq!(
            g.pointer_move(Point::new(60.0, 50.0)),
            Some(GestureEvent::PanStarted { origin: P })
        );
        assert_eq!(
            g.pointer_up(Point::new(60.0, 50.0), 100),
            Some(GestureEvent::Finished(GestureKind::Pan))
        );
    }

    #[test]
    fn handle_press_preempts_pan() {
        let mut g = arbiter();
        g.pointer_down(P, 0, Some(Edge::Right));
        assert_eq!(g.state(), GestureState::ResizingEdge(Edge::Right));
        assert_eq!(g.pointer_move(Point::new(300.0, 50.0)), None);
        assert_eq!(
            g.pointer_up(Point::new(300.0, 50.0), 10),
            Some(GestureEvent::Finished(GestureKind::Resize(Edge::Right)))
        );
    }

    #[test]
    fn second_pointer_aborts_resize() {
        let mut g = arbiter();
        g.pointer_down(P, 0, Some(Edge::Top));
        assert_eq!(
            g.pointer_down(Point::new(80.0, 80.0), 5, None),
            Some(GestureEvent::ResizeAborted(Edge::Top))
        );
        assert_eq!(g.pointer_up(P, 10), None);
        assert_eq!(g.pointer_up(P, 11), None);
        assert_eq!(g.state(), GestureState::Idle);
    }

    #[test]
    fn second_pointer_promotes_pan_to_pinch() {
        let mut g = arbiter();
        g.pointer_down(P, 0, None);
        g.pointer_move(Point::new(100.0, 50.0));
        assert_eq!(
            g.pointer_down(Point::new(10.0, 10.0), 5, None),
            Some(GestureEvent::PinchStarted)
        );
        assert_eq!(g.pointer_up(P, 10), None);
        assert_eq!(g.state(), GestureState::Pinching);
        assert_eq!(
            g.pointer_up(P, 12),
            Some(GestureEvent::Finished(GestureKind::Pinch))
        );
    }

    #[test]
    fn cancel_reports_aborted_resize() {
        let mut g = arbiter();
        g.pointer_down(P, 0, Some(Edge::Bottom));
        assert_eq!(g.cancel(), Some(GestureEvent::ResizeAborted(Edge::Bottom)));
        assert_eq!(g.pointer_count(), 0);
        assert_eq!(g.cancel(), None);
    }
}
