//! # Animation Timeline
//!
//! Every delayed step of the screen is a named [`Phase`] scheduled on the
//! timeline. Nothing sleeps and nothing owns a timer: the event loop passes in
//! the current clock and pops whatever is due.
//!
//! ```text
//!  ShowPrompt ──50ms──▶ TrayRevealBegin ──spring──▶ TrayRevealComplete ──▶ scroll to bottom
//!  HidePrompt ─100ms──▶ TrayHideBegin   ──spring──▶ TrayHideComplete   ──▶ collapse tray
//!  Append     ─500ms──▶ RevealNewestRow
//!  Keyboard   ─450ms──▶ KeyboardSettled ──▶ scroll to bottom
//! ```
//!
//! Phases due at the same instant fire in the order they were scheduled.
//! A follow-up scheduled while handling a phase is timed from that phase's
//! due time, not from the tick that happened to observe it, so a chain
//! completes in one tick if the whole chain is already due.

use std::time::Duration;

use crate::core::action::SequenceEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Activation settle delay elapsed; the sequence may start.
    StartFlow,
    /// Scroll the newest row into view if the list overflows.
    RevealNewestRow { row: usize },
    TrayRevealBegin { generation: u64 },
    TrayRevealComplete { generation: u64 },
    TrayHideBegin { generation: u64 },
    TrayHideComplete { generation: u64 },
    /// The tray's bottom offset finished moving with the keyboard.
    KeyboardSettled,
    CancelFadeComplete,
    /// A sequence event sent with a delay.
    Deferred(SequenceEvent),
}

#[derive(Debug)]
struct Scheduled {
    due: Duration,
    seq: u64,
    phase: Phase,
}

#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The clock as last observed. While a phase is being handled this is
    /// that phase's due time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, phase: Phase) {
        let due = self.now + delay;
        self.pending.push(Scheduled {
            due,
            seq: self.next_seq,
            phase,
        });
        self.next_seq += 1;
    }

    /// Pop the earliest phase due at or before `now`, advancing the clock to
    /// its due time. Returns `None` (and advances to `now`) when nothing is due.
    pub fn pop_due(&mut self, now: Duration) -> Option<Phase> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= now)
            .min_by_key(|(_, s)| (s.due, s.seq))
            .map(|(i, _)| i);

        match position {
            Some(i) => {
                let scheduled = self.pending.swap_remove(i);
                self.now = self.now.max(scheduled.due);
                Some(scheduled.phase)
            }
            None => {
                self.now = self.now.max(now);
                None
            }
        }
    }

    /// Drop every outstanding phase. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|s| s.due).min()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// A damped spring from 0.0 to 1.0 over a fixed duration.
///
/// Under-damped ratios overshoot past 1.0 before settling; the value is
/// pinned to exactly 1.0 once `duration` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub duration: Duration,
    pub damping_ratio: f32,
    /// Initial velocity in total-distances per second.
    pub initial_velocity: f32,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(700),
            damping_ratio: 0.6,
            initial_velocity: 1.5,
        }
    }
}

/// Residual amplitude treated as "settled" when deriving stiffness.
const SETTLE_THRESHOLD: f32 = 0.001;

impl Spring {
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if elapsed >= self.duration || self.duration.is_zero() {
            return 1.0;
        }
        let t = elapsed.as_secs_f32();
        let zeta = self.damping_ratio.clamp(0.05, 1.0);
        // Natural frequency chosen so the envelope decays below the
        // threshold right at `duration`.
        let omega = -SETTLE_THRESHOLD.ln() / (zeta * self.duration.as_secs_f32());
        let v0 = self.initial_velocity;
        let decay = (-zeta * omega * t).exp();

        if zeta >= 1.0 {
            // Critically damped: y(t) = (A + B t) e^{-ωt}, y(0) = -1, y'(0) = v0
            let b = v0 - omega;
            return 1.0 + (-1.0 + b * t) * decay;
        }

        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let a = -1.0;
        let b = (v0 + zeta * omega * a) / omega_d;
        1.0 + decay * (a * (omega_d * t).cos() + b * (omega_d * t).sin())
    }

    /// Progress running backwards: 1.0 at rest, 0.0 once hidden.
    pub fn retract(&self, elapsed: Duration) -> f32 {
        1.0 - self.progress(elapsed)
    }
}

/// Linear 0.0 → 1.0 ramp, used for fades.
pub fn linear(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// All phase delays and animation durations.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    pub start_delay: Duration,
    pub reveal_newest_delay: Duration,
    pub tray_reveal_delay: Duration,
    pub tray_hide_delay: Duration,
    pub spring: Spring,
    pub keyboard_show: Duration,
    pub keyboard_hide: Duration,
    pub cancel_fade: Duration,
    pub row_fade: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_millis(250),
            reveal_newest_delay: Duration::from_millis(500),
            tray_reveal_delay: Duration::from_millis(50),
            tray_hide_delay: Duration::from_millis(100),
            spring: Spring::default(),
            keyboard_show: Duration::from_millis(450),
            keyboard_hide: Duration::from_millis(700),
            cancel_fade: Duration::from_millis(350),
            row_fade: Duration::from_millis(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn pops_in_due_order_then_insertion_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(100), Phase::KeyboardSettled);
        timeline.schedule(ms(50), Phase::StartFlow);
        timeline.schedule(ms(100), Phase::CancelFadeComplete);

        assert_eq!(timeline.pop_due(ms(200)), Some(Phase::StartFlow));
        assert_eq!(timeline.pop_due(ms(200)), Some(Phase::KeyboardSettled));
        assert_eq!(timeline.pop_due(ms(200)), Some(Phase::CancelFadeComplete));
        assert_eq!(timeline.pop_due(ms(200)), None);
        assert_eq!(timeline.now(), ms(200));
    }

    #[test]
    fn nothing_due_before_its_time() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(250), Phase::StartFlow);
        assert_eq!(timeline.pop_due(ms(249)), None);
        assert_eq!(timeline.pop_due(ms(250)), Some(Phase::StartFlow));
    }

    #[test]
    fn follow_ups_are_timed_from_parent_due_time() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(50), Phase::TrayRevealBegin { generation: 1 });

        // Observed late, at 1s.
        let phase = timeline.pop_due(ms(1000));
        assert_eq!(phase, Some(Phase::TrayRevealBegin { generation: 1 }));
        assert_eq!(timeline.now(), ms(50));

        timeline.schedule(ms(700), Phase::TrayRevealComplete { generation: 1 });
        assert_eq!(timeline.next_due(), Some(ms(750)));
        assert_eq!(
            timeline.pop_due(ms(1000)),
            Some(Phase::TrayRevealComplete { generation: 1 })
        );
    }

    #[test]
    fn cancel_all_clears_pending() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(10), Phase::StartFlow);
        timeline.schedule(ms(20), Phase::KeyboardSettled);
        assert_eq!(timeline.cancel_all(), 2);
        assert!(timeline.is_idle());
        assert_eq!(timeline.pop_due(ms(100)), None);
    }

    #[test]
    fn spring_starts_at_zero_and_settles_at_one() {
        let spring = Spring::default();
        assert!(spring.progress(Duration::ZERO).abs() < 1e-4);
        assert_eq!(spring.progress(spring.duration), 1.0);
        assert_eq!(spring.progress(ms(5000)), 1.0);
    }

    #[test]
    fn underdamped_spring_overshoots() {
        let spring = Spring::default();
        let peak = (0..700)
            .step_by(5)
            .map(|t| spring.progress(ms(t)))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "expected overshoot, peak was {peak}");
        assert!(peak < 1.3, "overshoot should be slight, peak was {peak}");
    }

    #[test]
    fn critically_damped_spring_is_monotonic_enough() {
        let spring = Spring {
            damping_ratio: 1.0,
            ..Spring::default()
        };
        assert!(spring.progress(ms(350)) > 0.5);
        assert_eq!(spring.progress(ms(700)), 1.0);
    }

    #[test]
    fn retract_mirrors_progress() {
        let spring = Spring::default();
        assert!((spring.retract(Duration::ZERO) - 1.0).abs() < 1e-4);
        assert_eq!(spring.retract(spring.duration), 0.0);
    }

    #[test]
    fn linear_ramp_clamps() {
        assert_eq!(linear(ms(0), ms(350)), 0.0);
        assert_eq!(linear(ms(700), ms(350)), 1.0);
        assert_eq!(linear(ms(10), Duration::ZERO), 1.0);
    }
}
