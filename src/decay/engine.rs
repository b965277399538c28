//! Per-round decay timer
//!
//! Drives progress 0 to 1 over a fixed duration. The host environment owns the
//! frame callback (requestAnimationFrame, a game loop, a test harness) and
//! calls [`DecayEngine::tick`] with the current wall-clock time; pausing means
//! the host stops ticking and a stray late tick is a no-op.
//!
//! Progress is always `(now - anchor) + accumulated` over duration, so a
//! paused engine never "catches up" on resume and frame-rate variance cannot
//! drift it.

use super::curve::DecayCurve;

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// What one tick produced
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    /// Curved progress in [0, 1]
    pub progress: f32,
    /// Linear elapsed fraction in [0, 1]
    pub raw_progress: f32,
    /// Milestone thresholds crossed on this tick (each fires once per run)
    pub crossed: Vec<f32>,
    /// True exactly once, on the tick that reached raw progress 1
    pub completed: bool,
}

/// Wall-clock-anchored decay timer for one active page
#[derive(Debug, Clone)]
pub struct DecayEngine {
    duration_ms: f64,
    curve: DecayCurve,
    state: EngineState,
    /// Wall-clock ms of the most recent start/resume
    anchor_ms: f64,
    /// Elapsed ms folded in across pauses
    accumulated_ms: f64,
    /// Last published curved progress (monotonic within a run)
    progress: f32,
    milestones: Vec<Milestone>,
}

#[derive(Debug, Clone)]
struct Milestone {
    threshold: f32,
    fired: bool,
}

impl DecayEngine {
    /// Create an engine for the given duration and curve. Registers the
    /// standard 25/50/75/100% milestones.
    pub fn new(duration_secs: u32, curve: DecayCurve) -> Self {
        let mut engine = Self {
            duration_ms: f64::from(duration_secs.max(1)) * 1000.0,
            curve,
            state: EngineState::Idle,
            anchor_ms: 0.0,
            accumulated_ms: 0.0,
            progress: 0.0,
            milestones: Vec::new(),
        };
        for threshold in [0.25, 0.5, 0.75, 1.0] {
            engine.add_milestone(threshold);
        }
        engine
    }

    /// Register an additional milestone threshold (fires once per run).
    pub fn add_milestone(&mut self, threshold: f32) {
        self.milestones.push(Milestone { threshold, fired: false });
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Last published curved progress
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.state == EngineState::Completed
    }

    /// Seconds of decay left at the last published progress
    pub fn remaining_secs(&self) -> f32 {
        (self.duration_ms as f32 / 1000.0) * (1.0 - self.progress).max(0.0)
    }

    /// Begin a run. Resets the accumulator and fired milestones.
    pub fn start(&mut self, now_ms: f64) {
        self.anchor_ms = now_ms;
        self.accumulated_ms = 0.0;
        self.progress = 0.0;
        for m in &mut self.milestones {
            m.fired = false;
        }
        self.state = EngineState::Running;
    }

    /// Fold elapsed time into the accumulator and stop. No-op unless Running.
    pub fn pause(&mut self, now_ms: f64) {
        if self.state != EngineState::Running {
            return;
        }
        self.accumulated_ms += (now_ms - self.anchor_ms).max(0.0);
        self.state = EngineState::Paused;
    }

    /// Re-anchor and continue. No-op unless Paused.
    pub fn resume(&mut self, now_ms: f64) {
        if self.state != EngineState::Paused {
            return;
        }
        self.anchor_ms = now_ms;
        self.state = EngineState::Running;
    }

    /// Back to Idle, zeroing all run state.
    pub fn reset(&mut self) {
        self.anchor_ms = 0.0;
        self.accumulated_ms = 0.0;
        self.progress = 0.0;
        for m in &mut self.milestones {
            m.fired = false;
        }
        self.state = EngineState::Idle;
    }

    /// Advance to the current wall-clock time. Returns `None` unless Running,
    /// so a frame callback that straggles in after pause/reset does nothing.
    pub fn tick(&mut self, now_ms: f64) -> Option<TickOutput> {
        if self.state != EngineState::Running {
            return None;
        }

        let elapsed = (now_ms - self.anchor_ms).max(0.0) + self.accumulated_ms;
        let raw = (elapsed / self.duration_ms).min(1.0) as f32;
        // Monotonic within a run even if the host clock misbehaves
        let curved = self.curve.apply(raw).max(self.progress);
        self.progress = curved;

        let mut crossed = Vec::new();
        for m in &mut self.milestones {
            if !m.fired && curved >= m.threshold {
                m.fired = true;
                crossed.push(m.threshold);
            }
        }

        let completed = raw >= 1.0;
        if completed {
            self.state = EngineState::Completed;
        }

        Some(TickOutput {
            progress: curved,
            raw_progress: raw,
            crossed,
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_from_wall_clock() {
        let mut engine = DecayEngine::new(20, DecayCurve::Linear);
        engine.start(1000.0);
        let out = engine.tick(11_000.0).unwrap();
        assert!((out.raw_progress - 0.5).abs() < 1e-6);
        assert!((out.progress - 0.5).abs() < 1e-6);
        assert!(!out.completed);
    }

    #[test]
    fn test_cubic_curve_at_half() {
        // Duration 20s, ease-in-cubic, elapsed 10s
        let mut engine = DecayEngine::new(20, DecayCurve::EaseInCubic);
        engine.start(0.0);
        let out = engine.tick(10_000.0).unwrap();
        assert!((out.raw_progress - 0.5).abs() < 1e-6);
        assert!((out.progress - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_pause_does_not_catch_up() {
        let mut engine = DecayEngine::new(10, DecayCurve::Linear);
        engine.start(0.0);
        engine.tick(2_000.0);
        engine.pause(2_000.0);

        // Ticks while paused do nothing
        assert!(engine.tick(7_000.0).is_none());
        assert!((engine.progress() - 0.2).abs() < 1e-6);

        // Resume 5s later: elapsed stays at 2s, not 7s
        engine.resume(7_000.0);
        let out = engine.tick(8_000.0).unwrap();
        assert!((out.raw_progress - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_milestones_fire_once() {
        let mut engine = DecayEngine::new(10, DecayCurve::Linear);
        engine.start(0.0);

        let out = engine.tick(6_000.0).unwrap();
        assert_eq!(out.crossed, vec![0.25, 0.5]);

        // Re-tick past the same thresholds: nothing new
        let out = engine.tick(6_500.0).unwrap();
        assert!(out.crossed.is_empty());

        let out = engine.tick(10_000.0).unwrap();
        assert_eq!(out.crossed, vec![0.75, 1.0]);
        assert!(out.completed);
        assert!(engine.is_complete());
    }

    #[test]
    fn test_restart_refires_milestones() {
        let mut engine = DecayEngine::new(10, DecayCurve::Linear);
        engine.start(0.0);
        engine.tick(10_000.0);
        assert!(engine.is_complete());

        engine.start(20_000.0);
        assert_eq!(engine.state(), EngineState::Running);
        let out = engine.tick(23_000.0).unwrap();
        assert_eq!(out.crossed, vec![0.25]);
    }

    #[test]
    fn test_monotonic_progress() {
        let mut engine = DecayEngine::new(10, DecayCurve::EaseIn);
        engine.start(0.0);
        let mut prev = 0.0;
        for ms in (0..=10_000).step_by(137) {
            if let Some(out) = engine.tick(ms as f64) {
                assert!(out.progress >= prev);
                prev = out.progress;
            }
        }
    }

    #[test]
    fn test_reset_to_idle() {
        let mut engine = DecayEngine::new(10, DecayCurve::Linear);
        engine.start(0.0);
        engine.tick(5_000.0);
        engine.reset();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.progress(), 0.0);
        assert!(engine.tick(6_000.0).is_none());
    }

    #[test]
    fn test_pause_invalid_states_noop() {
        let mut engine = DecayEngine::new(10, DecayCurve::Linear);
        engine.pause(100.0); // Idle: no-op
        assert_eq!(engine.state(), EngineState::Idle);
        engine.resume(100.0); // not paused: no-op
        assert_eq!(engine.state(), EngineState::Idle);
    }
}
