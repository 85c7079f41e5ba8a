//=========================================================================
// Time
//=========================================================================
//
// Frame pacing and elapsed-time bookkeeping.
//
// Architecture:
//   Clock        → tick(target_fps) → bounded dt (seconds)
//   TimeManager  → update(dt)       → elapsed / last dt
//
// The engine owns one Clock and two TimeManagers: global time and
// "time since scene entry", the latter reset on every transition.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

//=== Internal Dependencies ===============================================

use crate::core::EngineError;

//=== Constants ===========================================================

/// Upper bound on a single frame delta.
///
/// A stalled frame (debugger, window drag, disk hiccup) reports at most
/// this much time, so simulation never tries to catch up in one step.
pub const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

//=== Clock ===============================================================

/// Paces the frame loop and measures bounded frame deltas.
#[derive(Debug)]
pub struct Clock {
    last_tick: Option<Instant>,
    max_delta: Duration,
}

impl Clock {
    /// Creates a clock with the default delta cap.
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_FRAME_DELTA)
    }

    /// Creates a clock whose reported delta never exceeds `max_delta`.
    pub fn with_max_delta(max_delta: Duration) -> Self {
        Self {
            last_tick: None,
            max_delta,
        }
    }

    /// Returns the configured delta cap.
    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }

    //--- tick() -----------------------------------------------------------
    //
    // Sleeps for whatever is left of the frame budget, then reports the
    // real time since the previous tick, capped at `max_delta`.
    // The very first tick reports one nominal frame.
    //
    pub fn tick(&mut self, target_fps: f64) -> Result<f32, EngineError> {
        let frame_duration = frame_duration(target_fps)?;

        let Some(last) = self.last_tick else {
            self.last_tick = Some(Instant::now());
            return Ok(frame_duration.min(self.max_delta).as_secs_f32());
        };

        let elapsed = last.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }

        let now = Instant::now();
        let delta = now.duration_since(last).min(self.max_delta);
        self.last_tick = Some(now);

        Ok(delta.as_secs_f32())
    }
}

/// Length of one frame at `target_fps`.
///
/// Fails for non-finite or non-positive rates, and for rates so small
/// that the frame length is not representable.
pub fn frame_duration(target_fps: f64) -> Result<Duration, EngineError> {
    if !target_fps.is_finite() || target_fps <= 0.0 {
        return Err(EngineError::Configuration(format!(
            "target fps must be positive, got {}",
            target_fps
        )));
    }
    Duration::try_from_secs_f64(1.0 / target_fps).map_err(|_| {
        EngineError::Configuration(format!("target fps {} is too small", target_fps))
    })
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

//=== TimeManager =========================================================

/// Accumulates elapsed time from per-frame deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeManager {
    elapsed: f64,
    dt: f32,
}

impl TimeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances by `dt` seconds. Negative or NaN deltas count as zero.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.dt = dt;
        self.elapsed += f64::from(dt);
    }

    /// Zeroes elapsed time. The last delta is kept.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Seconds accumulated since creation or the last reset.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Delta passed to the most recent `update`.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Clock ------------------------------------------------------------

    #[test]
    fn tick_rejects_zero_fps() {
        let mut clock = Clock::new();
        assert!(matches!(clock.tick(0.0), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn tick_rejects_negative_and_nan_fps() {
        let mut clock = Clock::new();
        assert!(matches!(clock.tick(-60.0), Err(EngineError::Configuration(_))));
        assert!(matches!(clock.tick(f64::NAN), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn tick_rejects_unrepresentable_fps() {
        let mut clock = Clock::new();
        assert!(matches!(clock.tick(1e-30), Err(EngineError::Configuration(_))));
        assert!(matches!(frame_duration(f64::MIN_POSITIVE), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn frame_duration_matches_rate() {
        assert_eq!(frame_duration(50.0).unwrap(), Duration::from_millis(20));
    }

    #[test]
    fn first_tick_reports_nominal_frame() {
        let mut clock = Clock::new();
        let dt = clock.tick(50.0).unwrap();
        assert!((dt - 0.02).abs() < 1e-6);
    }

    #[test]
    fn tick_is_capped_after_a_stall() {
        let mut clock = Clock::with_max_delta(Duration::from_millis(5));
        clock.tick(1000.0).unwrap();
        thread::sleep(Duration::from_millis(30));
        let dt = clock.tick(1000.0).unwrap();
        assert!(dt <= 0.005 + 1e-6, "dt {} exceeds cap", dt);
    }

    #[test]
    fn tick_waits_for_frame_budget() {
        let mut clock = Clock::new();
        clock.tick(100.0).unwrap();
        let dt = clock.tick(100.0).unwrap();
        assert!(dt >= 0.009, "dt {} shorter than the frame budget", dt);
    }

    //--- TimeManager ------------------------------------------------------

    #[test]
    fn update_accumulates_elapsed() {
        let mut tm = TimeManager::new();
        tm.update(0.5);
        tm.update(0.25);
        assert!((tm.elapsed() - 0.75).abs() < 1e-9);
        assert_eq!(tm.dt(), 0.25);
    }

    #[test]
    fn elapsed_never_decreases() {
        let mut tm = TimeManager::new();
        let mut previous = tm.elapsed();
        for dt in [0.016, -1.0, 0.0, f32::NAN, 0.033, -0.5, 0.1] {
            tm.update(dt);
            assert!(tm.elapsed() >= previous);
            assert!(tm.elapsed() >= 0.0);
            previous = tm.elapsed();
        }
    }

    #[test]
    fn reset_zeroes_elapsed_but_keeps_dt() {
        let mut tm = TimeManager::new();
        tm.update(0.1);
        tm.reset();
        assert_eq!(tm.elapsed(), 0.0);
        assert_eq!(tm.dt(), 0.1);
    }
}
