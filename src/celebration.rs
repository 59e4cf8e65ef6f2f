//! Celebration burst schedule.
//!
//! Entering the accepted view starts a short, fixed sequence: mirrored side
//! cannons streaming for the first three seconds, a heart burst from the
//! center at 400 ms and a wide finale at 700 ms. The sequencer is a pure
//! timeline; the web layer feeds it animation-frame timestamps and forwards
//! whatever it returns to the confetti library.

use tracing::debug;

pub const CONFETTI_PINKS: &[&str] = &["#ff0a54", "#ff477e", "#ff7096", "#ff85a1", "#fbb1bd"];
pub const HEART_COLORS: &[&str] = &["#FF0000", "#FF69B4", "#FFF"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Default,
    Heart,
}

/// One call into the confetti library.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    pub particle_count: u32,
    /// Launch angle in degrees (90 = straight up).
    pub angle: f64,
    pub spread: f64,
    /// Origin as viewport fractions; `None` lets the library pick its default.
    pub origin_x: Option<f64>,
    pub origin_y: Option<f64>,
    pub shape: Shape,
    pub colors: &'static [&'static str],
}

pub const LEFT_CANNON: Burst = Burst {
    particle_count: 5,
    angle: 60.0,
    spread: 55.0,
    origin_x: Some(0.0),
    origin_y: None,
    shape: Shape::Default,
    colors: CONFETTI_PINKS,
};

pub const RIGHT_CANNON: Burst = Burst {
    particle_count: 5,
    angle: 120.0,
    spread: 55.0,
    origin_x: Some(1.0),
    origin_y: None,
    shape: Shape::Default,
    colors: CONFETTI_PINKS,
};

/// A burst fired once at a fixed offset from the start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledBurst {
    pub at_ms: f64,
    pub burst: Burst,
}

pub const SCHEDULE: &[ScheduledBurst] = &[
    ScheduledBurst {
        at_ms: 400.0,
        burst: Burst {
            particle_count: 100,
            angle: 90.0,
            spread: 70.0,
            origin_x: None,
            origin_y: Some(0.6),
            shape: Shape::Heart,
            colors: HEART_COLORS,
        },
    },
    ScheduledBurst {
        at_ms: 700.0,
        burst: Burst {
            particle_count: 150,
            angle: 90.0,
            spread: 120.0,
            origin_x: None,
            origin_y: Some(0.5),
            shape: Shape::Default,
            colors: CONFETTI_PINKS,
        },
    },
];

/// How long the side cannons keep streaming.
pub const STREAM_MS: f64 = 3000.0;

/// Walks the burst timeline. The first `advance` call marks t = 0.
#[derive(Clone, Debug)]
pub struct CelebrationSequencer {
    start_ms: Option<f64>,
    last_elapsed: f64,
    fired: Vec<bool>,
    cancelled: bool,
}

impl Default for CelebrationSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl CelebrationSequencer {
    pub fn new() -> Self {
        Self { start_ms: None, last_elapsed: 0.0, fired: vec![false; SCHEDULE.len()], cancelled: false }
    }

    /// Bursts due at `now_ms`: the cannon pair while streaming, plus every
    /// scheduled burst whose offset has passed and that has not fired yet.
    pub fn advance(&mut self, now_ms: f64) -> Vec<Burst> {
        if self.cancelled {
            return Vec::new();
        }
        let start = *self.start_ms.get_or_insert(now_ms);
        // Timestamps going backwards (tab restore, clock skew) never rewind the timeline.
        let elapsed = (now_ms - start).max(self.last_elapsed);
        self.last_elapsed = elapsed;

        let mut due = Vec::new();
        if elapsed < STREAM_MS {
            due.push(LEFT_CANNON);
            due.push(RIGHT_CANNON);
        }
        for (fired, scheduled) in self.fired.iter_mut().zip(SCHEDULE) {
            if !*fired && elapsed >= scheduled.at_ms {
                *fired = true;
                debug!(at_ms = scheduled.at_ms, count = scheduled.burst.particle_count, "celebration burst");
                due.push(scheduled.burst);
            }
        }
        due
    }

    pub fn is_finished(&self) -> bool {
        self.cancelled
            || (self.last_elapsed >= STREAM_MS && self.fired.iter().all(|f| *f))
    }

    /// Stop for good; every later `advance` yields nothing.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_fires_mirrored_cannons_only() {
        let mut seq = CelebrationSequencer::new();
        let due = seq.advance(5_000.0);
        assert_eq!(due, vec![LEFT_CANNON, RIGHT_CANNON]);
        assert_eq!(LEFT_CANNON.angle + RIGHT_CANNON.angle, 180.0);
    }

    #[test]
    fn scheduled_bursts_fire_exactly_once() {
        let mut seq = CelebrationSequencer::new();
        let mut hearts = 0;
        let mut finales = 0;
        let mut t = 0.0;
        while t <= 4_000.0 {
            for b in seq.advance(t) {
                match b.particle_count {
                    100 => hearts += 1,
                    150 => finales += 1,
                    _ => {}
                }
            }
            t += 16.0;
        }
        assert_eq!(hearts, 1);
        assert_eq!(finales, 1);
        assert!(seq.is_finished());
    }

    #[test]
    fn a_late_frame_catches_up_on_missed_bursts() {
        let mut seq = CelebrationSequencer::new();
        seq.advance(0.0);
        let due = seq.advance(900.0);
        assert_eq!(due.len(), 4);
        assert_eq!(due[2].shape, Shape::Heart);
    }

    #[test]
    fn stream_stops_after_three_seconds() {
        let mut seq = CelebrationSequencer::new();
        seq.advance(0.0);
        seq.advance(1_000.0);
        assert!(!seq.is_finished());
        assert!(seq.advance(3_000.0).is_empty());
        assert!(seq.is_finished());
    }

    #[test]
    fn cancel_silences_everything() {
        let mut seq = CelebrationSequencer::new();
        seq.advance(0.0);
        seq.cancel();
        assert!(seq.is_finished());
        for t in [16.0, 400.0, 700.0, 2_000.0] {
            assert!(seq.advance(t).is_empty());
        }
    }

    #[test]
    fn clock_going_backwards_does_not_refire() {
        let mut seq = CelebrationSequencer::new();
        seq.advance(100.0);
        let late = seq.advance(600.0);
        assert!(late.iter().any(|b| b.shape == Shape::Heart));
        let rewound = seq.advance(200.0);
        assert!(rewound.iter().all(|b| b.shape != Shape::Heart));
    }
}
