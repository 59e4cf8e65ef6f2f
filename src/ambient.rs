//! Decorative ambient layer: static ornaments plus a slow field of rising
//! hearts and sparkles.
//!
//! Particle parameters are drawn once per mount. Stepping is deterministic
//! apart from the new x picked when a particle re-enters from the bottom.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::proposal::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Heart,
    Sparkle,
}

impl ParticleKind {
    pub fn asset(self) -> &'static str {
        match self {
            ParticleKind::Heart => "particle_heart.png",
            ParticleKind::Sparkle => "particle_sparkle.png",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed_y: f64,
    pub speed_x: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub opacity: f64,
    pub kind: ParticleKind,
}

impl Particle {
    /// Fresh particle somewhere below the visible area.
    pub fn spawn<R: Rng>(viewport: Viewport, rng: &mut R) -> Self {
        let kind = if rng.r#gen::<f64>() > 0.3 { ParticleKind::Heart } else { ParticleKind::Sparkle };
        Self {
            x: rng.r#gen::<f64>() * viewport.width,
            y: rng.r#gen::<f64>() * viewport.height + viewport.height,
            size: 20.0 + rng.r#gen::<f64>() * 20.0,
            speed_y: 0.3 + rng.r#gen::<f64>() * 0.5,
            speed_x: (rng.r#gen::<f64>() - 0.5) * 0.3,
            rotation: rng.r#gen::<f64>() * PI * 2.0,
            rotation_speed: (rng.r#gen::<f64>() - 0.5) * 0.02,
            opacity: 0.15 + rng.r#gen::<f64>() * 0.2,
            kind,
        }
    }
}

/// `min(cap, floor(width / spacing))`, never negative.
pub fn particle_count(viewport_width: f64, spacing: f64, cap: usize) -> usize {
    if !viewport_width.is_finite() || viewport_width <= 0.0 || spacing <= 0.0 {
        return 0;
    }
    ((viewport_width / spacing).floor() as usize).min(cap)
}

/// The rising particle field drawn on the background canvas.
#[derive(Clone, Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn generate<R: Rng>(viewport: Viewport, spacing: f64, cap: usize, rng: &mut R) -> Self {
        let n = particle_count(viewport.width, spacing, cap);
        let particles = (0..n).map(|_| Particle::spawn(viewport, rng)).collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance one frame. `now_ms` feeds the sideways sine drift.
    pub fn step<R: Rng>(&mut self, now_ms: f64, viewport: Viewport, rng: &mut R) {
        for (i, p) in self.particles.iter_mut().enumerate() {
            p.y -= p.speed_y;
            p.x += p.speed_x + (now_ms * 0.001 + i as f64).sin() * 0.1;
            p.rotation = (p.rotation + p.rotation_speed).rem_euclid(TAU);

            // off the top: re-enter from the bottom
            if p.y < -p.size {
                p.y = viewport.height + p.size;
                p.x = rng.r#gen::<f64>() * viewport.width;
            }
            if p.x < -p.size {
                p.x = viewport.width + p.size;
            } else if p.x > viewport.width + p.size {
                p.x = -p.size;
            }
        }
    }
}

/// Static ornament placed once in the background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ornament {
    pub id: &'static str,
    pub asset: &'static str,
    /// Inline CSS placement, e.g. `top:5%;left:3%`.
    pub placement: &'static str,
    pub rotation_deg: f64,
    pub width_px: u32,
    pub opacity: f64,
}

pub const ORNAMENTS: &[Ornament] = &[
    Ornament {
        id: "bow-top-left",
        asset: "deco_bow.png",
        placement: "top:5%;left:3%",
        rotation_deg: -15.0,
        width_px: 96,
        opacity: 0.6,
    },
    Ornament {
        id: "cherries-top-right",
        asset: "deco_cherries.png",
        placement: "top:8%;right:5%",
        rotation_deg: 10.0,
        width_px: 64,
        opacity: 0.6,
    },
    Ornament {
        id: "envelope-bottom-left",
        asset: "deco_envelope.png",
        placement: "bottom:10%;left:5%",
        rotation_deg: -8.0,
        width_px: 112,
        opacity: 0.5,
    },
    Ornament {
        id: "stamp-bottom-right",
        asset: "deco_stamp.png",
        placement: "bottom:15%;right:8%",
        rotation_deg: 12.0,
        width_px: 80,
        opacity: 0.5,
    },
];

impl Ornament {
    pub fn style(&self) -> String {
        format!(
            "position:absolute;{};width:{}px;opacity:{};transform:rotate({}deg);",
            self.placement, self.width_px, self.opacity, self.rotation_deg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn count_scales_with_width_and_caps() {
        assert_eq!(particle_count(0.0, 100.0, 15), 0);
        assert_eq!(particle_count(375.0, 100.0, 15), 3);
        assert_eq!(particle_count(1000.0, 100.0, 15), 10);
        assert_eq!(particle_count(3840.0, 100.0, 15), 15);
        assert_eq!(particle_count(f64::NAN, 100.0, 15), 0);
    }

    #[test]
    fn spawned_parameters_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let vp = Viewport::new(1200.0, 800.0);
        let field = ParticleField::generate(vp, 100.0, 15, &mut rng);
        assert_eq!(field.len(), 12);
        for p in field.particles() {
            assert!((0.0..=1200.0).contains(&p.x));
            assert!((800.0..=1600.0).contains(&p.y));
            assert!((20.0..=40.0).contains(&p.size));
            assert!((0.3..=0.8).contains(&p.speed_y));
            assert!(p.speed_x.abs() <= 0.15);
            assert!(p.rotation_speed.abs() <= 0.01);
            assert!((0.15..=0.35).contains(&p.opacity));
        }
    }

    #[test]
    fn wraps_from_top_to_bottom() {
        let mut rng = StdRng::seed_from_u64(2);
        let vp = Viewport::new(500.0, 400.0);
        let mut field = ParticleField {
            particles: vec![Particle {
                x: 250.0,
                y: -29.9,
                size: 30.0,
                speed_y: 0.5,
                speed_x: 0.0,
                rotation: 0.0,
                rotation_speed: 0.0,
                opacity: 0.2,
                kind: ParticleKind::Heart,
            }],
        };
        field.step(0.0, vp, &mut rng);
        let p = &field.particles()[0];
        assert_eq!(p.y, 430.0);
        assert!((0.0..=500.0).contains(&p.x));
    }

    #[test]
    fn wraps_horizontally_both_ways() {
        let mut rng = StdRng::seed_from_u64(4);
        let vp = Viewport::new(500.0, 400.0);
        let base = Particle {
            x: 0.0,
            y: 200.0,
            size: 20.0,
            speed_y: 0.0,
            speed_x: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            opacity: 0.2,
            kind: ParticleKind::Sparkle,
        };
        let mut field = ParticleField {
            particles: vec![
                Particle { x: -25.0, ..base.clone() },
                Particle { x: 525.0, ..base },
            ],
        };
        field.step(0.0, vp, &mut rng);
        assert_eq!(field.particles()[0].x, 520.0);
        assert_eq!(field.particles()[1].x, -20.0);
    }

    #[test]
    fn long_runs_keep_particles_near_the_viewport() {
        let mut rng = StdRng::seed_from_u64(8);
        let vp = Viewport::new(900.0, 600.0);
        let mut field = ParticleField::generate(vp, 100.0, 15, &mut rng);
        for frame in 0..20_000 {
            field.step(frame as f64 * 16.0, vp, &mut rng);
        }
        for p in field.particles() {
            assert!(p.x >= -p.size - 1.0 && p.x <= 900.0 + p.size + 1.0);
            assert!(p.y >= -p.size - 1.0 && p.y <= 1200.0 + p.size);
        }
    }

    #[test]
    fn ornament_style_includes_rotation() {
        let style = ORNAMENTS[0].style();
        assert!(style.contains("top:5%;left:3%"));
        assert!(style.contains("rotate(-15deg)"));
    }
}
