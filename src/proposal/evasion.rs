//! Evasion generator for the rejection control.
//!
//! Picks a fresh on-screen spot for the floating "no" button. Positions are
//! independent draws; repeats are allowed.

use rand::Rng;

/// Viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    // NaN, infinities and negatives collapse to an empty viewport.
    fn sanitized(self) -> (f64, f64) {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        (clean(self.width), clean(self.height))
    }
}

/// Top-left corner of the floating control.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Fixed footprint of the control plus the margin it keeps from the edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for Footprint {
    fn default() -> Self {
        Self { width: 160.0, height: 60.0, padding: 20.0 }
    }
}

impl Footprint {
    /// Largest coordinates that keep the control fully visible.
    pub fn limits(&self, viewport: Viewport) -> (f64, f64) {
        let (w, h) = viewport.sanitized();
        ((w - self.width).max(0.0), (h - self.height).max(0.0))
    }
}

/// Draw a new position: `uniform(0, max(0, max - P)) + P` per axis, where
/// `max = extent - size - P`, then clamp into `[0, extent - size]`.
pub fn evade<R: Rng>(viewport: Viewport, footprint: Footprint, rng: &mut R) -> Position {
    let (w, h) = viewport.sanitized();
    let pad = footprint.padding.max(0.0);
    let (limit_x, limit_y) = footprint.limits(viewport);

    let axis = |extent: f64, size: f64, limit: f64, rng: &mut R| -> f64 {
        let max = extent - size - pad;
        let span = (max - pad).max(0.0);
        let raw = rng.r#gen::<f64>() * span + pad;
        raw.clamp(0.0, limit)
    };

    let x = axis(w, footprint.width, limit_x, rng);
    let y = axis(h, footprint.height, limit_y, rng);
    Position { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_on_screen(p: Position, vp: Viewport, fp: Footprint) {
        let (lx, ly) = fp.limits(vp);
        assert!(p.x >= 0.0 && p.x <= lx, "x {} outside [0, {}] for {:?}", p.x, lx, vp);
        assert!(p.y >= 0.0 && p.y <= ly, "y {} outside [0, {}] for {:?}", p.y, ly, vp);
    }

    #[test]
    fn stays_inside_padded_area_on_normal_screens() {
        let mut rng = StdRng::seed_from_u64(7);
        let fp = Footprint::default();
        let vp = Viewport::new(1280.0, 720.0);
        for _ in 0..500 {
            let p = evade(vp, fp, &mut rng);
            assert!(p.x >= 20.0 && p.x <= 1280.0 - 160.0 - 20.0);
            assert!(p.y >= 20.0 && p.y <= 720.0 - 60.0 - 20.0);
        }
    }

    #[test]
    fn degenerate_viewports_clamp_to_zero() {
        let mut rng = StdRng::seed_from_u64(11);
        let fp = Footprint::default();
        for vp in [
            Viewport::new(100.0, 40.0),
            Viewport::new(0.0, 0.0),
            Viewport::new(170.0, 70.0),
            Viewport::new(-5.0, f64::NAN),
            Viewport::new(f64::INFINITY, 30.0),
        ] {
            for _ in 0..50 {
                let p = evade(vp, fp, &mut rng);
                assert_on_screen(p, vp, fp);
            }
        }
        let p = evade(Viewport::new(100.0, 40.0), fp, &mut rng);
        assert_eq!(p, Position { x: 0.0, y: 0.0 });
    }

    #[test]
    fn narrow_but_not_degenerate_viewport_sits_at_limit() {
        // No room for a random span, but the padded spot still fits.
        let mut rng = StdRng::seed_from_u64(3);
        let p = evade(Viewport::new(190.0, 90.0), Footprint::default(), &mut rng);
        assert_eq!(p.x, 20.0);
        assert_eq!(p.y, 20.0);
    }
}
