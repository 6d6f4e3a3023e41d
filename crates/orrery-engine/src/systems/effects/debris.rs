//! Looping debris trail around an orbiting body.
//!
//! Unlike flares, debris never dies: each mote carries a phase that advances
//! by a fixed amount per tick and wraps back to zero, restarting its path.

use glam::Vec3;
use std::f32::consts::TAU;

use super::rng::Rng;
use crate::renderer::instance::InstanceTransform;

/// One looping mote. Everything except `phase` is fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebrisMote {
    /// Position along the loop, in [0, 1).
    pub phase: f32,
    /// Phase advance per tick.
    pub speed: f32,
    /// Random local offset from the body center.
    pub offset: Vec3,
    /// Size at phase 0.
    pub base_scale: f32,
}

/// Trail of motes owned by one body. Positions are in the body's orbital frame.
#[derive(Debug, Clone)]
pub struct DebrisTrail {
    motes: Vec<DebrisMote>,
    /// Trail length scale: `2.5 * radius_scale * 1.5`.
    spread: f32,
    color: [f32; 3],
}

impl DebrisTrail {
    /// Sway amplitude as a fraction of `spread`.
    const SWAY: f32 = 0.2;

    pub fn new(count: usize, radius_scale: f32, color: [f32; 3], rng: &mut Rng) -> Self {
        let motes = (0..count)
            .map(|_| DebrisMote {
                phase: rng.next_f32(),
                speed: rng.range(0.005, 0.015),
                offset: Vec3::new(
                    rng.range(-0.5, 0.5) * radius_scale,
                    rng.range(-0.5, 0.5) * radius_scale,
                    rng.range(-0.5, 0.5) * radius_scale,
                ),
                base_scale: rng.range(0.1, 0.5),
            })
            .collect();
        Self {
            motes,
            spread: 2.5 * radius_scale * 1.5,
            color,
        }
    }

    pub fn len(&self) -> usize {
        self.motes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motes.is_empty()
    }

    pub fn motes(&self) -> &[DebrisMote] {
        &self.motes
    }

    /// Advance every mote one step, wrapping phases that reach 1.
    pub fn tick(&mut self) {
        for m in &mut self.motes {
            m.phase += m.speed;
            if m.phase >= 1.0 {
                m.phase = 0.0;
            }
        }
    }

    /// Local-space position of a mote: offset, circular sway, and a linear
    /// drift behind the body (negative z).
    pub fn local_position(&self, m: &DebrisMote) -> Vec3 {
        let angle = m.phase * TAU;
        let sway = self.spread * Self::SWAY;
        Vec3::new(
            m.offset.x + angle.sin() * sway,
            m.offset.y + angle.cos() * sway,
            m.offset.z - m.phase * self.spread,
        )
    }

    /// Shrinks linearly to nothing as the phase approaches 1.
    pub fn mote_scale(m: &DebrisMote) -> f32 {
        m.base_scale * (1.0 - m.phase)
    }

    /// Write one transform per mote. `to_world` maps the body's local frame
    /// into world space.
    pub fn write(&self, out: &mut [InstanceTransform], to_world: impl Fn(Vec3) -> Vec3) {
        for (slot, m) in out.iter_mut().zip(&self.motes) {
            *slot = InstanceTransform::new(
                to_world(self.local_position(m)),
                Self::mote_scale(m),
                Vec3::ZERO,
                self.color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trail() -> DebrisTrail {
        DebrisTrail::new(40, 1.2, [0.2, 0.5, 0.8], &mut Rng::new(9))
    }

    #[test]
    fn motes_start_in_range() {
        let t = trail();
        assert_eq!(t.len(), 40);
        for m in t.motes() {
            assert!((0.0..1.0).contains(&m.phase));
            assert!(m.speed >= 0.005 && m.speed < 0.015);
            assert!(m.offset.abs().max_element() <= 0.6);
        }
    }

    #[test]
    fn phase_wraps_and_stays_below_one() {
        let mut t = trail();
        let mut wrapped = false;
        for _ in 0..500 {
            let before: Vec<f32> = t.motes().iter().map(|m| m.phase).collect();
            t.tick();
            for (b, m) in before.iter().zip(t.motes()) {
                assert!((0.0..1.0).contains(&m.phase));
                if m.phase < *b {
                    assert_eq!(m.phase, 0.0);
                    wrapped = true;
                }
            }
        }
        assert!(wrapped);
    }

    #[test]
    fn scale_shrinks_with_phase() {
        let m = DebrisMote { phase: 0.0, speed: 0.01, offset: Vec3::ZERO, base_scale: 0.4 };
        let late = DebrisMote { phase: 0.75, ..m };
        assert!((DebrisTrail::mote_scale(&m) - 0.4).abs() < 1e-6);
        assert!((DebrisTrail::mote_scale(&late) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn motes_drift_behind_the_body() {
        let t = trail();
        let m = DebrisMote { phase: 0.5, speed: 0.01, offset: Vec3::ZERO, base_scale: 0.4 };
        let p = t.local_position(&m);
        assert!((p.z + 0.5 * 2.5 * 1.2 * 1.5).abs() < 1e-5);
    }

    #[test]
    fn write_applies_world_mapping() {
        let t = trail();
        let mut out = vec![InstanceTransform::HIDDEN; t.len()];
        t.write(&mut out, |local| local + Vec3::new(100.0, 0.0, 0.0));
        for (slot, m) in out.iter().zip(t.motes()) {
            let expected = t.local_position(m) + Vec3::new(100.0, 0.0, 0.0);
            assert!((Vec3::from(slot.position) - expected).length() < 1e-4);
        }
    }
}
