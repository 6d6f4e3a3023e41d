//! Fixed-capacity particle pool.
//!
//! Slots are allocated once at construction and reused forever. A slot is live
//! while `life > 0`; spawning into a full pool is dropped, not queued.

use glam::Vec3;

/// A single pooled particle. `life` runs from 1.0 at spawn down to 0.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Remaining normalized lifetime. `<= 0` means the slot is free.
    pub life: f32,
    /// Life units lost per second.
    pub fade_speed: f32,
    /// Spawn point in the emitter's local space.
    pub origin: Vec3,
    /// Spawn-time magnitude fed to the lifecycle curve.
    pub peak_scale: f32,
}

impl Particle {
    pub const DEAD: Particle = Particle {
        life: 0.0,
        fade_speed: 0.0,
        origin: Vec3::ZERO,
        peak_scale: 0.0,
    };

    #[inline]
    pub fn is_live(&self) -> bool {
        self.life > 0.0
    }

    /// Normalized age in [0, 1]: 0 at spawn, 1 at death.
    #[inline]
    pub fn age(&self) -> f32 {
        (1.0 - self.life).clamp(0.0, 1.0)
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::DEAD
    }
}

/// Fixed-size ordered collection of particle slots.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    live: usize,
    /// Lowest slot index that might be free.
    free_hint: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::DEAD; capacity],
            live: 0,
            free_hint: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn is_full(&self) -> bool {
        self.live >= self.slots.len()
    }

    /// Occupy the lowest free slot. Returns false (and does nothing) when
    /// every slot is live.
    pub fn spawn(&mut self, origin: Vec3, peak_scale: f32, fade_speed: f32) -> bool {
        if self.is_full() {
            return false;
        }
        let Some(offset) = self.slots[self.free_hint..].iter().position(|p| !p.is_live()) else {
            return false;
        };
        let idx = self.free_hint + offset;
        self.slots[idx] = Particle {
            life: 1.0,
            fade_speed,
            origin,
            peak_scale,
        };
        self.live += 1;
        self.free_hint = idx + 1;
        true
    }

    /// Age every live slot by `fade_speed * dt`. Slots that reach `life <= 0`
    /// are free as soon as this returns.
    pub fn tick(&mut self, dt: f32) {
        for (idx, p) in self.slots.iter_mut().enumerate() {
            if !p.is_live() {
                continue;
            }
            p.life -= p.fade_speed * dt;
            if !p.is_live() {
                p.life = 0.0;
                self.live -= 1;
                self.free_hint = self.free_hint.min(idx);
            }
        }
    }

    /// Live slots in slot-index order, with their indices.
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &Particle)> + '_ {
        self.slots.iter().enumerate().filter(|(_, p)| p.is_live())
    }

    /// Visit every live slot in slot-index order.
    pub fn for_each_live(&self, mut visitor: impl FnMut(usize, &Particle)) {
        for (idx, p) in self.iter_live() {
            visitor(idx, p);
        }
    }

    /// All slots, live and free, for dense batch rebuilds.
    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    /// Kill every particle without releasing storage.
    pub fn clear(&mut self) {
        self.slots.fill(Particle::DEAD);
        self.live = 0;
        self.free_hint = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_fills_lowest_free_slot() {
        let mut pool = ParticlePool::new(3);
        assert!(pool.spawn(Vec3::X, 4.0, 0.5));
        assert!(pool.spawn(Vec3::Y, 4.0, 0.5));
        let indices: Vec<usize> = pool.iter_live().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(pool.slots()[1].origin, Vec3::Y);
    }

    #[test]
    fn spawn_into_full_pool_is_noop() {
        let mut pool = ParticlePool::new(2);
        assert!(pool.spawn(Vec3::X, 1.0, 0.5));
        assert!(pool.spawn(Vec3::X, 1.0, 0.5));
        let before = pool.slots().to_vec();
        assert!(!pool.spawn(Vec3::Z, 9.0, 0.1));
        assert_eq!(pool.slots(), &before[..]);
        assert_eq!(pool.live_count(), 2);
    }

    #[test]
    fn dead_slot_is_reused_without_growth() {
        let mut pool = ParticlePool::new(2);
        pool.spawn(Vec3::X, 1.0, 10.0);
        pool.spawn(Vec3::Y, 1.0, 0.1);
        pool.tick(0.2); // slot 0 dies
        assert_eq!(pool.live_count(), 1);
        assert!(pool.spawn(Vec3::Z, 1.0, 0.1));
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.slots()[0].origin, Vec3::Z);
    }

    #[test]
    fn life_is_non_increasing() {
        let mut pool = ParticlePool::new(1);
        pool.spawn(Vec3::X, 1.0, 0.7);
        let mut last = pool.slots()[0].life;
        for _ in 0..200 {
            pool.tick(1.0 / 60.0);
            let life = pool.slots()[0].life;
            assert!(life <= last);
            last = life;
        }
        assert!(!pool.slots()[0].is_live());
    }

    #[test]
    fn particle_dies_after_expected_ticks() {
        let mut pool = ParticlePool::new(1);
        pool.spawn(Vec3::X, 5.0, 0.5);
        let mut ticks = 0;
        while pool.live_count() > 0 {
            pool.tick(1.0 / 60.0);
            ticks += 1;
            assert!(ticks < 1000, "particle never died");
        }
        assert!((119..=121).contains(&ticks), "died after {ticks} ticks");
    }

    #[test]
    fn crossing_zero_frees_slot_in_same_tick() {
        let mut pool = ParticlePool::new(1);
        pool.spawn(Vec3::X, 1.0, 1.0);
        pool.tick(2.0);
        assert_eq!(pool.iter_live().count(), 0);
        assert_eq!(pool.slots()[0].life, 0.0);
    }

    #[test]
    fn traversal_is_restartable() {
        let mut pool = ParticlePool::new(4);
        pool.spawn(Vec3::X, 1.0, 0.5);
        pool.spawn(Vec3::Y, 1.0, 0.5);
        let mut first = Vec::new();
        pool.for_each_live(|i, _| first.push(i));
        let second: Vec<usize> = pool.iter_live().map(|(i, _)| i).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn clear_releases_all_slots() {
        let mut pool = ParticlePool::new(3);
        pool.spawn(Vec3::X, 1.0, 0.5);
        pool.clear();
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.capacity(), 3);
    }
}
