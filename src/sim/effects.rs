//! Particle bursts
//!
//! Purely visual; nothing here feeds back into gameplay. Bursts are seeded
//! from the session RNG so replays produce the same particles.

use std::ops::Range;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Opaque reference to a spawned burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectHandle(u32);

/// A single particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left to live
    pub life: f32,
}

/// Particles spawned together by one event
#[derive(Debug, Clone)]
pub struct Burst {
    pub handle: EffectHandle,
    pub origin: Vec2,
    pub particles: Vec<Particle>,
}

/// All live bursts
#[derive(Debug, Clone)]
pub struct Effects {
    bursts: Vec<Burst>,
    rng: Pcg32,
    next_id: u32,
}

fn sample(rng: &mut Pcg32, range: Range<f32>) -> f32 {
    if range.start < range.end {
        rng.random_range(range)
    } else {
        range.start
    }
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Self {
            bursts: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Spawn `count` particles flying out from `origin` in random directions
    pub fn spawn_burst(
        &mut self,
        origin: Vec2,
        count: u32,
        speed: Range<f32>,
        lifetime: Range<f32>,
    ) -> EffectHandle {
        let handle = EffectHandle(self.next_id);
        self.next_id += 1;

        let particles = (0..count)
            .map(|_| {
                let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
                let speed = sample(&mut self.rng, speed.clone());
                Particle {
                    pos: origin,
                    vel: Vec2::from_angle(angle) * speed,
                    life: sample(&mut self.rng, lifetime.clone()),
                }
            })
            .collect();

        self.bursts.push(Burst {
            handle,
            origin,
            particles,
        });
        handle
    }

    /// Move particles and prune the dead ones (and empty bursts)
    pub fn update(&mut self, dt: f32) {
        for burst in &mut self.bursts {
            for particle in burst.particles.iter_mut() {
                particle.pos += particle.vel * dt;
                particle.life -= dt;
            }
            burst.particles.retain(|p| p.life > 0.0);
        }
        self.bursts.retain(|b| !b.particles.is_empty());
    }

    pub fn is_alive(&self, handle: EffectHandle) -> bool {
        self.bursts.iter().any(|b| b.handle == handle)
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn particle_count(&self) -> usize {
        self.bursts.iter().map(|b| b.particles.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }
}
