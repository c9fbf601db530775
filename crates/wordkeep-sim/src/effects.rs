//! Effects registry — short-lived visual events with no gameplay impact.
//!
//! Stored in `SimulationEngine`, NOT as ECS entities. Each effect carries its
//! own spawn time and duration; `update` advances particle motion and drops
//! anything past its lifetime.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use wordkeep_core::constants::*;
use wordkeep_core::enums::EffectKind;
use wordkeep_core::state::{EffectView, ParticleView};
use wordkeep_core::types::Position;

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
}

#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub origin: DVec2,
    pub target: DVec2,
    pub spawned_at: f64,
    pub duration_secs: f64,
    pub particles: Vec<Particle>,
}

impl Effect {
    pub fn age_fraction(&self, now: f64) -> f64 {
        ((now - self.spawned_at) / self.duration_secs).clamp(0.0, 1.0)
    }

    fn expired(&self, now: f64) -> bool {
        now - self.spawned_at > self.duration_secs
    }
}

#[derive(Debug, Clone, Default)]
pub struct EffectsRegistry {
    effects: Vec<Effect>,
}

impl EffectsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Debris burst centred on `center`.
    pub fn spawn_explosion(
        &mut self,
        center: Position,
        now: f64,
        duration_secs: f64,
        rng: &mut ChaCha8Rng,
    ) {
        let origin = DVec2::from(center);
        let particles = (0..EXPLOSION_PARTICLE_COUNT)
            .map(|_| {
                let angle = rng.gen_range(0.0..std::f64::consts::TAU);
                let speed = rng.gen_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
                Particle {
                    position: origin,
                    velocity: DVec2::from_angle(angle) * speed,
                    radius: PARTICLE_START_RADIUS,
                }
            })
            .collect();

        self.effects.push(Effect {
            kind: EffectKind::Explosion,
            origin,
            target: origin,
            spawned_at: now,
            duration_secs,
            particles,
        });
    }

    /// Shot from `from` to `to`.
    pub fn spawn_beam(&mut self, from: Position, to: Position, now: f64, duration_secs: f64) {
        self.effects.push(Effect {
            kind: EffectKind::TargetBeam,
            origin: from.into(),
            target: to.into(),
            spawned_at: now,
            duration_secs,
            particles: Vec::new(),
        });
    }

    /// Advance particle motion by `dt` and drop expired effects.
    pub fn update(&mut self, now: f64, dt: f64) {
        let drag = PARTICLE_DRAG_PER_SEC.powf(dt);
        for effect in &mut self.effects {
            let remaining = 1.0 - effect.age_fraction(now);
            for particle in &mut effect.particles {
                particle.position += particle.velocity * dt;
                particle.velocity *= drag;
                particle.radius = PARTICLE_START_RADIUS * remaining;
            }
        }
        self.effects.retain(|effect| !effect.expired(now));
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Views for the renderer.
    pub fn views(&self, now: f64) -> Vec<EffectView> {
        self.effects
            .iter()
            .map(|effect| EffectView {
                kind: effect.kind,
                origin: effect.origin.into(),
                target: effect.target.into(),
                age_fraction: effect.age_fraction(now),
                particles: effect
                    .particles
                    .iter()
                    .map(|p| ParticleView {
                        position: p.position.into(),
                        radius: p.radius,
                    })
                    .collect(),
            })
            .collect()
    }
}
