//! Burst particles
//!
//! Purely cosmetic: nothing in gameplay reads particle state.

use glam::Vec2;
use rand::Rng;

use super::state::Particle;

/// Emit `count` particles radiating from `origin`, respecting `max_particles`
pub fn burst<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    origin: Vec2,
    color: u32,
    count: usize,
    max_speed: f32,
    max_particles: usize,
) {
    let room = max_particles.saturating_sub(particles.len());
    for _ in 0..count.min(room) {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(0.25..=1.0) * max_speed;
        particles.push(Particle {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            color,
        });
    }
}

/// Integrate, decay and cull
pub fn advance(particles: &mut Vec<Particle>, decay: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.life -= decay;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        burst(&mut particles, &mut rng, Vec2::ZERO, 0xffffff, 12, 4.0, 20);
        assert_eq!(particles.len(), 12);
        burst(&mut particles, &mut rng, Vec2::ZERO, 0xffffff, 12, 4.0, 20);
        assert_eq!(particles.len(), 20);
        assert!(particles.iter().all(|p| p.life == 1.0));
        assert!(particles.iter().all(|p| p.vel.length() <= 4.0 + 1e-4));
    }

    #[test]
    fn test_advance_culls_dead_particles() {
        let mut particles = vec![
            Particle {
                pos: Vec2::ZERO,
                vel: Vec2::new(1.0, 2.0),
                life: 1.0,
                color: 0,
            },
            Particle {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                life: 0.01,
                color: 0,
            },
        ];
        advance(&mut particles, 0.02);
        assert_eq!(particles.len(), 1);
        assert_eq!(particles[0].pos, Vec2::new(1.0, 2.0));
        assert!((particles[0].life - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_particles_fade_out_completely() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Vec::new();
        burst(&mut particles, &mut rng, Vec2::ZERO, 0, 8, 4.0, 256);
        for _ in 0..60 {
            advance(&mut particles, 0.02);
        }
        assert!(particles.is_empty());
    }
}
