use crate::config::SceneConfig;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarPoint {
    pub position: Vec3,
    pub opacity: f32,
    pub blink_speed: f32,
    pub blink_offset: f32,
}

/// Scatters stars uniformly over directions on a thick spherical shell.
pub fn generate_stars(config: &SceneConfig) -> Vec<StarPoint> {
    let mut rng = match config.star_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    (0..config.star_count)
        .map(|_| {
            let radius = config.star_min_radius + rng.random::<f32>() * config.star_radius_span;
            let theta = rng.random::<f32>() * TAU;
            let phi = (2.0 * rng.random::<f32>() - 1.0).acos();

            StarPoint {
                position: Vec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                ),
                opacity: rng.random(),
                blink_speed: 0.1 + rng.random::<f32>() * 2.0,
                blink_offset: rng.random::<f32>() * TAU,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: usize) -> SceneConfig {
        SceneConfig {
            star_count: count,
            star_seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_star_ranges() {
        let stars = generate_stars(&seeded(2000));
        assert_eq!(stars.len(), 2000);
        for star in &stars {
            let radius = star.position.length();
            assert!((49.99..200.01).contains(&radius), "radius {}", radius);
            assert!((0.0..=1.0).contains(&star.opacity));
            assert!((0.1..=2.1).contains(&star.blink_speed));
            assert!((0.0..=TAU).contains(&star.blink_offset));
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        assert_eq!(generate_stars(&seeded(50)), generate_stars(&seeded(50)));
    }
}
