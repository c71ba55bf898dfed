use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;

use super::TrafficSource;
use crate::errors::Result;

/// A route whose hits are counted, with the largest increment per poll
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: String,
    pub scale: f64,
}

impl Route {
    pub fn new<P: Into<String>>(path: P, scale: f64) -> Self {
        Self {
            path: path.into(),
            scale,
        }
    }
}

/// Routes published by the synthetic collector
pub fn default_routes() -> Vec<Route> {
    vec![
        Route::new("/v1/me", 10.0),
        Route::new("/v1/users", 15.0),
        Route::new("/v1/channels", 8.0),
    ]
}

/// Pseudo-random traffic: `ceil(uniform[0, 1) * scale)` per route.
///
/// The generator is reseeded from the current Unix second on every poll, so
/// polls within the same second yield the same increments.
#[derive(Debug, Default)]
pub struct RandomTraffic;

impl RandomTraffic {
    pub fn new() -> Self {
        Self
    }

    fn increments_with_seed(seed: u64, routes: &[Route]) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        routes
            .iter()
            .map(|route| {
                let draw: f64 = StandardUniform.sample(&mut rng);
                (draw * route.scale).ceil().max(0.0)
            })
            .collect()
    }
}

impl TrafficSource for RandomTraffic {
    fn increments(&self, routes: &[Route]) -> Result<Vec<f64>> {
        let seed = chrono::Utc::now().timestamp().max(0) as u64;
        Ok(Self::increments_with_seed(seed, routes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increments_are_whole_and_bounded() {
        let routes = default_routes();
        for seed in 0..200 {
            let incs = RandomTraffic::increments_with_seed(seed, &routes);
            assert_eq!(incs.len(), routes.len());
            for (inc, route) in incs.iter().zip(&routes) {
                assert_eq!(inc.fract(), 0.0);
                assert!(*inc >= 0.0 && *inc <= route.scale);
            }
        }
    }

    #[test]
    fn test_same_seed_same_increments() {
        let routes = default_routes();
        assert_eq!(
            RandomTraffic::increments_with_seed(1_700_000_000, &routes),
            RandomTraffic::increments_with_seed(1_700_000_000, &routes)
        );
    }

    #[test]
    fn test_increments_follow_route_order() {
        let routes = vec![Route::new("/a", 0.0), Route::new("/b", 5.0)];
        let incs = RandomTraffic::new().increments(&routes).unwrap();
        assert_eq!(incs[0], 0.0);
        assert!(incs[1] <= 5.0);
    }
}
