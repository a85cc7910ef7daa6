//! The chaos game: starting at the origin, repeatedly apply a randomly chosen
//! transform to the current point and record where it lands.
//!
//! Each step depends only on the previous point and consumes exactly one draw
//! from the random source, so a seeded generator reproduces a run exactly.
//!
//! Coordinates use unrestricted `f64` arithmetic. A table that sends the orbit
//! to infinity or NaN produces those values in the output; the engine logs a
//! warning but does not stop or clamp.

use std::ops::Deref;

use log::{debug, log_enabled, warn, Level};
use rand::distributions::Distribution;
use rand::Rng;

use crate::error::Result;
use crate::geometry::{Bounds, Point};
use crate::sampler::WeightedSampler;
use crate::transform::TransformSet;


/// Number of points the command-line front end generates by default.
pub const DEFAULT_NUM_POINTS: usize = 65536;


/// A validated transform set paired with its sampler, ready to run.
#[derive(Debug, Clone)]
pub struct ChaosGame {
    set: TransformSet,
    sampler: WeightedSampler,
}


impl ChaosGame {
    pub fn new(set: TransformSet) -> Result<ChaosGame> {
        set.validate()?;
        let sampler = WeightedSampler::new(&set);

        Ok(ChaosGame { set, sampler })
    }

    pub fn transform_set(&self) -> &TransformSet {
        &self.set
    }

    pub fn sampler(&self) -> &WeightedSampler {
        &self.sampler
    }

    /// The unbounded orbit of the origin, excluding the origin itself.
    pub fn points<'a, R: Rng + ?Sized>(&'a self, rng: &'a mut R) -> Orbit<'a, R> {
        Orbit {
            game: self,
            rng,
            current: Point::ORIGIN,
        }
    }

    /// The origin followed by `n` iterated points.
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> PointSequence {
        debug!("generating {} points from {} transforms", n, self.set.len());

        let mut points = Vec::with_capacity(n + 1);
        points.push(Point::ORIGIN);

        let mut diverged = false;
        for (step, point) in self.points(rng).take(n).enumerate() {
            if !diverged && !point.is_finite() {
                warn!("orbit left the finite plane at step {}: ({}, {})", step + 1, point.x, point.y);
                diverged = true;
            }
            points.push(point);
        }

        let sequence = PointSequence { points };
        if !log_enabled!(Level::Debug) {
            return sequence;
        }
        if let Some(bounds) = sequence.bounds() {
            debug!(
                "generated {} points, x in [{}, {}], y in [{}, {}]",
                sequence.len(), bounds.min.x, bounds.max.x, bounds.min.y, bounds.max.y
            );
        }

        sequence
    }
}


/// Validates `set`, then runs the chaos game for `n` steps.
pub fn generate<R: Rng + ?Sized>(set: &TransformSet, n: usize, rng: &mut R) -> Result<PointSequence> {
    let game = ChaosGame::new(set.clone())?;

    Ok(game.generate(n, rng))
}


pub struct Orbit<'a, R: ?Sized> {
    game: &'a ChaosGame,
    rng: &'a mut R,
    current: Point,
}


impl<'a, R: Rng + ?Sized> Iterator for Orbit<'a, R> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let index = self.game.sampler.sample(&mut *self.rng);

        // the sampler never yields an index past the last transform
        let transform = self.game.set.transforms()[index];
        self.current = transform.apply(self.current);

        Some(self.current)
    }
}


/// Points visited by one run, origin first.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSequence {
    points: Vec<Point>,
}


impl PointSequence {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Bounding box of the finite points.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(&self.points)
    }
}


impl Deref for PointSequence {
    type Target = [Point];

    fn deref(&self) -> &[Point] {
        &self.points
    }
}


impl IntoIterator for PointSequence {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}


impl<'a> IntoIterator for &'a PointSequence {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::{generate, ChaosGame};
    use crate::error::Error;
    use crate::geometry::{AffineTransform, Point};
    use crate::transform::TransformSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    pub fn zero_steps_test() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = generate(&TransformSet::default(), 0, &mut rng).expect("default set is valid");

        assert_eq!(points.points(), &[Point::ORIGIN]);
    }

    #[test]
    pub fn length_and_origin_test() {
        let game = ChaosGame::new(TransformSet::default()).expect("default set is valid");
        let mut rng = StdRng::seed_from_u64(2);

        for n in [1, 2, 17, 1000] {
            let points = game.generate(n, &mut rng);
            assert_eq!(points.len(), n + 1);
            assert_eq!(points[0], Point::ORIGIN);
        }
    }

    #[test]
    pub fn single_transform_is_deterministic_test() {
        let shift = AffineTransform::new(1.0, 0.0, 0.0, 1.0, 1.0, -2.0);
        let game = ChaosGame::new(TransformSet::new(vec![(shift, 1.0)])).expect("valid set");
        let mut rng = StdRng::seed_from_u64(3);

        let points = game.generate(3, &mut rng);
        assert_eq!(
            points.into_points(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, -2.0),
                Point::new(2.0, -4.0),
                Point::new(3.0, -6.0),
            ]
        );
    }

    #[test]
    pub fn orbit_matches_generate_test() {
        let game = ChaosGame::new(TransformSet::default()).expect("default set is valid");

        let mut rng = StdRng::seed_from_u64(4);
        let lazy: Vec<Point> = game.points(&mut rng).take(50).collect();

        let mut rng = StdRng::seed_from_u64(4);
        let eager = game.generate(50, &mut rng);

        assert_eq!(&eager[1..], lazy.as_slice());
        assert_eq!(game.sampler().cumulative().len(), game.transform_set().len());
    }

    #[test]
    pub fn invalid_set_is_rejected_test() {
        let identity = AffineTransform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        let set = TransformSet::new(vec![(identity, 0.3), (identity, 0.2)]);
        let mut rng = StdRng::seed_from_u64(5);

        assert!(matches!(
            generate(&set, 10, &mut rng),
            Err(Error::InvalidDistribution { .. })
        ));
        assert!(ChaosGame::new(set).is_err());
    }

    #[test]
    pub fn non_finite_values_propagate_test() {
        let blow_up = AffineTransform::new(f64::NAN, 0.0, 0.0, 1.0, 0.0, 1.0);
        let game = ChaosGame::new(TransformSet::new(vec![(blow_up, 1.0)])).expect("valid set");
        let mut rng = StdRng::seed_from_u64(6);

        let points = game.generate(3, &mut rng);
        assert_eq!(points.len(), 4);
        assert!(points[0].is_finite());
        assert!(points[1..].iter().all(|p| !p.is_finite()));
        assert!(points[1].x.is_nan());
        assert_eq!(points[1].y, 1.0);

        // only the origin is finite
        let bounds = points.bounds().expect("origin is finite");
        assert_eq!(bounds.min, Point::ORIGIN);
        assert_eq!(bounds.max, Point::ORIGIN);
    }
}
