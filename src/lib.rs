//! Barnsley-fern style attractors via the chaos game.
//!
//! ```no_run
//! use fern::{generate, load_default};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let points = generate(&load_default(), 10_000, &mut rng)?;
//! assert_eq!(points.len(), 10_001);
//! # Ok::<(), fern::Error>(())
//! ```

pub mod engine;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod sampler;
pub mod transform;


pub use engine::{generate, ChaosGame, Orbit, PointSequence, DEFAULT_NUM_POINTS};
pub use error::{Error, ParseError, Result};
pub use geometry::{AffineTransform, Bounds, Point};
pub use loader::{load_default, load_from_csv, load_from_table, FIELDS_PER_ROW, MIN_TABLE_ROWS};
pub use sampler::WeightedSampler;
pub use transform::{Preset, TransformSet, UnknownPreset, PROBABILITY_TOLERANCE};
