use num::traits::float::Float;
use serde::Deserialize;
use std::ops::Sub;

// Type aliases allow easier switching between hash implementations
/// Cryptographically insecure mapping, generally keyed by neuron name
pub type FastMap<T, U> = fxhash::FxHashMap<T, U>;

/// Cryptographically insecure set, generally of neuron names
pub type FastSet<T> = fxhash::FxHashSet<T>;

/// A point in the worm's shared spatial frame.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Location<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Location<F> {
    pub fn norm(&self) -> F {
        (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt()
    }

    pub fn distance_to(self, other: &Location<F>) -> F {
        (self - *other).norm()
    }
}

impl<F: Float> Sub<Location<F>> for Location<F> {
    type Output = Location<F>;

    fn sub(self, rhs: Location<F>) -> <Self as Sub<Location<F>>>::Output {
        Location {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}
