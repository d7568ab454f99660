// Exhaustive k-nearest-neighbor classification over byte feature vectors

mod distance;
pub use distance::squared_distance;

mod classify;
pub use classify::{classify, majority_vote, nearest, Neighbor, DEFAULT_K};

mod parallel;
pub use parallel::classify_par;
