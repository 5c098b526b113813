pub mod haversine;
pub mod nearest_neighbor;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
