//! A number of methods to generate random coordinates for testing.

use crate::router::router_types::coordinate::Coordinate;
use geo::prelude::*;
use geo::{LineString, Point, Polygon, Rect};
use rand::Rng;

/// Number of vertices of the circle used to sample around a centre
const CIRCLE_VERTICES: usize = 360;

/// Generate a random coordinate anywhere on earth.
pub fn generate_coordinate() -> Coordinate {
    let mut rng = rand::thread_rng();
    loop {
        let latitude = rng.gen_range(-90.0..=90.0);
        let longitude = rng.gen_range(-180.0..=180.0);
        if let Ok(coordinate) = Coordinate::new(latitude, longitude) {
            return coordinate;
        }
    }
}

/// Generate `capacity` random coordinates anywhere on earth.
pub fn generate_coordinates(capacity: usize) -> Vec<Coordinate> {
    (0..capacity).map(|_| generate_coordinate()).collect()
}

/// Generate a random coordinate within `radius` meters of `centre`.
///
/// `centre` is a `geo` point, so x is the longitude and y the latitude.
pub fn generate_coordinate_near(centre: &Point, radius: f64) -> Coordinate {
    let mut rng = rand::thread_rng();
    loop {
        let point = gen_around_point(&mut rng, centre, radius);
        if let Ok(coordinate) = Coordinate::new(point.y(), point.x()) {
            return coordinate;
        }
    }
}

/// Generate `capacity` random coordinates within `radius` meters of
/// `centre`.
pub fn generate_coordinates_near(centre: &Point, radius: f64, capacity: usize) -> Vec<Coordinate> {
    (0..capacity)
        .map(|_| generate_coordinate_near(centre, radius))
        .collect()
}

/// Generate a random point within a radius (in meters).
///
/// Builds a circle of geodesic destinations around the centre, then
/// samples its bounding rect until a point falls inside the circle.
fn gen_around_point(rng: &mut rand::rngs::ThreadRng, centre: &Point, radius: f64) -> Point {
    let points: Vec<Point> = (0..CIRCLE_VERTICES)
        .map(|bearing| centre.geodesic_destination(bearing as f64, radius))
        .collect();

    let polygon = Polygon::new(LineString::from(points), vec![]);
    let Some(bounding_rect): Option<Rect> = polygon.bounding_rect() else {
        return *centre;
    };

    loop {
        let random_x = rng.gen_range(bounding_rect.min().x..=bounding_rect.max().x);
        let random_y = rng.gen_range(bounding_rect.min().y..=bounding_rect.max().y);
        let random_point = Point::new(random_x, random_y);

        if polygon.contains(&random_point) {
            return random_point;
        }
    }
}
