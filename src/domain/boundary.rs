use geo::{Area, BoundingRect, Intersects, LineString, MultiPolygon, Polygon, Rect};

/// Approximate outline of Malta's main island as (lon, lat) pairs.
///
/// Closed ring: the last vertex repeats the first.
pub const MALTA_FALLBACK: [(f64, f64); 9] = [
    (14.1836, 35.7836), // Dingli Cliffs
    (14.1836, 35.8889), // Mellieha
    (14.2500, 35.9500), // Mellieha Bay
    (14.5000, 35.9500), // Marfa
    (14.5677, 35.8889), // St. Julian's
    (14.5677, 35.8000), // Marsaxlokk
    (14.4500, 35.7836), // Birzebbuga
    (14.3000, 35.7836), // Zurrieq
    (14.1836, 35.7836),
];

/// Land boundary of a region in WGS84 degrees (x = longitude, y = latitude).
///
/// Holds every part of the region, so archipelagos returned as a MultiPolygon
/// are sampled across all islands. Parts with zero area never cover a point.
#[derive(Debug, Clone)]
pub struct Boundary {
    shape: MultiPolygon<f64>,
    /// Parts with non-zero area, the only ones that can cover a point
    solid: Vec<Polygon<f64>>,
}

impl Boundary {
    pub fn new(shape: MultiPolygon<f64>) -> Self {
        let solid = shape
            .0
            .iter()
            .filter(|polygon| polygon.unsigned_area() > 0.0)
            .cloned()
            .collect();
        Self { shape, solid }
    }

    /// Build a single-part boundary from an exterior ring of (lon, lat) pairs
    pub fn from_lon_lat(ring: &[(f64, f64)]) -> Self {
        let exterior = LineString::from(ring.to_vec());
        Self::new(MultiPolygon::new(vec![Polygon::new(exterior, vec![])]))
    }

    /// The built-in outline used when the remote lookup is unavailable
    pub fn fallback() -> Self {
        Self::from_lon_lat(&MALTA_FALLBACK)
    }

    /// Axis-aligned bounding box over all vertices, `None` for an empty shape
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.shape.bounding_rect()
    }

    /// Boundary-inclusive containment test ("contains or touches")
    pub fn covers(&self, lon: f64, lat: f64) -> bool {
        let coord = geo::coord! { x: lon, y: lat };
        self.solid.iter().any(|polygon| polygon.intersects(&coord))
    }

    /// Area in square degrees
    pub fn area(&self) -> f64 {
        self.shape.unsigned_area()
    }

    pub fn polygon_count(&self) -> usize {
        self.shape.0.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.shape
            .0
            .iter()
            .map(|p| p.exterior().0.len() + p.interiors().iter().map(|r| r.0.len()).sum::<usize>())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Boundary {
        Boundary::from_lon_lat(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    #[test]
    fn test_fallback_bounds() {
        let bounds = Boundary::fallback().bounds().unwrap();
        assert_eq!(bounds.min().x, 14.1836);
        assert_eq!(bounds.max().x, 14.5677);
        assert_eq!(bounds.min().y, 35.7836);
        assert_eq!(bounds.max().y, 35.95);
    }

    #[test]
    fn test_fallback_is_closed_ring() {
        let boundary = Boundary::fallback();
        assert_eq!(boundary.polygon_count(), 1);
        assert_eq!(boundary.vertex_count(), 9);
        assert!(boundary.area() > 0.0);
    }

    #[test]
    fn test_covers_interior_and_edges() {
        let square = unit_square();
        assert!(square.covers(0.5, 0.5));
        // Edge and corner points count as inside
        assert!(square.covers(0.5, 0.0));
        assert!(square.covers(1.0, 1.0));
        assert!(!square.covers(1.000001, 0.5));
        assert!(!square.covers(-0.5, 0.5));
    }

    #[test]
    fn test_covers_respects_holes() {
        let exterior = LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let hole = LineString::from(vec![(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]);
        let boundary = Boundary::new(MultiPolygon::new(vec![Polygon::new(exterior, vec![hole])]));

        assert!(boundary.covers(0.5, 0.5));
        assert!(!boundary.covers(2.0, 2.0));
    }

    #[test]
    fn test_degenerate_covers_nothing() {
        let point = Boundary::from_lon_lat(&[(2.0, 2.0); 4]);
        assert_eq!(point.area(), 0.0);
        assert!(!point.covers(2.0, 2.0));
    }

    #[test]
    fn test_multi_part_covers_each_island() {
        let a = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            vec![],
        );
        let b = Polygon::new(
            LineString::from(vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0)]),
            vec![],
        );
        let boundary = Boundary::new(MultiPolygon::new(vec![a, b]));

        assert!(boundary.covers(0.5, 0.5));
        assert!(boundary.covers(5.5, 5.5));
        assert!(!boundary.covers(3.0, 3.0));
        assert_eq!(boundary.bounds().unwrap().max().x, 6.0);
    }
}
