//! Bounding-box geometry for incremental search.
//!
//! Two pure operations: the bounding square around a center/radius, and the
//! rectangle-difference of a target against already-covered ground. Both are
//! exact over f64 — coverage bookkeeping tolerates no approximation, or the
//! same ground would be re-queried (or worse, skipped) forever.

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// An axis-aligned box in degrees. `min_lat <= max_lat`, `min_lng <= max_lng`.
///
/// Latitude is clamped to [-90, 90] at construction sites; longitude is NOT
/// wrapped at ±180, so boxes spanning the antimeridian can carry out-of-range
/// bounds. Known limitation, inherited from the coverage-ledger format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Rectangle {
    #[must_use]
    pub fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        }
    }
}

/// Compute the bounding square around a center point for a radius in km.
///
/// Returns `None` unless `radius_km` is positive. The longitude delta is
/// widened by `1 / cos(lat)` so the box spans the same ground distance at any
/// latitude; at the poles (`|lat| >= 90`) every meridian is inside the
/// radius, so longitude covers the full [-180, 180].
#[must_use]
pub fn bounding_square(center_lat: f64, center_lng: f64, radius_km: f64) -> Option<Rectangle> {
    if radius_km.is_nan() || radius_km <= 0.0 {
        return None;
    }

    let delta_lat_deg = (radius_km / EARTH_RADIUS_KM).to_degrees();

    let min_lat = center_lat - delta_lat_deg;
    let max_lat = center_lat + delta_lat_deg;

    let (min_lng, max_lng) = if center_lat.abs() >= 90.0 {
        (-180.0, 180.0)
    } else {
        let delta_lng_deg =
            (radius_km / (EARTH_RADIUS_KM * center_lat.to_radians().cos())).to_degrees();
        (center_lng - delta_lng_deg, center_lng + delta_lng_deg)
    };

    Some(Rectangle {
        min_lat: min_lat.max(-90.0),
        min_lng,
        max_lat: max_lat.min(90.0),
        max_lng,
    })
}

/// The portion of `target` not covered by any rectangle in `covered`,
/// as a list of non-overlapping axis-aligned rectangles.
///
/// Fold: the working remainder list starts as `[target]`; each covered
/// rectangle replaces every remainder with its pieces. Final coverage is
/// order-independent even though intermediate piece counts are not.
#[must_use]
pub fn subtract(covered: &[Rectangle], target: Rectangle) -> Vec<Rectangle> {
    let mut remainders = vec![target];
    for rect in covered {
        let mut next = Vec::new();
        for remainder in &remainders {
            next.extend(subtract_one(remainder, rect));
        }
        remainders = next;
    }
    remainders
}

/// Subtract a single covered rectangle from a single remainder.
///
/// Yields 0–4 pieces: a full-width strip above the intersection, a full-width
/// strip below it, and left/right strips between the intersection's latitude
/// bounds. An empty or degenerate intersection (shared edge only) returns the
/// remainder unchanged.
fn subtract_one(target: &Rectangle, covered: &Rectangle) -> Vec<Rectangle> {
    let ilng_min = target.min_lng.max(covered.min_lng);
    let ilat_min = target.min_lat.max(covered.min_lat);
    let ilng_max = target.max_lng.min(covered.max_lng);
    let ilat_max = target.max_lat.min(covered.max_lat);

    if ilng_min >= ilng_max || ilat_min >= ilat_max {
        return vec![*target];
    }

    let mut pieces = Vec::with_capacity(4);
    if ilat_max < target.max_lat {
        pieces.push(Rectangle::new(
            ilat_max,
            target.min_lng,
            target.max_lat,
            target.max_lng,
        ));
    }
    if target.min_lat < ilat_min {
        pieces.push(Rectangle::new(
            target.min_lat,
            target.min_lng,
            ilat_min,
            target.max_lng,
        ));
    }
    if target.min_lng < ilng_min {
        pieces.push(Rectangle::new(ilat_min, target.min_lng, ilat_max, ilng_min));
    }
    if ilng_max < target.max_lng {
        pieces.push(Rectangle::new(ilat_min, ilng_max, ilat_max, target.max_lng));
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(r: &Rectangle) -> f64 {
        (r.max_lat - r.min_lat) * (r.max_lng - r.min_lng)
    }

    fn overlap_area(a: &Rectangle, b: &Rectangle) -> f64 {
        let lat = (a.max_lat.min(b.max_lat) - a.min_lat.max(b.min_lat)).max(0.0);
        let lng = (a.max_lng.min(b.max_lng) - a.min_lng.max(b.min_lng)).max(0.0);
        lat * lng
    }

    #[test]
    fn bounding_square_rejects_non_positive_radius() {
        assert!(bounding_square(0.0, 0.0, 0.0).is_none());
        assert!(bounding_square(0.0, 0.0, -5.0).is_none());
        assert!(bounding_square(0.0, 0.0, f64::NAN).is_none());
    }

    #[test]
    fn bounding_square_one_degree_at_equator() {
        // ~111.19 km is one degree of latitude on a 6371 km sphere, and at
        // the equator cos(0) = 1 makes the longitude delta identical.
        let rect = bounding_square(0.0, 0.0, 111.19).unwrap();
        assert!((rect.min_lat - (-1.0)).abs() < 1e-3, "{}", rect.min_lat);
        assert!((rect.max_lat - 1.0).abs() < 1e-3);
        assert!((rect.min_lng - (-1.0)).abs() < 1e-3);
        assert!((rect.max_lng - 1.0).abs() < 1e-3);
    }

    #[test]
    fn bounding_square_widens_longitude_at_high_latitude() {
        let rect = bounding_square(60.0, 10.0, 100.0).unwrap();
        let lat_span = rect.max_lat - rect.min_lat;
        let lng_span = rect.max_lng - rect.min_lng;
        // cos(60°) = 0.5 → longitude span is twice the latitude span.
        assert!((lng_span - 2.0 * lat_span).abs() < 1e-9);
    }

    #[test]
    fn bounding_square_at_pole_spans_all_longitudes() {
        let rect = bounding_square(90.0, 45.0, 10.0).unwrap();
        assert_eq!(rect.min_lng, -180.0);
        assert_eq!(rect.max_lng, 180.0);
        assert_eq!(rect.max_lat, 90.0);
    }

    #[test]
    fn bounding_square_clamps_latitude() {
        let rect = bounding_square(89.5, 0.0, 200.0).unwrap();
        assert_eq!(rect.max_lat, 90.0);
    }

    #[test]
    fn subtract_disjoint_returns_target() {
        let target = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let far = Rectangle::new(5.0, 5.0, 6.0, 6.0);
        assert_eq!(subtract(&[far], target), vec![target]);
    }

    #[test]
    fn subtract_shared_edge_is_degenerate() {
        let target = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let touching = Rectangle::new(0.0, 1.0, 1.0, 2.0);
        assert_eq!(subtract(&[touching], target), vec![target]);
    }

    #[test]
    fn subtract_containing_box_removes_everything() {
        let target = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let container = Rectangle::new(-1.0, -1.0, 2.0, 2.0);
        assert!(subtract(&[container], target).is_empty());
    }

    #[test]
    fn subtract_identical_box_removes_everything() {
        let target = Rectangle::new(-1.0, -1.0, 1.0, 1.0);
        assert!(subtract(&[target], target).is_empty());
    }

    #[test]
    fn subtract_centered_hole_yields_four_pieces() {
        let target = Rectangle::new(0.0, 0.0, 4.0, 4.0);
        let hole = Rectangle::new(1.0, 1.0, 3.0, 3.0);
        let pieces = subtract(&[hole], target);
        assert_eq!(pieces.len(), 4);

        let pieces_area: f64 = pieces.iter().map(area).sum();
        assert!((pieces_area - (16.0 - 4.0)).abs() < 1e-12);
    }

    #[test]
    fn subtract_corner_overlap_yields_two_pieces() {
        let target = Rectangle::new(0.0, 0.0, 2.0, 2.0);
        let corner = Rectangle::new(1.0, 1.0, 3.0, 3.0);
        let pieces = subtract(&[corner], target);
        assert_eq!(pieces.len(), 2);
        let pieces_area: f64 = pieces.iter().map(area).sum();
        assert!((pieces_area - 3.0).abs() < 1e-12);
    }

    /// Pieces plus the intersection reconstruct the target exactly: no area
    /// lost, no area double-counted, and no piece overlaps another.
    #[test]
    fn subtract_reconstructs_target_area() {
        let target = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let cases = [
            Rectangle::new(2.0, 2.0, 5.0, 5.0),   // interior
            Rectangle::new(-5.0, -5.0, 5.0, 5.0), // corner
            Rectangle::new(3.0, -1.0, 7.0, 11.0), // horizontal band
            Rectangle::new(-1.0, 4.0, 11.0, 6.0), // vertical band
            Rectangle::new(20.0, 20.0, 30.0, 30.0), // disjoint
        ];

        for covered in cases {
            let pieces = subtract(&[covered], target);
            let pieces_area: f64 = pieces.iter().map(area).sum();
            let expected = area(&target) - overlap_area(&target, &covered);
            assert!(
                (pieces_area - expected).abs() < 1e-9,
                "area mismatch for covered={covered:?}"
            );

            for (i, a) in pieces.iter().enumerate() {
                for b in pieces.iter().skip(i + 1) {
                    assert!(
                        overlap_area(a, b) < 1e-12,
                        "pieces overlap: {a:?} vs {b:?}"
                    );
                }
                assert!(overlap_area(a, &covered) < 1e-12, "piece not disjoint from covered");
            }
        }
    }

    /// Subtracting a ledger that already contains the target leaves nothing —
    /// the second identical search queries zero remainder boxes.
    #[test]
    fn repeat_search_has_no_remainder() {
        let first = bounding_square(40.0, -74.0, 25.0).unwrap();
        let ledger = vec![first];
        let second = bounding_square(40.0, -74.0, 25.0).unwrap();
        assert!(subtract(&ledger, second).is_empty());
    }

    /// Multiple covered boxes: final coverage is the same regardless of fold
    /// order, even when piece counts differ.
    #[test]
    fn subtract_fold_order_does_not_change_coverage() {
        let target = Rectangle::new(0.0, 0.0, 8.0, 8.0);
        let a = Rectangle::new(0.0, 0.0, 5.0, 5.0);
        let b = Rectangle::new(3.0, 3.0, 8.0, 8.0);

        let forward = subtract(&[a, b], target);
        let backward = subtract(&[b, a], target);

        let area_of = |pieces: &[Rectangle]| pieces.iter().map(area).sum::<f64>();
        assert!((area_of(&forward) - area_of(&backward)).abs() < 1e-9);
        // 64 total − 25 − 25 + 4 overlap = 18 uncovered.
        assert!((area_of(&forward) - 18.0).abs() < 1e-9);
    }
}
