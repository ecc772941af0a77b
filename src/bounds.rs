use geo::{coord, Point, Rect};

/// Half height of the search rectangle, roughly 10m.
pub const LAT_DELTA: f64 = 0.000090909;
/// Half width of the search rectangle, roughly 14m at the service latitude.
pub const LONG_DELTA: f64 = 0.000125;

/// Area around a query point that samples are aggregated from.
///
/// The rectangle is a cheap prefilter that the store can answer from an
/// index. Samples inside it are then narrowed down to an ellipse with
/// [`SearchArea::within_radius`].
#[derive(Debug, Clone, Copy)]
pub struct SearchArea {
    center: Point,
    rect: Rect,
}

impl SearchArea {
    pub fn around(latitude: f64, longitude: f64) -> Self {
        let center = Point::new(longitude, latitude);
        let rect = Rect::new(
            coord! { x: longitude - LONG_DELTA, y: latitude - LAT_DELTA },
            coord! { x: longitude + LONG_DELTA, y: latitude + LAT_DELTA },
        );
        Self { center, rect }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Inclusive on every edge, matching `between` in SQL.
    pub fn covers(&self, latitude: f64, longitude: f64) -> bool {
        let (min, max) = (self.rect.min(), self.rect.max());
        (min.y..=max.y).contains(&latitude) && (min.x..=max.x).contains(&longitude)
    }

    /// Strict squared distance test against `LAT_DELTA * LONG_DELTA`.
    pub fn within_radius(&self, latitude: f64, longitude: f64) -> bool {
        let offset = Point::new(longitude, latitude) - self.center;
        let (dx, dy) = offset.x_y();
        dx * dx + dy * dy < LAT_DELTA * LONG_DELTA
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.covers(latitude, longitude) && self.within_radius(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAT: f64 = 44.8125;
    const LON: f64 = 20.4612;

    #[test]
    fn center_is_included() {
        let area = SearchArea::around(LAT, LON);
        assert!(area.covers(LAT, LON));
        assert!(area.contains(LAT, LON));
    }

    #[test]
    fn corner_is_only_in_rectangle() {
        let area = SearchArea::around(LAT, LON);
        let (lat, lon) = (LAT + LAT_DELTA, LON + LONG_DELTA);
        assert!(area.covers(lat, lon));
        assert!(!area.within_radius(lat, lon));
        assert!(!area.contains(lat, lon));
    }

    #[test]
    fn outside_rectangle_is_excluded() {
        let area = SearchArea::around(LAT, LON);
        // close enough for the ellipse, but past the top edge
        let lat = LAT + 0.0001;
        assert!(area.within_radius(lat, LON));
        assert!(!area.covers(lat, LON));
        assert!(!area.contains(lat, LON));
    }

    #[test]
    fn rect_edges() {
        let area = SearchArea::around(LAT, LON);
        let rect = area.rect();
        assert_eq!(rect.min().y, LAT - LAT_DELTA);
        assert_eq!(rect.max().y, LAT + LAT_DELTA);
        assert_eq!(rect.min().x, LON - LONG_DELTA);
        assert_eq!(rect.max().x, LON + LONG_DELTA);
    }
}
