pub mod area;
pub mod brush;
pub mod gradient;
pub mod polar;
pub mod scene;

use crate::config::theme::LinePalette;
use crate::layout::Viewport;
use crate::source::PricePoint;

use gradient::LineColor;
use polar::{PolarPoint, PriceScale};

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;

/// Price history of one flight, in the order the rows were read.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSeries {
    pub flight_id: String,
    pub departure: DateTime<Utc>,
    pub points: Vec<PricePoint>,
}

/// Groups rows by flight id. Flights keep the order of their first row and
/// take their departure from it.
pub fn group_flights(points: Vec<PricePoint>) -> Vec<FlightSeries> {
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut flights: Vec<FlightSeries> = Vec::new();

    for point in points {
        match index.get(&point.flight_id) {
            Some(&i) => flights[i].points.push(point),
            None => {
                index.insert(point.flight_id.clone(), flights.len());
                flights.push(FlightSeries {
                    flight_id: point.flight_id.clone(),
                    departure: point.departure,
                    points: vec![point],
                });
            }
        }
    }

    flights
}

/// Polar projection and color of one flight, computed once after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightGeometry {
    pub flight_id: String,
    pub departure: DateTime<Utc>,
    pub points: Vec<PolarPoint>,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Radius on the day before departure, or the closest observation to it.
    pub end_radius: f32,
    pub middle_stop: f32,
    pub color: LineColor,
}

impl FlightGeometry {
    pub fn from_series(series: &FlightSeries, scale: &PriceScale, palette: &LinePalette) -> Self {
        let points: Vec<PolarPoint> = series
            .points
            .iter()
            .map(|p| PolarPoint::project(p.days_to_departure, p.price, scale))
            .collect();

        let (min_radius, max_radius) = if points.is_empty() {
            (0.0, 0.0)
        } else {
            points.iter().fold((f32::MAX, f32::MIN), |(lo, hi), p| {
                (lo.min(p.radius), hi.max(p.radius))
            })
        };

        let end_radius = points
            .iter()
            .find(|p| p.days_to_departure == 1)
            .or_else(|| points.iter().min_by_key(|p| p.days_to_departure))
            .map_or(0.0, |p| p.radius);

        Self {
            flight_id: series.flight_id.clone(),
            departure: series.departure,
            middle_stop: gradient::middle_stop(min_radius, max_radius, end_radius),
            color: gradient::classify(min_radius, max_radius, end_radius, palette),
            points,
            min_radius,
            max_radius,
            end_radius,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.max_radius - self.min_radius <= 0.0
    }
}

pub fn max_price(points: &[PricePoint]) -> f32 {
    points.iter().map(|p| p.price).fold(0.0, f32::max)
}

/// Projects every flight with one price scale shared across all of them.
pub fn build_geometries(
    points: Vec<PricePoint>,
    viewport: &Viewport,
    palette: &LinePalette,
) -> Vec<FlightGeometry> {
    let scale = PriceScale::for_viewport(max_price(&points), viewport);

    let flights = group_flights(points);
    log::debug!(
        "Projecting {} flights, max price {:.2}",
        flights.len(),
        scale.max_price
    );

    flights
        .iter()
        .map(|series| FlightGeometry::from_series(series, &scale, palette))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::theme::{Tone, default_line_palette};
    use chrono::TimeZone;

    fn point(id: &str, days: u32, price: f32, day: u32) -> PricePoint {
        PricePoint {
            flight_id: id.to_string(),
            price,
            days_to_departure: days,
            departure: Utc.with_ymd_and_hms(2019, 6, day, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn grouping_keeps_first_appearance_order() {
        let flights = group_flights(vec![
            point("B", 3, 10.0, 2),
            point("A", 3, 20.0, 1),
            point("B", 2, 11.0, 2),
            point("A", 1, 21.0, 1),
        ]);

        let ids: Vec<_> = flights.iter().map(|f| f.flight_id.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
        assert_eq!(flights[0].points.len(), 2);
        assert_eq!(flights[0].points[1].price, 11.0);
    }

    #[test]
    fn shared_scale_spans_all_flights() {
        let viewport = Viewport::from_window(1500.0, 1000.0);
        let geometries = build_geometries(
            vec![
                point("A", 2, 100.0, 1),
                point("A", 1, 50.0, 1),
                point("B", 1, 200.0, 2),
            ],
            &viewport,
            &default_line_palette(),
        );
        let (inner, outer) = viewport.radius_range();

        assert!((geometries[0].min_radius - (inner + (outer - inner) * 0.25)).abs() < 1e-3);
        assert!((geometries[0].max_radius - (inner + (outer - inner) * 0.5)).abs() < 1e-3);
        assert_eq!(geometries[1].max_radius, outer);
    }

    #[test]
    fn end_radius_uses_day_one_or_closest_day() {
        let scale = PriceScale::new(128.0, 0.0, 128.0);
        let palette = default_line_palette();

        let with_day_one = group_flights(vec![
            point("A", 5, 96.0, 1),
            point("A", 1, 32.0, 1),
            point("A", 3, 64.0, 1),
        ]);
        let geometry = FlightGeometry::from_series(&with_day_one[0], &scale, &palette);
        assert_eq!(geometry.end_radius, 32.0);
        assert_eq!(geometry.middle_stop, 0.0);

        let without = group_flights(vec![point("A", 5, 96.0, 1), point("A", 3, 64.0, 1)]);
        let geometry = FlightGeometry::from_series(&without[0], &scale, &palette);
        assert_eq!(geometry.end_radius, 64.0);
        assert_eq!(geometry.middle_stop, 0.0);
    }

    #[test]
    fn constant_price_is_degenerate_and_neutral() {
        let scale = PriceScale::new(200.0, 10.0, 110.0);
        let palette = default_line_palette();
        let flights = group_flights(vec![point("A", 2, 100.0, 1), point("A", 1, 100.0, 1)]);

        let geometry = FlightGeometry::from_series(&flights[0], &scale, &palette);

        assert!(geometry.is_degenerate());
        assert_eq!(geometry.points.len(), 2);
        assert_eq!(geometry.color, LineColor::Solid(palette[Tone::Neutral]));
        assert!(!geometry.middle_stop.is_nan());
    }

    #[test]
    fn single_point_flight_is_degenerate() {
        let scale = PriceScale::new(200.0, 10.0, 110.0);
        let flights = group_flights(vec![point("A", 4, 150.0, 1)]);

        let geometry = FlightGeometry::from_series(&flights[0], &scale, &default_line_palette());

        assert!(geometry.is_degenerate());
        assert_eq!(geometry.end_radius, geometry.min_radius);
        assert!(geometry.color.is_solid());
    }
}
