use crate::risk::zone::{RiskBand, RiskZone};
use crate::utils::geo::{haversine_distance, Coordinate};

/// A zone paired with its distance from some query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneDistance<'a> {
    pub zone: &'a RiskZone,
    pub distance_km: f64,
}

impl ZoneDistance<'_> {
    pub fn band(&self) -> RiskBand {
        RiskBand::classify(self.distance_km)
    }
}

/// Zones that reduce to a center, with their distance from `point`
fn locatable<'a>(
    point: Coordinate,
    zones: impl IntoIterator<Item = &'a RiskZone>,
) -> impl Iterator<Item = ZoneDistance<'a>> {
    zones.into_iter().filter_map(move |zone| {
        zone.center().map(|center| ZoneDistance {
            zone,
            distance_km: haversine_distance(point, center),
        })
    })
}

/// Closest zone to `point`, skipping zones without a usable center.
///
/// Ties resolve to the zone listed first.
pub fn nearest<'a>(
    point: Coordinate,
    zones: impl IntoIterator<Item = &'a RiskZone>,
) -> Option<ZoneDistance<'a>> {
    locatable(point, zones).min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
}

/// Distance to the closest zone, or infinity when none is locatable
pub fn nearest_distance<'a>(point: Coordinate, zones: impl IntoIterator<Item = &'a RiskZone>) -> f64 {
    nearest(point, zones).map_or(f64::INFINITY, |n| n.distance_km)
}

/// Zones within `radius_km` of `point`, closest first, at most `limit` of them
pub fn within_radius<'a>(
    point: Coordinate,
    zones: impl IntoIterator<Item = &'a RiskZone>,
    radius_km: f64,
    limit: usize,
) -> Vec<ZoneDistance<'a>> {
    let mut hits: Vec<ZoneDistance<'a>> = locatable(point, zones)
        .filter(|zd| zd.distance_km <= radius_km)
        .collect();

    // Stable sort keeps input order for equal distances
    hits.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::zone::ZoneGeometry;

    fn zones() -> Vec<RiskZone> {
        vec![
            RiskZone::new("Tepito", Coordinate::new(19.4497, -99.1247), 8.5),
            RiskZone::new("Doctores", Coordinate::new(19.4242, -99.1456), 7.2),
            RiskZone::new("La Merced", Coordinate::new(19.4258, -99.1250), 7.8),
            RiskZone::new("Santa Fe", Coordinate::new(19.3602, -99.2675), 2.8),
        ]
    }

    #[test]
    fn test_nearest_picks_closest() {
        let zones = zones();
        let point = Coordinate::new(19.4490, -99.1250);
        let hit = nearest(point, &zones).expect("a zone");
        assert_eq!(hit.zone.name, "Tepito");
        assert!(hit.distance_km < 0.2);
        assert_eq!(hit.band(), RiskBand::Near);
    }

    #[test]
    fn test_nearest_empty_is_none_and_infinite() {
        let point = Coordinate::new(19.0, -99.0);
        let none: Vec<RiskZone> = Vec::new();
        assert!(nearest(point, &none).is_none());
        assert_eq!(nearest_distance(point, &none), f64::INFINITY);
    }

    #[test]
    fn test_nearest_skips_unusable_geometry() {
        let mut zones = zones();
        zones[0].geometry = ZoneGeometry::Unusable;
        let point = Coordinate::new(19.4497, -99.1247);
        let hit = nearest(point, &zones).expect("a zone");
        assert_ne!(hit.zone.name, "Tepito");

        for zone in zones.iter_mut() {
            zone.geometry = ZoneGeometry::Unusable;
        }
        assert!(nearest(point, &zones).is_none());
    }

    #[test]
    fn test_within_radius_sorted_and_truncated() {
        let zones = zones();
        let point = Coordinate::new(19.4300, -99.1300);

        let hits = within_radius(point, &zones, 10.0, 5);
        let names: Vec<&str> = hits.iter().map(|h| h.zone.name.as_str()).collect();
        assert_eq!(names, vec!["La Merced", "Doctores", "Tepito"]);
        assert!(hits.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));

        let top = within_radius(point, &zones, 10.0, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].zone.name, "La Merced");
    }

    #[test]
    fn test_within_radius_excludes_far_zones() {
        let zones = zones();
        let point = Coordinate::new(19.4300, -99.1300);
        let hits = within_radius(point, &zones, 1.0, 5);
        assert!(hits.iter().all(|h| h.distance_km <= 1.0));
        assert!(hits.iter().all(|h| h.zone.name != "Santa Fe"));
    }
}
