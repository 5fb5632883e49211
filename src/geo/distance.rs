use super::coordinate::Coordinate;

/// Mean Earth radius used by the spherical model.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance in meters.
pub fn distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.lat_rad();
    let phi2 = b.lat_rad();
    let delta_phi = (b.latitude_deg - a.latitude_deg).to_radians();
    let delta_lambda = (b.longitude_deg - a.longitude_deg).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}
