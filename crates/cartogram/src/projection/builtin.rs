//! Built-in spherical projections (metres on a sphere of radius `EARTH_RADIUS`).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use nalgebra::Vector2;

use super::Projection;
use crate::geom::EARTH_RADIUS;

/// Latitude limit of the square Web Mercator world (degrees).
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Pass-through; for data already in the working plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Projection for Identity {
    fn name(&self) -> &str {
        "identity"
    }
    fn forward(&self, p: Vector2<f64>) -> Vector2<f64> {
        p
    }
    fn inverse(&self, p: Vector2<f64>) -> Vector2<f64> {
        p
    }
}

/// Plate carrée: `x = Rλ`, `y = Rφ`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Equirectangular;

impl Projection for Equirectangular {
    fn name(&self) -> &str {
        "equirectangular"
    }
    fn forward(&self, p: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(p.x.to_radians(), p.y.to_radians()) * EARTH_RADIUS
    }
    fn inverse(&self, p: Vector2<f64>) -> Vector2<f64> {
        Vector2::new((p.x / EARTH_RADIUS).to_degrees(), (p.y / EARTH_RADIUS).to_degrees())
    }
}

/// Spherical Web Mercator (EPSG:3857). Latitudes are clamped to ±[`MERCATOR_MAX_LAT`].
#[derive(Clone, Copy, Debug, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn name(&self) -> &str {
        "mercator"
    }
    fn forward(&self, p: Vector2<f64>) -> Vector2<f64> {
        let phi = p.y.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
        Vector2::new(
            EARTH_RADIUS * p.x.to_radians(),
            EARTH_RADIUS * (FRAC_PI_4 + phi / 2.0).tan().ln(),
        )
    }
    fn inverse(&self, p: Vector2<f64>) -> Vector2<f64> {
        let lon = (p.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (p.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
        Vector2::new(lon, lat)
    }
}

/// Spherical Lambert azimuthal equal-area centred on `(lon0, lat0)` (degrees).
#[derive(Clone, Copy, Debug)]
pub struct LambertAzimuthalEqualArea {
    pub lon0: f64,
    pub lat0: f64,
}

impl LambertAzimuthalEqualArea {
    /// Centre used by EPSG:3035 (Europe).
    pub fn europe() -> Self {
        Self {
            lon0: 10.0,
            lat0: 52.0,
        }
    }
}

impl Projection for LambertAzimuthalEqualArea {
    fn name(&self) -> &str {
        "laea"
    }
    fn forward(&self, p: Vector2<f64>) -> Vector2<f64> {
        let (sin_phi1, cos_phi1) = self.lat0.to_radians().sin_cos();
        let (sin_phi, cos_phi) = p.y.to_radians().sin_cos();
        let (sin_dl, cos_dl) = (p.x - self.lon0).to_radians().sin_cos();
        let k = (2.0 / (1.0 + sin_phi1 * sin_phi + cos_phi1 * cos_phi * cos_dl)).sqrt();
        Vector2::new(
            EARTH_RADIUS * k * cos_phi * sin_dl,
            EARTH_RADIUS * k * (cos_phi1 * sin_phi - sin_phi1 * cos_phi * cos_dl),
        )
    }
    fn inverse(&self, p: Vector2<f64>) -> Vector2<f64> {
        let rho = p.norm();
        if rho == 0.0 {
            return Vector2::new(self.lon0, self.lat0);
        }
        let (sin_phi1, cos_phi1) = self.lat0.to_radians().sin_cos();
        let c = 2.0 * (rho / (2.0 * EARTH_RADIUS)).min(1.0).asin();
        let (sin_c, cos_c) = c.sin_cos();
        let phi = (cos_c * sin_phi1 + p.y * sin_c * cos_phi1 / rho).asin();
        let dl = (p.x * sin_c).atan2(rho * cos_phi1 * cos_c - p.y * sin_phi1 * sin_c);
        Vector2::new(self.lon0 + dl.to_degrees(), phi.to_degrees())
    }
}
