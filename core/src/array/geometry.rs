use crate::array::dataset::SensorSite;
use serde::{Deserialize, Serialize};

/// Scalar inputs describing the incoming wavefront.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunParameters {
    /// Seconds per kilometre.
    pub slowness: f64,
    /// Degrees clockwise from north towards the source.
    pub back_azimuth: f64,
    pub km_per_degree: f64,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            slowness: 0.0,
            back_azimuth: 0.0,
            km_per_degree: 111.19,
        }
    }
}

impl RunParameters {
    pub fn slowness_vector(&self) -> SlownessVector {
        SlownessVector::from_polar(self.slowness, self.back_azimuth, self.km_per_degree)
    }
}

/// Slowness decomposed into east (`x`) and north (`y`) components, in
/// seconds per degree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlownessVector {
    pub x: f64,
    pub y: f64,
}

impl SlownessVector {
    pub fn from_polar(slowness: f64, back_azimuth_deg: f64, km_per_degree: f64) -> Self {
        let per_degree = slowness * km_per_degree;
        let azimuth = back_azimuth_deg.to_radians();
        Self {
            x: per_degree * azimuth.sin(),
            y: per_degree * azimuth.cos(),
        }
    }

    /// Time shift for a sensor offset from the array centroid.
    pub fn time_shift(&self, lat_rel: f64, lon_rel: f64) -> f64 {
        self.x * lon_rel + self.y * lat_rel
    }
}

/// Arithmetic mean of the sensor positions as `(latitude, longitude)`.
pub fn centroid(sites: &[SensorSite]) -> (f64, f64) {
    if sites.is_empty() {
        return (0.0, 0.0);
    }
    let count = sites.len() as f64;
    let (lat_sum, lon_sum) = sites.iter().fold((0.0, 0.0), |(lat, lon), site| {
        (lat + site.latitude, lon + site.longitude)
    });
    (lat_sum / count, lon_sum / count)
}
