//! Spatial domain of a request.

use crate::request::error::RequestError;
use std::fmt;

/// Spatial extent of the downloaded grid.
///
/// `Area` is a bounding box given by its four edges in degrees, in the order
/// the retrieval service expects them: north, west, south, east.
///
/// # Examples
///
/// ```
/// use era5::Domain;
///
/// let europe = Domain::area(72.0, -25.0, 34.0, 45.0).unwrap();
/// assert_eq!(europe.to_area_string().as_deref(), Some("72/-25/34/45"));
/// assert_eq!(europe.cache_component(), "72,-25,34,45");
/// assert_eq!(Domain::Global.cache_component(), "global");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Domain {
    #[default]
    Global,
    Area {
        north: f64,
        west: f64,
        south: f64,
        east: f64,
    },
}

impl Domain {
    /// Creates a bounding box, checking that the edges describe a valid area.
    pub fn area(north: f64, west: f64, south: f64, east: f64) -> Result<Self, RequestError> {
        let edges = [north, west, south, east];
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(RequestError::InvalidDomain("edges must be finite".to_string()));
        }
        if !(-90.0..=90.0).contains(&north) || !(-90.0..=90.0).contains(&south) {
            return Err(RequestError::InvalidDomain(format!(
                "latitudes must lie within -90..=90, got north={north} south={south}"
            )));
        }
        if !(-360.0..=360.0).contains(&west) || !(-360.0..=360.0).contains(&east) {
            return Err(RequestError::InvalidDomain(format!(
                "longitudes must lie within -360..=360, got west={west} east={east}"
            )));
        }
        if north < south {
            return Err(RequestError::InvalidDomain(format!(
                "north edge {north} lies south of south edge {south}"
            )));
        }
        Ok(Domain::Area {
            north: unsigned_zero(north),
            west: unsigned_zero(west),
            south: unsigned_zero(south),
            east: unsigned_zero(east),
        })
    }

    fn edges(&self) -> Option<[f64; 4]> {
        match *self {
            Domain::Global => None,
            Domain::Area {
                north,
                west,
                south,
                east,
            } => Some([north, west, south, east]),
        }
    }

    fn join_edges(&self, separator: &str) -> Option<String> {
        self.edges().map(|edges| {
            edges
                .iter()
                .map(|e| unsigned_zero(*e).to_string())
                .collect::<Vec<_>>()
                .join(separator)
        })
    }

    /// The `area` field of a retrieval request, absent for global downloads.
    pub fn to_area_string(&self) -> Option<String> {
        self.join_edges("/")
    }

    /// The domain part of a cache file name.
    pub fn cache_component(&self) -> String {
        self.join_edges(",").unwrap_or_else(|| "global".to_string())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_component())
    }
}

/// `-0.0` renders as `-0`; the same edge must always render the same way.
fn unsigned_zero(edge: f64) -> f64 {
    if edge == 0.0 {
        0.0
    } else {
        edge
    }
}
