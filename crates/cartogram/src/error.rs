use thiserror::Error;

/// Opaque failure reported by an external diffusion solver. Passed through untouched.
pub type SolverError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid GeoJSON at {at}: {message}")]
    GeoJson { at: String, message: String },

    #[error("feature {index}: unsupported geometry type \"{kind}\" (expected Polygon or MultiPolygon)")]
    UnsupportedGeometry { index: usize, kind: String },

    #[error("unknown projection \"{0}\"")]
    UnknownProjection(String),

    #[error(transparent)]
    Solver(SolverError),
}

impl Error {
    pub(crate) fn geojson(at: impl Into<String>, message: impl Into<String>) -> Self {
        Error::GeoJson {
            at: at.into(),
            message: message.into(),
        }
    }
}
