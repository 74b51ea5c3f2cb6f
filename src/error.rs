use thiserror::Error;

/// Errors raised while building a cloth. Nothing past construction fails.
#[derive(Debug, Error)]
pub enum ClothError {
    #[error("triangle index list has {len} entries, expected a multiple of 3")]
    MalformedTriangles { len: usize },

    #[error("vertex list has {len} floats, expected a multiple of 3")]
    MalformedVertices { len: usize },

    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },

    #[error("triangle references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type ClothResult<T> = Result<T, ClothError>;
