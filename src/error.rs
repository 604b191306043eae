use thiserror::Error;

use crate::types::ProductId;

/// Errors produced while building the quantity matrix or computing recommendations.
#[derive(Error, Debug)]
pub enum RecommenderError {
    /// The input tables are malformed; nothing was computed.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The product has no column with a defined correlation besides itself.
    #[error("insufficient data to recommend for product {product_id}")]
    InsufficientData { product_id: ProductId },

    /// A recommended product id has no entry in the catalog.
    #[error("product {product_id} is not in the catalog")]
    UnknownProduct { product_id: ProductId },

    #[error("failed to read or write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecommenderError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        RecommenderError::InvalidInput { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, RecommenderError>;
