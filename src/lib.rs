//! Item-to-item product recommendations from historical orders.
//!
//! Order lines are pivoted into an orders x products quantity matrix. Each
//! product is then paired with the other product whose per-order quantities
//! correlate most strongly with its own (Pearson), and the pairs are reported
//! sorted by correlation.
//!
//! ```
//! use product_correlation::{OrderLine, Product, Recommender};
//!
//! let order_lines = vec![
//!     OrderLine::new(1, 10, 2.0), OrderLine::new(1, 20, 2.0),
//!     OrderLine::new(2, 10, 3.0), OrderLine::new(2, 20, 3.0),
//!     OrderLine::new(3, 10, 1.0), OrderLine::new(3, 30, 5.0),
//! ];
//! let products = vec![
//!     Product::new(10, "Chai"), Product::new(20, "Chang"), Product::new(30, "Ikura"),
//! ];
//!
//! let recommender = Recommender::new(&order_lines, &products).unwrap();
//! assert_eq!(recommender.best_match(10).unwrap().product, 20);
//! ```

pub mod error;
pub mod io;
pub mod quantity_matrix;
pub mod recommender;
pub mod report;
pub mod types;

mod column_accumulator;
mod topk;

#[cfg(feature = "python")]
mod python;

pub use error::{RecommenderError, Result};
pub use quantity_matrix::QuantityMatrix;
pub use recommender::Recommender;
pub use report::{Report, SkippedProduct};
pub use types::{
    OrderId, OrderLine, Product, ProductId, ProductSummary, RecommendationRecord, SimilarProduct,
};
