use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{RecommenderError, Result};

pub type OrderId = u64;
pub type ProductId = u64;

/// Converts signed ids, as dataframes store them, rejecting negative ones.
pub fn ids_from_signed(ids: &[i64]) -> Result<Vec<u64>> {
    ids.iter()
        .map(|id| {
            u64::try_from(*id)
                .map_err(|_| RecommenderError::invalid_input(format!("negative id {}", id)))
        })
        .collect()
}

/// A single line item: how many units of a product were bought in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "OrderID")]
    pub order_id: OrderId,
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
}

impl OrderLine {
    pub fn new(order_id: OrderId, product_id: ProductId, quantity: f64) -> Self {
        Self { order_id, product_id, quantity }
    }
}

/// Catalog entry. Other catalog attributes are ignored when loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    #[serde(rename = "ProductName")]
    pub product_name: String,
}

impl Product {
    pub fn new(product_id: ProductId, product_name: impl Into<String>) -> Self {
        Self { product_id, product_name: product_name.into() }
    }
}

/// One row of the final report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRecord {
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Recommendation")]
    pub recommended_product_id: ProductId,
    #[serde(rename = "NameRecommendation")]
    pub recommended_product_name: String,
    #[serde(rename = "Correlation")]
    pub correlation: f64,
}

/// A product together with its correlation to some reference product.
///
/// The ordering is reversed so that a `BinaryHeap` keeps the *worst* entry on
/// top: higher correlation compares as smaller, and equal correlations fall
/// back to the lower product id (the earlier matrix column).
#[derive(Debug, Clone, Copy)]
pub struct SimilarProduct {
    pub product: ProductId,
    pub correlation: f64,
}

impl SimilarProduct {
    pub fn new(product: ProductId, correlation: f64) -> Self {
        SimilarProduct { product, correlation }
    }
}

impl Ord for SimilarProduct {
    fn cmp(&self, other: &Self) -> Ordering {
        other.correlation.total_cmp(&self.correlation)
            .then_with(|| self.product.cmp(&other.product))
    }
}

impl PartialOrd for SimilarProduct {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SimilarProduct {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimilarProduct {}

/// How often a product was ordered: distinct orders and total units.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProductSummary {
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    pub orders: usize,
    pub quantity: f64,
}

// Same reversed convention as SimilarProduct: more orders sorts first.
impl Ord for ProductSummary {
    fn cmp(&self, other: &Self) -> Ordering {
        other.orders.cmp(&self.orders)
            .then_with(|| other.quantity.total_cmp(&self.quantity))
            .then_with(|| self.product_id.cmp(&other.product_id))
    }
}

impl PartialOrd for ProductSummary {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ProductSummary {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ProductSummary {}
