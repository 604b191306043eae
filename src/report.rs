use fnv::FnvHashMap;

use crate::error::RecommenderError;
use crate::types::{ProductId, RecommendationRecord};

/// A catalog product left out of the report, with the reason.
#[derive(Debug)]
pub struct SkippedProduct {
    pub product_id: ProductId,
    pub reason: RecommenderError,
}

/// Recommendations for a catalog, sorted by correlation descending.
///
/// Records with equal correlation keep their catalog order.
#[derive(Debug)]
pub struct Report {
    records: Vec<RecommendationRecord>,
    skipped: Vec<SkippedProduct>,
}

impl Report {

    pub(crate) fn new(mut records: Vec<RecommendationRecord>, skipped: Vec<SkippedProduct>) -> Self {
        // stable, so ties stay in catalog order
        records.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
        Self { records, skipped }
    }

    pub fn records(&self) -> &[RecommendationRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[SkippedProduct] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<RecommendationRecord> {
        self.records
    }

    /// How often each product is recommended, most recommended first, ties by product id.
    pub fn recommendation_counts(&self) -> Vec<(ProductId, usize)> {
        let mut counts: FnvHashMap<ProductId, usize> = FnvHashMap::default();
        for record in &self.records {
            *counts.entry(record.recommended_product_id).or_insert(0) += 1;
        }

        let mut counts: Vec<(ProductId, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}
