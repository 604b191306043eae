use fnv::{FnvHashMap, FnvHashSet};
use tracing::{debug, info, warn};

use crate::column_accumulator::{pearson, CoOccurrence, ColumnAccumulator, ColumnStats};
use crate::error::{RecommenderError, Result};
use crate::quantity_matrix::QuantityMatrix;
use crate::report::{Report, SkippedProduct};
use crate::topk::TopK;
use crate::types::{OrderLine, Product, ProductId, RecommendationRecord, SimilarProduct};

/// Item-to-item recommendations from the correlation of per-order quantities.
///
/// For a product P, every other product is scored by the Pearson correlation
/// of its matrix column with P's column across all orders. Products whose
/// column has no variance have no defined correlation and are never
/// candidates. The recommendation for P is its best non-self match: the
/// highest correlation, ties going to the lower product id.
pub struct Recommender {
    matrix: QuantityMatrix,
    column_stats: Vec<ColumnStats>,
    catalog: Vec<Product>,
    names: FnvHashMap<ProductId, String>,
}

impl Recommender {

    /// Validates both tables, then builds the quantity matrix.
    pub fn new(order_lines: &[OrderLine], products: &[Product]) -> Result<Self> {
        validate_catalog(products)?;
        let matrix = QuantityMatrix::from_order_lines(order_lines)?;
        Self::with_matrix(matrix, products)
    }

    pub fn from_matrix(matrix: QuantityMatrix, products: &[Product]) -> Result<Self> {
        validate_catalog(products)?;
        Self::with_matrix(matrix, products)
    }

    fn with_matrix(matrix: QuantityMatrix, products: &[Product]) -> Result<Self> {

        let names: FnvHashMap<ProductId, String> = products.iter()
            .map(|product| (product.product_id, product.product_name.clone()))
            .collect();

        let num_rows = matrix.num_orders();
        let column_stats: Vec<ColumnStats> = (0..matrix.num_products())
            .map(|column| ColumnStats::from_entries(matrix.column_entries(column).1, num_rows))
            .collect();

        Ok(Self { matrix, column_stats, catalog: products.to_vec(), names })
    }

    pub fn matrix(&self) -> &QuantityMatrix {
        &self.matrix
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn product_name(&self, product_id: ProductId) -> Result<&str> {
        self.names.get(&product_id)
            .map(String::as_str)
            .ok_or(RecommenderError::UnknownProduct { product_id })
    }

    /// Pearson correlation of two products' columns, `None` where undefined.
    pub fn correlation(&self, product_id: ProductId, other_product_id: ProductId) -> Option<f64> {
        let column = self.matrix.column_of(product_id)?;
        let other_column = self.matrix.column_of(other_product_id)?;
        let num_rows = self.matrix.num_orders();

        let stats = &self.column_stats[column];
        if column == other_column {
            return stats.centered_sum_of_squares.map(|_| 1.0)
        }

        let other_stats = &self.column_stats[other_column];
        let co_occurrence = sparse_co_occurrence(
            self.matrix.column_entries(column),
            self.matrix.column_entries(other_column),
            stats.mean,
            other_stats.mean
        );

        pearson(&co_occurrence, stats, other_stats, num_rows)
    }

    /// All products with a defined correlation to `product_id`, best first.
    ///
    /// The product itself always leads the list with a correlation of exactly
    /// 1.0, even when another product also reaches 1.0. The rest follow by
    /// correlation descending, ties by ascending product id.
    pub fn ranked_candidates(&self, product_id: ProductId) -> Result<Vec<SimilarProduct>> {
        let column = self.matrix.column_of(product_id)
            .ok_or(RecommenderError::InsufficientData { product_id })?;

        let mut accumulator = ColumnAccumulator::new(self.matrix.num_products());
        let mut candidates: Vec<SimilarProduct> = self.correlations_of(column, &mut accumulator)
            .into_iter()
            .map(|(other_column, correlation)| {
                SimilarProduct::new(self.matrix.product_ids()[other_column], correlation)
            })
            .collect();

        candidates.sort_by(|a, b| {
            (a.product != product_id).cmp(&(b.product != product_id))
                .then_with(|| a.cmp(b))
        });

        Ok(candidates)
    }

    /// The best non-self match for `product_id`.
    ///
    /// Fails with `InsufficientData` unless at least two columns, the
    /// product's own included, have a defined correlation with it. That covers
    /// products never ordered, products with constant quantities and products
    /// whose every potential partner is constant.
    pub fn best_match(&self, product_id: ProductId) -> Result<SimilarProduct> {
        let mut accumulator = ColumnAccumulator::new(self.matrix.num_products());
        self.best_match_with(product_id, &mut accumulator)
    }

    /// The report row for one product.
    pub fn recommend(&self, product_id: ProductId) -> Result<RecommendationRecord> {
        let mut accumulator = ColumnAccumulator::new(self.matrix.num_products());
        self.recommend_with(product_id, &mut accumulator)
    }

    /// Recommendations for the whole catalog, sorted by correlation descending.
    ///
    /// Products that cannot be recommended for are left out of the records
    /// and listed with their error in the report's skipped products.
    pub fn report(&self) -> Report {
        let mut accumulator = ColumnAccumulator::new(self.matrix.num_products());

        let mut records = Vec::with_capacity(self.catalog.len());
        let mut skipped = Vec::new();

        for product in &self.catalog {
            match self.recommend_with(product.product_id, &mut accumulator) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!(product = product.product_id, %reason, "skipping product");
                    skipped.push(SkippedProduct { product_id: product.product_id, reason });
                }
            }
        }

        info!(records = records.len(), skipped = skipped.len(), "assembled recommendation report");

        Report::new(records, skipped)
    }

    fn recommend_with(
        &self,
        product_id: ProductId,
        accumulator: &mut ColumnAccumulator
    ) -> Result<RecommendationRecord> {
        let product_name = self.product_name(product_id)?.to_string();
        let best = self.best_match_with(product_id, accumulator)?;
        let recommended_product_name = self.product_name(best.product)?.to_string();

        Ok(RecommendationRecord {
            product_id,
            product_name,
            recommended_product_id: best.product,
            recommended_product_name,
            correlation: best.correlation,
        })
    }

    fn best_match_with(
        &self,
        product_id: ProductId,
        accumulator: &mut ColumnAccumulator
    ) -> Result<SimilarProduct> {
        let column = self.matrix.column_of(product_id)
            .ok_or(RecommenderError::InsufficientData { product_id })?;

        let correlations = self.correlations_of(column, accumulator);
        if correlations.len() < 2 {
            return Err(RecommenderError::InsufficientData { product_id })
        }

        let mut topk = TopK::new(1);
        for (other_column, correlation) in correlations {
            if other_column != column {
                topk.offer(SimilarProduct::new(self.matrix.product_ids()[other_column], correlation));
            }
        }

        let best = topk.into_sorted_vec()
            .pop()
            .ok_or(RecommenderError::InsufficientData { product_id })?;

        debug!(product = product_id, recommended = best.product, correlation = best.correlation, "best match");

        Ok(best)
    }

    fn correlations_of(&self, column: usize, accumulator: &mut ColumnAccumulator) -> Vec<(usize, f64)> {
        let mean = self.column_stats[column].mean;
        let (rows, quantities) = self.matrix.column_entries(column);
        for (row, quantity) in rows.iter().zip(quantities.iter()) {
            let (other_columns, other_quantities) = self.matrix.row_entries(*row);
            for (other_column, other_quantity) in other_columns.iter().zip(other_quantities.iter()) {
                let other_mean = self.column_stats[*other_column].mean;
                accumulator.add_to(*other_column, quantity - mean, other_quantity - other_mean);
            }
        }

        accumulator.correlations_and_clear(column, &self.column_stats, self.matrix.num_orders())
    }
}

fn validate_catalog(products: &[Product]) -> Result<()> {
    let mut seen = FnvHashSet::default();
    for product in products {
        if !seen.insert(product.product_id) {
            return Err(RecommenderError::invalid_input(format!(
                "product {} appears more than once in the catalog",
                product.product_id
            )));
        }
    }
    Ok(())
}

/// Centred cross terms of two sparse columns with sorted indices.
fn sparse_co_occurrence(
    a: (&[usize], &[f64]),
    b: (&[usize], &[f64]),
    a_mean: f64,
    b_mean: f64
) -> CoOccurrence {
    let (a_indices, a_data) = a;
    let (b_indices, b_data) = b;

    let mut co_occurrence = CoOccurrence::default();
    let (mut i, mut j) = (0, 0);
    while i < a_indices.len() && j < b_indices.len() {
        if a_indices[i] < b_indices[j] {
            i += 1;
        } else if a_indices[i] > b_indices[j] {
            j += 1;
        } else {
            co_occurrence.add(a_data[i] - a_mean, b_data[j] - b_mean);
            i += 1;
            j += 1;
        }
    }
    co_occurrence
}
