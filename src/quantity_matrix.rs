use fnv::FnvHashMap;
use sprs::{CsMat, TriMat};
use tracing::debug;

use crate::error::{RecommenderError, Result};
use crate::topk::TopK;
use crate::types::{OrderId, OrderLine, ProductId, ProductSummary};

/// Orders x products table of purchased quantities.
///
/// Rows are the distinct order ids in ascending order, columns the distinct
/// product ids in ascending order. Every cell is defined: pairs that never
/// appear in the order lines read as `0.0`. The data is kept twice, column
/// major for walking a product's orders and row major for walking an order's
/// products.
pub struct QuantityMatrix {
    order_ids: Vec<OrderId>,
    product_ids: Vec<ProductId>,
    order_index: FnvHashMap<OrderId, usize>,
    product_index: FnvHashMap<ProductId, usize>,
    by_product: CsMat<f64>,
    by_order: CsMat<f64>,
}

impl QuantityMatrix {

    /// Pivots order lines into a matrix. Repeated (order, product) pairs are summed.
    ///
    /// Fails with `InvalidInput` before building anything if there are no
    /// order lines or any quantity is not a finite number.
    pub fn from_order_lines(order_lines: &[OrderLine]) -> Result<Self> {

        if order_lines.is_empty() {
            return Err(RecommenderError::invalid_input("no order lines"));
        }

        if let Some(line) = order_lines.iter().find(|line| !line.quantity.is_finite()) {
            return Err(RecommenderError::invalid_input(format!(
                "quantity {} for order {} and product {} is not a number",
                line.quantity, line.order_id, line.product_id
            )));
        }

        let order_ids = sorted_distinct(order_lines.iter().map(|line| line.order_id));
        let product_ids = sorted_distinct(order_lines.iter().map(|line| line.product_id));

        let order_index: FnvHashMap<OrderId, usize> = order_ids.iter()
            .enumerate()
            .map(|(row, order_id)| (*order_id, row))
            .collect();
        let product_index: FnvHashMap<ProductId, usize> = product_ids.iter()
            .enumerate()
            .map(|(column, product_id)| (*product_id, column))
            .collect();

        let mut cells: FnvHashMap<(usize, usize), f64> =
            FnvHashMap::with_capacity_and_hasher(order_lines.len(), Default::default());

        for line in order_lines {
            let cell = (order_index[&line.order_id], product_index[&line.product_id]);
            *cells.entry(cell).or_insert(0.0) += line.quantity;
        }

        let shape = (order_ids.len(), product_ids.len());
        let mut triplets = TriMat::with_capacity(shape, cells.len());
        for ((row, column), quantity) in cells.iter() {
            triplets.add_triplet(*row, *column, *quantity);
        }

        let by_product: CsMat<f64> = triplets.to_csc();
        let by_order: CsMat<f64> = triplets.to_csr();

        debug!(
            orders = shape.0,
            products = shape.1,
            order_lines = order_lines.len(),
            merged = order_lines.len() - cells.len(),
            "built quantity matrix"
        );

        Ok(Self { order_ids, product_ids, order_index, product_index, by_product, by_order })
    }

    pub fn num_orders(&self) -> usize {
        self.order_ids.len()
    }

    pub fn num_products(&self) -> usize {
        self.product_ids.len()
    }

    pub fn order_ids(&self) -> &[OrderId] {
        &self.order_ids
    }

    pub fn product_ids(&self) -> &[ProductId] {
        &self.product_ids
    }

    pub fn column_of(&self, product_id: ProductId) -> Option<usize> {
        self.product_index.get(&product_id).copied()
    }

    pub fn row_of(&self, order_id: OrderId) -> Option<usize> {
        self.order_index.get(&order_id).copied()
    }

    /// Quantity of `product_id` in `order_id`; `None` only if either id is not in the matrix.
    pub fn get(&self, order_id: OrderId, product_id: ProductId) -> Option<f64> {
        let row = self.row_of(order_id)?;
        let column = self.column_of(product_id)?;
        Some(self.by_product.get(row, column).copied().unwrap_or(0.0))
    }

    /// The dense, zero-filled column of a product, in row order.
    pub fn column(&self, product_id: ProductId) -> Option<Vec<f64>> {
        let column = self.column_of(product_id)?;
        let mut dense = vec![0.0; self.num_orders()];
        let (rows, quantities) = self.column_entries(column);
        for (row, quantity) in rows.iter().zip(quantities.iter()) {
            dense[*row] = *quantity;
        }
        Some(dense)
    }

    /// Non-zero rows and quantities of a column.
    pub(crate) fn column_entries(&self, column: usize) -> (&[usize], &[f64]) {
        let range = self.by_product.indptr().outer_inds_sz(column);
        (&self.by_product.indices()[range.clone()], &self.by_product.data()[range])
    }

    /// Non-zero columns and quantities of a row.
    pub(crate) fn row_entries(&self, row: usize) -> (&[usize], &[f64]) {
        let range = self.by_order.indptr().outer_inds_sz(row);
        (&self.by_order.indices()[range.clone()], &self.by_order.data()[range])
    }

    /// Distinct orders and total quantity per product, in column order.
    pub fn product_summaries(&self) -> Vec<ProductSummary> {
        (0..self.num_products())
            .map(|column| {
                let (rows, quantities) = self.column_entries(column);
                ProductSummary {
                    product_id: self.product_ids[column],
                    orders: rows.len(),
                    quantity: quantities.iter().sum(),
                }
            })
            .collect()
    }

    /// The `n` products appearing in the most distinct orders, most ordered first.
    pub fn most_ordered(&self, n: usize) -> Vec<ProductSummary> {
        let mut topk = TopK::new(n);
        for summary in self.product_summaries() {
            topk.offer(summary);
        }
        topk.into_sorted_vec()
    }
}

fn sorted_distinct<I: Iterator<Item = u64>>(ids: I) -> Vec<u64> {
    let mut ids: Vec<u64> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
