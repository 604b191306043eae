use numpy::PyArray1;
use pyo3::exceptions::{PyKeyError, PyLookupError, PyValueError};
use pyo3::prelude::*;

use crate::error::RecommenderError;
use crate::recommender::Recommender as CoreRecommender;
use crate::types::{ids_from_signed, OrderLine, Product};

impl From<RecommenderError> for PyErr {
    fn from(error: RecommenderError) -> Self {
        match error {
            RecommenderError::UnknownProduct { .. } => PyKeyError::new_err(error.to_string()),
            RecommenderError::InsufficientData { .. } => PyLookupError::new_err(error.to_string()),
            _ => PyValueError::new_err(error.to_string()),
        }
    }
}

#[pyclass]
struct Recommender {
    recommender: CoreRecommender,
}

#[pymethods]
impl Recommender {

    fn best_match(&self, product_id: u64) -> PyResult<(u64, f64)> {
        let best = self.recommender.best_match(product_id)?;
        Ok((best.product, best.correlation))
    }

    fn recommend(&self, product_id: u64) -> PyResult<(u64, String, u64, String, f64)> {
        let record = self.recommender.recommend(product_id)?;
        Ok((
            record.product_id,
            record.product_name,
            record.recommended_product_id,
            record.recommended_product_name,
            record.correlation,
        ))
    }

    /// Returns the report rows and the skipped products with the reason each was skipped.
    fn report(&self) -> PyResult<(Vec<(u64, String, u64, String, f64)>, Vec<(u64, String)>)> {
        let report = self.recommender.report();

        let skipped = report.skipped()
            .iter()
            .map(|skipped| (skipped.product_id, skipped.reason.to_string()))
            .collect();

        let rows = report.into_records()
            .into_iter()
            .map(|record| (
                record.product_id,
                record.product_name,
                record.recommended_product_id,
                record.recommended_product_name,
                record.correlation,
            ))
            .collect();
        Ok((rows, skipped))
    }

    #[new]
    fn new(
        order_ids: &PyArray1<i64>,
        product_ids: &PyArray1<i64>,
        quantities: &PyArray1<f64>,
        catalog_ids: Vec<i64>,
        catalog_names: Vec<String>,
    ) -> PyResult<Self> {

        let order_ids = to_ids(order_ids.to_vec().map_err(|e| PyValueError::new_err(e.to_string()))?)?;
        let product_ids = to_ids(product_ids.to_vec().map_err(|e| PyValueError::new_err(e.to_string()))?)?;
        let catalog_ids = to_ids(catalog_ids)?;
        let quantities = quantities.to_vec().map_err(|e| PyValueError::new_err(e.to_string()))?;

        if order_ids.len() != product_ids.len() || order_ids.len() != quantities.len() {
            return Err(PyValueError::new_err("order line arrays differ in length"));
        }
        if catalog_ids.len() != catalog_names.len() {
            return Err(PyValueError::new_err("catalog ids and names differ in length"));
        }

        let order_lines: Vec<OrderLine> = order_ids.into_iter()
            .zip(product_ids)
            .zip(quantities)
            .map(|((order_id, product_id), quantity)| OrderLine::new(order_id, product_id, quantity))
            .collect();

        let products: Vec<Product> = catalog_ids.into_iter()
            .zip(catalog_names)
            .map(|(product_id, product_name)| Product::new(product_id, product_name))
            .collect();

        let recommender = CoreRecommender::new(&order_lines, &products)?;

        Ok(Self { recommender })
    }
}

// pandas hands out int64 id columns
fn to_ids(ids: Vec<i64>) -> PyResult<Vec<u64>> {
    Ok(ids_from_signed(&ids)?)
}

#[pymodule]
fn product_correlation(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<Recommender>()?;
    Ok(())
}
