//! CSV loading of the input tables and export of the report.
//!
//! Headers follow the source workbook sheets: `OrderID,ProductID,Quantity`
//! for order details and `ProductID,ProductName` for products. Any other
//! columns are ignored. A record that fails to parse rejects the whole table.

use std::io::{Read, Write};
use std::path::Path;

use csv::{Reader, Writer};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{RecommenderError, Result};
use crate::types::{OrderLine, Product, ProductSummary, RecommendationRecord};

pub fn load_order_lines<P: AsRef<Path>>(path: P) -> Result<Vec<OrderLine>> {
    let reader = Reader::from_path(path.as_ref())?;
    read_table(reader, "order lines")
}

pub fn load_products<P: AsRef<Path>>(path: P) -> Result<Vec<Product>> {
    let reader = Reader::from_path(path.as_ref())?;
    read_table(reader, "products")
}

pub fn read_order_lines<R: Read>(input: R) -> Result<Vec<OrderLine>> {
    read_table(Reader::from_reader(input), "order lines")
}

pub fn read_products<R: Read>(input: R) -> Result<Vec<Product>> {
    read_table(Reader::from_reader(input), "products")
}

fn read_table<R: Read, T: DeserializeOwned>(mut reader: Reader<R>, table: &str) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for (index, result) in reader.deserialize().enumerate() {
        let record: T = result.map_err(|error| {
            RecommenderError::invalid_input(format!("{} record {}: {}", table, index + 1, error))
        })?;
        records.push(record);
    }
    debug!(table, records = records.len(), "loaded table");
    Ok(records)
}

pub fn write_records<W: Write>(records: &[RecommendationRecord], output: W) -> Result<()> {
    write_table(records, output)
}

pub fn write_summaries<W: Write>(summaries: &[ProductSummary], output: W) -> Result<()> {
    write_table(summaries, output)
}

fn write_table<W: Write, T: serde::Serialize>(rows: &[T], output: W) -> Result<()> {
    let mut writer = Writer::from_writer(output);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_tables_ignoring_extra_columns() {
        let dir = tempdir().unwrap();
        let orders_path = dir.path().join("order_details.csv");
        let products_path = dir.path().join("products.csv");

        fs::write(
            &orders_path,
            "OrderID,ProductID,UnitPrice,Quantity,Discount\n10248,11,14,12,0\n10248,42,9.8,10,0\n",
        ).unwrap();
        fs::write(
            &products_path,
            "ProductID,ProductName,SupplierID,CategoryID\n11,Queso Cabrales,5,4\n42,Singaporean Hokkien Fried Mee,20,5\n",
        ).unwrap();

        let order_lines = load_order_lines(&orders_path).unwrap();
        assert_eq!(order_lines, vec![
            OrderLine::new(10248, 11, 12.0),
            OrderLine::new(10248, 42, 10.0),
        ]);

        let products = load_products(&products_path).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].product_name, "Singaporean Hokkien Fried Mee");
    }

    #[test]
    fn test_non_numeric_quantity_is_invalid_input() {
        let input = "OrderID,ProductID,Quantity\n1,2,3\n1,3,many\n";
        let result = read_order_lines(input.as_bytes());
        assert!(matches!(result, Err(RecommenderError::InvalidInput { .. })));
    }

    #[test]
    fn test_missing_column_is_invalid_input() {
        let input = "ProductID\n1\n";
        let result = read_products(input.as_bytes());
        assert!(matches!(result, Err(RecommenderError::InvalidInput { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_products(dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn test_write_records() {
        let records = vec![RecommendationRecord {
            product_id: 1,
            product_name: "Chai".to_string(),
            recommended_product_id: 2,
            recommended_product_name: "Chang".to_string(),
            correlation: 0.5,
        }];

        let mut output = Vec::new();
        write_records(&records, &mut output).unwrap();

        let written = String::from_utf8(output).unwrap();
        assert_eq!(
            written,
            "ProductID,ProductName,Recommendation,NameRecommendation,Correlation\n1,Chai,2,Chang,0.5\n"
        );
    }
}
