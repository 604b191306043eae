use product_correlation::io::write_records;
use product_correlation::{OrderLine, Product, QuantityMatrix, Recommender, RecommenderError};

const PRODUCT_A: u64 = 1;
const PRODUCT_B: u64 = 2;
const PRODUCT_C: u64 = 3;
const NEVER_ORDERED: u64 = 4;

fn small_shop() -> (Vec<OrderLine>, Vec<Product>) {
    let order_lines = vec![
        OrderLine::new(1, PRODUCT_A, 2.0), OrderLine::new(1, PRODUCT_B, 2.0),
        OrderLine::new(2, PRODUCT_A, 3.0), OrderLine::new(2, PRODUCT_B, 3.0),
        OrderLine::new(3, PRODUCT_A, 1.0), OrderLine::new(3, PRODUCT_C, 5.0),
    ];
    let products = vec![
        Product::new(PRODUCT_A, "Product A"),
        Product::new(PRODUCT_B, "Product B"),
        Product::new(PRODUCT_C, "Product C"),
        Product::new(NEVER_ORDERED, "Product D"),
    ];
    (order_lines, products)
}

fn larger_shop() -> (Vec<OrderLine>, Vec<Product>) {
    let mut order_lines = Vec::new();
    for order in 0..60u64 {
        for product in 0..12u64 {
            let quantity = (order * order * 3 + product * 5 + product * product) % 7;
            if quantity > 2 {
                order_lines.push(OrderLine::new(10_000 + order, product, quantity as f64));
            }
        }
    }
    let products = (0..14u64)
        .map(|product| Product::new(product, format!("Product {}", product)))
        .collect();
    (order_lines, products)
}

#[test]
fn test_proportional_product_is_recommended() {
    let (order_lines, products) = small_shop();
    let recommender = Recommender::new(&order_lines, &products).unwrap();

    let record = recommender.recommend(PRODUCT_A).unwrap();
    assert_eq!(record.recommended_product_id, PRODUCT_B);
    assert_eq!(record.recommended_product_name, "Product B");
    assert!((record.correlation - 0.98198050).abs() < 0.0001);

    let correlation_with_c = recommender.correlation(PRODUCT_A, PRODUCT_C).unwrap();
    assert!(correlation_with_c < record.correlation);
}

#[test]
fn test_report_omits_never_ordered_products() {
    let (order_lines, products) = small_shop();
    let report = Recommender::new(&order_lines, &products).unwrap().report();

    assert_eq!(report.len(), 3);
    assert_eq!(report.skipped().len(), 1);
    assert_eq!(report.skipped()[0].product_id, NEVER_ORDERED);
    assert!(matches!(
        report.skipped()[0].reason,
        RecommenderError::InsufficientData { product_id: NEVER_ORDERED }
    ));
}

#[test]
fn test_matrix_has_no_missing_cells() {
    let (order_lines, _) = larger_shop();
    let matrix = QuantityMatrix::from_order_lines(&order_lines).unwrap();

    let mut stored = 0;
    for order_id in matrix.order_ids() {
        for product_id in matrix.product_ids() {
            let quantity = matrix.get(*order_id, *product_id).unwrap();
            if quantity != 0.0 {
                stored += 1;
            }
        }
    }
    assert_eq!(stored, order_lines.len());
}

#[test]
fn test_no_product_is_recommended_to_itself() {
    let (order_lines, products) = larger_shop();
    let recommender = Recommender::new(&order_lines, &products).unwrap();
    let report = recommender.report();

    assert!(!report.is_empty());
    for record in report.records() {
        assert_ne!(record.product_id, record.recommended_product_id);

        let ranked = recommender.ranked_candidates(record.product_id).unwrap();
        assert_eq!(ranked[0].product, record.product_id);
        assert_eq!(ranked[0].correlation, 1.0);
        assert_eq!(ranked[1].product, record.recommended_product_id);
    }

    // products 12 and 13 are in the catalog but never ordered
    let skipped: Vec<_> = report.skipped().iter().map(|s| s.product_id).collect();
    assert_eq!(skipped, vec![12, 13]);
}

#[test]
fn test_report_is_sorted_by_correlation() {
    let (order_lines, products) = larger_shop();
    let report = Recommender::new(&order_lines, &products).unwrap().report();

    for pair in report.records().windows(2) {
        assert!(pair[0].correlation >= pair[1].correlation);
    }
}

#[test]
fn test_report_is_idempotent() {
    let (order_lines, products) = larger_shop();

    let mut first = Vec::new();
    let report = Recommender::new(&order_lines, &products).unwrap().report();
    write_records(report.records(), &mut first).unwrap();

    let mut second = Vec::new();
    let report = Recommender::new(&order_lines, &products).unwrap().report();
    write_records(report.records(), &mut second).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_malformed_quantity_fails_before_computation() {
    let (mut order_lines, products) = small_shop();
    order_lines.push(OrderLine::new(4, PRODUCT_B, f64::INFINITY));

    assert!(matches!(
        Recommender::new(&order_lines, &products),
        Err(RecommenderError::InvalidInput { .. })
    ));
}
