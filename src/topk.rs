use std::collections::BinaryHeap;

/// Bounded selection of the `k` smallest entries under `T`'s ordering.
///
/// The entry types in this crate order "better" as smaller, so this keeps the
/// k best. The heap root is always the worst retained entry.
pub(crate) struct TopK<T: Ord> {
    heap: BinaryHeap<T>,
    k: usize,
}

impl<T: Ord> TopK<T> {

    pub(crate) fn new(k: usize) -> Self {
        Self { heap: BinaryHeap::with_capacity(k), k }
    }

    /// Returns true if the entry was retained.
    pub(crate) fn offer(&mut self, offered_entry: T) -> bool {
        if self.k == 0 {
            return false
        }

        if self.heap.len() < self.k {
            self.heap.push(offered_entry);
            return true
        }

        match self.heap.peek_mut() {
            Some(mut top) if offered_entry < *top => {
                *top = offered_entry;
                true
            }
            _ => false,
        }
    }

    /// Retained entries, best first.
    pub(crate) fn into_sorted_vec(self) -> Vec<T> {
        self.heap.into_sorted_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SimilarProduct;

    #[test]
    fn test_keeps_best_k() {
        let mut topk = TopK::new(2);
        topk.offer(SimilarProduct::new(1, 0.5));
        topk.offer(SimilarProduct::new(2, 0.8));
        topk.offer(SimilarProduct::new(3, 0.1));
        topk.offer(SimilarProduct::new(4, 0.9));

        let n = topk.into_sorted_vec();
        assert_eq!(n.len(), 2);
        check_entry(&n[0], 4, 0.9);
        check_entry(&n[1], 2, 0.8);
    }

    #[test]
    fn test_offer_reports_whether_retained() {
        let mut topk = TopK::new(1);
        assert!(topk.offer(SimilarProduct::new(1, 0.5)));
        assert!(!topk.offer(SimilarProduct::new(2, 0.4)));
        assert!(topk.offer(SimilarProduct::new(3, 0.7)));

        let n = topk.into_sorted_vec();
        assert_eq!(n.len(), 1);
        check_entry(&n[0], 3, 0.7);
    }

    #[test]
    fn test_tie_keeps_earlier_product() {
        let mut topk = TopK::new(1);
        topk.offer(SimilarProduct::new(5, 0.6));
        topk.offer(SimilarProduct::new(2, 0.6));
        topk.offer(SimilarProduct::new(8, 0.6));

        let n = topk.into_sorted_vec();
        check_entry(&n[0], 2, 0.6);
    }

    #[test]
    fn test_zero_k_keeps_nothing() {
        let mut topk = TopK::new(0);
        assert!(!topk.offer(SimilarProduct::new(1, 1.0)));
        assert!(topk.into_sorted_vec().is_empty());
    }

    fn check_entry(entry: &SimilarProduct, expected_product: u64, expected_correlation: f64) {
        assert_eq!(entry.product, expected_product);
        assert!((entry.correlation - expected_correlation).abs() < 0.0001);
    }
}
