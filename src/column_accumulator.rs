/// Sufficient statistics of one matrix column for Pearson correlation.
///
/// Deviations are taken from the column mean before squaring, so large but
/// nearly equal quantities keep their variance.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ColumnStats {
    pub(crate) mean: f64,
    pub(crate) stored: usize,
    /// Sum of `quantity - mean` over the stored entries only.
    pub(crate) stored_centered_sum: f64,
    /// Sum of squared deviations over all rows, `None` for a constant column.
    pub(crate) centered_sum_of_squares: Option<f64>,
}

impl ColumnStats {

    /// Statistics of a column given its stored quantities and the number of rows.
    pub(crate) fn from_entries(quantities: &[f64], num_rows: usize) -> Self {
        if num_rows == 0 || is_constant(quantities, num_rows) {
            let mean = quantities.first().copied().unwrap_or(0.0);
            return ColumnStats {
                mean,
                stored: quantities.len(),
                stored_centered_sum: 0.0,
                centered_sum_of_squares: None,
            }
        }

        let mean = quantities.iter().sum::<f64>() / num_rows as f64;
        let unstored = (num_rows - quantities.len()) as f64;

        let mut stored_centered_sum = 0.0;
        let mut sum_of_squares = unstored * mean * mean;
        for quantity in quantities {
            let deviation = quantity - mean;
            stored_centered_sum += deviation;
            sum_of_squares += deviation * deviation;
        }

        ColumnStats {
            mean,
            stored: quantities.len(),
            stored_centered_sum,
            centered_sum_of_squares: Some(sum_of_squares),
        }
    }
}

// Unstored cells are zero, so a partially stored column is only constant at 0.
fn is_constant(quantities: &[f64], num_rows: usize) -> bool {
    match quantities.first() {
        None => true,
        Some(first) => {
            quantities.iter().all(|quantity| quantity == first)
                && (quantities.len() == num_rows || *first == 0.0)
        }
    }
}

/// Centred cross terms of two columns over the rows where both are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct CoOccurrence {
    pub(crate) cross: f64,
    pub(crate) centered_sum: f64,
    pub(crate) other_centered_sum: f64,
    pub(crate) overlap: usize,
}

impl CoOccurrence {

    pub(crate) fn add(&mut self, deviation: f64, other_deviation: f64) {
        self.cross += deviation * other_deviation;
        self.centered_sum += deviation;
        self.other_centered_sum += other_deviation;
        self.overlap += 1;
    }
}

/// Pearson correlation of two columns, `None` if either is constant.
///
/// The covariance is the two-pass centred sum, split over the rows where both
/// columns are stored, where only one is, and where neither is.
pub(crate) fn pearson(
    co_occurrence: &CoOccurrence,
    stats: &ColumnStats,
    other_stats: &ColumnStats,
    num_rows: usize
) -> Option<f64> {
    let centered = stats.centered_sum_of_squares?;
    let other_centered = other_stats.centered_sum_of_squares?;

    let neither = num_rows + co_occurrence.overlap - stats.stored - other_stats.stored;

    let covariance = co_occurrence.cross
        - other_stats.mean * (stats.stored_centered_sum - co_occurrence.centered_sum)
        - stats.mean * (other_stats.stored_centered_sum - co_occurrence.other_centered_sum)
        + neither as f64 * stats.mean * other_stats.mean;

    let correlation = covariance / (centered * other_centered).sqrt();

    Some(correlation.clamp(-1.0, 1.0))
}

const NOT_OCCUPIED: isize = -1;
const NO_HEAD: isize = -2;

/// Accumulates the centred cross terms of one column with every other column.
///
/// Only the touched columns are tracked in an intrusive list, so clearing
/// after each column costs the number of co-occurring columns rather than the
/// width of the matrix.
pub(crate) struct ColumnAccumulator {
    co_occurrences: Vec<CoOccurrence>,
    non_zeros: Vec<isize>,
    head: isize,
}

impl ColumnAccumulator {

    pub(crate) fn new(num_columns: usize) -> Self {
        ColumnAccumulator {
            co_occurrences: vec![CoOccurrence::default(); num_columns],
            non_zeros: vec![NOT_OCCUPIED; num_columns],
            head: NO_HEAD,
        }
    }

    pub(crate) fn add_to(&mut self, column: usize, deviation: f64, other_deviation: f64) {
        self.co_occurrences[column].add(deviation, other_deviation);

        if self.non_zeros[column] == NOT_OCCUPIED {
            self.non_zeros[column] = self.head;
            self.head = column as isize;
        }
    }

    /// Correlations of `current_column` with every column that has one, in
    /// column order, then resets the accumulator. The column itself is
    /// reported as exactly 1.0 whenever it has variance.
    pub(crate) fn correlations_and_clear(
        &mut self,
        current_column: usize,
        column_stats: &[ColumnStats],
        num_rows: usize
    ) -> Vec<(usize, f64)> {

        let current_stats = &column_stats[current_column];
        let mut correlations = Vec::with_capacity(column_stats.len());

        if current_stats.centered_sum_of_squares.is_some() {
            for (other_column, other_stats) in column_stats.iter().enumerate() {
                if other_column == current_column {
                    correlations.push((other_column, 1.0));
                    continue
                }

                let co_occurrence = &self.co_occurrences[other_column];
                if let Some(correlation) = pearson(co_occurrence, current_stats, other_stats, num_rows) {
                    correlations.push((other_column, correlation));
                }
            }
        }

        self.clear();

        correlations
    }

    fn clear(&mut self) {
        while self.head != NO_HEAD {
            let column = self.head as usize;
            self.head = self.non_zeros[column];
            self.co_occurrences[column] = CoOccurrence::default();
            self.non_zeros[column] = NOT_OCCUPIED;
        }
    }
}
