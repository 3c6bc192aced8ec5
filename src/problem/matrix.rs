//! Customer-by-facility cost matrix.

use crate::error::FacilityError;

/// Dense cost table indexed `[customer][facility]`, stored row-major.
///
/// Rows are customers. Every customer row is also a candidate facility
/// site, so the number of rows is the number of potential facilities and
/// each row must hold at least that many columns.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Builds a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError::InvariantViolation`] if the matrix is empty,
    /// ragged, has fewer columns than rows, or holds a negative or
    /// non-finite cost.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, FacilityError> {
        let n = rows.len();
        if n == 0 {
            return Err(FacilityError::invariant("cost matrix has no rows"));
        }
        let cols = rows[0].len();
        if cols < n {
            return Err(FacilityError::invariant(format!(
                "cost matrix has {n} rows but only {cols} columns"
            )));
        }

        let mut data = Vec::with_capacity(n * cols);
        for (cust, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(FacilityError::invariant(format!(
                    "cost matrix row {cust} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            if let Some((fac, &c)) = row
                .iter()
                .enumerate()
                .find(|&(_, &c)| !c.is_finite() || c < 0.0)
            {
                return Err(FacilityError::invariant(format!(
                    "cost[{cust}][{fac}] = {c} is not a finite non-negative number"
                )));
            }
            data.extend(row);
        }

        Ok(Self {
            rows: n,
            cols,
            data,
        })
    }

    /// Builds a matrix from integer costs, the usual form of benchmark data.
    pub fn from_int_rows(rows: Vec<Vec<u32>>) -> Result<Self, FacilityError> {
        Self::from_rows(
            rows.into_iter()
                .map(|r| r.into_iter().map(f64::from).collect())
                .collect(),
        )
    }

    /// Number of customers (rows).
    pub fn num_customers(&self) -> usize {
        self.rows
    }

    /// Number of candidate facility sites, equal to the row count.
    pub fn num_potential_facilities(&self) -> usize {
        self.rows
    }

    /// Number of columns per row.
    pub fn num_columns(&self) -> usize {
        self.cols
    }

    /// Cost of serving `customer` from `facility`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, customer: usize, facility: usize) -> f64 {
        assert!(facility < self.cols, "facility {facility} out of bounds");
        self.data[customer * self.cols + facility]
    }

    /// Cost row of one customer.
    #[inline]
    pub fn row(&self, customer: usize) -> &[f64] {
        let start = customer * self.cols;
        &self.data[start..start + self.cols]
    }
}
