//! Dense Jonker-Volgenant solver for the linear assignment problem.
//!
//! [`lapjv`] solves square problems. [`exec_lapjv`] is the front end used by
//! the tracker: it accepts rectangular `f32` matrices and a cost limit, and
//! pads the problem so that "no match" becomes an assignment to a dummy row
//! or column.

use ndarray::Array2;
use thiserror::Error;

const LARGE: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LapjvError {
    #[error("cost matrix is {rows}x{cols}; non-square matrices need extend_cost")]
    NotSquare { rows: usize, cols: usize },
    #[error("no augmenting path found for free row {row}")]
    NoAugmentingPath { row: usize },
    #[error("augmenting path from free row {row} exceeds {n} steps")]
    PathTooLong { row: usize, n: usize },
}

/// Solution of a (possibly rectangular) assignment problem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    /// Column assigned to each row, `None` when the row stays unmatched.
    pub row_solution: Vec<Option<usize>>,
    /// Row assigned to each column, `None` when the column stays unmatched.
    pub col_solution: Vec<Option<usize>>,
}

impl Assignment {
    fn unmatched(rows: usize, cols: usize) -> Self {
        Self {
            row_solution: vec![None; rows],
            col_solution: vec![None; cols],
        }
    }

    /// Total cost of the matched pairs.
    pub fn cost(&self, cost: &Array2<f32>) -> f64 {
        self.row_solution
            .iter()
            .enumerate()
            .filter_map(|(i, j)| j.map(|j| cost[[i, j]] as f64))
            .sum()
    }
}

/// Solve a rectangular assignment problem with an optional cost limit.
///
/// When `extend_cost` is set or `cost_limit` is finite, the `rows x cols`
/// matrix is embedded in a square matrix of size `rows + cols`. The two
/// off-diagonal padding blocks cost `cost_limit / 2` (or one more than the
/// largest real cost when no limit is given), the dummy-to-dummy block costs
/// zero. A real pair is therefore only chosen when it is cheaper than leaving
/// both sides unmatched.
pub fn exec_lapjv(
    cost: &Array2<f32>,
    extend_cost: bool,
    cost_limit: f32,
) -> Result<Assignment, LapjvError> {
    let (n_rows, n_cols) = cost.dim();

    if n_rows != n_cols && !extend_cost {
        return Err(LapjvError::NotSquare {
            rows: n_rows,
            cols: n_cols,
        });
    }

    if n_rows == 0 || n_cols == 0 {
        return Ok(Assignment::unmatched(n_rows, n_cols));
    }

    let limited = cost_limit < f32::MAX;
    let square = if extend_cost || limited {
        let n = n_rows + n_cols;
        let pad = if limited {
            cost_limit / 2.0
        } else {
            cost.iter().copied().fold(-1.0_f32, f32::max) + 1.0
        };

        Array2::from_shape_fn((n, n), |(i, j)| {
            if i < n_rows && j < n_cols {
                cost[[i, j]] as f64
            } else if i >= n_rows && j >= n_cols {
                0.0
            } else {
                pad as f64
            }
        })
    } else {
        cost.mapv(f64::from)
    };

    let (x, y) = lapjv(&square)?;

    let row_solution = x[..n_rows]
        .iter()
        .map(|&j| (j < n_cols).then_some(j))
        .collect();
    let col_solution = y[..n_cols]
        .iter()
        .map(|&i| (i < n_rows).then_some(i))
        .collect();

    Ok(Assignment {
        row_solution,
        col_solution,
    })
}

/// Solve a square assignment problem.
///
/// Returns `(x, y)` where `x[i]` is the column assigned to row `i` and `y[j]`
/// the row assigned to column `j`.
pub fn lapjv(cost: &Array2<f64>) -> Result<(Vec<usize>, Vec<usize>), LapjvError> {
    let (n, cols) = cost.dim();
    if n != cols {
        return Err(LapjvError::NotSquare { rows: n, cols });
    }

    let mut solver = Solver {
        n,
        cost,
        x: vec![None; n],
        y: vec![None; n],
        v: vec![0.0; n],
    };

    let mut free_rows = solver.column_reduction_transfer();

    let mut pass = 0;
    while !free_rows.is_empty() && pass < 2 {
        free_rows = solver.augmenting_row_reduction(free_rows);
        pass += 1;
    }

    if !free_rows.is_empty() {
        solver.augment(&free_rows)?;
    }

    let x = solver
        .x
        .into_iter()
        .enumerate()
        .map(|(row, j)| j.ok_or(LapjvError::NoAugmentingPath { row }))
        .collect::<Result<Vec<_>, _>>()?;

    let mut y = vec![0; n];
    for (i, &j) in x.iter().enumerate() {
        y[j] = i;
    }

    Ok((x, y))
}

struct Solver<'a> {
    n: usize,
    cost: &'a Array2<f64>,
    /// Column assigned to each row.
    x: Vec<Option<usize>>,
    /// Row assigned to each column.
    y: Vec<Option<usize>>,
    /// Dual column prices.
    v: Vec<f64>,
}

impl Solver<'_> {
    #[inline]
    fn reduced(&self, i: usize, j: usize) -> f64 {
        self.cost[[i, j]] - self.v[j]
    }

    /// Column reduction and reduction transfer. Returns the free rows.
    fn column_reduction_transfer(&mut self) -> Vec<usize> {
        let n = self.n;
        let mut col_min_row = vec![0usize; n];
        self.v.fill(LARGE);

        for i in 0..n {
            for j in 0..n {
                let c = self.cost[[i, j]];
                if c < self.v[j] {
                    self.v[j] = c;
                    col_min_row[j] = i;
                }
            }
        }

        let mut unique = vec![true; n];
        for j in (0..n).rev() {
            let i = col_min_row[j];
            if self.x[i].is_none() {
                self.x[i] = Some(j);
                self.y[j] = Some(i);
            } else {
                unique[i] = false;
                self.y[j] = None;
            }
        }

        let mut free_rows = Vec::new();
        for i in 0..n {
            match self.x[i] {
                None => free_rows.push(i),
                Some(j) if unique[i] => {
                    let min = (0..n)
                        .filter(|&j2| j2 != j)
                        .map(|j2| self.reduced(i, j2))
                        .fold(LARGE, f64::min);
                    self.v[j] -= min;
                }
                Some(_) => {}
            }
        }

        free_rows
    }

    /// One pass of augmenting row reduction. Returns the rows still free.
    fn augmenting_row_reduction(&mut self, mut free_rows: Vec<usize>) -> Vec<usize> {
        let n = self.n;
        let n_free = free_rows.len();
        let mut current = 0;
        let mut new_free = 0;
        let mut rr_count = 0;

        while current < n_free {
            rr_count += 1;
            let free_i = free_rows[current];
            current += 1;

            let mut j1 = 0;
            let mut v1 = self.reduced(free_i, 0);
            let mut j2 = None;
            let mut v2 = LARGE;

            for j in 1..n {
                let c = self.reduced(free_i, j);
                if c < v2 {
                    if c >= v1 {
                        v2 = c;
                        j2 = Some(j);
                    } else {
                        v2 = v1;
                        v1 = c;
                        j2 = Some(j1);
                        j1 = j;
                    }
                }
            }

            let mut i0 = self.y[j1];
            let v1_new = self.v[j1] - (v2 - v1);
            let v1_lowers = v1_new < self.v[j1];

            if rr_count < current * n {
                if v1_lowers {
                    self.v[j1] = v1_new;
                } else if let (Some(_), Some(alt)) = (i0, j2) {
                    j1 = alt;
                    i0 = self.y[alt];
                }

                if let Some(i0) = i0 {
                    if v1_lowers {
                        current -= 1;
                        free_rows[current] = i0;
                    } else {
                        free_rows[new_free] = i0;
                        new_free += 1;
                    }
                }
            } else if let Some(i0) = i0 {
                free_rows[new_free] = i0;
                new_free += 1;
            }

            self.x[free_i] = Some(j1);
            self.y[j1] = Some(free_i);
        }

        free_rows.truncate(new_free);
        free_rows
    }

    /// Shortest augmenting path for every remaining free row.
    fn augment(&mut self, free_rows: &[usize]) -> Result<(), LapjvError> {
        let n = self.n;
        let mut pred = vec![0usize; n];

        'rows: for &free_i in free_rows {
            let mut j = self.find_path(free_i, &mut pred)?;

            for _ in 0..n {
                let i = pred[j];
                self.y[j] = Some(i);
                let next = self.x[i].replace(j);
                if i == free_i {
                    continue 'rows;
                }
                j = next.ok_or(LapjvError::NoAugmentingPath { row: free_i })?;
            }

            return Err(LapjvError::PathTooLong { row: free_i, n });
        }

        Ok(())
    }

    /// Dijkstra-like search over reduced costs from `start_i`. Columns in
    /// `cols[..lo]` are READY, `cols[lo..hi]` are SCAN, `cols[hi..]` are TODO.
    /// Returns the free column ending the path and updates the prices of the
    /// READY columns.
    fn find_path(&mut self, start_i: usize, pred: &mut [usize]) -> Result<usize, LapjvError> {
        let n = self.n;
        let mut cols: Vec<usize> = (0..n).collect();
        let mut d: Vec<f64> = (0..n).map(|j| self.reduced(start_i, j)).collect();
        pred.fill(start_i);

        let mut lo = 0;
        let mut hi = 0;
        let mut n_ready = 0;
        let mut final_j = None;

        while final_j.is_none() {
            if lo == hi {
                if lo >= n {
                    return Err(LapjvError::NoAugmentingPath { row: start_i });
                }
                n_ready = lo;
                hi = find_min_columns(lo, &d, &mut cols);
                for &j in &cols[lo..hi] {
                    if self.y[j].is_none() {
                        final_j = Some(j);
                    }
                }
            }

            if final_j.is_none() {
                final_j = self.scan(&mut lo, &mut hi, &mut d, &mut cols, pred)?;
            }
        }

        let min_d = d[cols[lo]];
        for &j in &cols[..n_ready] {
            self.v[j] += d[j] - min_d;
        }

        final_j.ok_or(LapjvError::NoAugmentingPath { row: start_i })
    }

    /// Relax TODO columns through the rows assigned to SCAN columns.
    fn scan(
        &self,
        lo: &mut usize,
        hi: &mut usize,
        d: &mut [f64],
        cols: &mut [usize],
        pred: &mut [usize],
    ) -> Result<Option<usize>, LapjvError> {
        let n = self.n;

        while *lo != *hi {
            let j = cols[*lo];
            *lo += 1;
            let i = self.y[j].ok_or(LapjvError::NoAugmentingPath { row: j })?;
            let min_d = d[j];
            let h = self.reduced(i, j) - min_d;

            for k in *hi..n {
                let j = cols[k];
                let cred = self.reduced(i, j) - h;
                if cred < d[j] {
                    d[j] = cred;
                    pred[j] = i;
                    if cred == min_d {
                        if self.y[j].is_none() {
                            return Ok(Some(j));
                        }
                        cols[k] = cols[*hi];
                        cols[*hi] = j;
                        *hi += 1;
                    }
                }
            }
        }

        Ok(None)
    }
}

/// Move the columns of `cols[lo..]` with minimal `d` to the front of that
/// range. Returns the end of the new SCAN range.
fn find_min_columns(lo: usize, d: &[f64], cols: &mut [usize]) -> usize {
    let mut hi = lo + 1;
    let mut min_d = d[cols[lo]];

    for k in hi..cols.len() {
        let j = cols[k];
        if d[j] <= min_d {
            if d[j] < min_d {
                hi = lo;
                min_d = d[j];
            }
            cols[k] = cols[hi];
            cols[hi] = j;
            hi += 1;
        }
    }

    hi
}
