//! Hungarian method for the rectangular assignment problem
//!
//! Successive shortest augmenting paths with row/column potentials. Each
//! row is matched to a distinct column so that the summed cost is minimal.
//! Runs in O(n²m) for n rows and m columns, n ≤ m (taller matrices are
//! transposed first).

/// Result of solving an assignment problem
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    /// Matched `(row, column)` pairs, sorted by row
    pub pairs: Vec<(usize, usize)>,
    pub total_cost: i64,
}

/// Minimum-cost assignment for a rectangular cost matrix
///
/// Every row must have the same length. The number of pairs is
/// `min(rows, columns)`.
pub fn solve(costs: &[Vec<i64>]) -> Assignment {
    let rows = costs.len();
    let cols = costs.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Assignment::default();
    }

    let mut pairs: Vec<(usize, usize)> = if rows <= cols {
        solve_wide(costs, rows, cols)
            .into_iter()
            .enumerate()
            .collect()
    } else {
        let transposed: Vec<Vec<i64>> = (0..cols)
            .map(|col| costs.iter().map(|row| row[col]).collect())
            .collect();
        solve_wide(&transposed, cols, rows)
            .into_iter()
            .enumerate()
            .map(|(col, row)| (row, col))
            .collect()
    };
    pairs.sort_unstable();

    let total_cost = pairs.iter().map(|&(row, col)| costs[row][col]).sum();
    Assignment { pairs, total_cost }
}

/// Core solver for `n <= m`; returns the column matched to each row
fn solve_wide(costs: &[Vec<i64>], n: usize, m: usize) -> Vec<usize> {
    // 1-indexed; index 0 is the virtual column used to start each augmentation
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; m + 1];
    let mut matched_row = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for row in 1..=n {
        matched_row[0] = row;
        let mut col0 = 0;
        let mut min_slack = vec![i64::MAX; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[col0] = true;
            let row0 = matched_row[col0];
            let mut delta = i64::MAX;
            let mut col1 = 0;

            for col in 1..=m {
                if used[col] {
                    continue;
                }
                let reduced = costs[row0 - 1][col - 1] - u[row0] - v[col];
                if reduced < min_slack[col] {
                    min_slack[col] = reduced;
                    way[col] = col0;
                }
                if min_slack[col] < delta {
                    delta = min_slack[col];
                    col1 = col;
                }
            }

            for col in 0..=m {
                if used[col] {
                    u[matched_row[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_slack[col] -= delta;
                }
            }

            col0 = col1;
            if matched_row[col0] == 0 {
                break;
            }
        }

        // Flip the augmenting path
        loop {
            let prev = way[col0];
            matched_row[col0] = matched_row[prev];
            col0 = prev;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut row_to_col = vec![0usize; n];
    for col in 1..=m {
        if matched_row[col] != 0 {
            row_to_col[matched_row[col] - 1] = col - 1;
        }
    }
    row_to_col
}
