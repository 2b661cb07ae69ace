//! Global dynamic-programming engine shared by the pairwise and profile
//! aligners.
//!
//! Rows index the first input (`A`), columns the second (`B`). A move is
//! named after where it comes from: `Up` consumes a symbol of `A` against a
//! gap, `Left` consumes a symbol of `B` against a gap.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traceback {
    Diagonal,
    Up,
    Left,
    None,
}

/// Score and traceback matrices, stored row-major in flat vectors
pub struct DpMatrix {
    rows: usize,
    cols: usize,
    scores: Vec<f64>,
    trace: Vec<Traceback>,
}

impl DpMatrix {
    /// Fill an `(len_a + 1) x (len_b + 1)` matrix.
    ///
    /// `substitution(i, j)` scores `A[i]` against `B[j]` (0-based). A gap move
    /// costs `gap_extend` when the cell it comes from was reached by the same
    /// kind of gap move, `gap_open` otherwise. Ties prefer the diagonal, then
    /// `Up` over `Left`.
    pub fn fill<F>(len_a: usize, len_b: usize, gap_open: f64, gap_extend: f64, mut substitution: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let rows = len_a + 1;
        let cols = len_b + 1;
        let mut scores = vec![0.0f64; rows * cols];
        let mut trace = vec![Traceback::None; rows * cols];

        for i in 1..rows {
            scores[i * cols] = -(gap_open + gap_extend * (i - 1) as f64);
            trace[i * cols] = Traceback::Up;
        }
        for j in 1..cols {
            scores[j] = -(gap_open + gap_extend * (j - 1) as f64);
            trace[j] = Traceback::Left;
        }

        for i in 1..rows {
            for j in 1..cols {
                let here = i * cols + j;
                let above = here - cols;
                let before = here - 1;

                let diagonal = scores[above - 1] + substitution(i - 1, j - 1);

                let up_cost = if trace[above] == Traceback::Up {
                    gap_extend
                } else {
                    gap_open
                };
                let up = scores[above] - up_cost;

                let left_cost = if trace[before] == Traceback::Left {
                    gap_extend
                } else {
                    gap_open
                };
                let left = scores[before] - left_cost;

                let (best, direction) = if diagonal >= up && diagonal >= left {
                    (diagonal, Traceback::Diagonal)
                } else if up >= left {
                    (up, Traceback::Up)
                } else {
                    (left, Traceback::Left)
                };

                scores[here] = best;
                trace[here] = direction;
            }
        }

        Self {
            rows,
            cols,
            scores,
            trace,
        }
    }

    /// Score of the full global alignment (bottom-right cell)
    pub fn final_score(&self) -> f64 {
        self.scores[self.rows * self.cols - 1]
    }

    /// Moves from `[0][0]` to the bottom-right cell, in alignment order
    pub fn traceback(&self) -> Vec<Traceback> {
        let mut path = Vec::with_capacity(self.rows + self.cols);
        let mut i = self.rows - 1;
        let mut j = self.cols - 1;

        while i > 0 || j > 0 {
            let step = self.trace[i * self.cols + j];
            match step {
                Traceback::Diagonal => {
                    i -= 1;
                    j -= 1;
                }
                Traceback::Up => i -= 1,
                Traceback::Left => j -= 1,
                Traceback::None => break,
            }
            path.push(step);
        }

        path.reverse();
        path
    }
}
