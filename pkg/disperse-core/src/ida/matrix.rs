/*
 * disperse: information dispersal for fault-tolerant storage and routing
 * Copyright (C) 2024-2026 The disperse authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::fmt;

use crate::ida::gf::FieldElem;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("decoding matrix must be square")]
    NonSquare,

    #[error("zero pivot value in decoding matrix")]
    ZeroPivot,
}

/// A rectangular matrix of field elements, stored row-major in a single
/// flat allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    elems: Vec<FieldElem>,
}

impl Matrix {
    /// A zero-filled `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            elems: vec![FieldElem::ZERO; rows * cols],
        }
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut mat = Self::new(n, n);
        for i in 0..n {
            mat.set(i, i, FieldElem::ONE);
        }
        mat
    }

    /// Builds a matrix from row slices. All rows must have the same length;
    /// ragged input is rejected as [`Error::NonSquare`].
    pub fn from_rows<'a, I>(rows: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'a [FieldElem]>,
    {
        let mut elems = Vec::new();
        let mut nrows = 0;
        let mut cols = None;
        for row in rows {
            match cols {
                None => cols = Some(row.len()),
                Some(c) if c != row.len() => return Err(Error::NonSquare),
                Some(_) => {}
            }
            elems.extend_from_slice(row);
            nrows += 1;
        }
        Ok(Self {
            rows: nrows,
            cols: cols.unwrap_or(0),
            elems,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, r: usize, c: usize) -> FieldElem {
        self.elems[r * self.cols + c]
    }

    pub fn set(&mut self, r: usize, c: usize, v: FieldElem) {
        self.elems[r * self.cols + c] = v;
    }

    /// Inverts the matrix over the field, leaving `self` untouched.
    ///
    /// Plain Gauss-Jordan elimination on the augmented `[A | I]` form,
    /// `O(m^3)` in the row count. Rabin's Cauchy-form encoding matrices
    /// admit `O(m^2)` inversion, but that construction constrains the
    /// encoding rows; here they stay arbitrary, thresholds stay small, and
    /// inversion runs once per reconstruction.
    pub fn invert(&self) -> Result<Matrix, Error> {
        if self.rows != self.cols {
            return Err(Error::NonSquare);
        }
        let m = self.rows;

        let mut out = Matrix::new(m, 2 * m);
        for r in 0..m {
            for c in 0..m {
                out.set(r, c, self.get(r, c));
            }
            out.set(r, m + r, FieldElem::ONE);
        }

        for r in 0..m {
            // A well-formed encoding matrix never produces a zero pivot; a
            // corrupted or duplicated row can.
            let x = out.get(r, r);
            if x == FieldElem::ZERO {
                return Err(Error::ZeroPivot);
            }
            for c in 0..2 * m {
                out.set(r, c, out.get(r, c) / x);
            }
            for r1 in 0..m {
                if r1 == r {
                    continue;
                }
                // Row r now has a 1 in column r, so this entry is the
                // multiplier that zeroes column r of row r1.
                let y = out.get(r1, r);
                for c in 0..2 * m {
                    let v = out.get(r1, c) - y * out.get(r, c);
                    out.set(r1, c, v);
                }
            }
        }

        // The left half now holds the identity; the right half is the
        // inverse.
        let mut inv = Matrix::new(m, m);
        for r in 0..m {
            for c in 0..m {
                inv.set(r, c, out.get(r, m + c));
            }
        }
        Ok(inv)
    }

    /// The matrix product `self * other`.
    ///
    /// # Panics
    /// Panics if the column count of `self` differs from the row count of
    /// `other`.
    pub fn mul(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, other.rows,
            "dimension mismatch in matrix product"
        );
        let mut out = Matrix::new(self.rows, other.cols);
        for r in 0..self.rows {
            for c in 0..other.cols {
                let mut acc = FieldElem::ZERO;
                for k in 0..self.cols {
                    acc += self.get(r, k) * other.get(k, c);
                }
                out.set(r, c, acc);
            }
        }
        out
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                if c != 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.get(r, c))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Matrix {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let n = usize::arbitrary(g) % 8 + 1;
        let mut mat = Matrix::new(n, n);
        for r in 0..n {
            for c in 0..n {
                mat.set(r, c, FieldElem::arbitrary(g));
            }
        }
        mat
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use quickcheck::TestResult;

    fn from_inner_rows(rows: &[&[u32]]) -> Matrix {
        let rows = rows
            .iter()
            .map(|r| r.iter().copied().map(FieldElem::from_inner).collect())
            .collect::<Vec<Vec<_>>>();
        Matrix::from_rows(rows.iter().map(Vec::as_slice)).unwrap()
    }

    #[quickcheck]
    fn invert_roundtrip(mat: Matrix) -> TestResult {
        let inv = match mat.invert() {
            Ok(inv) => inv,
            // Elimination without row exchanges gives up on a zero pivot.
            Err(Error::ZeroPivot) => return TestResult::discard(),
            Err(err) => panic!("unexpected inversion failure: {}", err),
        };
        TestResult::from_bool(mat.mul(&inv) == Matrix::identity(mat.rows()))
    }

    #[quickcheck]
    fn invert_does_not_mutate(mat: Matrix) -> bool {
        let copy = mat.clone();
        let _ = mat.invert();
        mat == copy
    }

    #[test]
    fn identity_is_self_inverse() {
        let id = Matrix::identity(5);
        assert_eq!(id.invert().unwrap(), id);
    }

    #[test]
    fn known_inverse() {
        let mat = from_inner_rows(&[&[1, 2], &[3, 4]]);
        let inv = mat.invert().unwrap();
        assert_eq!(mat.mul(&inv), Matrix::identity(2));
        assert_eq!(inv.mul(&mat), Matrix::identity(2));
    }

    #[test]
    fn non_square_is_rejected() {
        let mat = Matrix::new(2, 3);
        assert!(matches!(mat.invert(), Err(Error::NonSquare)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let short = [FieldElem::ONE];
        let long = [FieldElem::ONE, FieldElem::ONE];
        let err = Matrix::from_rows(vec![&short[..], &long[..]]);
        assert!(matches!(err, Err(Error::NonSquare)));
    }

    #[test]
    fn duplicate_rows_hit_zero_pivot() {
        let mat = from_inner_rows(&[&[1, 2], &[1, 2]]);
        assert!(matches!(mat.invert(), Err(Error::ZeroPivot)));
    }

    #[test]
    fn dependent_rows_hit_zero_pivot() {
        // Third row is the sum of the first two.
        let mat = from_inner_rows(&[&[1, 0, 2], &[0, 1, 3], &[1, 1, 5]]);
        assert!(matches!(mat.invert(), Err(Error::ZeroPivot)));
    }

    #[test]
    fn display_renders_rows() {
        let mat = from_inner_rows(&[&[1, 2], &[3, 65536]]);
        assert_eq!(mat.to_string(), "1 2\n3 65536\n");
    }
}
