// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Row-major layer geometry

use serde::{Deserialize, Serialize};

use super::error::{NeuralError, Result};

/// Layer shape, 1D to 4D, row-major
///
/// A 4D shape `[pool_y, pool_x, unit_y, unit_x]` describes a layer of
/// grouped units; each (pool_y, pool_x) group is one inhibitory sub-pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: &[usize]) -> Result<Self> {
        if dims.is_empty() || dims.len() > 4 {
            return Err(NeuralError::InvalidShape(format!(
                "expected 1 to 4 dimensions, got {}",
                dims.len()
            )));
        }
        if dims.iter().any(|&d| d == 0) {
            return Err(NeuralError::InvalidShape(format!(
                "zero-sized dimension in {:?}",
                dims
            )));
        }
        Ok(Self { dims: dims.to_vec() })
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_4d(&self) -> bool {
        self.dims.len() == 4
    }

    /// Number of sub-pools (0 unless 4D)
    pub fn num_pools(&self) -> usize {
        if self.is_4d() {
            self.dims[0] * self.dims[1]
        } else {
            0
        }
    }

    /// Units per sub-pool (whole layer unless 4D)
    pub fn pool_size(&self) -> usize {
        if self.is_4d() {
            self.dims[2] * self.dims[3]
        } else {
            self.len()
        }
    }

    /// Flat index of a full coordinate
    pub fn offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.dims.len() {
            return Err(NeuralError::InvalidShape(format!(
                "index {:?} has wrong rank for shape {:?}",
                index, self.dims
            )));
        }
        let mut flat = 0;
        for (&i, &d) in index.iter().zip(&self.dims) {
            if i >= d {
                return Err(NeuralError::IndexOutOfRange { index: i, len: d });
            }
            flat = flat * d + i;
        }
        Ok(flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_4d_pools() {
        let sh = Shape::new(&[2, 3, 2, 2]).unwrap();
        assert_eq!(sh.len(), 24);
        assert_eq!(sh.num_pools(), 6);
        assert_eq!(sh.pool_size(), 4);
        assert_eq!(sh.offset(&[1, 0, 0, 0]).unwrap(), 12);
        assert_eq!(sh.offset(&[0, 2, 1, 1]).unwrap(), 11);
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(Shape::new(&[]).is_err());
        assert!(Shape::new(&[3, 0]).is_err());
        assert!(Shape::new(&[1, 1, 1, 1, 1]).is_err());
        let sh = Shape::new(&[2, 2]).unwrap();
        assert_eq!(
            sh.offset(&[2, 0]),
            Err(NeuralError::IndexOutOfRange { index: 2, len: 2 })
        );
    }
}
