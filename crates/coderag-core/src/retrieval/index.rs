//! Flat (brute-force) inner-product index.

use std::cmp::Ordering;

use coderag_types::error::IndexError;

/// Exhaustive inner-product index over fixed-length `f32` vectors.
///
/// Row ids are assigned in insertion order starting at 0. There is no
/// removal and no persistence.
#[derive(Debug, Clone)]
pub struct FlatIpIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIpIndex {
    pub fn new(dim: usize) -> Result<Self, IndexError> {
        if dim == 0 {
            return Err(IndexError::ZeroDimension);
        }
        Ok(Self {
            dim,
            data: Vec::new(),
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append vectors. All-or-nothing: a wrong-sized vector rejects the batch.
    pub fn add<V: AsRef<[f32]>>(&mut self, vectors: &[V]) -> Result<(), IndexError> {
        if let Some(bad) = vectors.iter().find(|v| v.as_ref().len() != self.dim) {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim,
                actual: bad.as_ref().len(),
            });
        }
        self.data.reserve(vectors.len() * self.dim);
        for v in vectors {
            self.data.extend_from_slice(v.as_ref());
        }
        Ok(())
    }

    /// Return up to `min(k, len)` `(row id, score)` pairs, best first.
    ///
    /// Equal scores keep ascending id order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, IndexError> {
        if query.len() != self.dim {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut hits: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(id, row)| (id, dot(row, query)))
            .collect();

        hits.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        hits.truncate(k);
        Ok(hits)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scale `v` to unit length in place. A zero vector is left unchanged.
pub fn normalize_l2(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(FlatIpIndex::new(0), Err(IndexError::ZeroDimension)));
    }

    #[test]
    fn test_add_rejects_wrong_dimension() {
        let mut index = FlatIpIndex::new(3).unwrap();
        let err = index
            .add(&[vec![1.0, 0.0, 0.0], vec![1.0, 0.0]])
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert!(index.is_empty());
    }

    #[test]
    fn test_search_orders_by_descending_score() {
        let mut index = FlatIpIndex::new(2).unwrap();
        index
            .add(&[vec![0.0, 1.0], vec![1.0, 0.0], vec![0.6, 0.8]])
            .unwrap();
        assert_eq!(index.len(), 3);

        let hits = index.search(&[1.0, 0.0], 3).unwrap();
        let ids: Vec<usize> = hits.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert!(hits.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_search_caps_at_corpus_size() {
        let mut index = FlatIpIndex::new(2).unwrap();
        index.add(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(index.search(&[1.0, 1.0], 15).unwrap().len(), 2);
        assert_eq!(index.search(&[1.0, 1.0], 1).unwrap().len(), 1);
        assert!(index.search(&[1.0, 1.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut index = FlatIpIndex::new(2).unwrap();
        index
            .add(&[vec![0.5, 0.5], vec![0.0, 1.0], vec![0.5, 0.5]])
            .unwrap();
        let hits = index.search(&[1.0, 1.0], 3).unwrap();
        assert_eq!(hits[0].0, 0);
        assert_eq!(hits[1].0, 1);
        assert_eq!(hits[2].0, 2);
    }

    #[test]
    fn test_search_on_empty_index() {
        let index = FlatIpIndex::new(4).unwrap();
        assert!(index.search(&[0.0; 4], 5).unwrap().is_empty());
        assert!(index.search(&[0.0; 3], 5).is_err());
    }

    #[test]
    fn test_normalize_l2() {
        let mut v = vec![3.0, 4.0];
        normalize_l2(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        normalize_l2(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}
