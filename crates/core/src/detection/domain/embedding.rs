/// A face embedding, L2-normalized at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Embedding {
    values: Vec<f32>,
}

impl Embedding {
    pub fn new(mut values: Vec<f32>) -> Self {
        l2_normalize(&mut values);
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dot product of the normalized vectors. Mismatched lengths score 0.
    pub fn cosine_similarity(&self, other: &Embedding) -> f64 {
        if self.values.len() != other.values.len() {
            return 0.0;
        }
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (*a as f64) * (*b as f64))
            .sum()
    }
}

fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_normalizes() {
        let e = Embedding::new(vec![3.0, 4.0]);
        assert_relative_eq!(e.values()[0], 0.6, epsilon = 1e-6);
        assert_relative_eq!(e.values()[1], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let e = Embedding::new(vec![0.0, 0.0, 0.0]);
        assert!(e.values().iter().all(|v| *v == 0.0));
        assert_eq!(e.len(), 3);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = Embedding::new(vec![1.0, 2.0, 3.0]);
        assert_relative_eq!(a.cosine_similarity(&a), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_and_opposite() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![0.0, 5.0]);
        let c = Embedding::new(vec![-2.0, 0.0]);
        assert_relative_eq!(a.cosine_similarity(&b), 0.0, epsilon = 1e-6);
        assert_relative_eq!(a.cosine_similarity(&c), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_similarity_length_mismatch_is_zero() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![1.0, 0.0, 0.0]);
        assert_relative_eq!(a.cosine_similarity(&b), 0.0);
    }
}
