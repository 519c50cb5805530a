use std::cmp::Ordering;
use std::ops::AddAssign;

use num::Num;

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    /// ドット積を計算するメソッド
    /// 両ベクトルの indices をマージしながら一致したものだけ掛ける
    ///
    /// # Arguments
    /// * `other` - 他のベクトル
    ///
    /// # Returns
    /// * `R` - ドット積の結果
    #[inline]
    pub fn dot<R>(&self, other: &Self) -> R
    where
        R: Num + AddAssign,
        N: Into<R>,
    {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );

        let mut result = R::zero();
        let (self_inds, self_vals) = (self.as_ind_slice(), self.as_val_slice());
        let (other_inds, other_vals) = (other.as_ind_slice(), other.as_val_slice());

        let mut i = 0;
        let mut j = 0;
        while i < self_inds.len() && j < other_inds.len() {
            match self_inds[i].cmp(&other_inds[j]) {
                Ordering::Equal => {
                    let a: R = self_vals[i].into();
                    let b: R = other_vals[j].into();
                    result += a * b;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    /// 二乗ノルム Σ(a_i^2)
    #[inline]
    pub fn norm_sq<R>(&self) -> R
    where
        R: Num + AddAssign + Copy,
        N: Into<R>,
    {
        let mut result = R::zero();
        for &val in self.as_val_slice() {
            let val: R = val.into();
            result += val * val;
        }
        result
    }
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy + Into<f64>,
{
    /// L2 ノルム
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_sq::<f64>().sqrt()
    }

    /// コサイン類似度
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    /// どちらかのノルムが 0 のときは 0 とする
    ///
    /// `self_norm` は呼び出し側で計算済みの `self.norm()`、
    /// 同じクエリを多数の行と比べるときに一度だけ求めればよい
    #[inline]
    pub fn cosine_with_norm(&self, self_norm: f64, other: &Self) -> f64 {
        let other_norm = other.norm();
        if self_norm == 0.0 || other_norm == 0.0 {
            return 0.0;
        }
        let dot: f64 = self.dot(other);
        (dot / (self_norm * other_norm)).clamp(-1.0, 1.0)
    }
}

impl ZeroSpVec<f64> {
    /// Scale to unit L2 norm. A zero vector stays zero.
    pub fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            self.map_values(|v| v / norm);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_of(len: usize, pairs: &[(u32, f64)]) -> ZeroSpVec<f64> {
        ZeroSpVec::from_pairs(len, pairs.to_vec())
    }

    #[test]
    fn dot_merges_sparse_indices() {
        let a = vec_of(5, &[(0, 1.0), (2, 2.0), (4, 3.0)]);
        let b = vec_of(5, &[(1, 7.0), (2, 0.5), (4, 2.0)]);
        let dot: f64 = a.dot(&b);
        assert!((dot - 7.0).abs() < 1e-12);
    }

    #[test]
    fn dot_of_integer_vectors_widens() {
        let a: ZeroSpVec<u32> = ZeroSpVec::from_pairs(3, vec![(0, 2), (1, 3)]);
        let b: ZeroSpVec<u32> = ZeroSpVec::from_pairs(3, vec![(1, 4), (2, 9)]);
        let dot: u64 = a.dot(&b);
        assert_eq!(dot, 12);
        assert_eq!(a.norm_sq::<u64>(), 13);
    }

    #[test]
    fn cosine_is_zero_for_zero_vector() {
        let a = vec_of(3, &[(0, 1.0)]);
        let zero = ZeroSpVec::zeros(3);
        assert_eq!(a.cosine_with_norm(a.norm(), &zero), 0.0);
        assert_eq!(zero.cosine_with_norm(0.0, &a), 0.0);
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let a = vec_of(3, &[(0, 1.0), (2, 2.0)]);
        let b = vec_of(3, &[(0, 3.0), (2, 6.0)]);
        assert!((a.cosine_with_norm(a.norm(), &b) - 1.0).abs() < 1e-12);
        let opposite = vec_of(3, &[(0, -1.0), (2, -2.0)]);
        assert!((a.cosine_with_norm(a.norm(), &opposite) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn l2_normalize_gives_unit_norm() {
        let mut a = vec_of(4, &[(1, 3.0), (3, 4.0)]);
        a.l2_normalize();
        assert!((a.norm() - 1.0).abs() < 1e-12);
        assert!((a.get(1).copied().unwrap_or_default() - 0.6).abs() < 1e-12);
    }
}
