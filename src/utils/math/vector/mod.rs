pub mod math;
pub mod serde;

use std::fmt::{self, Debug};

use num::Num;

/// ZeroSpVecは0要素を疎とした疎ベクトルの実装です
/// indices と values を持ち
/// indices は非ゼロ要素の論理インデックスを保持し、
/// values は要素の値を保持します
///
/// 要素は indices の昇順でソートされていることを保証します
#[derive(Clone, PartialEq)]
pub struct ZeroSpVec<N>
where
    N: Num,
{
    inds: Vec<u32>,
    vals: Vec<N>,
    len: usize,
    zero: N,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        ZeroSpVec {
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
            len: 0,
            zero: N::zero(),
        }
    }

    /// Zero vector with `len` logical dimensions
    #[inline]
    pub fn zeros(len: usize) -> Self {
        let mut vec = Self::new();
        vec.len = len;
        vec
    }

    /// Build from (index, value) pairs in any order.
    /// Duplicate indices are summed, zero values are dropped.
    ///
    /// # Arguments
    /// * `len` - logical dimension
    /// * `pairs` - (index, value) entries, every index must be `< len`
    pub fn from_pairs(len: usize, mut pairs: Vec<(u32, N)>) -> Self {
        pairs.sort_unstable_by_key(|(idx, _)| *idx);
        let mut vec = Self::with_capacity(pairs.len());
        vec.len = len;
        for (idx, val) in pairs {
            debug_assert!((idx as usize) < len, "index out of bounds");
            match vec.inds.last() {
                Some(&last) if last == idx => {
                    if let Some(acc) = vec.vals.last_mut() {
                        *acc = *acc + val;
                    }
                }
                _ => {
                    vec.inds.push(idx);
                    vec.vals.push(val);
                }
            }
        }
        vec.drop_zeros();
        vec
    }

    /// Build from parts that are already sorted.
    /// Returns `None` if the parts break the sorted / in-bounds invariant.
    pub fn from_sorted_parts(len: usize, inds: Vec<u32>, vals: Vec<N>) -> Option<Self> {
        if inds.len() != vals.len() {
            return None;
        }
        let sorted = inds.windows(2).all(|w| w[0] < w[1]);
        let in_bounds = inds.last().map_or(true, |&last| (last as usize) < len);
        if !sorted || !in_bounds {
            return None;
        }
        Some(ZeroSpVec {
            inds,
            vals,
            len,
            zero: N::zero(),
        })
    }

    fn drop_zeros(&mut self) {
        if self.vals.iter().all(|v| *v != N::zero()) {
            return;
        }
        let mut write = 0;
        for read in 0..self.vals.len() {
            if self.vals[read] != N::zero() {
                self.inds[write] = self.inds[read];
                self.vals[write] = self.vals[read];
                write += 1;
            }
        }
        self.inds.truncate(write);
        self.vals.truncate(write);
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => Some(&self.vals[pos]),
            Err(_) => Some(&self.zero),
        }
    }

    #[inline]
    pub fn as_ind_slice(&self) -> &[u32] {
        &self.inds
    }

    #[inline]
    pub fn as_val_slice(&self) -> &[N] {
        &self.vals
    }

    /// Apply `f` to every stored value, keeping the sparsity pattern.
    pub fn map_values<F>(&mut self, mut f: F)
    where
        F: FnMut(N) -> N,
    {
        for val in self.vals.iter_mut() {
            *val = f(*val);
        }
        self.drop_zeros();
    }

    /// Dense iterator over all `len` values
    #[inline]
    pub fn iter(&self) -> ZeroSpVecIter<'_, N> {
        ZeroSpVecIter { vec: self, pos: 0 }
    }

    /// Iterator over the stored (index, value) entries only
    #[inline]
    pub fn raw_iter(&self) -> ZeroSpVecRawIter<'_, N> {
        ZeroSpVecRawIter { vec: self, pos: 0 }
    }
}

impl<N> Default for ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    fn default() -> Self {
        ZeroSpVec::new()
    }
}

impl<N: Num + Copy + Debug> Debug for ZeroSpVec<N> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("ZeroSpVec")
                .field("len", &self.len)
                .field("nnz", &self.nnz())
                .field("entries", &self.raw_iter().collect::<Vec<_>>())
                .finish()
        } else {
            f.debug_list().entries(self.iter()).finish()
        }
    }
}

pub struct ZeroSpVecIter<'a, N>
where
    N: Num,
{
    vec: &'a ZeroSpVec<N>,
    pos: usize,
}

impl<'a, N> Iterator for ZeroSpVecIter<'a, N>
where
    N: Num + Copy,
{
    type Item = &'a N;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.vec.get(self.pos).map(|val| {
            self.pos += 1;
            val
        })
    }
}

pub struct ZeroSpVecRawIter<'a, N>
where
    N: Num,
{
    vec: &'a ZeroSpVec<N>,
    pos: usize,
}

impl<'a, N> Iterator for ZeroSpVecRawIter<'a, N>
where
    N: Num + Copy,
{
    type Item = (usize, &'a N);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let idx = *self.vec.inds.get(self.pos)?;
        let val = &self.vec.vals[self.pos];
        self.pos += 1;
        Some((idx as usize, val))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.vec.nnz() - self.pos;
        (rest, Some(rest))
    }
}

impl<'a, N> ExactSizeIterator for ZeroSpVecRawIter<'a, N> where N: Num + Copy {}
