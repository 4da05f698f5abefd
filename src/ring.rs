// 円卓上の隣接関係
// 哲学者 i は左の箸 (left(i), i) と右の箸 (i, right(i)) を使う

/// 左隣の哲学者
pub fn left(i: usize, n: usize) -> usize {
    debug_assert!(i < n);
    (i + n - 1) % n
}

/// 右隣の哲学者
pub fn right(i: usize, n: usize) -> usize {
    debug_assert!(i < n);
    (i + 1) % n
}
