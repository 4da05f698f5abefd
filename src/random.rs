use rand::Rng;

/// [min, max] の一様乱数
/// max <= min の場合は min を返す
pub fn rand_inclusive(min: u64, max: u64) -> u64 {
    if max <= min {
        return min;
    }
    rand::thread_rng().gen_range(min..=max)
}
