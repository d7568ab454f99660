use wide::i32x8;

const LANES: usize = 8;

// Widen a chunk of bytes into one SIMD register
#[inline]
fn widen(chunk: &[u8]) -> i32x8 {
    let lanes: [i32; LANES] = array_init::array_init(|i| chunk[i] as i32);
    i32x8::new(lanes)
}

/// Squared euclidean distance between two equal-length byte vectors.
///
/// The square root is never taken: only the ordering of distances matters.
pub fn squared_distance(a: &[u8], b: &[u8]) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    let mut a_chunks = a.chunks_exact(LANES);
    let mut b_chunks = b.chunks_exact(LANES);

    let mut sum = 0_u64;
    for (x, y) in (&mut a_chunks).zip(&mut b_chunks) {
        let diff = widen(x) - widen(y);
        // Each lane is at most 255^2, so it can't overflow before widening
        sum += (diff * diff)
            .to_array()
            .iter()
            .map(|&lane| lane as u64)
            .sum::<u64>();
    }

    // Scalar tail for lengths that aren't a multiple of the lane count
    sum + a_chunks
        .remainder()
        .iter()
        .zip(b_chunks.remainder())
        .map(|(&x, &y)| {
            let diff = x.abs_diff(y) as u64;
            diff * diff
        })
        .sum::<u64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(a: &[u8], b: &[u8]) -> u64 {
        a.iter()
            .zip(b)
            .map(|(&x, &y)| (x as i64 - y as i64).pow(2) as u64)
            .sum()
    }

    #[test]
    fn test_squared_distance() {
        assert_eq!(squared_distance(&[1, 2, 3], &[4, 6, 3]), 9 + 16);
        assert_eq!(squared_distance(&[], &[]), 0);
    }

    #[test]
    fn test_matches_naive_across_tail_lengths() {
        for len in [7, 8, 9, 16, 23, 784] {
            let a: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
            let b: Vec<u8> = (0..len).map(|i| (255 - i * 11 % 256) as u8).collect();
            assert_eq!(squared_distance(&a, &b), naive(&a, &b), "len {}", len);
        }
    }

    #[test]
    fn test_extreme_values() {
        let a = [0_u8; 784];
        let b = [255_u8; 784];
        assert_eq!(squared_distance(&a, &b), 784 * 255 * 255);
        assert_eq!(squared_distance(&b, &a), 784 * 255 * 255);
    }
}
