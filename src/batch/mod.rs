use std::num::NonZeroUsize;
use std::slice::Chunks;

/// Default number of pairs per routing request.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Largest batch the Distance Matrix API accepts (25 origins x 25 destinations).
pub const MAX_BATCH_SIZE: usize = 25;

/// Split `items` into consecutive chunks of `batch_size`, preserving order.
///
/// Every chunk has exactly `batch_size` items except possibly the last.
/// The iterator is lazy; calling again on the same slice yields the same
/// chunks.
pub fn partition<T>(items: &[T], batch_size: NonZeroUsize) -> Chunks<'_, T> {
    items.chunks(batch_size.get())
}

/// Number of chunks `partition` will yield for `len` items.
pub fn batch_count(len: usize, batch_size: NonZeroUsize) -> usize {
    len.div_ceil(batch_size.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_partition_23_by_10() {
        let items: Vec<u32> = (0..23).collect();
        let sizes: Vec<usize> = partition(&items, size(10)).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
    }

    #[test]
    fn test_partition_exact_multiple() {
        let items: Vec<u32> = (0..20).collect();
        let sizes: Vec<usize> = partition(&items, size(10)).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![10, 10]);
    }

    #[test]
    fn test_partition_preserves_order() {
        for len in [0, 1, 7, 10, 31] {
            for b in [1, 3, 10, 25] {
                let items: Vec<usize> = (0..len).collect();
                let chunks: Vec<&[usize]> = partition(&items, size(b)).collect();

                assert_eq!(chunks.len(), batch_count(len, size(b)));
                assert_eq!(chunks.concat(), items);
                if let Some((_, head)) = chunks.split_last() {
                    assert!(head.iter().all(|c| c.len() == b));
                }
            }
        }
    }

    #[test]
    fn test_partition_empty() {
        let items: Vec<u32> = Vec::new();
        assert_eq!(partition(&items, size(10)).count(), 0);
        assert_eq!(batch_count(0, size(10)), 0);
    }
}
