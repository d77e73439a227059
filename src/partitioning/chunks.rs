//! Near-equal contiguous chunking of a sorted sequence.

use super::error::PartitionError;
use itertools::Itertools;
use std::ops::Range;

/// Boundaries of `num_chunks` contiguous chunks covering `0..size`.
///
/// The result has `num_chunks + 1` entries; chunk `i` spans
/// `bounds[i]..bounds[i + 1]`. Chunks differ in length by at most one and the
/// first `size % num_chunks` chunks are the longer ones.
///
/// ```
/// use mesh_columns::partitioning::chunks::split_into_chunks;
/// // chunks {0,1,2,3} {4,5,6} {7,8,9}
/// assert_eq!(split_into_chunks(10, 3).unwrap(), vec![0, 4, 7, 10]);
/// ```
///
/// # Errors
/// [`PartitionError::ZeroChunks`] when `num_chunks == 0`.
pub fn split_into_chunks(size: usize, num_chunks: usize) -> Result<Vec<usize>, PartitionError> {
    if num_chunks == 0 {
        return Err(PartitionError::ZeroChunks);
    }
    let base = size / num_chunks;
    let remainder = size % num_chunks;

    let mut bounds = Vec::with_capacity(num_chunks + 1);
    bounds.push(0);
    let mut end = 0;
    for i in 0..num_chunks {
        end += base + usize::from(i < remainder);
        bounds.push(end);
    }
    Ok(bounds)
}

/// Consecutive index ranges of a boundary vector.
pub fn chunk_ranges(bounds: &[usize]) -> impl Iterator<Item = Range<usize>> + '_ {
    bounds.iter().copied().tuple_windows().map(|(lo, hi)| lo..hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ten_into_three() {
        let bounds = split_into_chunks(10, 3).unwrap();
        assert_eq!(bounds, vec![0, 4, 7, 10]);
        let ranges: Vec<_> = chunk_ranges(&bounds).collect();
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn zero_chunks_rejected() {
        assert_eq!(split_into_chunks(5, 0), Err(PartitionError::ZeroChunks));
    }

    #[test]
    fn empty_size_gives_empty_chunks() {
        assert_eq!(split_into_chunks(0, 4).unwrap(), vec![0; 5]);
    }

    #[test]
    fn more_chunks_than_items() {
        assert_eq!(split_into_chunks(2, 5).unwrap(), vec![0, 1, 2, 2, 2, 2]);
    }

    proptest! {
        #[test]
        fn chunks_are_balanced(size in 0usize..5_000, num_chunks in 1usize..200) {
            let bounds = split_into_chunks(size, num_chunks).unwrap();
            prop_assert_eq!(bounds.len(), num_chunks + 1);
            prop_assert_eq!(bounds[0], 0);
            prop_assert_eq!(bounds[num_chunks], size);

            let lens: Vec<usize> = chunk_ranges(&bounds).map(|r| r.len()).collect();
            let max = *lens.iter().max().unwrap();
            let min = *lens.iter().min().unwrap();
            prop_assert!(max - min <= 1, "lens = {:?}", lens);

            // exactly the leading `size % num_chunks` chunks are the long ones
            let remainder = size % num_chunks;
            for (i, &len) in lens.iter().enumerate() {
                let expected = size / num_chunks + usize::from(i < remainder);
                prop_assert_eq!(len, expected);
            }
            prop_assert_eq!(split_into_chunks(size, num_chunks).unwrap(), bounds);
        }
    }
}
