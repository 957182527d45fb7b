//! Partitioning of an ordered list into fixed-size batches.

use crate::error::InvalidBatchSize;

/// Split `items` into consecutive batches of `batch_size`.
///
/// Every batch but the last holds exactly `batch_size` items and the batches
/// concatenate back to the input. An empty input yields no batches at all.
///
/// ```rust
/// use salticidae::sequence::chunk;
///
/// let batches = chunk(1..=5, 2).unwrap();
/// assert_eq!(batches, vec![vec![1, 2], vec![3, 4], vec![5]]);
/// assert!(chunk(Vec::<u8>::new(), 3).unwrap().is_empty());
/// assert!(chunk(vec![1], 0).is_err());
/// ```
pub fn chunk<T, I>(items: I, batch_size: usize) -> Result<Vec<Vec<T>>, InvalidBatchSize>
where
    I: IntoIterator<Item = T>,
{
    if batch_size == 0 {
        return Err(InvalidBatchSize { batch_size });
    }

    let mut batches = Vec::new();
    let mut current = Vec::new();
    for item in items {
        current.push(item);
        if current.len() == batch_size {
            batches.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }

    Ok(batches)
}

/// Number of batches [`chunk`] produces for `len` items
pub fn batch_count(len: usize, batch_size: usize) -> Result<usize, InvalidBatchSize> {
    if batch_size == 0 {
        return Err(InvalidBatchSize { batch_size });
    }
    Ok(len.div_ceil(batch_size))
}
