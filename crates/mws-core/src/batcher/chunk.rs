//! Chunk type and lazy splitting.

use std::slice;

use crate::error::MwsError;

/// One request's worth of items: `items[offset..offset + len]` of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a, T> {
    /// Position of this chunk in the sequence (0-based).
    pub index: usize,
    /// Offset of the first item in the caller's list.
    pub offset: usize,
    items: &'a [T],
}

impl<'a, T> Chunk<'a, T> {
    pub fn items(&self) -> &'a [T] {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Single-pass iterator over the chunks of a list.
#[derive(Debug, Clone)]
pub struct Chunks<'a, T> {
    inner: slice::Chunks<'a, T>,
    max_batch: usize,
    next_index: usize,
    next_offset: usize,
}

impl<'a, T> Chunks<'a, T> {
    pub fn max_batch(&self) -> usize {
        self.max_batch
    }
}

impl<'a, T> Iterator for Chunks<'a, T> {
    type Item = Chunk<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let items = self.inner.next()?;
        let chunk = Chunk {
            index: self.next_index,
            offset: self.next_offset,
            items,
        };
        self.next_index += 1;
        self.next_offset += items.len();
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Chunks<'_, T> {}

/// Splits `items` into chunks of at most `max_batch` items, in order.
///
/// Every chunk is non-empty; the last one holds the remainder. An empty input
/// yields no chunks.
pub fn split<T>(items: &[T], max_batch: usize) -> Result<Chunks<'_, T>, MwsError> {
    if max_batch == 0 {
        return Err(MwsError::InvalidInput(
            "max batch size must be positive".into(),
        ));
    }
    Ok(Chunks {
        inner: items.chunks(max_batch),
        max_batch,
        next_index: 0,
        next_offset: 0,
    })
}
