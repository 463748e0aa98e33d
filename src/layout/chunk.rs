/// One item placed in a row, paired with its position in the input sequence.
#[derive(Debug, PartialEq)]
pub struct RowEntry<'a, T> {
    pub item: &'a T,
    pub index: usize,
}

impl<T> Clone for RowEntry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RowEntry<'_, T> {}

/// Split `items` into consecutive rows of `items_per_row`, the last row
/// holding whatever remains. Empty input yields no rows.
pub fn chunk<T>(items: &[T], items_per_row: usize) -> Vec<Vec<&T>> {
    items
        .chunks(items_per_row.max(1))
        .map(|row| row.iter().collect())
        .collect()
}

/// Like [`chunk`], but every entry remembers its flattened index.
pub fn chunk_indexed<T>(items: &[T], items_per_row: usize) -> Vec<Vec<RowEntry<'_, T>>> {
    let per_row = items_per_row.max(1);
    items
        .chunks(per_row)
        .enumerate()
        .map(|(row_index, row)| {
            row.iter()
                .enumerate()
                .map(|(offset, item)| RowEntry {
                    item,
                    index: row_index * per_row + offset,
                })
                .collect()
        })
        .collect()
}

/// Reverse the item order inside each row, leaving row order untouched.
pub fn invert_rows<R>(rows: &mut [Vec<R>]) {
    for row in rows.iter_mut() {
        row.reverse();
    }
}
