use std::num::NonZeroUsize;

use shared::models::{fragments::partition::Partition, viewport::Viewport};

/// Splits the viewport's real-axis samples into contiguous column blocks, left to right.
///
/// Produces `min(count, columns)` partitions so that none is empty. Sizes differ by at
/// most one; the first `columns mod parts` partitions take the extra column.
pub fn partition(viewport: &Viewport, count: NonZeroUsize) -> Vec<Partition> {
    let columns = viewport.columns();
    if columns == 0 {
        return Vec::new();
    }

    let parts = count.get().min(columns);
    let base = columns / parts;
    let remainder = columns % parts;
    let real = viewport.real();

    let mut col_offset = 0;
    (0..parts)
        .map(|index| {
            let col_count = base + usize::from(index < remainder);
            let partition = Partition {
                index,
                col_offset,
                col_count,
                re_start: real.sample(col_offset, columns),
                re_end: real.sample(col_offset + col_count - 1, columns),
            };
            col_offset += col_count;
            partition
        })
        .collect()
}
