use shared::models::{
    fragments::{partition_result::PartitionResult, work_unit::WorkUnit},
    render_grid::RenderGrid,
    resolution::Resolution,
};

use crate::error::StitchError;

/// Joins per-partition grids along the column axis, in work-unit order.
///
/// `results` may arrive in any order; they are matched to `units` by index. Any shape
/// disagreement is an error, never a silent truncation.
pub fn stitch(
    resolution: Resolution,
    units: &[WorkUnit],
    mut results: Vec<PartitionResult>,
) -> Result<RenderGrid, StitchError> {
    if units.len() != results.len() {
        return Err(StitchError::CountMismatch {
            units: units.len(),
            results: results.len(),
        });
    }

    let expected_width = resolution.nx as usize;
    let expected_rows = resolution.ny as usize;

    let width: usize = units.iter().map(|unit| unit.col_count as usize).sum();
    if width != expected_width {
        return Err(StitchError::WidthMismatch {
            expected: expected_width,
            found: width,
        });
    }

    results.sort_by_key(|result| result.unit_index);

    let mut columns = Vec::with_capacity(expected_width);
    for (position, (unit, result)) in units.iter().zip(results).enumerate() {
        if unit.index != position {
            return Err(StitchError::OutOfOrder {
                position,
                index: unit.index,
            });
        }
        if result.unit_index != unit.index {
            return Err(StitchError::MissingResult { index: unit.index });
        }
        if result.columns() != unit.col_count as usize {
            return Err(StitchError::ColumnMismatch {
                index: unit.index,
                expected: unit.col_count as usize,
                found: result.columns(),
            });
        }
        if let Some((column, found)) = result
            .grid
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, rows)| rows != expected_rows)
        {
            return Err(StitchError::RowMismatch {
                index: unit.index,
                column,
                expected: expected_rows,
                found,
            });
        }

        columns.extend(result.grid);
    }

    Ok(RenderGrid::from_columns(resolution, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{fractal::EscapeCode, fragments::partition::Partition, viewport::Viewport};

    fn units(sizes: &[usize], rows: u32) -> (Viewport, Vec<WorkUnit>) {
        let columns: usize = sizes.iter().sum();
        let viewport =
            Viewport::from_bounds(-2.0, -1.0, 1.0, 1.0, columns as u32, rows, 10).unwrap();
        let mut offset = 0;
        let units = sizes
            .iter()
            .enumerate()
            .map(|(index, &col_count)| {
                let partition = Partition {
                    index,
                    col_offset: offset,
                    col_count,
                    re_start: 0.0,
                    re_end: 0.0,
                };
                offset += col_count;
                partition.assign(&viewport, "node:1".parse().unwrap())
            })
            .collect();
        (viewport, units)
    }

    /// Every cell holds its global column number so order is visible in the output.
    fn result_for(unit: &WorkUnit) -> PartitionResult {
        let grid = (0..unit.col_count as usize)
            .map(|c| vec![(unit.col_offset + c) as EscapeCode; unit.row_count as usize])
            .collect();
        PartitionResult::new(unit.index, grid)
    }

    #[test]
    fn concatenates_columns_in_unit_order_regardless_of_arrival() {
        let (viewport, units) = units(&[3, 2, 2], 4);
        let results = units.iter().rev().map(result_for).collect();

        let grid = stitch(viewport.resolution, &units, results).unwrap();

        assert_eq!(grid.width(), 7);
        assert_eq!(grid.height(), 4);
        for x in 0..7 {
            assert_eq!(grid.column(x).unwrap(), &[x as EscapeCode; 4][..]);
        }
    }

    #[test]
    fn missing_result_is_rejected() {
        let (viewport, units) = units(&[2, 2], 3);
        let results = vec![result_for(&units[0])];
        assert_eq!(
            stitch(viewport.resolution, &units, results),
            Err(StitchError::CountMismatch {
                units: 2,
                results: 1
            })
        );
    }

    #[test]
    fn duplicated_result_is_rejected() {
        let (viewport, units) = units(&[2, 2], 3);
        let results = vec![result_for(&units[0]), result_for(&units[0])];
        assert_eq!(
            stitch(viewport.resolution, &units, results),
            Err(StitchError::MissingResult { index: 1 })
        );
    }

    #[test]
    fn short_column_is_rejected() {
        let (viewport, units) = units(&[2, 2], 3);
        let mut bad = result_for(&units[1]);
        bad.grid[1].pop();
        let results = vec![result_for(&units[0]), bad];
        assert_eq!(
            stitch(viewport.resolution, &units, results),
            Err(StitchError::RowMismatch {
                index: 1,
                column: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn wrong_column_count_is_rejected() {
        let (viewport, units) = units(&[2, 2], 3);
        let mut bad = result_for(&units[0]);
        bad.grid.push(vec![0; 3]);
        let results = vec![bad, result_for(&units[1])];
        assert!(matches!(
            stitch(viewport.resolution, &units, results),
            Err(StitchError::ColumnMismatch { index: 0, expected: 2, found: 3 })
        ));
    }

    #[test]
    fn units_not_covering_viewport_are_rejected() {
        let (viewport, units) = units(&[2, 2], 3);
        let results = vec![result_for(&units[0])];
        let wider = Resolution::new(viewport.resolution.nx + 1, 3);
        assert_eq!(
            stitch(wider, &units[..1], results),
            Err(StitchError::WidthMismatch {
                expected: 5,
                found: 2
            })
        );
    }
}
