use log::warn;
use serde::Serialize;

use crate::decompose::RingTable;

/// Identifier of the synthetic trailing total row.
pub const SUM_ROW_ID: &str = "Sum";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRow {
    pub id: String,
    pub values: Vec<Option<f64>>, // Parallel to the table's `columns`
}

/// Selected rows of a ring table followed by exactly one `Sum` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionTable {
    columns: Vec<String>,
    rows: Vec<SelectionRow>,
}

impl SelectionTable {
    /// The table for an empty selection: only a zero-filled `Sum` row.
    pub fn empty(columns: &[String]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: vec![SelectionRow { id: SUM_ROW_ID.to_string(), values: vec![Some(0.0); columns.len()] }],
        }
    }

    #[inline] pub fn columns(&self) -> &[String] { &self.columns }

    /// All rows, `Sum` last.
    #[inline] pub fn rows(&self) -> &[SelectionRow] { &self.rows }

    /// Rows copied from the selection, without the `Sum` row.
    #[inline] pub fn data_rows(&self) -> &[SelectionRow] { &self.rows[..self.rows.len() - 1] }

    /// The trailing total row.
    #[inline] pub fn sum_row(&self) -> &SelectionRow { &self.rows[self.rows.len() - 1] }

    /// Number of rows including `Sum`; always the selection size plus one.
    #[inline] pub fn len(&self) -> usize { self.rows.len() }

    /// Never true: the `Sum` row is always present.
    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Total of `column` over the selection, or `None` for an unknown column.
    pub fn sum(&self, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.sum_row().values[col]
    }
}

/// Build the selection table for `selected` ring indices of `rings`.
///
/// Rows keep selection order. The `Sum` row adds only present values, so nulls count as zero.
/// Indices past the end of `rings` are dropped.
pub fn aggregate(rings: &RingTable, selected: &[usize], columns: &[String]) -> SelectionTable {
    let mut table = SelectionTable::empty(columns);
    if selected.is_empty() { return table }

    let mut sums = vec![0.0; columns.len()];
    let mut rows = Vec::with_capacity(selected.len() + 1);

    for &idx in selected {
        let Some(ring) = rings.rings().get(idx) else {
            warn!("[aggregate] dropping selected index {idx}, table has {} rings", rings.len());
            continue
        };

        let values = columns.iter()
            .map(|column| rings.value(idx, column))
            .collect::<Vec<_>>();
        for (sum, value) in sums.iter_mut().zip(&values) {
            *sum += value.unwrap_or(0.0);
        }

        rows.push(SelectionRow { id: ring.parent_id.clone(), values });
    }

    rows.push(SelectionRow { id: SUM_ROW_ID.to_string(), values: sums.into_iter().map(Some).collect() });
    table.rows = rows;
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decompose::decompose, layer::{Layer, LayerKind, ZoneRecord}};
    use geo::{polygon, MultiPolygon, Polygon};

    fn square(x: f64) -> Polygon<f64> {
        polygon![(x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0), (x: x, y: 0.0)]
    }

    fn columns() -> Vec<String> {
        ["HH19", "EMP19"].iter().map(|s| s.to_string()).collect()
    }

    fn make_test_rings() -> RingTable {
        let layer = Layer::from_records(LayerKind::Blocks, [
            ZoneRecord::new("10", square(0.0)).with("HH19", Some(1.5)).with("EMP19", Some(2.0)),
            ZoneRecord::new("11", square(1.0)).with("HH19", None).with("EMP19", Some(3.0)),
            ZoneRecord::new("12", MultiPolygon(vec![square(5.0), square(7.0)])).with("HH19", Some(4.0)).with("EMP19", Some(1.0)),
        ]).unwrap();
        decompose(&layer, &[0, 1, 2], &columns()).0
    }

    #[test]
    fn empty_selection_has_only_zero_sum_row() {
        let table = aggregate(&make_test_rings(), &[], &columns());

        assert_eq!(table.len(), 1);
        assert!(table.data_rows().is_empty());
        assert_eq!(table.sum_row().id, "Sum");
        assert_eq!(table.sum_row().values, vec![Some(0.0), Some(0.0)]);
    }

    #[test]
    fn empty_selection_of_empty_table() {
        let table = aggregate(&RingTable::default(), &[], &columns());
        assert_eq!(table, SelectionTable::empty(&columns()));
    }

    #[test]
    fn rows_follow_selection_order_and_nulls_sum_as_zero() {
        let table = aggregate(&make_test_rings(), &[1, 0], &columns());

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0].id, "11");
        assert_eq!(table.rows()[0].values, vec![None, Some(3.0)]);
        assert_eq!(table.rows()[1].id, "10");
        assert_eq!(table.sum("HH19"), Some(1.5));
        assert_eq!(table.sum("EMP19"), Some(5.0));
        assert_eq!(table.sum("HH49"), None);
    }

    #[test]
    fn multi_part_rings_count_once_per_ring() {
        // Rings 2 and 3 are both parts of record "12".
        let table = aggregate(&make_test_rings(), &[2, 3], &columns());

        assert_eq!(table.len(), 3);
        assert_eq!(table.sum("HH19"), Some(8.0));
    }

    #[test]
    fn out_of_range_indices_are_dropped() {
        let table = aggregate(&make_test_rings(), &[0, 99], &columns());

        assert_eq!(table.len(), 2);
        assert_eq!(table.sum("EMP19"), Some(2.0));
    }

    #[test]
    fn columns_missing_from_rings_sum_to_zero() {
        let extra = vec!["WORKRS49".to_string()];
        let table = aggregate(&make_test_rings(), &[0, 1], &extra);

        assert_eq!(table.rows()[0].values, vec![None]);
        assert_eq!(table.sum("WORKRS49"), Some(0.0));
    }
}
