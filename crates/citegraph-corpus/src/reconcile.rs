//! Field reconciliation inside a duplicate group.
//!
//! Evidence is propagated, not arbitrated: a missing value takes the nearest
//! present value earlier in the group, else the nearest one later. Present
//! values are never overwritten, so conflicting sources stay conflicting
//! and the rows are left for the caller to collapse.

use crate::record::{Field, Record};

/// Fill missing `columns` of `rows` from group-mates.
///
/// Output has the same length and order as `rows`. A column missing in every
/// row stays missing. `group_key` only labels trace output.
pub fn reconcile(group_key: &str, columns: &[Field], rows: &[Record]) -> Vec<Record> {
    let mut out = rows.to_vec();
    if out.len() < 2 {
        return out;
    }

    let mut filled = 0usize;
    for &field in columns {
        filled += fill_forward(&mut out, field);
        filled += fill_backward(&mut out, field);
    }

    if filled > 0 {
        log::trace!(
            "group {group_key:?}: filled {filled} fields across {} rows",
            out.len()
        );
    }
    out
}

fn fill_forward(rows: &mut [Record], field: Field) -> usize {
    fill_pass(rows.iter_mut(), field)
}

fn fill_backward(rows: &mut [Record], field: Field) -> usize {
    fill_pass(rows.iter_mut().rev(), field)
}

/// Carry the last seen value into later missing slots, in iteration order.
fn fill_pass<'a>(rows: impl Iterator<Item = &'a mut Record>, field: Field) -> usize {
    let mut carried: Option<String> = None;
    let mut filled = 0;
    for row in rows {
        match row.get(field) {
            Some(v) => carried = Some(v.to_string()),
            None => {
                if let Some(v) = &carried {
                    *row.slot_mut(field) = Some(v.clone());
                    filled += 1;
                }
            }
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(abstract_text: Option<&str>, journal: Option<&str>) -> Record {
        let mut r = Record::default().with(Field::Doi, "10.1/x");
        if let Some(a) = abstract_text {
            r.set(Field::Abstract, a);
        }
        if let Some(j) = journal {
            r.set(Field::Journal, j);
        }
        r
    }

    #[test]
    fn keeps_length_and_order() {
        let rows = vec![
            rec(Some("a1"), None),
            rec(None, Some("j2")),
            rec(Some("a3"), None),
        ];
        let out = reconcile("10.1/x", &[Field::Abstract, Field::Journal], &rows);
        assert_eq!(out.len(), rows.len());
        assert_eq!(out[0].get(Field::Abstract), Some("a1"));
        assert_eq!(out[2].get(Field::Abstract), Some("a3"));
    }

    #[test]
    fn forward_fill_before_backward_fill() {
        let rows = vec![rec(None, None), rec(Some("first"), None), rec(None, None), rec(Some("second"), None)];
        let out = reconcile("k", &[Field::Abstract], &rows);
        let got: Vec<_> = out.iter().map(|r| r.get(Field::Abstract)).collect();
        // Row 0 has nothing earlier, so it takes the next value; row 2 takes the previous one
        assert_eq!(got, vec![Some("first"), Some("first"), Some("first"), Some("second")]);
    }

    #[test]
    fn fill_completeness() {
        let rows = vec![rec(None, None), rec(None, Some("J")), rec(None, None)];
        let out = reconcile("k", &[Field::Journal], &rows);
        assert!(out.iter().all(|r| r.get(Field::Journal) == Some("J")));
    }

    #[test]
    fn column_missing_everywhere_stays_missing() {
        let rows = vec![rec(None, Some("J")), rec(None, None)];
        let out = reconcile("k", &[Field::Abstract, Field::Journal], &rows);
        assert!(out.iter().all(|r| r.is_missing(Field::Abstract)));
    }

    #[test]
    fn columns_outside_set_untouched() {
        let rows = vec![rec(Some("a"), None), rec(None, Some("J"))];
        let out = reconcile("k", &[Field::Journal], &rows);
        assert!(out[1].is_missing(Field::Abstract));
        assert_eq!(out[0].get(Field::Journal), Some("J"));
    }

    #[test]
    fn present_values_not_overwritten() {
        let rows = vec![rec(Some("a"), None), rec(Some("b"), None)];
        let out = reconcile("k", &[Field::Abstract], &rows);
        assert_eq!(out, rows);
    }

    #[test]
    fn singleton_and_empty_groups() {
        assert!(reconcile("k", &Field::ALL, &[]).is_empty());
        let one = vec![rec(None, Some("J"))];
        assert_eq!(reconcile("k", &Field::ALL, &one), one);
    }
}
