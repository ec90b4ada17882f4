//! Column reconciliation: moves existing widgets into a target order and
//! toggles their visibility. Nothing here creates or drops a widget.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::entities::definition::{dedup_keys, ColumnKey, ViewDefinition};
use crate::domain::surface::fixed::{compute_fixed, enforce_visible, FixedColumnSpec};
use crate::domain::surface::moveable::{MoveableSurface, SurfaceRow};

/// Layout order for keyed columns: `order` if it names any known key, else
/// `columns`, else every known key; then the known keys it left out.
pub fn compute_final_order(
    order: &[ColumnKey],
    columns: &[ColumnKey],
    known_keys: &[ColumnKey],
) -> Vec<ColumnKey> {
    let known: HashSet<&ColumnKey> = known_keys.iter().collect();

    let mut base = dedup_keys(order.iter(), Some(&known));
    if base.is_empty() {
        base = dedup_keys(columns.iter(), Some(&known));
    }
    if base.is_empty() {
        base = dedup_keys(known_keys.iter(), None);
    }

    let placed: HashSet<ColumnKey> = base.iter().cloned().collect();
    let missing: Vec<ColumnKey> = dedup_keys(known_keys.iter(), None)
        .into_iter()
        .filter(|key| !placed.contains(key))
        .collect();
    base.extend(missing);
    base
}

/// Moves every row into `fixed left ++ final_order ++ loose ++ fixed right`.
///
/// The key→position map is captured once from the header before anything
/// moves, and the same positional plan is replayed on the filter row and on
/// every body row. Keyed slots the final order does not name keep their
/// relative order right after the ordered ones.
pub fn reorder<S: MoveableSurface + ?Sized>(
    surface: &mut S,
    final_order: &[ColumnKey],
    fixed: &FixedColumnSpec,
) {
    let slots = surface.header_slots();

    let mut position_by_key: HashMap<&ColumnKey, usize> = HashMap::new();
    for (idx, slot) in slots.iter().enumerate() {
        if fixed.contains(idx) {
            continue;
        }
        if let Some(key) = slot.key.as_ref() {
            position_by_key.entry(key).or_insert(idx);
        }
    }

    let mut plan: Vec<usize> = Vec::with_capacity(slots.len());
    plan.extend(fixed.left.iter().copied());

    let mut placed: HashSet<usize> = HashSet::new();
    for key in final_order {
        if let Some(&idx) = position_by_key.get(key) {
            if placed.insert(idx) {
                plan.push(idx);
            }
        }
    }
    for (idx, slot) in slots.iter().enumerate() {
        if slot.key.is_some() && !fixed.contains(idx) && !placed.contains(&idx) {
            plan.push(idx);
        }
    }

    plan.extend(
        slots
            .iter()
            .enumerate()
            .filter(|(idx, slot)| slot.key.is_none() && !fixed.contains(*idx))
            .map(|(idx, _)| idx),
    );
    plan.extend(fixed.right.iter().copied());

    debug!(slots = slots.len(), plan = ?plan, "reordering grid columns");

    for row in surface.rows() {
        debug_assert!(
            surface.cell_count(row) == slots.len(),
            "row {row:?} is not aligned with the header"
        );
        apply_plan(surface, row, &plan);
    }
}

/// Relocates cells so that position `t` ends up holding the cell that sat
/// at `plan[t]`. Plan entries beyond a short row are skipped.
fn apply_plan<S: MoveableSurface + ?Sized>(surface: &mut S, row: SurfaceRow, plan: &[usize]) {
    let len = surface.cell_count(row);
    let mut current: Vec<usize> = (0..len).collect();
    let mut target = 0;

    for &original in plan {
        if original >= len {
            continue;
        }
        let Some(from) = current.iter().position(|&idx| idx == original) else {
            continue;
        };
        if from != target {
            surface.move_cell(row, from, target);
            let moved = current.remove(from);
            current.insert(target, moved);
        }
        target += 1;
    }
}

/// A slot is shown iff it is fixed, loose, or its key is in `visible`.
/// Reads positions from the surface as it is now, so run it after `reorder`.
pub fn set_visibility<S: MoveableSurface + ?Sized>(
    surface: &mut S,
    visible: &HashSet<ColumnKey>,
    fixed: &FixedColumnSpec,
) {
    let shown: Vec<bool> = surface
        .header_slots()
        .iter()
        .enumerate()
        .map(|(idx, slot)| match slot.key.as_ref() {
            _ if fixed.contains(idx) || slot.fixed.is_some() => true,
            None => true,
            Some(key) => visible.contains(key),
        })
        .collect();

    for row in surface.rows() {
        let count = surface.cell_count(row);
        for (idx, &show) in shown.iter().enumerate().take(count) {
            if surface.is_visible(row, idx) != show {
                surface.set_visible(row, idx, show);
            }
        }
    }
}

/// Shapes the surface to a definition: reorder, then visibility, then the
/// fixed-column guarantee.
pub fn apply_columns<S: MoveableSurface + ?Sized>(
    surface: &mut S,
    definition: &ViewDefinition,
    known_keys: &[ColumnKey],
) {
    let fixed = compute_fixed(surface);
    let final_order = compute_final_order(
        &definition.columns_order,
        &definition.columns,
        known_keys,
    );

    let known: HashSet<&ColumnKey> = known_keys.iter().collect();
    let requested = if definition.columns.is_empty() {
        known_keys
    } else {
        definition.columns.as_slice()
    };
    let visible: HashSet<ColumnKey> = requested
        .iter()
        .filter(|key| known.contains(key))
        .cloned()
        .collect();

    reorder(surface, &final_order, &fixed);
    let fixed = compute_fixed(surface);
    set_visibility(surface, &visible, &fixed);
    enforce_visible(surface);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::surface::grid::{ColumnSpec, GridSurface, WidgetId};
    use crate::domain::surface::moveable::FixedSide;
    use proptest::prelude::*;

    fn keys(names: &[&str]) -> Vec<ColumnKey> {
        names.iter().map(|name| ColumnKey::from(*name)).collect()
    }

    fn contacts_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::fixed(FixedSide::Left, "select"),
            ColumnSpec::keyed("id", "id"),
            ColumnSpec::keyed("name", "name"),
            ColumnSpec::keyed("email", "email"),
            ColumnSpec::loose("actions"),
        ]
    }

    fn row_for(columns: &[ColumnSpec], row: usize) -> Vec<String> {
        columns
            .iter()
            .map(|column| format!("{row}:{}", column.label))
            .collect()
    }

    fn surface_with_rows(columns: &[ColumnSpec], rows: usize) -> GridSurface {
        let data: Vec<Vec<String>> = (0..rows).map(|row| row_for(columns, row)).collect();
        GridSurface::new(columns, true, &data)
    }

    fn assert_aligned(surface: &GridSurface) {
        let labels: Vec<&str> = surface
            .header()
            .iter()
            .map(|slot| slot.widget.content.as_str())
            .collect();
        for (row_idx, row) in surface.body().iter().enumerate() {
            assert_eq!(row.len(), labels.len());
            for (cell, label) in row.iter().zip(&labels) {
                assert_eq!(cell.content, format!("{row_idx}:{label}"));
            }
            for (cell, slot) in row.iter().zip(surface.header()) {
                assert_eq!(cell.visible, slot.widget.visible);
            }
        }
    }

    #[test]
    fn final_order_appends_omitted_known_keys() {
        let known = keys(&["A", "B", "C", "D"]);

        let order = compute_final_order(&keys(&["C", "A", "B"]), &[], &known);

        assert_eq!(order, keys(&["C", "A", "B", "D"]));
    }

    #[test]
    fn final_order_falls_back_to_columns_then_known() {
        let known = keys(&["A", "B", "C"]);

        assert_eq!(
            compute_final_order(&keys(&["zz"]), &keys(&["B"]), &known),
            keys(&["B", "A", "C"])
        );
        assert_eq!(compute_final_order(&[], &[], &known), known);
    }

    #[test]
    fn apply_columns_places_fixed_keyed_and_loose_groups() {
        let columns = contacts_columns();
        let mut surface = surface_with_rows(&columns, 3);
        let definition = ViewDefinition {
            columns: keys(&["email", "name"]),
            columns_order: keys(&["name", "email"]),
            ..ViewDefinition::default()
        };

        apply_columns(&mut surface, &definition, &keys(&["id", "name", "email"]));

        assert_eq!(
            surface.visible_labels(),
            vec!["select", "name", "email", "actions"]
        );
        assert_eq!(surface.keyed_order(), keys(&["name", "email", "id"]));
        let id_slot = surface
            .header()
            .iter()
            .find(|slot| slot.key == Some(ColumnKey::from("id")))
            .expect("id column should still be on the surface");
        assert!(!id_slot.widget.visible);
        assert_aligned(&surface);
    }

    #[test]
    fn reorder_moves_widgets_without_replacing_them() {
        let columns = contacts_columns();
        let mut surface = surface_with_rows(&columns, 2);
        let mut before: Vec<WidgetId> = surface.body()[1].iter().map(|cell| cell.id).collect();
        before.sort();

        let definition = ViewDefinition {
            columns_order: keys(&["email", "id", "name"]),
            ..ViewDefinition::default()
        };
        apply_columns(&mut surface, &definition, &keys(&["id", "name", "email"]));

        let mut after: Vec<WidgetId> = surface.body()[1].iter().map(|cell| cell.id).collect();
        after.sort();
        assert_eq!(before, after);
        assert_eq!(surface.keyed_order(), keys(&["email", "id", "name"]));
    }

    #[test]
    fn fixed_right_and_loose_columns_keep_their_groups() {
        let columns = vec![
            ColumnSpec::loose("drag"),
            ColumnSpec::keyed("a", "a"),
            ColumnSpec::fixed(FixedSide::Right, "menu"),
            ColumnSpec::keyed("b", "b"),
            ColumnSpec::fixed(FixedSide::Left, "check"),
            ColumnSpec::loose("actions"),
        ];
        let mut surface = surface_with_rows(&columns, 2);
        let definition = ViewDefinition {
            columns: keys(&["b"]),
            columns_order: keys(&["b", "a"]),
            ..ViewDefinition::default()
        };

        apply_columns(&mut surface, &definition, &keys(&["a", "b"]));

        let labels: Vec<&str> = surface
            .header()
            .iter()
            .map(|slot| slot.widget.content.as_str())
            .collect();
        assert_eq!(labels, vec!["check", "b", "a", "drag", "actions", "menu"]);
        assert_eq!(
            surface.visible_labels(),
            vec!["check", "b", "drag", "actions", "menu"]
        );
        assert_aligned(&surface);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let columns = contacts_columns();
        let mut surface = surface_with_rows(&columns, 1);
        let definition = ViewDefinition {
            columns: keys(&["ghost", "name"]),
            columns_order: keys(&["ghost", "name"]),
            ..ViewDefinition::default()
        };

        apply_columns(&mut surface, &definition, &keys(&["id", "name", "email"]));

        assert_eq!(surface.keyed_order(), keys(&["name", "id", "email"]));
        assert_eq!(surface.visible_keys(), keys(&["name"]));
    }

    #[test]
    fn fixed_columns_stay_visible_when_everything_else_is_hidden() {
        let columns = vec![
            ColumnSpec::fixed(FixedSide::Left, "select"),
            ColumnSpec::keyed("a", "a"),
            ColumnSpec::keyed("b", "b"),
            ColumnSpec::fixed(FixedSide::Right, "menu"),
        ];
        let mut surface = surface_with_rows(&columns, 2);
        let fixed = compute_fixed(&surface);

        set_visibility(&mut surface, &HashSet::new(), &fixed);
        for row in surface.rows() {
            surface.set_visible(row, 0, false);
        }
        enforce_visible(&mut surface);

        assert_eq!(surface.visible_labels(), vec!["select", "menu"]);
        for row in surface.rows() {
            assert!(surface.is_visible(row, 0));
            assert!(surface.is_visible(row, 3));
        }
    }

    #[test]
    fn enforce_visible_is_idempotent() {
        let columns = contacts_columns();
        let mut surface = surface_with_rows(&columns, 2);
        for row in surface.rows() {
            surface.set_visible(row, 0, false);
            surface.set_visible(row, 2, false);
        }

        enforce_visible(&mut surface);
        let once = surface.clone();
        enforce_visible(&mut surface);
        enforce_visible(&mut surface);

        assert_eq!(surface.header(), once.header());
        assert_eq!(surface.filter_row(), once.filter_row());
        assert_eq!(surface.body(), once.body());
        assert!(!surface.is_visible(SurfaceRow::Body(1), 2));
    }

    fn arb_order() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop_oneof![
                Just("a".to_string()),
                Just("b".to_string()),
                Just("c".to_string()),
                Just("d".to_string()),
                Just("x".to_string()),
            ],
            0..6,
        )
    }

    proptest! {
        #[test]
        fn header_and_rows_stay_aligned(passes in prop::collection::vec((arb_order(), arb_order()), 1..5)) {
            let columns = vec![
                ColumnSpec::fixed(FixedSide::Left, "select"),
                ColumnSpec::keyed("a", "a"),
                ColumnSpec::loose("drag"),
                ColumnSpec::keyed("b", "b"),
                ColumnSpec::keyed("c", "c"),
                ColumnSpec::loose("actions"),
                ColumnSpec::keyed("d", "d"),
                ColumnSpec::fixed(FixedSide::Right, "menu"),
            ];
            let mut surface = surface_with_rows(&columns, 3);
            let known = keys(&["a", "b", "c", "d"]);

            for (visible, order) in passes {
                let definition = ViewDefinition {
                    columns: visible.iter().map(|k| ColumnKey::from(k.as_str())).collect(),
                    columns_order: order.iter().map(|k| ColumnKey::from(k.as_str())).collect(),
                    ..ViewDefinition::default()
                };
                apply_columns(&mut surface, &definition, &known);

                let labels: Vec<String> = surface
                    .header()
                    .iter()
                    .map(|slot| slot.widget.content.clone())
                    .collect();
                prop_assert_eq!(labels.first().map(String::as_str), Some("select"));
                prop_assert_eq!(labels.last().map(String::as_str), Some("menu"));
                for (row_idx, row) in surface.body().iter().enumerate() {
                    for (cell, label) in row.iter().zip(&labels) {
                        prop_assert_eq!(&cell.content, &format!("{row_idx}:{label}"));
                    }
                }
                prop_assert!(surface.is_visible(SurfaceRow::Body(2), 0));
            }
        }
    }
}
