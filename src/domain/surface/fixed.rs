use crate::domain::surface::moveable::{FixedSide, MoveableSurface};

/// Current positions of the immovable columns, split by side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedColumnSpec {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

impl FixedColumnSpec {
    pub fn contains(&self, position: usize) -> bool {
        self.left.contains(&position) || self.right.contains(&position)
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.left.iter().chain(self.right.iter()).copied()
    }
}

/// Scans the header in its current order. Positions move with every
/// reconciliation pass, so callers recompute instead of caching.
pub fn compute_fixed<S: MoveableSurface + ?Sized>(surface: &S) -> FixedColumnSpec {
    let mut spec = FixedColumnSpec::default();
    for (idx, slot) in surface.header_slots().iter().enumerate() {
        match slot.fixed {
            Some(FixedSide::Left) => spec.left.push(idx),
            Some(FixedSide::Right) => spec.right.push(idx),
            None => {}
        }
    }
    spec
}

/// Forces every fixed column visible in the header, filter row and each
/// body row. Idempotent.
pub fn enforce_visible<S: MoveableSurface + ?Sized>(surface: &mut S) {
    let fixed = compute_fixed(surface);
    if fixed.is_empty() {
        return;
    }

    for row in surface.rows() {
        let count = surface.cell_count(row);
        for position in fixed.positions() {
            if position < count && !surface.is_visible(row, position) {
                surface.set_visible(row, position, true);
            }
        }
    }
}
