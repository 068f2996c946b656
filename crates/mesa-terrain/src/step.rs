//! Step coordinate mapping: world coordinate to plateau cell and in-cell offset.

/// Maps a world coordinate onto the plateau grid.
///
/// Returns `(cell_index, in_cell_offset)` where `cell_index` is the floor
/// division of `coord` by `step_width` and the offset lies in
/// `[0, step_width)`. Floor semantics keep cells aligned across the origin,
/// so negative coordinates do not share a cell with positive ones.
pub fn cell_of(coord: i64, step_width: i32) -> (i64, i32) {
    debug_assert!(step_width > 0, "step_width must be positive");
    let width = i64::from(step_width);
    let cell = coord.div_euclid(width);
    let offset = coord.rem_euclid(width) as i32;
    (cell, offset)
}
