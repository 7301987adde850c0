use crate::core::geometry::BBox;

/// Row-major cells of a `cols` x `rows` grid with `gap` between cells.
pub fn grid_cells(area: BBox, cols: usize, rows: usize, gap: f32) -> Vec<BBox> {
    if cols == 0 || rows == 0 {
        return Vec::new();
    }
    let cell_w = ((area.width() - gap * (cols - 1) as f32) / cols as f32).max(0.0);
    let cell_h = ((area.height() - gap * (rows - 1) as f32) / rows as f32).max(0.0);

    let mut cells = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let x = area.x0 + col as f32 * (cell_w + gap);
            let y = area.y0 + row as f32 * (cell_h + gap);
            cells.push(BBox::from_origin(x, y, cell_w, cell_h));
        }
    }
    cells
}

/// Splits `items` into page-sized chunks. Always yields at least one chunk so
/// a section with nothing to show still gets its page.
pub fn paginate<T: Clone>(items: &[T], per_page: usize) -> Vec<Vec<T>> {
    if items.is_empty() || per_page == 0 {
        return vec![Vec::new()];
    }
    items.chunks(per_page).map(<[T]>::to_vec).collect()
}
