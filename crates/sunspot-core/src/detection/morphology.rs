use ndarray::Array2;

/// One 3x3 dilation followed by one 3x3 erosion.
///
/// Closes small gaps in foreground regions without growing them.
pub fn morphological_closing(mask: &Array2<bool>) -> Array2<bool> {
    let dilated = dilate(mask);
    erode(&dilated)
}

/// A pixel stays true only if every in-bounds pixel of its 3x3 neighborhood is true.
pub fn erode(mask: &Array2<bool>) -> Array2<bool> {
    apply_3x3(mask, Reduce::All)
}

/// A pixel becomes true if any in-bounds pixel of its 3x3 neighborhood is true.
pub fn dilate(mask: &Array2<bool>) -> Array2<bool> {
    apply_3x3(mask, Reduce::Any)
}

#[derive(Clone, Copy)]
enum Reduce {
    All,
    Any,
}

// Out-of-bounds neighbors are skipped, so the image edge neither erodes nor dilates.
fn apply_3x3(mask: &Array2<bool>, reduce: Reduce) -> Array2<bool> {
    let (h, w) = mask.dim();
    let mut result = Array2::from_elem((h, w), false);

    for row in 0..h {
        for col in 0..w {
            let rows = row.saturating_sub(1)..=(row + 1).min(h - 1);
            let mut window = rows.flat_map(|r| {
                (col.saturating_sub(1)..=(col + 1).min(w - 1)).map(move |c| mask[[r, c]])
            });
            result[[row, col]] = match reduce {
                Reduce::All => window.all(|v| v),
                Reduce::Any => window.any(|v| v),
            };
        }
    }

    result
}
