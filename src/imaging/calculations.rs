//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the output dimensions for downscaling to `target`.
///
/// Returns `None` when the image is already narrow enough (width ≤ target)
/// and should pass through untouched.
///
/// Otherwise the height becomes `target` and the width follows the aspect
/// ratio, `width * target / height`, rounded down. For very wide images
/// whose height is already at or below `target` that rule would upscale, so
/// the width is capped at `target` instead. Neither edge drops below 1px.
///
/// # Examples
/// ```
/// # use shoebox::imaging::calculate_downscale_dimensions;
/// assert_eq!(calculate_downscale_dimensions((2048, 1536), 1024), Some((1365, 1024)));
/// assert_eq!(calculate_downscale_dimensions((800, 600), 1024), None);
/// ```
pub fn calculate_downscale_dimensions(original: (u32, u32), target: u32) -> Option<(u32, u32)> {
    let (width, height) = original;
    if width <= target || height == 0 {
        return None;
    }

    if height > target {
        let w = (width as u64 * target as u64 / height as u64) as u32;
        Some((w.max(1), target))
    } else {
        let h = (height as u64 * target as u64 / width as u64) as u32;
        Some((target, h.max(1)))
    }
}
