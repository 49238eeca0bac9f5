//! Linear interpolation of sampled curves onto new grids

use std::cmp::Ordering;

/// Evenly spaced grid of `n` points from `start` to `end` inclusive
pub fn linear_grid(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Resample a curve `y` sampled at strictly ascending positions `x` onto
/// `grid`. Query points outside the sampled range clamp to the boundary
/// values. `x` and `y` must be non-empty and the same length.
pub fn interp_onto(x: &[f64], y: &[f64], grid: &[f64]) -> Vec<f64> {
    grid.iter().map(|&q| interp_single(x, y, q)).collect()
}

fn interp_single(x: &[f64], y: &[f64], xq: f64) -> f64 {
    let n = x.len();
    if xq <= x[0] {
        return y[0];
    }
    if xq >= x[n - 1] {
        return y[n - 1];
    }

    let upper = match x.binary_search_by(|v| v.partial_cmp(&xq).unwrap_or(Ordering::Less)) {
        Ok(i) => return y[i],
        Err(i) => i,
    };

    let (x0, x1) = (x[upper - 1], x[upper]);
    let (y0, y1) = (y[upper - 1], y[upper]);
    let t = (xq - x0) / (x1 - x0);
    y0 + t * (y1 - y0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_grid_endpoints() {
        let grid = linear_grid(0.0, 24000.0, 5);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[4], 24000.0);
        assert!((grid[2] - 12000.0).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint_interpolation() {
        let x = vec![0.0, 10.0];
        let y = vec![0.0, 4.0];
        let out = interp_onto(&x, &y, &[5.0]);
        assert!((out[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamps_outside_range() {
        let x = vec![100.0, 200.0];
        let y = vec![-3.0, 6.0];
        let out = interp_onto(&x, &y, &[50.0, 300.0]);
        assert_eq!(out[0], -3.0);
        assert_eq!(out[1], 6.0);
    }

    #[test]
    fn test_exact_node_hit() {
        let x = vec![1.0, 2.0, 3.0];
        let y = vec![10.0, 20.0, 30.0];
        let out = interp_onto(&x, &y, &[2.0]);
        assert_eq!(out[0], 20.0);
    }
}
