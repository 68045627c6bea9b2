//! Flow routing, erosion and deposition for one tick.
//!
//! Planning reads an immutable snapshot of the fields and runs per cell in
//! parallel. The resulting transfers are then applied in raster order, so the
//! outcome never depends on visitation order or thread scheduling.

use rayon::prelude::*;

use crate::erosion::ErosionConfig;
use crate::terrain::{Grid, NEIGHBORS_4};

/// Mass moved out of one interior cell during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellTransfer {
    /// Flat index of the source cell.
    pub source: usize,
    /// Lowest neighbour, when one sits below the source surface.
    pub target: Option<usize>,
    /// Water moved from source to target.
    pub flow: f64,
    /// Height removed from the source and suspended at the target.
    pub eroded: f64,
    /// Suspended sediment settled back onto the source height.
    pub deposited: f64,
}

/// Computes the transfer for cell `index`, or `None` when nothing moves.
///
/// Border cells and cells holding `min_water` or less never act as sources.
fn plan_cell(
    index: usize,
    heights: &Grid<f64>,
    water: &Grid<f64>,
    sediment: &Grid<f64>,
    config: &ErosionConfig,
) -> Option<CellTransfer> {
    let (x, z) = heights.coords(index);
    if heights.is_border(x, z) {
        return None;
    }

    let h = heights.as_slice();
    let w = water.as_slice();
    let cell_water = w[index];
    if cell_water <= config.min_water {
        return None;
    }

    let surface = h[index] + cell_water;
    let mut lowest: Option<(usize, f64)> = None;
    for (dx, dz) in NEIGHBORS_4 {
        // Interior cells always have four in-grid neighbours.
        let Some(n) = heights.neighbor(x, z, dx, dz) else {
            continue;
        };
        let level = h[n] + w[n];
        let lower = match lowest {
            Some((_, best)) => level < best,
            None => level < surface,
        };
        if lower {
            lowest = Some((n, level));
        }
    }

    let (target, diff, flow, eroded) = match lowest {
        Some((n, level)) => {
            let diff = surface - level;
            let flow = cell_water.min(diff * config.transfer_rate).max(0.0);
            let eroded = (flow * config.erosion_rate).clamp(0.0, h[index]);
            (Some(n), diff, flow, eroded)
        }
        None => (None, 0.0, 0.0, 0.0),
    };

    let deposited = if diff < config.calm_slope {
        sediment.as_slice()[index] * config.deposition_fraction
    } else {
        0.0
    };

    if flow == 0.0 && eroded == 0.0 && deposited == 0.0 {
        return None;
    }

    Some(CellTransfer {
        source: index,
        target,
        flow,
        eroded,
        deposited,
    })
}

/// Plans every transfer for the current snapshot, ordered by source index.
pub fn plan_transfers(
    heights: &Grid<f64>,
    water: &Grid<f64>,
    sediment: &Grid<f64>,
    config: &ErosionConfig,
) -> Vec<CellTransfer> {
    (0..heights.len())
        .into_par_iter()
        .filter_map(|i| plan_cell(i, heights, water, sediment, config))
        .collect()
}

/// Applies planned transfers in order.
///
/// `next_water` must start as a copy of the snapshot water. Each source loses
/// at most the water it held in the snapshot, so no cell goes negative.
pub fn apply_transfers(
    transfers: &[CellTransfer],
    heights: &mut Grid<f64>,
    next_water: &mut Grid<f64>,
    sediment: &mut Grid<f64>,
) {
    let h = heights.as_mut_slice();
    let w = next_water.as_mut_slice();
    let s = sediment.as_mut_slice();

    for t in transfers {
        let src = t.source;
        h[src] = (h[src] - t.eroded + t.deposited).max(0.0);
        s[src] = (s[src] - t.deposited).max(0.0);

        if let Some(dst) = t.target {
            w[src] = (w[src] - t.flow).max(0.0);
            w[dst] += t.flow;
            s[dst] += t.eroded;
        }
    }
}

/// Scales every water cell by the retention factor, drying out residue.
pub fn evaporate(water: &mut Grid<f64>, config: &ErosionConfig) {
    let retention = config.retention();
    let dry = config.dry_threshold;
    water.as_mut_slice().par_iter_mut().for_each(|w| {
        let next = *w * retention;
        *w = if next < dry { 0.0 } else { next };
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x3 grid with tall walls; interior cells are (1,1) and (2,1).
    fn walled_pair(left: f64, right: f64) -> Grid<f64> {
        let mut h = Grid::filled(4, 3, 50.0).unwrap();
        h[(1, 1)] = left;
        h[(2, 1)] = right;
        h
    }

    fn zeros(like: &Grid<f64>) -> Grid<f64> {
        Grid::filled(like.width(), like.height(), 0.0).unwrap()
    }

    #[test]
    fn test_slope_moves_water_and_erodes() {
        // Surface 9 + 1 = 10 over a neighbour at 8: diff 2.
        let heights = walled_pair(9.0, 8.0);
        let mut water = zeros(&heights);
        water[(1, 1)] = 1.0;
        let sediment = zeros(&heights);
        let config = ErosionConfig::default();

        let plan = plan_transfers(&heights, &water, &sediment, &config);
        assert_eq!(plan.len(), 1);
        let t = plan[0];
        assert_eq!(t.source, heights.index(1, 1));
        assert_eq!(t.target, Some(heights.index(2, 1)));
        assert!((t.flow - 0.6).abs() < 1e-12);
        assert!((t.eroded - 0.012).abs() < 1e-12);
        assert_eq!(t.deposited, 0.0);
    }

    #[test]
    fn test_apply_conserves_water_and_material() {
        let mut heights = walled_pair(9.0, 8.0);
        let mut water = zeros(&heights);
        water[(1, 1)] = 1.0;
        let mut sediment = zeros(&heights);
        let config = ErosionConfig::default();

        let plan = plan_transfers(&heights, &water, &sediment, &config);
        let mut next = water.clone();
        apply_transfers(&plan, &mut heights, &mut next, &mut sediment);

        assert!((next[(1, 1)] - 0.4).abs() < 1e-12);
        assert!((next[(2, 1)] - 0.6).abs() < 1e-12);
        assert!((next.sum() - water.sum()).abs() < 1e-12);
        assert!((heights[(1, 1)] - (9.0 - 0.012)).abs() < 1e-12);
        assert!((sediment[(2, 1)] - 0.012).abs() < 1e-12);
    }

    #[test]
    fn test_flow_limited_by_available_water() {
        let heights = walled_pair(20.0, 5.0);
        let mut water = zeros(&heights);
        water[(1, 1)] = 0.2;
        let sediment = zeros(&heights);

        let plan = plan_transfers(&heights, &water, &sediment, &ErosionConfig::default());
        assert_eq!(plan[0].flow, 0.2);
    }

    #[test]
    fn test_dry_and_border_cells_are_skipped() {
        let heights = walled_pair(9.0, 8.0);
        let mut water = zeros(&heights);
        water[(1, 1)] = 0.005;
        water[(0, 0)] = 5.0;
        let sediment = zeros(&heights);

        let plan = plan_transfers(&heights, &water, &sediment, &ErosionConfig::default());
        assert!(plan.is_empty());
    }

    #[test]
    fn test_pool_deposits_without_flow() {
        // Source surface 10.0 + 0.1 sits below both neighbours at 10.2.
        let mut heights = Grid::filled(3, 3, 10.2).unwrap();
        heights[(1, 1)] = 10.0;
        let mut water = zeros(&heights);
        water[(1, 1)] = 0.1;
        let mut sediment = zeros(&heights);
        sediment[(1, 1)] = 1.0;

        let plan = plan_transfers(&heights, &water, &sediment, &ErosionConfig::default());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].target, None);
        assert_eq!(plan[0].flow, 0.0);
        assert!((plan[0].deposited - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_steep_slope_does_not_deposit() {
        let heights = walled_pair(9.0, 8.0);
        let mut water = zeros(&heights);
        water[(1, 1)] = 1.0;
        let mut sediment = zeros(&heights);
        sediment[(1, 1)] = 1.0;

        let plan = plan_transfers(&heights, &water, &sediment, &ErosionConfig::default());
        assert_eq!(plan[0].deposited, 0.0);
    }

    #[test]
    fn test_erosion_never_digs_below_zero() {
        let heights = walled_pair(0.001, 0.0);
        let mut water = zeros(&heights);
        water[(1, 1)] = 10.0;
        let sediment = zeros(&heights);
        let config = ErosionConfig {
            erosion_rate: 1.0,
            ..Default::default()
        };

        let plan = plan_transfers(&heights, &water, &sediment, &config);
        assert!(plan[0].eroded <= 0.001);
    }

    #[test]
    fn test_planning_ignores_visit_order() {
        // Two sources feeding the same sink plan identically regardless of
        // which one is applied first.
        let mut heights = Grid::filled(5, 3, 50.0).unwrap();
        heights[(1, 1)] = 9.0;
        heights[(2, 1)] = 5.0;
        heights[(3, 1)] = 9.0;
        let mut water = zeros(&heights);
        water[(1, 1)] = 1.0;
        water[(3, 1)] = 1.0;
        let sediment = zeros(&heights);

        let plan = plan_transfers(&heights, &water, &sediment, &ErosionConfig::default());
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].flow, plan[1].flow);
        assert_eq!(plan[0].target, plan[1].target);
    }

    #[test]
    fn test_evaporate_scales_and_dries() {
        let mut water = Grid::from_vec(2, 1, vec![1.0, 0.0001]).unwrap();
        evaporate(&mut water, &ErosionConfig::default());
        assert!((water[(0, 0)] - 0.9).abs() < 1e-12);
        assert_eq!(water[(1, 0)], 0.0);
    }
}
