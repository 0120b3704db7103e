//! Edge-of-grid behavior: clamping, clipping, and degenerate configurations.

use unigrid::{GridError, UniformGrid};

fn grid_3x3() -> UniformGrid {
    UniformGrid::rasterized(&[3, 3], &[0.0, 0.0], &[2.0, 2.0]).unwrap()
}

#[test]
fn far_outside_points_clamp_to_boundary() {
    let g = grid_3x3();

    assert_eq!(g.nearest_node_index(&[-1e9, 1e9]).unwrap(), vec![0, 2]);
    assert_eq!(g.bottom_left_node_index(&[-1e9, 1e9]).unwrap(), vec![0, 1]);

    // Clamping is silent; only contains_point reports the violation.
    assert!(!g.contains_point(&[-1e9, 1e9]).unwrap());
}

#[test]
fn checked_lookups_reject_what_clamping_accepts() {
    let g = grid_3x3();

    assert!(g.checked_nearest_node_index(&[0.0, 2.0]).is_ok());
    assert!(matches!(
        g.checked_nearest_node_index(&[0.0, 2.0 + 1e-9]),
        Err(GridError::PointOutOfBounds { axis: 1, .. })
    ));
    assert!(matches!(
        g.checked_bottom_left_node_index(&[-0.1, 1.0]),
        Err(GridError::PointOutOfBounds { axis: 0, .. })
    ));
}

#[test]
fn neighborhood_clips_at_every_boundary() {
    let g = grid_3x3();

    // Corners keep 3 of 8 neighbors.
    for corner in [[0u32, 0], [2, 0], [0, 2], [2, 2]] {
        assert_eq!(g.neighborhood(&corner, 1).unwrap().len(), 3);
    }
    // Edge midpoints keep 5 of 8.
    for edge in [[1u32, 0], [0, 1], [2, 1], [1, 2]] {
        assert_eq!(g.neighborhood(&edge, 1).unwrap().len(), 5);
    }
    // The center keeps all 8.
    assert_eq!(g.neighborhood(&[1, 1], 1).unwrap().len(), 8);
}

#[test]
fn neighborhood_radius_exceeding_grid_covers_everything_once() {
    let g = grid_3x3();
    let mut hood = g.neighborhood(&[0, 0], 100).unwrap();
    hood.sort_unstable();
    assert_eq!(hood, vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn enveloping_nodes_at_the_upper_corner() {
    let g = grid_3x3();
    // x on the upper corner: the bottom-left node clamps to [1,1].
    let nodes = g.enveloping_nodes(&[2.0, 2.0], 0).unwrap();
    assert_eq!(nodes, vec![4, 5, 7, 8]);
}

#[test]
fn enveloping_nodes_clip_expansion_layers() {
    let g = UniformGrid::rasterized(&[5], &[0.0], &[4.0]).unwrap();
    // Cell [0,1] expanded by 2 layers clips at the lower boundary.
    assert_eq!(g.enveloping_nodes(&[0.5], 2).unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn two_node_axes_are_a_single_cell() {
    let g = UniformGrid::rasterized(&[2, 2], &[0.0, 0.0], &[1.0, 1.0]).unwrap();
    assert_eq!(g.node_count(), 4);
    assert_eq!(g.stride().unwrap(), &[1.0, 1.0]);
    assert_eq!(g.bottom_left_node_index(&[0.9, 0.1]).unwrap(), vec![0, 0]);
    assert_eq!(g.enveloping_nodes(&[0.5, 0.5], 3).unwrap().len(), 4);
}

#[test]
fn nearest_tie_rounds_away_from_zero() {
    let g = UniformGrid::rasterized(&[5], &[0.0], &[4.0]).unwrap();
    assert_eq!(g.nearest_node_index(&[0.5]).unwrap(), vec![1]);
    assert_eq!(g.nearest_node_index(&[1.5]).unwrap(), vec![2]);
    assert_eq!(g.nearest_node_index(&[0.49]).unwrap(), vec![0]);
}

#[test]
fn negative_extents_behave_like_positive_ones() {
    let g = UniformGrid::rasterized(&[3], &[-2.0], &[0.0]).unwrap();
    assert_eq!(g.axis_coordinates(0).unwrap(), &[-2.0, -1.0, 0.0]);
    assert_eq!(g.nearest_node_index(&[-0.9]).unwrap(), vec![1]);
    assert_eq!(g.bottom_left_node_index(&[-0.5]).unwrap(), vec![1]);
    assert!(g.contains_point(&[-2.0]).unwrap());
    assert!(!g.contains_point(&[0.1]).unwrap());
}

#[test]
fn every_degenerate_axis_is_reported() {
    for (nodes, lower, upper) in [
        (vec![3u32, 1], vec![0.0, 0.0], vec![1.0, 1.0]),
        (vec![3, 0], vec![0.0, 0.0], vec![1.0, 1.0]),
        (vec![3, 3], vec![0.0, 1.0], vec![1.0, 1.0]),
        (vec![3, 3], vec![0.0, 2.0], vec![1.0, 1.0]),
    ] {
        let result = UniformGrid::rasterized(&nodes, &lower, &upper);
        assert!(
            matches!(result, Err(GridError::DegenerateAxis { axis: 1, .. })),
            "expected degenerate axis for {:?}",
            (nodes, lower, upper)
        );
    }
}

#[test]
fn reconfiguring_requires_re_rasterize() {
    let mut g = grid_3x3();
    g.set_upper(&[10.0, 10.0]).unwrap();

    assert_eq!(g.nearest_node_index(&[9.0, 9.0]), Err(GridError::NotRasterized));
    assert_eq!(g.enveloping_nodes(&[9.0, 9.0], 0), Err(GridError::NotRasterized));
    assert_eq!(g.uniform_sample(&mut rand::rng()), Err(GridError::NotRasterized));

    g.rasterize().unwrap();
    assert_eq!(g.nearest_node_index(&[9.0, 9.0]).unwrap(), vec![2, 2]);
}
