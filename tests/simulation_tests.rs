//! Integration tests for stepping, collision and configuration.

use drape::{ClothError, ClothMesh, ClothSim, SimConfig, SolverType};
use glam::Vec3;

const FRAME: f32 = 1.0 / 60.0;

fn hanging() -> ClothSim {
    let mut sim = ClothSim::new(ClothMesh::hanging_sheet(), SimConfig::default()).unwrap();
    sim.hang_to_air();
    sim
}

/// A horizontal sheet at height `y`.
fn flat_sheet(y: f32) -> ClothMesh {
    let mut mesh = ClothMesh::grid(8, 8, 0.05, Vec3::ZERO);
    for p in mesh.vertices.chunks_mut(3) {
        let (gx, gy) = (p[0], p[1]);
        p[0] = gx;
        p[1] = y;
        p[2] = gy;
    }
    mesh
}

/// A vertical, unpinned sheet whose bottom row starts just above the ground.
fn standing_sheet() -> ClothMesh {
    ClothMesh::grid(10, 20, 0.04, Vec3::new(-0.2, 0.81, 0.0))
}

/// A sheet leaning 45 degrees back from the vertical, lowest edge near the
/// ground.
fn leaning_sheet() -> ClothMesh {
    let mut mesh = ClothMesh::grid(10, 20, 0.04, Vec3::ZERO);
    let lean = std::f32::consts::FRAC_1_SQRT_2;
    for p in mesh.vertices.chunks_mut(3) {
        let down = p[1];
        p[1] = 0.6 + down * lean;
        p[2] = down * lean;
    }
    mesh
}

fn assert_above_ground(sim: &mut ClothSim, frames: usize) {
    let ground = sim.config().ground_height;
    for frame in 0..frames {
        sim.step(FRAME);
        for (i, p) in sim.particles().points().iter().enumerate() {
            assert!(
                p.y >= ground,
                "frame {}: particle {} at y = {}",
                frame,
                i,
                p.y
            );
        }
    }
    assert!(sim.positions().iter().all(|v| v.is_finite()));
}

// ─── Stepping ────────────────────────────────────────────────

#[test]
fn rest_state_is_a_fixed_point() {
    let config = SimConfig {
        gravity: Vec3::ZERO,
        bend_compliance: 0.5,
        ..Default::default()
    };
    let mut sim = ClothSim::new(ClothMesh::hanging_sheet(), config).unwrap();
    let before = sim.positions().to_vec();
    for _ in 0..30 {
        sim.step(FRAME);
    }
    assert_eq!(sim.positions(), &before[..]);
    for i in 0..sim.particles().len() {
        assert_eq!(sim.particles().velocity(i), Vec3::ZERO);
    }
}

#[test]
fn free_fall_matches_explicit_integration() {
    let config = SimConfig {
        substeps: 4,
        ..Default::default()
    };
    let mut sim = ClothSim::new(flat_sheet(5.0), config).unwrap();
    sim.step(FRAME);

    // v_k = k g h, y_n = y_0 + g h^2 n(n+1)/2
    let h = FRAME / 4.0;
    let expected = 5.0 - 10.0 * h * h * 10.0;
    for p in sim.particles().points() {
        assert!((p.y - expected).abs() < 1e-5, "{} vs {}", p.y, expected);
    }
}

#[test]
fn pinned_corners_hold_and_cloth_sags() {
    let mut sim = hanging();
    let top_left = sim.particles().position(0);
    let top_right = sim.particles().position(10);
    let top_middle = sim.particles().position(5);

    for _ in 0..60 {
        sim.step(FRAME);
    }

    assert_eq!(sim.particles().position(0), top_left);
    assert_eq!(sim.particles().position(10), top_right);
    assert!(sim.particles().position(5).y < top_middle.y);
    assert!(sim.positions().iter().all(|v| v.is_finite()));
}

#[test]
fn rigid_stretch_stays_close_to_rest() {
    let mut sim = hanging();
    for _ in 0..120 {
        sim.step(FRAME);
    }
    let per_constraint = sim.stretch_error() / sim.stretch_constraints().len() as f32;
    assert!(per_constraint < 0.01, "mean stretch error {}", per_constraint);
}

#[test]
fn jacobi_solver_is_stable() {
    let config = SimConfig {
        solver: SolverType::Jacobi,
        ..Default::default()
    };
    let mut sim = ClothSim::new(ClothMesh::hanging_sheet(), config).unwrap();
    sim.hang_to_air();
    for _ in 0..60 {
        sim.step(FRAME);
    }
    assert!(sim.positions().iter().all(|v| v.is_finite()));
    assert_eq!(sim.particles().position(0), sim.particles().rest_position(0));
}

#[test]
fn degenerate_delta_is_a_no_op() {
    let mut sim = hanging();
    sim.step(FRAME);
    let positions = sim.positions().to_vec();
    let velocity = sim.particles().velocity(50);

    for delta in [0.0, -FRAME, f32::NAN, f32::INFINITY] {
        sim.step(delta);
        assert_eq!(sim.positions(), &positions[..]);
        assert_eq!(sim.particles().velocity(50), velocity);
    }
    assert!(sim.positions().iter().all(|v| v.is_finite()));

    sim.step(FRAME);
    assert!(sim.positions().iter().all(|v| v.is_finite()));
}

// ─── Ground ──────────────────────────────────────────────────

#[test]
fn dropped_sheet_never_penetrates_ground() {
    let mut sim = ClothSim::new(flat_sheet(0.3), SimConfig::default()).unwrap();
    for _ in 0..90 {
        sim.step(FRAME);
        for p in sim.particles().points() {
            assert!(p.y >= 0.0, "particle below ground: {}", p);
        }
    }
    assert!(sim.particles().points().iter().all(|p| p.y == 0.0));
}

#[test]
fn collapsing_vertical_sheet_stays_above_ground() {
    let mut sim = ClothSim::new(standing_sheet(), SimConfig::default()).unwrap();
    assert_above_ground(&mut sim, 240);
}

#[test]
fn collapsing_leaning_sheet_stays_above_ground() {
    let mut sim = ClothSim::new(leaning_sheet(), SimConfig::default()).unwrap();
    assert_above_ground(&mut sim, 240);

    let config = SimConfig {
        solver: SolverType::Jacobi,
        ..Default::default()
    };
    let mut sim = ClothSim::new(leaning_sheet(), config).unwrap();
    assert_above_ground(&mut sim, 240);
}

#[test]
fn raised_ground_plane() {
    let config = SimConfig {
        ground_height: 0.5,
        ..Default::default()
    };
    let mut sim = ClothSim::new(flat_sheet(1.0), config).unwrap();
    for _ in 0..90 {
        sim.step(FRAME);
    }
    assert!(sim.particles().points().iter().all(|p| p.y >= 0.5));
}

// ─── Surface & reset ─────────────────────────────────────────

#[test]
fn surface_tracks_positions() {
    let mut sim = hanging();
    for n in sim.surface().normals().chunks(3) {
        assert!((n[2] - 1.0).abs() < 1e-6);
    }

    sim.add_velocity(50, Vec3::ONE);
    for _ in 0..30 {
        sim.step(FRAME);
    }
    let bounds = sim.surface().bounds();
    for p in sim.particles().points() {
        assert!(bounds.contains(*p));
    }
    for n in sim.surface().normals().chunks(3) {
        let len = Vec3::new(n[0], n[1], n[2]).length();
        assert!((len - 1.0).abs() < 1e-4);
    }
}

#[test]
fn reset_restores_rest_pose() {
    let mut sim = hanging();
    let rest = sim.positions().to_vec();
    let masses = sim.particles().inv_masses().to_vec();
    for _ in 0..30 {
        sim.step(FRAME);
    }
    assert_ne!(sim.positions(), &rest[..]);

    sim.reset();
    assert_eq!(sim.positions(), &rest[..]);
    assert_eq!(sim.particles().inv_masses(), &masses[..]);
    for i in 0..sim.particles().len() {
        assert_eq!(sim.particles().velocity(i), Vec3::ZERO);
    }
}

#[test]
fn hanging_sheet_layout() {
    let mesh = ClothMesh::hanging_sheet();
    assert_eq!(mesh.num_vertices(), 231);
    assert_eq!(mesh.num_triangles(), 400);

    let sim = ClothSim::new(mesh, SimConfig::default()).unwrap();
    let p = |i| sim.particles().position(i);
    assert!((p(1) - p(0) - Vec3::new(0.04, 0.0, 0.0)).length() < 1e-6);
    assert!((p(11) - p(0) - Vec3::new(0.0, -0.04, 0.0)).length() < 1e-6);
    assert!((p(50) - p(0) - Vec3::new(0.24, -0.16, 0.0)).length() < 1e-5);
}

#[test]
fn hang_to_air_pins_top_corners() {
    let mut sim = ClothSim::new(ClothMesh::hanging_sheet(), SimConfig::default()).unwrap();
    let center = sim.hang_to_air();
    assert!(center.x.abs() < 1e-6);
    assert!((center.y - 0.745859).abs() < 1e-5);
    assert_eq!(center.z, 0.0);

    let pinned: Vec<usize> = (0..sim.particles().len())
        .filter(|&i| sim.particles().is_pinned(i))
        .collect();
    assert_eq!(pinned, vec![0, 10]);
}

// ─── Configuration ───────────────────────────────────────────

#[test]
fn default_config() {
    let config = SimConfig::default();
    assert_eq!(config.substeps, 10);
    assert_eq!(config.stretch_compliance, 0.0);
    assert_eq!(config.bend_compliance, 1.0);
    assert_eq!(config.gravity, Vec3::new(0.0, -10.0, 0.0));
    assert_eq!(config.ground_height, 0.0);
    assert_eq!(config.solver, SolverType::GaussSeidel);
}

#[test]
fn config_from_partial_json() {
    let config = SimConfig::from_json(r#"{ "substeps": 4, "solver": "Jacobi" }"#).unwrap();
    assert_eq!(config.substeps, 4);
    assert_eq!(config.solver, SolverType::Jacobi);
    assert_eq!(config.bend_compliance, 1.0);
}

#[test]
fn config_rejects_bad_values() {
    assert!(matches!(
        SimConfig::from_json(r#"{ "substeps": 0 }"#),
        Err(ClothError::InvalidConfig(_))
    ));
    assert!(matches!(
        SimConfig::from_json(r#"{ "bend_compliance": -1.0 }"#),
        Err(ClothError::InvalidConfig(_))
    ));
    assert!(matches!(
        SimConfig::from_json("{ substeps"),
        Err(ClothError::ConfigParse(_))
    ));
}

#[test]
fn construction_rejects_malformed_meshes() {
    let bad_tris = ClothMesh::new(vec![0.; 9], vec![0, 1]);
    assert!(matches!(
        ClothSim::new(bad_tris, SimConfig::default()),
        Err(ClothError::MalformedTriangles { len: 2 })
    ));

    let bad_verts = ClothMesh::new(vec![0.; 8], vec![0, 1, 2]);
    assert!(matches!(
        ClothSim::new(bad_verts, SimConfig::default()),
        Err(ClothError::MalformedVertices { len: 8 })
    ));

    let bad_index = ClothMesh::new(vec![0.; 9], vec![0, 1, 3]);
    assert!(matches!(
        ClothSim::new(bad_index, SimConfig::default()),
        Err(ClothError::IndexOutOfRange { index: 3, vertex_count: 3 })
    ));

    let mut vertices = vec![0., 0., 0., 1., 0., 0., 0., 1., 0.];
    vertices[4] = f32::NAN;
    assert!(matches!(
        ClothSim::new(ClothMesh::new(vertices, vec![0, 1, 2]), SimConfig::default()),
        Err(ClothError::NonFiniteVertex { index: 1 })
    ));
}
