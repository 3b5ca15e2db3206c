//! End-to-end checks of the single-source updater on small reference scenarios
use approx::assert_relative_eq;
use plume_core::{
    coefficients, contribution, update_single, Atmosphere, ConcentrationField, GridGeometry,
    GridSummary, KernelConfig, KernelError, PointSource, StabilityClass, Window,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 10×10 grid over [0, 100]², source at the centre, neutral atmosphere
fn reference_scenario() -> (GridGeometry, Atmosphere, PointSource) {
    (
        GridGeometry::new(0.0, 100.0, 0.0, 100.0, 10).unwrap(),
        Atmosphere::new(2.0, 0.0, StabilityClass::D).unwrap(),
        PointSource::new(50.0, 50.0, 5.0, 2.0),
    )
}

fn run_single(
    geometry: &GridGeometry,
    atmosphere: &Atmosphere,
    source: &PointSource,
    config: &KernelConfig,
) -> ConcentrationField {
    let mut field = ConcentrationField::for_geometry(geometry);
    let window = Window::full(geometry.resolution, geometry.resolution);
    update_single(
        &mut field.view_mut().unwrap(),
        window,
        source,
        atmosphere,
        geometry,
        config,
    )
    .unwrap();
    field
}

#[test]
fn test_reference_scenario_centre_cell() {
    let (geometry, atmosphere, source) = reference_scenario();
    let field = run_single(&geometry, &atmosphere, &source, &KernelConfig::default());

    // Cell (5, 5) is centred at (55, 55)
    let value = field.get(5, 5);
    assert!(value.is_finite() && value > 0.0, "centre cell: {value}");

    let distance = 50.0_f64.sqrt();
    let sigmas = coefficients(StabilityClass::D, distance);
    let expected = contribution(
        5.0,
        5.0,
        0.0,
        sigmas.sigma_y,
        sigmas.sigma_z,
        2.0,
        5.0,
        2.0,
    );
    assert_relative_eq!(value, expected, max_relative = 1e-12);
}

#[test]
fn test_downwind_cell_exceeds_upwind_mirror() {
    let (geometry, atmosphere, source) = reference_scenario();
    let field = run_single(&geometry, &atmosphere, &source, &KernelConfig::default());

    // (5, 6) is at dx = +15, dy = 5 and (5, 3) at dx = -15, dy = 5: same distance
    let downwind = field.get(5, 6);
    let upwind = field.get(5, 3);
    assert!(
        downwind > upwind,
        "downwind {downwind} should exceed upwind {upwind}"
    );
    assert!(upwind >= 0.0);
}

#[test]
fn test_ground_reflection_suppresses_cells_near_the_source() {
    let (geometry, atmosphere, source) = reference_scenario();
    let field = run_single(&geometry, &atmosphere, &source, &KernelConfig::default());

    // σ_z is small close to the source, so 2·exp(-½(H/σ_z)²) starves nearby
    // cells: the far corner (0, 0) ends up above the downwind cell (5, 6).
    let corner = field.get(0, 0);
    let downwind = field.get(5, 6);
    let upwind = field.get(5, 3);
    let centre = field.get(5, 5);
    assert!(corner > downwind, "corner {corner} vs downwind {downwind}");
    assert!(downwind > upwind);
    assert!(upwind > centre);
    assert_relative_eq!(corner, 3.0257e-2, max_relative = 1e-3);
    assert_relative_eq!(downwind, 2.5329e-2, max_relative = 1e-3);
    assert_relative_eq!(upwind, 5.2587e-3, max_relative = 1e-3);
    assert_relative_eq!(centre, 1.9118e-7, max_relative = 1e-3);
}

#[test]
fn test_every_cell_non_negative_and_finite() {
    let (geometry, _, source) = reference_scenario();
    for class in StabilityClass::ALL {
        for direction in [0.0, 1.0, 2.5, 4.0, 5.9] {
            let atmosphere = Atmosphere::new(3.5, direction, class).unwrap();
            let field = run_single(&geometry, &atmosphere, &source, &KernelConfig::default());
            assert!(
                field.as_slice().iter().all(|v| v.is_finite() && *v >= 0.0),
                "class {class}, direction {direction}"
            );
        }
    }
}

#[test]
fn test_cutoffs_leave_cells_untouched() {
    let geometry = GridGeometry::new(0.0, 1000.0, 0.0, 1000.0, 100).unwrap();
    let atmosphere = Atmosphere::new(2.0, 0.0, StabilityClass::A).unwrap();
    // Exactly on the centre of cell (50, 50)
    let source = PointSource::new(505.0, 505.0, 5.0, 2.0);
    let field = run_single(&geometry, &atmosphere, &source, &KernelConfig::default());

    assert_eq!(field.get(50, 50), 0.0, "receptor at the source must be skipped");
    assert!(field.get(50, 60) > 0.0, "100 m downwind must be reached");

    for row in 0..100 {
        for col in 0..100 {
            let (x, y) = geometry.cell_center(row, col);
            let distance = (x - source.x).hypot(y - source.y);
            if !(1.0..=300.0).contains(&distance) {
                assert_eq!(field.get(row, col), 0.0, "cell ({row}, {col}) at {distance}");
            }
        }
    }
}

#[test]
fn test_wind_direction_rotates_plume() {
    let (geometry, _, source) = reference_scenario();
    let east = Atmosphere::new(2.0, 0.0, StabilityClass::D).unwrap();
    let north = Atmosphere::from_degrees(2.0, 90.0, StabilityClass::D).unwrap();
    let config = KernelConfig::default();

    let east_field = run_single(&geometry, &east, &source, &config);
    let north_field = run_single(&geometry, &north, &source, &config);

    // Cell (5, 8) lies east of the source, (8, 5) lies north of it
    assert!(east_field.get(5, 8) > east_field.get(8, 5));
    assert!(north_field.get(8, 5) > north_field.get(5, 8));
    assert_relative_eq!(
        east_field.get(5, 8),
        north_field.get(8, 5),
        max_relative = 1e-9
    );
}

#[test]
fn test_stable_air_keeps_elevated_release_aloft() {
    let (geometry, _, source) = reference_scenario();
    let config = KernelConfig::default();
    let unstable = Atmosphere::new(2.0, 0.0, StabilityClass::A).unwrap();
    let stable = Atmosphere::new(2.0, 0.0, StabilityClass::F).unwrap();

    // A 2 m release under class F barely reaches the ground within the grid
    let a = GridSummary::from_cells(run_single(&geometry, &unstable, &source, &config).as_slice());
    let f = GridSummary::from_cells(run_single(&geometry, &stable, &source, &config).as_slice());
    assert!(a.max > f.max, "class A max {} vs class F max {}", a.max, f.max);
    assert!(f.max > 0.0);
}

#[test]
fn test_single_update_is_deterministic() {
    let (geometry, atmosphere, source) = reference_scenario();
    let config = KernelConfig::default();
    let first = run_single(&geometry, &atmosphere, &source, &config);
    let second = run_single(&geometry, &atmosphere, &source, &config);
    assert_eq!(first, second);
}

#[test]
fn test_invalid_wind_rejected_at_construction() {
    assert_eq!(
        Atmosphere::new(0.0, 0.0, StabilityClass::D),
        Err(KernelError::InvalidWindSpeed(0.0))
    );
    assert!(matches!(
        Atmosphere::new(2.0, f64::NAN, StabilityClass::D),
        Err(KernelError::InvalidWindDirection(_))
    ));
}
