//! Configuration loading and strategy-resolution tests.
//!
//! These tests verify:
//! - Flux-coefficient length enforcement per problem type
//! - Legality tables for numerical fluxes and boundary conditions
//! - Deterministic resolution across repeated loads
//! - Error messages naming the offending values

use dghyp::{
    BasisKind, BoundaryKind, ConfigError, Formulation, PhysicalFlux, ProblemSpec, ProblemType,
    RiemannScheme, TimeScheme,
};

/// Build a minimal parameter tree for the given physics section.
fn config_with_physics(physics: &str) -> String {
    format!(
        r#"{{
            "general": {{
                "spaceIntegrationType": "Gauss5",
                "basisFunctionType": "Lagrange",
                "timeIntegrationType": "RK4",
                "solverType": "weak",
                "simulationTime": 1.0,
                "timeStep": 0.001,
                "timeToWrite": 0.1
            }},
            "physics": {physics}
        }}"#
    )
}

fn transport_physics(flux_coeffs: &str, numerical_flux: &str) -> String {
    format!(
        r#"{{
            "problemType": "transport",
            "whatToWrite": ["u"],
            "numericalFlux": "{numerical_flux}",
            "fluxCoefficients": {flux_coeffs},
            "sourceTerms": "no",
            "sourceCoefficients": [],
            "initialBoundaryConditions": [
                {{"physicalGroup": "Init_Cond", "type": "constant", "coefficients": [1.0]}},
                {{"physicalGroup": "Border", "type": "freeTransport", "coefficients": []}}
            ]
        }}"#
    )
}

fn shallow_lin_physics(flux_coeffs: &str) -> String {
    format!(
        r#"{{
            "problemType": "shallowLin",
            "whatToWrite": ["H", "u", "v"],
            "numericalFlux": "LF",
            "fluxCoefficients": {flux_coeffs},
            "sourceTerms": "no",
            "sourceCoefficients": [],
            "initialBoundaryConditions": [
                {{"physicalGroup": "Init_Cond", "type": "gaussian2DShallowLin",
                  "coefficients": [0.1, 0.5, 0.05, 0.5, 0.05, 0.0]}},
                {{"physicalGroup": "Walls", "type": "reflectShallowLin", "coefficients": []}}
            ]
        }}"#
    )
}

#[test]
fn test_flux_coefficient_lengths_per_problem_type() {
    // shallow = 1, shallowLin = 2, transport = 2, acousticLin = 4
    let cases = [
        ("shallow", "[9.81]", "[9.81, 1.0]"),
        ("shallowLin", "[9.81, 2.0]", "[9.81]"),
        ("transport", "[1.0, 0.5]", "[1.0]"),
        ("acousticLin", "[1.2, 340.0, 0.0, 0.0]", "[1.2, 340.0]"),
    ];
    for (problem, good, bad) in cases {
        let bcs = match problem {
            "transport" => {
                r#"{"physicalGroup": "Init_Cond", "type": "constant", "coefficients": [1.0]}"#
            }
            _ => r#"{"physicalGroup": "Init_Cond", "type": "constant", "coefficients": [1.0, 0.0, 0.0]}"#,
        };
        let outputs = match problem {
            "transport" => r#"["u"]"#,
            "acousticLin" => r#"["p'"]"#,
            _ => r#"["H"]"#,
        };
        let physics = |coeffs: &str| {
            format!(
                r#"{{
                    "problemType": "{problem}",
                    "whatToWrite": {outputs},
                    "numericalFlux": "LF",
                    "fluxCoefficients": {coeffs},
                    "sourceTerms": "no",
                    "sourceCoefficients": [],
                    "initialBoundaryConditions": [{bcs}]
                }}"#
            )
        };

        let ok = ProblemSpec::from_json(&config_with_physics(&physics(good)), "params.json");
        assert!(ok.is_ok(), "{problem} with {good} should load: {ok:?}");

        let err = ProblemSpec::from_json(&config_with_physics(&physics(bad)), "params.json")
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::FluxCoefficientCount { .. }),
            "{problem} with {bad} should fail on the coefficient count, got {err:?}"
        );
    }
}

#[test]
fn test_shallow_lin_wrong_flux_coefficient_message() {
    let text = config_with_physics(&shallow_lin_physics("[1.0]"));
    let err = ProblemSpec::from_json(&text, "params.json").unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("Unexpected number of flux coefficients"),
        "{message}"
    );
    assert!(message.contains("shallowLin"), "{message}");
}

#[test]
fn test_roe_for_transport_is_rejected_naming_both() {
    let text = config_with_physics(&transport_physics("[1.0, 0.0]", "Roe"));
    let err = ProblemSpec::from_json(&text, "params.json").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Roe"), "{message}");
    assert!(message.contains("transport"), "{message}");
}

#[test]
fn test_mean_resolves_for_the_linear_systems_but_not_shallow() {
    let transport = config_with_physics(&transport_physics("[1.0, 0.0]", "mean"));
    let spec = ProblemSpec::from_json(&transport, "params.json").unwrap();
    assert_eq!(spec.riemann, RiemannScheme::Mean);

    let acoustic = config_with_physics(
        r#"{
            "problemType": "acousticLin",
            "whatToWrite": ["p'"],
            "numericalFlux": "mean",
            "fluxCoefficients": [1.2, 340.0, 0.0, 0.0],
            "sourceTerms": "no",
            "sourceCoefficients": [],
            "initialBoundaryConditions": [
                {"physicalGroup": "Init_Cond", "type": "constant", "coefficients": [0.0, 0.0, 0.0]}
            ]
        }"#,
    );
    let spec = ProblemSpec::from_json(&acoustic, "params.json").unwrap();
    assert_eq!(spec.riemann, RiemannScheme::Mean);

    let shallow = config_with_physics(
        r#"{
            "problemType": "shallow",
            "whatToWrite": ["H"],
            "numericalFlux": "mean",
            "fluxCoefficients": [9.81],
            "sourceTerms": "no",
            "sourceCoefficients": [],
            "initialBoundaryConditions": [
                {"physicalGroup": "Init_Cond", "type": "constant", "coefficients": [1.0, 0.0, 0.0]}
            ]
        }"#,
    );
    let err = ProblemSpec::from_json(&shallow, "params.json").unwrap_err();
    assert!(matches!(err, ConfigError::IllegalOption { .. }));
}

#[test]
fn test_full_resolution_of_shallow_lin() {
    let text = config_with_physics(&shallow_lin_physics("[9.81, 2.0]"));
    let spec = ProblemSpec::from_json(&text, "params.json").unwrap();

    assert_eq!(spec.problem, ProblemType::ShallowLin);
    assert_eq!(spec.n_unknowns, 3);
    assert_eq!(spec.formulation, Formulation::Weak);
    assert_eq!(spec.time_scheme, TimeScheme::Rk4);
    assert_eq!(spec.space_integration, "Gauss5");
    assert_eq!(spec.basis, BasisKind::Lagrange);
    assert_eq!(spec.law, PhysicalFlux::ShallowLin { g: 9.81, h0: 2.0 });
    assert_eq!(spec.riemann, RiemannScheme::LaxFriedrichs);
    assert_eq!(spec.boundaries.initial.kind, BoundaryKind::Gaussian2D);
    assert_eq!(
        spec.boundaries.get("Walls").unwrap().kind,
        BoundaryKind::Reflect
    );
    assert_eq!(spec.outputs, ["H", "u", "v"]);
}

#[test]
fn test_repeated_loads_resolve_identically() {
    let text = config_with_physics(&shallow_lin_physics("[9.81, 2.0]"));
    let first = ProblemSpec::from_json(&text, "params.json").unwrap();
    for _ in 0..3 {
        let again = ProblemSpec::from_json(&text, "params.json").unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_unreadable_file_is_an_io_error() {
    let err = ProblemSpec::load(std::path::Path::new("/no/such/params.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/no/such/params.json"));
}

#[test]
fn test_malformed_json_is_reported_with_file_name() {
    let err = ProblemSpec::from_json("{not json", "broken.json").unwrap_err();
    assert!(matches!(err, ConfigError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_boundary_vocabulary_does_not_cross_problem_types() {
    // reflectShallow is not an acoustic evaluator and vice versa.
    let text = config_with_physics(
        r#"{
            "problemType": "acousticLin",
            "whatToWrite": ["p'"],
            "numericalFlux": "LF",
            "fluxCoefficients": [1.2, 340.0, 0.0, 0.0],
            "sourceTerms": "no",
            "sourceCoefficients": [],
            "initialBoundaryConditions": [
                {"physicalGroup": "Init_Cond", "type": "constant", "coefficients": [0.0, 0.0, 0.0]},
                {"physicalGroup": "Walls", "type": "reflectShallow", "coefficients": []}
            ]
        }"#,
    );
    let err = ProblemSpec::from_json(&text, "params.json").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("reflectShallow"), "{message}");
    assert!(message.contains("acousticLin"), "{message}");
}

#[test]
fn test_source_coefficient_count_enforced() {
    let text = config_with_physics(
        r#"{
            "problemType": "shallow",
            "whatToWrite": ["H"],
            "numericalFlux": "LF",
            "fluxCoefficients": [9.81],
            "sourceTerms": "sourceShallowCstGradCstFrict",
            "sourceCoefficients": [0.1, 0.2],
            "initialBoundaryConditions": [
                {"physicalGroup": "Init_Cond", "type": "constant", "coefficients": [1.0, 0.0, 0.0]}
            ]
        }"#,
    );
    let err = ProblemSpec::from_json(&text, "params.json").unwrap_err();
    assert!(matches!(err, ConfigError::SourceCoefficientCount { .. }));
}
