//! Local targets driven through a workspace.

use qsp_adapter_sim::{API_VALIDATOR_KIND, SIMULATOR_KIND, SimulatorBackend, register_all};
use qsp_hal::{Backend, BackendRegistry, HalError, TargetConfig, Workspace, WorkspaceConfig};
use qsp_ir::{Circuit, QubitId};

fn workspace() -> Workspace {
    let mut registry = BackendRegistry::new();
    register_all(&mut registry);

    let mut config = WorkspaceConfig {
        identity: Some("local".into()),
        location: Some("local".into()),
        default_target: Some("simulator".into()),
        ..WorkspaceConfig::default()
    };
    config.targets.insert(
        "simulator".into(),
        TargetConfig::of_kind(SIMULATOR_KIND).with_setting("seed", serde_json::json!(5)),
    );
    config
        .targets
        .insert("quantinuum.sim".into(), TargetConfig::of_kind(API_VALIDATOR_KIND));
    Workspace::connect(config, &registry).unwrap()
}

fn signal_circuit(x: f64) -> Circuit {
    let mut circuit = Circuit::with_size("signal", 1, 0);
    circuit.rx(-2.0 * x.acos(), QubitId(0)).unwrap();
    circuit.measure_all().unwrap();
    circuit
}

#[test]
fn test_register_all_kinds() {
    let mut registry = BackendRegistry::new();
    register_all(&mut registry);
    assert_eq!(registry.available_backends(), vec!["api_validator", "simulator"]);
}

#[tokio::test]
async fn test_workspace_targets() {
    let ws = workspace();
    assert_eq!(ws.list_targets(), vec!["quantinuum.sim", "simulator"]);
    assert!(ws.target("simulator").unwrap().capabilities().is_simulator);
}

#[tokio::test]
async fn test_default_target_runs_simulation() {
    let ws = workspace();
    let result = ws.run(&signal_circuit(0.5), Some(2000), None).await.unwrap();
    assert_eq!(result.counts.total_shots(), 2000);
    let p0 = result.counts.probability("0");
    assert!((p0 - 0.25).abs() < 0.05, "p0 = {p0}");
}

#[tokio::test]
async fn test_validator_target_reports_zeros() {
    let ws = workspace();
    let result = ws
        .run(&signal_circuit(0.5), Some(100), Some("quantinuum.sim"))
        .await
        .unwrap();
    assert_eq!(result.counts.get("0"), 100);
}

#[tokio::test]
async fn test_seeded_simulators_agree() {
    let circuit = signal_circuit(0.3);
    let a = SimulatorBackend::with_seed(42);
    let b = SimulatorBackend::with_seed(42);
    let ja = a.submit(&circuit, 500).await.unwrap();
    let jb = b.submit(&circuit, 500).await.unwrap();
    let ra = a.wait(&ja).await.unwrap();
    let rb = b.wait(&jb).await.unwrap();
    assert_eq!(ra.counts, rb.counts);
}

#[tokio::test]
async fn test_simulator_rejects_unbound_and_zero_shots() {
    let backend = SimulatorBackend::new();
    let mut template = Circuit::with_size("template", 1, 0);
    template
        .rx(qsp_ir::ParameterExpression::symbol("x"), QubitId(0))
        .unwrap();

    assert!(matches!(
        backend.submit(&template, 10).await,
        Err(HalError::InvalidCircuit(msg)) if msg.contains("x")
    ));
    assert!(matches!(
        backend.submit(&signal_circuit(0.1), 0).await,
        Err(HalError::InvalidShots(_))
    ));
}
