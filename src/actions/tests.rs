// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rstest::{fixture, rstest};
use serde_json::json;

use super::{ActionContext, ActionError, ActionHandler, StepActionEngine};
use crate::config::{DefaultStrategy, TidewalkConfig};
use crate::dom::ElementId;
use crate::handle::{
    BubbleRequest, CameraHandle, CollaboratorError, Controller, DiagramHandle, FitOptions,
    FitTarget, GotoTarget, OverlayHandle, RenderedDiagram,
};
use crate::model::{ActionDefinition, DiagramType, ErrorPolicy};
use crate::resolve::TargetResolver;
use crate::strategy::{RegistryError, StrategyRegistry};

const FLOWCHART_SOURCE: &str = "flowchart TD\nStart --> Check --> Api";
const FLOWCHART_SVG: &str = include_str!("../../tests/fixtures/flowchart.svg");

type Log = Arc<Mutex<Vec<String>>>;

fn entries(log: &Log) -> Vec<String> {
    log.lock().expect("log").clone()
}

#[derive(Default)]
struct RecordingCamera {
    log: Log,
    fits: Mutex<Vec<(FitTarget, FitOptions)>>,
    supports_fit_all: bool,
}

#[async_trait]
impl CameraHandle for RecordingCamera {
    async fn fit(&self, target: FitTarget, options: FitOptions) -> Result<(), CollaboratorError> {
        self.log.lock().expect("log").push("camera.fit".to_owned());
        self.fits.lock().expect("fits").push((target, options));
        Ok(())
    }

    async fn reset(&self) -> Result<(), CollaboratorError> {
        self.log.lock().expect("log").push("camera.reset".to_owned());
        Ok(())
    }

    async fn fit_all(&self, padding: Option<f64>) -> Result<(), CollaboratorError> {
        if !self.supports_fit_all {
            return Err(CollaboratorError::Unsupported("camera.fitAll"));
        }
        self.log.lock().expect("log").push(format!("camera.fitAll {padding:?}"));
        Ok(())
    }

    async fn destroy(&self) {}
}

#[derive(Default)]
struct RecordingOverlay {
    bubbles: Mutex<Vec<BubbleRequest>>,
    hidden: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl OverlayHandle for RecordingOverlay {
    async fn show_bubble(&self, request: BubbleRequest) -> Result<(), CollaboratorError> {
        self.bubbles.lock().expect("bubbles").push(request);
        Ok(())
    }

    async fn hide_bubble(&self, id: Option<&str>) -> Result<(), CollaboratorError> {
        self.hidden.lock().expect("hidden").push(id.map(str::to_owned));
        Ok(())
    }

    async fn destroy(&self) {}
}

#[derive(Default)]
struct RecordingController {
    log: Log,
    fail_next: bool,
}

impl RecordingController {
    fn record(&self, entry: String) -> Result<(), CollaboratorError> {
        self.log.lock().expect("log").push(entry);
        Ok(())
    }
}

#[async_trait]
impl Controller for RecordingController {
    async fn next(&self) -> Result<(), CollaboratorError> {
        if self.fail_next {
            return Err(CollaboratorError::failed("controller", "already at the last step"));
        }
        self.record("next".to_owned())
    }

    async fn prev(&self) -> Result<(), CollaboratorError> {
        self.record("prev".to_owned())
    }

    async fn goto(&self, target: GotoTarget) -> Result<(), CollaboratorError> {
        self.record(format!("goto {target}"))
    }

    async fn reset(&self) -> Result<(), CollaboratorError> {
        self.record("reset".to_owned())
    }
}

/// Records its name, then fails when told to.
struct Probe {
    log: Log,
    fails: bool,
}

#[async_trait]
impl ActionHandler for Probe {
    async fn handle(
        &self,
        action: &ActionDefinition,
        _ctx: &ActionContext<'_>,
    ) -> Result<(), ActionError> {
        self.log.lock().expect("log").push(action.name.clone());
        if self.fails {
            return Err(ActionError::invalid_args("probe failure"));
        }
        Ok(())
    }
}

#[fixture]
fn diagram() -> RenderedDiagram {
    RenderedDiagram::new(FLOWCHART_SOURCE, FLOWCHART_SVG).expect("diagram")
}

fn resolver(config: &TidewalkConfig) -> TargetResolver {
    TargetResolver::new(Arc::new(StrategyRegistry::with_builtin_strategies(config)))
}

fn engine() -> StepActionEngine {
    let config = TidewalkConfig::default();
    StepActionEngine::with_default_handlers(resolver(&config), &config)
}

fn action(name: &str, payload: serde_json::Value) -> ActionDefinition {
    ActionDefinition::new(name, payload)
}

fn element_by_id(diagram: &RenderedDiagram, id: &str) -> ElementId {
    let doc = diagram.document().read().expect("doc");
    let element = doc
        .elements()
        .find(|(_, el)| el.id() == Some(id))
        .map(|(element, _)| element)
        .expect("element");
    element
}

fn highlighted(diagram: &RenderedDiagram, class: &str) -> Vec<String> {
    let doc = diagram.document().read().expect("doc");
    doc.elements()
        .filter(|(_, el)| el.has_class(class))
        .map(|(_, el)| el.id().unwrap_or("?").to_owned())
        .collect()
}

fn probe_engine(log: &Log) -> StepActionEngine {
    let mut engine = StepActionEngine::new();
    engine.register_handler("probe.a", Arc::new(Probe { log: Arc::clone(log), fails: false }));
    engine.register_handler("probe.b", Arc::new(Probe { log: Arc::clone(log), fails: true }));
    engine.register_handler("probe.c", Arc::new(Probe { log: Arc::clone(log), fails: false }));
    engine
}

#[rstest]
#[case(ErrorPolicy::Continue, &["probe.a", "probe.b", "probe.c"])]
#[case(ErrorPolicy::Stop, &["probe.a", "probe.b"])]
#[tokio::test(start_paused = true)]
async fn error_policy_decides_whether_later_actions_run(
    diagram: RenderedDiagram,
    #[case] policy: ErrorPolicy,
    #[case] executed: &[&str],
) {
    let log = Log::default();
    let engine = probe_engine(&log);
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller);
    let actions = ["probe.a", "probe.b", "probe.c"].map(ActionDefinition::bare);

    let failures = engine.run(&actions, &ctx, policy).await;

    assert_eq!(entries(&log), executed);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 1);
    assert_eq!(failures[0].action, "probe.b");
    assert!(failures[0].error.is_invalid_args());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn unknown_actions_fail_without_stopping_continue_runs(diagram: RenderedDiagram) {
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller);
    let actions = [ActionDefinition::bare("camera.zoom"), ActionDefinition::bare("nav.next")];

    let failures = engine().run(&actions, &ctx, ErrorPolicy::Continue).await;

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].error, ActionError::UnknownAction("camera.zoom".to_owned()));
    assert_eq!(entries(&controller.log), vec!["next"]);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn register_handler_replaces_a_default(diagram: RenderedDiagram) {
    let log = Log::default();
    let mut engine = engine();
    let previous =
        engine.register_handler("nav.next", Arc::new(Probe { log: Arc::clone(&log), fails: false }));
    assert!(previous.is_some());

    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller);
    let failures = engine.run(&[ActionDefinition::bare("nav.next")], &ctx, ErrorPolicy::Stop).await;

    assert!(failures.is_empty());
    assert_eq!(entries(&log), vec!["nav.next"]);
    assert!(entries(&controller.log).is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn highlight_replaces_then_clears(diagram: RenderedDiagram) {
    let engine = engine();
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller);

    let first = [action("style.highlight", json!({ "targets": ["Start", "Check"] }))];
    assert!(engine.run(&first, &ctx, ErrorPolicy::Stop).await.is_empty());
    assert_eq!(
        highlighted(&diagram, "tidewalk-highlight"),
        vec!["flowchart-Start-0", "flowchart-Check-1"]
    );

    let second = [action("style.highlight", json!({ "target": "Api" }))];
    assert!(engine.run(&second, &ctx, ErrorPolicy::Stop).await.is_empty());
    assert_eq!(highlighted(&diagram, "tidewalk-highlight"), vec!["flowchart-Api-2"]);

    let clear = [ActionDefinition::bare("style.clear")];
    assert!(engine.run(&clear, &ctx, ErrorPolicy::Stop).await.is_empty());
    assert!(highlighted(&diagram, "tidewalk-highlight").is_empty());

    let state = engine.highlight().expect("highlight").lock().expect("state").clone();
    assert!(state.is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn highlight_honours_a_class_override(diagram: RenderedDiagram) {
    let engine = engine();
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller);

    let actions = [
        action("style.highlight", json!({ "target": "Db" })),
        action("style.highlight", json!({ "target": "Db", "class": "focus" })),
    ];
    assert!(engine.run(&actions, &ctx, ErrorPolicy::Stop).await.is_empty());

    assert!(highlighted(&diagram, "tidewalk-highlight").is_empty());
    assert_eq!(highlighted(&diagram, "focus"), vec!["flowchart-Db-3"]);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn unresolved_highlight_is_empty_not_a_failure(diagram: RenderedDiagram) {
    let engine = engine();
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller);

    let actions = [
        action("style.highlight", json!({ "target": "Start" })),
        action("style.highlight", json!({ "target": "Nowhere" })),
    ];
    assert!(engine.run(&actions, &ctx, ErrorPolicy::Stop).await.is_empty());
    assert!(highlighted(&diagram, "tidewalk-highlight").is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn highlight_rejects_a_multi_word_class(diagram: RenderedDiagram) {
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller);
    let actions = [action("style.highlight", json!({ "target": "Start", "class": "a b" }))];

    let failures = engine().run(&actions, &ctx, ErrorPolicy::Stop).await;

    assert_eq!(failures.len(), 1);
    assert!(failures[0].error.is_invalid_args());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn camera_fit_frames_the_first_element_with_config_defaults(diagram: RenderedDiagram) {
    let camera = RecordingCamera::default();
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller).with_camera(&camera);
    let actions = [action("camera.fit", json!({ "target": "Start", "duration": 900 }))];

    assert!(engine().run(&actions, &ctx, ErrorPolicy::Stop).await.is_empty());

    let fits = camera.fits.lock().expect("fits");
    let (target, options) = &fits[0];
    assert_eq!(target.element, element_by_id(&diagram, "flowchart-Start-0"));
    assert!(target.bounds.is_some());
    assert_eq!(options.padding, Some(24.0));
    assert_eq!(options.duration_ms, Some(900));
    assert_eq!(options.easing.as_deref(), Some("ease-in-out"));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn camera_fit_with_unresolvable_target_never_reaches_the_camera(diagram: RenderedDiagram) {
    let camera = RecordingCamera::default();
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller).with_camera(&camera);
    let actions = [action("camera.fit", json!({ "target": "Chek" }))];

    let failures = engine().run(&actions, &ctx, ErrorPolicy::Continue).await;

    assert_eq!(failures.len(), 1);
    let ActionError::InvalidArgs(message) = &failures[0].error else {
        panic!("expected invalid args, got {:?}", failures[0].error);
    };
    assert!(message.contains("did you mean `Check`"), "{message}");
    assert!(entries(&camera.log).is_empty());
}

#[rstest]
#[case(json!({}))]
#[case(json!({ "target": 7 }))]
#[tokio::test(start_paused = true)]
async fn camera_fit_requires_a_target(diagram: RenderedDiagram, #[case] payload: serde_json::Value) {
    let camera = RecordingCamera::default();
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller).with_camera(&camera);

    let failures = engine().run(&[action("camera.fit", payload)], &ctx, ErrorPolicy::Stop).await;

    assert_eq!(failures.len(), 1);
    assert!(failures[0].error.is_invalid_args());
    assert!(entries(&camera.log).is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn missing_collaborators_turn_actions_into_no_ops(diagram: RenderedDiagram) {
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller);
    let actions = [
        action("camera.fit", json!({ "target": "Nowhere" })),
        ActionDefinition::bare("camera.reset"),
        ActionDefinition::bare("camera.fitAll"),
        action("overlay.bubble", json!({ "target": "Start", "text": "hi" })),
        ActionDefinition::bare("overlay.hide"),
    ];

    assert!(engine().run(&actions, &ctx, ErrorPolicy::Stop).await.is_empty());
}

#[rstest]
#[case(true, "camera.fitAll Some(8.0)")]
#[case(false, "camera.reset")]
#[tokio::test(start_paused = true)]
async fn fit_all_falls_back_to_reset(
    diagram: RenderedDiagram,
    #[case] supports_fit_all: bool,
    #[case] expected: &str,
) {
    let camera = RecordingCamera { supports_fit_all, ..Default::default() };
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller).with_camera(&camera);
    let actions = [action("camera.fitAll", json!({ "padding": 8.0 }))];

    assert!(engine().run(&actions, &ctx, ErrorPolicy::Stop).await.is_empty());
    assert_eq!(entries(&camera.log), vec![expected]);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn bubble_and_hide_reach_the_overlay(diagram: RenderedDiagram) {
    let overlay = RecordingOverlay::default();
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller).with_overlay(&overlay);
    let actions = [
        action("overlay.bubble", json!({ "target": "Api", "text": "Calls the API", "id": "b1" })),
        action("overlay.hide", json!({ "id": "b1" })),
        ActionDefinition::bare("overlay.hide"),
    ];

    assert!(engine().run(&actions, &ctx, ErrorPolicy::Stop).await.is_empty());

    let bubbles = overlay.bubbles.lock().expect("bubbles");
    assert_eq!(bubbles.len(), 1);
    assert_eq!(bubbles[0].id.as_deref(), Some("b1"));
    assert_eq!(bubbles[0].text, "Calls the API");
    assert_eq!(bubbles[0].target.element, element_by_id(&diagram, "flowchart-Api-2"));
    assert_eq!(*overlay.hidden.lock().expect("hidden"), vec![Some("b1".to_owned()), None]);
}

#[rstest]
#[case(json!({ "target": "Nowhere", "text": "lost" }))]
#[case(json!({ "target": "Api" }))]
#[case(json!({ "target": "Api", "text": "  " }))]
#[tokio::test(start_paused = true)]
async fn bubble_needs_a_target_and_text(
    diagram: RenderedDiagram,
    #[case] payload: serde_json::Value,
) {
    let overlay = RecordingOverlay::default();
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller).with_overlay(&overlay);

    let failures =
        engine().run(&[action("overlay.bubble", payload)], &ctx, ErrorPolicy::Stop).await;

    assert_eq!(failures.len(), 1);
    assert!(failures[0].error.is_invalid_args());
    assert!(overlay.bubbles.lock().expect("bubbles").is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn navigation_reaches_the_controller(diagram: RenderedDiagram) {
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller);
    let actions = [
        ActionDefinition::bare("nav.next"),
        ActionDefinition::bare("nav.prev"),
        action("nav.goto", json!({ "index": 3 })),
        action("nav.goto", json!({ "step": "intro" })),
        ActionDefinition::bare("nav.reset"),
        ActionDefinition::bare("nav.goto"),
    ];

    let failures = engine().run(&actions, &ctx, ErrorPolicy::Continue).await;

    assert_eq!(entries(&controller.log), vec!["next", "prev", "goto #3", "goto intro", "reset"]);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 5);
    assert!(failures[0].error.is_invalid_args());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn controller_errors_surface_as_collaborator_failures(diagram: RenderedDiagram) {
    let controller = RecordingController { fail_next: true, ..Default::default() };
    let ctx = ActionContext::new(&diagram, &controller);

    let failures =
        engine().run(&[ActionDefinition::bare("nav.next")], &ctx, ErrorPolicy::Stop).await;

    assert!(matches!(failures[0].error, ActionError::Collaborator(CollaboratorError::Failed { .. })));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn wait_sleeps_for_the_requested_time(diagram: RenderedDiagram) {
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&diagram, &controller);
    let actions = [
        action("wait", json!({ "ms": 250 })),
        action("wait", json!({ "duration": 50 })),
        ActionDefinition::bare("wait"),
    ];

    let started = tokio::time::Instant::now();
    assert!(engine().run(&actions, &ctx, ErrorPolicy::Stop).await.is_empty());
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn node_targets_without_a_strategy_are_configuration_failures() {
    let config = TidewalkConfig { default_strategy: DefaultStrategy::None, ..Default::default() };
    let engine = StepActionEngine::with_default_handlers(resolver(&config), &config);
    let unknown = RenderedDiagram::new("venn\nA", FLOWCHART_SVG).expect("diagram");
    let controller = RecordingController::default();
    let ctx = ActionContext::new(&unknown, &controller);

    let failures = engine
        .run(&[action("style.highlight", json!({ "target": "Start" }))], &ctx, ErrorPolicy::Stop)
        .await;

    assert_eq!(
        failures[0].error,
        ActionError::Configuration(RegistryError::NoStrategy(DiagramType::Unknown))
    );
}
