// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::rstest;
use serde_json::json;

use tidewalk::actions::{ActionContext, StepActionEngine};
use tidewalk::config::TidewalkConfig;
use tidewalk::detect::detect_diagram_type;
use tidewalk::handle::logging::LoggingController;
use tidewalk::handle::{
    CameraHandle, CollaboratorError, DiagramHandle, FitOptions, FitTarget, RenderedDiagram,
};
use tidewalk::model::{ActionDefinition, DiagramType, ErrorPolicy, TargetDescriptor};
use tidewalk::resolve::TargetResolver;
use tidewalk::strategy::{global_registry, init_global_registry, StrategyRegistry};

const FLOWCHART_SVG: &str = include_str!("fixtures/flowchart.svg");
const SEQUENCE_SVG: &str = include_str!("fixtures/sequence.svg");
const GANTT_SVG: &str = include_str!("fixtures/gantt.svg");
const PIE_SVG: &str = include_str!("fixtures/pie.svg");
const GITGRAPH_SVG: &str = include_str!("fixtures/gitgraph.svg");

#[derive(Default)]
struct Frames(Mutex<Vec<FitTarget>>);

#[async_trait]
impl CameraHandle for Frames {
    async fn fit(&self, target: FitTarget, _options: FitOptions) -> Result<(), CollaboratorError> {
        self.0.lock().expect("frames").push(target);
        Ok(())
    }

    async fn reset(&self) -> Result<(), CollaboratorError> {
        Ok(())
    }

    async fn destroy(&self) {}
}

fn resolver() -> TargetResolver {
    let registry = StrategyRegistry::with_builtin_strategies(&TidewalkConfig::default());
    TargetResolver::new(Arc::new(registry))
}

fn element_id_attr(diagram: &RenderedDiagram, target: &str) -> Option<String> {
    let target = TargetDescriptor::parse(target).expect("target");
    let resolution = resolver().resolve(diagram, &target).expect("strategy");
    let doc = diagram.document().read().expect("doc");
    resolution.first().and_then(|el| doc.get(el)).and_then(|el| el.id().map(str::to_owned))
}

#[rstest]
#[case("flowchart LR\nStart --> Check", FLOWCHART_SVG, "Check", "flowchart-Check-1")]
#[case("sequenceDiagram\nAlice->>Bob: hi", SEQUENCE_SVG, "Bob", "participant-Bob-1")]
#[case("gantt\ntitle Project", GANTT_SVG, "task1", "task1")]
#[case("sequenceDiagram\nAlice->>Bob: hi", SEQUENCE_SVG, "element:actor2", "actor2")]
#[case("gitGraph\ncommit", GITGRAPH_SVG, "element:task1", "")]
#[case("gantt\ntitle Project", GANTT_SVG, "selector:rect.milestone", "launch")]
fn resolves_rendered_fixtures(
    #[case] source: &str,
    #[case] svg: &str,
    #[case] target: &str,
    #[case] expected: &str,
) {
    let diagram = RenderedDiagram::new(source, svg).expect("diagram");
    let expected = (!expected.is_empty()).then(|| expected.to_owned());
    assert_eq!(element_id_attr(&diagram, target), expected);
}

#[test]
fn gantt_scenario_from_source_to_selectors() {
    let source = "gantt\ntitle Project";
    assert_eq!(detect_diagram_type(source), DiagramType::Gantt);

    let registry = StrategyRegistry::with_builtin_strategies(&TidewalkConfig::default());
    let strategy = registry.get_or_default(DiagramType::Gantt).expect("gantt strategy");
    let selectors = strategy.target_selectors("task1");
    assert!(selectors[0].starts_with(".task"));
    assert!(selectors.last().expect("fallback").contains("data-id"));
}

#[test]
fn pie_slices_resolve_by_legend_label() {
    let diagram = RenderedDiagram::new("pie title Minerals", PIE_SVG).expect("diagram");
    let resolver = resolver();
    let doc_ids = {
        let strategy = resolver.strategy_for(&diagram).expect("strategy");
        let doc = diagram.document().read().expect("doc");
        strategy.extract_node_ids(&doc).ids().map(str::to_owned).collect::<Vec<_>>()
    };
    assert_eq!(doc_ids, vec!["Calcium", "Potassium", "Calcium_2"]);

    let target = TargetDescriptor::node("Calcium_2").expect("target");
    assert_eq!(resolver.resolve(&diagram, &target).expect("resolve").elements().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn rerender_is_picked_up_between_steps() {
    let diagram =
        RenderedDiagram::new("flowchart LR\nStart --> Check", FLOWCHART_SVG).expect("diagram");
    let config = TidewalkConfig::default();
    let engine = StepActionEngine::with_default_handlers(resolver(), &config);
    let camera = Frames::default();
    let controller = LoggingController::default();
    let ctx = ActionContext::new(&diagram, &controller).with_camera(&camera);

    let step = [
        ActionDefinition::new("style.highlight", json!({ "target": "Start" })),
        ActionDefinition::new("camera.fit", json!({ "target": "Start" })),
        ActionDefinition::bare("nav.next"),
    ];
    assert!(engine.run(&step, &ctx, ErrorPolicy::Stop).await.is_empty());
    assert_eq!(controller.position(), 1);

    // The next render moves Start behind an extra group; the old element ids are stale.
    let rerendered =
        FLOWCHART_SVG.replacen(r#"<g class="nodes">"#, r#"<g class="nodes"><g class="spacer"/>"#, 1);
    diagram.replace_svg(&rerendered).expect("re-render");

    let step = [
        ActionDefinition::bare("style.clear"),
        ActionDefinition::new("camera.fit", json!({ "target": "Start" })),
    ];
    assert!(engine.run(&step, &ctx, ErrorPolicy::Stop).await.is_empty());

    let frames = camera.0.lock().expect("frames");
    assert_eq!(frames.len(), 2);
    assert_ne!(frames[0].element, frames[1].element);
    assert_eq!(frames[0].bounds, frames[1].bounds);

    let doc = diagram.document().read().expect("doc");
    let start = doc.get(frames[1].element).expect("start");
    assert_eq!(start.id(), Some("flowchart-Start-0"));
    assert!(!start.has_class(&config.highlight_class));
}

#[test]
fn global_registry_is_explicitly_initialized() {
    let registry = init_global_registry(&TidewalkConfig::default());
    assert!(Arc::ptr_eq(&registry, &global_registry()));
    assert!(registry.has(DiagramType::Sequence));
    assert!(registry.has_default());
}
