// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tidewalk CLI entrypoint.
//!
//! Inspects how walkthrough targets map onto a rendered diagram, and dry-runs step actions
//! against collaborators that only log what they are asked to do.

use std::error::Error;
use std::fmt::Write as _;
use std::fs;

use tidewalk::actions::{ActionContext, StepActionEngine};
use tidewalk::config::TidewalkConfig;
use tidewalk::detect::detect_diagram_type;
use tidewalk::dom::{Document, ElementId};
use tidewalk::handle::logging::{LoggingCamera, LoggingController, LoggingOverlay};
use tidewalk::handle::{DiagramHandle, RenderedDiagram};
use tidewalk::model::{ActionDefinition, ErrorPolicy, TargetDescriptor};
use tidewalk::resolve::TargetResolver;
use tidewalk::strategy::{global_registry, init_global_registry};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file.json>] [--log <filter>] detect <source.mmd>\n  {program} [--config <file.json>] [--log <filter>] ids <source.mmd> <rendered.svg>\n  {program} [--config <file.json>] [--log <filter>] resolve <source.mmd> <rendered.svg> <target>\n  {program} [--config <file.json>] [--log <filter>] run <source.mmd> <rendered.svg> <steps.json> [--stop]\n  {program} schema\n\n<target> is `<kind>:<id>` with kind node, element or selector; a bare id is a node target.\n<steps.json> holds an array of `{{ \"name\": ..., \"payload\": {{ ... }} }}` actions.\n--stop aborts a run at the first failing action (default: continue and collect failures).\n--log takes a tracing filter such as `debug` or `tidewalk=trace` (default: RUST_LOG, then info)."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Detect { source: String },
    Ids { source: String, svg: String },
    Resolve { source: String, svg: String, target: String },
    Run { source: String, svg: String, steps: String },
    Schema,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    command: Command,
    config: Option<String>,
    log: Option<String>,
    stop: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut config = None;
    let mut log = None;
    let mut stop = false;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if config.is_some() {
                    return Err(());
                }
                config = Some(args.next().ok_or(())?);
            }
            "--log" => {
                if log.is_some() {
                    return Err(());
                }
                log = Some(args.next().ok_or(())?);
            }
            "--stop" => {
                if stop {
                    return Err(());
                }
                stop = true;
            }
            _ if arg.starts_with("--") => return Err(()),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let name = positional.next().ok_or(())?;
    let rest = positional.collect::<Vec<_>>();
    let command = match (name.as_str(), rest.as_slice()) {
        ("detect", [source]) => Command::Detect { source: source.clone() },
        ("ids", [source, svg]) => Command::Ids { source: source.clone(), svg: svg.clone() },
        ("resolve", [source, svg, target]) => {
            Command::Resolve { source: source.clone(), svg: svg.clone(), target: target.clone() }
        }
        ("run", [source, svg, steps]) => {
            Command::Run { source: source.clone(), svg: svg.clone(), steps: steps.clone() }
        }
        ("schema", []) => Command::Schema,
        _ => return Err(()),
    };

    if stop && !matches!(command, Command::Run { .. }) {
        return Err(());
    }

    Ok(CliOptions { command, config, log, stop })
}

fn load_diagram(source: &str, svg: &str) -> Result<RenderedDiagram, Box<dyn Error>> {
    let source_text = fs::read_to_string(source)?;
    let markup = fs::read_to_string(svg)?;
    Ok(RenderedDiagram::new(source_text, &markup)?)
}

fn describe(doc: &Document, element: ElementId) -> String {
    let Some(el) = doc.get(element) else {
        return format!("{element} <missing>");
    };
    let mut out = format!("{element} <{}", el.tag());
    if let Some(id) = el.id() {
        let _ = write!(out, " id=\"{id}\"");
    }
    if let Some(class) = el.attr("class").filter(|c| !c.trim().is_empty()) {
        let _ = write!(out, " class=\"{class}\"");
    }
    out.push('>');
    if let Some(bbox) = doc.bbox(element) {
        let _ = write!(
            out,
            " [{:.1},{:.1} {:.1}x{:.1}]",
            bbox.x, bbox.y, bbox.width, bbox.height
        );
    }
    out
}

fn print_schema() -> Result<(), Box<dyn Error>> {
    let schema = serde_json::json!({
        "config": TidewalkConfig::json_schema(),
        "action": schemars::schema_for!(ActionDefinition),
        "errorPolicy": schemars::schema_for!(ErrorPolicy),
    });
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn main() {
    let result = (|| -> Result<i32, Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "tidewalk".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if !tidewalk::telemetry::init_tracing(options.log.as_deref()) {
            if let Some(filter) = &options.log {
                return Err(format!("invalid --log filter `{filter}`").into());
            }
        }

        let config = match &options.config {
            Some(path) => TidewalkConfig::load(path)?,
            None => TidewalkConfig::default(),
        };
        init_global_registry(&config);
        let resolver = TargetResolver::new(global_registry());

        match options.command {
            Command::Schema => print_schema()?,
            Command::Detect { source } => {
                let text = fs::read_to_string(source)?;
                println!("{}", detect_diagram_type(&text));
            }
            Command::Ids { source, svg } => {
                let diagram = load_diagram(&source, &svg)?;
                let strategy = resolver.strategy_for(&diagram)?;
                let doc = diagram.document().read().map_err(|_| "document lock poisoned")?;
                let map = strategy.extract_node_ids(&doc);
                println!("# {} ({} targets)", diagram.diagram_type(), map.len());
                for (id, element) in map.iter() {
                    println!("{id}\t{}", describe(&doc, element));
                }
            }
            Command::Resolve { source, svg, target } => {
                let diagram = load_diagram(&source, &svg)?;
                let target = TargetDescriptor::parse(&target)?;
                let resolution = resolver.resolve(&diagram, &target)?;
                if resolution.is_empty() {
                    let hint = resolver
                        .closest_known_id(&diagram, target.id().as_str())
                        .map(|id| format!(" (did you mean `{id}`?)"))
                        .unwrap_or_default();
                    println!("{target}: unresolved{hint}");
                    return Ok(1);
                }
                let adjacent = resolver.adjacent(&diagram, &target)?;
                let doc = diagram.document().read().map_err(|_| "document lock poisoned")?;
                println!("{target} via {:?}", resolution.via());
                for element in resolution.elements() {
                    println!("  {}", describe(&doc, *element));
                }
                if !adjacent.is_empty() {
                    println!("adjacent:");
                    for element in adjacent {
                        println!("  {}", describe(&doc, element));
                    }
                }
            }
            Command::Run { source, svg, steps } => {
                let diagram = load_diagram(&source, &svg)?;
                let actions: Vec<ActionDefinition> =
                    serde_json::from_str(&fs::read_to_string(steps)?)?;
                let policy = if options.stop { ErrorPolicy::Stop } else { ErrorPolicy::Continue };

                let engine = StepActionEngine::with_default_handlers(resolver, &config);
                let camera = LoggingCamera;
                let overlay = LoggingOverlay;
                let controller = LoggingController::default();
                let ctx = ActionContext::new(&diagram, &controller)
                    .with_camera(&camera)
                    .with_overlay(&overlay);

                let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
                let failures = runtime.block_on(engine.run(&actions, &ctx, policy));
                diagram.destroy();

                if failures.is_empty() {
                    println!("{} actions ok", actions.len());
                } else {
                    for failure in &failures {
                        println!("{failure}");
                    }
                    return Ok(1);
                }
            }
        }
        Ok(0)
    })();

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions, Command};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_detect() {
        let options = parse(&["detect", "a.mmd"]).expect("parse options");
        assert_eq!(options.command, Command::Detect { source: "a.mmd".to_owned() });
        assert_eq!(options.config, None);
        assert!(!options.stop);
    }

    #[test]
    fn parses_global_flags_in_any_position() {
        let options = parse(&["resolve", "--log", "debug", "a.mmd", "a.svg", "node:A", "--config", "c.json"])
            .expect("parse options");
        assert_eq!(
            options.command,
            Command::Resolve {
                source: "a.mmd".to_owned(),
                svg: "a.svg".to_owned(),
                target: "node:A".to_owned()
            }
        );
        assert_eq!(options.log.as_deref(), Some("debug"));
        assert_eq!(options.config.as_deref(), Some("c.json"));
    }

    #[test]
    fn parses_run_with_stop() {
        let options = parse(&["run", "a.mmd", "a.svg", "steps.json", "--stop"]).expect("parse options");
        assert!(matches!(options.command, Command::Run { .. }));
        assert!(options.stop);
    }

    #[test]
    fn parses_schema() {
        assert_eq!(parse(&["schema"]).expect("parse options").command, Command::Schema);
    }

    #[test]
    fn rejects_stop_outside_run() {
        parse(&["ids", "a.mmd", "a.svg", "--stop"]).unwrap_err();
    }

    #[test]
    fn rejects_wrong_arity() {
        parse(&["detect"]).unwrap_err();
        parse(&["ids", "a.mmd"]).unwrap_err();
        parse(&["schema", "extra"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse(&["--nope", "schema"]).unwrap_err();
        parse(&["frobnicate"]).unwrap_err();
        parse(&[]).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse(&["--log", "info", "--log", "debug", "schema"]).unwrap_err();
        parse(&["run", "a", "b", "c", "--stop", "--stop"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_flag_value() {
        parse(&["schema", "--config"]).unwrap_err();
    }
}
