use crate::cli::ModeArg;
use crate::support::{
    ERROR_VERDICT_EXIT, load_config_or_exit, load_fixture_or_exit, print_json_or_exit,
};
use marquee_kernel::{BoundaryOptions, evaluate_or_throw};
use marquee_ux::{DirectiveView, ErrorBoundary, JsonFallback, QueryBoundary};
use std::process;

pub struct Args {
    pub fixture: String,
    pub mode: Option<ModeArg>,
    /// Command-line override of `[boundary] loader_on_fetch`.
    pub loader_on_fetch: Option<bool>,
    pub config: Option<String>,
    pub json: bool,
}

pub fn run(args: Args) {
    let config = load_config_or_exit(args.config.as_deref());
    let fixture = load_fixture_or_exit(&args.fixture);
    let defs = fixture.definitions();

    let mode = args.mode.unwrap_or(config.eval.mode);
    let options = BoundaryOptions {
        loader_on_fetch: args
            .loader_on_fetch
            .unwrap_or(config.boundary.loader_on_fetch),
    };

    let view = match mode {
        ModeArg::Render => QueryBoundary::new(options)
            .render(&defs, &JsonFallback, |record| DirectiveView::valid(&record)),
        ModeArg::Throw => ErrorBoundary::catch(&JsonFallback, || {
            evaluate_or_throw(&defs)
                .map(|loaded| loaded.map(|record| DirectiveView::valid(&record)))
        }),
    };
    tracing::info!(
        mode = mode.as_str(),
        queries = defs.len(),
        verdict = view.kind(),
        "evaluated fixture"
    );

    if args.json {
        print_json_or_exit(&view);
    } else {
        println!("marquee eval ({})", mode.as_str());
        println!("  Verdict: {}", view.kind());
        match &view {
            DirectiveView::Loading => {}
            DirectiveView::Error { error } => {
                println!("  Message: {}", error.message);
                for issue in &error.issues {
                    println!("  Issue: {issue}");
                }
            }
            DirectiveView::Valid { data, opaque } => {
                let keys: Vec<&str> = data.keys().map(String::as_str).collect();
                println!(
                    "  Keys: {}",
                    if keys.is_empty() {
                        "(none)".to_string()
                    } else {
                        keys.join(", ")
                    }
                );
                if !opaque.is_empty() {
                    println!("  Opaque: {}", opaque.join(", "));
                }
            }
        }
    }

    if matches!(view, DirectiveView::Error { .. }) {
        process::exit(ERROR_VERDICT_EXIT);
    }
}
