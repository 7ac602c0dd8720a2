use std::io::Read;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use dfdraw::dfd::{Canvas, Edit, EntityKind, RenderReport, Summary, Workspace, parse_flow};
use dfdraw::export::{FontSources, OutputFormat, svg_to_pdf, svg_to_png};
use dfdraw::fonts::{ApproxMeasure, CosmicTextMeasure, TextMeasure};
use dfdraw::theme::DiagramTheme;

/// Render a Data Flow Diagram described in JSON to SVG, PNG or PDF
#[derive(Parser, Debug)]
#[command(name = "dfdraw")]
#[command(version)]
#[command(about = "Render Data Flow Diagrams from JSON to SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Input JSON file with a "DFD features" object (use "-" for stdin)
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Theme file (TOML or YAML) or built-in theme name
    #[arg(short, long, value_name = "THEME")]
    theme: Option<String>,

    /// Canvas width, overrides the theme
    #[arg(long)]
    width: Option<f32>,

    /// Canvas height, overrides the theme
    #[arg(long)]
    height: Option<f32>,

    /// Raster scale multiplier for PNG output (e.g. 2.0 for sharper output)
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Wrap labels with a fixed per-character width instead of system fonts
    #[arg(long)]
    approx_text: bool,

    /// Add an external entity (repeatable)
    #[arg(long, value_name = "NAME")]
    add_entity: Vec<String>,

    /// Add a process (repeatable)
    #[arg(long, value_name = "NAME")]
    add_process: Vec<String>,

    /// Add a data store (repeatable)
    #[arg(long, value_name = "NAME")]
    add_store: Vec<String>,

    /// Add a data flow written as "Source → Process → Target" (repeatable)
    #[arg(long, value_name = "FLOW")]
    add_flow: Vec<String>,

    /// Remove an element and its flows, written as KIND:NAME (repeatable)
    #[arg(long, value_name = "KIND:NAME")]
    remove: Vec<String>,

    /// Remove the data flow at a zero-based index, counted before any flow is removed
    #[arg(long, value_name = "INDEX")]
    remove_flow: Vec<usize>,

    /// Print the edited model as JSON to stdout
    #[arg(long)]
    dump_model: bool,

    /// Print element counts to stdout
    #[arg(long)]
    summary: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "dfdraw", &mut std::io::stdout());
        return Ok(());
    }

    let input = args.input.as_ref().ok_or("No input file given")?;
    let source = if input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        buffer
    } else {
        std::fs::read_to_string(input).map_err(|e| format!("Failed to read input file: {}", e))?
    };

    let mut theme = match args.theme.as_deref() {
        Some(name) => DiagramTheme::load(name).map_err(|e| e.to_string())?,
        None => DiagramTheme::default(),
    };
    if let Some(width) = args.width {
        theme.canvas_width = width;
    }
    if let Some(height) = args.height {
        theme.canvas_height = height;
    }
    if !(theme.canvas_width > 0.0 && theme.canvas_height > 0.0) {
        return Err(format!(
            "Invalid canvas size {}x{}",
            theme.canvas_width, theme.canvas_height
        ));
    }

    let mut workspace = Workspace::new();
    for warning in workspace.load(&source)? {
        log::warn!("{}", warning);
    }
    if workspace.model().is_none() {
        return Err("Input is empty".to_string());
    }

    for edit in collect_edits(&args)? {
        if !workspace.apply(&edit) {
            log::warn!("Edit had no effect: {:?}", edit);
        }
    }

    if args.summary
        && let Some(model) = workspace.model()
    {
        println!("{}", Summary::of(model));
    }
    if args.dump_model
        && let Some(model) = workspace.model()
    {
        let json = serde_json::to_string_pretty(model)
            .map_err(|e| format!("Failed to serialize model: {}", e))?;
        println!("{}", json);
    }

    let Some(output) = args.output.as_ref() else {
        if args.summary || args.dump_model {
            return Ok(());
        }
        return Err("No output file given (use -o)".to_string());
    };
    let format = OutputFormat::from_path(output)?;

    let (svg, report) = if args.approx_text {
        render_svg(&workspace, &theme, ApproxMeasure::default())?
    } else {
        render_svg(
            &workspace,
            &theme,
            CosmicTextMeasure::new().with_family(&theme.font_family),
        )?
    };
    for warning in &report.warnings {
        log::warn!("{}", warning);
    }

    let fonts = FontSources::system_and_local();
    match format {
        OutputFormat::Svg => {
            std::fs::write(output, &svg).map_err(|e| format!("Failed to write SVG: {}", e))?;
            eprintln!("SVG saved to: {}", output.display());
        }
        OutputFormat::Png => {
            let png = svg_to_png(&svg, args.png_scale, &fonts).map_err(|e| e.to_string())?;
            std::fs::write(output, png).map_err(|e| format!("Failed to write PNG: {}", e))?;
            eprintln!("PNG saved to: {}", output.display());
        }
        OutputFormat::Pdf => {
            let pdf = svg_to_pdf(&svg, &fonts).map_err(|e| e.to_string())?;
            std::fs::write(output, pdf).map_err(|e| format!("Failed to write PDF: {}", e))?;
            eprintln!("PDF saved to: {}", output.display());
        }
    }

    Ok(())
}

fn render_svg<M: TextMeasure>(
    workspace: &Workspace,
    theme: &DiagramTheme,
    measure: M,
) -> Result<(String, RenderReport), String> {
    let mut canvas = Canvas::new(theme.canvas_width, theme.canvas_height, measure)
        .with_background(&theme.background_color)
        .with_font_family(&theme.font_family);
    let report = workspace
        .render(&mut canvas, theme)
        .ok_or("Nothing to render")?;
    Ok((canvas.to_svg(), report))
}

/// Adds first, then removals, then flow removals by index.
fn collect_edits(args: &Args) -> Result<Vec<Edit>, String> {
    let mut edits = Vec::new();

    let additions = [
        (EntityKind::Entity, &args.add_entity),
        (EntityKind::Process, &args.add_process),
        (EntityKind::Store, &args.add_store),
    ];
    for (kind, names) in additions {
        edits.extend(names.iter().map(|name| Edit::AddElement {
            kind,
            name: name.clone(),
        }));
    }

    for text in &args.add_flow {
        let flow = parse_flow(text)
            .ok_or_else(|| format!("Invalid flow '{}', expected 'Source → Process → Target'", text))?;
        edits.push(Edit::AddFlow {
            source: flow.source,
            process: flow.process,
            target: flow.target,
        });
    }

    for entry in &args.remove {
        let (kind, name) = entry
            .split_once(':')
            .ok_or_else(|| format!("Invalid --remove '{}', expected KIND:NAME", entry))?;
        edits.push(Edit::RemoveElement {
            kind: kind.parse()?,
            name: name.trim().to_string(),
        });
    }

    // Highest index first so every index refers to the list before removal.
    let mut flow_indices = args.remove_flow.clone();
    flow_indices.sort_unstable_by(|a, b| b.cmp(a));
    flow_indices.dedup();
    edits.extend(flow_indices.into_iter().map(|index| Edit::RemoveFlow { index }));

    Ok(edits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(flags: &[&str]) -> Args {
        let mut argv = vec!["dfdraw", "in.json"];
        argv.extend_from_slice(flags);
        Args::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn flow_removals_use_original_indices() {
        let edits = collect_edits(&args(&[
            "--remove-flow",
            "0",
            "--remove-flow",
            "1",
            "--remove-flow",
            "1",
        ]))
        .unwrap();
        assert_eq!(
            edits,
            vec![Edit::RemoveFlow { index: 1 }, Edit::RemoveFlow { index: 0 }]
        );
    }

    #[test]
    fn flow_removals_drop_the_listed_flows() {
        let mut workspace = Workspace::new();
        workspace
            .load(
                r#"{"DFD features": {"data_flows": [
                    "1. A → P → S",
                    "2. S → P → A",
                    "3. A → P → A"
                ]}}"#,
            )
            .unwrap();

        for edit in collect_edits(&args(&["--remove-flow", "0", "--remove-flow", "1"])).unwrap() {
            assert!(workspace.apply(&edit));
        }

        let flows = &workspace.model().unwrap().data_flows;
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].to_string(), "A → P → A");
    }

    #[test]
    fn edits_are_ordered_adds_then_removals() {
        let edits = collect_edits(&args(&[
            "--remove-flow",
            "2",
            "--remove",
            "store: Logs",
            "--add-flow",
            "User → Login → Sessions",
            "--add-entity",
            "User",
        ]))
        .unwrap();
        assert_eq!(
            edits,
            vec![
                Edit::AddElement {
                    kind: EntityKind::Entity,
                    name: "User".to_string(),
                },
                Edit::AddFlow {
                    source: "User".to_string(),
                    process: "Login".to_string(),
                    target: "Sessions".to_string(),
                },
                Edit::RemoveElement {
                    kind: EntityKind::Store,
                    name: "Logs".to_string(),
                },
                Edit::RemoveFlow { index: 2 },
            ]
        );
    }

    #[test]
    fn remove_needs_kind_and_name() {
        let err = collect_edits(&args(&["--remove", "Logs"])).unwrap_err();
        assert!(err.contains("KIND:NAME"), "got {err}");

        let err = collect_edits(&args(&["--remove", "actor:Logs"])).unwrap_err();
        assert!(err.contains("Unknown element kind"), "got {err}");
    }

    #[test]
    fn add_flow_without_arrows_is_rejected() {
        let err = collect_edits(&args(&["--add-flow", "User - Database"])).unwrap_err();
        assert!(err.starts_with("Invalid flow"), "got {err}");
    }

    #[test]
    fn no_edit_flags_yield_no_edits() {
        assert!(collect_edits(&args(&[])).unwrap().is_empty());
    }
}
