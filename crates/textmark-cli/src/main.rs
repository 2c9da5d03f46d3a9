use anyhow::{Context, Result};
use crossterm::style::{Color, Stylize};
use std::{env, fs, path::PathBuf, process};
use textmark_config::Config;
use textmark_engine::{
    Annotator, ContentTree, Granularity, InMemoryRegionStore, Label, LabelState, NodeKind,
    RawSelection, resolve_offset, tree::html::to_html,
};

struct Args {
    task_path: Option<PathBuf>,
    selections: Vec<(usize, usize)>,
    granularity: Option<Granularity>,
    html: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("Error: {message}");
            usage();
            process::exit(1);
        }
    };

    // Determine the task path from CLI args or config file
    let mut config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    if let Some(granularity) = args.granularity {
        config.settings.granularity = granularity;
    }

    let task_path = match args.task_path.or(config.task_path.clone()) {
        Some(path) => path,
        None => {
            eprintln!("Error: No task file provided and none configured");
            usage();
            eprintln!("Or set task_path in {}", Config::config_path().display());
            process::exit(1);
        }
    };

    let task_json = fs::read_to_string(&task_path)
        .with_context(|| format!("reading task file {}", task_path.display()))?;

    let mut annotator = Annotator::from_task_json(
        &task_json,
        &config.source,
        config.settings.clone(),
        InMemoryRegionStore::new(),
    )
    .with_context(|| format!("resolving text value from {}", task_path.display()))?;

    annotator.set_active_states(vec![LabelState::Labels {
        from_name: "highlight".to_string(),
        selected: vec![Label::new("highlight", "#ffff66")],
    }]);

    // Create a region per requested selection
    let mut tree = annotator.render();
    for &(start, end) in &args.selections {
        let (Ok(from), Ok(to)) = (resolve_offset(&tree, start), resolve_offset(&tree, end))
        else {
            log::warn!(
                "selection {start}..{end} is outside the text (length {}); skipping",
                annotator.text().len()
            );
            continue;
        };
        let mut selection = RawSelection::single(from, to);
        annotator.capture(&mut tree, &mut selection);
    }

    // Re-render from scratch and materialize from stored offsets alone,
    // the way a host would after any content update.
    let mut fresh = annotator.render();
    annotator.rematerialize(&mut fresh);

    if args.html {
        println!("{}", to_html(&fresh));
    } else {
        print_annotated(&fresh);
    }

    let serialized = annotator.serialize(&fresh);
    if !serialized.is_empty() {
        println!();
        println!("{}", serde_json::to_string_pretty(&serialized)?);
    }

    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> std::result::Result<Args, String> {
    let mut parsed = Args {
        task_path: None,
        selections: Vec::new(),
        granularity: None,
        html: false,
    };

    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--select" => {
                let value = args.next().ok_or("--select needs a START..END value")?;
                parsed.selections.push(parse_span(&value)?);
            }
            "--granularity" => {
                let value = args.next().ok_or("--granularity needs a value")?;
                parsed.granularity = Some(match value.as_str() {
                    "symbol" => Granularity::Symbol,
                    "word" => Granularity::Word,
                    "sentence" => Granularity::Sentence,
                    "paragraph" => Granularity::Paragraph,
                    other => return Err(format!("unknown granularity `{other}`")),
                });
            }
            "--html" => parsed.html = true,
            other if other.starts_with("--") => {
                return Err(format!("unknown option `{other}`"));
            }
            _ => {
                if parsed.task_path.is_some() {
                    return Err("more than one task file given".to_string());
                }
                parsed.task_path = Some(PathBuf::from(arg));
            }
        }
    }
    Ok(parsed)
}

fn parse_span(value: &str) -> std::result::Result<(usize, usize), String> {
    let (start, end) = value
        .split_once("..")
        .ok_or_else(|| format!("`{value}` is not a START..END span"))?;
    let start = start
        .parse()
        .map_err(|_| format!("`{start}` is not an offset"))?;
    let end = end.parse().map_err(|_| format!("`{end}` is not an offset"))?;
    if start > end {
        return Err(format!("span `{value}` is backwards"));
    }
    Ok((start, end))
}

fn usage() {
    eprintln!(
        "Usage: textmark-cli [task.json] [--select START..END]... [--granularity symbol|word] [--html]"
    );
}

/// Prints the annotated text with marker content styled on its region
/// color.
fn print_annotated(tree: &ContentTree) {
    for node in tree.walk() {
        match tree.kind(node) {
            NodeKind::Text(text) => {
                if let Some(color) = marker_color(tree, node) {
                    print!("{}", text.clone().with(Color::Black).on(color));
                } else {
                    print!("{text}");
                }
            }
            NodeKind::LineBreak => println!(),
            NodeKind::Block | NodeKind::Marker { .. } => {}
        }
    }
    println!();
}

/// The background color of the innermost marker above `node`, if any.
fn marker_color(tree: &ContentTree, node: textmark_engine::NodeId) -> Option<Color> {
    let mut cursor = Some(node);
    while let Some(id) = cursor {
        if let NodeKind::Marker { colors, .. } = tree.kind(id) {
            return Some(
                colors
                    .first()
                    .and_then(|hex| parse_hex_color(hex))
                    .unwrap_or(Color::Yellow),
            );
        }
        cursor = tree.parent(id);
    }
    None
}

/// Parses `#rrggbb` into an RGB color.
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb { r, g, b })
}
