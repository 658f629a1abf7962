use serde::Serialize;
use serde_json::Value;
use sldkit::{AssembleOptions, Entity, ParseOptions, RuleData, StyleConfig, Transcoder};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Sld(sldkit::Error),
    Json(serde_json::Error),
    NotSld,
    UnknownLayer(String),
    InvalidNumber(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Sld(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NotSld => write!(f, "Input is not an editable SLD document"),
            CliError::UnknownLayer(layer) => write!(f, "No rules for layer {layer:?}"),
            CliError::InvalidNumber(raw) => write!(f, "Not a number: {raw:?}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<sldkit::Error> for CliError {
    fn from(value: sldkit::Error) -> Self {
        Self::Sld(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Parse,
    Assemble,
    Scales,
    Zoom,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    suppress_errors: bool,
    config: Option<String>,
    layer: Option<String>,
    out: Option<String>,
    preview_rule: Option<String>,
    preview_data: Option<String>,
}

#[derive(Serialize)]
struct ZoomOut {
    denominator: f64,
    zoom: Option<usize>,
}

fn usage() -> &'static str {
    "sldkit-cli\n\
\n\
USAGE:\n\
  sldkit-cli [parse] [--pretty] [--suppress-errors] [--config <json>] [<path>|-]\n\
  sldkit-cli assemble [--layer <key>] [--out <dir>] [--preview-rule <id> --preview-data <json>] [--pretty] [--config <json>] [<path>|-]\n\
  sldkit-cli scales [--pretty] [--config <json>]\n\
  sldkit-cli zoom [--config <json>] <denominator>\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - parse prints the editable entity list as JSON.\n\
  - assemble reads an entity list as JSON. With --layer it prints that layer's SLD document;\n\
    otherwise it prints a JSON object mapping layer keys to documents.\n\
  - assemble --out writes one <layer>.sld file per layer into <dir> and prints their paths.\n\
  - Log verbosity is read from SLDKIT_LOG (default: warn).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "assemble" => args.command = Command::Assemble,
            "scales" => args.command = Command::Scales,
            "zoom" => args.command = Command::Zoom,
            "--pretty" => args.pretty = true,
            "--suppress-errors" => args.suppress_errors = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--layer" => {
                let Some(layer) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.layer = Some(layer.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--preview-rule" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.preview_rule = Some(id.clone());
            }
            "--preview-data" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.preview_data = Some(path.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') && other.parse::<f64>().is_err() => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.preview_rule.is_some() != args.preview_data.is_some() {
        return Err(CliError::Usage(usage()));
    }
    if args.command == Command::Zoom && args.input.is_none() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_json_file(path: &str) -> Result<Value, CliError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn build_transcoder(args: &Args) -> Result<Transcoder, CliError> {
    let parse = if args.suppress_errors {
        ParseOptions::lenient()
    } else {
        ParseOptions::strict()
    };
    let mut transcoder = Transcoder::new().with_parse_options(parse);
    if let Some(path) = args.config.as_deref() {
        transcoder = transcoder.with_config(StyleConfig::from_value(read_json_file(path)?));
    }
    Ok(transcoder)
}

fn write_layer_files(
    out_dir: &Path,
    documents: &indexmap::IndexMap<String, String>,
) -> Result<Vec<PathBuf>, CliError> {
    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(documents.len());
    for (layer, xml) in documents {
        let path = out_dir.join(format!("{}.sld", sldkit::layer_file_stem(layer)));
        std::fs::write(&path, xml)?;
        tracing::debug!(layer = layer.as_str(), path = %path.display(), "layer document written");
        written.push(path);
    }
    Ok(written)
}

fn run_parse(args: &Args, transcoder: &Transcoder) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let Some(entities) = transcoder.parse(&text)? else {
        return Err(CliError::NotSld);
    };
    write_json(&entities, args.pretty)
}

fn run_assemble(args: &Args, transcoder: &Transcoder) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let entities: Vec<Entity> = transcoder
        .engine
        .entities_from_json(serde_json::from_str(&text)?)?;

    let preview_data: Option<RuleData> = match args.preview_data.as_deref() {
        Some(path) => Some(serde_json::from_value(read_json_file(path)?)?),
        None => None,
    };
    let mut options = AssembleOptions::default();
    if let Some(layer) = args.layer.as_deref() {
        options = options.layer(layer);
    }
    if let (Some(rule_id), Some(data)) = (args.preview_rule.as_deref(), preview_data.as_ref()) {
        options = options.preview(rule_id, data);
    }

    let documents = transcoder.engine.assemble_document(&entities, &options);
    if let Some(layer) = args.layer.as_deref() {
        if documents.is_empty() {
            return Err(CliError::UnknownLayer(layer.to_string()));
        }
    }

    if let Some(out_dir) = args.out.as_deref() {
        for path in write_layer_files(Path::new(out_dir), &documents)? {
            println!("{}", path.display());
        }
        return Ok(());
    }

    match args.layer.as_deref() {
        Some(layer) => {
            if let Some(xml) = documents.get(layer) {
                println!("{xml}");
            }
            Ok(())
        }
        None => write_json(&documents, args.pretty),
    }
}

fn run_zoom(args: &Args, transcoder: &Transcoder) -> Result<(), CliError> {
    let raw = args.input.as_deref().unwrap_or_default();
    let denominator = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CliError::InvalidNumber(raw.to_string()))?;
    let zoom = transcoder.engine.scale_table().nearest(denominator);
    write_json(&ZoomOut { denominator, zoom }, args.pretty)
}

fn run(args: Args) -> Result<(), CliError> {
    let transcoder = build_transcoder(&args)?;
    match args.command {
        Command::Parse => run_parse(&args, &transcoder),
        Command::Assemble => run_assemble(&args, &transcoder),
        Command::Scales => write_json(
            &transcoder.engine.scale_table().denominators(),
            args.pretty,
        ),
        Command::Zoom => run_zoom(&args, &transcoder),
    }
}

fn init_tracing() {
    let env_filter = std::env::var("SLDKIT_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter.as_str())
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::NotSld) => {
            eprintln!("{}", CliError::NotSld);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
