//! netform CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use netform_debug::{Tracer, TracerConfig};
use netform_engine::{MatchStrategy, TransformRegistry, TransformerConfig};
use netform_runtime::{Session, load_from_file, save_to_file};

/// CLI configuration parsed from arguments.
#[derive(Debug, Default)]
struct CliConfig {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    transforms: Vec<String>,
    strategy: Option<MatchStrategy>,
    max_expansions: Option<usize>,
    show_help: bool,
    show_version: bool,
    list: bool,
    // Debug flags
    trace: bool,
    json: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

/// Returns the value following the option at `*i`, advancing past it.
fn option_value<'a>(args: &'a [String], i: &mut usize, name: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{name} requires a value"))
}

fn parse_args(args: &[String]) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--list" => config.list = true,
            "--trace" => config.trace = true,
            "--json" => config.json = true,
            "-t" | "--transform" => {
                let key = option_value(args, &mut i, "--transform")?;
                config.transforms.push(key.to_string());
            }
            "-o" | "--output" => {
                let path = option_value(args, &mut i, "--output")?;
                config.output = Some(PathBuf::from(path));
            }
            "--strategy" => {
                let name = option_value(args, &mut i, "--strategy")?;
                config.strategy = Some(name.parse()?);
            }
            "--max-expansions" => {
                let value = option_value(args, &mut i, "--max-expansions")?;
                config.max_expansions = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid --max-expansions value: {value}"))?,
                );
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => {
                if config.input.is_some() {
                    return Err(format!("unexpected argument: {path}").into());
                }
                config.input = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(&args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("netform {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if config.list {
        for key in TransformRegistry::with_builtins().keys() {
            println!("{key}");
        }
        return Ok(());
    }

    let Some(input) = &config.input else {
        return Err("missing <INPUT>; see --help".into());
    };

    let mut transformer_config = TransformerConfig::new();
    if let Some(strategy) = config.strategy {
        transformer_config = transformer_config.with_strategy(strategy);
    }
    if let Some(limit) = config.max_expansions {
        transformer_config = transformer_config.with_max_expansions(limit);
    }

    let tracer = if config.trace {
        let mut tracer_config = TracerConfig::new().enabled().to_stderr();
        if config.json {
            tracer_config = tracer_config.json();
        }
        Tracer::new(tracer_config)
    } else {
        Tracer::disabled()
    };

    let net = load_from_file(input)?;
    println!(
        "\x1b[1m{}\x1b[0m: {} ops",
        if net.name.is_empty() { "<unnamed>" } else { net.name.as_str() },
        net.ops.len()
    );

    let mut session = Session::new(net)
        .with_config(transformer_config)
        .with_tracer(tracer);
    for key in &config.transforms {
        let summary = session.apply(key)?;
        println!("  {summary}");
    }

    if let Some(output) = &config.output {
        save_to_file(session.net(), output)?;
        println!("Wrote {}", output.display());
    }

    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mnetform\x1b[0m - Rule-driven subgraph rewriting for operator networks

\x1b[1mUSAGE:\x1b[0m
    netform [OPTIONS] <INPUT>

\x1b[1mARGUMENTS:\x1b[0m
    <INPUT>    Network description (MessagePack)

\x1b[1mOPTIONS:\x1b[0m
    -t, --transform KEY    Apply a transform (repeatable, applied in order)
    -o, --output PATH      Write the transformed network
    --strategy NAME        Override match strategy (connected, ordered, unrestricted)
    --max-expansions N     Abort a search after N expansions
    --list                 List available transforms
    -h, --help             Print help information
    -V, --version          Print version information

\x1b[1mDEBUG OPTIONS:\x1b[0m
    --trace                Print pass events to stderr
    --json                 Print trace events as JSON

\x1b[1mEXAMPLES:\x1b[0m
    netform --list
    netform -t fuse_conv_relu net.msgpack
    netform -t fuse_conv_relu -t fuse_fc_relu -o out.msgpack net.msgpack
    netform --trace --strategy connected -t fuse_conv_relu net.msgpack"
    );
}
