//! Command-line interface for the Coco/R grammar tools
//!
//! Usage:
//!   coco complete `<path>` --line `<n>` --column `<n>`   - Legal constructs and candidates at a position
//!   coco symbols `<path>`                               - Declared and referenced symbols
//!   coco remap `<generated>` `<line>` `<column>`          - Grammar position for a generated-file position
//!   coco remap-log `<compiler-output>` [--base-dir `<dir>`] - Remap every diagnostic of a build log
//!   coco generator-log `<generator-output>`               - Grammar errors printed by the generator
//!   coco map `<map-file>`                               - Dump a position map
//!
//! Every command prints JSON. `--config <file>` layers a TOML file over the built-in defaults.
//! Positions are 1-based, columns count bytes.

mod report;

use clap::{value_parser, Arg, ArgMatches, Command};
use coco_analysis::completion::completion_items;
use coco_analysis::diagnostics::{parse_compiler_output, parse_generator_output};
use coco_analysis::remap::DiagnosticRemapper;
use coco_analysis::CompletionEngine;
use coco_config::{CocoConfig, Loader};
use coco_parser::coco::mapping::PositionMap;
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn build_cli() -> Command {
    let path_arg = |help: &'static str| Arg::new("path").help(help).required(true).index(1);
    let position_arg = |name: &'static str, index: usize| {
        Arg::new(name)
            .help(format!("1-based {name}"))
            .required(true)
            .index(index)
            .value_parser(value_parser!(usize))
    };

    Command::new("coco")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Completion, symbols and diagnostic remapping for Coco/R grammars")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the default configuration"),
        )
        .subcommand(
            Command::new("complete")
                .about("Print the constructs legal at a position and the matching candidates")
                .arg(path_arg("Path to the grammar file"))
                .arg(
                    Arg::new("line")
                        .long("line")
                        .short('l')
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("1-based line of the cursor"),
                )
                .arg(
                    Arg::new("column")
                        .long("column")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("1-based byte column of the cursor"),
                ),
        )
        .subcommand(
            Command::new("symbols")
                .about("Print declarations, references and syntax errors of a grammar")
                .arg(path_arg("Path to the grammar file")),
        )
        .subcommand(
            Command::new("remap")
                .about("Map a position in a generated file back to the grammar")
                .arg(path_arg("Path to the generated file"))
                .arg(position_arg("line", 2))
                .arg(position_arg("column", 3)),
        )
        .subcommand(
            Command::new("remap-log")
                .about("Remap every compiler diagnostic found in a build log")
                .arg(path_arg("Path to the captured compiler output"))
                .arg(
                    Arg::new("base-dir")
                        .long("base-dir")
                        .help("Directory relative file names in the log are resolved against (default: the log's directory)"),
                ),
        )
        .subcommand(
            Command::new("generator-log")
                .about("Collect the grammar errors reported in captured generator output")
                .arg(path_arg("Path to the captured generator output")),
        )
        .subcommand(
            Command::new("map")
                .about("Print the runs stored in a position map file")
                .arg(path_arg("Path to the map file")),
        )
}

fn main() {
    let matches = build_cli().get_matches();
    let Some((name, sub)) = matches.subcommand() else {
        unreachable!("a subcommand is required");
    };
    // `--config` is global and may appear on either side of the subcommand
    let config_path = sub
        .get_one::<String>("config")
        .or_else(|| matches.get_one::<String>("config"));
    let config = load_config(config_path);
    init_logging(&config.logging.level);

    match name {
        "complete" => handle_complete_command(sub, &config),
        "symbols" => handle_symbols_command(sub),
        "remap" => handle_remap_command(sub, &config),
        "remap-log" => handle_remap_log_command(sub, &config),
        "generator-log" => handle_generator_log_command(sub),
        "map" => handle_map_command(sub),
        _ => unreachable!("unknown subcommand {name}"),
    }
}

fn load_config(path: Option<&String>) -> CocoConfig {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    loader
        .build()
        .unwrap_or_else(|e| fail(format!("Error loading configuration: {e}")))
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(message: impl Display) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(format!("Error reading file '{path}': {e}")))
}

fn print_json<T: Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| fail(format!("Error serializing output: {e}")));
    println!("{json}");
}

fn path_of(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("path")
        .expect("path is a required argument")
}

fn position_of(matches: &ArgMatches) -> (usize, usize) {
    let line = *matches.get_one::<usize>("line").expect("line is required");
    let column = *matches.get_one::<usize>("column").expect("column is required");
    (line, column)
}

fn handle_complete_command(matches: &ArgMatches, config: &CocoConfig) {
    let path = path_of(matches);
    let (line, column) = position_of(matches);
    let source = read_file(path);
    let snapshot = CompletionEngine::new().request_completion(&source, line, column, path);
    let candidates = completion_items(&snapshot, &config.completion);
    print_json(&report::completion(&snapshot, &candidates));
}

fn handle_symbols_command(matches: &ArgMatches) {
    let path = path_of(matches);
    let source = read_file(path);
    let snapshot = CompletionEngine::new().request_symbols(&source, path);
    print_json(&snapshot);
}

fn handle_remap_command(matches: &ArgMatches, config: &CocoConfig) {
    let path = path_of(matches);
    let (line, column) = position_of(matches);
    let remapper = DiagnosticRemapper::new(config.remap.clone());
    let location = remapper
        .remap(Path::new(path), line, column)
        .unwrap_or_else(|e| fail(format!("Error remapping '{path}': {e}")));
    print_json(&location);
}

fn handle_remap_log_command(matches: &ArgMatches, config: &CocoConfig) {
    let path = path_of(matches);
    let base_dir = match matches.get_one::<String>("base-dir") {
        Some(dir) => PathBuf::from(dir),
        None => Path::new(path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let diagnostics = parse_compiler_output(&read_file(path));
    let remapper = DiagnosticRemapper::new(config.remap.clone());
    print_json(&remapper.remap_diagnostics(diagnostics, &base_dir));
}

fn handle_generator_log_command(matches: &ArgMatches) {
    let path = path_of(matches);
    print_json(&parse_generator_output(&read_file(path)));
}

fn handle_map_command(matches: &ArgMatches) {
    let path = path_of(matches);
    let map = PositionMap::read_from(path)
        .unwrap_or_else(|e| fail(format!("Error reading map '{path}': {e}")));
    print_json(&map);
}
