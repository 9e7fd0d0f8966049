use std::io::{self, Read, Write};

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tmplparse::visit::collect_spans;
use tmplparse::{Config, ParseOptions, Registry, Tree};

/// Main entry point for the tmplparse command-line tool.
///
/// Parses one template file (or stdin) and prints the span of every node,
/// indented by depth, or the full trees as JSON with `--json`.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let matches = cli().get_matches();

    let options = match build_options(&matches) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let (name, source) = match read_source(&matches) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error reading template: {e}");
            std::process::exit(1);
        }
    };

    let mut registry = Registry::new();
    if let Err(e) = registry.parse(&name, &source, &options) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    debug!("parsed {} templates", registry.len());

    if let Err(e) = print_registry(&registry, &matches) {
        eprintln!("Error writing output: {e}");
        std::process::exit(1);
    }
}

fn cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Parse text templates and report the source span of every node")
        .arg(
            Arg::new("file")
                .help("Template file to parse (reads stdin when omitted)")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .help("Template name (defaults to the file name, or \"stdin\")")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("left-delim")
                .long("left-delim")
                .help("Left action delimiter")
                .value_name("DELIM"),
        )
        .arg(
            Arg::new("right-delim")
                .long("right-delim")
                .help("Right action delimiter")
                .value_name("DELIM"),
        )
        .arg(
            Arg::new("function")
                .short('f')
                .long("function")
                .help("Declare a function name (repeatable)")
                .value_name("NAME")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("builtins")
                .long("builtins")
                .help("Declare the standard builtin functions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("skip-func-check")
                .long("skip-func-check")
                .help("Accept any identifier as a function")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-comments")
                .long("no-comments")
                .help("Drop comments instead of keeping them as nodes")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("template")
                .long("template")
                .help("Only print the named template")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print trees as JSON")
                .action(ArgAction::SetTrue),
        )
}

/// Config file first, then command-line flags on top.
fn build_options(matches: &ArgMatches) -> Result<ParseOptions, tmplparse::ConfigError> {
    let mut options = match matches.get_one::<String>("config") {
        Some(path) => Config::load(path)?.to_options(),
        None => ParseOptions::new(),
    };
    if let Some(left) = matches.get_one::<String>("left-delim") {
        options.left_delim = left.clone();
    }
    if let Some(right) = matches.get_one::<String>("right-delim") {
        options.right_delim = right.clone();
    }
    if let Some(functions) = matches.get_many::<String>("function") {
        options = options.with_functions(functions.cloned());
    }
    if matches.get_flag("builtins") {
        options = options.with_builtins();
    }
    if matches.get_flag("skip-func-check") {
        options = options.skip_func_check(true);
    }
    if matches.get_flag("no-comments") {
        options = options.parse_comments(false);
    }
    Ok(options)
}

fn read_source(matches: &ArgMatches) -> io::Result<(String, String)> {
    let explicit = matches.get_one::<String>("name").cloned();
    match matches.get_one::<String>("file") {
        Some(path) => {
            let source = std::fs::read_to_string(path)?;
            let name = explicit.unwrap_or_else(|| {
                std::path::Path::new(path)
                    .file_name()
                    .map_or_else(|| path.clone(), |n| n.to_string_lossy().into_owned())
            });
            Ok((name, source))
        }
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok((explicit.unwrap_or_else(|| "stdin".to_string()), source))
        }
    }
}

fn print_registry(registry: &Registry, matches: &ArgMatches) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(name) = matches.get_one::<String>("template") {
        let Some(tree) = registry.get(name) else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no template named {name:?}"),
            ));
        };
        if matches.get_flag("json") {
            serde_json::to_writer_pretty(&mut out, &**tree)?;
            return writeln!(out);
        }
        return print_spans(&mut out, tree);
    }

    if matches.get_flag("json") {
        serde_json::to_writer_pretty(&mut out, registry)?;
        return writeln!(out);
    }
    for name in registry.names() {
        if let Some(tree) = registry.get(name) {
            print_spans(&mut out, tree)?;
        }
    }
    Ok(())
}

fn print_spans(out: &mut impl Write, tree: &Tree) -> io::Result<()> {
    writeln!(out, "{}:", tree.name())?;
    for span in collect_spans(tree) {
        let text = tree.text(span.location).unwrap_or_default();
        writeln!(
            out,
            "{:indent$}{} {} {:?}",
            "",
            span.kind,
            span.location,
            abbreviate(text),
            indent = 2 * (span.depth + 1)
        )?;
    }
    Ok(())
}

fn abbreviate(text: &str) -> String {
    const LIMIT: usize = 40;
    match text.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
