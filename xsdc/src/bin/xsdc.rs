//! xsdc CLI: compile an XML Schema and print the generated records.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use xsdc_schema::{CompiledSchema, FsResolver, SchemaParser, Severity};

#[derive(Parser)]
#[command(
    name = "xsdc",
    version,
    about = "Compile an XML Schema into record and enumeration definitions"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Accept <extension> and attributes on choice or simple-content types
    #[arg(long)]
    allow_unsupported: bool,

    /// Print the attributes of the top-level <schema> tag
    #[arg(long)]
    print_attributes: bool,

    /// Schema file (.xsd)
    schema: PathBuf,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

/// Compiles the schema named on the command line.
///
/// # Returns
/// `false` if the compile failed; the diagnostic has already been printed.
fn run(cli: &Cli) -> Result<bool> {
    let file = File::open(&cli.schema)
        .with_context(|| format!("cannot open {}", cli.schema.display()))?;
    let base = cli
        .schema
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let location = cli.schema.display().to_string();

    let mut parser = SchemaParser::new()
        .resolver(FsResolver::new(base))
        .allow_unsupported(cli.allow_unsupported || cfg!(feature = "allow-unsupported"));
    tracing::info!(schema = %location, "compiling");

    match parser.parse(&mut BufReader::new(file), &location) {
        Ok(compiled) => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            print_compiled(&mut out, &compiled, cli.print_attributes)
                .context("cannot write output")?;
            Ok(true)
        }
        Err(e) => {
            eprintln!("{}", e.info());
            Ok(false)
        }
    }
}

fn print_compiled(
    out: &mut impl Write,
    compiled: &CompiledSchema,
    print_attributes: bool,
) -> std::io::Result<()> {
    if compiled.diagnostic.severity() == Severity::Warning {
        eprintln!("{}", compiled.diagnostic);
    }
    writeln!(out, "targetNamespace: {}", compiled.target_namespace)?;
    if print_attributes {
        for (name, value) in &compiled.attributes {
            writeln!(out, "{name}=\"{value}\"")?;
        }
    }
    write!(out, "{}", compiled.schema)?;
    out.flush()
}
