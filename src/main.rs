use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use sdt_calc::ast::printer::{self, TreeFormat};
use sdt_calc::repl::{self, DEFAULT_TREE_FILE, Session, SessionConfig};
use sdt_calc::{parser, scanner};

#[derive(Parser, Debug)]
#[command(
    name = "sdt-calc",
    about = "Parse and check one-line expressions, declarations and assignments"
)]
struct Cli {
    /// Line to evaluate once (omit for REPL)
    line: Option<String>,

    /// Evaluate every line of a file as a separate input
    #[arg(long, value_name = "FILE", conflicts_with = "line")]
    file: Option<PathBuf>,

    /// File that receives the parse tree of each parsed line
    #[arg(long, value_name = "FILE", default_value = DEFAULT_TREE_FILE)]
    tree_file: PathBuf,

    /// Do not write the parse tree file
    #[arg(long)]
    no_tree_file: bool,

    /// Parse tree format for the tree file and --dump-ast
    #[arg(long, default_value_t = TreeFormat::Tree)]
    tree_format: TreeFormat,

    /// Dump tokens of LINE and exit
    #[arg(long, requires = "line")]
    dump_tokens: bool,

    /// Dump the parse tree of LINE and exit
    #[arg(long, requires = "line")]
    dump_ast: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            tree_file: (!self.no_tree_file).then(|| self.tree_file.clone()),
            tree_format: self.tree_format,
            capture_output: false,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn report(err: sdt_calc::Error) -> anyhow::Error {
    let kind = err.kind();
    eprintln!("{:?}", miette::Report::new(err));
    anyhow::anyhow!("evaluation failed ({kind})")
}

fn dump_tokens(line: &str) -> Result<()> {
    let tokens = scanner::scan(line)
        .map_err(|e| report(sdt_calc::Error::from(e).with_source_code("input", line)))?;
    for token in &tokens {
        println!("{token}");
    }
    Ok(())
}

fn dump_ast(line: &str, format: TreeFormat) -> Result<()> {
    let tree = parser::parse(line)
        .map_err(|e| report(sdt_calc::Error::from(e).with_source_code("input", line)))?;
    print!("{}", printer::render(&tree, format));
    Ok(())
}

fn run_file(path: &PathBuf, config: SessionConfig) -> Result<()> {
    let file = File::open(path).with_context(|| format!("open input file '{}'", path.display()))?;
    let mut session = Session::new(config);
    let summary = repl::run_lines(&mut session, BufReader::new(file))
        .with_context(|| format!("read input file '{}'", path.display()))?;
    eprintln!(
        "{} line(s) evaluated, {} failed",
        summary.evaluated, summary.failed
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(ref line) = cli.line {
        if cli.dump_tokens {
            return dump_tokens(line);
        }
        if cli.dump_ast {
            return dump_ast(line, cli.tree_format);
        }
        let value = sdt_calc::evaluate(line).map_err(report)?;
        println!("{value}");
        return Ok(());
    }

    let config = cli.session_config();
    match cli.file {
        Some(ref path) => run_file(path, config),
        None => repl::run_repl(config).context("run interactive session"),
    }
}
