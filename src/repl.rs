use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::ast::SyntaxNode;
use crate::ast::printer::{self, TreeFormat};
use crate::error::Error;
use crate::evaluator::Evaluator;
use crate::evaluator::value::Value;
use crate::parser;

/// Typing this word (any case) ends a session.
pub const EXIT_COMMAND: &str = "salir";

pub const DEFAULT_TREE_FILE: &str = "parseTree.txt";

const PROMPT: &str = "> ";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// File overwritten with the parse tree of every line that parses.
    pub tree_file: Option<PathBuf>,
    pub tree_format: TreeFormat,
    /// Keep every emitted message in memory as well (see [`Session::output`]).
    pub capture_output: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tree_file: Some(PathBuf::from(DEFAULT_TREE_FILE)),
            tree_format: TreeFormat::default(),
            capture_output: false,
        }
    }
}

#[derive(Debug)]
pub enum LineOutcome {
    Exit,
    Skipped,
    Evaluated(Result<Value, Error>),
}

/// Counts for a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub evaluated: usize,
    pub failed: usize,
}

/// Line-at-a-time driver around the core. Carries configuration and, when
/// capturing, the messages it printed; never variable bindings.
pub struct Session {
    config: SessionConfig,
    output: Vec<String>,
    writer: Box<dyn Write>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_writer(config, Box::new(io::stdout()))
    }

    pub fn with_writer(config: SessionConfig, writer: Box<dyn Write>) -> Self {
        Self {
            config,
            output: Vec::new(),
            writer,
        }
    }

    /// Messages emitted so far; always empty unless `capture_output` is set.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn process_line(&mut self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.eq_ignore_ascii_case(EXIT_COMMAND) {
            return LineOutcome::Exit;
        }
        if line.is_empty() {
            return LineOutcome::Skipped;
        }

        self.emit(format!("evaluating: {line}"));
        let tree = match parser::parse(line) {
            Ok(tree) => tree,
            Err(e) => {
                self.emit(format!("parsing error: {}", e.message));
                return LineOutcome::Evaluated(Err(
                    Error::from(e).with_source_code("input", line)
                ));
            }
        };
        debug!(%line, "parsing success");
        self.emit("parsing success".to_string());
        self.save_tree(&tree);

        let mut evaluator = Evaluator::new();
        let result = evaluator.evaluate(&tree);
        let notices: Vec<String> = evaluator
            .notices()
            .iter()
            .map(|n| format!("SDT verified! ({n})"))
            .collect();
        for notice in notices {
            self.emit(notice);
        }

        match result {
            Ok(value) => {
                if !matches!(tree, SyntaxNode::Assign(_) | SyntaxNode::Declare(_)) {
                    self.emit(format!("SDT verified! result: {value}"));
                }
                LineOutcome::Evaluated(Ok(value))
            }
            Err(e) => {
                self.emit(format!("SDT error: {e}"));
                LineOutcome::Evaluated(Err(Error::from(e).with_source_code("input", line)))
            }
        }
    }

    fn save_tree(&mut self, tree: &SyntaxNode) {
        let Some(path) = self.config.tree_file.clone() else {
            return;
        };
        let rendered = printer::render(tree, self.config.tree_format);
        match fs::write(&path, rendered) {
            Ok(()) => {
                debug!(path = %path.display(), "parse tree written");
                self.emit(format!("parse tree saved to '{}'", path.display()));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not write parse tree");
                self.emit(format!(
                    "could not write parse tree to '{}': {e}",
                    path.display()
                ));
            }
        }
    }

    fn emit(&mut self, message: String) {
        if let Err(e) = writeln!(self.writer, "{message}") {
            warn!(error = %e, "could not write session output");
        }
        if self.config.capture_output {
            self.output.push(message);
        }
    }
}

/// Feed every line of `reader` through `session` until it ends or the exit
/// command is read.
pub fn run_lines(session: &mut Session, reader: impl BufRead) -> io::Result<Summary> {
    let mut summary = Summary::default();
    for line in reader.lines() {
        match session.process_line(&line?) {
            LineOutcome::Exit => break,
            LineOutcome::Skipped => {}
            LineOutcome::Evaluated(result) => {
                summary.evaluated += 1;
                if result.is_err() {
                    summary.failed += 1;
                }
            }
        }
    }
    Ok(summary)
}

/// Run the interactive REPL until `salir`, Ctrl-D or Ctrl-C.
pub fn run_repl(config: SessionConfig) -> rustyline::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut session = Session::new(config);

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.as_str())?;
                }
                if let LineOutcome::Exit = session.process_line(&line) {
                    break;
                }
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
