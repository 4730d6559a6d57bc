//! Terminal output for command results.
//!
//! Status lines go to stdout through [`OutputManager`]. In JSON mode the
//! status lines are dropped and each command prints one JSON document.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

#[derive(Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Info,
    Failure,
}

impl OutputManager {
    /// Resolves `Auto` to `Human` on a terminal and `Plain` otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            format,
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color || format == OutputFormat::Plain,
            term: Term::stdout(),
        }
    }

    fn silenced(&self) -> bool {
        self.quiet || self.format == OutputFormat::Json
    }

    fn styled(&self, tone: Tone, msg: &str) -> String {
        let (symbol, plain) = match tone {
            Tone::Success => ("\u{2713}", format!("\u{2713} {msg}")),
            Tone::Warning => ("\u{26a0}", format!("\u{26a0} {msg}")),
            Tone::Info => ("\u{2139}", format!("\u{2139} {msg}")),
            Tone::Failure => ("\u{2717}", format!("\u{2717} {msg}")),
        };
        if self.no_color {
            return plain;
        }
        match tone {
            Tone::Success => format!("{} {}", symbol.green().bold(), msg.green()),
            Tone::Warning => format!("{} {}", symbol.yellow().bold(), msg.yellow()),
            Tone::Info => format!("{} {}", symbol.blue().bold(), msg),
            Tone::Failure => format!("{} {}", symbol.red().bold(), msg.red()),
        }
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.silenced() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.silenced() {
            return Ok(());
        }
        self.term.write_line(&self.styled(Tone::Success, msg))
    }

    /// Shown even with `--quiet`, on stderr.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        Term::stderr().write_line(&self.styled(Tone::Warning, msg))
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.silenced() {
            return Ok(());
        }
        self.term.write_line(&self.styled(Tone::Info, msg))
    }

    /// A failed step inside an otherwise finished command.
    pub fn failure(&self, msg: &str) -> io::Result<()> {
        Term::stderr().write_line(&self.styled(Tone::Failure, msg))
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.silenced() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// `label` followed by one indented line per item. Nothing for an
    /// empty list.
    pub fn list(&self, label: &str, items: &[String]) -> io::Result<()> {
        if items.is_empty() || self.silenced() {
            return Ok(());
        }
        self.term.write_line(label)?;
        for item in items {
            self.term.write_line(&format!("  {item}"))?;
        }
        Ok(())
    }

    /// Pretty JSON on stdout, printed only in JSON mode.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        if self.format != OutputFormat::Json {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}
