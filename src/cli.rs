//! Minimal CLI: load declarations → convert classes → write interfaces
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use crate::export::{ExportOptions, ExportReport, export_interfaces};
use crate::instructions::load_instructions;
use crate::session::SessionScope;
use crate::source::{Builtins, SourceProject};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// project classes from TypeScript declaration files into read-only, JSII-friendly interfaces
#[derive(Parser, Debug)]
#[command(version)]
pub struct CommandLineInterface {
    /// declaration files to load. A literal path or a quoted glob pattern
    /// (e.g. 'node_modules/client/dist/**/*.d.ts')
    sources: String,

    /// JSON build instructions: `[{ "targetFile", "sourceTypes": [{ "file", "type" }] }]`
    instructions: PathBuf,

    /// how long the visited-class registry lives
    #[arg(long, value_enum, default_value_t = SessionScope::Run)]
    scope: SessionScope,

    /// extra type name to pass through verbatim (repeatable)
    #[arg(long = "builtin", value_name = "NAME")]
    builtins: Vec<String>,

    /// print the generated files to stdout instead of writing them
    #[arg(long)]
    dry_run: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        // debug path
        if self.no_op {
            eprintln!("{self:#?}");
            return Ok(());
        }

        // 1) load declarations
        let builtins = Builtins::with_extra(self.builtins.iter().cloned());
        let mut project = SourceProject::with_builtins(builtins);
        project
            .add_source_files_at_paths(&self.sources)
            .with_context(|| format!("failed to load declaration files from {}", self.sources))?;
        eprintln!("{} {} declaration files", "loaded".green().bold(), project.file_count());

        // 2) read instructions
        let instructions = load_instructions(&self.instructions).with_context(|| {
            format!("failed to load build instructions from {}", self.instructions.display())
        })?;

        // 3) convert & write
        let options = ExportOptions {
            scope: self.scope,
            dry_run: self.dry_run,
        };
        let reports = export_interfaces(&project, &instructions, options)
            .context("failed to export interfaces")?;

        for report in &reports {
            if self.dry_run {
                println!("// {}", report.target.display());
                print!("{}", report.rendered);
            }
            eprintln!("{}", summary_line(report));
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn summary_line(report: &ExportReport) -> String {
    let status = if report.written {
        "wrote".green().bold()
    } else {
        "rendered".yellow().bold()
    };
    let noun = if report.interfaces.len() == 1 {
        "interface"
    } else {
        "interfaces"
    };
    format!(
        "{status} {} ({} {noun})",
        report.target.display(),
        report.interfaces.len()
    )
}
