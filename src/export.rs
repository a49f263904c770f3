//! Drives the conversion: one target file per build instruction.

use std::path::PathBuf;

use tracing::info;

use crate::codegen::render;
use crate::error::{Error, Result};
use crate::instructions::BuildInstruction;
use crate::ir::TargetFile;
use crate::session::{ConversionSession, SessionScope};
use crate::source::SourceProject;
use crate::walker::Converter;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub scope: SessionScope,
    /// Render without touching the filesystem.
    pub dry_run: bool,
}

/// Outcome of a single instruction.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub target: PathBuf,
    /// Interfaces emitted into the target, in file order.
    pub interfaces: Vec<String>,
    pub rendered: String,
    pub written: bool,
}

/// Converts every seed of `instruction` into a fresh target file, sharing
/// `session` with whatever ran before.
pub fn convert_instruction(
    project: &SourceProject,
    instruction: &BuildInstruction,
    session: &mut ConversionSession,
) -> Result<TargetFile> {
    let mut target = TargetFile::new(&instruction.target_file);
    let mut converter = Converter::new(project, session, &mut target);
    for seed in &instruction.source_types {
        converter.convert_class(&seed.file, &seed.class)?;
    }
    Ok(target)
}

/// Processes instructions in order and persists each target file as soon as
/// it is complete. The first failure aborts the run; files written by earlier
/// instructions are left in place.
pub fn export_interfaces(
    project: &SourceProject,
    instructions: &[BuildInstruction],
    options: ExportOptions,
) -> Result<Vec<ExportReport>> {
    let mut session = ConversionSession::new();
    let mut reports = Vec::with_capacity(instructions.len());

    for instruction in instructions {
        if options.scope == SessionScope::Instruction {
            session = ConversionSession::new();
        }
        let target = convert_instruction(project, instruction, &mut session)?;
        let rendered = render(&target);

        if !options.dry_run {
            write_target(&target, &rendered)?;
            info!(
                target = %target.path.display(),
                interfaces = target.interfaces.len(),
                visited = session.visited_count(),
                "wrote declaration file"
            );
        }
        reports.push(ExportReport {
            target: target.path.clone(),
            interfaces: target.interfaces.iter().map(|i| i.name.clone()).collect(),
            rendered,
            written: !options.dry_run,
        });
    }
    Ok(reports)
}

fn write_target(target: &TargetFile, rendered: &str) -> Result<()> {
    if let Some(parent) = target.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(&target.path, rendered).map_err(|e| Error::io(&target.path, e))
}
