//! Generator Runs
//!
//! Executes generator configurations: a single file (`run`) or every
//! configuration in a directory (`run-batch`). When a configuration asks for
//! one file per schema type, the type reference registry written by the
//! splitter decides each file's imports.

use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::codegen::{ArtifactGenerator, AssembleReport, TypeFileAssembler, TypeScriptGenerator};
use crate::config::ToolConfig;
use crate::document::{keys, write_atomic};
use crate::error::{Result, SplitError};
use crate::generator::GeneratorConfig;
use crate::registry::ReferenceRegistry;

/// Outcome of running one generator configuration
#[derive(Debug)]
pub struct RunReport {
    pub config: PathBuf,
    /// Client file written
    pub output: PathBuf,
    /// Per-type files, when types are extracted
    pub types: Option<AssembleReport>,
}

/// Run a single generator configuration
pub fn run_configuration(path: &Path, config: &ToolConfig) -> Result<RunReport> {
    let generator_config = GeneratorConfig::load(path)?;
    let document = generator_config.load_document()?;
    let output = generator_config.output()?;

    let generator = TypeScriptGenerator::new(
        generator_config.class_name(),
        config.codegen.helpers_module.clone(),
    );
    let generated = generator.generate(&document)?;

    if !generator_config.extract_types() {
        write_atomic(&output, generated.bundle().as_bytes())?;
        info!(config = %path.display(), output = %output.display(), "client generated");
        return Ok(RunReport {
            config: path.to_path_buf(),
            output,
            types: None,
        });
    }

    let registry_path = generator_config.type_reference_map_path().ok_or_else(|| {
        SplitError::missing_section(
            path,
            format!(
                "{}.{}.{}",
                keys::CODE_GENERATORS,
                keys::TYPESCRIPT_CLIENT,
                keys::TYPE_REFERENCE_MAP_PATH
            ),
        )
    })?;
    let registry = ReferenceRegistry::load(&registry_path)?;
    let types_dir = registry_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let assembler = TypeFileAssembler::new(types_dir, config.codegen.type_extension.clone())
        .with_policy(config.codegen.write_policy);
    write_atomic(&output, assembler.render_client(&generated).as_bytes())?;
    let report = assembler.write_all(&generated.types, &registry)?;

    info!(
        config = %path.display(),
        output = %output.display(),
        created = report.created.len(),
        overwritten = report.overwritten.len(),
        kept = report.kept.len(),
        "client and type files generated"
    );
    Ok(RunReport {
        config: path.to_path_buf(),
        output,
        types: Some(report),
    })
}

/// Generator configurations in `dir` (not recursive), sorted by path
pub fn find_configurations(dir: &Path, config: &ToolConfig) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SplitError::DirectoryNotFound(dir.to_path_buf()));
    }

    let extension = config.split.generator_extension.as_str();
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    files.sort();
    Ok(files)
}

/// Run every generator configuration in `dir`, in order. The first failure
/// stops the batch.
pub fn run_directory(dir: &Path, config: &ToolConfig) -> Result<Vec<RunReport>> {
    let files = find_configurations(dir, config)?;
    info!(directory = %dir.display(), configurations = files.len(), "running batch");

    files
        .iter()
        .map(|file| run_configuration(file, config))
        .collect()
}
