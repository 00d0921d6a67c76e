//! Per-Type File Assembly
//!
//! Writes one file per generated type. Each file starts with the imports the
//! type needs according to the reference registry, followed by imports of the
//! shared helper routines its body calls.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::manifest::GenerationManifest;
use super::{ArtifactKind, CodeArtifact, GeneratedCode, HelperRoutine, WritePolicy};
use crate::error::Result;
use crate::registry::ReferenceRegistry;

/// Result of writing a single per-type file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file did not exist and was created
    Created,
    /// An existing file was replaced
    Overwritten,
    /// An existing file was left untouched
    Kept,
}

/// Summary of an assembler run
#[derive(Debug, Default)]
pub struct AssembleReport {
    pub created: Vec<PathBuf>,
    pub overwritten: Vec<PathBuf>,
    pub kept: Vec<PathBuf>,
}

impl AssembleReport {
    fn record(&mut self, path: PathBuf, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Created => self.created.push(path),
            WriteOutcome::Overwritten => self.overwritten.push(path),
            WriteOutcome::Kept => self.kept.push(path),
        }
    }

    /// Number of files created or overwritten
    pub fn written_count(&self) -> usize {
        self.created.len() + self.overwritten.len()
    }
}

/// Writes per-type files with registry-driven imports
#[derive(Debug, Clone)]
pub struct TypeFileAssembler {
    output_dir: PathBuf,
    extension: String,
    policy: WritePolicy,
}

impl TypeFileAssembler {
    /// Create an assembler writing `<type>.<extension>` files into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: extension.into(),
            policy: WritePolicy::default(),
        }
    }

    /// Set the existing-file policy
    pub fn with_policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// File name for a type
    pub fn file_name(&self, type_name: &str) -> String {
        format!("{}.{}", type_name, self.extension)
    }

    /// Import header for one artifact
    pub fn header(
        &self,
        artifact: &CodeArtifact,
        registry: &ReferenceRegistry,
        helpers: Option<&CodeArtifact>,
    ) -> String {
        let module = helpers
            .filter(|h| h.type_name != artifact.type_name)
            .map(|h| h.type_name.as_str());
        import_block(registry.imports_for(&artifact.type_name), &artifact.helpers, module)
    }

    /// Client source with imports of the per-type files it uses
    pub fn render_client(&self, generated: &GeneratedCode) -> String {
        let module = generated.helpers_artifact().map(|h| h.type_name.as_str());
        let mut content = import_block(
            generated.client_types.iter().map(String::as_str),
            &generated.client_helpers,
            module,
        );
        content.push_str(&generated.client);
        content
    }

    /// Full file content for one artifact
    pub fn render(
        &self,
        artifact: &CodeArtifact,
        registry: &ReferenceRegistry,
        helpers: Option<&CodeArtifact>,
    ) -> String {
        let mut content = self.header(artifact, registry, helpers);
        content.push_str(&artifact.code);
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content
    }

    /// Write every artifact to its own file
    pub fn write_all(
        &self,
        artifacts: &[CodeArtifact],
        registry: &ReferenceRegistry,
    ) -> Result<AssembleReport> {
        fs::create_dir_all(&self.output_dir)?;
        let helpers = artifacts.iter().find(|a| a.kind == ArtifactKind::Helpers);
        let mut manifest = GenerationManifest::load(&self.output_dir)?;
        let mut report = AssembleReport::default();

        for artifact in artifacts {
            let file_name = self.file_name(&artifact.type_name);
            let content = self.render(artifact, registry, helpers);
            let outcome = self.write_one(&file_name, &content, &mut manifest)?;
            report.record(self.output_dir.join(&file_name), outcome);
        }

        if report.written_count() > 0 {
            manifest.save()?;
        }
        Ok(report)
    }

    fn write_one(
        &self,
        file_name: &str,
        content: &str,
        manifest: &mut GenerationManifest,
    ) -> Result<WriteOutcome> {
        let path = self.output_dir.join(file_name);
        if !path.exists() {
            fs::write(&path, content)?;
            manifest.record(file_name, content);
            return Ok(WriteOutcome::Created);
        }

        let overwrite = match self.policy {
            WritePolicy::Never => false,
            WritePolicy::Always => true,
            WritePolicy::Unmodified => {
                let existing = fs::read(&path)?;
                let unmodified = manifest
                    .get(file_name)
                    .is_some_and(|checksum| checksum.verify(&existing));
                if !unmodified {
                    warn!(file = %path.display(), "modified since generation, keeping");
                }
                unmodified && existing != content.as_bytes()
            }
        };

        if !overwrite {
            debug!(file = %path.display(), "existing file kept");
            return Ok(WriteOutcome::Kept);
        }

        fs::write(&path, content)?;
        manifest.record(file_name, content);
        Ok(WriteOutcome::Overwritten)
    }
}

/// `import` statements for type modules, then one combined statement for the
/// helper routines when a helpers module exists
fn import_block<'a>(
    imports: impl IntoIterator<Item = &'a str>,
    helpers: &BTreeSet<HelperRoutine>,
    helpers_module: Option<&str>,
) -> String {
    let mut block = String::new();
    let mut seen = BTreeSet::new();
    for import in imports {
        if seen.insert(import) {
            block.push_str(&format!("import {{ {} }} from './{}';\n", import, import));
        }
    }

    if let Some(module) = helpers_module {
        if !helpers.is_empty() {
            let names: Vec<&str> = helpers.iter().map(|h| h.name()).collect();
            block.push_str(&format!(
                "import {{ {} }} from './{}';\n",
                names.join(", "),
                module
            ));
        }
    }

    if !block.is_empty() {
        block.push('\n');
    }
    block
}
