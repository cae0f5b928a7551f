//! Batch verification job
//!
//! Loads a recipe once, then cleans each input file into the output folder.
//! Per-file failures are logged and counted; only the aggregate decides
//! whether the run reports success.

use crate::config::VerifyConfig;
use crate::core::verify::summary::VerificationSummary;
use crate::deid::actions::apply_actions;
use crate::deid::audit::AuditLogger;
use crate::deid::dataset::{read_file, write_to_vec};
use crate::deid::identifiers::{get_identifiers, identifiers_from_object, Identifiers};
use crate::deid::recipe::DeidRecipe;
use crate::domain::{DeidError, RecipeError, Result};
use std::path::Path;
use std::time::Instant;

/// A recipe bound to a set of inputs and an output folder
pub struct VerifyJob {
    recipe: DeidRecipe,
    config: VerifyConfig,
    audit: Option<AuditLogger>,
}

impl VerifyJob {
    /// Load the configured recipe
    ///
    /// # Errors
    ///
    /// Returns the recipe error unchanged so the caller can report it as a
    /// load failure.
    pub fn new(config: VerifyConfig) -> std::result::Result<Self, RecipeError> {
        let recipe = DeidRecipe::load(&config.recipe)?;
        tracing::info!(
            recipe = %config.recipe,
            actions = recipe.header_actions().len(),
            "Recipe loaded"
        );
        if !recipe.unapplied_sections().is_empty() {
            tracing::warn!(
                sections = ?recipe.unapplied_sections().keys().collect::<Vec<_>>(),
                "Recipe sections other than %header are not applied"
            );
        }

        Ok(Self {
            recipe,
            config,
            audit: None,
        })
    }

    /// Record every produced file in an audit trail
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Clean every input file
    ///
    /// # Errors
    ///
    /// Fails only if the output folder cannot be created. Problems with
    /// individual files are counted in the summary instead.
    pub fn run(&self) -> Result<VerificationSummary> {
        let start = Instant::now();
        let files = &self.config.files;
        let mut summary = VerificationSummary::new(files.len());

        let ids = get_identifiers(files);

        let output_folder = &self.config.output_folder;
        std::fs::create_dir_all(output_folder).map_err(|e| {
            DeidError::Io(format!(
                "Failed to create output folder {}: {}",
                output_folder.display(),
                e
            ))
        })?;

        for file in files {
            let Some(name) = file.file_name() else {
                tracing::warn!(path = %file.display(), "Input has no file name");
                summary.failed += 1;
                continue;
            };
            let output = output_folder.join(name);

            if output.exists() && !self.config.overwrite {
                tracing::warn!(
                    path = %output.display(),
                    "Output exists and overwrite is disabled, skipping"
                );
                summary.skipped += 1;
                continue;
            }

            match self.clean_file(file, &output, ids.get(file)) {
                Ok(()) => summary.produced.push(output),
                Err(e) => {
                    tracing::warn!(path = %file.display(), error = %e, "Failed to de-identify file");
                    summary.failed += 1;
                }
            }
        }

        let summary = summary.with_duration(start.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    fn clean_file(&self, source: &Path, output: &Path, ids: Option<&Identifiers>) -> Result<()> {
        let mut obj = read_file(source)?;

        let derived;
        let ids = match ids {
            Some(ids) => ids,
            None => {
                derived = identifiers_from_object(&obj);
                &derived
            }
        };

        let changes = apply_actions(&mut obj, &self.recipe, ids)?;
        let bytes = write_to_vec(&obj)?;
        std::fs::write(output, bytes).map_err(|e| {
            DeidError::Io(format!("Failed to write {}: {}", output.display(), e))
        })?;

        tracing::debug!(
            source = %source.display(),
            output = %output.display(),
            changes = changes.len(),
            "Wrote de-identified file"
        );

        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log_file(source, output, &changes) {
                tracing::warn!(error = %e, "Failed to write audit entry");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deid::dataset::text_value;
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use dicom_dictionary_std::tags;
    use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_sample(dir: &Path, name: &str) -> PathBuf {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            tags::SOP_CLASS_UID,
            VR::UI,
            PrimitiveValue::from("1.2.840.10008.5.1.4.1.1.7"),
        ));
        obj.put(DataElement::new(
            tags::SOP_INSTANCE_UID,
            VR::UI,
            PrimitiveValue::from("2.25.99"),
        ));
        obj.put(DataElement::new(
            tags::PATIENT_NAME,
            VR::PN,
            PrimitiveValue::from("Doe^Jane"),
        ));
        let file = obj
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax("1.2.840.10008.1.2.1")
                    .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.7")
                    .media_storage_sop_instance_uid("2.25.99"),
            )
            .unwrap();

        let path = dir.join(name);
        std::fs::write(&path, write_to_vec(&file).unwrap()).unwrap();
        path
    }

    fn config_for(files: Vec<PathBuf>, output: PathBuf) -> VerifyConfig {
        VerifyConfig {
            recipe: "deid.dicom.basic".to_string(),
            files,
            output_folder: output,
            overwrite: true,
            show_header: false,
        }
    }

    #[test]
    fn test_unknown_recipe_fails_to_load() {
        let mut config = VerifyConfig::default();
        config.recipe = "no-such-recipe".to_string();
        assert!(VerifyJob::new(config).is_err());
    }

    #[test]
    fn test_run_cleans_files_into_new_folder() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(dir.path(), "0002.DCM");
        let output = dir.path().join("deid_output");

        let job = VerifyJob::new(config_for(vec![input], output.clone())).unwrap();
        let summary = job.run().unwrap();

        assert!(output.is_dir());
        assert_eq!(summary.produced, vec![output.join("0002.DCM")]);

        let cleaned = read_file(output.join("0002.DCM")).unwrap();
        assert_eq!(
            text_value(&cleaned, tags::PATIENT_NAME),
            Some("ANONYMOUS".to_string())
        );
    }

    #[test]
    fn test_missing_input_counts_as_failure() {
        let dir = TempDir::new().unwrap();
        let job = VerifyJob::new(config_for(
            vec![dir.path().join("absent.dcm")],
            dir.path().join("out"),
        ))
        .unwrap();

        let summary = job.run().unwrap();
        assert!(!summary.is_successful());
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_existing_output_skipped_without_overwrite() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(dir.path(), "a.dcm");
        let output = dir.path().join("out");
        std::fs::create_dir_all(&output).unwrap();
        std::fs::write(output.join("a.dcm"), b"previous").unwrap();

        let mut config = config_for(vec![input], output.clone());
        config.overwrite = false;
        let summary = VerifyJob::new(config).unwrap().run().unwrap();

        assert_eq!(summary.skipped, 1);
        assert!(summary.produced.is_empty());
        assert_eq!(std::fs::read(output.join("a.dcm")).unwrap(), b"previous");
    }
}
