//! Batch translation of front-end units.
//!
//! Units are independent: each one is translated on its own rayon worker
//! with its own cursor, buffers and referenced-type set, and only the
//! backend policy is shared. An unsupported construct costs the unit it
//! appears in; the rest of the batch carries on.

mod error;

pub use error::{DriverError, Result};
pub use xlate_ast::SourceUnit;

use miette::{NamedSource, Report};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use xlate_common::{Diagnostic, Span};
use xlate_config::{Backend, BackendPolicy, TranslatorConfig};
use xlate_engine::{translate, ArtifactKind, TranslateError, TranslatedUnit};

/// Read one unit document written by the front end.
pub fn load_unit(path: &Path) -> Result<SourceUnit> {
    let content = std::fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| DriverError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Attach the unit's text to `diagnostic` so its label renders in context.
pub fn render(unit: &SourceUnit, diagnostic: Diagnostic) -> Report {
    Report::new(diagnostic).with_source_code(NamedSource::new(&unit.name, unit.text.clone()))
}

/// How one unit fared.
#[derive(Debug)]
pub struct UnitOutcome {
    pub name: String,
    /// The whole source text of the unit.
    pub span: Span,
    pub result: std::result::Result<TranslatedUnit, TranslateError>,
}

impl UnitOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(&self.result, Err(err) if err.is_fatal())
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(&self.result, Err(err) if !err.is_fatal())
    }

    /// One-based `(line, column)` of the construct that stopped the unit.
    pub fn location(&self, unit: &SourceUnit) -> Option<(u32, u32)> {
        let span = self.result.as_ref().err()?.span()?;
        let (line, column) = unit.line_index().line_col(span.start);
        Some((line + 1, column + 1))
    }

    /// Source text that no artifact carried over. Split backends reorder and
    /// re-read the source, so only single-artifact output is checked.
    pub fn coverage_gaps(&self) -> Vec<Span> {
        match &self.result {
            Ok(translated) => translated
                .artifact(ArtifactKind::Single)
                .map(|artifact| artifact.coverage.gaps(self.span))
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let err = match &self.result {
            Ok(_) => {
                return self
                    .coverage_gaps()
                    .into_iter()
                    .map(|gap| {
                        Diagnostic::warning(format!("{}: source text missing from the output", self.name))
                            .with_span(gap)
                            .with_label("not carried over")
                    })
                    .collect();
            }
            Err(err) => err,
        };

        let mut diagnostic = if err.is_fatal() {
            Diagnostic::error(format!("{}: {err}", self.name))
        } else {
            Diagnostic::warning(format!("{}: unit skipped, {err}", self.name))
                .with_help("rewrite this construct or translate the unit by hand")
        };
        if let Some(span) = err.span() {
            diagnostic = diagnostic.with_span(span).with_label("here");
        }
        vec![diagnostic]
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<UnitOutcome>,
}

impl BatchReport {
    pub fn translated(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn unsupported(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_unsupported()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_fatal()).count()
    }

    /// Unsupported units are reported but do not fail the batch.
    pub fn check(&self) -> Result<()> {
        match self.failed() {
            0 => Ok(()),
            failed => Err(DriverError::BatchFailed {
                failed,
                total: self.outcomes.len(),
            }),
        }
    }
}

/// Translation driver for one backend.
pub struct Driver {
    policy: BackendPolicy,
}

impl Driver {
    pub fn new(policy: BackendPolicy) -> Self {
        Self { policy }
    }

    /// The built-in profile for `backend`, with overrides from `config` if given.
    pub fn from_config(backend: Backend, config: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => TranslatorConfig::from_file(path)?,
            None => TranslatorConfig::default(),
        };
        Ok(Self::new(config.policy(backend)?))
    }

    pub fn policy(&self) -> &BackendPolicy {
        &self.policy
    }

    pub fn translate_unit(&self, unit: &SourceUnit) -> UnitOutcome {
        UnitOutcome {
            name: unit.name.clone(),
            span: unit.span(),
            result: translate(unit, &self.policy),
        }
    }

    /// Translate `units` in parallel. Failures stay with their unit.
    #[tracing::instrument(level = "info", skip_all, fields(backend = %self.policy.backend, units = units.len()))]
    pub fn translate_batch(&self, units: &[SourceUnit]) -> BatchReport {
        let outcomes: Vec<UnitOutcome> = units.par_iter().map(|unit| self.translate_unit(unit)).collect();
        let report = BatchReport { outcomes };
        tracing::info!(
            translated = report.translated(),
            unsupported = report.unsupported(),
            failed = report.failed(),
            "batch finished"
        );
        report
    }

    /// Load every unit document, then translate them as one batch.
    pub fn translate_files(&self, paths: &[PathBuf]) -> Result<(Vec<SourceUnit>, BatchReport)> {
        let units = paths
            .par_iter()
            .map(|path| load_unit(path))
            .collect::<Result<Vec<_>>>()?;
        let report = self.translate_batch(&units);
        Ok((units, report))
    }
}

/// Write the artifacts of every translated unit under `out_dir`, creating
/// package directories as needed.
pub fn write_artifacts(out_dir: &Path, report: &BatchReport) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for outcome in &report.outcomes {
        let Ok(translated) = &outcome.result else {
            continue;
        };
        for artifact in &translated.artifacts {
            let path = out_dir.join(&artifact.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| DriverError::io(parent, e))?;
            }
            std::fs::write(&path, &artifact.text).map_err(|e| DriverError::io(&path, e))?;
            tracing::debug!(path = %path.display(), bytes = artifact.text.len(), "wrote artifact");
            written.push(path);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use xlate_ast::fixture::Fixture;
    use xlate_ast::{Bindings, TypeInfo, TypeName};

    /// `class Point { int x; }` in package `geo`.
    fn point() -> SourceUnit {
        let fx = Fixture::new("package geo;\n\nclass Point {\n    int x;\n}\n");
        let mut bindings = Bindings::new();
        let id = bindings.add_type(TypeInfo::class(TypeName::parse("geo.Point")));
        let package = fx.package(&["geo"]);
        let decl = fx.type_decl(
            fx.mods(&[]),
            fx.tok("class"),
            fx.ident("Point"),
            vec![],
            None,
            vec![],
            vec![fx.field(fx.mods(&[]), fx.prim("int"), vec![fx.frag(fx.ident("x"), None)])],
            id,
        );
        let mut unit = fx.unit(Some(package), vec![decl], bindings);
        unit.name = "geo/Point.java".to_string();
        unit
    }

    /// An interface constant, which neither C# nor Swift can declare.
    fn limits() -> SourceUnit {
        let fx = Fixture::new("interface Limits {\n    int MAX = 1;\n}\n");
        let mut bindings = Bindings::new();
        let id = bindings.add_type(TypeInfo::interface(TypeName::parse("Limits")));
        let decl = fx.type_decl(
            fx.mods(&[]),
            fx.tok("interface"),
            fx.ident("Limits"),
            vec![],
            None,
            vec![],
            vec![fx.field(fx.mods(&[]), fx.prim("int"), vec![fx.frag(fx.ident("MAX"), Some(fx.int("1")))])],
            id,
        );
        let mut unit = fx.unit(None, vec![decl], bindings);
        unit.name = "Limits.java".to_string();
        unit
    }

    fn unit_file(unit: &SourceUnit) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, "{}", serde_json::to_string(unit).unwrap()).unwrap();
        file
    }

    #[test]
    fn test_load_unit_round_trips_through_json() {
        let file = unit_file(&point());
        let unit = load_unit(file.path()).unwrap();
        assert_eq!(unit.name, "geo/Point.java");
        assert_eq!(unit.types.len(), 1);
        assert_eq!(unit.types[0].name.name, "Point");
    }

    #[test]
    fn test_load_unit_errors() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        writeln!(file, "{{ \"name\": 1 }}").unwrap();
        assert!(matches!(load_unit(file.path()), Err(DriverError::Json { .. })));

        let missing = file.path().with_extension("missing");
        assert!(matches!(load_unit(&missing), Err(DriverError::Io { .. })));
    }

    #[test]
    fn test_unsupported_unit_does_not_stop_the_batch() {
        let driver = Driver::new(BackendPolicy::csharp());
        let report = driver.translate_batch(&[limits(), point()]);

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].name, "Limits.java");
        assert!(report.outcomes[0].is_unsupported());
        assert!(report.outcomes[1].result.is_ok());
        assert_eq!((report.translated(), report.unsupported(), report.failed()), (1, 1, 0));
        assert!(report.check().is_ok());

        assert_eq!(report.outcomes[0].location(&limits()), Some((2, 5)));
        assert_eq!(report.outcomes[1].location(&point()), None);

        let diagnostics = report.outcomes[0].diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
        assert!(diagnostics[0].message.starts_with("Limits.java: unit skipped"));
        assert!(report.outcomes[1].diagnostics().is_empty());
    }

    #[test]
    fn test_write_artifacts_creates_package_directories() {
        let out = tempfile::tempdir().unwrap();
        let driver = Driver::new(BackendPolicy::cpp());
        let report = driver.translate_batch(&[point()]);

        let written = write_artifacts(out.path(), &report).unwrap();
        assert_eq!(
            written,
            vec![out.path().join("geo/Point.h"), out.path().join("geo/Point.cpp")]
        );
        let header = std::fs::read_to_string(out.path().join("geo/Point.h")).unwrap();
        assert!(header.starts_with("#ifndef GEO_POINT_H\n"));
        assert!(header.contains("    int32_t x;\n"));
    }

    #[test]
    fn test_from_config_applies_overrides() {
        let mut config = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(config, "[swift]\nimports = []").unwrap();
        let driver = Driver::from_config(Backend::Swift, Some(config.path())).unwrap();
        assert!(driver.policy().imports.is_empty());

        let report = driver.translate_batch(&[point()]);
        let text = &report.outcomes[0].result.as_ref().unwrap().artifacts[0].text;
        assert!(text.starts_with("class Point {\n"), "{text}");
    }
}
