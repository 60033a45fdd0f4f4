//! Compilation-unit emission.
//!
//! The body of every artifact is rendered first into a nested buffer; only
//! then is the preamble (guards, includes, namespaces, imports) computed from
//! the referenced types the body recorded. The resolver is sealed before the
//! preamble is written, so a late reference is an error rather than a missing
//! include.

use crate::context::UnitContext;
use crate::cursor::Coverage;
use crate::dispatch;
use crate::error::{Result, TranslateError};
use crate::writers::{cpp, csharp, swift};
use smol_str::SmolStr;
use xlate_ast::{SourceUnit, TypeName};
use xlate_config::{Backend, BackendPolicy};

/// Text wrapped around a rendered body.
#[derive(Debug, Default)]
pub(crate) struct Frame {
    pub preamble: String,
    pub postamble: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// C++ class declaration.
    Header,
    /// C++ out-of-line definitions.
    Source,
    /// The whole unit, for backends without a declaration split.
    Single,
}

/// One output file of a translated unit.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Relative output path, `a/b/Foo.h`.
    pub path: String,
    pub text: String,
    /// Source spans consumed while writing this artifact.
    pub coverage: Coverage,
}

#[derive(Debug, Clone)]
pub struct TranslatedUnit {
    pub artifacts: Vec<Artifact>,
    /// Outermost types the unit refers to, in discovery order.
    pub referenced_types: Vec<TypeName>,
}

impl TranslatedUnit {
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }
}

/// Translate one unit for `policy`'s backend.
///
/// Output is all-or-nothing: any error discards everything written so far.
#[tracing::instrument(level = "debug", skip_all, fields(unit = %unit.name, backend = %policy.backend))]
pub fn translate(unit: &SourceUnit, policy: &BackendPolicy) -> Result<TranslatedUnit> {
    tracing::debug!(bytes = unit.text.len(), types = unit.types.len(), "unit start");
    let result = match policy.backend {
        Backend::Cpp => translate_cpp(unit, policy),
        Backend::CSharp | Backend::Swift => translate_single(unit, policy),
    };
    match &result {
        Ok(translated) => tracing::debug!(
            artifacts = translated.artifacts.len(),
            referenced = translated.referenced_types.len(),
            "unit finished"
        ),
        Err(err @ TranslateError::Unsupported { .. }) => tracing::warn!(%err, "unit aborted"),
        Err(err) => tracing::error!(%err, "unit failed"),
    }
    result
}

struct Emitted {
    text: String,
    coverage: Coverage,
    referenced: Vec<TypeName>,
}

/// Render `body` into a nested buffer, then wrap it in the frame built from
/// the references the body recorded.
fn emit<'u>(
    mut ctx: UnitContext<'u>,
    body: impl FnOnce(&mut UnitContext<'u>) -> Result<()>,
    frame: impl FnOnce(&[TypeName]) -> Frame,
) -> Result<Emitted> {
    ctx.out.push();
    body(&mut ctx)?;
    let body_text = ctx.out.pop()?;

    ctx.types.seal();
    let referenced: Vec<TypeName> = ctx.types.referenced().iter().cloned().collect();
    let manifest: Vec<String> = referenced.iter().map(TypeName::qualified).collect();
    tracing::debug!(?manifest, "referenced types");
    let frame = frame(&referenced);

    ctx.write(&frame.preamble);
    ctx.write(&body_text);
    ctx.write(&frame.postamble);
    let (text, coverage, referenced) = ctx.finish()?;
    Ok(Emitted {
        text,
        coverage,
        referenced,
    })
}

/// Qualified names of the unit's top-level types.
fn own_types(unit: &SourceUnit) -> Vec<TypeName> {
    let package = unit
        .package
        .as_ref()
        .map(|p| p.segments.clone())
        .unwrap_or_default();
    unit.types
        .iter()
        .map(|decl| TypeName {
            package: package.clone(),
            names: vec![decl.name.name.clone()],
        })
        .collect()
}

fn primary_name(unit: &SourceUnit) -> Result<TypeName> {
    own_types(unit)
        .into_iter()
        .next()
        .ok_or_else(|| TranslateError::Internal(format!("unit {} declares no types", unit.name)))
}

/// Copy any comment block ahead of the package declaration, then drop the
/// package and import declarations. Imports are re-derived from usage.
fn skip_unit_header(ctx: &mut UnitContext<'_>, unit: &SourceUnit, keep_leading: bool) -> Result<()> {
    let mut last = None;
    if let Some(package) = &unit.package {
        last = Some(package.span.end);
    }
    if let Some(import) = unit.imports.last() {
        last = Some(last.map_or(import.span.end, |end: u32| end.max(import.span.end)));
    }
    let Some(end) = last else {
        return Ok(());
    };
    let first = unit
        .package
        .as_ref()
        .map(|p| p.span.start)
        .into_iter()
        .chain(unit.imports.first().map(|i| i.span.start))
        .min()
        .unwrap_or(0);
    if keep_leading {
        ctx.copy_to(first)?;
    }
    ctx.skip_to(end)?;

    // Blank lines after the imports go; comments stay with the first type.
    let rest = ctx.cursor.rest();
    let blank = rest.len() - rest.trim_start().len();
    ctx.skip_to(end + blank as u32)
}

fn translate_single(unit: &SourceUnit, policy: &BackendPolicy) -> Result<TranslatedUnit> {
    let name = primary_name(unit)?;
    let mut ctx = UnitContext::new(unit, policy);
    skip_unit_header(&mut ctx, unit, true)?;

    let emitted = emit(
        ctx,
        |ctx| {
            for decl in &unit.types {
                ctx.copy_space()?;
                dispatch::write_type_decl(ctx, decl)?;
            }
            ctx.copy_space()
        },
        |_| match policy.backend {
            Backend::Swift => swift::frame(&policy.imports),
            _ if policy.namespaces => csharp::frame(&name.package),
            _ => Frame::default(),
        },
    )?;

    let extension = if policy.backend == Backend::Swift { "swift" } else { "cs" };
    Ok(TranslatedUnit {
        artifacts: vec![Artifact {
            kind: ArtifactKind::Single,
            path: format!("{}.{extension}", name.join("/")),
            text: emitted.text,
            coverage: emitted.coverage,
        }],
        referenced_types: emitted.referenced,
    })
}

fn translate_cpp(unit: &SourceUnit, policy: &BackendPolicy) -> Result<TranslatedUnit> {
    let name = primary_name(unit)?;
    let own = own_types(unit);
    let package: &[SmolStr] = if policy.namespaces { &name.package } else { &[] };
    let header_path = cpp::header_path(&name);

    let mut ctx = UnitContext::new(unit, policy);
    skip_unit_header(&mut ctx, unit, true)?;
    let header = emit(
        ctx,
        |ctx| {
            for (i, decl) in unit.types.iter().enumerate() {
                if i > 0 {
                    ctx.write("\n\n");
                }
                dispatch::write_type_decl(ctx, decl)?;
            }
            ctx.write("\n");
            Ok(())
        },
        |referenced| {
            let includes = cpp::includes(referenced, &own);
            cpp::header_frame(
                &cpp::include_guard(&name),
                policy.runtime_include.as_deref(),
                package,
                &includes,
            )
        },
    )?;

    let ctx = UnitContext::new(unit, policy);
    let mut exclude = own.clone();
    exclude.extend(header.referenced.iter().map(TypeName::outermost));
    let source = emit(
        ctx,
        |ctx| {
            for decl in &unit.types {
                cpp::source::write_definitions(ctx, decl)?;
            }
            Ok(())
        },
        |referenced| cpp::source_frame(&header_path, package, &cpp::includes(referenced, &exclude)),
    )?;

    let mut referenced_types = header.referenced;
    for ty in source.referenced {
        if !referenced_types.contains(&ty) {
            referenced_types.push(ty);
        }
    }
    Ok(TranslatedUnit {
        artifacts: vec![
            Artifact {
                kind: ArtifactKind::Header,
                path: header_path.clone(),
                text: header.text,
                coverage: header.coverage,
            },
            Artifact {
                kind: ArtifactKind::Source,
                path: format!("{}.cpp", name.join("/")),
                text: source.text,
                coverage: source.coverage,
            },
        ],
        referenced_types,
    })
}
