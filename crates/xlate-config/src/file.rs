//! The `xlate.toml` file format.

use crate::backend::{Backend, GroupingBucket, PolicyRule};
use crate::error::{ConfigError, Result};
use crate::policy::BackendPolicy;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::path::Path;
use xlate_ast::PrimitiveKind;

/// Root configuration: one optional override table per backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub cpp: Option<BackendOverrides>,

    #[serde(default)]
    pub csharp: Option<BackendOverrides>,

    #[serde(default)]
    pub swift: Option<BackendOverrides>,
}

/// Keys overriding a built-in profile. Unset keys inherit the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendOverrides {
    #[serde(default)]
    pub indent_width: Option<usize>,

    #[serde(default)]
    pub tab_width: Option<usize>,

    #[serde(default)]
    pub string_type: Option<String>,

    #[serde(default)]
    pub object_type: Option<String>,

    #[serde(default)]
    pub array_type: Option<String>,

    #[serde(default)]
    pub runtime_include: Option<String>,

    #[serde(default)]
    pub unsigned_shift_helper: Option<String>,

    #[serde(default)]
    pub weak_annotation: Option<String>,

    #[serde(default)]
    pub root_object_type: Option<String>,

    #[serde(default)]
    pub root_string_type: Option<String>,

    #[serde(default)]
    pub namespaces: Option<bool>,

    #[serde(default)]
    pub imports: Option<Vec<String>>,

    /// Primitive keyword (`int`, `char`, ...) to target spelling.
    #[serde(default)]
    pub primitive_types: IndexMap<String, String>,

    /// Entries replacing single cells of the reference policy table.
    #[serde(default)]
    pub reference_policy: Vec<PolicyRule>,

    /// Replaces the whole grouping order when present.
    #[serde(default)]
    pub grouping: Option<Vec<GroupingBucket>>,
}

impl TranslatorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: TranslatorConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn overrides(&self, backend: Backend) -> Option<&BackendOverrides> {
        match backend {
            Backend::Cpp => self.cpp.as_ref(),
            Backend::CSharp => self.csharp.as_ref(),
            Backend::Swift => self.swift.as_ref(),
        }
    }

    /// The built-in profile for `backend` with this file's overrides applied.
    pub fn policy(&self, backend: Backend) -> Result<BackendPolicy> {
        let mut policy = BackendPolicy::for_backend(backend);
        if let Some(overrides) = self.overrides(backend) {
            overrides.apply(&mut policy)?;
            tracing::debug!(%backend, "applied configuration overrides");
        }
        policy.validate()?;
        Ok(policy)
    }
}

impl BackendOverrides {
    /// Merge these overrides into `policy`.
    pub fn apply(&self, policy: &mut BackendPolicy) -> Result<()> {
        if let Some(width) = self.indent_width {
            policy.indent_width = width;
        }
        if let Some(width) = self.tab_width {
            policy.tab_width = width;
        }
        if let Some(s) = &self.string_type {
            policy.string_type = SmolStr::new(s);
        }
        if let Some(s) = &self.object_type {
            policy.object_type = SmolStr::new(s);
        }
        if let Some(s) = &self.array_type {
            policy.array_type = SmolStr::new(s);
        }
        if let Some(s) = &self.runtime_include {
            policy.runtime_include = (!s.is_empty()).then(|| SmolStr::new(s));
        }
        if let Some(s) = &self.unsigned_shift_helper {
            policy.unsigned_shift_helper = SmolStr::new(s);
        }
        if let Some(s) = &self.weak_annotation {
            policy.weak_annotation = SmolStr::new(s);
        }
        if let Some(s) = &self.root_object_type {
            policy.root_object_type = SmolStr::new(s);
        }
        if let Some(s) = &self.root_string_type {
            policy.root_string_type = SmolStr::new(s);
        }
        if let Some(namespaces) = self.namespaces {
            policy.namespaces = namespaces;
        }
        if let Some(imports) = &self.imports {
            policy.imports = imports.iter().map(SmolStr::new).collect();
        }

        for (keyword, spelling) in &self.primitive_types {
            let kind = PrimitiveKind::from_keyword(keyword).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "{}: unknown primitive type `{keyword}` in primitive_types",
                    policy.backend
                ))
            })?;
            policy.set_primitive(kind, spelling);
        }

        for rule in &self.reference_policy {
            policy.apply_rule(*rule);
        }

        if let Some(grouping) = &self.grouping {
            policy.set_grouping(grouping.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DeclarationKind, DeclarationSite, ReferenceKind, TypeCategory};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use xlate_ast::AccessLevel;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[cpp]
indent_width = 2
string_type = "xuniv::String"
runtime_include = ""
primitive_types = { long = "long long", char = "wchar_t" }
reference_policy = [
    { category = "reference", site = "local_variable", kind = "value" },
    { category = "reference", site = "parameter", kind = "raw_pointer" },
]

[csharp]
namespaces = false
grouping = [
    { kind = "field", access = "private" },
    { kind = "method", access = "public" },
]
        "#;

        let config = TranslatorConfig::parse(toml).unwrap();

        let cpp = config.policy(Backend::Cpp).unwrap();
        assert_eq!(cpp.indent_width, 2);
        assert_eq!(cpp.string_type, "xuniv::String");
        assert_eq!(cpp.runtime_include, None);
        assert_eq!(cpp.primitive(PrimitiveKind::Long), "long long");
        assert_eq!(cpp.primitive(PrimitiveKind::Int), "int32_t");
        assert_eq!(
            cpp.reference_kind(TypeCategory::Reference, DeclarationSite::LocalVariable),
            ReferenceKind::Value
        );
        assert_eq!(
            cpp.reference_kind(TypeCategory::Reference, DeclarationSite::Parameter),
            ReferenceKind::RawPointer
        );
        assert_eq!(
            cpp.reference_kind(TypeCategory::Reference, DeclarationSite::Field),
            ReferenceKind::SharedOwning
        );

        let csharp = config.policy(Backend::CSharp).unwrap();
        assert!(!csharp.namespaces);
        assert_eq!(
            csharp.grouping(),
            &[
                GroupingBucket::new(DeclarationKind::Field, AccessLevel::Private),
                GroupingBucket::new(DeclarationKind::Method, AccessLevel::Public),
            ]
        );

        let swift = config.policy(Backend::Swift).unwrap();
        assert_eq!(swift.indent_width, 4);
    }

    #[test]
    fn test_unknown_primitive_is_rejected() {
        let config = TranslatorConfig::parse("[swift]\nprimitive_types = { integer = \"Int\" }\n").unwrap();
        let err = config.policy(Backend::Swift).unwrap_err();
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let err = TranslatorConfig::parse("[cpp]\nindent = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml(_)));
    }

    #[test]
    fn test_repeated_grouping_bucket_is_rejected() {
        let toml = r#"
[cpp]
grouping = [
    { kind = "field", access = "public" },
    { kind = "field", access = "public" },
]
        "#;
        let config = TranslatorConfig::parse(toml).unwrap();
        assert!(matches!(
            config.policy(Backend::Cpp),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[swift]\ntab_width = 8").unwrap();

        let config = TranslatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.policy(Backend::Swift).unwrap().tab_width, 8);
        assert!(config.cpp.is_none());
    }
}
