use crate::modifiers::AccessLevel;
use crate::names::TypeName;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Index of a declared type in [`Bindings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

/// Index of a declared method in [`Bindings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
}

/// A resolved type declaration, either from this unit or from a library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: TypeName,
    pub kind: TypeKind,
    #[serde(default)]
    pub superclass: Option<TypeId>,
    #[serde(default)]
    pub interfaces: Vec<TypeId>,
    /// Declared non-further-derivable.
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub is_abstract: bool,
    /// Interface with exactly one abstract method and no other abstract members.
    #[serde(default)]
    pub is_functional_interface: bool,
}

impl TypeInfo {
    pub fn class(name: TypeName) -> Self {
        Self {
            name,
            kind: TypeKind::Class,
            superclass: None,
            interfaces: Vec::new(),
            is_final: false,
            is_abstract: false,
            is_functional_interface: false,
        }
    }

    pub fn interface(name: TypeName) -> Self {
        Self {
            kind: TypeKind::Interface,
            ..Self::class(name)
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

/// A resolved method declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: SmolStr,
    pub declaring_type: TypeId,
    /// Erased, fully qualified parameter types.
    #[serde(default)]
    pub parameter_types: Vec<SmolStr>,
    pub access: AccessLevel,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub is_constructor: bool,
}

impl MethodInfo {
    pub fn new(name: &str, declaring_type: TypeId, parameter_types: &[&str]) -> Self {
        Self {
            name: SmolStr::new(name),
            declaring_type,
            parameter_types: parameter_types.iter().map(|s| SmolStr::new(s)).collect(),
            access: AccessLevel::Public,
            is_static: false,
            is_abstract: false,
            is_final: false,
            is_constructor: false,
        }
    }

    pub fn with_access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn final_(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// Resolved name/type bindings for one unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bindings {
    #[serde(default)]
    types: Vec<TypeInfo>,
    #[serde(default)]
    methods: Vec<MethodInfo>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, info: TypeInfo) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(info);
        id
    }

    pub fn add_method(&mut self, info: MethodInfo) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        self.methods.push(info);
        id
    }

    pub fn type_info(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.get(id.0 as usize)
    }

    pub fn type_info_mut(&mut self, id: TypeId) -> Option<&mut TypeInfo> {
        self.types.get_mut(id.0 as usize)
    }

    pub fn method(&self, id: MethodId) -> Option<&MethodInfo> {
        self.methods.get(id.0 as usize)
    }

    pub fn superclass(&self, id: TypeId) -> Option<TypeId> {
        self.type_info(id).and_then(|info| info.superclass)
    }

    pub fn type_name(&self, id: TypeId) -> Option<&TypeName> {
        self.type_info(id).map(|info| &info.name)
    }

    pub fn find_type(&self, qualified: &str) -> Option<TypeId> {
        self.types
            .iter()
            .position(|info| info.name.qualified() == qualified)
            .map(|i| TypeId(i as u32))
    }

    /// Methods whose declaring type is `id`, in registration order.
    pub fn declared_methods(&self, id: TypeId) -> impl Iterator<Item = (MethodId, &MethodInfo)> {
        self.methods
            .iter()
            .enumerate()
            .filter(move |(_, info)| info.declaring_type == id)
            .map(|(i, info)| (MethodId(i as u32), info))
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeInfo)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, info)| (TypeId(i as u32), info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_methods_follow_declaring_type() {
        let mut bindings = Bindings::new();
        let base = bindings.add_type(TypeInfo::class(TypeName::parse("p.Base")));
        let other = bindings.add_type(TypeInfo::class(TypeName::parse("p.Other")));
        let run = bindings.add_method(MethodInfo::new("run", base, &["int"]));
        bindings.add_method(MethodInfo::new("stop", other, &[]));

        let declared: Vec<_> = bindings.declared_methods(base).map(|(id, _)| id).collect();
        assert_eq!(declared, vec![run]);
        assert_eq!(bindings.find_type("p.Base"), Some(base));
    }

    #[test]
    fn test_bindings_deserialize_with_defaults() {
        let json = r#"{
            "types": [{ "name": { "names": ["Object"] }, "kind": "class" }],
            "methods": [{ "name": "hashCode", "declaring_type": 0, "access": "public" }]
        }"#;
        let bindings: Bindings = serde_json::from_str(json).unwrap();
        let object = bindings.type_info(TypeId(0)).unwrap();
        assert!(object.superclass.is_none());
        assert!(!object.is_final);
        assert_eq!(bindings.method(MethodId(0)).unwrap().name, "hashCode");
        assert_eq!(bindings.declared_methods(TypeId(0)).count(), 1);
    }
}
