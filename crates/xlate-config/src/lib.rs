//! Backend rendering policies and the `xlate.toml` configuration format.
//!
//! Every backend starts from a built-in profile ([`BackendPolicy::cpp`],
//! [`BackendPolicy::csharp`], [`BackendPolicy::swift`]); a configuration file
//! may override any key of any profile.
//!
//! # Example
//!
//! ```toml
//! # xlate.toml
//! [cpp]
//! indent_width = 2
//! string_type = "xuniv::String"
//! primitive_types = { long = "long long" }
//! reference_policy = [
//!     { category = "reference", site = "local_variable", kind = "value" },
//! ]
//! ```

mod backend;
mod error;
mod file;
mod policy;

pub use backend::{
    Backend, DeclarationKind, DeclarationSite, GroupingBucket, PolicyRule, ReferenceKind,
    TypeCategory,
};
pub use error::{ConfigError, Result};
pub use file::{BackendOverrides, TranslatorConfig};
pub use policy::BackendPolicy;
