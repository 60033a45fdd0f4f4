//! Node writers, one module per backend.

pub mod common;
pub mod cpp;
pub mod csharp;
pub mod swift;
