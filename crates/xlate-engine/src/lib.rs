//! Source-preserving translation engine.
//!
//! Translation is driven by the annotated tree but performed on the source
//! text: a [`Cursor`] walks the original text in lockstep with the tree,
//! copying whitespace and comments verbatim and substituting target syntax
//! only where the grammars differ.
//!
//! # Architecture
//!
//! ```text
//! SourceUnit ─▶ unit::translate ─▶ dispatch ─▶ writers::{cpp, csharp, swift}
//!                    │                              │
//!                    │              Cursor · TypeResolver · classify · reshape
//!                    ▼
//!              preamble + body ─▶ TranslatedUnit
//! ```
//!
//! Every piece of per-unit state lives in a [`UnitContext`]; units share
//! nothing but the read-only [`BackendPolicy`](xlate_config::BackendPolicy).

mod classify;
mod context;
mod cursor;
mod dispatch;
mod error;
mod output;
mod reshape;
mod resolve;
mod unit;
mod writers;

pub use classify::{classify, find_overridden, Overridability};
pub use context::{TypeScope, UnitContext};
pub use cursor::{Coverage, Cursor, Mark};
pub use error::{Result, TranslateError};
pub use output::OutputStack;
pub use reshape::{declaration_kind, reshape, MemberGroup};
pub use resolve::{RenderedType, TypeResolver};
pub use unit::{translate, Artifact, ArtifactKind, TranslatedUnit};
