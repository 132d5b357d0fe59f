//! # kube-api-lint-core
//!
//! Core framework for linting Kubernetes-style API type declarations.
//!
//! The input is a snapshot of already-parsed declarations (types, fields,
//! doc comments, struct tags, constants). This crate provides:
//!
//! - the marker parser and [`MarkerSet`] registry
//! - the [`TypeGraph`] that resolves named types, aliases and pointers
//! - the [`ZeroValueAnalyzer`] for serialization checks
//! - the [`ScopeResolver`] for marker placement
//! - the [`Rule`] trait and the [`Analyzer`] that runs rules
//! - [`Diagnostic`] types and output [`emit`]ters
//!
//! ## Example
//!
//! ```ignore
//! use kube_api_lint_core::{Analyzer, Config, Snapshot};
//!
//! let snapshot: Snapshot = serde_json::from_str(&input)?;
//! let analyzer = Analyzer::builder()
//!     .snapshot(snapshot)
//!     .rule(MyRule::new())
//!     .config(Config::default())
//!     .build()?;
//!
//! let result = analyzer.analyze();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
pub mod catalog;
mod config;
mod context;
pub mod emit;
pub mod linters;
pub mod markers;
mod rule;
pub mod scope;
pub mod source;
pub mod tags;
pub mod typegraph;
mod types;
pub mod zero;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use catalog::{MarkerCatalog, SchemaKind, Scope};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{DeclContext, PackageContext};
pub use markers::{Marker, MarkerKey, MarkerPattern, MarkerSet};
pub use rule::{Rule, RuleBox};
pub use scope::{ScopeResolver, ScopeViolation};
pub use source::{
    CommentLine, ConstDecl, ConstValue, DeclKind, Declaration, FieldDecl, Package, Snapshot,
    TagLiteral, TypeDecl, TypeExpr,
};
pub use typegraph::{TypeDescriptor, TypeGraph, TypeKind};
pub use types::{Diagnostic, DiagnosticReport, Label, LintResult, Location, Replacement, Suggestion};
pub use zero::{ZeroValue, ZeroValueAnalyzer};
