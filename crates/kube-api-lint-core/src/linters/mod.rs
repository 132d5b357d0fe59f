//! Settings of the configurable rules, from the `[linters]` table.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! LintersConfig (validated model)
//!   ↓ rules read their section
//! ```

pub mod config_dto;
pub mod loader;
pub mod model;

pub use loader::LoadError;
pub use model::{
    ConditionsConfig, ConditionsPolicy, ConflictSet, Dependency, FirstFieldPolicy, FixPolicy,
    JsonTagPattern, LintersConfig, MarkerScopeConfig, ModelError, NamingConvention,
    NamingOperation, NoMapsPolicy, NoReferencesPolicy, NumericBounds, OmitEmptyPolicy,
    OmitZeroPolicy, OptionalFieldsConfig, OptionalOrRequiredConfig, PointerPreference,
    RequiredFieldsConfig, UniqueMarker,
};
