//! Template source resolution and bundle metadata
//!
//! This module provides:
//! - `TemplateSource` classification (local directory vs. remote git URL)
//! - Materialization of remote sources into auto-cleaned temp checkouts
//! - Bundle manifest (`scaffold.yaml`) parsing and version compatibility

pub mod manifest;
pub mod resolver;

pub use manifest::{check_compatibility, BundleManifest};
pub use resolver::{resolve, ResolvedSource, TemplateSource};
