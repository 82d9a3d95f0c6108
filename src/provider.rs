//! Provider-facing descriptors (data), configuration, and the registry seam.
//!
//! `descriptor` exposes validated endpoint metadata and provider quirks. `config` holds the
//! host-supplied credentials applied after construction. `registry` defines the object-safe
//! [`AuthProvider`] trait the host framework calls and the name-keyed [`ProviderRegistry`]
//! that instantiates providers.

pub mod config;
pub mod descriptor;
pub mod registry;

pub use config::*;
pub use descriptor::*;
pub use registry::*;
