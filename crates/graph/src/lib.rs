//! # Autobind Graph
//!
//! Asset dependency analysis: which assets an asset pulls in, and which
//! prefabs and scenes pull a given asset in, bucketed by asset kind.
//!
//! ## Architecture
//!
//! ```text
//! Project folder / manifest
//!     │
//!     ├──> GraphBuilder
//!     │      ├─ Register every asset (path + kind)
//!     │      ├─ Map .meta GUIDs to asset paths
//!     │      └─ Scan text assets for GUID references → edges
//!     │
//!     ├──> AssetGraph (petgraph)
//!     │      ├─ Nodes: AssetRecord (path, kind)
//!     │      └─ Edges: "A references B"
//!     │
//!     └──> DependencyCategorizer
//!            ├─ DependenciesOf: closure of one asset
//!            ├─ ReferencesTo: prefabs/scenes whose closure holds the asset
//!            └─ One bucket per recognized kind, unknown suffixes dropped
//! ```

mod builder;
mod categorizer;
mod config;
mod error;
mod graph;
mod progress;
mod types;

pub use builder::{AssetManifest, GraphBuilder, ManifestEntry};
pub use categorizer::{Categorization, DependencyCategorizer, Query};
pub use config::ScanConfig;
pub use error::{GraphError, Result};
pub use graph::{AssetGraph, DependencySource};
pub use progress::ProgressSink;
pub use types::{AssetKind, AssetRecord};
