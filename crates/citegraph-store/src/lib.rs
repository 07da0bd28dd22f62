//! citegraph-store: stage output layout and manifests
//!
//! Every stage writes into its own directory under the output root and
//! leaves a `manifest.json` there recording what went in (blake3 of the
//! content-affecting config), what came out (per-file blake3), and row
//! counts. `status` reads them back.

pub mod hash;
pub mod manifest;
pub mod stage;

pub use hash::{hash_dir, hash_file, short_hash};
pub use manifest::{MANIFEST_FILE, StageManifest};
pub use stage::{StageInput, StageName};
