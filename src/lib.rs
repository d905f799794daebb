// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// Library code never unwraps; protocol misuse is an explicit assertion
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Renderer math - index/float casts are intentional
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]

//! CPU ray-tracing renderer driven by a declarative scene description.
//!
//! Umbra renders 2D images by casting rays against analytic primitives,
//! shading hits with classical local illumination, and resolving shadows
//! with secondary rays. Pixel work is spread across every core by a bounded
//! single-producer/multi-consumer work queue; there is no GPU, no window,
//! and no spatial acceleration structure - traversal is linear over the
//! scene.
//!
//! # Key entry points
//!
//! - [`scene::Scene`] - the component store: nodes plus per-family pools of
//!   cameras, bounding volumes, geometries, lights, and materials
//! - [`loader::parse_scene`] - build a scene from its TOML description
//! - [`renderer::Renderer`] - the per-frame driver (`draw`)
//! - [`executor::WorkQueue`] - the worker pool the renderer partitions
//!   pixel rows onto
//!
//! # Architecture
//!
//! A draw resets the ray counters, enumerates light nodes, splits the
//! framebuffer into one row band per worker, and submits a task per band.
//! Every task walks the same read-only scene: camera rays come from the
//! view node's look-at transform, visibility is the nearest-hit reduction
//! over all geometry nodes, and shading runs one shadow probe per light per
//! hit. Pixels leave the core exclusively through the paint callback as
//! packed `0x00RRGGBB` words.

pub mod collision;
pub mod error;
pub mod executor;
pub mod loader;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod shade;
pub mod visibility;

pub use error::UmbraError;
pub use executor::{Executor, InlineExecutor, WaitStrategy, WorkQueue};
pub use renderer::{Framebuffer, PixelBuffer, Renderer};
pub use scene::Scene;
