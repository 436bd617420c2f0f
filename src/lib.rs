//! Embed a directory of files into a generated Rust source file.
//!
//! The pipeline is: [`find_assets`] walks a directory into an ordered list of
//! [`Asset`]s, an [`AssetEmbedder`] encodes each with a [`Strategy`], and the
//! result is rendered as a module exposing one loader function that returns
//! every file's bytes keyed by its `/`-rooted path.
//!
//! ```no_run
//! use assetembed::{EmbedOptions, Encoding, find_assets};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = EmbedOptions {
//!     encoding: Encoding::Zbase64,
//!     concurrent: true,
//!     ..EmbedOptions::default()
//! };
//! let assets = find_assets("static")?;
//! let mut out = Vec::new();
//! let written = options
//!     .embedder()
//!     .embed(&mut out, assets, "assets", "load_assets")?;
//! std::fs::write("src/assets_generated.rs", &out)?;
//! println!("wrote {written} bytes");
//! # Ok(())
//! # }
//! ```
//!
//! The generated file depends only on `std` plus whichever of `hex`,
//! `base64` and `flate2` the chosen encoding's decoder imports.

pub mod asset;
pub mod engine;
pub mod error;
pub mod literal;
pub mod render;
pub mod strategy;
pub mod verify;

pub use asset::{Asset, EncodedAsset, find_assets};
pub use engine::{AssetEmbedder, ConcurrentEmbedder, EmbedOptions, SequentialEmbedder};
pub use error::{DecodeError, EmbedError};
pub use strategy::{Encoding, Strategy, check_round_trip};
