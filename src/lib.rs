//! Passport photo sheet layout and compositing.
//!
//! Distributes one or more source photos over a printable sheet, sizes and
//! places the tiles, fit-crops every source to the tile aspect ratio, and
//! composites a lossless print-ready sheet.
//!
//! The geometry stage is pure integer/float math, `no_std` + `alloc`
//! compatible. Pixel work lives behind the `render` feature.
//!
//! # Modules
//!
//! - [`catalog`]: Cataloged sheets and layouts (`"4x6-8"`, `"A4-36"`, ...)
//! - [`distribution`]: Even slot distribution across source images
//! - [`geometry`]: Tile sizing and cell placement
//! - [`crop`]: Centered fit-crop to the tile aspect ratio
//! - [`plan`]: [`SheetPlan`], every rectangle of a sheet computed up front
//! - [`options`]: [`SheetOptions`] configuration
//! - `render`: Decoding and compositing (feature `render`)
//! - `generate`: End-to-end PNG generation (feature `render`)
//! - `session`: Single-user upload/select/generate workflow (feature `render`)
//! - `svg`: Vector preview of a plan (feature `svg`)
//!
//! # Example
//!
//! ```
//! use photosheet::{SheetOptions, SheetPlan, resolve};
//!
//! let (layout, sheet) = resolve("4x6-10").unwrap();
//! let plan = SheetPlan::new(layout, sheet, 3, &SheetOptions::default()).unwrap();
//!
//! assert_eq!(plan.assignment().counts(), &[4, 3, 3]);
//! assert_eq!(plan.tile_size().width, 702);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod catalog;
pub mod crop;
pub mod distribution;
pub mod error;
pub mod geometry;
pub mod options;
pub mod plan;

#[cfg(feature = "render")]
pub mod generate;
#[cfg(feature = "render")]
pub mod render;
#[cfg(feature = "render")]
pub mod session;
#[cfg(feature = "svg")]
pub mod svg;

pub use catalog::{LAYOUTS, LayoutSpec, PRINT_DPI, SHEETS, SheetSpec, resolve};
pub use crop::fit_crop;
pub use distribution::{SlotAssignment, distribution};
pub use error::{Missing, SheetError};
pub use geometry::{Rect, Size, TileGeometry};
pub use options::{LabelMode, Resample, SheetOptions, TileSizeMm, parse_hex_rgb};
pub use plan::{Badge, SheetPlan, TilePlacement};

#[cfg(feature = "render")]
pub use generate::{EncodedSheet, SheetGenerator, generate_sheet};
#[cfg(feature = "render")]
pub use render::{BackgroundFill, BackgroundOptions, FillOutcome, SourceImage};
#[cfg(feature = "render")]
pub use session::{PhotoStats, SheetSession};
