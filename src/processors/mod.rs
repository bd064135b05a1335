// webpify/src/processors/mod.rs
mod compressor;
mod editor;
mod loader;
mod resizer;
mod storage;

pub use compressor::Compressor;
pub use editor::{ImageEditor, RasterEditor, RasterImage};
pub use loader::Loader;
pub use resizer::{ResizeAlgorithm, Resizer, fit_within};
pub use storage::{LocalStorage, Storage};
