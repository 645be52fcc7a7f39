//! Kerning maintenance passes over a font's kerning tables.
//!
//! Every pass works against the [`KerningTable`] capability set rather than a
//! concrete font model, so the same code runs on a single UFO, on all masters
//! of a Designspace, or on an in-memory [`MemoryFont`].

pub mod designspace;
mod error;
pub mod memory;
mod norad_interop;
pub mod palette;
pub mod round;
pub mod small_figures;
pub mod table;

pub use designspace::DesignspaceFont;
pub use error::Error;
pub use memory::MemoryFont;
pub use norad_interop::DEFAULT_CONTEXT;
pub use palette::{palettize_kerning, PaletteMapping, PaletteOutcome, PaletteReport, ValueSpan};
pub use round::{round_kerning, RoundReport};
pub use small_figures::{copy_small_figure_kerning, CopyReport, FigureSet};
pub use table::{KerningEntry, KerningTable};
