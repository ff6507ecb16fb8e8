/// State management module
/// 
/// This module holds everything the window knows about the current job:
/// - Which images the user picked (selection.rs)
/// - The garment category enumeration (category.rs)
/// - Sampling parameters sent with every request (params.rs)
pub mod selection;
pub mod category;
pub mod params;

pub use category::Category;
pub use params::SamplingParams;
pub use selection::{Selection, Slot, TryOnRequest};
