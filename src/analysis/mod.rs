pub mod align;
pub mod correlation;

pub use align::align_and_scale;
pub use correlation::analyze;
