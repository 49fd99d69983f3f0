pub mod movegen;
pub mod ordering;
pub mod see;

// Re-export move generation functions
pub use movegen::*;
pub use ordering::*;
pub use see::*;
