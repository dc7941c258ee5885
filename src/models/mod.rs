pub mod advisory;
pub mod inputs;
pub mod rule;
pub mod translation;
pub mod weather;

pub use advisory::*;
pub use inputs::*;
pub use rule::*;
pub use translation::*;
pub use weather::*;
