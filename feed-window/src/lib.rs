mod live_set;
pub use live_set::*;
mod optimizer;
pub use optimizer::*;
mod verify;
pub use verify::*;
