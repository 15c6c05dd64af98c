//! Device-agnostic drawing: the draw target nodes paint through, the display
//! list it records into, colors, font metrics and the backends that consume
//! display lists.

pub mod backend;
pub mod backends;

mod color;
pub use color::*;

mod font;
pub use font::*;

mod render_list;
pub use render_list::*;

mod viewport;

pub use viewport::Viewport;
