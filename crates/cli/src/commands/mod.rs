pub mod check;
pub mod extract;
pub mod history;
pub mod list;
pub mod track;
pub mod util;

pub use check::*;
pub use extract::*;
pub use history::*;
pub use list::*;
pub use track::*;
pub use util::*;
