mod history;
mod round;

pub use history::*;
pub use round::*;
