mod admin;
mod play;

pub use admin::Admin;
pub use play::Play;
