use dioxus::prelude::*;

use crate::pages::{Admin, Play};
use crate::components::Layout;

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
    #[route("/")]
    Play {},
    #[route("/admin")]
    Admin {},
}
