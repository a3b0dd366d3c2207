mod event;
mod reward;
mod reward_request;
mod status;

pub mod dtos {
    pub use crate::event::dtos::*;
    pub use crate::reward::dtos::*;
    pub use crate::reward_request::dtos::*;
}

pub use crate::event::api::*;
pub use crate::reward::api::*;
pub use crate::reward_request::api::*;
pub use crate::status::api::*;
