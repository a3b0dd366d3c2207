mod policy;
mod route_guards;

pub use policy::{Permission, Policy};
pub use route_guards::protect_route;
