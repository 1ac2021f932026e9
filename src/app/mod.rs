pub mod auth;
pub mod engagement;
pub mod error;
pub mod posts;
pub mod search;
pub mod social;
pub mod spin;
pub mod users;
