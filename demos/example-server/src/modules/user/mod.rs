pub mod controller;
pub mod domain;
pub mod repository;
pub mod service;

pub use controller::{register_replies, router};
pub use domain::{EmailTaken, InvalidUser, UserNotFound};
pub use service::UserService;
