pub mod factory;
pub mod notification;
pub mod repositories;
