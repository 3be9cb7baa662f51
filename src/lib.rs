// Library for tests to access modules

pub mod brain_repo;
pub mod config;
pub mod models;
pub mod monitor;
pub mod poller;
pub mod routes;
pub mod version;
pub mod view;
