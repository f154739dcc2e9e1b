pub mod app_config;
pub mod form;
pub mod secret;
pub mod sink;
pub mod template;
pub mod web;
