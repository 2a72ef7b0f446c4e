pub mod agency;
pub mod asset;
pub mod chat;
pub mod client;
pub mod common;
pub mod lead;
pub mod product;
pub mod project;
pub mod quote;
pub mod task;
