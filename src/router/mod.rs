pub mod agency_router;
pub mod asset_router;
pub mod chat_router;
pub mod client_router;
pub mod lead_router;
pub mod product_router;
pub mod project_router;
pub mod quote_router;
pub mod task_router;
