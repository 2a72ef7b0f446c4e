pub mod agency_service;
pub mod asset_service;
pub mod chat_service;
pub mod client_service;
pub mod lead_service;
pub mod product_service;
pub mod project_service;
pub mod quote_service;
pub mod task_service;
