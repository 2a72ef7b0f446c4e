pub mod agency_repo;
pub mod asset_repo;
pub mod chat_repo;
pub mod client_repo;
pub mod lead_repo;
pub mod mongo;
pub mod product_repo;
pub mod project_repo;
pub mod quote_repo;
pub mod repository_error;
pub mod task_repo;
