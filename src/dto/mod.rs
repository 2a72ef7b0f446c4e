pub mod agency_dto;
pub mod asset_dto;
pub mod chat_dto;
pub mod client_dto;
pub mod lead_dto;
pub mod product_dto;
pub mod project_dto;
pub mod quote_dto;
pub mod task_dto;
