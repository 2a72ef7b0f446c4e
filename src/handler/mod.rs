pub mod agency_handler;
pub mod asset_handler;
pub mod chat_handler;
pub mod client_handler;
pub mod lead_handler;
pub mod product_handler;
pub mod project_handler;
pub mod quote_handler;
pub mod task_handler;

use std::collections::HashMap;

use bson::oid::ObjectId;

use crate::util::error::HandlerError;

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw)
        .map_err(|_| HandlerError::bad_request(format!("Invalid {}: {}", what, raw)))
}

pub(crate) fn parse_optional_id(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<ObjectId>, HandlerError> {
    params
        .get(key)
        .map(|raw| parse_id(raw, key))
        .transpose()
}

pub(crate) fn pagination(params: &HashMap<String, String>) -> (u32, u32) {
    let page = params.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let limit = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    (page, limit)
}
