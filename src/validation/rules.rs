use mongodb::bson::oid::ObjectId;

use crate::services::errors::ServiceError;

const OBJECT_ID_LEN: usize = 24;

/// Returns true when `candidate` is exactly 24 hexadecimal characters, in either case.
pub fn is_valid_object_id(candidate: &str) -> bool {
    candidate.len() == OBJECT_ID_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parses a client-supplied identifier, rejecting malformed input before it reaches storage.
pub fn parse_object_id(candidate: &str) -> Result<ObjectId, ServiceError> {
    if !is_valid_object_id(candidate) {
        return Err(ServiceError::InvalidId(candidate.to_string()));
    }
    ObjectId::parse_str(candidate).map_err(|_| ServiceError::InvalidId(candidate.to_string()))
}
