pub mod request_id;

pub use request_id::{request_id_layer, stamp_error_request_id, RequestIdExt};
