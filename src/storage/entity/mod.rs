pub mod field_boundary;
pub mod form_response;
