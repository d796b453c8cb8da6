pub mod json_response;
