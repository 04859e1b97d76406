pub mod fragment_query;
pub mod fragment_response;
