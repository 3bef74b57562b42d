pub mod deepseek;
pub(crate) mod http_errors;
