pub mod api;
pub mod date_utils;
pub mod logging;
pub mod pdf;
pub mod storage;
