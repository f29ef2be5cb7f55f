pub mod http_page;
pub mod util;
pub mod yahoo_finance;
