pub mod errors;
pub mod http_handlers;
pub mod middleware;
pub mod pagination;
pub mod routes;
