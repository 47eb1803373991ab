mod config;
mod dialect_router;
mod errors;
