// src/lib.rs

use services::quotes::QuoteService;

#[derive(Clone)]
pub struct AppState {
    pub quotes: QuoteService,
    pub list_limit: usize,
    pub service_name: String,
}

pub mod services {
    pub mod provider;
    pub mod yahoo;
    pub mod symbols;
    pub mod price_utils;
    pub mod quotes;
}

pub mod models {
    pub mod quote;
    pub mod health;
}

pub mod handlers {
    pub mod crypto;
    pub mod search;
    pub mod health;
}

pub mod config;
pub mod error;
pub mod routes;
