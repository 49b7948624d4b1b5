use super::entities;

mod add_auction;
mod conclude_auction;
mod get_active_auctions;
mod get_auction;
mod get_auctions;
mod models;

pub use models::*;

pub const AUCTION_PAGE_SIZE_CAP: usize = 100;

#[derive(Debug)]
pub struct Repository {
    pub db: Box<dyn Database>,
}

impl Repository {
    pub fn new(db: impl Database) -> Self {
        Self { db: Box::new(db) }
    }
}
