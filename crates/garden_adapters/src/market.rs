//! Market adapter: creates trade listings from core state.
//!
//! Listing an item debits it locally through the engine at the moment of
//! creation. The debit is optimistic: if the remote publish fails the
//! local debit stands and the failure is reported to the caller. Buying
//! is out of scope; listings are read back for display only.

use garden_core::engine::{Action, Engine};
use garden_core::error::GameError;
use garden_core::events::MarketItem;
use garden_core::growth::Timestamp;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::error::AdapterError;

/// An open trade listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketListing {
    /// What is for sale.
    pub item: MarketItem,
    /// Quantity listed.
    pub quantity: f64,
    /// Asking price.
    pub price: f64,
    /// Seller's player name.
    pub seller: String,
    /// When the listing was created.
    pub listed_at: Timestamp,
}

/// The market collaborator's interface.
pub trait MarketBoard {
    /// Publish a new listing.
    ///
    /// # Errors
    /// Returns [`AdapterError::Market`] on failure.
    fn publish(&mut self, listing: MarketListing) -> Result<(), AdapterError>;

    /// Fetch the open listings, newest first.
    ///
    /// # Errors
    /// Returns [`AdapterError::Market`] on failure.
    fn open_listings(&self) -> Result<Vec<MarketListing>, AdapterError>;
}

/// Why a listing attempt failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListingError {
    /// The engine rejected the listing; nothing was debited.
    #[error(transparent)]
    Rejected(#[from] GameError),
    /// The remote publish failed after the local debit. The debit is not
    /// rolled back.
    #[error(transparent)]
    Remote(#[from] AdapterError),
}

/// Create a listing: debit the item locally through the engine, then
/// publish the record to the board.
///
/// # Errors
/// Returns [`ListingError::Rejected`] if the engine refuses (unowned
/// seed, unaffordable quantity) - state is untouched. Returns
/// [`ListingError::Remote`] if the publish fails - the local debit
/// stands.
pub fn list_item<R: RngCore>(
    engine: &mut Engine<R>,
    board: &mut impl MarketBoard,
    item: MarketItem,
    quantity: f64,
    price: f64,
    now: Timestamp,
) -> Result<MarketListing, ListingError> {
    engine.apply(
        Action::ListOnMarket {
            item: item.clone(),
            quantity,
            price,
        },
        now,
    )?;

    let listing = MarketListing {
        item,
        quantity,
        price,
        seller: engine.state().player_name.clone(),
        listed_at: now,
    };
    if let Err(err) = board.publish(listing.clone()) {
        warn!(%err, item = listing.item.item_id(), "listing published locally but remote write failed");
        return Err(err.into());
    }
    Ok(listing)
}

/// In-memory board, for tests and offline play.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarket {
    listings: Vec<MarketListing>,
}

impl InMemoryMarket {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarketBoard for InMemoryMarket {
    fn publish(&mut self, listing: MarketListing) -> Result<(), AdapterError> {
        self.listings.push(listing);
        Ok(())
    }

    fn open_listings(&self) -> Result<Vec<MarketListing>, AdapterError> {
        let mut listings = self.listings.clone();
        listings.sort_by(|a, b| b.listed_at.cmp(&a.listed_at));
        Ok(listings)
    }
}
