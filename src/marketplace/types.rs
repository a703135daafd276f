// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wire and API types for marketplace listings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A raw listing row from the chain-indexing provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Mint address of the listed asset
    pub mint: String,
    /// Seller's wallet address
    pub seller: String,
    /// Asking price, decimal string as indexed on chain
    pub price: String,
    /// Whether the listing is currently open
    pub is_active: bool,
    /// Address of the on-chain listing account
    pub pubkey: String,
}

/// On-chain metadata for a single asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// Asset name
    pub name: String,
    /// Asset symbol
    pub symbol: String,
    /// Image URL, if the asset carries one
    #[serde(default)]
    pub image: Option<String>,
    /// Group (collection) address, if the asset belongs to one
    #[serde(default)]
    pub group: Option<String>,
}

/// A listing joined with its asset metadata; the unit the API serves.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NftDetail {
    /// Asset name
    pub name: String,
    /// Asset symbol
    pub symbol: String,
    /// Image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Group (collection) address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Mint address
    pub mint: String,
    /// Seller's wallet address
    pub seller: String,
    /// Asking price
    pub price: String,
    /// Address of the on-chain listing account
    pub listing: String,
    /// Collection identifier used for filtering (the group address, empty
    /// when the asset has none)
    pub collection: String,
}

impl NftDetail {
    /// Join a listing row with its asset metadata.
    pub fn assemble(listing: &Listing, metadata: AssetMetadata) -> Self {
        let collection = metadata.group.clone().unwrap_or_default();
        Self {
            name: metadata.name,
            symbol: metadata.symbol,
            image: metadata.image,
            group: metadata.group,
            mint: listing.mint.clone(),
            seller: listing.seller.clone(),
            price: listing.price.clone(),
            listing: listing.pubkey.clone(),
            collection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_joins_listing_and_metadata() {
        let listing = Listing {
            mint: "Mint1111".to_string(),
            seller: "Seller11".to_string(),
            price: "2.5".to_string(),
            is_active: true,
            pubkey: "Listing1".to_string(),
        };
        let metadata = AssetMetadata {
            name: "Jacket #1".to_string(),
            symbol: "JKT".to_string(),
            image: Some("https://img.example/1.png".to_string()),
            group: Some("Group111".to_string()),
        };

        let detail = NftDetail::assemble(&listing, metadata);
        assert_eq!(detail.name, "Jacket #1");
        assert_eq!(detail.mint, "Mint1111");
        assert_eq!(detail.listing, "Listing1");
        assert_eq!(detail.collection, "Group111");
    }

    #[test]
    fn assemble_without_group_leaves_collection_empty() {
        let listing = Listing {
            mint: "Mint1111".to_string(),
            seller: "Seller11".to_string(),
            price: "2.5".to_string(),
            is_active: true,
            pubkey: "Listing1".to_string(),
        };
        let metadata = AssetMetadata {
            name: "Jacket #1".to_string(),
            symbol: "JKT".to_string(),
            image: None,
            group: None,
        };

        let detail = NftDetail::assemble(&listing, metadata);
        assert!(detail.collection.is_empty());
        assert!(detail.group.is_none());
    }
}
