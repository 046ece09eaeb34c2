//! First-run seed data.
//!
//! Mirrors the original bootstrap: default admin/user accounts, a small
//! starter shelf and the read-only tour catalog. Collections that already
//! hold records are left untouched.

use serde_json::json;
use tracing::info;

use crate::domain::auth::{hash_password, json_object};
use crate::domain::error::Error;
use crate::storage::collections;
use crate::storage::store::RecordStore;

pub async fn initialize_data(store: &RecordStore) -> Result<(), Error> {
    if store.read_all(collections::USERS).await?.is_empty() {
        info!("seeding default users");
        for user in [
            json!({
                "name": "Admin User",
                "email": "admin@library.com",
                "password": hash_password("admin123"),
                "role": "admin",
                "borrowedBooks": [],
            }),
            json!({
                "name": "Regular User",
                "email": "user@library.com",
                "password": hash_password("user123"),
                "role": "user",
                "borrowedBooks": [],
            }),
        ] {
            store.create(collections::USERS, json_object(user)).await?;
        }
    }

    if store.read_all(collections::BOOKS).await?.is_empty() {
        info!("seeding default books");
        for book in [
            json!({
                "title": "The Great Gatsby",
                "author": "F. Scott Fitzgerald",
                "isbn": "9780743273565",
                "category": "Fiction",
                "quantity": 5,
                "available": 5,
                "description": "A classic American novel",
            }),
            json!({
                "title": "To Kill a Mockingbird",
                "author": "Harper Lee",
                "isbn": "9780061120084",
                "category": "Fiction",
                "quantity": 3,
                "available": 3,
                "description": "A gripping tale of racial injustice",
            }),
            json!({
                "title": "1984",
                "author": "George Orwell",
                "isbn": "9780451524935",
                "category": "Science Fiction",
                "quantity": 4,
                "available": 4,
                "description": "Dystopian social science fiction",
            }),
        ] {
            store.create(collections::BOOKS, json_object(book)).await?;
        }
    }

    if store.read_all(collections::TOURS).await?.is_empty() {
        info!("seeding tour catalog");
        for tour in [
            json!({
                "name": "Santorini Sunset Escape",
                "location": "Santorini, Greece",
                "description": "Cliffside villages, volcanic beaches and the famous Oia sunset.",
                "price": 1299.0,
                "duration": "7 days",
                "rating": 4.8,
                "reviews": 214,
                "highlights": ["Oia sunset cruise", "Wine tasting", "Caldera hike"],
                "images": ["santorini-1.jpg", "santorini-2.jpg"],
            }),
            json!({
                "name": "Kyoto Temples & Gardens",
                "location": "Kyoto, Japan",
                "description": "A week among shrines, bamboo groves and tea houses.",
                "price": 1890.0,
                "duration": "8 days",
                "rating": 4.9,
                "reviews": 187,
                "highlights": ["Fushimi Inari at dawn", "Arashiyama bamboo grove", "Tea ceremony"],
                "images": ["kyoto-1.jpg"],
            }),
            json!({
                "name": "Patagonia Trekking Adventure",
                "location": "Torres del Paine, Chile",
                "description": "Guided W-circuit trek through granite towers and glacial lakes.",
                "price": 2450.0,
                "duration": "10 days",
                "rating": 4.7,
                "reviews": 96,
                "highlights": ["Base of the Towers", "Grey Glacier", "French Valley"],
                "images": ["patagonia-1.jpg", "patagonia-2.jpg"],
            }),
            json!({
                "name": "Marrakech Medina & Desert",
                "location": "Marrakech, Morocco",
                "description": "Souks, riads and two nights under Sahara stars.",
                "price": 980.0,
                "duration": "6 days",
                "rating": 4.5,
                "reviews": 142,
                "highlights": ["Jemaa el-Fnaa", "Atlas foothills", "Camel trek"],
                "images": ["marrakech-1.jpg"],
            }),
        ] {
            store.create(collections::TOURS, json_object(tour)).await?;
        }
    }

    Ok(())
}
