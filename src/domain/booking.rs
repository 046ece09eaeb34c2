//! Tour catalog queries and booking creation.
//!
//! Tours are read-only reference data; the only write this module performs
//! is appending to the `bookings` collection. Single linear flow, no other
//! collections involved.

use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::auth::json_object;
use crate::domain::error::Error;
use crate::domain::model::{Booking, BookingStatus, Tour};
use crate::storage::collections;
use crate::storage::store::RecordStore;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub enum TourSort {
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[serde(rename = "rating")]
    Rating,
}

/// Optional query filters for the tour listing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourFilter {
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub duration: Option<String>,
    pub search: Option<String>,
    pub sort: Option<TourSort>,
}

/// Read-only provider over the `tours` reference collection.
#[derive(Clone)]
pub struct TourCatalog {
    store: RecordStore,
}

impl TourCatalog {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Tour>, Error> {
        let records = self.store.read_all(collections::TOURS).await?;
        records
            .into_iter()
            .map(|v| self.store.decode(collections::TOURS, v))
            .collect()
    }

    pub async fn list(&self, filter: &TourFilter) -> Result<Vec<Tour>, Error> {
        let mut tours = self.load().await?;

        if let Some(location) = &filter.location {
            let needle = location.to_lowercase();
            tours.retain(|t| t.location.to_lowercase().contains(&needle));
        }
        if let Some(max) = filter.max_price {
            tours.retain(|t| t.price <= max);
        }
        if let Some(min) = filter.min_price {
            tours.retain(|t| t.price >= min);
        }
        if let Some(duration) = &filter.duration {
            let needle = duration.to_lowercase();
            tours.retain(|t| t.duration.to_lowercase().contains(&needle));
        }
        if let Some(term) = &filter.search {
            let needle = term.to_lowercase();
            tours.retain(|t| {
                t.name.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle)
                    || t.location.to_lowercase().contains(&needle)
            });
        }

        match filter.sort {
            Some(TourSort::PriceAsc) => {
                tours.sort_by(|a, b| a.price.total_cmp(&b.price));
            }
            Some(TourSort::PriceDesc) => {
                tours.sort_by(|a, b| b.price.total_cmp(&a.price));
            }
            Some(TourSort::Rating) => {
                tours.sort_by(|a, b| b.rating.total_cmp(&a.rating));
            }
            None => {}
        }
        Ok(tours)
    }

    pub async fn get(&self, tour_id: i64) -> Result<Option<Tour>, Error> {
        Ok(self.load().await?.into_iter().find(|t| t.id == tour_id))
    }

    /// Unique locations, first-seen order.
    pub async fn destinations(&self) -> Result<Vec<String>, Error> {
        let tours = self.load().await?;
        let mut seen = Vec::new();
        for tour in tours {
            if !seen.contains(&tour.location) {
                seen.push(tour.location);
            }
        }
        Ok(seen)
    }
}

/// Already-validated booking fields (shape checks live at the HTTP boundary).
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tour_id: i64,
    pub date: String,
    pub travelers: i64,
    pub special_requests: String,
}

#[derive(Clone)]
pub struct BookingService {
    store: RecordStore,
    catalog: TourCatalog,
}

impl BookingService {
    pub fn new(store: RecordStore, catalog: TourCatalog) -> Self {
        Self { store, catalog }
    }

    pub async fn create(&self, request: NewBooking) -> Result<Booking, Error> {
        let tour = self
            .catalog
            .get(request.tour_id)
            .await?
            .ok_or(Error::NotFound("Tour"))?;

        let total_price = tour.price * request.travelers as f64;

        let fields = json_object(json!({
            "name": request.name,
            "email": request.email,
            "phone": request.phone,
            "tourId": request.tour_id,
            "tourName": tour.name,
            "date": request.date,
            "travelers": request.travelers,
            "totalPrice": total_price,
            "specialRequests": request.special_requests,
            "status": BookingStatus::Pending,
        }));
        let stored = self.store.create(collections::BOOKINGS, fields).await?;
        let booking: Booking = self.store.decode(collections::BOOKINGS, stored)?;
        info!(booking = booking.id, tour = booking.tour_id, "booking created");
        Ok(booking)
    }

    /// All bookings, newest first.
    pub async fn list(&self) -> Result<Vec<Booking>, Error> {
        let records = self.store.read_all(collections::BOOKINGS).await?;
        let mut bookings: Vec<Booking> = records
            .into_iter()
            .map(|v| self.store.decode(collections::BOOKINGS, v))
            .collect::<Result<_, _>>()?;
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}
