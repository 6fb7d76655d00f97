//! Catalog route handlers.
//!
//! Read-only views over the scheduling backend's reference data, shaped
//! for display (formatted prices) rather than raw passthrough.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use marigold_core::{ServiceId, StylistId};

use crate::error::Result;
use crate::services::{Service, Stylist};
use crate::state::AppState;

/// Service display data.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub duration_minutes: u32,
}

/// Stylist display data.
#[derive(Debug, Clone, Serialize)]
pub struct StylistView {
    pub id: StylistId,
    pub name: String,
    pub specializations: Vec<String>,
}

/// Format a decimal price for display.
fn format_price(price: Decimal) -> String {
    format!("${price:.2}")
}

impl From<&Service> for ServiceView {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            price: format_price(service.price),
            duration_minutes: service.duration_minutes,
        }
    }
}

impl From<&Stylist> for StylistView {
    fn from(stylist: &Stylist) -> Self {
        Self {
            id: stylist.id.clone(),
            name: stylist.name.clone(),
            specializations: stylist.specializations.clone(),
        }
    }
}

/// List bookable services.
///
/// GET /api/services
#[instrument(skip(state))]
pub async fn services(State(state): State<AppState>) -> Result<Json<Vec<ServiceView>>> {
    let services = state.catalog().services().await?;
    Ok(Json(services.iter().map(ServiceView::from).collect()))
}

/// List bookable stylists. May legitimately be empty.
///
/// GET /api/stylists
#[instrument(skip(state))]
pub async fn stylists(State(state): State<AppState>) -> Result<Json<Vec<StylistView>>> {
    let stylists = state.catalog().stylists().await?;
    Ok(Json(stylists.iter().map(StylistView::from).collect()))
}
