use serde::Deserialize;

use crate::{
    error::AppError,
    transactions::repo_types::{
        ListOptions, OrderBy, OrderDirection, TransactionInput, TransactionStatus,
        TransactionType,
    },
};

const MAX_ITEMS_PER_PAGE: u32 = 100;

/// Body for create and update.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    pub category_id: String,
}

impl TransactionRequest {
    pub fn into_input(self) -> Result<TransactionInput, AppError> {
        if !self.amount.is_finite() {
            return Err(AppError::BadRequest("amount must be a finite number".into()));
        }
        let category_id = self.category_id.trim().to_string();
        if category_id.is_empty() {
            return Err(AppError::BadRequest("category_id is required".into()));
        }
        Ok(TransactionInput {
            amount: self.amount,
            kind: self.kind,
            status: self.status,
            category_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page_number: u32,
    #[serde(default = "default_items")]
    pub items_per_page: u32,
    #[serde(default)]
    pub order_by: OrderBy,
    #[serde(default)]
    pub order_direction: OrderDirection,
}
fn default_page() -> u32 {
    1
}
fn default_items() -> u32 {
    20
}

impl Pagination {
    pub fn into_options(self) -> Result<ListOptions, AppError> {
        if self.page_number == 0 {
            return Err(AppError::BadRequest("page_number starts at 1".into()));
        }
        if !(1..=MAX_ITEMS_PER_PAGE).contains(&self.items_per_page) {
            return Err(AppError::BadRequest(format!(
                "items_per_page must be between 1 and {MAX_ITEMS_PER_PAGE}"
            )));
        }
        Ok(ListOptions {
            page_number: self.page_number,
            items_per_page: self.items_per_page,
            order_by: self.order_by,
            order_direction: self.order_direction,
        })
    }
}
