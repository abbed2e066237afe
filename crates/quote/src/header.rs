use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Free-form display fields shown at the top of the rendered quote. No
/// cross-field invariants; the date also drives the download filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteHeader {
    pub title: String,
    pub company: String,
    pub tax_id: String,
    pub phone: String,
    pub email: String,
    pub date: NaiveDate,
}

impl QuoteHeader {
    /// An all-empty header dated `date` (session start).
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            tax_id: String::new(),
            phone: String::new(),
            email: String::new(),
            date,
        }
    }
}
