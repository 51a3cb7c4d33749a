//! Finance enquiries captured from customers, kept in a record collection as JSON.
use crate::core::repayment::{RepaymentInputs, RepaymentResult, compute};
use crate::core::store::RecordCollection;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

pub const COLLECTION: &str = "finance_enquiries";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStatus {
    New,
    Contacted,
    Closed,
}

impl Display for EnquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EnquiryStatus::New => "new",
                EnquiryStatus::Contacted => "contacted",
                EnquiryStatus::Closed => "closed",
            }
        )
    }
}

impl FromStr for EnquiryStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(EnquiryStatus::New),
            "contacted" => Ok(EnquiryStatus::Contacted),
            "closed" => Ok(EnquiryStatus::Closed),
            _ => Err(anyhow!("Invalid enquiry status: {}", s)),
        }
    }
}

/// What a customer submits; the book fills in the rest.
#[derive(Debug, Clone)]
pub struct EnquiryDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub model: Option<String>,
    pub message: Option<String>,
    pub inputs: RepaymentInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceEnquiry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub model: Option<String>,
    pub message: Option<String>,
    pub inputs: RepaymentInputs,
    /// Repayments as quoted when the enquiry came in.
    pub result: RepaymentResult,
    pub status: EnquiryStatus,
}

#[derive(Debug, Clone, Default)]
pub struct EnquiryFilter {
    pub status: Option<EnquiryStatus>,
    /// Case-insensitive match against name, email or model.
    pub search: Option<String>,
}

impl EnquiryFilter {
    fn matches(&self, enquiry: &FinanceEnquiry) -> bool {
        if let Some(status) = self.status
            && enquiry.status != status
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                enquiry.name.to_lowercase().contains(&term)
                    || enquiry.email.to_lowercase().contains(&term)
                    || enquiry
                        .model
                        .as_deref()
                        .is_some_and(|m| m.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }
}

/// Typed access to the enquiry collection.
pub struct EnquiryBook {
    collection: Arc<dyn RecordCollection>,
}

impl EnquiryBook {
    pub fn new(collection: Arc<dyn RecordCollection>) -> Self {
        Self { collection }
    }

    pub async fn add(&self, draft: EnquiryDraft) -> Result<FinanceEnquiry> {
        let name = draft.name.trim();
        if name.is_empty() {
            bail!("Enquiry needs a customer name");
        }
        let email = draft.email.trim();
        if !email.contains('@') {
            bail!("Invalid email address: {}", draft.email);
        }

        let created_at = Utc::now();
        let id = self.next_id(&created_at).await?;
        let enquiry = FinanceEnquiry {
            id,
            created_at,
            name: name.to_string(),
            email: email.to_string(),
            phone: non_blank(draft.phone),
            model: non_blank(draft.model),
            message: non_blank(draft.message),
            result: compute(&draft.inputs),
            inputs: draft.inputs,
            status: EnquiryStatus::New,
        };

        self.save(&enquiry).await?;
        info!(id = %enquiry.id, "Recorded finance enquiry");
        Ok(enquiry)
    }

    pub async fn get(&self, id: &str) -> Result<FinanceEnquiry> {
        let bytes = self
            .collection
            .get(id)
            .await?
            .ok_or_else(|| anyhow!("No enquiry with id {}", id))?;
        serde_json::from_slice(&bytes).with_context(|| format!("Corrupt enquiry record {id}"))
    }

    /// Matching enquiries, newest first.
    pub async fn list(&self, filter: &EnquiryFilter) -> Result<Vec<FinanceEnquiry>> {
        let mut enquiries = Vec::new();
        for (key, bytes) in self.collection.entries().await? {
            match serde_json::from_slice::<FinanceEnquiry>(&bytes) {
                Ok(enquiry) if filter.matches(&enquiry) => enquiries.push(enquiry),
                Ok(_) => {}
                Err(e) => debug!("Skipping unreadable enquiry {}: {}", key, e),
            }
        }
        enquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(enquiries)
    }

    pub async fn set_status(&self, id: &str, status: EnquiryStatus) -> Result<FinanceEnquiry> {
        let mut enquiry = self.get(id).await?;
        if enquiry.status != status {
            debug!(id, from = %enquiry.status, to = %status, "Updating enquiry status");
            enquiry.status = status;
            self.save(&enquiry).await?;
        }
        Ok(enquiry)
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        let removed = self.collection.remove(id).await?;
        if removed {
            info!(id, "Removed finance enquiry");
        }
        Ok(removed)
    }

    async fn save(&self, enquiry: &FinanceEnquiry) -> Result<()> {
        let bytes = serde_json::to_vec(enquiry).context("Failed to encode enquiry")?;
        self.collection.put(&enquiry.id, bytes).await
    }

    /// Ids sort chronologically: `enq-<zero padded epoch millis>`, bumped
    /// until unused so two enquiries in the same millisecond stay distinct.
    async fn next_id(&self, created_at: &DateTime<Utc>) -> Result<String> {
        let mut millis = created_at.timestamp_millis();
        loop {
            let id = format!("enq-{millis:015}");
            if self.collection.get(&id).await?.is_none() {
                return Ok(id);
            }
            millis += 1;
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repayment::Frequency;
    use crate::store::memory::MemoryCollection;

    fn book() -> EnquiryBook {
        EnquiryBook::new(Arc::new(MemoryCollection::new()))
    }

    fn draft(name: &str, model: Option<&str>) -> EnquiryDraft {
        EnquiryDraft {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: Some("0400 000 000".to_string()),
            model: model.map(str::to_string),
            message: Some("   ".to_string()),
            inputs: RepaymentInputs {
                price: 100_000.0,
                deposit: 20_000.0,
                term_years: 5,
                annual_rate_percent: 7.5,
                frequency: Frequency::Weekly,
            },
        }
    }

    #[tokio::test]
    async fn test_add_records_quote_snapshot() {
        let book = book();
        let enquiry = book
            .add(draft("Jo Citizen", Some("Outback Explorer 21")))
            .await
            .unwrap();

        assert!(enquiry.id.starts_with("enq-"));
        assert_eq!(enquiry.status, EnquiryStatus::New);
        assert_eq!(enquiry.result.loan_amount, 80_000.0);
        assert!((enquiry.result.periodic_payment - 369.93).abs() < 0.01);
        assert!(enquiry.message.is_none());

        let stored = book.get(&enquiry.id).await.unwrap();
        assert_eq!(stored, enquiry);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_contact_details() {
        let book = book();

        let mut no_name = draft("Jo Citizen", None);
        no_name.name = "  ".to_string();
        assert!(book.add(no_name).await.is_err());

        let mut bad_email = draft("Jo Citizen", None);
        bad_email.email = "jo.example.com".to_string();
        let err = book.add(bad_email).await.unwrap_err();
        assert!(err.to_string().contains("Invalid email"));

        assert!(book.list(&EnquiryFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_unique_within_a_millisecond() {
        let book = book();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(book.add(draft(&format!("Customer {i}"), None)).await.unwrap().id);
        }
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts_newest_first() {
        let book = book();
        let first = book
            .add(draft("Alex Smith", Some("Coastal Tourer 18")))
            .await
            .unwrap();
        let second = book
            .add(draft("Sam Jones", Some("Outback Explorer 21")))
            .await
            .unwrap();
        book.set_status(&first.id, EnquiryStatus::Contacted)
            .await
            .unwrap();

        let all = book.list(&EnquiryFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        let contacted = book
            .list(&EnquiryFilter {
                status: Some(EnquiryStatus::Contacted),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(contacted.len(), 1);
        assert_eq!(contacted[0].name, "Alex Smith");

        let outback = book
            .list(&EnquiryFilter {
                status: None,
                search: Some("OUTBACK".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(outback.len(), 1);
        assert_eq!(outback[0].id, second.id);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let book = book();
        assert!(book.get("enq-missing").await.is_err());
        assert!(
            book.set_status("enq-missing", EnquiryStatus::Closed)
                .await
                .is_err()
        );
        assert!(!book.remove("enq-missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove() {
        let book = book();
        let enquiry = book.add(draft("Jo Citizen", None)).await.unwrap();

        assert!(book.remove(&enquiry.id).await.unwrap());
        assert!(book.get(&enquiry.id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_skips_corrupt_records() {
        let collection = Arc::new(MemoryCollection::new());
        collection
            .put("enq-garbage", b"not json".to_vec())
            .await
            .unwrap();
        let book = EnquiryBook::new(collection);
        book.add(draft("Jo Citizen", None)).await.unwrap();

        assert_eq!(book.list(&EnquiryFilter::default()).await.unwrap().len(), 1);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "Contacted".parse::<EnquiryStatus>().unwrap(),
            EnquiryStatus::Contacted
        );
        assert!("archived".parse::<EnquiryStatus>().is_err());
        assert_eq!(EnquiryStatus::Closed.to_string(), "closed");
    }
}
