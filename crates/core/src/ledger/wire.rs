//! Request and response shapes of the budget service rollup endpoint.

use metas_shared::types::{ActivityId, AreaId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::LedgerFetchError;
use super::types::{AreaBudgetCeiling, CeilingSnapshot, CommitmentRollup};

/// Parameters of a rollup lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    /// Area whose ceiling is looked up.
    pub area_id: AreaId,
    /// Fiscal year, taken from the activity's effective date.
    pub year: i32,
    /// Draft budget, for the "as if saved" estimate.
    #[serde(with = "rust_decimal::serde::float")]
    pub draft_budget: Decimal,
    /// Activity being edited; excluded from the committed sum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<ActivityId>,
}

/// Successful rollup response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResponse {
    /// Current ceiling for the area and year.
    pub ceiling: CeilingSnapshot,
    /// Sum of the other saved activities.
    pub committed: Decimal,
    /// `ceiling.total - committed`, as computed by the service.
    pub available: Decimal,
}

impl LedgerResponse {
    /// Turns the response into a rollup for the query that produced it.
    #[must_use]
    pub fn into_rollup(self, query: &LedgerQuery) -> CommitmentRollup {
        let ceiling = AreaBudgetCeiling {
            area_id: query.area_id,
            fiscal_year: query.year,
            is_current: true,
            snapshot: self.ceiling,
        };
        CommitmentRollup::new(ceiling, self.committed, self.available, query.draft_budget)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed {
        #[serde(default)]
        code: Option<String>,
        message: String,
    },
    Message(String),
}

/// Extracts the service's error envelope `{"error": {...}}`, if the body carries one.
#[must_use]
pub fn parse_error_envelope(value: &Value) -> Option<LedgerFetchError> {
    value.get("error")?;
    let envelope = ErrorEnvelope::deserialize(value).ok()?;
    Some(match envelope.error {
        ErrorBody::Detailed { code, message } => LedgerFetchError::Service { code, message },
        ErrorBody::Message(message) => LedgerFetchError::Service {
            code: None,
            message,
        },
    })
}

/// Parses a rollup response body.
///
/// # Errors
///
/// Returns `LedgerFetchError::Service` when the body is an error envelope and
/// `LedgerFetchError::MalformedResponse` when it has neither shape.
pub fn parse_ledger_response(value: &Value) -> Result<LedgerResponse, LedgerFetchError> {
    if let Some(err) = parse_error_envelope(value) {
        return Err(err);
    }
    LedgerResponse::deserialize(value).map_err(|e| LedgerFetchError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::CeilingStatus;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn query(draft: Decimal) -> LedgerQuery {
        LedgerQuery {
            area_id: AreaId::new(),
            year: 2026,
            draft_budget: draft,
            activity_id: None,
        }
    }

    #[test]
    fn test_query_serialization() {
        let query = query(dec!(150.5));
        let value = serde_json::to_value(&query).unwrap();

        assert_eq!(value["year"], json!(2026));
        assert_eq!(value["draftBudget"], json!(150.5));
        assert_eq!(value["areaId"], json!(query.area_id.into_inner().to_string()));
        assert!(value.get("activityId").is_none());
    }

    #[test]
    fn test_query_includes_activity_when_editing() {
        let mut query = query(dec!(10));
        let id = ActivityId::new();
        query.activity_id = Some(id);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["activityId"], json!(id.into_inner().to_string()));
    }

    #[test]
    fn test_parse_success() {
        let body = json!({
            "ceiling": {
                "total": 1000,
                "version": 3,
                "validFrom": "2026-01-01",
                "validTo": "2027-01-01",
                "status": "approved"
            },
            "committed": 900.0,
            "available": "100.00"
        });

        let response = parse_ledger_response(&body).unwrap();
        assert_eq!(response.ceiling.total, dec!(1000));
        assert_eq!(response.ceiling.version, 3);
        assert_eq!(response.ceiling.status, CeilingStatus::Approved);
        assert_eq!(response.committed, dec!(900));
        assert_eq!(response.available, dec!(100));

        let query = query(dec!(150));
        let rollup = response.into_rollup(&query);
        assert_eq!(rollup.ceiling.area_id, query.area_id);
        assert_eq!(rollup.available_after_edit, dec!(-50));
    }

    #[test]
    fn test_parse_title_case_status() {
        let body = json!({
            "ceiling": { "total": 500, "version": 1, "status": "Approved" },
            "committed": 0,
            "available": 500
        });

        let response = parse_ledger_response(&body).unwrap();
        assert_eq!(response.ceiling.status, CeilingStatus::Approved);
        assert_eq!(response.ceiling.valid_from, None);
    }

    #[test]
    fn test_parse_error_envelope() {
        let err = parse_ledger_response(&json!({
            "error": { "code": "NO_CEILING", "message": "No ceiling for 2026" }
        }))
        .unwrap_err();

        assert_eq!(
            err,
            LedgerFetchError::Service {
                code: Some("NO_CEILING".to_string()),
                message: "No ceiling for 2026".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_error_envelope_plain_message() {
        let err = parse_ledger_response(&json!({ "error": "area not found" })).unwrap_err();
        assert_eq!(
            err,
            LedgerFetchError::Service {
                code: None,
                message: "area not found".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_ledger_response(&json!({ "committed": 1 })).unwrap_err();
        assert!(matches!(err, LedgerFetchError::MalformedResponse(_)));

        let err = parse_ledger_response(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, LedgerFetchError::MalformedResponse(_)));
    }
}
