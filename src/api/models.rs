use serde::{Deserialize, Serialize};

use crate::errors::PerfError;
use crate::models::BusinessParams;
use crate::pipeline::AnalysisRequest;
use crate::storage::{report_blob_name, validate_blob_name};

/// Analysis parameters as they arrive in a query string or JSON body.
///
/// Field names follow the public contract (`pagePerVisit`,
/// `visitorQuantity`); the historical `visitorQuanity` spelling is accepted
/// too.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalyzeParams {
    pub url: Option<String>,
    pub guid: Option<String>,
    #[serde(rename = "pagePerVisit", alias = "pagesPerVisit")]
    pub page_per_visit: Option<f64>,
    #[serde(rename = "adsPerPage")]
    pub ads_per_page: Option<f64>,
    #[serde(rename = "visitorQuantity", alias = "visitorQuanity")]
    pub visitor_quantity: Option<f64>,
}

impl AnalyzeParams {
    /// Field-wise merge; values already present in `self` win and `other`
    /// only fills the gaps.
    pub fn merge(self, other: AnalyzeParams) -> AnalyzeParams {
        AnalyzeParams {
            url: self.url.or(other.url),
            guid: self.guid.or(other.guid),
            page_per_visit: self.page_per_visit.or(other.page_per_visit),
            ads_per_page: self.ads_per_page.or(other.ads_per_page),
            visitor_quantity: self.visitor_quantity.or(other.visitor_quantity),
        }
    }

    /// Missing `url` is rejected; a missing `guid` gets a fresh UUID. The
    /// guid must form a valid report name, checked before any work starts.
    /// Missing traffic figures count as zero.
    pub fn into_request(self) -> Result<AnalysisRequest, PerfError> {
        let url = self.url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| PerfError::InvalidRequest("url is required".into()))?;

        let guid = self.guid
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        validate_blob_name(&report_blob_name(&guid))?;

        Ok(AnalysisRequest {
            url,
            guid,
            params: BusinessParams {
                visitor_quantity: self.visitor_quantity.unwrap_or(0.0),
                pages_per_visit: self.page_per_visit.unwrap_or(0.0),
                ads_per_page: self.ads_per_page.unwrap_or(0.0) as i64,
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub guid: String,
    pub cancelled: bool,
}
