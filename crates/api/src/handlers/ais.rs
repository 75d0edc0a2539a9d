//! Auto-Inclusion Scheme organisation search.
//!
//! The IRAS envelope is returned inside the internal `{success, message,
//! data}` envelope, so validation failures still answer HTTP 200.

use axum::Json;
use iras_core::ais::{self, AisSearchRequest};
use iras_core::validation::return_code;
use serde::Serialize;

use crate::extract::AppJson;
use crate::response::{ApiResponse, IrasResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AisSearchData {
    #[serde(rename = "organizationInAIS")]
    pub organization_in_ais: &'static str,
}

/// POST /iras/sb/ESubmission/AISOrgSearch
pub async fn ais_org_search(
    AppJson(request): AppJson<AisSearchRequest>,
) -> Json<ApiResponse<IrasResponse<AisSearchData, &'static str>>> {
    let envelope = match ais::validate(&request) {
        Ok(()) => {
            let in_ais = ais::organization_in_ais(&request.organization_id);
            tracing::debug!(
                organization_id = %request.organization_id,
                basis_year = request.basis_year,
                in_ais,
                "AIS organisation searched"
            );
            IrasResponse::success(
                return_code::SUCCESS,
                AisSearchData {
                    organization_in_ais: in_ais,
                },
            )
        }
        Err(rejection) => IrasResponse::rejected(rejection),
    };

    Json(ApiResponse::ok(
        "Organization search completed successfully",
        envelope,
    ))
}
