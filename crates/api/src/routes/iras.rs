//! Route definitions for the IRAS-compatible surface under `/iras`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{ais, cit, corppass, estamp, gst, property, rental, singpass, stamp_duty};
use crate::state::AppState;

/// Routes mounted at `/iras`.
///
/// ```text
/// POST     /prod/GSTListing/SearchGSTRegistered          -> search_gst_registered
///
/// GET      /sb/Authentication/CorpPassAuth               -> corppass_auth
/// POST     /sb/Authentication/CorpPassToken              -> corppass_token
///
/// POST     /sb/eStamp/StampTenancyAgreement              -> stamp_tenancy_agreement
/// POST     /sb/eStamp/ShareTransfer                      -> share_transfer
/// POST     /sb/eStamp/StampMortgage                      -> stamp_mortgage
/// POST     /sb/eStamp/SalePurchaseBuyers                 -> sale_purchase_buyers
/// POST     /sb/eStamp/SalePurchaseSellers                -> sale_purchase_sellers
///
/// POST     /prod/SD/SCAuthenticity                       -> sc_authenticity
/// POST     /prod/SD/CalPubListedCompanyShares            -> cal_pub_listed_company_shares
/// POST     /prod/SD/CalIndustrialSSD                     -> cal_industrial_ssd
///
/// POST     /sb/ESubmission/AISOrgSearch                  -> ais_org_search
///
/// POST     /sb/PropertyConsolidatedStatement/retrieve    -> retrieve_consolidated_statement
/// POST     /sb/PTTaxBal/PtyTaxBalSearch                  -> search_tax_balance
///
/// POST     /sb/rental/Submission                         -> submit_rental
///
/// POST     /prod/ct/convertformcs                        -> convert_form_cs
///
/// GET|POST /prod/Authentication/SingPassServiceAuth      -> service_auth
/// POST     /prod/Authentication/SingPassServiceAuthToken -> service_auth_token
/// ```
pub fn router() -> Router<AppState> {
    let estamp_routes = Router::new()
        .route("/StampTenancyAgreement", post(estamp::stamp_tenancy_agreement))
        .route("/ShareTransfer", post(estamp::share_transfer))
        .route("/StampMortgage", post(estamp::stamp_mortgage))
        .route("/SalePurchaseBuyers", post(estamp::sale_purchase_buyers))
        .route("/SalePurchaseSellers", post(estamp::sale_purchase_sellers));

    let stamp_duty_routes = Router::new()
        .route("/SCAuthenticity", post(stamp_duty::sc_authenticity))
        .route(
            "/CalPubListedCompanyShares",
            post(stamp_duty::cal_pub_listed_company_shares),
        )
        .route("/CalIndustrialSSD", post(stamp_duty::cal_industrial_ssd));

    Router::new()
        .route(
            "/prod/GSTListing/SearchGSTRegistered",
            post(gst::search_gst_registered),
        )
        .route(
            "/sb/Authentication/CorpPassAuth",
            get(corppass::corppass_auth),
        )
        .route(
            "/sb/Authentication/CorpPassToken",
            post(corppass::corppass_token),
        )
        .nest("/sb/eStamp", estamp_routes)
        .nest("/prod/SD", stamp_duty_routes)
        .route("/sb/ESubmission/AISOrgSearch", post(ais::ais_org_search))
        .route(
            "/sb/PropertyConsolidatedStatement/retrieve",
            post(property::retrieve_consolidated_statement),
        )
        .route(
            "/sb/PTTaxBal/PtyTaxBalSearch",
            post(property::search_tax_balance),
        )
        .route("/sb/rental/Submission", post(rental::submit_rental))
        .route("/prod/ct/convertformcs", post(cit::convert_form_cs))
        .route(
            "/prod/Authentication/SingPassServiceAuth",
            get(singpass::service_auth).post(singpass::service_auth),
        )
        .route(
            "/prod/Authentication/SingPassServiceAuthToken",
            post(singpass::service_auth_token),
        )
}
