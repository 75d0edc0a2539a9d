//! Route definitions for the `/admin` resources.
//!
//! Every route needs a bearer token; `/admin/users` additionally needs the
//! admin role.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{categories, cit, gst, products, property, rental, singpass, users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET, POST          /gst-registrations
/// GET, PUT, DELETE   /gst-registrations/{id}
///
/// GET, POST          /property-statements
/// GET, PUT, DELETE   /property-statements/{id}
///
/// GET, POST          /property-tax-balances
/// GET, PUT, DELETE   /property-tax-balances/{id}
///
/// GET, POST          /rental-submissions
/// GET, PUT, DELETE   /rental-submissions/{id}
/// GET                /rental-submissions/ref/{ref_no}
///
/// GET, POST          /cit-conversions
/// GET, PUT, DELETE   /cit-conversions/{id}
/// GET                /cit-conversions/conversion/{conversion_id}
/// GET                /cit-conversions/request/{request_id}
///
/// GET, POST          /singpass-auth
/// GET, PUT, DELETE   /singpass-auth/{id}
/// GET                /singpass-auth/state/{state}
///
/// GET, POST          /singpass-tokens
/// GET, PUT, DELETE   /singpass-tokens/{id}
/// GET                /singpass-tokens/state/{state}
///
/// GET, POST          /users                  (admin only)
/// GET, PUT, DELETE   /users/{id}             (admin only)
/// PUT                /users/{id}/deactivate  (admin only)
///
/// GET, POST          /products
/// GET, PUT, DELETE   /products/{id}
///
/// GET, POST          /categories
/// GET, PUT, DELETE   /categories/{id}
/// ```
pub fn router() -> Router<AppState> {
    let gst_routes = Router::new()
        .route(
            "/",
            get(gst::list_gst_registrations).post(gst::create_gst_registration),
        )
        .route(
            "/{id}",
            get(gst::get_gst_registration)
                .put(gst::update_gst_registration)
                .delete(gst::delete_gst_registration),
        );

    let statement_routes = Router::new()
        .route(
            "/",
            get(property::list_statements).post(property::create_statement),
        )
        .route(
            "/{id}",
            get(property::get_statement)
                .put(property::update_statement)
                .delete(property::delete_statement),
        );

    let tax_balance_routes = Router::new()
        .route(
            "/",
            get(property::list_tax_balances).post(property::create_tax_balance),
        )
        .route(
            "/{id}",
            get(property::get_tax_balance)
                .put(property::update_tax_balance)
                .delete(property::delete_tax_balance),
        );

    let rental_routes = Router::new()
        .route(
            "/",
            get(rental::list_rental_submissions).post(rental::create_rental_submission),
        )
        .route(
            "/{id}",
            get(rental::get_rental_submission)
                .put(rental::update_rental_submission)
                .delete(rental::delete_rental_submission),
        )
        .route("/ref/{ref_no}", get(rental::get_rental_submission_by_ref));

    let cit_routes = Router::new()
        .route(
            "/",
            get(cit::list_cit_conversions).post(cit::create_cit_conversion),
        )
        .route(
            "/{id}",
            get(cit::get_cit_conversion)
                .put(cit::update_cit_conversion)
                .delete(cit::delete_cit_conversion),
        )
        .route(
            "/conversion/{conversion_id}",
            get(cit::get_by_conversion_id),
        )
        .route("/request/{request_id}", get(cit::get_by_request_id));

    let singpass_auth_routes = Router::new()
        .route(
            "/",
            get(singpass::list_auth_records).post(singpass::create_auth_record),
        )
        .route(
            "/{id}",
            get(singpass::get_auth_record)
                .put(singpass::update_auth_record)
                .delete(singpass::delete_auth_record),
        )
        .route("/state/{state}", get(singpass::get_auth_record_by_state));

    let singpass_token_routes = Router::new()
        .route(
            "/",
            get(singpass::list_token_records).post(singpass::create_token_record),
        )
        .route(
            "/{id}",
            get(singpass::get_token_record)
                .put(singpass::update_token_record)
                .delete(singpass::delete_token_record),
        )
        .route("/state/{state}", get(singpass::get_token_record_by_state));

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{id}/deactivate", put(users::deactivate_user));

    let product_routes = Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        );

    let category_routes = Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        );

    Router::new()
        .nest("/gst-registrations", gst_routes)
        .nest("/property-statements", statement_routes)
        .nest("/property-tax-balances", tax_balance_routes)
        .nest("/rental-submissions", rental_routes)
        .nest("/cit-conversions", cit_routes)
        .nest("/singpass-auth", singpass_auth_routes)
        .nest("/singpass-tokens", singpass_token_routes)
        .nest("/users", user_routes)
        .nest("/products", product_routes)
        .nest("/categories", category_routes)
}
