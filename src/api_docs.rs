use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::index,
        api::books::create_form,
        api::books::create,
        api::books::edit_form,
        api::books::edit,
        api::books::delete,
    ),
    tags(
        (name = "bookstore-admin", description = "Bookstore admin API")
    )
)]
pub struct ApiDoc;
