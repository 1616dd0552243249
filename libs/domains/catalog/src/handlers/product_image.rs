use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{AddProductImage, ProductImage};
use crate::repository::ProductImageRepository;
use crate::service::ProductImageService;

pub const TAG: &str = "product-images";

#[derive(OpenApi)]
#[openapi(
    paths(add_image, list_images, delete_image, set_primary),
    components(
        schemas(ProductImage, AddProductImage),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product image endpoints")
    )
)]
pub struct ApiDoc;

pub fn router<R: ProductImageRepository + 'static>(service: ProductImageService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(add_image))
        .route("/product/{product_id}", get(list_images))
        .route("/{id}", delete(delete_image))
        .route("/primary/{product_id}/{image_id}", put(set_primary))
        .with_state(shared_service)
}

/// Add an image to a product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = AddProductImage,
    responses(
        (status = 201, description = "Image added", body = ProductImage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_image<R: ProductImageRepository>(
    State(service): State<Arc<ProductImageService<R>>>,
    ValidatedJson(input): ValidatedJson<AddProductImage>,
) -> CatalogResult<impl IntoResponse> {
    let image = service.add_image(input).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// Images of a product, oldest first
#[utoipa::path(
    get,
    path = "/product/{product_id}",
    tag = TAG,
    params(
        ("product_id" = String, Path, description = "Product ID (UUID)")
    ),
    responses(
        (status = 200, description = "Images of the product", body = Vec<ProductImage>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_images<R: ProductImageRepository>(
    State(service): State<Arc<ProductImageService<R>>>,
    Path(product_id): Path<String>,
) -> CatalogResult<Json<Vec<ProductImage>>> {
    let images = service.list_images(&product_id).await?;
    Ok(Json(images))
}

/// Delete an image
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Image ID (UUID)")
    ),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_image<R: ProductImageRepository>(
    State(service): State<Arc<ProductImageService<R>>>,
    Path(id): Path<String>,
) -> CatalogResult<impl IntoResponse> {
    service.delete_image(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Make an image the product's only primary image
#[utoipa::path(
    put,
    path = "/primary/{product_id}/{image_id}",
    tag = TAG,
    params(
        ("product_id" = String, Path, description = "Product ID (UUID)"),
        ("image_id" = String, Path, description = "Image ID (UUID)")
    ),
    responses(
        (status = 200, description = "Image is now primary", body = ProductImage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn set_primary<R: ProductImageRepository>(
    State(service): State<Arc<ProductImageService<R>>>,
    Path((product_id, image_id)): Path<(String, String)>,
) -> CatalogResult<Json<ProductImage>> {
    let image = service.set_primary(&product_id, &image_id).await?;
    Ok(Json(image))
}
