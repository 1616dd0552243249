//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Products, categories and product images"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/category", api = domain_catalog::handlers::CategoryApiDoc),
        (path = "/api/products", api = domain_catalog::handlers::ProductApiDoc),
        (path = "/api/product-images", api = domain_catalog::handlers::ProductImageApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/category",
            "/api/category/{id}",
            "/api/category/slug/{slug}",
            "/api/products",
            "/api/products/{id}",
            "/api/products/category/{category_id}",
            "/api/product-images",
            "/api/product-images/product/{product_id}",
            "/api/product-images/{id}",
            "/api/product-images/primary/{product_id}/{image_id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected} in {paths:?}");
        }
    }
}
