use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use minibase::config::{
    AppConfig, CorsConfig, DatabaseConfig, ImageConfig, ServerConfig,
};
use minibase::state::AppState;
use minibase::storage::ImageStore;

pub mod routes {
    pub const MINIS: &str = "/api/v1/minis";
    pub const TAGS: &str = "/api/v1/tags";
    pub const TAG_SWEEP: &str = "/api/v1/tags/sweep";
    pub const CATEGORIES: &str = "/api/v1/categories";
    pub const UNIT_TYPES: &str = "/api/v1/unit-types";
    pub const PAINTERS: &str = "/api/v1/painters";
    pub const BASE_SIZES: &str = "/api/v1/base-sizes";
    pub const MANUFACTURERS: &str = "/api/v1/manufacturers";
    pub const PRODUCT_LINES: &str = "/api/v1/product-lines";
    pub const PRODUCT_SETS: &str = "/api/v1/product-sets";

    pub fn mini(id: i32) -> String {
        format!("/api/v1/minis/{id}")
    }

    pub fn mini_image(id: i32) -> String {
        format!("/api/v1/minis/{id}/image")
    }

    pub fn category(id: i32) -> String {
        format!("/api/v1/categories/{id}")
    }

    pub fn unit_type(id: i32) -> String {
        format!("/api/v1/unit-types/{id}")
    }

    pub fn manufacturer(id: i32) -> String {
        format!("/api/v1/manufacturers/{id}")
    }

    pub fn product_line(id: i32) -> String {
        format!("/api/v1/product-lines/{id}")
    }

    pub fn product_set(id: i32) -> String {
        format!("/api/v1/product-sets/{id}")
    }
}

/// A running test server backed by a throwaway SQLite file and image root.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub image_root: PathBuf,
    // Dropping the tempdir tears down the database and image files.
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("minibase-test.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let image_root = dir.path().join("images");

        let db = minibase::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");
        minibase::seed::seed_reference_data(&db)
            .await
            .expect("Failed to seed reference data");

        let images = Arc::new(
            ImageStore::new(image_root.clone())
                .await
                .expect("Failed to open image store"),
        );

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url,
            },
            images: ImageConfig {
                root: image_root.display().to_string(),
            },
        };

        let state = AppState {
            db: db.clone(),
            images,
            config,
        };

        let app = minibase::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            image_root,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");
        TestResponse::from_response(res).await
    }

    /// POST a raw string body with a JSON content type, bypassing
    /// serialization. For malformed-payload tests.
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");
        TestResponse::from_response(res).await
    }

    pub async fn put_bytes(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .await
            .expect("Failed to send PUT request");
        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");
        TestResponse::from_response(res).await
    }

    /// Create a category via the API and return its `id`.
    pub async fn create_category(&self, name: &str) -> i32 {
        let res = self
            .post(routes::CATEGORIES, &serde_json::json!({ "name": name }))
            .await;
        assert_eq!(res.status, 201, "create_category failed: {}", res.text);
        res.id()
    }

    /// Create a unit type via the API and return its `id`.
    pub async fn create_unit_type(&self, name: &str, category_id: i32) -> i32 {
        let res = self
            .post(
                routes::UNIT_TYPES,
                &serde_json::json!({ "name": name, "category_id": category_id }),
            )
            .await;
        assert_eq!(res.status, 201, "create_unit_type failed: {}", res.text);
        res.id()
    }

    /// Create a manufacturer via the API and return its `id`.
    pub async fn create_manufacturer(&self, name: &str) -> i32 {
        let res = self
            .post(routes::MANUFACTURERS, &serde_json::json!({ "name": name }))
            .await;
        assert_eq!(res.status, 201, "create_manufacturer failed: {}", res.text);
        res.id()
    }

    /// Create a product line via the API and return its `id`.
    pub async fn create_product_line(&self, name: &str, manufacturer_id: i32) -> i32 {
        let res = self
            .post(
                routes::PRODUCT_LINES,
                &serde_json::json!({ "name": name, "manufacturer_id": manufacturer_id }),
            )
            .await;
        assert_eq!(res.status, 201, "create_product_line failed: {}", res.text);
        res.id()
    }

    /// Create a product set via the API and return its `id`.
    pub async fn create_product_set(&self, name: &str, product_line_id: i32) -> i32 {
        let res = self
            .post(
                routes::PRODUCT_SETS,
                &serde_json::json!({ "name": name, "product_line_id": product_line_id }),
            )
            .await;
        assert_eq!(res.status, 201, "create_product_set failed: {}", res.text);
        res.id()
    }

    /// Create a bare mini with just the required scalars and return its `id`.
    pub async fn create_mini(&self, name: &str) -> i32 {
        let res = self
            .post(
                routes::MINIS,
                &serde_json::json!({ "name": name, "location": "Shelf A" }),
            )
            .await;
        assert_eq!(res.status, 201, "create_mini failed: {}", res.text);
        res.id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}

/// Encode a small solid-color PNG for image endpoints.
pub fn test_png(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;

    let img = RgbImage::from_pixel(width, height, Rgb([40, 90, 160]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode test image");
    buf
}
