#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use bookstore_admin::config::Config;
use bookstore_admin::db;
use bookstore_admin::infrastructure::AppState;
use bookstore_admin::infrastructure::file_storage::UploadStore;
use bookstore_admin::models::{author, genre, tag};
use bookstore_admin::server;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
    // Kept alive for the duration of the test
    pub uploads: TempDir,
}

// Helper to build the full router over an in-memory database
pub async fn setup_test_app() -> TestApp {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let uploads = tempfile::tempdir().expect("Failed to create uploads dir");

    let config = Config {
        uploads_dir: uploads.path().to_path_buf(),
        ..Config::default()
    };
    let state = AppState::new(db.clone(), UploadStore::new(uploads.path()));

    TestApp {
        app: server::build_router(state, &config),
        db,
        uploads,
    }
}

pub struct References {
    pub author_id: i32,
    pub genre_id: i32,
    pub tag_ids: Vec<i32>,
}

// Helper to create one author, one genre and two tags
pub async fn seed_references(db: &DatabaseConnection) -> References {
    let author = author::ActiveModel {
        name: Set("Frank Herbert".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create author");

    let genre = genre::ActiveModel {
        name: Set("Science Fiction".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create genre");

    let mut tag_ids = Vec::new();
    for name in ["classic", "space-opera"] {
        let tag = tag::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create tag");
        tag_ids.push(tag.id);
    }

    References {
        author_id: author.id,
        genre_id: genre.id,
        tag_ids,
    }
}

/// Hand-built multipart/form-data body
pub struct MultipartBody {
    body: Vec<u8>,
}

const BOUNDARY: &str = "----bookstore-test-boundary";

impl MultipartBody {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .uri(uri)
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// The Dune sample form: valid author and genre, a 500 KB JPEG poster and
/// a 300 KB PNG hover poster, no gallery, no tags
pub fn dune_form(refs: &References) -> MultipartBody {
    dune_form_with(refs, &[])
}

/// The Dune sample form with some scalar fields replaced or added
pub fn dune_form_with(refs: &References, overrides: &[(&str, &str)]) -> MultipartBody {
    let author_id = refs.author_id.to_string();
    let genre_id = refs.genre_id.to_string();
    let mut fields = vec![
        ("name", "Dune"),
        ("desc", "Desert planet, spice, sandworms."),
        ("author_id", author_id.as_str()),
        ("genre_id", genre_id.as_str()),
        ("sale_price", "25"),
        ("cost_price", "12"),
        ("discount_percent", "10"),
        ("stock_status", "true"),
    ];
    for (name, value) in overrides {
        match fields.iter_mut().find(|(field, _)| field == name) {
            Some(field) => field.1 = *value,
            None => fields.push((*name, *value)),
        }
    }

    let mut body = MultipartBody::new();
    for (name, value) in fields {
        body = body.text(name, value);
    }

    body.file(
        "poster_file",
        "dune.jpg",
        "image/jpeg",
        &vec![0xAB; 500 * 1024],
    )
    .file(
        "hover_poster_file",
        "dune-back.png",
        "image/png",
        &vec![0xCD; 300 * 1024],
    )
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Every regular file below `root`, staging directory included
pub fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(root) else {
        return files;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            files.extend(files_under(&path));
        } else {
            files.push(path);
        }
    }
    files
}
