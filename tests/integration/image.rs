use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use crate::common::{TestApp, routes, test_png};

#[tokio::test]
async fn create_with_image_writes_both_artifacts_at_the_shard_path() {
    let app = TestApp::spawn().await;

    let encoded = BASE64.encode(test_png(120, 80));
    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Painted Hero",
                "location": "Shelf A",
                "image": encoded,
            }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    let id = res.id();

    let thumb_rel = res.body["image_path"].as_str().unwrap();
    let orig_rel = res.body["original_image_path"].as_str().unwrap();
    assert!(thumb_rel.ends_with(&format!("{id}.jpg")), "{thumb_rel}");
    assert_eq!(orig_rel, &format!("originals/{thumb_rel}"));

    let thumb = app.image_root.join(thumb_rel);
    let orig = app.image_root.join(orig_rel);
    assert!(thumb.is_file(), "missing {}", thumb.display());
    assert!(orig.is_file(), "missing {}", orig.display());

    // The thumbnail is always a 50x50 contain-fit JPEG.
    let decoded = image::open(&thumb).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (50, 50));
}

#[tokio::test]
async fn invalid_base64_fails_without_creating_the_mini() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Broken",
                "location": "Shelf A",
                "image": "this is not base64!!!",
            }),
        )
        .await;
    assert_eq!(res.status, 422);
    assert_eq!(res.body["code"], "IMAGE_ERROR");

    let list = app.get(routes::MINIS).await;
    assert_eq!(list.body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn undecodable_image_bytes_roll_back_the_create() {
    let app = TestApp::spawn().await;

    let encoded = BASE64.encode(b"valid base64, not an image");
    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Broken",
                "location": "Shelf A",
                "image": encoded,
                "tag_names": ["doomed"],
            }),
        )
        .await;
    assert_eq!(res.status, 422, "{}", res.text);
    assert_eq!(res.body["code"], "IMAGE_ERROR");

    // The mini row and the lazily-created tag both roll back.
    let list = app.get(routes::MINIS).await;
    assert_eq!(list.body.as_array().unwrap().len(), 0);
    let tags = app.get(routes::TAGS).await;
    assert_eq!(tags.body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn replacing_an_image_overwrites_in_place() {
    let app = TestApp::spawn().await;
    let id = app.create_mini("Repainted").await;

    let first = app
        .put_bytes(&routes::mini_image(id), test_png(60, 60))
        .await;
    assert_eq!(first.status, 200, "{}", first.text);

    let thumb = app.image_root.join(first.body["image_path"].as_str().unwrap());
    let before = std::fs::metadata(&thumb).unwrap().len();

    let second = app
        .put_bytes(&routes::mini_image(id), test_png(400, 100))
        .await;
    assert_eq!(second.status, 200, "{}", second.text);
    assert_eq!(first.body["image_path"], second.body["image_path"]);

    let after = std::fs::metadata(&thumb).unwrap().len();
    assert_ne!(before, after);
}

#[tokio::test]
async fn replacing_the_image_of_a_missing_mini_is_not_found() {
    let app = TestApp::spawn().await;
    let res = app
        .put_bytes(&routes::mini_image(9999), test_png(10, 10))
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn an_empty_image_body_is_rejected() {
    let app = TestApp::spawn().await;
    let id = app.create_mini("Empty").await;

    let res = app.put_bytes(&routes::mini_image(id), Vec::new()).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn derived_paths_are_reported_even_without_an_image() {
    let app = TestApp::spawn().await;
    let id = app.create_mini("Imageless").await;

    let res = app.get(&routes::mini(id)).await;
    assert_eq!(res.status, 200);
    // Paths derive from the id alone; no file needs to exist.
    assert!(res.body["image_path"].as_str().unwrap().ends_with(".jpg"));
    assert!(
        res.body["original_image_path"]
            .as_str()
            .unwrap()
            .starts_with("originals/")
    );
}
