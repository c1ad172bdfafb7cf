use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn product_hierarchy_crud_round_trip() {
    let app = TestApp::spawn().await;

    let maker = app.create_manufacturer("Gamesmith").await;
    let line = app.create_product_line("Depths of Dread", maker).await;
    let set = app.create_product_set("Heroes Pack 1", line).await;

    let renamed = app
        .patch(&routes::product_set(set), &json!({ "name": "Heroes Pack I" }))
        .await;
    assert_eq!(renamed.status, 200, "{}", renamed.text);
    assert_eq!(renamed.body["name"], "Heroes Pack I");
    assert_eq!(renamed.body["product_line_id"], line);

    let sets = app.get(routes::PRODUCT_SETS).await;
    assert_eq!(sets.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_manufacturer_names_conflict() {
    let app = TestApp::spawn().await;
    app.create_manufacturer("Gamesmith").await;

    let res = app
        .post(routes::MANUFACTURERS, &json!({ "name": "Gamesmith" }))
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "CONFLICT");
}

#[tokio::test]
async fn lines_and_sets_require_existing_parents() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::PRODUCT_LINES,
            &json!({ "name": "Orphan Line", "manufacturer_id": 9999 }),
        )
        .await;
    assert_eq!(res.status, 400);

    let res = app
        .post(
            routes::PRODUCT_SETS,
            &json!({ "name": "Orphan Set", "product_line_id": 9999 }),
        )
        .await;
    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn deletes_cascade_nowhere() {
    let app = TestApp::spawn().await;

    let maker = app.create_manufacturer("Gamesmith").await;
    let line = app.create_product_line("Depths of Dread", maker).await;
    let set = app.create_product_set("Heroes Pack 1", line).await;

    // Each level refuses to delete while dependents remain.
    assert_eq!(app.delete(&routes::manufacturer(maker)).await.status, 409);
    assert_eq!(app.delete(&routes::product_line(line)).await.status, 409);

    let mini = app
        .post(
            routes::MINIS,
            &json!({ "name": "Boxed", "location": "Shelf A", "product_set_id": set }),
        )
        .await;
    assert_eq!(mini.status, 201, "{}", mini.text);
    assert_eq!(app.delete(&routes::product_set(set)).await.status, 409);

    // Bottom-up teardown succeeds.
    assert_eq!(app.delete(&routes::mini(mini.id())).await.status, 204);
    assert_eq!(app.delete(&routes::product_set(set)).await.status, 204);
    assert_eq!(app.delete(&routes::product_line(line)).await.status, 204);
    assert_eq!(app.delete(&routes::manufacturer(maker)).await.status, 204);
}

#[tokio::test]
async fn a_mini_cannot_reference_a_missing_product_set() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::MINIS,
            &json!({ "name": "Ghost Box", "location": "Shelf A", "product_set_id": 9999 }),
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
