use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use minibase::entity::{mini_category, mini_proxy_type, mini_tag, mini_unit_type};

use crate::common::{TestApp, routes};

#[tokio::test]
async fn create_applies_defaults() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::MINIS,
            &json!({ "name": "Skeleton Warrior", "location": "Shelf A" }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["quantity"], 1);
    assert_eq!(res.body["painted_by_id"], 1);
    assert_eq!(res.body["base_size_id"], 3);
    assert_eq!(res.body["painted_by"], "Unpainted");
    assert_eq!(res.body["base_size"], "32mm round");
    assert_eq!(res.body["product_set_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn update_with_omitted_lookups_falls_back_to_defaults() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Repainted",
                "location": "Shelf A",
                "painted_by_id": 4,
                "base_size_id": 5,
            }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["painted_by_id"], 4);
    assert_eq!(res.body["base_size_id"], 5);
    let id = res.id();

    let updated = app
        .put(&routes::mini(id), &json!({ "name": "Repainted", "location": "Shelf A" }))
        .await;
    assert_eq!(updated.status, 200, "{}", updated.text);
    assert_eq!(updated.body["painted_by_id"], 1);
    assert_eq!(updated.body["base_size_id"], 3);
}

#[tokio::test]
async fn quantity_is_coerced_to_at_least_one() {
    let app = TestApp::spawn().await;

    for sent in [0, -5] {
        let res = app
            .post(
                routes::MINIS,
                &json!({ "name": "Swarm", "location": "Shelf A", "quantity": sent }),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["quantity"], 1);
    }
}

#[tokio::test]
async fn create_round_trips_the_full_aggregate() {
    let app = TestApp::spawn().await;

    let cat_a = app.create_category("Undead").await;
    let cat_b = app.create_category("Infantry").await;
    let swordsman = app.create_unit_type("Swordsman", cat_b).await;
    let archer = app.create_unit_type("Archer", cat_b).await;

    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Skeleton Archer",
                "description": "Bony.",
                "location": "Shelf B",
                "quantity": 5,
                "category_ids": [cat_a, cat_b],
                "type_ids": [archer],
                "proxy_type_ids": [swordsman],
                "tag_names": ["undead", "ranged"],
            }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    let id = res.id();

    let detail = app.get(&routes::mini(id)).await;
    assert_eq!(detail.status, 200);
    assert_eq!(detail.body["quantity"], 5);
    assert_eq!(detail.body["category_names"], json!(["Undead", "Infantry"]));
    assert_eq!(detail.body["type_names"], json!(["Archer"]));
    assert_eq!(detail.body["proxy_type_names"], json!(["Swordsman"]));
    assert_eq!(detail.body["category_ids"], json!([cat_a, cat_b]));
    assert_eq!(detail.body["type_ids"], json!([archer]));
    assert_eq!(detail.body["proxy_type_ids"], json!([swordsman]));

    let tags = detail.body["tag_names"].as_array().unwrap();
    assert_eq!(tags.len(), 2);
    assert!(tags.contains(&json!("undead")));
    assert!(tags.contains(&json!("ranged")));
}

#[tokio::test]
async fn duplicate_association_ids_collapse_to_one_row() {
    let app = TestApp::spawn().await;

    let cat = app.create_category("Beasts").await;
    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Dire Wolf",
                "location": "Shelf C",
                "category_ids": [cat, cat, cat],
                "tag_names": ["wolf", "wolf"],
            }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    assert_eq!(res.body["category_names"], json!(["Beasts"]));
    assert_eq!(res.body["tag_names"], json!(["wolf"]));

    let rows = mini_category::Entity::find()
        .filter(mini_category::Column::MiniId.eq(res.id()))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn a_type_cannot_serve_both_roles() {
    let app = TestApp::spawn().await;

    let cat = app.create_category("Infantry").await;
    let spearman = app.create_unit_type("Spearman", cat).await;

    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Spearman",
                "location": "Shelf A",
                "type_ids": [spearman],
                "proxy_type_ids": [spearman],
            }),
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn dangling_reference_rolls_back_the_whole_write() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Ghost",
                "location": "Shelf A",
                "category_ids": [9999],
                "tag_names": ["spooky"],
            }),
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    // Nothing from the failed write may survive: no mini, no tag.
    let list = app.get(routes::MINIS).await;
    assert_eq!(list.body.as_array().unwrap().len(), 0);
    let tags = app.get(routes::TAGS).await;
    assert_eq!(tags.body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn update_replaces_association_sets_wholesale() {
    let app = TestApp::spawn().await;

    let cat_a = app.create_category("A").await;
    let cat_b = app.create_category("B").await;
    let cat_c = app.create_category("C").await;

    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Shapeshifter",
                "location": "Shelf A",
                "category_ids": [cat_a, cat_b],
            }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    let id = res.id();

    let updated = app
        .put(
            &routes::mini(id),
            &json!({
                "name": "Shapeshifter",
                "location": "Shelf A",
                "category_ids": [cat_b, cat_c],
            }),
        )
        .await;
    assert_eq!(updated.status, 200, "{}", updated.text);
    assert_eq!(updated.body["category_ids"], json!([cat_b, cat_c]));
    assert_eq!(updated.body["category_names"], json!(["B", "C"]));
}

#[tokio::test]
async fn update_with_omitted_lists_clears_every_relation() {
    let app = TestApp::spawn().await;

    let cat = app.create_category("Cavalry").await;
    let knight = app.create_unit_type("Knight", cat).await;

    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Knight",
                "location": "Shelf A",
                "category_ids": [cat],
                "type_ids": [knight],
                "tag_names": ["mounted"],
            }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    let id = res.id();

    let updated = app
        .put(&routes::mini(id), &json!({ "name": "Knight", "location": "Box 3" }))
        .await;
    assert_eq!(updated.status, 200, "{}", updated.text);
    assert_eq!(updated.body["location"], "Box 3");
    assert_eq!(updated.body["category_ids"], json!([]));
    assert_eq!(updated.body["type_ids"], json!([]));
    assert_eq!(updated.body["tag_names"], json!([]));
}

#[tokio::test]
async fn update_refreshes_the_updated_at_stamp() {
    let app = TestApp::spawn().await;
    let id = app.create_mini("Goblin").await;

    let before = app.get(&routes::mini(id)).await;
    let created_at = before.body["created_at"].as_str().unwrap().to_string();
    let updated_at = before.body["updated_at"].as_str().unwrap().to_string();
    assert_eq!(created_at, updated_at);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let res = app
        .put(&routes::mini(id), &json!({ "name": "Goblin", "location": "Shelf A" }))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["created_at"].as_str().unwrap(), created_at);
    assert_ne!(res.body["updated_at"].as_str().unwrap(), updated_at);
}

#[tokio::test]
async fn delete_removes_the_mini_and_every_association_row() {
    let app = TestApp::spawn().await;

    let cat = app.create_category("Demons").await;
    let imp = app.create_unit_type("Imp", cat).await;

    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Imp Swarm",
                "location": "Shelf D",
                "category_ids": [cat],
                "type_ids": [imp],
                "proxy_type_ids": [],
                "tag_names": ["small"],
            }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    let id = res.id();

    let del = app.delete(&routes::mini(id)).await;
    assert_eq!(del.status, 204);

    assert_eq!(app.get(&routes::mini(id)).await.status, 404);
    assert_eq!(app.delete(&routes::mini(id)).await.status, 404);

    for count in [
        mini_category::Entity::find()
            .filter(mini_category::Column::MiniId.eq(id))
            .count(&app.db)
            .await
            .unwrap(),
        mini_unit_type::Entity::find()
            .filter(mini_unit_type::Column::MiniId.eq(id))
            .count(&app.db)
            .await
            .unwrap(),
        mini_proxy_type::Entity::find()
            .filter(mini_proxy_type::Column::MiniId.eq(id))
            .count(&app.db)
            .await
            .unwrap(),
        mini_tag::Entity::find()
            .filter(mini_tag::Column::MiniId.eq(id))
            .count(&app.db)
            .await
            .unwrap(),
    ] {
        assert_eq!(count, 0);
    }

    // The tag itself survives until a sweep.
    let tags = app.get(routes::TAGS).await;
    assert_eq!(tags.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_filters_by_case_insensitive_name_search() {
    let app = TestApp::spawn().await;
    app.create_mini("Skeleton Warrior").await;
    app.create_mini("Zombie").await;

    let res = app
        .get(&format!("{}?search=skeleton", routes::MINIS))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    let items = res.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Skeleton Warrior");
}

#[tokio::test]
async fn list_rejects_unknown_sort_columns() {
    let app = TestApp::spawn().await;
    let res = app
        .get(&format!("{}?sort_by=quantity", routes::MINIS))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn list_sorts_by_name_ascending() {
    let app = TestApp::spawn().await;
    app.create_mini("Zombie").await;
    app.create_mini("Archer").await;

    let res = app
        .get(&format!("{}?sort_by=name&sort_order=asc", routes::MINIS))
        .await;
    assert_eq!(res.status, 200);
    let names: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Archer", "Zombie"]);
}

#[tokio::test]
async fn malformed_json_bodies_get_the_structured_error_envelope() {
    let app = TestApp::spawn().await;

    let res = app.post_raw(routes::MINIS, "{not json").await;
    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(res.body["message"].is_string());
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let app = TestApp::spawn().await;
    let res = app
        .post(routes::MINIS, &json!({ "name": "   ", "location": "Shelf A" }))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn product_hierarchy_names_appear_in_the_aggregate() {
    let app = TestApp::spawn().await;

    let gw = app.create_manufacturer("Gamesmith").await;
    let line = app.create_product_line("Depths of Dread", gw).await;
    let set = app.create_product_set("Heroes Pack 1", line).await;

    let res = app
        .post(
            routes::MINIS,
            &json!({
                "name": "Boxed Hero",
                "location": "Shelf E",
                "product_set_id": set,
            }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["product_set_name"], "Heroes Pack 1");
    assert_eq!(res.body["product_line_name"], "Depths of Dread");
    assert_eq!(res.body["manufacturer_name"], "Gamesmith");
}
