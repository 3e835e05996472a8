//! Integration tests for foods, meals, diets and their nutrition totals

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

async fn create_food(app: &common::TestApp, token: &str, body: Value) -> String {
    let (status, food) = app.post_auth("/api/v1/foods", body, token).await;
    assert_eq!(status, StatusCode::CREATED, "food create failed: {food}");
    food["id"].as_str().unwrap().to_string()
}

async fn create_meal(app: &common::TestApp, token: &str, name: &str, foods: Value) -> Value {
    let (status, meal) = app
        .post_auth("/api/v1/meals", json!({ "name": name, "foods": foods }), token)
        .await;
    assert_eq!(status, StatusCode::CREATED, "meal create failed: {meal}");
    meal
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_nutrition_end_to_end() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let food_id = create_food(
        &app,
        &user.token,
        json!({
            "name": "Rice",
            "serving_size": 100.0,
            "calories": 100.0,
            "proteins": 2.0,
            "carbohydrates": 22.0,
            "fats": 0.5
        }),
    )
    .await;

    let meal = create_meal(
        &app,
        &user.token,
        "Lunch",
        json!([{ "food_id": food_id, "quantity": 50.0 }]),
    )
    .await;
    let meal_id = meal["id"].as_str().unwrap();

    let (status, nutrition) = app
        .get_auth(&format!("/api/v1/meals/{meal_id}/nutrition"), &user.token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(nutrition["meal_name"], "Lunch");
    assert_eq!(nutrition["totals"]["calories"], 50.0);
    assert_eq!(nutrition["totals"]["carbohydrates"], 11.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_totals_scale_macros_and_micronutrients() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let (_, iron) = app
        .post_auth(
            "/api/v1/micronutrients",
            json!({ "name": "Iron", "unit": "mg" }),
            &user.token,
        )
        .await;

    let food_id = create_food(
        &app,
        &user.token,
        json!({
            "name": "Chicken breast",
            "serving_size": 100.0,
            "calories": 165.0,
            "proteins": 31.0,
            "carbohydrates": 0.0,
            "fats": 3.6,
            "micronutrients": [{ "micronutrient_id": iron["id"], "amount": 2.0 }]
        }),
    )
    .await;

    let meal = create_meal(
        &app,
        &user.token,
        "Dinner",
        json!([{ "food_id": food_id, "quantity": 150.0 }]),
    )
    .await;

    assert_eq!(meal["totals"]["calories"], 247.5);
    assert_eq!(meal["totals"]["proteins"], 46.5);
    assert_eq!(meal["totals"]["fats"], 5.4);
    assert_eq!(meal["totals"]["micronutrients"][0]["name"], "Iron");
    assert_eq!(meal["totals"]["micronutrients"][0]["amount"], 3.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_food_edit_changes_meal_totals() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let food_id = create_food(
        &app,
        &user.token,
        json!({
            "name": "Bread",
            "serving_size": 100.0,
            "calories": 250.0,
            "proteins": 9.0,
            "carbohydrates": 49.0,
            "fats": 3.2
        }),
    )
    .await;
    let meal = create_meal(
        &app,
        &user.token,
        "Toast",
        json!([{ "food_id": food_id, "quantity": 40.0 }]),
    )
    .await;
    let meal_id = meal["id"].as_str().unwrap();
    assert_eq!(meal["totals"]["calories"], 100.0);

    let (status, _) = app
        .patch_auth(
            &format!("/api/v1/foods/{food_id}"),
            json!({ "calories": 300.0 }),
            &user.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, meal) = app.get_auth(&format!("/api/v1/meals/{meal_id}"), &user.token).await;
    assert_eq!(meal["totals"]["calories"], 120.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_food_lines() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let food_id = create_food(
        &app,
        &user.token,
        json!({
            "name": "Egg",
            "serving_size": 50.0,
            "calories": 70.0,
            "proteins": 6.0,
            "carbohydrates": 0.5,
            "fats": 5.0
        }),
    )
    .await;
    let meal = create_meal(&app, &user.token, "Breakfast", json!([])).await;
    let meal_id = meal["id"].as_str().unwrap();

    let (status, line) = app
        .post_auth(
            &format!("/api/v1/meals/{meal_id}/foods"),
            json!({ "food_id": food_id, "quantity": 100.0 }),
            &user.token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let line_id = line["id"].as_str().unwrap();

    let (status, _) = app
        .patch_auth(
            &format!("/api/v1/meals/{meal_id}/foods/{line_id}"),
            json!({ "quantity": 25.0 }),
            &user.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, meal) = app.get_auth(&format!("/api/v1/meals/{meal_id}"), &user.token).await;
    assert_eq!(meal["totals"]["calories"], 35.0);

    let (status, _) = app
        .delete_auth(&format!("/api/v1/meals/{meal_id}/foods/{line_id}"), &user.token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, meal) = app.get_auth(&format!("/api/v1/meals/{meal_id}"), &user.token).await;
    assert!(meal["foods"].as_array().unwrap().is_empty());
    assert_eq!(meal["totals"]["calories"], 0.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_diet_nutrition_by_day_and_idempotence() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let chicken = create_food(
        &app,
        &user.token,
        json!({
            "name": "Chicken breast",
            "serving_size": 100.0,
            "calories": 165.0,
            "proteins": 31.0,
            "carbohydrates": 0.0,
            "fats": 3.6
        }),
    )
    .await;
    let rice = create_food(
        &app,
        &user.token,
        json!({
            "name": "Rice",
            "serving_size": 100.0,
            "calories": 100.0,
            "proteins": 2.0,
            "carbohydrates": 22.0,
            "fats": 0.5
        }),
    )
    .await;

    let daily = create_meal(
        &app,
        &user.token,
        "Daily",
        json!([{ "food_id": chicken, "quantity": 150.0 }]),
    )
    .await;
    let monday = create_meal(
        &app,
        &user.token,
        "Monday extra",
        json!([{ "food_id": rice, "quantity": 50.0 }]),
    )
    .await;

    let (status, diet) = app
        .post_auth(
            "/api/v1/diets",
            json!({
                "name": "Cut",
                "target_calories": 2000.0,
                "meal_ids": [daily["id"]],
                "days": [{ "day_of_week": 1, "meal_ids": [monday["id"]] }]
            }),
            &user.token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "diet create failed: {diet}");
    let diet_id = diet["id"].as_str().unwrap();
    assert_eq!(diet["meals"].as_array().unwrap().len(), 2);

    let path = format!("/api/v1/diets/{diet_id}/nutrition");

    let (status, all_days) = app.get_auth(&path, &user.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all_days["totals"]["calories"], 297.5);
    assert_eq!(all_days["targets"]["calories"], 2000.0);
    assert_eq!(all_days["difference"]["calories"], -1702.5);
    assert!(all_days["difference"]["proteins"].is_null());

    let (_, again) = app.get_auth(&path, &user.token).await;
    assert_eq!(all_days, again);

    let (_, monday_totals) = app.get_auth(&format!("{path}?day=1"), &user.token).await;
    assert_eq!(monday_totals["day_of_week"], 1);
    assert_eq!(monday_totals["totals"]["calories"], 297.5);

    let (_, tuesday_totals) = app.get_auth(&format!("{path}?day=2"), &user.token).await;
    assert_eq!(tuesday_totals["totals"]["calories"], 247.5);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_diet_meal_entries() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let meal = create_meal(&app, &user.token, "Snack", json!([])).await;
    let (_, diet) = app
        .post_auth("/api/v1/diets", json!({ "name": "Bulk" }), &user.token)
        .await;
    let diet_id = diet["id"].as_str().unwrap();

    let (status, entry) = app
        .post_auth(
            &format!("/api/v1/diets/{diet_id}/meals"),
            json!({ "meal_id": meal["id"], "day_of_week": 3 }),
            &user.token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["meal_name"], "Snack");
    assert_eq!(entry["day_of_week"], 3);

    let entry_id = entry["id"].as_str().unwrap();
    let (status, _) = app
        .delete_auth(&format!("/api/v1/diets/{diet_id}/meals/{entry_id}"), &user.token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, diet) = app.get_auth(&format!("/api/v1/diets/{diet_id}"), &user.token).await;
    assert!(diet["meals"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_food_search() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    for (name, brand) in [("Greek yogurt", "Fage"), ("Oat milk", "Oatly"), ("Rye bread", "")] {
        create_food(
            &app,
            &user.token,
            json!({
                "name": name,
                "brand": brand,
                "serving_size": 100.0,
                "calories": 60.0,
                "proteins": 3.0,
                "carbohydrates": 6.0,
                "fats": 1.0
            }),
        )
        .await;
    }

    let (status, foods) = app.get_auth("/api/v1/foods?search=OAT", &user.token).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = foods
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Oat milk"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_micronutrient_name_unique_per_user() {
    let app = common::TestApp::new().await;
    let alice = app.create_user().await;
    let bob = app.create_user().await;

    let body = json!({ "name": "Vitamin C", "unit": "mg" });

    let (status, _) = app.post_auth("/api/v1/micronutrients", body.clone(), &alice.token).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = app.post_auth("/api/v1/micronutrients", body.clone(), &alice.token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["error"]["code"], "CONFLICT");

    let (status, _) = app.post_auth("/api/v1/micronutrients", body, &bob.token).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_quantities_are_stored_at_column_scale() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let food_id = create_food(
        &app,
        &user.token,
        json!({
            "name": "Olive oil",
            "serving_size": 100.0,
            "calories": 884.0,
            "proteins": 0.0,
            "carbohydrates": 0.0,
            "fats": 100.0
        }),
    )
    .await;
    let meal = create_meal(
        &app,
        &user.token,
        "Dressing",
        json!([{ "food_id": food_id, "quantity": 0.125 }]),
    )
    .await;

    // Echoed as stored, rounded half away from zero
    assert_eq!(meal["foods"][0]["quantity"], 0.13);

    let (status, response) = app
        .post_auth(
            "/api/v1/foods",
            json!({
                "name": "Overflow",
                "serving_size": 100.0,
                "calories": 0.0,
                "proteins": 1e9,
                "carbohydrates": 0.0,
                "fats": 0.0
            }),
            &user.token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["field"], "proteins");
}
