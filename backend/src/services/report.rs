//! PDF reports
//!
//! Each report is a self-contained HTML page built from the same responses
//! the JSON API returns, then handed to a [`PdfRenderer`]. Every piece of
//! user-supplied text goes through [`esc`].

use super::pdf::PdfRenderer;
use super::{DietService, MealService, MeasurementService, TrainingService};
use crate::error::ApiError;
use chrono::{NaiveDate, Utc};
use diet_tracker_shared::types::{
    DietNutritionResponse, DietResponse, MealResponse, MeasurementResponse,
    MeasurementStatsResponse, NutritionTotals, TrainingResponse,
};
use diet_tracker_shared::weekday_name;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Measurements listed in the progress history table
const HISTORY_ROWS: usize = 10;

const STYLES: &str = r#"
<style>
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; font-size: 12px; line-height: 1.5; color: #333; }
  .header { text-align: center; margin-bottom: 30px; padding-bottom: 20px; border-bottom: 2px solid #4f46e5; }
  .header h1 { color: #4f46e5; font-size: 24px; margin-bottom: 5px; }
  .header p { color: #666; font-size: 14px; }
  .section { margin-bottom: 25px; }
  .section-title { font-size: 16px; font-weight: bold; color: #4f46e5; margin-bottom: 15px; padding-bottom: 5px; border-bottom: 1px solid #e5e7eb; }
  table { width: 100%; border-collapse: collapse; margin-bottom: 15px; }
  th, td { padding: 8px; text-align: left; border-bottom: 1px solid #e5e7eb; }
  th { background-color: #f3f4f6; font-weight: 600; color: #374151; }
  .card { background: #f9fafb; border-radius: 8px; padding: 15px; margin-bottom: 15px; }
  .card-title { font-weight: 600; margin-bottom: 10px; color: #1f2937; }
  .badge { display: inline-block; background: #e0e7ff; color: #4f46e5; padding: 2px 8px; border-radius: 4px; font-size: 11px; margin-right: 10px; }
  .summary { display: flex; justify-content: space-between; flex-wrap: wrap; }
  .summary-item { text-align: center; padding: 15px; background: white; border-radius: 8px; min-width: 100px; margin: 5px; }
  .summary-value { font-size: 20px; font-weight: bold; color: #4f46e5; }
  .summary-label { font-size: 11px; color: #666; }
  .gain { color: #16a34a; }
  .loss { color: #dc2626; }
  .footer { text-align: center; margin-top: 30px; padding-top: 20px; border-top: 1px solid #e5e7eb; color: #666; font-size: 10px; }
</style>
"#;

/// A rendered report ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct PdfReport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct ReportService;

impl ReportService {
    /// Diet sheet: daily totals, every scheduled meal, micronutrients
    pub async fn diet(
        db: &PgPool,
        renderer: &dyn PdfRenderer,
        user_id: Uuid,
        diet_id: Uuid,
    ) -> Result<PdfReport, ApiError> {
        let diet = DietService::get(db, user_id, diet_id).await?;
        let nutrition = DietService::nutrition(db, user_id, diet_id, None).await?;

        let mut meal_ids: Vec<Uuid> = Vec::new();
        for entry in &diet.meals {
            if !meal_ids.contains(&entry.meal_id) {
                meal_ids.push(entry.meal_id);
            }
        }
        let meals = MealService::get_many(db, user_id, &meal_ids).await?;

        let html = diet_html(&diet, &meals, &nutrition, today());
        render(renderer, html, "diet.pdf").await
    }

    /// Training sheet: numbered exercise plan plus space for notes
    pub async fn training(
        db: &PgPool,
        renderer: &dyn PdfRenderer,
        user_id: Uuid,
        training_id: Uuid,
    ) -> Result<PdfReport, ApiError> {
        let detail = TrainingService::get(db, user_id, training_id).await?;

        let html = training_html(&detail.training, today());
        render(renderer, html, "training.pdf").await
    }

    /// Progress report over the user's body measurements
    pub async fn progress(
        db: &PgPool,
        renderer: &dyn PdfRenderer,
        user_id: Uuid,
    ) -> Result<PdfReport, ApiError> {
        let stats = MeasurementService::stats(db, user_id).await?;
        let history = MeasurementService::list(db, user_id, Some(HISTORY_ROWS as i64)).await?;

        let html = progress_html(stats.as_ref(), &history, today());
        render(renderer, html, "progress.pdf").await
    }
}

async fn render(
    renderer: &dyn PdfRenderer,
    html: String,
    filename: &str,
) -> Result<PdfReport, ApiError> {
    let bytes = renderer.render(html).await.map_err(ApiError::Internal)?;

    tracing::info!(report = filename, size = bytes.len(), "PDF report rendered");

    Ok(PdfReport {
        filename: filename.to_string(),
        bytes,
    })
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn esc(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

fn page(title: &str, subtitle: &str, body: &str, generated: NaiveDate) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>{title}</title>
{STYLES}
</head>
<body>
<div class="header">
<h1>{title}</h1>
{subtitle}
</div>
{body}
<div class="footer"><p>Generated on {generated}</p></div>
</body>
</html>
"#,
        title = esc(title),
        generated = generated.format("%Y-%m-%d"),
    )
}

fn summary_item(value: &str, label: &str, class: Option<&str>) -> String {
    let class = class.map(|c| format!(" {c}")).unwrap_or_default();
    format!(
        r#"<div class="summary-item"><div class="summary-value{class}">{value}</div><div class="summary-label">{label}</div></div>"#
    )
}

fn macro_summary(totals: &NutritionTotals) -> String {
    let items = [
        summary_item(&format!("{}", totals.calories), "Calories", None),
        summary_item(&format!("{}g", totals.proteins), "Proteins", None),
        summary_item(&format!("{}g", totals.carbohydrates), "Carbohydrates", None),
        summary_item(&format!("{}g", totals.fats), "Fats", None),
        summary_item(&format!("{}g", totals.fiber), "Fiber", None),
    ];
    format!(r#"<div class="summary">{}</div>"#, items.concat())
}

fn schedule_label(day_of_week: Option<i16>) -> &'static str {
    match day_of_week {
        None => "Every day",
        Some(day) => weekday_name(day).unwrap_or("Unknown day"),
    }
}

/// Diet report HTML
pub fn diet_html(
    diet: &DietResponse,
    meals: &[MealResponse],
    nutrition: &DietNutritionResponse,
    generated: NaiveDate,
) -> String {
    let meals_by_id: HashMap<Uuid, &MealResponse> = meals.iter().map(|m| (m.id, m)).collect();

    let mut body = String::new();

    body.push_str(r#"<div class="section"><h2 class="section-title">Nutrition summary</h2>"#);
    body.push_str(&macro_summary(&nutrition.totals));
    body.push_str("</div>");

    body.push_str(r#"<div class="section"><h2 class="section-title">Meals</h2>"#);
    for entry in &diet.meals {
        let Some(meal) = meals_by_id.get(&entry.meal_id) else {
            continue;
        };

        let time = meal
            .time
            .as_deref()
            .map(|t| format!(r#"<span class="badge">{}</span>"#, esc(t)))
            .unwrap_or_default();

        let rows: String = meal
            .foods
            .iter()
            .map(|food| {
                let brand = food
                    .brand
                    .as_deref()
                    .map(|b| format!(" <small>({})</small>", esc(b)))
                    .unwrap_or_default();
                format!(
                    "<tr><td>{}{}</td><td>{} {}</td><td>{}</td></tr>",
                    esc(&food.food_name),
                    brand,
                    food.quantity,
                    esc(&food.serving_unit),
                    food.notes.as_deref().map(esc).unwrap_or_else(|| "-".to_string()),
                )
            })
            .collect();

        body.push_str(&format!(
            r#"<div class="card"><div class="card-title">{time}{name} <small>{day}</small></div>
<table><thead><tr><th>Food</th><th>Quantity</th><th>Notes</th></tr></thead><tbody>{rows}</tbody></table>
<p>{cal} kcal | P {p}g | C {c}g | F {f}g</p></div>"#,
            name = esc(&meal.name),
            day = schedule_label(entry.day_of_week),
            cal = meal.totals.calories,
            p = meal.totals.proteins,
            c = meal.totals.carbohydrates,
            f = meal.totals.fats,
        ));
    }
    body.push_str("</div>");

    if !nutrition.totals.micronutrients.is_empty() {
        let rows: String = nutrition
            .totals
            .micronutrients
            .iter()
            .map(|m| format!("<tr><td>{}</td><td>{} {}</td></tr>", esc(&m.name), m.amount, esc(&m.unit)))
            .collect();

        body.push_str(&format!(
            r#"<div class="section"><h2 class="section-title">Micronutrients</h2>
<table><thead><tr><th>Nutrient</th><th>Amount</th></tr></thead><tbody>{rows}</tbody></table></div>"#
        ));
    }

    let subtitle = diet
        .description
        .as_deref()
        .map(|d| format!("<p>{}</p>", esc(d)))
        .unwrap_or_default();

    page(&diet.name, &subtitle, &body, generated)
}

/// Training report HTML
pub fn training_html(training: &TrainingResponse, generated: NaiveDate) -> String {
    let rows: String = training
        .exercises
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let group = line
                .muscle_group
                .as_deref()
                .map(|g| format!("<br><small>{}</small>", esc(g)))
                .unwrap_or_default();
            format!(
                "<tr><td>{}</td><td><strong>{}</strong>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                index + 1,
                esc(&line.exercise_name),
                group,
                line.sets,
                esc(&line.reps),
                line.weight.map(|w| format!("{w}kg")).unwrap_or_else(|| "-".to_string()),
                line.rest_seconds.map(|r| format!("{r}s")).unwrap_or_else(|| "-".to_string()),
                line.notes.as_deref().map(esc).unwrap_or_else(|| "-".to_string()),
            )
        })
        .collect();

    let body = format!(
        r#"<div class="section"><h2 class="section-title">Exercises</h2>
<table><thead><tr><th>#</th><th>Exercise</th><th>Sets</th><th>Reps</th><th>Load</th><th>Rest</th><th>Notes</th></tr></thead>
<tbody>{rows}</tbody></table></div>
<div class="section"><h2 class="section-title">Session notes</h2>
<div class="card"><p>Date: ____/____/________</p><p>Actual duration: ______ minutes</p><p>Notes: ______________________________</p></div></div>"#
    );

    let mut subtitle = format!(
        "<p>{}</p>",
        training
            .description
            .as_deref()
            .map(esc)
            .unwrap_or_else(|| "Training plan".to_string())
    );
    if let Some(duration) = training.duration {
        subtitle.push_str(&format!("<p>Estimated duration: {duration} minutes</p>"));
    }

    page(&training.name, &subtitle, &body, generated)
}

fn signed(value: f64, unit: &str) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{value:.1}{unit}")
}

/// Progress report HTML; `history` is newest first
pub fn progress_html(
    stats: Option<&MeasurementStatsResponse>,
    history: &[MeasurementResponse],
    generated: NaiveDate,
) -> String {
    let mut body = String::new();

    if let Some(stats) = stats {
        let mut items = String::new();
        // Losing weight or fat and gaining muscle are shown as progress
        if let Some(weight) = stats.changes.weight {
            let class = if weight < 0.0 { "gain" } else { "loss" };
            items.push_str(&summary_item(&signed(weight, "kg"), "Weight", Some(class)));
        }
        if let Some(body_fat) = stats.changes.body_fat {
            let class = if body_fat < 0.0 { "gain" } else { "loss" };
            items.push_str(&summary_item(&signed(body_fat, "%"), "Body fat", Some(class)));
        }
        if let Some(muscle) = stats.changes.muscle_mass {
            let class = if muscle > 0.0 { "gain" } else { "loss" };
            items.push_str(&summary_item(&signed(muscle, "kg"), "Muscle mass", Some(class)));
        }

        body.push_str(&format!(
            r#"<div class="section"><h2 class="section-title">Change over {} days</h2><div class="summary">{items}</div></div>"#,
            stats.period_days
        ));
    }

    let cell = |value: Option<f64>, unit: &str| {
        value
            .map(|v| format!("{v}{unit}"))
            .unwrap_or_else(|| "-".to_string())
    };

    let rows: String = history
        .iter()
        .take(HISTORY_ROWS)
        .map(|m| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                m.date.format("%Y-%m-%d"),
                cell(m.weight, "kg"),
                cell(m.body_fat, "%"),
                cell(m.muscle_mass, "kg"),
                cell(m.chest, "cm"),
                cell(m.waist, "cm"),
                cell(m.right_arm, "cm"),
            )
        })
        .collect();

    body.push_str(&format!(
        r#"<div class="section"><h2 class="section-title">Measurement history</h2>
<table><thead><tr><th>Date</th><th>Weight</th><th>Body fat</th><th>Muscle</th><th>Chest</th><th>Waist</th><th>Arm</th></tr></thead>
<tbody>{rows}</tbody></table></div>"#
    ));

    page(
        "Progress report",
        "<p>Body measurement tracking</p>",
        &body,
        generated,
    )
}
