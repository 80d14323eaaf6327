use std::path::PathBuf;

use insight_core::model::ResponseId;
use services::CatalogQuery;
use ui::TextReport;
use ui::vm::{average_label, map_result_cards, map_result_detail, map_test_cards};

use super::print_json;
use crate::context::AppContext;

pub async fn list_tests(
    ctx: &AppContext,
    query: &CatalogQuery,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tests = ctx.catalog.tests_for(&ctx.user, query).await;
    let cards = map_test_cards(&tests, ctx.clock.now());
    if json {
        return print_json(&cards);
    }

    if cards.is_empty() {
        println!("No tests found.");
        return Ok(());
    }
    for card in &cards {
        println!("[{}] {} ({}, {})", card.id, card.title, card.subject, card.difficulty);
        println!(
            "    {} | {} | {} | by {}",
            card.marks_label, card.duration_label, card.questions_label, card.instructor
        );
        println!("    {} | {}", card.scheduled_label, card.action_label);
    }
    Ok(())
}

pub async fn list_results(
    ctx: &AppContext,
    query: &CatalogQuery,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let results = ctx.catalog.results_for(&ctx.user, query).await;
    let cards = map_result_cards(&results);
    let average = average_label(ctx.catalog.average_score(&ctx.user).await);
    if json {
        return print_json(&serde_json::json!({ "average": average, "results": cards }));
    }

    println!("Average score: {average}");
    if cards.is_empty() {
        println!("No results found.");
        return Ok(());
    }
    for card in &cards {
        println!("[{}] {} ({}, {})", card.id, card.title, card.subject, card.difficulty);
        println!(
            "    {} | {} [{}] | {} | {}",
            card.score_label, card.percentage_label, card.band, card.questions_label, card.duration_label
        );
        println!("    {} | {}", card.submitted_label, card.creator_label);
    }
    Ok(())
}

pub async fn show_result(
    ctx: &AppContext,
    id: &str,
    report_dir: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(result) = ctx
        .catalog
        .result_by_id(&ctx.user, &ResponseId::new(id))
        .await
    else {
        println!("Result {id} not found; see `insight results`.");
        return Ok(());
    };

    if let Some(dir) = report_dir {
        let report = TextReport::new(&result, &ctx.user, ctx.clock.now());
        let path = dir.join(report.file_name());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(&path, report.to_string()).await?;
        println!("Report written to {}", path.display());
    }

    let detail = map_result_detail(&result);
    if json {
        return print_json(&detail);
    }

    println!("{} ({}, {}, {})", detail.title, detail.subject, detail.difficulty, detail.duration_label);
    println!(
        "Score {} | {} [{}] | {} questions | submitted {}",
        detail.score_label,
        detail.percentage_label,
        detail.band.label(),
        detail.question_count,
        detail.submitted_label
    );
    for question in &detail.questions {
        println!();
        println!("{}: {}", question.title, question.question);
        println!("  Your answer:   {}", question.answer);
        println!("  Sample answer: {}", question.sample_answer);
        println!("  {} | {}", question.similarity_label, question.marks_label);
        println!("  {}", question.feedback);
    }
    Ok(())
}
