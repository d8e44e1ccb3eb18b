use kitsusa::error::AppError;
use kitsusa::evaluation::{
    EvaluationOutcome, EvaluationRequest, EvaluationSummary, FactorKind, MatrixInformation,
    ScoreResult, Standards, StandardsCatalog, ValidationReport, WorkTimeCategory,
};
use serde::Serialize;

#[derive(Serialize)]
struct OutcomeReport<'a> {
    outcome: &'a EvaluationOutcome,
    summary: EvaluationSummary,
}

pub(crate) fn render_outcome_json(outcome: &EvaluationOutcome) -> Result<(), AppError> {
    let report = OutcomeReport {
        outcome,
        summary: outcome.summary(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn render_outcome(outcome: &EvaluationOutcome, standards: &Standards) {
    let result = &outcome.result;
    println!("3K evaluation {}: {}", outcome.evaluation_id, outcome.work_name);
    println!(
        "Standards version {} (effective {})",
        standards.version, standards.effective_date
    );
    match &outcome.work_time {
        Some(category) => println!(
            "Work time: class {:?}, factor {}",
            category.class, category.factor
        ),
        None => println!("Work time: not recorded (factor 1.0)"),
    }

    println!("\nFactor scores (raw -> adjusted)");
    for factor in FactorKind::ALL {
        let adjusted = result.calculation_details.adjusted_scores.get(factor);
        render_factor(factor, outcome.factor(factor), adjusted);
    }

    println!(
        "\nFinal 3K index: {} ({}) with score {}",
        result.final_3k_index,
        result.final_3k_index.label(),
        result.final_kitsusa_score
    );

    if !outcome.missing_data.is_empty() {
        let missing: Vec<&str> = outcome.missing_data.iter().map(|f| f.label()).collect();
        println!("No data for: {}", missing.join(", "));
    }
    if !outcome.warnings.is_empty() {
        println!("\nWarnings");
        for warning in &outcome.warnings {
            println!("- {warning}");
        }
    }

    let summary = outcome.summary();
    println!("\n{}", summary.summary);
    if !summary.priority_actions.is_empty() {
        println!("\nPriority actions");
        for (index, action) in summary.priority_actions.iter().enumerate() {
            println!("{}. {}", index + 1, action);
        }
    }
    for recommendation in &summary.recommendations {
        println!(
            "\n{} ({}): review {}",
            recommendation.factor, recommendation.score, recommendation.focus
        );
        for action in &recommendation.actions {
            println!("  - {action}");
        }
    }
}

fn render_factor(factor: FactorKind, score: &ScoreResult, adjusted: u8) {
    println!("- {}: {} -> {}", factor, score.score, adjusted);
    for component in &score.details {
        let subject = component
            .subject
            .as_deref()
            .map(|subject| format!(" [{subject}]"))
            .unwrap_or_default();
        println!(
            "    {:?}{}: {} ({:?}; {})",
            component.subdimension,
            subject,
            component.score,
            component.calculation_method,
            component.notes
        );
    }
}

pub(crate) fn render_validation(request: &EvaluationRequest, report: &ValidationReport) {
    println!(
        "Validation for {} ({})",
        request.evaluation_id, request.work_name
    );
    println!("Result: {}", if report.is_valid { "valid" } else { "invalid" });

    if !report.errors.is_empty() {
        println!("\nErrors");
        for error in &report.errors {
            println!("- {error}");
        }
    }
    if !report.warnings.is_empty() {
        println!("\nWarnings");
        for warning in &report.warnings {
            println!("- {warning}");
        }
    }
    if !report.missing_data.is_empty() {
        let missing: Vec<&str> = report.missing_data.iter().map(|f| f.label()).collect();
        println!("\nNo data for: {}", missing.join(", "));
    }
}

pub(crate) fn render_matrix_statistics(information: &MatrixInformation) {
    let matrix = &information.matrix;
    let statistics = &information.statistics;
    println!("{} ({}, version {})", matrix.name, matrix.id, matrix.version);
    println!(
        "Axes: {} (y, {} levels) x {} (x, {} levels)",
        matrix.y_axis.name,
        matrix.y_axis.levels.len(),
        matrix.x_axis.name,
        matrix.x_axis.levels.len()
    );
    println!(
        "Cells: {}, scores {}..={}, average {:.2}",
        statistics.total_cells, statistics.min_score, statistics.max_score, statistics.average_score
    );

    println!("\nScore distribution");
    for (score, count) in &statistics.score_distribution {
        println!("- {score}: {count}");
    }
    println!("\nRisk levels");
    for (level, count) in &statistics.risk_level_distribution {
        println!("- {}: {count}", level.label());
    }
}

pub(crate) fn render_work_time(hours: f64, category: &WorkTimeCategory, standards: &Standards) {
    println!(
        "{hours} h/day -> class {:?}, factor {} (standards {})",
        category.class, category.factor, standards.version
    );
}

pub(crate) fn render_standards(catalog: &StandardsCatalog, selected: &Standards) {
    println!("Standards versions");
    for standards in catalog.versions() {
        let marker = if standards.version == selected.version
            && standards.effective_date == selected.effective_date
        {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {} effective {}: {} registered substances",
            standards.version,
            standards.effective_date,
            standards.environmental.chemicals.len()
        );
        println!("    source: {}", standards.reference_source);
    }
}
