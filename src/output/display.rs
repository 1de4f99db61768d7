//! Display functions for command results

use super::formatters::{format_cursor, results_to_emoji, score_bar};
use crate::commands::AuditReport;
use crate::core::PuzzleCard;
use crate::engine::{EndlessBatch, GuessEvaluation, LevelWindow};
use crate::service::types::{CategoryScore, CategorySummary, ProgressResponse};
use colored::Colorize;

/// Print the result of scoring a guess
pub fn print_evaluation(guess: &str, evaluation: &GuessEvaluation) {
    println!("\n{}", "─".repeat(60).cyan());
    println!("Guess: {}", guess.bright_yellow().bold());
    println!("{}", "─".repeat(60).cyan());

    println!("\n  {}", results_to_emoji(&evaluation.word_results));
    println!(
        "  Score: [{}] {}",
        score_bar(evaluation.score, 30).green(),
        format!("{:.2}", evaluation.score).bright_yellow()
    );

    println!();
    if evaluation.is_solved() {
        println!("{}", "✅ Solved!".green().bold());
    } else {
        println!("{}", "❌ Not quite".red().bold());
    }
}

/// Print a puzzle as a player sees it
pub fn print_card(card: &PuzzleCard) {
    println!(
        "{} {}",
        format!("#{}", card.position).bright_black(),
        card.acronym.bright_yellow().bold()
    );
    println!("   Clue: {}", card.clue);
    println!("   Par:  {}", card.par_score);
}

/// Print a page of levels
pub fn print_level_window(window: &LevelWindow) {
    println!("\n{}", "═".repeat(60).cyan());
    match window.center_position {
        Some(center) => println!(" {} around {center}", "LEVELS".bright_cyan().bold()),
        None => println!(" {}", "LEVELS".bright_cyan().bold()),
    }
    println!("{}", "═".repeat(60).cyan());

    if window.items.is_empty() {
        println!("\n   (no levels)");
    }
    for item in &window.items {
        let status = match item.score {
            Some(score) if score <= i64::from(item.par_score) => {
                format!("✓ {score}").green().to_string()
            }
            Some(score) => format!("✓ {score}").yellow().to_string(),
            None => "·".bright_black().to_string(),
        };
        println!("   {:>4}  par {:<2}  {status}", item.position, item.par_score);
    }

    println!(
        "\n   prev: {} {}   next: {} {}",
        format_cursor(window.prev_cursor),
        if window.has_prev { "◀" } else { " " },
        if window.has_more { "▶" } else { " " },
        format_cursor(window.next_cursor)
    );
}

/// Print an endless batch
pub fn print_endless_batch(batch: &EndlessBatch) {
    println!(
        "\n🎲 {} of {} available",
        batch.count.to_string().bright_yellow().bold(),
        batch.total_available
    );
    for card in &batch.puzzles {
        print_card(card);
    }
}

/// Print the category list
pub fn print_categories(categories: &[CategorySummary]) {
    for category in categories {
        let mut line = format!("{} {} ({})", category.emoji, category.name.bold(), category.slug);
        if let Some(high_score) = category.high_score {
            line.push_str(&format!("  best {high_score}").bright_yellow().to_string());
        }
        if let Some(badge) = &category.badge {
            line.push_str(&format!("  [{badge}]").green().to_string());
        }
        println!("{line}");
    }
}

/// Print the endless score board
pub fn print_scores(scores: &[CategoryScore]) {
    println!("\n📊 {}", "Endless high scores".bright_cyan().bold());
    for row in scores {
        println!("   {:<20} {:>5}", row.category_slug, row.high_score);
    }
}

/// Print the outcome of a progress submission
pub fn print_progress(response: &ProgressResponse) {
    if response.created {
        println!("{}", format!("✅ Progress saved (id {})", response.id).green());
    } else {
        println!(
            "{}",
            format!("ℹ️  Progress already recorded (id {})", response.id).yellow()
        );
    }
}

/// Print the result of a catalog audit
pub fn print_audit_report(report: &AuditReport) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} ", "CATALOG AUDIT".bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    println!("   Categories:      {}", report.categories);
    println!("   Puzzles checked: {}", report.puzzles_checked);
    println!("   Time taken:      {:.2}s", report.duration.as_secs_f64());

    println!();
    if report.is_clean() {
        println!("{}", "✅ No issues found".green().bold());
        return;
    }
    println!(
        "{}",
        format!("❌ {} issue(s)", report.issues.len()).red().bold()
    );
    for issue in &report.issues {
        println!("   - {issue}");
    }
}
