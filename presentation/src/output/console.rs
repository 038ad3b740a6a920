//! Console output formatter for deliberation results

use colored::Colorize;
use council_domain::core::string::{one_line, truncate};
use council_domain::{
    CostTier, DeliberationResult, DeliberationStatus, LineupSource, OutputFormat, QueryAttempt,
    StageStatus,
};

const PREVIEW_LEN: usize = 200;
const REASON_LEN: usize = 160;

/// Formats deliberation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors on or off for everything rendered afterwards
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Render in the requested format
    pub fn render(result: &DeliberationResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(result),
            OutputFormat::Synthesis => Self::format_synthesis_only(result),
            OutputFormat::Json => Self::format_json(result),
        }
    }

    /// Format the complete result, stage by stage
    pub fn format(result: &DeliberationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("LLM Council Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            result.question
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Council:".cyan().bold(),
            Self::lineup_description(result)
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Chairman:".cyan().bold(),
            result.chairman
        ));

        // Stage 1: Individual Responses
        output.push_str(&Self::section_header(result, 0));
        for answer in &result.answers {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ({}) ──", answer.participant, answer.label)
                    .yellow()
                    .bold(),
                answer.text
            ));
        }
        for failed in result.failed_responses() {
            output.push_str(&format!(
                "\n{}\nError: {}\n",
                format!("── {} ──", failed.participant).red().bold(),
                Self::reason(failed)
            ));
        }

        // Stage 2: Peer Ranking
        output.push_str(&Self::section_header(result, 1));
        if result.ranking.is_empty() {
            output.push_str(&format!("\n{}\n", "No peer ranking.".dimmed()));
        } else {
            output.push('\n');
            for rank in &result.ranking {
                let score = rank
                    .score
                    .map(|s| format!("score {:.2}", s))
                    .unwrap_or_else(|| "not evaluated".to_string());
                output.push_str(&format!(
                    "  {}. {} {}\n",
                    rank.position,
                    rank.participant,
                    format!("({}, {})", rank.label, score).dimmed()
                ));
            }
        }
        for review in &result.reviews {
            let marker = if review.parsed.is_parsed() {
                "v".green()
            } else {
                "?".yellow()
            };
            let detail = match review.attempt.text() {
                Some(text) => truncate(text.trim(), PREVIEW_LEN),
                None => Self::reason(&review.attempt),
            };
            output.push_str(&format!(
                "\n{} {}\n{}\n",
                marker,
                format!("── {} ──", review.reviewer).yellow().bold(),
                detail
            ));
        }

        // Stage 3: Chairman Synthesis
        output.push_str(&Self::section_header(result, 2));
        for attempt in result.synthesis_attempts.iter().filter(|a| !a.is_success()) {
            output.push_str(&format!(
                "\n{} {}\n",
                format!("Chairman {} failed:", attempt.participant).red(),
                Self::reason(attempt)
            ));
        }
        match &result.synthesis {
            Some(synthesis) => {
                let title = if synthesis.fallback {
                    format!("Chairman: {} (fallback)", synthesis.chairman)
                } else {
                    format!("Chairman: {}", synthesis.chairman)
                };
                output.push_str(&format!(
                    "\n{}\n\n{}\n",
                    title.yellow().bold(),
                    synthesis.text
                ));
            }
            None => output.push_str(&format!("\n{}\n", "No synthesis was produced.".red())),
        }

        output.push_str(&Self::footer(result));

        output
    }

    /// Format as JSON
    pub fn format_json(result: &DeliberationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format synthesis only (concise output)
    pub fn format_synthesis_only(result: &DeliberationResult) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "=".repeat(60)));
        output.push_str(&format!("{}\n", "COUNCIL'S ANSWER".cyan().bold()));
        output.push_str(&format!("{}\n", "=".repeat(60)));

        match result.final_answer() {
            Some(answer) => output.push_str(answer),
            None => {
                output.push_str(&format!(
                    "{}\n",
                    "The chairman could not synthesize an answer.".red()
                ));
                if let Some(top) = Self::top_answer(result) {
                    output.push_str(&format!(
                        "\n{}\n{}",
                        format!("Top-ranked response ({}):", top.0).yellow().bold(),
                        top.1
                    ));
                }
            }
        }
        output.push('\n');

        output.push_str(&format!("\n{}\n", "-".repeat(60)));
        let members: Vec<&str> = result
            .successful_responses()
            .map(|a| a.participant.short_name())
            .collect();
        output.push_str(&format!(
            "{} {}\n",
            "Deliberated by:".dimmed(),
            members.join(", ")
        ));
        if let Some(synthesis) = &result.synthesis {
            output.push_str(&format!(
                "{} {}\n",
                "Synthesized by:".dimmed(),
                synthesis.chairman.short_name()
            ));
        }
        let unavailable: Vec<&str> = result
            .failed_responses()
            .map(|a| a.participant.short_name())
            .collect();
        if !unavailable.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Unavailable:".dimmed(),
                unavailable.join(", ")
            ));
        }

        output
    }

    /// Table of built-in tier lineups (for `--show-models`)
    pub fn format_tiers() -> String {
        let mut output = String::new();
        for tier in CostTier::all() {
            let lineup = tier.static_lineup();
            let marker = if tier == CostTier::default() {
                " (default)"
            } else {
                ""
            };
            output.push_str(&format!("{}{}\n", tier.as_str().cyan().bold(), marker));
            for model in &lineup.council {
                output.push_str(&format!("  {}\n", model));
            }
            output.push_str(&format!("  {} {}\n\n", "chairman:".dimmed(), lineup.chairman));
        }
        output
    }

    fn reason(attempt: &QueryAttempt) -> String {
        attempt
            .failure_reason()
            .map(|failure| one_line(&failure.to_string(), REASON_LEN))
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Highest-ranked answer, else the first collected one
    fn top_answer(result: &DeliberationResult) -> Option<(String, &str)> {
        let ranked = result.ranking.first().and_then(|rank| {
            result
                .answers
                .iter()
                .find(|a| a.label == rank.label)
        });
        ranked
            .or_else(|| result.answers.first())
            .map(|a| (a.participant.to_string(), a.text.as_str()))
    }

    fn lineup_description(result: &DeliberationResult) -> String {
        let source = match result.lineup {
            LineupSource::Explicit => "explicit".to_string(),
            LineupSource::Discovered => "discovered".to_string(),
            LineupSource::Static => "built-in".to_string(),
        };
        let members: Vec<String> = result
            .participants
            .iter()
            .filter(|p| p.is_contributor())
            .map(|p| p.model.to_string())
            .collect();
        match result.tier {
            Some(tier) => format!("{} [{} tier, {}]", members.join(", "), tier, source),
            None => format!("{} [{}]", members.join(", "), source),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(result: &DeliberationResult, index: usize) -> String {
        let Some(summary) = result.stages.get(index) else {
            return String::new();
        };
        let status = match summary.status {
            StageStatus::Succeeded => "ok".green(),
            StageStatus::Degraded => "degraded".yellow(),
            StageStatus::Failed => "failed".red(),
            StageStatus::Skipped => "skipped".dimmed(),
        };
        let mut line = format!(
            "{} [{} {}/{}]",
            summary.stage, status, summary.succeeded, summary.attempted
        );
        if let Some(note) = &summary.note {
            line.push_str(&format!(" {}", note.dimmed()));
        }
        format!("\n{}\n{}\n", line.cyan().bold(), "-".repeat(40))
    }

    fn footer(result: &DeliberationResult) -> String {
        let status = match result.status {
            DeliberationStatus::Complete => result.status.as_str().green(),
            DeliberationStatus::PartialNoSynthesis => result.status.as_str().yellow(),
            DeliberationStatus::Failed => result.status.as_str().red(),
        };
        format!(
            "\n{}\n{} {}  {} {} ms\n",
            "=".repeat(60).cyan(),
            "Status:".bold(),
            status,
            "Total:".bold(),
            result.timing.total_ms
        )
    }
}
