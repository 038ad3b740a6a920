//! Prompt templates for the three deliberation stages

use crate::anonymize::{AnonymizedAnswer, CollectedAnswer};
use crate::core::model::Model;
use crate::core::question::Question;
use crate::ranking::AttributedRank;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the independent-answer stage
    pub fn initial_system() -> &'static str {
        r#"You are a knowledgeable expert sitting on a council of AI models.
Answer the user's question on your own merits. Other council members answer independently.
Be concise but comprehensive, and support your points with reasoning where appropriate.
Focus on accuracy and clarity."#
    }

    /// User prompt for the independent-answer stage: the question, verbatim
    pub fn initial_query(question: &Question) -> String {
        question.content().to_string()
    }

    /// System prompt for the peer review stage
    pub fn review_system() -> &'static str {
        r#"You are a critical, impartial reviewer evaluating anonymized answers from other experts.
Judge each answer only on accuracy, completeness, clarity and usefulness.
You do not know who wrote any answer; do not guess."#
    }

    /// User prompt for peer review.
    ///
    /// `answers` must already exclude the reviewer's own answer.
    pub fn review_prompt(question: &Question, answers: &[AnonymizedAnswer]) -> String {
        let mut prompt = format!(
            r#"You are evaluating different responses to the following question:

Question: {}

Here are the responses from different models (anonymized):
"#,
            question.content()
        );

        for answer in answers {
            prompt.push_str(&format!("\n{}:\n{}\n", answer.label, answer.text));
        }

        let example: Vec<String> = answers
            .iter()
            .rev()
            .enumerate()
            .map(|(i, a)| format!("{}. {}", i + 1, a.label))
            .collect();

        prompt.push_str(&format!(
            r#"
Your task:
1. First, evaluate each response individually.
2. Then provide a final ranking of every response above.

IMPORTANT: End with "FINAL RANKING:" followed by a numbered list from best to worst,
using the response labels exactly as written. For example:
FINAL RANKING:
{}

Now provide your evaluation and ranking:"#,
            example.join("\n")
        ));

        prompt
    }

    /// System prompt for the chairman
    pub fn synthesis_system() -> &'static str {
        r#"You are the Chairman of an LLM Council. Several AI models answered a question independently and then ranked each other's answers anonymously.
Your task is to synthesize a single, comprehensive, accurate answer that represents the council's collective wisdom.
Give weight to the peer ranking, but prefer well-reasoned content over popularity. Resolve disagreements explicitly."#
    }

    /// User prompt for the chairman.
    ///
    /// `ranking` is `None` when no usable peer ranking exists.
    pub fn synthesis_prompt(
        question: &Question,
        answers: &[CollectedAnswer],
        ranking: Option<&[AttributedRank]>,
        unavailable: &[Model],
    ) -> String {
        let mut prompt = format!(
            "Original Question: {}\n\nSTAGE 1 - Individual Responses:\n",
            question.content()
        );

        for answer in answers {
            prompt.push_str(&format!(
                "\nModel: {}\nResponse:\n{}\n",
                answer.participant, answer.text
            ));
        }

        prompt.push_str("\nSTAGE 2 - Peer Ranking (best first):\n");
        match ranking {
            Some(ranks) if !ranks.is_empty() => {
                for rank in ranks {
                    match rank.score {
                        Some(score) => prompt.push_str(&format!(
                            "{}. {} (score {:.2})\n",
                            rank.position, rank.participant, score
                        )),
                        None => prompt.push_str(&format!(
                            "{}. {} (not evaluated)\n",
                            rank.position, rank.participant
                        )),
                    }
                }
            }
            _ => prompt.push_str("No peer ranking is available; weigh the responses yourself.\n"),
        }

        if !unavailable.is_empty() {
            let names: Vec<&str> = unavailable.iter().map(|m| m.as_str()).collect();
            prompt.push_str(&format!(
                "\nUnavailable council members (no response): {}\n",
                names.join(", ")
            ));
        }

        prompt.push_str(
            "\nSynthesize all of this into a single, comprehensive, accurate answer that represents the council's collective wisdom:",
        );

        prompt
    }
}
