//! Examples command handler.

use super::print_json;
use clap::Args;
use fundqa_core::AppResult;
use fundqa_knowledge::guardrail;

/// Print example questions
#[derive(Args, Debug)]
pub struct ExamplesCommand {
    /// Also list questions that are refused as investment advice
    #[arg(long)]
    pub advice: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExamplesCommand {
    pub fn execute(&self) -> AppResult<()> {
        tracing::info!("Executing examples command");

        let factual = guardrail::example_factual_questions();
        let advice = guardrail::example_advice_questions();

        if self.json {
            let mut output = serde_json::json!({ "factual": factual });
            if self.advice {
                output["advice"] = serde_json::json!(advice);
            }
            return print_json(&output);
        }

        println!("Example questions:");
        print_numbered(factual);

        if self.advice {
            println!();
            println!("Refused as investment advice:");
            print_numbered(advice);
        }

        Ok(())
    }
}

fn print_numbered(questions: &[&str]) {
    for (i, question) in questions.iter().enumerate() {
        println!("  {}. {}", i + 1, question);
    }
}
