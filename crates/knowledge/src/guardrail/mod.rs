//! Question classification: greeting, advice request, or factual question.
//!
//! Rules are checked in a fixed order. Greetings win over advice, and
//! anything unmatched is factual. Classification is pure and never
//! touches the network.

mod responses;
mod rules;

pub use rules::GreetingKind;

use crate::rag::AnswerResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Greeting,
    Advice,
    Factual,
}

pub fn classify(question: &str) -> Classification {
    let normalized = rules::normalize(question);

    if rules::is_greeting(&normalized) {
        Classification::Greeting
    } else if rules::is_advice(&normalized) {
        Classification::Advice
    } else {
        Classification::Factual
    }
}

/// The canned reply bucket for a greeting.
pub fn greeting_kind(question: &str) -> GreetingKind {
    rules::greeting_kind(&rules::normalize(question))
}

pub fn greeting_response(question: &str) -> AnswerResponse {
    let kind = greeting_kind(question);
    tracing::debug!("Greeting reply: {:?}", kind);
    AnswerResponse::greeting(question, responses::greeting_text(kind))
}

pub fn refusal_response(question: &str) -> AnswerResponse {
    AnswerResponse::advice_refusal(question, responses::REFUSAL_TEXT)
}

/// The refusal when `question` asks for advice, otherwise `None`.
pub fn check_and_respond(question: &str) -> Option<AnswerResponse> {
    rules::is_advice(&rules::normalize(question)).then(|| refusal_response(question))
}

pub fn example_factual_questions() -> &'static [&'static str] {
    responses::FACTUAL_EXAMPLES
}

pub fn example_advice_questions() -> &'static [&'static str] {
    responses::ADVICE_EXAMPLES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_greetings() {
        for q in rules::EXACT_GREETINGS.iter().chain(rules::CASUAL_PHRASES) {
            assert_eq!(classify(q), Classification::Greeting, "{q}");
        }
        assert_eq!(classify("  HELLO  "), Classification::Greeting);
        assert_eq!(classify("Thanks a lot!"), Classification::Greeting);
    }

    #[test]
    fn test_factual_examples_pass() {
        for q in example_factual_questions() {
            assert_eq!(classify(q), Classification::Factual, "{q}");
        }
    }

    #[test]
    fn test_advice_examples_blocked() {
        for q in example_advice_questions() {
            assert_eq!(classify(q), Classification::Advice, "{q}");
        }
    }

    #[test]
    fn test_advice_patterns() {
        for q in [
            "Can I invest 5000 monthly?",
            "Will this scheme provide steady income?",
            "Large cap versus small cap",
            "Is it better than an FD?",
            "Is ELSS worth investing?",
            "Which is the best option?",
        ] {
            assert_eq!(classify(q), Classification::Advice, "{q}");
        }
    }

    #[test]
    fn test_greeting_beats_advice() {
        assert_eq!(classify("help me pick a portfolio"), Classification::Greeting);
    }

    #[test]
    fn test_empty_question_is_factual() {
        assert_eq!(classify(""), Classification::Factual);
        assert_eq!(classify("   "), Classification::Factual);
    }

    #[test]
    fn test_greeting_responses() {
        let r = greeting_response("Hello");
        assert!(r.is_greeting());
        assert!(r.sources().is_empty());
        assert!(r.answer().starts_with("Hello! I'm a mutual fund FAQ chatbot."));

        assert_eq!(greeting_response("bye").answer(), "Goodbye! Have a great day!");
        assert!(greeting_response("what can you do")
            .answer()
            .contains("HDFC Balanced Advantage Fund"));
        assert!(greeting_response("greetings")
            .answer()
            .starts_with("Hello! I'm here to answer"));
    }

    #[test]
    fn test_refusal_response() {
        let r = check_and_respond("Should I invest in Fund X?").unwrap();
        assert!(r.is_advice_refusal());
        assert!(r.sources().is_empty());
        assert_eq!(r.retrieved_docs(), 0);
        assert!(r.answer().contains("https://investor.sebi.gov.in/"));
        assert!(r.answer().contains("https://www.amfiindia.com/investor-corner"));
        assert!(r.answer().contains("https://www.nism.ac.in/"));

        assert!(check_and_respond("What is the exit load?").is_none());
    }
}
