//! Canned replies for greetings and advice requests.

use super::rules::GreetingKind;

pub(crate) fn greeting_text(kind: GreetingKind) -> &'static str {
    match kind {
        GreetingKind::Identity => "Hello! I'm a mutual fund FAQ chatbot. I can answer factual questions about HDFC mutual fund schemes. What would you like to know?",
        GreetingKind::WellBeing => "I'm functioning well, thank you! I'm here to help you with factual information about HDFC mutual fund schemes. What would you like to know?",
        GreetingKind::Capability => "I can answer factual questions about 5 HDFC mutual fund schemes:
- HDFC Flexi Cap Fund
- HDFC Large Cap Fund
- HDFC ELSS Tax Saver
- HDFC Small Cap Fund
- HDFC Balanced Advantage Fund

You can ask about: expense ratio, exit load, minimum SIP amount, lock-in period, riskometer level, benchmark index, etc.

Type 'examples' to see sample questions!",
        GreetingKind::SelfIdentity => "I'm a mutual fund FAQ chatbot that provides factual information about HDFC mutual fund schemes. I don't provide investment advice, only facts from official sources.",
        GreetingKind::Help => "I can help you with factual information about HDFC mutual funds. Try asking: 'What is the expense ratio of HDFC Flexi Cap Fund?' or type 'examples' for more sample questions.",
        GreetingKind::Thanks => "You're welcome! Feel free to ask more questions about HDFC mutual funds.",
        GreetingKind::Farewell => "Goodbye! Have a great day!",
        GreetingKind::Fallback => "Hello! I'm here to answer factual questions about HDFC mutual fund schemes. What would you like to know?",
    }
}

pub(crate) const REFUSAL_TEXT: &str = "I cannot provide investment advice or recommendations.

However, I can share **factual information** about mutual fund schemes, such as:
- Expense ratios
- Exit loads
- Minimum SIP amounts
- Lock-in periods
- Riskometer levels
- Benchmark indices

**For personalized investment advice, please consult:**
- A SEBI-registered investment advisor
- Your financial planner
- An AMFI-registered mutual fund distributor

**Educational Resources:**
- [SEBI Investor Education](https://investor.sebi.gov.in/)
- [AMFI Investor Corner](https://www.amfiindia.com/investor-corner)
- [NISM Mutual Fund FAQs](https://www.nism.ac.in/)

Would you like to know any **factual information** about our covered schemes?";

pub(crate) const FACTUAL_EXAMPLES: &[&str] = &[
    "What is the expense ratio of HDFC Flexi Cap Fund?",
    "What is the exit load for HDFC Large Cap Fund?",
    "What is the minimum SIP amount for HDFC ELSS Tax Saver?",
    "What is the lock-in period for HDFC ELSS Tax Saver?",
    "What is the riskometer level of HDFC Small Cap Fund?",
    "What is the benchmark index for HDFC Balanced Advantage Fund?",
    "How do I download my mutual fund statement?",
];

pub(crate) const ADVICE_EXAMPLES: &[&str] = &[
    "Should I invest in HDFC Flexi Cap Fund?",
    "Which fund is better: HDFC Large Cap or HDFC Small Cap?",
    "How much should I invest in HDFC ELSS?",
    "Is HDFC Balanced Advantage Fund a good investment?",
    "When is the right time to invest in mutual funds?",
    "Can you recommend a fund for me?",
    "HDFC Flexi Cap vs HDFC Large Cap - which is better?",
    "Will HDFC Small Cap Fund give good returns?",
];
