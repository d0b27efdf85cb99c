//! Narrative summary synthesis.
//!
//! RULE: Rules are tried in slice order and the first match wins.
//! A query mentioning both "food" and "fintech" is a fintech query.
//! No match falls back to the generic body; there is no other path.

/// One keyword-triggered summary body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRule {
    /// Lower-case substrings, any of which selects this rule.
    pub keywords: &'static [&'static str],
    /// Category label for history listings.
    pub category: &'static str,
    pub body:     &'static str,
}

impl SummaryRule {
    fn matches(&self, lowered_query: &str) -> bool {
        self.keywords.iter().any(|k| lowered_query.contains(k))
    }
}

pub const SUMMARY_RULES: &[SummaryRule] = &[
    SummaryRule {
        keywords: &["fintech", "finance"],
        category: "FinTech",
        body: "The fintech sector shows strong adoption patterns, particularly among urban \
               millennials and SME owners. Key success factors include regulatory compliance, \
               security measures, and strategic partnerships with established financial \
               institutions.",
    },
    SummaryRule {
        keywords: &["edtech", "education"],
        category: "EdTech",
        body: "The education technology market demonstrates significant opportunity, especially \
               in urban centers with high smartphone penetration. Student segments show high \
               engagement but lower spending capacity, while professional development shows \
               higher monetization potential.",
    },
    SummaryRule {
        keywords: &["food", "delivery"],
        category: "Food Tech",
        body: "Food delivery services show strong market demand in major cities like Lagos and \
               Abuja. Success depends on logistics optimization, restaurant partnerships, and \
               competitive pricing strategies. Rural expansion presents longer-term \
               opportunities.",
    },
];

pub const FALLBACK_CATEGORY: &str = "General";

pub const FALLBACK_BODY: &str = "Your startup concept shows solid market validation with \
    favorable adoption rates in key demographic segments. The analysis indicates strong \
    potential for urban market penetration with opportunities for strategic expansion.";

pub const CLOSING: &str = "Consider focusing initial efforts on high-adoption regions while \
    developing strategies to address resistance in challenging markets.";

/// The first rule matching the query, case-insensitively.
pub fn classify(query: &str) -> Option<&'static SummaryRule> {
    let lowered = query.to_lowercase();
    SUMMARY_RULES.iter().find(|rule| rule.matches(&lowered))
}

/// Category label for the query; the fallback when no rule matches.
pub fn category_for(query: &str) -> &'static str {
    classify(query).map_or(FALLBACK_CATEGORY, |rule| rule.category)
}

/// Build the summary paragraph for a query. Total: never fails.
pub fn synthesize(query: &str) -> String {
    let body = classify(query).map_or(FALLBACK_BODY, |rule| rule.body);
    format!(
        "Based on your simulation for \"{query}\", our AI analysis reveals promising market \
         potential. {body} {CLOSING}"
    )
}
