//! Keyword-driven summary synthesis.

use ideasim_core::summary::{
    category_for, classify, synthesize, CLOSING, FALLBACK_BODY, SUMMARY_RULES,
};

fn fallback_for(query: &str) -> String {
    format!(
        "Based on your simulation for \"{query}\", our AI analysis reveals promising market \
         potential. {FALLBACK_BODY} {CLOSING}"
    )
}

#[test]
fn fintech_queries_get_the_fintech_body() {
    for query in [
        "Launch a FinTech app for traders",
        "personal finance coach",
        "FINANCE for farmers",
    ] {
        let summary = synthesize(query);
        assert!(summary.contains("The fintech sector shows strong adoption patterns"),
            "{query:?} → {summary}");
        assert!(summary.contains("fintech sector"));
    }
}

#[test]
fn earlier_rule_wins_when_several_match() {
    // fintech is tested before food.
    let summary = synthesize("food delivery with built-in fintech payments");
    assert!(summary.contains("fintech sector"));
    assert!(!summary.contains("Food delivery services show"));

    // education is tested before delivery.
    assert_eq!(category_for("education content delivery"), "EdTech");
}

#[test]
fn each_rule_is_reachable() {
    assert_eq!(classify("an edtech startup").map(|r| r.category), Some("EdTech"));
    assert_eq!(classify("late night food").map(|r| r.category), Some("Food Tech"));
    assert_eq!(classify("parcel delivery").map(|r| r.category), Some("Food Tech"));
    assert_eq!(SUMMARY_RULES.len(), 3);
}

#[test]
fn unmatched_queries_use_the_fallback_byte_for_byte() {
    for query in ["A hardware store in Kano", "", "ride sharing for campuses"] {
        assert_eq!(synthesize(query), fallback_for(query));
        assert_eq!(synthesize(query), synthesize(query));
        assert!(classify(query).is_none());
        assert_eq!(category_for(query), "General");
    }
}

#[test]
fn every_summary_ends_with_the_closing_sentence() {
    for query in ["fintech", "edtech", "food", "anything else"] {
        let summary = synthesize(query);
        assert!(summary.ends_with(CLOSING), "missing closing for {query:?}");
        assert!(summary.starts_with(&format!("Based on your simulation for \"{query}\"")));
        assert!(!summary.contains("  "), "double space in {summary:?}");
    }
}
