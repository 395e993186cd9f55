//! Prompt templates
//!
//! One pure builder per artifact. Rating and review are interpolated as-is;
//! the transport layer handles any escaping.

use super::insights::FeedbackStats;
use super::{Artifact, FeedbackSubmission};

/// Reviews quoted into an admin question prompt are cut to this many characters
pub const INSIGHT_REVIEW_EXCERPT_CHARS: usize = 300;

/// Build the prompt for one artifact
pub fn build_prompt(artifact: Artifact, rating: u8, review: &str) -> String {
    match artifact {
        Artifact::Reply => build_reply_prompt(rating, review),
        Artifact::Summary => build_summary_prompt(rating, review),
        Artifact::Actions => build_actions_prompt(rating, review),
    }
}

/// Customer-facing reply
pub fn build_reply_prompt(rating: u8, review: &str) -> String {
    format!(
        r#"You are a customer service AI responding to a user's feedback.

Rating: {rating}/5 stars
Review: "{review}"

Generate a friendly, professional, and empathetic response that:
1. Thanks the user for their feedback
2. Acknowledges their rating and the specific points they raised
3. Shows that their feedback is valued
4. If the rating is low (1-2 stars), expresses concern and a commitment to improvement
5. Is concise (2-3 sentences)

Response:"#
    )
}

/// Internal summary for administrators
pub fn build_summary_prompt(rating: u8, review: &str) -> String {
    format!(
        r#"You are an AI analyst summarizing customer feedback for administrators.

Rating: {rating}/5 stars
Review: "{review}"

Create a concise summary (1-2 sentences) that captures the customer's sentiment and the key points of the review.

Summary:"#
    )
}

/// Recommended business actions, requested as a bare JSON array
pub fn build_actions_prompt(rating: u8, review: &str) -> String {
    format!(
        r#"You are an AI business consultant analyzing customer feedback.

Rating: {rating}/5 stars
Review: "{review}"

Generate 2-3 concrete, specific, actionable recommendations for the business based on this feedback.
Respond ONLY with a JSON array of strings. Do not use markdown code fences and do not add any text before or after the array.

Example: ["Action 1", "Action 2", "Action 3"]

Recommendations:"#
    )
}

/// Admin question over the aggregate feedback history
pub fn build_insight_prompt(
    question: &str,
    stats: &FeedbackStats,
    submissions: &[FeedbackSubmission],
) -> String {
    let mut prompt = String::from(
        "You are an AI analyst helping a business administrator understand their customer feedback.\n\n",
    );

    prompt.push_str("## Overview\n");
    prompt.push_str(&format!("- Total submissions: {}\n", stats.total));
    prompt.push_str(&format!("- Average rating: {:.1}/5\n", stats.average_rating));
    for bucket in &stats.by_rating {
        prompt.push_str(&format!("- {} stars: {}\n", bucket.rating, bucket.count));
    }

    prompt.push_str(&format!(
        "\n## Most recent feedback ({} entries, newest first)\n",
        submissions.len()
    ));
    for s in submissions {
        prompt.push_str(&format!(
            "- [{}★ | {}] Summary: {} | Review: \"{}\"",
            s.rating,
            s.created_at.format("%Y-%m-%d"),
            s.ai_summary,
            excerpt(&s.review, INSIGHT_REVIEW_EXCERPT_CHARS)
        ));
        if !s.recommended_actions.is_empty() {
            prompt.push_str(&format!(" | Actions: {}", s.recommended_actions.join("; ")));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        r#"
## Question
{question}

Answer the question using only the feedback above. Be specific, cite ratings or recurring themes where relevant, and keep the answer under 200 words. If the data does not contain the answer, say so.

Answer:"#
    ));

    prompt
}

/// First `max` characters, with an ellipsis when cut
fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}
