//! Text rendering of analysis results and review history.

use client_core::ViewState;
use shared::{
    domain::{Sentiment, SentimentStyle},
    protocol::{AnalysisResult, Review},
};

pub const EMPTY_HISTORY_MESSAGE: &str = "No reviews analyzed yet. Submit your first review!";

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: SentimentStyle) -> String {
        if !self.color {
            return text.to_string();
        }
        match hex_rgb(style.color) {
            Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
            None => text.to_string(),
        }
    }

    pub fn analysis(&self, result: &AnalysisResult) -> Vec<String> {
        let style = result.sentiment_kind().style();
        let mut lines = vec![
            "✅ Analysis Result:".to_string(),
            format!(
                "  {} {}",
                style.icon,
                self.paint(&result.sentiment.to_uppercase(), style)
            ),
        ];
        if !result.key_points.is_empty() {
            lines.push("  📌 Key Points:".to_string());
            lines.extend(result.key_points.iter().map(|point| format!("    - {point}")));
        }
        lines
    }

    pub fn history(&self, reviews: &[Review]) -> Vec<String> {
        let mut lines = vec!["📋 Analysis History".to_string()];
        if reviews.is_empty() {
            lines.push(format!("  {EMPTY_HISTORY_MESSAGE}"));
            return lines;
        }

        for review in reviews {
            lines.extend(self.review_card(review));
        }
        lines
    }

    fn review_card(&self, review: &Review) -> Vec<String> {
        let style = review.sentiment_kind().style();
        let badge = match review.sentiment.as_deref() {
            Some(raw) if review.sentiment_kind() != Sentiment::Unknown => raw.to_string(),
            _ => style.label.to_string(),
        };
        let mut lines = vec![
            String::new(),
            format!(
                "  {} {}  ·  {}",
                style.icon,
                self.paint(&badge, style),
                display_date(review)
            ),
            format!("  {}", review.review_text),
        ];
        if !review.key_points.is_empty() {
            lines.push("  Key Points:".to_string());
            lines.extend(review.key_points.iter().map(|point| format!("    • {point}")));
        }
        lines
    }

    pub fn error(&self, message: &str) -> String {
        format!("⚠️ {message}")
    }

    /// Status line for a submission about to start; nothing for drafts that
    /// would be rejected before reaching the network.
    pub fn submit_status(&self, state: &ViewState) -> Option<String> {
        state
            .can_submit()
            .then(|| "⏳ Analyzing...".to_string())
    }
}

pub fn display_date(review: &Review) -> String {
    match (review.created_date(), review.created_at.as_deref()) {
        (Some(date), _) => date.format("%Y-%m-%d").to_string(),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "unknown date".to_string(),
    }
}

fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
