use serenity::builder::{CreateEmbed, CreateMessage};

use crate::models::{NamedField, StatOutcome, Summary, UserStatistic};

const EMBED_COLOR: u32 = 0x88cc14;

/// One field per user: name plus rank and metric lines
pub fn render_field(stat: &UserStatistic) -> NamedField {
    NamedField {
        name: stat.username.clone(),
        value: format!("Rank:\t{}\n{}\t{}", stat.rank, stat.kind.label(), stat.score),
    }
}

/// Render every outcome in order. Failed fetches show as zeros.
pub fn render_summary(stats: &[StatOutcome], title: &str) -> Summary {
    Summary {
        title: title.to_string(),
        fields: stats
            .iter()
            .map(|outcome| render_field(&outcome.to_statistic()))
            .collect(),
    }
}

pub fn create_summary_embed(summary: &Summary) -> CreateEmbed {
    CreateEmbed::default()
        .title(format!("__{}__", summary.title))
        .fields(
            summary
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.value.clone(), false)),
        )
        .color(EMBED_COLOR)
}

pub fn create_summary_message(summary: &Summary) -> CreateMessage {
    CreateMessage::default().embed(create_summary_embed(summary))
}
