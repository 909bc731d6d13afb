use uuid::Uuid;

use crate::cli::commands::LocalSession;
use crate::cli::utils::{output_data, output_empty_collection};
use crate::cli::OutputFormat;
use crate::paths::page;

pub async fn topics(id: Option<Uuid>, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = LocalSession::load()?;
    session.require_access("topics", page::TOPICS)?;
    let api = session.api();

    if let Some(id) = id {
        let detail = api.topic(id).await?;
        return output_data(&output_format, &detail, |detail| {
            println!("{} ({})", detail.topic.name, detail.topic.id);
            for roadmap in &detail.roadmaps {
                println!("  - {}: {}", roadmap.title, roadmap.url);
            }
        });
    }

    let topics = api.topics().await?;
    if topics.is_empty() {
        return output_empty_collection(&output_format, "topics", "No topics yet");
    }
    output_data(&output_format, &topics, |topics| {
        for topic in topics {
            println!("{}  {} ({} roadmaps)", topic.id, topic.name, topic.roadmap_count);
        }
    })
}

pub async fn posts(output_format: OutputFormat) -> anyhow::Result<()> {
    let session = LocalSession::load()?;
    session.require_access("posts", page::POSTS)?;

    let posts = session.api().posts().await?;
    if posts.is_empty() {
        return output_empty_collection(&output_format, "posts", "No posts yet");
    }
    output_data(&output_format, &posts, |posts| {
        for post in posts {
            println!("[{}] {} by {}", post.created_at.format("%Y-%m-%d"), post.title, post.author);
        }
    })
}

pub async fn me(output_format: OutputFormat) -> anyhow::Result<()> {
    let session = LocalSession::load()?;
    session.require_access("me", page::PROFILE)?;

    let user = session.api().me().await?;
    output_data(&output_format, &user, |user| {
        println!("{} (@{})", user.display_name, user.username);
        if !user.bio.is_empty() {
            println!("{}", user.bio);
        }
        println!("Avatar:     {}", user.avatar.as_deref().unwrap_or("none"));
        println!("Visibility: {}", user.visibility.as_str());
    })
}
