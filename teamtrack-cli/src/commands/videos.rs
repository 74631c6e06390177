use anyhow::Result;
use colored::Colorize;

use crate::storage::Storage;

pub async fn list_videos(category: Option<String>) -> Result<()> {
    let storage = Storage::init()?;

    let videos: Vec<_> = storage
        .list_videos()?
        .into_iter()
        .filter(|v| {
            category
                .as_ref()
                .map(|c| v.category.eq_ignore_ascii_case(c))
                .unwrap_or(true)
        })
        .collect();

    if videos.is_empty() {
        println!("No videos in the local cache. Run {} first.", "sync".bold());
        return Ok(());
    }

    for video in videos {
        let tags = if video.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", video.tags.join(", "))
        };
        println!("{} ({}){}", video.title.bold(), video.category, tags);
        println!("  {}", video.url.dimmed());
    }

    Ok(())
}
