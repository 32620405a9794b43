#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Result, bail};
use clap::Parser;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::info;

use duration::{at_speed, format_duration};
use youtube::{YoutubeApi, extract_playlist_id};

pub mod duration;
pub mod youtube;

const PLAYBACK_SPEEDS: [f64; 4] = [1.25, 1.5, 1.75, 2.0];
const SEPARATOR: &str = "_________________________________________________________";

/// Adds up the watch time of a YouTube playlist at common playback speeds
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YouTube playlist URL to measure
    playlist_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so the stdout report stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let api_key = std::env::var("YOUTUBE_API_KEY").expect("env YOUTUBE_API_KEY not provided");

    let Some(playlist_id) = extract_playlist_id(&args.playlist_url) else {
        bail!("Invalid YouTube playlist URL");
    };

    let api = YoutubeApi::new(init_http_client(), api_key);

    println!("{SEPARATOR}\n");
    println!("Fetching: {playlist_id}");

    let video_ids = api.list_playlist_video_ids(playlist_id).await?;
    info!("Playlist has {} videos", video_ids.len());

    let total = api.total_duration(&video_ids).await;

    println!("\nTotal duration: {}\n", format_duration(total));
    for speed in PLAYBACK_SPEEDS {
        println!("At {speed:.2}x: {}", format_duration(at_speed(total, speed)));
    }
    println!("{SEPARATOR}");

    Ok(())
}

fn init_http_client() -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert(
        "User-Agent",
        HeaderValue::from_str(&format!(
            "{}/{} (+{})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_REPOSITORY")
        ))
        .unwrap(),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("Unable to build HTTP client")
}
