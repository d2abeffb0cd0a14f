//!  Wayfare Travel MCP
//!
//!  Copyright (C) 2026  The Wayfare Travel MCP Authors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! CLI for Duffel Stays search and reviews.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::cmp::max;
use wayfare_travel_mcp::{
    Config, DuffelStaysClient, StayReviewInput, StayReviewsResult, StaySearchInput,
    StaySearchResult,
};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "wayfare-stays")]
#[command(author, version, about = "Search stays through the Duffel API", long_about = None)]
struct CliArgs {
    /// Verbose output
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    /// Print normalized JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search accommodation offers
    Search {
        /// City, airport code, or area
        #[arg(short, long)]
        location: String,

        /// Check-in date (YYYY-MM-DD or YYYY/MM/DD)
        #[arg(long)]
        check_in: String,

        /// Check-out date (YYYY-MM-DD or YYYY/MM/DD)
        #[arg(long)]
        check_out: String,

        /// Number of guests
        #[arg(short, long, default_value = "1")]
        guests: u32,

        /// Number of rooms
        #[arg(short, long)]
        rooms: Option<u32>,

        /// Search radius in kilometers
        #[arg(long)]
        radius_km: Option<f64>,
    },

    /// Fetch guest reviews for a stay
    Reviews {
        /// Stay ID (acc_...)
        stay_id: String,

        /// Pagination cursor: after
        #[arg(long)]
        after: Option<String>,

        /// Pagination cursor: before
        #[arg(long)]
        before: Option<String>,

        /// Max reviews to return (1-200)
        #[arg(long)]
        limit: Option<u32>,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(s: &str) -> Result<String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .with_context(|| format!("Invalid date format: {}. Use YYYY-MM-DD or YYYY/MM/DD", s))
}

fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn render_stays(result: &StaySearchResult, title: &str) {
    println!("{}", "=".repeat(96));
    println!("  🏨  {}", title);
    println!("{}\n", "=".repeat(96));
    println!("📊 Total offers: {}", result.offers.len());
    if result.offers.is_empty() {
        println!("\nNo stays found.");
        return;
    }

    let mut name_w = 10;
    let mut room_w = 9;
    for offer in &result.offers {
        name_w = max(name_w, offer.hotel_name.chars().count());
        room_w = max(room_w, offer.room_type.chars().count());
    }
    let budget = get_terminal_width().saturating_sub(40).max(30);
    name_w = name_w.min(budget * 2 / 3);
    room_w = room_w.min(budget / 3);

    println!("{}", dash_bar());
    println!(
        "{:>3}  {:<name_w$}  {:<room_w$}  PRICE",
        "#", "HOTEL", "ROOM TYPE"
    );
    println!("{}", dash_bar());
    for (i, offer) in result.offers.iter().enumerate() {
        let price = if offer.price.amount.is_empty() {
            "n/a".to_string()
        } else {
            format!("{} {}", offer.price.amount, offer.price.currency)
        };
        println!(
            "{:>3}  {:<name_w$}  {:<room_w$}  {}",
            i + 1,
            truncate(&offer.hotel_name, name_w),
            truncate(&offer.room_type, room_w),
            price
        );
        if !offer.address.is_empty() {
            println!("     📍 {}", offer.address);
        }
        println!("     {} ({})", offer.offer_id, offer.hotel_id);
    }
}

fn render_reviews(result: &StayReviewsResult, stay_id: &str) {
    println!("⭐ Reviews for {}: {}", stay_id, result.reviews.len());
    println!("{}", dash_bar());
    for review in &result.reviews {
        let score = review
            .score
            .map_or("-".to_string(), |s| format!("{:.1}", s));
        let name = if review.reviewer_name.is_empty() {
            "Anonymous"
        } else {
            review.reviewer_name.as_str()
        };
        println!("[{}] {} ({})", score, name, review.created_at);
        println!("    {}", review.text);
    }
    if let Some(after) = &result.meta.after {
        println!("{}\nNext page: --after {}", dash_bar(), after);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);
    tracing::debug!("Args: {:?}", args);

    dotenv::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;
    let client = DuffelStaysClient::new(&config).context("Failed to create stays client")?;

    match args.command {
        Command::Search {
            location,
            check_in,
            check_out,
            guests,
            rooms,
            radius_km,
        } => {
            let input = StaySearchInput::new(
                location,
                parse_date(&check_in)?,
                parse_date(&check_out)?,
                guests,
            )
            .rooms(rooms)
            .radius_km(radius_km);
            let result = client
                .search_stays(&input)
                .await
                .context("Stay search failed")?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let title = format!(
                    "{} from {} to {}",
                    input.location, input.check_in_date, input.check_out_date
                );
                render_stays(&result, &title);
            }
        }
        Command::Reviews {
            stay_id,
            after,
            before,
            limit,
        } => {
            let input = StayReviewInput {
                stay_id,
                after,
                before,
                limit,
            };
            let result = client
                .get_stay_reviews(&input)
                .await
                .context("Review lookup failed")?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                render_reviews(&result, &input.stay_id);
            }
        }
    }
    Ok(())
}
