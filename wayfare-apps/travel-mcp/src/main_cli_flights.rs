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

//! CLI for Duffel flight search.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::cmp::max;
use wayfare_travel_mcp::{
    CabinClass, Config, DuffelFlightsClient, FlightLeg, FlightSearchInput, FlightSearchResult,
    MultiCityInput, SliceDetails, TripType,
};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "wayfare-flights")]
#[command(author, version, about = "Search flights through the Duffel API", long_about = None)]
struct CliArgs {
    /// Verbose output
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search flight offers
    Search(SearchArgs),

    /// Print the full upstream record of one offer
    Offer {
        /// Offer ID (off_...)
        offer_id: String,
    },
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Origin airport code (e.g., SFO, LAX)
    #[arg(short, long)]
    from: String,

    /// Destination airport code (e.g., JFK, LHR)
    #[arg(short, long)]
    to: String,

    /// Departure date (YYYY-MM-DD or YYYY/MM/DD)
    #[arg(short, long)]
    date: String,

    /// Return date for round trips (YYYY-MM-DD or YYYY/MM/DD)
    #[arg(short = 'R', long)]
    return_date: Option<String>,

    /// Trip type: one-way, round-trip, multi-city (default: round-trip if a return date is given)
    #[arg(long)]
    trip: Option<String>,

    /// Extra multi-city leg as ORIGIN:DEST:DATE, repeatable
    #[arg(long = "leg")]
    legs: Vec<String>,

    /// Cabin class: economy, premium_economy, business, first
    #[arg(short, long, default_value = "economy")]
    cabin: String,

    /// Number of adult passengers (1-9)
    #[arg(short, long, default_value = "1")]
    adults: u32,

    /// Maximum number of connections (0 = nonstop only)
    #[arg(long)]
    max_connections: Option<u32>,

    /// Print normalized JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Configure logging based on verbosity level
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

fn parse_cabin(s: &str) -> Result<CabinClass> {
    CabinClass::from_str_name(s).with_context(|| {
        format!(
            "Invalid cabin class: {}. Use: economy, premium_economy, business, first",
            s
        )
    })
}

fn parse_trip(s: &str) -> Result<TripType> {
    match s.to_lowercase().replace('_', "-").as_str() {
        "one-way" | "oneway" | "ow" => Ok(TripType::OneWay),
        "round-trip" | "roundtrip" | "rt" => Ok(TripType::RoundTrip),
        "multi-city" | "multicity" | "mc" => Ok(TripType::MultiCity),
        _ => anyhow::bail!(
            "Invalid trip type: {}. Use: one-way, round-trip, multi-city",
            s
        ),
    }
}

/// Normalize a date to Duffel's YYYY-MM-DD.
fn parse_date(s: &str) -> Result<String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .with_context(|| format!("Invalid date format: {}. Use YYYY-MM-DD or YYYY/MM/DD", s))
}

/// "LHR:CDG:2025-06-10" -> leg
fn parse_leg(s: &str) -> Result<FlightLeg> {
    let parts: Vec<&str> = s.split(':').collect();
    let [origin, destination, date] = parts.as_slice() else {
        anyhow::bail!("Invalid leg: {}. Use ORIGIN:DEST:DATE", s);
    };
    Ok(FlightLeg::new(
        origin.to_uppercase(),
        destination.to_uppercase(),
        parse_date(date)?,
    ))
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

/// "2025-06-01T08:15:00" -> "06-01 08:15"
fn fmt_timestamp(ts: &str) -> String {
    match ts.get(5..16) {
        Some(short) => short.replace('T', " "),
        None if ts.is_empty() => "??".to_string(),
        None => ts.to_string(),
    }
}

/// "PT11H5M" -> "11h 05m"
fn fmt_duration(iso: &str) -> String {
    let Some(rest) = iso.strip_prefix("PT") else {
        return iso.to_string();
    };
    let (hours, minutes) = match rest.split_once('H') {
        Some((h, m)) => (h.parse::<u32>(), m.trim_end_matches('M')),
        None => (Ok(0), rest.trim_end_matches('M')),
    };
    let minutes = minutes.parse::<u32>().unwrap_or(0);
    match hours {
        Ok(0) => format!("{}m", minutes),
        Ok(h) if minutes == 0 => format!("{}h", h),
        Ok(h) => format!("{}h {:02}m", h, minutes),
        Err(_) => iso.to_string(),
    }
}

/// "1 stop: LHR" style label
fn fmt_stops(slice: &SliceDetails) -> String {
    if slice.connections.is_empty() {
        return slice.stops_description.clone();
    }
    let airports: Vec<&str> = slice
        .connections
        .iter()
        .map(|c| c.airport.as_str())
        .collect();
    format!("{}: {}", slice.stops_description, airports.join(", "))
}

fn fmt_route(slice: &SliceDetails) -> String {
    format!("{} → {}", slice.origin, slice.destination)
}

fn fmt_times(slice: &SliceDetails) -> String {
    format!(
        "{} → {}",
        fmt_timestamp(&slice.departure),
        fmt_timestamp(&slice.arrival)
    )
}

/// Terminal-aware widths for carrier, route, times, duration and stops.
fn calc_column_widths(result: &FlightSearchResult) -> [usize; 5] {
    let mut widths = [7, 9, 25, 8, 10];
    for slice in result.offers.iter().flat_map(|o| o.slices.iter()) {
        widths[0] = max(widths[0], slice.carrier.chars().count());
        widths[1] = max(widths[1], fmt_route(slice).chars().count());
        widths[2] = max(widths[2], fmt_times(slice).chars().count());
        widths[3] = max(widths[3], fmt_duration(&slice.duration).chars().count());
        widths[4] = max(widths[4], fmt_stops(slice).chars().count());
    }

    let available_width = get_terminal_width().saturating_sub(30);
    let total: usize = widths.iter().sum();
    if total > available_width && available_width > 50 {
        let ratio = available_width as f64 / total as f64;
        let minimums = [4, 9, 15, 5, 10];
        for (w, min) in widths.iter_mut().zip(minimums) {
            *w = max((*w as f64 * ratio).floor() as usize, min);
        }
    }
    widths
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Render results to stdout
fn render_results(result: &FlightSearchResult, title: &str) {
    println!("{}", "=".repeat(96));
    println!("  🛫  {}", title);
    println!("{}\n", "=".repeat(96));

    println!("🧾 Offer request: {}", result.request_id);
    println!("📊 Total offers: {}", result.len());
    if result.is_empty() {
        println!("\nNo offers found.");
        return;
    }

    let [cw, rw, tw, dw, sw] = calc_column_widths(result);
    println!("{}", dash_bar());
    println!(
        "{:>3}  {:<cw$}  {:<rw$}  {:<tw$}  {:<dw$}  {:<sw$}  PRICE",
        "#", "CARRIER", "ROUTE", "DEP → ARR", "DURATION", "STOPS",
    );
    println!("{}", dash_bar());

    for (i, offer) in result.offers.iter().enumerate() {
        for (j, slice) in offer.slices.iter().enumerate() {
            let (rank, price) = if j == 0 {
                (
                    (i + 1).to_string(),
                    format!("{} {}", offer.price.amount, offer.price.currency),
                )
            } else {
                (String::new(), String::new())
            };
            println!(
                "{:>3}  {:<cw$}  {:<rw$}  {:<tw$}  {:<dw$}  {:<sw$}  {}",
                rank,
                truncate(&slice.carrier, cw),
                truncate(&fmt_route(slice), rw),
                truncate(&fmt_times(slice), tw),
                truncate(&fmt_duration(&slice.duration), dw),
                truncate(&fmt_stops(slice), sw),
                price,
            );
        }
        println!("     {}", offer.offer_id);
    }
}

async fn run_search(client: &DuffelFlightsClient, args: SearchArgs) -> Result<()> {
    let cabin = parse_cabin(&args.cabin)?;
    let depart_date = parse_date(&args.date)?;
    let return_date = args.return_date.as_deref().map(parse_date).transpose()?;
    let legs = args
        .legs
        .iter()
        .map(|l| parse_leg(l))
        .collect::<Result<Vec<_>>>()?;

    let trip = match args.trip.as_deref() {
        Some(t) => parse_trip(t)?,
        None if !legs.is_empty() => TripType::MultiCity,
        None if return_date.is_some() => TripType::RoundTrip,
        None => TripType::OneWay,
    };

    let from = args.from.to_uppercase();
    let to = args.to.to_uppercase();
    tracing::info!(
        "Parsed request: {} -> {} on {} ({:?}, {:?})",
        from,
        to,
        depart_date,
        cabin,
        trip
    );

    let title = format!("{} → {} on {}", from, to, depart_date);
    let result = match trip {
        TripType::MultiCity if legs.is_empty() => {
            anyhow::bail!("Multi-city search needs at least one --leg ORIGIN:DEST:DATE")
        }
        TripType::MultiCity => {
            let mut segments = vec![FlightLeg::new(from, to, depart_date)];
            segments.extend(legs);
            let mut input = MultiCityInput::new(segments);
            input.cabin_class = cabin;
            input.adults = args.adults;
            input.max_connections = args.max_connections;
            client.search_multi_city(&input).await
        }
        TripType::RoundTrip => {
            let return_date =
                return_date.context("Round-trip search needs --return-date")?;
            let input = FlightSearchInput::round_trip(from, to, depart_date, return_date)
                .cabin_class(cabin)
                .adults(args.adults)
                .max_connections(args.max_connections);
            client.search_flights(&input).await
        }
        TripType::OneWay => {
            let input = FlightSearchInput::one_way(from, to, depart_date)
                .cabin_class(cabin)
                .adults(args.adults)
                .max_connections(args.max_connections);
            client.search_flights(&input).await
        }
    }
    .context("Search failed")?;

    tracing::info!("Search completed: {} offers", result.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render_results(&result, &title);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);
    tracing::debug!("Args: {:?}", args);

    dotenv::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;
    let client = DuffelFlightsClient::new(&config).context("Failed to create flights client")?;

    match args.command {
        Command::Search(search) => run_search(&client, search).await,
        Command::Offer { offer_id } => {
            let offer = client
                .get_offer(&offer_id)
                .await
                .context("Offer lookup failed")?;
            println!("{}", serde_json::to_string_pretty(&offer)?);
            Ok(())
        }
    }
}
