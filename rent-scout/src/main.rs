use std::io::Write as _;

use chrono::{Duration, NaiveTime, Offset, Utc};

use rent_scout::cache::{ListingCache, NoCache, SeenStore};
use rent_scout::commute::{CommuteCheck, Destination};
use rent_scout::discovery::{Discovery, DiscoveryConfig, Present};
use rent_scout::domain::{Coordinate, Listing};
use rent_scout::journeys::{JourneyClient, JourneyConfig};
use rent_scout::listings::{ListingClient, ListingConfig, LocationId, detail_url};
use rent_scout::retry::{RetryPolicy, Retrying};

/// Presents accepted listings on the terminal, pacing with a keypress
/// between them.
struct Console;

impl Present for Console {
    fn show(&mut self, listing: &Listing) {
        match listing.price {
            Some(price) => println!("{} ({price})", listing.display_address),
            None => println!("{}", listing.display_address),
        }
        if let Some(path) = &listing.detail_path {
            println!("  {}", detail_url(path));
        }
    }

    fn pause(&mut self) {
        print!("Press enter for the next listing... ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let app_key = std::env::var("TFL_APP_KEY").unwrap_or_else(|_| {
        eprintln!("Warning: TFL_APP_KEY not set. Journey checks will fail.");
        String::new()
    });

    // An empty RENT_SCOUT_CACHE disables the cache: every pass re-evaluates
    // everything.
    let cache_path =
        std::env::var("RENT_SCOUT_CACHE").unwrap_or_else(|_| "seen_listings.jsonl".to_string());
    let cache: Box<dyn SeenStore> = if cache_path.is_empty() {
        Box::new(NoCache)
    } else {
        Box::new(ListingCache::open(&cache_path).expect("Failed to open listing cache"))
    };

    let timezone = Utc.fix();
    let policy = RetryPolicy::default();
    let listing_client = Retrying::new(
        ListingClient::new(ListingConfig::new()).expect("Failed to create listing client"),
        policy.clone(),
    );
    let journey_client = Retrying::new(
        JourneyClient::new(JourneyConfig::new(&app_key).with_timezone(timezone))
            .expect("Failed to create journey client"),
        policy,
    );

    // Search around Vauxhall station: up to 1800 pcm within a mile, listed
    // in the last three days, and within 45 minutes of the office and the
    // studio for a 09:00 arrival.
    let config = DiscoveryConfig {
        location: LocationId::Station("9491".to_string()),
        location_name: "Vauxhall".to_string(),
        max_price: 1800,
        radius_miles: 1.0,
        max_days_since_added: Some(3),
        arrival_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid clock time"),
        timezone,
    };
    let commute = CommuteCheck::new(
        vec![
            Destination::new("office", Coordinate::new(51.5155, -0.0922)),
            Destination::new("studio", Coordinate::new(51.5390, -0.1426)),
        ],
        Duration::minutes(45),
    );

    let mut discovery = Discovery::new(
        listing_client,
        journey_client,
        cache,
        Console,
        commute,
        config,
    );

    match discovery.run().await {
        Ok(accepted) => {
            println!();
            println!("{} new listing(s) accepted.", accepted.len());
        }
        Err(error) => {
            tracing::error!(%error, "discovery pass aborted");
            std::process::exit(1);
        }
    }
}
