//! Discovery orchestrator.
//!
//! One discovery pass: optionally precheck the commute from a station-style
//! search area, fetch listings, strip the ones already recorded, evaluate
//! the commute per listing, record every evaluated listing, and present the
//! accepted ones in source order.

use chrono::{FixedOffset, NaiveTime, Utc};

use crate::cache::{CacheError, SeenStore};
use crate::commute::{CommuteCheck, next_weekday_at};
use crate::domain::Listing;
use crate::journeys::{JourneyError, JourneySource, Origin};
use crate::listings::{ListingError, ListingSource, LocationId, SearchQuery, SortOrder};

/// Errors that abort a discovery pass.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("listing search failed: {0}")]
    Listing(#[from] ListingError),

    #[error("journey check failed: {0}")]
    Journey(#[from] JourneyError),

    #[error("cache write failed: {0}")]
    Cache(#[from] CacheError),
}

/// Sink for accepted listings.
///
/// Display is a thin I/O side effect kept outside the pipeline; the
/// orchestrator only signals what to show and when to pace.
pub trait Present {
    /// Show one accepted listing.
    fn show(&mut self, listing: &Listing);

    /// Pace before moving on to the next listing.
    fn pause(&mut self);
}

/// Parameters for one discovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Search area.
    pub location: LocationId,
    /// Display name of the search area; doubles as the journey origin for
    /// the station precheck.
    pub location_name: String,
    /// Price ceiling.
    pub max_price: i64,
    /// Search radius in miles.
    pub radius_miles: f64,
    /// Only consider listings added within the last N days.
    pub max_days_since_added: Option<u32>,
    /// Clock time of the arrival deadline on the next working day.
    pub arrival_time: NaiveTime,
    /// Timezone in which the deadline is computed.
    pub timezone: FixedOffset,
}

/// Composes the listing source, journey source, dedup cache and presenter
/// into one discovery pass.
pub struct Discovery<L, J, C, P> {
    listings: L,
    journeys: J,
    cache: C,
    presenter: P,
    commute: CommuteCheck,
    config: DiscoveryConfig,
}

impl<L, J, C, P> Discovery<L, J, C, P>
where
    L: ListingSource,
    J: JourneySource,
    C: SeenStore,
    P: Present,
{
    pub fn new(
        listings: L,
        journeys: J,
        cache: C,
        presenter: P,
        commute: CommuteCheck,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            listings,
            journeys,
            cache,
            presenter,
            commute,
            config,
        }
    }

    /// Run one discovery pass. Returns the accepted listings in source
    /// order.
    ///
    /// Listing-service and cache failures abort the pass, as does a journey
    /// failure while checking a specific listing. The one exception is the
    /// station-area precheck: if the journey service cannot answer for the
    /// area (for instance because it does not recognise the station name),
    /// the pass proceeds and each listing still gets its own check.
    pub async fn run(&mut self) -> Result<Vec<Listing>, DiscoveryError> {
        let deadline = next_weekday_at(
            &Utc::now().with_timezone(&self.config.timezone),
            self.config.arrival_time,
        )
        .with_timezone(&Utc);

        if self.config.location.is_station() {
            let origin = Origin::Place(self.config.location_name.clone());
            match self
                .commute
                .is_feasible(&self.journeys, &origin, deadline)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    tracing::info!(
                        area = %self.config.location_name,
                        "search area fails the commute check, stopping"
                    );
                    return Ok(Vec::new());
                }
                Err(error) => {
                    tracing::warn!(
                        area = %self.config.location_name,
                        %error,
                        "could not verify search area commute, continuing"
                    );
                }
            }
        }

        let mut query = SearchQuery::new(self.config.location.clone());
        query.max_price = Some(self.config.max_price);
        query.radius_miles = self.config.radius_miles;
        query.max_days_since_added = self.config.max_days_since_added;
        query.sort = SortOrder::MostRecent;

        let listings = self.listings.search(&query).await?;
        tracing::info!(count = listings.len(), "search returned listings");

        let fresh: Vec<Listing> = listings
            .into_iter()
            .filter(|listing| !self.cache.contains(listing.id))
            .collect();
        tracing::info!(count = fresh.len(), "listings remaining after cache filter");

        let mut accepted = Vec::new();
        let last = fresh.len().saturating_sub(1);
        for (index, listing) in fresh.iter().enumerate() {
            let Some(price) = listing.price else {
                tracing::info!(
                    address = %listing.display_address,
                    "skipping listing without a price"
                );
                self.cache.add(listing)?;
                continue;
            };

            tracing::info!(address = %listing.display_address, "checking commute");
            let feasible = self
                .commute
                .is_feasible(&self.journeys, &Origin::Point(listing.location), deadline)
                .await?;
            // Recorded either way: the cache stores "evaluated", not
            // "accepted".
            self.cache.add(listing)?;

            if !feasible {
                tracing::info!(
                    address = %listing.display_address,
                    price = %price,
                    "skipping listing"
                );
                continue;
            }

            tracing::info!(
                address = %listing.display_address,
                price = %price,
                "showing listing"
            );
            self.presenter.show(listing);
            if index != last {
                self.presenter.pause();
            }
            accepted.push(listing.clone());
        }

        Ok(accepted)
    }
}
