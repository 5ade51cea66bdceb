//! One reconciliation pass over all tracked routes.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use crate::config::{EngineConfig, FeedSource};
use crate::domain::{
    Action, DepartureRecommendation, DepartureStatus, HourWindow, MISSING_TIME, NormalizedEvent,
    line_label,
};
use crate::dto::{DeparturesResponse, RouteDiscoveryResponse};
use crate::efa::parse_departure_monitor;
use crate::fetch::{FeedFetcher, FeedKind};
use crate::iris::{merge_changes, parse_change_feed, parse_planned_feed};
use crate::routes::TrackedRouteEntry;

use super::discover::discover_routes;
use super::error::EngineError;
use super::matcher::match_route;
use super::recommend::recommend;
use super::select::select_departures;

/// Events available at one station for one pass.
#[derive(Debug, Clone, Default)]
pub struct StationBoard {
    /// Name declared by the feed, if any
    pub station_name: Option<String>,
    pub events: Vec<NormalizedEvent>,
}

/// The reconciliation engine.
///
/// Fetches each station's feeds once per pass, then matches, selects and
/// recommends per route.
pub struct Engine<F> {
    fetcher: F,
    config: EngineConfig,
}

impl<F> Engine<F> {
    pub fn new(fetcher: F, config: EngineConfig) -> Self {
        Self { fetcher, config }
    }
}

impl<F> Engine<F>
where
    F: FeedFetcher + Sync,
{
    /// Produce departure records for `routes`, in the given order.
    ///
    /// Each route yields one record per selected departure, or a single
    /// placeholder when nothing matches. If any station's feed cannot be
    /// fetched the whole pass fails.
    #[instrument(skip(self, routes), fields(routes = routes.len()))]
    pub async fn reconcile(
        &self,
        routes: &[TrackedRouteEntry],
        now: DateTime<Utc>,
    ) -> Result<DeparturesResponse, EngineError> {
        let mut seen = HashSet::new();
        let stations: Vec<&str> = routes
            .iter()
            .map(|entry| entry.route.station_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect();

        let boards = try_join_all(stations.iter().map(|id| self.station_board(id, now))).await?;
        let boards: HashMap<&str, StationBoard> = stations.into_iter().zip(boards).collect();

        let mut departures = Vec::new();
        for entry in routes {
            let Some(board) = boards.get(entry.route.station_id.as_str()) else {
                continue;
            };
            departures.extend(self.route_departures(entry, board, now));
        }

        info!(count = departures.len(), "reconciled departures");
        Ok(DeparturesResponse::new(now, departures))
    }

    /// All normalized events at a station around `now`.
    ///
    /// Planned feeds are read for the current and the next clock hour and
    /// merged with the change feed; realtime stop events are used as-is.
    pub async fn station_board(
        &self,
        station_id: &str,
        now: DateTime<Utc>,
    ) -> Result<StationBoard, EngineError> {
        match self.config.source {
            FeedSource::Iris => {
                let window = HourWindow::current(now);
                let (current, next, changes) = futures::try_join!(
                    self.fetch(station_id, FeedKind::PlannedWindow(window)),
                    self.fetch(station_id, FeedKind::PlannedWindow(window.next())),
                    self.fetch(station_id, FeedKind::Changes),
                )?;

                let current = parse_planned_feed(&current);
                let next = parse_planned_feed(&next);
                let deltas = parse_change_feed(&changes);

                let mut planned = current.events;
                planned.extend(next.events);
                let events = merge_changes(planned, &deltas);

                debug!(station_id, events = events.len(), deltas = deltas.len(), "station board");
                Ok(StationBoard {
                    station_name: current.station_name.or(next.station_name),
                    events,
                })
            }
            FeedSource::Efa => {
                let payload = self.fetch(station_id, FeedKind::RealtimeStopEvents).await?;
                let board = parse_departure_monitor(&payload);

                debug!(station_id, events = board.events.len(), "station board");
                Ok(StationBoard {
                    station_name: board.station_name,
                    events: board.events,
                })
            }
        }
    }

    /// Routes that can be tracked from a station, from its current planned
    /// window.
    pub async fn discover_routes(
        &self,
        station_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RouteDiscoveryResponse, EngineError> {
        let window = HourWindow::current(now);
        let payload = self.fetch(station_id, FeedKind::PlannedWindow(window)).await?;
        let feed = parse_planned_feed(&payload);

        Ok(RouteDiscoveryResponse::new(
            station_id,
            window,
            discover_routes(&feed.events),
        ))
    }

    async fn fetch(&self, station_id: &str, kind: FeedKind) -> Result<String, EngineError> {
        self.fetcher
            .fetch(station_id, kind)
            .await
            .map_err(|source| EngineError::Fetch {
                station_id: station_id.to_string(),
                kind,
                source,
            })
    }

    fn route_departures(
        &self,
        entry: &TrackedRouteEntry,
        board: &StationBoard,
        now: DateTime<Utc>,
    ) -> Vec<DepartureRecommendation> {
        let route = &entry.route;
        let station_name = route
            .station_name
            .clone()
            .or_else(|| board.station_name.clone())
            .unwrap_or_default();

        let candidates = match_route(route, &board.events);
        let matched = candidates.len();
        let selected = select_departures(candidates, now, self.config.selection);
        debug!(route_id = %route.id, matched, selected = selected.len(), "matched route");

        if selected.is_empty() {
            return vec![DepartureRecommendation {
                route_id: route.id.clone(),
                station_id: route.station_id.clone(),
                station_name,
                line: line_label(&route.line),
                origin: route.key.origin().unwrap_or_default().to_string(),
                destination: route.key.destination().to_string(),
                display_time: MISSING_TIME.to_string(),
                platform: String::new(),
                status: DepartureStatus::NoDepartures,
                action: Action::CheckLater,
            }];
        }

        selected
            .into_iter()
            .map(|event| {
                let minutes = event.effective_time.minutes_until(now);
                let (status, action) =
                    recommend(Some(minutes), &entry.profile, event.status, &self.config);

                DepartureRecommendation {
                    route_id: route.id.clone(),
                    station_id: route.station_id.clone(),
                    station_name: station_name.clone(),
                    line: event.display_line.clone(),
                    origin: event
                        .display_origin
                        .clone()
                        .or_else(|| route.key.origin().map(str::to_string))
                        .unwrap_or_default(),
                    destination: event.display_destination.clone(),
                    display_time: event.effective_time.to_string(),
                    platform: event.display_platform.clone().unwrap_or_default(),
                    status,
                    action,
                }
            })
            .collect()
    }
}
