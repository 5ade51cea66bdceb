//! JSON route file.
//!
//! ```json
//! {
//!   "routes": [
//!     { "id": "r1", "stationId": "8000080", "stationName": "Dortmund Hbf",
//!       "line": "S4", "origin": "Lütgendortmund", "destination": "Unna" }
//!   ],
//!   "travelTimes": [
//!     { "id": "t1", "routeId": "r1", "label": "fast", "minutes": 10 },
//!     { "id": "t2", "routeId": "r1", "label": "slow", "minutes": 20 }
//!   ]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{TrackedRoute, TravelTime, TravelTimeProfile};

use super::{RouteSourceError, TrackedRouteEntry, TrackedRouteSource, sort_entries};

/// On-disk shape of the route file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteFile {
    pub routes: Vec<TrackedRoute>,
    #[serde(default)]
    pub travel_times: Vec<TravelTime>,
}

impl RouteFile {
    /// Parse the file contents.
    pub fn parse(contents: &str) -> Result<Self, RouteSourceError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Pair each route with its travel times, in board order.
    ///
    /// Travel times for unknown routes are skipped.
    pub fn into_entries(self) -> Result<Vec<TrackedRouteEntry>, RouteSourceError> {
        let mut seen = HashSet::new();
        for route in &self.routes {
            if !seen.insert(route.id.as_str()) {
                return Err(RouteSourceError::DuplicateRoute(route.id.clone()));
            }
        }

        let mut times: HashMap<String, Vec<TravelTime>> = HashMap::new();
        for time in self.travel_times {
            if seen.contains(time.route_id.as_str()) {
                times.entry(time.route_id.clone()).or_default().push(time);
            } else {
                warn!(route_id = %time.route_id, "travel time for unknown route");
            }
        }

        let mut entries: Vec<TrackedRouteEntry> = self
            .routes
            .into_iter()
            .map(|route| {
                let profile = TravelTimeProfile::new(times.remove(&route.id).unwrap_or_default());
                TrackedRouteEntry::new(route, profile)
            })
            .collect();

        sort_entries(&mut entries);
        Ok(entries)
    }
}

/// Route source backed by a JSON file, re-read on every load.
#[derive(Debug, Clone)]
pub struct JsonRouteSource {
    path: PathBuf,
}

impl JsonRouteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrackedRouteSource for JsonRouteSource {
    async fn load(&self) -> Result<Vec<TrackedRouteEntry>, RouteSourceError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let entries = RouteFile::parse(&contents)?.into_entries()?;
        debug!(path = %self.path.display(), count = entries.len(), "loaded tracked routes");
        Ok(entries)
    }
}
