use std::collections::BTreeMap;

use catalog::Resolution;

use crate::feature::Topology;
use crate::geojson::{DecodeError, decode_feature_collection};

/// Identifies one outstanding base-map fetch.
///
/// Tickets are monotonic; the host passes the raw payload back through
/// `complete_load` with the ticket it was handed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

/// Outcome of asking the store for a resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadStart {
    /// Geometry is already cached; no fetch needed.
    Ready,
    /// A new fetch must be issued under this ticket.
    Fetch(LoadTicket),
    /// A fetch for this resolution is already outstanding; the caller
    /// shares its ticket instead of issuing a duplicate request.
    Joined(LoadTicket),
}

impl LoadStart {
    pub fn ticket(self) -> Option<LoadTicket> {
        match self {
            LoadStart::Ready => None,
            LoadStart::Fetch(t) | LoadStart::Joined(t) => Some(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// The host reported a transport failure for an outstanding fetch.
    FetchFailure {
        resolution: Resolution,
        message: String,
    },
    Decode {
        resolution: Resolution,
        source: DecodeError,
    },
    UnknownTicket(u64),
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::FetchFailure {
                resolution,
                message,
            } => write!(
                f,
                "fetch for {} base map failed: {message}",
                resolution.scale()
            ),
            TopologyError::Decode { resolution, source } => {
                write!(f, "decode of {} base map failed: {source}", resolution.scale())
            }
            TopologyError::UnknownTicket(raw) => write!(f, "unknown load ticket {raw}"),
        }
    }
}

impl std::error::Error for TopologyError {}

/// Caches decoded base maps per resolution and deduplicates concurrent
/// fetches.
///
/// Ordering contract: tickets increase monotonically across the store's
/// lifetime, so a smaller ticket always refers to an earlier request.
#[derive(Debug, Default)]
pub struct TopologyStore {
    cache: BTreeMap<Resolution, Topology>,
    pending: BTreeMap<u64, Resolution>,
    in_flight: BTreeMap<Resolution, u64>,
    next_ticket: u64,
}

impl TopologyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a resolution. Cached geometry answers immediately; an
    /// outstanding fetch is joined; otherwise a fresh ticket is minted.
    pub fn begin_load(&mut self, resolution: Resolution) -> LoadStart {
        if self.cache.contains_key(&resolution) {
            return LoadStart::Ready;
        }
        if let Some(raw) = self.in_flight.get(&resolution) {
            return LoadStart::Joined(LoadTicket(*raw));
        }
        let raw = self.next_ticket;
        self.next_ticket += 1;
        self.pending.insert(raw, resolution);
        self.in_flight.insert(resolution, raw);
        LoadStart::Fetch(LoadTicket(raw))
    }

    /// Delivers the host's fetch result for a ticket.
    ///
    /// On success the payload is decoded and cached; on failure the
    /// in-flight slot is cleared so a later `begin_load` can retry.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        payload: Result<&str, String>,
    ) -> Result<Resolution, TopologyError> {
        let resolution = self
            .pending
            .remove(&ticket.0)
            .ok_or(TopologyError::UnknownTicket(ticket.0))?;
        self.in_flight.remove(&resolution);

        let raw = payload.map_err(|message| TopologyError::FetchFailure {
            resolution,
            message,
        })?;
        let topology = decode_feature_collection(raw)
            .map_err(|source| TopologyError::Decode { resolution, source })?;
        self.cache.insert(resolution, topology);
        Ok(resolution)
    }

    pub fn get(&self, resolution: Resolution) -> Option<&Topology> {
        self.cache.get(&resolution)
    }

    pub fn is_cached(&self, resolution: Resolution) -> bool {
        self.cache.contains_key(&resolution)
    }

    pub fn pending_resolution(&self, ticket: LoadTicket) -> Option<Resolution> {
        self.pending.get(&ticket.0).copied()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drops cached geometry, e.g. under memory pressure. Outstanding
    /// fetches are unaffected.
    pub fn evict(&mut self, resolution: Resolution) -> bool {
        self.cache.remove(&resolution).is_some()
    }
}
