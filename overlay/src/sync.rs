//! Role-aware sync orchestration.
//!
//! The authority owns ground truth: it answers pull requests with a freshly
//! built package and composites its own overlay locally without a round
//! trip. Followers issue one pull request per world-ready trigger and
//! composite whatever the response decodes to. There is no retry or timeout
//! logic; the transport is assumed reliable and ordered, so a lost response
//! simply leaves the follower in `AwaitingResponse`.

use std::fmt;

use locmap_protocol::{LOCATIONS_CHANNEL, codec};
use tracing::debug;

use crate::catalog::{Catalog, TypeRegistry};
use crate::compositor::{OverlayCompositor, PassSummary};
use crate::error::OverlayError;
use crate::host::OverlayHost;
use crate::selector::select_records;

/// Opaque peer identifier assigned by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network role, chosen once at startup from the host topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Authority,
    Follower { authority: PeerId },
}

/// Controller state. `Serving` and `AwaitingResponse` are role-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Serving,
    AwaitingResponse,
}

/// Delivers opaque byte packages between peers. Reliability and ordering are
/// the transport's responsibility; the controller never retries.
pub trait Transport {
    fn register_channel(&mut self, name: &str) -> Result<(), OverlayError>;
    fn send_request(&mut self, peer: PeerId, payload: &[u8]) -> Result<(), OverlayError>;
    fn send_response(&mut self, peer: PeerId, payload: &[u8]) -> Result<(), OverlayError>;
}

/// Orchestrates package building, transport traffic, and compositing for
/// one sync role.
pub struct SyncController<'a, T: Transport> {
    role: Role,
    state: SyncState,
    catalog: &'a dyn Catalog,
    registry: &'a dyn TypeRegistry,
    compositor: OverlayCompositor<'a>,
    transport: T,
    channel_bound: bool,
}

impl<'a, T: Transport> SyncController<'a, T> {
    pub fn new(
        role: Role,
        catalog: &'a dyn Catalog,
        registry: &'a dyn TypeRegistry,
        compositor: OverlayCompositor<'a>,
        transport: T,
    ) -> Self {
        SyncController {
            role,
            state: SyncState::Idle,
            catalog,
            registry,
            compositor,
            transport,
            channel_bound: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Register the locations channel on the transport. Idempotent: a second
    /// call is a no-op, so re-running startup wiring cannot double-register
    /// the handler and double-composite.
    pub fn bind_channel(&mut self) -> Result<(), OverlayError> {
        if self.channel_bound {
            return Ok(());
        }
        self.transport.register_channel(LOCATIONS_CHANNEL)?;
        self.channel_bound = true;
        Ok(())
    }

    /// Build a fresh package from the catalog. Never cached: the catalog is
    /// the single source of truth, so every request re-reads it.
    pub fn build_package(&self) -> Vec<u8> {
        let records = select_records(self.catalog, self.registry);
        debug!(count = records.len(), "built location package");
        codec::encode(&records)
    }

    /// World-ready trigger.
    ///
    /// Authority: build a package and composite it locally, round-tripping
    /// through the codec so both roles exercise the identical decode path.
    /// Returns the pass summary.
    ///
    /// Follower: issue one pull request to the authority and return `None`;
    /// compositing happens later in [`SyncController::on_response`].
    pub fn on_world_ready(
        &mut self,
        host: &mut dyn OverlayHost,
    ) -> Result<Option<PassSummary>, OverlayError> {
        match self.role {
            Role::Authority => {
                self.state = SyncState::Serving;
                let package = self.build_package();
                let records = codec::decode_all(&package)?;
                let summary = self.compositor.composite(&records, host);
                self.state = SyncState::Idle;
                Ok(Some(summary))
            }
            Role::Follower { authority } => {
                debug!(peer = %authority, "requesting location package");
                self.transport.send_request(authority, &[])?;
                self.state = SyncState::AwaitingResponse;
                Ok(None)
            }
        }
    }

    /// Pull request received from a peer. Authority only.
    pub fn on_request(&mut self, peer: PeerId) -> Result<(), OverlayError> {
        if !matches!(self.role, Role::Authority) {
            return Err(OverlayError::WrongRole(
                "only the authority serves pull requests",
            ));
        }
        self.state = SyncState::Serving;
        debug!(%peer, "serving location package");
        let package = self.build_package();
        let result = self.transport.send_response(peer, &package);
        self.state = SyncState::Idle;
        result
    }

    /// Response package received from the authority. Follower only.
    ///
    /// The package is decoded in full before any pixel write, so a malformed
    /// package aborts the attempt without partial application.
    pub fn on_response(
        &mut self,
        host: &mut dyn OverlayHost,
        payload: &[u8],
    ) -> Result<PassSummary, OverlayError> {
        if !matches!(self.role, Role::Follower { .. }) {
            return Err(OverlayError::WrongRole(
                "only followers consume response packages",
            ));
        }
        let records = match codec::decode_all(payload) {
            Ok(records) => records,
            Err(err) => {
                // The sync attempt is over either way.
                self.state = SyncState::Idle;
                return Err(err.into());
            }
        };
        let summary = self.compositor.composite(&records, host);
        self.state = SyncState::Idle;
        Ok(summary)
    }
}
