use std::sync::{
    Mutex,
    atomic::{AtomicU64, Ordering},
};

use crate::foundation::core::FrameRGBA;

/// Identifies one render request. Tickets are strictly increasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTicket(u64);

impl RenderTicket {
    /// Raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Last-triggered-wins guard for renders that may finish out of order.
///
/// Every state change calls [`begin`](Self::begin); a finished frame is handed to
/// [`complete`](Self::complete) with its ticket and is published only if no newer render was
/// requested in the meantime. Superseded frames are dropped.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    issued: AtomicU64,
    latest: Mutex<Option<(RenderTicket, FrameRGBA)>>,
}

impl RenderScheduler {
    /// An empty scheduler; no ticket issued, nothing published.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new render request.
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.issued.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is still the newest request.
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.issued.load(Ordering::Acquire) == ticket.0
    }

    /// Publish `frame` if `ticket` is still current. Returns whether it was published.
    pub fn complete(&self, ticket: RenderTicket, frame: FrameRGBA) -> bool {
        let Ok(mut latest) = self.latest.lock() else {
            return false;
        };
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                newest = self.issued.load(Ordering::Acquire),
                "discarding superseded render"
            );
            return false;
        }
        *latest = Some((ticket, frame));
        true
    }

    /// Copy of the most recently published frame.
    pub fn latest_frame(&self) -> Option<FrameRGBA> {
        self.latest
            .lock()
            .ok()
            .and_then(|l| l.as_ref().map(|(_, f)| f.clone()))
    }

    /// Ticket of the most recently published frame.
    pub fn latest_ticket(&self) -> Option<RenderTicket> {
        self.latest
            .lock()
            .ok()
            .and_then(|l| l.as_ref().map(|(t, _)| *t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scheduler.rs"]
mod tests;
