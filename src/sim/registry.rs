//! Portal pair enumeration
//!
//! Links are resolved against the live portal set on every call. A link
//! whose portal has gone away simply yields nothing that tick.

use serde::{Deserialize, Serialize};

use super::state::{Portal, PortalId};

/// Two portals registered as companions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalLink {
    pub a: PortalId,
    pub b: PortalId,
}

impl PortalLink {
    pub fn involves(&self, id: PortalId) -> bool {
        self.a == id || self.b == id
    }
}

/// Read access to portals by id and to the registered links
pub trait PortalLookup {
    /// The live portal with this id, if any
    fn resolve(&self, id: PortalId) -> Option<Portal>;
    fn links(&self) -> &[PortalLink];
}

/// A directed use of a link: enter through `entry`, leave through `exit`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalPair {
    pub entry: Portal,
    pub exit: Portal,
}

/// Every actionable (entry, exit) pair, both directions per link
pub fn enumerate_pairs<L>(lookup: &L) -> impl Iterator<Item = PortalPair> + '_
where
    L: PortalLookup + ?Sized,
{
    lookup
        .links()
        .iter()
        .filter_map(move |link| Some((lookup.resolve(link.a)?, lookup.resolve(link.b)?)))
        .flat_map(|(a, b)| {
            [
                PortalPair { entry: a, exit: b },
                PortalPair { entry: b, exit: a },
            ]
        })
}
