//
//  fryends-client
//  api/reachability.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Network reachability probe consulted before every endpoint call.

use async_trait::async_trait;

/// Connectivity as seen by a [`Reachability`] probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Connected,
    Disconnected,
}

/// A source of connectivity information.
///
/// The executor asks the probe once per call; a `Disconnected` answer fails
/// the call before any request is built.
#[async_trait]
pub trait Reachability: Send + Sync {
    /// Returns the current connectivity.
    async fn status(&self) -> NetworkStatus;
}

/// Probe that always reports a connection.
///
/// Used by default; real connectivity errors then surface as transport
/// failures from the HTTP stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConnected;

#[async_trait]
impl Reachability for AlwaysConnected {
    async fn status(&self) -> NetworkStatus {
        NetworkStatus::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_connected() {
        let status = tokio_test::block_on(AlwaysConnected.status());
        assert_eq!(status, NetworkStatus::Connected);
    }

    #[tokio::test]
    async fn test_probe_as_trait_object() {
        let probe: std::sync::Arc<dyn Reachability> = std::sync::Arc::new(AlwaysConnected);
        assert_eq!(probe.status().await, NetworkStatus::Connected);
    }
}
