//! Client-side navigation.
//!
//! There is no browser here: route changes requested by the stores (forced
//! logout, post-login landing) are forwarded over a channel to whoever drives
//! the application.

use async_channel::{Receiver, Sender};
use tracing::{debug, info};

use crate::core::Navigator;

/// [`Navigator`] that forwards every route to an `async-channel` receiver.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: Sender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, Receiver<String>) {
        let (tx, rx) = async_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: &str) {
        info!(route = %route, "Navigating");
        if self.tx.try_send(route.to_string()).is_err() {
            debug!(route = %route, "No navigation receiver, route dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_arrive_in_order() {
        let (navigator, rx) = ChannelNavigator::new();
        navigator.navigate("/dashboard");
        navigator.navigate("/login");
        assert_eq!(rx.try_recv().unwrap(), "/dashboard");
        assert_eq!(rx.try_recv().unwrap(), "/login");
    }

    #[test]
    fn test_navigate_without_receiver_is_harmless() {
        let (navigator, rx) = ChannelNavigator::new();
        drop(rx);
        navigator.navigate("/login");
    }
}
