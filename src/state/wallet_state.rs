//! Wallet connection widget state.
//!
//! The dashboard only tracks which address the user connected; it never
//! signs or submits anything.

use crate::error::{Error, Result};
use crate::format;

use super::trader_state::validate_address;

/// Wallet connection state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WalletState {
    #[default]
    Disconnected,
    Connected { address: String },
}

impl WalletState {
    /// Connect an address after checking its format.
    pub fn connect(&mut self, address: &str) -> Result<()> {
        let address = address.trim();
        validate_address(address).map_err(|e| Error::wallet(e.to_string()))?;
        *self = Self::Connected {
            address: address.to_string(),
        };
        Ok(())
    }

    pub fn disconnect(&mut self) {
        *self = Self::Disconnected;
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Connected { address } => Some(address),
            Self::Disconnected => None,
        }
    }

    /// Label for the status bar.
    pub fn label(&self) -> String {
        match self {
            Self::Connected { address } => format::short_address(address),
            Self::Disconnected => "Connect wallet".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x742d35cc6634c0532925a3b844bc454e4438f44e";

    #[test]
    fn test_connect_and_disconnect() {
        let mut wallet = WalletState::default();
        assert!(!wallet.is_connected());
        assert_eq!(wallet.label(), "Connect wallet");

        wallet.connect(ADDRESS).unwrap();
        assert!(wallet.is_connected());
        assert_eq!(wallet.address(), Some(ADDRESS));
        assert_eq!(wallet.label(), "0x742d...f44e");

        wallet.disconnect();
        assert_eq!(wallet, WalletState::Disconnected);
    }

    #[test]
    fn test_rejects_malformed_address() {
        let mut wallet = WalletState::default();
        let err = wallet.connect("0xnothex").unwrap_err();
        assert!(matches!(err, Error::Wallet(_)));
        assert!(!wallet.is_connected());
    }
}
