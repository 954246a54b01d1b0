//! Token minting and issuance.
//!
//! - [`signer`] - pure claims-to-signed-string minting and verification
//! - [`issuer`] - the authenticate / mint / register-active flows

pub mod issuer;
pub mod signer;

pub use issuer::CredentialIssuer;
pub use signer::{AccessTokenClaims, IssuedToken, Principal, PrincipalType, TokenSigner};
