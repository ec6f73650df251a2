//! Contract bindings for external contracts.
//!
//! The dashboard talks to a single mintable/burnable ERC20 token.
//! All bindings are generated using alloy's `sol!` macro.

pub mod token;
