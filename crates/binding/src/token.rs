//! Mintable/burnable ERC20 token contract bindings.
//!
//! Mints surface on-chain as a `Transfer` from the zero address,
//! burns as a `Transfer` to the zero address.

use alloy_sol_types::sol;

sol! {
    /// ERC20 interface with owner mint and holder burn extensions.
    #[sol(rpc)]
    interface ERC20 {
        /// Emitted when tokens are transferred, minted or burned
        event Transfer(
            address indexed from,
            address indexed to,
            uint256 value
        );

        /// Get token name
        function name() external view returns (string memory);

        /// Get token symbol
        function symbol() external view returns (string memory);

        /// Get token decimals
        function decimals() external view returns (uint8);

        /// Get total supply
        function totalSupply() external view returns (uint256);

        /// Get token balance of an account
        function balanceOf(address account) external view returns (uint256);

        /// Transfer tokens to recipient
        function transfer(address recipient, uint256 amount) external returns (bool);

        /// Mint new tokens to the caller
        function mint(uint256 value) external;

        /// Burn tokens from the caller's balance
        function burn(uint256 value) external;
    }
}
