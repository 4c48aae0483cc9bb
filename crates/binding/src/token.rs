//! Token contract bindings.

use alloy_sol_types::sol;

sol! {
    /// ERC20 token with ownable mint and burn
    #[sol(rpc)]
    interface IToken {
        /// Emitted when tokens are transferred
        event Transfer(
            address indexed from,
            address indexed to,
            uint256 value
        );

        /// Emitted when an allowance is set
        event Approval(
            address indexed owner,
            address indexed spender,
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

        /// Get the contract owner (the only account allowed to mint)
        function owner() external view returns (address);

        /// Get token balance of an account
        function balanceOf(address account) external view returns (uint256);

        /// Get allowance granted by owner to spender
        function allowance(address owner, address spender) external view returns (uint256);

        /// Transfer tokens to recipient
        function transfer(address recipient, uint256 amount) external returns (bool);

        /// Approve spender to spend tokens
        function approve(address spender, uint256 amount) external returns (bool);

        /// Transfer tokens from sender to recipient (requires allowance)
        function transferFrom(address sender, address recipient, uint256 amount) external returns (bool);

        /// Mint new tokens to an account (owner only)
        function mint(address to, uint256 amount) external;

        /// Burn tokens from the caller's balance
        function burn(uint256 amount) external;
    }
}

#[cfg(test)]
mod tests {
    use super::IToken;
    use alloy_primitives::{address, U256};
    use alloy_sol_types::SolCall;

    #[test]
    fn test_selectors() {
        assert_eq!(IToken::transferCall::SELECTOR, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(IToken::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(IToken::transferFromCall::SELECTOR, [0x23, 0xb8, 0x72, 0xdd]);
        assert_eq!(IToken::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(IToken::allowanceCall::SELECTOR, [0xdd, 0x62, 0xed, 0x3e]);
        assert_eq!(IToken::ownerCall::SELECTOR, [0x8d, 0xa5, 0xcb, 0x5b]);
        assert_eq!(IToken::mintCall::SELECTOR, [0x40, 0xc1, 0x0f, 0x19]);
        assert_eq!(IToken::burnCall::SELECTOR, [0x42, 0x96, 0x6c, 0x68]);
    }

    #[test]
    fn test_transfer_calldata_layout() {
        let recipient = address!("1111111111111111111111111111111111111111");
        let call = IToken::transferCall {
            recipient,
            amount: U256::from(10),
        };
        let data = call.abi_encode();

        // selector + two 32 byte words
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[16..36], recipient.as_slice());
        assert_eq!(data[67], 10);
    }
}
