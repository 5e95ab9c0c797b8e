//! Simple Transfer Example
//!
//! Signs a value transfer, verifies its integrity the way a receiving
//! node would, and executes it against an in-memory account state.

use emberchain_core::prelude::*;

const CHAIN_ID: ChainId = 1;

fn main() {
    println!("emberchain: simple transfer\n");

    // Fixed secret so the run is reproducible
    let keypair = Secp256k1Keypair::from_secret_bytes(&[0x42; 32]).expect("valid secret");
    let sender = keypair.address();
    let receiver = Address::repeat_byte(0x02);
    let coinbase = Address::repeat_byte(0xcc);
    let amount = Uint128::new(1_000);

    // Fund the sender
    let mut state = WorldState::new();
    state.insert_account(
        sender,
        Account::new_with_balance(Uint128::new(10u128.pow(12))),
    );

    // Build and sign the transaction (default gas price and limit)
    let mut tx = Transaction::new(
        CHAIN_ID,
        sender,
        receiver,
        amount,
        1,
        TX_PAYLOAD_BINARY_TYPE,
        Vec::new(),
        Uint128::ZERO,
        Uint128::ZERO,
    )
    .expect("valid transaction");
    tx.sign(&keypair).expect("signing failed");

    println!("Sender:   {sender}");
    println!("Receiver: {receiver}");
    println!("Value:    {amount}");
    println!("Tx hash:  0x{}", hex::encode(tx.hash()));

    // A receiving node re-checks chain id, hash and signer
    tx.verify_integrity(CHAIN_ID).expect("integrity check failed");
    println!("\nIntegrity check passed");

    // Execute against the block state
    let mut block = Block::new(CHAIN_ID, coinbase, state);
    let gas = tx.verify_execution(&mut block).expect("execution failed");

    println!("\n--- Execution Result ---");
    println!("Gas charged: {gas}");
    println!(
        "Event:       {}",
        block.events_for(&tx.hash())[0].topic
    );

    println!("\n--- Final Balances ---");
    println!("Sender:   {}", block.state.balance(&sender));
    println!("Receiver: {}", block.state.balance(&receiver));
    println!("Coinbase: {}", block.state.balance(&coinbase));
}
