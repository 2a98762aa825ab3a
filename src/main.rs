use quantumshield::config::Config;
use quantumshield::core::{Blockchain, SYSTEM_SENDER};
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut config = Config::load().unwrap_or_default();
    config.chain.difficulty = 3;

    let mut chain = Blockchain::new(&config);

    let alice = chain.create_wallet("Alice")?;
    let bob = chain.create_wallet("Bob")?;
    let charlie = chain.create_wallet("Charlie")?;

    // Initial funding, then a few transfers between the wallets.
    chain.submit_transaction(SYSTEM_SENDER, &alice, Decimal::from(100))?;
    chain.mine_pending(&alice)?;

    chain.submit_transaction(&alice, &bob, Decimal::from(30))?;
    chain.submit_transaction(&alice, &charlie, Decimal::from(20))?;
    chain.mine_pending(&bob)?;

    chain.submit_transaction(&bob, &charlie, Decimal::from(15))?;
    chain.mine_pending(&charlie)?;

    println!("Balances:");
    for (name, address) in [("Alice", &alice), ("Bob", &bob), ("Charlie", &charlie)] {
        println!("  {} ({}): {}", name, address, chain.get_balance(address));
    }

    println!("\nBlocks:");
    for summary in chain.block_summaries() {
        let hash = summary
            .hash
            .map(|h| h.to_hex())
            .unwrap_or_else(|| "unmined".to_string());
        println!(
            "  #{} [{} tx] nonce={} hash={}",
            summary.index, summary.transaction_count, summary.nonce, hash
        );
    }

    let info = chain.chain_info();
    println!(
        "\nChain: {} blocks, {} transactions, {} pending, difficulty {}, valid: {}",
        info.blocks, info.total_transactions, info.pending_transactions, info.difficulty, info.is_valid
    );

    Ok(())
}
