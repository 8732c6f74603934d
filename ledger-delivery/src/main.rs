use ledger_delivery::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let state = AppState::in_memory(config.clone(), InMemoryLedger::seeded());

    Server::new(config).serve(router(state)).await
}
