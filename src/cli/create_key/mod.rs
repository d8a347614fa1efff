//! Create-key command - provisions a key without running the server

use clap::Args;

use crate::domain::key::KeyView;

#[derive(Args, Debug)]
pub struct CreateKeyArgs {
    /// Scope token granted to the key (repeatable)
    #[arg(long, required = true)]
    pub scope: Vec<String>,
}

/// Provision a key against the configured store and print it
pub async fn run(args: CreateKeyArgs) -> anyhow::Result<()> {
    let config = super::load_config();
    super::init_observability(&config);

    let state = crate::create_app_state_with_config(&config).await?;
    let key = state.provisioning.provision(Some(args.scope)).await?;

    println!("{}", serde_json::to_string_pretty(&KeyView::from(key))?);

    Ok(())
}
