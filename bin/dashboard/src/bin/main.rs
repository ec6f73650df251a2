use action::{
    BurnAction, BurnConfig, FormState, MintAction, MintConfig, TransferAction, TransferConfig,
};
use alloy_provider::Provider;
use clap::{Parser, Subcommand};
use config::AppConfig;
use dashboard::{feed_or_notice, parse_amount, render};
use notify::{LogNotifier, Notifier};
use std::time::Duration;
use token::TokenFeed;
use tokio::time;
use tracing::info;
use wallet::{RpcWallet, SessionManager, WalletProvider};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "ERC20 token dashboard")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "dashboard.toml")]
    config: String,

    /// Private key of the connected account (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: String,

    /// Connect the wallet automatically at startup
    #[arg(long)]
    connect_automatically: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect, bootstrap the token model and stream live updates
    Show,

    /// Ask the wallet to track the dashboard token
    WatchAsset,

    /// Switch the wallet to another supported chain
    SwitchChain {
        #[arg(long)]
        chain_id: u64,
    },

    /// Mint tokens to the connected account
    Mint {
        #[arg(long, default_value = "1000")]
        value: String,
    },

    /// Transfer tokens to a recipient
    Transfer {
        #[arg(long)]
        recipient: String,
        #[arg(long, default_value = "1000")]
        amount: String,
    },

    /// Burn tokens from the connected account
    Burn {
        #[arg(long, default_value = "1000")]
        value: String,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let app = AppConfig::load(&cli.config)?;

    let endpoint = config::default_chain().rpc_endpoint(&app.rpc_api_key);
    let (provider, signer_address) = client::create_wallet_provider(&endpoint, &cli.private_key)?;
    let chain_id = provider.get_chain_id().await?;

    info!("Loaded config:");
    info!("  Token: {} ({})", app.token_address, app.token_symbol);
    info!("  Signer: {}", signer_address);
    info!("  Chain: {}", chain_id);

    let wallet = RpcWallet::new(provider.clone(), vec![signer_address], chain_id);
    let mut manager = SessionManager::new(Some(wallet), LogNotifier);

    match cli.command {
        Command::Show => {
            if !cli.connect_automatically {
                println!("{}", render::unsupported_banner());
                println!("Re-run with --connect-automatically to connect the wallet.");
                return Ok(());
            }
            manager.connect().await?;
            show(&mut manager, provider, &app).await
        }
        Command::WatchAsset => {
            manager.connect().await?;
            manager
                .watch_asset(app.token_address, &app.token_symbol)
                .await;
            Ok(())
        }
        Command::SwitchChain { chain_id } => {
            let Some(chain) = config::find(chain_id) else {
                eyre::bail!("{}", render::unsupported_banner());
            };
            manager.connect().await?;
            manager.switch_to(chain).await?;
            render_session(&manager);
            Ok(())
        }
        Command::Mint { value } => {
            manager.connect().await?;
            let action = MintAction::new(
                provider.clone(),
                MintConfig {
                    token: app.token_address,
                    value: parse_amount(&value)?,
                },
            );
            run_action(&mut manager, &action).await
        }
        Command::Transfer { recipient, amount } => {
            manager.connect().await?;
            let action = TransferAction::new(
                provider.clone(),
                TransferConfig {
                    token: app.token_address,
                    recipient: recipient.parse()?,
                    amount: parse_amount(&amount)?,
                },
            );
            run_action(&mut manager, &action).await
        }
        Command::Burn { value } => {
            manager.connect().await?;
            let action = BurnAction::new(
                provider.clone(),
                BurnConfig {
                    token: app.token_address,
                    value: parse_amount(&value)?,
                },
            );
            run_action(&mut manager, &action).await
        }
    }
}

/// Submit a write action, then refresh the session's native balance.
///
/// The token balance itself is not refreshed here; it updates through
/// the live transfer watchers while `show` is running.
async fn run_action<W, A>(
    manager: &mut SessionManager<W, LogNotifier>,
    action: &A,
) -> eyre::Result<()>
where
    W: WalletProvider,
    A: action::Action,
{
    let Some(chain) = manager.session().chain else {
        eyre::bail!("no validated chain; connect first");
    };

    let mut form = FormState::opened();
    let outcome = action::submit(&mut form, action, &LogNotifier, chain).await?;

    manager.refresh_balance().await;
    info!(tx_hash = %outcome.tx_hash, block = ?outcome.block_number, "Action confirmed");

    Ok(())
}

/// Render the dashboard and keep it live: re-render on an interval,
/// resynchronize on wallet account or chain changes, tear down on ctrl-c.
async fn show<P>(
    manager: &mut SessionManager<RpcWallet<P>, LogNotifier>,
    provider: P,
    app: &AppConfig,
) -> eyre::Result<()>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    render_session(manager);
    let mut feed = build_feed(manager, &provider, app).await;

    let mut interval = time::interval(Duration::from_secs(15));
    loop {
        tokio::select! {
            event = manager.next_event() => {
                let Some(event) = event else { break };
                info!(?event, "Wallet changed, resynchronizing");

                // Drop the old watchers before re-bootstrapping so the
                // new snapshot-then-subscribe sequence starts clean.
                feed = None;
                if manager.resync().await.is_ok() {
                    feed = build_feed(manager, &provider, app).await;
                }
                render_session(manager);
            }
            _ = interval.tick() => {
                render_session(manager);
                if let Some(feed) = &feed {
                    println!("{}", render::token_panel(&feed.snapshot().await));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                manager.disconnect();
                break;
            }
        }
    }

    Ok(())
}

fn render_session<W, N>(manager: &SessionManager<W, N>)
where
    W: WalletProvider,
    N: Notifier,
{
    match render::session_panel(manager.session()) {
        Some(panel) => println!("{panel}"),
        None => println!("{}", render::unsupported_banner()),
    }
}

/// Bootstrap the token feed for the connected address.
///
/// The token contract lives on the default chain; on any other
/// supported chain the dashboard shows only the wallet session. A
/// failed bootstrap surfaces as a notice and the dashboard keeps
/// running without a feed.
async fn build_feed<P>(
    manager: &SessionManager<RpcWallet<P>, LogNotifier>,
    provider: &P,
    app: &AppConfig,
) -> Option<TokenFeed>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    let session = manager.session();
    let (Some(address), Some(chain)) = (session.address, session.chain) else {
        return None;
    };
    if chain.id != config::default_chain().id {
        return None;
    }

    let result = token::bootstrap(provider.clone(), app.token_address, address).await;
    let feed = feed_or_notice(result, &LogNotifier)?;
    println!("{}", render::token_panel(&feed.snapshot().await));

    Some(feed)
}
