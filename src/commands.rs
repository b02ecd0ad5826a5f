//! Subcommand handlers
//!
//! Each handler gets the session explicitly; nothing about login state is
//! global. Data is fetched fresh on every call.

use anyhow::{bail, Context};
use chrono::Utc;
use vaultbank_api::BankClient;
use vaultbank_config::Config;
use vaultbank_core::validation::{parse_amount_input, validate_credentials, validate_withdrawal};
use vaultbank_core::{
    format_monthly_change, Account, AccountDirectory, AmountFormatter, BalanceOverview, Credentials,
    FileStore, KeyValueStore, Session, Transaction, TransactionFilter, TransactionHistory,
};

use crate::Command;

pub async fn run(command: Command, config: &Config, session: &mut Session<FileStore>) -> anyhow::Result<()> {
    let client = BankClient::new(config)?.with_token(session.token());
    let out = Output::new(config);

    match command {
        Command::Login {
            username,
            password,
            remember_me,
        } => {
            let credentials = Credentials { username, password };
            validate_credentials(&credentials)?;
            let token = client.login(&credentials).await?;
            session.begin(token.token, remember_me).await?;
            println!("Logged in as {}", credentials.username);
            if !remember_me {
                println!("Remember me is off: the session ends when this command exits.");
            }
        }
        Command::Register {
            username,
            password,
            image,
        } => {
            let credentials = Credentials { username, password };
            validate_credentials(&credentials)?;
            let token = client.register(&credentials, &image).await?;
            session.begin(token.token, true).await?;
            println!("Registered and logged in as {}", credentials.username);
        }
        Command::Logout => {
            session.end().await?;
            println!("Logged out");
        }
        Command::Balance => {
            require_login(session)?;
            let (account, transactions) = fetch_overview(&client).await?;
            let overview =
                BalanceOverview::build(&account, &transactions, config.dashboard.recent_count, Utc::now());

            println!("{}", account.handle());
            println!("Balance: {}", out.money(overview.balance));
            if let Some(change) = format_monthly_change(&overview.change) {
                println!("         {}", change);
            }
            println!();
            println!("Recent transactions");
            if overview.recent.is_empty() {
                println!("  No transactions yet");
            }
            for tx in &overview.recent {
                println!("{}", out.transaction_row(tx));
            }
        }
        Command::Deposit { amount } => {
            require_login(session)?;
            let amount = parse_amount_input(&amount)?;
            client.deposit(amount).await?;
            print_balance(&client, &out).await?;
        }
        Command::Withdraw { amount } => {
            require_login(session)?;
            let amount = parse_amount_input(&amount)?;
            let account = client.me().await?;
            validate_withdrawal(amount, account.balance)?;
            client.withdraw(amount).await?;
            print_balance(&client, &out).await?;
        }
        Command::Transfer { username, amount } => {
            require_login(session)?;
            let username = vaultbank_utils::strip_mention(username.trim()).to_string();
            if username.is_empty() {
                bail!("Please choose a recipient");
            }
            let amount = parse_amount_input(&amount)?;
            let account = client.me().await?;
            validate_withdrawal(amount, account.balance)?;
            client.transfer(amount, &username).await?;
            println!("Sent {} to @{}", out.money(amount), username);
            print_balance(&client, &out).await?;
        }
        Command::History {
            from,
            to,
            amount,
            types,
            more,
        } => {
            require_login(session)?;
            let transactions = client.transactions().await?;
            let mut history = TransactionHistory::new(transactions, &config.pagination);
            history.apply_filter(TransactionFilter::from_inputs(
                from.as_deref().unwrap_or_default(),
                to.as_deref().unwrap_or_default(),
                amount.as_deref().unwrap_or_default(),
                &types,
            ));
            for _ in 0..more {
                if !history.load_more() {
                    break;
                }
            }

            let window = history.window();
            println!(
                "Showing {}-{} of {} transactions",
                if window.is_empty() { 0 } else { window.start + 1 },
                window.end,
                history.matched()
            );
            if history.matched() == 0 {
                println!("  No transactions match the filter");
            }
            for tx in history.page() {
                println!("{}", out.transaction_row(tx));
            }
            if history.has_more() {
                println!("  ... use --more to load the next page");
            }
        }
        Command::Accounts { search, more, back } => {
            require_login(session)?;
            let users = client.users().await?;
            let mut directory = AccountDirectory::new(users, &config.pagination);
            if let Some(query) = &search {
                directory.search(query);
            }
            for _ in 0..more {
                directory.load_more();
            }
            for _ in 0..back {
                directory.on_scroll(0.0);
            }

            let window = directory.window();
            println!(
                "Showing {}-{} of {} users",
                if window.is_empty() { 0 } else { window.start + 1 },
                window.end,
                directory.matched()
            );
            for account in directory.page() {
                println!("{}", out.account_row(account));
            }
        }
        Command::Account { id } => {
            require_login(session)?;
            let account = client.user(&id).await?;
            print_account(&out, &account);
        }
        Command::Profile { image } => {
            require_login(session)?;
            let account = match image {
                Some(path) => {
                    let updated = client
                        .update_profile_image(&path)
                        .await
                        .with_context(|| format!("updating profile picture from {}", path.display()))?;
                    println!("Profile picture updated");
                    updated
                }
                None => client.me().await?,
            };
            print_account(&out, &account);
            println!("Remember me: {}", if session.remember_me() { "on" } else { "off" });
        }
    }

    Ok(())
}

fn require_login<S: KeyValueStore>(session: &Session<S>) -> anyhow::Result<()> {
    session.require_token()?;
    Ok(())
}

async fn fetch_overview(client: &BankClient) -> anyhow::Result<(Account, Vec<Transaction>)> {
    let (account, transactions) = tokio::try_join!(client.me(), client.transactions())?;
    Ok((account, transactions))
}

async fn print_balance(client: &BankClient, out: &Output<'_>) -> anyhow::Result<()> {
    let account = client.me().await?;
    println!("Balance: {}", out.money(account.balance.unwrap_or(0.0)));
    Ok(())
}

fn print_account(out: &Output, account: &Account) {
    println!("{}", account.handle());
    println!("  Balance: {}", out.money(account.balance.unwrap_or(0.0)));
    if let Some(image) = account.image.as_deref().filter(|i| !i.is_empty()) {
        println!("  Image:   {}", out.config.image_url(image));
    }
}

struct Output<'a> {
    config: &'a Config,
    formatter: AmountFormatter,
}

impl<'a> Output<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            formatter: AmountFormatter::from(&config.currency),
        }
    }

    fn money(&self, amount: f64) -> String {
        format!("{} {}", self.formatter.format(amount), self.config.currency.label)
    }

    fn transaction_row(&self, tx: &Transaction) -> String {
        let sign = if tx.is_credit() { "+" } else { "-" };
        format!(
            "  {:<24} {:<16} {}{}",
            tx.title(),
            tx.detail(),
            sign,
            self.money(tx.magnitude())
        )
    }

    fn account_row(&self, account: &Account) -> String {
        format!(
            "  {:<24} {}",
            account.handle(),
            self.money(account.balance.unwrap_or(0.0))
        )
    }
}
