use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linkr_admin::config::{
    self, AccountCommand, Cli, Command, LinksCommand, OutputFormat, UsersCommand,
};
use linkr_admin::page::{
    AccountPage, AlwaysConfirm, Confirm, FormOutcome, LinksPage, LoginPage, NewUserPage,
    Page, SignupPage, UsersPage,
};
use linkr_admin::transport::HttpTransport;
use linkr_admin::ui;

/// Asks on the terminal, anything but `y` declines.
struct Prompt;

impl Confirm for Prompt {
    fn confirm(&self, question : &str) -> bool {
        tokio::task::block_in_place(|| {
            eprint!("{} [y/N] ", question);
            let _ = io::stderr().flush();

            let mut answer = String::new();
            match io::stdin().lock().read_line(&mut answer) {
                Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
                Err(_) => false,
            }
        })
    }
}

fn confirmer(yes : bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AlwaysConfirm)
    } else {
        Box::new(Prompt)
    }
}

fn show(
    renderer : &ui::Renderer,
    format : OutputFormat,
    page : &impl Page,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", renderer.text(page)),
        OutputFormat::Html => println!("{}", renderer.html(page)?),
    }

    Ok(())
}

/// Reports how a redirecting form turned out, with the session it left
/// behind when that is what the command is for.
async fn landed(
    outcome : FormOutcome,
    notice : &str,
    transport : &HttpTransport,
    print_session : bool,
) -> bool {
    match outcome {
        FormOutcome::Redirect(to) => {
            println!("{} (server redirected to {})", notice, to);

            if print_session {
                match transport.session().await {
                    Some(session) => println!("session: {}", session),
                    None => tracing::warn!("server set no session cookie"),
                }
            }

            true
        },
        FormOutcome::Rejected => {
            eprintln!("{}", notice);
            false
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkr_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(err) = cli.check() {
        err.exit();
    }

    let transport = cli
        .transport()
        .with_context(|| format!("can't talk to {}", cli.url))?;
    let renderer = ui::Renderer::new()?;
    let confirm = confirmer(cli.yes);

    tracing::debug!(url = %cli.url, layout = ?cli.layout, "starting");

    let ok = match cli.command {
        Command::Links {
            key_by,
            delete_strategy,
            command,
        } => {
            let mut page = LinksPage::new(transport, cli.layout)
                .keyed_by(key_by.into())
                .delete_strategy(delete_strategy);

            if let LinksCommand::List { read_only : true } = command {
                page = page.read_only();
            }

            page.load().await;

            let ok = match command {
                LinksCommand::List { .. } => true,
                LinksCommand::Create { short, long } => {
                    page.create(&short, &long).await
                },
                LinksCommand::Delete { key } => {
                    let key = config::parse_key(key_by, &key).map_err(|e| anyhow!(e))?;
                    page.delete(&key, &*confirm).await
                },
                LinksCommand::Update { key, long } => {
                    let key = config::parse_key(key_by, &key).map_err(|e| anyhow!(e))?;
                    page.update(&key, &long).await
                },
            };

            show(&renderer, cli.format, &page)?;
            ok
        },
        Command::Users {
            command :
                UsersCommand::Create {
                    username,
                    password,
                    manage_links,
                    manage_users,
                },
        } => {
            let mut page = NewUserPage::new(transport);
            let outcome = page
                .create(&username, &password, manage_links, manage_users)
                .await;

            landed(outcome, &page.output(), page.transport(), false).await
        },
        Command::Users { command } => {
            let mut page = UsersPage::new(transport);
            page.load().await;

            let ok = match command {
                UsersCommand::List | UsersCommand::Create { .. } => true,
                UsersCommand::Delete { id } => page.delete(id, &*confirm).await,
                UsersCommand::Disable { id } => page.set_disabled(id, true).await,
                UsersCommand::Enable { id } => page.set_disabled(id, false).await,
                UsersCommand::Rename { id, name } => page.rename(id, &name).await,
                UsersCommand::Permissions {
                    id,
                    manage_links,
                    manage_users,
                } => page.set_permissions(id, manage_links, manage_users).await,
            };

            show(&renderer, cli.format, &page)?;
            ok
        },
        Command::Account { command } => {
            let mut page = AccountPage::new(transport);

            let outcome = match command {
                AccountCommand::Rename { name } => page.rename(&name).await,
                AccountCommand::Password { current, new } => {
                    page.change_password(&current, &new).await
                },
                AccountCommand::Disable { password } => {
                    page.disable(&password, &*confirm).await
                },
                AccountCommand::Delete { password } => {
                    page.delete(&password, &*confirm).await
                },
            };

            landed(outcome, &page.output(), page.transport(), false).await
        },
        Command::Signup { username, password } => {
            let mut page = SignupPage::new(transport);

            match page.signup(&username, &password).await {
                FormOutcome::Rejected => {
                    show(&renderer, cli.format, &page)?;
                    false
                },
                outcome => {
                    let notice = page.notice().to_string();
                    landed(outcome, &notice, page.transport(), true).await
                },
            }
        },
        Command::Login { username, password } => {
            let mut page = LoginPage::new(transport);
            let outcome = page.login(&username, &password).await;

            landed(outcome, &page.output(), page.transport(), true).await
        },
        Command::Logout => {
            let mut page = AccountPage::new(transport);
            let outcome = page.logout().await;

            landed(outcome, &page.output(), page.transport(), false).await
        },
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
