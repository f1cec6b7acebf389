/*
[INPUT]:  Application context and user input via CLI
[OUTPUT]: Page-by-page terminal navigation of DocPress
[POS]:    CLI interactive flow
[UPDATE]: When pages or page actions change
*/

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};

use docpress_adapter::CertificateRecord;
use docpress_app::chatbot::Sender;
use docpress_app::form::{FormKind, default_issue_date, parse_issue_date};
use docpress_app::views::{DashboardView, ProfileView};
use docpress_app::{AppContext, Route};

enum MenuAction {
    Open(Route),
    Chat,
    Disconnect,
    Logout,
    Exit,
}

pub async fn run_interactive(ctx: &AppContext) -> Result<()> {
    let theme = ColorfulTheme::default();
    println!("{}", style("DocPress").bold().cyan());
    println!(
        "{}",
        style("Blockchain-verified academic certificates").dim()
    );

    loop {
        let actions = menu_actions(ctx).await;
        let labels: Vec<String> = actions.iter().map(action_label).collect();
        let selection = Select::with_theme(&theme)
            .with_prompt("Go to")
            .items(&labels)
            .default(0)
            .interact()?;

        match &actions[selection] {
            MenuAction::Open(route) => open_page(ctx, &theme, *route).await?,
            MenuAction::Chat => chat(ctx, &theme)?,
            MenuAction::Disconnect => ctx.bridge().disconnect().await,
            MenuAction::Logout => ctx.session().logout(),
            MenuAction::Exit => return Ok(()),
        }
    }
}

async fn menu_actions(ctx: &AppContext) -> Vec<MenuAction> {
    let access = ctx.access().await;
    let mut actions: Vec<MenuAction> = Route::ALL.into_iter().map(MenuAction::Open).collect();
    actions.push(MenuAction::Chat);
    if access.wallet_connected {
        actions.push(MenuAction::Disconnect);
    }
    if access.signed_in {
        actions.push(MenuAction::Logout);
    }
    actions.push(MenuAction::Exit);
    actions
}

fn action_label(action: &MenuAction) -> String {
    match action {
        MenuAction::Open(route) => format!("{:<20} {}", route.title(), style(route.path()).dim()),
        MenuAction::Chat => "Ask the assistant".to_string(),
        MenuAction::Disconnect => "Disconnect wallet".to_string(),
        MenuAction::Logout => "Log out".to_string(),
        MenuAction::Exit => "Exit".to_string(),
    }
}

async fn open_page(ctx: &AppContext, theme: &ColorfulTheme, requested: Route) -> Result<()> {
    let route = ctx.resolve(requested).await;
    if route != requested {
        println!(
            "{}",
            style(format!("Redirected from {requested} to {route}")).yellow()
        );
    }
    println!("\n{}", style(route.title()).bold().underlined());

    match route {
        Route::Home => print_home(),
        Route::Connect => connect(ctx, theme).await?,
        Route::Dashboard => print_dashboard(&ctx.dashboard().await),
        Route::Issue => certificate_form(ctx, theme, FormKind::Issue).await?,
        Route::Verify => certificate_form(ctx, theme, FormKind::Verify).await?,
        Route::Revoke => certificate_form(ctx, theme, FormKind::Revoke).await?,
        Route::Profile => print_profile(&ctx.profile().await),
        Route::Login => login(ctx, theme).await?,
        Route::Register => register(ctx, theme).await?,
    }
    println!();
    Ok(())
}

fn print_home() {
    println!("Issue, verify and revoke academic certificates on the blockchain.");
    println!(
        "{}",
        style("Connect a wallet or log in to manage certificates; anyone can verify.").dim()
    );
}

async fn connect(ctx: &AppContext, theme: &ColorfulTheme) -> Result<()> {
    if !ctx.bridge().has_provider() {
        println!(
            "{}",
            style("No wallet provider is configured. Set wallet.rpc_url or wallet.demo.").yellow()
        );
    }
    let proceed = Confirm::with_theme(theme)
        .with_prompt("Connect your wallet now?")
        .default(true)
        .interact()?;
    if proceed {
        ctx.bridge().connect().await;
    }
    Ok(())
}

fn print_dashboard(view: &DashboardView) {
    println!("{}", view.greeting);
    if let Some(wallet) = &view.wallet {
        println!("Wallet: {}", style(wallet).cyan());
    }
    for card in &view.cards {
        println!(
            "  {} {}  {}",
            style("*").cyan(),
            style(card.title).bold(),
            style(card.description).dim()
        );
    }
}

fn print_profile(view: &ProfileView) {
    println!("[{}]", style(&view.initials).bold().cyan());
    if let (Some(name), Some(email)) = (&view.name, &view.email) {
        println!("{name} <{email}>");
    }
    if let Some(wallet) = &view.wallet {
        println!("Connected Wallet: {}", style(wallet).cyan());
    }
    println!("Role:    {}", view.role);
    println!("Status:  {}", style("Active").green());
    println!("Joined:  {}", view.joined);
    if let Some(link) = &view.explorer_link {
        println!("Explorer: {}", style(link).underlined());
    }

    println!("\n{}", style("Transaction History").bold());
    if view.history.is_empty() {
        println!("{}", style("No transactions found").dim());
        return;
    }
    for row in &view.history {
        println!(
            "  {:<8} {}  {:<15} {}",
            row.kind,
            row.date,
            row.tx_hash.as_deref().unwrap_or("-"),
            row.student_name
        );
    }
}

async fn certificate_form(ctx: &AppContext, theme: &ColorfulTheme, kind: FormKind) -> Result<()> {
    let student_name = text_field(theme, "Student Name")?;
    let course = text_field(theme, "Course")?;
    let university = text_field(theme, "University")?;
    let issue_date: String = Input::with_theme(theme)
        .with_prompt("Issue Date (YYYY-MM-DD)")
        .default(default_issue_date())
        .validate_with(|input: &String| -> Result<(), &'static str> {
            parse_issue_date(input)
                .map(|_| ())
                .ok_or("Please enter a valid date.")
        })
        .interact_text()?;

    let proceed = Confirm::with_theme(theme)
        .with_prompt(kind.button_label())
        .default(true)
        .interact()?;
    if !proceed {
        return Ok(());
    }

    let record = CertificateRecord::new(student_name, course, university, issue_date);
    match ctx.submit_certificate(kind, &record).await {
        Ok(None) => println!(
            "{}",
            style("Please connect your wallet first.").yellow()
        ),
        Ok(Some(result)) if kind == FormKind::Verify => {
            if result {
                println!("{}", style("Certificate is valid.").bold().green());
            } else {
                println!("{}", style("Certificate could not be verified.").bold().red());
            }
        }
        Ok(Some(_)) => {}
        Err(errors) => {
            for error in errors.0 {
                println!("{}", style(error.message).red());
            }
        }
    }
    Ok(())
}

fn text_field(theme: &ColorfulTheme, prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.trim().chars().count() >= 2 {
                Ok(())
            } else {
                Err("Must be at least 2 characters.")
            }
        })
        .interact_text()?;
    Ok(value)
}

async fn login(ctx: &AppContext, theme: &ColorfulTheme) -> Result<()> {
    let email: String = Input::with_theme(theme)
        .with_prompt("Email")
        .interact_text()?;
    let password = Password::with_theme(theme)
        .with_prompt("Password")
        .interact()?;
    println!("{}", style("Logging in...").dim());
    ctx.session().login(&email, &password).await;
    Ok(())
}

async fn register(ctx: &AppContext, theme: &ColorfulTheme) -> Result<()> {
    let name: String = Input::with_theme(theme)
        .with_prompt("Full Name")
        .interact_text()?;
    let email: String = Input::with_theme(theme)
        .with_prompt("Email")
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.contains('@') {
                Ok(())
            } else {
                Err("Please enter a valid email address.")
            }
        })
        .interact_text()?;
    let password = Password::with_theme(theme)
        .with_prompt("Password")
        .with_confirmation("Confirm Password", "Passwords do not match.")
        .interact()?;
    println!("{}", style("Creating account...").dim());
    ctx.session().register(&name, &email, &password).await;
    Ok(())
}

fn chat(ctx: &AppContext, theme: &ColorfulTheme) -> Result<()> {
    for message in ctx.transcript() {
        let speaker = match message.sender {
            Sender::Bot => style("DocPress:").bold().cyan(),
            Sender::User => style("You:").bold(),
        };
        println!("{speaker} {}", message.text);
    }
    println!("{}", style("Leave the message empty to go back.").dim());

    loop {
        let message: String = Input::with_theme(theme)
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;
        let Some(reply) = ctx.chat(&message) else {
            return Ok(());
        };
        println!("{} {reply}", style("DocPress:").bold().cyan());
    }
}
