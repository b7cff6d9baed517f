use super::*;
pub(super) fn handle_config(args: ConfigArgs, client: &mut RpcClient) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Get(args) => {
            let service = Service::from(args.service);
            if args.int {
                let value = client
                    .get_config_int(service, &args.key)
                    .with_context(|| format!("read {} config {}", service.name(), args.key))?;
                println!("{value}");
            } else {
                let value = client
                    .get_config(service, &args.key)
                    .with_context(|| format!("read {} config {}", service.name(), args.key))?;
                println!("{}", value.unwrap_or_default());
            }
        }
        ConfigCommands::Set(args) => {
            let service = Service::from(args.service);
            if args.int {
                let value: i64 = args
                    .value
                    .trim()
                    .parse()
                    .with_context(|| format!("{} is not an integer", args.value))?;
                client
                    .set_config_int(service, &args.key, value)
                    .with_context(|| format!("write {} config {}", service.name(), args.key))?;
            } else {
                client
                    .set_config(service, &args.key, &args.value)
                    .with_context(|| format!("write {} config {}", service.name(), args.key))?;
            }
            println!("{} = {}", args.key, args.value);
        }
    }
    Ok(())
}

pub(super) fn handle_account(args: AccountArgs, config_path: &Path) -> anyhow::Result<()> {
    let mut config = AppConfig::load(config_path)?;
    match args.command {
        AccountCommands::Add(args) => {
            let account = Account::new(&args.server, &args.username, &args.token)?;
            if !account.is_valid() {
                bail!("server url must be http(s) and the token must not be empty");
            }
            info!(server = %account.server_url, username = %account.username, "Saving account");
            config.upsert_account(account);
            config.save(config_path)?;
            println!("Account saved to {}", config_path.display());
        }
        AccountCommands::List => {
            if config.accounts.is_empty() {
                println!("No accounts configured.");
            }
            let current = config.current_account();
            for account in &config.accounts {
                let marker = if Some(account) == current { "*" } else { " " };
                println!("{marker} {} {}", account.username, account.server_url);
            }
        }
    }
    Ok(())
}
