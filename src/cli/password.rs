use crate::cli::CliContext;
use crate::constants::MAX_CLASS_COUNT;
use crate::core::generator::{self, Composition};
use crate::core::store::{AppendOutcome, DeleteOutcome};
use crate::models::record::{validate_key, Record, Strength};
use crate::util::clipboard;
use anyhow::{bail, Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use dialoguer::{Input, Select};
use rand::rngs::OsRng;

fn parse_key(s: &str) -> Result<String, String> {
    validate_key(s)?;
    Ok(s.to_string())
}

fn parse_preset(s: &str) -> Result<Strength, String> {
    match s.parse::<Strength>().map_err(|e| e.to_string())? {
        Strength::Custom => Err("custom is not a preset; use --upper/--lower/--digits/--symbols".into()),
        strength => Ok(strength),
    }
}

fn check_count(n: usize) -> Result<(), String> {
    if n == 0 {
        return Err("Please enter a number greater than 0".into());
    }
    if n > MAX_CLASS_COUNT {
        return Err(format!("Please enter a number no greater than {}", MAX_CLASS_COUNT));
    }
    Ok(())
}

fn parse_count(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    check_count(n)?;
    Ok(n)
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// 4 character key to identify the password
    #[arg(long, value_parser = parse_key)]
    pub key: Option<String>,

    /// Predefined rules: strong|medium|weak
    #[arg(long, value_parser = parse_preset)]
    pub strength: Option<Strength>,

    /// Number of uppercase letters (custom rules)
    #[arg(long, value_parser = parse_count, conflicts_with = "strength")]
    pub upper: Option<usize>,

    /// Number of lowercase letters (custom rules)
    #[arg(long, value_parser = parse_count, conflicts_with = "strength")]
    pub lower: Option<usize>,

    /// Number of digits (custom rules)
    #[arg(long, value_parser = parse_count, conflicts_with = "strength")]
    pub digits: Option<usize>,

    /// Number of symbols (custom rules)
    #[arg(long, value_parser = parse_count, conflicts_with = "strength")]
    pub symbols: Option<usize>,

    /// Print the generated password after saving it
    #[arg(long)]
    pub show: bool,

    /// Copy the generated password to the clipboard after saving it
    #[arg(long, short = 'c')]
    pub clip: bool,
}

impl GenerateArgs {
    fn wants_custom(&self) -> bool {
        self.upper.is_some() || self.lower.is_some() || self.digits.is_some() || self.symbols.is_some()
    }
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Key of the password to delete
    #[arg(value_parser = parse_key)]
    pub key: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format: table|json
    #[arg(long, default_value = "table")]
    pub format: String,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
        }
    }
}

enum Rules {
    Preset(Strength),
    Custom,
}

pub fn run_generate(ctx: &CliContext, args: GenerateArgs) -> Result<()> {
    let rules = if let Some(strength) = args.strength {
        Rules::Preset(strength)
    } else if args.wants_custom() {
        Rules::Custom
    } else if ctx.non_interactive {
        bail!("--non-interactive requires --strength or --upper/--lower/--digits/--symbols");
    } else {
        prompt_rules()?
    };

    let (key, strength, password) = match rules {
        Rules::Preset(strength) => {
            let key = resolve_key(ctx, args.key.clone(), "Enter a 4 character key to identify your password")?;
            let password = generator::generate(strength, &key, &mut OsRng)?;
            (key, strength, password)
        }
        Rules::Custom => {
            let key = resolve_key(ctx, args.key.clone(), "Enter a 4 character key to identify your password")?;
            let composition = Composition {
                upper: resolve_count(ctx, args.upper, "--upper", "Enter the number of capital letters you want to include in your password")?,
                lower: resolve_count(ctx, args.lower, "--lower", "Enter the number of small letters you want to include in your password")?,
                digits: resolve_count(ctx, args.digits, "--digits", "Enter the number of numbers you want to include in your password")?,
                symbols: resolve_count(ctx, args.symbols, "--symbols", "Enter the number of symbols you want to include in your password")?,
            };
            let password = generator::generate_custom(&key, &composition, &mut OsRng)?;
            (key, Strength::Custom, password)
        }
    };

    let store = ctx.store();
    let record = Record::new(key.as_str(), password.as_str(), strength);
    match store.append(&record)? {
        AppendOutcome::DuplicateKey => {
            ctx.audit("generate", &key, "duplicate-key", Some(strength.as_str()));
            println!("Key already exists. Please enter a new unique key and try again");
        }
        AppendOutcome::Appended => {
            ctx.audit("generate", &key, "appended", Some(strength.as_str()));
            println!(
                "Password generated successfully. Check {} for the file",
                store.path().display()
            );
            if args.show || ctx.config.policy.reveal {
                println!("{}", password.as_str());
            }
            if args.clip || ctx.config.policy.clip {
                // The record is already stored; a missing clipboard only warns.
                match clipboard::clip(password.as_bytes()) {
                    Ok(()) => println!("Password copied to the clipboard"),
                    Err(e) => eprintln!("warning: clipboard copy failed: {:#}", e),
                }
            }
        }
    }
    Ok(())
}

pub fn run_delete(ctx: &CliContext, args: DeleteArgs) -> Result<()> {
    let key = resolve_key(ctx, args.key, "Enter the key of the password you want to delete")?;
    let store = ctx.store();

    match store.delete(&key)? {
        DeleteOutcome::StoreMissing => {
            println!("No passwords have been generated. Please generate a password first");
        }
        DeleteOutcome::KeyNotFound => {
            ctx.audit("delete", &key, "key-not-found", None);
            println!("Key does not exist. Please enter a valid key and try again");
        }
        DeleteOutcome::NoRecordMatched => {
            ctx.audit("delete", &key, "no-record-matched", None);
            println!(
                "Key '{}' appears in the file but no record matched it; nothing was deleted",
                key
            );
        }
        DeleteOutcome::Deleted { removed } => {
            ctx.audit("delete", &key, "deleted", None);
            println!("Key found. Deleting password...");
            if removed > 1 {
                println!("Removed {} records with key '{}'", removed, key);
            }
            println!("Password deleted successfully");
        }
    }
    Ok(())
}

pub fn run_list(ctx: &CliContext, args: ListArgs) -> Result<()> {
    if args.format != "table" && args.format != "json" {
        bail!("invalid format: {} (use table|json)", args.format);
    }

    let records = ctx.store().list()?;

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&records).context("serialize list")?;
        println!("{}", json);
        return Ok(());
    }

    if records.is_empty() {
        println!("No passwords found");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Password").add_attribute(Attribute::Bold),
        Cell::new("Strength").add_attribute(Attribute::Bold),
    ]);

    for record in records {
        table.add_row(vec![
            record.key,
            record.password,
            record.strength.to_string(),
        ]);
    }

    println!("{}", table);
    Ok(())
}

fn prompt_rules() -> Result<Rules> {
    let mode = Select::new()
        .with_prompt("How do you want to generate your password?")
        .items(&["With predefined rules", "With custom rules"])
        .default(0)
        .interact()
        .context("read generation mode")?;
    if mode == 1 {
        return Ok(Rules::Custom);
    }

    let presets = [Strength::Strong, Strength::Medium, Strength::Weak];
    let choice = Select::new()
        .with_prompt("Select the predefined rules")
        .items(&["Strong", "Medium", "Weak"])
        .default(0)
        .interact()
        .context("read predefined rules")?;
    Ok(Rules::Preset(presets[choice]))
}

fn resolve_key(ctx: &CliContext, key: Option<String>, prompt: &str) -> Result<String> {
    if let Some(key) = key {
        return Ok(key);
    }
    if ctx.non_interactive {
        bail!("--non-interactive requires a key");
    }
    Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| validate_key(input))
        .interact_text()
        .context("read key from prompt")
}

fn resolve_count(ctx: &CliContext, count: Option<usize>, flag: &str, prompt: &str) -> Result<usize> {
    if let Some(count) = count {
        return Ok(count);
    }
    if ctx.non_interactive {
        bail!("--non-interactive requires {} with custom rules", flag);
    }
    Input::<usize>::new()
        .with_prompt(prompt)
        .validate_with(|n: &usize| check_count(*n))
        .interact_text()
        .context("read count from prompt")
}
