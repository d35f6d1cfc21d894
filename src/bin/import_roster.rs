use anyhow::{anyhow, Result};
use roster_bot::config::{import_file_from_env, roster_file_from_env};
use roster_bot::roster::store::read_roster;
use roster_bot::roster::{import_pending, ImportOutcome, RosterStore};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("import");

    match command {
        "import" => run_import(args.get(2).map(PathBuf::from)),
        "check" => check_roster(),
        "stats" => print_stats(),
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

fn run_import(file: Option<PathBuf>) -> Result<()> {
    println!("📥 Roster Bot - Roster Import Tool");
    println!("==================================");

    let roster_file = roster_file_from_env();
    let import_file = file.unwrap_or_else(import_file_from_env);
    println!("📒 Roster file: {}", roster_file.display());
    println!("📄 Import file: {}", import_file.display());

    let store = RosterStore::open(&roster_file);
    match import_pending(&store, &import_file) {
        Ok(ImportOutcome::NothingToImport) => {
            println!("ℹ️  Nothing to import, {} does not exist", import_file.display());
        }
        Ok(ImportOutcome::Imported { records, archived_to }) => {
            println!("✅ Imported {records} records");
            println!("🗄️  Import file archived to {}", archived_to.display());
        }
        Err(e) => {
            eprintln!("❌ Import failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn check_roster() -> Result<()> {
    let roster_file = roster_file_from_env();
    println!("🔍 Checking roster file {}...", roster_file.display());

    match read_roster(&roster_file) {
        Ok(Some(roster)) => {
            let stats = roster.stats();
            println!("✅ Roster is valid: {} chats, {} members", stats.chats, stats.members);
            Ok(())
        }
        Ok(None) => {
            println!("⚠️  No roster file yet; the bot will create it on first write");
            Ok(())
        }
        Err(e) => Err(anyhow!("Roster file is not valid: {}", e)),
    }
}

fn print_stats() -> Result<()> {
    let roster_file = roster_file_from_env();
    let store = RosterStore::open(&roster_file);
    store.reload()?;
    let roster = store.snapshot();

    if roster.is_empty() {
        println!("📭 Roster is empty");
        return Ok(());
    }

    println!("📋 Members per chat:");
    for chat_id in roster.chat_ids() {
        let members = roster.members(chat_id);
        let with_handle = members.iter().filter(|m| m.handle.is_some()).count();
        println!(
            "  • {chat_id}: {} members ({} with a username)",
            members.len(),
            with_handle
        );
    }

    Ok(())
}

fn print_help() {
    println!("📥 Roster Bot - Roster Import Tool");
    println!();
    println!("USAGE:");
    println!("    import-roster [COMMAND] [FILE]");
    println!();
    println!("COMMANDS:");
    println!("    import [FILE]  Merge FILE into the roster and archive it (default)");
    println!("    check          Check the roster file parses");
    println!("    stats          Show members per chat");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    ROSTER_FILE         Roster file (default: ./data/members.json)");
    println!("    ROSTER_IMPORT_FILE  Import file (default: ./data/members_import.json)");
    println!();
    println!("EXAMPLES:");
    println!("    import-roster                          # Import the default file");
    println!("    import-roster import export.json       # Import a specific file");
    println!("    import-roster stats                    # Show roster contents");
    println!();
}
