use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::store::FileStore;
use crate::model::config::Config;
use crate::model::state::AppState;
use crate::model::task::{ListType, TaskPatch};
use crate::ops::task_ops;
use crate::ops::theme::{self, Appearance, TerminalAppearance};
use crate::state::{AppContext, AppError, Renderer, SystemClock};

type CmdResult = Result<(), Box<dyn std::error::Error>>;
type Ctx = AppContext<FileStore, CliRenderer>;

/// One-shot commands print their own output; the renderer only surfaces
/// storage warnings.
#[derive(Debug, Default)]
pub struct CliRenderer;

impl Renderer for CliRenderer {
    fn render(&mut self, _state: &AppState) {}

    fn report_error(&mut self, error: &AppError) {
        eprintln!("warning: {}", error);
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, config: &Config, data_dir: &Path) -> CmdResult {
    let json = cli.json;
    let Some(cmd) = cli.command else {
        return Err("no command given (run `dl` without arguments for the TUI)".into());
    };

    // Config commands never touch the store
    if let Commands::Config(args) = cmd {
        return cmd_config(args);
    }

    let mut ctx = open_context(config, data_dir);
    let result = match cmd {
        // Read commands
        Commands::List(args) => cmd_list(&ctx, args, json),
        Commands::Theme(args) => cmd_theme(&mut ctx, args, config, json),

        // Write commands
        Commands::Add(args) => cmd_add(&mut ctx, args, json),
        Commands::Update(args) => cmd_update(&mut ctx, args, json),
        Commands::Delete(args) => cmd_delete(&mut ctx, args),
        Commands::Toggle(args) => cmd_toggle(&mut ctx, args, json),
        Commands::Reorder(args) => cmd_reorder(&mut ctx, args, json),
        Commands::Mv(args) => cmd_mv(&mut ctx, args),

        // Maintenance
        Commands::Reset => cmd_reset(&mut ctx, json),
        Commands::Clear(args) => cmd_clear(&mut ctx, args),
        Commands::Config(_) => Ok(()),
    };

    // Opening may have run the daily reset, so flush even after reads
    ctx.flush()?;
    result
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_context(config: &Config, data_dir: &Path) -> Ctx {
    let store = FileStore::open(data_dir, config.storage.quota_bytes);
    AppContext::start(
        store,
        CliRenderer,
        Box::new(SystemClock),
        Duration::from_millis(config.storage.debounce_ms),
    )
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print one task as JSON, looked up after the change.
fn print_task_json(ctx: &Ctx, list: ListType, id: &str) -> CmdResult {
    match task_ops::find_task(ctx.state().list(list), id) {
        Some(task) => print_json(task),
        None => Err(format!("task not found: {}", id).into()),
    }
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{} [y/N] ", prompt)?;
    stdout.flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Ctx, args: ListArgs, json: bool) -> CmdResult {
    let lists: Vec<ListType> = match args.list {
        Some(list) => vec![list],
        None => ListType::ALL.to_vec(),
    };

    if json {
        let out: Vec<TaskListJson> = lists
            .iter()
            .map(|&list| list_to_json(ctx.state(), list))
            .collect();
        return print_json(&out);
    }

    for (i, list) in lists.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in format_list(ctx.state(), *list) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_theme(ctx: &mut Ctx, args: ThemeArgs, config: &Config, json: bool) -> CmdResult {
    if let Some(preference) = args.preference {
        ctx.set_theme(preference);
    }
    let preference = ctx.state().theme;
    let appearance = TerminalAppearance::new(config.ui.system_theme.as_deref());
    let effective = theme::resolve(preference, appearance.prefers_dark());

    if json {
        return print_json(&ThemeJson {
            preference,
            effective,
        });
    }
    println!("preference: {}", preference);
    println!("effective:  {}", effective);
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &mut Ctx, args: AddArgs, json: bool) -> CmdResult {
    let id = ctx.add(args.list, &args.text)?;
    if json {
        return print_task_json(ctx, args.list, &id);
    }
    println!("{}", id);
    Ok(())
}

fn cmd_update(ctx: &mut Ctx, args: UpdateArgs, json: bool) -> CmdResult {
    let id = ctx.resolve_id(args.list, &args.id)?;

    // Flags win over the JSON patch
    let mut patch: TaskPatch = match &args.patch {
        Some(raw) => serde_json::from_str(raw).map_err(|e| format!("invalid --patch: {}", e))?,
        None => TaskPatch::default(),
    };
    if args.text.is_some() {
        patch.text = args.text;
    }
    if args.checked.is_some() {
        patch.checked = args.checked;
    }
    if args.recurring.is_some() {
        patch.is_recurring = args.recurring;
    }
    if args.order.is_some() {
        patch.order = args.order;
    }
    if patch.is_empty() {
        return Err("nothing to update (use --text, --checked, --recurring, --order or --patch)".into());
    }

    ctx.update(args.list, &id, &patch)?;
    if json {
        return print_task_json(ctx, args.list, &id);
    }
    println!("{} updated", short_id(&id));
    Ok(())
}

fn cmd_delete(ctx: &mut Ctx, args: TaskRefArgs) -> CmdResult {
    let id = ctx.resolve_id(args.list, &args.id)?;
    ctx.delete(args.list, &id);
    println!("{} deleted", short_id(&id));
    Ok(())
}

fn cmd_toggle(ctx: &mut Ctx, args: TaskRefArgs, json: bool) -> CmdResult {
    let id = ctx.resolve_id(args.list, &args.id)?;
    let checked = ctx.toggle(args.list, &id)?;
    if json {
        return print_task_json(ctx, args.list, &id);
    }
    let word = if checked { "checked" } else { "unchecked" };
    println!("{} {}", short_id(&id), word);
    Ok(())
}

fn cmd_reorder(ctx: &mut Ctx, args: ReorderArgs, json: bool) -> CmdResult {
    let ids = args
        .ids
        .iter()
        .map(|raw| ctx.resolve_id(args.list, raw))
        .collect::<Result<Vec<String>, AppError>>()?;

    let before = ctx.state().list(args.list).len();
    ctx.reorder(args.list, &ids);
    let after = ctx.state().list(args.list).len();
    let dropped = before - after;

    if json {
        return print_json(&ReorderJson {
            list: args.list,
            tasks: ctx.state().sorted(args.list),
            dropped,
        });
    }
    println!("{} reordered", args.list);
    if dropped > 0 {
        println!("removed {} task(s) not named", dropped);
    }
    Ok(())
}

fn cmd_mv(ctx: &mut Ctx, args: MvArgs) -> CmdResult {
    let id = ctx.resolve_id(args.list, &args.id)?;
    ctx.move_task(args.list, &id, args.delta)?;
    println!("{} moved", short_id(&id));
    Ok(())
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

fn cmd_reset(ctx: &mut Ctx, json: bool) -> CmdResult {
    let outcome = ctx.force_reset();
    if json {
        return print_json(&reset_to_json(&outcome));
    }
    println!(
        "daily list reset: kept {}, dropped {}",
        outcome.daily.len(),
        outcome.dropped
    );
    Ok(())
}

fn cmd_clear(ctx: &mut Ctx, args: ClearArgs) -> CmdResult {
    if !args.yes && !confirm("Delete all tasks and settings?")? {
        println!("cancelled");
        return Ok(());
    }
    ctx.clear_all_data()?;
    println!("all data cleared");
    Ok(())
}

fn cmd_config(args: ConfigCmd) -> CmdResult {
    let path = config_io::config_path();
    match args.action {
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Set(set) => {
            config_io::set_config_value(&path, &set.key, &set.value)?;
            println!("{} = {}", set.key, set.value);
        }
    }
    Ok(())
}
