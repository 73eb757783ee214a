mod changeset;
mod cli;
mod compose;
mod constants;
mod error;
mod export;
mod generation;
mod project;
mod repo;
mod sandbox;
mod store;
mod ui;
mod workspace;

use crate::changeset::{ChangeSet, FileStatus, status_char};
use crate::cli::{Cli, Command, ExportCommand, ProjectCommand};
use crate::compose::PreviewOptions;
use crate::constants::{AUTHOR_ENV, DEFAULT_AUTHOR, MAX_FILES_TO_SHOW};
use crate::project::ProjectFile;
use crate::repo::{Repository, compute_status};
use crate::sandbox::context::TempDirFactory;
use crate::sandbox::{PreviewBridge, PreviewOutcome};
use crate::store::ProjectStore;
use crate::workspace::Workspace;
use anyhow::{Context, Result, bail};
use num_format::{Locale, ToFormattedString};
use std::fs;
use std::io::Read;
use std::path::Path;

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let mut workspace = Workspace::load(&cli.workspace)?;

    match cli.command {
        Command::Init { force } => init(&mut workspace, force),
        Command::Status => status(&workspace),
        Command::Stage { names, all } => {
            let repo = workspace.repository()?;
            let next = if all {
                repo.stage_all(&workspace.files)
            } else {
                warn_unknown_names(&workspace, repo, &names);
                repo.stage(&names)
            };
            status!("{} file(s) staged", next.staged().len());
            workspace.repository = Some(next);
            workspace.save()
        }
        Command::Unstage { names, all } => {
            let repo = workspace.repository()?;
            let next = if all {
                repo.unstage(repo.staged())
            } else {
                repo.unstage(&names)
            };
            status!("{} file(s) staged", next.staged().len());
            workspace.repository = Some(next);
            workspace.save()
        }
        Command::Commit {
            message,
            author,
            long,
        } => commit(&mut workspace, message, author, long),
        Command::Log => log(&workspace),
        Command::Show { id } => show(&workspace, &id),
        Command::Apply { response } => apply(&mut workspace, &response),
        Command::Add { path, name, binary } => add(&mut workspace, &path, name, binary),
        Command::Rm { name } => {
            if workspace.files.remove(&name).is_none() {
                bail!("no such file: {name}");
            }
            status!("removed {}", name);
            workspace.save()
        }
        Command::Preview {
            debug,
            mobile,
            output,
        } => {
            let options = PreviewOptions {
                debug_mode: debug,
                mobile_emulation: mobile,
            };
            preview(&cli.workspace, options, output.as_deref())
        }
        Command::Export(ExportCommand::Zip { out }) => {
            let file = fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            export::write_zip(&workspace.files, file, true)?;
            status!("exported {} file(s) to {}", workspace.files.len(), out.display());
            Ok(())
        }
        Command::Export(ExportCommand::Html { out }) => {
            let document = export::single_document(&workspace.files)?;
            fs::write(&out, &document)
                .with_context(|| format!("failed to write {}", out.display()))?;
            status!(
                "exported {} bytes to {}",
                document.len().to_formatted_string(&Locale::en),
                out.display()
            );
            Ok(())
        }
        Command::Project(command) => project(&mut workspace, command),
    }
}

fn init(workspace: &mut Workspace, force: bool) -> Result<()> {
    if let Ok(existing) = workspace.repository()
        && existing.commit_count() > 0
        && !force
    {
        warning!(
            "this discards {} existing commit(s)",
            existing.commit_count()
        );
        if ui::prompt(&["no", "yes"])? != 'y' {
            bail!("init aborted");
        }
    }

    workspace.repository = Some(Repository::initialize());
    workspace.save()?;
    status!("initialised empty repository on branch main");
    Ok(())
}

fn status(workspace: &Workspace) -> Result<()> {
    let repo = workspace.repository()?;

    match repo.head() {
        Some(head) => info!("on branch {} at {}", repo.branch_name(), head.id),
        None => info!("on branch {}, no commits yet", repo.branch_name()),
    }

    let changes = ChangeSet::partition(compute_status(&workspace.files, repo), repo.staged());
    if changes.is_clean() {
        status!("nothing to commit, working tree clean");
        return Ok(());
    }

    if !changes.staged.is_empty() {
        status!("staged changes:");
        print_statuses(&changes.staged);
    }
    if !changes.unstaged.is_empty() {
        status!("unstaged changes:");
        print_statuses(&changes.unstaged);
    }
    Ok(())
}

fn print_statuses(statuses: &[FileStatus]) {
    for entry in statuses.iter().take(MAX_FILES_TO_SHOW) {
        info!("  {} {}", status_char(entry.status), entry.file_name);
    }
    if statuses.len() > MAX_FILES_TO_SHOW {
        info!("  (+{} more)", statuses.len() - MAX_FILES_TO_SHOW);
    }
}

/// staging a name that is neither in the files nor in HEAD is allowed, but
/// almost always a typo
fn warn_unknown_names(workspace: &Workspace, repo: &Repository, names: &[String]) {
    for name in names {
        let in_head = repo.head_snapshot().iter().any(|f| &f.name == name);
        if !workspace.files.contains(name) && !in_head {
            warning!("{} is not a project file", name);
        }
    }
}

fn commit(
    workspace: &mut Workspace,
    message: Option<String>,
    author: Option<String>,
    long: bool,
) -> Result<()> {
    let repo = workspace.repository()?;
    repo.ensure_staged()?;

    let message = match message {
        Some(message) => message,
        None if long => ui::edit_multi_line("")?,
        None => {
            status!("commit message:");
            ui::edit_one_line("")?
        }
    };
    if message.trim().is_empty() {
        bail!("empty commit message, aborting");
    }

    let author = author
        .or_else(|| std::env::var(AUTHOR_ENV).ok())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

    let next = repo.commit(&workspace.files, &message, &author)?;
    if let Some(head) = next.head() {
        status!(
            "[{} {}] {} ({} file(s) in snapshot)",
            next.branch_name(),
            head.id,
            head.message.lines().next().unwrap_or(""),
            head.files_snapshot.len()
        );
    }
    workspace.repository = Some(next);
    workspace.save()
}

fn log(workspace: &Workspace) -> Result<()> {
    use chrono::{Local, TimeZone};
    use colored::Colorize;

    let repo = workspace.repository()?;
    if repo.commit_count() == 0 {
        info!("no commits yet");
        return Ok(());
    }

    for commit in repo.log() {
        let time = Local
            .timestamp_millis_opt(commit.timestamp)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        info!(
            "{} {} {} ({} file(s))",
            commit.id.yellow(),
            time.dimmed(),
            commit.author,
            commit.files_snapshot.len()
        );
        for line in commit.message.lines() {
            info!("    {}", line);
        }
    }
    Ok(())
}

fn show(workspace: &Workspace, id: &str) -> Result<()> {
    let commit = workspace.repository()?.find(id)?;
    status!("{} {}", commit.id, commit.message);
    if let Some(parent) = &commit.parent_id {
        info!("parent {}", parent);
    }
    for file in &commit.files_snapshot {
        info!(
            "  {} ({} bytes)",
            file.name,
            file.content.len().to_formatted_string(&Locale::en)
        );
    }
    Ok(())
}

fn apply(workspace: &mut Workspace, response: &Path) -> Result<()> {
    let text = if response == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read response from stdin")?;
        text
    } else {
        fs::read_to_string(response)
            .with_context(|| format!("failed to read {}", response.display()))?
    };

    let parsed = generation::parse_response(&text);
    if !parsed.explanation.is_empty() {
        info!(parsed.explanation);
        info!();
    }
    if parsed.files.is_empty() {
        warning!("response contained no files");
        return Ok(());
    }

    for file in &parsed.files {
        let verb = if workspace.files.contains(&file.name) {
            "updated"
        } else {
            "added"
        };
        info!("  {} {}", verb, file.name);
    }
    let count = parsed.files.len();
    workspace.files.merge(parsed.files);
    status!("applied {} file(s)", count);
    workspace.save()
}

fn add(workspace: &mut Workspace, path: &Path, name: Option<String>, binary: bool) -> Result<()> {
    use base64::Engine;

    let name = match name {
        Some(name) => name,
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .context("path has no file name")?,
    };

    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let content = if binary {
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    } else {
        String::from_utf8(bytes)
            .with_context(|| format!("{} is not utf-8 text, use --binary", path.display()))?
    };

    workspace.files.upsert(ProjectFile::new(name.as_str(), content));
    status!("added {}", name);
    workspace.save()
}

fn preview(workspace_path: &Path, options: PreviewOptions, output: Option<&Path>) -> Result<()> {
    let mut bridge = PreviewBridge::new(TempDirFactory::new(), options);
    let files = Workspace::load(workspace_path)?.files;
    let result = bridge.update(&files);
    report_reload(&bridge, result, output)?;

    loop {
        let current = bridge.options();
        let choice = ui::prompt(&["logs", "refresh", "debug", "mobile", "quit"])?;

        // drain before a reload moves on to the next generation
        for entry in bridge.drain_telemetry() {
            ui::print_log_entry(&entry);
        }
        match choice {
            'q' => break,
            'l' => continue,
            _ => {}
        }

        let files = Workspace::load(workspace_path)?.files;
        let result = match choice {
            'd' | 'm' => {
                let toggled = PreviewOptions {
                    debug_mode: current.debug_mode ^ (choice == 'd'),
                    mobile_emulation: current.mobile_emulation ^ (choice == 'm'),
                };
                match bridge.set_options(&files, toggled) {
                    Ok(Some(outcome)) => Ok(outcome),
                    Ok(None) => continue,
                    Err(e) => Err(e),
                }
            }
            _ => bridge.refresh(&files),
        };
        report_reload(&bridge, result, output)?;
    }

    bridge.unmount();
    status!("preview closed");
    Ok(())
}

/// print what a reload produced; construction failures are shown but leave
/// the loop running so the user can retry
fn report_reload(
    bridge: &PreviewBridge<TempDirFactory>,
    result: Result<PreviewOutcome, error::SandboxError>,
    output: Option<&Path>,
) -> Result<()> {
    match result {
        Ok(PreviewOutcome::NotComposable) => {
            warning!("project has no html file; its files can be exported but not previewed");
        }
        Ok(PreviewOutcome::Running { .. }) => {
            let Some(context) = bridge.context() else {
                return Ok(());
            };
            let options = bridge.options();
            status!(
                "preview #{} ready{}{}: {}",
                context.generation(),
                if options.debug_mode { " [debug]" } else { "" },
                if options.mobile_emulation { " [mobile]" } else { "" },
                context.url()
            );
            if let Some(output) = output {
                fs::copy(context.document_path(), output)
                    .with_context(|| format!("failed to write {}", output.display()))?;
                info!("document copied to {}", output.display());
            }
        }
        Err(e) => error!("{}", e),
    }
    Ok(())
}

fn project(workspace: &mut Workspace, command: ProjectCommand) -> Result<()> {
    let store = ProjectStore::open_default()?;

    match command {
        ProjectCommand::Save { name } => {
            let saved = store.save(&name, &workspace.files)?;
            status!("saved {} ({}) with {} file(s)", saved.name, saved.id, saved.files.len());
        }
        ProjectCommand::List => {
            let projects = store.list();
            if projects.is_empty() {
                info!("no saved projects in {}", store.path().display());
            }
            for saved in projects {
                info!("{}  {}  ({} file(s))", saved.id, saved.name, saved.files.len());
            }
        }
        ProjectCommand::Load { id } => {
            let saved = store
                .load(&id)
                .with_context(|| format!("no saved project with id {id}"))?;
            workspace.replace_files(saved.file_set());
            workspace.save()?;
            status!("loaded {} ({} file(s)), history reset", saved.name, saved.files.len());
        }
        ProjectCommand::Delete { id } => {
            let before = store.list().len();
            let remaining = store.delete(&id)?;
            if remaining.len() == before {
                warning!("no saved project with id {}", id);
            } else {
                status!("deleted {}", id);
            }
        }
    }
    Ok(())
}
