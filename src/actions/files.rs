//! Workspace file actions

use std::path::Path;

use super::phrases;
use super::{ActionContext, ActionName, ActionResult, Args, collaborator_failure, spoken_list};

/// Matches read aloud; the rest are shown on screen
const SPOKEN_MATCHES: usize = 3;

pub(super) fn create_folder(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(name) = args.text("name") else {
        return ActionResult::invalid("What should I call the folder?");
    };

    match ctx.files.create_folder(name) {
        Ok(_) => ActionResult::success(phrases::complete(&format!("Folder '{name}' created."))),
        Err(e) => collaborator_failure(ActionName::CreateFolder, &e),
    }
}

pub(super) fn create_file(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(name) = args.text("name") else {
        return ActionResult::invalid("What should I call the file?");
    };

    match ctx.files.create_file(name) {
        Ok(_) => ActionResult::success(phrases::complete(&format!("File '{name}' created."))),
        Err(e) => collaborator_failure(ActionName::CreateFile, &e),
    }
}

pub(super) fn search_files(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(pattern) = args.text("pattern") else {
        return ActionResult::invalid("What file should I look for?");
    };

    let found = match ctx.files.search(pattern) {
        Ok(found) => found,
        Err(e) => return collaborator_failure(ActionName::SearchFiles, &e),
    };

    if found.is_empty() {
        return ActionResult::not_found(format!("No files found matching '{pattern}'."));
    }

    for path in &found {
        let shown = path.strip_prefix(ctx.files.root()).unwrap_or(path);
        ctx.screen.show(&format!("  {}", shown.display()));
    }

    let names: Vec<String> = found
        .iter()
        .take(SPOKEN_MATCHES)
        .filter_map(|p| p.file_name().map(Path::new))
        .map(|name| name.display().to_string())
        .collect();

    let noun = if found.len() == 1 { "file" } else { "files" };
    ActionResult::success(format!(
        "I found {} {noun}: {}.",
        found.len(),
        spoken_list(&names)
    ))
}
