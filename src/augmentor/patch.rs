//! Per-file patch step: import rewrite, anchor lookup, splice, persist.

use super::scan::scan_assignments;
use super::table::MethodEntry;
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// What happened to one (file, method) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The form block was spliced in and the file rewritten.
    Patched,
    /// A `<method>.form` assignment already exists; the file was left alone.
    AlreadyPresent,
    /// The target file does not exist under the root.
    FileMissing,
    /// No `<method>.<verb>` base definition was found.
    PatternNotFound,
}

const IMPORT_PATTERN: &str =
    r"import \{ queryParams, type RouteQueryOptions, type RouteDefinition(.*?) \}";
const IMPORT_REPLACEMENT: &str =
    "import { queryParams, type RouteQueryOptions, type RouteDefinition, type RouteFormDefinition$1 }";

/// Apply one method entry to one generated file. Skips are reported through
/// [`PatchOutcome`]; filesystem failures and write conflicts are errors.
pub fn patch_file(root: &Path, file: &Path, entry: &MethodEntry) -> Result<PatchOutcome> {
    let full_path = root.join(file);

    if !full_path.exists() {
        return Ok(PatchOutcome::FileMissing);
    }

    let original = fs::read_to_string(&full_path)
        .with_context(|| format!("failed to read {}", full_path.display()))?;

    let content = ensure_form_import(&original).into_owned();

    let assignments = scan_assignments(&content);

    if assignments
        .iter()
        .any(|a| a.target == entry.method && a.property == "form")
    {
        return Ok(PatchOutcome::AlreadyPresent);
    }

    // The canonical definition is written last among overloads, so the last
    // occurrence anchors the insertion.
    let Some(anchor) = assignments
        .iter()
        .filter(|a| a.target == entry.method && a.property == entry.http_method)
        .last()
    else {
        return Ok(PatchOutcome::PatternNotFound);
    };

    let block = form_block(file, entry);

    let mut patched = String::with_capacity(content.len() + block.len());
    patched.push_str(&content[..anchor.end]);
    patched.push_str(&block);
    patched.push_str(&content[anchor.end..]);

    // A file rewritten by another process between read and write is a
    // conflict, not something to overwrite.
    let current = fs::read_to_string(&full_path)
        .with_context(|| format!("failed to re-read {}", full_path.display()))?;
    if current != original {
        bail!("{} changed during augmentation", full_path.display());
    }

    fs::write(&full_path, patched)
        .with_context(|| format!("failed to write {}", full_path.display()))?;

    Ok(PatchOutcome::Patched)
}

/// Make sure the wayfinder import line carries the `RouteFormDefinition`
/// marker type. No-op when it is already present.
fn ensure_form_import(content: &str) -> Cow<'_, str> {
    if content.contains("type RouteFormDefinition") {
        return Cow::Borrowed(content);
    }

    Regex::new(IMPORT_PATTERN).map_or(Cow::Borrowed(content), |re| {
        re.replace(content, IMPORT_REPLACEMENT)
    })
}

fn form_block(file: &Path, entry: &MethodEntry) -> String {
    format!(
        "\n\n/**\n* @see {controller}::{controller_method}\n* @see {source}\n* @route '{route}'\n*/\n{method}.form = (): RouteFormDefinition<'{verb}'> => ({{\n    action: {method}.definition.url,\n    method: '{verb}',\n}})",
        controller = controller_citation(file),
        controller_method = entry.controller_method,
        source = entry.source_location,
        route = entry.route,
        method = entry.method,
        verb = entry.http_method,
    )
}

/// Derive the controller class citation from the generated file path, e.g.
/// `App/Http/Controllers/Auth/RegisteredUserController.ts` becomes
/// `\App\Http\Controllers\Auth\RegisteredUserController`.
fn controller_citation(file: &Path) -> String {
    let stem = file.with_extension("");
    let segments: Vec<String> = stem
        .iter()
        .map(|part| part.to_string_lossy().into_owned())
        .collect();

    format!("\\{}", segments.join("\\"))
}
