//! Route-form augmentor.
//!
//! One-shot build-step utility: for every entry in an injected
//! [`table::RouteMethodTable`] it appends a `<method>.form = ...` block after
//! the canonical `<method>.<verb>` definition in the generated route-helper
//! file. Runs strictly sequentially because every step rewrites a shared
//! on-disk artifact.

pub mod patch;
pub mod scan;
pub mod table;

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use self::patch::{patch_file, PatchOutcome};
use self::table::RouteMethodTable;

/// Counts surfaced to the caller. Warnings never change the process exit
/// code; integrations that want to fail on them read the counts instead.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub patched: usize,
    pub already_present: usize,
    pub warnings: usize,
}

/// Apply the whole table in order. Per-pair problems are logged warnings and
/// the batch keeps going; filesystem write failures abort it.
pub fn run(table: &RouteMethodTable, root: &Path) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (file, entries) in table.iter() {
        for entry in entries {
            match patch_file(root, file, entry)? {
                PatchOutcome::Patched => {
                    info!(
                        "added form definition to {} for {}",
                        file.display(),
                        entry.method
                    );
                    summary.patched += 1;
                }
                PatchOutcome::AlreadyPresent => {
                    info!(
                        "form definition already exists in {} for {}",
                        file.display(),
                        entry.method
                    );
                    summary.already_present += 1;
                }
                PatchOutcome::FileMissing => {
                    warn!("file not found: {}", root.join(file).display());
                    summary.warnings += 1;
                }
                PatchOutcome::PatternNotFound => {
                    warn!(
                        "could not find {}.{} in {}",
                        entry.method,
                        entry.http_method,
                        file.display()
                    );
                    summary.warnings += 1;
                }
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::table::MethodEntry;
    use super::*;
    use std::fs;

    fn definition(method: &str, verb: &str, route: &str) -> String {
        format!(
            "\
import {{ queryParams, type RouteQueryOptions, type RouteDefinition }} from './wayfinder'

{method}.{verb} = (options?: RouteQueryOptions): RouteDefinition<'{verb}'> => ({{
    url: {method}.url(options),
    method: '{verb}',
}})

{method}.definition = {{
    methods: [\"{verb}\"],
    url: '{route}',
}} satisfies RouteDefinition<[\"{verb}\"]>
"
        )
    }

    fn fixture_table() -> RouteMethodTable {
        RouteMethodTable::new()
            .with_file(
                "Auth/LoginController.ts",
                vec![MethodEntry::new(
                    "store",
                    "post",
                    "/login",
                    "store",
                    "app/Auth/LoginController.php:30",
                )],
            )
            .with_file(
                "Settings/ProfileController.ts",
                vec![
                    MethodEntry::new(
                        "update",
                        "patch",
                        "/settings/profile",
                        "update",
                        "app/Settings/ProfileController.php:30",
                    ),
                    MethodEntry::new(
                        "destroy",
                        "delete",
                        "/settings/profile",
                        "destroy",
                        "app/Settings/ProfileController.php:49",
                    ),
                ],
            )
    }

    fn tree_snapshot(root: &Path, files: &[&str]) -> Vec<String> {
        files
            .iter()
            .map(|file| fs::read_to_string(root.join(file)).unwrap())
            .collect()
    }

    #[test]
    fn patches_every_pair_in_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let login = dir.path().join("Auth/LoginController.ts");
        let profile = dir.path().join("Settings/ProfileController.ts");

        fs::create_dir_all(login.parent().unwrap()).unwrap();
        fs::create_dir_all(profile.parent().unwrap()).unwrap();
        fs::write(&login, definition("store", "post", "/login")).unwrap();
        fs::write(
            &profile,
            format!(
                "{}\n{}",
                definition("update", "patch", "/settings/profile"),
                "destroy.delete = (options?: RouteQueryOptions): RouteDefinition<'delete'> => ({\n    url: destroy.url(options),\n    method: 'delete',\n})\n"
            ),
        )
        .unwrap();

        let summary = run(&fixture_table(), dir.path()).unwrap();

        assert_eq!(
            summary,
            RunSummary {
                patched: 3,
                already_present: 0,
                warnings: 0,
            }
        );

        let content = fs::read_to_string(&profile).unwrap();
        assert!(content.contains("update.form = (): RouteFormDefinition<'patch'>"));
        assert!(content.contains("destroy.form = (): RouteFormDefinition<'delete'>"));
    }

    #[test]
    fn second_run_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let files = ["Auth/LoginController.ts", "Settings/ProfileController.ts"];
        let login = dir.path().join(files[0]);
        let profile = dir.path().join(files[1]);

        fs::create_dir_all(login.parent().unwrap()).unwrap();
        fs::create_dir_all(profile.parent().unwrap()).unwrap();
        fs::write(&login, definition("store", "post", "/login")).unwrap();
        fs::write(
            &profile,
            format!(
                "{}\n{}",
                definition("update", "patch", "/settings/profile"),
                definition("destroy", "delete", "/settings/profile")
            ),
        )
        .unwrap();

        let table = fixture_table();

        let first = run(&table, dir.path()).unwrap();
        assert_eq!(first.patched, 3);
        let after_first = tree_snapshot(dir.path(), &files);

        let second = run(&table, dir.path()).unwrap();
        assert_eq!(
            second,
            RunSummary {
                patched: 0,
                already_present: 3,
                warnings: 0,
            }
        );
        let after_second = tree_snapshot(dir.path(), &files);

        assert_eq!(after_first, after_second);
    }

    #[test]
    fn warnings_do_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        // First table entry is missing on disk, second lacks the base
        // definition, third is fine.
        let table = RouteMethodTable::new()
            .with_file(
                "Missing.ts",
                vec![MethodEntry::new("store", "post", "/x", "store", "x.php:1")],
            )
            .with_file(
                "NoPattern.ts",
                vec![MethodEntry::new("store", "post", "/x", "store", "x.php:1")],
            )
            .with_file(
                "Good.ts",
                vec![MethodEntry::new(
                    "store",
                    "post",
                    "/login",
                    "store",
                    "x.php:1",
                )],
            );

        let no_pattern = "import { queryParams, type RouteQueryOptions, type RouteDefinition } from './wayfinder'\n\nother.get = (args) => ({ url: '/y', method: 'get' })\n";
        fs::write(dir.path().join("NoPattern.ts"), no_pattern).unwrap();
        fs::write(
            dir.path().join("Good.ts"),
            definition("store", "post", "/login"),
        )
        .unwrap();

        let summary = run(&table, dir.path()).unwrap();

        assert_eq!(
            summary,
            RunSummary {
                patched: 1,
                already_present: 0,
                warnings: 2,
            }
        );

        // Skipped files are left byte-identical.
        assert_eq!(
            fs::read_to_string(dir.path().join("NoPattern.ts")).unwrap(),
            no_pattern
        );
        assert!(fs::read_to_string(dir.path().join("Good.ts"))
            .unwrap()
            .contains("store.form ="));
    }
}
